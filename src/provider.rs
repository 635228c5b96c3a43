//! Abstract paginated, filterable, orderable data source

use crate::error::Result;
use crate::filtering::FilterOperator;
use crate::row::DataRow;
use crate::sorting::SortDirection;
use serde::Serialize;

pub mod json;

pub use json::JsonDataProvider;

/// The abstract data source a grid iterates over.
///
/// Implementations own pagination and cursor state. Contract:
///
/// - [`filter`](Self::filter) is cumulative; every call narrows the
///   result set further (logical AND). Filtering with an operator the
///   provider does not implement fails fast with
///   [`GridError::UnsupportedOperator`](crate::GridError::UnsupportedOperator)
///   rather than silently matching everything.
/// - [`order_by`](Self::order_by) replaces the active sort criterion;
///   at most one field is ordered at a time.
/// - [`get_row`](Self::get_row) advances exactly one position and
///   returns `None` once all rows on the current page are exhausted.
///   The cursor rewinds only on [`reset`](Self::reset), which keeps
///   applied filters and sort.
/// - Filtering and sorting must be applied before the first
///   `get_row` call of a pass; providers have no obligation to support
///   re-filtering mid-iteration.
/// - [`paginator`](Self::paginator) metadata is computable without
///   consuming the iterator.
pub trait DataProvider {
	/// Stable identifier used to key event subscriptions
	fn id(&self) -> &str;

	/// Sets the maximal quantity of rows per page
	fn set_page_size(&mut self, page_size: usize);

	/// Sets the current page; numeration starts from 1
	fn set_current_page(&mut self, page: usize);

	/// Returns the current page number
	fn current_page(&self) -> usize;

	/// Returns the page size
	fn page_size(&self) -> usize;

	/// Rewinds iteration without forgetting applied filters and sort
	fn reset(&mut self);

	/// Replaces the active sort criterion
	fn order_by(&mut self, field: &str, direction: SortDirection);

	/// Narrows the result set by one more predicate
	fn filter(&mut self, field: &str, operator: FilterOperator, value: &str) -> Result<()>;

	/// Fetches one row and moves the cursor forward; `None` at
	/// end of page
	fn get_row(&mut self) -> Result<Option<DataRow>>;

	/// Returns pagination metadata for the current
	/// (filter, sort, page) tuple
	fn paginator(&self) -> Paginator;
}

/// Pagination metadata for one page of a provider's result set.
///
/// # Examples
///
/// ```
/// use datagrid::Paginator;
///
/// let page = Paginator::new(2, 10, 35);
/// assert_eq!(page.first_item(), Some(11));
/// assert_eq!(page.last_item(), Some(20));
/// assert_eq!(page.last_page(), 4);
/// assert!(page.has_next());
/// assert!(page.has_previous());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Paginator {
	current_page: usize,
	page_size: usize,
	total: usize,
}

impl Paginator {
	/// Creates metadata for `current_page` of `total` records split
	/// into pages of `page_size`
	pub fn new(current_page: usize, page_size: usize, total: usize) -> Self {
		Self {
			current_page: current_page.max(1),
			page_size: page_size.max(1),
			total,
		}
	}

	/// Returns the current page number (1-based)
	pub fn current_page(&self) -> usize {
		self.current_page
	}

	/// Returns the page size
	pub fn page_size(&self) -> usize {
		self.page_size
	}

	/// Returns the total record count across all pages
	pub fn total(&self) -> usize {
		self.total
	}

	/// Returns the number of the last page; at least 1
	pub fn last_page(&self) -> usize {
		self.total.div_ceil(self.page_size).max(1)
	}

	/// Returns the 1-based index of the first record on this page, or
	/// `None` when the page is empty
	pub fn first_item(&self) -> Option<usize> {
		let offset = (self.current_page - 1) * self.page_size;
		(offset < self.total).then_some(offset + 1)
	}

	/// Returns the 1-based index of the last record on this page, or
	/// `None` when the page is empty
	pub fn last_item(&self) -> Option<usize> {
		self.first_item()
			.map(|_| (self.current_page * self.page_size).min(self.total))
	}

	/// Returns true if a next page exists
	pub fn has_next(&self) -> bool {
		self.current_page < self.last_page()
	}

	/// Returns true if a previous page exists
	pub fn has_previous(&self) -> bool {
		self.current_page > 1
	}
}
