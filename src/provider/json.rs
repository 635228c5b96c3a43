//! In-memory data provider over JSON records

use crate::error::{GridError, Result};
use crate::filtering::FilterOperator;
use crate::provider::{DataProvider, Paginator};
use crate::row::{DataRow, display_value, resolve_path};
use crate::sorting::SortDirection;
use regex::RegexBuilder;
use serde_json::Value;
use std::cmp::Ordering;
use uuid::Uuid;

/// Data provider backed by an in-memory `Vec` of JSON records.
///
/// Filtering, sorting and pagination are evaluated over the source
/// vector when iteration starts. String comparison and LIKE-pattern
/// matching are case-insensitive, numeric comparison coerces string
/// input against numeric cells.
///
/// # Examples
///
/// ```
/// use datagrid::{DataProvider, FilterOperator, JsonDataProvider, SortDirection};
/// use serde_json::json;
///
/// let mut provider = JsonDataProvider::new(vec![
/// 	json!({"name": "Alice", "age": 34}),
/// 	json!({"name": "Bob", "age": 28}),
/// ]);
/// provider.filter("age", FilterOperator::Gt, "30").unwrap();
/// provider.order_by("name", SortDirection::Asc);
/// provider.reset();
///
/// let row = provider.get_row().unwrap().unwrap();
/// assert_eq!(row.cell_value("name").unwrap(), &json!("Alice"));
/// assert!(provider.get_row().unwrap().is_none());
/// ```
pub struct JsonDataProvider {
	id: String,
	src: Vec<Value>,
	filters: Vec<AppliedFilter>,
	sort: Option<(String, SortDirection)>,
	page_size: usize,
	current_page: usize,
	view: Option<Vec<usize>>,
	cursor: usize,
}

struct AppliedFilter {
	field: String,
	predicate: Predicate,
}

enum Predicate {
	Compare(FilterOperator, String),
	Like(regex::Regex),
	In(Vec<String>),
}

impl JsonDataProvider {
	/// Creates a provider over `src`
	pub fn new(src: Vec<Value>) -> Self {
		Self {
			id: Uuid::new_v4().to_string(),
			src,
			filters: Vec::new(),
			sort: None,
			page_size: 100,
			current_page: 1,
			view: None,
			cursor: 0,
		}
	}

	/// Overrides the generated provider id; useful when event
	/// subscriptions must be wired up before the provider exists
	pub fn with_id(mut self, id: impl Into<String>) -> Self {
		self.id = id.into();
		self
	}

	fn matches(&self, record: &Value) -> bool {
		self.filters.iter().all(|filter| {
			// Rows missing the filtered field are excluded, the way a
			// SQL NULL comparison never matches.
			let Some(cell) = resolve_path(record, &filter.field) else {
				return false;
			};
			match &filter.predicate {
				Predicate::Compare(operator, value) => compare(cell, *operator, value),
				Predicate::Like(pattern) => pattern.is_match(&display_value(cell)),
				Predicate::In(set) => set.iter().any(|value| loose_eq(cell, value)),
			}
		})
	}

	fn filtered_indices(&self) -> Vec<usize> {
		let mut indices: Vec<usize> = (0..self.src.len())
			.filter(|&i| self.matches(&self.src[i]))
			.collect();
		if let Some((field, direction)) = &self.sort {
			indices.sort_by(|&a, &b| {
				let ordering = compare_cells(
					resolve_path(&self.src[a], field),
					resolve_path(&self.src[b], field),
				);
				match direction {
					SortDirection::Asc => ordering,
					SortDirection::Desc => ordering.reverse(),
				}
			});
		}
		indices
	}

	fn ensure_view(&mut self) {
		if self.view.is_none() {
			self.view = Some(self.filtered_indices());
		}
	}
}

impl DataProvider for JsonDataProvider {
	fn id(&self) -> &str {
		&self.id
	}

	fn set_page_size(&mut self, page_size: usize) {
		self.page_size = page_size.max(1);
		self.cursor = 0;
	}

	fn set_current_page(&mut self, page: usize) {
		self.current_page = page.max(1);
		self.cursor = 0;
	}

	fn current_page(&self) -> usize {
		self.current_page
	}

	fn page_size(&self) -> usize {
		self.page_size
	}

	fn reset(&mut self) {
		self.cursor = 0;
	}

	fn order_by(&mut self, field: &str, direction: SortDirection) {
		self.sort = Some((field.to_string(), direction));
		self.view = None;
		self.cursor = 0;
	}

	fn filter(&mut self, field: &str, operator: FilterOperator, value: &str) -> Result<()> {
		let predicate = match operator {
			FilterOperator::In => Predicate::In(
				value
					.split(',')
					.map(|part| part.trim().to_string())
					.collect(),
			),
			op if op.is_like() => Predicate::Like(like_to_regex(value)?),
			op => Predicate::Compare(op, value.to_string()),
		};
		self.filters.push(AppliedFilter {
			field: field.to_string(),
			predicate,
		});
		self.view = None;
		self.cursor = 0;
		Ok(())
	}

	fn get_row(&mut self) -> Result<Option<DataRow>> {
		self.ensure_view();
		if self.cursor >= self.page_size {
			return Ok(None);
		}
		let offset = (self.current_page - 1) * self.page_size;
		let source = match &self.view {
			Some(view) => match view.get(offset + self.cursor) {
				Some(&index) => self.src[index].clone(),
				None => return Ok(None),
			},
			None => return Ok(None),
		};
		self.cursor += 1;
		let id = (offset + self.cursor) as u64;
		Ok(Some(DataRow::new(id, source)))
	}

	fn paginator(&self) -> Paginator {
		let total = match &self.view {
			Some(view) => view.len(),
			None => (0..self.src.len())
				.filter(|&i| self.matches(&self.src[i]))
				.count(),
		};
		Paginator::new(self.current_page, self.page_size, total)
	}
}

/// Translates a SQL LIKE pattern (`%`, `_`, backslash escapes) into an
/// anchored case-insensitive regex
fn like_to_regex(pattern: &str) -> Result<regex::Regex> {
	let mut translated = String::with_capacity(pattern.len() + 2);
	translated.push('^');
	let mut chars = pattern.chars();
	while let Some(ch) = chars.next() {
		match ch {
			'%' => translated.push_str(".*"),
			'_' => translated.push('.'),
			'\\' => {
				if let Some(escaped) = chars.next() {
					translated.push_str(&regex::escape(&escaped.to_string()));
				}
			}
			other => translated.push_str(&regex::escape(&other.to_string())),
		}
	}
	translated.push('$');
	RegexBuilder::new(&translated)
		.case_insensitive(true)
		.build()
		.map_err(|e| GridError::Configuration(format!("invalid LIKE pattern '{pattern}': {e}")))
}

fn compare(cell: &Value, operator: FilterOperator, value: &str) -> bool {
	match operator {
		FilterOperator::Eq => loose_eq(cell, value),
		FilterOperator::NotEq => !loose_eq(cell, value),
		FilterOperator::Gt => loose_cmp(cell, value) == Ordering::Greater,
		FilterOperator::Lt => loose_cmp(cell, value) == Ordering::Less,
		FilterOperator::Gte => loose_cmp(cell, value) != Ordering::Less,
		FilterOperator::Lte => loose_cmp(cell, value) != Ordering::Greater,
		// Like and In carry their own predicate variants
		_ => false,
	}
}

/// Equality with numeric coercion: `json!(30)` equals `"30"`, strings
/// compare case-insensitively
fn loose_eq(cell: &Value, value: &str) -> bool {
	loose_cmp(cell, value) == Ordering::Equal
}

fn loose_cmp(cell: &Value, value: &str) -> Ordering {
	if let (Some(left), Ok(right)) = (cell.as_f64(), value.parse::<f64>()) {
		return left.total_cmp(&right);
	}
	let left = display_value(cell).to_lowercase();
	left.cmp(&value.to_lowercase())
}

/// Ordering between two cells of the sort column: null < bool < number
/// < string, strings case-insensitive. Missing cells sort first.
fn compare_cells(a: Option<&Value>, b: Option<&Value>) -> Ordering {
	match (a, b) {
		(None, None) => Ordering::Equal,
		(None, Some(_)) => Ordering::Less,
		(Some(_), None) => Ordering::Greater,
		(Some(a), Some(b)) => match (a, b) {
			(Value::Number(x), Value::Number(y)) => x
				.as_f64()
				.unwrap_or(f64::NAN)
				.total_cmp(&y.as_f64().unwrap_or(f64::NAN)),
			(Value::String(x), Value::String(y)) => x
				.to_lowercase()
				.cmp(&y.to_lowercase())
				.then_with(|| x.cmp(y)),
			(Value::Bool(x), Value::Bool(y)) => x.cmp(y),
			_ => type_rank(a).cmp(&type_rank(b)),
		},
	}
}

fn type_rank(value: &Value) -> u8 {
	match value {
		Value::Null => 0,
		Value::Bool(_) => 1,
		Value::Number(_) => 2,
		Value::String(_) => 3,
		Value::Array(_) => 4,
		Value::Object(_) => 5,
	}
}
