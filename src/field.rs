//! Grid column configuration

use crate::error::Result;
use crate::filtering::FilterConfig;
use crate::row::DataRow;
use crate::sorting::SortDirection;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Function applied to a raw cell value before display.
///
/// Receives the resolved raw value and the full row, returns the
/// display value.
pub type ValueTransform = Arc<dyn Fn(&Value, &DataRow) -> Value>;

/// Describes one grid column.
///
/// The name is the stable join key between request input, provider
/// filter/sort calls and cell lookup; it is set at construction and
/// never changes.
///
/// # Examples
///
/// ```
/// use datagrid::{FieldConfig, SortDirection};
///
/// let column = FieldConfig::new("first_name")
/// 	.sortable(true)
/// 	.sorting(SortDirection::Asc)
/// 	.order(2);
///
/// assert_eq!(column.name(), "first_name");
/// // Label derived from the name when unset
/// assert_eq!(column.get_label(), "First Name");
/// assert!(column.is_sorted_asc());
/// ```
#[derive(Clone)]
pub struct FieldConfig {
	name: String,
	label: Option<String>,
	order: i32,
	sortable: bool,
	sorting: Option<SortDirection>,
	hidden: bool,
	transform: Option<ValueTransform>,
	filters: Vec<FilterConfig>,
	cell_attributes: Vec<(String, String)>,
}

impl FieldConfig {
	/// Creates a column bound to `name`
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			label: None,
			order: 0,
			sortable: false,
			sorting: None,
			hidden: false,
			transform: None,
			filters: Vec::new(),
			cell_attributes: Vec::new(),
		}
	}

	/// Sets the header label
	pub fn label(mut self, label: impl Into<String>) -> Self {
		self.label = Some(label.into());
		self
	}

	/// Sets the explicit display position; 0 means unordered
	pub fn order(mut self, order: i32) -> Self {
		self.order = order;
		self
	}

	/// Enables or disables sorting controls for the column
	pub fn sortable(mut self, sortable: bool) -> Self {
		self.sortable = sortable;
		self
	}

	/// Declares a default sort direction for the column
	pub fn sorting(mut self, direction: SortDirection) -> Self {
		self.sorting = Some(direction);
		self
	}

	/// Makes the column hidden
	pub fn hidden(mut self, hidden: bool) -> Self {
		self.hidden = hidden;
		self
	}

	/// Sets the function that transforms raw cell values for display
	pub fn transform(mut self, f: impl Fn(&Value, &DataRow) -> Value + 'static) -> Self {
		self.transform = Some(Arc::new(f));
		self
	}

	/// Attaches a filtering control to the column.
	///
	/// The filter's field name defaults to this column's name.
	pub fn filter(mut self, filter: FilterConfig) -> Self {
		self.filters.push(filter.attach(&self.name));
		self
	}

	/// Adds an HTML attribute rendered on this column's cells
	pub fn cell_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.cell_attributes.push((name.into(), value.into()));
		self
	}

	/// Returns the column's unique name
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Returns the header label, derived from the name if unset.
	///
	/// Derivation replaces `-`, `_` and `.` with spaces and upcases the
	/// first letter of every word.
	pub fn get_label(&self) -> String {
		match &self.label {
			Some(label) => label.clone(),
			None => self
				.name
				.split(['-', '_', '.'])
				.filter(|word| !word.is_empty())
				.map(|word| {
					let mut chars = word.chars();
					match chars.next() {
						Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
						None => String::new(),
					}
				})
				.collect::<Vec<_>>()
				.join(" "),
		}
	}

	/// Returns the explicit display position
	pub fn get_order(&self) -> i32 {
		self.order
	}

	/// Returns true if sorting controls must be rendered
	pub fn is_sortable(&self) -> bool {
		self.sortable
	}

	/// Returns the current sort direction, if the rows are sorted by
	/// this column
	pub fn get_sorting(&self) -> Option<SortDirection> {
		self.sorting
	}

	/// Sets or clears the current sort direction
	pub fn set_sorting(&mut self, direction: Option<SortDirection>) {
		self.sorting = direction;
	}

	/// Returns true if rows are sorted ascending by this column
	pub fn is_sorted_asc(&self) -> bool {
		self.sorting == Some(SortDirection::Asc)
	}

	/// Returns true if rows are sorted descending by this column
	pub fn is_sorted_desc(&self) -> bool {
		self.sorting == Some(SortDirection::Desc)
	}

	/// Returns true if the column is hidden
	pub fn is_hidden(&self) -> bool {
		self.hidden
	}

	/// Hides the column
	pub fn hide(&mut self) {
		self.hidden = true;
	}

	/// Makes the column visible
	pub fn show(&mut self) {
		self.hidden = false;
	}

	/// Returns the filtering controls attached to the column
	pub fn filters(&self) -> &[FilterConfig] {
		&self.filters
	}

	/// Returns true if any filtering controls are attached
	pub fn has_filters(&self) -> bool {
		!self.filters.is_empty()
	}

	/// Returns the HTML attributes to render on cells
	pub fn cell_attributes(&self) -> &[(String, String)] {
		&self.cell_attributes
	}

	/// Resolves the display value of this column for a row, applying
	/// the value transform when one is set
	pub fn value(&self, row: &DataRow) -> Result<Value> {
		let raw = row.cell_value(&self.name)?;
		Ok(match &self.transform {
			Some(transform) => transform(raw, row),
			None => raw.clone(),
		})
	}

	/// Serializes the column state handed to template engines
	pub(crate) fn view_summary(&self) -> Value {
		serde_json::json!({
			"name": self.name,
			"label": self.get_label(),
			"order": self.order,
			"sortable": self.sortable,
			"sorting": self.sorting.map(|d| d.as_str()),
			"hidden": self.hidden,
		})
	}
}

impl fmt::Debug for FieldConfig {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("FieldConfig")
			.field("name", &self.name)
			.field("label", &self.label)
			.field("order", &self.order)
			.field("sortable", &self.sortable)
			.field("sorting", &self.sorting)
			.field("hidden", &self.hidden)
			.field("filters", &self.filters)
			.finish_non_exhaustive()
	}
}
