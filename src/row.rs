//! Read-only row view over one fetched record

use crate::error::{GridError, Result};
use serde_json::Value;

/// A row of data received from a data provider.
///
/// Rows are created fresh per fetched record and discarded after one
/// full pass. The id is the 1-based row number, global across pages:
/// `(current_page - 1) * page_size + position_within_page`.
///
/// # Examples
///
/// ```
/// use datagrid::DataRow;
/// use serde_json::json;
///
/// let row = DataRow::new(21, json!({"name": "Alice", "address": {"city": "Riga"}}));
/// assert_eq!(row.id(), 21);
/// assert_eq!(row.cell_value("name").unwrap(), &json!("Alice"));
/// assert_eq!(row.cell_value("address.city").unwrap(), &json!("Riga"));
/// assert!(row.cell_value("address.zip").is_err());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DataRow {
	id: u64,
	source: Value,
}

impl DataRow {
	/// Creates a row view over a backing record
	pub fn new(id: u64, source: Value) -> Self {
		Self { id, source }
	}

	/// Returns the 1-based global row number
	pub fn id(&self) -> u64 {
		self.id
	}

	/// Returns the opaque backing record
	pub fn source(&self) -> &Value {
		&self.source
	}

	/// Resolves the value of a field.
	///
	/// A dot-separated name is treated as a path of nested accesses.
	/// Fails with [`GridError::FieldResolution`] if any path segment is
	/// missing; silently showing blank data is worse than failing the
	/// render.
	pub fn cell_value(&self, field: &str) -> Result<&Value> {
		let mut current = &self.source;
		for segment in field.split('.') {
			current = current
				.get(segment)
				.ok_or_else(|| GridError::FieldResolution {
					field: field.to_string(),
					segment: segment.to_string(),
				})?;
		}
		Ok(current)
	}
}

/// Resolves a dot-separated path against a value, returning `None` for
/// missing segments. Used by providers where a missing field excludes
/// the row instead of failing the pass.
pub(crate) fn resolve_path<'a>(value: &'a Value, field: &str) -> Option<&'a Value> {
	let mut current = value;
	for segment in field.split('.') {
		current = current.get(segment)?;
	}
	Some(current)
}

/// Renders a cell value for display: strings unquoted, null empty,
/// everything else in JSON notation.
pub(crate) fn display_value(value: &Value) -> String {
	match value {
		Value::Null => String::new(),
		Value::String(s) => s.clone(),
		other => other.to_string(),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[test]
	fn test_nested_lookup() {
		let row = DataRow::new(1, json!({"a": {"b": {"c": 7}}}));
		assert_eq!(row.cell_value("a.b.c").unwrap(), &json!(7));
	}

	#[test]
	fn test_missing_segment_reports_field_and_segment() {
		let row = DataRow::new(1, json!({"a": {"b": 1}}));
		let err = row.cell_value("a.x").unwrap_err();
		match err {
			GridError::FieldResolution { field, segment } => {
				assert_eq!(field, "a.x");
				assert_eq!(segment, "x");
			}
			other => panic!("unexpected error: {other}"),
		}
	}

	#[test]
	fn test_display_value() {
		assert_eq!(display_value(&json!("x")), "x");
		assert_eq!(display_value(&json!(null)), "");
		assert_eq!(display_value(&json!(3.5)), "3.5");
		assert_eq!(display_value(&json!(true)), "true");
	}
}
