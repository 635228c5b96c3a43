//! Error types for datagrid

use thiserror::Error;

/// Error type for grid configuration, preparation and rendering.
///
/// The engine fails loudly and specifically instead of degrading
/// output silently; converting these into HTTP responses is the job of
/// the surrounding application.
#[derive(Debug, Error)]
pub enum GridError {
	/// The grid or a component is configured inconsistently
	#[error("Invalid grid configuration: {0}")]
	Configuration(String),

	/// A row value for a requested field path cannot be resolved
	#[error("Can't read '{field}' from data row: missing segment '{segment}'")]
	FieldResolution {
		/// Full field path that was requested
		field: String,
		/// Path segment that failed to resolve
		segment: String,
	},

	/// A data provider was asked to filter or sort with an operator it
	/// does not implement
	#[error("Unsupported filter operator: {0}")]
	UnsupportedOperator(String),

	/// A totals-style feature was configured with an aggregation
	/// operation the engine does not recognize
	#[error("Unknown aggregation operation: {0}")]
	UnknownAggregation(String),

	/// The template engine failed to render a template
	#[error("Template error: {0}")]
	Template(String),
}

/// Result type for grid operations
pub type Result<T> = std::result::Result<T, GridError>;
