//! Filter configuration and filtering orchestration

use crate::error::Result;
use crate::grid::GridContext;
use crate::provider::DataProvider;
use std::fmt;
use std::sync::Arc;

/// Comparison operator handed to [`DataProvider::filter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterOperator {
	/// Exact match
	Eq,
	/// Negated exact match
	NotEq,
	/// Greater than
	Gt,
	/// Less than
	Lt,
	/// Greater than or equal
	Gte,
	/// Less than or equal
	Lte,
	/// Partial match anywhere (`%value%`)
	Like,
	/// Partial match at the end (`%value`)
	LikeLeft,
	/// Partial match at the start (`value%`)
	LikeRight,
	/// Match any value of a set
	In,
}

impl FilterOperator {
	/// Returns the request-level token for this operator, used in
	/// filter ids
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Eq => "eq",
			Self::NotEq => "n_eq",
			Self::Gt => "gt",
			Self::Lt => "lt",
			Self::Gte => "gt_e",
			Self::Lte => "ls_e",
			Self::Like => "like",
			Self::LikeLeft => "like_l",
			Self::LikeRight => "like_r",
			Self::In => "in",
		}
	}

	/// Returns true for the partial-match operators that take SQL LIKE
	/// wildcard patterns
	pub fn is_like(&self) -> bool {
		matches!(self, Self::Like | Self::LikeLeft | Self::LikeRight)
	}
}

impl fmt::Display for FilterOperator {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Function that bypasses operator-based filtering entirely.
///
/// Receives the resolved filter value and the data provider.
pub type FilteringFunc = Arc<dyn Fn(&str, &mut dyn DataProvider) -> Result<()>>;

/// Configuration of one filtering control.
///
/// The id (`name-operator`) keys the filter's request input and must
/// be unique within a column's filter list.
///
/// # Examples
///
/// ```
/// use datagrid::{FilterConfig, FilterOperator};
///
/// let filter = FilterConfig::new(FilterOperator::Like)
/// 	.default_value("al")
/// 	.attach("name");
/// assert_eq!(filter.id(), "name-like");
/// ```
#[derive(Clone)]
pub struct FilterConfig {
	name: Option<String>,
	operator: FilterOperator,
	default_value: Option<String>,
	label: Option<String>,
	filtering_func: Option<FilteringFunc>,
}

impl FilterConfig {
	/// Creates a filter using `operator`
	pub fn new(operator: FilterOperator) -> Self {
		Self {
			name: None,
			operator,
			default_value: None,
			label: None,
			filtering_func: None,
		}
	}

	/// Sets the field name the filter applies to.
	///
	/// Defaults to the name of the column the filter is attached to.
	pub fn name(mut self, name: impl Into<String>) -> Self {
		self.name = Some(name.into());
		self
	}

	/// Sets the value used when the request carries no input for this
	/// filter
	pub fn default_value(mut self, value: impl Into<String>) -> Self {
		self.default_value = Some(value.into());
		self
	}

	/// Sets the label of the filtering control
	pub fn label(mut self, label: impl Into<String>) -> Self {
		self.label = Some(label.into());
		self
	}

	/// Sets a custom filtering function; operator and wildcard logic
	/// are bypassed entirely when one is set
	pub fn filtering_func(
		mut self,
		f: impl Fn(&str, &mut dyn DataProvider) -> Result<()> + 'static,
	) -> Self {
		self.filtering_func = Some(Arc::new(f));
		self
	}

	/// Binds the filter to a column, defaulting the field name
	pub fn attach(mut self, column_name: &str) -> Self {
		if self.name.is_none() {
			self.name = Some(column_name.to_string());
		}
		self
	}

	/// Returns the field name the filter applies to
	pub fn field_name(&self) -> &str {
		self.name.as_deref().unwrap_or_default()
	}

	/// Returns the operator
	pub fn operator(&self) -> FilterOperator {
		self.operator
	}

	/// Returns the default value
	pub fn get_default_value(&self) -> Option<&str> {
		self.default_value.as_deref()
	}

	/// Returns the control label, falling back to the field name
	pub fn get_label(&self) -> &str {
		self.label.as_deref().unwrap_or_else(|| self.field_name())
	}

	/// Returns the custom filtering function, if any
	pub fn get_filtering_func(&self) -> Option<&FilteringFunc> {
		self.filtering_func.as_ref()
	}

	/// Returns the filter id used as request input key:
	/// `name-operator`
	pub fn id(&self) -> String {
		format!("{}-{}", self.field_name(), self.operator)
	}
}

impl fmt::Debug for FilterConfig {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("FilterConfig")
			.field("name", &self.name)
			.field("operator", &self.operator)
			.field("default_value", &self.default_value)
			.finish_non_exhaustive()
	}
}

/// Data filtering manager.
///
/// Resolves each configured filter's current value and applies it to
/// the data provider during the prepare pass.
pub struct Filtering;

impl Filtering {
	/// Returns true if any column carries filtering controls
	pub fn available(ctx: &GridContext) -> bool {
		ctx.columns().iter().any(|column| column.has_filters())
	}

	/// Applies every configured filter, in column-then-filter
	/// declaration order.
	///
	/// Resolution: request input wins when present, including an
	/// explicit empty string; otherwise the default value. Filters
	/// resolving to nothing or an empty string are skipped. A custom
	/// filtering function bypasses operator and wildcard handling.
	pub fn apply(ctx: &mut GridContext) -> Result<()> {
		let columns = ctx.columns().to_vec();
		for column in &columns {
			for filter in column.filters() {
				let Some(value) = Self::resolved_value(ctx, filter) else {
					continue;
				};
				if let Some(func) = filter.get_filtering_func() {
					func(&value, ctx.provider_mut())?;
					continue;
				}
				let value = Self::prepare_value(filter.operator(), value);
				tracing::debug!(
					field = filter.field_name(),
					operator = %filter.operator(),
					value = %value,
					"applying filter"
				);
				ctx.provider_mut()
					.filter(filter.field_name(), filter.operator(), &value)?;
			}
		}
		Ok(())
	}

	/// Resolves a filter's current value: input when present (explicit
	/// empty string counts as present), else the default. Returns
	/// `None` when the filter should not be applied.
	pub fn resolved_value(ctx: &GridContext, filter: &FilterConfig) -> Option<String> {
		let resolved = match ctx.input().filter_value(&filter.id()) {
			Some(input) => Some(input),
			None => filter.get_default_value().map(str::to_string),
		};
		resolved.filter(|value| !value.is_empty())
	}

	/// Injects wildcards for partial-match operators unless the value
	/// already contains an unescaped `%` or `_`
	pub fn prepare_value(operator: FilterOperator, value: String) -> String {
		if !operator.is_like() || has_unescaped_wildcard(&value) {
			return value;
		}
		match operator {
			FilterOperator::Like => format!("%{value}%"),
			FilterOperator::LikeLeft => format!("%{value}"),
			FilterOperator::LikeRight => format!("{value}%"),
			_ => value,
		}
	}
}

/// Scans for a `%` or `_` not escaped by a preceding backslash
fn has_unescaped_wildcard(value: &str) -> bool {
	let mut previous = None;
	for ch in value.chars() {
		if (ch == '%' || ch == '_') && previous != Some('\\') {
			return true;
		}
		previous = Some(ch);
	}
	false
}
