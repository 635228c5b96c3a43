//! Sort resolution and application

use crate::error::Result;
use crate::grid::GridContext;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Sorting direction for a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDirection {
	/// Ascending order
	#[serde(rename = "ASC")]
	Asc,
	/// Descending order
	#[serde(rename = "DESC")]
	Desc,
}

impl SortDirection {
	/// Returns the request-level token for this direction
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Asc => "ASC",
			Self::Desc => "DESC",
		}
	}
}

impl fmt::Display for SortDirection {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for SortDirection {
	type Err = ();

	fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
		match s.to_ascii_uppercase().as_str() {
			"ASC" => Ok(Self::Asc),
			"DESC" => Ok(Self::Desc),
			_ => Err(()),
		}
	}
}

/// Data sorting manager.
///
/// Reconciles request input with column defaults and applies the
/// resulting sort to the data provider. At most one column is ever
/// sorted at a time.
pub struct Sorter;

impl Sorter {
	/// Resolves and applies the active sort.
	///
	/// An explicit request-level sort wins and clears the sort state of
	/// every other column; otherwise the first column whose
	/// configuration declares a direction is used. The provider's
	/// `order_by` is called exactly once per prepare pass.
	pub fn apply(ctx: &mut GridContext) -> Result<()> {
		let explicit = ctx
			.input()
			.sorting()
			.map(|(field, direction)| (field.to_string(), direction));
		let mut sort = explicit.clone();
		for column in ctx.columns_mut() {
			match &explicit {
				Some((field, direction)) => {
					if column.name() == field {
						column.set_sorting(Some(*direction));
					} else {
						column.set_sorting(None);
					}
				}
				None => match column.get_sorting() {
					// First declaring column wins, the rest are cleared
					Some(direction) if sort.is_none() => {
						sort = Some((column.name().to_string(), direction));
					}
					_ => column.set_sorting(None),
				},
			}
		}
		if let Some((field, direction)) = sort {
			tracing::debug!(field = %field, direction = %direction, "applying sort");
			ctx.provider_mut().order_by(&field, direction);
		}
		Ok(())
	}

	/// Builds a URL that sets `column` + `direction` as the explicit
	/// request-level sort, leaving all other per-grid state untouched.
	pub fn link(ctx: &GridContext, column: &str, direction: SortDirection) -> String {
		ctx.input().url_with_sort(column, direction)
	}
}
