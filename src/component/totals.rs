//! Running totals over the rendered page

use super::{Component, ComponentBase, Section};
use crate::error::{GridError, Result};
use crate::events::{EVENT_FETCH_ROW, EventPayload};
use crate::grid::GridContext;
use crate::row::DataRow;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fmt::Write as _;
use std::sync::Arc;

/// Aggregation applied to a totals field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregationOperation {
	/// Sum of the numeric values
	Sum,
	/// Arithmetic mean of the numeric values
	Avg,
	/// Number of aggregated rows
	Count,
}

impl AggregationOperation {
	/// Parses an operation token
	pub fn parse(token: &str) -> Result<Self> {
		match token {
			"sum" => Ok(Self::Sum),
			"avg" => Ok(Self::Avg),
			"count" => Ok(Self::Count),
			other => Err(GridError::UnknownAggregation(other.to_string())),
		}
	}

	fn label(&self) -> &'static str {
		match self {
			Self::Sum => "\u{2211} ",
			Self::Avg => "Avg. ",
			Self::Count => "Count: ",
		}
	}
}

#[derive(Debug, Default)]
struct TotalsState {
	rows: u64,
	sums: HashMap<String, f64>,
}

/// Footer row aggregating the values of the rendered rows.
///
/// Subscribes to the provider's row-fetched events during
/// initialization and accumulates as the grid body renders; the row
/// itself must therefore render after the body, which its default
/// placement in the table footer guarantees. Aggregations cover
/// exactly the rows of the current page; rendering drains the
/// accumulated state so a repeated render recomputes from the next
/// body walk instead of double-counting.
pub struct TotalsRow {
	base: ComponentBase,
	fields: Vec<(String, String)>,
	operations: HashMap<String, AggregationOperation>,
	state: Arc<Mutex<TotalsState>>,
}

impl TotalsRow {
	/// Creates a totals row summing the given fields
	pub fn new<I, S>(fields: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self {
			base: ComponentBase::default(),
			fields: fields
				.into_iter()
				.map(|f| (f.into(), "sum".to_string()))
				.collect(),
			operations: HashMap::new(),
			state: Arc::new(Mutex::new(TotalsState::default())),
		}
	}

	/// Declares the parent section this row renders in
	pub fn section(mut self, section: Section) -> Self {
		self.base.render_section = Some(section);
		self
	}

	/// Overrides the aggregation operation for one field.
	///
	/// The token is validated during preparation; unknown tokens fail
	/// with [`GridError::UnknownAggregation`].
	pub fn operation(mut self, field: impl Into<String>, operation: impl Into<String>) -> Self {
		let field = field.into();
		let operation = operation.into();
		for (name, op) in &mut self.fields {
			if *name == field {
				*op = operation;
				return self;
			}
		}
		self.fields.push((field, operation));
		self
	}

	fn accumulate(state: &Mutex<TotalsState>, fields: &[(String, String)], row: &DataRow) {
		let mut state = state.lock();
		state.rows += 1;
		for (field, _) in fields {
			if let Ok(value) = row.cell_value(field)
				&& let Some(number) = value.as_f64()
			{
				*state.sums.entry(field.clone()).or_default() += number;
			}
		}
	}

	fn format_number(value: f64) -> String {
		if value.fract() == 0.0 {
			format!("{value:.0}")
		} else {
			format!("{value:.2}")
		}
	}

	fn cell_value(&self, field: &str) -> Option<String> {
		let operation = self.operations.get(field)?;
		let state = self.state.lock();
		let sum = state.sums.get(field).copied().unwrap_or(0.0);
		let value = match operation {
			AggregationOperation::Sum => Self::format_number(sum),
			AggregationOperation::Count => state.rows.to_string(),
			AggregationOperation::Avg => {
				if state.rows == 0 {
					Self::format_number(0.0)
				} else {
					Self::format_number(sum / state.rows as f64)
				}
			}
		};
		Some(format!("{}{}", operation.label(), value))
	}
}

impl Component for TotalsRow {
	fn base(&self) -> &ComponentBase {
		&self.base
	}

	fn base_mut(&mut self) -> &mut ComponentBase {
		&mut self.base
	}

	fn on_initialize(&mut self, ctx: &mut GridContext) -> Result<()> {
		let provider_id = ctx.provider().id().to_string();
		let state = Arc::clone(&self.state);
		let fields = self.fields.clone();
		ctx.events_mut().subscribe(
			EVENT_FETCH_ROW,
			provider_id,
			Arc::new(move |payload| {
				if let EventPayload::Row(row) = payload {
					Self::accumulate(&state, &fields, row);
				}
			}),
		);
		Ok(())
	}

	fn on_prepare(&mut self, _ctx: &mut GridContext) -> Result<()> {
		for (field, token) in &self.fields {
			self.operations
				.insert(field.clone(), AggregationOperation::parse(token)?);
		}
		Ok(())
	}

	fn do_render(&mut self, ctx: &mut GridContext) -> Result<String> {
		let columns = ctx.columns().to_vec();
		let mut out = String::from("<tr class=\"totals-row\">");
		for column in &columns {
			out.push_str("<td");
			if column.is_hidden() {
				out.push_str(" style=\"display:none;\"");
			}
			out.push('>');
			if let Some(cell) = self.cell_value(column.name()) {
				let _ = write!(out, "<strong>{cell}</strong>");
			}
			out.push_str("</td>");
		}
		out.push_str("</tr>");
		*self.state.lock() = TotalsState::default();
		Ok(out)
	}
}

impl std::fmt::Debug for TotalsRow {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("TotalsRow")
			.field("fields", &self.fields)
			.finish_non_exhaustive()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[test]
	fn test_parse_rejects_unknown_operation() {
		assert!(AggregationOperation::parse("sum").is_ok());
		assert!(matches!(
			AggregationOperation::parse("median"),
			Err(GridError::UnknownAggregation(token)) if token == "median"
		));
	}

	#[test]
	fn test_accumulate_and_format() {
		let totals = TotalsRow::new(["price"]).operation("qty", "avg");
		for (id, price, qty) in [(1, 10.5, 2), (2, 4.5, 4)] {
			let row = DataRow::new(id, json!({"price": price, "qty": qty}));
			TotalsRow::accumulate(&totals.state, &totals.fields, &row);
		}
		let state = totals.state.lock();
		assert_eq!(state.rows, 2);
		assert_eq!(state.sums.get("price"), Some(&15.0));
		assert_eq!(state.sums.get("qty"), Some(&6.0));
		drop(state);
		assert_eq!(TotalsRow::format_number(15.0), "15");
		assert_eq!(TotalsRow::format_number(3.0 / 2.0), "1.50");
	}
}
