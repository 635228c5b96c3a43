//! Row of filter inputs rendered inside the table header

use super::html_tag::escape;
use super::{Component, ComponentBase, ComponentRegistry, Registry, Section};
use crate::error::Result;
use crate::filtering::Filtering;
use crate::grid::GridContext;
use std::fmt::Write as _;

/// `<tr>` of filtering controls, one `<td>` per column in display
/// order.
///
/// Each attached filter renders as a text input named
/// `<grid>[filters][<filter id>]`, pre-filled with the resolved filter
/// value. The row renders nothing when no column carries filters.
///
/// Custom controls can be injected per column by attaching children to
/// the named section `filters_row_column_<column name>`.
#[derive(Debug, Default)]
pub struct FiltersRow {
	base: ComponentBase,
	registry: ComponentRegistry,
}

impl FiltersRow {
	/// Creates an empty filters row
	pub fn new() -> Self {
		Self::default()
	}

	/// Declares the parent section this row renders in
	pub fn section(mut self, section: Section) -> Self {
		self.base.render_section = Some(section);
		self
	}

	/// Adds a custom control; give it a
	/// `Section::Named("filters_row_column_<name>")` section to place
	/// it in that column's cell
	pub fn child(mut self, component: Box<dyn Component>) -> Self {
		self.registry.add(component);
		self
	}

	fn column_section(name: &str) -> Section {
		Section::Named(format!("filters_row_column_{name}"))
	}
}

impl Component for FiltersRow {
	fn base(&self) -> &ComponentBase {
		&self.base
	}

	fn base_mut(&mut self) -> &mut ComponentBase {
		&mut self.base
	}

	fn on_initialize(&mut self, ctx: &mut GridContext) -> Result<()> {
		if let Some(name) = self.base.name.clone() {
			self.registry.set_owner(name);
		}
		self.registry.initialize_all(ctx)
	}

	fn on_prepare(&mut self, ctx: &mut GridContext) -> Result<()> {
		self.registry.prepare_all(ctx)
	}

	fn do_render(&mut self, ctx: &mut GridContext) -> Result<String> {
		if !Filtering::available(ctx) {
			return Ok(String::new());
		}
		let key = ctx.input().key().to_string();
		let columns = ctx.columns().to_vec();
		let mut out = String::from("<tr class=\"filters-row\">");
		for (index, column) in columns.iter().enumerate() {
			out.push_str("<td>");
			if index == 0 {
				// Keep the active sort when the filter form is submitted
				out.push_str(&ctx.input().sorting_hidden_inputs_html());
			}
			for filter in column.filters() {
				let value = Filtering::resolved_value(ctx, filter).unwrap_or_default();
				let _ = write!(
					out,
					"<input type=\"text\" name=\"{}[filters][{}]\" value=\"{}\"/>",
					key,
					filter.id(),
					escape(&value)
				);
			}
			out.push_str(&self.registry.render_section(
				Some(&Self::column_section(column.name())),
				ctx,
			)?);
			out.push_str("</td>");
		}
		out.push_str("</tr>");
		Ok(out)
	}
}

impl Registry for FiltersRow {
	fn registry(&self) -> &ComponentRegistry {
		&self.registry
	}

	fn registry_mut(&mut self) -> &mut ComponentRegistry {
		&mut self.registry
	}
}
