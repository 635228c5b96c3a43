//! Table structure components: header, footer, rows and cells

use super::html_tag::escape;
use super::{Component, ComponentBase, ComponentRegistry, Registry, Section};
use crate::error::Result;
use crate::field::FieldConfig;
use crate::grid::GridContext;
use crate::row::{DataRow, display_value};
use crate::sorting::{SortDirection, Sorter};
use std::fmt::Write as _;

/// Table header block.
///
/// By default contains a [`ColumnHeadersRow`] and, in the end section,
/// a [`FiltersRow`](super::FiltersRow); pass replacement children to
/// drop or extend either.
#[derive(Debug)]
pub struct THead {
	base: ComponentBase,
	registry: ComponentRegistry,
}

impl Default for THead {
	fn default() -> Self {
		Self::new()
	}
}

impl THead {
	/// Creates a header with the default children
	pub fn new() -> Self {
		let mut registry = ComponentRegistry::owned_by("thead");
		registry.add(Box::new(ColumnHeadersRow::new()));
		registry.add(Box::new(
			super::FiltersRow::new().section(Section::End),
		));
		Self {
			base: ComponentBase::named("thead"),
			registry,
		}
	}

	/// Replaces the default children
	pub fn components(mut self, components: Vec<Box<dyn Component>>) -> Self {
		self.registry.replace(components);
		self
	}
}

impl Component for THead {
	fn base(&self) -> &ComponentBase {
		&self.base
	}

	fn base_mut(&mut self) -> &mut ComponentBase {
		&mut self.base
	}

	fn on_initialize(&mut self, ctx: &mut GridContext) -> Result<()> {
		self.registry.initialize_all(ctx)
	}

	fn on_prepare(&mut self, ctx: &mut GridContext) -> Result<()> {
		self.registry.prepare_all(ctx)
	}

	fn do_render(&mut self, ctx: &mut GridContext) -> Result<String> {
		let mut out = String::from("<thead>");
		out.push_str(&self.registry.render_section(Some(&Section::Begin), ctx)?);
		out.push_str(&self.registry.render_section(None, ctx)?);
		out.push_str(&self.registry.render_section(Some(&Section::End), ctx)?);
		out.push_str("</thead>");
		Ok(out)
	}
}

impl Registry for THead {
	fn registry(&self) -> &ComponentRegistry {
		&self.registry
	}

	fn registry_mut(&mut self) -> &mut ComponentRegistry {
		&mut self.registry
	}
}

/// Table footer block; by default a [`OneCellRow`] spanning all
/// visible columns and holding a [`Pager`](super::Pager).
#[derive(Debug)]
pub struct TFoot {
	base: ComponentBase,
	registry: ComponentRegistry,
}

impl Default for TFoot {
	fn default() -> Self {
		Self::new()
	}
}

impl TFoot {
	/// Creates a footer with the default pager child
	pub fn new() -> Self {
		let mut registry = ComponentRegistry::owned_by("tfoot");
		registry.add(Box::new(
			OneCellRow::new().child(Box::new(super::Pager::new())),
		));
		Self {
			base: ComponentBase::named("tfoot"),
			registry,
		}
	}

	/// Replaces the default children
	pub fn components(mut self, components: Vec<Box<dyn Component>>) -> Self {
		self.registry.replace(components);
		self
	}
}

impl Component for TFoot {
	fn base(&self) -> &ComponentBase {
		&self.base
	}

	fn base_mut(&mut self) -> &mut ComponentBase {
		&mut self.base
	}

	fn on_initialize(&mut self, ctx: &mut GridContext) -> Result<()> {
		self.registry.initialize_all(ctx)
	}

	fn on_prepare(&mut self, ctx: &mut GridContext) -> Result<()> {
		self.registry.prepare_all(ctx)
	}

	fn do_render(&mut self, ctx: &mut GridContext) -> Result<String> {
		let mut out = String::from("<tfoot>");
		out.push_str(&self.registry.render_section(Some(&Section::Begin), ctx)?);
		out.push_str(&self.registry.render_section(None, ctx)?);
		out.push_str(&self.registry.render_section(Some(&Section::End), ctx)?);
		out.push_str("</tfoot>");
		Ok(out)
	}
}

impl Registry for TFoot {
	fn registry(&self) -> &ComponentRegistry {
		&self.registry
	}

	fn registry_mut(&mut self) -> &mut ComponentRegistry {
		&mut self.registry
	}
}

/// Row of `<th>` column headers, one [`ColumnHeader`] per configured
/// column in display order.
#[derive(Debug, Default)]
pub struct ColumnHeadersRow {
	base: ComponentBase,
}

impl ColumnHeadersRow {
	/// Creates the headers row
	pub fn new() -> Self {
		Self::default()
	}
}

impl Component for ColumnHeadersRow {
	fn base(&self) -> &ComponentBase {
		&self.base
	}

	fn base_mut(&mut self) -> &mut ComponentBase {
		&mut self.base
	}

	fn do_render(&mut self, ctx: &mut GridContext) -> Result<String> {
		// Columns are re-read at render time so reordering during
		// preparation is reflected.
		let columns = ctx.columns().to_vec();
		let mut out = String::from("<tr>");
		for column in columns {
			let mut header = ColumnHeader::new(column);
			out.push_str(&header.render(ctx)?);
		}
		out.push_str("</tr>");
		Ok(out)
	}
}

/// Single `<th>` header: the column label plus, for sortable columns,
/// a [`SortingControl`].
#[derive(Debug)]
pub struct ColumnHeader {
	base: ComponentBase,
	column: FieldConfig,
}

impl ColumnHeader {
	/// Creates a header for one column
	pub fn new(column: FieldConfig) -> Self {
		Self {
			base: ComponentBase::default(),
			column,
		}
	}
}

impl Component for ColumnHeader {
	fn base(&self) -> &ComponentBase {
		&self.base
	}

	fn base_mut(&mut self) -> &mut ComponentBase {
		&mut self.base
	}

	fn do_render(&mut self, ctx: &mut GridContext) -> Result<String> {
		let mut out = String::from("<th");
		if self.column.is_hidden() {
			out.push_str(" style=\"display:none;\"");
		}
		out.push('>');
		out.push_str(&escape(&self.column.get_label()));
		if self.column.is_sortable() {
			let mut control = SortingControl::new(self.column.clone());
			out.push_str(&control.render(ctx)?);
		}
		out.push_str("</th>");
		Ok(out)
	}
}

/// Ascending/descending sort links for one column.
///
/// The direction the column is currently sorted by renders as inert
/// text; the other direction renders as a link that replaces the
/// grid's sort input.
#[derive(Debug)]
pub struct SortingControl {
	base: ComponentBase,
	column: FieldConfig,
}

impl SortingControl {
	/// Creates a control for one sortable column
	pub fn new(column: FieldConfig) -> Self {
		Self {
			base: ComponentBase::default(),
			column,
		}
	}

	fn arrow(
		&self,
		ctx: &GridContext,
		direction: SortDirection,
		glyph: &str,
	) -> String {
		if self.column.get_sorting() == Some(direction) {
			format!("<span class=\"sorted\">{glyph}</span>")
		} else {
			let href = Sorter::link(ctx, self.column.name(), direction);
			format!("<a href=\"{}\">{glyph}</a>", escape(&href))
		}
	}
}

impl Component for SortingControl {
	fn base(&self) -> &ComponentBase {
		&self.base
	}

	fn base_mut(&mut self) -> &mut ComponentBase {
		&mut self.base
	}

	fn do_render(&mut self, ctx: &mut GridContext) -> Result<String> {
		let mut out = String::from("<span class=\"sorting-control\">");
		out.push_str(&self.arrow(ctx, SortDirection::Asc, "\u{25b2}"));
		out.push_str(&self.arrow(ctx, SortDirection::Desc, "\u{25bc}"));
		out.push_str("</span>");
		Ok(out)
	}
}

/// Row template, rendered once per fetched data row.
///
/// Registered under the name `row` in the do-not-render section; the
/// grid retrieves it by name, binds each row via
/// [`Component::set_data_row`] and renders it.
#[derive(Debug, Default)]
pub struct Tr {
	base: ComponentBase,
	registry: ComponentRegistry,
	row: Option<DataRow>,
}

impl Tr {
	/// Creates an empty row template
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds a child rendered after the column cells
	pub fn child(mut self, component: Box<dyn Component>) -> Self {
		self.registry.add(component);
		self
	}
}

impl Component for Tr {
	fn base(&self) -> &ComponentBase {
		&self.base
	}

	fn base_mut(&mut self) -> &mut ComponentBase {
		&mut self.base
	}

	fn set_data_row(&mut self, row: &DataRow) {
		self.row = Some(row.clone());
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
		let columns = ctx.columns().to_vec();
		let mut out = String::from("<tr>");
		if let Some(row) = self.row.clone() {
			for child in &mut *self.registry.components_mut() {
				child.set_data_row(&row);
			}
			for column in columns {
				let mut cell = TableCell::new(column);
				cell.set_data_row(&row);
				out.push_str(&cell.render(ctx)?);
			}
		}
		out.push_str(&self.registry.render_section(None, ctx)?);
		out.push_str("</tr>");
		Ok(out)
	}
}

impl Registry for Tr {
	fn registry(&self) -> &ComponentRegistry {
		&self.registry
	}

	fn registry_mut(&mut self) -> &mut ComponentRegistry {
		&mut self.registry
	}
}

/// Single `<td>` data cell for one column of the bound row.
///
/// Cell values pass through the column's transform and render
/// unescaped, so transforms may emit markup.
#[derive(Debug)]
pub struct TableCell {
	base: ComponentBase,
	column: FieldConfig,
	row: Option<DataRow>,
}

impl TableCell {
	/// Creates a cell for one column
	pub fn new(column: FieldConfig) -> Self {
		Self {
			base: ComponentBase::default(),
			column,
			row: None,
		}
	}
}

impl Component for TableCell {
	fn base(&self) -> &ComponentBase {
		&self.base
	}

	fn base_mut(&mut self) -> &mut ComponentBase {
		&mut self.base
	}

	fn set_data_row(&mut self, row: &DataRow) {
		self.row = Some(row.clone());
	}

	fn do_render(&mut self, _ctx: &mut GridContext) -> Result<String> {
		let mut out = String::from("<td");
		let _ = write!(
			out,
			" class=\"column-{}\" data-label=\"{}\"",
			escape(self.column.name()),
			escape(&self.column.get_label())
		);
		if self.column.is_hidden() {
			out.push_str(" style=\"display:none;\"");
		}
		for (key, value) in self.column.cell_attributes() {
			let _ = write!(out, " {}=\"{}\"", key, escape(value));
		}
		out.push('>');
		if let Some(row) = &self.row {
			out.push_str(&display_value(&self.column.value(row)?));
		}
		out.push_str("</td>");
		Ok(out)
	}
}

/// Row with one cell spanning every visible column; hosts footer
/// widgets like the pager.
#[derive(Debug, Default)]
pub struct OneCellRow {
	base: ComponentBase,
	registry: ComponentRegistry,
}

impl OneCellRow {
	/// Creates an empty spanning row
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds a child rendered inside the cell
	pub fn child(mut self, component: Box<dyn Component>) -> Self {
		self.registry.add(component);
		self
	}
}

impl Component for OneCellRow {
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
		let visible = ctx
			.columns()
			.iter()
			.filter(|column| !column.is_hidden())
			.count()
			.max(1);
		let mut out = format!("<tr><td colspan=\"{visible}\">");
		out.push_str(&self.registry.render_section(Some(&Section::Begin), ctx)?);
		out.push_str(&self.registry.render_section(None, ctx)?);
		out.push_str(&self.registry.render_section(Some(&Section::End), ctx)?);
		out.push_str("</td></tr>");
		Ok(out)
	}
}

impl Registry for OneCellRow {
	fn registry(&self) -> &ComponentRegistry {
		&self.registry
	}

	fn registry_mut(&mut self) -> &mut ComponentRegistry {
		&mut self.registry
	}
}
