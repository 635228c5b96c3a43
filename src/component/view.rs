//! Template-backed and closure-backed leaf components

use super::{Component, ComponentBase, Section};
use crate::error::{GridError, Result};
use crate::grid::GridContext;
use std::sync::Arc;

/// Leaf component rendered through the grid's template engine.
///
/// The template receives the grid's view data: name, column summaries
/// and pagination state. Fails with [`GridError::Configuration`] when
/// the grid has no template engine installed.
#[derive(Debug)]
pub struct View {
	base: ComponentBase,
	template: String,
}

impl View {
	/// Creates a view rendering the given template identifier
	pub fn new(template: impl Into<String>) -> Self {
		Self {
			base: ComponentBase::default(),
			template: template.into(),
		}
	}

	/// Sets the component name
	pub fn named(mut self, name: impl Into<String>) -> Self {
		self.base.name = Some(name.into());
		self
	}

	/// Declares the parent section this view renders in
	pub fn section(mut self, section: Section) -> Self {
		self.base.render_section = Some(section);
		self
	}
}

impl Component for View {
	fn base(&self) -> &ComponentBase {
		&self.base
	}

	fn base_mut(&mut self) -> &mut ComponentBase {
		&mut self.base
	}

	fn do_render(&mut self, ctx: &mut GridContext) -> Result<String> {
		let vars = ctx.view_data();
		let Some(engine) = ctx.template_engine() else {
			return Err(GridError::Configuration(format!(
				"component renders template '{}' but no template engine is installed",
				self.template
			)));
		};
		engine.render(&self.template, &vars)
	}
}

/// Leaf component backed by a render closure; the lightweight way to
/// inject one-off markup into a section without defining a type.
pub struct RenderFunc {
	base: ComponentBase,
	func: Arc<dyn Fn(&mut GridContext) -> Result<String>>,
}

impl RenderFunc {
	/// Creates a component from a render closure
	pub fn new(func: impl Fn(&mut GridContext) -> Result<String> + 'static) -> Self {
		Self {
			base: ComponentBase::default(),
			func: Arc::new(func),
		}
	}

	/// Sets the component name
	pub fn named(mut self, name: impl Into<String>) -> Self {
		self.base.name = Some(name.into());
		self
	}

	/// Declares the parent section this component renders in
	pub fn section(mut self, section: Section) -> Self {
		self.base.render_section = Some(section);
		self
	}
}

impl Component for RenderFunc {
	fn base(&self) -> &ComponentBase {
		&self.base
	}

	fn base_mut(&mut self) -> &mut ComponentBase {
		&mut self.base
	}

	fn do_render(&mut self, ctx: &mut GridContext) -> Result<String> {
		(self.func)(ctx)
	}
}

impl std::fmt::Debug for RenderFunc {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("RenderFunc")
			.field("name", &self.base.name)
			.finish_non_exhaustive()
	}
}
