//! Registry of component constructors keyed by tag name
//!
//! Declarative grid configurations name components by tag; the factory
//! maps each tag to a constructor producing a fresh instance. Tag
//! registration is explicit, collisions are rejected at registration
//! time and unknown tags fail fast at creation time.

use super::view::RenderFunc;
use super::{
	ColumnHeadersRow, Component, Container, FiltersRow, OneCellRow, Pager, ShowingRecords, THead,
	TFoot, Tr,
};
use crate::error::{GridError, Result};
use crate::grid::GridContext;
use std::collections::HashMap;
use std::sync::Arc;

type ComponentConstructor = Box<dyn Fn() -> Box<dyn Component>>;

/// Maps component tag names to constructors.
///
/// # Examples
///
/// ```
/// use datagrid::component::ComponentFactory;
///
/// let factory = ComponentFactory::with_defaults();
/// assert!(factory.create("pager").is_ok());
/// assert!(factory.create("no-such-tag").is_err());
/// ```
#[derive(Default)]
pub struct ComponentFactory {
	constructors: HashMap<String, ComponentConstructor>,
}

impl ComponentFactory {
	/// Creates an empty factory
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates a factory with every built-in component registered
	pub fn with_defaults() -> Self {
		let mut factory = Self::new();
		let builtins: Vec<(&str, ComponentConstructor)> = vec![
			("container", Box::new(|| Box::new(Container::new()))),
			("thead", Box::new(|| Box::new(THead::new()))),
			("tfoot", Box::new(|| Box::new(TFoot::new()))),
			("column_headers_row", Box::new(|| Box::new(ColumnHeadersRow::new()))),
			("filters_row", Box::new(|| Box::new(FiltersRow::new()))),
			("tr", Box::new(|| Box::new(Tr::new()))),
			("one_cell_row", Box::new(|| Box::new(OneCellRow::new()))),
			("pager", Box::new(|| Box::new(Pager::new()))),
			("showing_records", Box::new(|| Box::new(ShowingRecords::new()))),
		];
		for (tag, constructor) in builtins {
			// Tags are distinct literals, registration cannot collide
			let _ = factory.register(tag, constructor);
		}
		factory
	}

	/// Registers a constructor for `tag`.
	///
	/// Fails with [`GridError::Configuration`] when the tag is already
	/// taken; silently shadowing an existing component would change
	/// every grid configuration using it.
	pub fn register(
		&mut self,
		tag: impl Into<String>,
		constructor: ComponentConstructor,
	) -> Result<()> {
		let tag = tag.into();
		if self.constructors.contains_key(&tag) {
			return Err(GridError::Configuration(format!(
				"component tag '{tag}' is already registered"
			)));
		}
		self.constructors.insert(tag, constructor);
		Ok(())
	}

	/// Registers a tag whose instances render through a closure
	pub fn register_render_fn(
		&mut self,
		tag: impl Into<String>,
		func: impl Fn(&mut GridContext) -> Result<String> + 'static,
	) -> Result<()> {
		let func = Arc::new(func);
		self.register(
			tag,
			Box::new(move || {
				let func = Arc::clone(&func);
				Box::new(RenderFunc::new(move |ctx| func(ctx)))
			}),
		)
	}

	/// Creates a fresh component for `tag`
	pub fn create(&self, tag: &str) -> Result<Box<dyn Component>> {
		match self.constructors.get(tag) {
			Some(constructor) => Ok(constructor()),
			None => Err(GridError::Configuration(format!(
				"unknown component tag '{tag}'"
			))),
		}
	}

	/// Returns the registered tags in unspecified order
	pub fn tags(&self) -> impl Iterator<Item = &str> {
		self.constructors.keys().map(String::as_str)
	}
}

impl std::fmt::Debug for ComponentFactory {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ComponentFactory")
			.field("tags", &self.constructors.len())
			.finish()
	}
}
