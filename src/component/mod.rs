//! Composable component tree with named render sections
//!
//! A grid's output is produced by a tree of components. Each node has
//! one owning parent and an ordered set of children; a child declares
//! the section of its parent where it wants to render. This lets
//! features (pagers, totals, export controls) attach themselves to a
//! table without the table knowing about them in advance.
//!
//! Capabilities are composed per concrete type: every node implements
//! [`Component`]; nodes that hold children additionally implement
//! [`Registry`].

use crate::error::Result;
use crate::grid::GridContext;
use crate::row::DataRow;

pub mod factory;
pub mod filters_row;
pub mod html_tag;
pub mod pager;
pub mod table;
pub mod totals;
pub mod view;

pub use factory::ComponentFactory;
pub use filters_row::FiltersRow;
pub use html_tag::{Container, Content, HtmlTag};
pub use pager::{Pager, ShowingRecords};
pub use table::{ColumnHeader, ColumnHeadersRow, OneCellRow, SortingControl, THead, TFoot, TableCell, Tr};
pub use totals::{AggregationOperation, TotalsRow};
pub use view::{RenderFunc, View};

/// Named slot on a parent node where a child wants to be inserted.
///
/// A child without a declared section (`None` at the
/// [`Component::render_section`] level) renders in the default,
/// unnamed slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Section {
	/// Before the parent's own content
	Begin,
	/// After the parent's own content and default-slot children
	End,
	/// Never rendered implicitly; retrieved and rendered explicitly by
	/// name only (e.g. the row template, rendered once per data row)
	DoNotRender,
	/// A custom named slot
	Named(String),
}

/// Shared state of every component: identity, declared section,
/// parent back-reference and lifecycle flags.
#[derive(Debug, Default)]
pub struct ComponentBase {
	name: Option<String>,
	render_section: Option<Section>,
	parent: Option<String>,
	initialized: bool,
	rendered: bool,
}

impl ComponentBase {
	/// Creates a base with a fixed component name
	pub fn named(name: impl Into<String>) -> Self {
		Self {
			name: Some(name.into()),
			..Self::default()
		}
	}

	/// Sets the component name
	pub fn set_name(&mut self, name: impl Into<String>) {
		self.name = Some(name.into());
	}
}

/// A node of the grid component tree.
///
/// Lifecycle: `attach_to` (set parent back-reference) →
/// `initialize` (bind to the owning grid, recursively) → `prepare`
/// (pre-render side effects) → `render`. `initialize` must complete
/// for the whole tree before any `prepare` or `render` call; callers
/// initialize exactly once.
///
/// Concrete components implement [`Component::base`] /
/// [`Component::base_mut`] plus the `on_initialize` / `on_prepare` /
/// `do_render` hooks; the provided lifecycle methods maintain the
/// shared flags.
pub trait Component {
	/// Returns the shared component state
	fn base(&self) -> &ComponentBase;

	/// Returns the shared component state mutably
	fn base_mut(&mut self) -> &mut ComponentBase;

	/// Initialization hook; recurse into children here
	fn on_initialize(&mut self, _ctx: &mut GridContext) -> Result<()> {
		Ok(())
	}

	/// Pre-render hook; recurse into children here
	fn on_prepare(&mut self, _ctx: &mut GridContext) -> Result<()> {
		Ok(())
	}

	/// Produces the component's output
	fn do_render(&mut self, ctx: &mut GridContext) -> Result<String>;

	/// Binds the row template to the current data row; no-op for
	/// everything that is not a row template
	fn set_data_row(&mut self, _row: &DataRow) {}

	/// Returns the component name, if any
	fn name(&self) -> Option<&str> {
		self.base().name.as_deref()
	}

	/// Sets the component name
	fn set_name(&mut self, name: impl Into<String>)
	where
		Self: Sized,
	{
		self.base_mut().name = Some(name.into());
	}

	/// Returns the section of the parent this component renders in;
	/// `None` means the default slot
	fn render_section(&self) -> Option<&Section> {
		self.base().render_section.as_ref()
	}

	/// Declares the section of the parent this component renders in
	fn set_render_section(&mut self, section: Option<Section>) {
		self.base_mut().render_section = section;
	}

	/// Records the owning parent; does not add the component to the
	/// parent's children, that is the registry's job
	fn attach_to(&mut self, parent: &str) {
		self.base_mut().parent = Some(parent.to_string());
	}

	/// Returns the name of the owning parent, if attached
	fn parent(&self) -> Option<&str> {
		self.base().parent.as_deref()
	}

	/// Binds the component to the owning grid and recursively
	/// initializes children
	fn initialize(&mut self, ctx: &mut GridContext) -> Result<()> {
		self.base_mut().initialized = true;
		self.on_initialize(ctx)
	}

	/// Performs all required operations before rendering
	fn prepare(&mut self, ctx: &mut GridContext) -> Result<()> {
		self.on_prepare(ctx)
	}

	/// Renders the component and marks it rendered. Re-rendering is
	/// legal.
	fn render(&mut self, ctx: &mut GridContext) -> Result<String> {
		self.base_mut().rendered = true;
		self.do_render(ctx)
	}

	/// Returns true if the component was rendered at least once
	fn is_rendered(&self) -> bool {
		self.base().rendered
	}
}

/// Insertion-ordered collection of child components.
#[derive(Default)]
pub struct ComponentRegistry {
	owner: Option<String>,
	components: Vec<Box<dyn Component>>,
}

impl ComponentRegistry {
	/// Creates an empty registry
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates an empty registry whose children get attached to
	/// `owner`
	pub fn owned_by(owner: impl Into<String>) -> Self {
		Self {
			owner: Some(owner.into()),
			components: Vec::new(),
		}
	}

	/// Sets the owner and re-attaches already registered children
	pub fn set_owner(&mut self, owner: impl Into<String>) {
		let owner = owner.into();
		for component in &mut self.components {
			component.attach_to(&owner);
		}
		self.owner = Some(owner);
	}

	/// Adds a component, attaching it to the owner
	pub fn add(&mut self, mut component: Box<dyn Component>) {
		if let Some(owner) = &self.owner {
			component.attach_to(owner);
		}
		self.components.push(component);
	}

	/// Replaces the whole child set; used to override default children
	/// before initialization
	pub fn replace(&mut self, components: Vec<Box<dyn Component>>) {
		self.components.clear();
		for component in components {
			self.add(component);
		}
	}

	/// Returns the attached components in insertion order
	pub fn components(&self) -> &[Box<dyn Component>] {
		&self.components
	}

	/// Returns the attached components in insertion order, mutably
	pub fn components_mut(&mut self) -> &mut [Box<dyn Component>] {
		&mut self.components
	}

	/// Returns true if no components are attached
	pub fn is_empty(&self) -> bool {
		self.components.is_empty()
	}

	/// Returns the first component with the given name; name
	/// comparison is exact
	pub fn component_by_name(&self, name: &str) -> Option<&dyn Component> {
		self.components
			.iter()
			.find(|c| c.name() == Some(name))
			.map(AsRef::as_ref)
	}

	/// Returns the first component with the given name, mutably
	pub fn component_by_name_mut(&mut self, name: &str) -> Option<&mut Box<dyn Component>> {
		self.components.iter_mut().find(|c| c.name() == Some(name))
	}

	/// Initializes every child
	pub fn initialize_all(&mut self, ctx: &mut GridContext) -> Result<()> {
		for component in &mut self.components {
			component.initialize(ctx)?;
		}
		Ok(())
	}

	/// Prepares every child
	pub fn prepare_all(&mut self, ctx: &mut GridContext) -> Result<()> {
		for component in &mut self.components {
			component.prepare(ctx)?;
		}
		Ok(())
	}

	/// Renders, in insertion order, every direct child whose declared
	/// section equals `section`, concatenating the results.
	///
	/// Matching is exact: no partial matches, no inheritance across
	/// nesting levels. Children targeting [`Section::DoNotRender`] are
	/// skipped here and on every other implicit render path.
	pub fn render_section(
		&mut self,
		section: Option<&Section>,
		ctx: &mut GridContext,
	) -> Result<String> {
		let mut out = String::new();
		for component in &mut self.components {
			if component.render_section() == Some(&Section::DoNotRender) {
				continue;
			}
			if component.render_section() == section {
				out.push_str(&component.render(ctx)?);
			}
		}
		Ok(out)
	}
}

impl std::fmt::Debug for ComponentRegistry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ComponentRegistry")
			.field("owner", &self.owner)
			.field("components", &self.components.len())
			.finish()
	}
}

/// Capability of components that hold ordered children.
pub trait Registry: Component {
	/// Returns the child registry
	fn registry(&self) -> &ComponentRegistry;

	/// Returns the child registry mutably
	fn registry_mut(&mut self) -> &mut ComponentRegistry;

	/// Adds a child component
	fn add_component(&mut self, component: Box<dyn Component>) {
		self.registry_mut().add(component);
	}

	/// Returns the first child with the given name
	fn component_by_name(&self, name: &str) -> Option<&dyn Component> {
		self.registry().component_by_name(name)
	}

	/// Renders the children declared for `section`
	fn render_components(
		&mut self,
		section: Option<&Section>,
		ctx: &mut GridContext,
	) -> Result<String> {
		self.registry_mut().render_section(section, ctx)
	}
}
