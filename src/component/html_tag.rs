//! Generic HTML tag and child-only container components

use super::{Component, ComponentBase, ComponentRegistry, Registry, Section};
use crate::error::Result;
use crate::grid::GridContext;
use std::sync::Arc;

/// Tags rendered self-closing when they carry no content or children.
const VOID_TAGS: &[&str] = &["br", "hr", "img", "input", "link", "meta"];

/// Escapes a string for use in HTML text or attribute values
pub(crate) fn escape(raw: &str) -> String {
	let mut out = String::with_capacity(raw.len());
	for ch in raw.chars() {
		match ch {
			'&' => out.push_str("&amp;"),
			'<' => out.push_str("&lt;"),
			'>' => out.push_str("&gt;"),
			'"' => out.push_str("&quot;"),
			'\'' => out.push_str("&#39;"),
			_ => out.push(ch),
		}
	}
	out
}

/// Inner content of an [`HtmlTag`], rendered between the begin-section
/// children and the default-slot children.
#[derive(Clone, Default)]
pub enum Content {
	/// No inner content
	#[default]
	Empty,
	/// A fixed, already safe markup string
	Literal(String),
	/// Content produced at render time from the grid state
	RenderFn(Arc<dyn Fn(&mut GridContext) -> Result<String>>),
}

impl Content {
	fn render(&self, ctx: &mut GridContext) -> Result<String> {
		match self {
			Self::Empty => Ok(String::new()),
			Self::Literal(s) => Ok(s.clone()),
			Self::RenderFn(f) => f(ctx),
		}
	}

	fn is_empty(&self) -> bool {
		matches!(self, Self::Empty)
	}
}

impl From<String> for Content {
	fn from(s: String) -> Self {
		Self::Literal(s)
	}
}

impl From<&str> for Content {
	fn from(s: &str) -> Self {
		Self::Literal(s.to_string())
	}
}

impl std::fmt::Debug for Content {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Empty => f.write_str("Content::Empty"),
			Self::Literal(s) => f.debug_tuple("Content::Literal").field(s).finish(),
			Self::RenderFn(_) => f.write_str("Content::RenderFn(..)"),
		}
	}
}

/// Arbitrary HTML element with attributes, inner content and child
/// components.
///
/// Renders as the opening tag, begin-section children, the content,
/// default-slot children, end-section children and the closing tag.
///
/// # Examples
///
/// ```
/// use datagrid::component::{Content, HtmlTag};
///
/// let tag = HtmlTag::new("p")
/// 	.attribute("class", "note")
/// 	.content(Content::Literal("hello".into()));
/// ```
#[derive(Debug, Default)]
pub struct HtmlTag {
	base: ComponentBase,
	registry: ComponentRegistry,
	tag: String,
	attributes: Vec<(String, String)>,
	content: Content,
}

impl HtmlTag {
	/// Creates a tag component for the given element name.
	///
	/// The component name defaults to the tag name; override it with
	/// [`named`](Self::named) when several instances of the same tag
	/// must be addressable individually.
	pub fn new(tag: impl Into<String>) -> Self {
		let tag = tag.into();
		Self {
			base: ComponentBase::named(tag.clone()),
			tag,
			..Self::default()
		}
	}

	/// Sets the component name
	pub fn named(mut self, name: impl Into<String>) -> Self {
		self.base.name = Some(name.into());
		self
	}

	/// Declares the parent section this tag renders in
	pub fn section(mut self, section: Section) -> Self {
		self.base.render_section = Some(section);
		self
	}

	/// Adds an HTML attribute; values are escaped at render time
	pub fn attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.attributes.push((key.into(), value.into()));
		self
	}

	/// Sets the inner content
	pub fn content(mut self, content: impl Into<Content>) -> Self {
		self.content = content.into();
		self
	}

	/// Adds a child component
	pub fn child(mut self, component: Box<dyn Component>) -> Self {
		self.registry.add(component);
		self
	}

	fn open_tag(&self, self_closing: bool) -> String {
		let mut out = String::new();
		out.push('<');
		out.push_str(&self.tag);
		for (key, value) in &self.attributes {
			out.push(' ');
			out.push_str(key);
			out.push_str("=\"");
			out.push_str(&escape(value));
			out.push('"');
		}
		if self_closing {
			out.push('/');
		}
		out.push('>');
		out
	}
}

impl Component for HtmlTag {
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
		if VOID_TAGS.contains(&self.tag.as_str())
			&& self.content.is_empty()
			&& self.registry.is_empty()
		{
			return Ok(self.open_tag(true));
		}
		let mut out = self.open_tag(false);
		out.push_str(&self.registry.render_section(Some(&Section::Begin), ctx)?);
		out.push_str(&self.content.render(ctx)?);
		out.push_str(&self.registry.render_section(None, ctx)?);
		out.push_str(&self.registry.render_section(Some(&Section::End), ctx)?);
		out.push_str("</");
		out.push_str(&self.tag);
		out.push('>');
		Ok(out)
	}
}

impl Registry for HtmlTag {
	fn registry(&self) -> &ComponentRegistry {
		&self.registry
	}

	fn registry_mut(&mut self) -> &mut ComponentRegistry {
		&mut self.registry
	}
}

/// Component that renders its children (begin section, default slot,
/// end section, in that order), optionally wrapped in a stack of
/// attribute-less tags.
#[derive(Debug, Default)]
pub struct Container {
	base: ComponentBase,
	registry: ComponentRegistry,
	tags: Vec<String>,
}

impl Container {
	/// Creates an empty container
	pub fn new() -> Self {
		Self::default()
	}

	/// Wraps the rendered children in one more tag; later calls wrap
	/// further out
	pub fn wrap_in(mut self, tag: impl Into<String>) -> Self {
		self.tags.push(tag.into());
		self
	}

	/// Sets the component name
	pub fn named(mut self, name: impl Into<String>) -> Self {
		self.base.name = Some(name.into());
		self
	}

	/// Declares the parent section this container renders in
	pub fn section(mut self, section: Section) -> Self {
		self.base.render_section = Some(section);
		self
	}

	/// Adds a child component
	pub fn child(mut self, component: Box<dyn Component>) -> Self {
		self.registry.add(component);
		self
	}
}

impl Component for Container {
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
		let mut out = self.registry.render_section(Some(&Section::Begin), ctx)?;
		out.push_str(&self.registry.render_section(None, ctx)?);
		out.push_str(&self.registry.render_section(Some(&Section::End), ctx)?);
		for tag in &self.tags {
			out = format!("<{tag}>{out}</{tag}>");
		}
		Ok(out)
	}
}

impl Registry for Container {
	fn registry(&self) -> &ComponentRegistry {
		&self.registry
	}

	fn registry_mut(&mut self) -> &mut ComponentRegistry {
		&mut self.registry
	}
}
