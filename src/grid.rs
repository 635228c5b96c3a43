//! Grid configuration, shared render context and the render pipeline

use crate::cache::CacheStore;
use crate::component::{Component, ComponentRegistry, Section, THead, TFoot, Tr};
use crate::error::{GridError, Result};
use crate::events::{EVENT_FETCH_ROW, EVENT_GRID_CREATE, EVENT_GRID_PREPARE, EventBus, EventPayload};
use crate::field::FieldConfig;
use crate::filtering::Filtering;
use crate::input::InputProcessor;
use crate::provider::DataProvider;
use crate::row::DataRow;
use crate::sorting::Sorter;
use crate::template::TemplateEngine;
use serde_json::{Map, Value, json};
use sha2::{Digest, Sha256};
use std::collections::{BTreeMap, HashSet};
use std::fmt::Write as _;
use std::sync::Arc;
use std::time::Duration;

/// Name of the row template component inside the grid's registry.
const ROW_COMPONENT: &str = "row";

/// Declarative description of one grid: columns, data source,
/// components and caching policy.
///
/// # Examples
///
/// ```
/// use datagrid::{FieldConfig, GridConfig, JsonDataProvider, SortDirection};
/// use serde_json::json;
///
/// let config = GridConfig::new()
/// 	.name("users")
/// 	.page_size(25)
/// 	.column(FieldConfig::new("name").sortable(true))
/// 	.column(FieldConfig::new("age").sorting(SortDirection::Desc))
/// 	.provider(JsonDataProvider::new(vec![json!({"name": "Ann", "age": 29})]));
/// ```
#[derive(Default)]
pub struct GridConfig {
	name: Option<String>,
	columns: Vec<FieldConfig>,
	provider: Option<Box<dyn DataProvider>>,
	page_size: usize,
	components: Option<Vec<Box<dyn Component>>>,
	row: Option<Box<dyn Component>>,
	template_engine: Option<Arc<dyn TemplateEngine>>,
	cache: Option<Arc<dyn CacheStore>>,
	cache_ttl: Duration,
}

impl GridConfig {
	/// Default quantity of rows per page.
	pub const DEFAULT_PAGE_SIZE: usize = 50;

	/// Creates an empty configuration
	pub fn new() -> Self {
		Self {
			page_size: Self::DEFAULT_PAGE_SIZE,
			..Self::default()
		}
	}

	/// Sets the grid name; used as HTML id and input namespace.
	///
	/// Unnamed grids get a stable name derived from the configuration
	/// shape, so two structurally identical grids on one page collide
	/// and must be named explicitly.
	pub fn name(mut self, name: impl Into<String>) -> Self {
		self.name = Some(name.into());
		self
	}

	/// Appends a column
	pub fn column(mut self, column: FieldConfig) -> Self {
		self.columns.push(column);
		self
	}

	/// Appends several columns
	pub fn columns(mut self, columns: impl IntoIterator<Item = FieldConfig>) -> Self {
		self.columns.extend(columns);
		self
	}

	/// Sets the data source
	pub fn provider(mut self, provider: impl DataProvider + 'static) -> Self {
		self.provider = Some(Box::new(provider));
		self
	}

	/// Sets the quantity of rows per page
	pub fn page_size(mut self, page_size: usize) -> Self {
		self.page_size = page_size.max(1);
		self
	}

	/// Replaces the default top-level components (a table header and a
	/// footer with a pager)
	pub fn components(mut self, components: Vec<Box<dyn Component>>) -> Self {
		self.components = Some(components);
		self
	}

	/// Replaces the default row template
	pub fn row(mut self, row: impl Component + 'static) -> Self {
		self.row = Some(Box::new(row));
		self
	}

	/// Installs a template engine for template-backed components
	pub fn template_engine(mut self, engine: Arc<dyn TemplateEngine>) -> Self {
		self.template_engine = Some(engine);
		self
	}

	/// Enables output caching with the given store and time to live.
	///
	/// A zero `ttl` disables caching.
	pub fn cache(mut self, store: Arc<dyn CacheStore>, ttl: Duration) -> Self {
		self.cache = Some(store);
		self.cache_ttl = ttl;
		self
	}

	/// Stable implicit name derived from the configuration shape
	fn derived_name(&self) -> String {
		let mut hasher = Sha256::new();
		for column in &self.columns {
			hasher.update(column.name().as_bytes());
			hasher.update([0]);
		}
		hasher.update(self.page_size.to_le_bytes());
		let digest = hasher.finalize();
		let mut name = String::from("grid");
		for byte in &digest[..6] {
			let _ = write!(name, "{byte:02x}");
		}
		name
	}
}

impl std::fmt::Debug for GridConfig {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("GridConfig")
			.field("name", &self.name)
			.field("columns", &self.columns)
			.field("page_size", &self.page_size)
			.field("cache_ttl", &self.cache_ttl)
			.finish_non_exhaustive()
	}
}

/// State shared between the grid and its components during a pass:
/// identity, columns, data source, request input and events.
///
/// Kept separate from the component tree so a component borrowed out
/// of the tree can receive the context mutably.
pub struct GridContext {
	name: String,
	columns: Vec<FieldConfig>,
	provider: Box<dyn DataProvider>,
	input: InputProcessor,
	events: EventBus,
	template_engine: Option<Arc<dyn TemplateEngine>>,
}

impl GridContext {
	/// Returns the grid name
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Returns the columns in display order
	pub fn columns(&self) -> &[FieldConfig] {
		&self.columns
	}

	/// Returns the columns mutably
	pub fn columns_mut(&mut self) -> &mut [FieldConfig] {
		&mut self.columns
	}

	/// Returns the data source
	pub fn provider(&self) -> &dyn DataProvider {
		self.provider.as_ref()
	}

	/// Returns the data source mutably
	pub fn provider_mut(&mut self) -> &mut dyn DataProvider {
		self.provider.as_mut()
	}

	/// Returns the request input processor
	pub fn input(&self) -> &InputProcessor {
		&self.input
	}

	/// Returns the event bus mutably, for subscriptions
	pub fn events_mut(&mut self) -> &mut EventBus {
		&mut self.events
	}

	/// Returns the installed template engine, if any
	pub fn template_engine(&self) -> Option<&Arc<dyn TemplateEngine>> {
		self.template_engine.as_ref()
	}

	/// Fetches the next row from the provider, firing the row-fetched
	/// event keyed by the provider's id
	pub fn fetch_row(&mut self) -> Result<Option<DataRow>> {
		let row = self.provider.get_row()?;
		if let Some(row) = &row {
			self.events
				.fire(EVENT_FETCH_ROW, self.provider.id(), &EventPayload::Row(row));
		}
		Ok(row)
	}

	/// Serializes the grid state handed to template engines
	pub fn view_data(&self) -> Map<String, Value> {
		let mut vars = Map::new();
		vars.insert("name".into(), json!(self.name));
		vars.insert(
			"columns".into(),
			Value::Array(self.columns.iter().map(|c| c.view_summary()).collect()),
		);
		vars.insert("paginator".into(), json!(self.provider.paginator()));
		vars
	}

	/// Reorders columns by their explicit positions.
	///
	/// A stable sort, applied only when at least one column declares a
	/// non-zero position; an all-default configuration keeps exact
	/// declaration order without paying for a sort.
	fn reorder_columns(&mut self) {
		if self.columns.iter().any(|column| column.get_order() != 0) {
			self.columns.sort_by_key(FieldConfig::get_order);
		}
	}
}

impl std::fmt::Debug for GridContext {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("GridContext")
			.field("name", &self.name)
			.field("columns", &self.columns)
			.field("input", &self.input)
			.finish_non_exhaustive()
	}
}

/// A data grid bound to one request.
///
/// Construction initializes the component tree and fires the created
/// event; [`render`](Self::render) runs the prepare pipeline and walks
/// the tree. One grid serves one request; per-request state (page,
/// sort, filters) is baked in at construction.
///
/// # Examples
///
/// ```
/// use datagrid::{FieldConfig, Grid, GridConfig, JsonDataProvider};
/// use serde_json::json;
///
/// let config = GridConfig::new()
/// 	.name("people")
/// 	.column(FieldConfig::new("name"))
/// 	.provider(JsonDataProvider::new(vec![
/// 		json!({"name": "Ann"}),
/// 		json!({"name": "Bob"}),
/// 	]));
/// let mut grid = Grid::new(config, json!({}), "/people")?;
/// let html = grid.render()?;
/// assert!(html.contains("<table class=\"table table-striped\" id=\"people\">"));
/// assert!(html.contains("<td class=\"column-name\" data-label=\"Name\">Ann</td>"));
/// # Ok::<(), datagrid::GridError>(())
/// ```
pub struct Grid {
	context: GridContext,
	registry: ComponentRegistry,
	page_size: usize,
	cache: Option<Arc<dyn CacheStore>>,
	cache_ttl: Duration,
	prepared: bool,
}

impl Grid {
	/// Creates a grid for one request without ambient client state
	pub fn new(config: GridConfig, request: Value, base_url: impl Into<String>) -> Result<Self> {
		Self::with_ambient(config, request, base_url, BTreeMap::new())
	}

	/// Creates a grid for one request.
	///
	/// `request` is the full parsed request input; `ambient` holds
	/// per-client state participating in the cache fingerprint. Fails
	/// with [`GridError::Configuration`] when no data provider is
	/// configured or a column declares the same filter id twice.
	pub fn with_ambient(
		config: GridConfig,
		request: Value,
		base_url: impl Into<String>,
		ambient: BTreeMap<String, String>,
	) -> Result<Self> {
		let name = match &config.name {
			Some(name) => name.clone(),
			None => config.derived_name(),
		};
		let GridConfig {
			columns,
			provider,
			page_size,
			components,
			row,
			template_engine,
			cache,
			cache_ttl,
			..
		} = config;
		let Some(provider) = provider else {
			return Err(GridError::Configuration(format!(
				"grid '{name}' has no data provider"
			)));
		};
		// Filter ids key the request input; a duplicate would make two
		// controls share one input value.
		for column in &columns {
			let mut ids = HashSet::new();
			for filter in column.filters() {
				if !ids.insert(filter.id()) {
					return Err(GridError::Configuration(format!(
						"column '{}' declares filter id '{}' more than once",
						column.name(),
						filter.id()
					)));
				}
			}
		}
		let input = InputProcessor::new(name.clone(), request, base_url, ambient);

		let mut context = GridContext {
			name: name.clone(),
			columns,
			provider,
			input,
			events: EventBus::new(),
			template_engine,
		};

		let mut registry = ComponentRegistry::owned_by(name.clone());
		match components {
			Some(components) => registry.replace(components),
			None => {
				registry.add(Box::new(THead::new()));
				registry.add(Box::new(TFoot::new()));
			}
		}
		let mut row = row.unwrap_or_else(|| Box::new(Tr::new()));
		row.set_render_section(Some(Section::DoNotRender));
		row.base_mut().set_name(ROW_COMPONENT);
		registry.add(row);

		registry.initialize_all(&mut context)?;
		context
			.events
			.fire(EVENT_GRID_CREATE, &name, &EventPayload::None);
		tracing::debug!(grid = %name, "grid created");

		Ok(Self {
			context,
			registry,
			page_size,
			cache,
			cache_ttl,
			prepared: false,
		})
	}

	/// Returns the shared render context
	pub fn context(&self) -> &GridContext {
		&self.context
	}

	/// Returns the shared render context mutably
	pub fn context_mut(&mut self) -> &mut GridContext {
		&mut self.context
	}

	/// Returns the top-level component registry
	pub fn registry(&self) -> &ComponentRegistry {
		&self.registry
	}

	/// Runs the prepare pipeline: pagination from input, component
	/// preparation, filtering, column reordering, sorting.
	///
	/// Idempotent; the second and later calls return without side
	/// effects, so providers never see filters applied twice.
	pub fn prepare(&mut self) -> Result<()> {
		if self.prepared {
			return Ok(());
		}
		let page = self.context.input.page();
		self.context.provider.set_page_size(self.page_size);
		self.context.provider.set_current_page(page);

		self.registry.prepare_all(&mut self.context)?;
		Filtering::apply(&mut self.context)?;
		self.context.reorder_columns();
		Sorter::apply(&mut self.context)?;

		self.context
			.events
			.fire(EVENT_GRID_PREPARE, &self.context.name, &EventPayload::None);
		self.prepared = true;
		Ok(())
	}

	/// Renders the grid to HTML.
	///
	/// On a cache hit for the request fingerprint the stored output is
	/// returned without preparing the grid or touching the provider.
	pub fn render(&mut self) -> Result<String> {
		let fingerprint = self.context.input.fingerprint();
		if let Some(cache) = self.caching_store()
			&& let Some(html) = cache.get(&fingerprint)
		{
			tracing::debug!(grid = %self.context.name, %fingerprint, "cache hit");
			return Ok(html);
		}

		self.prepare()?;
		self.context.provider.reset();
		let html = self.render_layout()?;

		if let Some(cache) = self.caching_store() {
			cache.put(&fingerprint, &html, self.cache_ttl);
		}
		Ok(html)
	}

	fn caching_store(&self) -> Option<&Arc<dyn CacheStore>> {
		if self.cache_ttl.is_zero() {
			return None;
		}
		self.cache.as_ref()
	}

	fn render_layout(&mut self) -> Result<String> {
		let mut out = String::from("<form method=\"GET\">");
		out.push_str(
			&self
				.registry
				.render_section(Some(&Section::Begin), &mut self.context)?,
		);
		let _ = write!(
			out,
			"<table class=\"table table-striped\" id=\"{}\">",
			self.context.name
		);
		if let Some(thead) = self.registry.component_by_name_mut("thead") {
			out.push_str(&thead.render(&mut self.context)?);
		}
		out.push_str("<tbody>");
		loop {
			let Some(row) = self.context.fetch_row()? else {
				break;
			};
			let Some(template) = self.registry.component_by_name_mut(ROW_COMPONENT) else {
				break;
			};
			template.set_data_row(&row);
			out.push_str(&template.render(&mut self.context)?);
		}
		out.push_str("</tbody>");
		if let Some(tfoot) = self.registry.component_by_name_mut("tfoot") {
			out.push_str(&tfoot.render(&mut self.context)?);
		}
		out.push_str("</table>");
		// Lets the enter key submit the filter form
		out.push_str("<input type=\"submit\" style=\"display:none;\"/>");
		out.push_str(
			&self
				.registry
				.render_section(Some(&Section::End), &mut self.context)?,
		);
		out.push_str("</form>");
		Ok(out)
	}
}

impl std::fmt::Debug for Grid {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Grid")
			.field("context", &self.context)
			.field("registry", &self.registry)
			.field("page_size", &self.page_size)
			.field("prepared", &self.prepared)
			.finish_non_exhaustive()
	}
}
