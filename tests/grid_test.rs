//! End-to-end render pipeline tests

use datagrid::component::{Section, TFoot, TotalsRow};
use datagrid::{
	DataProvider, FieldConfig, FilterConfig, FilterOperator, Grid, GridConfig, GridError,
	InMemoryCacheStore, JsonDataProvider, Paginator, SortDirection,
};
use parking_lot::Mutex;
use rstest::rstest;
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;

mod common;
use common::{assert_in_order, people};

fn people_config() -> GridConfig {
	GridConfig::new()
		.name("people")
		.page_size(2)
		.column(
			FieldConfig::new("name")
				.sortable(true)
				.filter(FilterConfig::new(FilterOperator::Like)),
		)
		.column(FieldConfig::new("age").sortable(true))
		.provider(JsonDataProvider::new(people()))
}

fn people_grid(request: Value) -> Grid {
	Grid::new(people_config(), request, "/people").unwrap()
}

#[test]
fn test_default_render_shows_first_page_in_source_order() {
	let html = people_grid(json!({})).render().unwrap();
	assert_in_order(
		&html,
		&[
			"<form method=\"GET\">",
			"<table class=\"table table-striped\" id=\"people\">",
			"<thead>",
			"<th>Name",
			"<th>Age",
			"people[filters][name-like]",
			"<tbody>",
			"Alice",
			"Bob",
			"</tbody>",
			"<tfoot>",
			"pagination",
			"</form>",
		],
	);
	assert!(!html.contains("Carol"));
}

#[test]
fn test_requested_page_is_rendered() {
	let html = people_grid(json!({"people": {"page": 2}})).render().unwrap();
	assert_in_order(&html, &["Carol", "Dave"]);
	assert!(!html.contains("Alice"));
}

#[rstest]
#[case("DESC", &["Malin", "Dave"])]
#[case("ASC", &["Alice", "Bob"])]
fn test_explicit_sort(#[case] direction: &str, #[case] expected: &[&str]) {
	let html = people_grid(json!({"people": {"sort": {"name": direction}}}))
		.render()
		.unwrap();
	assert_in_order(&html, expected);
}

#[test]
fn test_active_sort_direction_is_inert_text() {
	let html = people_grid(json!({"people": {"sort": {"name": "ASC"}}}))
		.render()
		.unwrap();
	assert!(html.contains("<span class=\"sorted\">\u{25b2}</span>"));
	// Opposite direction stays a link
	assert!(html.contains("people%5Bsort%5D%5Bname%5D=DESC"));
}

#[test]
fn test_first_declared_default_sort_wins() {
	let config = GridConfig::new()
		.name("people")
		.page_size(2)
		.column(FieldConfig::new("name").sortable(true).sorting(SortDirection::Asc))
		.column(FieldConfig::new("age").sortable(true).sorting(SortDirection::Desc))
		.provider(JsonDataProvider::new(people()));
	let html = Grid::new(config, json!({}), "/people").unwrap().render().unwrap();
	assert_in_order(&html, &["Alice", "Bob"]);
}

#[test]
fn test_prepare_leaves_at_most_one_sorted_column() {
	let two_defaults = || {
		GridConfig::new()
			.name("people")
			.column(FieldConfig::new("name").sortable(true).sorting(SortDirection::Asc))
			.column(FieldConfig::new("age").sortable(true).sorting(SortDirection::Desc))
			.provider(JsonDataProvider::new(people()))
	};

	let mut grid = Grid::new(two_defaults(), json!({}), "/people").unwrap();
	grid.prepare().unwrap();
	let sorted: Vec<_> = grid
		.context()
		.columns()
		.iter()
		.filter(|c| c.get_sorting().is_some())
		.map(|c| c.name().to_string())
		.collect();
	assert_eq!(sorted, vec!["name"]);

	// An explicit request sort clears both declared defaults
	let request = json!({"people": {"sort": {"age": "ASC"}}});
	let mut grid = Grid::new(two_defaults(), request, "/people").unwrap();
	grid.prepare().unwrap();
	let sorted: Vec<_> = grid
		.context()
		.columns()
		.iter()
		.filter(|c| c.get_sorting().is_some())
		.map(|c| c.name().to_string())
		.collect();
	assert_eq!(sorted, vec!["age"]);
}

#[test]
fn test_filter_narrows_and_collapses_pagination() {
	let html = people_grid(json!({"people": {"filters": {"name-like": "al"}}}))
		.render()
		.unwrap();
	assert_in_order(&html, &["Alice", "Malin"]);
	assert!(!html.contains("Bob"));
	// Two matches fit one page, the pager renders nothing
	assert!(!html.contains("pagination"));
	// Submitted value is echoed back into the filter input
	assert!(html.contains("name=\"people[filters][name-like]\" value=\"al\""));
}

#[test]
fn test_filter_default_value_applies_without_input() {
	let config = GridConfig::new()
		.name("people")
		.page_size(10)
		.column(FieldConfig::new("name").filter(
			FilterConfig::new(FilterOperator::Like).default_value("car"),
		))
		.provider(JsonDataProvider::new(people()));
	let html = Grid::new(config, json!({}), "/people").unwrap().render().unwrap();
	assert!(html.contains("Carol"));
	assert!(!html.contains("Alice"));
}

#[test]
fn test_explicit_empty_filter_input_overrides_default() {
	let config = GridConfig::new()
		.name("people")
		.page_size(10)
		.column(FieldConfig::new("name").filter(
			FilterConfig::new(FilterOperator::Like).default_value("car"),
		))
		.provider(JsonDataProvider::new(people()));
	let request = json!({"people": {"filters": {"name-like": ""}}});
	let html = Grid::new(config, request, "/people").unwrap().render().unwrap();
	assert!(html.contains("Alice"));
	assert!(html.contains("Carol"));
}

#[test]
fn test_column_order_reorders_display() {
	let config = GridConfig::new()
		.name("people")
		.page_size(1)
		.column(FieldConfig::new("name").order(2))
		.column(FieldConfig::new("age").order(1))
		.provider(JsonDataProvider::new(people()));
	let html = Grid::new(config, json!({}), "/people").unwrap().render().unwrap();
	assert_in_order(&html, &["<th>Age", "<th>Name"]);
	assert_in_order(&html, &["column-age", "column-name"]);
}

#[test]
fn test_render_is_repeatable() {
	let mut grid = people_grid(json!({"people": {"sort": {"age": "ASC"}}}));
	let first = grid.render().unwrap();
	let second = grid.render().unwrap();
	assert_eq!(first, second);
}

// --- caching -------------------------------------------------------

#[derive(Clone, Default)]
struct Counters {
	get_row: Arc<Mutex<usize>>,
	filter: Arc<Mutex<usize>>,
}

struct CountingProvider {
	inner: JsonDataProvider,
	counters: Counters,
}

impl CountingProvider {
	fn new(src: Vec<Value>, counters: Counters) -> Self {
		Self {
			inner: JsonDataProvider::new(src).with_id("counting"),
			counters,
		}
	}
}

impl DataProvider for CountingProvider {
	fn id(&self) -> &str {
		self.inner.id()
	}

	fn set_page_size(&mut self, page_size: usize) {
		self.inner.set_page_size(page_size);
	}

	fn set_current_page(&mut self, page: usize) {
		self.inner.set_current_page(page);
	}

	fn current_page(&self) -> usize {
		self.inner.current_page()
	}

	fn page_size(&self) -> usize {
		self.inner.page_size()
	}

	fn reset(&mut self) {
		self.inner.reset();
	}

	fn order_by(&mut self, field: &str, direction: SortDirection) {
		self.inner.order_by(field, direction);
	}

	fn filter(
		&mut self,
		field: &str,
		operator: FilterOperator,
		value: &str,
	) -> datagrid::Result<()> {
		*self.counters.filter.lock() += 1;
		self.inner.filter(field, operator, value)
	}

	fn get_row(&mut self) -> datagrid::Result<Option<datagrid::DataRow>> {
		*self.counters.get_row.lock() += 1;
		self.inner.get_row()
	}

	fn paginator(&self) -> Paginator {
		self.inner.paginator()
	}
}

fn counting_config(counters: Counters, store: Arc<InMemoryCacheStore>) -> GridConfig {
	GridConfig::new()
		.name("people")
		.page_size(2)
		.column(
			FieldConfig::new("name")
				.filter(FilterConfig::new(FilterOperator::Like)),
		)
		.column(FieldConfig::new("age"))
		.provider(CountingProvider::new(people(), counters))
		.cache(store, Duration::from_secs(60))
}

#[test]
fn test_cache_hit_returns_identical_output_without_touching_provider() {
	let store = Arc::new(InMemoryCacheStore::new());
	let request = json!({"people": {"page": 2}});

	let cold = Counters::default();
	let first = Grid::new(counting_config(cold.clone(), store.clone()), request.clone(), "/")
		.unwrap()
		.render()
		.unwrap();
	assert!(*cold.get_row.lock() > 0);

	let warm = Counters::default();
	let second = Grid::new(counting_config(warm.clone(), store.clone()), request, "/")
		.unwrap()
		.render()
		.unwrap();
	assert_eq!(first, second);
	assert_eq!(*warm.get_row.lock(), 0);
	assert_eq!(*warm.filter.lock(), 0);
}

#[test]
fn test_different_request_state_misses_the_cache() {
	let store = Arc::new(InMemoryCacheStore::new());
	let a = Counters::default();
	Grid::new(counting_config(a, store.clone()), json!({"people": {"page": 1}}), "/")
		.unwrap()
		.render()
		.unwrap();

	let b = Counters::default();
	Grid::new(counting_config(b.clone(), store), json!({"people": {"page": 2}}), "/")
		.unwrap()
		.render()
		.unwrap();
	assert!(*b.get_row.lock() > 0);
}

#[test]
fn test_prepare_is_idempotent() {
	let counters = Counters::default();
	let config = GridConfig::new()
		.name("people")
		.page_size(2)
		.column(
			FieldConfig::new("name")
				.filter(FilterConfig::new(FilterOperator::Like)),
		)
		.provider(CountingProvider::new(people(), counters.clone()));
	let request = json!({"people": {"filters": {"name-like": "al"}}});
	let mut grid = Grid::new(config, request, "/").unwrap();
	grid.prepare().unwrap();
	grid.prepare().unwrap();
	assert_eq!(*counters.filter.lock(), 1);
	grid.render().unwrap();
	assert_eq!(*counters.filter.lock(), 1);
}

// --- errors --------------------------------------------------------

struct NoLikeProvider(JsonDataProvider);

impl DataProvider for NoLikeProvider {
	fn id(&self) -> &str {
		self.0.id()
	}

	fn set_page_size(&mut self, page_size: usize) {
		self.0.set_page_size(page_size);
	}

	fn set_current_page(&mut self, page: usize) {
		self.0.set_current_page(page);
	}

	fn current_page(&self) -> usize {
		self.0.current_page()
	}

	fn page_size(&self) -> usize {
		self.0.page_size()
	}

	fn reset(&mut self) {
		self.0.reset();
	}

	fn order_by(&mut self, field: &str, direction: SortDirection) {
		self.0.order_by(field, direction);
	}

	fn filter(
		&mut self,
		field: &str,
		operator: FilterOperator,
		value: &str,
	) -> datagrid::Result<()> {
		if operator.is_like() {
			return Err(GridError::UnsupportedOperator(operator.to_string()));
		}
		self.0.filter(field, operator, value)
	}

	fn get_row(&mut self) -> datagrid::Result<Option<datagrid::DataRow>> {
		self.0.get_row()
	}

	fn paginator(&self) -> Paginator {
		self.0.paginator()
	}
}

#[test]
fn test_unsupported_operator_fails_the_render() {
	let config = GridConfig::new()
		.name("people")
		.column(
			FieldConfig::new("name")
				.filter(FilterConfig::new(FilterOperator::Like)),
		)
		.provider(NoLikeProvider(JsonDataProvider::new(people())));
	let request = json!({"people": {"filters": {"name-like": "al"}}});
	let err = Grid::new(config, request, "/").unwrap().render().unwrap_err();
	assert!(matches!(err, GridError::UnsupportedOperator(op) if op == "like"));
}

#[test]
fn test_unknown_aggregation_fails_at_prepare() {
	let config = people_config().components(vec![
		Box::new(TFoot::new().components(vec![Box::new(
			TotalsRow::new(["age"]).operation("age", "median"),
		)])),
	]);
	let mut grid = Grid::new(config, json!({}), "/").unwrap();
	let err = grid.prepare().unwrap_err();
	assert!(matches!(err, GridError::UnknownAggregation(op) if op == "median"));
}

#[test]
fn test_duplicate_filter_id_on_a_column_is_rejected() {
	let config = GridConfig::new()
		.name("people")
		.column(
			FieldConfig::new("name")
				.filter(FilterConfig::new(FilterOperator::Like))
				.filter(FilterConfig::new(FilterOperator::Like)),
		)
		.provider(JsonDataProvider::new(people()));
	let err = Grid::new(config, json!({}), "/").unwrap_err();
	assert!(matches!(err, GridError::Configuration(msg) if msg.contains("name-like")));
}

#[test]
fn test_missing_field_fails_the_render() {
	let config = GridConfig::new()
		.name("g")
		.column(FieldConfig::new("salary"))
		.provider(JsonDataProvider::new(people()));
	let err = Grid::new(config, json!({}), "/").unwrap().render().unwrap_err();
	assert!(matches!(err, GridError::FieldResolution { field, .. } if field == "salary"));
}

// --- totals --------------------------------------------------------

#[test]
fn test_totals_row_aggregates_the_rendered_page() {
	let config = GridConfig::new()
		.name("people")
		.page_size(2)
		.column(FieldConfig::new("name"))
		.column(FieldConfig::new("age"))
		.provider(JsonDataProvider::new(people()))
		.components(vec![Box::new(TFoot::new().components(vec![Box::new(
			TotalsRow::new(["age"])
				.operation("name", "count")
				.section(Section::End),
		)]))]);
	let html = Grid::new(config, json!({}), "/").unwrap().render().unwrap();
	// Page 1 holds Alice (34) and Bob (28)
	assert!(html.contains("\u{2211} 62"));
	assert!(html.contains("Count: 2"));
}

#[test]
fn test_totals_do_not_double_count_on_repeated_render() {
	let config = GridConfig::new()
		.name("people")
		.page_size(2)
		.column(FieldConfig::new("name"))
		.column(FieldConfig::new("age"))
		.provider(JsonDataProvider::new(people()))
		.components(vec![Box::new(TFoot::new().components(vec![Box::new(
			TotalsRow::new(["age"]).section(Section::End),
		)]))]);
	let mut grid = Grid::new(config, json!({}), "/").unwrap();
	let first = grid.render().unwrap();
	// No cache configured, the second render walks the body again
	let second = grid.render().unwrap();
	assert!(first.contains("\u{2211} 62"));
	assert_eq!(first, second);
}

// --- events --------------------------------------------------------

#[test]
fn test_row_fetch_events_fire_per_rendered_row() {
	use datagrid::events::{EVENT_FETCH_ROW, EventPayload};

	let config = GridConfig::new()
		.name("people")
		.page_size(2)
		.column(FieldConfig::new("name"))
		.provider(JsonDataProvider::new(people()).with_id("p1"));
	let mut grid = Grid::new(config, json!({}), "/").unwrap();

	let seen = Arc::new(Mutex::new(Vec::new()));
	let sink = Arc::clone(&seen);
	grid.context_mut().events_mut().subscribe(
		EVENT_FETCH_ROW,
		"p1",
		Arc::new(move |payload| {
			if let EventPayload::Row(row) = payload {
				sink.lock().push(row.id());
			}
		}),
	);
	grid.render().unwrap();
	assert_eq!(*seen.lock(), vec![1, 2]);
}
