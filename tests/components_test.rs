//! Component composition and markup tests

use datagrid::component::{
	ComponentFactory, Container, FiltersRow, HtmlTag, OneCellRow, Pager, RenderFunc, Section,
	ShowingRecords, TFoot, THead, View,
};
use datagrid::{FieldConfig, Grid, GridConfig, GridError, JsonDataProvider};
use serde_json::{Value, json};

mod common;

fn rows(n: usize) -> Vec<Value> {
	(0..n).map(|i| json!({"n": i, "label": format!("row {i}")})).collect()
}

fn base_config(row_count: usize) -> GridConfig {
	GridConfig::new()
		.name("g")
		.page_size(3)
		.column(FieldConfig::new("n"))
		.column(FieldConfig::new("label"))
		.provider(JsonDataProvider::new(rows(row_count)))
}

#[test]
fn test_pager_links_preserve_grid_state() {
	let request = json!({"g": {"page": 2, "sort": {"n": "ASC"}}});
	let html = Grid::new(base_config(10), request, "/rows").unwrap().render().unwrap();
	// Page 2 of 4 is active, neighbours are links carrying the sort
	assert!(html.contains("<li class=\"active\"><span>2</span></li>"));
	assert!(html.contains("g%5Bpage%5D=3"));
	assert!(html.contains("g%5Bsort%5D%5Bn%5D=ASC"));
	assert!(html.contains("rel=\"prev\""));
	assert!(html.contains("rel=\"next\""));
}

#[test]
fn test_single_page_renders_no_pager() {
	let html = Grid::new(base_config(2), json!({}), "/rows").unwrap().render().unwrap();
	assert!(!html.contains("pagination"));
}

#[test]
fn test_showing_records_summary() {
	let config = base_config(10).components(vec![
		Box::new(THead::new()),
		Box::new(TFoot::new().components(vec![Box::new(
			OneCellRow::new()
				.child(Box::new(ShowingRecords::new()))
				.child(Box::new(Pager::new())),
		)])),
	]);
	let html = Grid::new(config, json!({"g": {"page": 2}}), "/rows")
		.unwrap()
		.render()
		.unwrap();
	common::assert_in_order(&html, &["Showing records 4-6 of 10", "pagination"]);
	// The footer cell spans both visible columns
	assert!(html.contains("<td colspan=\"2\">"));
}

#[test]
fn test_hidden_column_renders_but_does_not_display() {
	let config = GridConfig::new()
		.name("g")
		.column(FieldConfig::new("n"))
		.column(FieldConfig::new("label").hidden(true))
		.provider(JsonDataProvider::new(rows(1)));
	let html = Grid::new(config, json!({}), "/rows").unwrap().render().unwrap();
	assert!(html.contains("<td class=\"column-label\" data-label=\"Label\" style=\"display:none;\">row 0</td>"));
}

#[test]
fn test_cell_attributes_and_transform() {
	let config = GridConfig::new()
		.name("g")
		.column(
			FieldConfig::new("n")
				.cell_attribute("data-kind", "numeric")
				.transform(|value, _row| json!(format!("#{value}"))),
		)
		.provider(JsonDataProvider::new(rows(1)));
	let html = Grid::new(config, json!({}), "/rows").unwrap().render().unwrap();
	assert!(html.contains("data-kind=\"numeric\""));
	assert!(html.contains("#0"));
}

#[test]
fn test_render_func_component_in_begin_section() {
	let config = base_config(2).components(vec![
		Box::new(
			RenderFunc::new(|ctx| Ok(format!("<h1>{}</h1>", ctx.name()))).section(Section::Begin),
		),
		Box::new(THead::new()),
		Box::new(TFoot::new()),
	]);
	let html = Grid::new(config, json!({}), "/rows").unwrap().render().unwrap();
	let heading = html.find("<h1>g</h1>").expect("heading rendered");
	let table = html.find("<table").expect("table rendered");
	assert!(heading < table);
}

#[test]
fn test_html_tag_attributes_are_escaped() {
	let config = base_config(1).components(vec![
		Box::new(
			HtmlTag::new("div")
				.attribute("title", "a \"quoted\" <value>")
				.content("footer note")
				.section(Section::End),
		),
		Box::new(THead::new()),
	]);
	let html = Grid::new(config, json!({}), "/rows").unwrap().render().unwrap();
	assert!(html.contains("<div title=\"a &quot;quoted&quot; &lt;value&gt;\">footer note</div>"));
}

#[test]
fn test_container_renders_children_in_section_order() {
	let container = Container::new()
		.child(Box::new(RenderFunc::new(|_| Ok("[end]".into())).section(Section::End)))
		.child(Box::new(RenderFunc::new(|_| Ok("[begin]".into())).section(Section::Begin)))
		.child(Box::new(RenderFunc::new(|_| Ok("[default]".into()))));
	let config = base_config(1).components(vec![
		Box::new(HtmlTag::new("div").child(Box::new(container)).section(Section::End)),
		Box::new(THead::new()),
	]);
	let html = Grid::new(config, json!({}), "/rows").unwrap().render().unwrap();
	assert!(html.contains("[begin][default][end]"));
}

#[test]
fn test_custom_filter_controls_land_in_their_column_cell() {
	let config = GridConfig::new()
		.name("g")
		.column(FieldConfig::new("n").filter(datagrid::FilterConfig::new(
			datagrid::FilterOperator::Eq,
		)))
		.column(FieldConfig::new("label"))
		.provider(JsonDataProvider::new(rows(2)))
		.components(vec![
			Box::new(THead::new().components(vec![
				Box::new(datagrid::component::ColumnHeadersRow::new()),
				Box::new(
					FiltersRow::new()
						.child(Box::new(
							RenderFunc::new(|_| Ok("<button>clear</button>".into()))
								.section(Section::Named("filters_row_column_label".into())),
						))
						.section(Section::End),
				),
			])),
			Box::new(TFoot::new()),
		]);
	let html = Grid::new(config, json!({}), "/rows").unwrap().render().unwrap();
	assert!(html.contains("name=\"g[filters][n-eq]\""));
	assert!(html.contains("<button>clear</button>"));
}

#[test]
fn test_view_without_template_engine_is_a_configuration_error() {
	let config = base_config(1).components(vec![
		Box::new(View::new("summary.html").section(Section::Begin)),
		Box::new(THead::new()),
	]);
	let err = Grid::new(config, json!({}), "/rows").unwrap().render().unwrap_err();
	assert!(matches!(err, GridError::Configuration(_)));
}

#[test]
fn test_factory_built_components_compose_into_a_grid() {
	let mut factory = ComponentFactory::with_defaults();
	factory
		.register_render_fn("caption", |ctx| Ok(format!("<caption>{}</caption>", ctx.name())))
		.unwrap();

	let mut caption = factory.create("caption").unwrap();
	caption.set_render_section(Some(Section::Begin));
	let config = base_config(1).components(vec![
		caption,
		factory.create("thead").unwrap(),
		factory.create("tfoot").unwrap(),
	]);
	let html = Grid::new(config, json!({}), "/rows").unwrap().render().unwrap();
	assert!(html.contains("<caption>g</caption>"));
	assert!(html.contains("<thead>"));
}

mod filter_order {
	use datagrid::{DataProvider, FilterOperator, JsonDataProvider};
	use proptest::prelude::*;
	use serde_json::json;

	proptest! {
		/// Conjunctive filters must not care about application order.
		#[test]
		fn conjunction_is_order_independent(
			ages in prop::collection::vec(0u8..100, 0..40),
			lo in 0u8..100,
			hi in 0u8..100,
		) {
			let rows = |ages: &[u8]| {
				ages.iter().map(|a| json!({"age": a})).collect::<Vec<_>>()
			};

			let mut forward = JsonDataProvider::new(rows(&ages));
			forward.filter("age", FilterOperator::Gte, &lo.to_string()).unwrap();
			forward.filter("age", FilterOperator::Lt, &hi.to_string()).unwrap();

			let mut backward = JsonDataProvider::new(rows(&ages));
			backward.filter("age", FilterOperator::Lt, &hi.to_string()).unwrap();
			backward.filter("age", FilterOperator::Gte, &lo.to_string()).unwrap();

			prop_assert_eq!(
				forward.paginator().total(),
				backward.paginator().total()
			);
			let expected = ages.iter().filter(|&&a| a >= lo && a < hi).count();
			prop_assert_eq!(forward.paginator().total(), expected);
		}
	}
}
