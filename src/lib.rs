//! Server-side HTML data grids: declarative columns over pluggable
//! data sources, with filtering, sorting, pagination and output
//! caching driven by namespaced request input.
//!
//! A grid is described once as a [`GridConfig`] (columns, data
//! provider, page size, optional component overrides) and bound per
//! request to the parsed query input. Rendering walks a component
//! tree; every widget of the default table layout can be replaced or
//! extended through the [`component`] module.
//!
//! # Examples
//!
//! ```
//! use datagrid::{FieldConfig, FilterConfig, FilterOperator, Grid, GridConfig, JsonDataProvider};
//! use serde_json::json;
//!
//! let config = GridConfig::new()
//! 	.name("people")
//! 	.page_size(10)
//! 	.column(
//! 		FieldConfig::new("name")
//! 			.sortable(true)
//! 			.filter(FilterConfig::new(FilterOperator::Like)),
//! 	)
//! 	.column(FieldConfig::new("age").sortable(true))
//! 	.provider(JsonDataProvider::new(vec![
//! 		json!({"name": "Alice", "age": 34}),
//! 		json!({"name": "Bob", "age": 28}),
//! 	]));
//!
//! // ?people[filters][name-like]=ali
//! let request = json!({"people": {"filters": {"name-like": "ali"}}});
//! let mut grid = Grid::new(config, request, "/people")?;
//! let html = grid.render()?;
//! assert!(html.contains("Alice"));
//! assert!(!html.contains("Bob"));
//! # Ok::<(), datagrid::GridError>(())
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::broken_intra_doc_links)]

pub mod cache;
pub mod component;
pub mod error;
pub mod events;
pub mod field;
pub mod filtering;
pub mod grid;
pub mod input;
pub mod provider;
pub mod row;
pub mod sorting;
pub mod template;

pub use cache::{CacheStore, InMemoryCacheStore};
pub use error::{GridError, Result};
pub use field::FieldConfig;
pub use filtering::{FilterConfig, FilterOperator, Filtering};
pub use grid::{Grid, GridConfig, GridContext};
pub use input::InputProcessor;
pub use provider::{DataProvider, JsonDataProvider, Paginator};
pub use row::DataRow;
pub use sorting::{SortDirection, Sorter};
pub use template::TemplateEngine;

#[cfg(feature = "tera")]
pub use template::TeraEngine;
