//! Template engine seam
//!
//! The core never parses or interprets markup itself. Components that
//! want template-driven output go through [`TemplateEngine`]: a
//! template identifier plus a variable mapping in, a rendered string
//! out. A [tera](https://keats.github.io/tera/)-backed adapter is
//! available behind the `tera` feature.

use crate::error::Result;
use serde_json::{Map, Value};

/// External rendering backend for template-driven components.
pub trait TemplateEngine {
	/// Renders `template` with `vars` and returns the produced markup
	fn render(&self, template: &str, vars: &Map<String, Value>) -> Result<String>;
}

#[cfg(feature = "tera")]
pub use self::tera_engine::TeraEngine;

#[cfg(feature = "tera")]
mod tera_engine {
	use super::TemplateEngine;
	use crate::error::{GridError, Result};
	use serde_json::{Map, Value};

	/// [`TemplateEngine`] adapter over a [`tera::Tera`] instance.
	pub struct TeraEngine {
		tera: tera::Tera,
	}

	impl TeraEngine {
		/// Wraps an already configured tera instance
		pub fn new(tera: tera::Tera) -> Self {
			Self { tera }
		}

		/// Loads templates matching `glob`
		pub fn from_glob(glob: &str) -> Result<Self> {
			let tera = tera::Tera::new(glob)
				.map_err(|e| GridError::Template(e.to_string()))?;
			Ok(Self { tera })
		}
	}

	impl TemplateEngine for TeraEngine {
		fn render(&self, template: &str, vars: &Map<String, Value>) -> Result<String> {
			let context = tera::Context::from_serialize(Value::Object(vars.clone()))
				.map_err(|e| GridError::Template(e.to_string()))?;
			self.tera
				.render(template, &context)
				.map_err(|e| GridError::Template(e.to_string()))
		}
	}
}
