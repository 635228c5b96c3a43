//! Namespaced request input and cache fingerprinting

use crate::component::html_tag::escape;
use crate::sorting::SortDirection;
use serde_json::{Map, Value, json};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fmt::Write as _;

/// Extracts and normalizes the request parameters belonging to one
/// grid instance.
///
/// All input for a grid lives under a single namespace keyed by the
/// grid's name: `{ "<grid>": { "page": 2, "sort": {"name": "DESC"},
/// "filters": {"name-like": "al"} } }`. The processor also computes
/// the cache fingerprint and rebuilds URLs carrying modified grid
/// state.
///
/// # Examples
///
/// ```
/// use datagrid::InputProcessor;
/// use serde_json::json;
///
/// let input = InputProcessor::new(
/// 	"users",
/// 	json!({"users": {"page": 2, "filters": {"name-like": "al"}}}),
/// 	"/people",
/// 	Default::default(),
/// );
/// assert_eq!(input.page(), 2);
/// assert_eq!(input.filter_value("name-like").as_deref(), Some("al"));
/// ```
#[derive(Debug, Clone)]
pub struct InputProcessor {
	key: String,
	request: Value,
	input: Value,
	base_url: String,
	ambient: BTreeMap<String, String>,
}

impl InputProcessor {
	/// Creates a processor for the grid named `key`.
	///
	/// `request` is the full parsed request input across all
	/// namespaces; `ambient` holds per-client state (e.g. cookies)
	/// that participates in rendering.
	pub fn new(
		key: impl Into<String>,
		request: Value,
		base_url: impl Into<String>,
		ambient: BTreeMap<String, String>,
	) -> Self {
		let key = key.into();
		let input = request.get(&key).cloned().unwrap_or(Value::Null);
		Self {
			key,
			request,
			input,
			base_url: base_url.into(),
			ambient,
		}
	}

	/// Returns the input key for grid parameters
	pub fn key(&self) -> &str {
		&self.key
	}

	/// Returns the raw namespaced input
	pub fn input(&self) -> &Value {
		&self.input
	}

	/// Returns the requested page number, defaulting to 1
	pub fn page(&self) -> usize {
		match self.input.get("page") {
			Some(Value::Number(n)) => n.as_u64().unwrap_or(1).max(1) as usize,
			Some(Value::String(s)) => s.parse().unwrap_or(1).max(1),
			_ => 1,
		}
	}

	/// Returns the explicit request-level sort, if any.
	///
	/// The sort input is a mapping of field to direction; only the
	/// first entry is meaningful.
	pub fn sorting(&self) -> Option<(&str, SortDirection)> {
		let sort = self.input.get("sort")?.as_object()?;
		sort.iter().find_map(|(field, direction)| {
			let direction = direction.as_str()?.parse().ok()?;
			Some((field.as_str(), direction))
		})
	}

	/// Returns the input value for a filter id.
	///
	/// An explicit empty string is returned as `Some("")`: present but
	/// empty.
	pub fn filter_value(&self, filter_id: &str) -> Option<String> {
		match self.input.get("filters")?.get(filter_id)? {
			Value::String(s) => Some(s.clone()),
			Value::Null => None,
			other => Some(crate::row::display_value(other)),
		}
	}

	/// Returns the UID for the current grid state, used as cache key.
	///
	/// Stable hash over the grid's namespace key, the canonically
	/// serialized namespaced input, and every ambient entry whose key
	/// contains the grid's name. Two requests with equal fingerprints
	/// are guaranteed byte-identical rendered output; any
	/// render-affecting state not captured here is a caching bug.
	pub fn fingerprint(&self) -> String {
		let mut hasher = Sha256::new();
		for (key, value) in &self.ambient {
			if key.contains(&self.key) {
				hasher.update(key.as_bytes());
				hasher.update(json!(value).to_string().as_bytes());
			}
		}
		hasher.update(self.key.as_bytes());
		// serde_json maps are BTreeMap-backed: serialization is
		// canonical regardless of the order keys arrived in.
		hasher.update(self.input.to_string().as_bytes());
		let digest = hasher.finalize();
		let mut out = String::with_capacity(64);
		for byte in digest {
			let _ = write!(out, "{byte:02x}");
		}
		out
	}

	/// Returns the current URL with the grid's namespaced parameters
	/// replaced by `overrides`, key by key. All other request
	/// parameters are preserved.
	pub fn url_with(&self, overrides: &Map<String, Value>) -> String {
		let mut params = match &self.request {
			Value::Object(map) => map.clone(),
			_ => Map::new(),
		};
		let mut grid_input = match &self.input {
			Value::Object(map) => map.clone(),
			_ => Map::new(),
		};
		for (key, value) in overrides {
			grid_input.insert(key.clone(), value.clone());
		}
		params.insert(self.key.clone(), Value::Object(grid_input));

		let mut pairs = Vec::new();
		for (key, value) in &params {
			flatten_pairs(key.clone(), value, &mut pairs);
		}
		let mut serializer = url::form_urlencoded::Serializer::new(String::new());
		serializer.extend_pairs(pairs);
		format!("{}?{}", self.base_url, serializer.finish())
	}

	/// Returns a URL setting `column` + `direction` as the explicit
	/// sort, replacing any previous sort input
	pub fn url_with_sort(&self, column: &str, direction: SortDirection) -> String {
		let mut overrides = Map::new();
		overrides.insert("sort".into(), json!({ column: direction.as_str() }));
		self.url_with(&overrides)
	}

	/// Returns a URL for another page of the same grid state
	pub fn url_with_page(&self, page: usize) -> String {
		let mut overrides = Map::new();
		overrides.insert("page".into(), json!(page));
		self.url_with(&overrides)
	}

	/// Renders hidden form inputs carrying the current sort state.
	///
	/// Field and direction come straight from request input and are
	/// HTML-escaped.
	pub fn sorting_hidden_inputs_html(&self) -> String {
		let mut html = String::new();
		if let Some(sort) = self.input.get("sort").and_then(Value::as_object) {
			for (field, direction) in sort {
				let _ = write!(
					html,
					"<input type=\"hidden\" name=\"{}[sort][{}]\" value=\"{}\"/>",
					self.key,
					escape(field),
					escape(direction.as_str().unwrap_or_default())
				);
			}
		}
		html
	}
}

/// Flattens nested input into PHP-style bracket query pairs:
/// `{"g": {"sort": {"name": "DESC"}}}` becomes
/// `g[sort][name]=DESC`.
fn flatten_pairs(prefix: String, value: &Value, out: &mut Vec<(String, String)>) {
	match value {
		Value::Object(map) => {
			for (key, nested) in map {
				flatten_pairs(format!("{prefix}[{key}]"), nested, out);
			}
		}
		Value::Array(items) => {
			for (index, nested) in items.iter().enumerate() {
				flatten_pairs(format!("{prefix}[{index}]"), nested, out);
			}
		}
		Value::Null => {}
		Value::String(s) => out.push((prefix, s.clone())),
		other => out.push((prefix, other.to_string())),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn processor(request: Value) -> InputProcessor {
		InputProcessor::new("g", request, "/list", BTreeMap::new())
	}

	#[test]
	fn test_page_defaults_to_one() {
		assert_eq!(processor(json!({})).page(), 1);
		assert_eq!(processor(json!({"g": {"page": "4"}})).page(), 4);
		assert_eq!(processor(json!({"g": {"page": 0}})).page(), 1);
	}

	#[test]
	fn test_sorting_takes_first_entry() {
		let input = processor(json!({"g": {"sort": {"name": "desc"}}}));
		assert_eq!(input.sorting(), Some(("name", SortDirection::Desc)));
		assert_eq!(processor(json!({})).sorting(), None);
	}

	#[test]
	fn test_fingerprint_is_input_order_independent() {
		let a = processor(json!({"g": {"filters": {"a": "1", "b": "2"}, "page": 1}}));
		let b = processor(json!({"g": {"page": 1, "filters": {"b": "2", "a": "1"}}}));
		assert_eq!(a.fingerprint(), b.fingerprint());
	}

	#[test]
	fn test_fingerprint_varies_with_input_and_ambient() {
		let a = processor(json!({"g": {"page": 1}}));
		let b = processor(json!({"g": {"page": 2}}));
		assert_ne!(a.fingerprint(), b.fingerprint());

		let mut ambient = BTreeMap::new();
		ambient.insert("g_columns".to_string(), "name,age".to_string());
		let c = InputProcessor::new("g", json!({"g": {"page": 1}}), "/list", ambient);
		assert_ne!(a.fingerprint(), c.fingerprint());

		// Ambient entries for other grids do not participate
		let mut unrelated = BTreeMap::new();
		unrelated.insert("other_columns".to_string(), "x".to_string());
		let d = InputProcessor::new("g", json!({"g": {"page": 1}}), "/list", unrelated);
		assert_eq!(a.fingerprint(), d.fingerprint());
	}

	#[test]
	fn test_url_with_sort_replaces_sort_and_keeps_the_rest() {
		let input = processor(json!({
			"g": {"sort": {"age": "ASC"}, "filters": {"name-like": "al"}},
			"other": "kept"
		}));
		let url = input.url_with_sort("name", SortDirection::Desc);
		assert!(url.starts_with("/list?"));
		assert!(url.contains("g%5Bsort%5D%5Bname%5D=DESC"));
		assert!(!url.contains("age"));
		assert!(url.contains("g%5Bfilters%5D%5Bname-like%5D=al"));
		assert!(url.contains("other=kept"));
	}

	#[test]
	fn test_sorting_hidden_inputs_escape_request_values() {
		let input = processor(json!({"g": {"sort": {"name": "ASC"}}}));
		assert_eq!(
			input.sorting_hidden_inputs_html(),
			"<input type=\"hidden\" name=\"g[sort][name]\" value=\"ASC\"/>"
		);

		// Sort input is attacker-controlled and must not break out of
		// the attribute
		let hostile = processor(json!({"g": {"sort": {"x\"><script>alert(1)</script>": "ASC"}}}));
		let html = hostile.sorting_hidden_inputs_html();
		assert!(!html.contains("<script>"));
		assert!(html.contains("x&quot;&gt;&lt;script&gt;"));
	}

	#[test]
	fn test_url_with_page() {
		let input = processor(json!({"g": {"page": 1}}));
		assert!(input.url_with_page(3).contains("g%5Bpage%5D=3"));
	}
}
