//! Shared fixtures for integration tests

// Not every test binary uses every fixture
#![allow(dead_code)]

use serde_json::{Value, json};

/// Five-person dataset used across scenario tests
pub fn people() -> Vec<Value> {
	vec![
		json!({"name": "Alice", "age": 34}),
		json!({"name": "Bob", "age": 28}),
		json!({"name": "Carol", "age": 41}),
		json!({"name": "Dave", "age": 28}),
		json!({"name": "Malin", "age": 55}),
	]
}

/// Ordered position assertions: each needle must appear after the one
/// before it.
pub fn assert_in_order(html: &str, needles: &[&str]) {
	let mut from = 0;
	for needle in needles {
		match html[from..].find(needle) {
			Some(at) => from += at + needle.len(),
			None => panic!("'{needle}' missing or out of order in:\n{html}"),
		}
	}
}
