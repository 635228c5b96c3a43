//! Synchronous event bus for decoupled grid features
//!
//! Features like running totals observe grid activity without the core
//! depending on them. Listeners subscribe by `(event name, resource
//! id)` where the resource id is a stable identifier: the provider id
//! for row events, the grid name for lifecycle events. This replaces
//! listeners that filter by captured instance identity.

use crate::row::DataRow;
use std::collections::HashMap;
use std::sync::Arc;

/// Fired after a grid's component tree has been initialized.
pub const EVENT_GRID_CREATE: &str = "grid.create";
/// Fired once the prepare pipeline (filters, sort, column order) ran.
pub const EVENT_GRID_PREPARE: &str = "grid.prepare";
/// Fired once per row successfully returned by a data provider.
pub const EVENT_FETCH_ROW: &str = "grid.dp.fetch_row";

/// Payload handed to event listeners.
pub enum EventPayload<'a> {
	/// Lifecycle events carry no payload
	None,
	/// `grid.dp.fetch_row` carries the fetched row
	Row(&'a DataRow),
}

/// Boxed listener callback.
///
/// Listeners that accumulate state hold it behind
/// `Arc<parking_lot::Mutex<_>>` themselves.
pub type EventListener = Arc<dyn Fn(&EventPayload<'_>)>;

/// Publish/subscribe bus keyed by event name and resource identifier.
///
/// # Examples
///
/// ```
/// use datagrid::events::{EventBus, EventPayload, EVENT_GRID_PREPARE};
/// use std::sync::Arc;
/// use parking_lot::Mutex;
///
/// let seen = Arc::new(Mutex::new(0u32));
/// let mut bus = EventBus::new();
/// let counter = Arc::clone(&seen);
/// bus.subscribe(EVENT_GRID_PREPARE, "users", Arc::new(move |_payload| {
/// 	*counter.lock() += 1;
/// }));
///
/// bus.fire(EVENT_GRID_PREPARE, "users", &EventPayload::None);
/// bus.fire(EVENT_GRID_PREPARE, "orders", &EventPayload::None);
/// assert_eq!(*seen.lock(), 1);
/// ```
#[derive(Default)]
pub struct EventBus {
	listeners: HashMap<(String, String), Vec<EventListener>>,
}

impl EventBus {
	/// Creates an empty bus
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers a listener for `event` fired on behalf of `resource`
	pub fn subscribe(
		&mut self,
		event: impl Into<String>,
		resource: impl Into<String>,
		listener: EventListener,
	) {
		self.listeners
			.entry((event.into(), resource.into()))
			.or_default()
			.push(listener);
	}

	/// Invokes every listener subscribed to `(event, resource)`
	pub fn fire(&self, event: &str, resource: &str, payload: &EventPayload<'_>) {
		if let Some(listeners) = self
			.listeners
			.get(&(event.to_string(), resource.to_string()))
		{
			for listener in listeners {
				listener(payload);
			}
		}
	}

	/// Returns the number of listeners for `(event, resource)`
	pub fn listener_count(&self, event: &str, resource: &str) -> usize {
		self.listeners
			.get(&(event.to_string(), resource.to_string()))
			.map(Vec::len)
			.unwrap_or(0)
	}
}

impl std::fmt::Debug for EventBus {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("EventBus")
			.field("subscriptions", &self.listeners.len())
			.finish()
	}
}
