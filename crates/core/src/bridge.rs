use std::collections::{BTreeMap, BTreeSet};

use serde_json::Value;

/// One pending property change, ready to be pushed to the client.
#[derive(Debug, Clone, PartialEq)]
pub struct PropUpdate {
    pub key: String,
    pub value: Value,
}

/// State-binding seam between the server-side widget and whatever host
/// framework actually transports properties to the client element.
///
/// The widget only ever talks to this interface: `set_raw` stores a value
/// under a canonical client key, `get_raw` reads it back. Values are stored
/// as-is — no validation happens at this layer. CSS classes ride along the
/// same seam because the full-height toggle is a class, not a property.
pub trait StateBridge {
    fn set_raw(&mut self, key: &str, value: Value);
    fn get_raw(&self, key: &str) -> Option<&Value>;
    fn add_class(&mut self, class: &str);
    fn remove_class(&mut self, class: &str);
}

/// In-memory bridge: a key/value store plus an explicit serialization step.
///
/// Every `set_raw` marks the key dirty; [`InMemoryBridge::take_updates`]
/// drains the dirty set in write order so a host can flush exactly the
/// changed properties to the client. Repeated writes to the same key keep
/// only the last value but preserve the key's latest position in the flush
/// order.
#[derive(Debug, Default)]
pub struct InMemoryBridge {
    state: BTreeMap<String, Value>,
    classes: BTreeSet<String>,
    dirty: Vec<String>,
}

impl InMemoryBridge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drain pending property changes in the order they were last written.
    pub fn take_updates(&mut self) -> Vec<PropUpdate> {
        let keys = std::mem::take(&mut self.dirty);
        keys.into_iter()
            .map(|key| {
                let value = self.state.get(&key).cloned().unwrap_or(Value::Null);
                PropUpdate { key, value }
            })
            .collect()
    }

    /// Current CSS classes, for hosts that render the element's class list.
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.classes.iter().map(String::as_str)
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }
}

impl StateBridge for InMemoryBridge {
    fn set_raw(&mut self, key: &str, value: Value) {
        self.state.insert(key.to_owned(), value);
        self.dirty.retain(|k| k != key);
        self.dirty.push(key.to_owned());
    }

    fn get_raw(&self, key: &str) -> Option<&Value> {
        self.state.get(key)
    }

    fn add_class(&mut self, class: &str) {
        self.classes.insert(class.to_owned());
    }

    fn remove_class(&mut self, class: &str) {
        self.classes.remove(class);
    }
}
