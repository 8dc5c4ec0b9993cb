//! In-process event bus with wildcard subscriptions.
//!
//! Event names are `.`-delimited. In a subscription pattern `*` matches
//! exactly one segment and `**` matches any number of segments (including
//! none), so `response.*` sees every successful request and `**` sees
//! everything.
//!
//! The request client publishes:
//!
//! - `request.<event>` before transmitting (payload: method and URL)
//! - `response.<event>` with the decrypted response body
//! - `error.<event>` with the generic error body
//!
//! Callbacks run synchronously on the emitting task, outside the registry
//! lock, so they may subscribe or unsubscribe freely.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

use serde_json::Value;

/// Identifier returned by [`EventBus::on`] for later removal.
pub type ListenerId = u64;

type Callback = Arc<dyn Fn(&str, &Value) + Send + Sync>;

/// Segment delimiter in event names.
pub const DELIMITER: char = '.';

/// Listener count per pattern above which a leak warning is logged.
pub const DEFAULT_MAX_LISTENERS: usize = 10;

struct Listener {
    id: ListenerId,
    pattern: String,
    once: bool,
    callback: Callback,
}

#[derive(Default)]
struct Registry {
    listeners: Vec<Listener>,
    next_id: ListenerId,
    warned: HashSet<String>,
}

/// Wildcard publish/subscribe registry.
pub struct EventBus {
    registry: Mutex<Registry>,
    max_listeners: usize,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let registry = self.lock();
        f.debug_struct("EventBus")
            .field("listeners", &registry.listeners.len())
            .field("max_listeners", &self.max_listeners)
            .finish()
    }
}

impl EventBus {
    /// Create a bus with [`DEFAULT_MAX_LISTENERS`].
    pub fn new() -> Self {
        Self::with_max_listeners(DEFAULT_MAX_LISTENERS)
    }

    /// Create a bus with a custom leak-warning threshold (0 disables it).
    pub fn with_max_listeners(max_listeners: usize) -> Self {
        Self {
            registry: Mutex::new(Registry::default()),
            max_listeners,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Registry> {
        // A panicking callback never runs under the lock, so the data is intact
        self.registry.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Subscribe `callback` to every event matching `pattern`.
    pub fn on<F>(&self, pattern: &str, callback: F) -> ListenerId
    where
        F: Fn(&str, &Value) + Send + Sync + 'static,
    {
        self.register(pattern, false, Arc::new(callback))
    }

    /// Subscribe `callback` for the first matching event only.
    pub fn once<F>(&self, pattern: &str, callback: F) -> ListenerId
    where
        F: Fn(&str, &Value) + Send + Sync + 'static,
    {
        self.register(pattern, true, Arc::new(callback))
    }

    fn register(&self, pattern: &str, once: bool, callback: Callback) -> ListenerId {
        let mut registry = self.lock();
        let id = registry.next_id;
        registry.next_id += 1;

        registry.listeners.push(Listener {
            id,
            pattern: pattern.to_string(),
            once,
            callback,
        });

        let count = registry
            .listeners
            .iter()
            .filter(|l| l.pattern == pattern)
            .count();
        if self.max_listeners > 0
            && count > self.max_listeners
            && registry.warned.insert(pattern.to_string())
        {
            tracing::warn!(
                pattern,
                count,
                max = self.max_listeners,
                "possible event listener leak detected"
            );
        }

        tracing::trace!(id, pattern, once, "registered event listener");
        id
    }

    /// Remove a listener. Returns false if the id is unknown.
    pub fn off(&self, id: ListenerId) -> bool {
        let mut registry = self.lock();
        let before = registry.listeners.len();
        registry.listeners.retain(|l| l.id != id);
        registry.listeners.len() != before
    }

    /// Remove every listener registered with exactly `pattern`, or all
    /// listeners when `pattern` is `None`.
    pub fn remove_all(&self, pattern: Option<&str>) {
        let mut registry = self.lock();
        match pattern {
            Some(p) => registry.listeners.retain(|l| l.pattern != p),
            None => registry.listeners.clear(),
        }
    }

    /// Number of listeners whose pattern matches `event`.
    pub fn listener_count(&self, event: &str) -> usize {
        self.lock()
            .listeners
            .iter()
            .filter(|l| event_matches(&l.pattern, event))
            .count()
    }

    /// Deliver `payload` to every listener matching `event`.
    ///
    /// Returns the number of callbacks invoked.
    pub fn emit(&self, event: &str, payload: &Value) -> usize {
        let callbacks: Vec<Callback> = {
            let mut registry = self.lock();
            let mut matched = Vec::new();
            registry.listeners.retain(|l| {
                if event_matches(&l.pattern, event) {
                    matched.push(l.callback.clone());
                    !l.once
                } else {
                    true
                }
            });
            matched
        };

        for callback in &callbacks {
            callback(event, payload);
        }
        callbacks.len()
    }
}

/// Check whether `event` matches the wildcard `pattern`.
pub fn event_matches(pattern: &str, event: &str) -> bool {
    let pattern: Vec<&str> = pattern.split(DELIMITER).collect();
    let event: Vec<&str> = event.split(DELIMITER).collect();
    segments_match(&pattern, &event)
}

fn segments_match(pattern: &[&str], event: &[&str]) -> bool {
    match (pattern.split_first(), event.split_first()) {
        (None, None) => true,
        (Some((&"**", rest)), _) => {
            // Zero segments, or consume one and stay on `**`
            segments_match(rest, event)
                || (!event.is_empty() && segments_match(pattern, &event[1..]))
        }
        (Some((&"*", rest)), Some((_, event_rest))) => segments_match(rest, event_rest),
        (Some((p, rest)), Some((e, event_rest))) => p == e && segments_match(rest, event_rest),
        _ => false,
    }
}
