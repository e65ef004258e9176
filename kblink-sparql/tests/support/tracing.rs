//! Tracing capture for asserting on spans and events emitted by terminals.
//!
//! Uses `tracing::subscriber::set_default()` so each test gets its own
//! subscriber for as long as the returned `DefaultGuard` lives.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::Subscriber;
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::prelude::*;
use tracing_subscriber::registry::LookupSpan;

#[derive(Debug, Clone)]
pub struct Captured {
    /// Span name, or the event's target for events
    pub name: String,
    pub level: tracing::Level,
    pub fields: HashMap<String, String>,
    pub is_span: bool,
}

impl Captured {
    pub fn message(&self) -> Option<&str> {
        self.fields.get("message").map(String::as_str)
    }
}

#[derive(Debug, Clone, Default)]
pub struct CaptureStore(Arc<Mutex<Vec<Captured>>>);

impl CaptureStore {
    pub fn has_span(&self, name: &str) -> bool {
        self.0
            .lock()
            .unwrap()
            .iter()
            .any(|c| c.is_span && c.name == name)
    }

    pub fn find_span(&self, name: &str) -> Option<Captured> {
        self.0
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.is_span && c.name == name)
            .cloned()
    }

    /// Events at `level` in emission order.
    pub fn events(&self, level: tracing::Level) -> Vec<Captured> {
        self.0
            .lock()
            .unwrap()
            .iter()
            .filter(|c| !c.is_span && c.level == level)
            .cloned()
            .collect()
    }

    /// Whether an event at `level` has a message containing `needle`.
    pub fn has_event(&self, level: tracing::Level, needle: &str) -> bool {
        self.events(level)
            .iter()
            .any(|e| e.message().is_some_and(|m| m.contains(needle)))
    }
}

struct CaptureLayer {
    store: CaptureStore,
}

impl<S> Layer<S> for CaptureLayer
where
    S: Subscriber + for<'lookup> LookupSpan<'lookup>,
{
    fn on_new_span(
        &self,
        attrs: &tracing::span::Attributes<'_>,
        _id: &tracing::span::Id,
        _ctx: Context<'_, S>,
    ) {
        let mut fields = FieldVisitor(HashMap::new());
        attrs.record(&mut fields);
        let meta = attrs.metadata();
        self.store.0.lock().unwrap().push(Captured {
            name: meta.name().to_string(),
            level: *meta.level(),
            fields: fields.0,
            is_span: true,
        });
    }

    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let mut fields = FieldVisitor(HashMap::new());
        event.record(&mut fields);
        let meta = event.metadata();
        self.store.0.lock().unwrap().push(Captured {
            name: meta.target().to_string(),
            level: *meta.level(),
            fields: fields.0,
            is_span: false,
        });
    }
}

struct FieldVisitor(HashMap<String, String>);

impl tracing::field::Visit for FieldVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.0
            .insert(field.name().to_string(), format!("{:?}", value));
    }
    fn record_u64(&mut self, field: &tracing::field::Field, value: u64) {
        self.0.insert(field.name().to_string(), value.to_string());
    }
    fn record_i64(&mut self, field: &tracing::field::Field, value: i64) {
        self.0.insert(field.name().to_string(), value.to_string());
    }
    fn record_bool(&mut self, field: &tracing::field::Field, value: bool) {
        self.0.insert(field.name().to_string(), value.to_string());
    }
    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.0.insert(field.name().to_string(), value.to_string());
    }
}

/// Capture every span and event while the guard is alive.
pub fn init_test_tracing() -> (CaptureStore, tracing::subscriber::DefaultGuard) {
    let store = CaptureStore::default();
    let layer = CaptureLayer {
        store: store.clone(),
    };
    let subscriber = tracing_subscriber::registry::Registry::default().with(layer);
    let guard = tracing::subscriber::set_default(subscriber);
    (store, guard)
}
