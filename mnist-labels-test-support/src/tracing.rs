//! Recording layer utilities for capturing events in tests.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};

use ::tracing::field::{Field, Visit};
use ::tracing::{Event, Level, Subscriber};
use tracing_subscriber::Layer;
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::registry::Registry;

/// Layer that records every event emitted while it is installed so tests can
/// assert on diagnostics such as cleanup messages.
#[derive(Clone, Default)]
pub struct RecordingLayer {
    events: Arc<Mutex<Vec<EventRecord>>>,
}

impl RecordingLayer {
    /// Returns a snapshot of the recorded events in emission order.
    ///
    /// # Examples
    /// ```
    /// use mnist_labels_test_support::tracing::RecordingLayer;
    ///
    /// let layer = RecordingLayer::default();
    /// assert!(layer.events().is_empty());
    /// ```
    #[must_use]
    pub fn events(&self) -> Vec<EventRecord> {
        self.events.lock().expect("lock poisoned").clone()
    }

    /// Counts recorded events whose message equals `message`.
    #[must_use]
    pub fn count_messages(&self, message: &str) -> usize {
        self.events
            .lock()
            .expect("lock poisoned")
            .iter()
            .filter(|event| event.message() == Some(message))
            .count()
    }
}

/// Snapshot of an emitted event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRecord {
    /// Log level associated with the event.
    pub level: Level,
    /// Event target, usually the emitting module path.
    pub target: String,
    /// Structured fields attached to the event, including `message`.
    pub fields: HashMap<String, String>,
}

impl EventRecord {
    /// The event's formatted message, if it carried one.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.fields.get("message").map(String::as_str)
    }
}

impl<S: Subscriber> Layer<S> for RecordingLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut fields = HashMap::new();
        event.record(&mut FieldRecorder {
            fields: &mut fields,
        });
        self.events
            .lock()
            .expect("lock poisoned")
            .push(EventRecord {
                level: *event.metadata().level(),
                target: event.metadata().target().to_owned(),
                fields,
            });
    }
}

/// Runs `f` with a [`RecordingLayer`] installed as the thread's default
/// subscriber and returns its result alongside the layer.
///
/// # Examples
/// ```
/// use mnist_labels_test_support::tracing::capture;
///
/// let (value, recorder) = capture(|| {
///     tracing::info!("hello");
///     7
/// });
/// assert_eq!(value, 7);
/// assert_eq!(recorder.count_messages("hello"), 1);
/// ```
pub fn capture<T>(f: impl FnOnce() -> T) -> (T, RecordingLayer) {
    let layer = RecordingLayer::default();
    let subscriber = Registry::default().with(layer.clone());
    let value = ::tracing::subscriber::with_default(subscriber, f);
    (value, layer)
}

struct FieldRecorder<'a> {
    fields: &'a mut HashMap<String, String>,
}

impl Visit for FieldRecorder<'_> {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.fields
            .insert(field.name().to_owned(), format!("{value:?}"));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.fields
            .insert(field.name().to_owned(), value.to_owned());
    }

    fn record_error(&mut self, field: &Field, value: &(dyn std::error::Error + 'static)) {
        self.fields
            .insert(field.name().to_owned(), value.to_string());
    }
}
