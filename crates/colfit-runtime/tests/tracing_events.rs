#![forbid(unsafe_code)]

//! Structured log events emitted by the resize driver.
//!
//! A capturing `tracing_subscriber` layer records every event so the tests
//! can assert on targets, levels, and field values.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use colfit_layout::Item;
use colfit_runtime::{ColumnResizer, IndicatorState, ResizerConfig, Rounding, TableSimulator};
use tracing::Level;
use tracing_subscriber::layer::{Context, SubscriberExt};

// ============================================================================
// Test Infrastructure
// ============================================================================

#[derive(Debug, Clone)]
struct CapturedEvent {
    target: String,
    level: Level,
    fields: HashMap<String, String>,
}

impl CapturedEvent {
    fn message(&self) -> &str {
        self.fields.get("message").map(String::as_str).unwrap_or("")
    }

    fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }
}

struct EventCapture {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

#[derive(Default)]
struct FieldVisitor(HashMap<String, String>);

impl tracing::field::Visit for FieldVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.0.insert(field.name().to_string(), format!("{value:?}"));
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.0.insert(field.name().to_string(), value.to_string());
    }
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for EventCapture {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);
        let metadata = event.metadata();
        self.events.lock().unwrap().push(CapturedEvent {
            target: metadata.target().to_string(),
            level: *metadata.level(),
            fields: visitor.0,
        });
    }
}

/// Run `f` with a capturing subscriber and return everything it logged.
fn capture<F: FnOnce()>(f: F) -> Vec<CapturedEvent> {
    let events = Arc::new(Mutex::new(Vec::new()));
    let subscriber = tracing_subscriber::registry().with(EventCapture {
        events: Arc::clone(&events),
    });
    tracing::subscriber::with_default(subscriber, f);
    let captured = events.lock().unwrap().clone();
    captured
}

fn find<'a>(events: &'a [CapturedEvent], message: &str) -> Option<&'a CapturedEvent> {
    events.iter().find(|event| event.message() == message)
}

fn three_columns(extent: f64) -> TableSimulator {
    TableSimulator::new(extent)
        .with_column("a", Item::at_least(20.0, 100.0))
        .with_column("b", Item::at_least(20.0, 100.0))
        .with_column("c", Item::at_least(20.0, 100.0))
}

// ============================================================================
// Tests
// ============================================================================

#[test]
fn applied_cycle_logs_summary() {
    let events = capture(|| {
        let mut table = three_columns(364.0);
        let mut resizer = ColumnResizer::install(&mut table, ResizerConfig::default());
        resizer.tick(&mut table, Instant::now());
    });

    let applied = find(&events, "resize_applied").expect("resize_applied event");
    assert_eq!(applied.target, "colfit.resize");
    assert_eq!(applied.level, Level::INFO);
    assert_eq!(applied.field("trigger"), Some("initial"));
    assert_eq!(applied.field("case"), Some("expanded"));
    assert_eq!(applied.field("committed"), Some("3"));
    assert_eq!(applied.field("budget"), Some("360.0"));
}

#[test]
fn tiny_budget_logs_warning() {
    let events = capture(|| {
        let mut table = three_columns(4.5);
        let mut resizer = ColumnResizer::install(&mut table, ResizerConfig::default());
        resizer.tick(&mut table, Instant::now());
    });

    let warning = find(&events, "budget_too_small").expect("budget_too_small event");
    assert_eq!(warning.level, Level::WARN);
    assert_eq!(warning.field("budget"), Some("0.5"));

    let skipped = find(&events, "resize_skipped").expect("resize_skipped event");
    assert_eq!(skipped.field("reason"), Some("budget_too_small"));
    assert!(find(&events, "resize_applied").is_none());
}

#[test]
fn indicator_without_width_logs_error() {
    let events = capture(|| {
        let mut table = three_columns(379.0).with_indicator(IndicatorState {
            visible: true,
            width: 0.0,
            pref_width: 0.0,
        });
        let mut resizer = ColumnResizer::install(&mut table, ResizerConfig::default());
        resizer.tick(&mut table, Instant::now());
    });

    let error = events
        .iter()
        .find(|event| event.level == Level::ERROR)
        .expect("error event");
    assert_eq!(error.target, "colfit.resize");
    assert_eq!(error.field("fallback"), Some("15.0"));
}

#[test]
fn indicator_pref_width_logs_warning() {
    let events = capture(|| {
        let mut table = three_columns(379.0).with_indicator(IndicatorState {
            visible: true,
            width: 0.0,
            pref_width: 15.0,
        });
        let mut resizer = ColumnResizer::install(&mut table, ResizerConfig::default());
        resizer.tick(&mut table, Instant::now());
    });

    assert!(events.iter().any(|event| {
        event.level == Level::WARN && event.field("pref_width") == Some("15.0")
    }));
    assert!(events.iter().all(|event| event.level != Level::ERROR));
}

#[test]
fn exact_mismatch_logs_shortfall() {
    let events = capture(|| {
        let mut table = TableSimulator::new(504.0)
            .with_column("a", Item::bounded(0.0, 100.0, 50.0))
            .with_column("b", Item::bounded(0.0, 100.0, 50.0));
        let config = ResizerConfig::default().with_rounding(Rounding::Exact);
        let mut resizer = ColumnResizer::install(&mut table, config);
        resizer.tick(&mut table, Instant::now());
    });

    let mismatch = find(&events, "exact_sum_mismatch").expect("exact_sum_mismatch event");
    assert_eq!(mismatch.level, Level::WARN);
    assert_eq!(mismatch.field("shortfall"), Some("300"));
    assert_eq!(mismatch.field("sum"), Some("200"));
}

#[test]
fn debounced_cycle_logs_coalesced_count() {
    let events = capture(|| {
        let base = Instant::now();
        let mut table = three_columns(364.0);
        let mut resizer = ColumnResizer::install(&mut table, ResizerConfig::default());
        resizer.tick(&mut table, base);
        table.set_extent(454.0);
        for offset in [0, 10, 20] {
            resizer.on_extent_changed(base + std::time::Duration::from_millis(offset));
        }
        resizer.tick(&mut table, base + std::time::Duration::from_millis(80));
    });

    let fired = find(&events, "debounce_fired").expect("debounce_fired event");
    assert_eq!(fired.field("coalesced"), Some("3"));
    let applied: Vec<_> = events
        .iter()
        .filter(|event| event.message() == "resize_applied")
        .collect();
    assert_eq!(applied.len(), 2);
    assert_eq!(applied[1].field("trigger"), Some("extent"));
}

#[test]
fn invalid_env_override_logs_warning() {
    let events = capture(|| {
        let config = ResizerConfig::from_lookup(|name| {
            (name == "COLFIT_ROUNDING").then(|| "pixel".to_string())
        });
        assert_eq!(config.rounding, Rounding::Fractional);
    });

    let warning = events
        .iter()
        .find(|event| event.target == "colfit.config")
        .expect("config warning");
    assert_eq!(warning.level, Level::WARN);
    assert_eq!(warning.field("var"), Some("COLFIT_ROUNDING"));
    assert_eq!(warning.field("value"), Some("pixel"));
}
