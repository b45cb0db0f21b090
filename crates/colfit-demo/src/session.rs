#![forbid(unsafe_code)]

//! Scripted resize session over an in-memory table.
//!
//! The script mimics a user dragging a window edge: each target width
//! arrives as a short burst of extent notifications, and the simulated
//! clock then advances past the debounce delay. After the widths, a column
//! is hidden and shown again, and the indicator (if any) is toggled.

use std::time::{Duration, Instant};

use colfit::{
    ColumnHost, ColumnResizer, CycleOutcome, IndicatorState, Item, ResizerConfig, TableSimulator,
};
use serde::Serialize;

/// Notifications per simulated drag.
const BURST: u64 = 4;
/// Spacing between notifications in a burst.
const BURST_STEP: Duration = Duration::from_millis(16);

/// Columns of the demo table.
pub fn demo_columns() -> Vec<(&'static str, Item)> {
    vec![
        ("id", Item::bounded(40.0, 80.0, 60.0)),
        ("name", Item::at_least(120.0, 200.0)),
        ("status", Item::bounded(60.0, 120.0, 100.0)),
        ("description", Item::at_least(80.0, 140.0)),
    ]
}

/// One printed line of the session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionRow {
    /// What the script did before this cycle.
    pub step: String,
    pub extent: f64,
    /// Trigger name, or `None` when nothing ran.
    pub trigger: Option<String>,
    pub budget: Option<f64>,
    pub case: Option<String>,
    /// Column name and committed preferred size after the step.
    pub columns: Vec<(String, f64)>,
    pub committed: usize,
    /// Skip reason, when the cycle was skipped.
    pub skipped: Option<String>,
}

/// Drives a [`ColumnResizer`] over a [`TableSimulator`] with a fake clock.
pub struct Session {
    table: TableSimulator,
    resizer: ColumnResizer,
    now: Instant,
    names: Vec<&'static str>,
    rows: Vec<SessionRow>,
}

impl Session {
    /// Build the demo table at `extent` and install a resizer on it.
    pub fn new(extent: f64, indicator: f64, config: ResizerConfig) -> Self {
        let columns = demo_columns();
        let names = columns.iter().map(|(name, _)| *name).collect();
        let mut table = columns
            .into_iter()
            .fold(TableSimulator::new(extent), |table, (name, item)| {
                table.with_column(name, item)
            });
        if indicator > 0.0 {
            table = table.with_indicator(IndicatorState::visible(indicator));
        }
        let resizer = ColumnResizer::install(&mut table, config);
        Self {
            table,
            resizer,
            now: Instant::now(),
            names,
            rows: Vec::new(),
        }
    }

    /// Run the deferred initial layout.
    pub fn start(&mut self) {
        let outcome = self.resizer.tick(&mut self.table, self.now);
        self.record("attach", outcome);
    }

    /// Drag the container to `extent` and let the debounce settle.
    pub fn drag_to(&mut self, extent: f64) {
        let from = self.table.extent();
        for i in 1..=BURST {
            let step = (extent - from) * i as f64 / BURST as f64;
            self.table.set_extent(from + step);
            self.resizer.on_extent_changed(self.now);
            self.now += BURST_STEP;
            // Only fires mid-drag when the debounce is shorter than a step.
            if let Some(outcome) = self.resizer.tick(&mut self.table, self.now) {
                self.record("dragging", Some(outcome));
            }
        }

        let wait = self
            .resizer
            .time_until_due(self.now)
            .unwrap_or(Duration::ZERO);
        self.now += wait;
        let outcome = self.resizer.tick(&mut self.table, self.now);
        self.record(&format!("drag to {extent}"), outcome);
    }

    /// Hide or show a column by name.
    pub fn set_column_visible(&mut self, name: &str, visible: bool) {
        if !self.table.set_column_visible(name, visible) {
            tracing::warn!(column = name, "no such column");
            return;
        }
        let outcome = self.resizer.on_columns_changed(&mut self.table);
        let verb = if visible { "show" } else { "hide" };
        self.record(&format!("{verb} {name}"), Some(outcome));
    }

    /// Toggle the indicator's visibility, if the table has one.
    pub fn toggle_indicator(&mut self) {
        let Some(state) = self.table.indicator() else {
            return;
        };
        let next = IndicatorState {
            visible: !state.visible,
            ..state
        };
        self.table.set_indicator(next);
        let outcome = self.resizer.on_indicator_visibility_changed(
            &mut self.table,
            state.visible,
            next.visible,
        );
        let verb = if next.visible { "show" } else { "hide" };
        self.record(&format!("{verb} indicator"), Some(outcome));
    }

    /// Rows recorded so far.
    pub fn rows(&self) -> &[SessionRow] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<SessionRow> {
        self.rows
    }

    fn record(&mut self, step: &str, outcome: Option<CycleOutcome>) {
        let columns = self
            .names
            .iter()
            .filter_map(|name| {
                self.table
                    .column(name)
                    .filter(|column| column.visible)
                    .map(|column| ((*name).to_string(), column.item.pref))
            })
            .collect();

        let mut row = SessionRow {
            step: step.to_string(),
            extent: self.table.extent(),
            trigger: None,
            budget: None,
            case: None,
            columns,
            committed: 0,
            skipped: None,
        };
        match outcome {
            Some(CycleOutcome::Applied(report)) => {
                row.trigger = Some(report.trigger.to_string());
                row.budget = Some(report.budget);
                row.case = Some(report.case.to_string());
                row.committed = report.committed;
            }
            Some(CycleOutcome::Skipped(reason)) => {
                row.skipped = Some(reason.to_string());
            }
            None => {}
        }
        self.rows.push(row);
    }
}

/// Run the full script: initial layout, every width, a column hide/show,
/// and an indicator toggle.
pub fn run_script(widths: &[f64], indicator: f64, config: ResizerConfig) -> Vec<SessionRow> {
    let first = widths.first().copied().unwrap_or(364.0);
    let mut session = Session::new(first, indicator, config);
    session.start();
    for &width in widths.iter().skip(1) {
        session.drag_to(width);
    }
    session.set_column_visible("status", false);
    session.set_column_visible("status", true);
    session.toggle_indicator();
    session.into_rows()
}

/// Render a row as one line of text.
pub fn render_text(row: &SessionRow) -> String {
    let mut line = format!("{:<18} extent {:>7.1}", row.step, row.extent);
    match (&row.skipped, row.budget, &row.case) {
        (Some(reason), _, _) => line.push_str(&format!("  skipped: {reason}")),
        (None, Some(budget), Some(case)) => line.push_str(&format!(
            "  budget {budget:>7.1}  {case:<22} committed {}",
            row.committed
        )),
        _ => line.push_str("  no cycle"),
    }
    for (name, size) in &row.columns {
        line.push_str(&format!("\n    {name:<12} {size:>8.2}"));
    }
    line
}
