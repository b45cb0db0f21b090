//! Column resize driver.
//!
//! [`ColumnResizer`] keeps the visible columns of a [`ColumnHost`] filling
//! the host's width. The host forwards its change notifications; the resizer
//! decides when to run a cycle, computes the budget, allocates it with
//! [`colfit_layout`], and commits the sizes that actually moved.
//!
//! # Triggers
//!
//! | Notification | Scheduling |
//! |---|---|
//! | [`ColumnResizer::attach`] | deferred to the next [`ColumnResizer::tick`] |
//! | [`ColumnResizer::on_extent_changed`] | debounced (trailing edge, latest wins) |
//! | [`ColumnResizer::on_columns_changed`] | immediate |
//! | [`ColumnResizer::on_indicator_visibility_changed`] | immediate |
//! | [`ColumnResizer::on_indicator_width_changed`] | immediate when visible and significant |
//! | [`ColumnResizer::force_resize`] | immediate |
//!
//! Every immediate cycle cancels a pending debounced one.
//!
//! # Budget
//!
//! ```text
//! budget = extent − (insets.left + insets.right + padding_buffer) − indicator
//! ```
//!
//! where `indicator` is the indicator's laid-out width when it is visible.
//! Before the first layout pass the preferred width is used, and failing
//! that the configured fallback.
//!
//! Every entry point takes `&mut self`, so a commit made during a cycle can
//! never start a nested cycle on the same resizer.

use std::fmt;
use std::time::{Duration, Instant};

use colfit_layout::{AllocationCase, Item, explain, explain_exact};

use crate::config::{ResizerConfig, Rounding};
use crate::debounce::{DebounceAction, Debouncer};
use crate::host::{ColumnHost, IndicatorState};

const TARGET: &str = "colfit.resize";

/// What started a cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trigger {
    /// First cycle after attaching.
    Initial,
    /// Debounced container width change.
    Extent,
    /// Columns added, removed, reordered, or shown/hidden.
    Columns,
    /// Indicator shown or hidden.
    IndicatorVisibility,
    /// Visible indicator changed width.
    IndicatorWidth,
    /// Explicit request.
    Forced,
}

impl Trigger {
    /// Stable name for logs.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Initial => "initial",
            Self::Extent => "extent",
            Self::Columns => "columns",
            Self::IndicatorVisibility => "indicator_visibility",
            Self::IndicatorWidth => "indicator_width",
            Self::Forced => "forced",
        }
    }
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a cycle did not change anything.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SkipReason {
    /// The resizer is not attached.
    Detached,
    /// The notification carried no meaningful change.
    Insignificant,
    /// The indicator changed width while hidden.
    IndicatorHidden,
    /// The host is invisible or has no area.
    NotReady,
    /// There are no visible columns.
    NoColumns,
    /// Nothing meaningful fits after padding and the indicator.
    BudgetTooSmall {
        /// The computed budget.
        budget: f64,
    },
}

impl SkipReason {
    /// Stable name for logs.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Detached => "detached",
            Self::Insignificant => "insignificant",
            Self::IndicatorHidden => "indicator_hidden",
            Self::NotReady => "not_ready",
            Self::NoColumns => "no_columns",
            Self::BudgetTooSmall { .. } => "budget_too_small",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BudgetTooSmall { budget } => write!(f, "budget too small ({budget:.2})"),
            other => f.write_str(other.as_str()),
        }
    }
}

/// Summary of an applied cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct CycleReport {
    pub trigger: Trigger,
    /// Width handed to the allocator.
    pub budget: f64,
    /// Indicator width deducted from the extent.
    pub indicator_width: f64,
    /// Allocator branch.
    pub case: AllocationCase,
    /// Allocated size per visible column (whole values under [`Rounding::Exact`]).
    pub sizes: Vec<f64>,
    /// Columns written back to the host.
    pub committed: usize,
    /// Columns left alone because they moved by at most the commit threshold.
    pub unchanged: usize,
    /// `floor(budget) − Σsizes` under [`Rounding::Exact`].
    pub exact_shortfall: Option<i64>,
}

impl CycleReport {
    /// Sum of the allocated sizes.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.sizes.iter().sum()
    }
}

/// Result of a cycle attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum CycleOutcome {
    Applied(CycleReport),
    Skipped(SkipReason),
}

impl CycleOutcome {
    /// The report, if the cycle ran.
    #[must_use]
    pub fn report(&self) -> Option<&CycleReport> {
        match self {
            Self::Applied(report) => Some(report),
            Self::Skipped(_) => None,
        }
    }

    /// The skip reason, if the cycle did not run.
    #[must_use]
    pub fn skip_reason(&self) -> Option<SkipReason> {
        match self {
            Self::Applied(_) => None,
            Self::Skipped(reason) => Some(*reason),
        }
    }

    #[must_use]
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied(_))
    }
}

/// Keeps a host's columns filling its width.
#[derive(Debug, Clone)]
pub struct ColumnResizer {
    config: ResizerConfig,
    debouncer: Debouncer,
    attached: bool,
    indicator_found: bool,
    initial_pending: bool,
    cycles: u64,
}

impl ColumnResizer {
    /// Create a detached resizer.
    #[must_use]
    pub fn new(config: ResizerConfig) -> Self {
        let debouncer = Debouncer::new(config.debounce);
        Self {
            config,
            debouncer,
            attached: false,
            indicator_found: false,
            initial_pending: false,
            cycles: 0,
        }
    }

    /// Create a resizer for `host`, attaching right away if the host is
    /// already part of a live display tree.
    #[must_use]
    pub fn install<H: ColumnHost + ?Sized>(host: &mut H, config: ResizerConfig) -> Self {
        let mut resizer = Self::new(config);
        if host.is_attached() {
            resizer.attach(host);
        }
        resizer
    }

    /// Start listening. The first cycle runs on the next [`tick`](Self::tick).
    ///
    /// Does nothing when already attached.
    pub fn attach<H: ColumnHost + ?Sized>(&mut self, host: &mut H) {
        if self.attached {
            return;
        }
        self.attached = true;
        self.indicator_found = host.find_indicator();
        self.initial_pending = true;
        tracing::debug!(
            target: TARGET,
            indicator_found = self.indicator_found,
            "attached"
        );
    }

    /// Stop listening and drop any pending work.
    pub fn detach(&mut self) {
        if !self.attached {
            return;
        }
        self.attached = false;
        self.indicator_found = false;
        self.initial_pending = false;
        let dropped = self.debouncer.cancel();
        tracing::debug!(target: TARGET, dropped_pending = dropped, "detached");
    }

    /// The container width changed. Returns whether a cycle was scheduled.
    pub fn on_extent_changed(&mut self, now: Instant) -> bool {
        if !self.attached {
            return false;
        }
        self.debouncer.trigger_at(now);
        tracing::trace!(target: TARGET, "extent_changed");
        true
    }

    /// The visible column set changed.
    pub fn on_columns_changed<H: ColumnHost + ?Sized>(&mut self, host: &mut H) -> CycleOutcome {
        self.run_now(host, Trigger::Columns)
    }

    /// The indicator was shown or hidden.
    pub fn on_indicator_visibility_changed<H: ColumnHost + ?Sized>(
        &mut self,
        host: &mut H,
        old: bool,
        new: bool,
    ) -> CycleOutcome {
        if !self.attached {
            return CycleOutcome::Skipped(SkipReason::Detached);
        }
        if old == new {
            return CycleOutcome::Skipped(SkipReason::Insignificant);
        }
        self.run_now(host, Trigger::IndicatorVisibility)
    }

    /// The indicator's laid-out width changed.
    pub fn on_indicator_width_changed<H: ColumnHost + ?Sized>(
        &mut self,
        host: &mut H,
        old: f64,
        new: f64,
    ) -> CycleOutcome {
        if !self.attached {
            return CycleOutcome::Skipped(SkipReason::Detached);
        }
        if !host.indicator().is_some_and(|state| state.visible) {
            return CycleOutcome::Skipped(SkipReason::IndicatorHidden);
        }
        if !((old - new).abs() > self.config.indicator_width_epsilon) {
            return CycleOutcome::Skipped(SkipReason::Insignificant);
        }
        self.run_now(host, Trigger::IndicatorWidth)
    }

    /// Run a cycle immediately.
    pub fn force_resize<H: ColumnHost + ?Sized>(&mut self, host: &mut H) -> CycleOutcome {
        self.run_now(host, Trigger::Forced)
    }

    /// Run whatever is due: the deferred initial cycle, or a debounced
    /// extent cycle whose quiet period has elapsed.
    pub fn tick<H: ColumnHost + ?Sized>(
        &mut self,
        host: &mut H,
        now: Instant,
    ) -> Option<CycleOutcome> {
        if !self.attached {
            return None;
        }
        if self.initial_pending {
            return Some(self.run_now(host, Trigger::Initial));
        }
        match self.debouncer.poll_at(now) {
            DebounceAction::None => None,
            DebounceAction::Fire { coalesced, waited } => {
                tracing::debug!(
                    target: TARGET,
                    coalesced,
                    waited_ms = waited.as_secs_f64() * 1000.0,
                    "debounce_fired"
                );
                Some(self.run_cycle(host, Trigger::Extent))
            }
        }
    }

    /// How long until [`tick`](Self::tick) has work (`None` when idle).
    #[must_use]
    pub fn time_until_due(&self, now: Instant) -> Option<Duration> {
        if !self.attached {
            return None;
        }
        if self.initial_pending {
            return Some(Duration::ZERO);
        }
        self.debouncer.time_until_fire(now)
    }

    #[inline]
    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Whether a deferred or debounced cycle is waiting.
    #[inline]
    pub fn has_pending(&self) -> bool {
        self.initial_pending || self.debouncer.is_pending()
    }

    #[inline]
    pub fn config(&self) -> &ResizerConfig {
        &self.config
    }

    /// Number of applied cycles since creation.
    #[inline]
    pub fn cycle_count(&self) -> u64 {
        self.cycles
    }

    fn run_now<H: ColumnHost + ?Sized>(&mut self, host: &mut H, trigger: Trigger) -> CycleOutcome {
        if !self.attached {
            return CycleOutcome::Skipped(SkipReason::Detached);
        }
        self.initial_pending = false;
        if self.debouncer.cancel() {
            tracing::trace!(target: TARGET, trigger = %trigger, "debounce_cancelled");
        }
        self.run_cycle(host, trigger)
    }

    fn run_cycle<H: ColumnHost + ?Sized>(
        &mut self,
        host: &mut H,
        trigger: Trigger,
    ) -> CycleOutcome {
        let outcome = self.cycle(host, trigger);
        match &outcome {
            CycleOutcome::Applied(report) => {
                self.cycles += 1;
                tracing::info!(
                    target: TARGET,
                    trigger = %report.trigger,
                    budget = report.budget,
                    indicator_width = report.indicator_width,
                    case = %report.case,
                    columns = report.sizes.len(),
                    committed = report.committed,
                    unchanged = report.unchanged,
                    total = report.total(),
                    "resize_applied"
                );
            }
            CycleOutcome::Skipped(reason) => {
                tracing::debug!(
                    target: TARGET,
                    trigger = %trigger,
                    reason = reason.as_str(),
                    "resize_skipped"
                );
            }
        }
        outcome
    }

    fn cycle<H: ColumnHost + ?Sized>(&mut self, host: &mut H, trigger: Trigger) -> CycleOutcome {
        if !host.is_ready() {
            return CycleOutcome::Skipped(SkipReason::NotReady);
        }
        if !self.indicator_found {
            self.indicator_found = host.find_indicator();
        }

        let columns = host.columns();
        if columns.is_empty() {
            return CycleOutcome::Skipped(SkipReason::NoColumns);
        }

        let indicator_width = if self.indicator_found {
            effective_indicator_width(host.indicator(), self.config.indicator_fallback_width)
        } else {
            0.0
        };
        let budget = host.extent()
            - (host.insets().horizontal() + self.config.padding_buffer)
            - indicator_width;
        // Written as a negated comparison so a NaN budget is skipped too.
        if !(budget > self.config.min_budget) {
            tracing::warn!(
                target: TARGET,
                trigger = %trigger,
                budget,
                min_budget = self.config.min_budget,
                "budget_too_small"
            );
            return CycleOutcome::Skipped(SkipReason::BudgetTooSmall { budget });
        }

        let (sizes, case, exact_shortfall) = self.allocate(budget, &columns);

        let mut committed = 0;
        let mut unchanged = 0;
        for (index, (column, &size)) in columns.iter().zip(&sizes).enumerate() {
            if (size - column.pref).abs() > self.config.commit_threshold {
                host.commit(index, size);
                committed += 1;
            } else {
                unchanged += 1;
            }
        }

        CycleOutcome::Applied(CycleReport {
            trigger,
            budget,
            indicator_width,
            case,
            sizes,
            committed,
            unchanged,
            exact_shortfall,
        })
    }

    fn allocate(&self, budget: f64, columns: &[Item]) -> (Vec<f64>, AllocationCase, Option<i64>) {
        match self.config.rounding {
            Rounding::Fractional => {
                let alloc = explain(budget, columns);
                (alloc.sizes, alloc.case, None)
            }
            Rounding::Exact => {
                let alloc = explain_exact(budget, columns);
                let shortfall = alloc.shortfall();
                if shortfall != 0 {
                    tracing::warn!(
                        target: TARGET,
                        target_width = alloc.target,
                        sum = alloc.sum(),
                        shortfall,
                        "exact_sum_mismatch"
                    );
                }
                let sizes = alloc.sizes.iter().map(|&size| f64::from(size)).collect();
                (sizes, alloc.case, Some(shortfall))
            }
        }
    }
}

impl Default for ColumnResizer {
    fn default() -> Self {
        Self::new(ResizerConfig::default())
    }
}

/// Width to deduct for the indicator, or 0 when it is hidden or absent.
fn effective_indicator_width(state: Option<IndicatorState>, fallback: f64) -> f64 {
    let Some(state) = state else {
        return 0.0;
    };
    if !state.visible {
        return 0.0;
    }
    if state.width > 0.0 {
        return state.width;
    }
    if state.pref_width > 0.0 {
        tracing::warn!(
            target: TARGET,
            pref_width = state.pref_width,
            "indicator not laid out yet, using preferred width"
        );
        return state.pref_width;
    }
    tracing::error!(
        target: TARGET,
        fallback,
        "indicator visible without a usable width, using fallback"
    );
    fallback
}
