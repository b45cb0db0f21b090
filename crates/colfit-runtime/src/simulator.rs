//! In-memory table host for tests and demos.
//!
//! `TableSimulator` implements [`ColumnHost`] without any UI toolkit: it
//! keeps named columns with constraints, a container width, and an optional
//! scroll indicator, and records every size the resizer commits.
//!
//! # Example
//!
//! ```
//! use colfit_layout::Item;
//! use colfit_runtime::{ColumnResizer, ResizerConfig, TableSimulator};
//! use std::time::Instant;
//!
//! let mut table = TableSimulator::new(364.0)
//!     .with_column("a", Item::at_least(20.0, 100.0))
//!     .with_column("b", Item::at_least(20.0, 100.0))
//!     .with_column("c", Item::at_least(20.0, 100.0));
//! let mut resizer = ColumnResizer::install(&mut table, ResizerConfig::default());
//!
//! // 364 − 4 padding leaves 360 for three equal columns.
//! resizer.tick(&mut table, Instant::now());
//! assert_eq!(table.preferred_sizes(), vec![120.0, 120.0, 120.0]);
//! ```

use colfit_layout::Item;

use crate::host::{ColumnHost, IndicatorState, Insets};

/// A column of the simulated table.
#[derive(Debug, Clone, PartialEq)]
pub struct SimColumn {
    pub name: String,
    pub item: Item,
    pub visible: bool,
}

/// A size written back by the resizer.
#[derive(Debug, Clone, PartialEq)]
pub struct Commit {
    /// Column name.
    pub column: String,
    pub size: f64,
}

/// Deterministic [`ColumnHost`] backed by plain data.
#[derive(Debug, Clone)]
pub struct TableSimulator {
    extent: f64,
    height: f64,
    shown: bool,
    attached: bool,
    insets: Insets,
    indicator: Option<IndicatorState>,
    /// Lookups that fail before the indicator can be found.
    indicator_delay: u32,
    indicator_found: bool,
    lookups: u32,
    columns: Vec<SimColumn>,
    commits: Vec<Commit>,
}

impl TableSimulator {
    /// A shown, attached table of the given width with no columns.
    #[must_use]
    pub fn new(extent: f64) -> Self {
        Self {
            extent,
            height: 400.0,
            shown: true,
            attached: true,
            insets: Insets::ZERO,
            indicator: None,
            indicator_delay: 0,
            indicator_found: false,
            lookups: 0,
            columns: Vec::new(),
            commits: Vec::new(),
        }
    }

    /// Append a visible column.
    #[must_use]
    pub fn with_column(mut self, name: impl Into<String>, item: Item) -> Self {
        self.columns.push(SimColumn {
            name: name.into(),
            item,
            visible: true,
        });
        self
    }

    #[must_use]
    pub fn with_insets(mut self, insets: Insets) -> Self {
        self.insets = insets;
        self
    }

    /// Give the table a scroll indicator.
    #[must_use]
    pub fn with_indicator(mut self, state: IndicatorState) -> Self {
        self.indicator = Some(state);
        self
    }

    /// Make the first `lookups` indicator lookups fail, as when the table
    /// has not built its scroll bars yet.
    #[must_use]
    pub fn with_indicator_delay(mut self, lookups: u32) -> Self {
        self.indicator_delay = lookups;
        self
    }

    /// Start outside a live display tree.
    #[must_use]
    pub fn detached(mut self) -> Self {
        self.attached = false;
        self
    }

    pub fn set_extent(&mut self, extent: f64) {
        self.extent = extent;
    }

    pub fn set_height(&mut self, height: f64) {
        self.height = height;
    }

    pub fn set_shown(&mut self, shown: bool) {
        self.shown = shown;
    }

    pub fn set_attached(&mut self, attached: bool) {
        self.attached = attached;
    }

    /// Replace the indicator state. Returns the previous state.
    pub fn set_indicator(&mut self, state: IndicatorState) -> Option<IndicatorState> {
        self.indicator.replace(state)
    }

    /// Show or hide a column by name. Returns whether the column exists.
    pub fn set_column_visible(&mut self, name: &str, visible: bool) -> bool {
        match self.columns.iter_mut().find(|column| column.name == name) {
            Some(column) => {
                column.visible = visible;
                true
            }
            None => false,
        }
    }

    /// Append a visible column at runtime.
    pub fn push_column(&mut self, name: impl Into<String>, item: Item) {
        self.columns.push(SimColumn {
            name: name.into(),
            item,
            visible: true,
        });
    }

    /// Look up a column by name.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&SimColumn> {
        self.columns.iter().find(|column| column.name == name)
    }

    /// Preferred sizes of the visible columns, in order.
    #[must_use]
    pub fn preferred_sizes(&self) -> Vec<f64> {
        self.visible_columns().map(|column| column.item.pref).collect()
    }

    /// All commits so far, oldest first.
    #[must_use]
    pub fn commits(&self) -> &[Commit] {
        &self.commits
    }

    /// Drain the commit log.
    pub fn take_commits(&mut self) -> Vec<Commit> {
        std::mem::take(&mut self.commits)
    }

    /// Number of indicator lookups performed.
    #[must_use]
    pub fn indicator_lookups(&self) -> u32 {
        self.lookups
    }

    fn visible_columns(&self) -> impl Iterator<Item = &SimColumn> {
        self.columns.iter().filter(|column| column.visible)
    }
}

impl ColumnHost for TableSimulator {
    fn is_attached(&self) -> bool {
        self.attached
    }

    fn is_ready(&self) -> bool {
        self.shown && self.extent > 0.0 && self.height > 0.0
    }

    fn extent(&self) -> f64 {
        self.extent
    }

    fn insets(&self) -> Insets {
        self.insets
    }

    fn find_indicator(&mut self) -> bool {
        self.lookups += 1;
        if self.indicator_delay > 0 {
            self.indicator_delay -= 1;
            return false;
        }
        self.indicator_found = self.indicator.is_some();
        self.indicator_found
    }

    fn indicator(&self) -> Option<IndicatorState> {
        if self.indicator_found {
            self.indicator
        } else {
            None
        }
    }

    fn columns(&self) -> Vec<Item> {
        self.visible_columns().map(|column| column.item).collect()
    }

    fn commit(&mut self, index: usize, size: f64) {
        let Some(column) = self
            .columns
            .iter_mut()
            .filter(|column| column.visible)
            .nth(index)
        else {
            return;
        };
        column.item.pref = size;
        self.commits.push(Commit {
            column: column.name.clone(),
            size,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn columns_skip_hidden() {
        let mut table = TableSimulator::new(300.0)
            .with_column("a", Item::exact(10.0))
            .with_column("b", Item::exact(20.0))
            .with_column("c", Item::exact(30.0));
        assert!(table.set_column_visible("b", false));
        assert!(!table.set_column_visible("zz", false));
        assert_eq!(table.preferred_sizes(), vec![10.0, 30.0]);
    }

    #[test]
    fn commit_maps_visible_index_to_column() {
        let mut table = TableSimulator::new(300.0)
            .with_column("a", Item::at_least(0.0, 10.0))
            .with_column("b", Item::at_least(0.0, 20.0))
            .with_column("c", Item::at_least(0.0, 30.0));
        table.set_column_visible("a", false);
        table.commit(1, 99.0);
        assert_eq!(table.column("c").map(|c| c.item.pref), Some(99.0));
        assert_eq!(
            table.take_commits(),
            vec![Commit {
                column: "c".into(),
                size: 99.0
            }]
        );
        assert!(table.commits().is_empty());
    }

    #[test]
    fn commit_out_of_range_is_ignored() {
        let mut table = TableSimulator::new(300.0).with_column("a", Item::exact(10.0));
        table.commit(5, 1.0);
        assert!(table.commits().is_empty());
    }

    #[test]
    fn indicator_lookup_honours_delay() {
        let mut table = TableSimulator::new(300.0)
            .with_indicator(IndicatorState::visible(15.0))
            .with_indicator_delay(1);
        assert!(!table.find_indicator());
        assert_eq!(table.indicator(), None);
        assert!(table.find_indicator());
        assert_eq!(table.indicator(), Some(IndicatorState::visible(15.0)));
        assert_eq!(table.indicator_lookups(), 2);
    }

    #[test]
    fn readiness_requires_area_and_visibility() {
        let mut table = TableSimulator::new(300.0);
        assert!(table.is_ready());
        table.set_height(0.0);
        assert!(!table.is_ready());
        table.set_height(10.0);
        table.set_shown(false);
        assert!(!table.is_ready());
    }
}
