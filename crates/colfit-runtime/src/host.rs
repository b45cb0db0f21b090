//! Host boundary: what a UI container must expose to be resized.
//!
//! The resizer never touches a widget toolkit directly. A host adapts its
//! table (or any row of resizable columns) to [`ColumnHost`], and forwards
//! its change notifications to the matching `on_*` methods of
//! [`ColumnResizer`](crate::ColumnResizer).

use colfit_layout::Item;

/// Horizontal padding of the container.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Insets {
    pub left: f64,
    pub right: f64,
}

impl Insets {
    /// No padding.
    pub const ZERO: Self = Self {
        left: 0.0,
        right: 0.0,
    };

    /// Create insets from left and right padding.
    pub const fn new(left: f64, right: f64) -> Self {
        Self { left, right }
    }

    /// Create equal padding on both sides.
    pub const fn symmetric(padding: f64) -> Self {
        Self::new(padding, padding)
    }

    /// Total horizontal padding.
    #[inline]
    pub fn horizontal(&self) -> f64 {
        self.left + self.right
    }
}

/// Snapshot of the container's vertical scroll indicator.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct IndicatorState {
    /// Whether the indicator is currently shown.
    pub visible: bool,
    /// Laid-out width (0 before the first layout pass).
    pub width: f64,
    /// Preferred width, used when the laid-out width is not known yet.
    pub pref_width: f64,
}

impl IndicatorState {
    /// A visible indicator with a known width.
    pub const fn visible(width: f64) -> Self {
        Self {
            visible: true,
            width,
            pref_width: width,
        }
    }

    /// A hidden indicator.
    pub const fn hidden(width: f64) -> Self {
        Self {
            visible: false,
            width,
            pref_width: width,
        }
    }
}

/// A container whose visible columns the resizer keeps filling its width.
pub trait ColumnHost {
    /// Whether the container is part of a live display tree.
    ///
    /// Consulted by [`ColumnResizer::install`](crate::ColumnResizer::install)
    /// to decide whether to attach right away.
    fn is_attached(&self) -> bool;

    /// Whether the container is visible with positive width and height.
    fn is_ready(&self) -> bool;

    /// Current container width.
    fn extent(&self) -> f64;

    /// Container padding.
    fn insets(&self) -> Insets;

    /// Look up the vertical scroll indicator. Returns whether one was found.
    ///
    /// May be expensive; the resizer calls it only until it succeeds.
    fn find_indicator(&mut self) -> bool;

    /// Current state of the indicator found by [`find_indicator`](Self::find_indicator).
    fn indicator(&self) -> Option<IndicatorState>;

    /// Constraint snapshot of the visible columns, in display order.
    fn columns(&self) -> Vec<Item>;

    /// Write a new preferred size into the visible column at `index`.
    fn commit(&mut self, index: usize, size: f64);
}
