//! Whole-number allocation with a designated remainder absorber.
//!
//! Every item but the last gets its real-valued size rounded to the nearest
//! integer (then re-clamped to whole bounds). The last item takes whatever is
//! left of `floor(available)`. That keeps the pass O(n) and makes the total
//! exact whenever the last item's bounds allow it; the last slot is a
//! balancing slot, not an independently fair share.
//!
//! # Failure Modes
//!
//! - **Floors push the rest over budget**: the last item is forced to its
//!   minimum and the sum overshoots `target`. Reported via
//!   [`ExactAllocation::shortfall`], never as an error.
//! - **Last item capped**: the remainder exceeds `floor(max)`, so the sum
//!   falls short of `target`.
//! - **Fractional fixed item** (`floor(max) < ceil(min)`): the whole upper
//!   bound is raised to `ceil(min)`.
//! - **`pref` below `min` while growing**: the real-valued pass lifts the
//!   item to `min` without taking the excess back from the others, so the
//!   leading items already exceed `target`. The last item bottoms out at its
//!   minimum and the sum overshoots.
//! - **Budgets past `u32::MAX`**: whole sizes are `u32`, so `target` and
//!   every size saturate at `u32::MAX`.

use crate::distribute::{AllocationCase, explain_sanitized};
use crate::item::{Item, ItemError, validate_items};

/// Integer allocation plus its target, for shortfall reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExactAllocation {
    /// One whole size per input item, same order.
    pub sizes: Vec<u32>,
    /// `floor(available)`, or 0 for a negative or non-finite budget.
    /// Saturates at `u32::MAX`.
    pub target: u32,
    /// Branch taken by the underlying real-valued distribution.
    pub case: AllocationCase,
}

impl ExactAllocation {
    /// Sum of the produced sizes.
    #[must_use]
    pub fn sum(&self) -> u64 {
        self.sizes.iter().map(|&size| u64::from(size)).sum()
    }

    /// `target − sum`: positive when short, negative when over.
    #[must_use]
    pub fn shortfall(&self) -> i64 {
        i64::from(self.target) - self.sum() as i64
    }

    /// Whether the sizes add up to the target exactly.
    #[must_use]
    pub fn is_exact(&self) -> bool {
        self.shortfall() == 0
    }
}

/// Distribute `available` among `items` in whole units.
///
/// # Example
///
/// ```
/// use colfit_layout::{Item, distribute_exact};
///
/// let items = [
///     Item::at_least(0.0, 100.4),
///     Item::at_least(0.0, 100.3),
///     Item::at_least(0.0, 100.3),
/// ];
/// // 100.4 -> 100, 100.3 -> 100, last absorbs 301 - 200
/// assert_eq!(distribute_exact(301.0, &items), vec![100, 100, 101]);
/// ```
#[must_use]
pub fn distribute_exact(available: f64, items: &[Item]) -> Vec<u32> {
    explain_exact(available, items).sizes
}

/// Like [`distribute_exact`], but rejects malformed items instead of repairing them.
pub fn try_distribute_exact(available: f64, items: &[Item]) -> Result<Vec<u32>, ItemError> {
    validate_items(items)?;
    Ok(distribute_exact(available, items))
}

/// Like [`distribute_exact`], additionally reporting the target and branch.
#[must_use]
pub fn explain_exact(available: f64, items: &[Item]) -> ExactAllocation {
    let items: Vec<Item> = items.iter().map(|item| item.sanitized()).collect();
    let ideal = explain_sanitized(available, &items);
    let target = whole_target(available);

    let Some((last, rest)) = items.split_last() else {
        return ExactAllocation {
            sizes: Vec::new(),
            target,
            case: ideal.case,
        };
    };

    let mut sizes = Vec::with_capacity(items.len());
    let mut running: i64 = 0;
    for (item, &size) in rest.iter().zip(&ideal.sizes) {
        let rounded = clamp_whole(item, size.round());
        running += i64::from(rounded);
        sizes.push(rounded);
    }

    let remainder = i64::from(target) - running;
    sizes.push(clamp_whole(last, remainder as f64));

    ExactAllocation {
        sizes,
        target,
        case: ideal.case,
    }
}

fn whole_target(available: f64) -> u32 {
    if available.is_finite() {
        // Saturating cast: negatives become 0, huge budgets u32::MAX.
        available.floor() as u32
    } else {
        0
    }
}

/// Clamp into `[ceil(min), floor(max)]` and convert to whole units.
fn clamp_whole(item: &Item, value: f64) -> u32 {
    let lower = item.min.ceil();
    let mut bounded = value.max(lower);
    if let Some(max) = item.max {
        bounded = bounded.min(max.floor().max(lower));
    }
    bounded as u32
}
