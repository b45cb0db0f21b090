//! Real-valued proportional distribution.
//!
//! # Algorithm
//!
//! Four mutually exclusive cases, checked in order:
//!
//! 1. **Insufficient** (`available < Σmin`, or `available` not finite):
//!    every item is pinned to its minimum. This is the only case that may
//!    leave the total away from the budget on the low side of intent.
//! 2. **Exact fit** (`|available − Σpref| < 0.5`): keep each clamped `pref`.
//! 3. **Expansion**: split `available − Σpref` by grow potential, clamp, then
//!    hand any shortfall left by clamping to the unbounded items.
//! 4. **Contraction**: split `Σpref − available` by shrink potential, clamp.
//!    There is no second pass here; the remaining deficit after clamping is
//!    left in place.
//!
//! An item whose `pref` sits below its `min` is pulled up to `min` by the
//! first expansion clamp. That consumes more than its share of the extra
//! space and leaves a negative shortfall. No pass takes it back, so the
//! total lands above `available`.
//!
//! # Failure Modes
//!
//! | Condition                  | Behavior                         |
//! |----------------------------|----------------------------------|
//! | Empty item list            | Empty result                     |
//! | Zero total potential       | Clamped prefs                    |
//! | NaN / ±∞ budget            | Treated as insufficient          |
//! | Σpref overflows to ∞       | Clamped prefs (`NoShrink`)       |
//! | `pref < min` while growing | Total overshoots the budget      |
//! | Malformed item             | Repaired via [`Item::sanitized`] |

use crate::item::{Item, ItemError, clamp, validate_items};
use crate::{EPSILON, EQUAL_TOLERANCE};

/// Which branch of the distribution produced an [`Allocation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AllocationCase {
    /// No items were supplied.
    Empty,
    /// Budget below the total minimum; every item at `min`.
    Insufficient,
    /// Budget within tolerance of the preferred total.
    ExactFit,
    /// Budget above the preferred total but nothing can grow.
    NoGrowth,
    /// Extra space distributed by grow potential.
    Expanded {
        /// Whether a clamping shortfall was handed to unbounded items.
        redistributed: bool,
    },
    /// Budget below the preferred total but nothing can shrink.
    NoShrink,
    /// Deficit distributed by shrink potential.
    Contracted,
}

impl AllocationCase {
    /// Get the stable string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Insufficient => "insufficient",
            Self::ExactFit => "exact_fit",
            Self::NoGrowth => "no_growth",
            Self::Expanded {
                redistributed: false,
            } => "expanded",
            Self::Expanded {
                redistributed: true,
            } => "expanded_redistributed",
            Self::NoShrink => "no_shrink",
            Self::Contracted => "contracted",
        }
    }
}

impl std::fmt::Display for AllocationCase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a distribution together with how it was reached.
#[derive(Debug, Clone, PartialEq)]
pub struct Allocation {
    /// One size per input item, same order.
    pub sizes: Vec<f64>,
    /// Branch taken.
    pub case: AllocationCase,
    /// Σmin over the (sanitized) input.
    pub total_min: f64,
    /// Σpref over the (sanitized) input.
    pub total_pref: f64,
}

impl Allocation {
    /// Sum of the produced sizes.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.sizes.iter().sum()
    }
}

/// Distribute `available` among `items`.
///
/// Returns one size per item, in input order, each within the item's
/// `[min, max]`. Never fails; malformed items are repaired first.
///
/// # Example
///
/// ```
/// use colfit_layout::{Item, distribute};
///
/// let items = [
///     Item::bounded(50.0, 200.0, 100.0),
///     Item::bounded(50.0, 200.0, 100.0),
/// ];
/// // 80 units too wide; equal shrink potential, so each loses 40.
/// assert_eq!(distribute(120.0, &items), vec![60.0, 60.0]);
/// ```
#[must_use]
pub fn distribute(available: f64, items: &[Item]) -> Vec<f64> {
    explain(available, items).sizes
}

/// Like [`distribute`], but rejects malformed items instead of repairing them.
pub fn try_distribute(available: f64, items: &[Item]) -> Result<Vec<f64>, ItemError> {
    validate_items(items)?;
    Ok(distribute(available, items))
}

/// Like [`distribute`], additionally reporting the branch taken and totals.
#[must_use]
pub fn explain(available: f64, items: &[Item]) -> Allocation {
    let items: Vec<Item> = items.iter().map(|item| item.sanitized()).collect();
    explain_sanitized(available, &items)
}

/// Core distribution over items already passed through [`Item::sanitized`].
pub(crate) fn explain_sanitized(available: f64, items: &[Item]) -> Allocation {
    if items.is_empty() {
        return Allocation {
            sizes: Vec::new(),
            case: AllocationCase::Empty,
            total_min: 0.0,
            total_pref: 0.0,
        };
    }

    let total_min: f64 = items.iter().map(|item| item.min).sum();
    let total_pref: f64 = items.iter().map(|item| item.pref).sum();

    let (sizes, case) = if !available.is_finite() || available < total_min {
        (
            items.iter().map(|item| item.min).collect(),
            AllocationCase::Insufficient,
        )
    } else if !total_pref.is_finite() {
        // Finite prefs whose sum overflows: nothing proportional is computable.
        (clamped_prefs(items), AllocationCase::NoShrink)
    } else if (available - total_pref).abs() < EQUAL_TOLERANCE {
        (clamped_prefs(items), AllocationCase::ExactFit)
    } else if available > total_pref {
        expand(available - total_pref, items)
    } else {
        contract(total_pref - available, items)
    };

    Allocation {
        sizes,
        case,
        total_min,
        total_pref,
    }
}

/// `amount · part / total`, switching to `amount · (part / total)` when the
/// product overflows. An overflowed `total` gives every part a zero share.
fn share_of(amount: f64, part: f64, total: f64) -> f64 {
    let share = amount * part / total;
    if share.is_finite() {
        share
    } else {
        amount * (part / total)
    }
}

fn clamped_prefs(items: &[Item]) -> Vec<f64> {
    items.iter().map(|item| item.clamp(item.pref)).collect()
}

fn expand(extra: f64, items: &[Item]) -> (Vec<f64>, AllocationCase) {
    let total_potential: f64 = items.iter().map(Item::grow_potential).sum();
    if total_potential < EPSILON {
        return (clamped_prefs(items), AllocationCase::NoGrowth);
    }

    let mut sizes: Vec<f64> = items
        .iter()
        .map(|item| {
            let share = share_of(extra, item.grow_potential(), total_potential);
            item.clamp(item.pref + share)
        })
        .collect();

    // Clamping at max (or pulling an overshooting pref down to max) can leave
    // part of `extra` unplaced.
    let absorbed: f64 = sizes
        .iter()
        .zip(items)
        .map(|(size, item)| size - item.pref)
        .sum();
    let shortfall = extra - absorbed;

    let unbounded = items.iter().filter(|item| item.is_unbounded()).count();
    if shortfall <= EQUAL_TOLERANCE || unbounded == 0 {
        return (
            sizes,
            AllocationCase::Expanded {
                redistributed: false,
            },
        );
    }

    let base: f64 = sizes
        .iter()
        .zip(items)
        .filter(|(_, item)| item.is_unbounded())
        .map(|(size, _)| *size)
        .sum();

    for (size, item) in sizes.iter_mut().zip(items) {
        if !item.is_unbounded() {
            continue;
        }
        let bonus = if base > 0.0 {
            share_of(shortfall, *size, base)
        } else {
            shortfall / unbounded as f64
        };
        *size = clamp(*size + bonus, item.min, f64::INFINITY);
    }

    (
        sizes,
        AllocationCase::Expanded {
            redistributed: true,
        },
    )
}

fn contract(deficit: f64, items: &[Item]) -> (Vec<f64>, AllocationCase) {
    let total_potential: f64 = items.iter().map(Item::shrink_potential).sum();
    if total_potential < EPSILON {
        return (clamped_prefs(items), AllocationCase::NoShrink);
    }

    let sizes = items
        .iter()
        .map(|item| {
            let share = share_of(deficit, item.shrink_potential(), total_potential);
            item.clamp(item.pref - share)
        })
        .collect();

    (sizes, AllocationCase::Contracted)
}
