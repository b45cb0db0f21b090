#![forbid(unsafe_code)]

//! Proportional size allocation for resizable sequences.
//!
//! This crate divides a fixed linear budget among an ordered list of items,
//! each carrying a minimum, an optional maximum, and a preferred size:
//!
//! - [`distribute`] - real-valued allocation (grow/shrink by slack share)
//! - [`distribute_exact`] - whole-number allocation whose sum hits the budget
//! - [`Item`] - per-item constraints (`max: None` = unbounded)
//! - [`clamp`] / [`clamp_to`] - bound a value into an item's range
//!
//! Every function here is pure: no state, no I/O, O(n) in the item count.
//!
//! # Example
//!
//! ```
//! use colfit_layout::{Item, distribute};
//!
//! let items = [
//!     Item::at_least(20.0, 100.0),
//!     Item::at_least(20.0, 100.0),
//!     Item::at_least(20.0, 100.0),
//! ];
//!
//! // 60 units of extra space, split evenly across equal potentials.
//! assert_eq!(distribute(360.0, &items), vec![120.0, 120.0, 120.0]);
//! ```
//!
//! # Cases
//!
//! | Condition                       | Result                                 |
//! |---------------------------------|----------------------------------------|
//! | `available < Σmin`              | every item gets its `min`              |
//! | `\|available − Σpref\| < 0.5`   | every item keeps its clamped `pref`    |
//! | `available > Σpref`             | grow by share of grow potential        |
//! | `available < Σpref`             | shrink by share of shrink potential    |

mod distribute;
mod exact;
mod item;

pub use distribute::{Allocation, AllocationCase, distribute, explain, try_distribute};
pub use exact::{ExactAllocation, distribute_exact, explain_exact, try_distribute_exact};
pub use item::{Item, ItemError, ItemProblem, clamp, clamp_to, validate_items};

/// Potentials and proportional bases below this are treated as zero.
pub const EPSILON: f64 = 1e-6;

/// Budget and preferred total closer than this are treated as equal.
///
/// Also the minimum expansion shortfall that triggers a second pass over
/// unbounded items.
pub const EQUAL_TOLERANCE: f64 = 0.5;
