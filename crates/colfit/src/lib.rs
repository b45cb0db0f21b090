#![forbid(unsafe_code)]

//! colfit public facade crate.
//!
//! Re-exports the allocator from `colfit-layout` and, with the default
//! `runtime` feature, the resize driver from `colfit-runtime`.
//!
//! ```
//! use colfit::prelude::*;
//!
//! let columns = [Item::bounded(50.0, 200.0, 100.0); 2];
//! assert_eq!(distribute(120.0, &columns), vec![60.0, 60.0]);
//! ```

// --- Allocator re-exports --------------------------------------------------

pub use colfit_layout::{
    Allocation, AllocationCase, EPSILON, EQUAL_TOLERANCE, ExactAllocation, Item, ItemError,
    ItemProblem, clamp, clamp_to, distribute, distribute_exact, explain, explain_exact,
    try_distribute, try_distribute_exact, validate_items,
};

// --- Runtime re-exports ----------------------------------------------------

#[cfg(feature = "runtime")]
pub use colfit_runtime::{
    ColumnHost, ColumnResizer, CycleOutcome, CycleReport, IndicatorState, Insets, ResizerConfig,
    Rounding, SkipReason, TableSimulator, Trigger,
};

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{Item, distribute, distribute_exact};

    #[cfg(feature = "runtime")]
    pub use crate::{ColumnHost, ColumnResizer, CycleOutcome, ResizerConfig, Rounding};

    pub use crate::layout;
    #[cfg(feature = "runtime")]
    pub use crate::runtime;
}

pub use colfit_layout as layout;
#[cfg(feature = "runtime")]
pub use colfit_runtime as runtime;
