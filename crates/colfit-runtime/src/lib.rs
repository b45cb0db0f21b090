#![forbid(unsafe_code)]

//! Resize driver for column layouts.
//!
//! This crate decides *when* a table's columns are re-fitted to its width and
//! writes the result back; [`colfit_layout`] decides *what* the sizes are.
//!
//! - [`host`]: the [`ColumnHost`] boundary a UI container implements.
//! - [`resizer`]: [`ColumnResizer`], the event-driven driver.
//! - [`config`]: [`ResizerConfig`] with environment overrides.
//! - [`debounce`]: trailing-edge debounce used for width changes.
//! - [`simulator`]: [`TableSimulator`], an in-memory host for tests.
//!
//! Events are emitted through `tracing` under the `colfit.resize` target.

pub mod config;
pub mod debounce;
pub mod host;
pub mod resizer;
pub mod simulator;

pub use config::{ParseRoundingError, ResizerConfig, Rounding};
pub use debounce::{DebounceAction, Debouncer};
pub use host::{ColumnHost, IndicatorState, Insets};
pub use resizer::{ColumnResizer, CycleOutcome, CycleReport, SkipReason, Trigger};
pub use simulator::{Commit, SimColumn, TableSimulator};
