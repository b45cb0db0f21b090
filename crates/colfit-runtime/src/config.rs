//! Resizer configuration and environment overrides.
//!
//! # Environment
//!
//! | Variable | Field | Format |
//! |---|---|---|
//! | `COLFIT_DEBOUNCE_MS` | [`ResizerConfig::debounce`] | whole milliseconds |
//! | `COLFIT_PADDING_BUFFER` | [`ResizerConfig::padding_buffer`] | finite, `>= 0` |
//! | `COLFIT_COMMIT_THRESHOLD` | [`ResizerConfig::commit_threshold`] | finite, `>= 0` |
//! | `COLFIT_ROUNDING` | [`ResizerConfig::rounding`] | `fractional` or `exact` |
//!
//! Unparseable values are logged at `warn` and the default is kept.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Env var overriding [`ResizerConfig::debounce`].
pub const ENV_DEBOUNCE_MS: &str = "COLFIT_DEBOUNCE_MS";
/// Env var overriding [`ResizerConfig::padding_buffer`].
pub const ENV_PADDING_BUFFER: &str = "COLFIT_PADDING_BUFFER";
/// Env var overriding [`ResizerConfig::commit_threshold`].
pub const ENV_COMMIT_THRESHOLD: &str = "COLFIT_COMMIT_THRESHOLD";
/// Env var overriding [`ResizerConfig::rounding`].
pub const ENV_ROUNDING: &str = "COLFIT_ROUNDING";

/// How allocated sizes are rounded before they are committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Rounding {
    /// Commit real-valued sizes as computed.
    #[default]
    Fractional,
    /// Commit whole-unit sizes; the last column absorbs the remainder.
    Exact,
}

impl Rounding {
    /// Stable lowercase name, as accepted by [`FromStr`].
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fractional => "fractional",
            Self::Exact => "exact",
        }
    }
}

impl fmt::Display for Rounding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown [`Rounding`] name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseRoundingError {
    input: String,
}

impl fmt::Display for ParseRoundingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown rounding mode {:?} (expected \"fractional\" or \"exact\")",
            self.input
        )
    }
}

impl std::error::Error for ParseRoundingError {}

impl FromStr for Rounding {
    type Err = ParseRoundingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("fractional") {
            Ok(Self::Fractional)
        } else if trimmed.eq_ignore_ascii_case("exact") {
            Ok(Self::Exact)
        } else {
            Err(ParseRoundingError {
                input: s.to_owned(),
            })
        }
    }
}

/// Tunables for [`ColumnResizer`](crate::ColumnResizer).
#[derive(Debug, Clone, PartialEq)]
pub struct ResizerConfig {
    /// Quiet period before a width change triggers a cycle.
    pub debounce: Duration,
    /// Extra horizontal space kept free beyond the container insets.
    pub padding_buffer: f64,
    /// Indicator width assumed when a visible indicator reports no width.
    pub indicator_fallback_width: f64,
    /// Indicator width changes at or below this are ignored.
    pub indicator_width_epsilon: f64,
    /// Columns whose size changes by this much or less are not committed.
    pub commit_threshold: f64,
    /// Cycles with a budget at or below this are skipped.
    pub min_budget: f64,
    /// Rounding applied to allocated sizes.
    pub rounding: Rounding,
}

impl Default for ResizerConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(60),
            padding_buffer: 4.0,
            indicator_fallback_width: 15.0,
            indicator_width_epsilon: 0.1,
            commit_threshold: 0.5,
            min_budget: 1.0,
            rounding: Rounding::Fractional,
        }
    }
}

impl ResizerConfig {
    /// Set the debounce delay.
    #[must_use]
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    /// Set the padding buffer.
    #[must_use]
    pub fn with_padding_buffer(mut self, padding_buffer: f64) -> Self {
        self.padding_buffer = padding_buffer;
        self
    }

    /// Set the fallback indicator width.
    #[must_use]
    pub fn with_indicator_fallback_width(mut self, width: f64) -> Self {
        self.indicator_fallback_width = width;
        self
    }

    /// Set the indicator width change threshold.
    #[must_use]
    pub fn with_indicator_width_epsilon(mut self, epsilon: f64) -> Self {
        self.indicator_width_epsilon = epsilon;
        self
    }

    /// Set the commit threshold.
    #[must_use]
    pub fn with_commit_threshold(mut self, threshold: f64) -> Self {
        self.commit_threshold = threshold;
        self
    }

    /// Set the minimum budget.
    #[must_use]
    pub fn with_min_budget(mut self, min_budget: f64) -> Self {
        self.min_budget = min_budget;
        self
    }

    /// Set the rounding mode.
    #[must_use]
    pub fn with_rounding(mut self, rounding: Rounding) -> Self {
        self.rounding = rounding;
        self
    }

    /// Defaults overridden by the `COLFIT_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each variable name.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(ENV_DEBOUNCE_MS) {
            match raw.trim().parse::<u64>() {
                Ok(ms) => config.debounce = Duration::from_millis(ms),
                Err(e) => warn_invalid(ENV_DEBOUNCE_MS, &raw, &e),
            }
        }
        if let Some(raw) = lookup(ENV_PADDING_BUFFER) {
            match parse_non_negative(&raw) {
                Ok(value) => config.padding_buffer = value,
                Err(e) => warn_invalid(ENV_PADDING_BUFFER, &raw, &e),
            }
        }
        if let Some(raw) = lookup(ENV_COMMIT_THRESHOLD) {
            match parse_non_negative(&raw) {
                Ok(value) => config.commit_threshold = value,
                Err(e) => warn_invalid(ENV_COMMIT_THRESHOLD, &raw, &e),
            }
        }
        if let Some(raw) = lookup(ENV_ROUNDING) {
            match raw.parse::<Rounding>() {
                Ok(rounding) => config.rounding = rounding,
                Err(e) => warn_invalid(ENV_ROUNDING, &raw, &e),
            }
        }

        config
    }
}

fn parse_non_negative(raw: &str) -> Result<f64, String> {
    let value: f64 = raw.trim().parse().map_err(|e| format!("{e}"))?;
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(format!("{value} is not a finite non-negative number"))
    }
}

fn warn_invalid(var: &str, raw: &str, error: &dyn fmt::Display) {
    tracing::warn!(
        target: "colfit.config",
        var,
        value = raw,
        error = %error,
        "ignoring invalid environment override"
    );
}
