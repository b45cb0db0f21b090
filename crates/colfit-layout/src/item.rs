//! Item constraints, clamping, and input validation.

use std::fmt;

use crate::EPSILON;

/// Constraints and preference for one resizable item.
///
/// This is the 1D snapshot a host takes right before an allocation call.
/// The allocator never stores or mutates it.
///
/// # Example
///
/// ```
/// use colfit_layout::Item;
///
/// // A column that needs 40-200 units, currently 120
/// let item = Item::bounded(40.0, 200.0, 120.0);
///
/// assert_eq!(item.clamp(150.0), 150.0); // Within range
/// assert_eq!(item.clamp(10.0), 40.0);   // Below min
/// assert_eq!(item.clamp(500.0), 200.0); // Above max
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Item {
    /// Smallest permitted size.
    pub min: f64,
    /// Largest permitted size (None = unbounded).
    pub max: Option<f64>,
    /// Current preferred size. Need not lie within `[min, max]`.
    pub pref: f64,
}

impl Item {
    /// Zero item (no minimum, no preference, unbounded).
    pub const ZERO: Self = Self {
        min: 0.0,
        max: None,
        pref: 0.0,
    };

    /// Create an item, repairing malformed constraints.
    ///
    /// See [`Item::sanitized`] for the repair rules.
    #[must_use]
    pub fn new(min: f64, max: Option<f64>, pref: f64) -> Self {
        Self { min, max, pref }.sanitized()
    }

    /// Create a fixed-size item (min = pref = max).
    #[inline]
    pub const fn exact(size: f64) -> Self {
        Self {
            min: size,
            max: Some(size),
            pref: size,
        }
    }

    /// Create an item with minimum and preferred size, unbounded max.
    #[inline]
    pub const fn at_least(min: f64, pref: f64) -> Self {
        Self {
            min,
            max: None,
            pref,
        }
    }

    /// Create an item with an explicit upper bound.
    #[inline]
    pub const fn bounded(min: f64, max: f64, pref: f64) -> Self {
        Self {
            min,
            max: Some(max),
            pref,
        }
    }

    /// Whether the item has no upper limit.
    #[inline]
    pub const fn is_unbounded(&self) -> bool {
        self.max.is_none()
    }

    /// Upper bound as a number (`+∞` when unbounded).
    #[inline]
    pub fn upper(&self) -> f64 {
        self.max.unwrap_or(f64::INFINITY)
    }

    /// Clamp a value to this item's bounds.
    #[inline]
    pub fn clamp(&self, value: f64) -> f64 {
        clamp(value, self.min, self.upper())
    }

    /// How much the item could grow past its preference.
    ///
    /// Bounded items report `max − pref` (zero when that is not positive).
    /// Unbounded items report `max(1, pref)`, so wider items absorb more and
    /// an empty one still carries weight.
    pub fn grow_potential(&self) -> f64 {
        match self.max {
            None => self.pref.max(1.0),
            Some(max) => {
                let potential = max - self.pref;
                if potential > EPSILON { potential } else { 0.0 }
            }
        }
    }

    /// How much the item could shrink before reaching its minimum.
    pub fn shrink_potential(&self) -> f64 {
        let potential = self.pref - self.min;
        if potential > EPSILON { potential } else { 0.0 }
    }

    /// Repair constraints so that `0 <= min <= max` and `pref` is finite.
    ///
    /// - a negative, NaN, or infinite `min` becomes `0`
    /// - a NaN, infinite, or `f64::MAX` `max` becomes unbounded
    /// - a `max` below `min` is raised to `min`
    /// - a non-finite `pref` becomes `min`; a negative one becomes `0`
    ///
    /// Well-formed items come back unchanged.
    #[must_use]
    pub fn sanitized(self) -> Self {
        let min = if self.min.is_finite() && self.min > 0.0 {
            self.min
        } else {
            0.0
        };
        let max = match self.max {
            Some(max) if max.is_nan() || max == f64::INFINITY || max == f64::MAX => None,
            Some(max) => Some(max.max(min)),
            None => None,
        };
        let pref = if self.pref.is_finite() {
            self.pref.max(0.0)
        } else {
            min
        };
        Self { min, max, pref }
    }

    /// Check the constraints without repairing them.
    pub fn check(&self) -> Result<(), ItemProblem> {
        if !self.min.is_finite() || self.min < 0.0 {
            return Err(ItemProblem::InvalidMin { min: self.min });
        }
        if let Some(max) = self.max
            && (max.is_nan() || max < self.min)
        {
            return Err(ItemProblem::MaxBelowMin { min: self.min, max });
        }
        if !self.pref.is_finite() || self.pref < 0.0 {
            return Err(ItemProblem::InvalidPref { pref: self.pref });
        }
        Ok(())
    }
}

/// Bound `value` into `[min, max]`.
///
/// Total for all finite inputs. `min <= max` is the caller's precondition;
/// when violated, `min` wins. Unlike [`f64::clamp`] this never panics.
#[inline]
pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}

/// Bound `value` into the range of `item`, honoring an unbounded max.
#[inline]
pub fn clamp_to(item: &Item, value: f64) -> f64 {
    item.clamp(value)
}

/// Check every item, reporting the first malformed one.
pub fn validate_items(items: &[Item]) -> Result<(), ItemError> {
    for (index, item) in items.iter().enumerate() {
        item.check()
            .map_err(|problem| ItemError { index, problem })?;
    }
    Ok(())
}

/// What is wrong with a single item.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ItemProblem {
    /// `min` is negative or not finite.
    InvalidMin { min: f64 },
    /// `max` is NaN or smaller than `min`.
    MaxBelowMin { min: f64, max: f64 },
    /// `pref` is negative or not finite.
    InvalidPref { pref: f64 },
}

impl fmt::Display for ItemProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidMin { min } => write!(f, "min must be finite and >= 0 (got {min})"),
            Self::MaxBelowMin { min, max } => {
                write!(f, "max {max} is below min {min}")
            }
            Self::InvalidPref { pref } => {
                write!(f, "pref must be finite and >= 0 (got {pref})")
            }
        }
    }
}

impl std::error::Error for ItemProblem {}

/// A malformed item in an allocation request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ItemError {
    /// Position of the offending item.
    pub index: usize,
    pub problem: ItemProblem,
}

impl fmt::Display for ItemError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid item at index {}: {}", self.index, self.problem)
    }
}

impl std::error::Error for ItemError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.problem)
    }
}
