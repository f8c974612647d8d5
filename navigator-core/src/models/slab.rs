use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::money::format_inr_whole;

/// One progressive tax slab.
///
/// A slab taxes the portion of taxable income above `lower_bound` and up to
/// `upper_bound` at `rate`. The top slab of a schedule has no upper bound.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeSlab {
    pub lower_bound: Decimal,
    /// `None` marks the open-ended top slab.
    pub upper_bound: Option<Decimal>,
    /// Fractional rate, e.g. `0.05` for 5%.
    pub rate: Decimal,
}

impl IncomeSlab {
    /// Portion of `taxable_income` that falls inside this slab.
    ///
    /// # Example
    ///
    /// ```
    /// use navigator_core::models::IncomeSlab;
    /// use rust_decimal::Decimal;
    ///
    /// let slab = IncomeSlab {
    ///     lower_bound: Decimal::from(250_000),
    ///     upper_bound: Some(Decimal::from(500_000)),
    ///     rate: Decimal::new(5, 2),
    /// };
    /// assert_eq!(slab.income_within(Decimal::from(600_000)), Decimal::from(250_000));
    /// ```
    pub fn income_within(&self, taxable_income: Decimal) -> Decimal {
        let ceiling = self.upper_bound.unwrap_or(Decimal::MAX);
        (taxable_income.min(ceiling) - self.lower_bound).max(Decimal::ZERO)
    }

    /// Label for reports, e.g. `up to ₹2,50,000` or `₹2,50,000 to ₹5,00,000`.
    pub fn range_label(&self) -> String {
        match self.upper_bound {
            Some(upper) if self.lower_bound.is_zero() => {
                format!("up to {}", format_inr_whole(upper))
            }
            Some(upper) => format!(
                "{} to {}",
                format_inr_whole(self.lower_bound),
                format_inr_whole(upper)
            ),
            None => format!("above {}", format_inr_whole(self.lower_bound)),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SlabScheduleError {
    #[error("a slab schedule needs at least one slab")]
    Empty,
    #[error("the first slab must start at 0, found {0}")]
    FirstSlabNotAtZero(Decimal),
    #[error("the last slab must have no upper bound, found {0}")]
    LastSlabBounded(Decimal),
    #[error("slabs must be contiguous: expected a slab starting at {expected}, found {found}")]
    NotContiguous { expected: Decimal, found: Decimal },
    #[error("slab upper bound {upper} is not above its lower bound {lower}")]
    InvalidBounds { lower: Decimal, upper: Decimal },
    #[error("slab rate {0} is outside 0..=1")]
    InvalidRate(Decimal),
    #[error("only the last slab may be unbounded, found an open slab at {0}")]
    UnboundedBeforeLast(Decimal),
}

/// A complete slab schedule covering every rupee of taxable income.
///
/// Valid schedules start at zero, are contiguous, and end in a single
/// open-ended slab, so any non-negative taxable income lands somewhere.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlabSchedule(Vec<IncomeSlab>);

impl SlabSchedule {
    pub fn new(slabs: Vec<IncomeSlab>) -> Result<Self, SlabScheduleError> {
        let schedule = Self(slabs);
        schedule.validate()?;
        Ok(schedule)
    }

    pub fn slabs(&self) -> &[IncomeSlab] {
        &self.0
    }

    /// Re-checks the schedule invariants.
    ///
    /// Deserialized schedules skip [`SlabSchedule::new`], so configuration
    /// validation calls this before any calculation runs.
    pub fn validate(&self) -> Result<(), SlabScheduleError> {
        let Some(first) = self.0.first() else {
            return Err(SlabScheduleError::Empty);
        };
        if !first.lower_bound.is_zero() {
            return Err(SlabScheduleError::FirstSlabNotAtZero(first.lower_bound));
        }

        let mut expected = Decimal::ZERO;
        for (index, slab) in self.0.iter().enumerate() {
            if slab.rate < Decimal::ZERO || slab.rate > Decimal::ONE {
                return Err(SlabScheduleError::InvalidRate(slab.rate));
            }
            if slab.lower_bound != expected {
                return Err(SlabScheduleError::NotContiguous {
                    expected,
                    found: slab.lower_bound,
                });
            }
            match slab.upper_bound {
                Some(upper) => {
                    if upper <= slab.lower_bound {
                        return Err(SlabScheduleError::InvalidBounds {
                            lower: slab.lower_bound,
                            upper,
                        });
                    }
                    expected = upper;
                }
                None if index + 1 < self.0.len() => {
                    return Err(SlabScheduleError::UnboundedBeforeLast(slab.lower_bound));
                }
                None => {}
            }
        }

        match self.0.last() {
            Some(last) => match last.upper_bound {
                Some(upper) => Err(SlabScheduleError::LastSlabBounded(upper)),
                None => Ok(()),
            },
            None => Err(SlabScheduleError::Empty),
        }
    }
}
