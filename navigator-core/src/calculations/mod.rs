//! Tax calculation modules for the regime navigator.
//!
//! This module provides the liability computation for a single regime, the
//! side-by-side comparison of both, and the shared arithmetic helpers.

pub mod common;
pub mod comparison;
pub mod deductions;
pub mod liability;

pub use comparison::RegimeComparison;
pub use deductions::{AppliedDeduction, DeductionBreakdown, RegimeWarning};
pub use liability::{ComputeError, RebateOutcome, RegimeCalculator, SlabTax, TaxComputation};
