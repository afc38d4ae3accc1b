//! Invoice output types produced by the reconciliation engine.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::plan::PlanId;

/// One billed interval: a single plan over a closed date range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceLine {
  pub plan:           PlanId,
  /// First billed day, inclusive.
  pub start:          NaiveDate,
  /// Last billed day, inclusive.
  pub end:            NaiveDate,
  /// `end - start + 1`.
  pub days:           u32,
  /// Daily rate times days, unrounded.
  pub amount_exact:   Decimal,
  /// `amount_exact` rounded half away from zero to two decimal places.
  pub amount_rounded: Decimal,
}

/// The priced breakdown of one billing month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciliationResult {
  pub year:          i32,
  pub month:         u32,
  /// Chronological, non-overlapping lines.
  pub lines:         Vec<InvoiceLine>,
  /// Sum of unrounded line amounts.
  pub total_exact:   Decimal,
  /// Sum of the per-line rounded amounts. Not `round(total_exact)`: line
  /// rounding error is carried into the total.
  pub total_rounded: Decimal,
}

impl ReconciliationResult {
  /// A result with no billed lines and zero totals.
  pub fn empty(year: i32, month: u32) -> Self {
    Self {
      year,
      month,
      lines: Vec::new(),
      total_exact: Decimal::ZERO,
      total_rounded: Decimal::ZERO,
    }
  }

  pub fn is_empty(&self) -> bool { self.lines.is_empty() }

  /// Total number of billed days across all lines.
  pub fn billed_days(&self) -> u32 { self.lines.iter().map(|l| l.days).sum() }
}
