//! Plain-text invoice layout.
//!
//! ```text
//! Invoice Breakdown
//! For: April, 2024
//!
//! Basic: Apr 01 -> Apr 04 #4 day(s) = $1.33
//! Premium: Apr 05 -> Apr 15 #11 day(s) = $11.00
//!
//! Total: $12.33
//! ```

use chrono::{Month, NaiveDate};
use proration_core::invoice::{InvoiceLine, ReconciliationResult};

// ─── Field formatting ─────────────────────────────────────────────────────────

/// English month name, or the bare number if `month` is not a calendar month.
fn month_name(month: u32) -> String {
  u8::try_from(month)
    .ok()
    .and_then(|m| Month::try_from(m).ok())
    .map(|m| m.name().to_string())
    .unwrap_or_else(|| month.to_string())
}

fn short_date(date: NaiveDate) -> String { date.format("%b %d").to_string() }

fn line(l: &InvoiceLine) -> String {
  format!(
    "{}: {} -> {} #{} day(s) = ${:.2}",
    l.plan,
    short_date(l.start),
    short_date(l.end),
    l.days,
    l.amount_rounded
  )
}

// ─── Document ─────────────────────────────────────────────────────────────────

pub(crate) fn render(result: &ReconciliationResult) -> String {
  let mut lines = vec![
    "Invoice Breakdown".to_string(),
    format!("For: {}, {}", month_name(result.month), result.year),
    String::new(),
  ];
  lines.extend(result.lines.iter().map(line));
  lines.push(String::new());
  lines.push(format!("Total: ${:.2}", result.total_rounded));

  let mut out = lines.join("\n");
  out.push('\n');
  out
}
