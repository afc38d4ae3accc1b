//! Invoice rendering for reconciliation results.
//!
//! Pure formatting: every figure shown is read from an already-computed
//! [`ReconciliationResult`]; nothing is recalculated here.
//!
//! ```
//! use proration_core::{PlanId, Reconciler};
//! use proration_render::{Format, render};
//!
//! let result = Reconciler::default()
//!   .reconcile(&[], 2024, 2, Some(PlanId::Basic))
//!   .unwrap();
//! let text = render(&result, Format::Text).unwrap();
//! assert!(text.ends_with("Total: $10.00\n"));
//! ```

pub mod error;
mod text;

pub use error::{Error, Result};
use proration_core::invoice::ReconciliationResult;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Output format for a rendered invoice.
#[derive(
  Debug,
  Clone,
  Copy,
  Default,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
  Display,
  EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Format {
  /// Human-readable breakdown.
  #[default]
  Text,
  /// Pretty-printed JSON document of the full result.
  Json,
}

/// Render `result` as a human-readable invoice.
///
/// Never fails; an empty result renders the header and a zero total.
pub fn render_text(result: &ReconciliationResult) -> String {
  text::render(result)
}

/// Render `result` as pretty-printed JSON. Amounts are emitted as strings so
/// no precision is lost.
pub fn render_json(result: &ReconciliationResult) -> Result<String> {
  Ok(serde_json::to_string_pretty(result)?)
}

/// Render `result` in the requested `format`.
pub fn render(result: &ReconciliationResult, format: Format) -> Result<String> {
  match format {
    Format::Text => Ok(render_text(result)),
    Format::Json => render_json(result),
  }
}
