//! Plan identifiers and priced plans.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// A subscription tier.
///
/// Displays as the variant name (`Basic`), parses case-insensitively
/// (`"premium"`), and serialises in lowercase.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  PartialOrd,
  Ord,
  Hash,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(ascii_case_insensitive)]
pub enum PlanId {
  Basic,
  Premium,
}

/// A plan tier with its fixed monthly price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
  pub id:            PlanId,
  /// Price for one full calendar month.
  pub monthly_price: Decimal,
}

impl Plan {
  pub fn new(id: PlanId, monthly_price: Decimal) -> Self {
    Self { id, monthly_price }
  }
}
