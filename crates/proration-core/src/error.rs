//! Error types for `proration-core`.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use thiserror::Error;

use crate::{event::EventKind, plan::PlanId};

#[derive(Debug, Error)]
pub enum Error {
  #[error("invalid billing month: {year}-{month:02}")]
  InvalidMonth { year: i32, month: u32 },

  #[error("{kind} event at {at} has no target plan")]
  MissingTargetPlan { kind: EventKind, at: NaiveDateTime },

  #[error("plan {0} is not registered in the catalog")]
  UnknownPlan(PlanId),

  #[error("plan {plan} cannot have a negative price ({price})")]
  NegativePrice { plan: PlanId, price: Decimal },

  #[error("amount overflow while pricing {plan} for {days} day(s)")]
  AmountOverflow { plan: PlanId, days: u32 },

  #[error("date arithmetic out of range at {0}")]
  DateOutOfRange(NaiveDate),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
