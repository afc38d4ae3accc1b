//! Subscription events: the sparse timeline the engine reconciles.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::{Error, Result, plan::PlanId};

/// What happened to the subscription.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  Display,
  EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum EventKind {
  /// Move to a pricier plan; takes effect on the event date.
  Upgrade,
  /// Move to a cheaper plan; takes effect the day after the event date.
  Downgrade,
  /// End the subscription; the event date is the last billed day.
  Cancel,
}

/// A point-in-time plan change supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionEvent {
  /// When the event occurred. Date-only inputs mean midnight.
  #[serde(with = "timestamp")]
  pub at:   NaiveDateTime,
  pub kind: EventKind,
  /// Target plan; required for upgrades and downgrades, ignored for cancels.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub plan: Option<PlanId>,
}

impl SubscriptionEvent {
  pub fn upgrade(at: NaiveDateTime, plan: PlanId) -> Self {
    Self { at, kind: EventKind::Upgrade, plan: Some(plan) }
  }

  pub fn downgrade(at: NaiveDateTime, plan: PlanId) -> Self {
    Self { at, kind: EventKind::Downgrade, plan: Some(plan) }
  }

  pub fn cancel(at: NaiveDateTime) -> Self {
    Self { at, kind: EventKind::Cancel, plan: None }
  }

  /// Calendar date of the event, time-of-day dropped.
  pub fn date(&self) -> NaiveDate { self.at.date() }

  /// The plan in force after this event, or `None` for a cancel.
  ///
  /// Fails with [`Error::MissingTargetPlan`] for an upgrade or downgrade that
  /// names no plan.
  pub fn target_plan(&self) -> Result<Option<PlanId>> {
    match self.kind {
      EventKind::Cancel => Ok(None),
      EventKind::Upgrade | EventKind::Downgrade => self
        .plan
        .map(Some)
        .ok_or(Error::MissingTargetPlan { kind: self.kind, at: self.at }),
    }
  }
}

/// Serde adapter accepting `YYYY-MM-DD` or `YYYY-MM-DDTHH:MM:SS`.
mod timestamp {
  use chrono::NaiveDateTime;
  use serde::{Deserialize, Deserializer, Serializer, de::Error as _};

  pub fn serialize<S: Serializer>(
    at: &NaiveDateTime,
    serializer: S,
  ) -> Result<S::Ok, S::Error> {
    serializer.collect_str(&at.format("%Y-%m-%dT%H:%M:%S"))
  }

  pub fn deserialize<'de, D: Deserializer<'de>>(
    deserializer: D,
  ) -> Result<NaiveDateTime, D::Error> {
    let raw = String::deserialize(deserializer)?;
    super::parse_timestamp(&raw).ok_or_else(|| {
      D::Error::custom(format!(
        "invalid timestamp {raw:?}: expected YYYY-MM-DD or \
         YYYY-MM-DDTHH:MM:SS"
      ))
    })
  }
}

/// Parse an event timestamp. A bare date resolves to midnight.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
  let raw = raw.trim();
  raw
    .parse::<NaiveDateTime>()
    .ok()
    .or_else(|| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").ok())
    .or_else(|| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M").ok())
    .or_else(|| raw.parse::<NaiveDate>().ok().map(|d| d.and_time(NaiveTime::MIN)))
}
