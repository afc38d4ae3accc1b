//! Layered run settings: TOML file, then `PRORATION_*` environment, then
//! command-line flags.

use std::{collections::BTreeMap, path::Path};

use anyhow::{Context, Result, anyhow, bail};
use config::{Config, ConfigBuilder, Environment, File, builder::DefaultState};
use proration_core::{
  EventKind, PlanCatalog, PlanId, SubscriptionEvent, event::parse_timestamp,
};
use proration_render::Format;
use rust_decimal::Decimal;
use serde::Deserialize;

/// Prefix for environment overrides, e.g. `PRORATION_MONTH=5`.
pub const ENV_PREFIX: &str = "PRORATION";

// ─── Settings ─────────────────────────────────────────────────────────────────

/// Everything needed for one reconciliation run.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
  pub year:         Option<i32>,
  pub month:        Option<u32>,
  pub initial_plan: Option<PlanId>,
  #[serde(default)]
  pub format:       Format,
  /// Monthly price overrides applied on top of the standard catalog.
  #[serde(default)]
  pub plans:        BTreeMap<PlanId, Decimal>,
  #[serde(default)]
  pub events:       Vec<SubscriptionEvent>,
}

/// Values given on the command line; each one that is set wins over the file
/// and environment.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
  pub year:         Option<i32>,
  pub month:        Option<u32>,
  pub initial_plan: Option<PlanId>,
  pub format:       Option<Format>,
  /// Appended after the events loaded from the file.
  pub events:       Vec<SubscriptionEvent>,
}

impl Settings {
  /// Read `path` (if it exists) and the process environment.
  pub fn load(path: &Path) -> Result<Self> {
    Self::from_builder(
      Config::builder()
        .add_source(File::from(path).required(false))
        .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true)),
    )
  }

  fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self> {
    builder
      .build()
      .context("failed to read settings")?
      .try_deserialize()
      .context("failed to deserialise settings")
  }

  pub fn apply(&mut self, overrides: Overrides) {
    if overrides.year.is_some() {
      self.year = overrides.year;
    }
    if overrides.month.is_some() {
      self.month = overrides.month;
    }
    if overrides.initial_plan.is_some() {
      self.initial_plan = overrides.initial_plan;
    }
    if let Some(format) = overrides.format {
      self.format = format;
    }
    self.events.extend(overrides.events);
  }

  /// The billing `(year, month)`; both must be configured somewhere.
  pub fn period(&self) -> Result<(i32, u32)> {
    let year = self
      .year
      .ok_or_else(|| anyhow!("no billing year: pass --year or set `year`"))?;
    let month = self
      .month
      .ok_or_else(|| anyhow!("no billing month: pass --month or set `month`"))?;
    Ok((year, month))
  }

  /// The standard catalog with any configured price overrides applied.
  pub fn catalog(&self) -> Result<PlanCatalog> {
    let mut catalog = PlanCatalog::standard();
    for (&plan, &price) in &self.plans {
      catalog = catalog
        .with_price(plan, price)
        .with_context(|| format!("invalid price for plan {plan}"))?;
    }
    Ok(catalog)
  }
}

// ─── --event parsing ──────────────────────────────────────────────────────────

/// Parse a `KIND,TIMESTAMP[,PLAN]` command-line event, e.g.
/// `upgrade,2024-04-05T08:00:00,premium` or `cancel,2024-04-25`.
pub fn parse_event_arg(raw: &str) -> Result<SubscriptionEvent> {
  let mut parts = raw.split(',').map(str::trim);
  let (Some(kind), Some(at)) = (parts.next(), parts.next()) else {
    bail!("expected KIND,TIMESTAMP[,PLAN], got {raw:?}");
  };
  let plan = parts.next();
  if parts.next().is_some() {
    bail!("too many fields in event {raw:?}");
  }

  let kind: EventKind = kind
    .parse()
    .with_context(|| format!("unknown event kind {kind:?}"))?;
  let at = parse_timestamp(at)
    .ok_or_else(|| anyhow!("invalid timestamp {at:?}"))?;
  let plan = plan
    .map(|p| p.parse::<PlanId>().with_context(|| format!("unknown plan {p:?}")))
    .transpose()?;

  let event = match (kind, plan) {
    (EventKind::Cancel, None) => SubscriptionEvent::cancel(at),
    (EventKind::Cancel, Some(_)) => bail!("cancel events take no plan"),
    (EventKind::Upgrade, Some(plan)) => SubscriptionEvent::upgrade(at, plan),
    (EventKind::Downgrade, Some(plan)) => SubscriptionEvent::downgrade(at, plan),
    (kind, None) => bail!("{kind} events need a target plan"),
  };
  Ok(event)
}
