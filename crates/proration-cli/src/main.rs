//! `proration` — prorated monthly invoice for a subscription.
//!
//! # Usage
//!
//! ```text
//! proration --year 2024 --month 4 --initial-plan basic \
//!   --event upgrade,2024-04-05,premium --event cancel,2024-04-25
//! proration --config invoice.toml --format json
//! proration --list-plans
//! ```
//!
//! Settings are read from the TOML file given with `--config` (default
//! `proration.toml`, optional), then `PRORATION_*` environment variables, then
//! flags. See `example.toml` for the file layout.

mod settings;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use proration_core::{PlanCatalog, PlanId, Reconciler, SubscriptionEvent};
use proration_render::Format;
use settings::{Overrides, Settings, parse_event_arg};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(
  name = "proration",
  author,
  version,
  about = "Prorated monthly invoice for a subscription"
)]
struct Args {
  /// Path to a TOML settings file.
  #[arg(short, long, value_name = "FILE", default_value = "proration.toml")]
  config: PathBuf,

  /// Billing year.
  #[arg(long)]
  year: Option<i32>,

  /// Billing month, 1-12.
  #[arg(long)]
  month: Option<u32>,

  /// Plan in force on the first of the month (basic, premium).
  #[arg(long, value_name = "PLAN")]
  initial_plan: Option<PlanId>,

  /// Plan change as KIND,TIMESTAMP[,PLAN]; repeatable.
  #[arg(long = "event", value_name = "EVENT", value_parser = parse_event_arg)]
  events: Vec<SubscriptionEvent>,

  /// Output format (text, json).
  #[arg(short, long)]
  format: Option<Format>,

  /// Print the plan catalog with any configured prices and exit.
  #[arg(long)]
  list_plans: bool,
}

impl Args {
  fn overrides(&self) -> Overrides {
    Overrides {
      year:         self.year,
      month:        self.month,
      initial_plan: self.initial_plan,
      format:       self.format,
      events:       self.events.clone(),
    }
  }
}

/// One `Basic: $10.00/month` line per plan, named as on invoice lines.
fn plan_listing(catalog: &PlanCatalog) -> String {
  catalog
    .plans()
    .map(|plan| format!("{}: ${:.2}/month\n", plan.id, plan.monthly_price))
    .collect()
}

// ─── Entry point ──────────────────────────────────────────────────────────────

fn main() -> Result<()> {
  // Logs go to stderr so stdout carries only the invoice.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy(),
    )
    .with_writer(std::io::stderr)
    .init();

  let args = Args::parse();

  let mut settings = Settings::load(&args.config)
    .with_context(|| format!("loading {}", args.config.display()))?;
  settings.apply(args.overrides());

  let catalog = settings.catalog()?;

  // Helper mode: show prices and exit.
  if args.list_plans {
    print!("{}", plan_listing(&catalog));
    return Ok(());
  }

  let (year, month) = settings.period()?;
  tracing::debug!(
    year,
    month,
    events = settings.events.len(),
    initial_plan = ?settings.initial_plan,
    "reconciling"
  );

  let result = Reconciler::new(catalog)
    .reconcile(&settings.events, year, month, settings.initial_plan)
    .with_context(|| format!("failed to reconcile {year}-{month:02}"))?;
  tracing::info!(
    lines = result.lines.len(),
    total = %result.total_rounded,
    "reconciled"
  );

  let output = proration_render::render(&result, settings.format)
    .context("failed to render invoice")?;
  print!("{output}");
  if settings.format == Format::Json {
    println!();
  }

  Ok(())
}
