//! The reconciliation engine.
//!
//! Turns a sparse, unordered event timeline into disjoint, priced billing
//! intervals for one calendar month:
//!
//! 1. drop events outside the month (the last day counts up to midnight),
//! 2. stable-sort by timestamp,
//! 3. void every upgrade reversed by a downgrade within 24 hours,
//! 4. resolve plan-change boundaries into closed date intervals,
//! 5. price each interval at `monthly price / days in month` per day.
//!
//! The engine is a pure function of its inputs. Caller data is never
//! mutated; all filtering and sorting happens on a private copy.

use chrono::{Datelike, Months, NaiveDate, NaiveTime, TimeDelta};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::{
  Error, Result,
  catalog::{PlanCatalog, PriceBook},
  event::{EventKind, SubscriptionEvent},
  invoice::{InvoiceLine, ReconciliationResult},
  plan::PlanId,
};

/// An upgrade reversed within this many hours is voided.
const INDECISIVE_WINDOW_HOURS: i64 = 24;

/// Decimal places kept on each invoice line.
const LINE_PRECISION: u32 = 2;

// ─── Engine ──────────────────────────────────────────────────────────────────

/// Computes prorated monthly invoices against a [`PriceBook`].
///
/// Holds no per-call state; one instance can serve any number of
/// reconciliations, from any number of threads.
#[derive(Debug, Clone)]
pub struct Reconciler<B = PlanCatalog> {
  prices: B,
}

impl Default for Reconciler<PlanCatalog> {
  fn default() -> Self { Self::new(PlanCatalog::standard()) }
}

impl<B: PriceBook> Reconciler<B> {
  pub fn new(prices: B) -> Self { Self { prices } }

  pub fn price_book(&self) -> &B { &self.prices }

  /// Reconcile `events` against the billing month `year`-`month`.
  ///
  /// `initial_plan` is the plan in force at the start of the month, if any.
  /// Without one, billing starts from the first surviving event.
  ///
  /// # Errors
  ///
  /// - [`Error::InvalidMonth`] if `month` is outside `1..=12` or the month
  ///   cannot be represented.
  /// - [`Error::MissingTargetPlan`] if any upgrade or downgrade in `events`
  ///   names no plan.
  /// - [`Error::UnknownPlan`] if a billed plan is missing from the price book.
  pub fn reconcile(
    &self,
    events: &[SubscriptionEvent],
    year: i32,
    month: u32,
    initial_plan: Option<PlanId>,
  ) -> Result<ReconciliationResult> {
    let bounds = MonthBounds::new(year, month)?;
    for event in events {
      event.target_plan()?;
    }

    let mut working = bounds.retain(events);
    working.sort_by_key(|e| e.at);
    let working = drop_indecisive_pairs(working);

    let intervals = build_intervals(&working, &bounds, initial_plan)?;
    self.price_intervals(&intervals, &bounds)
  }

  fn price_intervals(
    &self,
    intervals: &[Interval],
    bounds: &MonthBounds,
  ) -> Result<ReconciliationResult> {
    let mut result = ReconciliationResult::empty(bounds.year, bounds.month);
    let days_in_month = Decimal::from(bounds.days);

    for interval in intervals {
      let days = interval.days();
      let overflow = || Error::AmountOverflow {
        plan: interval.plan,
        days,
      };

      let monthly = self.prices.price(interval.plan)?;
      let amount_exact = monthly
        .checked_div(days_in_month)
        .and_then(|daily| daily.checked_mul(Decimal::from(days)))
        .ok_or_else(overflow)?;
      let amount_rounded = amount_exact.round_dp_with_strategy(
        LINE_PRECISION,
        RoundingStrategy::MidpointAwayFromZero,
      );

      result.total_exact = result
        .total_exact
        .checked_add(amount_exact)
        .ok_or_else(overflow)?;
      result.total_rounded = result
        .total_rounded
        .checked_add(amount_rounded)
        .ok_or_else(overflow)?;

      tracing::trace!(
        plan = %interval.plan,
        start = %interval.start,
        end = %interval.end,
        days,
        amount = %amount_rounded,
        "priced interval"
      );

      result.lines.push(InvoiceLine {
        plan: interval.plan,
        start: interval.start,
        end: interval.end,
        days,
        amount_exact,
        amount_rounded,
      });
    }

    Ok(result)
  }
}

// ─── Month bounds ────────────────────────────────────────────────────────────

/// First and last calendar day of the billed month.
#[derive(Debug, Clone, Copy)]
struct MonthBounds {
  year:  i32,
  month: u32,
  start: NaiveDate,
  end:   NaiveDate,
  days:  u32,
}

impl MonthBounds {
  fn new(year: i32, month: u32) -> Result<Self> {
    let invalid = || Error::InvalidMonth { year, month };
    let start = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
    let end = start
      .checked_add_months(Months::new(1))
      .and_then(|next| next.pred_opt())
      .ok_or_else(invalid)?;
    Ok(Self {
      year,
      month,
      start,
      end,
      days: end.day(),
    })
  }

  /// Copy out the events between midnight on the first day and midnight on
  /// the last day, both inclusive. Anything later on the last day is dropped.
  fn retain(&self, events: &[SubscriptionEvent]) -> Vec<SubscriptionEvent> {
    let window =
      self.start.and_time(NaiveTime::MIN)..=self.end.and_time(NaiveTime::MIN);
    let kept: Vec<SubscriptionEvent> = events
      .iter()
      .filter(|e| window.contains(&e.at))
      .cloned()
      .collect();
    if kept.len() < events.len() {
      tracing::debug!(
        dropped = events.len() - kept.len(),
        month_start = %self.start,
        month_end = %self.end,
        "dropped events outside billing month"
      );
    }
    kept
  }
}

// ─── Indecisive clause ───────────────────────────────────────────────────────

/// An upgrade immediately followed by a downgrade less than 24 hours later.
fn is_indecisive(first: &SubscriptionEvent, second: &SubscriptionEvent) -> bool {
  first.kind == EventKind::Upgrade
    && second.kind == EventKind::Downgrade
    && second.at - first.at < TimeDelta::hours(INDECISIVE_WINDOW_HOURS)
}

/// Excise indecisive pairs until none remain.
///
/// Each pass removes the first qualifying adjacent pair and rescans from the
/// front, so pairs exposed by an earlier removal are caught too. Expects
/// `events` sorted by timestamp.
fn drop_indecisive_pairs(
  mut events: Vec<SubscriptionEvent>,
) -> Vec<SubscriptionEvent> {
  while let Some(i) = events
    .windows(2)
    .position(|pair| is_indecisive(&pair[0], &pair[1]))
  {
    tracing::debug!(
      upgrade_at = %events[i].at,
      downgrade_at = %events[i + 1].at,
      "voiding indecisive upgrade/downgrade pair"
    );
    events.drain(i..i + 2);
  }
  events
}

// ─── Intervals ───────────────────────────────────────────────────────────────

/// A closed date range billed at a single plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Interval {
  plan:  PlanId,
  start: NaiveDate,
  end:   NaiveDate,
}

impl Interval {
  fn days(&self) -> u32 { (self.end - self.start).num_days() as u32 + 1 }
}

/// The last day of the outgoing state and the plan that follows it.
///
/// Downgrades keep the old plan through the event date, upgrades take effect
/// on it, and cancels bill the event date as the final day.
fn resolve(event: &SubscriptionEvent) -> Result<(NaiveDate, Option<PlanId>)> {
  let next = event.target_plan()?;
  let date = event.date();
  let boundary = match event.kind {
    EventKind::Upgrade => prev_day(date)?,
    EventKind::Downgrade | EventKind::Cancel => date,
  };
  Ok((boundary, next))
}

fn build_intervals(
  events: &[SubscriptionEvent],
  bounds: &MonthBounds,
  initial_plan: Option<PlanId>,
) -> Result<Vec<Interval>> {
  let mut intervals = Vec::new();
  let mut events = events.iter();

  let (mut current, mut start) = match initial_plan {
    Some(plan) => (Some(plan), bounds.start),
    None => {
      // Nothing to bill before the first event establishes a plan.
      let Some(first) = events.next() else {
        return Ok(intervals);
      };
      let (boundary, plan) = resolve(first)?;
      (plan, next_day(boundary)?)
    }
  };

  for event in events {
    let (boundary, next) = resolve(event)?;
    if next == current {
      continue;
    }
    // Same-day changes must not reopen days already billed.
    let boundary = boundary.max(prev_day(start)?);
    if let Some(plan) = current {
      push_interval(&mut intervals, plan, start, boundary);
    }
    start = next_day(boundary)?;
    current = next;
  }

  if let Some(plan) = current {
    push_interval(&mut intervals, plan, start, bounds.end);
  }
  Ok(intervals)
}

fn push_interval(
  intervals: &mut Vec<Interval>,
  plan: PlanId,
  start: NaiveDate,
  end: NaiveDate,
) {
  if start > end {
    tracing::trace!(%plan, %start, %end, "skipping zero-day interval");
    return;
  }
  intervals.push(Interval { plan, start, end });
}

fn prev_day(date: NaiveDate) -> Result<NaiveDate> {
  date.pred_opt().ok_or(Error::DateOutOfRange(date))
}

fn next_day(date: NaiveDate) -> Result<NaiveDate> {
  date.succ_opt().ok_or(Error::DateOutOfRange(date))
}
