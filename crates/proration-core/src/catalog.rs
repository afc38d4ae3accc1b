//! The `PriceBook` trait and the static plan catalog.
//!
//! The reconciliation engine only ever asks a [`PriceBook`] for a monthly
//! price. New tiers are added by registering them in a [`PlanCatalog`]; the
//! engine itself is untouched.

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use crate::{
  Error, Result,
  plan::{Plan, PlanId},
};

// ─── Trait ───────────────────────────────────────────────────────────────────

/// A read-only source of monthly plan prices.
pub trait PriceBook: Send + Sync {
  /// Monthly price for `plan`. Fails with [`Error::UnknownPlan`] when the plan
  /// is not known to this price book.
  fn price(&self, plan: PlanId) -> Result<Decimal>;
}

impl<P: PriceBook + ?Sized> PriceBook for &P {
  fn price(&self, plan: PlanId) -> Result<Decimal> { (**self).price(plan) }
}

// ─── Catalog ─────────────────────────────────────────────────────────────────

/// Immutable lookup from plan id to priced plan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlanCatalog {
  plans: BTreeMap<PlanId, Plan>,
}

impl PlanCatalog {
  /// A catalog with no plans registered.
  pub fn empty() -> Self { Self::default() }

  /// The reference price table: Basic at 10.00, Premium at 30.00 per month.
  pub fn standard() -> Self {
    let mut plans = BTreeMap::new();
    for plan in [
      Plan::new(PlanId::Basic, Decimal::new(1000, 2)),
      Plan::new(PlanId::Premium, Decimal::new(3000, 2)),
    ] {
      plans.insert(plan.id, plan);
    }
    Self { plans }
  }

  /// Register `plan`, replacing any existing entry with the same id.
  pub fn register(&mut self, plan: Plan) -> Result<()> {
    if plan.monthly_price < Decimal::ZERO {
      return Err(Error::NegativePrice {
        plan:  plan.id,
        price: plan.monthly_price,
      });
    }
    self.plans.insert(plan.id, plan);
    Ok(())
  }

  /// Builder form of [`PlanCatalog::register`].
  pub fn with_price(mut self, id: PlanId, monthly_price: Decimal) -> Result<Self> {
    self.register(Plan::new(id, monthly_price))?;
    Ok(self)
  }

  pub fn get(&self, id: PlanId) -> Option<&Plan> { self.plans.get(&id) }

  /// All registered plans, ordered by id.
  pub fn plans(&self) -> impl Iterator<Item = &Plan> { self.plans.values() }
}

impl PriceBook for PlanCatalog {
  fn price(&self, plan: PlanId) -> Result<Decimal> {
    self
      .get(plan)
      .map(|p| p.monthly_price)
      .ok_or(Error::UnknownPlan(plan))
  }
}
