//! Core types and the reconciliation engine for prorated subscription
//! invoices.
//!
//! Pure and synchronous: no I/O, no shared state. Callers hand over a slice
//! of [`SubscriptionEvent`]s and a billing month and get back a
//! [`ReconciliationResult`] with one priced line per billed interval.
//!
//! ```
//! use chrono::NaiveDate;
//! use proration_core::{PlanId, Reconciler, SubscriptionEvent};
//!
//! let upgrade_at = NaiveDate::from_ymd_opt(2024, 4, 10)
//!   .unwrap()
//!   .and_hms_opt(0, 0, 0)
//!   .unwrap();
//! let events = [SubscriptionEvent::upgrade(upgrade_at, PlanId::Premium)];
//!
//! let result = Reconciler::default()
//!   .reconcile(&events, 2024, 4, Some(PlanId::Basic))
//!   .unwrap();
//! assert_eq!(result.lines.len(), 2);
//! assert_eq!(result.total_rounded, rust_decimal::Decimal::new(24, 0));
//! ```

pub mod catalog;
pub mod error;
pub mod event;
pub mod invoice;
pub mod plan;
pub mod reconcile;

pub use catalog::{PlanCatalog, PriceBook};
pub use error::{Error, Result};
pub use event::{EventKind, SubscriptionEvent};
pub use invoice::{InvoiceLine, ReconciliationResult};
pub use plan::{Plan, PlanId};
pub use reconcile::Reconciler;
