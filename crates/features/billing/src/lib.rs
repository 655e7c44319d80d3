//! Billing feature slice.
//!
//! Turns the callback contracts of a vendor billing SDK into async values:
//!
//! * [`ConnectionManager`]: connection attempts as [`Pending`] results plus an
//!   observable [`ConnectionState`](pbill_kernel::domain::ConnectionState).
//! * [`PurchaseUpdateBroadcaster`]: the client's single purchases listener,
//!   fanned out to any number of [`PurchaseUpdates`] subscriptions.
//! * [`operations`]: catalog, launch, history and consumption calls, each
//!   resolving exactly once.
//!
//! The SDK itself is reached only through the traits in [`sdk`]. Enable the
//! `test-utils` feature for an in-memory implementation.

mod connection;
mod error;
pub mod operations;
mod pending;
mod purchases;
pub mod sdk;
#[cfg(feature = "test-utils")]
pub mod testing;

pub use crate::connection::ConnectionManager;
pub use crate::error::{BillingError, BillingErrorExt};
pub use crate::pending::Pending;
pub use crate::purchases::{PurchaseUpdateBroadcaster, PurchaseUpdates};
