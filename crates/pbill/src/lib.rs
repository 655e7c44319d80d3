//! Reactive adapter over callback-based in-app billing SDKs.
//!
//! This crate is the composition root. It re-exports the domain types and
//! wires the billing slice into a single [`BillingFacade`]. Keep it thin: it
//! should compose other crates, not implement business logic.
//!
//! ## Usage
//! - Implement [`sdk::BillingClientBuilder`] and [`sdk::BillingClient`] for the vendor SDK.
//! - Build a facade with [`BillingFacade::new`] or [`BillingFacade::from_config_file`].
//! - Optionally install logging with [`init_logging`].
//!
//! ```rust
//! # #[cfg(feature = "test-utils")]
//! # async fn demo() -> Result<(), pbill::BillingError> {
//! use pbill::testing::fake_client;
//! use pbill::{BillingConfig, BillingFacade};
//!
//! let (builder, sdk) = fake_client();
//! let billing = BillingFacade::new(builder, &BillingConfig::default())?;
//!
//! let connecting = billing.connect();
//! sdk.finish_setup(pbill::domain::ResponseCode::OK);
//! assert!(connecting.await.is_ok());
//! assert!(billing.is_ready());
//! # Ok(())
//! # }
//! ```

mod facade;

pub use facade::BillingFacade;
pub use pbill_billing::sdk;
#[cfg(feature = "test-utils")]
pub use pbill_billing::testing;
pub use pbill_billing::{BillingError, Pending, PurchaseUpdates};
pub use pbill_domain as domain;
pub use pbill_domain::config::{BillingConfig, LoggingConfig, PurchaseUpdatesConfig, RestartPolicy};
pub use pbill_kernel as kernel;
pub use pbill_logger as logger;

/// Installs the global tracing subscriber described by `config.logging`.
///
/// Keep the returned handle alive for as long as logs should be written.
///
/// # Errors
/// See [`logger::Logger::from_config`].
pub fn init_logging(config: &BillingConfig) -> Result<logger::Logger, logger::LoggerError> {
    logger::Logger::from_config(&config.logging)
}
