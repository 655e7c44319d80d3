//! Kernel utilities shared across slices.
//! Keep this crate lightweight; it hosts the layered configuration loader used by the facade.
//!
//! ## Config loading
//! ```rust,no_run
//! use pbill_kernel::config::load_config;
//! use pbill_kernel::domain::config::BillingConfig;
//!
//! let cfg: BillingConfig = load_config(Some("billing")).unwrap_or_default();
//! assert!(cfg.purchase_updates.capacity > 0);
//! ```
pub mod config;

pub use pbill_domain as domain;
