//! # Domain Models
//!
//! This crate contains pure billing types with minimal dependencies (`serde`, `strum`, `thiserror`).
//! Keep it lean: no I/O, channels or SDK calls. Just data, the response-code taxonomy and
//! simple helpers.
//!
//! ## Response codes
//!
//! Every numeric code reported by the vendor SDK goes through [`ErrorKind::from`]
//! (see [`taxonomy::map_response_code`]). Nothing else in the workspace branches on raw codes.
//!
//! ```rust
//! use pbill_domain::{ErrorKind, ResponseCode};
//!
//! assert_eq!(ErrorKind::from(ResponseCode::USER_CANCELED), ErrorKind::UserCanceled);
//! assert_eq!(ErrorKind::from(ResponseCode::new(4242)), ErrorKind::Unknown);
//! ```

pub mod config;
pub mod connection;
pub mod operation;
pub mod product;
pub mod purchase;
pub mod response;
pub mod taxonomy;

pub use connection::{ConnectionFailure, ConnectionResult, ConnectionState};
pub use operation::{Operation, OperationError};
pub use product::{BillingFlowParams, ProductType, SkuDetailsParams};
pub use purchase::{ConsumptionResponse, PurchaseBatch, PurchaseResponse, SubscriptionResponse};
pub use response::{BillingResult, ResponseCode};
pub use taxonomy::{ErrorKind, map_response_code};
