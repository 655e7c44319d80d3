//! Response-code taxonomy.
//!
//! The single place where vendor response codes acquire meaning. The mapping is
//! total: codes outside the recognized set become [`ErrorKind::Unknown`].

use crate::response::ResponseCode;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, IntoStaticStr};

/// Semantic outcome of an SDK call.
///
/// `Ok` is part of the set because successful results (e.g. a connection
/// result) carry their kind as well.
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
    EnumIter,
    IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    Ok,
    ServiceTimeout,
    FeatureNotSupported,
    ServiceDisconnected,
    UserCanceled,
    ServiceUnavailable,
    BillingUnavailable,
    ItemUnavailable,
    DeveloperError,
    Error,
    ItemAlreadyOwned,
    ItemNotOwned,
    NetworkError,
    /// Synthetic: a listener or callback channel ended without reporting a code.
    Disconnected,
    /// Fallback for codes outside the recognized set.
    Unknown,
}

impl ErrorKind {
    /// The only success test used across the workspace.
    #[must_use]
    pub const fn is_ok(self) -> bool {
        matches!(self, Self::Ok)
    }

    /// The vendor code this kind was mapped from, if it has one.
    #[must_use]
    pub const fn code(self) -> Option<ResponseCode> {
        let code = match self {
            Self::Ok => ResponseCode::OK,
            Self::ServiceTimeout => ResponseCode::SERVICE_TIMEOUT,
            Self::FeatureNotSupported => ResponseCode::FEATURE_NOT_SUPPORTED,
            Self::ServiceDisconnected => ResponseCode::SERVICE_DISCONNECTED,
            Self::UserCanceled => ResponseCode::USER_CANCELED,
            Self::ServiceUnavailable => ResponseCode::SERVICE_UNAVAILABLE,
            Self::BillingUnavailable => ResponseCode::BILLING_UNAVAILABLE,
            Self::ItemUnavailable => ResponseCode::ITEM_UNAVAILABLE,
            Self::DeveloperError => ResponseCode::DEVELOPER_ERROR,
            Self::Error => ResponseCode::ERROR,
            Self::ItemAlreadyOwned => ResponseCode::ITEM_ALREADY_OWNED,
            Self::ItemNotOwned => ResponseCode::ITEM_NOT_OWNED,
            Self::NetworkError => ResponseCode::NETWORK_ERROR,
            Self::Disconnected | Self::Unknown => return None,
        };
        Some(code)
    }
}

/// Maps a raw vendor code to its [`ErrorKind`]. Pure and total.
#[must_use]
pub const fn map_response_code(code: ResponseCode) -> ErrorKind {
    match code.value() {
        -3 => ErrorKind::ServiceTimeout,
        -2 => ErrorKind::FeatureNotSupported,
        -1 => ErrorKind::ServiceDisconnected,
        0 => ErrorKind::Ok,
        1 => ErrorKind::UserCanceled,
        2 => ErrorKind::ServiceUnavailable,
        3 => ErrorKind::BillingUnavailable,
        4 => ErrorKind::ItemUnavailable,
        5 => ErrorKind::DeveloperError,
        6 => ErrorKind::Error,
        7 => ErrorKind::ItemAlreadyOwned,
        8 => ErrorKind::ItemNotOwned,
        12 => ErrorKind::NetworkError,
        _ => ErrorKind::Unknown,
    }
}

impl From<ResponseCode> for ErrorKind {
    fn from(code: ResponseCode) -> Self {
        map_response_code(code)
    }
}
