use serde::{Deserialize, Serialize};
use std::fmt;

/// Raw integer status reported by the vendor billing SDK.
///
/// The core never interprets the value directly; it is only ever fed to
/// [`crate::map_response_code`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResponseCode(i32);

impl ResponseCode {
    pub const SERVICE_TIMEOUT: Self = Self(-3);
    pub const FEATURE_NOT_SUPPORTED: Self = Self(-2);
    pub const SERVICE_DISCONNECTED: Self = Self(-1);
    pub const OK: Self = Self(0);
    pub const USER_CANCELED: Self = Self(1);
    pub const SERVICE_UNAVAILABLE: Self = Self(2);
    pub const BILLING_UNAVAILABLE: Self = Self(3);
    pub const ITEM_UNAVAILABLE: Self = Self(4);
    pub const DEVELOPER_ERROR: Self = Self(5);
    pub const ERROR: Self = Self(6);
    pub const ITEM_ALREADY_OWNED: Self = Self(7);
    pub const ITEM_NOT_OWNED: Self = Self(8);
    pub const NETWORK_ERROR: Self = Self(12);

    #[must_use]
    pub const fn new(value: i32) -> Self {
        Self(value)
    }

    #[must_use]
    pub const fn value(self) -> i32 {
        self.0
    }
}

impl From<i32> for ResponseCode {
    fn from(value: i32) -> Self {
        Self(value)
    }
}

impl fmt::Display for ResponseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A response code together with the SDK's optional debug message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingResult {
    pub code: ResponseCode,
    #[serde(default)]
    pub debug_message: Option<String>,
}

impl BillingResult {
    #[must_use]
    pub const fn new(code: ResponseCode) -> Self {
        Self { code, debug_message: None }
    }

    #[must_use]
    pub const fn ok() -> Self {
        Self::new(ResponseCode::OK)
    }

    #[must_use]
    pub fn with_debug_message(mut self, message: impl Into<String>) -> Self {
        self.debug_message = Some(message.into());
        self
    }

    /// The debug message, if the SDK supplied a non-blank one.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.debug_message.as_deref().map(str::trim).filter(|m| !m.is_empty())
    }
}

impl From<ResponseCode> for BillingResult {
    fn from(code: ResponseCode) -> Self {
        Self::new(code)
    }
}

impl From<i32> for BillingResult {
    fn from(code: i32) -> Self {
        Self::new(ResponseCode::new(code))
    }
}
