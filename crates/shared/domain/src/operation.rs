use crate::response::BillingResult;
use crate::taxonomy::ErrorKind;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use strum_macros::{Display, IntoStaticStr};

/// The operation family a result belongs to.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Operation {
    Connection,
    PurchasesUpdated,
    ItemsForPurchaseQuery,
    SubscriptionsForPurchaseQuery,
    PurchaseLaunch,
    SubscriptionLaunch,
    PurchaseHistoryQuery,
    SubscriptionHistoryQuery,
    Consumption,
}

/// A failed SDK call, already translated through the taxonomy.
///
/// Created once at callback time and then only cloned, never mutated.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{operation} failed: {kind}{}", format_message(.message))]
pub struct OperationError {
    pub operation: Operation,
    pub kind: ErrorKind,
    pub message: Option<Cow<'static, str>>,
}

impl OperationError {
    #[must_use]
    pub const fn new(operation: Operation, kind: ErrorKind) -> Self {
        Self { operation, kind, message: None }
    }

    #[must_use]
    pub fn with_message(mut self, message: impl Into<Cow<'static, str>>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Builds the error for a failed SDK result, keeping the debug message if any.
    #[must_use]
    pub fn from_result(operation: Operation, result: &BillingResult) -> Self {
        Self {
            operation,
            kind: ErrorKind::from(result.code),
            message: result.message().map(|m| Cow::Owned(m.to_owned())),
        }
    }

    /// The SDK dropped the callback without ever invoking it.
    #[must_use]
    pub const fn abandoned(operation: Operation) -> Self {
        Self {
            operation,
            kind: ErrorKind::Disconnected,
            message: Some(Cow::Borrowed("callback dropped before reporting a result")),
        }
    }

    /// The SDK reported success but handed back no result list.
    #[must_use]
    pub const fn missing_result(operation: Operation) -> Self {
        Self {
            operation,
            kind: ErrorKind::Error,
            message: Some(Cow::Borrowed("response code was ok but the result list was absent")),
        }
    }
}

fn format_message(message: &Option<Cow<'static, str>>) -> Cow<'static, str> {
    message.as_ref().map_or(Cow::Borrowed(""), |m| Cow::Owned(format!(" ({m})")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::response::ResponseCode;

    #[test]
    fn test_from_result_maps_code_and_keeps_message() {
        let result =
            BillingResult::new(ResponseCode::ITEM_UNAVAILABLE).with_debug_message("sku retired");
        let err = OperationError::from_result(Operation::PurchaseLaunch, &result);

        assert_eq!(err.kind, ErrorKind::ItemUnavailable);
        assert_eq!(err.message.as_deref(), Some("sku retired"));
        assert_eq!(err.to_string(), "purchase_launch failed: item_unavailable (sku retired)");
    }

    #[test]
    fn test_blank_debug_message_is_dropped() {
        let result = BillingResult::new(ResponseCode::ERROR).with_debug_message("   ");
        let err = OperationError::from_result(Operation::Consumption, &result);

        assert!(err.message.is_none());
        assert_eq!(err.to_string(), "consumption failed: error");
    }
}
