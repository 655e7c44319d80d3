use crate::operation::{Operation, OperationError};
use crate::response::BillingResult;
use crate::taxonomy::ErrorKind;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// Successful outcome of a connection attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionResult {
    pub kind: ErrorKind,
}

/// Failed outcome of a connection attempt.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConnectionFailure {
    /// Setup finished with a non-ok code.
    #[error("Billing setup failed: {kind}{}", format_message(.message))]
    Setup { kind: ErrorKind, message: Option<Cow<'static, str>> },

    /// The service went away before setup finished. No response code exists for this case.
    #[error("Billing service disconnected before setup finished")]
    Disconnected,

    /// Another attempt on the same client is still waiting for its setup callback.
    #[error("A connection attempt is already in progress")]
    InProgress,
}

impl ConnectionFailure {
    #[must_use]
    pub fn from_result(result: &BillingResult) -> Self {
        Self::Setup {
            kind: ErrorKind::from(result.code),
            message: result.message().map(|m| Cow::Owned(m.to_owned())),
        }
    }

    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Setup { kind, .. } => *kind,
            Self::Disconnected => ErrorKind::Disconnected,
            Self::InProgress => ErrorKind::DeveloperError,
        }
    }
}

impl From<ConnectionFailure> for OperationError {
    fn from(failure: ConnectionFailure) -> Self {
        let kind = failure.kind();
        match failure {
            ConnectionFailure::Setup { message, .. } => {
                Self { operation: Operation::Connection, kind, message }
            },
            other => Self::new(Operation::Connection, kind).with_message(other.to_string()),
        }
    }
}

/// Observable lifecycle of the underlying client connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "state", content = "kind", rename_all = "snake_case")]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connecting,
    Connected,
    /// Setup finished with a non-ok code.
    Failed(ErrorKind),
    /// The service disconnected without being asked to.
    Dropped,
}

impl ConnectionState {
    #[must_use]
    pub const fn is_ready(self) -> bool {
        matches!(self, Self::Connected)
    }
}

fn format_message(message: &Option<Cow<'static, str>>) -> Cow<'static, str> {
    message.as_ref().map_or(Cow::Borrowed(""), |m| Cow::Owned(format!(" ({m})")))
}
