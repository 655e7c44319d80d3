use pbill_event_bus::EventBusError;
use pbill_kernel::config::ConfigError;
use std::borrow::Cow;

/// Billing slice setup errors.
///
/// Failures of individual SDK calls are not errors of this type; they travel
/// as [`pbill_kernel::domain::OperationError`] values through the handles.
#[derive(Debug, thiserror::Error)]
pub enum BillingError {
    #[error("Invalid billing configuration{}: {message}", format_context(.context))]
    InvalidConfiguration { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Purchase update channel error{}: {source}", format_context(.context))]
    EventBus { source: EventBusError, context: Option<Cow<'static, str>> },

    #[error("Billing configuration could not be loaded{}: {source}", format_context(.context))]
    Config { source: ConfigError, context: Option<Cow<'static, str>> },
}

impl From<EventBusError> for BillingError {
    fn from(source: EventBusError) -> Self {
        Self::EventBus { source, context: None }
    }
}

impl From<ConfigError> for BillingError {
    fn from(source: ConfigError) -> Self {
        Self::Config { source, context: None }
    }
}

/// Attaches context to billing results.
pub trait BillingErrorExt<T> {
    /// # Errors
    /// Returns the original error with `context` attached.
    fn context(self, context: impl Into<Cow<'static, str>>) -> Result<T, BillingError>;
}

impl<T, E: Into<BillingError>> BillingErrorExt<T> for Result<T, E> {
    fn context(self, context: impl Into<Cow<'static, str>>) -> Result<T, BillingError> {
        self.map_err(|e| {
            let mut e = e.into();
            match &mut e {
                BillingError::InvalidConfiguration { context: c, .. }
                | BillingError::EventBus { context: c, .. }
                | BillingError::Config { context: c, .. } => *c = Some(context.into()),
            }
            e
        })
    }
}

fn format_context(context: &Option<Cow<'static, str>>) -> Cow<'static, str> {
    context.as_ref().map_or(Cow::Borrowed(""), |c| Cow::Owned(format!(" ({c})")))
}
