use crate::error::{BillingError, BillingErrorExt};
use crate::sdk::PurchasesUpdatedListener;
use pbill_event_bus::{Broadcaster, FailureMode, Subscription};
use pbill_kernel::domain::config::{PurchaseUpdatesConfig, RestartPolicy};
use pbill_kernel::domain::{BillingResult, ErrorKind, Operation, OperationError, PurchaseBatch};
use tracing::{trace, warn};

/// One subscriber's stream of purchase batches.
///
/// Ends after the first error.
pub type PurchaseUpdates<P> = Subscription<PurchaseBatch<P>, OperationError>;

/// Fans the client's single purchases listener out to any number of subscribers.
///
/// Clones share the same broadcast, so one clone can be handed to the SDK as
/// the listener while another serves subscriptions.
#[derive(Debug)]
pub struct PurchaseUpdateBroadcaster<P> {
    broadcaster: Broadcaster<PurchaseBatch<P>, OperationError>,
}

impl<P> Clone for PurchaseUpdateBroadcaster<P> {
    fn clone(&self) -> Self {
        Self { broadcaster: self.broadcaster.clone() }
    }
}

impl<P> PurchaseUpdateBroadcaster<P>
where
    P: Send + Sync + 'static,
{
    /// # Errors
    /// Returns [`BillingError::InvalidConfiguration`] if the configured capacity is zero.
    pub fn new(config: &PurchaseUpdatesConfig) -> Result<Self, BillingError> {
        if config.capacity == 0 {
            return Err(BillingError::InvalidConfiguration {
                message: "purchase update capacity must be greater than zero".into(),
                context: Some("purchase_updates.capacity".into()),
            });
        }
        let mode = match config.restart {
            RestartPolicy::Terminal => FailureMode::Terminal,
            RestartPolicy::Restart => FailureMode::Restart,
        };
        let broadcaster =
            Broadcaster::new(config.capacity, mode).context("purchase updates")?;
        Ok(Self { broadcaster })
    }

    /// A new subscription that sees every batch delivered from now on.
    #[must_use]
    pub fn subscribe(&self) -> PurchaseUpdates<P> {
        self.broadcaster.subscribe()
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.broadcaster.subscriber_count()
    }

    /// `true` once a failure ended the broadcast for good.
    #[must_use]
    pub fn is_terminated(&self) -> bool {
        self.broadcaster.is_terminated()
    }
}

impl<P> PurchasesUpdatedListener<P> for PurchaseUpdateBroadcaster<P>
where
    P: Send + Sync + 'static,
{
    fn on_purchases_updated(&self, result: BillingResult, purchases: Option<Vec<P>>) {
        let kind = ErrorKind::from(result.code);
        let error = match purchases {
            Some(purchases) if kind.is_ok() => {
                let size = purchases.len();
                let reached = self.broadcaster.publish(PurchaseBatch::new(purchases));
                trace!(size, reached, "Purchase batch delivered");
                return;
            },
            None if kind.is_ok() => OperationError::missing_result(Operation::PurchasesUpdated),
            _ => OperationError::from_result(Operation::PurchasesUpdated, &result),
        };

        warn!(code = result.code.value(), kind = %error.kind, "Purchase update failed");
        self.broadcaster.fail(error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pbill_kernel::domain::ResponseCode;

    fn broadcaster(restart: RestartPolicy) -> PurchaseUpdateBroadcaster<&'static str> {
        PurchaseUpdateBroadcaster::new(&PurchaseUpdatesConfig { capacity: 8, restart }).unwrap()
    }

    #[tokio::test]
    async fn test_ok_batch_is_delivered_whole() {
        let updates = broadcaster(RestartPolicy::Terminal);
        let mut rx = updates.subscribe();

        updates.on_purchases_updated(BillingResult::ok(), Some(vec!["a", "b"]));

        let batch = rx.recv().await.unwrap().unwrap();
        assert_eq!(batch.as_slice(), &["a", "b"]);
    }

    #[tokio::test]
    async fn test_ok_without_list_fails_with_error_kind() {
        let updates = broadcaster(RestartPolicy::Terminal);
        let mut rx = updates.subscribe();

        updates.on_purchases_updated(BillingResult::ok(), None);

        let err = rx.recv().await.unwrap().unwrap_err();
        assert_eq!(err.operation, Operation::PurchasesUpdated);
        assert_eq!(err.kind, ErrorKind::Error);
        assert!(updates.is_terminated());
    }

    #[tokio::test]
    async fn test_failure_code_wins_over_present_list() {
        let updates = broadcaster(RestartPolicy::Restart);
        let mut rx = updates.subscribe();

        updates.on_purchases_updated(
            BillingResult::new(ResponseCode::USER_CANCELED),
            Some(vec!["ignored"]),
        );

        assert_eq!(rx.recv().await.unwrap().unwrap_err().kind, ErrorKind::UserCanceled);
        assert_eq!(rx.recv().await, None);
        assert!(!updates.is_terminated());
    }

    #[test]
    fn test_zero_capacity_is_rejected() {
        let result = PurchaseUpdateBroadcaster::<u8>::new(&PurchaseUpdatesConfig {
            capacity: 0,
            restart: RestartPolicy::Terminal,
        });
        assert!(matches!(result, Err(BillingError::InvalidConfiguration { .. })));
    }
}
