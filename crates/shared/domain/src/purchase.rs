use crate::taxonomy::ErrorKind;
use serde::{Deserialize, Serialize};
use std::ops::Deref;
use std::sync::Arc;

/// Purchases delivered together by one listener invocation.
///
/// The records are shared, not copied, when a batch is fanned out to several
/// subscribers. A batch is never split or merged.
#[derive(Debug)]
pub struct PurchaseBatch<P> {
    purchases: Arc<[P]>,
}

impl<P> PurchaseBatch<P> {
    #[must_use]
    pub fn new(purchases: Vec<P>) -> Self {
        Self { purchases: purchases.into() }
    }

    #[must_use]
    pub fn as_slice(&self) -> &[P] {
        &self.purchases
    }

    /// Returns `true` when both handles refer to the same delivered batch.
    #[must_use]
    pub fn same_batch(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.purchases, &other.purchases)
    }
}

impl<P: Clone> PurchaseBatch<P> {
    #[must_use]
    pub fn to_vec(&self) -> Vec<P> {
        self.purchases.to_vec()
    }
}

impl<P> Clone for PurchaseBatch<P> {
    fn clone(&self) -> Self {
        Self { purchases: Arc::clone(&self.purchases) }
    }
}

impl<P> Deref for PurchaseBatch<P> {
    type Target = [P];

    fn deref(&self) -> &Self::Target {
        &self.purchases
    }
}

impl<P> From<Vec<P>> for PurchaseBatch<P> {
    fn from(purchases: Vec<P>) -> Self {
        Self::new(purchases)
    }
}

impl<P: PartialEq> PartialEq for PurchaseBatch<P> {
    fn eq(&self, other: &Self) -> bool {
        self.purchases[..] == other.purchases[..]
    }
}

impl<P: Eq> Eq for PurchaseBatch<P> {}

/// The in-app purchase flow was launched.
///
/// This reflects the launch call only; the purchase itself is reported as a
/// purchase update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseResponse {
    pub kind: ErrorKind,
}

/// The subscription purchase flow was launched.
///
/// Like [`PurchaseResponse`], completion of the purchase arrives as a purchase update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionResponse {
    pub kind: ErrorKind,
}

/// A consumed purchase, with the token echoed back by the SDK.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsumptionResponse {
    pub kind: ErrorKind,
    pub purchase_token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_the_same_records() {
        let batch = PurchaseBatch::new(vec!["a", "b"]);
        let copy = batch.clone();

        assert!(batch.same_batch(&copy));
        assert_eq!(copy.as_slice(), ["a", "b"]);
    }

    #[test]
    fn test_equal_contents_from_different_deliveries() {
        let first = PurchaseBatch::new(vec![1, 2, 3]);
        let second = PurchaseBatch::from(vec![1, 2, 3]);

        assert_eq!(first, second);
        assert!(!first.same_batch(&second));
        assert_eq!(second.len(), 3);
    }
}
