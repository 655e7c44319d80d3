//! Capability traits for the vendor billing SDK.
//!
//! The adapter never talks to a concrete SDK; it drives whatever implements
//! [`BillingClient`]. Callbacks may run on any thread.

use pbill_kernel::domain::{BillingFlowParams, BillingResult, ProductType, SkuDetailsParams};
use std::sync::Arc;

/// Completion of a catalog query: result code plus the optional detail list.
pub type SkuDetailsCallback<S> = Box<dyn FnOnce(BillingResult, Option<Vec<S>>) + Send + 'static>;

/// Completion of a purchase-history query.
pub type PurchaseHistoryCallback<P> =
    Box<dyn FnOnce(BillingResult, Option<Vec<P>>) + Send + 'static>;

/// Completion of a consumption; the SDK echoes the purchase token back.
pub type ConsumeCallback = Box<dyn FnOnce(BillingResult, String) + Send + 'static>;

/// Receives the outcome of a connection attempt.
pub trait ClientStateListener: Send + Sync {
    fn on_billing_setup_finished(&self, result: BillingResult);

    /// The service went away, either before setup finished or later.
    fn on_billing_service_disconnected(&self);
}

/// Receives every purchase notification of a client.
pub trait PurchasesUpdatedListener<P>: Send + Sync {
    fn on_purchases_updated(&self, result: BillingResult, purchases: Option<Vec<P>>);
}

/// A connected (or connectable) billing client.
pub trait BillingClient: Send + Sync + 'static {
    /// Opaque purchase record.
    type Purchase: Clone + Send + Sync + 'static;
    /// Opaque catalog entry.
    type SkuDetails: Send + 'static;
    /// Whatever the SDK needs to show its purchase UI.
    type LaunchContext: ?Sized;

    fn start_connection(&self, listener: Arc<dyn ClientStateListener>);

    fn end_connection(&self);

    fn query_sku_details_async(
        &self,
        params: SkuDetailsParams,
        callback: SkuDetailsCallback<Self::SkuDetails>,
    );

    /// Starts the purchase UI. Synchronous: the returned code describes the
    /// launch only, never the purchase.
    fn launch_billing_flow(
        &self,
        context: &Self::LaunchContext,
        params: BillingFlowParams,
    ) -> BillingResult;

    fn query_purchase_history_async(
        &self,
        product_type: ProductType,
        callback: PurchaseHistoryCallback<Self::Purchase>,
    );

    fn consume_async(&self, purchase_token: String, callback: ConsumeCallback);
}

/// Builds a client around its one and only purchases listener.
pub trait BillingClientBuilder {
    type Client: BillingClient;

    fn build(self, listener: Arc<dyn PurchasesUpdatedListener<Purchase<Self>>>) -> Self::Client;
}

/// Purchase record type of the client a builder produces.
pub type Purchase<B> = <<B as BillingClientBuilder>::Client as BillingClient>::Purchase;
