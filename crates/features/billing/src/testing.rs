//! In-memory stand-in for the vendor SDK.
//!
//! [`fake_client`] returns a builder to hand to the adapter and a control
//! handle for the test. Calls made by the adapter are recorded; their
//! callbacks stay queued until the handle fires them, oldest first.
//! Callbacks always run with no internal lock held, so they may call back
//! into the client.

use crate::sdk::{
    BillingClient, BillingClientBuilder, ClientStateListener, ConsumeCallback,
    PurchaseHistoryCallback, PurchasesUpdatedListener, SkuDetailsCallback,
};
use parking_lot::Mutex;
use pbill_kernel::domain::{BillingFlowParams, BillingResult, ProductType, SkuDetailsParams};
use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

/// A purchase record as the fake SDK reports it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FakePurchase {
    pub sku: String,
    pub purchase_token: String,
}

impl FakePurchase {
    pub fn new(sku: impl Into<String>, purchase_token: impl Into<String>) -> Self {
        Self { sku: sku.into(), purchase_token: purchase_token.into() }
    }
}

/// A catalog entry as the fake SDK reports it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FakeSkuDetails {
    pub sku: String,
    pub product_type: ProductType,
}

impl FakeSkuDetails {
    pub fn new(sku: impl Into<String>, product_type: ProductType) -> Self {
        Self { sku: sku.into(), product_type }
    }
}

/// Launch context accepted by the fake client.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FakeActivity;

struct Inner {
    purchases_listener: Option<Arc<dyn PurchasesUpdatedListener<FakePurchase>>>,
    connection_listeners: Vec<Arc<dyn ClientStateListener>>,
    sku_queries: VecDeque<(SkuDetailsParams, SkuDetailsCallback<FakeSkuDetails>)>,
    history_queries: VecDeque<(ProductType, PurchaseHistoryCallback<FakePurchase>)>,
    consumptions: VecDeque<(String, ConsumeCallback)>,
    launch_result: BillingResult,
    launches: Vec<BillingFlowParams>,
    ended_connections: usize,
}

impl Default for Inner {
    fn default() -> Self {
        Self {
            purchases_listener: None,
            connection_listeners: Vec::new(),
            sku_queries: VecDeque::new(),
            history_queries: VecDeque::new(),
            consumptions: VecDeque::new(),
            launch_result: BillingResult::ok(),
            launches: Vec::new(),
            ended_connections: 0,
        }
    }
}

impl fmt::Debug for Inner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Inner")
            .field("has_purchases_listener", &self.purchases_listener.is_some())
            .field("connection_attempts", &self.connection_listeners.len())
            .field("sku_queries", &self.sku_queries.len())
            .field("history_queries", &self.history_queries.len())
            .field("consumptions", &self.consumptions.len())
            .field("launches", &self.launches)
            .field("ended_connections", &self.ended_connections)
            .finish_non_exhaustive()
    }
}

/// Creates a fake client builder together with its control handle.
#[must_use]
pub fn fake_client() -> (FakeClientBuilder, FakeBillingHandle) {
    let inner = Arc::new(Mutex::new(Inner::default()));
    (FakeClientBuilder { inner: Arc::clone(&inner) }, FakeBillingHandle { inner })
}

#[derive(Debug)]
pub struct FakeClientBuilder {
    inner: Arc<Mutex<Inner>>,
}

impl BillingClientBuilder for FakeClientBuilder {
    type Client = FakeBillingClient;

    fn build(self, listener: Arc<dyn PurchasesUpdatedListener<FakePurchase>>) -> FakeBillingClient {
        self.inner.lock().purchases_listener = Some(listener);
        FakeBillingClient { inner: self.inner }
    }
}

#[derive(Debug)]
pub struct FakeBillingClient {
    inner: Arc<Mutex<Inner>>,
}

impl BillingClient for FakeBillingClient {
    type Purchase = FakePurchase;
    type SkuDetails = FakeSkuDetails;
    type LaunchContext = FakeActivity;

    fn start_connection(&self, listener: Arc<dyn ClientStateListener>) {
        self.inner.lock().connection_listeners.push(listener);
    }

    fn end_connection(&self) {
        self.inner.lock().ended_connections += 1;
    }

    fn query_sku_details_async(
        &self,
        params: SkuDetailsParams,
        callback: SkuDetailsCallback<FakeSkuDetails>,
    ) {
        self.inner.lock().sku_queries.push_back((params, callback));
    }

    fn launch_billing_flow(
        &self,
        _context: &FakeActivity,
        params: BillingFlowParams,
    ) -> BillingResult {
        let mut inner = self.inner.lock();
        inner.launches.push(params);
        inner.launch_result.clone()
    }

    fn query_purchase_history_async(
        &self,
        product_type: ProductType,
        callback: PurchaseHistoryCallback<FakePurchase>,
    ) {
        self.inner.lock().history_queries.push_back((product_type, callback));
    }

    fn consume_async(&self, purchase_token: String, callback: ConsumeCallback) {
        self.inner.lock().consumptions.push_back((purchase_token, callback));
    }
}

/// Drives the fake SDK from a test.
#[derive(Debug, Clone)]
pub struct FakeBillingHandle {
    inner: Arc<Mutex<Inner>>,
}

impl FakeBillingHandle {
    /// Fires the setup callback of the latest connection attempt.
    ///
    /// Returns `false` if no attempt was made yet.
    pub fn finish_setup(&self, result: impl Into<BillingResult>) -> bool {
        let Some(listener) = self.latest_connection_listener() else {
            return false;
        };
        listener.on_billing_setup_finished(result.into());
        true
    }

    /// Fires the disconnect callback of the latest connection attempt.
    pub fn disconnect_service(&self) -> bool {
        let Some(listener) = self.latest_connection_listener() else {
            return false;
        };
        listener.on_billing_service_disconnected();
        true
    }

    /// The listener passed with the `attempt`-th connection request (zero-based).
    #[must_use]
    pub fn connection_listener(&self, attempt: usize) -> Option<Arc<dyn ClientStateListener>> {
        self.inner.lock().connection_listeners.get(attempt).cloned()
    }

    /// Invokes the purchases listener registered at build time.
    pub fn update_purchases(
        &self,
        result: impl Into<BillingResult>,
        purchases: Option<Vec<FakePurchase>>,
    ) -> bool {
        let Some(listener) = self.inner.lock().purchases_listener.clone() else {
            return false;
        };
        listener.on_purchases_updated(result.into(), purchases);
        true
    }

    /// Completes the oldest outstanding catalog query, returning its parameters.
    pub fn complete_sku_query(
        &self,
        result: impl Into<BillingResult>,
        details: Option<Vec<FakeSkuDetails>>,
    ) -> Option<SkuDetailsParams> {
        let (params, callback) = self.inner.lock().sku_queries.pop_front()?;
        callback(result.into(), details);
        Some(params)
    }

    /// Completes the oldest outstanding history query, returning its product type.
    pub fn complete_history(
        &self,
        result: impl Into<BillingResult>,
        purchases: Option<Vec<FakePurchase>>,
    ) -> Option<ProductType> {
        let (product_type, callback) = self.inner.lock().history_queries.pop_front()?;
        callback(result.into(), purchases);
        Some(product_type)
    }

    /// Completes the oldest outstanding consumption, echoing its token.
    pub fn complete_consumption(&self, result: impl Into<BillingResult>) -> Option<String> {
        let (purchase_token, callback) = self.inner.lock().consumptions.pop_front()?;
        callback(result.into(), purchase_token.clone());
        Some(purchase_token)
    }

    /// Drops every queued callback without invoking it.
    pub fn drop_pending_callbacks(&self) {
        let dropped = {
            let mut inner = self.inner.lock();
            (
                std::mem::take(&mut inner.sku_queries),
                std::mem::take(&mut inner.history_queries),
                std::mem::take(&mut inner.consumptions),
            )
        };
        drop(dropped);
    }

    /// The code every later launch reports.
    pub fn set_launch_result(&self, result: impl Into<BillingResult>) {
        self.inner.lock().launch_result = result.into();
    }

    #[must_use]
    pub fn launches(&self) -> Vec<BillingFlowParams> {
        self.inner.lock().launches.clone()
    }

    #[must_use]
    pub fn connection_attempts(&self) -> usize {
        self.inner.lock().connection_listeners.len()
    }

    #[must_use]
    pub fn ended_connections(&self) -> usize {
        self.inner.lock().ended_connections
    }

    #[must_use]
    pub fn outstanding_calls(&self) -> usize {
        let inner = self.inner.lock();
        inner.sku_queries.len() + inner.history_queries.len() + inner.consumptions.len()
    }

    fn latest_connection_listener(&self) -> Option<Arc<dyn ClientStateListener>> {
        self.inner.lock().connection_listeners.last().cloned()
    }
}
