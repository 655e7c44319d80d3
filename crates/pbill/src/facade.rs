use pbill_billing::sdk::{BillingClient, BillingClientBuilder};
use pbill_billing::{
    BillingError, BillingErrorExt, ConnectionManager, Pending, PurchaseUpdateBroadcaster,
    PurchaseUpdates, operations,
};
use pbill_domain::config::BillingConfig;
use pbill_domain::{
    ConnectionFailure, ConnectionResult, ConnectionState, ConsumptionResponse, ProductType,
    PurchaseResponse, SubscriptionResponse,
};
use pbill_event_bus::StateStream;
use pbill_kernel::config::load_config;
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// The adapter's public surface over one SDK client.
///
/// Owns the client for its whole lifetime. The purchases listener is wired in
/// at construction and never replaced; callers only ever get subscriptions
/// and result handles.
pub struct BillingFacade<C: BillingClient> {
    client: C,
    connection: ConnectionManager,
    purchases: PurchaseUpdateBroadcaster<C::Purchase>,
}

impl<C: BillingClient> BillingFacade<C> {
    /// Builds the client with the purchase broadcaster as its listener.
    ///
    /// # Errors
    /// Returns [`BillingError::InvalidConfiguration`] if the purchase update
    /// capacity is zero.
    pub fn new<B>(builder: B, config: &BillingConfig) -> Result<Self, BillingError>
    where
        B: BillingClientBuilder<Client = C>,
    {
        let settings = &config.purchase_updates;
        let purchases = PurchaseUpdateBroadcaster::new(settings)?;
        let client = builder.build(Arc::new(purchases.clone()));

        info!(capacity = settings.capacity, restart = ?settings.restart, "Billing facade ready");
        Ok(Self { client, connection: ConnectionManager::new(), purchases })
    }

    /// Same as [`BillingFacade::new`], with the configuration loaded from `path`
    /// (default `billing.*`) and `PBILL__` environment overrides.
    ///
    /// # Errors
    /// Returns [`BillingError::Config`] if the file is missing or malformed.
    pub fn from_config_file<B>(
        builder: B,
        path: Option<impl AsRef<Path>>,
    ) -> Result<Self, BillingError>
    where
        B: BillingClientBuilder<Client = C>,
    {
        let config: BillingConfig = load_config(path).context("billing facade")?;
        Self::new(builder, &config)
    }

    pub fn connect(&self) -> Pending<ConnectionResult, ConnectionFailure> {
        self.connection.connect(&self.client)
    }

    pub fn disconnect(&self) {
        self.connection.disconnect(&self.client);
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.connection.is_ready()
    }

    #[must_use]
    pub fn connection_state(&self) -> ConnectionState {
        self.connection.state()
    }

    #[must_use]
    pub fn observe_connection_state(&self) -> StateStream<ConnectionState> {
        self.connection.observe()
    }

    /// Every purchase batch delivered from now on, until the first failure.
    #[must_use]
    pub fn observe_purchase_updates(&self) -> PurchaseUpdates<C::Purchase> {
        self.purchases.subscribe()
    }

    pub fn query_items_for_purchase<I, S>(&self, skus: I) -> Pending<Vec<C::SkuDetails>>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        operations::query_sku_details(&self.client, ProductType::InApp, skus)
    }

    pub fn query_subscriptions_for_purchase<I, S>(&self, skus: I) -> Pending<Vec<C::SkuDetails>>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        operations::query_sku_details(&self.client, ProductType::Subs, skus)
    }

    /// Resolves as soon as the purchase UI was launched. The purchase itself
    /// arrives through [`BillingFacade::observe_purchase_updates`].
    pub fn purchase_item(
        &self,
        sku: impl Into<String>,
        context: &C::LaunchContext,
    ) -> Pending<PurchaseResponse> {
        operations::launch_purchase(&self.client, context, sku)
    }

    pub fn purchase_subscription(
        &self,
        sku: impl Into<String>,
        context: &C::LaunchContext,
    ) -> Pending<SubscriptionResponse> {
        operations::launch_subscription(&self.client, context, sku)
    }

    pub fn query_purchase_history(&self) -> Pending<Vec<C::Purchase>> {
        operations::query_history(&self.client, ProductType::InApp)
    }

    pub fn query_subscription_history(&self) -> Pending<Vec<C::Purchase>> {
        operations::query_history(&self.client, ProductType::Subs)
    }

    pub fn consume_item(&self, purchase_token: impl Into<String>) -> Pending<ConsumptionResponse> {
        operations::consume(&self.client, purchase_token)
    }
}

impl<C: BillingClient> fmt::Debug for BillingFacade<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BillingFacade")
            .field("client", &std::any::type_name::<C>())
            .field("connection", &self.connection.state())
            .field("purchase_subscribers", &self.purchases.subscriber_count())
            .finish()
    }
}
