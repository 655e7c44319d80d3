use serde::Deserialize;
use std::ops::{Deref, DerefMut};
use std::path::PathBuf;
use std::sync::Arc;

/// Broadcast buffer used when nothing else is configured.
/// 128 comfortably covers bursts of purchase notifications.
pub const DEFAULT_BROADCAST_CAPACITY: usize = 128;

/// Top-level adapter configuration.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BillingConfigInner {
    pub purchase_updates: PurchaseUpdatesConfig,
    pub logging: LoggingConfig,
}

/// Thin Arc-wrapped config for inexpensive cloning into subsystems.
#[derive(Default, Debug, Clone, Deserialize)]
pub struct BillingConfig {
    #[serde(flatten, default)]
    inner: Arc<BillingConfigInner>,
}

impl Deref for BillingConfig {
    type Target = BillingConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for BillingConfig {
    fn deref_mut(&mut self) -> &mut BillingConfigInner {
        Arc::make_mut(&mut self.inner)
    }
}

/// What the purchase-update broadcast does after a failed listener callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RestartPolicy {
    /// The failure ends the broadcast for the lifetime of the client.
    #[default]
    Terminal,
    /// The failure ends current subscriptions; later subscribers see a fresh broadcast.
    Restart,
}

/// Purchase-update broadcast settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PurchaseUpdatesConfig {
    pub capacity: usize,
    pub restart: RestartPolicy,
}

/// Settings for the global tracing subscriber.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub name: String,
    /// `trace`, `debug`, `info`, `warn`, `error` or `off`.
    pub level: String,
    pub console: bool,
    pub directory: Option<PathBuf>,
    pub json: bool,
    pub max_files: usize,
    /// Extra directives, e.g. `pbill_billing=debug`.
    pub filter: Option<String>,
}

// --- Default ---

impl Default for PurchaseUpdatesConfig {
    fn default() -> Self {
        Self { capacity: DEFAULT_BROADCAST_CAPACITY, restart: RestartPolicy::Terminal }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            name: "pbill".to_owned(),
            level: "info".to_owned(),
            console: true,
            directory: None,
            json: false,
            max_files: 10,
            filter: None,
        }
    }
}
