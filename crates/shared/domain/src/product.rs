use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display};

/// Vendor product family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, AsRefStr)]
pub enum ProductType {
    #[serde(rename = "inapp")]
    #[strum(serialize = "inapp")]
    InApp,
    #[serde(rename = "subs")]
    #[strum(serialize = "subs")]
    Subs,
}

/// Parameters for a catalog query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkuDetailsParams {
    pub product_type: ProductType,
    pub skus: Vec<String>,
}

impl SkuDetailsParams {
    pub fn new<I, S>(product_type: ProductType, skus: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { product_type, skus: skus.into_iter().map(Into::into).collect() }
    }
}

/// Parameters for launching the purchase flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingFlowParams {
    pub sku: String,
    pub product_type: ProductType,
}

impl BillingFlowParams {
    pub fn new(sku: impl Into<String>, product_type: ProductType) -> Self {
        Self { sku: sku.into(), product_type }
    }
}
