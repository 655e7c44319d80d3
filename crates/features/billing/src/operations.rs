//! One adapter per SDK operation family.
//!
//! Each adapter issues its SDK call immediately and returns a [`Pending`] that
//! resolves exactly once. Success is decided by the mapped response code
//! alone; an ok code with no result list counts as a failure.

use crate::pending::{Pending, pending};
use crate::sdk::BillingClient;
use pbill_kernel::domain::{
    BillingFlowParams, BillingResult, ConsumptionResponse, ErrorKind, Operation, OperationError,
    ProductType, PurchaseResponse, SkuDetailsParams, SubscriptionResponse,
};
use tracing::{debug, warn};

/// Catalog entries for `skus` of the given product type.
pub fn query_sku_details<C, I, S>(
    client: &C,
    product_type: ProductType,
    skus: I,
) -> Pending<Vec<C::SkuDetails>>
where
    C: BillingClient,
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let operation = match product_type {
        ProductType::InApp => Operation::ItemsForPurchaseQuery,
        ProductType::Subs => Operation::SubscriptionsForPurchaseQuery,
    };
    let params = SkuDetailsParams::new(product_type, skus);
    debug!(%operation, skus = params.skus.len(), "Querying SKU details");

    let (completer, handle) = pending(operation.into(), OperationError::abandoned(operation));
    client.query_sku_details_async(
        params,
        Box::new(move |result, details| {
            completer.complete(resolve_list(operation, &result, details));
        }),
    );
    handle
}

/// Launches the in-app purchase UI for `sku`.
///
/// Already resolved when returned: the value describes the launch, while the
/// purchase itself arrives later as a purchase update.
pub fn launch_purchase<C: BillingClient>(
    client: &C,
    context: &C::LaunchContext,
    sku: impl Into<String>,
) -> Pending<PurchaseResponse> {
    let result = launch(client, context, BillingFlowParams::new(sku, ProductType::InApp));
    Pending::ready(
        resolve_launch(Operation::PurchaseLaunch, &result).map(|kind| PurchaseResponse { kind }),
    )
}

/// Launches the subscription purchase UI for `sku`.
pub fn launch_subscription<C: BillingClient>(
    client: &C,
    context: &C::LaunchContext,
    sku: impl Into<String>,
) -> Pending<SubscriptionResponse> {
    let result = launch(client, context, BillingFlowParams::new(sku, ProductType::Subs));
    let response = resolve_launch(Operation::SubscriptionLaunch, &result);
    Pending::ready(response.map(|kind| SubscriptionResponse { kind }))
}

/// Purchase history of the given product type.
pub fn query_history<C: BillingClient>(
    client: &C,
    product_type: ProductType,
) -> Pending<Vec<C::Purchase>> {
    let operation = match product_type {
        ProductType::InApp => Operation::PurchaseHistoryQuery,
        ProductType::Subs => Operation::SubscriptionHistoryQuery,
    };
    debug!(%operation, "Querying purchase history");

    let (completer, handle) = pending(operation.into(), OperationError::abandoned(operation));
    client.query_purchase_history_async(
        product_type,
        Box::new(move |result, purchases| {
            completer.complete(resolve_list(operation, &result, purchases));
        }),
    );
    handle
}

/// Consumes the purchase identified by `purchase_token`.
pub fn consume<C: BillingClient>(
    client: &C,
    purchase_token: impl Into<String>,
) -> Pending<ConsumptionResponse> {
    let operation = Operation::Consumption;
    debug!(%operation, "Consuming purchase");

    let (completer, handle) = pending(operation.into(), OperationError::abandoned(operation));
    client.consume_async(
        purchase_token.into(),
        Box::new(move |result, purchase_token| {
            completer.complete(resolve_consumption(&result, purchase_token));
        }),
    );
    handle
}

fn launch<C: BillingClient>(
    client: &C,
    context: &C::LaunchContext,
    params: BillingFlowParams,
) -> BillingResult {
    debug!(sku = %params.sku, product_type = %params.product_type, "Launching billing flow");
    client.launch_billing_flow(context, params)
}

fn resolve_list<T>(
    operation: Operation,
    result: &BillingResult,
    items: Option<Vec<T>>,
) -> Result<Vec<T>, OperationError> {
    let kind = ErrorKind::from(result.code);
    match items {
        Some(items) if kind.is_ok() => Ok(items),
        None if kind.is_ok() => Err(report(OperationError::missing_result(operation), result)),
        _ => Err(report(OperationError::from_result(operation, result), result)),
    }
}

fn resolve_launch(
    operation: Operation,
    result: &BillingResult,
) -> Result<ErrorKind, OperationError> {
    let kind = ErrorKind::from(result.code);
    if kind.is_ok() {
        Ok(kind)
    } else {
        Err(report(OperationError::from_result(operation, result), result))
    }
}

fn resolve_consumption(
    result: &BillingResult,
    purchase_token: String,
) -> Result<ConsumptionResponse, OperationError> {
    let kind = ErrorKind::from(result.code);
    if kind.is_ok() {
        Ok(ConsumptionResponse { kind, purchase_token })
    } else {
        Err(report(OperationError::from_result(Operation::Consumption, result), result))
    }
}

fn report(error: OperationError, result: &BillingResult) -> OperationError {
    warn!(
        operation = %error.operation,
        code = result.code.value(),
        kind = %error.kind,
        "Billing operation failed"
    );
    error
}

#[cfg(test)]
mod tests {
    use super::*;
    use pbill_kernel::domain::ResponseCode;

    #[test]
    fn test_ok_list_passes_through_in_order() {
        let items =
            resolve_list(Operation::ItemsForPurchaseQuery, &BillingResult::ok(), Some(vec![3, 1, 2]));
        assert_eq!(items, Ok(vec![3, 1, 2]));
    }

    #[test]
    fn test_ok_without_list_is_an_error_for_every_list_family() {
        for operation in [Operation::ItemsForPurchaseQuery, Operation::SubscriptionHistoryQuery] {
            let err = resolve_list::<u8>(operation, &BillingResult::ok(), None).unwrap_err();
            assert_eq!(err.operation, operation);
            assert_eq!(err.kind, ErrorKind::Error);
        }
    }

    #[test]
    fn test_failure_code_ignores_the_list() {
        let result = BillingResult::new(ResponseCode::SERVICE_UNAVAILABLE);
        let err =
            resolve_list(Operation::PurchaseHistoryQuery, &result, Some(vec![1])).unwrap_err();
        assert_eq!(err.kind, ErrorKind::ServiceUnavailable);
    }

    #[test]
    fn test_launch_failure_reports_its_own_operation() {
        let result = BillingResult::new(ResponseCode::ITEM_ALREADY_OWNED);
        let err = resolve_launch(Operation::PurchaseLaunch, &result).unwrap_err();
        assert_eq!(err.operation, Operation::PurchaseLaunch);
        assert_eq!(err.kind, ErrorKind::ItemAlreadyOwned);
    }

    #[test]
    fn test_consumption_echoes_the_token() {
        let response = resolve_consumption(&BillingResult::ok(), "token123".to_owned()).unwrap();
        assert_eq!(response.purchase_token, "token123");
        assert_eq!(response.kind, ErrorKind::Ok);

        let result = BillingResult::new(ResponseCode::ITEM_NOT_OWNED);
        let err = resolve_consumption(&result, "t".to_owned());
        assert_eq!(err.unwrap_err().kind, ErrorKind::ItemNotOwned);
    }
}
