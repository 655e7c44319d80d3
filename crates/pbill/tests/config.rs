use pbill::testing::fake_client;
use pbill::{BillingError, BillingFacade};
use std::fs;

#[tokio::test]
async fn facade_is_built_from_a_config_file() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("billing.toml");
    fs::write(&path, "[purchase_updates]\ncapacity = 4\nrestart = \"restart\"\n")?;

    let (builder, sdk) = fake_client();
    let billing = BillingFacade::from_config_file(builder, Some(&path))?;

    let mut before = billing.observe_purchase_updates();
    sdk.update_purchases(pbill::domain::ResponseCode::ERROR, None);
    assert!(before.recv().await.unwrap().is_err());

    // Restart policy from the file: the broadcast stays usable.
    let mut after = billing.observe_purchase_updates();
    sdk.update_purchases(pbill::domain::ResponseCode::OK, Some(Vec::new()));
    assert!(after.recv().await.unwrap().unwrap().is_empty());
    Ok(())
}

#[test]
fn zero_capacity_in_file_is_rejected() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("billing.toml");
    fs::write(&path, "[purchase_updates]\ncapacity = 0\n")?;

    let (builder, _sdk) = fake_client();
    let result = BillingFacade::from_config_file(builder, Some(&path));
    assert!(matches!(result, Err(BillingError::InvalidConfiguration { .. })));
    Ok(())
}

#[test]
fn missing_file_is_a_config_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let (builder, _sdk) = fake_client();

    let result = BillingFacade::from_config_file(builder, Some(dir.path().join("absent.toml")));
    assert!(matches!(
        result,
        Err(BillingError::Config { context: Some(ref c), .. }) if c == "billing facade"
    ));
}
