use chrono::Duration;

use otpgate_issuer::domain::types::OTP_TTL_SECS;
use otpgate_issuer::error::IssuerError;
use otpgate_issuer::usecase::otp::{VerifyOtpInput, VerifyOtpUseCase};

use crate::helpers::{MockOtpRepo, MockStore, MockTenantRepo, RECIPIENT, otp_issued_ago, test_tenant};

fn usecase(store: &MockStore) -> VerifyOtpUseCase<MockTenantRepo, MockOtpRepo> {
    VerifyOtpUseCase {
        tenants: store.tenant_repo(),
        ledger: store.ledger(),
    }
}

fn input(code: &str) -> VerifyOtpInput {
    VerifyOtpInput {
        recipient: RECIPIENT.to_owned(),
        code: code.to_owned(),
    }
}

#[tokio::test]
async fn should_verify_issued_code_once() {
    let tenant = test_tenant();
    let store = MockStore::with_tenant(tenant.clone());
    let record = store.ledger().issue(tenant.id, RECIPIENT).await.unwrap();
    let uc = usecase(&store);

    uc.execute(&tenant.api_key, input(&record.code)).await.unwrap();

    let again = uc.execute(&tenant.api_key, input(&record.code)).await;
    assert!(
        matches!(again, Err(IssuerError::InvalidOtp)),
        "expected InvalidOtp on reuse, got {again:?}"
    );
}

#[tokio::test]
async fn should_trim_presented_code() {
    let tenant = test_tenant();
    let store = MockStore::with_tenant(tenant.clone());
    let record = store.ledger().issue(tenant.id, RECIPIENT).await.unwrap();

    usecase(&store)
        .execute(&tenant.api_key, input(&format!("  {} \n", record.code)))
        .await
        .unwrap();
}

#[tokio::test]
async fn should_map_expired_code_to_expired_otp() {
    let tenant = test_tenant();
    let store = MockStore::with_tenant(tenant.clone());
    store.add_otp(otp_issued_ago(
        tenant.id,
        "246810",
        Duration::seconds(OTP_TTL_SECS * 2),
    ));

    let result = usecase(&store).execute(&tenant.api_key, input("246810")).await;
    assert!(
        matches!(result, Err(IssuerError::ExpiredOtp)),
        "expected ExpiredOtp, got {result:?}"
    );
}

#[tokio::test]
async fn should_reject_code_under_other_tenants_key() {
    let tenant = test_tenant();
    let other = test_tenant();
    let store = MockStore::with_tenant(tenant.clone());
    store.inner.lock().unwrap().tenants.push(other.clone());
    let record = store.ledger().issue(tenant.id, RECIPIENT).await.unwrap();

    let result = usecase(&store).execute(&other.api_key, input(&record.code)).await;
    assert!(
        matches!(result, Err(IssuerError::InvalidOtp)),
        "expected InvalidOtp, got {result:?}"
    );
    assert!(store.otp(record.id).consumed_at.is_none());
}

#[tokio::test]
async fn should_reject_unknown_api_key_before_lookup() {
    let store = MockStore::with_tenant(test_tenant());
    let result = usecase(&store).execute("sk_nope", input("123456")).await;
    assert!(
        matches!(result, Err(IssuerError::InvalidApiKey)),
        "expected InvalidApiKey, got {result:?}"
    );
}
