use std::collections::BTreeMap;

use chrono::{Duration, Utc};

use otpgate_issuer::domain::types::OTP_TTL_SECS;
use otpgate_issuer::error::IssuerError;
use otpgate_issuer::usecase::otp::{SendOtpInput, SendOtpUseCase};

use crate::helpers::{
    MockMailer, MockStore, RECIPIENT, test_template, test_tenant, unconfigured_tenant,
};

fn input(template_id: &str, fields: &[(&str, &str)]) -> SendOtpInput {
    SendOtpInput {
        recipient: RECIPIENT.to_owned(),
        template_id: template_id.to_owned(),
        fields: fields
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect::<BTreeMap<_, _>>(),
    }
}

fn usecase(
    store: &MockStore,
    mailer: MockMailer,
) -> SendOtpUseCase<
    crate::helpers::MockTenantRepo,
    crate::helpers::MockTemplateRepo,
    crate::helpers::MockOtpRepo,
    MockMailer,
> {
    SendOtpUseCase {
        tenants: store.tenant_repo(),
        templates: store.template_repo(),
        ledger: store.ledger(),
        mailer,
    }
}

#[tokio::test]
async fn should_issue_render_and_deliver() {
    let tenant = test_tenant();
    let store = MockStore::with_tenant(tenant.clone());
    store.add_template(test_template(tenant.id, "login"));
    let mailer = MockMailer::new();
    let sent = mailer.sent_handle();

    let before = Utc::now();
    let output = usecase(&store, mailer)
        .execute(&tenant.api_key, input("login", &[("app", "Acme"), ("user", "Ada")]))
        .await
        .unwrap();

    let records = store.otps();
    assert_eq!(records.len(), 1);
    let code = &records[0].code;
    assert_eq!(output.expires_at, records[0].expires_at);
    assert!(output.expires_at >= before + Duration::seconds(OTP_TTL_SECS));

    let sent = sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, RECIPIENT);
    assert_eq!(sent[0].subject, format!("Your code is {code}"));
    assert_eq!(
        sent[0].html_body,
        format!("<p>Hi Ada, use <b>{code}</b> for Acme.</p>")
    );
}

#[tokio::test]
async fn should_fill_friendly_name_when_user_absent() {
    let tenant = test_tenant();
    let store = MockStore::with_tenant(tenant.clone());
    store.add_template(test_template(tenant.id, "login"));
    let mailer = MockMailer::new();
    let sent = mailer.sent_handle();

    usecase(&store, mailer)
        .execute(&tenant.api_key, input("login", &[]))
        .await
        .unwrap();

    let body = &sent.lock().unwrap()[0].html_body;
    assert!(body.starts_with("<p>Hi Valued User,"), "got {body}");
    assert!(body.contains("{{app}}"), "unmatched placeholder should stay");
}

#[tokio::test]
async fn should_reject_unknown_api_key() {
    let store = MockStore::with_tenant(test_tenant());
    let result = usecase(&store, MockMailer::new())
        .execute("sk_unknown", input("login", &[]))
        .await;

    assert!(
        matches!(result, Err(IssuerError::InvalidApiKey)),
        "expected InvalidApiKey, got {result:?}"
    );
    assert!(store.otps().is_empty());
}

#[tokio::test]
async fn should_not_use_another_tenants_template() {
    let tenant = test_tenant();
    let other = test_tenant();
    let store = MockStore::with_tenant(tenant.clone());
    store.add_template(test_template(other.id, "login"));

    let result = usecase(&store, MockMailer::new())
        .execute(&tenant.api_key, input("login", &[]))
        .await;

    assert!(
        matches!(result, Err(IssuerError::TemplateNotFound)),
        "expected TemplateNotFound, got {result:?}"
    );
    assert!(store.otps().is_empty());
}

#[tokio::test]
async fn should_refuse_when_mail_not_configured() {
    let tenant = unconfigured_tenant();
    let store = MockStore::with_tenant(tenant.clone());
    store.add_template(test_template(tenant.id, "login"));
    let mailer = MockMailer::new();
    let sent = mailer.sent_handle();

    let result = usecase(&store, mailer)
        .execute(&tenant.api_key, input("login", &[]))
        .await;

    assert!(
        matches!(result, Err(IssuerError::MailNotConfigured)),
        "expected MailNotConfigured, got {result:?}"
    );
    assert!(store.otps().is_empty(), "no record without a transport");
    assert!(sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_keep_issued_record_when_delivery_fails() {
    let tenant = test_tenant();
    let store = MockStore::with_tenant(tenant.clone());
    store.add_template(test_template(tenant.id, "login"));

    let result = usecase(&store, MockMailer::failing())
        .execute(&tenant.api_key, input("login", &[]))
        .await;

    assert!(
        matches!(result, Err(IssuerError::DeliveryFailed(_))),
        "expected DeliveryFailed, got {result:?}"
    );
    let records = store.otps();
    assert_eq!(records.len(), 1);
    assert!(records[0].consumed_at.is_none());
}
