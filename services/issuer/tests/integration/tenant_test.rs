use chrono::Duration;
use uuid::Uuid;

use otpgate_issuer::domain::types::{MailConfig, MailTransport};
use otpgate_issuer::error::IssuerError;
use otpgate_issuer::usecase::dashboard::DashboardUseCase;
use otpgate_issuer::usecase::tenant::{
    CreateTenantInput, CreateTenantUseCase, DeleteTenantUseCase, ListTenantsUseCase,
    UpdateMailConfigUseCase, resolve_tenant,
};

use crate::helpers::{
    MockMailer, MockStore, otp_issued_ago, smtp_config, test_template, test_tenant,
    unconfigured_tenant,
};

// ── create / resolve ─────────────────────────────────────────────────────────

#[tokio::test]
async fn should_create_tenant_resolvable_by_its_key() {
    let store = MockStore::new();
    let uc = CreateTenantUseCase {
        tenants: store.tenant_repo(),
    };

    let output = uc
        .execute(CreateTenantInput {
            name: "  acme  ".to_owned(),
        })
        .await
        .unwrap();

    assert!(output.api_key.starts_with("sk_"));
    let tenant = resolve_tenant(&store.tenant_repo(), &output.api_key)
        .await
        .unwrap();
    assert_eq!(tenant.id, output.id);
    assert_eq!(tenant.name, "acme");
    assert_eq!(tenant.mail.transport, MailTransport::Gmail);
    assert!(!tenant.mail.is_complete(), "new tenants start unconfigured");
}

#[tokio::test]
async fn should_reject_blank_tenant_name() {
    let store = MockStore::new();
    let uc = CreateTenantUseCase {
        tenants: store.tenant_repo(),
    };
    let result = uc
        .execute(CreateTenantInput {
            name: "   ".to_owned(),
        })
        .await;
    assert!(
        matches!(result, Err(IssuerError::MissingData)),
        "expected MissingData, got {result:?}"
    );
}

#[tokio::test]
async fn should_issue_distinct_keys_per_tenant() {
    let store = MockStore::new();
    let uc = CreateTenantUseCase {
        tenants: store.tenant_repo(),
    };
    let a = uc
        .execute(CreateTenantInput {
            name: "a".to_owned(),
        })
        .await
        .unwrap();
    let b = uc
        .execute(CreateTenantInput {
            name: "b".to_owned(),
        })
        .await
        .unwrap();

    assert_ne!(a.api_key, b.api_key);
    let listed = ListTenantsUseCase {
        tenants: store.tenant_repo(),
    }
    .execute()
    .await
    .unwrap();
    assert_eq!(listed.len(), 2);
}

// ── mail config ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_store_mail_config_after_live_check() {
    let tenant = unconfigured_tenant();
    let store = MockStore::with_tenant(tenant.clone());
    let uc = UpdateMailConfigUseCase {
        tenants: store.tenant_repo(),
        mailer: MockMailer::new(),
    };

    uc.execute(tenant.id, smtp_config()).await.unwrap();

    assert_eq!(store.tenant(tenant.id).unwrap().mail, smtp_config());
}

#[tokio::test]
async fn should_leave_config_untouched_when_live_check_fails() {
    let tenant = unconfigured_tenant();
    let store = MockStore::with_tenant(tenant.clone());
    let uc = UpdateMailConfigUseCase {
        tenants: store.tenant_repo(),
        mailer: MockMailer::rejecting(),
    };

    let result = uc.execute(tenant.id, smtp_config()).await;

    assert!(
        matches!(result, Err(IssuerError::InvalidMailConfig(_))),
        "expected InvalidMailConfig, got {result:?}"
    );
    assert_eq!(store.tenant(tenant.id).unwrap().mail, MailConfig::default());
}

#[tokio::test]
async fn should_name_missing_smtp_fields() {
    let tenant = unconfigured_tenant();
    let store = MockStore::with_tenant(tenant.clone());
    let uc = UpdateMailConfigUseCase {
        tenants: store.tenant_repo(),
        mailer: MockMailer::new(),
    };
    let partial = MailConfig {
        host: None,
        ..smtp_config()
    };

    let result = uc.execute(tenant.id, partial).await;

    match result {
        Err(IssuerError::InvalidMailConfig(msg)) => assert!(msg.contains("smtp_host"), "{msg}"),
        other => panic!("expected InvalidMailConfig, got {other:?}"),
    }
    assert_eq!(store.tenant(tenant.id).unwrap().mail, MailConfig::default());
}

#[tokio::test]
async fn should_return_not_found_for_unknown_tenant_mail_config() {
    let store = MockStore::new();
    let uc = UpdateMailConfigUseCase {
        tenants: store.tenant_repo(),
        mailer: MockMailer::new(),
    };
    let result = uc.execute(Uuid::new_v4(), smtp_config()).await;
    assert!(
        matches!(result, Err(IssuerError::TenantNotFound)),
        "expected TenantNotFound, got {result:?}"
    );
}

// ── delete / dashboard ───────────────────────────────────────────────────────

#[tokio::test]
async fn should_cascade_tenant_deletion() {
    let tenant = test_tenant();
    let survivor = test_tenant();
    let store = MockStore::with_tenant(tenant.clone());
    store.inner.lock().unwrap().tenants.push(survivor.clone());
    store.add_template(test_template(tenant.id, "login"));
    store.add_template(test_template(survivor.id, "login"));
    store.add_otp(otp_issued_ago(tenant.id, "123456", Duration::seconds(1)));
    store.add_otp(otp_issued_ago(survivor.id, "654321", Duration::seconds(1)));

    DeleteTenantUseCase {
        tenants: store.tenant_repo(),
    }
    .execute(tenant.id)
    .await
    .unwrap();

    assert!(store.tenant(tenant.id).is_none());
    assert!(store.templates().iter().all(|t| t.tenant_id == survivor.id));
    assert!(store.otps().iter().all(|r| r.tenant_id == survivor.id));
    assert_eq!(store.templates().len(), 1);
    assert_eq!(store.otps().len(), 1);

    let again = resolve_tenant(&store.tenant_repo(), &tenant.api_key).await;
    assert!(matches!(again, Err(IssuerError::InvalidApiKey)));
}

#[tokio::test]
async fn should_return_not_found_when_deleting_unknown_tenant() {
    let store = MockStore::new();
    let result = DeleteTenantUseCase {
        tenants: store.tenant_repo(),
    }
    .execute(Uuid::new_v4())
    .await;
    assert!(matches!(result, Err(IssuerError::TenantNotFound)));
}

#[tokio::test]
async fn should_show_dashboard_newest_first() {
    let tenant = test_tenant();
    let store = MockStore::with_tenant(tenant.clone());
    store.add_template(test_template(tenant.id, "login"));
    let old = otp_issued_ago(tenant.id, "111111", Duration::seconds(60));
    let new = otp_issued_ago(tenant.id, "222222", Duration::seconds(5));
    store.add_otp(old.clone());
    store.add_otp(new.clone());

    let dashboard = DashboardUseCase {
        tenants: store.tenant_repo(),
        templates: store.template_repo(),
        otps: store.otp_repo(),
    }
    .execute(tenant.id)
    .await
    .unwrap();

    assert_eq!(dashboard.tenant.id, tenant.id);
    assert_eq!(dashboard.templates.len(), 1);
    let ids: Vec<_> = dashboard.recent_otps.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![new.id, old.id]);
}
