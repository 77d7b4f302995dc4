use chrono::{Duration, Utc};
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, MockExecResult};
use uuid::Uuid;

use otpgate_issuer::domain::repository::OtpRepository;
use otpgate_issuer::domain::types::{OTP_TTL_SECS, VerifyOutcome};
use otpgate_issuer::infra::db::DbOtpRepository;
use otpgate_issuer::usecase::ledger::OtpLedger;
use otpgate_issuer_schema::otp_records;

use crate::helpers::RECIPIENT;

fn live_record(tenant_id: Uuid, code: &str) -> otp_records::Model {
    let issued_at = Utc::now() - Duration::seconds(10);
    otp_records::Model {
        id: Uuid::now_v7(),
        tenant_id,
        recipient: RECIPIENT.to_owned(),
        code: code.to_owned(),
        issued_at,
        expires_at: issued_at + Duration::seconds(OTP_TTL_SECS),
        consumed_at: None,
    }
}

fn rows_affected(n: u64) -> MockExecResult {
    MockExecResult {
        last_insert_id: 0,
        rows_affected: n,
    }
}

/// Executed SQL as one string, with Debug quote escaping undone.
fn sql_log(db: DatabaseConnection) -> String {
    format!("{:?}", db.into_transaction_log()).replace("\\\"", "\"")
}

#[tokio::test]
async fn should_consume_only_while_unconsumed() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([rows_affected(1)])
        .into_connection();
    let repo = DbOtpRepository { db: db.clone() };

    assert!(repo.consume(Uuid::now_v7(), Utc::now()).await.unwrap());

    let log = sql_log(db);
    assert!(log.contains(r#"UPDATE "otp_records" SET "consumed_at""#), "{log}");
    assert!(log.contains(r#""consumed_at" IS NULL"#), "{log}");
}

#[tokio::test]
async fn should_report_lost_consume_when_no_row_updated() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([rows_affected(0)])
        .into_connection();
    let repo = DbOtpRepository { db };

    assert!(!repo.consume(Uuid::now_v7(), Utc::now()).await.unwrap());
}

#[tokio::test]
async fn should_look_up_newest_unconsumed_match() {
    let tenant_id = Uuid::new_v4();
    let record = live_record(tenant_id, "123456");
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![record.clone()]])
        .into_connection();
    let repo = DbOtpRepository { db: db.clone() };

    let found = repo
        .find_latest_unconsumed(tenant_id, RECIPIENT, "123456")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.id, record.id);

    let log = sql_log(db);
    assert!(log.contains(r#""consumed_at" IS NULL"#), "{log}");
    assert!(log.contains(r#""issued_at" DESC"#), "{log}");
    assert!(log.contains(r#""id" DESC"#), "{log}");
    assert!(
        log.find(r#""issued_at" DESC"#) < log.find(r#""id" DESC"#),
        "issuance order must come before the id tie-break: {log}"
    );
}

#[tokio::test]
async fn should_verify_as_invalid_when_concurrent_consume_wins() {
    let tenant_id = Uuid::new_v4();
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![live_record(tenant_id, "654321")]])
        .append_exec_results([rows_affected(0)])
        .into_connection();
    let ledger = OtpLedger::new(DbOtpRepository { db });

    let outcome = ledger.verify(tenant_id, RECIPIENT, "654321").await.unwrap();
    assert_eq!(outcome, VerifyOutcome::Invalid);
}

#[tokio::test]
async fn should_verify_as_valid_when_consume_updates_one_row() {
    let tenant_id = Uuid::new_v4();
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![live_record(tenant_id, "654321")]])
        .append_exec_results([rows_affected(1)])
        .into_connection();
    let ledger = OtpLedger::new(DbOtpRepository { db: db.clone() });

    let outcome = ledger.verify(tenant_id, RECIPIENT, "654321").await.unwrap();
    assert_eq!(outcome, VerifyOutcome::Valid);

    let log = sql_log(db);
    assert!(log.contains(r#""consumed_at" IS NULL"#), "{log}");
}
