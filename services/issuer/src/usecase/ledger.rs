use chrono::{Duration, Utc};
use rand::RngExt;
use uuid::Uuid;

use crate::domain::repository::OtpRepository;
use crate::domain::types::{OTP_LEN, OTP_TTL_SECS, OtpRecord, VerifyOutcome};
use crate::error::IssuerError;

/// Draw a code uniformly from 000000–999999, left-padded to six digits.
pub fn generate_code() -> String {
    let n: u32 = rand::rng().random_range(0..=999_999);
    format!("{n:0width$}", width = OTP_LEN)
}

fn is_well_formed(code: &str) -> bool {
    code.len() == OTP_LEN && code.bytes().all(|b| b.is_ascii_digit())
}

/// Issues and consumes single-use codes scoped to (tenant, recipient).
///
/// Holds no state of its own; concurrent callers are serialized only by the
/// repository's conditional consume.
pub struct OtpLedger<R: OtpRepository> {
    pub records: R,
}

impl<R: OtpRepository> OtpLedger<R> {
    pub fn new(records: R) -> Self {
        Self { records }
    }

    /// Mint and persist a fresh code. Earlier outstanding codes for the same
    /// recipient stay valid.
    pub async fn issue(&self, tenant_id: Uuid, recipient: &str) -> Result<OtpRecord, IssuerError> {
        let issued_at = Utc::now();
        let record = OtpRecord {
            id: Uuid::now_v7(),
            tenant_id,
            recipient: recipient.to_owned(),
            code: generate_code(),
            issued_at,
            expires_at: issued_at + Duration::seconds(OTP_TTL_SECS),
            consumed_at: None,
        };
        self.records.insert(&record).await?;
        Ok(record)
    }

    /// Check a presented code and consume it on success.
    ///
    /// Only the newest unconsumed match is considered. An expired match is
    /// reported as `Expired` and left unconsumed.
    pub async fn verify(
        &self,
        tenant_id: Uuid,
        recipient: &str,
        code: &str,
    ) -> Result<VerifyOutcome, IssuerError> {
        if !is_well_formed(code) {
            return Ok(VerifyOutcome::Invalid);
        }

        let Some(record) = self
            .records
            .find_latest_unconsumed(tenant_id, recipient, code)
            .await?
        else {
            return Ok(VerifyOutcome::Invalid);
        };

        let now = Utc::now();
        if record.is_expired_at(now) {
            return Ok(VerifyOutcome::Expired);
        }

        if self.records.consume(record.id, now).await? {
            Ok(VerifyOutcome::Valid)
        } else {
            // Lost the race to a concurrent verify of the same record.
            Ok(VerifyOutcome::Invalid)
        }
    }
}
