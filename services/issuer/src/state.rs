use sea_orm::DatabaseConnection;

use otpgate_auth_types::credentials::AdminToken;

use crate::error::IssuerError;
use crate::infra::db::{DbOtpRepository, DbTemplateRepository, DbTenantRepository};
use crate::infra::mail::SmtpMailer;
use crate::usecase::ledger::OtpLedger;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub mailer: SmtpMailer,
    pub admin_token: String,
}

impl AppState {
    pub fn tenant_repo(&self) -> DbTenantRepository {
        DbTenantRepository {
            db: self.db.clone(),
        }
    }

    pub fn template_repo(&self) -> DbTemplateRepository {
        DbTemplateRepository {
            db: self.db.clone(),
        }
    }

    pub fn otp_repo(&self) -> DbOtpRepository {
        DbOtpRepository {
            db: self.db.clone(),
        }
    }

    pub fn ledger(&self) -> OtpLedger<DbOtpRepository> {
        OtpLedger::new(self.otp_repo())
    }

    pub fn mailer(&self) -> SmtpMailer {
        self.mailer.clone()
    }

    /// Reject admin calls whose credential doesn't match the configured secret.
    pub fn authorize_admin(&self, token: &AdminToken) -> Result<(), IssuerError> {
        if token.matches(&self.admin_token) {
            Ok(())
        } else {
            Err(IssuerError::Unauthorized)
        }
    }
}
