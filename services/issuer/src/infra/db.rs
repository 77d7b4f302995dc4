use anyhow::Context as _;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect,
    sea_query::{Expr, OnConflict},
};
use uuid::Uuid;

use otpgate_issuer_schema::{otp_records, templates, tenants};

use crate::domain::repository::{OtpRepository, TemplateRepository, TenantRepository};
use crate::domain::types::{MailConfig, MailTransport, OtpRecord, Template, Tenant};
use crate::error::IssuerError;

// ── Tenant repository ────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbTenantRepository {
    pub db: DatabaseConnection,
}

impl TenantRepository for DbTenantRepository {
    async fn find_by_api_key(&self, api_key: &str) -> Result<Option<Tenant>, IssuerError> {
        let model = tenants::Entity::find()
            .filter(tenants::Column::ApiKey.eq(api_key))
            .one(&self.db)
            .await
            .context("find tenant by api key")?;
        model.map(tenant_from_model).transpose()
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Tenant>, IssuerError> {
        let model = tenants::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find tenant by id")?;
        model.map(tenant_from_model).transpose()
    }

    async fn list(&self) -> Result<Vec<Tenant>, IssuerError> {
        let models = tenants::Entity::find()
            .order_by_asc(tenants::Column::CreatedAt)
            .all(&self.db)
            .await
            .context("list tenants")?;
        models.into_iter().map(tenant_from_model).collect()
    }

    async fn create(&self, tenant: &Tenant) -> Result<(), IssuerError> {
        let mail = &tenant.mail;
        tenants::ActiveModel {
            id: Set(tenant.id),
            name: Set(tenant.name.clone()),
            api_key: Set(tenant.api_key.clone()),
            mail_transport: Set(mail.transport.as_str().to_owned()),
            smtp_host: Set(mail.host.clone()),
            smtp_port: Set(mail.port.map(i32::from)),
            smtp_username: Set(mail.username.clone()),
            smtp_password: Set(mail.password.clone()),
            sender_name: Set(mail.sender_name.clone()),
            sender_picture: Set(mail.sender_picture.clone()),
            created_at: Set(tenant.created_at),
            updated_at: Set(tenant.updated_at),
        }
        .insert(&self.db)
        .await
        .context("create tenant")?;
        Ok(())
    }

    async fn update_mail_config(
        &self,
        id: Uuid,
        config: &MailConfig,
    ) -> Result<bool, IssuerError> {
        let result = tenants::Entity::update_many()
            .col_expr(
                tenants::Column::MailTransport,
                Expr::value(config.transport.as_str()),
            )
            .col_expr(tenants::Column::SmtpHost, Expr::value(config.host.clone()))
            .col_expr(
                tenants::Column::SmtpPort,
                Expr::value(config.port.map(i32::from)),
            )
            .col_expr(
                tenants::Column::SmtpUsername,
                Expr::value(config.username.clone()),
            )
            .col_expr(
                tenants::Column::SmtpPassword,
                Expr::value(config.password.clone()),
            )
            .col_expr(
                tenants::Column::SenderName,
                Expr::value(config.sender_name.clone()),
            )
            .col_expr(
                tenants::Column::SenderPicture,
                Expr::value(config.sender_picture.clone()),
            )
            .col_expr(tenants::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(tenants::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .context("update tenant mail config")?;
        Ok(result.rows_affected > 0)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, IssuerError> {
        // templates and otp_records reference tenants with ON DELETE CASCADE.
        let result = tenants::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .context("delete tenant")?;
        Ok(result.rows_affected > 0)
    }
}

fn tenant_from_model(model: tenants::Model) -> Result<Tenant, IssuerError> {
    let transport = model
        .mail_transport
        .parse::<MailTransport>()
        .map_err(anyhow::Error::msg)
        .context("decode tenant mail transport")?;
    let port = model
        .smtp_port
        .map(u16::try_from)
        .transpose()
        .context("decode tenant smtp port")?;
    Ok(Tenant {
        id: model.id,
        name: model.name,
        api_key: model.api_key,
        mail: MailConfig {
            transport,
            host: model.smtp_host,
            port,
            username: model.smtp_username,
            password: model.smtp_password,
            sender_name: model.sender_name,
            sender_picture: model.sender_picture,
        },
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

// ── Template repository ──────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbTemplateRepository {
    pub db: DatabaseConnection,
}

impl TemplateRepository for DbTemplateRepository {
    async fn find(&self, tenant_id: Uuid, id: &str) -> Result<Option<Template>, IssuerError> {
        let model = templates::Entity::find_by_id((tenant_id, id.to_owned()))
            .one(&self.db)
            .await
            .context("find template")?;
        Ok(model.map(template_from_model))
    }

    async fn list_by_tenant(&self, tenant_id: Uuid) -> Result<Vec<Template>, IssuerError> {
        let models = templates::Entity::find()
            .filter(templates::Column::TenantId.eq(tenant_id))
            .order_by_asc(templates::Column::Id)
            .all(&self.db)
            .await
            .context("list templates by tenant")?;
        Ok(models.into_iter().map(template_from_model).collect())
    }

    async fn upsert(&self, template: &Template) -> Result<(), IssuerError> {
        let model = templates::ActiveModel {
            tenant_id: Set(template.tenant_id),
            id: Set(template.id.clone()),
            name: Set(template.name.clone()),
            subject: Set(template.subject.clone()),
            body: Set(template.body.clone()),
            created_at: Set(template.created_at),
            updated_at: Set(template.updated_at),
        };
        templates::Entity::insert(model)
            .on_conflict(
                OnConflict::columns([templates::Column::TenantId, templates::Column::Id])
                    .update_columns([
                        templates::Column::Name,
                        templates::Column::Subject,
                        templates::Column::Body,
                        templates::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .context("upsert template")?;
        Ok(())
    }

    async fn delete(&self, tenant_id: Uuid, id: &str) -> Result<bool, IssuerError> {
        let result = templates::Entity::delete_many()
            .filter(templates::Column::TenantId.eq(tenant_id))
            .filter(templates::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .context("delete template")?;
        Ok(result.rows_affected > 0)
    }
}

fn template_from_model(model: templates::Model) -> Template {
    Template {
        tenant_id: model.tenant_id,
        id: model.id,
        name: model.name,
        subject: model.subject,
        body: model.body,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

// ── OTP repository ───────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbOtpRepository {
    pub db: DatabaseConnection,
}

impl OtpRepository for DbOtpRepository {
    async fn insert(&self, record: &OtpRecord) -> Result<(), IssuerError> {
        otp_records::ActiveModel {
            id: Set(record.id),
            tenant_id: Set(record.tenant_id),
            recipient: Set(record.recipient.clone()),
            code: Set(record.code.clone()),
            issued_at: Set(record.issued_at),
            expires_at: Set(record.expires_at),
            consumed_at: Set(None),
        }
        .insert(&self.db)
        .await
        .context("insert otp record")?;
        Ok(())
    }

    async fn find_latest_unconsumed(
        &self,
        tenant_id: Uuid,
        recipient: &str,
        code: &str,
    ) -> Result<Option<OtpRecord>, IssuerError> {
        let model = otp_records::Entity::find()
            .filter(otp_records::Column::TenantId.eq(tenant_id))
            .filter(otp_records::Column::Recipient.eq(recipient))
            .filter(otp_records::Column::Code.eq(code))
            .filter(otp_records::Column::ConsumedAt.is_null())
            .order_by_desc(otp_records::Column::IssuedAt)
            .order_by_desc(otp_records::Column::Id)
            .one(&self.db)
            .await
            .context("find latest unconsumed otp")?;
        Ok(model.map(otp_from_model))
    }

    async fn consume(&self, id: Uuid, at: DateTime<Utc>) -> Result<bool, IssuerError> {
        // Single conditional UPDATE: of two racing verifies only one sees a row affected.
        let result = otp_records::Entity::update_many()
            .col_expr(otp_records::Column::ConsumedAt, Expr::value(Some(at)))
            .filter(otp_records::Column::Id.eq(id))
            .filter(otp_records::Column::ConsumedAt.is_null())
            .exec(&self.db)
            .await
            .context("consume otp")?;
        Ok(result.rows_affected == 1)
    }

    async fn list_recent(
        &self,
        tenant_id: Uuid,
        limit: u64,
    ) -> Result<Vec<OtpRecord>, IssuerError> {
        let models = otp_records::Entity::find()
            .filter(otp_records::Column::TenantId.eq(tenant_id))
            .order_by_desc(otp_records::Column::IssuedAt)
            .order_by_desc(otp_records::Column::Id)
            .limit(limit)
            .all(&self.db)
            .await
            .context("list recent otps")?;
        Ok(models.into_iter().map(otp_from_model).collect())
    }
}

fn otp_from_model(model: otp_records::Model) -> OtpRecord {
    OtpRecord {
        id: model.id,
        tenant_id: model.tenant_id,
        recipient: model.recipient,
        code: model.code,
        issued_at: model.issued_at,
        expires_at: model.expires_at,
        consumed_at: model.consumed_at,
    }
}
