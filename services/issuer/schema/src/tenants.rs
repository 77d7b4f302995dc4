use sea_orm::entity::prelude::*;

/// An onboarded system that issues OTPs under its own API key and mail account.
/// Mail columns stay NULL until the tenant's mail configuration is verified.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "tenants")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    #[sea_orm(unique)]
    pub api_key: String,
    /// `smtp` or `gmail`.
    pub mail_transport: String,
    pub smtp_host: Option<String>,
    pub smtp_port: Option<i32>,
    pub smtp_username: Option<String>,
    pub smtp_password: Option<String>,
    pub sender_name: Option<String>,
    pub sender_picture: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::templates::Entity")]
    Templates,
    #[sea_orm(has_many = "super::otp_records::Entity")]
    OtpRecords,
}

impl Related<super::templates::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Templates.def()
    }
}

impl Related<super::otp_records::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OtpRecords.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
