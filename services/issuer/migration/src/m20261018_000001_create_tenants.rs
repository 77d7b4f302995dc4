use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Tenants::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Tenants::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Tenants::Name).string().not_null())
                    .col(
                        ColumnDef::new(Tenants::ApiKey)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Tenants::MailTransport)
                            .string()
                            .not_null()
                            .default("gmail"),
                    )
                    .col(ColumnDef::new(Tenants::SmtpHost).string())
                    .col(ColumnDef::new(Tenants::SmtpPort).integer())
                    .col(ColumnDef::new(Tenants::SmtpUsername).string())
                    .col(ColumnDef::new(Tenants::SmtpPassword).string())
                    .col(ColumnDef::new(Tenants::SenderName).string())
                    .col(ColumnDef::new(Tenants::SenderPicture).string())
                    .col(
                        ColumnDef::new(Tenants::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Tenants::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Tenants::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Tenants {
    Table,
    Id,
    Name,
    ApiKey,
    MailTransport,
    SmtpHost,
    SmtpPort,
    SmtpUsername,
    SmtpPassword,
    SenderName,
    SenderPicture,
    CreatedAt,
    UpdatedAt,
}
