use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(OtpRecords::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(OtpRecords::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(OtpRecords::TenantId).uuid().not_null())
                    .col(ColumnDef::new(OtpRecords::Recipient).string().not_null())
                    .col(ColumnDef::new(OtpRecords::Code).string_len(6).not_null())
                    .col(
                        ColumnDef::new(OtpRecords::IssuedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(OtpRecords::ExpiresAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(OtpRecords::ConsumedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .from(OtpRecords::Table, OtpRecords::TenantId)
                            .to(Tenants::Table, Tenants::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Verification lookup: (tenant, recipient, code) among unconsumed rows.
        manager
            .create_index(
                Index::create()
                    .table(OtpRecords::Table)
                    .col(OtpRecords::TenantId)
                    .col(OtpRecords::Recipient)
                    .col(OtpRecords::Code)
                    .name("idx_otp_records_tenant_recipient_code")
                    .to_owned(),
            )
            .await?;

        // Dashboard: most recent records per tenant.
        manager
            .create_index(
                Index::create()
                    .table(OtpRecords::Table)
                    .col(OtpRecords::TenantId)
                    .col(OtpRecords::IssuedAt)
                    .name("idx_otp_records_tenant_issued_at")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(OtpRecords::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum OtpRecords {
    Table,
    Id,
    TenantId,
    Recipient,
    Code,
    IssuedAt,
    ExpiresAt,
    ConsumedAt,
}

#[derive(Iden)]
enum Tenants {
    Table,
    Id,
}
