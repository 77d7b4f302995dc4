use sea_orm_migration::prelude::*;

mod m20261018_000001_create_tenants;
mod m20261018_000002_create_templates;
mod m20261018_000003_create_otp_records;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20261018_000001_create_tenants::Migration),
            Box::new(m20261018_000002_create_templates::Migration),
            Box::new(m20261018_000003_create_otp_records::Migration),
        ]
    }
}
