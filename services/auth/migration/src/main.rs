use sea_orm_migration::prelude::*;

mod m20260828_000001_create_users;
mod m20260828_000002_create_sessions;
mod m20260828_000003_create_verification_codes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260828_000001_create_users::Migration),
            Box::new(m20260828_000002_create_sessions::Migration),
            Box::new(m20260828_000003_create_verification_codes::Migration),
        ]
    }
}

#[tokio::main]
async fn main() {
    sea_orm_migration::cli::run_cli(Migrator).await;
}
