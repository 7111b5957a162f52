pub use sea_orm_migration::prelude::*;

mod m20240101_000001_create_venue;
mod m20240101_000002_create_artist;
mod m20240101_000003_create_show;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_venue::Migration),
            Box::new(m20240101_000002_create_artist::Migration),
            Box::new(m20240101_000003_create_show::Migration),
        ]
    }
}
