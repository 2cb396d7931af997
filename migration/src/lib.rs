pub use sea_orm_migration::prelude::*;

mod m20240302_101500_create_schema_and_base_db_setup;
mod m20240302_102200_create_base_tables;
mod m20240915_000000_add_sorting_indexes;
mod m20241104_000000_add_initial_non_prod_user;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240302_101500_create_schema_and_base_db_setup::Migration),
            Box::new(m20240302_102200_create_base_tables::Migration),
            Box::new(m20240915_000000_add_sorting_indexes::Migration),
            Box::new(m20241104_000000_add_initial_non_prod_user::Migration),
        ]
    }
}
