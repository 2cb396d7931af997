use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create the application's schema
        manager
            .get_connection()
            .execute_unprepared("CREATE SCHEMA IF NOT EXISTS daylist;")
            .await?;

        manager
            .get_connection()
            .execute_unprepared("SET search_path TO daylist, public;")
            .await?;

        // Grant privileges to the base DB user that executes all queries
        manager
            .get_connection()
            .execute_unprepared(
                r#"
                DO $$ BEGIN
                    GRANT ALL PRIVILEGES ON DATABASE daylist TO daylist;
                    GRANT ALL ON SCHEMA daylist TO daylist;

                    ALTER DEFAULT PRIVILEGES IN SCHEMA daylist GRANT ALL ON TABLES TO daylist;
                    ALTER DEFAULT PRIVILEGES IN SCHEMA daylist GRANT ALL ON SEQUENCES TO daylist;
                END $$;
            "#,
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared(
                r#"
                DO $$ BEGIN
                    ALTER DEFAULT PRIVILEGES IN SCHEMA daylist REVOKE ALL ON SEQUENCES FROM daylist;
                    ALTER DEFAULT PRIVILEGES IN SCHEMA daylist REVOKE ALL ON TABLES FROM daylist;
                    REVOKE ALL ON SCHEMA daylist FROM daylist;
                    REVOKE ALL PRIVILEGES ON DATABASE daylist FROM daylist;
                END $$;
            "#,
            )
            .await?;

        // Drop the schema (CASCADE will remove all objects in it)
        manager
            .get_connection()
            .execute_unprepared("DROP SCHEMA IF EXISTS daylist CASCADE;")
            .await?;

        Ok(())
    }
}
