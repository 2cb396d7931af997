use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared(
                r#"
                CREATE TABLE daylist.users (
                    id uuid PRIMARY KEY DEFAULT gen_random_uuid(),
                    email varchar(255) NOT NULL UNIQUE,
                    password varchar(255) NOT NULL,
                    display_name varchar(255),
                    timezone varchar(255) NOT NULL DEFAULT 'UTC',
                    created_at timestamptz NOT NULL DEFAULT now(),
                    updated_at timestamptz NOT NULL DEFAULT now()
                );

                CREATE TABLE daylist.folders (
                    id uuid PRIMARY KEY DEFAULT gen_random_uuid(),
                    user_id uuid NOT NULL REFERENCES daylist.users (id) ON DELETE CASCADE,
                    name varchar(255) NOT NULL,
                    position integer NOT NULL DEFAULT 0,
                    created_at timestamptz NOT NULL DEFAULT now(),
                    updated_at timestamptz NOT NULL DEFAULT now()
                );

                CREATE TABLE daylist.sections (
                    id uuid PRIMARY KEY DEFAULT gen_random_uuid(),
                    user_id uuid NOT NULL REFERENCES daylist.users (id) ON DELETE CASCADE,
                    folder_id uuid REFERENCES daylist.folders (id) ON DELETE CASCADE,
                    name varchar(255) NOT NULL,
                    position integer NOT NULL DEFAULT 0,
                    created_at timestamptz NOT NULL DEFAULT now(),
                    updated_at timestamptz NOT NULL DEFAULT now()
                );

                CREATE TABLE daylist.tasks (
                    id uuid PRIMARY KEY DEFAULT gen_random_uuid(),
                    user_id uuid NOT NULL REFERENCES daylist.users (id) ON DELETE CASCADE,
                    section_id uuid REFERENCES daylist.sections (id) ON DELETE CASCADE,
                    parent_id uuid REFERENCES daylist.tasks (id) ON DELETE CASCADE,
                    title varchar(1024) NOT NULL,
                    notes text,
                    status varchar(32) NOT NULL DEFAULT 'todo',
                    due_by timestamptz,
                    position integer NOT NULL DEFAULT 0,
                    tag_ids jsonb NOT NULL DEFAULT '[]'::jsonb,
                    completed_at timestamptz,
                    created_at timestamptz NOT NULL DEFAULT now(),
                    updated_at timestamptz NOT NULL DEFAULT now()
                );

                CREATE TABLE daylist.tags (
                    id uuid PRIMARY KEY DEFAULT gen_random_uuid(),
                    user_id uuid NOT NULL REFERENCES daylist.users (id) ON DELETE CASCADE,
                    name varchar(255) NOT NULL,
                    color varchar(32),
                    created_at timestamptz NOT NULL DEFAULT now(),
                    updated_at timestamptz NOT NULL DEFAULT now()
                );

                CREATE TABLE daylist.smart_folders (
                    id uuid PRIMARY KEY DEFAULT gen_random_uuid(),
                    user_id uuid NOT NULL REFERENCES daylist.users (id) ON DELETE CASCADE,
                    name varchar(255) NOT NULL,
                    criteria jsonb NOT NULL DEFAULT '{}'::jsonb,
                    position integer NOT NULL DEFAULT 0,
                    created_at timestamptz NOT NULL DEFAULT now(),
                    updated_at timestamptz NOT NULL DEFAULT now()
                );
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
                DROP TABLE IF EXISTS daylist.smart_folders;
                DROP TABLE IF EXISTS daylist.tags;
                DROP TABLE IF EXISTS daylist.tasks;
                DROP TABLE IF EXISTS daylist.sections;
                DROP TABLE IF EXISTS daylist.folders;
                DROP TABLE IF EXISTS daylist.users;
            "#,
            )
            .await?;

        Ok(())
    }
}
