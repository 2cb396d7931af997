use chrono::Utc;
use entity::users::{ActiveModel, Column, Entity};
use password_auth::generate_hash;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, ModelTrait, QueryFilter, Set};
use sea_orm_migration::prelude::*;
use service::config::RustEnv;
use std::env;
use std::str::FromStr;

const DEMO_EMAIL: &str = "demo@daylist.dev";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let rust_env: RustEnv = RustEnv::from_str(
            env::var("RUST_ENV")
                .unwrap_or_else(|_| "development".to_string())
                .as_str(),
        )
        .unwrap_or(RustEnv::Development);

        match rust_env {
            RustEnv::Development | RustEnv::Staging => insert_demo_user(manager).await,
            RustEnv::Production => {
                // Production accounts are created through sign-up, never seeded
                Ok(())
            }
        }
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let rust_env: RustEnv = RustEnv::from_str(
            env::var("RUST_ENV")
                .unwrap_or_else(|_| "development".to_string())
                .as_str(),
        )
        .unwrap_or(RustEnv::Development);

        match rust_env {
            RustEnv::Development | RustEnv::Staging => delete_demo_user(manager).await,
            RustEnv::Production => Ok(()),
        }
    }
}

async fn insert_demo_user(manager: &SchemaManager<'_>) -> Result<(), DbErr> {
    let db = manager.get_connection();
    let now = Utc::now();

    ActiveModel {
        email: Set(DEMO_EMAIL.to_owned()),
        password: Set(generate_hash("password")),
        display_name: Set(Some("Demo User".to_owned())),
        timezone: Set("UTC".to_owned()),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    }
    .save(db)
    .await?;

    Ok(())
}

async fn delete_demo_user(manager: &SchemaManager<'_>) -> Result<(), DbErr> {
    let db = manager.get_connection();

    if let Some(user) = Entity::find()
        .filter(Column::Email.eq(DEMO_EMAIL))
        .one(db)
        .await?
    {
        user.delete(db).await?;
    }

    Ok(())
}
