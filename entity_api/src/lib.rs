//! Persistence operations for Daylist entities.
//!
//! Each module exposes async functions over a SeaORM `DatabaseConnection`.
//! Every lookup and mutation is scoped to the owning user, so rows belonging
//! to another user are indistinguishable from absent rows.

use log::*;
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub mod error;
pub mod query;

pub mod folder;
pub mod section;
pub mod smart_folder;
pub mod tag;
pub mod task;
pub mod user;

// Re-export entity modules so higher layers depend on `entity_api` alone.
pub use entity::{folders, sections, smart_folders, status, tags, tasks, users, Id};

/// One entry of a reorder request: the entity id and its new zero-based
/// rank. `order` is accepted as an alias for `position` on the wire.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RankUpdate {
    pub id: Id,
    #[serde(alias = "order")]
    pub position: i32,
}

/// Seeds a development database with a demo user and a small board.
/// Failures abort the seeding run; this is never called in production.
pub async fn seed_database(db: &DatabaseConnection) {
    use serde_json::json;

    let now = chrono::Utc::now();

    let user = user::create(
        db,
        users::Model {
            id: Id::new_v4(),
            email: "demo@daylist.dev".to_owned(),
            password: "password".to_owned(),
            display_name: Some("Demo User".to_owned()),
            timezone: "UTC".to_owned(),
            created_at: now.into(),
            updated_at: now.into(),
        },
    )
    .await
    .expect("Failed to seed demo user");

    info!("Seeded demo user {}", user.email);

    let folder = folder::create(
        db,
        user.id,
        folders::Model {
            id: Id::new_v4(),
            user_id: user.id,
            name: "Personal".to_owned(),
            position: 0,
            created_at: now.into(),
            updated_at: now.into(),
        },
    )
    .await
    .expect("Failed to seed folder");

    let section = section::create(
        db,
        user.id,
        sections::Model {
            id: Id::new_v4(),
            user_id: user.id,
            folder_id: Some(folder.id),
            name: "Today".to_owned(),
            position: 0,
            created_at: now.into(),
            updated_at: now.into(),
        },
    )
    .await
    .expect("Failed to seed section");

    for (position, title) in ["Drink a glass of water", "Review inbox", "Take a walk"]
        .iter()
        .enumerate()
    {
        task::create(
            db,
            user.id,
            tasks::Model {
                id: Id::new_v4(),
                user_id: user.id,
                section_id: Some(section.id),
                parent_id: None,
                title: (*title).to_owned(),
                notes: None,
                status: Default::default(),
                due_by: None,
                position: position as i32,
                tag_ids: json!([]),
                completed_at: None,
                created_at: now.into(),
                updated_at: now.into(),
            },
        )
        .await
        .expect("Failed to seed task");
    }

    info!("Seeded demo board for {}", user.email);
}
