use sea_orm::{
    entity::prelude::*,
    ActiveValue::{Set, Unchanged},
    DatabaseConnection, IntoActiveModel, TransactionTrait,
};

use super::error::Error;
use super::RankUpdate;
use entity::folders::{ActiveModel, Column, Entity, Model};
use entity::Id;
use log::*;

pub async fn create(
    db: &DatabaseConnection,
    user_id: Id,
    folder_model: Model,
) -> Result<Model, Error> {
    debug!("New Folder Model to be inserted: {folder_model:?}");

    let now = chrono::Utc::now();

    let folder_active_model: ActiveModel = ActiveModel {
        user_id: Set(user_id),
        name: Set(folder_model.name),
        position: Set(folder_model.position),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    };

    Ok(folder_active_model.save(db).await?.try_into_model()?)
}

pub async fn update(
    db: &DatabaseConnection,
    user_id: Id,
    id: Id,
    model: Model,
) -> Result<Model, Error> {
    let folder = find_by_id(db, user_id, id).await?;

    debug!("Existing Folder model to be Updated: {folder:?}");

    let active_model: ActiveModel = ActiveModel {
        id: Unchanged(folder.id),
        user_id: Unchanged(folder.user_id),
        name: Set(model.name),
        position: Set(model.position),
        created_at: Unchanged(folder.created_at),
        updated_at: Set(chrono::Utc::now().into()),
    };

    Ok(active_model.update(db).await?.try_into_model()?)
}

pub async fn delete_by_id(db: &DatabaseConnection, user_id: Id, id: Id) -> Result<(), Error> {
    let folder = find_by_id(db, user_id, id).await?;

    folder.delete(db).await?;

    Ok(())
}

/// Ownership-scoped lookup: foreign rows read as absent.
pub async fn find_by_id(db: &DatabaseConnection, user_id: Id, id: Id) -> Result<Model, Error> {
    Entity::find_by_id(id)
        .filter(Column::UserId.eq(user_id))
        .one(db)
        .await?
        .ok_or_else(Error::record_not_found)
}

/// Atomically assigns new ranks to the listed folders.
pub async fn reorder(
    db: &DatabaseConnection,
    user_id: Id,
    updates: &[RankUpdate],
) -> Result<Vec<Model>, Error> {
    if updates.is_empty() {
        return Ok(Vec::new());
    }

    debug!("Reordering {} folders for user {user_id}", updates.len());

    let txn = db.begin().await?;
    let now = chrono::Utc::now();
    let mut reordered = Vec::with_capacity(updates.len());

    for update in updates {
        let folder = Entity::find_by_id(update.id)
            .filter(Column::UserId.eq(user_id))
            .one(&txn)
            .await?
            .ok_or_else(Error::record_not_found)?;

        let mut active_model = folder.into_active_model();
        active_model.position = Set(update.position);
        active_model.updated_at = Set(now.into());

        reordered.push(active_model.update(&txn).await?.try_into_model()?);
    }

    txn.commit().await?;

    Ok(reordered)
}
