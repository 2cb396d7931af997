use sea_orm::{
    entity::prelude::*,
    ActiveValue::{Set, Unchanged},
    DatabaseConnection,
};

use super::error::Error;
use entity::smart_folders::{ActiveModel, Column, Entity, Model};
use entity::Id;
use log::*;

pub async fn create(
    db: &DatabaseConnection,
    user_id: Id,
    smart_folder_model: Model,
) -> Result<Model, Error> {
    debug!("New SmartFolder Model to be inserted: {smart_folder_model:?}");

    let now = chrono::Utc::now();

    let active_model: ActiveModel = ActiveModel {
        user_id: Set(user_id),
        name: Set(smart_folder_model.name),
        criteria: Set(smart_folder_model.criteria),
        position: Set(smart_folder_model.position),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    };

    Ok(active_model.save(db).await?.try_into_model()?)
}

pub async fn update(
    db: &DatabaseConnection,
    user_id: Id,
    id: Id,
    model: Model,
) -> Result<Model, Error> {
    let smart_folder = find_by_id(db, user_id, id).await?;

    debug!("Existing SmartFolder model to be Updated: {smart_folder:?}");

    let active_model: ActiveModel = ActiveModel {
        id: Unchanged(smart_folder.id),
        user_id: Unchanged(smart_folder.user_id),
        name: Set(model.name),
        criteria: Set(model.criteria),
        position: Set(model.position),
        created_at: Unchanged(smart_folder.created_at),
        updated_at: Set(chrono::Utc::now().into()),
    };

    Ok(active_model.update(db).await?.try_into_model()?)
}

pub async fn delete_by_id(db: &DatabaseConnection, user_id: Id, id: Id) -> Result<(), Error> {
    let smart_folder = find_by_id(db, user_id, id).await?;

    smart_folder.delete(db).await?;

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
