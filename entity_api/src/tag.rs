use sea_orm::{entity::prelude::*, ActiveValue::Set, DatabaseConnection};

use super::error::Error;
use entity::tags::{ActiveModel, Column, Entity, Model};
use entity::Id;
use log::*;

pub async fn create(db: &DatabaseConnection, user_id: Id, tag_model: Model) -> Result<Model, Error> {
    debug!("New Tag Model to be inserted: {tag_model:?}");

    let now = chrono::Utc::now();

    let tag_active_model: ActiveModel = ActiveModel {
        user_id: Set(user_id),
        name: Set(tag_model.name),
        color: Set(tag_model.color),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    };

    Ok(tag_active_model.save(db).await?.try_into_model()?)
}

pub async fn delete_by_id(db: &DatabaseConnection, user_id: Id, id: Id) -> Result<(), Error> {
    let tag = find_by_id(db, user_id, id).await?;

    tag.delete(db).await?;

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
