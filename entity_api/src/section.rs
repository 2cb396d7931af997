use sea_orm::{
    entity::prelude::*,
    ActiveValue::{Set, Unchanged},
    DatabaseConnection, IntoActiveModel, TransactionTrait,
};

use super::error::Error;
use super::RankUpdate;
use entity::sections::{ActiveModel, Column, Entity, Model};
use entity::Id;
use log::*;

pub async fn create(
    db: &DatabaseConnection,
    user_id: Id,
    section_model: Model,
) -> Result<Model, Error> {
    debug!("New Section Model to be inserted: {section_model:?}");

    let now = chrono::Utc::now();

    let section_active_model: ActiveModel = ActiveModel {
        user_id: Set(user_id),
        folder_id: Set(section_model.folder_id),
        name: Set(section_model.name),
        position: Set(section_model.position),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    };

    Ok(section_active_model.save(db).await?.try_into_model()?)
}

pub async fn update(
    db: &DatabaseConnection,
    user_id: Id,
    id: Id,
    model: Model,
) -> Result<Model, Error> {
    let section = find_by_id(db, user_id, id).await?;

    debug!("Existing Section model to be Updated: {section:?}");

    let active_model: ActiveModel = ActiveModel {
        id: Unchanged(section.id),
        user_id: Unchanged(section.user_id),
        folder_id: Set(model.folder_id),
        name: Set(model.name),
        position: Set(model.position),
        created_at: Unchanged(section.created_at),
        updated_at: Set(chrono::Utc::now().into()),
    };

    Ok(active_model.update(db).await?.try_into_model()?)
}

pub async fn delete_by_id(db: &DatabaseConnection, user_id: Id, id: Id) -> Result<(), Error> {
    let section = find_by_id(db, user_id, id).await?;

    section.delete(db).await?;

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

/// Atomically assigns new ranks to the listed sections. All rows update or
/// none do.
pub async fn reorder(
    db: &DatabaseConnection,
    user_id: Id,
    updates: &[RankUpdate],
) -> Result<Vec<Model>, Error> {
    if updates.is_empty() {
        return Ok(Vec::new());
    }

    debug!("Reordering {} sections for user {user_id}", updates.len());

    let txn = db.begin().await?;
    let now = chrono::Utc::now();
    let mut reordered = Vec::with_capacity(updates.len());

    for update in updates {
        let section = Entity::find_by_id(update.id)
            .filter(Column::UserId.eq(user_id))
            .one(&txn)
            .await?
            .ok_or_else(Error::record_not_found)?;

        let mut active_model = section.into_active_model();
        active_model.position = Set(update.position);
        active_model.updated_at = Set(now.into());

        reordered.push(active_model.update(&txn).await?.try_into_model()?);
    }

    txn.commit().await?;

    Ok(reordered)
}

#[cfg(test)]
#[cfg(feature = "mock")]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn section_model(user_id: Id) -> Model {
        let now = chrono::Utc::now();
        Model {
            id: Id::new_v4(),
            user_id,
            folder_id: None,
            name: "Morning routine".to_owned(),
            position: 0,
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    #[tokio::test]
    async fn create_returns_a_new_section_model() -> Result<(), Error> {
        let user_id = Id::new_v4();
        let section = section_model(user_id);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![section.clone()]])
            .into_connection();

        let created = create(&db, user_id, section.clone()).await?;

        assert_eq!(created.name, section.name);

        Ok(())
    }

    #[tokio::test]
    async fn update_returns_an_updated_section_model() -> Result<(), Error> {
        let user_id = Id::new_v4();
        let section = section_model(user_id);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![section.clone()], vec![section.clone()]])
            .into_connection();

        let updated = update(&db, user_id, section.id, section.clone()).await?;

        assert_eq!(updated.id, section.id);

        Ok(())
    }
}
