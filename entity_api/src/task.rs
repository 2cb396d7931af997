use sea_orm::{
    entity::prelude::*,
    ActiveValue::{Set, Unchanged},
    DatabaseConnection, IntoActiveModel, TransactionTrait,
};

use super::error::Error;
use super::RankUpdate;
use entity::tasks::{ActiveModel, Column, Entity, Model};
use entity::{status::Status, Id};
use log::*;

pub async fn create(db: &DatabaseConnection, user_id: Id, task_model: Model) -> Result<Model, Error> {
    debug!("New Task Model to be inserted: {task_model:?}");

    let now = chrono::Utc::now();

    let task_active_model: ActiveModel = ActiveModel {
        user_id: Set(user_id),
        section_id: Set(task_model.section_id),
        parent_id: Set(task_model.parent_id),
        title: Set(task_model.title),
        notes: Set(task_model.notes),
        status: Set(task_model.status),
        due_by: Set(task_model.due_by),
        position: Set(task_model.position),
        tag_ids: Set(task_model.tag_ids),
        completed_at: Set(None),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    };

    Ok(task_active_model.save(db).await?.try_into_model()?)
}

pub async fn update(
    db: &DatabaseConnection,
    user_id: Id,
    id: Id,
    model: Model,
) -> Result<Model, Error> {
    let task = find_by_id(db, user_id, id).await?;

    debug!("Existing Task model to be Updated: {task:?}");

    let now = chrono::Utc::now();
    // The first completion timestamp is kept across repeated updates while
    // the task stays completed.
    let completed_at = match (model.status.is_completed(), task.completed_at) {
        (true, Some(existing)) => Unchanged(Some(existing)),
        (true, None) => Set(Some(now.into())),
        (false, _) => Set(None),
    };

    let active_model: ActiveModel = ActiveModel {
        id: Unchanged(task.id),
        user_id: Unchanged(task.user_id),
        section_id: Set(model.section_id),
        parent_id: Set(model.parent_id),
        title: Set(model.title),
        notes: Set(model.notes),
        status: Set(model.status),
        due_by: Set(model.due_by),
        position: Set(model.position),
        tag_ids: Set(model.tag_ids),
        completed_at,
        created_at: Unchanged(task.created_at),
        updated_at: Set(now.into()),
    };

    Ok(active_model.update(db).await?.try_into_model()?)
}

pub async fn update_status(
    db: &DatabaseConnection,
    user_id: Id,
    id: Id,
    status: Status,
) -> Result<Model, Error> {
    let task = find_by_id(db, user_id, id).await?;

    debug!("Existing Task model status to be Updated: {task:?}");

    let now = chrono::Utc::now();
    let completed_at = if status.is_completed() {
        Set(Some(now.into()))
    } else {
        Set(None)
    };

    let mut active_model = task.into_active_model();
    active_model.status = Set(status);
    active_model.completed_at = completed_at;
    active_model.updated_at = Set(now.into());

    Ok(active_model.update(db).await?.try_into_model()?)
}

pub async fn delete_by_id(db: &DatabaseConnection, user_id: Id, id: Id) -> Result<(), Error> {
    let task = find_by_id(db, user_id, id).await?;

    task.delete(db).await?;

    Ok(())
}

/// Ownership-scoped lookup: a task that exists but belongs to another user
/// reads as absent.
pub async fn find_by_id(db: &DatabaseConnection, user_id: Id, id: Id) -> Result<Model, Error> {
    Entity::find_by_id(id)
        .filter(Column::UserId.eq(user_id))
        .one(db)
        .await?
        .ok_or_else(Error::record_not_found)
}

/// Assigns each listed task its new rank inside one database transaction:
/// either every rank persists or none does, so a concurrent reader never
/// observes a half-applied reorder. Returns the updated models in request
/// order.
pub async fn reorder(
    db: &DatabaseConnection,
    user_id: Id,
    updates: &[RankUpdate],
) -> Result<Vec<Model>, Error> {
    if updates.is_empty() {
        return Ok(Vec::new());
    }

    debug!("Reordering {} tasks for user {user_id}", updates.len());

    let txn = db.begin().await?;
    let now = chrono::Utc::now();
    let mut reordered = Vec::with_capacity(updates.len());

    for update in updates {
        // A missing or foreign id aborts the whole batch; dropping the
        // transaction without commit rolls the earlier updates back.
        let task = Entity::find_by_id(update.id)
            .filter(Column::UserId.eq(user_id))
            .one(&txn)
            .await?
            .ok_or_else(Error::record_not_found)?;

        let mut active_model = task.into_active_model();
        active_model.position = Set(update.position);
        active_model.updated_at = Set(now.into());

        reordered.push(active_model.update(&txn).await?.try_into_model()?);
    }

    txn.commit().await?;

    Ok(reordered)
}

#[cfg(test)]
// We need to gate seaORM's mock feature behind conditional compilation because
// the feature removes the Clone trait implementation from seaORM's DatabaseConnection.
// see https://github.com/SeaQL/sea-orm/issues/830
#[cfg(feature = "mock")]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use serde_json::json;

    fn task_model(user_id: Id, position: i32) -> Model {
        let now = chrono::Utc::now();
        Model {
            id: Id::new_v4(),
            user_id,
            section_id: Some(Id::new_v4()),
            parent_id: None,
            title: "Stretch for ten minutes".to_owned(),
            notes: None,
            status: Default::default(),
            due_by: None,
            position,
            tag_ids: json!([]),
            completed_at: None,
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    #[tokio::test]
    async fn create_returns_a_new_task_model() -> Result<(), Error> {
        let user_id = Id::new_v4();
        let task = task_model(user_id, 0);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![task.clone()]])
            .into_connection();

        let created = create(&db, user_id, task.clone()).await?;

        assert_eq!(created.id, task.id);
        assert_eq!(created.position, 0);

        Ok(())
    }

    #[tokio::test]
    async fn update_returns_an_updated_task_model() -> Result<(), Error> {
        let user_id = Id::new_v4();
        let task = task_model(user_id, 2);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![task.clone()], vec![task.clone()]])
            .into_connection();

        let updated = update(&db, user_id, task.id, task.clone()).await?;

        assert_eq!(updated.title, task.title);

        Ok(())
    }

    #[tokio::test]
    async fn update_status_marks_completion() -> Result<(), Error> {
        let user_id = Id::new_v4();
        let task = task_model(user_id, 0);
        let mut completed = task.clone();
        completed.status = Status::Completed;
        completed.completed_at = Some(chrono::Utc::now().into());

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![task.clone()], vec![completed]])
            .into_connection();

        let updated = update_status(&db, user_id, task.id, Status::Completed).await?;

        assert_eq!(updated.status, Status::Completed);
        assert!(updated.completed_at.is_some());

        Ok(())
    }

    #[tokio::test]
    async fn find_by_id_rejects_foreign_rows() {
        // The scoped query returns nothing for a task owned by someone else.
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![Vec::<Model>::new()])
            .into_connection();

        let result = find_by_id(&db, Id::new_v4(), Id::new_v4()).await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn reorder_persists_every_rank_in_one_transaction() -> Result<(), Error> {
        let user_id = Id::new_v4();
        let first = task_model(user_id, 1);
        let second = task_model(user_id, 0);

        let mut first_moved = first.clone();
        first_moved.position = 0;
        let mut second_moved = second.clone();
        second_moved.position = 1;

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![
                vec![first.clone()],
                vec![first_moved.clone()],
                vec![second.clone()],
                vec![second_moved.clone()],
            ])
            .into_connection();

        let updates = vec![
            RankUpdate {
                id: first.id,
                position: 0,
            },
            RankUpdate {
                id: second.id,
                position: 1,
            },
        ];

        let reordered = reorder(&db, user_id, &updates).await?;

        assert_eq!(reordered.len(), 2);
        assert_eq!(reordered[0].position, 0);
        assert_eq!(reordered[1].position, 1);

        // The whole batch ran inside a single transaction.
        let log = db.into_transaction_log();
        assert!(!log.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn reorder_aborts_when_any_id_is_missing() {
        let user_id = Id::new_v4();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![Vec::<Model>::new()])
            .into_connection();

        let updates = vec![RankUpdate {
            id: Id::new_v4(),
            position: 0,
        }];

        assert!(reorder(&db, user_id, &updates).await.is_err());
    }
}
