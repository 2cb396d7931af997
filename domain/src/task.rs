use crate::error::Error;
use crate::tasks::Model;
use entity_api::query::{IntoQueryFilterMap, QuerySort};
use entity_api::{query, tasks};
use sea_orm::DatabaseConnection;

pub use entity_api::task::{create, delete_by_id, find_by_id, reorder, update, update_status};

pub async fn find_by<P>(db: &DatabaseConnection, params: P) -> Result<Vec<Model>, Error>
where
    P: IntoQueryFilterMap + QuerySort<tasks::Column>,
{
    let tasks = query::find_by::<tasks::Entity, tasks::Column, P>(db, params).await?;
    Ok(tasks)
}
