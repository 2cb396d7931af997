use crate::error::Error;
use crate::folders::Model;
use entity_api::query::{IntoQueryFilterMap, QuerySort};
use entity_api::{folders, query};
use sea_orm::DatabaseConnection;

pub use entity_api::folder::{create, delete_by_id, find_by_id, reorder, update};

pub async fn find_by<P>(db: &DatabaseConnection, params: P) -> Result<Vec<Model>, Error>
where
    P: IntoQueryFilterMap + QuerySort<folders::Column>,
{
    let folders = query::find_by::<folders::Entity, folders::Column, P>(db, params).await?;
    Ok(folders)
}
