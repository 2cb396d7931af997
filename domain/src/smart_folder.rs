use crate::error::Error;
use crate::smart_folders::Model;
use entity_api::query::{IntoQueryFilterMap, QuerySort};
use entity_api::{query, smart_folders};
use sea_orm::DatabaseConnection;

pub use entity_api::smart_folder::{create, delete_by_id, find_by_id, update};

pub async fn find_by<P>(db: &DatabaseConnection, params: P) -> Result<Vec<Model>, Error>
where
    P: IntoQueryFilterMap + QuerySort<smart_folders::Column>,
{
    let smart_folders =
        query::find_by::<smart_folders::Entity, smart_folders::Column, P>(db, params).await?;
    Ok(smart_folders)
}
