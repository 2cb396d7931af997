use crate::error::Error;
use crate::sections::Model;
use entity_api::query::{IntoQueryFilterMap, QuerySort};
use entity_api::{query, sections};
use sea_orm::DatabaseConnection;

pub use entity_api::section::{create, delete_by_id, find_by_id, reorder, update};

pub async fn find_by<P>(db: &DatabaseConnection, params: P) -> Result<Vec<Model>, Error>
where
    P: IntoQueryFilterMap + QuerySort<sections::Column>,
{
    let sections = query::find_by::<sections::Entity, sections::Column, P>(db, params).await?;
    Ok(sections)
}
