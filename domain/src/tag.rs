use crate::error::Error;
use crate::tags::Model;
use entity_api::query::{IntoQueryFilterMap, QuerySort};
use entity_api::{query, tags};
use sea_orm::DatabaseConnection;

pub use entity_api::tag::{create, delete_by_id, find_by_id};

pub async fn find_by<P>(db: &DatabaseConnection, params: P) -> Result<Vec<Model>, Error>
where
    P: IntoQueryFilterMap + QuerySort<tags::Column>,
{
    let tags = query::find_by::<tags::Entity, tags::Column, P>(db, params).await?;
    Ok(tags)
}
