use crate::error::Error;
use sea_orm::strum::IntoEnumIterator;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, Order, QueryFilter, QueryOrder, Value};
use std::collections::HashMap;

/// Find all records of an entity matching the given filter map, optionally
/// sorted. Filters are matched against the entity's defined columns, so a
/// stray key can never produce an invalid query.
pub async fn find_by<E, C, P>(db: &DatabaseConnection, params: P) -> Result<Vec<E::Model>, Error>
where
    E: EntityTrait<Column = C>,
    C: ColumnTrait + IntoEnumIterator,
    P: IntoQueryFilterMap + QuerySort<C>,
{
    let sort = (params.get_sort_column(), params.get_sort_order());
    let query_filter_map = params.into_query_filter_map();

    let mut query = E::find();

    // We iterate through the entity's defined columns so that we only
    // attempt to filter by columns that exist.
    for column in C::iter() {
        if let Some(value) = query_filter_map.get(&column.to_string()) {
            query = query.filter(column.eq(value));
        }
    }

    if let (Some(column), Some(order)) = sort {
        query = query.order_by(column, order);
    }

    Ok(query.all(db).await?)
}

/// A map of column names to filter values. `None` values are treated as
/// "filter not supplied" and skipped.
#[derive(Debug, Default)]
pub struct QueryFilterMap {
    map: HashMap<String, Option<Value>>,
}

impl QueryFilterMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.map.get(key).and_then(|opt| opt.clone())
    }

    pub fn insert(&mut self, key: String, value: Option<Value>) {
        self.map.insert(key, value);
    }
}

/// Conversion of typed endpoint params into a [`QueryFilterMap`].
pub trait IntoQueryFilterMap {
    fn into_query_filter_map(self) -> QueryFilterMap;
}

/// Optional sort column/order supplied by typed endpoint params.
pub trait QuerySort<C> {
    fn get_sort_column(&self) -> Option<C> {
        None
    }

    fn get_sort_order(&self) -> Option<Order> {
        None
    }
}
