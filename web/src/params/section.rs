use sea_orm::{Order, Value};
use serde::Deserialize;
use utoipa::IntoParams;

use super::sort::SortOrder;
use domain::{sections, Id, IntoQueryFilterMap, QueryFilterMap, QuerySort};

#[derive(Debug, Deserialize, IntoParams)]
pub(crate) struct IndexParams {
    pub(crate) folder_id: Option<Id>,
    pub(crate) sort_order: Option<SortOrder>,
    #[serde(skip)]
    user_id: Option<Id>,
}

impl IndexParams {
    /// Binds the listing to the authenticated user.
    pub(crate) fn scoped(mut self, user_id: Id) -> Self {
        self.user_id = Some(user_id);
        self
    }
}

impl IntoQueryFilterMap for IndexParams {
    fn into_query_filter_map(self) -> QueryFilterMap {
        let mut query_filter_map = QueryFilterMap::new();
        query_filter_map.insert(
            "user_id".to_string(),
            self.user_id.map(|id| Value::Uuid(Some(Box::new(id)))),
        );
        query_filter_map.insert(
            "folder_id".to_string(),
            self.folder_id.map(|id| Value::Uuid(Some(Box::new(id)))),
        );

        query_filter_map
    }
}

impl QuerySort<sections::Column> for IndexParams {
    fn get_sort_column(&self) -> Option<sections::Column> {
        // Sections are only ever sorted by their board rank.
        self.sort_order.as_ref().map(|_| sections::Column::Position)
    }

    fn get_sort_order(&self) -> Option<Order> {
        self.sort_order.as_ref().map(Order::from)
    }
}
