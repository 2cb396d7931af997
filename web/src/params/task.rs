use sea_orm::{Order, Value};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use super::sort::SortOrder;
use domain::{tasks, Id, IntoQueryFilterMap, QueryFilterMap, QuerySort};

/// Sortable fields for tasks
#[derive(Debug, Deserialize, ToSchema)]
#[schema(example = "position")]
#[serde(rename_all = "snake_case")]
pub(crate) enum SortField {
    Position,
    DueBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(Debug, Deserialize, IntoParams)]
pub(crate) struct IndexParams {
    pub(crate) section_id: Option<Id>,
    pub(crate) parent_id: Option<Id>,
    pub(crate) status: Option<String>,
    pub(crate) sort_by: Option<SortField>,
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
            self.user_id
                .map(|id| Value::Uuid(Some(Box::new(id)))),
        );
        query_filter_map.insert(
            "section_id".to_string(),
            self.section_id.map(|id| Value::Uuid(Some(Box::new(id)))),
        );
        query_filter_map.insert(
            "parent_id".to_string(),
            self.parent_id.map(|id| Value::Uuid(Some(Box::new(id)))),
        );
        query_filter_map.insert(
            "status".to_string(),
            self.status
                .map(|status| Value::String(Some(Box::new(status)))),
        );

        query_filter_map
    }
}

impl QuerySort<tasks::Column> for IndexParams {
    fn get_sort_column(&self) -> Option<tasks::Column> {
        self.sort_by.as_ref().map(|field| match field {
            SortField::Position => tasks::Column::Position,
            SortField::DueBy => tasks::Column::DueBy,
            SortField::CreatedAt => tasks::Column::CreatedAt,
            SortField::UpdatedAt => tasks::Column::UpdatedAt,
        })
    }

    fn get_sort_order(&self) -> Option<Order> {
        self.sort_order.as_ref().map(Order::from)
    }
}
