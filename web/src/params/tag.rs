use sea_orm::Value;
use serde::Deserialize;
use utoipa::IntoParams;

use domain::{tags, Id, IntoQueryFilterMap, QueryFilterMap, QuerySort};

#[derive(Debug, Deserialize, IntoParams)]
pub(crate) struct IndexParams {
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

        query_filter_map
    }
}

impl QuerySort<tags::Column> for IndexParams {}
