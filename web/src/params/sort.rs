use sea_orm::Order;
use serde::Deserialize;
use utoipa::ToSchema;

/// Sort direction accepted by index endpoints.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub(crate) enum SortOrder {
    Asc,
    Desc,
}

impl From<&SortOrder> for Order {
    fn from(order: &SortOrder) -> Self {
        match order {
            SortOrder::Asc => Order::Asc,
            SortOrder::Desc => Order::Desc,
        }
    }
}
