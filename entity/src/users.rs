//! SeaORM Entity for the users table.

use crate::Id;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize, ToSchema)]
#[schema(as = entity::users::Model)]
#[sea_orm(schema_name = "daylist", table_name = "users")]
pub struct Model {
    #[serde(skip_deserializing)]
    #[sea_orm(primary_key)]
    pub id: Id,

    #[sea_orm(unique)]
    pub email: String,

    /// Password hash. Never serialized back to clients.
    #[serde(skip_serializing)]
    pub password: String,

    pub display_name: Option<String>,

    /// IANA timezone name, defaults to UTC at creation.
    pub timezone: String,

    #[serde(skip_deserializing)]
    #[schema(value_type = String, format = DateTime)]
    pub created_at: DateTimeWithTimeZone,

    #[serde(skip_deserializing)]
    #[schema(value_type = String, format = DateTime)]
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::folders::Entity")]
    Folders,

    #[sea_orm(has_many = "super::sections::Entity")]
    Sections,

    #[sea_orm(has_many = "super::tasks::Entity")]
    Tasks,

    #[sea_orm(has_many = "super::tags::Entity")]
    Tags,

    #[sea_orm(has_many = "super::smart_folders::Entity")]
    SmartFolders,
}

impl Related<super::folders::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Folders.def()
    }
}

impl Related<super::sections::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sections.def()
    }
}

impl Related<super::tasks::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tasks.def()
    }
}

impl Related<super::tags::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tags.def()
    }
}

impl Related<super::smart_folders::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SmartFolders.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
