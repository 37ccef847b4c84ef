use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue, Set};
use serde::{Deserialize, Serialize};

/// Append-only record of administrative mutations. Users are soft-referenced
/// by id and never hard-deleted, so rows here stay resolvable.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[sea_orm(table_name = "audit_logs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: i32,
    pub action: String, // e.g. "PROPERTY_CREATE", "PRICE_HISTORY_DELETE"
    pub target_type: String,
    pub target_id: String,
    #[sea_orm(column_type = "JsonBinary")]
    pub metadata: Option<serde_json::Value>,
    pub created_at: ChronoDateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    Users,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl ActiveModel {
    pub fn new(user_id: i32, action: String, target_type: String, target_id: String) -> Self {
        Self {
            id: ActiveValue::NotSet,
            user_id: Set(user_id),
            action: Set(action),
            target_type: Set(target_type),
            target_id: Set(target_id),
            metadata: ActiveValue::NotSet,
            created_at: Set(chrono::Utc::now()),
        }
    }
}
