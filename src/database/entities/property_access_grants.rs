use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue, Set};
use serde::{Deserialize, Serialize};

/// Explicit per-property ACL entry, independent from ownership. A user holds
/// at most one grant per property (unique index, upsert semantics).
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[sea_orm(table_name = "property_access_grants")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: i32,
    pub property_id: i32,
    pub level: String, // "VIEWER", "OWNER", "ADMIN"
    pub granted_by: Option<i32>,
    pub created_at: ChronoDateTimeUtc,
    pub updated_at: ChronoDateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    Users,
    #[sea_orm(
        belongs_to = "super::properties::Entity",
        from = "Column::PropertyId",
        to = "super::properties::Column::Id"
    )]
    Properties,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::GrantedBy",
        to = "super::users::Column::Id"
    )]
    GrantedByUser,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl Related<super::properties::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Properties.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Access level carried by a grant, ranked like the global roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccessLevel {
    Viewer,
    Owner,
    Admin,
}

impl AccessLevel {
    pub fn from_str(s: &str) -> Result<Self, String> {
        match s {
            "VIEWER" => Ok(AccessLevel::Viewer),
            "OWNER" => Ok(AccessLevel::Owner),
            "ADMIN" => Ok(AccessLevel::Admin),
            _ => Err(format!("Invalid access level: {}", s)),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AccessLevel::Viewer => "VIEWER",
            AccessLevel::Owner => "OWNER",
            AccessLevel::Admin => "ADMIN",
        }
    }

    pub fn rank(&self) -> u8 {
        match self {
            AccessLevel::Viewer => 1,
            AccessLevel::Owner => 2,
            AccessLevel::Admin => 3,
        }
    }

    pub fn satisfies(&self, minimum: AccessLevel) -> bool {
        self.rank() >= minimum.rank()
    }
}

impl ActiveModel {
    pub fn new(
        user_id: i32,
        property_id: i32,
        level: AccessLevel,
        granted_by: Option<i32>,
    ) -> Self {
        let now = chrono::Utc::now();
        Self {
            id: ActiveValue::NotSet,
            user_id: Set(user_id),
            property_id: Set(property_id),
            level: Set(level.as_str().to_string()),
            granted_by: Set(granted_by),
            created_at: Set(now),
            updated_at: Set(now),
        }
    }
}

impl Model {
    pub fn get_level(&self) -> Result<AccessLevel, String> {
        AccessLevel::from_str(&self.level)
    }
}
