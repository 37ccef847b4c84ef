use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue, Set};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub email: String,
    pub display_name: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub role: String, // "VIEWER", "OWNER", "ADMIN", "SUPER_ADMIN"
    pub is_active: bool,
    pub created_at: ChronoDateTimeUtc,
    pub updated_at: ChronoDateTimeUtc,
    pub last_login_at: Option<ChronoDateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::properties::Entity")]
    Properties,
    #[sea_orm(has_many = "super::property_access_grants::Entity")]
    PropertyAccessGrants,
    #[sea_orm(has_many = "super::audit_logs::Entity")]
    AuditLogs,
}

impl Related<super::properties::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Properties.def()
    }
}

impl Related<super::property_access_grants::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PropertyAccessGrants.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Global role of a user account. The ordering is the single authoritative
/// privilege hierarchy: every role comparison in the codebase goes through
/// [`UserRole::rank`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    Viewer,
    Owner,
    Admin,
    SuperAdmin,
}

impl UserRole {
    pub fn from_str(s: &str) -> Result<Self, String> {
        match s {
            "VIEWER" => Ok(UserRole::Viewer),
            "OWNER" => Ok(UserRole::Owner),
            "ADMIN" => Ok(UserRole::Admin),
            "SUPER_ADMIN" => Ok(UserRole::SuperAdmin),
            _ => Err(format!("Invalid role: {}", s)),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Viewer => "VIEWER",
            UserRole::Owner => "OWNER",
            UserRole::Admin => "ADMIN",
            UserRole::SuperAdmin => "SUPER_ADMIN",
        }
    }

    pub fn rank(&self) -> u8 {
        match self {
            UserRole::Viewer => 1,
            UserRole::Owner => 2,
            UserRole::Admin => 3,
            UserRole::SuperAdmin => 4,
        }
    }

    /// True when this role carries at least the privilege of `minimum`.
    pub fn satisfies(&self, minimum: UserRole) -> bool {
        self.rank() >= minimum.rank()
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ActiveModel {
    pub fn new() -> Self {
        let now = chrono::Utc::now();
        Self {
            id: ActiveValue::NotSet,
            email: ActiveValue::NotSet,
            display_name: ActiveValue::NotSet,
            password_hash: ActiveValue::NotSet,
            role: Set(UserRole::Viewer.as_str().to_string()),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            last_login_at: ActiveValue::NotSet,
        }
    }

    pub fn set_updated_at(mut self) -> Self {
        self.updated_at = Set(chrono::Utc::now());
        self
    }

    pub fn set_last_login(mut self) -> Self {
        self.last_login_at = Set(Some(chrono::Utc::now()));
        self
    }
}

impl Model {
    pub fn get_role(&self) -> Result<UserRole, String> {
        UserRole::from_str(&self.role)
    }

    pub fn is_super_admin(&self) -> bool {
        matches!(self.get_role(), Ok(UserRole::SuperAdmin))
    }
}
