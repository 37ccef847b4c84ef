use bcrypt::{hash, verify, DEFAULT_COST};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::database::entities::users::{self, UserRole};
use crate::errors::{CoreError, CoreResult};
use crate::services::{AuditService, AuthorizationService, ValidationService};

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignupInput {
    pub email: String,
    pub display_name: String,
    pub password: String,
}

/// Account management: signup, role administration, credential hashing.
///
/// Session issuance itself lives in the external authentication provider;
/// this service only owns what the dashboard core needs locally.
#[derive(Clone)]
pub struct AuthService {
    db: DatabaseConnection,
    audit: AuditService,
}

impl AuthService {
    pub fn new(db: DatabaseConnection) -> Self {
        let audit = AuditService::new(db.clone());
        Self { db, audit }
    }

    pub fn hash_password(password: &str) -> CoreResult<String> {
        ValidationService::validate_password(password)?;
        hash(password, DEFAULT_COST)
            .map_err(|err| CoreError::internal("Failed to hash password").with_source(err))
    }

    pub fn verify_password(password: &str, password_hash: &str) -> CoreResult<bool> {
        verify(password, password_hash)
            .map_err(|err| CoreError::internal("Failed to verify password").with_source(err))
    }

    /// Create a new VIEWER account. Duplicate email is a conflict.
    pub async fn signup(&self, input: &SignupInput) -> CoreResult<users::Model> {
        ValidationService::validate_email(&input.email)?;
        ValidationService::validate_display_name(&input.display_name)?;
        let password_hash = Self::hash_password(&input.password)?;

        let existing = users::Entity::find()
            .filter(users::Column::Email.eq(input.email.clone()))
            .one(&self.db)
            .await?;
        if existing.is_some() {
            return Err(CoreError::conflict("A user with this email already exists"));
        }

        let mut user = users::ActiveModel::new();
        user.email = Set(input.email.clone());
        user.display_name = Set(input.display_name.clone());
        user.password_hash = Set(password_hash);

        let user = user.insert(&self.db).await?;
        tracing::info!(user_id = user.id, "user signed up");
        Ok(user)
    }

    pub async fn list_users(&self, actor: &users::Model) -> CoreResult<Vec<users::Model>> {
        AuthorizationService::require_role(actor, UserRole::Admin)?;

        let users = users::Entity::find()
            .order_by_asc(users::Column::Email)
            .all(&self.db)
            .await?;
        Ok(users)
    }

    /// Change a user's global role. Touching the SUPER_ADMIN tier (either
    /// direction) is reserved to SUPER_ADMIN actors.
    pub async fn set_user_role(
        &self,
        actor: &users::Model,
        user_id: i32,
        role: &str,
    ) -> CoreResult<users::Model> {
        AuthorizationService::require_role(actor, UserRole::Admin)?;

        let new_role =
            UserRole::from_str(role).map_err(|_| CoreError::validation_field("role", "Invalid role"))?;

        let target = users::Entity::find_by_id(user_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| CoreError::not_found("user", user_id))?;

        if new_role == UserRole::SuperAdmin || target.is_super_admin() {
            AuthorizationService::require_role(actor, UserRole::SuperAdmin)?;
        }

        let previous_role = target.role.clone();
        let mut active: users::ActiveModel = target.into();
        active.role = Set(new_role.as_str().to_string());
        let updated = active.set_updated_at().update(&self.db).await?;

        self.audit
            .log(
                actor.id,
                "USER_ROLE_UPDATE",
                "User",
                user_id,
                Some(serde_json::json!({
                    "from": previous_role,
                    "to": new_role.as_str(),
                })),
            )
            .await;

        Ok(updated)
    }
}

/// Public view of a user, with the password hash stripped.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: i32,
    pub email: String,
    pub display_name: String,
    pub role: String,
    pub is_active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<users::Model> for UserResponse {
    fn from(user: users::Model) -> Self {
        Self {
            id: user.id,
            email: user.email,
            display_name: user.display_name,
            role: user.role,
            is_active: user.is_active,
            created_at: user.created_at,
        }
    }
}
