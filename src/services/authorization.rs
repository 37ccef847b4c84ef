use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder};
use serde::Serialize;
use utoipa::ToSchema;

use crate::database::entities::property_access_grants::AccessLevel;
use crate::database::entities::users::UserRole;
use crate::database::entities::{competitors, properties, property_access_grants, room_types, users};
use crate::errors::{CoreError, CoreResult};

/// A property as seen in a user's dashboard listing, annotated with the
/// aggregate counts the overview cards need.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PropertyOverview {
    #[serde(flatten)]
    #[schema(value_type = Object)]
    pub property: properties::Model,
    pub competitor_count: u64,
    pub room_type_count: u64,
}

/// Decides whether a principal may view or manage a property, and enumerates
/// the properties visible to a principal.
///
/// Two independent grant mechanisms feed the decision: exclusive ownership
/// (`properties.owner_id`) and explicit ACL rows (`property_access_grants`).
/// SUPER_ADMIN bypasses both. The decision core is the pure
/// [`AuthorizationService::evaluate_access`], so the policy is testable
/// without a database.
#[derive(Clone)]
pub struct AuthorizationService {
    db: DatabaseConnection,
}

impl AuthorizationService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Pure access decision over explicit snapshots.
    ///
    /// Resolution order: role short-circuit, then ownership, then the ACL
    /// row. Ownership always wins over a stale or missing grant.
    pub fn evaluate_access(
        user: &users::Model,
        is_owner: bool,
        grant: Option<&property_access_grants::Model>,
        required: AccessLevel,
    ) -> bool {
        if user.is_super_admin() {
            return true;
        }

        if is_owner {
            return true;
        }

        match grant.and_then(|g| g.get_level().ok()) {
            Some(level) => level.satisfies(required),
            None => false,
        }
    }

    /// Pure comparison against the global role hierarchy.
    pub fn require_role(user: &users::Model, minimum: UserRole) -> CoreResult<()> {
        let role = user
            .get_role()
            .map_err(|err| CoreError::internal(err))?;

        if role.satisfies(minimum) {
            Ok(())
        } else {
            Err(CoreError::forbidden(format!(
                "Requires {} role",
                minimum.as_str()
            )))
        }
    }

    pub async fn can_view(&self, user_id: i32, property_id: i32) -> CoreResult<bool> {
        self.has_property_access(user_id, property_id, AccessLevel::Viewer)
            .await
    }

    pub async fn can_manage(&self, user_id: i32, property_id: i32) -> CoreResult<bool> {
        self.has_property_access(user_id, property_id, AccessLevel::Admin)
            .await
    }

    /// Like [`can_view`](Self::can_view), but a denial surfaces as NotFound:
    /// callers cannot distinguish a property that does not exist from one
    /// they are not allowed to see.
    pub async fn require_view(&self, user_id: i32, property_id: i32) -> CoreResult<()> {
        if self.can_view(user_id, property_id).await? {
            Ok(())
        } else {
            Err(CoreError::not_found("property", property_id))
        }
    }

    pub async fn require_manage(&self, user_id: i32, property_id: i32) -> CoreResult<()> {
        if self.can_manage(user_id, property_id).await? {
            Ok(())
        } else {
            Err(CoreError::not_found("property", property_id))
        }
    }

    /// The de-duplicated union of owned and granted properties, each with
    /// competitor and room-type counts. SUPER_ADMIN sees every property.
    pub async fn list_visible_properties(
        &self,
        user: &users::Model,
    ) -> CoreResult<Vec<PropertyOverview>> {
        let visible = if user.is_super_admin() {
            properties::Entity::find()
                .order_by_desc(properties::Column::UpdatedAt)
                .all(&self.db)
                .await?
        } else {
            let mut visible = properties::Entity::find()
                .filter(properties::Column::OwnerId.eq(user.id))
                .all(&self.db)
                .await?;

            let grants = property_access_grants::Entity::find()
                .filter(property_access_grants::Column::UserId.eq(user.id))
                .all(&self.db)
                .await?;
            let granted_ids: Vec<i32> = grants
                .iter()
                .map(|g| g.property_id)
                .filter(|id| !visible.iter().any(|p| p.id == *id))
                .collect();

            if !granted_ids.is_empty() {
                let granted = properties::Entity::find()
                    .filter(properties::Column::Id.is_in(granted_ids))
                    .all(&self.db)
                    .await?;
                visible.extend(granted);
            }

            visible.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
            visible
        };

        let mut overviews = Vec::with_capacity(visible.len());
        for property in visible {
            let competitor_count = competitors::Entity::find()
                .filter(competitors::Column::PropertyId.eq(property.id))
                .count(&self.db)
                .await?;
            let room_type_count = room_types::Entity::find()
                .filter(room_types::Column::PropertyId.eq(property.id))
                .count(&self.db)
                .await?;

            overviews.push(PropertyOverview {
                property,
                competitor_count,
                room_type_count,
            });
        }

        Ok(overviews)
    }

    async fn has_property_access(
        &self,
        user_id: i32,
        property_id: i32,
        required: AccessLevel,
    ) -> CoreResult<bool> {
        let Some(user) = users::Entity::find_by_id(user_id).one(&self.db).await? else {
            return Ok(false);
        };

        // Absence is indistinguishable from denial to the caller
        let Some(property) = properties::Entity::find_by_id(property_id)
            .one(&self.db)
            .await?
        else {
            return Ok(false);
        };

        if user.is_super_admin() {
            return Ok(true);
        }

        let is_owner = property.owner_id == user_id;
        if is_owner {
            return Ok(true);
        }

        let grant = property_access_grants::Entity::find()
            .filter(property_access_grants::Column::UserId.eq(user_id))
            .filter(property_access_grants::Column::PropertyId.eq(property_id))
            .one(&self.db)
            .await?;

        Ok(Self::evaluate_access(&user, is_owner, grant.as_ref(), required))
    }
}
