use chrono::{Duration, Utc};
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    Set,
};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::database::entities::property_access_grants::AccessLevel;
use crate::database::entities::users::UserRole;
use crate::database::entities::{
    competitor_configs, competitors, price_records, properties, property_access_grants, room_types,
    users,
};
use crate::errors::{CoreError, CoreResult};
use crate::services::authorization::PropertyOverview;
use crate::services::{AuditService, AuthorizationService, ValidationService};

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePropertyInput {
    pub name: String,
    pub owner_id: i32,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub property_type: Option<String>,
    #[serde(default)]
    pub timezone: Option<String>,
    #[serde(default)]
    pub default_frequency_cron: Option<String>,
    #[serde(default)]
    pub default_lookahead_days: Option<i32>,
    #[serde(default)]
    pub branding_logo_url: Option<String>,
    #[serde(default)]
    pub branding_primary_color: Option<String>,
    #[serde(default)]
    pub branding_accent_color: Option<String>,
    #[serde(default)]
    pub theme: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePropertyInput {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub property_type: Option<String>,
    #[serde(default)]
    pub timezone: Option<String>,
    #[serde(default)]
    pub default_frequency_cron: Option<String>,
    #[serde(default)]
    pub default_lookahead_days: Option<i32>,
    #[serde(default)]
    pub branding_logo_url: Option<String>,
    #[serde(default)]
    pub branding_primary_color: Option<String>,
    #[serde(default)]
    pub branding_accent_color: Option<String>,
    #[serde(default)]
    pub theme: Option<String>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GrantAccessInput {
    pub user_id: i32,
    pub level: String, // "VIEWER", "OWNER", "ADMIN"
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoomTypeInput {
    pub name: String,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub capacity: Option<i32>,
    #[serde(default)]
    pub active: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCompetitorInput {
    pub name: String,
    pub base_url: String,
    #[serde(default)]
    pub active: Option<bool>,
    #[serde(default)]
    pub frequency_cron: Option<String>,
    #[serde(default)]
    pub timezone: Option<String>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompetitorConfigInput {
    pub room_type_id: i32,
    #[serde(default)]
    pub price_selector: Option<String>,
    #[serde(default)]
    pub date_selector: Option<String>,
    #[serde(default)]
    pub currency_selector: Option<String>,
    #[serde(default)]
    pub availability_selector: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PruneFilter {
    #[serde(default)]
    pub competitor_id: Option<i32>,
    #[serde(default)]
    pub room_type_id: Option<i32>,
    #[serde(default)]
    pub older_than_days: Option<i64>,
}

/// Property lifecycle and everything scoped beneath one: access grants, room
/// types, competitors, scraping configs, and price-history pruning.
///
/// Administrative mutations are appended to the audit trail (best-effort).
#[derive(Clone)]
pub struct PropertyService {
    db: DatabaseConnection,
    authz: AuthorizationService,
    audit: AuditService,
}

impl PropertyService {
    pub fn new(db: DatabaseConnection) -> Self {
        let authz = AuthorizationService::new(db.clone());
        let audit = AuditService::new(db.clone());
        Self { db, authz, audit }
    }

    pub async fn list_properties(&self, user: &users::Model) -> CoreResult<Vec<PropertyOverview>> {
        self.authz.list_visible_properties(user).await
    }

    pub async fn get_property(
        &self,
        user: &users::Model,
        property_id: i32,
    ) -> CoreResult<PropertyOverview> {
        self.authz.require_view(user.id, property_id).await?;

        let property = properties::Entity::find_by_id(property_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| CoreError::not_found("property", property_id))?;

        let competitor_count = competitors::Entity::find()
            .filter(competitors::Column::PropertyId.eq(property_id))
            .count(&self.db)
            .await?;
        let room_type_count = room_types::Entity::find()
            .filter(room_types::Column::PropertyId.eq(property_id))
            .count(&self.db)
            .await?;

        Ok(PropertyOverview {
            property,
            competitor_count,
            room_type_count,
        })
    }

    pub async fn create_property(
        &self,
        actor: &users::Model,
        input: &CreatePropertyInput,
    ) -> CoreResult<properties::Model> {
        AuthorizationService::require_role(actor, UserRole::Admin)?;
        ValidationService::validate_name("name", &input.name)?;
        if let Some(days) = input.default_lookahead_days {
            ValidationService::validate_lookahead_days(days)?;
        }
        if let Some(cron) = &input.default_frequency_cron {
            ValidationService::validate_cron("defaultFrequencyCron", cron)?;
        }

        users::Entity::find_by_id(input.owner_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| CoreError::reference_not_found("user", input.owner_id))?;

        let mut property = properties::ActiveModel::new();
        property.name = Set(input.name.clone());
        property.owner_id = Set(input.owner_id);
        property.city = Set(input.city.clone());
        property.country = Set(input.country.clone());
        property.address = Set(input.address.clone());
        if let Some(property_type) = &input.property_type {
            property.property_type = Set(property_type.clone());
        }
        if let Some(timezone) = &input.timezone {
            property.timezone = Set(timezone.clone());
        }
        if let Some(cron) = &input.default_frequency_cron {
            property.default_frequency_cron = Set(cron.clone());
        }
        if let Some(days) = input.default_lookahead_days {
            property.default_lookahead_days = Set(days);
        }
        property.branding_logo_url = Set(input.branding_logo_url.clone());
        property.branding_primary_color = Set(input.branding_primary_color.clone());
        property.branding_accent_color = Set(input.branding_accent_color.clone());
        property.theme = Set(input.theme.clone());

        let property = property.insert(&self.db).await?;

        self.audit
            .log(
                actor.id,
                "PROPERTY_CREATE",
                "Property",
                property.id,
                Some(serde_json::json!({ "name": property.name, "ownerId": property.owner_id })),
            )
            .await;

        Ok(property)
    }

    pub async fn update_property(
        &self,
        actor: &users::Model,
        property_id: i32,
        input: &UpdatePropertyInput,
    ) -> CoreResult<properties::Model> {
        self.authz.require_manage(actor.id, property_id).await?;

        let property = properties::Entity::find_by_id(property_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| CoreError::not_found("property", property_id))?;

        let mut active: properties::ActiveModel = property.into();

        if let Some(name) = &input.name {
            ValidationService::validate_name("name", name)?;
            active.name = Set(name.clone());
        }
        if let Some(city) = &input.city {
            active.city = Set(Some(city.clone()));
        }
        if let Some(country) = &input.country {
            active.country = Set(Some(country.clone()));
        }
        if let Some(address) = &input.address {
            active.address = Set(Some(address.clone()));
        }
        if let Some(property_type) = &input.property_type {
            active.property_type = Set(property_type.clone());
        }
        if let Some(timezone) = &input.timezone {
            active.timezone = Set(timezone.clone());
        }
        if let Some(cron) = &input.default_frequency_cron {
            ValidationService::validate_cron("defaultFrequencyCron", cron)?;
            active.default_frequency_cron = Set(cron.clone());
        }
        if let Some(days) = input.default_lookahead_days {
            ValidationService::validate_lookahead_days(days)?;
            active.default_lookahead_days = Set(days);
        }
        if let Some(url) = &input.branding_logo_url {
            active.branding_logo_url = Set(Some(url.clone()));
        }
        if let Some(color) = &input.branding_primary_color {
            active.branding_primary_color = Set(Some(color.clone()));
        }
        if let Some(color) = &input.branding_accent_color {
            active.branding_accent_color = Set(Some(color.clone()));
        }
        if let Some(theme) = &input.theme {
            active.theme = Set(Some(theme.clone()));
        }

        let updated = active.set_updated_at().update(&self.db).await?;

        self.audit
            .log(actor.id, "PROPERTY_UPDATE", "Property", property_id, None)
            .await;

        Ok(updated)
    }

    /// Delete a property; room types, competitors, price records and grants
    /// go with it via FK cascade.
    pub async fn delete_property(&self, actor: &users::Model, property_id: i32) -> CoreResult<()> {
        AuthorizationService::require_role(actor, UserRole::Admin)?;

        let result = properties::Entity::delete_by_id(property_id)
            .exec(&self.db)
            .await?;
        if result.rows_affected == 0 {
            return Err(CoreError::not_found("property", property_id));
        }

        self.audit
            .log(actor.id, "PROPERTY_DELETE", "Property", property_id, None)
            .await;

        Ok(())
    }

    /// Move a property to a new owner: one atomic UPDATE of `owner_id`, so
    /// the property never has zero or two owners.
    pub async fn transfer_ownership(
        &self,
        actor: &users::Model,
        property_id: i32,
        new_owner_id: i32,
    ) -> CoreResult<properties::Model> {
        AuthorizationService::require_role(actor, UserRole::Admin)?;

        let property = properties::Entity::find_by_id(property_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| CoreError::not_found("property", property_id))?;

        users::Entity::find_by_id(new_owner_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| CoreError::reference_not_found("user", new_owner_id))?;

        let previous_owner = property.owner_id;
        let mut active: properties::ActiveModel = property.into();
        active.owner_id = Set(new_owner_id);
        let updated = active.set_updated_at().update(&self.db).await?;

        self.audit
            .log(
                actor.id,
                "PROPERTY_TRANSFER",
                "Property",
                property_id,
                Some(serde_json::json!({ "from": previous_owner, "to": new_owner_id })),
            )
            .await;

        Ok(updated)
    }

    /// Upsert an ACL entry: a user holds at most one grant per property, so
    /// re-granting replaces the level in place.
    pub async fn grant_access(
        &self,
        actor: &users::Model,
        property_id: i32,
        input: &GrantAccessInput,
    ) -> CoreResult<property_access_grants::Model> {
        self.authz.require_manage(actor.id, property_id).await?;

        let level = AccessLevel::from_str(&input.level)
            .map_err(|_| CoreError::validation_field("level", "Invalid access level"))?;

        users::Entity::find_by_id(input.user_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| CoreError::reference_not_found("user", input.user_id))?;

        let grant = property_access_grants::ActiveModel::new(
            input.user_id,
            property_id,
            level,
            Some(actor.id),
        );

        property_access_grants::Entity::insert(grant)
            .on_conflict(
                OnConflict::columns([
                    property_access_grants::Column::UserId,
                    property_access_grants::Column::PropertyId,
                ])
                .update_columns([
                    property_access_grants::Column::Level,
                    property_access_grants::Column::GrantedBy,
                    property_access_grants::Column::UpdatedAt,
                ])
                .to_owned(),
            )
            .exec(&self.db)
            .await?;

        let stored = property_access_grants::Entity::find()
            .filter(property_access_grants::Column::UserId.eq(input.user_id))
            .filter(property_access_grants::Column::PropertyId.eq(property_id))
            .one(&self.db)
            .await?
            .ok_or_else(|| CoreError::internal("Grant disappeared after upsert"))?;

        self.audit
            .log(
                actor.id,
                "ACCESS_GRANT",
                "Property",
                property_id,
                Some(serde_json::json!({ "userId": input.user_id, "level": level.as_str() })),
            )
            .await;

        Ok(stored)
    }

    pub async fn revoke_access(
        &self,
        actor: &users::Model,
        property_id: i32,
        user_id: i32,
    ) -> CoreResult<()> {
        self.authz.require_manage(actor.id, property_id).await?;

        let result = property_access_grants::Entity::delete_many()
            .filter(property_access_grants::Column::UserId.eq(user_id))
            .filter(property_access_grants::Column::PropertyId.eq(property_id))
            .exec(&self.db)
            .await?;
        if result.rows_affected == 0 {
            return Err(CoreError::not_found("access grant", user_id));
        }

        self.audit
            .log(
                actor.id,
                "ACCESS_REVOKE",
                "Property",
                property_id,
                Some(serde_json::json!({ "userId": user_id })),
            )
            .await;

        Ok(())
    }

    pub async fn list_room_types(
        &self,
        user: &users::Model,
        property_id: i32,
    ) -> CoreResult<Vec<room_types::Model>> {
        self.authz.require_view(user.id, property_id).await?;

        let room_types = room_types::Entity::find()
            .filter(room_types::Column::PropertyId.eq(property_id))
            .all(&self.db)
            .await?;
        Ok(room_types)
    }

    pub async fn create_room_type(
        &self,
        actor: &users::Model,
        property_id: i32,
        input: &CreateRoomTypeInput,
    ) -> CoreResult<room_types::Model> {
        self.authz.require_manage(actor.id, property_id).await?;
        ValidationService::validate_name("name", &input.name)?;

        let mut room_type = room_types::ActiveModel::new(property_id, input.name.clone());
        room_type.code = Set(input.code.clone());
        if let Some(capacity) = input.capacity {
            if capacity < 1 {
                return Err(CoreError::validation_field(
                    "capacity",
                    "Capacity must be at least 1",
                ));
            }
            room_type.capacity = Set(capacity);
        }
        if let Some(active) = input.active {
            room_type.active = Set(active);
        }

        Ok(room_type.insert(&self.db).await?)
    }

    pub async fn delete_room_type(&self, actor: &users::Model, room_type_id: i32) -> CoreResult<()> {
        let room_type = room_types::Entity::find_by_id(room_type_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| CoreError::not_found("room type", room_type_id))?;

        self.authz
            .require_manage(actor.id, room_type.property_id)
            .await?;

        room_types::Entity::delete_by_id(room_type_id)
            .exec(&self.db)
            .await?;
        Ok(())
    }

    pub async fn list_competitors(
        &self,
        user: &users::Model,
        property_id: i32,
    ) -> CoreResult<Vec<competitors::Model>> {
        self.authz.require_view(user.id, property_id).await?;

        let competitors = competitors::Entity::find()
            .filter(competitors::Column::PropertyId.eq(property_id))
            .all(&self.db)
            .await?;
        Ok(competitors)
    }

    pub async fn create_competitor(
        &self,
        actor: &users::Model,
        property_id: i32,
        input: &CreateCompetitorInput,
    ) -> CoreResult<competitors::Model> {
        self.authz.require_manage(actor.id, property_id).await?;
        ValidationService::validate_name("name", &input.name)?;
        ValidationService::validate_base_url(&input.base_url)?;
        if let Some(cron) = &input.frequency_cron {
            ValidationService::validate_cron("frequencyCron", cron)?;
        }

        let mut competitor =
            competitors::ActiveModel::new(property_id, input.name.clone(), input.base_url.clone());
        if let Some(active) = input.active {
            competitor.active = Set(active);
        }
        competitor.frequency_cron = Set(input.frequency_cron.clone());
        competitor.timezone = Set(input.timezone.clone());

        Ok(competitor.insert(&self.db).await?)
    }

    pub async fn delete_competitor(
        &self,
        actor: &users::Model,
        competitor_id: i32,
    ) -> CoreResult<()> {
        let competitor = competitors::Entity::find_by_id(competitor_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| CoreError::not_found("competitor", competitor_id))?;

        self.authz
            .require_manage(actor.id, competitor.property_id)
            .await?;

        competitors::Entity::delete_by_id(competitor_id)
            .exec(&self.db)
            .await?;
        Ok(())
    }

    /// Upsert the per-room-type scraping config of a competitor. Selector
    /// strings are stored verbatim for the workflow engine.
    pub async fn upsert_competitor_config(
        &self,
        actor: &users::Model,
        competitor_id: i32,
        input: &CompetitorConfigInput,
    ) -> CoreResult<competitor_configs::Model> {
        let competitor = competitors::Entity::find_by_id(competitor_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| CoreError::not_found("competitor", competitor_id))?;

        self.authz
            .require_manage(actor.id, competitor.property_id)
            .await?;

        room_types::Entity::find_by_id(input.room_type_id)
            .one(&self.db)
            .await?
            .filter(|rt| rt.property_id == competitor.property_id)
            .ok_or_else(|| CoreError::reference_not_found("room type", input.room_type_id))?;

        let mut config = competitor_configs::ActiveModel::new(competitor_id, input.room_type_id);
        config.price_selector = Set(input.price_selector.clone());
        config.date_selector = Set(input.date_selector.clone());
        config.currency_selector = Set(input.currency_selector.clone());
        config.availability_selector = Set(input.availability_selector.clone());
        config.notes = Set(input.notes.clone());

        competitor_configs::Entity::insert(config)
            .on_conflict(
                OnConflict::columns([
                    competitor_configs::Column::CompetitorId,
                    competitor_configs::Column::RoomTypeId,
                ])
                .update_columns([
                    competitor_configs::Column::PriceSelector,
                    competitor_configs::Column::DateSelector,
                    competitor_configs::Column::CurrencySelector,
                    competitor_configs::Column::AvailabilitySelector,
                    competitor_configs::Column::Notes,
                    competitor_configs::Column::UpdatedAt,
                ])
                .to_owned(),
            )
            .exec(&self.db)
            .await?;

        let stored = competitor_configs::Entity::find()
            .filter(competitor_configs::Column::CompetitorId.eq(competitor_id))
            .filter(competitor_configs::Column::RoomTypeId.eq(input.room_type_id))
            .one(&self.db)
            .await?
            .ok_or_else(|| CoreError::internal("Config disappeared after upsert"))?;

        Ok(stored)
    }

    /// Bulk-delete price history for a property, optionally narrowed by
    /// competitor, room type, or record age. ADMIN and above only; one audit
    /// entry records the deleted row count and the filters used.
    pub async fn prune_price_history(
        &self,
        actor: &users::Model,
        property_id: i32,
        filter: &PruneFilter,
    ) -> CoreResult<u64> {
        AuthorizationService::require_role(actor, UserRole::Admin)?;

        properties::Entity::find_by_id(property_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| CoreError::not_found("property", property_id))?;

        let mut delete = price_records::Entity::delete_many()
            .filter(price_records::Column::PropertyId.eq(property_id));

        if let Some(competitor_id) = filter.competitor_id {
            delete = delete.filter(price_records::Column::CompetitorId.eq(competitor_id));
        }
        if let Some(room_type_id) = filter.room_type_id {
            delete = delete.filter(price_records::Column::RoomTypeId.eq(room_type_id));
        }
        if let Some(days) = filter.older_than_days {
            if days < 1 {
                return Err(CoreError::validation_field(
                    "olderThanDays",
                    "olderThanDays must be a positive number",
                ));
            }
            let cutoff = Utc::now() - Duration::days(days);
            delete = delete.filter(price_records::Column::FetchedAt.lt(cutoff));
        }

        let result = delete.exec(&self.db).await?;
        let deleted_count = result.rows_affected;

        self.audit
            .log(
                actor.id,
                "PRICE_HISTORY_DELETE",
                "PriceHistory",
                property_id,
                Some(serde_json::json!({
                    "deletedCount": deleted_count,
                    "filters": {
                        "competitorId": filter.competitor_id,
                        "roomTypeId": filter.room_type_id,
                        "olderThanDays": filter.older_than_days,
                    },
                })),
            )
            .await;

        tracing::info!(property_id, deleted_count, "pruned price history");

        Ok(deleted_count)
    }
}
