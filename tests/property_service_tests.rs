mod common;

use chrono::{Duration, Utc};
use common::*;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};

use pricewatch::database::entities::property_access_grants::AccessLevel;
use pricewatch::database::entities::users::UserRole;
use pricewatch::database::entities::{
    audit_logs, competitors, price_records, property_access_grants, room_types,
};
use pricewatch::database::test_utils::setup_test_db;
use pricewatch::errors::CoreErrorKind;
use pricewatch::services::auth_service::SignupInput;
use pricewatch::services::property_service::{
    CreatePropertyInput, GrantAccessInput, PruneFilter, UpdatePropertyInput,
};
use pricewatch::services::{AuthService, AuthorizationService, PropertyService};

fn create_input(name: &str, owner_id: i32) -> CreatePropertyInput {
    CreatePropertyInput {
        name: name.to_string(),
        owner_id,
        city: Some("Roma".to_string()),
        country: Some("Italia".to_string()),
        address: None,
        property_type: Some("hotel".to_string()),
        timezone: Some("Europe/Rome".to_string()),
        default_frequency_cron: None,
        default_lookahead_days: Some(30),
        branding_logo_url: None,
        branding_primary_color: None,
        branding_accent_color: None,
        theme: None,
    }
}

#[tokio::test]
async fn property_creation_requires_the_admin_role() {
    let db = setup_test_db().await;
    let viewer = seed_user(&db, "viewer@example.com", UserRole::Viewer).await;
    let admin = seed_user(&db, "admin@example.com", UserRole::Admin).await;
    let owner = seed_user(&db, "owner@example.com", UserRole::Owner).await;

    let service = PropertyService::new(db.clone());

    let err = service
        .create_property(&viewer, &create_input("Hotel Bella Vista", owner.id))
        .await
        .expect_err("Expected forbidden");
    assert_eq!(err.kind(), CoreErrorKind::Forbidden);

    let property = service
        .create_property(&admin, &create_input("Hotel Bella Vista", owner.id))
        .await
        .unwrap();
    assert_eq!(property.owner_id, owner.id);
    assert_eq!(property.timezone, "Europe/Rome");

    // creation is audited
    let entries = audit_logs::Entity::find()
        .filter(audit_logs::Column::Action.eq("PROPERTY_CREATE"))
        .count(&db)
        .await
        .unwrap();
    assert_eq!(entries, 1);
}

#[tokio::test]
async fn update_is_allowed_for_owner_and_denied_as_not_found_for_strangers() {
    let db = setup_test_db().await;
    let owner = seed_user(&db, "owner@example.com", UserRole::Owner).await;
    let stranger = seed_user(&db, "stranger@example.com", UserRole::Viewer).await;
    let property = seed_property(&db, &owner, "Hotel Bella Vista").await;

    let service = PropertyService::new(db.clone());

    let updated = service
        .update_property(
            &owner,
            property.id,
            &UpdatePropertyInput {
                name: Some("Hotel Bella Vista Deluxe".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.name, "Hotel Bella Vista Deluxe");

    let err = service
        .update_property(&stranger, property.id, &UpdatePropertyInput::default())
        .await
        .expect_err("Expected denial");
    assert_eq!(err.kind(), CoreErrorKind::NotFound);
}

#[tokio::test]
async fn deleting_a_property_cascades_to_all_dependents() {
    let db = setup_test_db().await;
    let admin = seed_user(&db, "admin@example.com", UserRole::Admin).await;
    let owner = seed_user(&db, "owner@example.com", UserRole::Owner).await;
    let guest = seed_user(&db, "guest@example.com", UserRole::Viewer).await;
    let property = seed_property(&db, &owner, "Hotel Bella Vista").await;
    let room = seed_room_type(&db, &property, "Double Room").await;
    let rival = seed_competitor(&db, &property, "Rival A").await;
    seed_grant(&db, &guest, &property, AccessLevel::Viewer).await;
    seed_price(&db, property.id, rival.id, room.id, "2024-06-01", 100.0).await;

    PropertyService::new(db.clone())
        .delete_property(&admin, property.id)
        .await
        .unwrap();

    assert_eq!(room_types::Entity::find().count(&db).await.unwrap(), 0);
    assert_eq!(competitors::Entity::find().count(&db).await.unwrap(), 0);
    assert_eq!(price_records::Entity::find().count(&db).await.unwrap(), 0);
    assert_eq!(
        property_access_grants::Entity::find().count(&db).await.unwrap(),
        0
    );
}

#[tokio::test]
async fn ownership_transfer_swaps_access_atomically() {
    let db = setup_test_db().await;
    let admin = seed_user(&db, "admin@example.com", UserRole::Admin).await;
    let old_owner = seed_user(&db, "old@example.com", UserRole::Owner).await;
    let new_owner = seed_user(&db, "new@example.com", UserRole::Owner).await;
    let property = seed_property(&db, &old_owner, "Hotel Bella Vista").await;

    let updated = PropertyService::new(db.clone())
        .transfer_ownership(&admin, property.id, new_owner.id)
        .await
        .unwrap();
    assert_eq!(updated.owner_id, new_owner.id);

    let authz = AuthorizationService::new(db.clone());
    assert!(authz.can_manage(new_owner.id, property.id).await.unwrap());
    assert!(!authz.can_view(old_owner.id, property.id).await.unwrap());
}

#[tokio::test]
async fn granting_twice_upserts_a_single_row() {
    let db = setup_test_db().await;
    let owner = seed_user(&db, "owner@example.com", UserRole::Owner).await;
    let guest = seed_user(&db, "guest@example.com", UserRole::Viewer).await;
    let property = seed_property(&db, &owner, "Hotel Bella Vista").await;

    let service = PropertyService::new(db.clone());

    service
        .grant_access(
            &owner,
            property.id,
            &GrantAccessInput {
                user_id: guest.id,
                level: "VIEWER".to_string(),
            },
        )
        .await
        .unwrap();

    let grant = service
        .grant_access(
            &owner,
            property.id,
            &GrantAccessInput {
                user_id: guest.id,
                level: "ADMIN".to_string(),
            },
        )
        .await
        .unwrap();
    assert_eq!(grant.level, "ADMIN");

    let rows = property_access_grants::Entity::find()
        .filter(property_access_grants::Column::UserId.eq(guest.id))
        .count(&db)
        .await
        .unwrap();
    assert_eq!(rows, 1);

    let authz = AuthorizationService::new(db.clone());
    assert!(authz.can_manage(guest.id, property.id).await.unwrap());
}

#[tokio::test]
async fn revoking_a_grant_removes_access() {
    let db = setup_test_db().await;
    let owner = seed_user(&db, "owner@example.com", UserRole::Owner).await;
    let guest = seed_user(&db, "guest@example.com", UserRole::Viewer).await;
    let property = seed_property(&db, &owner, "Hotel Bella Vista").await;
    seed_grant(&db, &guest, &property, AccessLevel::Viewer).await;

    let service = PropertyService::new(db.clone());
    service.revoke_access(&owner, property.id, guest.id).await.unwrap();

    let authz = AuthorizationService::new(db.clone());
    assert!(!authz.can_view(guest.id, property.id).await.unwrap());

    let err = service
        .revoke_access(&owner, property.id, guest.id)
        .await
        .expect_err("Expected missing grant");
    assert_eq!(err.kind(), CoreErrorKind::NotFound);
}

#[tokio::test]
async fn pruning_removes_only_records_older_than_the_cutoff() {
    let db = setup_test_db().await;
    let admin = seed_user(&db, "admin@example.com", UserRole::Admin).await;
    let owner = seed_user(&db, "owner@example.com", UserRole::Owner).await;
    let property = seed_property(&db, &owner, "Hotel Bella Vista").await;
    let room = seed_room_type(&db, &property, "Double Room").await;
    let rival = seed_competitor(&db, &property, "Rival A").await;

    let stale = Utc::now() - Duration::days(40);
    seed_price_fetched_at(&db, property.id, rival.id, room.id, "2024-06-01", 100.0, stale).await;
    seed_price_fetched_at(&db, property.id, rival.id, room.id, "2024-06-02", 105.0, stale).await;
    seed_price(&db, property.id, rival.id, room.id, "2024-06-03", 110.0).await;

    let deleted = PropertyService::new(db.clone())
        .prune_price_history(
            &admin,
            property.id,
            &PruneFilter {
                older_than_days: Some(30),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(deleted, 2);

    let remaining = price_records::Entity::find().count(&db).await.unwrap();
    assert_eq!(remaining, 1);

    // exactly one audit entry carrying the deleted count
    let entries = audit_logs::Entity::find()
        .filter(audit_logs::Column::Action.eq("PRICE_HISTORY_DELETE"))
        .all(&db)
        .await
        .unwrap();
    assert_eq!(entries.len(), 1);
    let metadata = entries[0].metadata.as_ref().expect("metadata");
    assert_eq!(metadata["deletedCount"], 2);
}

#[tokio::test]
async fn pruning_requires_the_admin_role() {
    let db = setup_test_db().await;
    let owner = seed_user(&db, "owner@example.com", UserRole::Owner).await;
    let property = seed_property(&db, &owner, "Hotel Bella Vista").await;

    let err = PropertyService::new(db.clone())
        .prune_price_history(&owner, property.id, &PruneFilter::default())
        .await
        .expect_err("Expected forbidden");
    assert_eq!(err.kind(), CoreErrorKind::Forbidden);
}

#[tokio::test]
async fn signup_rejects_duplicate_emails() {
    let db = setup_test_db().await;
    let service = AuthService::new(db.clone());

    let input = SignupInput {
        email: "host@example.com".to_string(),
        display_name: "Host".to_string(),
        password: "correct horse".to_string(),
    };

    let user = service.signup(&input).await.unwrap();
    assert_eq!(user.role, "VIEWER");
    assert_ne!(user.password_hash, "correct horse");

    let err = service.signup(&input).await.expect_err("Expected conflict");
    assert_eq!(err.kind(), CoreErrorKind::Conflict);
}

#[tokio::test]
async fn role_changes_are_gated_and_audited() {
    let db = setup_test_db().await;
    let admin = seed_user(&db, "admin@example.com", UserRole::Admin).await;
    let root = seed_user(&db, "root@example.com", UserRole::SuperAdmin).await;
    let viewer = seed_user(&db, "viewer@example.com", UserRole::Viewer).await;

    let service = AuthService::new(db.clone());

    let err = service
        .set_user_role(&viewer, admin.id, "VIEWER")
        .await
        .expect_err("Expected forbidden");
    assert_eq!(err.kind(), CoreErrorKind::Forbidden);

    // plain admins cannot mint SUPER_ADMIN accounts
    let err = service
        .set_user_role(&admin, viewer.id, "SUPER_ADMIN")
        .await
        .expect_err("Expected forbidden");
    assert_eq!(err.kind(), CoreErrorKind::Forbidden);

    let updated = service.set_user_role(&admin, viewer.id, "OWNER").await.unwrap();
    assert_eq!(updated.role, "OWNER");

    let updated = service
        .set_user_role(&root, viewer.id, "SUPER_ADMIN")
        .await
        .unwrap();
    assert_eq!(updated.role, "SUPER_ADMIN");

    let entries = audit_logs::Entity::find()
        .filter(audit_logs::Column::Action.eq("USER_ROLE_UPDATE"))
        .count(&db)
        .await
        .unwrap();
    assert_eq!(entries, 2);
}
