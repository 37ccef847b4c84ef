mod common;

use common::*;
use pricewatch::database::entities::property_access_grants::AccessLevel;
use pricewatch::database::entities::users::UserRole;
use pricewatch::database::test_utils::setup_test_db;
use pricewatch::errors::CoreErrorKind;
use pricewatch::services::AuthorizationService;

#[tokio::test]
async fn owner_can_view_and_manage_without_any_grant() {
    let db = setup_test_db().await;
    let owner = seed_user(&db, "owner@example.com", UserRole::Owner).await;
    let property = seed_property(&db, &owner, "Hotel Bella Vista").await;

    let authz = AuthorizationService::new(db.clone());
    assert!(authz.can_view(owner.id, property.id).await.unwrap());
    assert!(authz.can_manage(owner.id, property.id).await.unwrap());
}

#[tokio::test]
async fn ownership_is_not_shadowed_by_a_weaker_grant() {
    let db = setup_test_db().await;
    let owner = seed_user(&db, "owner@example.com", UserRole::Owner).await;
    let property = seed_property(&db, &owner, "Hotel Bella Vista").await;
    seed_grant(&db, &owner, &property, AccessLevel::Viewer).await;

    let authz = AuthorizationService::new(db.clone());
    assert!(authz.can_manage(owner.id, property.id).await.unwrap());
}

#[tokio::test]
async fn stranger_is_denied_as_not_found() {
    let db = setup_test_db().await;
    let owner = seed_user(&db, "owner@example.com", UserRole::Owner).await;
    let stranger = seed_user(&db, "stranger@example.com", UserRole::Viewer).await;
    let property = seed_property(&db, &owner, "Hotel Bella Vista").await;

    let authz = AuthorizationService::new(db.clone());
    assert!(!authz.can_view(stranger.id, property.id).await.unwrap());

    // denial is indistinguishable from absence
    let err = authz
        .require_view(stranger.id, property.id)
        .await
        .expect_err("Expected denial");
    assert_eq!(err.kind(), CoreErrorKind::NotFound);
}

#[tokio::test]
async fn viewer_grant_views_but_does_not_manage() {
    let db = setup_test_db().await;
    let owner = seed_user(&db, "owner@example.com", UserRole::Owner).await;
    let guest = seed_user(&db, "guest@example.com", UserRole::Viewer).await;
    let property = seed_property(&db, &owner, "Hotel Bella Vista").await;
    seed_grant(&db, &guest, &property, AccessLevel::Viewer).await;

    let authz = AuthorizationService::new(db.clone());
    assert!(authz.can_view(guest.id, property.id).await.unwrap());
    assert!(!authz.can_manage(guest.id, property.id).await.unwrap());
}

#[tokio::test]
async fn admin_grant_manages_a_property_it_does_not_own() {
    let db = setup_test_db().await;
    let owner = seed_user(&db, "owner@example.com", UserRole::Owner).await;
    let manager = seed_user(&db, "manager@example.com", UserRole::Viewer).await;
    let property = seed_property(&db, &owner, "Hotel Bella Vista").await;
    seed_grant(&db, &manager, &property, AccessLevel::Admin).await;

    let authz = AuthorizationService::new(db.clone());
    assert!(authz.can_manage(manager.id, property.id).await.unwrap());
}

#[tokio::test]
async fn global_admin_role_does_not_bypass_property_scoping() {
    let db = setup_test_db().await;
    let owner = seed_user(&db, "owner@example.com", UserRole::Owner).await;
    let admin = seed_user(&db, "admin@example.com", UserRole::Admin).await;
    let property = seed_property(&db, &owner, "Hotel Bella Vista").await;

    let authz = AuthorizationService::new(db.clone());
    assert!(!authz.can_view(admin.id, property.id).await.unwrap());
}

#[tokio::test]
async fn super_admin_bypasses_everything() {
    let db = setup_test_db().await;
    let owner = seed_user(&db, "owner@example.com", UserRole::Owner).await;
    let root = seed_user(&db, "root@example.com", UserRole::SuperAdmin).await;
    let property = seed_property(&db, &owner, "Hotel Bella Vista").await;

    let authz = AuthorizationService::new(db.clone());
    assert!(authz.can_view(root.id, property.id).await.unwrap());
    assert!(authz.can_manage(root.id, property.id).await.unwrap());
}

#[tokio::test]
async fn missing_property_is_a_plain_false_for_everyone() {
    let db = setup_test_db().await;
    let root = seed_user(&db, "root@example.com", UserRole::SuperAdmin).await;

    let authz = AuthorizationService::new(db.clone());
    assert!(!authz.can_view(root.id, 4242).await.unwrap());
    assert!(!authz.can_manage(root.id, 4242).await.unwrap());
}

#[tokio::test]
async fn unknown_user_is_denied() {
    let db = setup_test_db().await;
    let owner = seed_user(&db, "owner@example.com", UserRole::Owner).await;
    let property = seed_property(&db, &owner, "Hotel Bella Vista").await;

    let authz = AuthorizationService::new(db.clone());
    assert!(!authz.can_view(999, property.id).await.unwrap());
}

#[tokio::test]
async fn visible_properties_are_the_deduplicated_union_of_owned_and_granted() {
    let db = setup_test_db().await;
    let owner = seed_user(&db, "owner@example.com", UserRole::Owner).await;
    let other = seed_user(&db, "other@example.com", UserRole::Owner).await;

    let owned = seed_property(&db, &owner, "Owned Hotel").await;
    let granted = seed_property(&db, &other, "Granted Hotel").await;
    let hidden = seed_property(&db, &other, "Hidden Hotel").await;

    // a grant on an owned property must not duplicate the row
    seed_grant(&db, &owner, &owned, AccessLevel::Admin).await;
    seed_grant(&db, &owner, &granted, AccessLevel::Viewer).await;

    seed_competitor(&db, &owned, "Rival A").await;
    seed_competitor(&db, &owned, "Rival B").await;
    seed_room_type(&db, &owned, "Double Room").await;

    let authz = AuthorizationService::new(db.clone());
    let visible = authz.list_visible_properties(&owner).await.unwrap();

    let mut names: Vec<&str> = visible.iter().map(|o| o.property.name.as_str()).collect();
    names.sort();
    assert_eq!(names, vec!["Granted Hotel", "Owned Hotel"]);
    assert!(!visible.iter().any(|o| o.property.id == hidden.id));

    let owned_overview = visible
        .iter()
        .find(|o| o.property.id == owned.id)
        .expect("owned property listed");
    assert_eq!(owned_overview.competitor_count, 2);
    assert_eq!(owned_overview.room_type_count, 1);
}

#[tokio::test]
async fn super_admin_sees_all_properties() {
    let db = setup_test_db().await;
    let owner = seed_user(&db, "owner@example.com", UserRole::Owner).await;
    let root = seed_user(&db, "root@example.com", UserRole::SuperAdmin).await;

    seed_property(&db, &owner, "Hotel One").await;
    seed_property(&db, &owner, "Hotel Two").await;

    let authz = AuthorizationService::new(db.clone());
    let visible = authz.list_visible_properties(&root).await.unwrap();
    assert_eq!(visible.len(), 2);
}
