#![allow(dead_code)]

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, Set};

use pricewatch::database::entities::property_access_grants::AccessLevel;
use pricewatch::database::entities::users::UserRole;
use pricewatch::database::entities::{
    competitors, price_records, properties, property_access_grants, room_types, users,
};

static SEED_COUNTER: AtomicU64 = AtomicU64::new(0);

pub async fn seed_user(db: &DatabaseConnection, email: &str, role: UserRole) -> users::Model {
    let mut user = users::ActiveModel::new();
    user.email = Set(email.to_string());
    user.display_name = Set(email.split('@').next().unwrap_or(email).to_string());
    user.password_hash = Set("hash".to_string());
    user.role = Set(role.as_str().to_string());
    user.insert(db).await.expect("Failed to insert user")
}

pub async fn seed_property(
    db: &DatabaseConnection,
    owner: &users::Model,
    name: &str,
) -> properties::Model {
    let mut property = properties::ActiveModel::new();
    property.name = Set(name.to_string());
    property.owner_id = Set(owner.id);
    property.insert(db).await.expect("Failed to insert property")
}

pub async fn seed_room_type(
    db: &DatabaseConnection,
    property: &properties::Model,
    name: &str,
) -> room_types::Model {
    room_types::ActiveModel::new(property.id, name.to_string())
        .insert(db)
        .await
        .expect("Failed to insert room type")
}

pub async fn seed_competitor(
    db: &DatabaseConnection,
    property: &properties::Model,
    name: &str,
) -> competitors::Model {
    competitors::ActiveModel::new(
        property.id,
        name.to_string(),
        "https://competitor.example.com".to_string(),
    )
    .insert(db)
    .await
    .expect("Failed to insert competitor")
}

pub async fn seed_grant(
    db: &DatabaseConnection,
    user: &users::Model,
    property: &properties::Model,
    level: AccessLevel,
) -> property_access_grants::Model {
    property_access_grants::ActiveModel::new(user.id, property.id, level, None)
        .insert(db)
        .await
        .expect("Failed to insert access grant")
}

pub async fn seed_price(
    db: &DatabaseConnection,
    property_id: i32,
    competitor_id: i32,
    room_type_id: i32,
    target_date: &str,
    price: f64,
) -> price_records::Model {
    seed_price_fetched_at(
        db,
        property_id,
        competitor_id,
        room_type_id,
        target_date,
        price,
        Utc::now(),
    )
    .await
}

pub async fn seed_price_fetched_at(
    db: &DatabaseConnection,
    property_id: i32,
    competitor_id: i32,
    room_type_id: i32,
    target_date: &str,
    price: f64,
    fetched_at: DateTime<Utc>,
) -> price_records::Model {
    let record = price_records::ActiveModel {
        id: ActiveValue::NotSet,
        property_id: Set(property_id),
        competitor_id: Set(competitor_id),
        room_type_id: Set(room_type_id),
        target_date: Set(target_date.parse::<NaiveDate>().expect("bad date")),
        price: Set(price),
        currency: Set("EUR".to_string()),
        available: Set(true),
        fetched_at: Set(fetched_at),
        // distinct source per row keeps the dedup index out of the way
        source: Set(format!("seed-{}", SEED_COUNTER.fetch_add(1, Ordering::Relaxed))),
        metadata: ActiveValue::NotSet,
    };
    record.insert(db).await.expect("Failed to insert price record")
}
