mod common;

use common::*;
use pricewatch::database::entities::users::UserRole;
use pricewatch::database::test_utils::setup_test_db;
use pricewatch::errors::CoreErrorKind;
use pricewatch::services::price_analysis_service::PriceQuery;
use pricewatch::services::PriceAnalysisService;

fn window(from: &str, to: &str) -> PriceQuery {
    PriceQuery {
        start_date: Some(from.parse().unwrap()),
        end_date: Some(to.parse().unwrap()),
        ..Default::default()
    }
}

#[tokio::test]
async fn two_competitors_seven_days_yield_symmetric_stats() {
    let db = setup_test_db().await;
    let owner = seed_user(&db, "owner@example.com", UserRole::Owner).await;
    let property = seed_property(&db, &owner, "Hotel Bella Vista").await;
    let room = seed_room_type(&db, &property, "Double Room").await;
    let rival_a = seed_competitor(&db, &property, "Rival A").await;
    let rival_b = seed_competitor(&db, &property, "Rival B").await;

    for day in 1..=7 {
        let date = format!("2024-06-{:02}", day);
        seed_price(&db, property.id, rival_a.id, room.id, &date, 100.0 + day as f64).await;
        seed_price(&db, property.id, rival_b.id, room.id, &date, 90.0 + day as f64).await;
    }

    let result = PriceAnalysisService::new(db.clone())
        .compute_comparison(property.id, &window("2024-06-01", "2024-06-07"))
        .await
        .unwrap();

    assert_eq!(result.stats.total_records, 14);
    assert_eq!(result.competitor_stats.len(), 2);
    for stat in &result.competitor_stats {
        assert_eq!(stat.total_records, 7);
    }
    assert_eq!(result.last_updates.len(), 2);
    assert_eq!(result.series.len(), 7);
}

#[tokio::test]
async fn empty_window_returns_zeroed_stats_not_an_error() {
    let db = setup_test_db().await;
    let owner = seed_user(&db, "owner@example.com", UserRole::Owner).await;
    let property = seed_property(&db, &owner, "Hotel Bella Vista").await;

    let result = PriceAnalysisService::new(db.clone())
        .compute_comparison(property.id, &window("2024-06-01", "2024-06-07"))
        .await
        .unwrap();

    assert_eq!(result.stats.total_records, 0);
    assert_eq!(result.stats.average_price, 0.0);
    assert_eq!(result.stats.min_price, 0.0);
    assert_eq!(result.stats.max_price, 0.0);
    assert!(result.competitor_stats.is_empty());
    assert!(result.prices.is_empty());
}

#[tokio::test]
async fn step_series_trend_is_plus_100_percent() {
    let db = setup_test_db().await;
    let owner = seed_user(&db, "owner@example.com", UserRole::Owner).await;
    let property = seed_property(&db, &owner, "Hotel Bella Vista").await;
    let room = seed_room_type(&db, &property, "Double Room").await;
    let rival = seed_competitor(&db, &property, "Rival A").await;

    for day in 1..=9 {
        let price = if day <= 6 { 100.0 } else { 200.0 };
        let date = format!("2024-06-{:02}", day);
        seed_price(&db, property.id, rival.id, room.id, &date, price).await;
    }

    let result = PriceAnalysisService::new(db.clone())
        .compute_comparison(property.id, &window("2024-06-01", "2024-06-09"))
        .await
        .unwrap();

    assert_eq!(result.competitor_stats.len(), 1);
    assert_eq!(result.competitor_stats[0].trend_pct, 100.0);
}

#[tokio::test]
async fn zero_priced_first_third_yields_flat_trend() {
    let db = setup_test_db().await;
    let owner = seed_user(&db, "owner@example.com", UserRole::Owner).await;
    let property = seed_property(&db, &owner, "Hotel Bella Vista").await;
    let room = seed_room_type(&db, &property, "Double Room").await;
    let rival = seed_competitor(&db, &property, "Rival A").await;

    for day in 1..=6 {
        let price = if day <= 2 { 0.0 } else { 150.0 };
        let date = format!("2024-06-{:02}", day);
        seed_price(&db, property.id, rival.id, room.id, &date, price).await;
    }

    let result = PriceAnalysisService::new(db.clone())
        .compute_comparison(property.id, &window("2024-06-01", "2024-06-06"))
        .await
        .unwrap();

    let trend = result.competitor_stats[0].trend_pct;
    assert!(trend.is_finite());
    assert_eq!(trend, 0.0);
}

#[tokio::test]
async fn same_day_records_average_into_one_series_point() {
    let db = setup_test_db().await;
    let owner = seed_user(&db, "owner@example.com", UserRole::Owner).await;
    let property = seed_property(&db, &owner, "Hotel Bella Vista").await;
    let single = seed_room_type(&db, &property, "Single Room").await;
    let double = seed_room_type(&db, &property, "Double Room").await;
    let rival = seed_competitor(&db, &property, "Rival A").await;

    // two room types priced on the same stay date collapse to one mean
    seed_price(&db, property.id, rival.id, single.id, "2024-06-01", 100.0).await;
    seed_price(&db, property.id, rival.id, double.id, "2024-06-01", 140.0).await;

    let result = PriceAnalysisService::new(db.clone())
        .compute_comparison(property.id, &window("2024-06-01", "2024-06-01"))
        .await
        .unwrap();

    assert_eq!(result.series.len(), 1);
    assert_eq!(result.series[0].prices["Rival A"], 120.0);
    assert_eq!(result.stats.total_records, 2);
}

#[tokio::test]
async fn room_type_and_competitor_filters_narrow_the_set() {
    let db = setup_test_db().await;
    let owner = seed_user(&db, "owner@example.com", UserRole::Owner).await;
    let property = seed_property(&db, &owner, "Hotel Bella Vista").await;
    let single = seed_room_type(&db, &property, "Single Room").await;
    let double = seed_room_type(&db, &property, "Double Room").await;
    let rival_a = seed_competitor(&db, &property, "Rival A").await;
    let rival_b = seed_competitor(&db, &property, "Rival B").await;

    seed_price(&db, property.id, rival_a.id, single.id, "2024-06-01", 80.0).await;
    seed_price(&db, property.id, rival_a.id, double.id, "2024-06-01", 120.0).await;
    seed_price(&db, property.id, rival_b.id, double.id, "2024-06-01", 130.0).await;

    let service = PriceAnalysisService::new(db.clone());

    let mut query = window("2024-06-01", "2024-06-01");
    query.room_type_id = Some(double.id);
    let result = service.compute_comparison(property.id, &query).await.unwrap();
    assert_eq!(result.stats.total_records, 2);

    let mut query = window("2024-06-01", "2024-06-01");
    query.competitor_ids = vec![rival_b.id];
    let result = service.compute_comparison(property.id, &query).await.unwrap();
    assert_eq!(result.stats.total_records, 1);
    assert_eq!(result.competitor_stats.len(), 1);
    assert_eq!(result.competitor_stats[0].competitor_name, "Rival B");
}

#[tokio::test]
async fn out_of_bounds_day_windows_are_rejected() {
    let db = setup_test_db().await;
    let owner = seed_user(&db, "owner@example.com", UserRole::Owner).await;
    let property = seed_property(&db, &owner, "Hotel Bella Vista").await;

    let service = PriceAnalysisService::new(db.clone());
    for days in [0i64, 91] {
        let query = PriceQuery {
            days: Some(days),
            ..Default::default()
        };
        let err = service
            .compute_comparison(property.id, &query)
            .await
            .expect_err("Expected validation failure");
        assert_eq!(err.kind(), CoreErrorKind::Validation);
    }
}

#[tokio::test]
async fn unknown_property_is_not_found() {
    let db = setup_test_db().await;

    let err = PriceAnalysisService::new(db.clone())
        .compute_comparison(4242, &PriceQuery::default())
        .await
        .expect_err("Expected missing property");
    assert_eq!(err.kind(), CoreErrorKind::NotFound);
}

#[tokio::test]
async fn records_outside_the_window_are_ignored() {
    let db = setup_test_db().await;
    let owner = seed_user(&db, "owner@example.com", UserRole::Owner).await;
    let property = seed_property(&db, &owner, "Hotel Bella Vista").await;
    let room = seed_room_type(&db, &property, "Double Room").await;
    let rival = seed_competitor(&db, &property, "Rival A").await;

    seed_price(&db, property.id, rival.id, room.id, "2024-05-31", 90.0).await;
    seed_price(&db, property.id, rival.id, room.id, "2024-06-01", 100.0).await;
    seed_price(&db, property.id, rival.id, room.id, "2024-06-08", 110.0).await;

    let result = PriceAnalysisService::new(db.clone())
        .compute_comparison(property.id, &window("2024-06-01", "2024-06-07"))
        .await
        .unwrap();

    assert_eq!(result.stats.total_records, 1);
    assert_eq!(result.stats.average_price, 100.0);
    assert_eq!(result.stats.min_price, 100.0);
    assert_eq!(result.stats.max_price, 100.0);
}
