use std::collections::{BTreeMap, HashMap};

use chrono::{Duration, NaiveDate, Utc};
use chrono_tz::Tz;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use serde::Serialize;
use utoipa::ToSchema;

use crate::database::entities::{competitors, price_records, properties};
use crate::errors::{CoreError, CoreResult};

pub const DEFAULT_WINDOW_DAYS: i64 = 7;
pub const MAX_WINDOW_DAYS: i64 = 90;

/// Filters for a comparison query. Authorization happens upstream; this
/// engine only shapes and aggregates data.
#[derive(Debug, Clone, Default)]
pub struct PriceQuery {
    pub days: Option<i64>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub room_type_id: Option<i32>,
    pub competitor_ids: Vec<i32>,
}

#[derive(Debug, Clone, Copy, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub days: i64,
}

/// One raw price fact as served to the dashboard.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PriceRecordDto {
    pub id: i32,
    pub target_date: NaiveDate,
    pub price: f64,
    pub currency: String,
    pub available: bool,
    pub fetched_at: chrono::DateTime<Utc>,
    pub competitor_id: i32,
    pub competitor_name: String,
    pub room_type_id: i32,
    pub source: String,
    #[schema(value_type = Object)]
    pub metadata: Option<serde_json::Value>,
}

/// One chart row: a stay date plus one averaged price per competitor name.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DailyPriceRow {
    pub date: NaiveDate,
    #[serde(flatten)]
    #[schema(value_type = Object)]
    pub prices: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GlobalStats {
    pub total_records: u64,
    pub average_price: f64,
    pub min_price: f64,
    pub max_price: f64,
    pub date_range: DateRange,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompetitorStats {
    pub competitor_id: i32,
    pub competitor_name: String,
    pub total_records: u64,
    pub average_price: f64,
    pub min_price: f64,
    pub max_price: f64,
    /// Percent change between the earliest and latest thirds of the series
    pub trend_pct: f64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompetitorFreshness {
    pub competitor_id: i32,
    pub competitor_name: String,
    pub last_fetch: chrono::DateTime<Utc>,
}

/// Full comparison result for one property and date window.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PriceComparison {
    pub prices: Vec<PriceRecordDto>,
    pub series: Vec<DailyPriceRow>,
    pub stats: GlobalStats,
    pub competitor_stats: Vec<CompetitorStats>,
    pub last_updates: Vec<CompetitorFreshness>,
}

/// Read-only aggregation over the price-record store: global and
/// per-competitor statistics, trend, freshness, and the chart-ready series.
#[derive(Clone)]
pub struct PriceAnalysisService {
    db: DatabaseConnection,
}

impl PriceAnalysisService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn compute_comparison(
        &self,
        property_id: i32,
        query: &PriceQuery,
    ) -> CoreResult<PriceComparison> {
        let property = properties::Entity::find_by_id(property_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| CoreError::not_found("property", property_id))?;

        let range = resolve_window(&property.timezone, query)?;

        let mut select = price_records::Entity::find()
            .filter(price_records::Column::PropertyId.eq(property_id))
            .filter(price_records::Column::TargetDate.gte(range.from))
            .filter(price_records::Column::TargetDate.lte(range.to));

        if let Some(room_type_id) = query.room_type_id {
            select = select.filter(price_records::Column::RoomTypeId.eq(room_type_id));
        }
        if !query.competitor_ids.is_empty() {
            select = select
                .filter(price_records::Column::CompetitorId.is_in(query.competitor_ids.clone()));
        }

        let records = select
            .order_by_asc(price_records::Column::TargetDate)
            .order_by_asc(price_records::Column::FetchedAt)
            .all(&self.db)
            .await?;

        let competitor_names: HashMap<i32, String> = competitors::Entity::find()
            .filter(competitors::Column::PropertyId.eq(property_id))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|c| (c.id, c.name))
            .collect();

        Ok(assemble(records, &competitor_names, range))
    }
}

/// Resolve the aggregation window: an explicit date pair, or the last N days
/// ending today in the property's configured timezone.
fn resolve_window(timezone: &str, query: &PriceQuery) -> CoreResult<DateRange> {
    match (query.start_date, query.end_date) {
        (Some(from), Some(to)) => {
            if from > to {
                return Err(CoreError::validation_field(
                    "startDate",
                    "startDate must not be after endDate",
                ));
            }
            Ok(DateRange {
                from,
                to,
                days: (to - from).num_days(),
            })
        }
        (None, None) => {
            let days = query.days.unwrap_or(DEFAULT_WINDOW_DAYS);
            if !(1..=MAX_WINDOW_DAYS).contains(&days) {
                return Err(CoreError::validation_field(
                    "days",
                    format!("days must be between 1 and {}", MAX_WINDOW_DAYS),
                ));
            }

            let tz: Tz = timezone.parse().unwrap_or(chrono_tz::UTC);
            let today = Utc::now().with_timezone(&tz).date_naive();
            Ok(DateRange {
                from: today - Duration::days(days),
                to: today,
                days,
            })
        }
        _ => Err(CoreError::validation(
            "startDate and endDate must be provided together",
        )),
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Percent change between the first and last third of a date-ordered price
/// series, thirds taken by ceiling division. A zero first-third average
/// yields 0 rather than a division by zero.
fn trend_pct(prices_by_date: &[f64]) -> f64 {
    if prices_by_date.is_empty() {
        return 0.0;
    }

    let chunk = prices_by_date.len().div_ceil(3);
    let first_avg = mean(&prices_by_date[..chunk]);
    let last_avg = mean(&prices_by_date[prices_by_date.len() - chunk..]);

    if first_avg == 0.0 {
        return 0.0;
    }

    round1((last_avg - first_avg) / first_avg * 100.0)
}

fn assemble(
    records: Vec<price_records::Model>,
    competitor_names: &HashMap<i32, String>,
    range: DateRange,
) -> PriceComparison {
    let name_of = |competitor_id: i32| -> String {
        competitor_names
            .get(&competitor_id)
            .cloned()
            .unwrap_or_else(|| format!("competitor-{}", competitor_id))
    };

    // Global statistics over the full filtered set
    let all_prices: Vec<f64> = records.iter().map(|r| r.price).collect();
    let stats = GlobalStats {
        total_records: records.len() as u64,
        average_price: mean(&all_prices),
        min_price: all_prices.iter().copied().fold(f64::INFINITY, f64::min),
        max_price: all_prices.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        date_range: range,
    };
    let stats = if records.is_empty() {
        GlobalStats {
            min_price: 0.0,
            max_price: 0.0,
            ..stats
        }
    } else {
        stats
    };

    // Per-competitor statistics; records arrive ordered by target_date, so
    // the per-competitor series stay date-ordered for the trend
    let mut by_competitor: BTreeMap<i32, Vec<&price_records::Model>> = BTreeMap::new();
    for record in &records {
        by_competitor.entry(record.competitor_id).or_default().push(record);
    }

    let mut competitor_stats: Vec<CompetitorStats> = by_competitor
        .iter()
        .map(|(&competitor_id, rows)| {
            let prices: Vec<f64> = rows.iter().map(|r| r.price).collect();
            CompetitorStats {
                competitor_id,
                competitor_name: name_of(competitor_id),
                total_records: rows.len() as u64,
                average_price: round2(mean(&prices)),
                min_price: prices.iter().copied().fold(f64::INFINITY, f64::min),
                max_price: prices.iter().copied().fold(f64::NEG_INFINITY, f64::max),
                trend_pct: trend_pct(&prices),
            }
        })
        .collect();
    competitor_stats.sort_by(|a, b| a.competitor_name.cmp(&b.competitor_name));

    // Freshness: newest fetched_at per competitor, latest first
    let mut last_updates: Vec<CompetitorFreshness> = by_competitor
        .iter()
        .map(|(&competitor_id, rows)| CompetitorFreshness {
            competitor_id,
            competitor_name: name_of(competitor_id),
            last_fetch: rows.iter().map(|r| r.fetched_at).max().unwrap(),
        })
        .collect();
    last_updates.sort_by(|a, b| b.last_fetch.cmp(&a.last_fetch));

    // Chart series: per stay date, same-competitor records collapse to a mean
    let mut per_day: BTreeMap<NaiveDate, BTreeMap<String, Vec<f64>>> = BTreeMap::new();
    for record in &records {
        per_day
            .entry(record.target_date)
            .or_default()
            .entry(name_of(record.competitor_id))
            .or_default()
            .push(record.price);
    }
    let series: Vec<DailyPriceRow> = per_day
        .into_iter()
        .map(|(date, by_name)| DailyPriceRow {
            date,
            prices: by_name
                .into_iter()
                .map(|(name, prices)| (name, round2(mean(&prices))))
                .collect(),
        })
        .collect();

    let prices: Vec<PriceRecordDto> = records
        .into_iter()
        .map(|r| PriceRecordDto {
            id: r.id,
            target_date: r.target_date,
            price: r.price,
            currency: r.currency,
            available: r.available,
            fetched_at: r.fetched_at,
            competitor_name: name_of(r.competitor_id),
            competitor_id: r.competitor_id,
            room_type_id: r.room_type_id,
            source: r.source,
            metadata: r.metadata,
        })
        .collect();

    PriceComparison {
        prices,
        series,
        stats,
        competitor_stats,
        last_updates,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(
        competitor_id: i32,
        target_date: &str,
        price: f64,
    ) -> price_records::Model {
        price_records::Model {
            id: 0,
            property_id: 1,
            competitor_id,
            room_type_id: 1,
            target_date: target_date.parse().unwrap(),
            price,
            currency: "EUR".to_string(),
            available: true,
            fetched_at: Utc::now(),
            source: "webhook".to_string(),
            metadata: None,
        }
    }

    #[test]
    fn trend_of_step_series_is_plus_100() {
        // six days at 100 followed by three days at 200
        let prices = [100.0, 100.0, 100.0, 100.0, 100.0, 100.0, 200.0, 200.0, 200.0];
        assert_eq!(trend_pct(&prices), 100.0);
    }

    #[test]
    fn trend_guards_zero_first_third() {
        let prices = [0.0, 0.0, 0.0, 150.0, 150.0, 150.0, 150.0, 150.0, 150.0];
        assert_eq!(trend_pct(&prices), 0.0);
    }

    #[test]
    fn trend_thirds_use_ceiling_division() {
        // four points: thirds of size 2, overlapping in the middle
        let prices = [100.0, 100.0, 200.0, 200.0];
        // first third avg 100, last third avg 200
        assert_eq!(trend_pct(&prices), 100.0);
    }

    #[test]
    fn trend_of_single_point_is_flat() {
        assert_eq!(trend_pct(&[120.0]), 0.0);
        assert_eq!(trend_pct(&[]), 0.0);
    }

    #[test]
    fn empty_result_set_yields_zeroed_stats() {
        let range = DateRange {
            from: "2024-06-01".parse().unwrap(),
            to: "2024-06-07".parse().unwrap(),
            days: 6,
        };
        let result = assemble(vec![], &HashMap::new(), range);

        assert_eq!(result.stats.total_records, 0);
        assert_eq!(result.stats.average_price, 0.0);
        assert_eq!(result.stats.min_price, 0.0);
        assert_eq!(result.stats.max_price, 0.0);
        assert!(result.competitor_stats.is_empty());
        assert!(result.last_updates.is_empty());
        assert!(result.series.is_empty());
    }

    #[test]
    fn same_day_records_collapse_to_a_mean_per_competitor() {
        let mut names = HashMap::new();
        names.insert(1, "Hotel Rivale".to_string());

        let range = DateRange {
            from: "2024-06-01".parse().unwrap(),
            to: "2024-06-02".parse().unwrap(),
            days: 1,
        };
        let result = assemble(
            vec![
                record(1, "2024-06-01", 100.0),
                record(1, "2024-06-01", 120.0),
                record(1, "2024-06-02", 130.0),
            ],
            &names,
            range,
        );

        assert_eq!(result.series.len(), 2);
        assert_eq!(result.series[0].prices["Hotel Rivale"], 110.0);
        assert_eq!(result.series[1].prices["Hotel Rivale"], 130.0);
    }

    #[test]
    fn explicit_range_must_be_ordered() {
        let query = PriceQuery {
            start_date: Some("2024-06-10".parse().unwrap()),
            end_date: Some("2024-06-01".parse().unwrap()),
            ..Default::default()
        };
        assert!(resolve_window("UTC", &query).is_err());
    }

    #[test]
    fn days_window_is_bounded() {
        for days in [0, -3, 91] {
            let query = PriceQuery {
                days: Some(days),
                ..Default::default()
            };
            assert!(resolve_window("UTC", &query).is_err(), "days={days}");
        }

        let query = PriceQuery {
            days: Some(90),
            ..Default::default()
        };
        assert!(resolve_window("Europe/Rome", &query).is_ok());
    }

    #[test]
    fn lone_boundary_date_is_rejected() {
        let query = PriceQuery {
            start_date: Some("2024-06-01".parse().unwrap()),
            ..Default::default()
        };
        assert!(resolve_window("UTC", &query).is_err());
    }
}
