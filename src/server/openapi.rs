use axum::Json;
use utoipa::OpenApi;

use crate::server::handlers;
use crate::services::auth_service::{SignupInput, UserResponse};
use crate::services::authorization::PropertyOverview;
use crate::services::ingest_service::{IngestSummary, PriceBatch, PricePoint};
use crate::services::price_analysis_service::{
    CompetitorFreshness, CompetitorStats, DailyPriceRow, DateRange, GlobalStats, PriceComparison,
    PriceRecordDto,
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "pricewatch",
        description = "Competitor price monitoring API for hospitality properties"
    ),
    paths(
        handlers::users::signup,
        handlers::properties::list_properties,
        handlers::properties::get_property,
        handlers::prices::get_price_comparison,
        handlers::prices::prune_price_history,
        handlers::webhook::ingest_prices,
    ),
    components(schemas(
        SignupInput,
        UserResponse,
        PropertyOverview,
        PriceComparison,
        PriceRecordDto,
        DailyPriceRow,
        GlobalStats,
        DateRange,
        CompetitorStats,
        CompetitorFreshness,
        PriceBatch,
        PricePoint,
        IngestSummary,
        handlers::prices::DeletedResponse,
        handlers::webhook::IngestResponse,
    ))
)]
pub struct ApiDoc;

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
