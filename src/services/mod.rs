pub mod audit_service;
pub mod auth_service;
pub mod authorization;
pub mod ingest_service;
pub mod price_analysis_service;
pub mod property_service;
pub mod validation;

pub use audit_service::AuditService;
pub use auth_service::AuthService;
pub use authorization::AuthorizationService;
pub use ingest_service::IngestService;
pub use price_analysis_service::PriceAnalysisService;
pub use property_service::PropertyService;
pub use validation::ValidationService;
