pub mod audit_logs;
pub mod competitor_configs;
pub mod competitors;
pub mod price_records;
pub mod properties;
pub mod property_access_grants;
pub mod room_types;
pub mod scrape_events;
pub mod users;
