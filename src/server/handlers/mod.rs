pub mod competitors;
pub mod health;
pub mod prices;
pub mod properties;
pub mod room_types;
pub mod users;
pub mod webhook;
