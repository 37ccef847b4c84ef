//! Error types shared by the pricewatch services and server layers.
//!
//! Every service returns [`CoreResult`], carrying a [`CoreError`] whose
//! [`CoreErrorKind`] maps one-to-one onto an HTTP status in the server layer.

mod core_error;

pub use core_error::{CoreError, CoreErrorKind};

/// Result type alias used throughout the service layer
pub type CoreResult<T> = Result<T, CoreError>;
