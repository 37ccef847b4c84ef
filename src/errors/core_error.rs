use std::collections::BTreeMap;
use std::error::Error as StdError;

use thiserror::Error;

/// Broad category of a service failure. The server layer maps each kind to
/// one HTTP status, so services never reason about statuses directly.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CoreErrorKind {
    NotFound,
    Validation,
    Conflict,
    Forbidden,
    Unauthorized,
    Internal,
}

/// Unified service error: a kind, a human-readable message, optional
/// field-level detail, and an optional underlying cause.
#[derive(Debug, Error)]
#[error("{kind:?}: {message}")]
pub struct CoreError {
    kind: CoreErrorKind,
    message: String,
    fields: Option<BTreeMap<String, String>>,
    #[source]
    source: Option<Box<dyn StdError + Send + Sync>>,
}

impl CoreError {
    pub fn new(kind: CoreErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            fields: None,
            source: None,
        }
    }

    /// A resource the caller asked for does not exist. Also used when access
    /// to an existing resource is denied, so absence and denial are
    /// indistinguishable to the caller.
    pub fn not_found(entity: impl Into<String>, id: impl ToString) -> Self {
        let mut fields = BTreeMap::new();
        fields.insert("entity".to_string(), entity.into());
        fields.insert("id".to_string(), id.to_string());

        Self {
            kind: CoreErrorKind::NotFound,
            message: "Resource not found".to_string(),
            fields: Some(fields),
            source: None,
        }
    }

    /// An ingestion batch referenced an entity that does not exist (or does
    /// not belong to the stated property). Rejected wholesale as a bad
    /// request, never as a 404.
    pub fn reference_not_found(entity: impl Into<String>, id: impl ToString) -> Self {
        let entity = entity.into();
        let mut fields = BTreeMap::new();
        fields.insert("entity".to_string(), entity.clone());
        fields.insert("id".to_string(), id.to_string());

        Self {
            kind: CoreErrorKind::Validation,
            message: format!("Referenced {} not found", entity),
            fields: Some(fields),
            source: None,
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(CoreErrorKind::Validation, message)
    }

    /// Validation failure tied to a single input field.
    pub fn validation_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        let message = message.into();
        let mut fields = BTreeMap::new();
        fields.insert(field.into(), message.clone());

        Self {
            kind: CoreErrorKind::Validation,
            message,
            fields: Some(fields),
            source: None,
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(CoreErrorKind::Conflict, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(CoreErrorKind::Forbidden, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(CoreErrorKind::Unauthorized, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(CoreErrorKind::Internal, message)
    }

    pub fn with_fields(mut self, fields: BTreeMap<String, String>) -> Self {
        self.fields = Some(fields);
        self
    }

    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    pub fn kind(&self) -> CoreErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn fields(&self) -> Option<&BTreeMap<String, String>> {
        self.fields.as_ref()
    }
}

impl From<sea_orm::DbErr> for CoreError {
    fn from(err: sea_orm::DbErr) -> Self {
        CoreError::internal("Database error").with_source(err)
    }
}

impl From<anyhow::Error> for CoreError {
    fn from(err: anyhow::Error) -> Self {
        let mut core = CoreError::internal("Unhandled error");
        core.source = Some(err.into());
        core
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_carries_entity_fields() {
        let err = CoreError::not_found("property", 42);
        assert_eq!(err.kind(), CoreErrorKind::NotFound);
        let fields = err.fields().expect("fields");
        assert_eq!(fields.get("entity").unwrap(), "property");
        assert_eq!(fields.get("id").unwrap(), "42");
    }

    #[test]
    fn reference_not_found_is_a_validation_error() {
        let err = CoreError::reference_not_found("competitor", 7);
        assert_eq!(err.kind(), CoreErrorKind::Validation);
        assert_eq!(err.message(), "Referenced competitor not found");
    }

    #[test]
    fn db_errors_become_internal() {
        let err: CoreError = sea_orm::DbErr::Custom("boom".to_string()).into();
        assert_eq!(err.kind(), CoreErrorKind::Internal);
        assert!(std::error::Error::source(&err).is_some());
    }
}
