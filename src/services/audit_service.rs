use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};

use crate::database::entities::audit_logs;

/// Append-only audit trail writer.
///
/// Appends are best-effort: a failed audit write is logged and swallowed so
/// it can never roll back the mutation it describes.
#[derive(Clone)]
pub struct AuditService {
    db: DatabaseConnection,
}

impl AuditService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn log(
        &self,
        user_id: i32,
        action: &str,
        target_type: &str,
        target_id: impl ToString,
        metadata: Option<serde_json::Value>,
    ) {
        let mut entry = audit_logs::ActiveModel::new(
            user_id,
            action.to_string(),
            target_type.to_string(),
            target_id.to_string(),
        );
        if metadata.is_some() {
            entry.metadata = Set(metadata);
        }

        if let Err(err) = entry.insert(&self.db).await {
            tracing::warn!(action, error = %err, "failed to append audit log entry");
        }
    }
}
