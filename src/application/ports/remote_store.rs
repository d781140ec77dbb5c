use crate::domain::entities::offline::{Record, RecordFilter};
use crate::domain::value_objects::offline::{EntityType, RecordId, RecordPayload};
use crate::shared::error::AppError;
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RemoteStoreError {
    /// Network or backend failure. The only error that diverts a call to the local queue.
    #[error("Remote store unavailable: {0}")]
    Unavailable(String),

    #[error("Remote store rejected payload: {0}")]
    ValidationFailed(String),

    #[error("Record not found: {0}")]
    NotFound(String),
}

impl RemoteStoreError {
    pub fn is_offline_fallback(&self) -> bool {
        matches!(self, RemoteStoreError::Unavailable(_))
    }
}

impl From<RemoteStoreError> for AppError {
    fn from(err: RemoteStoreError) -> Self {
        match err {
            RemoteStoreError::Unavailable(msg) => AppError::Unavailable(msg),
            RemoteStoreError::ValidationFailed(msg) => AppError::ValidationError(msg),
            RemoteStoreError::NotFound(msg) => AppError::NotFound(msg),
        }
    }
}

/// Network-backed store holding the durable copy of every record.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    async fn create(
        &self,
        entity_type: EntityType,
        payload: &RecordPayload,
    ) -> Result<Record, RemoteStoreError>;
    async fn update(
        &self,
        entity_type: EntityType,
        id: &RecordId,
        diff: &RecordPayload,
    ) -> Result<(), RemoteStoreError>;
    async fn delete(&self, entity_type: EntityType, id: &RecordId)
    -> Result<(), RemoteStoreError>;
    async fn query(
        &self,
        entity_type: EntityType,
        filter: &RecordFilter,
    ) -> Result<Vec<Record>, RemoteStoreError>;
}
