use crate::models::{NewThought, Thought};
use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use service_core::error::AppError;

/// Persistence for thoughts.
///
/// Implementations own their own concurrency control: `increment_like` must be
/// atomic so concurrent likes are never lost.
#[async_trait]
pub trait ThoughtStore: Send + Sync {
    /// Persist a validated thought with `likeCount = 0` and a fresh id.
    async fn insert(&self, thought: NewThought) -> Result<Thought, AppError>;

    /// Up to `limit` thoughts, newest `createdAt` first.
    async fn list_recent(&self, limit: usize) -> Result<Vec<Thought>, AppError>;

    /// Add one like and return the updated record, or `None` if no thought has
    /// this id. An id that is not a valid ObjectId is an error.
    async fn increment_like(&self, id: &str) -> Result<Option<Thought>, AppError>;

    async fn health_check(&self) -> Result<(), AppError>;

    /// Release backend resources. Called once after the server stops.
    async fn shutdown(&self);
}

pub fn parse_thought_id(id: &str) -> Result<ObjectId, AppError> {
    ObjectId::parse_str(id).map_err(|e| {
        AppError::BadRequest(anyhow::anyhow!(
            "Cast to ObjectId failed for value \"{}\": {}",
            id,
            e
        ))
    })
}
