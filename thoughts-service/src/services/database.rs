use super::store::{parse_thought_id, ThoughtStore};
use crate::models::{NewThought, Thought};
use async_trait::async_trait;
use futures::stream::TryStreamExt;
use mongodb::{
    bson::doc,
    options::{FindOneAndUpdateOptions, FindOptions, IndexOptions, ReturnDocument},
    Client as MongoClient, Collection, Database, IndexModel,
};
use service_core::error::AppError;

const THOUGHTS_COLLECTION: &str = "thoughts";

#[derive(Clone)]
pub struct MongoThoughtStore {
    client: MongoClient,
    db: Database,
}

impl MongoThoughtStore {
    /// Open a client for `uri`.
    ///
    /// The database named in the URI path wins; `fallback_database` is used
    /// only when the URI has none.
    pub async fn connect(uri: &str, fallback_database: &str) -> Result<Self, AppError> {
        tracing::info!(uri = %uri, "Connecting to MongoDB");
        let client = MongoClient::with_uri_str(uri).await.map_err(|e| {
            tracing::error!("Failed to connect to MongoDB at {}: {}", uri, e);
            AppError::from(e)
        })?;
        let db = client
            .default_database()
            .unwrap_or_else(|| client.database(fallback_database));
        tracing::info!(database = %db.name(), "Using MongoDB database");
        Ok(Self { client, db })
    }

    pub async fn initialize_indexes(&self) -> Result<(), AppError> {
        let created_at_index = IndexModel::builder()
            .keys(doc! { "createdAt": -1 })
            .options(
                IndexOptions::builder()
                    .name("created_at_desc".to_string())
                    .build(),
            )
            .build();

        self.thoughts()
            .create_index(created_at_index, None)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create createdAt index on thoughts: {}", e);
                AppError::from(e)
            })?;
        tracing::info!("Created index on thoughts.createdAt");

        Ok(())
    }

    pub fn thoughts(&self) -> Collection<Thought> {
        self.db.collection(THOUGHTS_COLLECTION)
    }
}

#[async_trait]
impl ThoughtStore for MongoThoughtStore {
    async fn insert(&self, thought: NewThought) -> Result<Thought, AppError> {
        let thought = Thought::new(thought);
        self.thoughts().insert_one(&thought, None).await?;
        Ok(thought)
    }

    async fn list_recent(&self, limit: usize) -> Result<Vec<Thought>, AppError> {
        let options = FindOptions::builder()
            .sort(doc! { "createdAt": -1, "_id": -1 })
            .limit(i64::try_from(limit).unwrap_or(i64::MAX))
            .build();

        let cursor = self.thoughts().find(None, options).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn increment_like(&self, id: &str) -> Result<Option<Thought>, AppError> {
        let id = parse_thought_id(id)?;
        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();

        let updated = self
            .thoughts()
            .find_one_and_update(doc! { "_id": id }, doc! { "$inc": { "likeCount": 1 } }, options)
            .await?;
        Ok(updated)
    }

    async fn health_check(&self) -> Result<(), AppError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|e| {
                tracing::error!("MongoDB health check failed: {}", e);
                AppError::from(e)
            })?;
        Ok(())
    }

    async fn shutdown(&self) {
        tracing::info!("Closing MongoDB client");
        self.client.clone().shutdown().await;
    }
}
