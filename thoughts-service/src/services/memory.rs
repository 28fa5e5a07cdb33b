use super::store::{parse_thought_id, ThoughtStore};
use crate::models::{NewThought, Thought};
use async_trait::async_trait;
use service_core::error::AppError;
use tokio::sync::RwLock;

/// Process-local store with the same ordering and id semantics as MongoDB.
#[derive(Default)]
pub struct InMemoryThoughtStore {
    thoughts: RwLock<Vec<Thought>>,
}

impl InMemoryThoughtStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.thoughts.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.thoughts.read().await.is_empty()
    }

    pub async fn get(&self, id: &str) -> Option<Thought> {
        let id = parse_thought_id(id).ok()?;
        self.thoughts
            .read()
            .await
            .iter()
            .find(|t| t.id == id)
            .cloned()
    }
}

#[async_trait]
impl ThoughtStore for InMemoryThoughtStore {
    async fn insert(&self, thought: NewThought) -> Result<Thought, AppError> {
        let thought = Thought::new(thought);
        self.thoughts.write().await.push(thought.clone());
        Ok(thought)
    }

    async fn list_recent(&self, limit: usize) -> Result<Vec<Thought>, AppError> {
        let mut recent = self.thoughts.read().await.clone();
        recent.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        recent.truncate(limit);
        Ok(recent)
    }

    async fn increment_like(&self, id: &str) -> Result<Option<Thought>, AppError> {
        let id = parse_thought_id(id)?;
        let mut thoughts = self.thoughts.write().await;
        Ok(thoughts.iter_mut().find(|t| t.id == id).map(|thought| {
            thought.like_count += 1;
            thought.clone()
        }))
    }

    async fn health_check(&self) -> Result<(), AppError> {
        Ok(())
    }

    async fn shutdown(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::oid::ObjectId;
    use std::sync::Arc;

    fn new_thought(message: &str) -> NewThought {
        NewThought::parse(Some(message)).unwrap()
    }

    #[tokio::test]
    async fn insert_assigns_defaults() {
        let store = InMemoryThoughtStore::new();
        let thought = store.insert(new_thought("Hello world")).await.unwrap();

        assert_eq!(thought.like_count, 0);
        assert_eq!(store.len().await, 1);
        assert_eq!(store.get(&thought.id.to_hex()).await, Some(thought));
    }

    #[tokio::test]
    async fn list_recent_is_newest_first_and_capped() {
        let store = InMemoryThoughtStore::new();
        for i in 0..25 {
            store
                .insert(new_thought(&format!("thought number {}", i)))
                .await
                .unwrap();
        }

        let recent = store.list_recent(20).await.unwrap();
        assert_eq!(recent.len(), 20);
        assert_eq!(recent[0].message, "thought number 24");
        assert_eq!(recent[19].message, "thought number 5");
        assert!(recent
            .windows(2)
            .all(|w| w[0].created_at >= w[1].created_at));
    }

    #[tokio::test]
    async fn list_recent_on_empty_store() {
        let store = InMemoryThoughtStore::new();
        assert!(store.list_recent(20).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn increment_like_counts_up() {
        let store = InMemoryThoughtStore::new();
        let thought = store.insert(new_thought("like me please")).await.unwrap();
        let id = thought.id.to_hex();

        store.increment_like(&id).await.unwrap();
        let updated = store.increment_like(&id).await.unwrap().unwrap();
        assert_eq!(updated.like_count, 2);
        assert_eq!(updated.created_at, thought.created_at);
        assert_eq!(updated.message, thought.message);
    }

    #[tokio::test]
    async fn increment_like_unknown_id_changes_nothing() {
        let store = InMemoryThoughtStore::new();
        let thought = store.insert(new_thought("lonely thought")).await.unwrap();

        let missing = store
            .increment_like(&ObjectId::new().to_hex())
            .await
            .unwrap();
        assert!(missing.is_none());
        assert_eq!(store.get(&thought.id.to_hex()).await.unwrap().like_count, 0);
    }

    #[tokio::test]
    async fn increment_like_malformed_id_is_error() {
        let store = InMemoryThoughtStore::new();
        let err = store.increment_like("12345").await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn concurrent_likes_are_not_lost() {
        let store = Arc::new(InMemoryThoughtStore::new());
        let thought = store.insert(new_thought("popular thought")).await.unwrap();
        let id = thought.id.to_hex();

        let handles: Vec<_> = (0..50)
            .map(|_| {
                let store = store.clone();
                let id = id.clone();
                tokio::spawn(async move { store.increment_like(&id).await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(store.get(&id).await.unwrap().like_count, 50);
    }
}
