//! Runs against a real MongoDB at `MONGO_URL` (default `mongodb://localhost:27017`).
//!
//! `cargo test -- --ignored` to include these.

use mongodb::bson::oid::ObjectId;
use std::sync::Arc;
use thoughts_service::models::NewThought;
use thoughts_service::services::{MongoThoughtStore, ThoughtStore};

async fn store() -> MongoThoughtStore {
    let uri = std::env::var("MONGO_URL").unwrap_or_else(|_| "mongodb://localhost:27017".into());
    let db_name = format!("thoughts_test_{}", ObjectId::new().to_hex());
    // A fallback name only applies when the URI has no path database.
    let store = MongoThoughtStore::connect(&uri, &db_name)
        .await
        .expect("Failed to connect to MongoDB");
    store
        .initialize_indexes()
        .await
        .expect("Failed to create indexes");
    store
}

async fn cleanup(store: &MongoThoughtStore) {
    let _ = store.thoughts().drop(None).await;
}

fn new_thought(message: &str) -> NewThought {
    NewThought::parse(Some(message)).unwrap()
}

#[tokio::test]
#[ignore = "Requires MongoDB"]
async fn insert_list_and_like_round_trip() {
    let store = store().await;
    cleanup(&store).await;

    let first = store.insert(new_thought("first mongo thought")).await.unwrap();
    let second = store.insert(new_thought("second mongo thought")).await.unwrap();

    let recent = store.list_recent(20).await.unwrap();
    assert_eq!(recent, vec![second.clone(), first.clone()]);

    let liked = store
        .increment_like(&first.id.to_hex())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(liked.like_count, 1);
    assert_eq!(liked.created_at, first.created_at);

    cleanup(&store).await;
}

#[tokio::test]
#[ignore = "Requires MongoDB"]
async fn like_missing_and_malformed_ids() {
    let store = store().await;

    assert!(store
        .increment_like(&ObjectId::new().to_hex())
        .await
        .unwrap()
        .is_none());
    assert!(store.increment_like("bogus").await.is_err());

    cleanup(&store).await;
}

#[tokio::test]
#[ignore = "Requires MongoDB"]
async fn concurrent_likes_are_atomic() {
    let store = store().await;
    cleanup(&store).await;
    let store = Arc::new(store);

    let thought = store.insert(new_thought("hammered by likes")).await.unwrap();
    let id = thought.id.to_hex();

    let handles: Vec<_> = (0..20)
        .map(|_| {
            let store = store.clone();
            let id = id.clone();
            tokio::spawn(async move { store.increment_like(&id).await })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let recent = store.list_recent(1).await.unwrap();
    assert_eq!(recent[0].like_count, 20);

    cleanup(&store).await;
}
