pub mod database;
pub mod memory;
pub mod store;

pub use database::MongoThoughtStore;
pub use memory::InMemoryThoughtStore;
pub use store::{parse_thought_id, ThoughtStore};
