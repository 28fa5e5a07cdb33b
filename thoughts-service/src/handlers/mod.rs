pub mod endpoints;
pub mod health;
pub mod thoughts;

pub use endpoints::list_endpoints;
pub use health::{health_check, metrics_endpoint, readiness_check};
pub use thoughts::{create_thought, like_thought, list_thoughts, RECENT_THOUGHTS_LIMIT};
