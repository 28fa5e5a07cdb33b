pub mod thoughts;

pub use thoughts::{ApiResponse, CreateThoughtRequest, Endpoint, ThoughtResponse};
