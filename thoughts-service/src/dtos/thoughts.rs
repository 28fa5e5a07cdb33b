use crate::models::Thought;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Deserialize)]
pub struct CreateThoughtRequest {
    #[serde(default, deserialize_with = "scalar_as_text")]
    pub message: Option<String>,
}

/// Accept a string, number or boolean and keep its text form. Objects and
/// arrays are rejected.
fn scalar_as_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Scalar {
        Text(String),
        Number(serde_json::Number),
        Flag(bool),
    }

    Ok(Option::<Scalar>::deserialize(deserializer)?.map(|scalar| match scalar {
        Scalar::Text(text) => text,
        Scalar::Number(number) => number.to_string(),
        Scalar::Flag(flag) => flag.to_string(),
    }))
}

/// Client-facing view of a [`Thought`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThoughtResponse {
    pub id: String,
    pub message: String,
    pub like_count: i64,
    pub created_at: DateTime<Utc>,
}

impl From<Thought> for ThoughtResponse {
    fn from(thought: Thought) -> Self {
        Self {
            id: thought.id.to_hex(),
            message: thought.message,
            like_count: thought.like_count,
            created_at: thought.created_at,
        }
    }
}

/// `{ "response": ..., "success": ... }` envelope used by the write endpoints.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub response: T,
    pub success: bool,
}

impl<T> ApiResponse<T> {
    pub fn ok(response: T) -> Self {
        Self {
            response,
            success: true,
        }
    }

    pub fn failed(response: T) -> Self {
        Self {
            response,
            success: false,
        }
    }
}

/// One registered route, as listed by `GET /`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    pub path: String,
    pub methods: Vec<String>,
}
