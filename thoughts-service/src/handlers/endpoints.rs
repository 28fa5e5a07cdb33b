use crate::dtos::Endpoint;
use crate::startup::AppState;
use axum::{extract::State, Json};

/// `GET /` — every route the router serves, in registration order.
pub async fn list_endpoints(State(state): State<AppState>) -> Json<Vec<Endpoint>> {
    Json(state.endpoints.as_ref().clone())
}
