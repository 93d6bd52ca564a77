//! SCIM HTTP Routes
//!
//! User resource endpoints and the webhook ingestion path. Bodies are taken
//! as raw bytes so that empty and malformed payloads reach our own checks.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Json, Path, State},
    http::StatusCode,
    routing::{get, post},
    Router,
};

use super::errors::{parse_payload, ApiResult};
use super::service_routes::not_found_handler;
use crate::scim::mapper::{to_list_response, to_wire};
use crate::scim::{
    InMemoryUserStore, ScimListResponse, ScimUserResponse, UpdateMode, UserLifecycle, UserStore,
};

/// Shared SCIM state
pub struct ScimState {
    pub users: UserLifecycle<dyn UserStore>,
}

impl ScimState {
    /// State backed by a fresh in-memory store
    pub fn new() -> Self {
        Self::with_store(Arc::new(InMemoryUserStore::new()))
    }

    pub fn with_store(store: Arc<dyn UserStore>) -> Self {
        Self {
            users: UserLifecycle::new(store),
        }
    }
}

impl Default for ScimState {
    fn default() -> Self {
        Self::new()
    }
}

/// SCIM routes with shared state
pub fn scim_routes(state: Arc<ScimState>) -> Router {
    Router::new()
        .route("/Users", post(create_user_handler).get(list_users_handler))
        .route(
            "/Users/:id",
            get(get_user_handler)
                .put(update_user_handler)
                .delete(delete_user_handler),
        )
        .route("/webhook/users", post(webhook_user_handler))
        // Unsupported methods on known paths answer like unknown routes
        .method_not_allowed_fallback(not_found_handler)
        .with_state(state)
}

// ==================
// Handlers
// ==================

/// POST /Users
async fn create_user_handler(
    State(state): State<Arc<ScimState>>,
    body: Bytes,
) -> ApiResult<(StatusCode, Json<ScimUserResponse>)> {
    let payload = parse_payload(&body)?;
    let record = state.users.create(payload.as_ref())?;
    Ok((StatusCode::CREATED, Json(to_wire(&record))))
}

/// POST /webhook/users, same flow as create
async fn webhook_user_handler(
    state: State<Arc<ScimState>>,
    body: Bytes,
) -> ApiResult<(StatusCode, Json<ScimUserResponse>)> {
    create_user_handler(state, body).await
}

/// GET /Users
async fn list_users_handler(
    State(state): State<Arc<ScimState>>,
) -> ApiResult<Json<ScimListResponse>> {
    let records = state.users.list()?;
    Ok(Json(to_list_response(&records)))
}

/// GET /Users/:id
async fn get_user_handler(
    State(state): State<Arc<ScimState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<ScimUserResponse>> {
    let record = state.users.get(&id)?;
    Ok(Json(to_wire(&record)))
}

/// PUT /Users/:id
async fn update_user_handler(
    State(state): State<Arc<ScimState>>,
    Path(id): Path<String>,
    body: Bytes,
) -> ApiResult<Json<ScimUserResponse>> {
    let payload = parse_payload(&body)?;
    let record = state
        .users
        .update(&id, payload.as_ref(), UpdateMode::Validated)?;
    Ok(Json(to_wire(&record)))
}

/// DELETE /Users/:id
async fn delete_user_handler(
    State(state): State<Arc<ScimState>>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state.users.delete(&id)?;
    Ok(StatusCode::NO_CONTENT)
}
