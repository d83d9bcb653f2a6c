use std::sync::Arc;

use axum::extract::{Path, Query, Request, State};
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::get;
use axum::{Extension, Json, Router};
use serde::{Deserialize, Serialize};
use shelf_core::models::{NewScript, Script, ScriptListItem, ScriptPatch, SyncStatus};
use shelf_core::util::now_millis;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::auth::{extract_bearer_token, verify_api_key};
use crate::config::AppConfig;
use crate::error::AppError;
use crate::store::ScriptStore;

const DEVICE_ID_HEADER: &str = "x-device-id";

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<ScriptStore>,
}

/// Device identifier from the `X-Device-ID` header, recorded in the
/// audit log when present.
#[derive(Debug, Clone)]
pub struct DeviceId(pub Option<String>);

pub fn app_router(state: AppState) -> Router {
    let protected_routes = Router::new()
        .route("/scripts", get(list_scripts).post(create_script))
        .route(
            "/scripts/{name}",
            get(get_script).put(update_script).delete(delete_script),
        )
        .route("/sync/status", get(sync_status))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .route("/health", get(health))
        .merge(protected_routes)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_headers(Any)
                .allow_methods(Any),
        )
        .with_state(state)
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    timestamp: i64,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        timestamp: now_millis(),
    })
}

async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = extract_bearer_token(request.headers())?;
    verify_api_key(&state, token).await?;

    let device_id = request
        .headers()
        .get(DEVICE_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    request.extensions_mut().insert(DeviceId(device_id));
    Ok(next.run(request).await)
}

#[derive(Debug, Serialize)]
struct ScriptsResponse {
    scripts: Vec<ScriptListItem>,
}

#[derive(Debug, Serialize)]
struct ScriptResponse {
    script: Script,
}

#[derive(Debug, Serialize)]
struct DeleteResponse {
    success: bool,
}

#[derive(Debug, Deserialize)]
struct SyncStatusQuery {
    since: Option<i64>,
}

async fn list_scripts(State(state): State<AppState>) -> Result<Json<ScriptsResponse>, AppError> {
    let scripts = state.store.list().await?;
    Ok(Json(ScriptsResponse { scripts }))
}

async fn get_script(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<ScriptResponse>, AppError> {
    let script = state
        .store
        .get(&name)
        .await?
        .ok_or(AppError::NotFound(name))?;
    Ok(Json(ScriptResponse { script }))
}

async fn create_script(
    State(state): State<AppState>,
    Extension(device): Extension<DeviceId>,
    Json(new_script): Json<NewScript>,
) -> Result<(StatusCode, Json<ScriptResponse>), AppError> {
    let script = state.store.create(&new_script, device.0.as_deref()).await?;
    Ok((StatusCode::CREATED, Json(ScriptResponse { script })))
}

async fn update_script(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Extension(device): Extension<DeviceId>,
    Json(patch): Json<ScriptPatch>,
) -> Result<Json<ScriptResponse>, AppError> {
    if patch.is_empty() {
        return Err(AppError::bad_request("Update carries no fields"));
    }
    let script = state
        .store
        .update(&name, &patch, device.0.as_deref())
        .await?;
    Ok(Json(ScriptResponse { script }))
}

async fn delete_script(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Extension(device): Extension<DeviceId>,
) -> Result<Json<DeleteResponse>, AppError> {
    state.store.delete(&name, device.0.as_deref()).await?;
    Ok(Json(DeleteResponse { success: true }))
}

async fn sync_status(
    State(state): State<AppState>,
    Query(query): Query<SyncStatusQuery>,
) -> Result<Json<SyncStatus>, AppError> {
    Ok(Json(state.store.sync_status(query.since).await?))
}
