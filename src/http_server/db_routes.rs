//! Table HTTP Routes
//!
//! Bearer-authenticated CRUD on the table bound to the presented key.
//!
//! - `GET    /api/db`       all rows, creating the table on first access
//! - `POST   /api/db`       insert the JSON body as a new row
//! - `DELETE /api/db?id=X`  delete row X
//! - `DELETE /api/db/{id}`  same, id in the path

use axum::{
    body::Bytes,
    extract::{Path, Query, Request, State},
    middleware::{self, Next},
    response::Response,
    routing::{delete, get},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::auth::{authenticate, TableBinding};
use crate::store::Row;

use super::errors::{ApiError, ApiResult, MessageResponse};
use super::state::AppState;

const UPSERT_OK: &str = "Data upserted successfully";
const DELETE_OK: &str = "Data deleted successfully";

/// Fetch-all response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchAllResponse {
    pub success: bool,
    pub results: Vec<Row>,
    pub meta: FetchMeta,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchMeta {
    pub rows_read: usize,
    /// Milliseconds spent in the select
    pub duration: f64,
    /// Table was created by this request
    pub table_created: bool,
}

#[derive(Debug, Deserialize)]
pub struct DeleteQuery {
    pub id: Option<String>,
}

/// Create table routes (nested under `/api`)
pub fn db_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/db", get(fetch_all_handler).post(upsert_handler).delete(delete_by_query_handler))
        .route("/db/:id", delete(delete_by_path_handler))
        .route_layer(middleware::from_fn_with_state(state, require_api_key))
}

/// Reject unauthenticated requests before any handler or database access,
/// and attach the key's table binding for the handler.
async fn require_api_key(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> ApiResult<Response> {
    let binding = authenticate(&state.registry, request.headers())?;
    request.extensions_mut().insert(binding);
    Ok(next.run(request).await)
}

async fn fetch_all_handler(
    State(state): State<AppState>,
    Extension(TableBinding(table)): Extension<TableBinding>,
) -> ApiResult<Json<FetchAllResponse>> {
    let fetched = state.store.fetch_all(&table).await?;

    tracing::debug!(table = %table, rows = fetched.rows.len(), created = fetched.created, "fetch all");

    Ok(Json(FetchAllResponse {
        success: true,
        meta: FetchMeta {
            rows_read: fetched.rows.len(),
            duration: fetched.duration.as_secs_f64() * 1000.0,
            table_created: fetched.created,
        },
        results: fetched.rows,
    }))
}

async fn upsert_handler(
    State(state): State<AppState>,
    Extension(TableBinding(table)): Extension<TableBinding>,
    body: Bytes,
) -> ApiResult<Json<MessageResponse>> {
    let payload: Value =
        serde_json::from_slice(&body).map_err(|e| ApiError::InvalidBody(e.to_string()))?;
    let data = payload_text(payload);

    let response = match state.store.upsert(&table, &data).await {
        Ok(id) => {
            tracing::debug!(table = %table, id, "row upserted");
            MessageResponse::ok(UPSERT_OK)
        }
        Err(e) => {
            tracing::warn!(table = %table, error = %e, "upsert failed");
            MessageResponse::failure(e.to_string())
        }
    };

    Ok(Json(response))
}

async fn delete_by_query_handler(
    State(state): State<AppState>,
    Extension(binding): Extension<TableBinding>,
    Query(query): Query<DeleteQuery>,
) -> ApiResult<Json<MessageResponse>> {
    let raw = query.id.ok_or(ApiError::MissingParam("id"))?;
    delete_row(&state, binding, &raw).await
}

async fn delete_by_path_handler(
    State(state): State<AppState>,
    Extension(binding): Extension<TableBinding>,
    Path(raw): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    delete_row(&state, binding, &raw).await
}

async fn delete_row(
    state: &AppState,
    TableBinding(table): TableBinding,
    raw_id: &str,
) -> ApiResult<Json<MessageResponse>> {
    let id = parse_row_id(raw_id)?;

    let response = match state.store.delete(&table, id).await {
        Ok(removed) => {
            tracing::debug!(table = %table, id, removed, "row deleted");
            MessageResponse::ok(DELETE_OK)
        }
        Err(e) => {
            tracing::warn!(table = %table, id, error = %e, "delete failed");
            MessageResponse::failure(e.to_string())
        }
    };

    Ok(Json(response))
}

fn parse_row_id(raw: &str) -> ApiResult<i64> {
    raw.trim().parse().map_err(|_| ApiError::InvalidParam {
        name: "id",
        value: raw.to_string(),
    })
}

/// Text stored in the `data` column for a JSON payload.
///
/// Strings are stored as-is; anything else as compact JSON.
fn payload_text(payload: Value) -> String {
    match payload {
        Value::String(s) => s,
        other => other.to_string(),
    }
}
