//! Dataset and Query HTTP Routes
//!
//! Endpoints for dataset lifecycle and query execution. Registry calls run
//! on the blocking pool; ingestion and large scans are CPU-bound.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::Serialize;
use serde_json::Value;
use tokio::task;

use crate::catalog::DatasetKind;
use crate::executor::ResultRow;
use crate::facade::DatasetInfo;

use super::errors::RestError;
use super::server::AppState;

/// Success envelope: `{"result": ...}`
#[derive(Debug, Serialize)]
pub struct ResultBody<T> {
    pub result: T,
}

impl<T> ResultBody<T> {
    fn json(result: T) -> Json<Self> {
        Json(Self { result })
    }
}

/// Create dataset and query routes
pub fn dataset_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/dataset/:id/:kind", put(add_dataset))
        .route("/dataset/:id", delete(remove_dataset))
        .route("/datasets", get(list_datasets))
        .route("/query", post(perform_query))
        .with_state(state)
}

/// PUT /dataset/:id/:kind
async fn add_dataset(
    State(state): State<Arc<AppState>>,
    Path((id, kind)): Path<(String, String)>,
    body: Bytes,
) -> Result<Json<ResultBody<Vec<String>>>, RestError> {
    let kind: DatasetKind = kind.parse()?;
    let payload: Value = serde_json::from_slice(&body)?;

    let registry = Arc::clone(&state.registry);
    let ids = task::spawn_blocking(move || registry.add_dataset_json(&id, kind, &payload)).await??;

    Ok(ResultBody::json(ids))
}

/// DELETE /dataset/:id
async fn remove_dataset(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ResultBody<String>>, RestError> {
    let removed = state.registry.remove_dataset(&id)?;
    Ok(ResultBody::json(removed))
}

/// GET /datasets
async fn list_datasets(State(state): State<Arc<AppState>>) -> Json<ResultBody<Vec<DatasetInfo>>> {
    ResultBody::json(state.registry.list_datasets())
}

/// POST /query
async fn perform_query(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<ResultBody<Vec<ResultRow>>>, RestError> {
    let query: Value = serde_json::from_slice(&body)?;

    let registry = Arc::clone(&state.registry);
    let rows = task::spawn_blocking(move || registry.perform_query(&query)).await??;

    Ok(ResultBody::json(rows))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_body_serialization() {
        let body = ResultBody {
            result: vec!["courses".to_string(), "rooms".to_string()],
        };
        let json = serde_json::to_string(&body).unwrap();
        assert_eq!(json, r#"{"result":["courses","rooms"]}"#);
    }
}
