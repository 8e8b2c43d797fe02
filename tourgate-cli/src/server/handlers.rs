//! Request handlers for `/api/*`.

use std::sync::Arc;
use std::time::Instant;

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use serde_json::{Value, json};
use tourgate_core::{OptimizationResult, OptimizePayload};

use super::AppState;
use super::error::ApiError;

pub(super) async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Decode the body, then run the blocking pipeline off the async workers.
pub(super) async fn optimize(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<OptimizationResult>, ApiError> {
    let payload: OptimizePayload = serde_json::from_slice(&body).map_err(|err| {
        log::debug!("rejected request body: {err}");
        ApiError::from_json(&err)
    })?;

    let started_at = Instant::now();
    let optimizer = Arc::clone(&state.optimizer);
    let outcome = tokio::task::spawn_blocking(move || optimizer.optimize(&payload))
        .await
        .map_err(|err| {
            log::error!("optimisation worker failed: {err}");
            ApiError::internal()
        })?;

    match outcome {
        Ok(result) => {
            log::debug!(
                "answered optimisation of {} locations in {:?}",
                result.route.len(),
                started_at.elapsed()
            );
            Ok(Json(result))
        }
        Err(err) => {
            log::info!("optimisation rejected: {err}");
            Err(ApiError::from(err))
        }
    }
}
