//! `POST /api/:controller/:handler`.

use axum::{
    body::Bytes,
    extract::{Path, State},
    Json,
};
use serde_json::Value;

use crate::app_state::AppState;
use crate::error::ApiResult;

pub async fn dispatch(
    State(state): State<AppState>,
    Path((controller, handler)): Path<(String, String)>,
    body: Bytes,
) -> ApiResult<Json<Value>> {
    let out = state
        .dispatcher()
        .dispatch_raw(&controller, &handler, &body)
        .await?;
    Ok(Json(out))
}
