use axum::{extract::State, Json};
use serde_json::Value;
use service_core::error::AppError;

use crate::dtos::{BfhlResponse, OperationCodeResponse};
use crate::middleware::BfhlPayload;
use crate::services::{classify_items, is_base64, FileVerdict};
use crate::startup::AppState;

pub async fn operation_code() -> Json<OperationCodeResponse> {
    Json(OperationCodeResponse { operation_code: 1 })
}

pub async fn classify(
    State(state): State<AppState>,
    BfhlPayload(req): BfhlPayload,
) -> Result<Json<BfhlResponse>, AppError> {
    let items = match &req.data {
        Some(Value::Array(items)) => items,
        other => {
            tracing::info!(
                data_present = other.is_some(),
                "Rejecting request without a data list"
            );
            return Err(AppError::InvalidInput);
        }
    };

    let classification = classify_items(items);

    let file = req
        .file_b64()
        .filter(|encoded| is_base64(encoded))
        .map(|encoded| {
            let verdict = FileVerdict::evaluate(encoded);
            tracing::debug!(valid = verdict.is_valid(), "Evaluated attached file");
            verdict
        });

    tracing::info!(
        items = items.len(),
        numbers = classification.numbers.len(),
        alphabets = classification.alphabets.len(),
        is_prime_found = classification.is_prime_found,
        file_attached = file.is_some(),
        "Classified bfhl payload"
    );

    Ok(Json(BfhlResponse::new(
        &state.identity,
        classification,
        file,
    )))
}
