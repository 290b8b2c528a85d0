use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use serde_json::Value;
use tracing::{instrument, warn};

use crate::{
    accounts::{
        dto::{RegisterResponse, REGISTERED_MESSAGE},
        services::Registrar,
    },
    error::RegisterError,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new().route("/auth/register", post(register))
}

// Extractor failures (bad JSON, wrong content type) are ValidationErrors too.
#[instrument(skip(registrar, payload))]
pub async fn register(
    State(registrar): State<Registrar>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<RegisterResponse>), RegisterError> {
    let Json(payload) = payload.map_err(|rejection| {
        warn!(reason = %rejection.body_text(), "unreadable registration body");
        RegisterError::Validation(rejection.body_text())
    })?;

    let registered = registrar.register(payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: REGISTERED_MESSAGE,
            data: registered.account,
            token: registered.token,
        }),
    ))
}
