use axum::{extract::Extension, http::StatusCode, Json};
use std::sync::Arc;
use tracing::error;
use userext_core::{protocol::http::{RegisterRequest, RegisterResponse}, Error};

use crate::accounts::{create_account, RegisterError};
use crate::AppState;

/// Handler per POST /api/register
pub async fn register(
    Extension(state): Extension<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), (StatusCode, Json<Error>)> {
    match create_account(&state, &req.username, &req.password).await {
        Ok(user) => Ok((StatusCode::CREATED, Json(RegisterResponse { user }))),
        Err(e) => Err(error_response(e)),
    }
}

/// Mappa l'errore di registrazione nello status HTTP e nel corpo d'errore condiviso.
fn error_response(e: RegisterError) -> (StatusCode, Json<Error>) {
    let (status, code) = match &e {
        RegisterError::Invalid(_) => (StatusCode::BAD_REQUEST, "invalid_request"),
        RegisterError::UsernameTaken => (StatusCode::CONFLICT, "username_taken"),
        RegisterError::Store(_) | RegisterError::Hook(_) => {
            error!("register failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "internal_error")
        }
    };
    (status, Json(Error::new(code, e.to_string())))
}
