//! Store settings route handlers.

use axum::{Json, extract::State, http::StatusCode};
use bude_peyek_core::Phone;
use tracing::instrument;

use crate::{
    error::AppError, middleware::auth::RequireAdminAuth, models::StoreSettings, state::AppState,
};

/// Current store settings.
#[instrument(skip_all)]
pub async fn show(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
) -> Json<StoreSettings> {
    Json(state.settings().get().await)
}

/// Replace the store settings.
///
/// A non-empty phone must normalize to a valid Indonesian number, since it
/// doubles as the WhatsApp fallback contact.
#[instrument(skip_all)]
pub async fn update(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    Json(settings): Json<StoreSettings>,
) -> Result<StatusCode, AppError> {
    if !settings.phone.trim().is_empty() {
        Phone::parse(&settings.phone)
            .map_err(|e| AppError::Validation(format!("store phone: {e}")))?;
    }

    state
        .settings()
        .update(settings)
        .await
        .map_err(|e| AppError::Internal(format!("could not persist settings: {e}")))?;
    Ok(StatusCode::NO_CONTENT)
}
