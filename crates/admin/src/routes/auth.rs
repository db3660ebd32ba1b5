//! Auth route handlers (hosted-auth session).

use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;
use serde_json::json;
use tower_sessions::Session;
use tracing::instrument;

use crate::{
    error::AppError,
    middleware::auth::RequireAdminAuth,
    models::{CurrentAdmin, session_keys},
    state::AppState,
};

/// Minimum password length enforced before calling the auth service.
const MIN_PASSWORD_LENGTH: usize = 6;

/// Sign-in form.
#[derive(Debug, Deserialize)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// Change-password form.
#[derive(Debug, Deserialize)]
pub struct ChangePasswordInput {
    pub old_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

/// Sign in against the hosted auth service and establish the cookie
/// session. On success both caches are loaded so the first page render
/// has data.
#[instrument(skip(state, session, input), fields(email = %input.email))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(input): Json<LoginInput>,
) -> Result<Json<serde_json::Value>, AppError> {
    if input.email.trim().is_empty() || input.password.is_empty() {
        return Err(AppError::Validation("email and password are required".into()));
    }

    let auth = state
        .supabase()
        .sign_in_with_password(input.email.trim(), &input.password)
        .await?;

    let admin = CurrentAdmin {
        user_id: auth.user.id,
        email: auth.user.email.unwrap_or_else(|| input.email.trim().to_string()),
    };
    session
        .insert(session_keys::CURRENT_ADMIN, &admin)
        .await
        .map_err(|e| AppError::Internal(format!("session store: {e}")))?;

    state.cache().refresh_all(state.supabase()).await?;

    Ok(Json(json!({ "email": admin.email })))
}

/// Report the signed-in operator, re-validating the hosted session.
///
/// A cookie session can outlive the hosted token (process restart in
/// between); this surfaces that as a 401 so the client signs in again.
#[instrument(skip_all)]
pub async fn session_info(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    let user = state.supabase().current_user().await?;
    Ok(Json(json!({ "user_id": user.id, "email": user.email })))
}

/// Sign out: clear the cookie session and the cached hosted-auth session.
#[instrument(skip_all)]
pub async fn logout(
    State(state): State<AppState>,
    session: Session,
) -> Result<StatusCode, AppError> {
    state.supabase().sign_out().await;
    session
        .flush()
        .await
        .map_err(|e| AppError::Internal(format!("session store: {e}")))?;
    Ok(StatusCode::NO_CONTENT)
}

/// Change the operator's password.
///
/// The old password is re-verified with a fresh sign-in before the update
/// is sent, so a stolen cookie alone cannot rotate the credential.
#[instrument(skip_all)]
pub async fn change_password(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Json(input): Json<ChangePasswordInput>,
) -> Result<StatusCode, AppError> {
    if input.new_password != input.confirm_password {
        return Err(AppError::Validation("password confirmation does not match".into()));
    }
    if input.new_password.len() < MIN_PASSWORD_LENGTH {
        return Err(AppError::Validation(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    state
        .supabase()
        .verify_password(&admin.email, &input.old_password)
        .await
        .map_err(|_| AppError::Validation("old password is incorrect".into()))?;

    state.supabase().update_password(&input.new_password).await?;
    Ok(StatusCode::NO_CONTENT)
}
