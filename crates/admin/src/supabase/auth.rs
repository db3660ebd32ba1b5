//! Hosted auth (GoTrue) operations.
//!
//! The panel uses exactly one auth strategy: a hosted-auth session obtained
//! with email + password. The access token is cached on the client and
//! rides along on table and storage calls.

use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::instrument;

use super::{RemoteError, SupabaseClient};

/// A hosted-auth session as returned by the token endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSession {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    pub user: AuthUser,
}

/// The authenticated user attached to a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

impl SupabaseClient {
    /// Sign in with email and password, caching the session on success.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError::Unauthorized`] on bad credentials, or another
    /// [`RemoteError`] on transport/decoding failure.
    #[instrument(skip(self, password))]
    pub async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthSession, RemoteError> {
        let session = self.password_grant(email, password).await?;
        self.set_session(session.clone()).await;
        tracing::info!(email, "operator signed in");
        Ok(session)
    }

    /// Check a password against the auth service without touching the
    /// cached session. Used to re-verify the old password before changing
    /// it.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError::Unauthorized`] when the password is wrong.
    #[instrument(skip(self, password))]
    pub async fn verify_password(&self, email: &str, password: &str) -> Result<(), RemoteError> {
        self.password_grant(email, password).await.map(|_| ())
    }

    /// Fetch the user behind the cached session.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError::NoSession`] when not signed in.
    #[instrument(skip(self))]
    pub async fn current_user(&self) -> Result<AuthUser, RemoteError> {
        let url = self.endpoint(&["auth", "v1", "user"]);
        let request = self.inner.http.get(url);

        let response = self.session_authed(request).await?.send().await?;
        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Change the signed-in operator's password.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError::NoSession`] when not signed in, or the
    /// backend's rejection (e.g., password too weak).
    #[instrument(skip(self, new_password))]
    pub async fn update_password(&self, new_password: &str) -> Result<(), RemoteError> {
        let url = self.endpoint(&["auth", "v1", "user"]);
        let request = self
            .inner
            .http
            .put(url)
            .json(&json!({ "password": new_password }));

        let response = self.session_authed(request).await?.send().await?;
        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        tracing::info!("operator password updated");
        Ok(())
    }

    /// Sign out and drop the cached session.
    ///
    /// The remote logout is best-effort: the local session is cleared even
    /// when the revocation call fails, so a flaky network cannot wedge the
    /// operator in a signed-in state.
    #[instrument(skip(self))]
    pub async fn sign_out(&self) {
        if let Ok(request) = self
            .session_authed(self.inner.http.post(self.endpoint(&["auth", "v1", "logout"])))
            .await
        {
            if let Err(e) = request.send().await {
                tracing::warn!(error = %e, "remote sign-out failed; clearing local session anyway");
            }
        }
        self.clear_session().await;
    }

    /// POST the password grant and decode the session.
    async fn password_grant(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthSession, RemoteError> {
        let mut url = self.endpoint(&["auth", "v1", "token"]);
        url.query_pairs_mut().append_pair("grant_type", "password");

        let request = self
            .inner
            .http
            .post(url)
            .header("apikey", self.api_key())
            .json(&json!({ "email": email, "password": password }));

        let response = request.send().await?;
        if !response.status().is_success() {
            // GoTrue answers an invalid grant with 400, not 401.
            return Err(match Self::error_from_response(response).await {
                RemoteError::Api {
                    status: 400,
                    message,
                } => RemoteError::Unauthorized(message),
                other => other,
            });
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Attach the apikey plus the *session* bearer token (not the anon
    /// fallback); errors when no session is cached.
    async fn session_authed(
        &self,
        req: reqwest::RequestBuilder,
    ) -> Result<reqwest::RequestBuilder, RemoteError> {
        let session = self.session().await.ok_or(RemoteError::NoSession)?;
        Ok(req
            .header("apikey", self.api_key())
            .bearer_auth(session.access_token))
    }
}
