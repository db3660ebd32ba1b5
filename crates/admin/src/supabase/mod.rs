//! Hosted backend gateway (tables + auth + object storage).
//!
//! The backend is a Supabase project: a PostgREST table store, a GoTrue
//! auth service, and a storage bucket, all behind one base URL. The panel
//! treats it as an opaque remote collection/command interface - no local
//! database, no differential sync.
//!
//! # Architecture
//!
//! - One [`SupabaseClient`] shared via [`crate::state::AppState`]
//! - Table reads/writes over the PostgREST REST surface
//! - Operator sign-in against GoTrue; the access token is cached in-process
//!   and attached to subsequent table/storage calls (single-operator
//!   assumption)
//!
//! # Example
//!
//! ```rust,ignore
//! use bude_peyek_admin::supabase::SupabaseClient;
//!
//! let client = SupabaseClient::new(&config.supabase);
//! client.sign_in_with_password("admin@budepeyek.id", "...").await?;
//!
//! let products: Vec<Product> = client.list(PRODUCTS_TABLE, "id", true).await?;
//! client.update(PRODUCTS_TABLE, 1, &patch).await?;
//! ```

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use tokio::sync::RwLock;
use url::Url;

use crate::config::SupabaseConfig;

mod auth;
mod storage;
mod tables;

pub use auth::{AuthSession, AuthUser};

/// Remote `products` collection.
pub const PRODUCTS_TABLE: &str = "products";
/// Remote `orders` collection.
pub const ORDERS_TABLE: &str = "orders";
/// Storage bucket holding product images.
pub const PRODUCT_IMAGES_BUCKET: &str = "product-images";

/// Errors that can occur when talking to the hosted backend.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// HTTP transport failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with an error body.
    #[error("Backend error (HTTP {status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Message parsed from the error body (or the raw body).
        message: String,
    },

    /// A response body could not be decoded.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The backend rejected the credentials.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// An operation that needs an operator session ran without one.
    #[error("No operator session; sign in first")]
    NoSession,
}

/// Client for the hosted backend.
///
/// Cheap to clone; all clones share the HTTP connection pool and the
/// cached operator session.
#[derive(Clone)]
pub struct SupabaseClient {
    inner: Arc<SupabaseClientInner>,
}

struct SupabaseClientInner {
    http: reqwest::Client,
    base: Url,
    anon_key: SecretString,
    /// Operator auth session cached in memory after sign-in.
    session: RwLock<Option<AuthSession>>,
}

impl SupabaseClient {
    /// Create a new client for the project in `config`.
    #[must_use]
    pub fn new(config: &SupabaseConfig) -> Self {
        Self {
            inner: Arc::new(SupabaseClientInner {
                http: reqwest::Client::new(),
                base: config.url.clone(),
                anon_key: config.anon_key.clone(),
                session: RwLock::new(None),
            }),
        }
    }

    /// The cached operator session, if any.
    pub async fn session(&self) -> Option<AuthSession> {
        self.inner.session.read().await.clone()
    }

    /// Replace the cached session (used after sign-in and by tests).
    pub async fn set_session(&self, session: AuthSession) {
        *self.inner.session.write().await = Some(session);
    }

    /// Drop the cached session.
    pub async fn clear_session(&self) {
        *self.inner.session.write().await = None;
    }

    /// Build a URL under the project base.
    ///
    /// `segments` are appended to the base path, so a base of
    /// `https://x.supabase.co` and segments `["rest", "v1", "products"]`
    /// yields `https://x.supabase.co/rest/v1/products`.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.inner.base.clone();
        {
            // base URLs are validated at config load, so they can be a base
            let mut path = url
                .path_segments_mut()
                .expect("http(s) base URL is never cannot-be-a-base");
            path.pop_if_empty();
            for segment in segments {
                path.push(segment);
            }
        }
        url
    }

    /// The `apikey` header value sent on every request.
    fn api_key(&self) -> &str {
        self.inner.anon_key.expose_secret()
    }

    /// Bearer token for table/storage calls: the operator's access token
    /// when signed in, the anon key otherwise (row-level security decides
    /// what the anon role may touch).
    async fn bearer(&self) -> String {
        match self.inner.session.read().await.as_ref() {
            Some(session) => session.access_token.clone(),
            None => self.api_key().to_string(),
        }
    }

    /// Attach the standard auth headers to a request.
    async fn authed(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        req.header("apikey", self.api_key())
            .bearer_auth(self.bearer().await)
    }

    /// Map a non-success response to [`RemoteError`], extracting the
    /// backend's message when the body is a JSON error object.
    async fn error_from_response(response: reqwest::Response) -> RemoteError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        let message = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|v| {
                ["message", "msg", "error_description", "error"]
                    .iter()
                    .find_map(|key| v.get(key).and_then(serde_json::Value::as_str))
                    .map(str::to_string)
            })
            .unwrap_or_else(|| {
                if body.trim().is_empty() {
                    status
                        .canonical_reason()
                        .unwrap_or("unknown error")
                        .to_string()
                } else {
                    body.trim().to_string()
                }
            });

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            RemoteError::Unauthorized(message)
        } else {
            RemoteError::Api {
                status: status.as_u16(),
                message,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> SupabaseClient {
        SupabaseClient::new(&SupabaseConfig {
            url: Url::parse(base).expect("valid url"),
            anon_key: SecretString::from("anon-key"),
        })
    }

    #[test]
    fn test_endpoint_joins_segments() {
        let client = client("https://abc123.supabase.co");
        assert_eq!(
            client.endpoint(&["rest", "v1", "products"]).as_str(),
            "https://abc123.supabase.co/rest/v1/products"
        );
    }

    #[test]
    fn test_endpoint_tolerates_trailing_slash() {
        let client = client("https://abc123.supabase.co/");
        assert_eq!(
            client.endpoint(&["auth", "v1", "token"]).as_str(),
            "https://abc123.supabase.co/auth/v1/token"
        );
    }

    #[tokio::test]
    async fn test_bearer_falls_back_to_anon_key() {
        let client = client("https://abc123.supabase.co");
        assert_eq!(client.bearer().await, "anon-key");
    }

    #[test]
    fn test_remote_error_display() {
        let err = RemoteError::Api {
            status: 409,
            message: "duplicate key".to_string(),
        };
        assert_eq!(err.to_string(), "Backend error (HTTP 409): duplicate key");
    }
}
