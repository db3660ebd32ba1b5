//! Operator session data stored in the cookie session.

use serde::{Deserialize, Serialize};

/// Session keys used with tower-sessions.
pub mod session_keys {
    /// Key under which [`super::CurrentAdmin`] is stored.
    pub const CURRENT_ADMIN: &str = "current_admin";
}

/// The signed-in operator, as cached in the cookie session after a
/// successful hosted-auth sign-in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentAdmin {
    /// Hosted-auth user id.
    pub user_id: String,
    /// Sign-in email.
    pub email: String,
}
