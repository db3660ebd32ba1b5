//! HTTP middleware for the admin panel.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. `TraceLayer` (request tracing)
//! 2. Session layer (tower-sessions, in-memory store)
//! 3. Auth guard via the [`auth::RequireAdminAuth`] extractor on protected
//!    handlers

pub mod auth;
pub mod session;

pub use session::create_session_layer;
