//! Business logic between the HTTP surface and the gateway.
//!
//! - [`orders`] - the order-status / stock reconciliation workflow, the one
//!   state-machine-like piece of the system
//! - [`catalog`] - product create/update/delete with image upload
//! - [`dashboard`] - summary metrics computed from the cache
//! - [`whatsapp`] - `wa.me` deep links with a pre-filled order message

pub mod catalog;
pub mod dashboard;
pub mod orders;
pub mod whatsapp;
