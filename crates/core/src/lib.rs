//! Bude Peyek Core - Shared types library.
//!
//! This crate provides common types used across the Bude Peyek components:
//! - `admin` - Administration panel for the snack-food storefront
//! - `integration-tests` - End-to-end tests against a stub backend
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients. This keeps
//! it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, rupiah amounts, phone
//!   numbers, and status enums

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
