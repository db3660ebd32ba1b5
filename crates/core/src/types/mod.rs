//! Core types for Bude Peyek.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod phone;
pub mod price;
pub mod status;

pub use id::*;
pub use phone::{Phone, PhoneError};
pub use price::Rupiah;
pub use status::{OrderStatus, ProductStatus};
