//! Data models for the admin panel.
//!
//! [`Product`] and [`Order`] mirror the remote table rows; the client never
//! owns their lifecycle, it only holds disposable copies (see
//! [`crate::cache`]). Inserts and patches use separate types that omit the
//! server-assigned columns.

pub mod order;
pub mod product;
pub mod session;
pub mod settings;

pub use order::{Order, OrderStatusPatch};
pub use product::{NewProduct, Product, ProductPatch};
pub use session::{CurrentAdmin, session_keys};
pub use settings::{SettingsStore, StoreSettings};
