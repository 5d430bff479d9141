//! Storefront session keys and API views.

pub mod session;
pub mod views;

pub use session::keys as session_keys;
