//! Admin-side models.

pub mod session;
pub mod views;

pub use session::AdminSession;
pub use session::keys as session_keys;
