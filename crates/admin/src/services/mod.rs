//! Business logic services for admin.
//!
//! # Services
//!
//! - `auth` - Credential validation against the backend
//! - `moderation` - Worker lifecycle actions

pub mod auth;
pub mod moderation;

pub use auth::{LoginRequest, login};
pub use moderation::moderate;
