//! SevaSangam Core - Shared domain library.
//!
//! This crate provides the types and rules used across all SevaSangam
//! components:
//! - `storefront` - Public marketplace API and worker self-service
//! - `admin` - Moderation API for workers, categories and inquiries
//! - `cli` - Operator tool for seeding and moderation
//!
//! # Architecture
//!
//! The core crate contains only types, pure rules and the backend contract
//! trait - no I/O and no HTTP clients. Transports live in
//! `seva-sangam-client`.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, statuses and phone numbers
//! - [`models`] - Worker, category, inquiry and account records plus their forms
//! - [`lifecycle`] - Worker approval and publication rules
//! - [`search`] - In-memory worker filtering
//! - [`catalog`] - Built-in categories and label resolution
//! - [`call_marker`] - Post-call follow-up marker
//! - [`backend`] - The backend RPC contract and error classification

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod backend;
pub mod call_marker;
pub mod catalog;
pub mod lifecycle;
pub mod models;
pub mod search;
pub mod types;

pub use backend::{AdminCredentials, BackendError, ErrorClass, MarketplaceBackend, SharedBackend};
pub use lifecycle::{ActionOutcome, LifecycleError, WorkerAction};
pub use models::*;
pub use search::{AvailabilityBucket, WorkerFilter};
pub use types::*;
