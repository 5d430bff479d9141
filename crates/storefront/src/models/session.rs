//! Session-related types.

/// Session keys for storefront visitor state.
pub mod keys {
    /// Key for the post-call follow-up marker.
    pub const CALL_MARKER: &str = "call_marker";
}
