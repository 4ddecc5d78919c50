//! Request handler module
//!
//! Routing plus the two JSON endpoints and the static layer behind them.

pub mod content;
pub mod router;
pub mod static_files;
pub mod upload;

/// Header carrying the shared admin secret on write requests
pub const ADMIN_PASSWORD_HEADER: &str = "x-admin-password";

pub use router::handle_request;
