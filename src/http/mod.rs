//! HTTP protocol layer module
//!
//! Response builders, body limits, caching and MIME helpers shared by the
//! API handlers and the static layer.

pub mod body;
pub mod cache;
pub mod mime;
pub mod response;

// Re-export commonly used functions
pub use response::{
    build_304_response, build_404_response, build_405_response, build_413_response,
    build_options_response, json_method_not_allowed, json_not_found, json_response, with_cors,
};
