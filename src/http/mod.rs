//! HTTP protocol layer module
//!
//! Response builders, MIME detection and conditional requests, kept apart
//! from the distance and static-file handlers that use them.

pub mod cache;
pub mod mime;
pub mod response;

// Re-export commonly used builders
pub use response::{
    build_304_response, build_404_response, build_405_response, build_health_response,
    build_json_response, build_options_response, build_text_response,
};
