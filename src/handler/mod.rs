//! Request handler module
//!
//! Responsible for request routing dispatch and business logic processing:
//! the distance endpoint and static file serving.

pub mod distance;
pub mod router;
pub mod static_files;

// Re-export main entry point
pub use router::handle_request;
