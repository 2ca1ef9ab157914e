//! Request handler module
//!
//! Responsible for request routing dispatch and the page handlers
//! (view, edit, save).

pub mod router;
pub mod wiki;

// Re-export main entry point
pub use router::handle_request;
