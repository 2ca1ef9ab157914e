//! HTTP protocol layer module
//!
//! Provides HTTP protocol-related base functionality, decoupled from the wiki handlers.

pub mod form;
pub mod response;

// Re-export commonly used types
pub use form::{decode_path, form_value, is_form_content_type, FormData};
pub use response::{
    build_404_response, build_413_response, build_500_response, build_health_response,
    build_html_response, build_redirect_response,
};
