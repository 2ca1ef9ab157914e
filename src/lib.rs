//! A small wiki server: pages are plain-text files named after their title,
//! viewed, edited and saved over HTTP.

pub mod config;
pub mod error;
pub mod handler;
pub mod http;
pub mod logger;
pub mod page;
pub mod routing;
pub mod server;
pub mod template;

pub use config::{AppState, Config};
pub use error::WikiError;
pub use page::{Page, PageStore};
pub use template::TemplateSet;
