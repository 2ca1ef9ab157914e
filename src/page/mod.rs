//! Page record and file-backed page store

mod store;

use std::borrow::Cow;

pub use store::PageStore;

/// A wiki page: a title and its raw content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub title: String,
    pub body: Vec<u8>,
}

impl Page {
    pub fn new(title: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }

    /// Blank page used when editing a title that has no file yet
    pub fn empty(title: impl Into<String>) -> Self {
        Self::new(title, Vec::new())
    }

    /// Body as text, replacing invalid UTF-8 sequences
    pub fn body_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}

/// Titles are non-empty and consist of ASCII letters and digits only
pub fn is_valid_title(title: &str) -> bool {
    !title.is_empty() && title.bytes().all(|b| b.is_ascii_alphanumeric())
}
