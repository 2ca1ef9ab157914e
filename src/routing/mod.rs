//! Routing module
//!
//! Provides the page route table and the path validator:
//! - Prefix registration for `/view/`, `/edit/` and `/save/`
//! - Title extraction and validation against the allowed path pattern

mod matcher;

pub use matcher::{PagePath, PathValidator};

/// Handler a page route dispatches to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageAction {
    View,
    Edit,
    Save,
}

/// Registered page routes, matched by prefix in order
pub const PAGE_ROUTES: [(&str, PageAction); 3] = [
    ("/view/", PageAction::View),
    ("/edit/", PageAction::Edit),
    ("/save/", PageAction::Save),
];

impl PageAction {
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::View => "/view/",
            Self::Edit => "/edit/",
            Self::Save => "/save/",
        }
    }

    /// URL of this action for a title, e.g. `/edit/FrontPage`
    pub fn path_for(self, title: &str) -> String {
        format!("{}{title}", self.prefix())
    }

    fn from_segment(segment: &str) -> Option<Self> {
        match segment {
            "view" => Some(Self::View),
            "edit" => Some(Self::Edit),
            "save" => Some(Self::Save),
            _ => None,
        }
    }
}

/// Find the page route registered for a path prefix
pub fn match_route(path: &str) -> Option<PageAction> {
    PAGE_ROUTES
        .iter()
        .find(|(prefix, _)| path.starts_with(prefix))
        .map(|&(_, action)| action)
}
