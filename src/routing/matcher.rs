//! Path validation module
//!
//! Only `/(edit|save|view)/<title>` with an alphanumeric title is accepted.

use regex_lite::Regex;

use super::PageAction;
use crate::error::WikiError;

const VALID_PATH_PATTERN: &str = "^/(edit|save|view)/([a-zA-Z0-9]+)$";

/// A validated page request path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagePath<'a> {
    pub action: PageAction,
    pub title: &'a str,
}

/// Compiled path pattern, built once and shared through the app state
#[derive(Debug, Clone)]
pub struct PathValidator {
    pattern: Regex,
}

impl PathValidator {
    pub fn new() -> Result<Self, WikiError> {
        Ok(Self {
            pattern: Regex::new(VALID_PATH_PATTERN)?,
        })
    }

    /// Match a request path and extract its title
    pub fn match_path<'a>(&self, path: &'a str) -> Result<PagePath<'a>, WikiError> {
        let invalid = || WikiError::InvalidPath(path.to_string());

        let caps = self.pattern.captures(path).ok_or_else(invalid)?;
        let action = caps
            .get(1)
            .and_then(|m| PageAction::from_segment(m.as_str()))
            .ok_or_else(invalid)?;
        let title = caps.get(2).map(|m| m.as_str()).ok_or_else(invalid)?;

        Ok(PagePath { action, title })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validator() -> PathValidator {
        PathValidator::new().unwrap()
    }

    #[test]
    fn test_valid_paths() {
        let v = validator();
        assert_eq!(
            v.match_path("/view/FrontPage").unwrap(),
            PagePath {
                action: PageAction::View,
                title: "FrontPage"
            }
        );
        assert_eq!(v.match_path("/edit/Page2").unwrap().action, PageAction::Edit);
        assert_eq!(v.match_path("/save/x").unwrap().title, "x");
    }

    #[test]
    fn test_rejects_non_alphanumeric_titles() {
        let v = validator();
        for path in [
            "/view/abc$def",
            "/view/",
            "/view/a/b",
            "/view/../secret",
            "/view/with space",
            "/edit/Foo.txt",
        ] {
            let err = v.match_path(path).unwrap_err();
            assert!(
                matches!(err, WikiError::InvalidPath(ref p) if p == path),
                "expected {path} to be rejected"
            );
        }
    }

    #[test]
    fn test_rejects_unknown_actions() {
        let v = validator();
        assert!(v.match_path("/delete/Foo").is_err());
        assert!(v.match_path("/View/Foo").is_err());
        assert!(v.match_path("view/Foo").is_err());
        assert!(v.match_path("/x/view/Foo").is_err());
    }
}
