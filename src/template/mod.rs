//! HTML template module
//!
//! Templates are Tera files named `<name>.html` that reference the page as
//! `{{ Title }}` and `{{ Body }}`. A [`TemplateSet`] is built once at start-up
//! and shared read-only; Tera autoescapes every `.html` template.

use std::path::Path;

use tera::{Context, Tera};

use crate::error::WikiError;
use crate::page::Page;

pub const VIEW_TEMPLATE: &str = "view";
pub const EDIT_TEMPLATE: &str = "edit";

/// Templates every wiki deployment must provide
pub const TEMPLATE_NAMES: [&str; 2] = [EDIT_TEMPLATE, VIEW_TEMPLATE];

const TEMPLATE_EXTENSION: &str = "html";

/// Named templates, built once and injected into request handlers
#[derive(Debug, Default)]
pub struct TemplateSet {
    tera: Tera,
}

impl TemplateSet {
    /// Load `<dir>/<name>.html` for every required template
    pub fn load(dir: impl AsRef<Path>) -> Result<Self, WikiError> {
        let dir = dir.as_ref();
        let mut sources = Vec::with_capacity(TEMPLATE_NAMES.len());

        for name in TEMPLATE_NAMES {
            let path = dir.join(file_name(name));
            let source = std::fs::read_to_string(&path).map_err(|e| WikiError::io(&path, e))?;
            sources.push((name, source));
        }

        Self::from_sources(sources.iter().map(|(name, source)| (*name, source.as_str())))
    }

    /// Build a set from in-memory sources keyed by template name
    pub fn from_sources<'a>(
        sources: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Result<Self, WikiError> {
        let mut tera = Tera::default();
        tera.add_raw_templates(
            sources
                .into_iter()
                .map(|(name, source)| (file_name(name), source)),
        )?;

        let set = Self { tera };
        set.check_variables()?;
        Ok(set)
    }

    /// Render the named template for a page
    pub fn render(&self, name: &str, page: &Page) -> Result<String, WikiError> {
        Ok(self.tera.render(&file_name(name), &page_context(page))?)
    }

    /// Render every template against a blank page so a reference to an
    /// unknown variable fails at start-up rather than on a request
    fn check_variables(&self) -> Result<(), WikiError> {
        let context = page_context(&Page::empty(""));
        for name in self.tera.get_template_names() {
            self.tera.render(name, &context)?;
        }
        Ok(())
    }
}

fn file_name(name: &str) -> String {
    format!("{name}.{TEMPLATE_EXTENSION}")
}

fn page_context(page: &Page) -> Context {
    let body = page.body_text();
    let mut context = Context::new();
    context.insert("Title", &page.title);
    context.insert("Body", body.as_ref());
    context
}
