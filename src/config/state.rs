// Application state module
// Everything a request handler needs, built once and shared read-only

use super::types::Config;
use crate::error::WikiError;
use crate::page::PageStore;
use crate::routing::PathValidator;
use crate::template::TemplateSet;

/// Application state
pub struct AppState {
    pub config: Config,
    pub store: PageStore,
    pub templates: TemplateSet,
    pub validator: PathValidator,
}

impl AppState {
    /// Build state from configuration and an already loaded template set
    pub fn new(config: Config, templates: TemplateSet) -> Result<Self, WikiError> {
        let store = PageStore::open(&config.storage.data_dir)?;
        let validator = PathValidator::new()?;

        Ok(Self {
            config,
            store,
            templates,
            validator,
        })
    }

    /// Load templates from the configured directory and build state
    pub fn from_config(config: Config) -> Result<Self, WikiError> {
        let templates = TemplateSet::load(&config.templates.dir)?;
        Self::new(config, templates)
    }
}
