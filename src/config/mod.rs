// Configuration module entry point
// Loads layered settings and builds the per-process application state

mod state;
mod types;

use std::net::SocketAddr;

use crate::error::WikiError;

// Re-export public types
pub use state::AppState;
pub use types::{
    Config, HealthConfig, HttpConfig, LoggingConfig, PerformanceConfig, RoutesConfig,
    ServerConfig, StorageConfig, TemplatesConfig,
};

impl Config {
    /// Load configuration from the given file path
    ///
    /// Layers, lowest priority first: built-in defaults, the optional file
    /// (extension may be omitted), then `WIKI__SECTION__KEY` environment variables.
    pub fn load_from(config_path: &str) -> Result<Self, WikiError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix("WIKI")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}
