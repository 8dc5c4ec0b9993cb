//! CLI command implementations

pub mod config;
pub mod device;
pub mod send;
pub mod session;
pub mod signature;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context as _, Result};
use zerod_client::config::ClientConfig;
use zerod_client::events::EventBus;
use zerod_client::signature::{
    BrowserEnvironment, EnvironmentProvider, HostEnvironment, StaticEnvironment,
};
use zerod_client::storage::FileStorage;
use zerod_client::ApiClient;

/// Settings shared by every command.
pub struct Context {
    pub storage_dir: PathBuf,
    pub config: ClientConfig,
    pub environment_file: Option<PathBuf>,
    pub verbose: bool,
}

impl Context {
    /// Profile storage holding the device id and session credential.
    pub fn storage(&self) -> Arc<FileStorage> {
        Arc::new(FileStorage::in_dir(&self.storage_dir))
    }

    /// Environment snapshot source: the JSON file if given, else the host.
    pub fn environment(&self) -> Result<Arc<dyn EnvironmentProvider>> {
        match &self.environment_file {
            Some(path) => Ok(Arc::new(StaticEnvironment(load_environment(path)?))),
            None => Ok(Arc::new(HostEnvironment)),
        }
    }

    /// Build a client over the profile storage.
    ///
    /// In verbose mode every request lifecycle event is logged.
    pub fn client(&self) -> Result<ApiClient> {
        let mut builder = ApiClient::builder()
            .config(self.config.clone())
            .storage(self.storage())
            .environment(self.environment()?);

        if self.verbose {
            let events = Arc::new(EventBus::new());
            events.on("**", |name, payload| {
                tracing::debug!(event = name, payload = %payload, "client event");
            });
            builder = builder.events(events);
        }

        Ok(builder.build()?)
    }
}

/// Read a `BrowserEnvironment` from a camelCase JSON file.
pub fn load_environment(path: &Path) -> Result<BrowserEnvironment> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read environment file {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("invalid environment file {}", path.display()))
}
