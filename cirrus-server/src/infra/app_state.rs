use std::{fmt, sync::Arc};

use cirrus_core::{CloudinaryProvider, MediaProvider, ProviderResult};

use super::config::Config;

/// Shared handler state. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    config: Arc<Config>,
    provider: Arc<dyn MediaProvider>,
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("provider", &self.provider.name())
            .finish_non_exhaustive()
    }
}

impl AppState {
    pub fn new(config: Arc<Config>, provider: Arc<dyn MediaProvider>) -> Self {
        Self { config, provider }
    }

    /// Wires the Cloudinary provider from `config`.
    pub fn from_config(config: Arc<Config>) -> ProviderResult<Self> {
        let cloudinary = &config.cloudinary;
        let provider = CloudinaryProvider::new(
            cloudinary.credentials(),
            &cloudinary.api_base,
            cloudinary.max_results,
        )?;
        Ok(Self::new(config, Arc::new(provider)))
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn config_handle(&self) -> Arc<Config> {
        Arc::clone(&self.config)
    }

    pub fn provider(&self) -> &dyn MediaProvider {
        self.provider.as_ref()
    }
}
