use std::{
    fs,
    path::{Path, PathBuf},
};

use cirrus_core::{
    DEFAULT_API_BASE, DEFAULT_MAX_RESULTS, MAX_RESULTS_LIMIT, SignatureAlgorithm,
};
use cirrus_model::{ModelError, RemotePattern};
use thiserror::Error;

use super::{
    models::{CloudinaryConfig, Config, ConfigMetadata, CorsConfig, ServerConfig},
    sources::{EnvConfig, FileConfig},
    validation::{self, ConfigGuardRailError, ConfigWarnings},
};

const DEFAULT_CONFIG_LOCATIONS: &[&str] =
    &["cirrus.toml", "config/cirrus.toml"];

#[derive(Debug, Default, Clone)]
pub struct ConfigLoaderOptions {
    pub config_path: Option<PathBuf>,
    pub env_file: Option<PathBuf>,
    /// Use these values instead of the process environment. No `.env` file
    /// is read when set.
    pub env: Option<EnvConfig>,
}

#[derive(Debug, Default)]
pub struct ConfigLoader {
    options: ConfigLoaderOptions,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ConfigLoaderOptions) -> Self {
        Self { options }
    }

    pub fn with_config_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.options.config_path = Some(path.into());
        self
    }

    pub fn with_env_file<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.options.env_file = Some(path.into());
        self
    }

    pub fn with_env(mut self, env: EnvConfig) -> Self {
        self.options.env = Some(env);
        self
    }

    pub fn load(&self) -> Result<ConfigLoad, ConfigLoadError> {
        let (env_config, env_file_loaded) = match &self.options.env {
            Some(env) => (env.clone(), false),
            None => {
                let loaded = self.load_env_file()?;
                (EnvConfig::gather(), loaded)
            }
        };

        let (file_config, config_path) =
            self.load_file_config(&env_config)?;

        let (config, warnings) = compose_config(
            file_config,
            env_config,
            config_path,
            env_file_loaded,
        )?;

        Ok(ConfigLoad { config, warnings })
    }

    fn load_env_file(&self) -> Result<bool, ConfigLoadError> {
        let result = match &self.options.env_file {
            Some(path) => dotenvy::from_path(path),
            None => dotenvy::dotenv().map(|_| ()),
        };
        match result {
            Ok(()) => Ok(true),
            Err(dotenvy::Error::Io(_)) => Ok(false),
            Err(err) => Err(err.into()),
        }
    }

    fn load_file_config(
        &self,
        env_config: &EnvConfig,
    ) -> Result<(Option<FileConfig>, Option<PathBuf>), ConfigLoadError> {
        // An explicitly named file must exist; default locations are optional.
        let explicit = self
            .options
            .config_path
            .clone()
            .or_else(|| env_config.config_path.clone());

        let path = match explicit {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigLoadError::MissingConfig { path });
                }
                path
            }
            None => match DEFAULT_CONFIG_LOCATIONS
                .iter()
                .map(PathBuf::from)
                .find(|candidate| candidate.exists())
            {
                Some(path) => path,
                None => return Ok((None, None)),
            },
        };

        let file_config = read_file_config(&path)?;
        Ok((Some(file_config), Some(path)))
    }
}

fn read_file_config(path: &Path) -> Result<FileConfig, ConfigLoadError> {
    let contents =
        fs::read_to_string(path).map_err(|source| ConfigLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    toml::from_str(&contents).map_err(|source| ConfigLoadError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn compose_config(
    file_config: Option<FileConfig>,
    env: EnvConfig,
    config_path: Option<PathBuf>,
    env_file_loaded: bool,
) -> Result<(Config, ConfigWarnings), ConfigLoadError> {
    let mut warnings = ConfigWarnings::default();

    if file_config.is_none() {
        warnings.push_with_hint(
            "No cirrus.toml detected; using environment variables and defaults",
            "Create cirrus.toml or pass --config to keep settings in a file",
        );
    }

    let FileConfig {
        server: file_server,
        cloudinary: file_cloudinary,
        cors: file_cors,
        images: file_images,
        dev_mode: file_dev_mode,
    } = file_config.unwrap_or_default();

    let server = ServerConfig {
        host: env
            .server_host
            .or(file_server.host)
            .unwrap_or_else(|| "0.0.0.0".to_string()),
        port: env.server_port.or(file_server.port).unwrap_or(3000),
    };

    let signature_algorithm = match env
        .signature_algorithm
        .or(file_cloudinary.signature_algorithm)
    {
        Some(raw) => raw
            .parse::<SignatureAlgorithm>()
            .map_err(|_| ConfigLoadError::InvalidSignatureAlgorithm(raw))?,
        None => SignatureAlgorithm::default(),
    };

    let requested_max = env
        .max_results
        .or(file_cloudinary.max_results)
        .unwrap_or(DEFAULT_MAX_RESULTS);
    let max_results = requested_max.clamp(1, MAX_RESULTS_LIMIT);
    if max_results != requested_max {
        warnings.push(format!(
            "CLOUDINARY_MAX_RESULTS={requested_max} is out of range; using {max_results}"
        ));
    }

    let cloudinary = CloudinaryConfig {
        cloud_name: env.cloud_name.or(file_cloudinary.cloud_name),
        api_key: env.api_key.or(file_cloudinary.api_key),
        api_secret: env.api_secret.or(file_cloudinary.api_secret),
        library_tag: env.library_tag.or(file_cloudinary.library_tag),
        api_base: env
            .api_base
            .or(file_cloudinary.api_base)
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
        max_results,
        signature_algorithm,
    };

    let remote_patterns = match file_images.remote_patterns {
        Some(patterns) => {
            for pattern in &patterns {
                pattern.validate()?;
            }
            patterns
        }
        None => match cloudinary.cloud_name.as_deref() {
            Some(cloud_name) => {
                vec![RemotePattern::cloudinary_uploads(cloud_name)?]
            }
            None => Vec::new(),
        },
    };

    let cors = CorsConfig {
        allowed_origins: env
            .cors_allowed_origins
            .or(file_cors.allowed_origins)
            .unwrap_or_else(default_cors_origins),
    };

    let dev_mode = env.dev_mode.or(file_dev_mode).unwrap_or(false);

    let config = Config {
        server,
        cloudinary,
        cors,
        remote_patterns,
        dev_mode,
        metadata: ConfigMetadata {
            config_path,
            env_file_loaded,
        },
    };

    warnings.extend(validation::apply_guard_rails(&config)?);

    Ok((config, warnings))
}

fn default_cors_origins() -> Vec<String> {
    vec![
        "http://localhost:3000".to_string(),
        "http://localhost:5173".to_string(),
    ]
}

#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("configuration file missing: {path}")]
    MissingConfig { path: PathBuf },
    #[error("failed to read configuration {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse configuration {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("unknown signature algorithm '{0}' (expected sha1 or sha256)")]
    InvalidSignatureAlgorithm(String),
    #[error("invalid remote image pattern: {0}")]
    InvalidRemotePattern(#[from] ModelError),
    #[error(transparent)]
    GuardRail(#[from] ConfigGuardRailError),
    #[error(transparent)]
    EnvFile(#[from] dotenvy::Error),
}

#[derive(Debug)]
pub struct ConfigLoad {
    pub config: Config,
    pub warnings: ConfigWarnings,
}
