//! Optional RON config file, merged under the command-line flags.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use linkminer_engine::ClientSettings;
use linkminer_logging::client_info;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

use crate::cli::Cli;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse config {path:?}: {message}")]
    Parse { path: PathBuf, message: String },
    #[error("invalid backend url {url:?}: {source}")]
    BackendUrl {
        url: String,
        source: url::ParseError,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub backend: Option<String>,
    pub run_path: Option<String>,
    pub namespace: Option<String>,
    pub connect_timeout_secs: Option<u64>,
    pub request_timeout_secs: Option<u64>,
}

pub fn load(path: &Path) -> Result<FileConfig, ConfigError> {
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config = ron::from_str(&text).map_err(|err| ConfigError::Parse {
        path: path.to_path_buf(),
        message: err.to_string(),
    })?;
    client_info!("Loaded config from {:?}", path);
    Ok(config)
}

/// Flags win over the file; the file wins over built-in defaults.
pub fn resolve(cli: &Cli, file: FileConfig) -> Result<ClientSettings, ConfigError> {
    let mut settings = ClientSettings::default();

    if let Some(raw) = cli.backend.clone().or(file.backend) {
        settings.backend_url = parse_backend(&raw)?;
    }
    if let Some(run_path) = file.run_path {
        settings.run_path = run_path;
    }
    if let Some(namespace) = file.namespace {
        settings.namespace = namespace;
    }
    if let Some(secs) = file.connect_timeout_secs {
        settings.connect_timeout = Duration::from_secs(secs);
    }
    settings.request_timeout = cli
        .request_timeout_secs
        .or(file.request_timeout_secs)
        .map(Duration::from_secs);

    Ok(settings)
}

/// Backend addresses name a host; a trailing slash keeps `run_path` relative
/// to any path prefix.
fn parse_backend(raw: &str) -> Result<Url, ConfigError> {
    let normalized = if raw.ends_with('/') {
        raw.to_string()
    } else {
        format!("{raw}/")
    };
    Url::parse(&normalized).map_err(|source| ConfigError::BackendUrl {
        url: raw.to_string(),
        source,
    })
}
