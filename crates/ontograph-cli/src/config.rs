//! Locating and reading the CLI configuration file.
//!
//! `--config` names the file directly. Otherwise the first `config.toml`
//! found among [`search_paths`] is read, and without one the default
//! [`AppConfig`] applies.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use log::{debug, info};
use thiserror::Error;

use ontograph::{OntographError, config::AppConfig, ontology::Iri};

const CONFIG_FILE: &str = "config.toml";

/// Errors raised while reading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing configuration file: {}", path.display())]
    Missing { path: PathBuf },

    #[error("Failed to read configuration file {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("Failed to parse TOML configuration {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid namespace <{namespace}> for {key} in {}", path.display())]
    Namespace {
        path: PathBuf,
        key: String,
        namespace: String,
    },
}

impl From<ConfigError> for OntographError {
    fn from(err: ConfigError) -> Self {
        let kind = match &err {
            ConfigError::Missing { .. } => io::ErrorKind::NotFound,
            ConfigError::Read { source, .. } => source.kind(),
            ConfigError::Parse { .. } | ConfigError::Namespace { .. } => io::ErrorKind::InvalidData,
        };
        OntographError::Io(io::Error::new(kind, err))
    }
}

/// Places searched for a configuration file, in order.
///
/// `ontograph/config.toml` under the working directory comes first, then
/// the per-user configuration directory when the platform has one.
pub fn search_paths() -> Vec<PathBuf> {
    let mut paths = vec![Path::new("ontograph").join(CONFIG_FILE)];
    match ProjectDirs::from("com", "ontograph", "ontograph") {
        Some(dirs) => paths.push(dirs.config_dir().join(CONFIG_FILE)),
        None => debug!("Could not determine platform-specific config directory"),
    }
    paths
}

/// Loads the explicit configuration file, or the first one discovered.
///
/// # Errors
///
/// Returns `OntographError::Io` when an explicit file is missing, or when
/// the chosen file cannot be read, parsed or names an invalid namespace.
pub fn load_config(explicit: Option<&Path>) -> Result<AppConfig, OntographError> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => match discover(&search_paths()) {
            Some(path) => path,
            None => {
                debug!("No configuration file found, using default configuration");
                return Ok(AppConfig::default());
            }
        },
    };

    let config = read(&path)?;
    info!(
        path:% = path.display(),
        format:% = config.output().format(),
        prefixes = config.ontology().prefixes().count();
        "Loaded configuration"
    );
    Ok(config)
}

fn discover(paths: &[PathBuf]) -> Option<PathBuf> {
    let found = paths.iter().find(|path| path.is_file()).cloned();
    if found.is_none() {
        debug!(searched = paths.len(); "No configuration file in search paths");
    }
    found
}

fn read(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => ConfigError::Missing {
            path: path.to_path_buf(),
        },
        _ => ConfigError::Read {
            path: path.to_path_buf(),
            source,
        },
    })?;
    let config: AppConfig = toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    let namespaces = config
        .ontology()
        .prefixes()
        .map(|(prefix, namespace)| (format!("prefix '{prefix}'"), namespace))
        .chain([("graph base".to_string(), config.graph().base())]);
    for (key, namespace) in namespaces {
        if !Iri::new(namespace).is_valid() {
            return Err(ConfigError::Namespace {
                path: path.to_path_buf(),
                key,
                namespace: namespace.to_string(),
            });
        }
    }
    Ok(config)
}
