use crate::{endpoint::TransportMode, error::*};
use std::{path::*, time::Duration};

/// Environment variable docker uses to relocate its configuration directory
pub const DOCKER_CONFIG_ENV: &str = "DOCKER_CONFIG";

/// Settings for [crate::distribution::Client]
#[derive(Debug, Clone, Default)]
pub struct ClientConfig {
    /// Upper bound for each request, including connect. `None` waits indefinitely.
    pub timeout: Option<Duration>,
    /// Explicit docker `config.json`. When unset, [default_docker_config] is used
    /// if it exists.
    pub docker_config: Option<PathBuf>,
}

/// What to do when the source tag does not exist in the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingSource {
    /// Abort with [Error::ManifestFetch]
    #[default]
    Fail,
    /// Log a warning and report [crate::RetagOutcome::SourceMissing]
    Warn,
}

/// Settings for [crate::retag]
#[derive(Debug, Clone, Copy, Default)]
pub struct RetagOptions {
    pub transport: TransportMode,
    pub missing_source: MissingSource,
}

/// `$DOCKER_CONFIG/config.json`, or `~/.docker/config.json`
pub fn default_docker_config() -> Result<PathBuf> {
    if let Some(dir) = std::env::var_os(DOCKER_CONFIG_ENV) {
        return Ok(PathBuf::from(dir).join("config.json"));
    }
    let dirs = directories::BaseDirs::new().ok_or(Error::NoValidHomeDirectory)?;
    Ok(dirs.home_dir().join(".docker/config.json"))
}
