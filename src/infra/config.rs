use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080/api";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Config {
    pub api_base_url: String,
    pub state_dir: PathBuf,
    pub timeout: Duration,
}

#[derive(Debug, Error)]
pub enum ResolveStateDirError {
    #[error("home directory not found (set PLANORA_STATE_DIR)")]
    HomeDirNotFound,
}

impl Config {
    pub fn from_env() -> Result<Self, ResolveStateDirError> {
        Ok(Self {
            api_base_url: resolve_api_base_url(std::env::var("PLANORA_API_URL").ok()),
            state_dir: resolve_state_dir()?,
            timeout: resolve_timeout(std::env::var("PLANORA_TIMEOUT_SECS").ok()),
        })
    }
}

pub fn resolve_state_dir() -> Result<PathBuf, ResolveStateDirError> {
    if let Some(override_dir) = std::env::var_os("PLANORA_STATE_DIR") {
        return Ok(PathBuf::from(override_dir));
    }

    let Some(home) = dirs::home_dir() else {
        return Err(ResolveStateDirError::HomeDirNotFound);
    };
    Ok(home.join(".planora"))
}

fn resolve_api_base_url(value: Option<String>) -> String {
    match value {
        Some(url) if !url.trim().is_empty() => url.trim().trim_end_matches('/').to_string(),
        _ => DEFAULT_API_BASE_URL.to_string(),
    }
}

fn resolve_timeout(value: Option<String>) -> Duration {
    value
        .and_then(|raw| raw.trim().parse::<u64>().ok())
        .filter(|secs| *secs > 0)
        .map(Duration::from_secs)
        .unwrap_or(DEFAULT_TIMEOUT)
}
