use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Current config version. Bump this when adding fields or changing shape.
/// Each bump requires a corresponding entry in [`migrate`].
const CURRENT_VERSION: u32 = 2;

pub const DEFAULT_API_BASE: &str = "http://127.0.0.1:9000";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const ENV_API_BASE: &str = "TALENT_API_BASE";
pub const ENV_MOCK_FALLBACK: &str = "TALENT_MOCK_FALLBACK";
pub const ENV_AUTH_TOKEN: &str = "TALENT_AUTH_TOKEN";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Schema version. Missing or 0 = pre-versioned config.
    #[serde(default)]
    pub config_version: u32,
    pub api_base: String,
    /// Answer failed requests from the built-in mock data. Added in v2.
    #[serde(default)]
    pub mock_fallback: bool,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// Bearer token supplied through the environment. Never written to disk.
    #[serde(skip)]
    pub auth_token: Option<String>,
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            config_version: CURRENT_VERSION,
            api_base: DEFAULT_API_BASE.to_string(),
            mock_fallback: cfg!(debug_assertions),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            auth_token: None,
        }
    }
}

impl ClientConfig {
    /// Absolute URL for an API path.
    pub fn url(&self, path: &str) -> String {
        let base = self.api_base.trim_end_matches('/');
        if path.starts_with('/') {
            format!("{base}{path}")
        } else {
            format!("{base}/{path}")
        }
    }

    /// Apply `TALENT_*` overrides from the process environment.
    pub fn with_env(self) -> Result<Self, ConfigError> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    pub fn with_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(base) = lookup(ENV_API_BASE).filter(|v| !v.trim().is_empty()) {
            self.api_base = base.trim().trim_end_matches('/').to_string();
        }
        if let Some(raw) = lookup(ENV_MOCK_FALLBACK) {
            self.mock_fallback = parse_flag(&raw).ok_or_else(|| ConfigError::InvalidOverride {
                key: ENV_MOCK_FALLBACK.to_string(),
                value: raw.clone(),
            })?;
        }
        if let Some(token) = lookup(ENV_AUTH_TOKEN).filter(|v| !v.trim().is_empty()) {
            self.auth_token = Some(token.trim().to_string());
        }
        Ok(self)
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

pub fn config_dir() -> Result<PathBuf, ConfigError> {
    let base = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
    Ok(base.join("talentlens"))
}

fn config_path() -> Result<PathBuf, ConfigError> {
    Ok(config_dir()?.join("config.json"))
}

pub fn has_config() -> bool {
    config_path().map(|p| p.exists()).unwrap_or(false)
}

/// Load the saved config, or the defaults when none has been saved yet.
pub fn load_config() -> Result<ClientConfig, ConfigError> {
    let path = config_path()?;
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no saved config, using defaults");
        return Ok(ClientConfig::default());
    }
    load_config_from(&path)
}

pub fn load_config_from(path: &Path) -> Result<ClientConfig, ConfigError> {
    let contents = std::fs::read_to_string(path)?;

    // Parse as raw JSON so we can run migrations before deserializing.
    let json: serde_json::Value = serde_json::from_str(&contents)?;
    let on_disk_version = json
        .get("config_version")
        .and_then(|v| v.as_u64())
        .unwrap_or(0) as u32;

    let migrated = migrate(json, on_disk_version)?;
    Ok(serde_json::from_value(migrated)?)
}

/// Run sequential migrations from `from_version` up to [`CURRENT_VERSION`].
fn migrate(
    mut json: serde_json::Value,
    from_version: u32,
) -> Result<serde_json::Value, ConfigError> {
    if from_version > CURRENT_VERSION {
        return Err(ConfigError::UnsupportedVersion {
            found: from_version,
            supported: CURRENT_VERSION,
        });
    }

    let obj = json.as_object_mut().ok_or(ConfigError::NotAnObject)?;

    // v0 → v1: `base_url` renamed to `api_base`
    if from_version < 1 {
        let base = obj
            .remove("base_url")
            .unwrap_or_else(|| serde_json::Value::String(DEFAULT_API_BASE.to_string()));
        obj.entry("api_base").or_insert(base);
        obj.insert("config_version".to_string(), 1.into());
        tracing::info!("migrated config v0 → v1 (renamed base_url)");
    }

    // v1 → v2: mock fallback becomes explicit and off unless set
    if from_version < 2 {
        obj.entry("mock_fallback").or_insert(false.into());
        obj.entry("timeout_secs").or_insert(DEFAULT_TIMEOUT_SECS.into());
        obj.insert("config_version".to_string(), 2.into());
        tracing::info!("migrated config v1 → v2 (added mock_fallback, timeout_secs)");
    }

    Ok(json)
}

pub fn save_config(config: &ClientConfig) -> Result<PathBuf, ConfigError> {
    save_config_in(&config_dir()?, config)
}

/// Write `config.json` into `dir` through a temp file and rename.
pub fn save_config_in(dir: &Path, config: &ClientConfig) -> Result<PathBuf, ConfigError> {
    std::fs::create_dir_all(dir)?;

    // Always write the current version, regardless of what was loaded.
    let mut stamped = config.clone();
    stamped.config_version = CURRENT_VERSION;

    let path = dir.join("config.json");
    let json = serde_json::to_string_pretty(&stamped)?;
    write_private(&path, json.as_bytes())?;

    tracing::info!(path = %path.display(), "config saved");
    Ok(path)
}

pub fn delete_config() -> Result<(), ConfigError> {
    let path = config_path()?;
    if path.exists() {
        std::fs::remove_file(&path)?;
        tracing::info!(path = %path.display(), "config deleted");
    }
    Ok(())
}

/// Atomic write with owner-only permissions on Unix.
pub(crate) fn write_private(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp_path = PathBuf::from(tmp_name);
    std::fs::write(&tmp_path, bytes)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&tmp_path, std::fs::Permissions::from_mode(0o600))?;
    }

    std::fs::rename(&tmp_path, path)
}
