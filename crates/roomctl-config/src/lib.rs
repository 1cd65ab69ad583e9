//! Shared configuration for roomctl.
//!
//! TOML profiles, credential resolution (env + keyring + plaintext),
//! persisted session tokens, and translation to
//! `roomctl_core::ConsoleConfig`. The CLI adds flag-aware wrappers on top.

mod token_store;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use roomctl_core::{ApiPaths, ConsoleConfig, MemoryTokenStore, TlsMode, TokenStore};

pub use token_store::{FileTokenStore, KeyringTokenStore};

/// Keyring service name for passwords and tokens.
pub const KEYRING_SERVICE: &str = "roomctl";

/// Environment variable consulted first for the login password.
pub const PASSWORD_ENV: &str = "ROOMCTL_PASSWORD";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("profile '{profile}' not found")]
    UnknownProfile { profile: String },

    #[error("no password configured for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named backend profiles.
    #[serde(default)]
    pub profiles: BTreeMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Name of the profile to use when none is given explicitly.
    pub fn active_profile_name(&self) -> &str {
        self.default_profile.as_deref().unwrap_or("default")
    }

    /// Look up a profile by name.
    pub fn profile(&self, name: &str) -> Result<&Profile, ConfigError> {
        self.profiles
            .get(name)
            .ok_or_else(|| ConfigError::UnknownProfile {
                profile: name.into(),
            })
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default)]
    pub insecure: bool,

    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            insecure: false,
            timeout: default_timeout(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    30
}

/// Where a profile keeps its session token between runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenStoreKind {
    /// A file under the platform data directory.
    #[default]
    File,
    /// The system keyring.
    Keyring,
    /// Not persisted; every invocation must log in.
    Memory,
}

/// A named backend profile.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Profile {
    /// Backend base URL (e.g., "https://rooms.example.com").
    pub server: String,

    /// Login name.
    pub username: Option<String>,

    /// Password (plaintext -- prefer keyring or env var).
    pub password: Option<String>,

    /// Session token persistence.
    #[serde(default)]
    pub token_store: TokenStoreKind,

    /// Prefix of the login/identity routes (default `/api/auth`).
    pub auth_prefix: Option<String>,

    /// Prefix of the admin routes (default `/api/admin`).
    pub admin_prefix: Option<String>,

    /// Prefix of the role-management routes (default `/admin`).
    pub roles_prefix: Option<String>,

    /// Full path of the statistics endpoint.
    pub statistics_path: Option<String>,

    /// Path to custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Override insecure TLS setting.
    pub insecure: Option<bool>,

    /// Override timeout (seconds).
    pub timeout: Option<u64>,
}

impl Profile {
    /// Route prefixes with unset fields taken from the defaults.
    pub fn api_paths(&self) -> ApiPaths {
        let defaults = ApiPaths::default();
        ApiPaths {
            auth: self.auth_prefix.clone().unwrap_or(defaults.auth),
            admin: self.admin_prefix.clone().unwrap_or(defaults.admin),
            roles: self.roles_prefix.clone().unwrap_or(defaults.roles),
            statistics: self.statistics_path.clone().unwrap_or(defaults.statistics),
        }
    }
}

// ── Config file path ────────────────────────────────────────────────

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "roomctl", "roomctl")
}

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    project_dirs().map_or_else(
        || dirs_fallback(".config").join("config.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

/// Directory holding per-profile session token files.
pub fn session_dir() -> PathBuf {
    project_dirs().map_or_else(
        || dirs_fallback(".local/share").join("sessions"),
        |dirs| dirs.data_dir().join("sessions"),
    )
}

fn dirs_fallback(relative: &str) -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(relative);
    p.push("roomctl");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load the full Config from `path` + environment.
///
/// `ROOMCTL_`-prefixed variables override file values; nested keys use a
/// double underscore (`ROOMCTL_DEFAULTS__TIMEOUT=60`).
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("ROOMCTL_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

/// Serialize config to TOML and write it to `path`.
pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Credential resolution (without CLI flags) ───────────────────────

/// Resolve the login password: env var, then keyring, then plaintext.
pub fn resolve_password(profile: &Profile, profile_name: &str) -> Result<SecretString, ConfigError> {
    // 1. Env var
    if let Ok(pw) = std::env::var(PASSWORD_ENV) {
        return Ok(SecretString::from(pw));
    }

    // 2. Keyring
    if let Ok(entry) = keyring::Entry::new(KEYRING_SERVICE, &password_key(profile_name)) {
        if let Ok(pw) = entry.get_password() {
            return Ok(SecretString::from(pw));
        }
    }

    // 3. Plaintext in config
    if let Some(ref pw) = profile.password {
        return Ok(SecretString::from(pw.clone()));
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
    })
}

/// Store a profile's password in the system keyring.
pub fn store_password(profile_name: &str, password: &str) -> Result<(), ConfigError> {
    let entry = keyring::Entry::new(KEYRING_SERVICE, &password_key(profile_name))?;
    entry.set_password(password)?;
    Ok(())
}

fn password_key(profile_name: &str) -> String {
    format!("{profile_name}/password")
}

// ── Translation to core types ───────────────────────────────────────

/// Build a `ConsoleConfig` from a profile -- no CLI flag overrides.
pub fn profile_to_console_config(profile: &Profile) -> Result<ConsoleConfig, ConfigError> {
    let base_url: url::Url = profile
        .server
        .parse()
        .map_err(|_| ConfigError::Validation {
            field: "server".into(),
            reason: format!("invalid URL: {}", profile.server),
        })?;

    let tls = if profile.insecure.unwrap_or(false) {
        TlsMode::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsMode::CustomCa(ca_path.clone())
    } else {
        TlsMode::System
    };

    Ok(ConsoleConfig {
        base_url,
        paths: profile.api_paths(),
        tls,
        timeout: Duration::from_secs(profile.timeout.unwrap_or_else(default_timeout)),
    })
}

/// Token store selected by the profile's `token_store` setting.
pub fn token_store_for(
    profile: &Profile,
    profile_name: &str,
) -> Result<Arc<dyn TokenStore>, ConfigError> {
    Ok(match profile.token_store {
        TokenStoreKind::File => Arc::new(FileTokenStore::for_profile(profile_name)),
        TokenStoreKind::Keyring => Arc::new(KeyringTokenStore::for_profile(profile_name)?),
        TokenStoreKind::Memory => Arc::new(MemoryTokenStore::new()),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const SAMPLE: &str = r#"
default_profile = "lab"

[defaults]
output = "json"
timeout = 10

[profiles.lab]
server = "https://rooms.example.com/backend"
username = "alice"
password = "hunter2"
token_store = "memory"
roles_prefix = "/api/roles"
timeout = 5

[profiles.prod]
server = "https://rooms.prod.example.com"
insecure = true
"#;

    fn write_sample(dir: &tempfile::TempDir) -> PathBuf {
        let path = dir.path().join("config.toml");
        std::fs::write(&path, SAMPLE).unwrap();
        path
    }

    #[test]
    fn loads_profiles_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&write_sample(&dir)).unwrap();

        assert_eq!(cfg.active_profile_name(), "lab");
        assert_eq!(cfg.defaults.output, "json");
        assert_eq!(cfg.defaults.color, "auto");

        let lab = cfg.profile("lab").unwrap();
        assert_eq!(lab.username.as_deref(), Some("alice"));
        assert_eq!(lab.token_store, TokenStoreKind::Memory);
        assert_eq!(cfg.profile("prod").unwrap().token_store, TokenStoreKind::File);
        assert!(matches!(
            cfg.profile("staging"),
            Err(ConfigError::UnknownProfile { .. })
        ));
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("absent.toml")).unwrap();
        assert!(cfg.profiles.is_empty());
        assert_eq!(cfg.defaults.timeout, 30);
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        cfg.profiles.insert(
            "home".into(),
            Profile {
                server: "http://localhost:8000".into(),
                username: Some("bob".into()),
                ..Profile::default()
            },
        );
        save_config_to(&cfg, &path).unwrap();

        let loaded = load_config_from(&path).unwrap();
        assert_eq!(loaded.profile("home").unwrap().server, "http://localhost:8000");
    }

    #[test]
    fn profile_translation() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&write_sample(&dir)).unwrap();

        let lab = profile_to_console_config(cfg.profile("lab").unwrap()).unwrap();
        assert_eq!(lab.base_url.as_str(), "https://rooms.example.com/backend");
        assert_eq!(lab.paths.roles, "/api/roles");
        assert_eq!(lab.paths.admin, "/api/admin");
        assert_eq!(lab.tls, TlsMode::System);
        assert_eq!(lab.timeout, Duration::from_secs(5));

        let prod = profile_to_console_config(cfg.profile("prod").unwrap()).unwrap();
        assert_eq!(prod.tls, TlsMode::DangerAcceptInvalid);
        assert_eq!(prod.timeout, Duration::from_secs(30));
    }

    #[test]
    fn invalid_server_url() {
        let profile = Profile {
            server: "not a url".into(),
            ..Profile::default()
        };
        assert!(matches!(
            profile_to_console_config(&profile),
            Err(ConfigError::Validation { .. })
        ));
    }
}
