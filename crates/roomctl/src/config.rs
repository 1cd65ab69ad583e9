//! CLI configuration — thin wrapper around `roomctl_config` shared types.
//!
//! Re-exports the shared types and adds CLI-specific resolution that
//! respects `GlobalOpts` flag overrides (--server, --insecure, --timeout).

use std::time::Duration;

use roomctl_core::{ConsoleConfig, TlsMode};

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use roomctl_config::{
    Config, Defaults, Profile, TokenStoreKind, config_path, load_config_or_default, save_config,
};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .unwrap_or_else(|| config.active_profile_name().to_owned())
}

/// Comma-separated profile names for help text.
pub fn available_profiles() -> String {
    let cfg = load_config_or_default();
    if cfg.profiles.is_empty() {
        "(none)".into()
    } else {
        cfg.profiles.keys().cloned().collect::<Vec<_>>().join(", ")
    }
}

/// The profile a backend command runs against, with flag overrides applied.
#[derive(Debug)]
pub struct ResolvedProfile {
    pub name: String,
    pub profile: Profile,
    pub console: ConsoleConfig,
}

/// Pick the active profile and translate it into a `ConsoleConfig`.
///
/// Without a matching profile, `--server` alone is enough to build a
/// session-less console (the token then lives under the profile name).
pub fn resolve(global: &GlobalOpts) -> Result<ResolvedProfile, CliError> {
    let cfg = load_config_or_default();
    let name = active_profile_name(global, &cfg);

    let profile = match cfg.profiles.get(&name) {
        Some(profile) => profile.clone(),
        None if global.server.is_some() => Profile::default(),
        None if global.profile.is_some() => {
            return Err(CliError::ProfileNotFound {
                name,
                available: available_profiles(),
            });
        }
        None => {
            return Err(CliError::NoConfig {
                path: config_path().display().to_string(),
            });
        }
    };

    let console = apply_overrides(&profile, &cfg.defaults, global)?;
    Ok(ResolvedProfile {
        name,
        profile,
        console,
    })
}

/// Translate a `Profile` + global flags into a `ConsoleConfig`.
///
/// CLI flag overrides take priority over profile values, which take
/// priority over `[defaults]`.
fn apply_overrides(
    profile: &Profile,
    defaults: &Defaults,
    global: &GlobalOpts,
) -> Result<ConsoleConfig, CliError> {
    let mut profile = profile.clone();
    if let Some(ref server) = global.server {
        profile.server.clone_from(server);
    }
    if profile.server.trim().is_empty() {
        return Err(CliError::Validation {
            field: "server".into(),
            reason: "no backend URL in profile; pass --server".into(),
        });
    }

    let mut console = roomctl_config::profile_to_console_config(&profile)?;

    if global.insecure || (profile.insecure.is_none() && defaults.insecure) {
        console.tls = TlsMode::DangerAcceptInvalid;
    }

    let seconds = global
        .timeout
        .or(profile.timeout)
        .unwrap_or(defaults.timeout);
    console.timeout = Duration::from_secs(seconds);

    Ok(console)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::Parser;

    use super::*;
    use crate::cli::Cli;

    fn global(args: &[&str]) -> GlobalOpts {
        let mut argv = vec!["roomctl"];
        argv.extend_from_slice(args);
        argv.push("whoami");
        Cli::try_parse_from(argv).unwrap().global
    }

    fn lab_profile() -> Profile {
        Profile {
            server: "https://rooms.lab:8443".into(),
            timeout: Some(12),
            ..Profile::default()
        }
    }

    #[test]
    fn flags_override_profile() {
        let console = apply_overrides(
            &lab_profile(),
            &Defaults::default(),
            &global(&["--server", "http://localhost:8000", "-k", "--timeout", "3"]),
        )
        .unwrap();
        assert_eq!(console.base_url.as_str(), "http://localhost:8000/");
        assert!(matches!(console.tls, TlsMode::DangerAcceptInvalid));
        assert_eq!(console.timeout, Duration::from_secs(3));
    }

    #[test]
    fn profile_timeout_beats_defaults() {
        let console =
            apply_overrides(&lab_profile(), &Defaults::default(), &global(&[])).unwrap();
        assert_eq!(console.base_url.as_str(), "https://rooms.lab:8443/");
        assert_eq!(console.timeout, Duration::from_secs(12));
        assert!(matches!(console.tls, TlsMode::System));
    }

    #[test]
    fn empty_server_is_rejected() {
        let err = apply_overrides(&Profile::default(), &Defaults::default(), &global(&[]))
            .unwrap_err();
        assert!(matches!(err, CliError::Validation { .. }));
    }
}
