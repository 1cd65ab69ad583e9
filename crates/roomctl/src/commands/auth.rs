//! Session command handlers: login, logout, whoami.

use dialoguer::Input;
use secrecy::SecretString;

use roomctl_config::ConfigError;
use roomctl_core::{Console, Identity};

use crate::cli::{GlobalOpts, LoginArgs};
use crate::config::ResolvedProfile;
use crate::error::CliError;
use crate::output;

fn detail(identity: &Identity) -> String {
    [
        format!("Username: {}", identity.username),
        format!("Role:     {}", identity.role),
    ]
    .join("\n")
}

/// Resolve credentials (flag > profile > prompt), log in, persist the token.
pub async fn login(
    console: &Console,
    resolved: &ResolvedProfile,
    args: LoginArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let username = match args.username.or_else(|| resolved.profile.username.clone()) {
        Some(u) => u,
        None => Input::new()
            .with_prompt("Username")
            .interact_text()
            .map_err(|e| CliError::Prompt(e.to_string()))?,
    };

    let password = match roomctl_config::resolve_password(&resolved.profile, &resolved.name) {
        Ok(pw) => pw,
        Err(ConfigError::NoCredentials { .. }) => {
            let raw = rpassword::prompt_password("Password: ")
                .map_err(|e| CliError::Prompt(e.to_string()))?;
            SecretString::from(raw)
        }
        Err(e) => return Err(e.into()),
    };

    if !console.login(&username, &password).await {
        return Err(CliError::LoginFailed {
            profile: resolved.name.clone(),
        });
    }

    let identity = console.require_identity()?;
    if !global.quiet {
        eprintln!(
            "Logged in as {} ({}) on profile '{}'",
            identity.username, identity.role, resolved.name
        );
    }
    Ok(())
}

pub fn logout(console: &Console, global: &GlobalOpts) -> Result<(), CliError> {
    console.logout();
    if !global.quiet {
        eprintln!("Logged out");
    }
    Ok(())
}

pub fn whoami(console: &Console, global: &GlobalOpts) -> Result<(), CliError> {
    let identity = console.require_identity()?;
    let out = output::render_single(&global.output, identity.as_ref(), detail, |i| {
        i.username.clone()
    });
    output::print_output(&out, global.quiet);
    Ok(())
}
