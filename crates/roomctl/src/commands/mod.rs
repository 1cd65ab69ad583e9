//! Command dispatch: bridges CLI args -> console views -> output formatting.

pub mod auth;
pub mod config_cmd;
pub mod device_config;
pub mod devices;
pub mod measurements;
pub mod rooms;
pub mod stats;
pub mod users;
pub mod util;

use roomctl_core::Console;

use crate::cli::{Command, GlobalOpts};
use crate::config::ResolvedProfile;
use crate::error::CliError;

/// Dispatch a backend-bound command to the appropriate handler.
///
/// Everything except `login` and `logout` first resumes the stored session.
pub async fn dispatch(
    cmd: Command,
    console: &Console,
    profile: &ResolvedProfile,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Login(args) => return auth::login(console, profile, args, global).await,
        Command::Logout => return auth::logout(console, global),
        _ => {}
    }

    util::require_session(console).await?;

    match cmd {
        Command::Whoami => auth::whoami(console, global),
        Command::Rooms(args) => rooms::handle(console, args, global).await,
        Command::Devices(args) => devices::handle(console, args, global).await,
        Command::DeviceConfig(args) => device_config::handle(console, args, global).await,
        Command::Users(args) => users::handle(console, args, global).await,
        Command::Stats(args) => stats::handle(console, args, global).await,
        Command::Measurements(args) => measurements::handle(console, args, global).await,
        // Handled above or before dispatch
        Command::Login(_) | Command::Logout | Command::Config(_) | Command::Completions(_) => {
            Err(CliError::Internal("command dispatched twice".into()))
        }
    }
}
