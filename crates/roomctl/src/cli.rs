//! Clap derive structures for the `roomctl` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use roomctl_core::model::mac::is_valid_mac;

// ── Top-Level CLI ────────────────────────────────────────────────────

/// roomctl -- operator console for rooms, sensor devices and users
#[derive(Debug, Parser)]
#[command(
    name = "roomctl",
    version,
    about = "Administer rooms, sensor devices and users from the command line",
    long_about = "An operator console for the room/device/sensor backend.\n\n\
        Logs in once, keeps the bearer token per profile, and reloads the\n\
        affected collection after every change so what you see is what the\n\
        server holds.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Backend profile to use
    #[arg(long, short = 'p', env = "ROOMCTL_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Backend base URL (overrides profile)
    #[arg(long, short = 's', env = "ROOMCTL_SERVER", global = true)]
    pub server: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "ROOMCTL_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "ROOMCTL_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "ROOMCTL_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Log in and persist the session token
    Login(LoginArgs),

    /// Drop the stored session token
    Logout,

    /// Show the identity confirmed by the backend
    Whoami,

    /// Manage rooms and their devices
    #[command(alias = "r")]
    Rooms(RoomsArgs),

    /// Manage sensor devices
    #[command(alias = "dev", alias = "d")]
    Devices(DevicesArgs),

    /// Export, import and edit device configuration blobs
    #[command(alias = "cfg")]
    DeviceConfig(DeviceConfigArgs),

    /// Manage users, roles and bans
    #[command(alias = "u")]
    Users(UsersArgs),

    /// Query aggregate statistics
    Stats(StatsArgs),

    /// Export raw measurements
    Measurements(MeasurementsArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Value parsers ────────────────────────────────────────────────────

/// Clap value parser: reject malformed MAC addresses before any request.
fn parse_mac(raw: &str) -> Result<String, String> {
    if is_valid_mac(raw) {
        Ok(raw.to_owned())
    } else {
        Err(format!(
            "'{raw}' is not a MAC address (expected AA:BB:CC:DD:EE:FF)"
        ))
    }
}

// ── Auth ─────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Username (defaults to the profile's username)
    #[arg(long, short = 'u')]
    pub username: Option<String>,
}

// ── Rooms ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct RoomsArgs {
    #[command(subcommand)]
    pub command: RoomsCommand,
}

#[derive(Debug, Subcommand)]
pub enum RoomsCommand {
    /// List rooms
    #[command(alias = "ls")]
    List,

    /// Show one room
    Show {
        /// Room ID
        id: i64,
    },

    /// List the devices assigned to a room
    Devices {
        /// Room ID
        id: i64,
    },

    /// Create a room
    Create {
        /// Room name
        name: String,

        /// Device MAC to assign (repeatable)
        #[arg(long = "mac", short = 'm', value_parser = parse_mac)]
        macs: Vec<String>,
    },

    /// Rename a room
    Rename {
        /// Room ID
        id: i64,
        /// New name
        name: String,
    },

    /// Delete a room
    #[command(alias = "rm")]
    Delete {
        /// Room ID
        id: i64,
    },
}

// ── Devices ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct DevicesArgs {
    #[command(subcommand)]
    pub command: DevicesCommand,
}

#[derive(Debug, Subcommand)]
pub enum DevicesCommand {
    /// List devices
    #[command(alias = "ls")]
    List,

    /// Show one device with its latest measurement
    Get {
        /// Device MAC address
        #[arg(value_parser = parse_mac)]
        mac: String,
    },

    /// Register a device
    Add {
        /// Device MAC address
        #[arg(value_parser = parse_mac)]
        mac: String,
    },

    /// Remove a device
    #[command(alias = "rm")]
    Remove {
        /// Device MAC address
        #[arg(value_parser = parse_mac)]
        mac: String,
    },
}

// ── Device configuration ─────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct DeviceConfigArgs {
    #[command(subcommand)]
    pub command: DeviceConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum DeviceConfigCommand {
    /// Download configuration for one device, or for all of them
    Export {
        /// Restrict to one device ID
        #[arg(long)]
        device: Option<i64>,

        /// Output directory or file path (default: server-provided name in cwd)
        #[arg(long, short = 'O')]
        out: Option<PathBuf>,
    },

    /// Upload a configuration file
    Import {
        /// Room whose detail view is reloaded afterwards
        #[arg(long)]
        room: i64,

        /// JSON file to upload
        file: PathBuf,

        /// Apply to one device ID
        #[arg(long)]
        device: Option<i64>,
    },

    /// Set one key of a stored configuration
    Set {
        /// Configuration ID
        config_id: i64,
        /// Key to set
        key: String,
        /// New value
        value: String,
    },
}

// ── Users ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct UsersArgs {
    #[command(subcommand)]
    pub command: UsersCommand,
}

#[derive(Debug, Subcommand)]
pub enum UsersCommand {
    /// List users
    #[command(alias = "ls")]
    List {
        /// Case-insensitive username filter
        #[arg(long)]
        search: Option<String>,
    },

    /// Promote a manager to admin
    Promote {
        /// Username
        username: String,
    },

    /// Ban a manager
    Ban {
        /// Username
        username: String,
    },

    /// Lift a ban
    Unban {
        /// Username
        username: String,
    },
}

// ── Statistics ───────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct StatsArgs {
    /// Range start (RFC 3339); requires --to
    #[arg(long, requires = "to", conflicts_with = "days")]
    pub from: Option<String>,

    /// Range end (RFC 3339); requires --from
    #[arg(long, requires = "from", conflicts_with = "days")]
    pub to: Option<String>,

    /// Range ending now, this many days long
    #[arg(long, default_value = "7")]
    pub days: u32,

    /// Restrict to one device ID
    #[arg(long)]
    pub device: Option<i64>,
}

// ── Measurements ─────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct MeasurementsArgs {
    #[command(subcommand)]
    pub command: MeasurementsCommand,
}

#[derive(Debug, Subcommand)]
pub enum MeasurementsCommand {
    /// Export every stored measurement
    Export,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Interactive configuration wizard
    Init,

    /// Show the current configuration (secrets masked)
    Show,

    /// List profile names
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name
        name: String,
    },

    /// Store a profile's password in the system keyring
    SetPassword {
        /// Profile name (defaults to the active profile)
        #[arg(long)]
        profile: Option<String>,
    },
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mac_parser_rejects_garbage() {
        assert!(parse_mac("AA:BB:CC:DD:EE:FF").is_ok());
        assert!(parse_mac("aa-bb-cc-dd-ee-ff").is_ok());
        assert!(parse_mac("AA:BB:CC:DD:EE").is_err());
        assert!(parse_mac("GG:BB:CC:DD:EE:FF").is_err());
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
