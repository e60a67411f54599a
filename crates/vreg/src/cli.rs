//! Clap derive structures for the `vreg` CLI.
//!
//! Defines the command tree, global flags, and shared argument types.

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use vreg_core::vreg_api::LogType;

// ── Top-Level CLI ────────────────────────────────────────────────────

/// vreg -- manage a vehicle registry from the command line
#[derive(Debug, Parser)]
#[command(
    name = "vreg",
    version,
    about = "Manage vehicles, drivers, and vehicle logs in a Vehicle Registry",
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
    /// Registry API host, optionally with a port (overrides config)
    #[arg(long, global = true)]
    pub api_hostname: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "VREG_OUTPUT",
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
    #[arg(long, short = 'k', global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides config)
    #[arg(long, global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one key per line (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
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
    /// Manage registered vehicles
    #[command(alias = "v")]
    Vehicles(VehiclesArgs),

    /// Manage registered drivers
    #[command(alias = "d")]
    Drivers(DriversArgs),

    /// Manage vehicle entry/exit logs
    #[command(alias = "l")]
    Logs(LogsArgs),

    /// Manage CLI configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Shared List Arguments ────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Max results per page (defaults to config page_size, else server default)
    #[arg(long, short = 'l')]
    pub limit: Option<u32>,

    /// Page number
    #[arg(long)]
    pub page: Option<u32>,
}

// ── Vehicles ─────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct VehiclesArgs {
    #[command(subcommand)]
    pub command: VehiclesCommand,
}

#[derive(Debug, Subcommand)]
pub enum VehiclesCommand {
    /// List vehicles
    #[command(alias = "ls")]
    List(ListArgs),

    /// Show one vehicle
    Get {
        /// Vehicle number (plate)
        number: String,
    },

    /// Register a vehicle
    Create {
        /// Vehicle number (plate)
        number: String,
        #[arg(long)]
        brand: String,
        #[arg(long)]
        model: String,
    },

    /// Update a vehicle; omitted fields keep their current value
    Update {
        number: String,
        /// New brand (empty string clears it)
        #[arg(long)]
        brand: Option<String>,
        /// New model (empty string clears it)
        #[arg(long)]
        model: Option<String>,
    },

    /// Delete a vehicle
    #[command(alias = "rm")]
    Delete { number: String },
}

// ── Drivers ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct DriversArgs {
    #[command(subcommand)]
    pub command: DriversCommand,
}

#[derive(Debug, Subcommand)]
pub enum DriversCommand {
    /// List drivers
    #[command(alias = "ls")]
    List(ListArgs),

    /// Show one driver
    Get {
        /// Driver license ID
        license_id: String,
    },

    /// Register a driver
    Create {
        /// Driver license ID
        license_id: String,
        #[command(flatten)]
        names: DriverNames,
    },

    /// Update a driver; omitted names keep their current value
    Update {
        license_id: String,
        #[arg(long)]
        first_name: Option<String>,
        /// Empty string clears it
        #[arg(long)]
        second_name: Option<String>,
        #[arg(long)]
        surname: Option<String>,
        /// Empty string clears it
        #[arg(long)]
        second_surname: Option<String>,
    },

    /// Delete a driver
    #[command(alias = "rm")]
    Delete { license_id: String },
}

#[derive(Debug, Args)]
pub struct DriverNames {
    #[arg(long)]
    pub first_name: String,
    #[arg(long)]
    pub second_name: Option<String>,
    #[arg(long)]
    pub surname: String,
    #[arg(long)]
    pub second_surname: Option<String>,
}

// ── Vehicle logs ─────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct LogsArgs {
    #[command(subcommand)]
    pub command: LogsCommand,
}

#[derive(Debug, Subcommand)]
pub enum LogsCommand {
    /// List vehicle logs
    #[command(alias = "ls")]
    List {
        #[command(flatten)]
        list: ListArgs,

        /// Only logs for this vehicle
        #[arg(long)]
        vehicle_number: Option<String>,

        /// Only logs for this driver
        #[arg(long)]
        driver_license_id: Option<String>,

        /// Only logs on this day (YYYY-MM-DD)
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Show one log entry
    Get { id: u64 },

    /// Record a vehicle entry or exit
    ///
    /// Vehicle and driver are picked interactively when omitted.
    Create {
        #[arg(long)]
        vehicle_number: Option<String>,
        #[arg(long)]
        driver_license_id: Option<String>,
        /// entry or exit
        #[arg(long)]
        log_type: LogType,
        /// Odometer reading in kilometers
        #[arg(long)]
        mileage: f64,
    },

    /// Update a log entry; omitted fields keep their current value
    Update {
        id: u64,
        #[arg(long)]
        log_type: Option<LogType>,
        #[arg(long)]
        mileage: Option<f64>,
    },

    /// Delete a log entry
    #[command(alias = "rm")]
    Delete { id: u64 },
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create the config file with guided setup
    Init,

    /// Display the resolved configuration
    Show,

    /// Print the config file path
    Path,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
