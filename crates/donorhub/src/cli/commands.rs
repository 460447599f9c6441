//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

use crate::directory::SortKey;
use crate::donor::BloodType;

/// Parse a blood type given as its display string, e.g. `A+` or `o-`.
fn parse_blood_type(raw: &str) -> Result<BloodType, String> {
    raw.parse().map_err(|_| {
        format!(
            "unknown blood type '{raw}' (expected one of: {})",
            BloodType::ALL.map(|bt| bt.to_string()).join(", ")
        )
    })
}

/// Apply command arguments.
#[derive(Debug, Args)]
pub struct ApplyCommand {
    /// Your blood type (A+, A-, B+, B-, AB+, AB-, O+, O-)
    #[arg(short, long, value_parser = parse_blood_type)]
    pub blood_type: BloodType,

    /// Your age in years (donors are expected to be 18-65)
    #[arg(short, long, value_parser = clap::value_parser!(u8).range(18..=65))]
    pub age: u8,

    /// City or area where you can donate
    #[arg(short, long)]
    pub location: String,

    /// Phone number or email; defaults to the one on your profile
    #[arg(long)]
    pub contact: Option<String>,

    /// Date of your most recent donation, if any
    #[arg(long)]
    pub last_donation: Option<String>,
}

/// Donors listing command arguments.
#[derive(Debug, Args)]
pub struct DonorsCommand {
    /// Only show donors with this blood type
    #[arg(short, long, value_parser = parse_blood_type)]
    pub blood_type: Option<BloodType>,

    /// Search donors by name or location
    #[arg(short, long)]
    pub search: Option<String>,

    /// Sort order
    #[arg(long, value_enum)]
    pub sort: Option<SortArg>,

    /// Maximum number of results (0 for unlimited)
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

/// Stats command arguments.
#[derive(Debug, Args)]
pub struct StatsCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Profile commands.
#[derive(Debug, Subcommand)]
pub enum ProfileCommand {
    /// Show the saved profile and its completeness score
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Create or update the saved profile
    Update(UpdateProfileArgs),

    /// Remove the saved profile (logs you out)
    Clear,
}

/// Fields accepted when updating the saved profile.
///
/// Flags that are omitted keep their previously saved value.
#[derive(Debug, Default, Args)]
pub struct UpdateProfileArgs {
    /// Account identifier; assigned automatically if never set
    #[arg(long)]
    pub id: Option<String>,

    /// Full name
    #[arg(long)]
    pub name: Option<String>,

    /// Email address
    #[arg(long)]
    pub email: Option<String>,

    /// Mobile number
    #[arg(long)]
    pub mobile: Option<String>,

    /// Blood type (A+, A-, B+, B-, AB+, AB-, O+, O-)
    #[arg(long)]
    pub blood_type: Option<String>,

    /// Age in years
    #[arg(long)]
    pub age: Option<String>,

    /// Gender
    #[arg(long)]
    pub gender: Option<String>,

    /// Present address
    #[arg(long)]
    pub present_address: Option<String>,

    /// Permanent address
    #[arg(long)]
    pub permanent_address: Option<String>,

    /// Occupation
    #[arg(long)]
    pub occupation: Option<String>,

    /// Education
    #[arg(long)]
    pub education: Option<String>,

    /// Interests
    #[arg(long)]
    pub interests: Option<String>,

    /// Hobbies
    #[arg(long)]
    pub hobbies: Option<String>,
}

/// Feedback commands.
#[derive(Debug, Subcommand)]
pub enum FeedbackCommand {
    /// Leave feedback about the service
    Add {
        /// Star rating, 0 to 5
        #[arg(short, long, value_parser = clap::value_parser!(u8).range(0..=5))]
        rating: u8,

        /// Mood tag, e.g. happy, neutral, sad
        #[arg(short, long)]
        mood: Option<String>,

        /// The feedback text
        comment: String,
    },

    /// List feedback you have left
    List {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },
}

/// Banner commands.
#[derive(Debug, Subcommand)]
pub enum BannerCommand {
    /// Dismiss the donation banner permanently
    Close,

    /// Show whether the donation banner is dismissed
    Status,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Sort order argument for directory listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortArg {
    /// Most recent applications first
    Newest,
    /// Oldest applications first
    Oldest,
    /// Alphabetical by donor name
    Name,
}

impl From<SortArg> for SortKey {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Newest => Self::Newest,
            SortArg::Oldest => Self::Oldest,
            SortArg::Name => Self::Name,
        }
    }
}

/// Output format for commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Plain text output
    #[default]
    Plain,
    /// Formatted table
    Table,
    /// JSON output
    Json,
}
