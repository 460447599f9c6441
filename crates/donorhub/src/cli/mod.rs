//! Command-line interface for donorhub.
//!
//! This module provides the CLI structure and command handlers for the
//! `donorhub` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    ApplyCommand, BannerCommand, ConfigCommand, DonorsCommand, FeedbackCommand, OutputFormat,
    ProfileCommand, SortArg, StatsCommand, UpdateProfileArgs,
};

/// donorhub - A local blood-donor registry
///
/// Keeps donor applications in a local store, lets you browse and filter
/// the donor directory, and tracks how complete your own profile is.
#[derive(Debug, Parser)]
#[command(name = "donorhub")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Apply to become a blood donor
    Apply(ApplyCommand),

    /// Browse the donor directory
    Donors(DonorsCommand),

    /// Show registry statistics
    Stats(StatsCommand),

    /// View or edit the saved profile
    #[command(subcommand)]
    Profile(ProfileCommand),

    /// Leave or review feedback
    #[command(subcommand)]
    Feedback(FeedbackCommand),

    /// Manage the donation banner
    #[command(subcommand)]
    Banner(BannerCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        if self.quiet {
            crate::logging::Verbosity::Quiet
        } else {
            match self.verbose {
                0 => crate::logging::Verbosity::Normal,
                1 => crate::logging::Verbosity::Verbose,
                _ => crate::logging::Verbosity::Trace,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_name() {
        let cli = Cli::command();
        assert_eq!(cli.get_name(), "donorhub");
    }

    #[test]
    fn test_cli_verify() {
        // Verify the CLI structure is valid
        Cli::command().debug_assert();
    }

    #[test]
    fn test_verbosity_quiet() {
        let cli = Cli {
            config: None,
            verbose: 0,
            quiet: true,
            command: Command::Stats(StatsCommand { json: false }),
        };
        assert_eq!(cli.verbosity(), crate::logging::Verbosity::Quiet);
    }

    #[test]
    fn test_verbosity_normal() {
        let cli = Cli {
            config: None,
            verbose: 0,
            quiet: false,
            command: Command::Stats(StatsCommand { json: false }),
        };
        assert_eq!(cli.verbosity(), crate::logging::Verbosity::Normal);
    }

    #[test]
    fn test_verbosity_verbose() {
        let cli = Cli {
            config: None,
            verbose: 1,
            quiet: false,
            command: Command::Stats(StatsCommand { json: false }),
        };
        assert_eq!(cli.verbosity(), crate::logging::Verbosity::Verbose);
    }

    #[test]
    fn test_verbosity_trace() {
        let cli = Cli {
            config: None,
            verbose: 2,
            quiet: false,
            command: Command::Stats(StatsCommand { json: false }),
        };
        assert_eq!(cli.verbosity(), crate::logging::Verbosity::Trace);
    }

    #[test]
    fn test_parse_apply() {
        let args = vec![
            "donorhub",
            "apply",
            "-b",
            "A+",
            "-a",
            "25",
            "-l",
            "Dhaka",
            "--contact",
            "0170000000",
        ];
        let cli = Cli::try_parse_from(args).unwrap();
        assert!(matches!(cli.command, Command::Apply(_)));
    }

    #[test]
    fn test_parse_apply_rejects_out_of_range_age() {
        let args = vec!["donorhub", "apply", "-b", "A+", "-a", "17", "-l", "Dhaka"];
        assert!(Cli::try_parse_from(args).is_err());
    }

    #[test]
    fn test_parse_donors_with_filters() {
        let args = vec![
            "donorhub", "donors", "-b", "O-", "-s", "dhaka", "--sort", "name",
        ];
        let cli = Cli::try_parse_from(args).unwrap();
        match cli.command {
            Command::Donors(cmd) => {
                assert!(cmd.blood_type.is_some());
                assert_eq!(cmd.search.as_deref(), Some("dhaka"));
                assert_eq!(cmd.sort, Some(SortArg::Name));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_stats() {
        let args = vec!["donorhub", "stats"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert!(matches!(cli.command, Command::Stats(_)));
    }

    #[test]
    fn test_parse_profile_update() {
        let args = vec!["donorhub", "profile", "update", "--name", "Alice Rahman"];
        let cli = Cli::try_parse_from(args).unwrap();
        match cli.command {
            Command::Profile(ProfileCommand::Update(args)) => {
                assert_eq!(args.name.as_deref(), Some("Alice Rahman"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_feedback_add() {
        let args = vec!["donorhub", "feedback", "add", "-r", "5", "Great service"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert!(matches!(
            cli.command,
            Command::Feedback(FeedbackCommand::Add { .. })
        ));
    }

    #[test]
    fn test_parse_with_config() {
        let args = vec!["donorhub", "-c", "/custom/config.toml", "stats"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/custom/config.toml")));
    }

    #[test]
    fn test_parse_with_verbose() {
        let args = vec!["donorhub", "-v", "stats"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert_eq!(cli.verbose, 1);
    }

    #[test]
    fn test_parse_with_quiet() {
        let args = vec!["donorhub", "-q", "stats"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert!(cli.quiet);
    }
}
