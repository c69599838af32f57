//! CLI module for vidsum.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use crate::config::{DiscoveryProvider, Settings, TranscriptProvider};
use clap::{Parser, Subcommand};

/// vidsum - YouTube research summaries
///
/// Searches YouTube, summarizes each video from its transcript, and merges the
/// summaries into one.
#[derive(Parser, Debug)]
#[command(name = "vidsum")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Override the discovery provider (api, ytdlp)
    #[arg(long, global = true, env = "VIDSUM_DISCOVERY")]
    pub discovery: Option<DiscoveryProvider>,

    /// Override the transcript provider (service, ytdlp)
    #[arg(long, global = true, env = "VIDSUM_TRANSCRIPTS")]
    pub transcripts: Option<TranscriptProvider>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Apply provider overrides given on the command line.
    pub fn apply_overrides(&self, settings: &mut Settings) {
        if let Some(provider) = self.discovery {
            settings.discovery.provider = provider;
        }
        if let Some(provider) = self.transcripts {
            settings.transcript.provider = provider;
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Search, summarize every result, and merge into one summary
    Run {
        /// Search query
        query: String,

        /// How many videos to summarize (clamped to 1-50); also sets the merge detail level
        #[arg(short, long, allow_negative_numbers = true)]
        depth: Option<i64>,

        /// Custom summarization style (defaults to the configured style)
        #[arg(short, long)]
        style: Option<String>,

        /// Print each video's summary as well as the merged one
        #[arg(long)]
        show_items: bool,

        /// Write a report of the run to this file
        #[arg(short, long)]
        output: Option<String>,

        /// Report format when using --output (markdown, json)
        #[arg(long, default_value = "markdown")]
        format: String,
    },

    /// Only run discovery and list the videos a run would use
    Search {
        /// Search query
        query: String,

        /// Number of videos (clamped to 1-50)
        #[arg(short = 'n', long, default_value = "5")]
        count: i64,
    },

    /// Start HTTP API server
    Serve {
        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port to bind to
        #[arg(short, long, default_value = "3000")]
        port: u16,
    },

    /// Check system requirements and configuration
    Doctor,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Write the current configuration to the config file
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Open configuration file in editor
    Edit,

    /// Show configuration file path
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_run() {
        let cli = Cli::try_parse_from([
            "vidsum", "-v", "run", "chess tutorial", "--depth", "3", "--style", "short",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 1);
        match cli.command {
            Commands::Run {
                query,
                depth,
                style,
                show_items,
                ..
            } => {
                assert_eq!(query, "chess tutorial");
                assert_eq!(depth, Some(3));
                assert_eq!(style.as_deref(), Some("short"));
                assert!(!show_items);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_provider_overrides() {
        let cli = Cli::try_parse_from([
            "vidsum", "search", "rust", "--discovery", "yt-dlp", "--transcripts", "ytdlp",
        ])
        .unwrap();
        let mut settings = Settings::default();
        cli.apply_overrides(&mut settings);
        assert_eq!(settings.discovery.provider, DiscoveryProvider::Ytdlp);
        assert_eq!(settings.transcript.provider, TranscriptProvider::Ytdlp);

        assert!(Cli::try_parse_from(["vidsum", "--discovery", "bing", "doctor"]).is_err());
    }

    #[test]
    fn test_parse_search_default_count() {
        let cli = Cli::try_parse_from(["vidsum", "search", "rust"]).unwrap();
        assert!(matches!(cli.command, Commands::Search { count: 5, .. }));
    }
}
