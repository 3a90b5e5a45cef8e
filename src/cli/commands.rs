//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Twinfield accounting data tap
#[derive(Parser, Debug)]
#[command(name = "twinfield-tap")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (JSON)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Inline config JSON
    #[arg(long, global = true)]
    pub config_json: Option<String>,

    /// State file (JSON)
    #[arg(short, long, global = true)]
    pub state: Option<PathBuf>,

    /// Inline state JSON
    #[arg(long, global = true)]
    pub state_json: Option<String>,

    /// Catalog file (JSON); only selected streams are synced
    #[arg(long, global = true)]
    pub catalog: Option<PathBuf>,

    /// Output format for non-sync commands
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Extract streams and emit records and state
    Sync,

    /// Print the catalog of available streams
    Discover,

    /// Test logon and company switch
    Check,

    /// List available stream names
    Streams,

    /// Dump the field definitions of one report
    BrowseFields {
        /// Report code, e.g. 410
        #[arg(long)]
        code: String,

        /// Write `<code>.txt` into this directory instead of stdout
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },

    /// Dump every browse field the remote offers
    AllBrowseFields {
        /// Write `browsefields.txt` into this directory instead of stdout
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one message per line)
    Json,
    /// Human-readable output
    Pretty,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sync_with_files() {
        let cli = Cli::parse_from([
            "twinfield-tap",
            "--config",
            "config.json",
            "--state",
            "state.json",
            "--catalog",
            "catalog.json",
            "sync",
        ]);
        assert!(matches!(cli.command, Commands::Sync));
        assert_eq!(cli.config, Some(PathBuf::from("config.json")));
        assert_eq!(cli.state, Some(PathBuf::from("state.json")));
        assert_eq!(cli.catalog, Some(PathBuf::from("catalog.json")));
        assert!(!cli.verbose);
        assert_eq!(cli.format, OutputFormat::Json);
    }

    #[test]
    fn test_parse_browse_fields() {
        let cli = Cli::parse_from([
            "twinfield-tap",
            "browse-fields",
            "--code",
            "410",
            "--output-dir",
            "out",
            "--verbose",
        ]);
        match cli.command {
            Commands::BrowseFields { code, output_dir } => {
                assert_eq!(code, "410");
                assert_eq!(output_dir, Some(PathBuf::from("out")));
            }
            other => panic!("unexpected command: {other:?}"),
        }
        assert!(cli.verbose);
    }

    #[test]
    fn test_browse_fields_requires_code() {
        assert!(Cli::try_parse_from(["twinfield-tap", "browse-fields"]).is_err());
    }
}
