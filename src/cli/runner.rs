//! CLI runner - executes commands

use crate::catalog::Catalog;
use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::client::ExtractionClient;
use crate::config::TapConfig;
use crate::decode::pretty_print;
use crate::engine::{SyncConfig, SyncEngine, SyncStats};
use crate::error::{Error, Result};
use crate::http::SoapTransport;
use crate::output::{RecordSink, SingerWriter};
use crate::queries::QueryStore;
use crate::session::Session;
use crate::state::StateManager;
use crate::streams::{StreamDefinition, StreamRegistry};
use serde_json::{json, Value};
use std::fs;
use std::path::Path;
use tracing::info;

/// File name `all-browse-fields` writes into an output directory
const ALL_BROWSE_FIELDS_FILE: &str = "browsefields.txt";

/// CLI runner
pub struct Runner {
    cli: Cli,
    registry: StreamRegistry,
}

impl Runner {
    /// Create a runner over the built-in stream registry
    pub fn new(cli: Cli) -> Result<Self> {
        Ok(Self::with_registry(cli, StreamRegistry::builtin()?))
    }

    pub fn with_registry(cli: Cli, registry: StreamRegistry) -> Self {
        Self { cli, registry }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Sync => {
                let mut sink = SingerWriter::stdout();
                self.sync_into(&mut sink).await?;
                Ok(())
            }
            Commands::Discover => self.discover(),
            Commands::Check => self.check().await,
            Commands::Streams => self.streams(),
            Commands::BrowseFields { code, output_dir } => {
                self.browse_fields(code, output_dir.as_deref()).await
            }
            Commands::AllBrowseFields { output_dir } => {
                self.all_browse_fields(output_dir.as_deref()).await
            }
        }
    }

    /// Load config; inline JSON takes precedence over the file
    fn load_config(&self) -> Result<TapConfig> {
        if let Some(json_str) = &self.cli.config_json {
            return TapConfig::from_json_str(json_str);
        }
        match &self.cli.config {
            Some(path) => TapConfig::from_file(path),
            None => Err(Error::config(
                "Config not specified (use --config or --config-json)",
            )),
        }
    }

    /// Load state
    fn load_state(&self) -> Result<StateManager> {
        // Inline state takes precedence
        if let Some(state_json) = &self.cli.state_json {
            StateManager::from_json(state_json)
        } else if let Some(path) = &self.cli.state {
            StateManager::from_file(path)
        } else {
            Ok(StateManager::in_memory())
        }
    }

    /// Streams to sync: the catalog's selection, or every stream
    fn selected_streams(&self) -> Result<Vec<&StreamDefinition>> {
        match &self.cli.catalog {
            Some(path) => Catalog::from_file(path)?.selection(&self.registry),
            None => Ok(self.registry.streams().iter().collect()),
        }
    }

    /// Build a closed client for `config`
    fn build_client(&self, config: &TapConfig) -> Result<ExtractionClient<SoapTransport>> {
        let transport = SoapTransport::new(config.soap_config())?;
        let session = Session::new(transport, config.credentials());
        ExtractionClient::new(
            session,
            self.registry.clone(),
            QueryStore::builtin(),
            &config.office,
        )
    }

    /// Sync the selected streams into `sink`.
    ///
    /// The session is opened once up front and closed at the end, also when
    /// the sync fails.
    pub async fn sync_into(&self, sink: &mut dyn RecordSink) -> Result<SyncStats> {
        let config = self.load_config()?;
        let state = self.load_state()?;
        let selection = self.selected_streams()?;
        info!(
            "Syncing {} streams: {}",
            selection.len(),
            selection
                .iter()
                .map(|s| s.name.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );

        let mut client = self.build_client(&config)?;
        client.open().await?;

        let result = {
            let engine = SyncEngine::new(&client, state, SyncConfig::new(config.start_date));
            engine.run(&selection, sink).await
        };
        let closed = client.close().await;

        let stats = result?;
        closed?;
        Ok(stats)
    }

    /// Print the catalog
    fn discover(&self) -> Result<()> {
        let catalog = Catalog::discover(&self.registry);
        self.output_message(&serde_json::to_value(&catalog)?);
        Ok(())
    }

    /// Log on, switch to the office and log off again.
    ///
    /// Any failure is returned, so the process exits non-zero.
    async fn check(&self) -> Result<()> {
        let config = self.load_config()?;
        let mut client = self.build_client(&config)?;

        client.open().await?;
        client.close().await?;
        info!("Connection check succeeded for office {}", config.office);
        Ok(())
    }

    /// List streams
    fn streams(&self) -> Result<()> {
        let streams: Vec<Value> = self
            .registry
            .streams()
            .iter()
            .map(|s| {
                json!({
                    "name": s.name,
                    "report_code": s.report_code,
                    "description": s.description,
                    "replication_method": s.replication_method,
                })
            })
            .collect();

        self.output_message(&json!({
            "type": "STREAMS",
            "streams": streams
        }));
        Ok(())
    }

    /// Dump one report's field definitions
    async fn browse_fields(&self, code: &str, output_dir: Option<&Path>) -> Result<()> {
        let config = self.load_config()?;
        let mut client = self.build_client(&config)?;
        client.open().await?;
        let result = client.browse_fields(code).await;
        client.close().await?;

        let text = pretty_print(&result?)?;
        write_or_print(&text, output_dir, &format!("{code}.txt"))
    }

    /// Dump every browse field
    async fn all_browse_fields(&self, output_dir: Option<&Path>) -> Result<()> {
        let config = self.load_config()?;
        let mut client = self.build_client(&config)?;
        client.open().await?;
        let result = client.all_browse_fields().await;
        client.close().await?;

        let text = pretty_print(&result?)?;
        write_or_print(&text, output_dir, ALL_BROWSE_FIELDS_FILE)
    }

    /// Output a message
    fn output_message(&self, msg: &Value) {
        match self.cli.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string(msg).unwrap_or_default());
            }
            OutputFormat::Pretty => {
                println!("{}", serde_json::to_string_pretty(msg).unwrap_or_default());
            }
        }
    }
}

/// Write `text` to `<dir>/<file_name>`, or print it when no directory is given
fn write_or_print(text: &str, dir: Option<&Path>, file_name: &str) -> Result<()> {
    match dir {
        Some(dir) => {
            fs::create_dir_all(dir)?;
            let path = dir.join(file_name);
            fs::write(&path, text)?;
            info!("Wrote {}", path.display());
        }
        None => println!("{text}"),
    }
    Ok(())
}
