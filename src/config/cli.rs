use crate::config::toml_config::TomlConfig;
use crate::config::{PipelineConfig, SyncSettings};
use crate::utils::error::Result;
use clap::{Parser, Subcommand};

#[derive(Debug, Clone, Parser)]
#[command(name = "canefrost-catalog")]
#[command(about = "Turns the Canefrost POS export into a sized, sorted storefront catalog")]
pub struct CliConfig {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// TOML file with paths, report and sync settings; flags override it
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Raw POS export (JSON array)
    #[arg(long, global = true)]
    pub input: Option<String>,

    /// Where `clean` writes; defaults to rewriting the input in place
    #[arg(long, global = true)]
    pub cleaned: Option<String>,

    /// Formatted inventory consumed by the later stages
    #[arg(long, global = true)]
    pub intermediate: Option<String>,

    /// Public inventory for the storefront
    #[arg(long, global = true)]
    pub output: Option<String>,

    /// Number of records listed in the console report
    #[arg(long, global = true)]
    pub sample_size: Option<usize>,

    #[arg(long, global = true)]
    pub sync_endpoint: Option<String>,

    #[arg(long, global = true)]
    pub sync_collection: Option<String>,

    #[arg(long, global = true, env = "CANEFROST_SYNC_TOKEN", hide_env_values = true)]
    pub sync_token: Option<String>,

    /// Stay in file-only mode even if a sync endpoint is configured
    #[arg(long, global = true)]
    pub no_sync: bool,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON lines")]
    pub log_json: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Clean, format, size, sort and publish in one go (default)
    Run,
    /// Strip the POS export down to the catalog fields
    Clean,
    /// Map cleaned records onto the catalog schema
    Format,
    /// Assign sizes and sort the formatted inventory
    Size,
    /// Write the public inventory from the formatted inventory
    Publish,
    /// Print category and size summaries of the formatted inventory
    Report,
    /// Push the formatted inventory to the remote catalog
    Sync,
}

impl CliConfig {
    pub fn command(&self) -> Command {
        self.command.unwrap_or(Command::Run)
    }

    pub fn load_toml(&self) -> Result<Option<TomlConfig>> {
        self.config
            .as_deref()
            .map(TomlConfig::from_file)
            .transpose()
    }

    /// Builds run settings from the optional TOML file, then applies flags on top.
    pub fn resolve(&self, file: Option<&TomlConfig>) -> Result<PipelineConfig> {
        let mut config = match file {
            Some(file) => file.to_pipeline_config()?,
            None => PipelineConfig::default(),
        };

        if let Some(input) = &self.input {
            config.paths.input_path = input.clone();
        }
        if let Some(cleaned) = &self.cleaned {
            config.paths.cleaned_path = Some(cleaned.clone());
        }
        if let Some(intermediate) = &self.intermediate {
            config.paths.intermediate_path = intermediate.clone();
        }
        if let Some(output) = &self.output {
            config.paths.output_path = output.clone();
        }
        if let Some(sample_size) = self.sample_size {
            config.sample_size = sample_size;
        }

        if let Some(endpoint) = &self.sync_endpoint {
            match config.sync.as_mut() {
                Some(sync) => sync.endpoint = endpoint.clone(),
                None => config.sync = Some(SyncSettings::new(endpoint.clone())),
            }
        }
        if let Some(sync) = config.sync.as_mut() {
            if let Some(collection) = &self.sync_collection {
                sync.collection = collection.clone();
            }
            if let Some(token) = &self.sync_token {
                sync.token = Some(token.clone());
            }
        }
        if self.no_sync {
            config.sync = None;
        }

        Ok(config)
    }
}
