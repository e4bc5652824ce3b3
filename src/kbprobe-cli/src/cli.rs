use clap::{Parser, Subcommand, ValueEnum};
use kbprobe_core::{Config, ModeKind};
use std::path::PathBuf;

use crate::report::ReportFormat;

#[derive(Parser)]
#[command(name = "kbprobe")]
#[command(about = "Connect to, bootstrap and inspect the knowledge-base vector store")]
#[command(version)]
pub struct Cli {
    /// Path to the JSON config file
    #[arg(long, global = true, default_value = "kbprobe.json")]
    pub config: String,

    /// Networked store host
    #[arg(long, global = true)]
    pub host: Option<String>,

    /// Networked store port
    #[arg(long, global = true)]
    pub port: Option<u16>,

    /// Embedded store directory
    #[arg(long, global = true)]
    pub path: Option<String>,

    /// Mode to try first
    #[arg(long, global = true, value_enum)]
    pub prefer: Option<Preference>,

    /// Also write JSON logs to this directory
    #[arg(long, global = true)]
    pub log_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Ensure the configured collection exists
    Init {
        /// Collection name (overrides config)
        #[arg(long)]
        name: Option<String>,
    },
    /// List collections with their vector schema
    Collections {
        #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
        format: ReportFormat,
    },
    /// Print a sample of records from a collection
    Sample {
        collection: String,
        /// Number of records (defaults to inspect.sample_limit)
        #[arg(short, long)]
        limit: Option<usize>,
        #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
        format: ReportFormat,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Preference {
    Networked,
    Embedded,
}

impl From<Preference> for ModeKind {
    fn from(p: Preference) -> Self {
        match p {
            Preference::Networked => ModeKind::Networked,
            Preference::Embedded => ModeKind::Embedded,
        }
    }
}

impl Cli {
    /// Apply command-line overrides on top of the loaded config
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(host) = &self.host {
            config.connection.host = host.clone();
        }
        if let Some(port) = self.port {
            config.connection.port = port;
        }
        if let Some(path) = &self.path {
            config.connection.path = path.clone();
        }
        if let Some(prefer) = self.prefer {
            config.connection.prefer(prefer.into());
        }
        if let Commands::Init { name: Some(name) } = &self.command {
            config.collection.name = name.clone();
        }
    }

    /// Whether stdout carries JSON for another program, so logs must stay off it
    pub fn machine_output(&self) -> bool {
        match &self.command {
            Commands::Collections { format } | Commands::Sample { format, .. } => {
                *format == ReportFormat::Json
            }
            Commands::Init { .. } => false,
        }
    }
}
