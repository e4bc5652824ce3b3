use anyhow::Result;
use clap::Parser;
use kbprobe_core::{acquire_store, ensure_collection, inspect, Config, EnsureOutcome, StoreHandle};
use std::process::ExitCode;

mod cli;
mod report;
mod telemetry;

use cli::{Cli, Commands};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let _guard = telemetry::init_telemetry(cli.log_dir.as_deref(), cli.machine_output())?;

    let mut config = Config::load(&cli.config).unwrap_or_else(|e| {
        tracing::warn!("Failed to load {} ({}), using defaults", cli.config, e);
        Config::default()
    });
    cli.apply_overrides(&mut config);

    let modes = config.connection_modes();
    tracing::info!(
        "Connection order: {}",
        modes
            .iter()
            .map(|m| m.to_string())
            .collect::<Vec<_>>()
            .join(" -> ")
    );

    let store = acquire_store(&modes).await?;

    match cli.command {
        Commands::Init { .. } => init(&store, &config).await,
        Commands::Collections { format } => {
            let infos = inspect::describe_collections(&store).await?;
            let rendered = report::render_collections(&infos, format)?;
            println!("{}", rendered.trim_end());
            Ok(ExitCode::SUCCESS)
        }
        Commands::Sample {
            collection,
            limit,
            format,
        } => {
            let limit = limit.unwrap_or(config.inspect.sample_limit);
            let records = inspect::sample_records(&store, &collection, limit).await?;
            let fields = inspect::payload_fields(&records);
            let rendered = report::render_sample(&collection, &fields, &records, format)?;
            println!("{}", rendered.trim_end());
            Ok(ExitCode::SUCCESS)
        }
    }
}

async fn init(store: &StoreHandle, config: &Config) -> Result<ExitCode> {
    let spec = config.collection_spec();

    match ensure_collection(store, &spec).await? {
        EnsureOutcome::AlreadyExists => {
            println!("Collection '{}' already exists, nothing to do", spec.name);
            Ok(ExitCode::SUCCESS)
        }
        EnsureOutcome::Created => {
            println!(
                "Created collection '{}' (size={}, distance={}) via {}",
                spec.name,
                spec.vector_size,
                spec.distance,
                store.mode()
            );
            Ok(ExitCode::SUCCESS)
        }
        EnsureOutcome::Failed(reason) => {
            eprintln!("Could not create collection '{}': {}", spec.name, reason);
            eprintln!("Re-run `kbprobe init` once the store is healthy");
            Ok(ExitCode::FAILURE)
        }
    }
}
