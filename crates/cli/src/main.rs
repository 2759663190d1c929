use crate::{commands::Commands, error::CliError, shutdown::ShutdownCoordinator};
use chrono::NaiveDate;
use clap::Parser;
use connectors::{
    http::{catalog::CatalogClient, page::HttpPageSource, upsert::UpsertClient},
    registry::FileOverrideRegistry,
    sink::{
        StatsSink,
        csv::{CsvProblemSink, CsvStatsSink, write_performance_summary},
        remote::RemoteStatsSink,
    },
};
use engine::{
    config::{Credentials, EngineConfig},
    error::EngineError,
    inspect::{EngineOptions, InspectionEngine, RunSinks},
    resolver::SchemaResolver,
    retention::RetentionSweep,
};
use model::identifiers::today_string;
use std::{path::Path, sync::Arc};
use tracing::{Level, error, info};

mod commands;
mod error;
mod output;
mod shutdown;

#[derive(Parser)]
#[command(name = "nullscan", version = "0.1.0", about = "Open data null inventory tool")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// 130 mirrors the shell convention for termination by SIGINT.
enum ExitCode {
    Success = 0,
    GeneralError = 1,
    ShutdownRequested = 130,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    let cli = Cli::parse();
    let shutdown = ShutdownCoordinator::install();

    let result = match cli.command {
        Commands::Inspect {
            config,
            csv,
            no_upsert,
        } => run_inspect(&config, csv, no_upsert, &shutdown).await,
        Commands::Catalog { config } => run_catalog(&config).await,
        Commands::Cleanup {
            config,
            before,
            apply,
        } => run_cleanup(&config, &before, apply).await,
    };

    let code = match result {
        Ok(()) if shutdown.is_shutdown_requested() => ExitCode::ShutdownRequested,
        Ok(()) => ExitCode::Success,
        Err(err) => {
            error!("{err}");
            ExitCode::GeneralError
        }
    };
    std::process::exit(code as i32);
}

fn http_client() -> Result<reqwest::Client, CliError> {
    reqwest::Client::builder()
        .build()
        .map_err(CliError::HttpClient)
}

fn upsert_client(
    client: reqwest::Client,
    config: &EngineConfig,
    credentials: &Credentials,
) -> UpsertClient {
    UpsertClient::new(
        client,
        &config.domain,
        credentials.app_token.clone(),
        &credentials.access.username,
        &credentials.access.password,
    )
}

async fn run_inspect(
    config_path: &str,
    csv: bool,
    no_upsert: bool,
    shutdown: &ShutdownCoordinator,
) -> Result<(), CliError> {
    let config = EngineConfig::load(Path::new(config_path))?;
    // Local resource failures are process-fatal: a broken deployment, not
    // a bad dataset.
    let credentials = Credentials::load(&config.credentials_file)?;
    let registry = FileOverrideRegistry::load(&config.schema_overrides)
        .map_err(EngineError::Registry)?;

    let client = http_client()?;
    let catalog = CatalogClient::new(
        client.clone(),
        &config.resource_root(),
        &config.catalog_api_id,
        config.page_limit,
    )
    .fetch_catalog()
    .await
    .map_err(CliError::Catalog)?;

    let date = today_string();
    let mut stats: Vec<Arc<dyn StatsSink>> = Vec::new();
    if !no_upsert {
        info!("Upserting statistics to the reporting datasets");
        stats.push(Arc::new(RemoteStatsSink::new(
            upsert_client(client.clone(), &config, &credentials),
            &credentials.overview_dataset.app_id,
            &credentials.field_dataset.app_id,
        )));
    }
    if csv {
        info!("Writing statistics to CSV files");
        stats.push(Arc::new(CsvStatsSink::create(&config.output_dir, &date)?));
    }
    let sinks = RunSinks {
        stats,
        problems: Arc::new(CsvProblemSink::create(&config.output_dir, &date)?),
    };

    let engine = InspectionEngine::new(
        Arc::new(HttpPageSource::new(client, &config.resource_root())),
        SchemaResolver::new(Arc::new(registry)),
        EngineOptions {
            resource_root: config.resource_root(),
            page_limit: config.page_limit,
            page_delay: config.page_delay(),
            skip_name_prefixes: config.skip_name_prefixes.clone(),
        },
    );

    let summary = engine
        .run(&catalog, &sinks, &shutdown.cancel_token())
        .await?;
    write_performance_summary(&config.output_dir, &date, &summary)?;
    output::print_summary(&summary);
    Ok(())
}

async fn run_catalog(config_path: &str) -> Result<(), CliError> {
    let config = EngineConfig::load(Path::new(config_path))?;
    let client = http_client()?;
    let catalog = CatalogClient::new(
        client,
        &config.resource_root(),
        &config.catalog_api_id,
        config.page_limit,
    )
    .fetch_catalog()
    .await
    .map_err(CliError::Catalog)?;
    output::print_catalog(&catalog)
}

async fn run_cleanup(config_path: &str, before: &str, apply: bool) -> Result<(), CliError> {
    let config = EngineConfig::load(Path::new(config_path))?;
    let credentials = Credentials::load(&config.credentials_file)?;
    let cutoff = NaiveDate::parse_from_str(before, "%Y-%m-%d")
        .map_err(|_| CliError::InvalidCutoffDate(before.to_string()))?;

    let client = http_client()?;
    let sweep = RetentionSweep::new(
        Arc::new(upsert_client(client, &config, &credentials)),
        config.page_limit,
        config.page_delay(),
    );

    for (label, dataset_id) in [
        ("overview", credentials.overview_dataset.app_id.as_str()),
        ("field", credentials.field_dataset.app_id.as_str()),
    ] {
        let report = sweep.collect(dataset_id, cutoff).await?;
        println!(
            "{label} dataset {dataset_id}: {} rows scanned, {} dated before {cutoff}",
            report.rows_scanned,
            report.outdated.len()
        );
        if apply {
            sweep.apply(dataset_id, &report.outdated).await?;
        } else {
            println!("Dry run; pass --apply to publish the deletes");
        }
    }
    Ok(())
}
