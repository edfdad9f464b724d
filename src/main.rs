use canefrost_catalog::app::report;
use canefrost_catalog::utils::{logger, validation::Validate};
use canefrost_catalog::{
    select_catalog_sync, CatalogError, CatalogPipeline, CliConfig, Command, EtlEngine,
    LocalStorage, PipelineConfig,
};
use clap::Parser;

async fn execute(command: Command, config: PipelineConfig) -> Result<(), CatalogError> {
    let sample_size = config.sample_size;
    let sync = select_catalog_sync(config.sync.as_ref());
    let pipeline = CatalogPipeline::new(LocalStorage::new("."), config).with_sync(sync);

    match command {
        Command::Run => {
            let engine = EtlEngine::new(pipeline);
            let summary = engine.run().await?;
            report::print_run_summary(&summary);
        }
        Command::Clean => {
            let (_, summary) = pipeline.run_clean().await?;
            report::print_clean_summary(&summary);
        }
        Command::Format => {
            let catalog = pipeline.run_format().await?;
            println!("Formatted {} products", catalog.len());
        }
        Command::Size => {
            let catalog = pipeline.run_size().await?;
            println!("Size field added and products sorted");
            println!("{}", report::render_size_table(&catalog));
        }
        Command::Publish => {
            let (_, summary) = pipeline.run_publish().await?;
            report::print_publish_summary(&summary);
        }
        Command::Report => {
            let catalog = pipeline.load_catalog().await?;
            report::print_catalog_report(&catalog, sample_size);
        }
        Command::Sync => {
            if !pipeline.sync_backend().is_available() {
                tracing::warn!("No remote catalog client available, running in file-only mode");
            }
            let sync_report = pipeline.run_sync().await?;
            report::print_sync_report(&sync_report);
            if !sync_report.is_success() {
                return Err(CatalogError::SyncError {
                    message: format!("{} batch(es) failed", sync_report.batches_failed),
                });
            }
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 設定檔要先載入，日誌設定可能來自檔案
    let file = match cli.load_toml() {
        Ok(file) => file,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    let verbose = cli.verbose || file.as_ref().is_some_and(|f| f.verbose());
    if cli.log_json || file.as_ref().is_some_and(|f| f.json_logs()) {
        logger::init_json_logger(verbose);
    } else {
        logger::init_cli_logger(verbose);
    }

    let command = cli.command();
    tracing::info!("Starting canefrost-catalog {:?}", command);

    let config = match cli.resolve(file.as_ref()).and_then(|c| c.validate().map(|_| c)) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Configuration validation failed: {}", e);
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };
    tracing::debug!("Resolved config: {:?}", config);

    if let Err(e) = execute(command, config).await {
        tracing::error!(
            "{:?} failed: {} (Category: {:?}, Severity: {:?})",
            command,
            e,
            e.category(),
            e.severity()
        );
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(e.exit_code());
    }

    Ok(())
}
