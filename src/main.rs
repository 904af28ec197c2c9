use clap::Parser;
use prework_toolkit::core::ConfigProvider;
use prework_toolkit::utils::{logger, validation::Validate};
use prework_toolkit::{
    EtlEngine, LocalStorage, RankingsConfig, RankingsPipeline, RankingsTomlConfig, ToolkitError,
};

async fn run<C: ConfigProvider + Validate>(config: C, monitor: bool) -> Result<String, ToolkitError> {
    config.validate()?;

    let storage = LocalStorage::new(config.output_path());
    let pipeline = RankingsPipeline::new(storage, config)?;
    let engine = EtlEngine::new_with_monitoring(pipeline, monitor);

    engine.run().await
}

#[tokio::main]
async fn main() {
    let cli = RankingsConfig::parse();

    // 初始化日誌
    if cli.log_json {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting rankings scraper");
    tracing::debug!("CLI config: {:?}", cli);

    if cli.monitor {
        tracing::info!("🔍 System monitoring enabled");
    }

    let result = match cli.config.clone() {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path);
            match RankingsTomlConfig::from_file(&path) {
                Ok(config) => {
                    let monitor = cli.monitor || config.monitoring_enabled();
                    run(config, monitor).await
                }
                Err(e) => Err(e),
            }
        }
        None => {
            let monitor = cli.monitor;
            run(cli, monitor).await
        }
    };

    match result {
        Ok(output_path) => {
            tracing::info!("✅ Rankings scraped successfully");
            println!("✅ Rankings saved to: {}", output_path);
        }
        Err(e) => {
            tracing::error!(
                "❌ Rankings pipeline failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
            std::process::exit(e.severity().exit_code());
        }
    }
}
