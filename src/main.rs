use clap::Parser;
use engagement_etl::core::ConfigProvider;
use engagement_etl::utils::{logger, validation::Validate};
use engagement_etl::{
    CliConfig, CsvTableSink, CsvTableSource, EngagementPipeline, EtlEngine, EtlError, LocalStorage,
    PipelineSettings,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::parse();

    // 初始化日誌
    logger::init_logger(config.verbose, config.json_logs);

    tracing::info!("Starting engagement-etl CLI");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let monitor_enabled = config.monitor;
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    // 建立來源、輸出與管道
    let source = CsvTableSource::new(
        LocalStorage::new(".".to_string()),
        config.input_path(),
        config.malformed_policy(),
    );
    let sink = CsvTableSink::new(
        LocalStorage::new(config.output_path().to_string()),
        config.output_path(),
        config.output_file(),
    );
    let pipeline = EngagementPipeline::new(source, sink, PipelineSettings::from_config(&config));

    let engine = EtlEngine::new_with_monitoring(pipeline, monitor_enabled);

    match engine.run().await {
        Ok(summary) => {
            tracing::info!("✅ ETL process completed successfully!");
            if config.summary_json {
                match summary.to_json() {
                    Ok(json) => println!("{}", json),
                    Err(e) => report_failure(&e),
                }
            } else {
                println!("✅ ETL process completed successfully!");
                println!(
                    "📊 {} of {} departments above {}%",
                    summary.departments_retained, summary.departments_seen, summary.threshold
                );
                println!("📁 Output saved to: {}", summary.output_location);
            }
        }
        Err(e) => report_failure(&e),
    }

    Ok(())
}

fn report_failure(e: &EtlError) {
    tracing::error!(
        "❌ ETL process failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

    let exit_code = e.exit_code();
    if exit_code > 0 {
        std::process::exit(exit_code);
    }
}
