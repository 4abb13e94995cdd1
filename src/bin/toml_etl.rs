use clap::Parser;
use engagement_etl::core::aggregator::aggregate;
use engagement_etl::core::classifier::qualifies;
use engagement_etl::core::{ConfigProvider, TableSource};
use engagement_etl::utils::{logger, validation::Validate};
use engagement_etl::{
    CsvTableSink, CsvTableSource, EngagementPipeline, EtlEngine, LocalStorage, PipelineSettings,
    TomlConfig,
};

#[derive(Parser)]
#[command(name = "toml-etl")]
#[command(about = "Engagement analysis driven by a TOML configuration file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "engagement.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override monitoring setting from config
    #[arg(long)]
    monitor: Option<bool>,

    /// Override the percentage threshold from config
    #[arg(long)]
    threshold: Option<f64>,

    /// Read and count the input without writing results
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // 載入 TOML 配置
    let mut config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    // 初始化日誌
    logger::init_cli_logger(args.verbose || config.debug_logging());
    tracing::info!("🚀 Starting TOML-based engagement analysis");
    tracing::info!("📁 Loaded configuration from: {}", args.config);

    // 應用命令列覆蓋設定
    if let Some(threshold) = args.threshold {
        config.analysis.threshold = Some(threshold);
        tracing::info!("🔧 Threshold overridden to: {}", threshold);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    tracing::info!("✅ Configuration loaded and validated successfully");
    display_config_summary(&config, &args);

    let source = CsvTableSource::new(
        LocalStorage::new(".".to_string()),
        config.input_path(),
        config.malformed_policy(),
    );

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No output will be written");
        perform_dry_run(&source).await?;
        return Ok(());
    }

    let monitor_enabled = args.monitor.unwrap_or_else(|| config.monitoring_enabled());
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    let sink = CsvTableSink::new(
        LocalStorage::new(config.output_path().to_string()),
        config.output_path(),
        ConfigProvider::output_file(&config),
    );
    let pipeline = EngagementPipeline::new(source, sink, PipelineSettings::from_config(&config));
    let engine = EtlEngine::new_with_monitoring(pipeline, monitor_enabled);

    match engine.run().await {
        Ok(summary) => {
            tracing::info!("✅ ETL process completed successfully!");
            println!("✅ ETL process completed successfully!");
            println!(
                "📊 {} of {} departments above {}%",
                summary.departments_retained, summary.departments_seen, summary.threshold
            );
            println!("📁 Output saved to: {}", summary.output_location);
        }
        Err(e) => {
            tracing::error!(
                "❌ ETL process failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());

            let exit_code = e.exit_code();
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

fn display_config_summary(config: &TomlConfig, args: &Args) {
    println!("📋 Configuration Summary:");
    println!(
        "  Pipeline: {} v{}",
        config.pipeline.name,
        config.pipeline.version.as_deref().unwrap_or("0")
    );
    if let Some(description) = &config.pipeline.description {
        println!("  Description: {}", description);
    }
    println!("  Input: {}", config.input_path());
    println!("  Malformed cells: {:?}", config.malformed_policy());
    println!(
        "  Output: {}/{}",
        config.output_path(),
        ConfigProvider::output_file(config)
    );
    println!("  Threshold: > {}%", config.threshold());
    println!("  Partitions: {}", config.partitions());

    if args.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }

    println!();
}

async fn perform_dry_run<S: TableSource>(source: &S) -> Result<(), Box<dyn std::error::Error>> {
    println!("🔍 Dry Run Analysis:");

    let records = source.read_records().await?;
    let qualifying = records.iter().filter(|r| qualifies(r)).count();
    let departments = aggregate(&records).len();

    println!("  Records: {}", records.len());
    println!("  Qualifying employees: {}", qualifying);
    println!("  Departments: {}", departments);
    println!();
    println!("✅ Dry run analysis complete. Use --verbose for more details during actual run.");

    Ok(())
}
