use clap::Parser;
use rec_etl::core::ConfigProvider;
use rec_etl::utils::{logger, validation::Validate};
use rec_etl::{run_scrape, TomlConfig};

#[derive(Parser)]
#[command(name = "toml-scrape")]
#[command(about = "Recreation center scraper driven by a TOML configuration file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "rec-etl.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override monitoring setting from config
    #[arg(long)]
    monitor: Option<bool>,

    /// Show what would be scraped without fetching anything
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // 載入 TOML 配置（日誌設定也在裡面，所以先載入）
    let config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    logger::init_cli_logger(args.verbose || config.verbose_logging(), config.log_json());
    tracing::info!("🚀 Starting TOML-based scraper");
    tracing::info!("📁 Loaded configuration from: {}", args.config);

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    display_config_summary(&config, &args);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No pages will be fetched");
        return Ok(());
    }

    let monitor_enabled = args.monitor.unwrap_or_else(|| config.monitoring_enabled());
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    let summary = match run_scrape(&config, config.target(), monitor_enabled).await {
        Ok(summary) => summary,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(e.severity().exit_code().max(1));
        }
    };

    for output in &summary.outputs {
        println!("📁 Output saved to: {}", output);
    }

    for (name, e) in &summary.failures {
        eprintln!("❌ [{}] {}", name, e.user_friendly_message());
        eprintln!("💡 建議: {}", e.recovery_suggestion());
    }

    let exit_code = summary.exit_code();
    if exit_code > 0 {
        std::process::exit(exit_code);
    }

    println!("✅ Scrape completed successfully!");
    Ok(())
}

fn display_config_summary(config: &TomlConfig, args: &Args) {
    println!("📋 Configuration Summary:");
    if let Some(scraper) = &config.scraper {
        println!("  Scraper: {}", scraper.name);
        if let Some(description) = &scraper.description {
            println!("  Description: {}", description);
        }
    }
    println!("  Target: {:?}", config.target());
    if config.target().includes_hours() {
        println!("  Hours: {} -> {}", config.hours_url(), config.hours_filename());
    }
    if config.target().includes_classes() {
        println!(
            "  Classes: {} -> {}",
            config.classes_url(),
            config.classes_filename()
        );
    }
    println!("  Output: {}", config.output_path());
    println!("  Formats: {}", config.output_formats().join(", "));
    println!(
        "  Timeout: {}s, retries: {}",
        config.timeout_seconds(),
        config.retry_attempts()
    );

    if args.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }

    println!();
}
