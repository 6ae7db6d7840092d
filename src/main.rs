use clap::Parser;
use rec_etl::utils::{logger, validation::Validate};
use rec_etl::{run_scrape, CliConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(config.verbose, config.log_json);

    tracing::info!("Starting rec-etl CLI");
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

    if config.monitor {
        tracing::info!("🔍 System monitoring enabled");
    }

    let summary = match run_scrape(&config, config.target, config.monitor).await {
        Ok(summary) => summary,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(e.severity().exit_code().max(1));
        }
    };

    for output in &summary.outputs {
        println!("📁 Output saved to: {}", output);
    }

    if summary.is_success() {
        tracing::info!("✅ Scrape completed successfully!");
        println!("✅ Scrape completed successfully!");
        return Ok(());
    }

    // 輸出用戶友好的錯誤信息
    for (name, e) in &summary.failures {
        eprintln!("❌ [{}] {}", name, e.user_friendly_message());
        eprintln!("💡 建議: {}", e.recovery_suggestion());
    }

    // 根據錯誤嚴重程度決定退出碼
    let exit_code = summary.exit_code();
    if exit_code > 0 {
        std::process::exit(exit_code);
    }

    Ok(())
}
