use anyhow::Context;
use clap::Parser;
use order_notify::utils::{logger, validation::Validate};
use order_notify::{CliConfig, NotifyError, NotifyRouter};

fn fail(e: &NotifyError) -> ! {
    tracing::error!("❌ {} (Category: {:?})", e, e.category());
    tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());
    std::process::exit(1);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(cli.verbose);

    tracing::info!("Starting order-notify CLI");

    let config = cli.load_app_config().unwrap_or_else(|e| fail(&e));
    if let Err(e) = config.validate() {
        fail(&e);
    }
    tracing::debug!("Config: {}", config.summary());

    let order = cli
        .read_order()
        .with_context(|| format!("failed to read order from '{}'", cli.order))?;

    let router = NotifyRouter::from_config(&config);

    if cli.dry_run {
        tracing::info!("🔍 DRY RUN MODE - message will not be sent");
        let message = router.notifier().render(&order).unwrap_or_else(|e| fail(&e));
        println!("{}", message);
        return Ok(());
    }

    let kind = cli.provider_kind(&config).unwrap_or_else(|e| fail(&e));
    // 設定不足屬於設定錯誤 (exit 1)，不是發送失敗
    if let Err(e) = config.ensure_ready(kind) {
        fail(&e);
    }

    let response = router.dispatch(kind, &order).await;
    println!("{}", serde_json::to_string_pretty(&response.body)?);

    // 根據狀態碼決定退出碼
    let exit_code = match response.status_code {
        200..=299 => 0,
        400..=499 => 1,
        _ => 2,
    };
    if exit_code > 0 {
        std::process::exit(exit_code);
    }

    Ok(())
}
