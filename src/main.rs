use a11y_lens::config::{CliConfig, LogFormat};
use a11y_lens::server::{AppState, PreviewServer};
use a11y_lens::utils::{logger, validation::Validate};
use a11y_lens::TomlConfig;
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    match cli.log_format {
        LogFormat::Compact => logger::init_cli_logger(cli.verbose),
        LogFormat::Json => logger::init_json_logger(cli.verbose),
    }

    tracing::info!("Starting a11y-lens");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let mut config = match &cli.config {
        Some(path) => TomlConfig::from_file(path)?,
        None => TomlConfig::default(),
    };
    if let Some(listen) = cli.listen {
        config.server.listen_addr = listen;
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let state = AppState::from_config(&config)?;
    tracing::info!(
        style_mode = state.service.rewriter().config().mode.as_str(),
        timeout_secs = config.fetch.timeout_seconds,
        "Rewrite tables loaded"
    );

    PreviewServer::new(&config, state).run().await
}
