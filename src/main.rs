use anyhow::Context;

use voice_todo::api;
use voice_todo::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = AppConfig::from_env().context("Failed to load configuration")?;

    eprintln!("📞 Voice Todo v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Webhooks: http://{}:{}/schedules/", config.host, config.port);
    eprintln!("   Users:    http://{}:{}/users/", config.host, config.port);
    eprintln!("   Database: {}", config.db_path.display());
    if config.vapi.is_some() {
        eprintln!("   Vapi call API configured");
    }

    api::serve(&config, async {
        tokio::signal::ctrl_c().await.ok();
        tracing::info!("Shutting down");
    })
    .await
    .context("Webhook server failed")?;

    Ok(())
}
