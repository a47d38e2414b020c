use anyhow::Context;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    gatehouse_observability::init();

    let config = gatehouse_api::config::GateConfig::from_env().context("failed to load configuration")?;
    let profiles = gatehouse_api::app::profile_store_from_config(&config)
        .context("failed to set up profile store")?;
    let bind_addr = config.bind_addr;

    let app = gatehouse_api::app::build_app(config, profiles);

    let listener = tokio::net::TcpListener::bind(bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
    tracing::info!("shutting down");
}
