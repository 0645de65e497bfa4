use anyhow::Context;

use showcase_infra::ShowcaseConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    showcase_observability::init();

    let config = ShowcaseConfig::from_env();
    let app = showcase_api::app::build_app(&config);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
