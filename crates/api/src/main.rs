use anyhow::Context;
use clap::Parser;

use hotcoffee_api::cli::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    hotcoffee_observability::init(cli.env);

    let storage = cli.storage();
    let services = hotcoffee_api::app::services::build_services(&storage)
        .with_context(|| format!("failed to open data directory {}", storage.data_dir().display()))?;

    let app = hotcoffee_api::app::build_app(services);

    let addr = cli.listen_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    tracing::info!(
        addr = %listener.local_addr()?,
        data_dir = %storage.data_dir().display(),
        env = %cli.env,
        "listening"
    );

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
