//! Proxy binary: holds the transit API credential and serves the single
//! `/api/transport` route for the dashboard.

use std::env;

use anyhow::Context;

use commute_board::config::Config;
use commute_board::proxy::{listen_addr, router, ProxyState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    match dotenv::dotenv() {
        Ok(_) => log::debug!("loaded .env file"),
        Err(err) => log::debug!("no .env file loaded: {err}"),
    }

    let credential =
        env::var("TRANSPORT_API_KEY").context("TRANSPORT_API_KEY must be set")?;

    let config = Config::load()?;
    let addr = listen_addr(&config.proxy);
    let state = ProxyState::new(config.proxy, credential)?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    log::info!("transport proxy listening on http://{addr}");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;

    Ok(())
}
