//! Dashboard binary: runs the refresh loop and renders the board to the
//! terminal until Ctrl-C.

use std::sync::Arc;

use commute_board::config::Config;
use commute_board::dashboard::render::ConsoleSink;
use commute_board::dashboard::scheduler::{Periods, Scheduler};
use commute_board::transport::TransportClient;
use commute_board::weather::WeatherClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    match dotenv::dotenv() {
        Ok(_) => log::debug!("loaded .env file"),
        Err(err) => log::debug!("no .env file loaded: {err}"),
    }

    let config = Config::load()?;

    let weather = Arc::new(WeatherClient::new(config.weather.clone())?);
    let transport = Arc::new(TransportClient::new(config.transport.clone())?);

    log::info!("commute board starting; press Ctrl+C to exit");

    let scheduler = Scheduler::start(
        Periods::from_config(&config.refresh),
        weather,
        config.weather.location,
        transport,
        config.transport.stop_location,
        Arc::new(ConsoleSink),
    );

    tokio::signal::ctrl_c().await?;
    scheduler.shutdown().await;

    Ok(())
}
