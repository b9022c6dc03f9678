//! The refresh loop: three periodic tasks owned by one `Scheduler`.
//!
//! Weather and transport refreshes fire on independent timers; the first
//! tick of each fires immediately, so both fetches start concurrently at
//! startup and complete independently. The clock task re-renders the board
//! every second. Each task writes only its own section of the shared state,
//! so overlapping in-flight refreshes cannot conflict. `shutdown` stops all
//! three cleanly.

use std::sync::Arc;
use std::time::Duration;

use chrono::Local;
use futures::future::join_all;
use log::{debug, info};
use tokio::sync::{broadcast, RwLock};
use tokio::task::JoinHandle;

use crate::config::{Coordinates, RefreshConfig};
use crate::transport::DepartureSource;
use crate::weather::WeatherSource;

use super::render::{render_frame, RenderSink};
use super::DashboardState;

#[derive(Debug, Clone, Copy)]
pub struct Periods {
    pub clock: Duration,
    pub weather: Duration,
    pub transport: Duration,
}

impl Periods {
    pub fn from_config(refresh: &RefreshConfig) -> Self {
        Self {
            clock: refresh.clock_period(),
            weather: refresh.weather_period(),
            transport: refresh.transport_period(),
        }
    }
}

pub struct Scheduler {
    stop: broadcast::Sender<()>,
    handles: Vec<JoinHandle<()>>,
    state: Arc<RwLock<DashboardState>>,
}

impl Scheduler {
    /// Spawn the clock, weather, and transport tasks. They run until
    /// [`Scheduler::shutdown`] is called.
    pub fn start(
        periods: Periods,
        weather: Arc<dyn WeatherSource>,
        weather_location: Coordinates,
        transport: Arc<dyn DepartureSource>,
        stop_location: Coordinates,
        sink: Arc<dyn RenderSink>,
    ) -> Self {
        let state = Arc::new(RwLock::new(DashboardState::new()));
        let (stop, _) = broadcast::channel(1);

        let handles = vec![
            tokio::spawn(weather_task(
                periods.weather,
                weather,
                weather_location,
                state.clone(),
                stop.subscribe(),
            )),
            tokio::spawn(transport_task(
                periods.transport,
                transport,
                stop_location,
                state.clone(),
                stop.subscribe(),
            )),
            tokio::spawn(clock_task(
                periods.clock,
                state.clone(),
                sink,
                stop.subscribe(),
            )),
        ];

        Self {
            stop,
            handles,
            state,
        }
    }

    pub fn state(&self) -> Arc<RwLock<DashboardState>> {
        self.state.clone()
    }

    /// Signal every task to stop and wait for them to finish. In-flight
    /// fetches are not cancelled; their tick completes before the task
    /// observes the signal.
    pub async fn shutdown(self) {
        info!("stopping refresh tasks");
        let _ = self.stop.send(());
        join_all(self.handles).await;
    }
}

async fn weather_task(
    period: Duration,
    source: Arc<dyn WeatherSource>,
    location: Coordinates,
    state: Arc<RwLock<DashboardState>>,
    mut stop: broadcast::Receiver<()>,
) {
    let mut ticker = tokio::time::interval(period);
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let result = source.current(location).await;
                state.write().await.apply_weather(result);
                debug!("weather refresh tick complete");
            }
            _ = stop.recv() => break,
        }
    }
}

async fn transport_task(
    period: Duration,
    source: Arc<dyn DepartureSource>,
    location: Coordinates,
    state: Arc<RwLock<DashboardState>>,
    mut stop: broadcast::Receiver<()>,
) {
    let mut ticker = tokio::time::interval(period);
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let result = source.departures(location).await;
                state.write().await.apply_departures(result);
                debug!("transport refresh tick complete");
            }
            _ = stop.recv() => break,
        }
    }
}

async fn clock_task(
    period: Duration,
    state: Arc<RwLock<DashboardState>>,
    sink: Arc<dyn RenderSink>,
    mut stop: broadcast::Receiver<()>,
) {
    let mut ticker = tokio::time::interval(period);
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let frame = {
                    let state = state.read().await;
                    render_frame(&state, Local::now())
                };
                sink.present(&frame);
            }
            _ = stop.recv() => break,
        }
    }
}
