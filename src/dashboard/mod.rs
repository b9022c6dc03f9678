//! Dashboard section state and the operations that update it.
//!
//! The board has two data sections, weather and departures, each fed by its
//! own refresh timer. A fetch result replaces exactly one section: success
//! swaps in a freshly mapped view, failure swaps in that section's fixed
//! failure text. The other section is never touched, so one upstream being
//! down leaves the rest of the board live.

use chrono::{Local, Timelike, Utc};
use log::warn;

use crate::error::FetchError;
use crate::transport::DepartureEvent;
use crate::weather::WeatherSnapshot;

pub mod render;
pub mod scheduler;
pub mod view;

use view::{DepartureBoardView, WeatherView};

pub const WEATHER_FAILURE_TEXT: &str = "Failed to load weather data";
pub const TRANSPORT_FAILURE_TEXT: &str = "Failed to load transport data";

/// One render region of the board.
#[derive(Debug, Clone, PartialEq)]
pub enum Panel<T> {
    /// No fetch has completed yet.
    Loading,
    Ready(T),
    Failed(&'static str),
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardState {
    pub weather: Panel<WeatherView>,
    pub departures: Panel<DepartureBoardView>,
}

impl Default for DashboardState {
    fn default() -> Self {
        Self {
            weather: Panel::Loading,
            departures: Panel::Loading,
        }
    }
}

impl DashboardState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the weather section with the outcome of one fetch.
    pub fn apply_weather(&mut self, result: Result<WeatherSnapshot, FetchError>) {
        self.apply_weather_at(result, Local::now().hour());
    }

    pub fn apply_weather_at(
        &mut self,
        result: Result<WeatherSnapshot, FetchError>,
        current_hour: u32,
    ) {
        self.weather = match result {
            Ok(snapshot) => Panel::Ready(WeatherView::from_snapshot(&snapshot, current_hour)),
            Err(err) => {
                warn!("weather refresh failed: {err}");
                Panel::Failed(WEATHER_FAILURE_TEXT)
            }
        };
    }

    /// Replace the departures section with the outcome of one fetch.
    pub fn apply_departures(&mut self, result: Result<Vec<DepartureEvent>, FetchError>) {
        self.apply_departures_at(result, Utc::now());
    }

    pub fn apply_departures_at(
        &mut self,
        result: Result<Vec<DepartureEvent>, FetchError>,
        now: chrono::DateTime<Utc>,
    ) {
        self.departures = match result {
            Ok(events) => Panel::Ready(DepartureBoardView::from_events(&events, now)),
            Err(err) => {
                warn!("transport refresh failed: {err}");
                Panel::Failed(TRANSPORT_FAILURE_TEXT)
            }
        };
    }
}
