//! Render-ready view models: pure mapping from fetched data, no I/O.

use chrono::{DateTime, Local, Utc};

use crate::transport::DepartureEvent;
use crate::weather::{codes, WeatherSnapshot};

/// First hourly probability above this raises the rain warning.
pub const RAIN_IMMINENT_THRESHOLD_PCT: u8 = 50;

/// Hours of precipitation probability shown on the board.
const FORECAST_HOURS: usize = 6;

/// Departures surfaced per refresh; the list is truncated, never padded.
pub const MAX_DEPARTURE_ROWS: usize = 3;

#[derive(Debug, Clone, PartialEq)]
pub struct HourlyBar {
    pub label: String,
    pub probability_pct: u8,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeatherView {
    pub temperature_c: i64,
    pub apparent_temperature_c: i64,
    pub humidity_pct: u8,
    pub wind_speed_kmh: f64,
    pub description: &'static str,
    pub icon: &'static str,
    pub rain_mm: f64,
    pub showers_mm: f64,
    pub daily_rain_sum_mm: f64,
    pub daily_min_temp_c: f64,
    pub rain_imminent: bool,
    pub hourly: Vec<HourlyBar>,
}

impl WeatherView {
    /// `current_hour` is the hour (0..24) at mapping time; hourly bars are
    /// labelled next-hour-first, so bar `i` reads `(current_hour + 1 + i)
    /// mod 24` and pairs positionally with probability `i`.
    pub fn from_snapshot(snapshot: &WeatherSnapshot, current_hour: u32) -> Self {
        let hourly = hour_labels(current_hour, FORECAST_HOURS)
            .into_iter()
            .zip(snapshot.hourly_precip_probability.iter().copied())
            .map(|(label, probability_pct)| HourlyBar {
                label,
                probability_pct,
            })
            .collect();

        Self {
            temperature_c: snapshot.temperature_c.round() as i64,
            apparent_temperature_c: snapshot.apparent_temperature_c.round() as i64,
            humidity_pct: snapshot.humidity_pct,
            wind_speed_kmh: snapshot.wind_speed_kmh,
            description: codes::description(snapshot.weather_code),
            icon: codes::icon(snapshot.weather_code),
            rain_mm: snapshot.rain_mm,
            showers_mm: snapshot.showers_mm,
            daily_rain_sum_mm: snapshot.daily_rain_sum_mm,
            daily_min_temp_c: snapshot.daily_min_temp_c,
            rain_imminent: is_rain_imminent(snapshot),
            hourly,
        }
    }
}

/// True iff the probability for the current hour is strictly above the
/// threshold. Exactly 50 is not imminent.
pub fn is_rain_imminent(snapshot: &WeatherSnapshot) -> bool {
    snapshot
        .hourly_precip_probability
        .first()
        .is_some_and(|p| *p > RAIN_IMMINENT_THRESHOLD_PCT)
}

pub fn hour_labels(current_hour: u32, count: usize) -> Vec<String> {
    (0..count)
        .map(|i| format!("{}:00", (current_hour as usize + 1 + i) % 24))
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct DepartureRow {
    pub route_number: String,
    pub destination_name: String,
    pub departs_at: String,
    pub minutes_until: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DepartureBoardView {
    pub rows: Vec<DepartureRow>,
}

impl DepartureBoardView {
    pub fn from_events(events: &[DepartureEvent], now: DateTime<Utc>) -> Self {
        let rows = events
            .iter()
            .take(MAX_DEPARTURE_ROWS)
            .map(|event| {
                let minutes_until = event
                    .planned_departure
                    .signed_duration_since(now)
                    .num_minutes()
                    .max(0);
                DepartureRow {
                    route_number: event.route_number.clone(),
                    destination_name: event.destination_name.clone(),
                    departs_at: event
                        .planned_departure
                        .with_timezone(&Local)
                        .format("%I:%M %p")
                        .to_string(),
                    minutes_until,
                }
            })
            .collect();
        Self { rows }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
