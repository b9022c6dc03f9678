use async_trait::async_trait;
use chrono::{Local, NaiveDateTime};
use log::debug;
use serde::Deserialize;

use crate::config::{Coordinates, WeatherConfig};
use crate::error::FetchError;

pub mod codes;

/// Shortest hourly probability series a usable snapshot needs.
const MIN_HOURLY_ENTRIES: usize = 6;

/// Point-in-time weather for the home location. Replaced wholesale on each
/// successful fetch, never merged with a previous snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherSnapshot {
    pub temperature_c: f64,
    pub apparent_temperature_c: f64,
    pub humidity_pct: u8,
    pub wind_speed_kmh: f64,
    pub rain_mm: f64,
    pub showers_mm: f64,
    pub weather_code: u16,
    /// Precipitation probabilities per hour, chronological from the current
    /// hour, each in 0..=100.
    pub hourly_precip_probability: Vec<u8>,
    pub daily_rain_sum_mm: f64,
    pub daily_min_temp_c: f64,
}

#[async_trait]
pub trait WeatherSource: Send + Sync {
    async fn current(&self, location: Coordinates) -> Result<WeatherSnapshot, FetchError>;
}

pub struct WeatherClient {
    config: WeatherConfig,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    current: CurrentConditions,
    hourly: HourlySeries,
    daily: DailySeries,
}

#[derive(Debug, Deserialize)]
struct CurrentConditions {
    temperature_2m: f64,
    relative_humidity_2m: f64,
    apparent_temperature: f64,
    weather_code: u16,
    wind_speed_10m: f64,
    rain: f64,
    showers: f64,
}

#[derive(Debug, Deserialize)]
struct HourlySeries {
    time: Vec<String>,
    precipitation_probability: Vec<f64>,
}

#[derive(Debug, Deserialize)]
struct DailySeries {
    rain_sum: Vec<f64>,
    temperature_2m_min: Vec<f64>,
}

impl WeatherClient {
    pub fn new(config: WeatherConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(crate::HTTP_TIMEOUT)
            .build()?;
        Ok(Self { config, client })
    }

    fn request_url(&self, location: Coordinates) -> String {
        format!(
            "{}?latitude={}&longitude={}&current=temperature_2m,relative_humidity_2m,apparent_temperature,precipitation,weather_code,wind_speed_10m,rain,showers&hourly=precipitation_probability,rain,showers&daily=rain_sum,temperature_2m_min&timezone={}",
            self.config.base_url, location.latitude, location.longitude, self.config.timezone
        )
    }
}

#[async_trait]
impl WeatherSource for WeatherClient {
    async fn current(&self, location: Coordinates) -> Result<WeatherSnapshot, FetchError> {
        debug!(
            "fetching weather for {},{}",
            location.latitude, location.longitude
        );

        let response = self.client.get(self.request_url(location)).send().await?;
        if !response.status().is_success() {
            return Err(FetchError::UpstreamStatus(response.status()));
        }

        let body = response.text().await?;
        parse_forecast(&body, Local::now().naive_local())
    }
}

fn parse_forecast(body: &str, now: NaiveDateTime) -> Result<WeatherSnapshot, FetchError> {
    let raw: ForecastResponse = serde_json::from_str(body).map_err(FetchError::parse)?;
    WeatherSnapshot::from_forecast(raw, now)
}

impl WeatherSnapshot {
    /// Normalize a raw forecast body. The hourly series is realigned so the
    /// first probability belongs to the current hour: upstream arrays start
    /// at midnight in the configured timezone and carry their own local
    /// timestamps, so we scan for the first stamp at or after `now`.
    fn from_forecast(raw: ForecastResponse, now: NaiveDateTime) -> Result<Self, FetchError> {
        let hour_key = now.format("%Y-%m-%dT%H:00").to_string();
        let start = raw
            .hourly
            .time
            .iter()
            .position(|stamp| stamp.as_str() >= hour_key.as_str())
            .ok_or_else(|| {
                FetchError::Parse(format!("hourly series ends before {hour_key}"))
            })?;

        let hourly_precip_probability: Vec<u8> = raw
            .hourly
            .precipitation_probability
            .iter()
            .skip(start)
            .map(|p| clamp_pct(*p))
            .collect();
        if hourly_precip_probability.len() < MIN_HOURLY_ENTRIES {
            return Err(FetchError::Parse(format!(
                "expected at least {MIN_HOURLY_ENTRIES} hourly probabilities from {hour_key}, got {}",
                hourly_precip_probability.len()
            )));
        }

        let daily_rain_sum_mm = *raw
            .daily
            .rain_sum
            .first()
            .ok_or_else(|| FetchError::Parse("daily.rain_sum is empty".to_string()))?;
        let daily_min_temp_c = *raw
            .daily
            .temperature_2m_min
            .first()
            .ok_or_else(|| FetchError::Parse("daily.temperature_2m_min is empty".to_string()))?;

        Ok(Self {
            temperature_c: raw.current.temperature_2m,
            apparent_temperature_c: raw.current.apparent_temperature,
            humidity_pct: clamp_pct(raw.current.relative_humidity_2m),
            wind_speed_kmh: raw.current.wind_speed_10m,
            rain_mm: raw.current.rain,
            showers_mm: raw.current.showers,
            weather_code: raw.current.weather_code,
            hourly_precip_probability,
            daily_rain_sum_mm,
            daily_min_temp_c,
        })
    }
}

fn clamp_pct(value: f64) -> u8 {
    value.round().clamp(0.0, 100.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    fn at(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 8, 23)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    /// A day's worth of hourly stamps plus probabilities equal to the hour,
    /// so alignment mistakes are visible in the values.
    fn forecast_body(weather_code: u16) -> String {
        let time: Vec<String> = (0..24)
            .map(|h| format!("2026-08-23T{h:02}:00"))
            .collect();
        let probability: Vec<u32> = (0..24).collect();
        json!({
            "current": {
                "temperature_2m": 17.6,
                "relative_humidity_2m": 72,
                "apparent_temperature": 15.9,
                "precipitation": 0.2,
                "weather_code": weather_code,
                "wind_speed_10m": 13.5,
                "rain": 0.2,
                "showers": 0.0
            },
            "hourly": {
                "time": time,
                "precipitation_probability": probability,
                "rain": vec![0.0; 24],
                "showers": vec![0.0; 24]
            },
            "daily": {
                "time": ["2026-08-23"],
                "rain_sum": [4.1],
                "temperature_2m_min": [8.3]
            }
        })
        .to_string()
    }

    #[test]
    fn parses_and_aligns_to_current_hour() {
        let snapshot = parse_forecast(&forecast_body(61), at(14, 25)).unwrap();
        assert_eq!(snapshot.temperature_c, 17.6);
        assert_eq!(snapshot.apparent_temperature_c, 15.9);
        assert_eq!(snapshot.humidity_pct, 72);
        assert_eq!(snapshot.wind_speed_kmh, 13.5);
        assert_eq!(snapshot.rain_mm, 0.2);
        assert_eq!(snapshot.showers_mm, 0.0);
        assert_eq!(snapshot.weather_code, 61);
        assert_eq!(snapshot.daily_rain_sum_mm, 4.1);
        assert_eq!(snapshot.daily_min_temp_c, 8.3);
        // Probabilities equal their hour, so the first must be 14.
        assert_eq!(snapshot.hourly_precip_probability.len(), 10);
        assert_eq!(snapshot.hourly_precip_probability[0], 14);
        assert_eq!(snapshot.hourly_precip_probability[9], 23);
    }

    #[test]
    fn code_61_maps_to_slight_rain() {
        let snapshot = parse_forecast(&forecast_body(61), at(0, 0)).unwrap();
        assert_eq!(codes::description(snapshot.weather_code), "Slight rain");
        assert_eq!(codes::icon(snapshot.weather_code), "wi-rain");
    }

    #[test]
    fn probabilities_are_clamped_into_percent_range() {
        let body = json!({
            "current": {
                "temperature_2m": 20.0,
                "relative_humidity_2m": 104.2,
                "apparent_temperature": 20.0,
                "weather_code": 0,
                "wind_speed_10m": 5.0,
                "rain": 0.0,
                "showers": 0.0
            },
            "hourly": {
                "time": (0..6).map(|h| format!("2026-08-23T{h:02}:00")).collect::<Vec<_>>(),
                "precipitation_probability": [150.0, -3.0, 99.6, 0.4, 50.0, 100.0]
            },
            "daily": { "rain_sum": [0.0], "temperature_2m_min": [1.0] }
        })
        .to_string();

        let snapshot = parse_forecast(&body, at(0, 10)).unwrap();
        assert_eq!(snapshot.humidity_pct, 100);
        assert_eq!(snapshot.hourly_precip_probability, vec![100, 0, 100, 0, 50, 100]);
    }

    #[test]
    fn short_hourly_series_is_a_parse_error() {
        let err = parse_forecast(&forecast_body(0), at(19, 0)).unwrap_err();
        assert!(matches!(err, FetchError::Parse(_)), "got {err:?}");
    }

    #[test]
    fn exhausted_hourly_series_is_a_parse_error() {
        // Every stamp is on the 22nd, a day before `now`.
        let body = json!({
            "current": {
                "temperature_2m": 20.0,
                "relative_humidity_2m": 50,
                "apparent_temperature": 20.0,
                "weather_code": 0,
                "wind_speed_10m": 5.0,
                "rain": 0.0,
                "showers": 0.0
            },
            "hourly": {
                "time": (0..24).map(|h| format!("2026-08-22T{h:02}:00")).collect::<Vec<_>>(),
                "precipitation_probability": (0..24).collect::<Vec<u32>>()
            },
            "daily": { "rain_sum": [0.0], "temperature_2m_min": [1.0] }
        })
        .to_string();

        let err = parse_forecast(&body, at(0, 0)).unwrap_err();
        assert!(matches!(err, FetchError::Parse(_)), "got {err:?}");
    }

    #[test]
    fn empty_daily_series_is_a_parse_error() {
        let body = json!({
            "current": {
                "temperature_2m": 20.0,
                "relative_humidity_2m": 50,
                "apparent_temperature": 20.0,
                "weather_code": 0,
                "wind_speed_10m": 5.0,
                "rain": 0.0,
                "showers": 0.0
            },
            "hourly": {
                "time": (0..6).map(|h| format!("2026-08-23T{h:02}:00")).collect::<Vec<_>>(),
                "precipitation_probability": [0, 0, 0, 0, 0, 0]
            },
            "daily": { "rain_sum": [], "temperature_2m_min": [] }
        })
        .to_string();

        let err = parse_forecast(&body, at(0, 0)).unwrap_err();
        assert!(matches!(err, FetchError::Parse(_)), "got {err:?}");
    }

    #[test]
    fn malformed_body_is_a_parse_error() {
        let err = parse_forecast("<html>not json</html>", at(0, 0)).unwrap_err();
        assert!(matches!(err, FetchError::Parse(_)), "got {err:?}");
    }

    #[test]
    fn request_url_matches_documented_parameter_set() {
        let client = WeatherClient::new(WeatherConfig::default()).unwrap();
        let url = client.request_url(Coordinates {
            latitude: -33.80007150250232,
            longitude: 151.06689458521106,
        });
        assert_eq!(
            url,
            "https://api.open-meteo.com/v1/bom?latitude=-33.80007150250232&longitude=151.06689458521106&current=temperature_2m,relative_humidity_2m,apparent_temperature,precipitation,weather_code,wind_speed_10m,rain,showers&hourly=precipitation_probability,rain,showers&daily=rain_sum,temperature_2m_min&timezone=Australia/Sydney"
        );
    }
}
