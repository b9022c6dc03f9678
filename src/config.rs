use anyhow::Context;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

const CONFIG_PATH: &str = "config.toml";

/// A fixed latitude/longitude pair. The dashboard ships with two of these:
/// the home location for weather and a nearby stop location for transport.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WeatherConfig {
    pub base_url: String,
    pub location: Coordinates,
    pub timezone: String,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.open-meteo.com/v1/bom".to_string(),
            location: Coordinates {
                latitude: -33.80007150250232,
                longitude: 151.06689458521106,
            },
            timezone: "Australia/Sydney".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TransportConfig {
    /// Base URL of the local transport proxy. The dashboard never talks to
    /// the transit API directly.
    pub proxy_base_url: String,
    pub stop_location: Coordinates,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            proxy_base_url: "http://127.0.0.1:3000".to_string(),
            stop_location: Coordinates {
                latitude: -33.80704231861178,
                longitude: 151.08228688824894,
            },
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProxyConfig {
    pub port: u16,
    pub upstream_base_url: String,
    /// Stop search radius around the queried coordinates, in metres.
    pub radius_m: u32,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            upstream_base_url: "https://api.transport.nsw.gov.au/v1/tp".to_string(),
            radius_m: 1000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RefreshConfig {
    pub weather_secs: u64,
    pub transport_secs: u64,
    pub clock_secs: u64,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            weather_secs: 300,
            transport_secs: 60,
            clock_secs: 1,
        }
    }
}

impl RefreshConfig {
    pub fn weather_period(&self) -> Duration {
        Duration::from_secs(self.weather_secs)
    }

    pub fn transport_period(&self) -> Duration {
        Duration::from_secs(self.transport_secs)
    }

    pub fn clock_period(&self) -> Duration {
        Duration::from_secs(self.clock_secs)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub weather: WeatherConfig,
    pub transport: TransportConfig,
    pub proxy: ProxyConfig,
    pub refresh: RefreshConfig,
}

impl Config {
    /// Load `config.toml` from the working directory, falling back to the
    /// built-in defaults when the file does not exist. Keys absent from the
    /// file keep their defaults.
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(Path::new(CONFIG_PATH))
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            log::debug!("no config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&raw).with_context(|| format!("failed to parse {}", path.display()))
    }
}
