use async_trait::async_trait;
use chrono::{DateTime, Utc};
use itertools::Itertools;
use log::debug;
use serde::Deserialize;

use crate::config::{Coordinates, TransportConfig};
use crate::error::FetchError;

/// One upcoming departure from a stop near the configured location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepartureEvent {
    pub route_number: String,
    pub destination_name: String,
    pub planned_departure: DateTime<Utc>,
}

#[async_trait]
pub trait DepartureSource: Send + Sync {
    /// Full chronological departure list; callers decide how many to show.
    async fn departures(&self, location: Coordinates)
        -> Result<Vec<DepartureEvent>, FetchError>;
}

/// Client for the local transport proxy. Credential isolation means this
/// never talks to the transit API itself.
pub struct TransportClient {
    config: TransportConfig,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct DepartureMonitorResponse {
    #[serde(rename = "stopEvents", default)]
    stop_events: Vec<StopEvent>,
}

#[derive(Debug, Deserialize)]
struct StopEvent {
    #[serde(rename = "departureTimePlanned")]
    departure_time_planned: String,
    transportation: Transportation,
}

#[derive(Debug, Deserialize)]
struct Transportation {
    number: String,
    destination: Destination,
}

#[derive(Debug, Deserialize)]
struct Destination {
    name: String,
}

impl TransportClient {
    pub fn new(config: TransportConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(crate::HTTP_TIMEOUT)
            .build()?;
        Ok(Self { config, client })
    }

    fn request_url(&self, location: Coordinates) -> String {
        format!(
            "{}/api/transport?latitude={}&longitude={}",
            self.config.proxy_base_url, location.latitude, location.longitude
        )
    }
}

#[async_trait]
impl DepartureSource for TransportClient {
    async fn departures(
        &self,
        location: Coordinates,
    ) -> Result<Vec<DepartureEvent>, FetchError> {
        debug!(
            "fetching departures for {},{}",
            location.latitude, location.longitude
        );

        let response = self.client.get(self.request_url(location)).send().await?;
        if !response.status().is_success() {
            return Err(FetchError::UpstreamStatus(response.status()));
        }

        let body = response.text().await?;
        parse_departures(&body)
    }
}

pub fn parse_departures(body: &str) -> Result<Vec<DepartureEvent>, FetchError> {
    let raw: DepartureMonitorResponse =
        serde_json::from_str(body).map_err(FetchError::parse)?;

    raw.stop_events
        .into_iter()
        .map(|event| {
            let planned = DateTime::parse_from_rfc3339(&event.departure_time_planned)
                .map_err(|err| {
                    FetchError::Parse(format!(
                        "bad departureTimePlanned {:?}: {err}",
                        event.departure_time_planned
                    ))
                })?;
            Ok(DepartureEvent {
                route_number: event.transportation.number,
                destination_name: event.transportation.destination.name,
                planned_departure: planned.with_timezone(&Utc),
            })
        })
        .collect::<Result<Vec<_>, FetchError>>()
        .map(|events| {
            events
                .into_iter()
                .sorted_by_key(|event| event.planned_departure)
                .collect()
        })
}
