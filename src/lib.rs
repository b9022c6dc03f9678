//! Commute board: current weather plus the next public-transport departures
//! for a fixed home location, refreshed on independent timers, with a small
//! credential-isolating proxy in front of the transit API.
//!
//! Two binaries share this library: `commute-board` runs the dashboard
//! refresh loop, `transport_proxy` serves the single `/api/transport` route.

use std::time::Duration;

pub mod config;
pub mod dashboard;
pub mod error;
pub mod proxy;
pub mod transport;
pub mod weather;

/// Timeout applied to every outbound HTTP request. The underlying APIs have
/// no SLA; a hung request must not wedge a refresh tick past its period.
pub const HTTP_TIMEOUT: Duration = Duration::from_secs(10);
