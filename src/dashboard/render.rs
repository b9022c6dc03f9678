//! Terminal frame assembly.
//!
//! `render_frame` builds one full-screen frame as a string; the `RenderSink`
//! trait decouples frame production from where frames go, so the scheduler
//! can be exercised against a capturing sink in tests.

use std::io::{self, Write};

use chrono::{DateTime, Local};

use super::view::{DepartureBoardView, WeatherView};
use super::{DashboardState, Panel};

const RULE: &str = "-----------------------------------------";

pub trait RenderSink: Send + Sync {
    fn present(&self, frame: &str);
}

/// ANSI terminal sink: clear, home the cursor, redraw.
pub struct ConsoleSink;

impl RenderSink for ConsoleSink {
    fn present(&self, frame: &str) {
        print!("\x1B[2J\x1B[1;1H{frame}");
        let _ = io::stdout().flush();
    }
}

pub fn render_frame(state: &DashboardState, now: DateTime<Local>) -> String {
    let mut frame = String::new();
    frame.push_str(&format!("Current Time: {}\n", now.format("%I:%M:%S %p")));
    frame.push_str(RULE);
    frame.push('\n');

    frame.push_str("Weather\n");
    match &state.weather {
        Panel::Loading => frame.push_str("  Loading...\n"),
        Panel::Failed(message) => frame.push_str(&format!("  {message}\n")),
        Panel::Ready(view) => render_weather(&mut frame, view),
    }

    frame.push_str(RULE);
    frame.push('\n');

    frame.push_str("Departures\n");
    match &state.departures {
        Panel::Loading => frame.push_str("  Loading...\n"),
        Panel::Failed(message) => frame.push_str(&format!("  {message}\n")),
        Panel::Ready(board) => render_departures(&mut frame, board),
    }

    frame
}

fn render_weather(frame: &mut String, view: &WeatherView) {
    frame.push_str(&format!(
        "  {} [{}]  {}°C (feels like {}°C)\n",
        view.description, view.icon, view.temperature_c, view.apparent_temperature_c
    ));
    frame.push_str(&format!(
        "  Humidity {}%  Wind {:.1} km/h\n",
        view.humidity_pct, view.wind_speed_kmh
    ));
    frame.push_str(&format!(
        "  Rain {:.1} mm  Showers {:.1} mm  Today {:.1} mm  Min {:.1}°C\n",
        view.rain_mm, view.showers_mm, view.daily_rain_sum_mm, view.daily_min_temp_c
    ));
    if view.rain_imminent {
        frame.push_str("  ! Rain expected within the hour\n");
    }
    for bar in &view.hourly {
        frame.push_str(&format!("  {:>5}  {:>3}%\n", bar.label, bar.probability_pct));
    }
}

fn render_departures(frame: &mut String, board: &DepartureBoardView) {
    if board.is_empty() {
        frame.push_str("  No upcoming departures\n");
        return;
    }
    for row in &board.rows {
        frame.push_str(&format!(
            "  {:>4}  {:<24} {}  ({} min)\n",
            row.route_number, row.destination_name, row.departs_at, row.minutes_until
        ));
    }
}
