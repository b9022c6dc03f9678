//! WMO weather code lookups.
//!
//! The upstream forecast API reports conditions as WMO codes; see
//! https://open-meteo.com/en/docs#weathervariables for the documented set.
//! Both lookups are total: codes outside the set fall back to
//! `"Unknown"` / `"wi-na"`.

pub const UNKNOWN_DESCRIPTION: &str = "Unknown";
pub const UNKNOWN_ICON: &str = "wi-na";

pub fn description(code: u16) -> &'static str {
    match code {
        0 => "Clear sky",
        1 => "Mainly clear",
        2 => "Partly cloudy",
        3 => "Overcast",
        45 => "Foggy",
        48 => "Depositing rime fog",
        51 => "Light drizzle",
        53 => "Moderate drizzle",
        55 => "Dense drizzle",
        61 => "Slight rain",
        63 => "Moderate rain",
        65 => "Heavy rain",
        71 => "Slight snow fall",
        73 => "Moderate snow fall",
        75 => "Heavy snow fall",
        77 => "Snow grains",
        80 => "Slight rain showers",
        81 => "Moderate rain showers",
        82 => "Violent rain showers",
        95 => "Thunderstorm",
        96 => "Thunderstorm with slight hail",
        99 => "Thunderstorm with heavy hail",
        _ => UNKNOWN_DESCRIPTION,
    }
}

/// Icon tag in the weather-icons naming scheme.
pub fn icon(code: u16) -> &'static str {
    match code {
        0 => "wi-day-sunny",
        1 => "wi-day-sunny-overcast",
        2 => "wi-day-cloudy",
        3 => "wi-cloudy",
        45 | 48 => "wi-fog",
        51 | 53 | 55 => "wi-sprinkle",
        61 | 63 | 65 => "wi-rain",
        71 | 73 | 75 | 77 => "wi-snow",
        80 | 81 => "wi-showers",
        82 => "wi-rain",
        95 | 96 | 99 => "wi-thunderstorm",
        _ => UNKNOWN_ICON,
    }
}
