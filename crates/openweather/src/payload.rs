//! Wire types for the `/data/2.5/weather` response.
//!
//! The provider reports application errors through a `cod` field that may be
//! a number (`200`) or a string (`"404"`), and it does so both on non-2xx
//! responses and, occasionally, inside a 200 body. [`parse_current_weather`]
//! treats any `cod` other than 200 as a failure regardless of the transport
//! status.

use serde::Deserialize;
use weatherwatch_core::reading::{kelvin_to_celsius, Reading};
use weatherwatch_core::types::Timestamp;

use crate::client::OpenWeatherError;

/// The only `cod` value that denotes success.
const COD_OK: i64 = 200;

/// Application status code as sent by the provider.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum Cod {
    Number(i64),
    Text(String),
}

impl Cod {
    fn as_i64(&self) -> Option<i64> {
        match self {
            Cod::Number(n) => Some(*n),
            Cod::Text(s) => s.trim().parse().ok(),
        }
    }
}

/// Fields present on both success and error bodies.
#[derive(Debug, Deserialize)]
struct Envelope {
    cod: Option<Cod>,
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Main {
    /// Kelvin (the provider default when no `units` parameter is sent).
    temp: f64,
    humidity: f64,
}

#[derive(Debug, Deserialize)]
struct Wind {
    speed: f64,
}

#[derive(Debug, Default, Deserialize)]
struct Sys {
    country: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CurrentWeatherBody {
    name: String,
    main: Main,
    wind: Wind,
    #[serde(default)]
    sys: Sys,
}

/// A successfully decoded current-weather response, already in internal
/// units.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentWeather {
    /// Canonical location name as reported by the provider.
    pub name: String,
    pub country: Option<String>,
    pub temperature_celsius: f64,
    pub humidity_percent: f64,
    pub wind_speed: f64,
}

impl CurrentWeather {
    pub fn into_reading(self, observed_at: Timestamp) -> Reading {
        Reading {
            location: self.name,
            temperature_celsius: self.temperature_celsius,
            humidity_percent: self.humidity_percent,
            wind_speed: self.wind_speed,
            country: self.country,
            observed_at,
        }
    }
}

/// Decode a response body given its HTTP status.
pub fn parse_current_weather(status: u16, body: &str) -> Result<CurrentWeather, OpenWeatherError> {
    let value: serde_json::Value = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(e) if (200..300).contains(&status) => {
            return Err(OpenWeatherError::Malformed(e.to_string()));
        }
        Err(_) => {
            return Err(OpenWeatherError::Api {
                code: i64::from(status),
                message: non_empty_or(body.trim(), "request failed"),
            });
        }
    };

    let envelope: Envelope = serde_json::from_value(value.clone())
        .map_err(|e| OpenWeatherError::Malformed(e.to_string()))?;

    let code = match envelope.cod.as_ref() {
        Some(cod) => cod
            .as_i64()
            .ok_or_else(|| OpenWeatherError::Malformed(format!("unreadable cod: {cod:?}")))?,
        // No application code: fall back to the transport status.
        None => i64::from(status),
    };

    if code != COD_OK || !(200..300).contains(&status) {
        return Err(OpenWeatherError::Api {
            code: if code != COD_OK { code } else { i64::from(status) },
            message: envelope
                .message
                .unwrap_or_else(|| "unknown provider error".to_string()),
        });
    }

    let body: CurrentWeatherBody =
        serde_json::from_value(value).map_err(|e| OpenWeatherError::Malformed(e.to_string()))?;

    if !body.main.temp.is_finite() {
        return Err(OpenWeatherError::Malformed(
            "main.temp is not a finite number".to_string(),
        ));
    }

    Ok(CurrentWeather {
        name: body.name,
        country: body.sys.country.filter(|c| !c.is_empty()),
        temperature_celsius: kelvin_to_celsius(body.main.temp),
        humidity_percent: body.main.humidity,
        wind_speed: body.wind.speed,
    })
}

fn non_empty_or(s: &str, fallback: &str) -> String {
    if s.is_empty() {
        fallback.to_string()
    } else {
        s.to_string()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
