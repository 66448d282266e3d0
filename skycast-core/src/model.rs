use serde::{Deserialize, Serialize};

use crate::error::QueryError;

/// Fixed number of hourly entries in every snapshot.
pub const HOURLY_WINDOW: usize = 24;

/// Requested number of forecast days. Only these three horizons exist;
/// anything else is rejected before a request is made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ForecastHorizon {
    FiveDays,
    SevenDays,
    Fourteen,
}

impl ForecastHorizon {
    pub const fn days(self) -> usize {
        match self {
            ForecastHorizon::FiveDays => 5,
            ForecastHorizon::SevenDays => 7,
            ForecastHorizon::Fourteen => 14,
        }
    }

    pub const fn all() -> &'static [ForecastHorizon] {
        &[
            ForecastHorizon::FiveDays,
            ForecastHorizon::SevenDays,
            ForecastHorizon::Fourteen,
        ]
    }
}

impl std::fmt::Display for ForecastHorizon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} days", self.days())
    }
}

impl TryFrom<u8> for ForecastHorizon {
    type Error = QueryError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            5 => Ok(ForecastHorizon::FiveDays),
            7 => Ok(ForecastHorizon::SevenDays),
            14 => Ok(ForecastHorizon::Fourteen),
            _ => Err(QueryError::Input(format!(
                "unsupported forecast horizon '{value}'; supported horizons: 5, 7 or 14 days"
            ))),
        }
    }
}

/// The retained parameters of a weather query. Re-issuing the same
/// request is the caller's retry operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeatherRequest {
    pub location: String,
    pub horizon: ForecastHorizon,
}

impl WeatherRequest {
    pub fn new(location: impl Into<String>, horizon: ForecastHorizon) -> Self {
        Self {
            location: location.into(),
            horizon,
        }
    }
}

/// One immutable, fully-validated weather result for a location.
///
/// Constructed fresh on every successful query; never mutated, never
/// merged with fragments of a failed call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherSnapshot {
    /// Resolved display name for the queried place.
    pub location: String,
    /// Human-readable current date at that place.
    pub date: String,
    pub current: CurrentConditions,
    /// Exactly [`HOURLY_WINDOW`] entries, time ascending.
    pub hourly: Vec<HourPoint>,
    /// Exactly `horizon.days()` entries, date ascending.
    pub daily: Vec<DayPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentConditions {
    /// Temperature in °C.
    pub temp: f64,
    /// Free-text condition category, e.g. "Cloudy".
    pub condition: String,
    pub wind: Wind,
    /// Relative humidity, 0–100.
    pub humidity: f64,
    /// Pressure in hPa.
    pub pressure: f64,
    /// Visibility in km.
    pub visibility: f64,
    pub uv_index: UvIndex,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Wind {
    /// Speed in km/h.
    pub speed: f64,
    /// Compass direction, e.g. "NW".
    pub direction: String,
    /// Gust speed in km/h, when the model reports one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gust: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UvIndex {
    pub value: f64,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HourPoint {
    /// Display string, e.g. "14:00".
    pub time: String,
    pub temp: f64,
    pub condition: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayPoint {
    /// Display label, e.g. "Tuesday".
    pub day: String,
    pub condition: String,
    pub low: f64,
    pub high: f64,
}

/// One active weather alert for a location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherAlert {
    pub title: String,
    pub description: String,
    pub severity: Severity,
    pub source: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
    Low,
    Moderate,
    High,
    Extreme,
}

impl Severity {
    pub const fn as_str(self) -> &'static str {
        match self {
            Severity::Low => "Low",
            Severity::Moderate => "Moderate",
            Severity::High => "High",
            Severity::Extreme => "Extreme",
        }
    }

    /// Parse one of the four enumerated severity labels.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Low" => Some(Severity::Low),
            "Moderate" => Some(Severity::Moderate),
            "High" => Some(Severity::High),
            "Extreme" => Some(Severity::Extreme),
            _ => None,
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn horizon_roundtrip() {
        for horizon in ForecastHorizon::all() {
            let days = horizon.days() as u8;
            let parsed = ForecastHorizon::try_from(days).expect("roundtrip should succeed");
            assert_eq!(*horizon, parsed);
        }
    }

    #[test]
    fn unsupported_horizon_is_input_error() {
        let err = ForecastHorizon::try_from(6).unwrap_err();
        assert!(matches!(err, QueryError::Input(_)));
        assert!(err.to_string().contains("5, 7 or 14"));
    }

    #[test]
    fn severity_roundtrip() {
        for severity in [
            Severity::Low,
            Severity::Moderate,
            Severity::High,
            Severity::Extreme,
        ] {
            assert_eq!(Severity::parse(severity.as_str()), Some(severity));
        }
    }

    #[test]
    fn unknown_severity_is_rejected() {
        assert_eq!(Severity::parse("Unknown"), None);
        assert_eq!(Severity::parse("high"), None);
    }
}
