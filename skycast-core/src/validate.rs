//! Structural validation of parsed model payloads.
//!
//! The payload arrives as an untyped [`serde_json::Value`]; nothing about
//! its shape is assumed. Every accessor builds the dotted/indexed path of
//! the field it touches so a violation names exactly where the payload
//! went wrong, e.g. `current.wind.speed` or `daily[3].high`.

use serde_json::Value;
use tracing::warn;

use crate::error::QueryError;
use crate::model::{
    CurrentConditions, DayPoint, ForecastHorizon, HOURLY_WINDOW, HourPoint, Severity, UvIndex,
    WeatherAlert, WeatherSnapshot, Wind,
};

/// Validate a parsed payload into a [`WeatherSnapshot`].
///
/// All-or-nothing: the first invalid or missing field fails the whole
/// snapshot. The daily sequence must contain exactly `horizon.days()`
/// entries; a differing count is a schema error, never a truncation.
pub fn snapshot(value: &Value, horizon: ForecastHorizon) -> Result<WeatherSnapshot, QueryError> {
    let location = string_at(value, "", "location")?;
    let date = string_at(value, "", "date")?;
    let current = current_conditions(field_at(value, "", "current")?, "current")?;

    let hourly_values = array_at(value, "", "hourly")?;
    if hourly_values.len() != HOURLY_WINDOW {
        return Err(QueryError::schema(
            "hourly",
            format!("expected {HOURLY_WINDOW} entries, got {}", hourly_values.len()),
        ));
    }
    let hourly = hourly_values
        .iter()
        .enumerate()
        .map(|(idx, entry)| hour_point(entry, &format!("hourly[{idx}]")))
        .collect::<Result<Vec<_>, _>>()?;

    let daily_values = array_at(value, "", "daily")?;
    if daily_values.len() != horizon.days() {
        return Err(QueryError::schema(
            "daily",
            format!(
                "expected {} entries for the requested horizon, got {}",
                horizon.days(),
                daily_values.len()
            ),
        ));
    }
    let daily = daily_values
        .iter()
        .enumerate()
        .map(|(idx, entry)| day_point(entry, &format!("daily[{idx}]")))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(WeatherSnapshot {
        location,
        date,
        current,
        hourly,
        daily,
    })
}

/// Validate a parsed payload into a list of [`WeatherAlert`]s.
///
/// Per-entry policy: an entry that fails validation (unknown severity,
/// missing field) is dropped with a warning instead of failing the whole
/// list. Alert delivery is best effort; partial delivery beats none.
pub fn alerts(value: &Value) -> Result<Vec<WeatherAlert>, QueryError> {
    let entries = array_at(value, "", "alerts")?;

    let mut alerts = Vec::with_capacity(entries.len());
    for (idx, entry) in entries.iter().enumerate() {
        match alert(entry, &format!("alerts[{idx}]")) {
            Ok(parsed) => alerts.push(parsed),
            Err(err) => warn!(%err, "dropping invalid alert entry"),
        }
    }

    Ok(alerts)
}

fn alert(value: &Value, path: &str) -> Result<WeatherAlert, QueryError> {
    let severity_label = string_at(value, path, "severity")?;
    let severity = Severity::parse(&severity_label).ok_or_else(|| {
        QueryError::schema(
            join(path, "severity"),
            format!("'{severity_label}' is not one of Low, Moderate, High, Extreme"),
        )
    })?;

    Ok(WeatherAlert {
        title: string_at(value, path, "title")?,
        description: string_at(value, path, "description")?,
        severity,
        source: string_at(value, path, "source")?,
    })
}

fn current_conditions(value: &Value, path: &str) -> Result<CurrentConditions, QueryError> {
    let humidity = number_at(value, path, "humidity")?;
    if !(0.0..=100.0).contains(&humidity) {
        return Err(QueryError::schema(
            join(path, "humidity"),
            format!("{humidity} is outside the range 0-100"),
        ));
    }

    Ok(CurrentConditions {
        temp: number_at(value, path, "temp")?,
        condition: string_at(value, path, "condition")?,
        wind: wind(field_at(value, path, "wind")?, &join(path, "wind"))?,
        humidity,
        pressure: number_at(value, path, "pressure")?,
        visibility: number_at(value, path, "visibility")?,
        uv_index: uv_index(field_at(value, path, "uvIndex")?, &join(path, "uvIndex"))?,
    })
}

fn wind(value: &Value, path: &str) -> Result<Wind, QueryError> {
    let gust = match value.get("gust") {
        None | Some(Value::Null) => None,
        Some(_) => Some(number_at(value, path, "gust")?),
    };

    Ok(Wind {
        speed: number_at(value, path, "speed")?,
        direction: string_at(value, path, "direction")?,
        gust,
    })
}

fn uv_index(value: &Value, path: &str) -> Result<UvIndex, QueryError> {
    Ok(UvIndex {
        value: number_at(value, path, "value")?,
        description: string_at(value, path, "description")?,
    })
}

fn hour_point(value: &Value, path: &str) -> Result<HourPoint, QueryError> {
    Ok(HourPoint {
        time: string_at(value, path, "time")?,
        temp: number_at(value, path, "temp")?,
        condition: string_at(value, path, "condition")?,
    })
}

fn day_point(value: &Value, path: &str) -> Result<DayPoint, QueryError> {
    Ok(DayPoint {
        day: string_at(value, path, "day")?,
        condition: string_at(value, path, "condition")?,
        low: number_at(value, path, "low")?,
        high: number_at(value, path, "high")?,
    })
}

fn join(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{path}.{key}")
    }
}

fn field_at<'a>(value: &'a Value, path: &str, key: &str) -> Result<&'a Value, QueryError> {
    value
        .get(key)
        .ok_or_else(|| QueryError::schema(join(path, key), "missing required field"))
}

fn string_at(value: &Value, path: &str, key: &str) -> Result<String, QueryError> {
    match field_at(value, path, key)? {
        Value::String(s) => Ok(s.clone()),
        other => Err(QueryError::schema(
            join(path, key),
            format!("expected a string, got {}", type_name(other)),
        )),
    }
}

/// Accept a JSON number, or a string that parses as a bare number
/// (`"20"` is fine, `"20°C"` is not). The result must be finite.
fn number_at(value: &Value, path: &str, key: &str) -> Result<f64, QueryError> {
    let field = field_at(value, path, key)?;
    let parsed = match field {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    match parsed {
        Some(n) if n.is_finite() => Ok(n),
        _ => Err(QueryError::schema(
            join(path, key),
            format!("expected a finite number, got {}", type_name(field)),
        )),
    }
}

fn array_at<'a>(value: &'a Value, path: &str, key: &str) -> Result<&'a Vec<Value>, QueryError> {
    match field_at(value, path, key)? {
        Value::Array(entries) => Ok(entries),
        other => Err(QueryError::schema(
            join(path, key),
            format!("expected an array, got {}", type_name(other)),
        )),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
