use anyhow::Result;
use clap::{Parser, Subcommand};
use inquire::{Confirm, MultiSelect, Password, Text};

use skycast_core::{
    ALERT_CONDITIONS, AlertPreference, AlertsQueryService, Config, ConversationalQueryService,
    ForecastHorizon, JsonFileStore, LocationPreferences, PreferenceStore, QueryError,
    WeatherAlert, WeatherQueryService, WeatherRequest, WeatherSnapshot, backend_from_config,
};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "skycast", version, about = "Gemini-backed weather dashboard CLI")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the API credential and model for the generative-model API.
    Configure,

    /// Show current conditions and the forecast for a location.
    Show {
        /// Location name, e.g. "New York, NY".
        location: String,

        /// Forecast horizon in days (5, 7 or 14).
        #[arg(long, default_value_t = 5)]
        days: u8,

        /// Print the validated snapshot as JSON instead of text.
        #[arg(long)]
        json: bool,
    },

    /// List the active weather alerts for a location.
    Alerts {
        /// Location name.
        location: String,
    },

    /// Ask a free-form question about the weather at a location.
    Ask {
        /// Location name.
        location: String,

        /// The question, e.g. "Will I need an umbrella?".
        question: String,
    },

    /// Choose which alert conditions to subscribe to for a location.
    Notify {
        /// Location name.
        location: String,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show {
                location,
                days,
                json,
            } => show(location, days, json).await,
            Command::Alerts { location } => alerts(location).await,
            Command::Ask { location, question } => ask(location, question).await,
            Command::Notify { location } => notify(location),
        }
    }
}

fn configure() -> Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("Gemini API key:")
        .without_confirmation()
        .prompt()?;
    config.set_api_key(api_key);

    let model = Text::new("Model name:")
        .with_default(config.model())
        .prompt()?;
    config.model = Some(model);

    config.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

async fn show(location: String, days: u8, json: bool) -> Result<()> {
    let config = Config::load()?;
    let service = WeatherQueryService::new(backend_from_config(&config)?);
    let horizon = ForecastHorizon::try_from(days)?;
    let request = WeatherRequest::new(location, horizon);

    let snapshot = fetch_with_retry(&service, &request).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    } else {
        print_snapshot(&snapshot);
    }
    Ok(())
}

/// Fetch a snapshot, offering an interactive retry of the identical
/// request after a retryable failure. The previous result is never kept
/// around: a failed refresh clears it and only a fresh success is shown.
async fn fetch_with_retry(
    service: &WeatherQueryService,
    request: &WeatherRequest,
) -> Result<WeatherSnapshot> {
    loop {
        match service.fetch_weather(request, None).await {
            Ok(snapshot) => return Ok(snapshot),
            Err(err) => {
                eprintln!("{}", guidance(&err));
                let retryable = matches!(
                    err,
                    QueryError::Network(_) | QueryError::Format(_) | QueryError::Schema { .. }
                );
                if !retryable {
                    return Err(err.into());
                }
                let again = Confirm::new("Retry the same request?")
                    .with_default(true)
                    .prompt()?;
                if !again {
                    return Err(err.into());
                }
            }
        }
    }
}

async fn alerts(location: String) -> Result<()> {
    let config = Config::load()?;
    let service = AlertsQueryService::new(backend_from_config(&config)?);

    match service.fetch_alerts(&location, None).await {
        Ok(alerts) if alerts.is_empty() => {
            println!("No active weather alerts for {location}.");
            Ok(())
        }
        Ok(alerts) => {
            println!("Active weather alerts for {location}:");
            for alert in &alerts {
                print_alert(alert);
            }
            Ok(())
        }
        Err(err) => {
            eprintln!("{}", guidance(&err));
            Err(err.into())
        }
    }
}

async fn ask(location: String, question: String) -> Result<()> {
    let config = Config::load()?;
    let backend = backend_from_config(&config)?;
    let weather = WeatherQueryService::new(backend.clone());
    let conversation = ConversationalQueryService::new(backend);

    // Questions are grounded in a fresh snapshot, like the dashboard's
    // question panel that only opens once weather data is loaded.
    let request = WeatherRequest::new(location, ForecastHorizon::FiveDays);
    let snapshot = fetch_with_retry(&weather, &request).await?;

    match conversation.ask(&question, &snapshot, None).await {
        Ok(answer) => {
            println!("{answer}");
            Ok(())
        }
        Err(err) => {
            eprintln!("{}", guidance(&err));
            Err(err.into())
        }
    }
}

fn notify(location: String) -> Result<()> {
    let store = JsonFileStore::open_default()?;
    let existing = store.get(&location)?.unwrap_or_default();

    let options: Vec<&str> = ALERT_CONDITIONS.to_vec();
    let defaults: Vec<usize> = options
        .iter()
        .enumerate()
        .filter(|(_, condition)| {
            existing
                .get(**condition)
                .is_some_and(|pref| pref.enabled)
        })
        .map(|(idx, _)| idx)
        .collect();

    let chosen = MultiSelect::new("Get notified for:", options)
        .with_default(&defaults)
        .prompt()?;

    let mut preferences = LocationPreferences::new();
    for condition in ALERT_CONDITIONS {
        let enabled = chosen.contains(condition);
        // Keep a previously set threshold across toggles.
        let threshold = existing.get(*condition).and_then(|pref| pref.threshold);
        preferences.insert((*condition).to_string(), AlertPreference { enabled, threshold });
    }

    store.set(&location, &preferences)?;
    println!(
        "Saved alert preferences for {location} ({}).",
        store.path().display()
    );
    Ok(())
}

/// User-facing guidance keyed off the error classification.
fn guidance(err: &QueryError) -> String {
    match err {
        QueryError::Credential(_) => {
            format!("{err}\nCheck your API credential: run `skycast configure`.")
        }
        QueryError::Network(_) => {
            format!("{err}\nCheck your internet connection and try again.")
        }
        QueryError::Format(_) | QueryError::Schema { .. } => {
            format!("{err}\nThe model returned an unusable response; retrying usually helps.")
        }
        QueryError::Input(_) | QueryError::Cancelled => err.to_string(),
    }
}

fn print_snapshot(snapshot: &WeatherSnapshot) {
    let current = &snapshot.current;

    println!("{} — {}", snapshot.location, snapshot.date);
    println!();
    println!("  Now: {:.0}°C, {}", current.temp, current.condition);
    match current.wind.gust {
        Some(gust) => println!(
            "  Wind: {:.0} km/h {} (gusts {gust:.0} km/h)",
            current.wind.speed, current.wind.direction
        ),
        None => println!(
            "  Wind: {:.0} km/h {}",
            current.wind.speed, current.wind.direction
        ),
    }
    println!(
        "  Humidity: {:.0}%   Pressure: {:.0} hPa   Visibility: {:.0} km",
        current.humidity, current.pressure, current.visibility
    );
    println!(
        "  UV index: {:.0} ({})",
        current.uv_index.value, current.uv_index.description
    );

    println!();
    println!("  Next hours:");
    for hour in snapshot.hourly.iter().step_by(3) {
        println!(
            "    {:<6} {:>5.0}°C  {}",
            hour.time, hour.temp, hour.condition
        );
    }

    println!();
    println!("  {}-day forecast:", snapshot.daily.len());
    for day in &snapshot.daily {
        println!(
            "    {:<12} {:>4.0}° / {:>4.0}°  {}",
            day.day, day.low, day.high, day.condition
        );
    }
}

fn print_alert(alert: &WeatherAlert) {
    println!();
    println!("  [{}] {}", alert.severity, alert.title);
    println!("    {}", alert.description);
    println!("    Source: {}", alert.source);
}
