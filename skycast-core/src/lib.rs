//! Core library for the `skycast` CLI.
//!
//! This crate defines:
//! - Configuration & credentials handling for the generative-model API
//! - The three query services (weather snapshot, alerts, conversation)
//! - Shared payload extraction, schema validation and error classification
//! - Per-location alert-subscription preferences
//!
//! It is used by `skycast-cli`, but can also be reused by other binaries or services.

pub mod backend;
pub mod config;
pub mod error;
pub mod extract;
pub mod model;
pub mod prefs;
pub mod prompt;
pub mod service;
pub mod validate;

pub use backend::{GeminiBackend, TextModel, backend_from_config};
pub use config::Config;
pub use error::QueryError;
pub use model::{
    ForecastHorizon, HOURLY_WINDOW, Severity, WeatherAlert, WeatherRequest, WeatherSnapshot,
};
pub use prefs::{
    ALERT_CONDITIONS, AlertPreference, JsonFileStore, LocationPreferences, PreferenceStore,
    normalize_location,
};
pub use service::{AlertsQueryService, ConversationalQueryService, WeatherQueryService};
