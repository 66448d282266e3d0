//! The three query services sharing one call → extract → validate →
//! classify pipeline over a [`TextModel`] backend.
//!
//! Services are stateless and single shot: one call in, one validated
//! result or one classified failure out. No internal retry, no caching,
//! no ordering guarantees between in-flight calls. Superseding an
//! in-flight call is the caller's concern (last write wins at the
//! caller, not here).

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument};

use crate::backend::TextModel;
use crate::error::QueryError;
use crate::extract::extract_json_object;
use crate::model::{WeatherAlert, WeatherRequest, WeatherSnapshot};
use crate::{prompt, validate};

/// Run one backend call, optionally racing it against cancellation.
///
/// On cancellation the in-flight future is dropped, so a response that
/// arrives afterwards is never observable by the caller.
async fn generate(
    model: &dyn TextModel,
    prompt: &str,
    cancel: Option<&CancellationToken>,
) -> Result<String, QueryError> {
    match cancel {
        Some(token) => {
            tokio::select! {
                biased;
                () = token.cancelled() => Err(QueryError::Cancelled),
                result = model.generate(prompt) => result,
            }
        }
        None => model.generate(prompt).await,
    }
}

/// Fetches a validated [`WeatherSnapshot`] for a location and horizon.
#[derive(Debug, Clone)]
pub struct WeatherQueryService {
    model: Arc<dyn TextModel>,
}

impl WeatherQueryService {
    pub fn new(model: Arc<dyn TextModel>) -> Self {
        Self { model }
    }

    /// Fetch a snapshot. All-or-nothing: any schema violation fails the
    /// whole call; the result is never truncated, padded or merged with
    /// an earlier snapshot.
    #[instrument(skip(self, cancel), fields(location = %request.location, days = request.horizon.days()))]
    pub async fn fetch_weather(
        &self,
        request: &WeatherRequest,
        cancel: Option<&CancellationToken>,
    ) -> Result<WeatherSnapshot, QueryError> {
        if request.location.trim().is_empty() {
            return Err(QueryError::Input("location must not be empty".to_string()));
        }

        let prompt = prompt::weather(&request.location, request.horizon);
        let text = generate(self.model.as_ref(), &prompt, cancel).await?;
        let value = extract_json_object(&text)?;
        let snapshot = validate::snapshot(&value, request.horizon)?;

        debug!(
            location = %snapshot.location,
            daily = snapshot.daily.len(),
            "validated weather snapshot"
        );
        Ok(snapshot)
    }

    /// Re-issue a previously failed request with identical parameters.
    pub async fn retry(
        &self,
        request: &WeatherRequest,
        cancel: Option<&CancellationToken>,
    ) -> Result<WeatherSnapshot, QueryError> {
        self.fetch_weather(request, cancel).await
    }
}

/// Fetches the active alerts for a location.
#[derive(Debug, Clone)]
pub struct AlertsQueryService {
    model: Arc<dyn TextModel>,
}

impl AlertsQueryService {
    pub fn new(model: Arc<dyn TextModel>) -> Self {
        Self { model }
    }

    /// Fetch the alert list. Per-entry validation: invalid entries are
    /// dropped, the rest are returned. An empty list is a success,
    /// distinct from any failure.
    #[instrument(skip(self, cancel))]
    pub async fn fetch_alerts(
        &self,
        location: &str,
        cancel: Option<&CancellationToken>,
    ) -> Result<Vec<WeatherAlert>, QueryError> {
        if location.trim().is_empty() {
            return Err(QueryError::Input("location must not be empty".to_string()));
        }

        let prompt = prompt::alerts(location);
        let text = generate(self.model.as_ref(), &prompt, cancel).await?;
        let value = extract_json_object(&text)?;
        let alerts = validate::alerts(&value)?;

        debug!(count = alerts.len(), "validated alert list");
        Ok(alerts)
    }
}

/// Answers free-form questions grounded in the last known snapshot.
#[derive(Debug, Clone)]
pub struct ConversationalQueryService {
    model: Arc<dyn TextModel>,
}

impl ConversationalQueryService {
    pub fn new(model: Arc<dyn TextModel>) -> Self {
        Self { model }
    }

    /// Ask a question about the given snapshot. An empty or
    /// whitespace-only question is rejected before any outbound call.
    /// Answers are free text; no determinism or idempotence is promised.
    #[instrument(skip(self, context, cancel))]
    pub async fn ask(
        &self,
        question: &str,
        context: &WeatherSnapshot,
        cancel: Option<&CancellationToken>,
    ) -> Result<String, QueryError> {
        if question.trim().is_empty() {
            return Err(QueryError::Input("question must not be empty".to_string()));
        }

        let context_json = serde_json::to_string(context)
            .map_err(|e| QueryError::Format(format!("failed to serialize snapshot: {e}")))?;
        let prompt = prompt::conversation(question.trim(), &context_json);
        let answer = generate(self.model.as_ref(), &prompt, cancel).await?;

        Ok(answer.trim().to_string())
    }
}
