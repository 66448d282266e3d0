use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;

use crate::{Config, error::QueryError};

pub mod gemini;

pub use gemini::GeminiBackend;

/// Seam between the query services and the generative model: one prompt
/// in, the model's raw text out. Implemented by [`GeminiBackend`] for
/// the real API and by scripted fakes in tests.
#[async_trait]
pub trait TextModel: Send + Sync + Debug {
    async fn generate(&self, prompt: &str) -> Result<String, QueryError>;
}

/// Construct the configured backend, or fail with a credential error
/// before any request is made.
pub fn backend_from_config(config: &Config) -> Result<Arc<dyn TextModel>, QueryError> {
    let api_key = config.api_key().ok_or_else(|| {
        QueryError::Credential(
            "no API key configured; run `skycast configure` or set GEMINI_API_KEY".to_string(),
        )
    })?;

    let backend = GeminiBackend::new(
        api_key,
        config.model().to_owned(),
        config.base_url().to_owned(),
    )?;

    Ok(Arc::new(backend))
}
