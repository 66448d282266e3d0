use thiserror::Error;

/// Classified failure of a query-service call.
///
/// Every failed call maps to exactly one of these kinds so that callers
/// can key retry decisions and user messaging off the classification
/// instead of string-matching error text.
#[derive(Debug, Error)]
pub enum QueryError {
    /// API credential is missing or was rejected by the model API.
    #[error("credential error: {0}")]
    Credential(String),

    /// Transport-level failure: DNS, connect, timeout, non-success status.
    #[error("network error: {0}")]
    Network(String),

    /// The response text did not contain the expected JSON shape.
    #[error("format error: {0}")]
    Format(String),

    /// The response parsed as JSON but failed structural validation.
    #[error("schema error at `{field}`: {reason}")]
    Schema { field: String, reason: String },

    /// Caller-supplied input violated a precondition.
    #[error("invalid input: {0}")]
    Input(String),

    /// The call was cancelled before a response arrived.
    #[error("request was cancelled")]
    Cancelled,
}

impl QueryError {
    pub fn schema(field: impl Into<String>, reason: impl Into<String>) -> Self {
        QueryError::Schema {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl From<reqwest::Error> for QueryError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            QueryError::Network(format!("request timed out: {err}"))
        } else if err.is_connect() {
            QueryError::Network(format!("connection failed: {err}"))
        } else {
            QueryError::Network(err.to_string())
        }
    }
}
