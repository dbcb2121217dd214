//! Error types for the report runner.
//!
//! Uses `thiserror` for typed errors that surface through the runner
//! pipeline: configuration, ore table loading, NATS connectivity, and the
//! report fetch.

use moonbot_core::OreTableError;

/// Errors that can occur during runner operation.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// Configuration is invalid or missing.
    #[error("config error: {0}")]
    Config(String),

    /// The ore substitution table could not be loaded.
    #[error("ore table error: {0}")]
    OreTable(#[from] OreTableError),

    /// Failed to connect to or communicate with the NATS server.
    #[error("NATS error: {0}")]
    Nats(String),

    /// The report request could not be built.
    #[error("error creating request: {0}")]
    Request(String),

    /// The report service was unreachable or answered with an error.
    #[error("error getting request: {0}")]
    Fetch(String),

    /// The report document could not be decoded.
    #[error("error decoding response: {0}")]
    Decode(String),

    /// Serialization or deserialization failure.
    #[error("serde error: {0}")]
    Serde(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_failures_render_as_user_notices() {
        let err = RunnerError::Fetch("connection refused".to_owned());
        assert_eq!(err.to_string(), "error getting request: connection refused");

        let err = RunnerError::Decode("expected value at line 1 column 1".to_owned());
        assert_eq!(err.to_string(), "error decoding response: expected value at line 1 column 1");

        let err = RunnerError::Request("builder error".to_owned());
        assert_eq!(err.to_string(), "error creating request: builder error");
    }

    #[test]
    fn ore_table_errors_convert() {
        let err: RunnerError = moonbot_core::OreTableError::DuplicateSource(
            moonbot_types::OreTypeId(45_490),
        )
        .into();
        assert!(matches!(err, RunnerError::OreTable(_)));
    }
}
