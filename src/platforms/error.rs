use thiserror::Error;

/// Reasons a single probe call produced no data point. None of these stop a run.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("Failed with status {0}")]
    Status(u16),
    #[error("Request failed - {0}")]
    Reqwest(#[from] reqwest::Error),
    #[error("Malformed response body - {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors that end the run.
#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("Failed to read configuration: {0}")]
    Config(#[from] config::ConfigError),
    #[error("{0} is not a registered platform.")]
    UnknownPlatform(String),
    #[error("Failed to build http client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("Failed to write results: {0}")]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_names_the_status_code() {
        assert_eq!(ProbeError::Status(503).to_string(), "Failed with status 503");
    }

    #[test]
    fn json_error_converts_from_serde() {
        let err: ProbeError = serde_json::from_str::<serde_json::Value>("<html>")
            .unwrap_err()
            .into();
        assert!(matches!(err, ProbeError::Json(_)));
    }

    #[test]
    fn unknown_platform_error_names_the_platform() {
        let err = HarnessError::UnknownPlatform("Lambda".to_string());
        assert_eq!(err.to_string(), "Lambda is not a registered platform.");
    }
}
