//! Error types for the CLI

/// CLI Result type
pub type Result<T> = std::result::Result<T, Error>;

/// CLI errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("telemetry error: {0}")]
    Telemetry(#[from] machine_sync_common::telemetry::TelemetryError),

    #[error("unsupported manifest: {api_version} {kind}")]
    UnsupportedKind { api_version: String, kind: String },

    #[error("invalid input: {message}")]
    Validation { message: String },

    #[error("conversion failed: {0}")]
    Conversion(#[from] machine_sync_common::Error),
}

impl Error {
    pub fn validation(message: impl Into<String>) -> Self {
        Error::Validation {
            message: message.into(),
        }
    }

    pub fn unsupported_kind(api_version: impl Into<String>, kind: impl Into<String>) -> Self {
        Error::UnsupportedKind {
            api_version: api_version.into(),
            kind: kind.into(),
        }
    }

    /// Render for the terminal, one line per aggregated conversion error
    pub fn report(&self) -> String {
        match self {
            Error::Conversion(machine_sync_common::Error::Aggregate(agg)) if agg.len() > 1 => {
                let mut out = String::from("conversion failed:");
                for err in agg.errors() {
                    out.push_str("\n  - ");
                    out.push_str(&err.to_string());
                }
                out
            }
            other => other.to_string(),
        }
    }
}
