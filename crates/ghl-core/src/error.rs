//! Error types for ghl-core

/// Result type for ghl-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while configuring the client or running an operation
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A mandatory configuration value is absent. Fatal at startup.
    #[error("missing required configuration: {0}")]
    MissingConfiguration(&'static str),

    /// A configuration value is present but unusable
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A required argument is absent or empty
    #[error("missing required argument: {0}")]
    MissingArgument(String),

    /// Arguments have the wrong shape or an unsupported value
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),

    /// The request could not be sent or no response was received
    #[error("network error: {0}")]
    Transport(String),

    /// The remote service answered with a non-success status.
    /// `body` is the raw response text, unmodified.
    #[error("API error {status}: {body}")]
    Remote { status: u16, body: String },

    /// The operation name is not in the registry
    #[error("unknown tool: {0}")]
    UnknownOperation(String),

    /// A cross-entity lookup found no element with the requested ID
    #[error("{entity} with ID {id} not found")]
    NotFound { entity: &'static str, id: String },

    /// JSON serialization error
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Short class label, used as a structured logging field
    pub fn kind(&self) -> &'static str {
        match self {
            Error::MissingConfiguration(_) | Error::InvalidConfiguration(_) => "configuration",
            Error::MissingArgument(_) | Error::InvalidArguments(_) => "validation",
            Error::Transport(_) => "transport",
            Error::Remote { .. } => "remote",
            Error::UnknownOperation(_) => "unknown_operation",
            Error::NotFound { .. } => "not_found",
            Error::Json(_) => "json",
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Transport(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_error_keeps_body_verbatim() {
        let err = Error::Remote {
            status: 404,
            body: r#"{"message":"not found"}"#.to_string(),
        };
        assert_eq!(err.to_string(), r#"API error 404: {"message":"not found"}"#);
        assert_eq!(err.kind(), "remote");
    }

    #[test]
    fn not_found_names_the_id() {
        let err = Error::NotFound {
            entity: "Pipeline",
            id: "p-9".to_string(),
        };
        assert_eq!(err.to_string(), "Pipeline with ID p-9 not found");
    }

    #[test]
    fn validation_errors_share_a_kind() {
        assert_eq!(Error::MissingArgument("contactId".into()).kind(), "validation");
        assert_eq!(Error::InvalidArguments("bad".into()).kind(), "validation");
    }

    #[test]
    fn configuration_errors_share_a_kind() {
        assert_eq!(Error::MissingConfiguration("GHL_LOCATION_ID").kind(), "configuration");
        assert_eq!(Error::InvalidConfiguration("token".into()).kind(), "configuration");
    }
}
