//! Error types and handling for the travel planner tools

use thiserror::Error;

/// Main error type for the travel planner tools
#[derive(Error, Debug)]
pub enum PlannerError {
    /// Missing credentials or invalid settings, raised before any network call
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// The upstream provider rejected the request
    #[error("Upstream rejected the request ({status}): {body}")]
    Upstream { status: String, body: String },

    /// A location search returned no results
    #[error("Location not found: {query}")]
    NotFound { query: String },

    /// The upstream payload could not be turned into a result
    #[error("Invalid response: {message}")]
    InvalidResponse { message: String },

    /// A tool was called with missing or malformed arguments
    #[error("Invalid arguments: {message}")]
    InvalidArguments { message: String },

    /// HTTP transport or body decoding errors. The request URL is stripped
    /// since it carries the API key in its query string.
    #[error("HTTP error: {source}")]
    Http { source: reqwest::Error },
}

impl From<reqwest::Error> for PlannerError {
    fn from(source: reqwest::Error) -> Self {
        Self::Http {
            source: source.without_url(),
        }
    }
}

impl PlannerError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new upstream rejection carrying the provider status and raw body
    pub fn upstream<S: Into<String>, B: Into<String>>(status: S, body: B) -> Self {
        Self::Upstream {
            status: status.into(),
            body: body.into(),
        }
    }

    /// Create a new not-found error for a search query
    pub fn not_found<S: Into<String>>(query: S) -> Self {
        Self::NotFound {
            query: query.into(),
        }
    }

    /// Create a new invalid response error
    pub fn invalid_response<S: Into<String>>(message: S) -> Self {
        Self::InvalidResponse {
            message: message.into(),
        }
    }

    /// Create a new invalid arguments error
    pub fn invalid_arguments<S: Into<String>>(message: S) -> Self {
        Self::InvalidArguments {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            PlannerError::Config { .. } => {
                "Configuration error. Please check your config file and API keys.".to_string()
            }
            PlannerError::Upstream { .. } => {
                "The weather or maps service rejected the request. Please try again later."
                    .to_string()
            }
            PlannerError::NotFound { query } => {
                format!("Location not found: {query}")
            }
            PlannerError::InvalidResponse { .. } => {
                "Received an unexpected response from an external service.".to_string()
            }
            PlannerError::InvalidArguments { message } => {
                format!("Invalid input: {message}")
            }
            PlannerError::Http { .. } => {
                "Unable to connect to external services. Please check your internet connection."
                    .to_string()
            }
        }
    }
}
