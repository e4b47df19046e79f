use thiserror::Error;

#[derive(Error, Debug)]
pub enum SynsightError {
    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GatewayError {
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The backend answered with `success: false`.
    #[error("{0}")]
    Rejected(String),

    #[error("Malformed response: {0}")]
    Decode(String),

    #[error("Timed out after {0}s")]
    Timeout(u64),
}

impl GatewayError {
    /// Message suitable for showing to a user, falling back to `fallback`
    /// when the backend gave nothing useful.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            GatewayError::Rejected(msg) | GatewayError::Api { message: msg, .. }
                if !msg.trim().is_empty() =>
            {
                msg.clone()
            }
            GatewayError::Rejected(_) | GatewayError::Api { .. } => fallback.to_string(),
            other => other.to_string(),
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file error: {0}")]
    File(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
