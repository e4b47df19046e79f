use serde::{Deserialize, Serialize};

use super::error::GatewayError;

/// `{ success, data, message }` wrapper used by every backend response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub data: Option<T>,
    #[serde(default)]
    pub message: Option<String>,
}

impl<T> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.into()),
        }
    }

    /// Unwrap a payload-bearing envelope.
    pub fn into_data(self) -> Result<T, GatewayError> {
        if !self.success {
            return Err(self.rejection());
        }
        self.data
            .ok_or_else(|| GatewayError::Decode("envelope reported success without data".into()))
    }

    /// Check an acknowledgement envelope, ignoring any payload.
    pub fn into_ack(self) -> Result<(), GatewayError> {
        if self.success {
            Ok(())
        } else {
            Err(self.rejection())
        }
    }

    fn rejection(&self) -> GatewayError {
        GatewayError::Rejected(self.message.clone().unwrap_or_default())
    }
}
