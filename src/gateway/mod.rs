mod analysis;
mod client;
mod sessions;


pub use analysis::HttpAnalysisGateway;
pub use client::ApiClient;
pub use sessions::HttpSessionGateway;

use crate::core::config::AppConfig;
use crate::core::error::GatewayError;
use crate::core::gateway::{AnalysisGateway, SessionGateway};
use std::sync::Arc;

/// Session and analysis gateways sharing one connection pool.
pub struct Gateways {
    pub sessions: Arc<dyn SessionGateway>,
    pub analysis: Arc<dyn AnalysisGateway>,
}

pub fn create_gateways(config: &AppConfig) -> Result<Gateways, GatewayError> {
    let api = ApiClient::new(
        &config.api_url,
        config.api_token.clone(),
        config.request_timeout(),
    )?;
    if !config.has_api_token() {
        tracing::debug!("no API token configured; requests go out unauthenticated");
    }

    Ok(Gateways {
        sessions: Arc::new(HttpSessionGateway::new(api.clone())),
        analysis: Arc::new(HttpAnalysisGateway::new(api, config.max_results)),
    })
}
