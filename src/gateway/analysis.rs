use async_trait::async_trait;

use super::client::ApiClient;
use crate::core::analysis::{AnalysisOptions, AnalysisRequest, AnalysisResult, Platform};
use crate::core::error::GatewayError;
use crate::core::gateway::AnalysisGateway;

pub struct HttpAnalysisGateway {
    api: ApiClient,
    max_results: u32,
}

impl HttpAnalysisGateway {
    pub fn new(api: ApiClient, max_results: u32) -> Self {
        Self { api, max_results }
    }
}

fn endpoint(platform: Platform) -> String {
    match platform {
        Platform::All => "/analysis/multi-platform".into(),
        specific => format!("/analysis/{specific}"),
    }
}

#[async_trait]
impl AnalysisGateway for HttpAnalysisGateway {
    async fn analyze(
        &self,
        query: &str,
        options: &AnalysisOptions,
    ) -> Result<AnalysisResult, GatewayError> {
        let path = endpoint(options.platform);
        let body = AnalysisRequest::new(query, options, self.max_results);
        tracing::debug!(%path, timeframe = %options.timeframe, "requesting analysis");
        self.api.post(&path, &body).await?.into_data()
    }
}
