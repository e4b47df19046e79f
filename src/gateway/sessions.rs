use async_trait::async_trait;
use serde::Deserialize;

use super::client::ApiClient;
use crate::core::error::GatewayError;
use crate::core::gateway::SessionGateway;
use crate::core::message::NewMessage;
use crate::core::session::{ListQuery, Session, SessionDetail, SessionPage, SessionPatch, SessionSeed};

pub struct HttpSessionGateway {
    api: ApiClient,
}

#[derive(Deserialize)]
struct ArchiveState {
    #[serde(rename = "isArchived")]
    is_archived: bool,
}

impl HttpSessionGateway {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl SessionGateway for HttpSessionGateway {
    async fn create(&self, seed: &SessionSeed) -> Result<Session, GatewayError> {
        tracing::debug!(platform = %seed.platform, "POST /sessions");
        self.api.post("/sessions", seed).await?.into_data()
    }

    async fn list(&self, query: &ListQuery) -> Result<SessionPage, GatewayError> {
        let params = [
            ("page", query.page.to_string()),
            ("limit", query.limit.to_string()),
            ("archived", query.archived.to_string()),
        ];
        self.api.get("/sessions", &params).await?.into_data()
    }

    async fn get(&self, session_id: &str) -> Result<SessionDetail, GatewayError> {
        self.api
            .get(&format!("/sessions/{session_id}"), &[])
            .await?
            .into_data()
    }

    async fn update(&self, session_id: &str, patch: &SessionPatch) -> Result<Session, GatewayError> {
        self.api
            .put(&format!("/sessions/{session_id}"), Some(patch))
            .await?
            .into_data()
    }

    async fn archive(&self, session_id: &str) -> Result<bool, GatewayError> {
        let state: ArchiveState = self
            .api
            .put::<(), _>(&format!("/sessions/{session_id}/archive"), None)
            .await?
            .into_data()?;
        Ok(state.is_archived)
    }

    async fn delete(&self, session_id: &str) -> Result<(), GatewayError> {
        self.api
            .delete::<serde_json::Value>(&format!("/sessions/{session_id}"))
            .await?
            .into_ack()
    }

    async fn append_message(&self, session_id: &str, message: &NewMessage) -> Result<(), GatewayError> {
        tracing::debug!(session_id, kind = ?message.kind, "POST /sessions/:id/messages");
        self.api
            .post::<_, serde_json::Value>(&format!("/sessions/{session_id}/messages"), message)
            .await?
            .into_ack()
    }

    async fn clear_messages(&self, session_id: &str) -> Result<(), GatewayError> {
        self.api
            .delete::<serde_json::Value>(&format!("/sessions/{session_id}/messages"))
            .await?
            .into_ack()
    }
}
