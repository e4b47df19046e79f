use async_trait::async_trait;

use super::analysis::{AnalysisOptions, AnalysisResult};
use super::error::GatewayError;
use super::message::NewMessage;
use super::session::{ListQuery, Session, SessionDetail, SessionPage, SessionPatch, SessionSeed};

/// Session CRUD against the backend. Every call is a single round trip.
#[async_trait]
pub trait SessionGateway: Send + Sync {
    async fn create(&self, seed: &SessionSeed) -> Result<Session, GatewayError>;

    async fn list(&self, query: &ListQuery) -> Result<SessionPage, GatewayError>;

    async fn get(&self, session_id: &str) -> Result<SessionDetail, GatewayError>;

    async fn update(&self, session_id: &str, patch: &SessionPatch) -> Result<Session, GatewayError>;

    /// Toggle the archived flag; returns the new value.
    async fn archive(&self, session_id: &str) -> Result<bool, GatewayError>;

    async fn delete(&self, session_id: &str) -> Result<(), GatewayError>;

    async fn append_message(&self, session_id: &str, message: &NewMessage) -> Result<(), GatewayError>;

    async fn clear_messages(&self, session_id: &str) -> Result<(), GatewayError>;
}

#[async_trait]
pub trait AnalysisGateway: Send + Sync {
    async fn analyze(
        &self,
        query: &str,
        options: &AnalysisOptions,
    ) -> Result<AnalysisResult, GatewayError>;
}
