use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::analysis::AnalysisResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    User,
    Ai,
}

/// Raw query text for `user` messages, the analysis payload for `ai` ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Analysis(serde_json::Value),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(rename = "type")]
    pub kind: MessageKind,
    pub content: MessageContent,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis_id: Option<String>,
    #[serde(alias = "timestamp", default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl Message {
    /// Local user message shown before the backend has confirmed it.
    pub fn optimistic_user(query: &str) -> Self {
        Self {
            id: temp_id("user"),
            kind: MessageKind::User,
            content: MessageContent::Text(query.to_string()),
            query: None,
            analysis_id: None,
            created_at: Utc::now(),
        }
    }

    pub fn optimistic_ai(query: &str, result: &AnalysisResult) -> Self {
        Self {
            id: temp_id("ai"),
            kind: MessageKind::Ai,
            content: MessageContent::Analysis(result.to_value()),
            query: Some(query.to_string()),
            analysis_id: result.analysis_id.clone(),
            created_at: Utc::now(),
        }
    }

    pub fn is_temporary(&self) -> bool {
        self.id.starts_with("temp-")
    }

    pub fn text(&self) -> Option<&str> {
        match &self.content {
            MessageContent::Text(text) => Some(text),
            MessageContent::Analysis(_) => None,
        }
    }
}

fn temp_id(kind: &str) -> String {
    format!("temp-{kind}-{}", uuid::Uuid::new_v4())
}

/// Body of `POST /sessions/:id/messages`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMessage {
    #[serde(rename = "type")]
    pub kind: MessageKind,
    pub content: MessageContent,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis_id: Option<String>,
}

impl From<&Message> for NewMessage {
    fn from(msg: &Message) -> Self {
        Self {
            kind: msg.kind,
            content: msg.content.clone(),
            query: msg.query.clone(),
            analysis_id: msg.analysis_id.clone(),
        }
    }
}
