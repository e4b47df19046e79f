use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::analysis::{AnalysisOptions, Platform};
use super::message::Message;

/// Title every session carries until its first query arrives.
pub const PLACEHOLDER_TITLE: &str = "New Chat";

const TITLE_MAX_CHARS: usize = 50;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default)]
    pub platform: Platform,
    #[serde(default)]
    pub message_count: u64,
    #[serde(default)]
    pub analysis_count: u64,
    #[serde(default)]
    pub preview: Option<String>,
    #[serde(default, rename = "isArchived", alias = "archived")]
    pub archived: bool,
    #[serde(default, rename = "isPinned", alias = "pinned")]
    pub pinned: bool,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

fn default_title() -> String {
    PLACEHOLDER_TITLE.into()
}

impl Session {
    pub fn new(id: String, platform: Platform) -> Self {
        let now = Utc::now();
        Self {
            id,
            title: default_title(),
            platform,
            message_count: 0,
            analysis_count: 0,
            preview: None,
            archived: false,
            pinned: false,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn has_placeholder_title(&self) -> bool {
        self.title == PLACEHOLDER_TITLE
    }

    /// Fold one query/result exchange into the cached summary.
    ///
    /// The title is seeded from the query only while it is still the
    /// placeholder; counters never decrease here.
    pub fn record_exchange(&mut self, query: &str, analyzed: bool) {
        if self.has_placeholder_title() {
            self.title = title_from_query(query);
        }
        self.message_count += if analyzed { 2 } else { 1 };
        if analyzed {
            self.analysis_count += 1;
        }
        self.preview = Some(query.to_string());
        self.updated_at = Utc::now();
    }

    pub fn clear_history(&mut self) {
        self.message_count = 0;
        self.analysis_count = 0;
        self.preview = None;
        self.updated_at = Utc::now();
    }
}

/// First 50 characters of the query, with an ellipsis when truncated.
pub fn title_from_query(query: &str) -> String {
    let truncated: String = query.chars().take(TITLE_MAX_CHARS).collect();
    if query.chars().count() > TITLE_MAX_CHARS {
        format!("{truncated}...")
    } else {
        truncated
    }
}

/// A session together with its message history, as returned by `GET /sessions/:id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionDetail {
    #[serde(flatten)]
    pub session: Session,
    #[serde(default)]
    pub messages: Vec<Message>,
}

/// Body of `POST /sessions`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionSeed {
    pub platform: Platform,
    pub options: SeedOptions,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SeedOptions {
    pub timeframe: String,
    pub language: String,
}

impl From<&AnalysisOptions> for SessionSeed {
    fn from(options: &AnalysisOptions) -> Self {
        Self {
            platform: options.platform,
            options: SeedOptions {
                timeframe: options.timeframe.clone(),
                language: options.language.clone(),
            },
        }
    }
}

/// Body of `PUT /sessions/:id`. Absent fields are left untouched server-side.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SessionPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_pinned: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListQuery {
    pub page: u32,
    pub limit: u32,
    pub archived: bool,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: 20,
            archived: false,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub pages: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionPage {
    #[serde(alias = "chats")]
    pub sessions: Vec<Session>,
    #[serde(default)]
    pub pagination: Pagination,
}
