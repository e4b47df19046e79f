use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    #[default]
    All,
    Twitter,
    Reddit,
    Bluesky,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::All => "all",
            Platform::Twitter => "twitter",
            Platform::Reddit => "reddit",
            Platform::Bluesky => "bluesky",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Platform::All),
            "twitter" | "x" => Ok(Platform::Twitter),
            "reddit" => Ok(Platform::Reddit),
            "bluesky" => Ok(Platform::Bluesky),
            other => Err(format!("unknown platform: {other}")),
        }
    }
}

/// Which sources a multi-platform analysis should draw from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformFlags {
    #[serde(default = "enabled")]
    pub twitter: bool,
    #[serde(default = "enabled")]
    pub reddit: bool,
    #[serde(default = "enabled")]
    pub bluesky: bool,
}

fn enabled() -> bool {
    true
}

impl Default for PlatformFlags {
    fn default() -> Self {
        Self {
            twitter: true,
            reddit: true,
            bluesky: true,
        }
    }
}

/// Per-request analysis configuration. The orchestrator hands a snapshot
/// to the analysis gateway; the gateway only reads it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisOptions {
    #[serde(default)]
    pub platform: Platform,
    #[serde(default = "default_timeframe")]
    pub timeframe: String,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default)]
    pub platforms: PlatformFlags,
}

fn default_timeframe() -> String {
    "last7days".into()
}

fn default_language() -> String {
    "en".into()
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            platform: Platform::All,
            timeframe: default_timeframe(),
            language: default_language(),
            platforms: PlatformFlags::default(),
        }
    }
}

/// One-off overrides for a single query; unset fields fall back to the
/// orchestrator's configured options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryOverrides {
    pub platform: Option<Platform>,
    pub timeframe: Option<String>,
    pub language: Option<String>,
    pub platforms: Option<PlatformFlags>,
}

impl QueryOverrides {
    pub fn apply(self, base: AnalysisOptions) -> AnalysisOptions {
        AnalysisOptions {
            platform: self.platform.unwrap_or(base.platform),
            timeframe: self.timeframe.unwrap_or(base.timeframe),
            language: self.language.unwrap_or(base.language),
            platforms: self.platforms.unwrap_or(base.platforms),
        }
    }
}

/// Body of `POST /analysis/multi-platform` and `POST /analysis/:platform`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest {
    pub query: String,
    pub max_results: u32,
    pub timeframe: String,
    pub language: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platforms: Option<PlatformFlags>,
}

impl AnalysisRequest {
    pub fn new(query: &str, options: &AnalysisOptions, max_results: u32) -> Self {
        Self {
            query: query.to_string(),
            max_results,
            timeframe: options.timeframe.clone(),
            language: options.language.clone(),
            platforms: (options.platform == Platform::All).then(|| options.platforms.clone()),
        }
    }
}

/// Analysis payload returned by the backend. Only the analysis id matters to
/// the orchestrator; everything else is carried through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    #[serde(rename = "analysisId", default, skip_serializing_if = "Option::is_none")]
    pub analysis_id: Option<String>,
    #[serde(flatten)]
    pub payload: serde_json::Map<String, serde_json::Value>,
}

impl AnalysisResult {
    pub fn to_value(&self) -> serde_json::Value {
        let mut map = self.payload.clone();
        if let Some(id) = &self.analysis_id {
            map.insert("analysisId".into(), serde_json::Value::String(id.clone()));
        }
        serde_json::Value::Object(map)
    }

    pub fn overall_sentiment(&self) -> Option<&str> {
        self.payload
            .get("overall_sentiment")
            .and_then(serde_json::Value::as_str)
    }

    pub fn total_analyzed(&self) -> Option<u64> {
        self.payload
            .get("total_analyzed")
            .and_then(serde_json::Value::as_u64)
    }
}
