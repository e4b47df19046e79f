use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::analysis::AnalysisOptions;
use super::error::ConfigError;

/// Local development backend
const DEFAULT_API_URL: &str = "http://localhost:8000/api";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Base URL of the Synsight REST API
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Bearer token attached to every request
    #[serde(default)]
    pub api_token: Option<String>,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Upper bound on a single analysis; unset means wait indefinitely
    #[serde(default)]
    pub analysis_timeout_secs: Option<u64>,

    #[serde(default = "default_max_results")]
    pub max_results: u32,

    #[serde(default = "default_page_size")]
    pub page_size: u32,

    #[serde(default)]
    pub analysis: AnalysisOptions,

    #[serde(default)]
    pub progress: ProgressConfig,

    #[serde(default)]
    pub debug: bool,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.into()
}

fn default_request_timeout() -> u64 {
    120
}

fn default_max_results() -> u32 {
    100
}

fn default_page_size() -> u32 {
    20
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            api_token: None,
            request_timeout_secs: default_request_timeout(),
            analysis_timeout_secs: None,
            max_results: default_max_results(),
            page_size: default_page_size(),
            analysis: AnalysisOptions::default(),
            progress: ProgressConfig::default(),
            debug: false,
        }
    }
}

/// Pacing of the progress indicator shown while an analysis runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressConfig {
    #[serde(default = "default_step_labels")]
    pub steps: Vec<String>,
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
    /// Pause after the final step before the indicator resolves
    #[serde(default = "default_settle_ms")]
    pub settle_ms: u64,
}

fn default_step_labels() -> Vec<String> {
    vec![
        "Parsing query and extracting filters".into(),
        "Fetching data from social media sources".into(),
        "Running sentiment analysis model".into(),
        "Generating insights and visualizations".into(),
    ]
}

fn default_interval_ms() -> u64 {
    700
}

fn default_settle_ms() -> u64 {
    600
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            steps: default_step_labels(),
            interval_ms: default_interval_ms(),
            settle_ms: default_settle_ms(),
        }
    }
}

impl ProgressConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }
}

impl AppConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn analysis_timeout(&self) -> Option<Duration> {
        self.analysis_timeout_secs.map(Duration::from_secs)
    }

    pub fn has_api_token(&self) -> bool {
        self.api_token.as_ref().is_some_and(|t| !t.is_empty())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.api_url.starts_with("http://") || self.api_url.starts_with("https://")) {
            return Err(ConfigError::Invalid(format!(
                "api_url must be an http(s) URL, got '{}'",
                self.api_url
            )));
        }
        if self.progress.steps.is_empty() {
            return Err(ConfigError::Invalid("progress.steps must not be empty".into()));
        }
        if self.page_size == 0 {
            return Err(ConfigError::Invalid("page_size must be positive".into()));
        }
        Ok(())
    }
}

pub fn load_config(working_dir: Option<PathBuf>) -> Result<AppConfig, ConfigError> {
    let wd = working_dir.unwrap_or_else(|| std::env::current_dir().unwrap_or_default());

    let mut config = AppConfig::default();

    // Global config
    if let Some(config_dir) = dirs::config_dir() {
        let global_path = config_dir.join("synsight").join("config.json");
        if let Some(file_config) = read_config_file(&global_path)? {
            merge_config(&mut config, file_config);
        }
    }

    // Project-local config
    if let Some(file_config) = read_config_file(&wd.join("synsight.json"))? {
        merge_config(&mut config, file_config);
    }

    apply_env(&mut config);
    config.validate()?;

    Ok(config)
}

fn read_config_file(path: &Path) -> Result<Option<AppConfig>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content =
        std::fs::read_to_string(path).map_err(|e| ConfigError::File(e.to_string()))?;
    let file_config: AppConfig = serde_json::from_str(&content)
        .map_err(|e| ConfigError::Invalid(format!("{}: {e}", path.display())))?;
    tracing::debug!(path = %path.display(), "loaded config file");
    Ok(Some(file_config))
}

pub(crate) fn merge_config(base: &mut AppConfig, overlay: AppConfig) {
    if overlay.api_url != default_api_url() {
        base.api_url = overlay.api_url;
    }
    if overlay.api_token.is_some() {
        base.api_token = overlay.api_token;
    }
    if overlay.request_timeout_secs != default_request_timeout() {
        base.request_timeout_secs = overlay.request_timeout_secs;
    }
    if overlay.analysis_timeout_secs.is_some() {
        base.analysis_timeout_secs = overlay.analysis_timeout_secs;
    }
    if overlay.max_results != default_max_results() {
        base.max_results = overlay.max_results;
    }
    if overlay.page_size != default_page_size() {
        base.page_size = overlay.page_size;
    }
    if overlay.analysis != AnalysisOptions::default() {
        base.analysis = overlay.analysis;
    }
    if overlay.progress != ProgressConfig::default() {
        base.progress = overlay.progress;
    }
    if overlay.debug {
        base.debug = true;
    }
}

fn apply_env(config: &mut AppConfig) {
    if let Ok(url) = std::env::var("SYNSIGHT_API_URL") {
        if !url.is_empty() {
            config.api_url = url;
        }
    }
    if let Ok(token) = std::env::var("SYNSIGHT_API_TOKEN") {
        if !token.is_empty() {
            config.api_token = Some(token);
        }
    }
}
