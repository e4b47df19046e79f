use super::analysis::*;
use super::config::*;
use super::envelope::*;
use super::error::*;
use super::message::*;
use super::session::*;

#[test]
fn test_title_truncates_long_query() {
    let query = "What is the sentiment on EV adoption in 2024 across major cities and platforms right now";
    let title = title_from_query(query);
    assert_eq!(title, format!("{}...", &query[..50]));
    assert_eq!(title.chars().count(), 53);
}

#[test]
fn test_title_keeps_short_query() {
    assert_eq!(title_from_query("Tesla"), "Tesla");
}

#[test]
fn test_title_exactly_fifty_chars_has_no_ellipsis() {
    let query = "a".repeat(50);
    assert_eq!(title_from_query(&query), query);
}

#[test]
fn test_title_counts_characters_not_bytes() {
    let query = "é".repeat(60);
    let title = title_from_query(&query);
    assert_eq!(title, format!("{}...", "é".repeat(50)));
}

#[test]
fn test_session_creation() {
    let session = Session::new("s1".into(), Platform::Reddit);
    assert_eq!(session.title, PLACEHOLDER_TITLE);
    assert!(session.has_placeholder_title());
    assert_eq!(session.message_count, 0);
    assert_eq!(session.analysis_count, 0);
    assert!(!session.archived);
}

#[test]
fn test_record_exchange_seeds_title_once() {
    let mut session = Session::new("s1".into(), Platform::All);
    session.record_exchange("Tesla", true);
    assert_eq!(session.title, "Tesla");
    assert_eq!(session.message_count, 2);
    assert_eq!(session.analysis_count, 1);
    assert_eq!(session.preview.as_deref(), Some("Tesla"));

    session.record_exchange("Rivian", false);
    assert_eq!(session.title, "Tesla");
    assert_eq!(session.message_count, 3);
    assert_eq!(session.analysis_count, 1);
    assert_eq!(session.preview.as_deref(), Some("Rivian"));
}

#[test]
fn test_record_exchange_keeps_custom_title() {
    let mut session = Session::new("s1".into(), Platform::All);
    session.title = "My research".into();
    session.record_exchange("Tesla", true);
    assert_eq!(session.title, "My research");
}

#[test]
fn test_session_list_entry_deserialization() {
    let json = serde_json::json!({
        "_id": "65f0",
        "title": "Tesla",
        "platform": "reddit",
        "messageCount": 4,
        "analysisCount": 2,
        "preview": "Tesla",
        "isPinned": true,
        "updatedAt": "2024-03-01T10:00:00Z",
        "createdAt": "2024-03-01T09:00:00Z"
    });
    let session: Session = serde_json::from_value(json).unwrap();
    assert_eq!(session.id, "65f0");
    assert_eq!(session.platform, Platform::Reddit);
    assert_eq!(session.message_count, 4);
    assert_eq!(session.analysis_count, 2);
    assert!(session.pinned);
    assert!(!session.archived);
}

#[test]
fn test_session_detail_deserialization() {
    let json = serde_json::json!({
        "_id": "65f0",
        "title": "New Chat",
        "platform": "all",
        "isArchived": false,
        "messages": [
            { "_id": "m1", "type": "user", "content": "Tesla", "timestamp": "2024-03-01T10:00:00Z" },
            {
                "_id": "m2",
                "type": "ai",
                "content": { "overall_sentiment": "positive", "analysisId": "a1" },
                "query": "Tesla",
                "analysisId": "a1",
                "timestamp": "2024-03-01T10:00:05Z"
            }
        ],
        "createdAt": "2024-03-01T09:00:00Z",
        "updatedAt": "2024-03-01T10:00:05Z"
    });
    let detail: SessionDetail = serde_json::from_value(json).unwrap();
    assert_eq!(detail.session.id, "65f0");
    assert_eq!(detail.messages.len(), 2);
    assert_eq!(detail.messages[0].kind, MessageKind::User);
    assert_eq!(detail.messages[0].text(), Some("Tesla"));
    assert_eq!(detail.messages[1].kind, MessageKind::Ai);
    assert_eq!(detail.messages[1].analysis_id.as_deref(), Some("a1"));
    assert!(matches!(detail.messages[1].content, MessageContent::Analysis(_)));
}

#[test]
fn test_optimistic_messages() {
    let user = Message::optimistic_user("Tesla");
    assert!(user.is_temporary());
    assert_eq!(user.kind, MessageKind::User);
    assert!(user.analysis_id.is_none());

    let result = AnalysisResult {
        analysis_id: Some("a1".into()),
        payload: serde_json::Map::new(),
    };
    let ai = Message::optimistic_ai("Tesla", &result);
    assert!(ai.is_temporary());
    assert_eq!(ai.kind, MessageKind::Ai);
    assert_eq!(ai.analysis_id.as_deref(), Some("a1"));
    assert_eq!(ai.query.as_deref(), Some("Tesla"));
    assert_ne!(user.id, ai.id);
}

#[test]
fn test_new_message_wire_format() {
    let msg = Message::optimistic_user("Tesla");
    let body = serde_json::to_value(NewMessage::from(&msg)).unwrap();
    assert_eq!(body, serde_json::json!({ "type": "user", "content": "Tesla" }));
}

#[test]
fn test_envelope_into_data() {
    let env: Envelope<u32> = serde_json::from_str(r#"{"success":true,"data":7}"#).unwrap();
    assert_eq!(env.into_data().unwrap(), 7);

    let env: Envelope<u32> =
        serde_json::from_str(r#"{"success":false,"message":"Chat not found"}"#).unwrap();
    assert_eq!(
        env.into_data().unwrap_err(),
        GatewayError::Rejected("Chat not found".into())
    );

    let env: Envelope<u32> = serde_json::from_str(r#"{"success":true}"#).unwrap();
    assert!(matches!(env.into_data(), Err(GatewayError::Decode(_))));
}

#[test]
fn test_envelope_ack_ignores_payload() {
    let env: Envelope<serde_json::Value> =
        serde_json::from_str(r#"{"success":true,"message":"Chat deleted successfully"}"#).unwrap();
    assert!(env.into_ack().is_ok());
}

#[test]
fn test_user_message_fallback() {
    assert_eq!(
        GatewayError::Rejected(String::new()).user_message("Analysis failed"),
        "Analysis failed"
    );
    assert_eq!(
        GatewayError::Rejected("quota exceeded".into()).user_message("Analysis failed"),
        "quota exceeded"
    );
    assert_eq!(
        GatewayError::Timeout(30).user_message("Analysis failed"),
        "Timed out after 30s"
    );
}

#[test]
fn test_analysis_request_platform_flags() {
    let options = AnalysisOptions::default();
    let body = serde_json::to_value(AnalysisRequest::new("Tesla", &options, 100)).unwrap();
    assert_eq!(body["maxResults"], 100);
    assert_eq!(body["timeframe"], "last7days");
    assert_eq!(body["platforms"]["reddit"], true);

    let options = AnalysisOptions {
        platform: Platform::Twitter,
        ..Default::default()
    };
    let body = serde_json::to_value(AnalysisRequest::new("Tesla", &options, 50)).unwrap();
    assert!(body.get("platforms").is_none());
}

#[test]
fn test_overrides_fall_back_to_base() {
    let base = AnalysisOptions::default();
    let merged = QueryOverrides {
        platform: Some(Platform::Bluesky),
        language: Some("de".into()),
        ..Default::default()
    }
    .apply(base);
    assert_eq!(merged.platform, Platform::Bluesky);
    assert_eq!(merged.language, "de");
    assert_eq!(merged.timeframe, "last7days");
}

#[test]
fn test_platform_parsing() {
    assert_eq!("Reddit".parse::<Platform>().unwrap(), Platform::Reddit);
    assert_eq!("x".parse::<Platform>().unwrap(), Platform::Twitter);
    assert!("myspace".parse::<Platform>().is_err());
    assert_eq!(Platform::Bluesky.to_string(), "bluesky");
}

#[test]
fn test_analysis_result_round_trips_id() {
    let json = serde_json::json!({
        "analysisId": "a1",
        "overall_sentiment": "negative",
        "total_analyzed": 120
    });
    let result: AnalysisResult = serde_json::from_value(json.clone()).unwrap();
    assert_eq!(result.analysis_id.as_deref(), Some("a1"));
    assert_eq!(result.overall_sentiment(), Some("negative"));
    assert_eq!(result.total_analyzed(), Some(120));
    assert_eq!(result.to_value(), json);
}

#[test]
fn test_config_defaults() {
    let config = AppConfig::default();
    assert_eq!(config.api_url, "http://localhost:8000/api");
    assert_eq!(config.max_results, 100);
    assert_eq!(config.progress.steps.len(), 4);
    assert_eq!(config.progress.interval_ms, 700);
    assert!(config.analysis_timeout().is_none());
    assert!(config.validate().is_ok());
}

#[test]
fn test_config_merge_only_overrides_changed_fields() {
    let mut base = AppConfig {
        api_token: Some("t1".into()),
        ..Default::default()
    };
    let overlay: AppConfig = serde_json::from_str(
        r#"{"api_url":"https://api.synsight.io/api","analysis_timeout_secs":30}"#,
    )
    .unwrap();
    merge_config(&mut base, overlay);
    assert_eq!(base.api_url, "https://api.synsight.io/api");
    assert_eq!(base.api_token.as_deref(), Some("t1"));
    assert_eq!(base.analysis_timeout_secs, Some(30));
    assert_eq!(base.max_results, 100);
}

#[test]
fn test_load_local_config_file() {
    let tmp = tempfile::tempdir().unwrap();
    std::fs::write(
        tmp.path().join("synsight.json"),
        r#"{"page_size": 5, "analysis": {"platform": "reddit", "language": "fr"}}"#,
    )
    .unwrap();

    let config = load_config(Some(tmp.path().to_path_buf())).unwrap();
    assert_eq!(config.page_size, 5);
    assert_eq!(config.analysis.platform, Platform::Reddit);
    assert_eq!(config.analysis.language, "fr");
    assert_eq!(config.analysis.timeframe, "last7days");
}

#[test]
fn test_load_rejects_malformed_config() {
    let tmp = tempfile::tempdir().unwrap();
    std::fs::write(tmp.path().join("synsight.json"), "{ not json").unwrap();
    let err = load_config(Some(tmp.path().to_path_buf())).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));
}

#[test]
fn test_validate_rejects_empty_steps() {
    let config = AppConfig {
        progress: ProgressConfig {
            steps: vec![],
            ..Default::default()
        },
        ..Default::default()
    };
    assert!(config.validate().is_err());
}
