use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::analyze::{self, AnalyzeData};
use crate::config::AnalysisConfig;
use crate::extract;
use crate::page::PageAccessor;
use crate::provider::ProviderClient;

/// Action-tagged request messages. The wire shape is preserved from the
/// original extension so recorded traffic stays readable.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "action")]
pub enum Request {
    #[serde(rename = "analyzeWithAI")]
    AnalyzeWithAi { data: AnalyzeData },
    #[serde(rename = "testAPIConnection")]
    TestApiConnection { config: AnalysisConfig },
    #[serde(rename = "extractPageContent")]
    ExtractPageContent,
    #[serde(rename = "extractTextForSentiment")]
    ExtractTextForSentiment,
    #[serde(rename = "extractImages")]
    ExtractImages,
    #[serde(rename = "ping")]
    Ping,
}

/// Wraps a payload object in a `{success: true, ...}` envelope.
pub fn success(payload: Value) -> Value {
    let mut map = match payload {
        Value::Object(map) => map,
        other => {
            let mut map = Map::new();
            map.insert("result".to_owned(), other);
            map
        }
    };
    map.insert("success".to_owned(), Value::Bool(true));
    Value::Object(map)
}

/// `{success: false, error}` envelope. Error chains are flattened into one
/// message because the receiving side renders a single string.
pub fn failure(error: impl std::fmt::Display) -> Value {
    json!({ "success": false, "error": error.to_string() })
}

/// Routes the page-side actions (extraction and the liveness ping).
/// Requests meant for the background side come back as failures rather
/// than panics.
pub fn handle_content(request: &Request, page: &impl PageAccessor) -> Value {
    match request {
        Request::ExtractPageContent => {
            let content = extract::page_content(page);
            match serde_json::to_value(content) {
                Ok(content) => success(json!({ "content": content })),
                Err(err) => failure(err),
            }
        }
        Request::ExtractTextForSentiment => {
            let text = extract::text_for_sentiment(page);
            match serde_json::to_value(text) {
                Ok(payload) => success(payload),
                Err(err) => failure(err),
            }
        }
        Request::ExtractImages => {
            let images = extract::images(page);
            match serde_json::to_value(images) {
                Ok(images) => success(json!({ "images": images })),
                Err(err) => failure(err),
            }
        }
        Request::Ping => success(json!({})),
        Request::AnalyzeWithAi { .. } | Request::TestApiConnection { .. } => {
            failure("unknown content action")
        }
    }
}

/// Routes the background-side actions (provider calls). Every failure is
/// folded into the envelope; nothing escapes as an Err.
pub async fn handle_background(request: &Request, client: &ProviderClient) -> Value {
    match request {
        Request::AnalyzeWithAi { data } => {
            match analyze::analyze_with_ai(client, data).await {
                Ok(result) => match serde_json::to_value(result) {
                    Ok(result) => success(json!({ "result": result })),
                    Err(err) => failure(err),
                },
                Err(err) => failure(format!("{err:#}")),
            }
        }
        Request::TestApiConnection { config } => {
            match analyze::test_connection(client, config).await {
                Ok(report) => match serde_json::to_value(report) {
                    Ok(payload) => success(payload),
                    Err(err) => failure(err),
                },
                Err(err) => failure(format!("{err:#}")),
            }
        }
        _ => failure("unknown background action"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::DomPage;

    #[test]
    fn requests_serialize_with_action_tags() {
        let value = serde_json::to_value(&Request::ExtractPageContent).unwrap();
        assert_eq!(value, json!({ "action": "extractPageContent" }));

        let round_trip: Request =
            serde_json::from_value(json!({ "action": "ping" })).unwrap();
        assert!(matches!(round_trip, Request::Ping));
    }

    #[test]
    fn ping_reports_liveness() {
        let page = DomPage::parse("<html></html>", "");
        let envelope = handle_content(&Request::Ping, &page);
        assert_eq!(envelope, json!({ "success": true }));
    }

    #[test]
    fn extraction_envelope_carries_the_content() {
        let page = DomPage::parse(
            "<html><body><article>Hello world.</article></body></html>",
            "https://example.com/",
        );
        let envelope = handle_content(&Request::ExtractPageContent, &page);
        assert_eq!(envelope["success"], json!(true));
        assert_eq!(envelope["content"]["text"], json!("Hello world."));
        assert_eq!(envelope["content"]["headings"], json!([]));
    }

    #[test]
    fn sentiment_envelope_is_flat() {
        let page = DomPage::parse(
            "<html><body><p>plenty of words to keep here</p></body></html>",
            "https://example.com/",
        );
        let envelope = handle_content(&Request::ExtractTextForSentiment, &page);
        assert_eq!(envelope["success"], json!(true));
        assert!(envelope["text"].is_string());
        assert!(envelope["wordCount"].is_u64());
    }

    #[test]
    fn misrouted_actions_fail_without_panicking() {
        let page = DomPage::parse("<html></html>", "");
        let envelope = handle_content(
            &Request::TestApiConnection {
                config: crate::config::AnalysisConfig {
                    provider: String::new(),
                    model: String::new(),
                    api_key: String::new(),
                    summary_length: Default::default(),
                    response_language: "en".to_owned(),
                },
            },
            &page,
        );
        assert_eq!(envelope["success"], json!(false));
    }
}
