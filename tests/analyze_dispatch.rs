mod provider_stub;

use std::collections::BTreeMap;

use pagelens::analyze::{AnalysisInput, AnalysisType, AnalyzeData};
use pagelens::config::{AnalysisConfig, SummaryLength};
use pagelens::extract::{PageContent, SentimentText};
use pagelens::message::{self, Request};
use pagelens::provider::ProviderClient;

use provider_stub::{ProviderStub, StubBehavior};

fn config(provider: &str) -> AnalysisConfig {
    AnalysisConfig {
        provider: provider.to_owned(),
        model: "stub-model".to_owned(),
        api_key: "sk-test".to_owned(),
        summary_length: SummaryLength::Medium,
        response_language: "en".to_owned(),
    }
}

fn page_content() -> PageContent {
    PageContent {
        title: "Example".to_owned(),
        url: "https://example.com/".to_owned(),
        text: "A short page about nothing much at all.".to_owned(),
        headings: Vec::new(),
        metadata: BTreeMap::new(),
    }
}

fn summary_request(config: AnalysisConfig) -> Request {
    Request::AnalyzeWithAi {
        data: AnalyzeData {
            content: AnalysisInput::Page(page_content()),
            analysis_type: AnalysisType::Summary,
            config,
        },
    }
}

#[tokio::test]
async fn missing_configuration_fails_without_any_network_call() {
    let stub = ProviderStub::spawn(StubBehavior::Reply("unused".to_owned()));
    let client = ProviderClient::new(&stub.base_url, &stub.base_url).unwrap();

    let mut config = config("openai");
    config.api_key = String::new();

    let envelope = message::handle_background(&summary_request(config), &client).await;
    assert_eq!(envelope["success"], false);
    assert_eq!(envelope["error"], "Missing AI configuration");
    assert_eq!(stub.request_count(), 0);
}

#[tokio::test]
async fn unsupported_provider_fails_before_network_io() {
    let stub = ProviderStub::spawn(StubBehavior::Reply("unused".to_owned()));
    let client = ProviderClient::new(&stub.base_url, &stub.base_url).unwrap();

    let envelope = message::handle_background(&summary_request(config("gemini")), &client).await;
    assert_eq!(envelope["success"], false);
    assert_eq!(envelope["error"], "Unsupported AI provider: gemini");
    assert_eq!(stub.request_count(), 0);
}

#[tokio::test]
async fn openai_summary_flows_through_the_chat_endpoint() {
    let stub = ProviderStub::spawn(StubBehavior::Reply("A fine summary.".to_owned()));
    let client = ProviderClient::new(&stub.base_url, &stub.base_url).unwrap();

    let envelope = message::handle_background(&summary_request(config("openai")), &client).await;
    assert_eq!(envelope["success"], true);
    assert_eq!(envelope["result"]["type"], "summary");
    assert_eq!(envelope["result"]["content"], "A fine summary.");
    assert_eq!(envelope["result"]["wordCount"], 8);
    assert_eq!(stub.request_count(), 1);

    let body = stub.last_body().expect("request body captured");
    assert_eq!(body["model"], "stub-model");
    assert_eq!(body["max_tokens"], 500);
    assert_eq!(body["temperature"], 0.3);
    assert_eq!(body["messages"][0]["role"], "user");
}

#[tokio::test]
async fn anthropic_summary_flows_through_the_messages_endpoint() {
    let stub = ProviderStub::spawn(StubBehavior::Reply("Summed up.".to_owned()));
    let client = ProviderClient::new(&stub.base_url, &stub.base_url).unwrap();

    let envelope =
        message::handle_background(&summary_request(config("anthropic")), &client).await;
    assert_eq!(envelope["success"], true);
    assert_eq!(envelope["result"]["content"], "Summed up.");
    assert_eq!(stub.request_count(), 1);

    let body = stub.last_body().expect("request body captured");
    assert_eq!(body["max_tokens"], 500);
    assert!(body.get("temperature").is_none());
}

#[tokio::test]
async fn upstream_errors_carry_the_provider_message() {
    let stub = ProviderStub::spawn(StubBehavior::Error {
        status: 401,
        message: "Incorrect API key provided".to_owned(),
    });
    let client = ProviderClient::new(&stub.base_url, &stub.base_url).unwrap();

    let envelope = message::handle_background(&summary_request(config("openai")), &client).await;
    assert_eq!(envelope["success"], false);
    let error = envelope["error"].as_str().unwrap();
    assert!(
        error.contains("OpenAI API error (401"),
        "unexpected error: {error}"
    );
    assert!(error.contains("Incorrect API key provided"));
}

#[tokio::test]
async fn sentiment_reply_json_shapes_the_result() {
    let stub = ProviderStub::spawn(StubBehavior::Reply(
        r#"{"category": "joyful", "confidence": 0.92, "explanation": "Upbeat throughout."}"#
            .to_owned(),
    ));
    let client = ProviderClient::new(&stub.base_url, &stub.base_url).unwrap();

    let request = Request::AnalyzeWithAi {
        data: AnalyzeData {
            content: AnalysisInput::Sentiment(SentimentText {
                text: "What a wonderful day".to_owned(),
                word_count: 4,
            }),
            analysis_type: AnalysisType::Sentiment,
            config: config("openai"),
        },
    };
    let envelope = message::handle_background(&request, &client).await;
    assert_eq!(envelope["success"], true);
    assert_eq!(envelope["result"]["type"], "sentiment");
    assert_eq!(envelope["result"]["sentiment"], "joyful");
    assert_eq!(envelope["result"]["confidence"], 0.92);
    assert_eq!(envelope["result"]["explanation"], "Upbeat throughout.");
    assert_eq!(envelope["result"]["wordCount"], 4);
}

#[tokio::test]
async fn connection_test_truncates_the_reply() {
    let stub = ProviderStub::spawn(StubBehavior::Reply("C".repeat(250)));
    let client = ProviderClient::new(&stub.base_url, &stub.base_url).unwrap();

    let request = Request::TestApiConnection {
        config: config("anthropic"),
    };
    let envelope = message::handle_background(&request, &client).await;
    assert_eq!(envelope["success"], true);
    assert_eq!(envelope["message"], "API connection successful!");
    assert_eq!(envelope["response"].as_str().unwrap().len(), 100);
}
