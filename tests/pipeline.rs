use async_trait::async_trait;
use creator_forge::agent::{AgentError, TextGenerator};
use creator_forge::prompt::Prompt;
use creator_forge::request::ScriptPlatform;
use creator_forge::{
    Dispatcher, ErrorKind, GenerationError, IdeaRequest, InsightPlatform, InsightRequest,
    ScriptRequest, WorkflowSpec,
};
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Stand-in generator returning canned text and recording each call.
struct StubGenerator {
    reply: Result<String, String>,
    calls: AtomicUsize,
    last: Mutex<Option<(Prompt, f32)>>,
}

impl StubGenerator {
    fn replying(text: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(text.to_string()),
            calls: AtomicUsize::new(0),
            last: Mutex::new(None),
        })
    }

    fn failing(reason: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Err(reason.to_string()),
            calls: AtomicUsize::new(0),
            last: Mutex::new(None),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn last_prompt(&self) -> (Prompt, f32) {
        self.last.lock().unwrap().clone().expect("generator was not invoked")
    }
}

#[async_trait]
impl TextGenerator for StubGenerator {
    async fn invoke(&self, prompt: &Prompt, spec: &WorkflowSpec) -> Result<String, AgentError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last.lock().unwrap() = Some((prompt.clone(), spec.temperature));
        self.reply.clone().map_err(AgentError::RequestFailed)
    }
}

fn dispatcher(stub: &Arc<StubGenerator>) -> Dispatcher {
    Dispatcher::new(stub.clone())
}

fn ideas(topic: &str) -> IdeaRequest {
    IdeaRequest {
        topic: topic.to_string(),
    }
}

fn script_request() -> ScriptRequest {
    ScriptRequest {
        topic: "Meal prep for students".into(),
        platform: ScriptPlatform::TikTok,
        target_audience: "university students".into(),
        duration: "45 seconds".into(),
        tone: "energetic".into(),
    }
}

fn tiktok_insight() -> serde_json::Value {
    json!({
        "summary": "Fast recipe walkthrough",
        "pace": "Cuts every 1-2 seconds",
        "editingPatterns": ["jump cuts", "text overlays"],
        "strategies": ["open with the result"],
        "emotions": ["curiosity"],
        "practicalInsights": ["show the final dish first"],
        "derivedIdeas": ["3 ingredient dinners"]
    })
}

#[tokio::test]
async fn ideas_round_trip_through_the_pipeline() {
    let stub = StubGenerator::replying(r#"{"ideas":["a","b"]}"#);
    let content = dispatcher(&stub)
        .generate_ideas(ideas("indoor plants"))
        .await
        .unwrap();

    assert_eq!(content.into_value(), json!({"ideas": ["a", "b"]}));
    assert_eq!(stub.calls(), 1);

    let (prompt, temperature) = stub.last_prompt();
    assert!(prompt.user.contains("indoor plants"));
    assert!((temperature - 0.9).abs() < f32::EPSILON);
}

#[tokio::test]
async fn idea_count_other_than_eight_is_accepted() {
    let stub = StubGenerator::replying(r#"{"ideas":["only one"]}"#);
    assert!(dispatcher(&stub).generate_ideas(ideas("x")).await.is_ok());

    let ten: Vec<String> = (1..=10).map(|n| format!("idea {n}")).collect();
    let stub = StubGenerator::replying(&json!({ "ideas": ten }).to_string());
    let content = dispatcher(&stub).generate_ideas(ideas("x")).await.unwrap();
    assert_eq!(content.body()["ideas"].as_array().unwrap().len(), 10);
}

#[tokio::test]
async fn empty_topic_never_reaches_the_generator() {
    let stub = StubGenerator::replying(r#"{"ideas":[]}"#);
    let err = dispatcher(&stub)
        .generate_ideas(ideas("  "))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::InvalidRequest);
    assert_eq!(stub.calls(), 0);
}

#[tokio::test]
async fn insight_without_url_or_transcript_is_invalid() {
    let stub = StubGenerator::replying(&tiktok_insight().to_string());
    let err = dispatcher(&stub)
        .generate_insight(InsightRequest {
            platform: InsightPlatform::Reels,
            source_url: None,
            transcript: None,
        })
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::InvalidRequest);
    assert_eq!(stub.calls(), 0);
}

#[tokio::test]
async fn url_only_reels_prompt_references_the_url() {
    let url = "https://www.instagram.com/reel/DAbc123/";
    let stub = StubGenerator::replying("{}");
    let _ = dispatcher(&stub)
        .generate_insight(InsightRequest {
            platform: InsightPlatform::Reels,
            source_url: Some(url.into()),
            transcript: None,
        })
        .await;

    let (prompt, temperature) = stub.last_prompt();
    assert!(prompt.user.contains(url));
    assert!(!prompt.user.contains("{content}"));
    assert!(!prompt.user.contains("{transcript}"));
    assert!(prompt.user.contains("Instagram Reel"));
    assert!((temperature - 0.7).abs() < f32::EPSILON);
}

#[tokio::test]
async fn malformed_output_is_classified_and_not_leaked() {
    let stub = StubGenerator::replying("not json");
    let err = dispatcher(&stub)
        .generate_ideas(ideas("cycling"))
        .await
        .unwrap_err();

    assert!(matches!(err, GenerationError::MalformedOutput(_)));
    assert!(!err.public_message().contains("not json"));
}

#[tokio::test]
async fn script_without_storyboard_is_incomplete() {
    let body = json!({
        "script": {
            "title": "Prep once, eat all week",
            "hook": "You're wasting 5 hours a week",
            "developmentPoints": ["shop", "cook", "store"],
            "callToAction": "Follow for part 2"
        }
    });
    let stub = StubGenerator::replying(&body.to_string());
    let err = dispatcher(&stub)
        .generate_script(script_request())
        .await
        .unwrap_err();

    match err {
        GenerationError::IncompleteOutput { key, .. } => assert_eq!(key, "storyboard"),
        other => panic!("expected incomplete output, got {other:?}"),
    }
}

#[tokio::test]
async fn complete_script_passes() {
    let body = json!({
        "script": {
            "title": "Prep once, eat all week",
            "hook": "You're wasting 5 hours a week",
            "developmentPoints": ["shop", "cook", "store"],
            "callToAction": "Follow for part 2",
            "alternateVersion": "Stop cooking every night"
        },
        "storyboard": [
            {"number": 1, "event": "Hook", "visual": "Close-up", "illustration": "Host at counter"},
            {"number": 2, "event": "Shop", "visual": "Handheld", "illustration": "Grocery aisle"},
            {"number": 3, "event": "Cook", "visual": "Top-down", "illustration": "Pans on stove"},
            {"number": 4, "event": "CTA", "visual": "Medium shot", "illustration": "Host smiling"}
        ]
    });
    let stub = StubGenerator::replying(&body.to_string());
    let content = dispatcher(&stub)
        .generate_script(script_request())
        .await
        .unwrap();

    assert_eq!(content.into_value(), body);
    let (prompt, _) = stub.last_prompt();
    assert!(prompt.user.contains("TikTok"));
    assert!(prompt.user.contains("university students"));
}

#[tokio::test]
async fn tiktok_insight_rejects_youtube_shape() {
    let youtube = json!({
        "summary": "A long-form tutorial",
        "mainIdeas": ["a"],
        "structure": "intro, body, outro",
        "hooks": ["question"],
        "trends": ["ai"],
        "derivedIdeas": ["short"]
    });
    let stub = StubGenerator::replying(&youtube.to_string());
    let err = dispatcher(&stub)
        .generate_insight(InsightRequest {
            platform: InsightPlatform::Tiktok,
            source_url: None,
            transcript: Some("hey guys".into()),
        })
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::IncompleteOutput);

    let stub = StubGenerator::replying(&tiktok_insight().to_string());
    let content = dispatcher(&stub)
        .generate_insight(InsightRequest {
            platform: InsightPlatform::Tiktok,
            source_url: None,
            transcript: Some("hey guys".into()),
        })
        .await
        .unwrap();
    assert_eq!(content.body()["pace"], "Cuts every 1-2 seconds");
}

#[tokio::test]
async fn upstream_failure_is_surfaced_without_detail() {
    let stub = StubGenerator::failing("connection reset by peer");
    let err = dispatcher(&stub)
        .generate_ideas(ideas("woodworking"))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::UpstreamFailure);
    assert!(!err.public_message().contains("connection reset"));
    assert_eq!(stub.calls(), 1);
}
