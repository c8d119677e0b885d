//! Generation client for the external text model.
//!
//! The pipeline only sees the [`TextGenerator`] trait, so tests can swap in a
//! stand-in that returns canned text. [`OpenAiClient`] talks to any
//! OpenAI-compatible chat completions endpoint in JSON-object mode.

use crate::config::Config;
use crate::prompt::Prompt;
use crate::workflow::WorkflowSpec;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// User-Agent string identifying this client
const USER_AGENT: &str = concat!("forge/", env!("CARGO_PKG_VERSION"));

#[derive(Error, Debug)]
pub enum AgentError {
    #[error("LLM request failed: {0}")]
    RequestFailed(String),
    #[error("LLM returned an empty response")]
    EmptyResponse,
    #[error("configuration error: {0}")]
    ConfigError(#[from] crate::config::ConfigError),
}

impl From<reqwest::Error> for AgentError {
    fn from(err: reqwest::Error) -> Self {
        AgentError::RequestFailed(err.to_string())
    }
}

/// A text-in, text-out generation capability.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Run one generation call and return the raw response text
    async fn invoke(&self, prompt: &Prompt, spec: &WorkflowSpec) -> Result<String, AgentError>;
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
    response_format: ResponseFormat,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

/// Client for an OpenAI-compatible chat completions API
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    client: Client,
    endpoint: String,
    model: String,
    api_key: String,
}

impl OpenAiClient {
    /// Create a client from the loaded configuration
    pub fn from_config(config: &Config) -> Result<Self, AgentError> {
        let api_key = config.api_key()?.to_string();
        Self::new(&config.agent.base_url, &config.agent.model, api_key)
    }

    /// No request timeout is set; the call runs until the service answers or fails.
    pub fn new(base_url: &str, model: &str, api_key: String) -> Result<Self, AgentError> {
        let client = Client::builder().user_agent(USER_AGENT).build()?;

        Ok(Self {
            client,
            endpoint: format!("{}/chat/completions", base_url.trim_end_matches('/')),
            model: model.to_string(),
            api_key,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl TextGenerator for OpenAiClient {
    async fn invoke(&self, prompt: &Prompt, spec: &WorkflowSpec) -> Result<String, AgentError> {
        let body = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: &prompt.system,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt.user,
                },
            ],
            temperature: spec.temperature,
            response_format: ResponseFormat {
                kind: "json_object",
            },
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(AgentError::RequestFailed(format!(
                "upstream returned {}: {}",
                status, text
            )));
        }

        let parsed: ChatResponse = response.json().await?;
        extract_content(parsed)
    }
}

/// Pull the first choice's text out of a chat response
fn extract_content(response: ChatResponse) -> Result<String, AgentError> {
    let content = response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .unwrap_or_default();

    if content.trim().is_empty() {
        return Err(AgentError::EmptyResponse);
    }
    Ok(content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::{Dispatcher, ErrorKind};
    use crate::request::{ScriptPlatform, ScriptRequest};
    use crate::workflow::SCRIPT;
    use axum::{http::StatusCode, routing::post, Json, Router};
    use serde_json::{json, Value};
    use std::sync::{Arc, Mutex};
    use tokio::net::TcpListener;

    /// Local chat completions endpoint answering every call with one canned reply.
    async fn stub_service(status: StatusCode, reply: Value) -> (String, Arc<Mutex<Vec<Value>>>) {
        let received = Arc::new(Mutex::new(Vec::new()));
        let captured = received.clone();
        let app = Router::new().route(
            "/v1/chat/completions",
            post(move |Json(body): Json<Value>| {
                let captured = captured.clone();
                let reply = reply.clone();
                async move {
                    captured.lock().unwrap().push(body);
                    (status, Json(reply))
                }
            }),
        );

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await });
        (format!("http://{}/v1", addr), received)
    }

    fn completion(content: &str) -> Value {
        json!({"choices": [{"message": {"role": "assistant", "content": content}}]})
    }

    fn prompt() -> Prompt {
        Prompt {
            system: "system text".into(),
            user: "user text".into(),
        }
    }

    fn script_request() -> ScriptRequest {
        ScriptRequest {
            topic: "bike repair".into(),
            platform: ScriptPlatform::YouTube,
            target_audience: "commuters".into(),
            duration: "5 minutes".into(),
            tone: "practical".into(),
        }
    }

    #[tokio::test]
    async fn invoke_posts_two_messages_in_json_mode() {
        let (base_url, received) = stub_service(StatusCode::OK, completion(r#"{"ok":true}"#)).await;
        let client = OpenAiClient::new(&base_url, "gpt-4o", "sk-test".into()).unwrap();

        let text = client.invoke(&prompt(), &SCRIPT).await.unwrap();
        assert_eq!(text, r#"{"ok":true}"#);

        let bodies = received.lock().unwrap();
        assert_eq!(bodies.len(), 1);
        let body = &bodies[0];
        assert_eq!(body["model"], "gpt-4o");
        assert_eq!(body["response_format"], json!({"type": "json_object"}));
        assert_eq!(
            body["messages"],
            json!([
                {"role": "system", "content": "system text"},
                {"role": "user", "content": "user text"}
            ])
        );
        let temperature = body["temperature"].as_f64().unwrap();
        assert!((temperature - f64::from(SCRIPT.temperature)).abs() < 1e-6);
    }

    #[tokio::test]
    async fn error_status_is_an_upstream_failure() {
        let (base_url, received) =
            stub_service(StatusCode::INTERNAL_SERVER_ERROR, json!({"error": "boom"})).await;
        let client = OpenAiClient::new(&base_url, "gpt-4o", "sk-test".into()).unwrap();

        let err = client.invoke(&prompt(), &SCRIPT).await.unwrap_err();
        assert!(matches!(err, AgentError::RequestFailed(_)));

        let dispatcher = Dispatcher::new(Arc::new(client));
        let err = dispatcher.generate_script(script_request()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UpstreamFailure);
        assert_eq!(received.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn empty_reply_is_an_upstream_failure() {
        let (base_url, _) = stub_service(StatusCode::OK, completion("")).await;
        let client = OpenAiClient::new(&base_url, "gpt-4o", "sk-test".into()).unwrap();

        let err = client.invoke(&prompt(), &SCRIPT).await.unwrap_err();
        assert!(matches!(err, AgentError::EmptyResponse));

        let dispatcher = Dispatcher::new(Arc::new(client));
        let err = dispatcher.generate_script(script_request()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UpstreamFailure);
    }

    #[test]
    fn empty_content_is_an_upstream_failure() {
        let parsed: ChatResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"content":"  "}}]}"#).unwrap();
        assert!(matches!(
            extract_content(parsed),
            Err(AgentError::EmptyResponse)
        ));

        let parsed: ChatResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert!(matches!(
            extract_content(parsed),
            Err(AgentError::EmptyResponse)
        ));
    }

    #[test]
    fn first_choice_content_is_returned_verbatim() {
        let parsed: ChatResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"role":"assistant","content":"{\"ideas\":[]}"}}]}"#,
        )
        .unwrap();
        assert_eq!(extract_content(parsed).unwrap(), r#"{"ideas":[]}"#);
    }

    #[test]
    fn endpoint_joins_base_url() {
        let client =
            OpenAiClient::new("https://api.openai.com/v1/", "gpt-4o", "key".into()).unwrap();
        assert_eq!(client.endpoint, "https://api.openai.com/v1/chat/completions");
        assert_eq!(client.model(), "gpt-4o");
    }
}
