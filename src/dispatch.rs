//! Request dispatcher: one generation pipeline shared by every workflow.
//!
//! validate request -> resolve spec -> build prompt -> invoke model -> validate
//! response. Any failing stage ends the request with a [`GenerationError`].

use crate::agent::{AgentError, TextGenerator};
use crate::content::GeneratedContent;
use crate::prompt;
use crate::request::{GenerationRequest, IdeaRequest, InsightRequest, RequestError, ScriptRequest};
use crate::validate::{self, ValidationError};
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Caller-facing failure class
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidRequest,
    UpstreamFailure,
    MalformedOutput,
    IncompleteOutput,
}

#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("invalid request: {0}")]
    InvalidRequest(#[from] RequestError),
    #[error("generation service failed: {0}")]
    UpstreamFailure(#[from] AgentError),
    #[error("model output is not valid JSON: {0}")]
    MalformedOutput(String),
    #[error("model output key `{key}` {reason}")]
    IncompleteOutput { key: String, reason: String },
}

impl From<ValidationError> for GenerationError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::Malformed(detail) => GenerationError::MalformedOutput(detail),
            ValidationError::Incomplete { key, reason } => {
                GenerationError::IncompleteOutput { key, reason }
            }
        }
    }
}

impl GenerationError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            GenerationError::InvalidRequest(_) => ErrorKind::InvalidRequest,
            GenerationError::UpstreamFailure(_) => ErrorKind::UpstreamFailure,
            GenerationError::MalformedOutput(_) => ErrorKind::MalformedOutput,
            GenerationError::IncompleteOutput { .. } => ErrorKind::IncompleteOutput,
        }
    }

    /// Short message safe to hand back to the caller.
    ///
    /// Never includes prompt text or raw model output.
    pub fn public_message(&self) -> String {
        match self {
            GenerationError::InvalidRequest(err) => format!("Invalid request: {}", err),
            GenerationError::UpstreamFailure(_) => {
                "Generation service is unavailable, please try again".to_string()
            }
            GenerationError::MalformedOutput(_) => {
                "Generation returned an unreadable response".to_string()
            }
            GenerationError::IncompleteOutput { .. } => {
                "Generation returned an incomplete response".to_string()
            }
        }
    }
}

/// Entry point for the generation workflows
#[derive(Clone)]
pub struct Dispatcher {
    generator: Arc<dyn TextGenerator>,
}

impl Dispatcher {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    pub async fn generate_ideas(
        &self,
        request: IdeaRequest,
    ) -> Result<GeneratedContent, GenerationError> {
        self.run(request.into()).await
    }

    pub async fn generate_script(
        &self,
        request: ScriptRequest,
    ) -> Result<GeneratedContent, GenerationError> {
        self.run(request.into()).await
    }

    pub async fn generate_insight(
        &self,
        request: InsightRequest,
    ) -> Result<GeneratedContent, GenerationError> {
        self.run(request.into()).await
    }

    /// Run the full pipeline for any request
    pub async fn run(
        &self,
        request: GenerationRequest,
    ) -> Result<GeneratedContent, GenerationError> {
        let workflow = request.workflow();
        let started = Instant::now();
        info!(%workflow, "generation started");

        let result = self.pipeline(&request).await;
        let elapsed_ms = started.elapsed().as_millis() as u64;

        match &result {
            Ok(_) => info!(%workflow, elapsed_ms, "generation finished"),
            Err(err) => warn!(
                %workflow,
                elapsed_ms,
                kind = ?err.kind(),
                error = %err,
                "generation failed"
            ),
        }
        result
    }

    async fn pipeline(
        &self,
        request: &GenerationRequest,
    ) -> Result<GeneratedContent, GenerationError> {
        request.validate()?;

        let spec = request.workflow().spec();
        let prompt = prompt::build(request, spec);
        debug!(system = %prompt.system, user = %prompt.user, "prompt built");

        let raw = self.generator.invoke(&prompt, spec).await?;
        debug!(raw = %raw, "model responded");

        Ok(validate::validate(&raw, spec)?)
    }
}
