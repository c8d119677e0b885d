//! Inbound generation requests and their field invariants.

use crate::workflow::{InsightPlatform, Workflow};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RequestError {
    #[error("field `{0}` must not be empty")]
    EmptyField(&'static str),
    #[error("either `sourceUrl` or `transcript` must be provided")]
    MissingSource,
    #[error("{detail}")]
    InvalidBody { field: String, detail: String },
}

impl RequestError {
    /// The offending request field
    pub fn field(&self) -> &str {
        match self {
            RequestError::EmptyField(field) => field,
            RequestError::MissingSource => "sourceUrl",
            RequestError::InvalidBody { field, .. } => field,
        }
    }

    /// Build an error from a deserializer message such as
    /// ``platform: unknown variant `Shorts` `` or ``missing field `topic` at line 1 column 2``.
    ///
    /// The field is the leading path when there is one, else the backquoted
    /// name of a missing field, else `body`.
    pub fn invalid_body(message: &str) -> Self {
        let detail = match message.rfind(" at line ") {
            Some(at) => &message[..at],
            None => message,
        }
        .trim();

        let field = match detail.split_once(": ") {
            Some((path, _)) if !path.is_empty() && !path.contains(' ') => path,
            _ => detail
                .strip_prefix("missing field `")
                .and_then(|rest| rest.split('`').next())
                .unwrap_or("body"),
        };

        RequestError::InvalidBody {
            field: field.to_string(),
            detail: detail.to_string(),
        }
    }
}

/// Target platform of a script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
pub enum ScriptPlatform {
    #[value(name = "youtube")]
    YouTube,
    #[value(name = "reels")]
    Reels,
    #[value(name = "tiktok")]
    TikTok,
}

impl fmt::Display for ScriptPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ScriptPlatform::YouTube => "YouTube",
            ScriptPlatform::Reels => "Reels",
            ScriptPlatform::TikTok => "TikTok",
        })
    }
}

/// Request for a batch of topic ideas
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IdeaRequest {
    #[serde(default)]
    pub topic: String,
}

/// Request for a script with storyboard
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptRequest {
    #[serde(default)]
    pub topic: String,
    pub platform: ScriptPlatform,
    #[serde(default)]
    pub target_audience: String,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub tone: String,
}

/// Request for strategic insights about an existing video
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightRequest {
    pub platform: InsightPlatform,
    #[serde(default)]
    pub source_url: Option<String>,
    #[serde(default)]
    pub transcript: Option<String>,
}

/// Content an insight request asks to have analyzed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsightSource<'a> {
    Transcript(&'a str),
    Url(&'a str),
}

impl InsightRequest {
    /// The transcript when present, else the URL. `None` if neither is set.
    pub fn source(&self) -> Option<InsightSource<'_>> {
        if let Some(transcript) = non_blank(self.transcript.as_deref()) {
            return Some(InsightSource::Transcript(transcript));
        }
        non_blank(self.source_url.as_deref()).map(InsightSource::Url)
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn require(field: &'static str, value: &str) -> Result<(), RequestError> {
    if value.trim().is_empty() {
        return Err(RequestError::EmptyField(field));
    }
    Ok(())
}

/// A request for one of the generation workflows.
#[derive(Debug, Clone)]
pub enum GenerationRequest {
    Ideas(IdeaRequest),
    Script(ScriptRequest),
    Insight(InsightRequest),
}

impl GenerationRequest {
    /// The workflow variant this request is served by
    pub fn workflow(&self) -> Workflow {
        match self {
            GenerationRequest::Ideas(_) => Workflow::Ideas,
            GenerationRequest::Script(_) => Workflow::Script,
            GenerationRequest::Insight(req) => Workflow::Insight(req.platform),
        }
    }

    /// Check the field invariants of the request
    pub fn validate(&self) -> Result<(), RequestError> {
        match self {
            GenerationRequest::Ideas(req) => require("topic", &req.topic),
            GenerationRequest::Script(req) => {
                require("topic", &req.topic)?;
                require("targetAudience", &req.target_audience)?;
                require("duration", &req.duration)?;
                require("tone", &req.tone)
            }
            GenerationRequest::Insight(req) => match req.source() {
                Some(_) => Ok(()),
                None => Err(RequestError::MissingSource),
            },
        }
    }
}

impl From<IdeaRequest> for GenerationRequest {
    fn from(req: IdeaRequest) -> Self {
        GenerationRequest::Ideas(req)
    }
}

impl From<ScriptRequest> for GenerationRequest {
    fn from(req: ScriptRequest) -> Self {
        GenerationRequest::Script(req)
    }
}

impl From<InsightRequest> for GenerationRequest {
    fn from(req: InsightRequest) -> Self {
        GenerationRequest::Insight(req)
    }
}
