//! # Forge
//!
//! Structured LLM generation for content creators.
//!
//! ## Features
//!
//! - **Three workflows**: topic ideas, script plus storyboard, and video insights per platform
//! - **Shape enforcement**: every model response is parsed and checked against the workflow's registry entry
//! - **Predictable failures**: invalid requests, upstream failures, malformed and incomplete output are kept apart
//! - **Planning store**: sled-backed list of planned content fed by generated ideas

pub mod agent;
pub mod config;
pub mod content;
pub mod dispatch;
pub mod prompt;
pub mod request;
pub mod server;
pub mod storage;
pub mod validate;
pub mod workflow;

pub use agent::{OpenAiClient, TextGenerator};
pub use config::Config;
pub use content::GeneratedContent;
pub use dispatch::{Dispatcher, ErrorKind, GenerationError};
pub use request::{GenerationRequest, IdeaRequest, InsightRequest, ScriptRequest};
pub use storage::Storage;
pub use workflow::{InsightPlatform, Workflow, WorkflowSpec};
