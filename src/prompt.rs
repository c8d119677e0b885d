//! Prompt construction for the generation workflows.
//!
//! Building is pure: the same request and spec always produce the same text.

use crate::request::{GenerationRequest, InsightSource};
use crate::workflow::{FieldKind, KeySpec, WorkflowSpec};
use serde_json::{Map, Value};

const JSON_ONLY: &str = "Always respond with a single valid JSON object. \
Do not include any prose, markdown formatting or code fences around it.";

/// System and user text for one generation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
}

/// Build the prompt for a request against its workflow spec
pub fn build(request: &GenerationRequest, spec: &WorkflowSpec) -> Prompt {
    let system = format!("{} {}", spec.system_role, JSON_ONLY);

    let instruction = render(spec.instruction, |name| placeholder(request, name));
    let user = format!(
        "{}\n\nReturn ONLY a valid JSON object (no markdown, no ```json) in this format:\n\n{}\n\n{}",
        instruction,
        shape_hint(spec.keys),
        spec.guidance
    );

    Prompt { system, user }
}

/// Value substituted for a `{name}` placeholder
fn placeholder(request: &GenerationRequest, name: &str) -> Option<String> {
    match (request, name) {
        (GenerationRequest::Ideas(req), "topic") => Some(req.topic.trim().to_string()),
        (GenerationRequest::Script(req), "topic") => Some(req.topic.trim().to_string()),
        (GenerationRequest::Script(req), "platform") => Some(req.platform.to_string()),
        (GenerationRequest::Script(req), "targetAudience") => {
            Some(req.target_audience.trim().to_string())
        }
        (GenerationRequest::Script(req), "duration") => Some(req.duration.trim().to_string()),
        (GenerationRequest::Script(req), "tone") => Some(req.tone.trim().to_string()),
        (GenerationRequest::Insight(req), "content") => Some(match req.source() {
            Some(InsightSource::Transcript(text)) => text.to_string(),
            Some(InsightSource::Url(url)) => format!("Provided URL: {}", url),
            None => String::new(),
        }),
        _ => None,
    }
}

/// Fill `{name}` placeholders in a single pass over the template.
///
/// Substituted text is never rescanned, so braces inside user input stay as-is.
/// Unknown placeholders are left untouched.
fn render<F>(template: &str, mut lookup: F) -> String
where
    F: FnMut(&str) -> Option<String>,
{
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let Some(end) = after.find('}') else {
            out.push_str(&rest[start..]);
            return out;
        };

        let name = &after[..end];
        match lookup(name) {
            Some(value) => out.push_str(&value),
            None => {
                out.push('{');
                out.push_str(name);
                out.push('}');
            }
        }
        rest = &after[end + 1..];
    }

    out.push_str(rest);
    out
}

/// Example JSON document showing the model every expected key
fn shape_hint(keys: &[KeySpec]) -> String {
    serde_json::to_string_pretty(&example_object(keys)).unwrap_or_default()
}

fn example_object(keys: &[KeySpec]) -> Value {
    let mut object = Map::new();
    for key in keys {
        object.insert(key.name.to_string(), example_value(key));
    }
    Value::Object(object)
}

fn example_value(key: &KeySpec) -> Value {
    match key.kind {
        FieldKind::Text => Value::String(key.hint.to_string()),
        FieldKind::TextList => Value::Array(
            (1..=2)
                .map(|n| Value::String(format!("{} {}", key.hint, n)))
                .collect(),
        ),
        FieldKind::Integer => Value::from(key.hint.parse::<i64>().unwrap_or(1)),
        FieldKind::Object(children) => example_object(children),
        FieldKind::ObjectList(children) => Value::Array(vec![example_object(children)]),
    }
}
