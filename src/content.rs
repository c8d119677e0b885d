//! Validated generation output and typed views over it.
//!
//! [`GeneratedContent`] carries the object exactly as the model returned it.
//! The typed structs mirror the registry shapes and are used for rendering
//! and for publishing JSON Schemas.

use crate::workflow::{InsightPlatform, Workflow};
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A validated result object for one workflow
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedContent {
    workflow: Workflow,
    body: Map<String, Value>,
}

impl GeneratedContent {
    pub fn new(workflow: Workflow, body: Map<String, Value>) -> Self {
        Self { workflow, body }
    }

    pub fn workflow(&self) -> Workflow {
        self.workflow
    }

    pub fn body(&self) -> &Map<String, Value> {
        &self.body
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.body.clone())
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.body)
    }

    /// Decode the body into one of the typed views
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(self.to_value())
    }
}

/// Topic ideas
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct IdeaList {
    /// Specific, actionable content ideas
    pub ideas: Vec<String>,
}

/// Script body
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Script {
    pub title: String,
    /// Opening line for the first seconds of the video
    pub hook: String,
    pub development_points: Vec<String>,
    pub call_to_action: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alternate_version: Option<String>,
}

/// One storyboard scene
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Scene {
    pub number: i64,
    /// What happens in the scene
    pub event: String,
    /// Camera, framing and styling
    pub visual: String,
    /// Textual illustration of the frame
    pub illustration: String,
}

/// Script with its storyboard
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ScriptPackage {
    pub script: Script,
    pub storyboard: Vec<Scene>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct YoutubeInsight {
    pub summary: String,
    pub main_ideas: Vec<String>,
    pub structure: String,
    pub hooks: Vec<String>,
    pub trends: Vec<String>,
    pub derived_ideas: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReelsInsight {
    pub summary: String,
    pub structure: String,
    pub visual_style: String,
    pub why_it_worked: String,
    pub attention_elements: Vec<String>,
    pub derived_ideas: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TiktokInsight {
    pub summary: String,
    pub pace: String,
    pub editing_patterns: Vec<String>,
    pub strategies: Vec<String>,
    pub emotions: Vec<String>,
    pub practical_insights: Vec<String>,
    pub derived_ideas: Vec<String>,
}

/// JSON Schema of the typed result for a workflow
pub fn result_schema(workflow: Workflow) -> Value {
    let schema = match workflow {
        Workflow::Ideas => schemars::schema_for!(IdeaList),
        Workflow::Script => schemars::schema_for!(ScriptPackage),
        Workflow::Insight(InsightPlatform::Youtube) => schemars::schema_for!(YoutubeInsight),
        Workflow::Insight(InsightPlatform::Reels) => schemars::schema_for!(ReelsInsight),
        Workflow::Insight(InsightPlatform::Tiktok) => schemars::schema_for!(TiktokInsight),
    };
    serde_json::to_value(schema).unwrap_or(Value::Null)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn script_package_decodes_from_wire_names() {
        let body = json!({
            "script": {
                "title": "T",
                "hook": "H",
                "developmentPoints": ["a"],
                "callToAction": "C",
                "alternateVersion": "Alt"
            },
            "storyboard": [{"number": 1, "event": "e", "visual": "v", "illustration": "i"}]
        });
        let Value::Object(map) = body else { unreachable!() };
        let content = GeneratedContent::new(Workflow::Script, map);
        let package: ScriptPackage = content.decode().unwrap();
        assert_eq!(package.script.alternate_version.as_deref(), Some("Alt"));
        assert_eq!(package.storyboard[0].number, 1);
    }

    #[test]
    fn schemas_list_registry_keys() {
        let schema = result_schema(Workflow::Insight(InsightPlatform::Tiktok));
        let required = schema["required"].as_array().unwrap();
        assert!(required.contains(&json!("pace")));
        assert!(required.contains(&json!("editingPatterns")));

        let schema = result_schema(Workflow::Ideas);
        assert_eq!(schema["required"], json!(["ideas"]));
    }
}
