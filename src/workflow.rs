//! Workflow registry: the static description of every generation workflow.
//!
//! Each (workflow, platform) pair maps to one immutable [`WorkflowSpec`] holding
//! the prompt template, the system framing, the expected output shape and the
//! sampling temperature. Lookup is total over [`Workflow`], so an unknown pair
//! cannot be expressed once a request has been parsed.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Platform variant of the insight workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum InsightPlatform {
    Youtube,
    Reels,
    Tiktok,
}

impl InsightPlatform {
    pub fn as_str(&self) -> &'static str {
        match self {
            InsightPlatform::Youtube => "youtube",
            InsightPlatform::Reels => "reels",
            InsightPlatform::Tiktok => "tiktok",
        }
    }
}

/// The generation workflows, with the insight workflow split per platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Workflow {
    Ideas,
    Script,
    Insight(InsightPlatform),
}

impl Workflow {
    /// Resolve the spec for this workflow
    pub fn spec(self) -> &'static WorkflowSpec {
        match self {
            Workflow::Ideas => &IDEAS,
            Workflow::Script => &SCRIPT,
            Workflow::Insight(InsightPlatform::Youtube) => &INSIGHT_YOUTUBE,
            Workflow::Insight(InsightPlatform::Reels) => &INSIGHT_REELS,
            Workflow::Insight(InsightPlatform::Tiktok) => &INSIGHT_TIKTOK,
        }
    }
}

impl fmt::Display for Workflow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Workflow::Ideas => f.write_str("ideas"),
            Workflow::Script => f.write_str("script"),
            Workflow::Insight(platform) => write!(f, "insight/{}", platform.as_str()),
        }
    }
}

/// Coarse kind of a JSON value expected at a key.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldKind {
    Text,
    TextList,
    Integer,
    Object(&'static [KeySpec]),
    ObjectList(&'static [KeySpec]),
}

impl FieldKind {
    pub fn describe(&self) -> &'static str {
        match self {
            FieldKind::Text => "a string",
            FieldKind::TextList => "an array of strings",
            FieldKind::Integer => "an integer",
            FieldKind::Object(_) => "an object",
            FieldKind::ObjectList(_) => "an array of objects",
        }
    }
}

/// One expected key of a workflow's output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeySpec {
    pub name: &'static str,
    pub kind: FieldKind,
    /// Example text shown to the model for this key
    pub hint: &'static str,
    pub required: bool,
}

impl KeySpec {
    const fn required(name: &'static str, kind: FieldKind, hint: &'static str) -> Self {
        Self {
            name,
            kind,
            hint,
            required: true,
        }
    }

    const fn optional(name: &'static str, kind: FieldKind, hint: &'static str) -> Self {
        Self {
            name,
            kind,
            hint,
            required: false,
        }
    }
}

/// Static description of one workflow variant.
#[derive(Debug)]
pub struct WorkflowSpec {
    pub workflow: Workflow,
    /// System-role framing sent ahead of the instruction
    pub system_role: &'static str,
    /// Instruction template; `{name}` placeholders are filled from the request
    pub instruction: &'static str,
    /// Authorial guidance appended after the shape hint
    pub guidance: &'static str,
    pub keys: &'static [KeySpec],
    pub temperature: f32,
}

impl WorkflowSpec {
    /// Names of the top-level keys the model must return
    pub fn required_keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.keys.iter().filter(|k| k.required).map(|k| k.name)
    }
}

const IDEAS_KEYS: &[KeySpec] = &[KeySpec::required(
    "ideas",
    FieldKind::TextList,
    "Specific, detailed content idea",
)];

pub static IDEAS: WorkflowSpec = WorkflowSpec {
    workflow: Workflow::Ideas,
    system_role: "You are an expert in brainstorming digital content.",
    instruction: "You are an expert in digital content creation.\n\n\
Generate 8 creative and specific content ideas for the topic or niche: \"{topic}\"\n\n\
The ideas must be:\n\
- Specific and actionable\n\
- Varied (different formats and approaches)\n\
- Suited to YouTube, Reels, TikTok or Shorts\n\
- Creative and with viral potential",
    guidance: "Return exactly 8 ideas in the \"ideas\" array, each one a single self-contained sentence.",
    keys: IDEAS_KEYS,
    temperature: 0.9,
};

const SCRIPT_BODY_KEYS: &[KeySpec] = &[
    KeySpec::required("title", FieldKind::Text, "Creative, eye-catching title"),
    KeySpec::required("hook", FieldKind::Text, "Powerful opening hook (first 3-5 seconds)"),
    KeySpec::required("developmentPoints", FieldKind::TextList, "Development topic"),
    KeySpec::required("callToAction", FieldKind::Text, "Closing call to action"),
    KeySpec::optional(
        "alternateVersion",
        FieldKind::Text,
        "Alternate version of the hook or title (optional)",
    ),
];

const SCENE_KEYS: &[KeySpec] = &[
    KeySpec::required("number", FieldKind::Integer, "1"),
    KeySpec::required("event", FieldKind::Text, "What happens in this scene"),
    KeySpec::required(
        "visual",
        FieldKind::Text,
        "Visual description: camera moves, presenter expression, setting, visual style",
    ),
    KeySpec::required(
        "illustration",
        FieldKind::Text,
        "Detailed textual illustration: 'Presenter in medium shot, minimalist background with soft light, confident expression, static camera'",
    ),
];

const SCRIPT_KEYS: &[KeySpec] = &[
    KeySpec::required("script", FieldKind::Object(SCRIPT_BODY_KEYS), ""),
    KeySpec::required("storyboard", FieldKind::ObjectList(SCENE_KEYS), ""),
];

pub static SCRIPT: WorkflowSpec = WorkflowSpec {
    workflow: Workflow::Script,
    system_role: "You are an expert in writing scripts and storyboards for digital content.",
    instruction: "You are an expert content creator for {platform}.\n\n\
Write a complete script and a detailed textual storyboard for a video with the following characteristics:\n\n\
- Topic: {topic}\n\
- Platform: {platform}\n\
- Target audience: {targetAudience}\n\
- Duration: {duration}\n\
- Tone: {tone}",
    guidance: "Create between 4 and 6 storyboard scenes, depending on the duration of the video.\n\
Be specific, creative and professional.",
    keys: SCRIPT_KEYS,
    temperature: 0.8,
};

const INSIGHT_SYSTEM: &str =
    "You are an expert in digital content analysis and social media strategy.";

const INSIGHT_GUIDANCE: &str = "Ground every insight in the supplied content and keep each item concrete.";

const YOUTUBE_KEYS: &[KeySpec] = &[
    KeySpec::required("summary", FieldKind::Text, "Smart summary of the video"),
    KeySpec::required("mainIdeas", FieldKind::TextList, "Main idea"),
    KeySpec::required("structure", FieldKind::Text, "How the content is structured"),
    KeySpec::required("hooks", FieldKind::TextList, "Hook"),
    KeySpec::required("trends", FieldKind::TextList, "Trend"),
    KeySpec::required("derivedIdeas", FieldKind::TextList, "Idea for a Short, a Reel or a TikTok"),
];

pub static INSIGHT_YOUTUBE: WorkflowSpec = WorkflowSpec {
    workflow: Workflow::Insight(InsightPlatform::Youtube),
    system_role: INSIGHT_SYSTEM,
    instruction: "Analyze this YouTube video content and provide detailed insights:\n\n{content}",
    guidance: INSIGHT_GUIDANCE,
    keys: YOUTUBE_KEYS,
    temperature: 0.7,
};

const REELS_KEYS: &[KeySpec] = &[
    KeySpec::required("summary", FieldKind::Text, "Summary of the reel"),
    KeySpec::required("structure", FieldKind::Text, "Structure (hook -> content -> CTA)"),
    KeySpec::required("visualStyle", FieldKind::Text, "Description of the visual style"),
    KeySpec::required("whyItWorked", FieldKind::Text, "Analysis of why it worked"),
    KeySpec::required("attentionElements", FieldKind::TextList, "Attention-grabbing element"),
    KeySpec::required("derivedIdeas", FieldKind::TextList, "Derived idea"),
];

pub static INSIGHT_REELS: WorkflowSpec = WorkflowSpec {
    workflow: Workflow::Insight(InsightPlatform::Reels),
    system_role: INSIGHT_SYSTEM,
    instruction: "Analyze this Instagram Reel and provide detailed insights:\n\n{content}",
    guidance: INSIGHT_GUIDANCE,
    keys: REELS_KEYS,
    temperature: 0.7,
};

const TIKTOK_KEYS: &[KeySpec] = &[
    KeySpec::required("summary", FieldKind::Text, "Summary of the video"),
    KeySpec::required("pace", FieldKind::Text, "Analysis of the video's pacing"),
    KeySpec::required("editingPatterns", FieldKind::TextList, "Editing pattern"),
    KeySpec::required("strategies", FieldKind::TextList, "Strategy"),
    KeySpec::required("emotions", FieldKind::TextList, "Emotion"),
    KeySpec::required("practicalInsights", FieldKind::TextList, "Practical insight"),
    KeySpec::required("derivedIdeas", FieldKind::TextList, "Derived idea"),
];

pub static INSIGHT_TIKTOK: WorkflowSpec = WorkflowSpec {
    workflow: Workflow::Insight(InsightPlatform::Tiktok),
    system_role: INSIGHT_SYSTEM,
    instruction: "Analyze this TikTok video and provide detailed insights:\n\n{content}",
    guidance: INSIGHT_GUIDANCE,
    keys: TIKTOK_KEYS,
    temperature: 0.7,
};
