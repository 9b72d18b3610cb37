// src/config/model.rs

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::prompts::PromptTemplate;
use crate::types::AdmissionPolicy;
use crate::workflow::WorkflowSpec;

/// Configuration exactly as read from TOML, before validation.
///
/// ```toml
/// [controller]
/// on_busy = "reject"
///
/// [keys]
/// required = ["gemini"]
///
/// [keys.values]
/// gemini = "..."
///
/// [workflow]
/// name = "reddit-comment"
/// steps = 3
/// step_delay = "200ms"
/// prompt = "comment"
///
/// [prompts.reddit-comment.comment]
/// name = "Comment reply"
/// template = "Reply to {title} (step {step} of {total})"
/// ```
///
/// All sections are optional and have defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawConfigFile {
    #[serde(default)]
    pub controller: ControllerSection,

    #[serde(default)]
    pub keys: KeysSection,

    #[serde(default)]
    pub workflow: RawWorkflowSection,

    /// `[prompts.<automation>.<id>]` default templates.
    #[serde(default)]
    pub prompts: BTreeMap<String, BTreeMap<String, PromptSection>>,
}

/// `[controller]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ControllerSection {
    /// `"allow"` (default) or `"reject"`.
    #[serde(default)]
    pub on_busy: AdmissionPolicy,
}

/// `[keys]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct KeysSection {
    /// Names that must hold a non-blank value before a run may start.
    #[serde(default)]
    pub required: Vec<String>,

    /// Initial key values (`[keys.values]`).
    #[serde(default)]
    pub values: BTreeMap<String, String>,
}

/// `[workflow]` section with the delay still as a string.
#[derive(Debug, Clone, Deserialize)]
pub struct RawWorkflowSection {
    #[serde(default = "default_workflow_name")]
    pub name: String,

    #[serde(default = "default_steps")]
    pub steps: usize,

    /// Duration string such as `"500ms"`, `"2s"` or `"1m"`.
    #[serde(default = "default_step_delay")]
    pub step_delay: String,

    /// Id of a template under `[prompts.<name>]` rendered for every step.
    #[serde(default)]
    pub prompt: Option<String>,
}

/// One `[prompts.<automation>.<id>]` table.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PromptSection {
    /// Display name; defaults to the id.
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub description: String,

    pub template: String,
}

fn default_workflow_name() -> String {
    "automation".to_string()
}

fn default_steps() -> usize {
    1
}

fn default_step_delay() -> String {
    "1s".to_string()
}

impl Default for RawWorkflowSection {
    fn default() -> Self {
        Self {
            name: default_workflow_name(),
            steps: default_steps(),
            step_delay: default_step_delay(),
            prompt: None,
        }
    }
}

/// Validated configuration. Build it with `ConfigFile::try_from(raw)`.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub controller: ControllerSection,
    pub keys: KeysSection,
    pub workflow: WorkflowSpec,
    /// Default templates, grouped by automation name.
    pub prompts: Vec<(String, PromptTemplate)>,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(
        controller: ControllerSection,
        keys: KeysSection,
        workflow: WorkflowSpec,
        prompts: Vec<(String, PromptTemplate)>,
    ) -> Self {
        Self {
            controller,
            keys,
            workflow,
            prompts,
        }
    }
}
