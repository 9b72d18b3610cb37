#![allow(dead_code)]

use autopilot::config::{ConfigFile, PromptSection, RawConfigFile};
use autopilot::types::AdmissionPolicy;

/// Builder for `ConfigFile` to simplify test setup.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile::default(),
        }
    }

    pub fn on_busy(mut self, policy: AdmissionPolicy) -> Self {
        self.config.controller.on_busy = policy;
        self
    }

    pub fn with_key(mut self, name: &str, value: &str) -> Self {
        self.config
            .keys
            .values
            .insert(name.to_string(), value.to_string());
        self
    }

    pub fn require_key(mut self, name: &str) -> Self {
        self.config.keys.required.push(name.to_string());
        self
    }

    pub fn workflow(mut self, name: &str, steps: usize, step_delay: &str) -> Self {
        self.config.workflow.name = name.to_string();
        self.config.workflow.steps = steps;
        self.config.workflow.step_delay = step_delay.to_string();
        self
    }

    /// Use the template `id` of this workflow for every step.
    pub fn workflow_prompt(mut self, id: &str) -> Self {
        self.config.workflow.prompt = Some(id.to_string());
        self
    }

    pub fn with_prompt(mut self, automation: &str, id: &str, template: &str) -> Self {
        self.config
            .prompts
            .entry(automation.to_string())
            .or_default()
            .insert(
                id.to_string(),
                PromptSection {
                    template: template.to_string(),
                    ..PromptSection::default()
                },
            );
        self
    }

    pub fn raw(self) -> RawConfigFile {
        self.config
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}
