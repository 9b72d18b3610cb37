// src/config/validate.rs

use crate::config::duration::parse_duration;
use crate::config::model::{ConfigFile, RawConfigFile, RawWorkflowSection};
use crate::errors::{AutopilotError, Result};
use crate::prompts::PromptTemplate;
use crate::workflow::WorkflowSpec;

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = AutopilotError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_required_keys(&raw)?;
        let workflow = validate_workflow(&raw.workflow)?;
        let prompts = validate_prompts(&raw, &workflow)?;
        Ok(ConfigFile::new_unchecked(
            raw.controller,
            raw.keys,
            workflow,
            prompts,
        ))
    }
}

fn validate_required_keys(cfg: &RawConfigFile) -> Result<()> {
    for name in cfg.keys.required.iter() {
        if name.trim().is_empty() {
            return Err(AutopilotError::ConfigError(
                "[keys].required must not contain blank key names".to_string(),
            ));
        }
    }
    Ok(())
}

fn validate_workflow(section: &RawWorkflowSection) -> Result<WorkflowSpec> {
    if section.steps == 0 {
        return Err(AutopilotError::ConfigError(
            "[workflow].steps must be >= 1 (got 0)".to_string(),
        ));
    }

    let step_delay = parse_duration(&section.step_delay).map_err(|e| {
        AutopilotError::ConfigError(format!("[workflow].step_delay: {e}"))
    })?;

    Ok(WorkflowSpec {
        name: section.name.clone(),
        steps: section.steps,
        step_delay,
        prompt: section.prompt.clone(),
    })
}

fn validate_prompts(
    cfg: &RawConfigFile,
    workflow: &WorkflowSpec,
) -> Result<Vec<(String, PromptTemplate)>> {
    let mut prompts = Vec::new();
    for (automation, entries) in cfg.prompts.iter() {
        for (id, section) in entries.iter() {
            if section.template.trim().is_empty() {
                return Err(AutopilotError::ConfigError(format!(
                    "[prompts.{automation}.{id}].template must not be blank"
                )));
            }
            prompts.push((
                automation.clone(),
                PromptTemplate {
                    id: id.clone(),
                    name: section.name.clone().unwrap_or_else(|| id.clone()),
                    description: section.description.clone(),
                    template: section.template.clone(),
                },
            ));
        }
    }

    if let Some(id) = workflow.prompt.as_deref() {
        let known = cfg
            .prompts
            .get(&workflow.name)
            .is_some_and(|entries| entries.contains_key(id));
        if !known {
            return Err(AutopilotError::ConfigError(format!(
                "[workflow].prompt '{id}' is not defined under [prompts.{}]",
                workflow.name
            )));
        }
    }

    Ok(prompts)
}
