// src/prompts.rs

//! Editable prompt templates, grouped by automation type.
//!
//! Each automation (a workflow name such as `reddit-comment`) owns a set of
//! templates keyed by id. Templates start from the configured defaults, can
//! be edited at runtime and reset back. `{name}` placeholders are filled in
//! by [`PromptStore::interpolate`].

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::debug;

/// One prompt template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    pub id: String,
    pub name: String,
    pub description: String,
    pub template: String,
}

impl PromptTemplate {
    pub fn new(id: impl Into<String>, template: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            description: String::new(),
            template: template.into(),
        }
    }

    /// Distinct placeholder names in order of first appearance.
    pub fn variables(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        scan(&self.template, |piece| {
            if let Piece::Placeholder(name) = piece {
                if !name.is_empty() && !names.iter().any(|n| n == name) {
                    names.push(name.to_string());
                }
            }
        });
        names
    }

    /// Replace every `{key}` with its value. Unknown placeholders are kept
    /// as written, and substituted values are never rescanned.
    pub fn render(&self, vars: &[(&str, &str)]) -> String {
        let mut out = String::with_capacity(self.template.len());
        scan(&self.template, |piece| match piece {
            Piece::Text(text) => out.push_str(text),
            Piece::Placeholder(name) => match vars.iter().find(|(k, _)| *k == name) {
                Some((_, value)) => out.push_str(value),
                None => {
                    out.push('{');
                    out.push_str(name);
                    out.push('}');
                }
            },
        });
        out
    }
}

enum Piece<'a> {
    Text(&'a str),
    Placeholder(&'a str),
}

fn scan<'a>(template: &'a str, mut emit: impl FnMut(Piece<'a>)) {
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        emit(Piece::Text(&rest[..open]));
        let after = &rest[open + 1..];
        match after.find(['{', '}']) {
            Some(close) if after[close..].starts_with('}') => {
                emit(Piece::Placeholder(&after[..close]));
                rest = &after[close + 1..];
            }
            // A stray `{`: keep it and rescan from the next character.
            _ => {
                emit(Piece::Text("{"));
                rest = after;
            }
        }
    }
    emit(Piece::Text(rest));
}

type Table = BTreeMap<String, BTreeMap<String, PromptTemplate>>;

#[derive(Debug, Default)]
struct PromptTable {
    current: Table,
    defaults: Table,
}

/// Shared prompt store. Clones see the same table.
#[derive(Debug, Clone, Default)]
pub struct PromptStore {
    table: Arc<Mutex<PromptTable>>,
}

impl PromptStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with `(automation, template)` pairs. These are also the
    /// values [`reset`](Self::reset) restores.
    pub fn with_defaults<I, A>(defaults: I) -> Self
    where
        I: IntoIterator<Item = (A, PromptTemplate)>,
        A: Into<String>,
    {
        let mut table = Table::new();
        for (automation, prompt) in defaults {
            table
                .entry(automation.into())
                .or_default()
                .insert(prompt.id.clone(), prompt);
        }
        Self {
            table: Arc::new(Mutex::new(PromptTable {
                current: table.clone(),
                defaults: table,
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, PromptTable> {
        self.table.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn get(&self, automation: &str, id: &str) -> Option<PromptTemplate> {
        self.lock()
            .current
            .get(automation)
            .and_then(|prompts| prompts.get(id))
            .cloned()
    }

    /// Every template for `automation`, ordered by id.
    pub fn all(&self, automation: &str) -> Vec<PromptTemplate> {
        self.lock()
            .current
            .get(automation)
            .map(|prompts| prompts.values().cloned().collect())
            .unwrap_or_default()
    }

    /// Automation names that have at least one template.
    pub fn automations(&self) -> Vec<String> {
        self.lock().current.keys().cloned().collect()
    }

    /// Replace the text of an existing template. Returns `false` when there
    /// is no such template; nothing is created in that case.
    pub fn update(&self, automation: &str, id: &str, template: impl Into<String>) -> bool {
        let mut table = self.lock();
        match table
            .current
            .get_mut(automation)
            .and_then(|prompts| prompts.get_mut(id))
        {
            Some(prompt) => {
                prompt.template = template.into();
                debug!(automation, prompt = id, "prompt updated");
                true
            }
            None => false,
        }
    }

    /// Restore the default text of a template. Returns `false` when the
    /// template has no default.
    pub fn reset(&self, automation: &str, id: &str) -> bool {
        let mut table = self.lock();
        let Some(default) = table
            .defaults
            .get(automation)
            .and_then(|prompts| prompts.get(id))
            .cloned()
        else {
            return false;
        };
        table
            .current
            .entry(automation.to_string())
            .or_default()
            .insert(id.to_string(), default);
        debug!(automation, prompt = id, "prompt reset");
        true
    }

    /// Render a template with `vars`, or `None` when it does not exist.
    pub fn interpolate(&self, automation: &str, id: &str, vars: &[(&str, &str)]) -> Option<String> {
        self.get(automation, id).map(|prompt| prompt.render(vars))
    }
}
