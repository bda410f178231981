//! Hook types and the hook registry.
//!
//! Hooks attach to one of three pipeline stages:
//!
//! - **interact**: may fill in missing input before validation
//! - **validate**: may reject the input with a `CommandError`
//! - **alter**: receives the result and returns a (possibly changed) result
//!
//! The registry maps `(target key, hook type)` to an append-only list of
//! `(hook, source operation)` entries. A target key is a command name, a
//! symbolic `@tag`, or a command file's group key. Lookups happen at execution
//! time, so hooks registered after a command was built still apply to it.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use serde::Serialize;
use serde_json::Value;

use crate::descriptor::CommandDescriptor;
use crate::error::CommandError;
use crate::input::CommandInput;
use crate::parser::TagMap;

pub type InteractFn =
    Arc<dyn Fn(&mut CommandInput, &HookContext<'_>) -> Result<(), CommandError> + Send + Sync>;
pub type ValidateFn =
    Arc<dyn Fn(&CommandInput, &HookContext<'_>) -> Result<(), CommandError> + Send + Sync>;
pub type AlterFn = Arc<dyn Fn(Value, &HookContext<'_>) -> Value + Send + Sync>;

/// Pipeline stage a hook attaches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HookType {
    Interact,
    Validate,
    Alter,
}

impl HookType {
    /// Pipeline order.
    pub const fn variants() -> &'static [HookType] {
        &[HookType::Interact, HookType::Validate, HookType::Alter]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HookType::Interact => "interact",
            HookType::Validate => "validate",
            HookType::Alter => "alter",
        }
    }

    pub fn from_str_ci(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "interact" => Some(HookType::Interact),
            "validate" => Some(HookType::Validate),
            "alter" => Some(HookType::Alter),
            _ => None,
        }
    }
}

impl fmt::Display for HookType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An opaque hook callable, tagged with the stage it runs in.
#[derive(Clone)]
pub enum Hook {
    Interact(InteractFn),
    Validate(ValidateFn),
    Alter(AlterFn),
}

impl Hook {
    pub fn interact<F>(f: F) -> Self
    where
        F: Fn(&mut CommandInput, &HookContext<'_>) -> Result<(), CommandError>
            + Send
            + Sync
            + 'static,
    {
        Hook::Interact(Arc::new(f))
    }

    pub fn validate<F>(f: F) -> Self
    where
        F: Fn(&CommandInput, &HookContext<'_>) -> Result<(), CommandError> + Send + Sync + 'static,
    {
        Hook::Validate(Arc::new(f))
    }

    pub fn alter<F>(f: F) -> Self
    where
        F: Fn(Value, &HookContext<'_>) -> Value + Send + Sync + 'static,
    {
        Hook::Alter(Arc::new(f))
    }

    pub fn hook_type(&self) -> HookType {
        match self {
            Hook::Interact(_) => HookType::Interact,
            Hook::Validate(_) => HookType::Validate,
            Hook::Alter(_) => HookType::Alter,
        }
    }
}

impl fmt::Debug for Hook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hook::{}", self.hook_type())
    }
}

/// A registered hook and the name of the operation that declared it.
#[derive(Debug, Clone)]
pub struct HookEntry {
    hook: Hook,
    source: String,
}

impl HookEntry {
    pub fn hook(&self) -> &Hook {
        &self.hook
    }

    pub fn source(&self) -> &str {
        &self.source
    }
}

/// What a hook can see about the command it is running for.
pub struct HookContext<'a> {
    descriptor: &'a CommandDescriptor,
    annotations: TagMap,
}

impl<'a> HookContext<'a> {
    pub fn new(descriptor: &'a CommandDescriptor) -> Self {
        Self {
            descriptor,
            annotations: descriptor.annotations_for_command(),
        }
    }

    pub fn name(&self) -> &str {
        self.descriptor.name()
    }

    pub fn group(&self) -> &str {
        self.descriptor.group()
    }

    /// Command-facing annotations (always include `command`).
    pub fn annotations(&self) -> &TagMap {
        &self.annotations
    }

    pub fn descriptor(&self) -> &CommandDescriptor {
        self.descriptor
    }
}

type Key = (String, HookType);

/// Registry of hooks by `(target key, hook type)`.
///
/// Entries are only ever appended: registering the same hook twice yields two
/// entries and two invocations.
#[derive(Default)]
pub struct HookManager {
    hooks: RwLock<HashMap<Key, Vec<HookEntry>>>,
}

impl HookManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `hook` under `target` for the hook's own stage.
    pub fn add(&self, target: impl Into<String>, hook: Hook, source: impl Into<String>) {
        let target = target.into();
        let source = source.into();
        let hook_type = hook.hook_type();
        tracing::debug!(target_key = %target, %hook_type, source = %source, "registering hook");
        self.hooks
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry((target, hook_type))
            .or_default()
            .push(HookEntry { hook, source });
    }

    /// Current entries for one key, in registration order (empty if none).
    pub fn get(&self, target: &str, hook_type: HookType) -> Vec<HookEntry> {
        self.hooks
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&(target.to_string(), hook_type))
            .cloned()
            .unwrap_or_default()
    }

    /// Entries for several keys, concatenated in the order the keys are given.
    pub fn get_for_names(&self, names: &[String], hook_type: HookType) -> Vec<HookEntry> {
        let hooks = self.hooks.read().unwrap_or_else(PoisonError::into_inner);
        let mut found = Vec::new();
        for name in names {
            if let Some(entries) = hooks.get(&(name.clone(), hook_type)) {
                found.extend(entries.iter().cloned());
            }
        }
        found
    }

    /// Every registered `(target, type, count)`, sorted for stable listing.
    pub fn targets(&self) -> Vec<(String, HookType, usize)> {
        let hooks = self.hooks.read().unwrap_or_else(PoisonError::into_inner);
        let mut targets: Vec<(String, HookType, usize)> = hooks
            .iter()
            .map(|((target, hook_type), entries)| (target.clone(), *hook_type, entries.len()))
            .collect();
        targets.sort();
        targets
    }

    /// Total number of registered entries.
    pub fn len(&self) -> usize {
        self.hooks
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .map(Vec::len)
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for HookManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookManager")
            .field("entries", &self.len())
            .finish()
    }
}
