//! Operations and command files.
//!
//! An `Operation` is the explicit stand-in for an annotated method: its
//! declared identifier, its raw doc block, its ordered parameters and the
//! callable behind it. A `CommandFile` groups operations under one group key
//! and owns the (opt-in) state shared by every command bound to it.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use serde::Serialize;
use serde_json::{Map, Value};

use crate::descriptor::CommandDescriptor;
use crate::error::CommandError;
use crate::hooks::Hook;

/// Mutable state of a command file instance. Clones share the same value.
pub type StateHandle = Arc<Mutex<Value>>;

pub type CommandFn = Arc<dyn Fn(&CommandCall<'_>) -> Result<Value, CommandError> + Send + Sync>;

/// One declared parameter of an operation.
///
/// `name` may carry an option shortcut as `name|s`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Parameter {
    pub name: String,
    pub type_hint: Option<String>,
    pub default: Option<Value>,
    pub variadic: bool,
}

impl Parameter {
    /// Parameter without a default (a required argument).
    pub fn required(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_hint: None,
            default: None,
            variadic: false,
        }
    }

    pub fn optional(name: impl Into<String>, default: impl Into<Value>) -> Self {
        Self {
            default: Some(default.into()),
            ..Self::required(name)
        }
    }

    /// Boolean parameter defaulting to `false` (becomes a `--flag` option).
    pub fn flag(name: impl Into<String>) -> Self {
        Self::optional(name, false)
    }

    /// Collects every remaining positional value (and pass-through values).
    pub fn variadic(name: impl Into<String>) -> Self {
        Self {
            variadic: true,
            default: Some(Value::Array(Vec::new())),
            ..Self::required(name)
        }
    }

    pub fn typed(mut self, hint: impl Into<String>) -> Self {
        self.type_hint = Some(hint.into());
        self
    }
}

/// The callable behind an operation.
#[derive(Clone)]
pub enum Handler {
    Command(CommandFn),
    Hook(Hook),
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Handler::Command(_) => f.write_str("Handler::Command"),
            Handler::Hook(hook) => write!(f, "Handler::Hook({})", hook.hook_type()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Operation {
    name: String,
    doc: String,
    parameters: Vec<Parameter>,
    handler: Handler,
}

impl Operation {
    pub fn command<F>(
        name: impl Into<String>,
        doc: impl Into<String>,
        parameters: Vec<Parameter>,
        f: F,
    ) -> Self
    where
        F: Fn(&CommandCall<'_>) -> Result<Value, CommandError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            doc: doc.into(),
            parameters,
            handler: Handler::Command(Arc::new(f)),
        }
    }

    /// A hook operation. Its doc block is expected to carry `@hook <type> [<target>]`.
    pub fn hook(name: impl Into<String>, doc: impl Into<String>, hook: Hook) -> Self {
        Self {
            name: name.into(),
            doc: doc.into(),
            parameters: Vec::new(),
            handler: Handler::Hook(hook),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn doc(&self) -> &str {
        &self.doc
    }

    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    pub fn handler(&self) -> &Handler {
        &self.handler
    }
}

/// A group of operations declared together.
///
/// The group key doubles as the implicit hook target for `@hook <type>`
/// declarations without a target. Cloning keeps the same state handle; build
/// a new file to start from clean state.
#[derive(Debug, Clone)]
pub struct CommandFile {
    group: String,
    doc: String,
    operations: Vec<Operation>,
    state: StateHandle,
}

impl CommandFile {
    pub fn new(group: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            doc: String::new(),
            operations: Vec::new(),
            state: Arc::new(Mutex::new(Value::Null)),
        }
    }

    /// File-level doc block; its tags are defaults for every operation.
    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = doc.into();
        self
    }

    pub fn with_state(mut self, state: impl Into<Value>) -> Self {
        self.state = Arc::new(Mutex::new(state.into()));
        self
    }

    pub fn with_operation(mut self, operation: Operation) -> Self {
        self.operations.push(operation);
        self
    }

    pub fn group(&self) -> &str {
        &self.group
    }

    pub fn doc(&self) -> &str {
        &self.doc
    }

    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    pub fn find(&self, name: &str) -> Option<&Operation> {
        self.operations.iter().find(|op| op.name == name)
    }

    pub fn state(&self) -> &StateHandle {
        &self.state
    }
}

/// What an operation sees when invoked: resolved arguments and options plus
/// the bound state handle.
pub struct CommandCall<'a> {
    descriptor: &'a CommandDescriptor,
    arguments: &'a Map<String, Value>,
    options: &'a Map<String, Value>,
    state: &'a StateHandle,
}

impl<'a> CommandCall<'a> {
    pub(crate) fn new(
        descriptor: &'a CommandDescriptor,
        arguments: &'a Map<String, Value>,
        options: &'a Map<String, Value>,
        state: &'a StateHandle,
    ) -> Self {
        Self {
            descriptor,
            arguments,
            options,
            state,
        }
    }

    pub fn name(&self) -> &str {
        self.descriptor.name()
    }

    pub fn descriptor(&self) -> &CommandDescriptor {
        self.descriptor
    }

    pub fn argument(&self, name: &str) -> Option<&Value> {
        self.arguments.get(name)
    }

    pub fn option(&self, name: &str) -> Option<&Value> {
        self.options.get(name)
    }

    /// Argument rendered as text; missing and null are empty.
    pub fn arg_str(&self, name: &str) -> String {
        self.argument(name).map(value_to_string).unwrap_or_default()
    }

    pub fn arg_i64(&self, name: &str) -> Option<i64> {
        self.argument(name).and_then(value_to_i64)
    }

    pub fn arg_list(&self, name: &str) -> Vec<String> {
        match self.argument(name) {
            Some(Value::Array(items)) => items.iter().map(value_to_string).collect(),
            Some(Value::Null) | None => Vec::new(),
            Some(other) => vec![value_to_string(other)],
        }
    }

    pub fn option_flag(&self, name: &str) -> bool {
        match self.option(name) {
            Some(Value::Bool(b)) => *b,
            Some(Value::Null) | None => false,
            Some(Value::String(s)) => !s.is_empty() && s != "0",
            Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
            Some(_) => true,
        }
    }

    pub fn option_i64(&self, name: &str) -> Option<i64> {
        self.option(name).and_then(value_to_i64)
    }

    /// Snapshot of the bound state.
    pub fn state(&self) -> Value {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn set_state(&self, value: impl Into<Value>) {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = value.into();
    }
}

/// Plain-text rendering used for arguments and scalar output.
pub fn value_to_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(value_to_string)
            .collect::<Vec<_>>()
            .join(" "),
        other => other.to_string(),
    }
}

fn value_to_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        Value::Bool(b) => Some(i64::from(*b)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parameter_constructors() {
        assert_eq!(Parameter::required("one").default, None);
        assert_eq!(Parameter::flag("negate").default, Some(json!(false)));
        let rest = Parameter::variadic("params");
        assert!(rest.variadic);
        assert_eq!(rest.default, Some(json!([])));
        assert_eq!(
            Parameter::required("one").typed("integer").type_hint.as_deref(),
            Some("integer")
        );
    }

    #[test]
    fn file_clones_share_state_but_new_files_start_clean() {
        let file = CommandFile::new("g").with_state("secret");
        let clone = file.clone();
        *clone.state().lock().unwrap() = json!("changed");
        assert_eq!(*file.state().lock().unwrap(), json!("changed"));
        assert_eq!(*CommandFile::new("g").state().lock().unwrap(), Value::Null);
    }

    #[test]
    fn value_rendering() {
        assert_eq!(value_to_string(&Value::Null), "");
        assert_eq!(value_to_string(&json!("x")), "x");
        assert_eq!(value_to_string(&json!(-5)), "-5");
        assert_eq!(value_to_string(&json!(["x", "y"])), "x y");
        assert_eq!(value_to_i64(&json!(" 7 ")), Some(7));
        assert_eq!(value_to_i64(&json!("seven")), None);
    }
}
