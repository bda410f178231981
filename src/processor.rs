/*!
Command execution pipeline.

Per invocation:

  BOUND -> INTERACT -> VALIDATE -> PRE_HOOKS -> INVOKE -> ALTER_HOOKS -> OUTPUT -> DONE
                 \          \                     \
                  +----------+---------------------+--> ERROR

Hooks are looked up in the `HookManager` at every stage of every call, under
each of the command's lookup names (name, `@tag` keys, group key). A hook
registered after the command was built therefore applies to its next run.

ERROR renders the message through the configured display-error function (or
prints it as-is) and returns the failing stage's status code.
*/

use std::fmt;
use std::io::{self, Write};
use std::sync::{Arc, PoisonError, RwLock};

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, trace, warn};

use crate::error::CommandError;
use crate::factory::Command;
use crate::hooks::{Hook, HookContext, HookEntry, HookManager, HookType};
use crate::input::CommandInput;

pub type DisplayErrorFn = Arc<dyn Fn(&mut dyn Write, &str) + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Bound,
    Interact,
    Validate,
    PreHooks,
    Invoke,
    AlterHooks,
    Output,
    Done,
    Error,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Bound => "bound",
            Stage::Interact => "interact",
            Stage::Validate => "validate",
            Stage::PreHooks => "pre-hooks",
            Stage::Invoke => "invoke",
            Stage::AlterHooks => "alter-hooks",
            Stage::Output => "output",
            Stage::Done => "done",
            Stage::Error => "error",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rendering of structured (array / object) results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
}

impl OutputFormat {
    pub fn from_str_ci(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Some(OutputFormat::Json),
            "yaml" | "yml" => Some(OutputFormat::Yaml),
            _ => None,
        }
    }
}

pub struct CommandProcessor {
    hook_manager: Arc<HookManager>,
    display_error: RwLock<Option<DisplayErrorFn>>,
    format: RwLock<OutputFormat>,
}

impl CommandProcessor {
    pub fn new(hook_manager: Arc<HookManager>) -> Self {
        Self {
            hook_manager,
            display_error: RwLock::new(None),
            format: RwLock::new(OutputFormat::default()),
        }
    }

    pub fn hook_manager(&self) -> &Arc<HookManager> {
        &self.hook_manager
    }

    /// Replace how error messages are rendered. Status codes are unaffected.
    pub fn set_display_error_function<F>(&self, f: F)
    where
        F: Fn(&mut dyn Write, &str) + Send + Sync + 'static,
    {
        *self
            .display_error
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(Arc::new(f));
    }

    /// Back to printing messages as-is.
    pub fn clear_display_error_function(&self) {
        *self
            .display_error
            .write()
            .unwrap_or_else(PoisonError::into_inner) = None;
    }

    pub fn set_output_format(&self, format: OutputFormat) {
        *self.format.write().unwrap_or_else(PoisonError::into_inner) = format;
    }

    pub fn output_format(&self) -> OutputFormat {
        *self.format.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run `command` against `input`, writing the result (or the error) to
    /// `output`. Returns the status code: 0 on success.
    ///
    /// `input` is taken by value: the invocation sees the input as it was
    /// when handed over.
    pub fn execute(&self, command: &Command, input: CommandInput, output: &mut dyn Write) -> i32 {
        let ctx = HookContext::new(command.descriptor());
        let mut stage = Stage::Bound;
        trace!(command = command.name(), %stage, "pipeline start");

        match self.run_stages(command, &ctx, input, &mut stage) {
            Ok(result) => {
                self.enter(command, &mut stage, Stage::Output);
                if let Err(e) = self.write_result(output, &result) {
                    warn!(command = command.name(), error = %e, "failed to write command output");
                    return 1;
                }
                self.enter(command, &mut stage, Stage::Done);
                0
            }
            Err(err) => {
                debug!(
                    command = command.name(),
                    %stage,
                    status = err.status(),
                    message = err.message(),
                    "command failed"
                );
                stage = Stage::Error;
                trace!(command = command.name(), %stage, "pipeline end");
                self.display_error(output, err.message());
                err.status()
            }
        }
    }

    fn run_stages(
        &self,
        command: &Command,
        ctx: &HookContext<'_>,
        mut input: CommandInput,
        stage: &mut Stage,
    ) -> Result<Value, CommandError> {
        self.enter(command, stage, Stage::Interact);
        self.run_interact(command, &mut input, ctx)?;

        self.enter(command, stage, Stage::Validate);
        self.check_required(command, &input)?;
        self.run_validate(command, &input, ctx)?;

        self.enter(command, stage, Stage::PreHooks);
        let arguments = input.resolved_arguments(command.descriptor());

        self.enter(command, stage, Stage::Invoke);
        let result = command.invoke(&arguments, input.options())?;

        self.enter(command, stage, Stage::AlterHooks);
        Ok(self.run_alter(command, result, ctx))
    }

    fn enter(&self, command: &Command, stage: &mut Stage, next: Stage) {
        trace!(command = command.name(), from = %stage, to = %next, "stage");
        *stage = next;
    }

    /// Run interact hooks on their own, in registration order.
    pub fn interact(
        &self,
        command: &Command,
        input: &mut CommandInput,
    ) -> Result<(), CommandError> {
        let ctx = HookContext::new(command.descriptor());
        self.run_interact(command, input, &ctx)
    }

    /// Run validate hooks on their own; the first failure is returned.
    pub fn validate(&self, command: &Command, input: &CommandInput) -> Result<(), CommandError> {
        let ctx = HookContext::new(command.descriptor());
        self.run_validate(command, input, &ctx)
    }

    /// Pass `result` through every alter hook, in registration order.
    pub fn alter(&self, command: &Command, result: Value) -> Value {
        let ctx = HookContext::new(command.descriptor());
        self.run_alter(command, result, &ctx)
    }

    fn run_interact(
        &self,
        command: &Command,
        input: &mut CommandInput,
        ctx: &HookContext<'_>,
    ) -> Result<(), CommandError> {
        for entry in self.hooks_for(command, HookType::Interact) {
            if let Hook::Interact(f) = entry.hook() {
                trace!(command = command.name(), source = entry.source(), "interact hook");
                f(&mut *input, ctx)?;
            }
        }
        Ok(())
    }

    fn run_validate(
        &self,
        command: &Command,
        input: &CommandInput,
        ctx: &HookContext<'_>,
    ) -> Result<(), CommandError> {
        for entry in self.hooks_for(command, HookType::Validate) {
            if let Hook::Validate(f) = entry.hook() {
                trace!(command = command.name(), source = entry.source(), "validate hook");
                f(input, ctx)?;
            }
        }
        Ok(())
    }

    fn run_alter(&self, command: &Command, mut result: Value, ctx: &HookContext<'_>) -> Value {
        for entry in self.hooks_for(command, HookType::Alter) {
            if let Hook::Alter(f) = entry.hook() {
                trace!(command = command.name(), source = entry.source(), "alter hook");
                result = f(result, ctx);
            }
        }
        result
    }

    fn hooks_for(&self, command: &Command, hook_type: HookType) -> Vec<HookEntry> {
        self.hook_manager.get_for_names(&command.names(), hook_type)
    }

    fn check_required(&self, command: &Command, input: &CommandInput) -> Result<(), CommandError> {
        let missing = input.missing_required(command.descriptor());
        if missing.is_empty() {
            return Ok(());
        }
        Err(CommandError::new(format!(
            "Not enough arguments (missing: \"{}\").",
            missing.join(", ")
        )))
    }

    /// Scalars are written followed by a newline; null and empty strings write
    /// nothing; arrays and objects go through the configured format.
    pub fn write_result(&self, output: &mut dyn Write, result: &Value) -> io::Result<()> {
        match result {
            Value::Null => Ok(()),
            Value::String(s) if s.is_empty() => Ok(()),
            Value::String(s) => writeln!(output, "{s}"),
            Value::Bool(_) | Value::Number(_) => writeln!(output, "{result}"),
            Value::Array(_) | Value::Object(_) => match self.output_format() {
                OutputFormat::Json => {
                    serde_json::to_writer_pretty(&mut *output, result).map_err(io::Error::other)?;
                    writeln!(output)
                }
                OutputFormat::Yaml => {
                    let text = serde_yaml::to_string(result).map_err(io::Error::other)?;
                    output.write_all(text.as_bytes())
                }
            },
        }
    }

    /// Render an error message through the configured function, or as-is.
    pub fn display_error(&self, output: &mut dyn Write, message: &str) {
        let custom = self
            .display_error
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        match custom {
            Some(f) => f(output, message),
            None => {
                if let Err(e) = writeln!(output, "{message}") {
                    warn!(error = %e, "failed to write error message");
                }
            }
        }
    }
}

impl fmt::Debug for CommandProcessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandProcessor")
            .field("hook_manager", &self.hook_manager)
            .field("format", &self.output_format())
            .finish()
    }
}
