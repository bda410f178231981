/*!
Command construction.

`CommandFactory` composes extraction and descriptor building:

  create_command_info(file, op)   -> CommandDescriptor
  create_command(descriptor, file) -> Command (descriptor + callable + file state)
  register_command_hook(descriptor, file) -> HookManager::add(target, hook, source)

A `Command` is cheap to clone; clones share the descriptor, the bound state
and the processor (and through it the hook registry).
*/

use std::fmt;
use std::io::Write;
use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::debug;

use crate::descriptor::{self, CommandDescriptor};
use crate::error::{CommandError, ConstructionError, InputError};
use crate::hooks::HookManager;
use crate::input::{self, CommandInput};
use crate::operation::{CommandCall, CommandFile, CommandFn, Handler, StateHandle};
use crate::parser;
use crate::processor::CommandProcessor;

/// A runnable command: descriptor, callable and bound state.
#[derive(Clone)]
pub struct Command {
    descriptor: Arc<CommandDescriptor>,
    handler: CommandFn,
    state: StateHandle,
    processor: Arc<CommandProcessor>,
}

impl Command {
    pub fn descriptor(&self) -> &CommandDescriptor {
        &self.descriptor
    }

    pub fn name(&self) -> &str {
        self.descriptor.name()
    }

    /// Hook lookup keys, in lookup order.
    pub fn names(&self) -> Vec<String> {
        self.descriptor.lookup_names()
    }

    pub fn aliases(&self) -> &[String] {
        self.descriptor.aliases()
    }

    pub fn synopsis(&self) -> String {
        self.descriptor.synopsis()
    }

    pub fn state(&self) -> &StateHandle {
        &self.state
    }

    pub fn command_processor(&self) -> &Arc<CommandProcessor> {
        &self.processor
    }

    /// Bind raw tokens (without the command name) to this command.
    pub fn bind(&self, tokens: Vec<String>) -> Result<CommandInput, InputError> {
        input::bind(&self.descriptor, tokens)
    }

    /// Run through the processor. Returns the status code.
    pub fn execute(&self, input: CommandInput, output: &mut dyn Write) -> i32 {
        self.processor.execute(self, input, output)
    }

    pub(crate) fn invoke(
        &self,
        arguments: &Map<String, Value>,
        options: &Map<String, Value>,
    ) -> Result<Value, CommandError> {
        let call = CommandCall::new(&self.descriptor, arguments, options, &self.state);
        (self.handler)(&call)
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name())
            .field("operation", &self.descriptor.operation())
            .field("group", &self.descriptor.group())
            .finish()
    }
}

/// Find a command by name or alias.
pub fn find_command<'a>(commands: &'a [Command], name: &str) -> Option<&'a Command> {
    commands.iter().find(|c| c.descriptor().answers_to(name))
}

#[derive(Debug, Clone)]
pub struct CommandFactory {
    processor: Arc<CommandProcessor>,
}

impl Default for CommandFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandFactory {
    /// Factory with its own hook registry and processor.
    pub fn new() -> Self {
        Self::with_processor(Arc::new(CommandProcessor::new(Arc::new(HookManager::new()))))
    }

    pub fn with_processor(processor: Arc<CommandProcessor>) -> Self {
        Self { processor }
    }

    pub fn hook_manager(&self) -> &Arc<HookManager> {
        self.processor.hook_manager()
    }

    pub fn command_processor(&self) -> &Arc<CommandProcessor> {
        &self.processor
    }

    /// Descriptor for one operation of `file`.
    pub fn create_command_info(
        &self,
        file: &CommandFile,
        operation: &str,
    ) -> Result<CommandDescriptor, ConstructionError> {
        let op = file
            .find(operation)
            .ok_or_else(|| ConstructionError::UnknownOperation {
                operation: operation.to_string(),
                group: file.group().to_string(),
            })?;
        descriptor::build(parser::extract(file, op))
    }

    /// Bind `info` to its operation and to the state of `file`.
    pub fn create_command(
        &self,
        info: &CommandDescriptor,
        file: &CommandFile,
    ) -> Result<Command, ConstructionError> {
        if info.is_hook() {
            return Err(ConstructionError::NotACommand {
                operation: info.operation().to_string(),
            });
        }
        let handler = match self.handler_for(info, file)? {
            Handler::Command(f) => f.clone(),
            Handler::Hook(_) => {
                return Err(ConstructionError::NotACommand {
                    operation: info.operation().to_string(),
                });
            }
        };
        debug!(name = info.name(), group = file.group(), "created command");
        Ok(Command {
            descriptor: Arc::new(info.clone()),
            handler,
            state: file.state().clone(),
            processor: self.processor.clone(),
        })
    }

    /// Register the hook declared by `info`. A hook without a target applies
    /// to every command of the file's group.
    pub fn register_command_hook(
        &self,
        info: &CommandDescriptor,
        file: &CommandFile,
    ) -> Result<(), ConstructionError> {
        let spec = info.hook().ok_or_else(|| ConstructionError::NotAHook {
            operation: info.operation().to_string(),
        })?;
        let hook = match self.handler_for(info, file)? {
            Handler::Hook(hook) if hook.hook_type() == spec.hook_type => hook.clone(),
            Handler::Hook(hook) => {
                return Err(ConstructionError::HandlerMismatch {
                    operation: info.operation().to_string(),
                    declared: spec.hook_type.to_string(),
                    actual: format!("{} hook", hook.hook_type()),
                });
            }
            Handler::Command(_) => {
                return Err(ConstructionError::HandlerMismatch {
                    operation: info.operation().to_string(),
                    declared: spec.hook_type.to_string(),
                    actual: "command".to_string(),
                });
            }
        };
        let target = spec.target.as_deref().unwrap_or(file.group());
        self.hook_manager().add(target, hook, info.operation());
        Ok(())
    }

    /// Register every hook of `file`, then build every command of it.
    pub fn create_commands_from_file(
        &self,
        file: &CommandFile,
    ) -> Result<Vec<Command>, ConstructionError> {
        let mut infos = Vec::with_capacity(file.operations().len());
        for op in file.operations() {
            infos.push(self.create_command_info(file, op.name())?);
        }
        for info in infos.iter().filter(|i| i.is_hook()) {
            self.register_command_hook(info, file)?;
        }
        infos
            .iter()
            .filter(|i| !i.is_hook())
            .map(|info| self.create_command(info, file))
            .collect()
    }

    fn handler_for<'f>(
        &self,
        info: &CommandDescriptor,
        file: &'f CommandFile,
    ) -> Result<&'f Handler, ConstructionError> {
        file.find(info.operation())
            .map(|op| op.handler())
            .ok_or_else(|| ConstructionError::UnknownOperation {
                operation: info.operation().to_string(),
                group: file.group().to_string(),
            })
    }
}
