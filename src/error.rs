//! Error types.
//!
//! ConstructionError  malformed declaration, raised while building descriptors/commands
//! CommandError       non-exceptional failure from a hook or an operation (carries a status)
//! InputError         a command line could not be bound to a descriptor

use thiserror::Error;

/// A command or hook declaration that cannot be turned into a descriptor.
///
/// Only produced at build time; the pipeline never raises these.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConstructionError {
    #[error(
        "command '{command}': required argument '{argument}' cannot follow optional argument '{optional}'"
    )]
    RequiredAfterOptional {
        command: String,
        argument: String,
        optional: String,
    },

    #[error("command '{command}': array argument '{argument}' must be the last argument")]
    ArrayNotLast { command: String, argument: String },

    #[error("command '{command}': argument '{argument}' is declared more than once")]
    DuplicateArgument { command: String, argument: String },

    #[error("command '{command}': option '--{option}' is declared more than once")]
    DuplicateOption { command: String, option: String },

    #[error(
        "command '{command}': shortcut '-{shortcut}' is used by both '--{first}' and '--{second}'"
    )]
    DuplicateShortcut {
        command: String,
        shortcut: char,
        first: String,
        second: String,
    },

    #[error("command '{command}': option '--{name}' has the same name as an argument")]
    OptionShadowsArgument { command: String, name: String },

    #[error("operation '{operation}' does not resolve to a command name")]
    EmptyName { operation: String },

    #[error(
        "operation '{operation}': unknown hook type '{kind}' (expected alter, interact or validate)"
    )]
    UnknownHookType { operation: String, kind: String },

    #[error("operation '{operation}' is not declared in command file '{group}'")]
    UnknownOperation { operation: String, group: String },

    #[error("operation '{operation}' has no @hook tag")]
    NotAHook { operation: String },

    #[error("operation '{operation}' is a hook and cannot be bound as a command")]
    NotACommand { operation: String },

    #[error("operation '{operation}': '@hook {declared}' does not match its {actual} handler")]
    HandlerMismatch {
        operation: String,
        declared: String,
        actual: String,
    },
}

/// Failure signalled by a validate/interact hook or by the bound operation.
///
/// This is a value, not a panic: the processor routes it to the error display
/// and returns `status` to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct CommandError {
    message: String,
    status: i32,
}

impl CommandError {
    /// New failure with the default status code (1).
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: 1,
        }
    }

    /// Override the status code. A failure never reports success, so `0` is
    /// raised to `1`.
    pub fn with_status(mut self, status: i32) -> Self {
        self.status = if status == 0 { 1 } else { status };
        self
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn status(&self) -> i32 {
        self.status
    }
}

/// Errors while binding a raw command line to a descriptor.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("failed to split command line: {0}")]
    Split(#[from] shell_words::ParseError),

    #[error("{0}")]
    Parse(#[from] clap::Error),

    #[error("empty command line")]
    Empty,

    #[error("unknown command '{0}'")]
    UnknownCommand(String),
}
