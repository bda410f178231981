//! Annotated commands: declare operations with doc-comment metadata, get
//! CLI command descriptors out, and run them through a hook pipeline.
//!
//! Layout:
//!   parser      doc-block parsing (summary, help, ordered tag multimap)
//!   descriptor  immutable command shape (name, aliases, args, options, synopsis)
//!   operation   explicit operation / command-file value objects
//!   hooks       hook types, hook registry
//!   input       bound input + descriptor-driven argv binding (clap)
//!   factory     descriptor + command construction, hook registration
//!   processor   interact -> validate -> invoke -> alter -> output pipeline
//!   demo        example command files used by the `acmd` binary and tests
//!
//! Minimal flow:
//! ```no_run
//! use annotated_cmd::{CommandFactory, CommandInput, demo};
//!
//! let factory = CommandFactory::new();
//! let file = demo::example_command_file();
//! let info = factory.create_command_info(&file, "myCat").unwrap();
//! let command = factory.create_command(&info, &file).unwrap();
//! let mut out = Vec::new();
//! let input = CommandInput::new().with_argument("one", "bet").with_argument("two", "alpha");
//! let status = command.execute(input, &mut out);
//! assert_eq!(status, 0);
//! ```

pub mod demo;
pub mod descriptor;
pub mod error;
pub mod factory;
pub mod hooks;
pub mod input;
pub mod operation;
pub mod parser;
pub mod processor;

pub use descriptor::{
    ArgumentSpec, CommandDescriptor, HookSpec, OptionSpec, UsageExample, ValueMode, derive_name,
};
pub use error::{CommandError, ConstructionError, InputError};
pub use factory::{Command, CommandFactory};
pub use hooks::{Hook, HookContext, HookEntry, HookManager, HookType};
pub use input::CommandInput;
pub use operation::{CommandCall, CommandFile, Handler, Operation, Parameter, StateHandle};
pub use parser::{DocBlock, RawMetadata, TagMap};
pub use processor::{CommandProcessor, OutputFormat, Stage};
