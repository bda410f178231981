/*!
`exec.rs`

Implements the `exec` subcommand: run one command line through the full
pipeline (interact, validate, invoke, alter, output).

  acmd exec my:cat bet alpha --flip
  acmd exec "test:hello 'Donald Duck'"
  acmd exec test:passthrough a b c -- x y z

A single argument is shell-split; several arguments are taken as already
split. Everything after `--` is pass-through input for the command's last
argument. The process exits with the pipeline's status code.
*/

use std::io::{self, Write};

use anyhow::{Context, Result};
use clap::Args;

use annotated_cmd::factory::find_command;
use annotated_cmd::input::bind_line;

use crate::cmd::shared::{Settings, load_commands, output_error};

#[derive(Args, Debug)]
pub struct ExecArgs {
    /// Command name (or alias) followed by its arguments, options and
    /// `-- passthrough` values
    #[arg(
        value_name = "COMMAND_LINE",
        required = true,
        num_args = 1..,
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    pub line: Vec<String>,
}

impl ExecArgs {
    /// The command line as one shell-quoted string.
    pub fn command_line(&self) -> String {
        match self.line.as_slice() {
            [single] => single.clone(),
            tokens => shell_words::join(tokens),
        }
    }
}

pub fn execute_exec(args: ExecArgs, settings: &Settings) -> Result<()> {
    let line = args.command_line();
    if line.trim().is_empty() {
        return output_error(false, "command line cannot be empty");
    }

    let (_factory, commands) = load_commands(settings)?;
    let (descriptor, input) = match bind_line(commands.iter().map(|c| c.descriptor()), &line) {
        Ok(bound) => bound,
        Err(e) => return output_error(false, &e.to_string()),
    };
    let Some(command) = find_command(&commands, descriptor.name()) else {
        return output_error(false, &format!("unknown command '{}'", descriptor.name()));
    };
    tracing::debug!(command = command.name(), %line, "executing");

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let status = command.execute(input, &mut out);
    out.flush().context("Failed to flush output")?;

    if status != 0 {
        std::process::exit(status);
    }
    Ok(())
}
