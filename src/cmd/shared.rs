/*!
shared.rs - shared helpers for subcommands.

Focus:
  - Settings::resolve: output format (flag > ACMD_FORMAT > json) and error display
  - load_commands: factory + hooks + commands from the built-in command files
  - output_error: JSON or boxed error, then bail
*/

use std::io::Write;

use anyhow::{Context, Result, anyhow};
use annotated_cmd::demo;
use annotated_cmd::{Command, CommandFactory, CommandFile, OutputFormat};

use crate::cmd::format::{Role, StyleOptions, box_header, color, emoji};

pub const FORMAT_ENV: &str = "ACMD_FORMAT";
pub const ERROR_BANNER_ENV: &str = "ACMD_ERROR_BANNER";

/* ---- Settings ---- */

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Settings {
    pub format: OutputFormat,
    pub error_banner: bool,
}

impl Settings {
    /// CLI flags first, then environment, then defaults.
    pub fn resolve(
        format: Option<OutputFormat>,
        error_banner: bool,
        plain_errors: bool,
    ) -> Result<Self> {
        let format = match format {
            Some(f) => f,
            None => match env_non_empty(FORMAT_ENV) {
                Some(raw) => OutputFormat::from_str_ci(&raw)
                    .ok_or_else(|| anyhow!("expected json or yaml, got '{raw}'"))
                    .with_context(|| format!("Invalid {FORMAT_ENV}"))?,
                None => OutputFormat::default(),
            },
        };
        let error_banner = !plain_errors
            && (error_banner
                || env_non_empty(ERROR_BANNER_ENV).is_some_and(|v| is_truthy(&v)));
        Ok(Self {
            format,
            error_banner,
        })
    }
}

fn env_non_empty(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|s| !s.trim().is_empty())
}

fn is_truthy(s: &str) -> bool {
    matches!(s.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

/* ---- Command Loading ---- */

/// Built-in command files, in registration order.
pub fn command_files() -> Vec<CommandFile> {
    vec![demo::example_command_file(), demo::hook_all_command_file()]
}

/// Build a factory configured from `settings`, register every hook of the
/// built-in files and return their commands.
pub fn load_commands(settings: &Settings) -> Result<(CommandFactory, Vec<Command>)> {
    let factory = CommandFactory::new();
    let processor = factory.command_processor();
    processor.set_output_format(settings.format);
    if settings.error_banner {
        processor.set_display_error_function(error_banner);
    }

    let mut commands = Vec::new();
    for file in command_files() {
        let built = factory
            .create_commands_from_file(&file)
            .with_context(|| format!("Failed to load command file '{}'", file.group()))?;
        commands.extend(built);
    }
    tracing::debug!(
        commands = commands.len(),
        hooks = factory.hook_manager().len(),
        "loaded command files"
    );
    Ok((factory, commands))
}

/// Display-error function installed by `--error-banner`.
pub fn error_banner(out: &mut dyn Write, message: &str) {
    let style = StyleOptions::detect();
    let title = format!("{} Command Error", emoji("error", &style));
    let boxed = box_header(title, Some(color(Role::Error, message, &style)), &style);
    if let Err(e) = writeln!(out, "{boxed}") {
        tracing::warn!(error = %e, "failed to write error banner");
    }
}

/* ---- Output Helpers ---- */

pub fn output_error(json: bool, msg: &str) -> Result<()> {
    if json {
        let err = serde_json::json!({"status": "error", "error": msg});
        println!(
            "{}",
            serde_json::to_string_pretty(&err).unwrap_or_else(|_| err.to_string())
        );
    } else {
        let style = StyleOptions::detect();
        let title = format!("{} Error", emoji("error", &style));
        println!("{}", box_header(title, Some(color(Role::Error, msg, &style)), &style));
        println!(
            "{} {}",
            emoji("info", &style),
            color(Role::Dim, "Run `acmd list` to see available commands.", &style)
        );
    }
    anyhow::bail!(msg.to_string())
}

/* ---- Tests ---- */

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_win_over_defaults() {
        let s = Settings::resolve(Some(OutputFormat::Yaml), true, false).unwrap();
        assert_eq!(s.format, OutputFormat::Yaml);
        assert!(s.error_banner);
    }

    #[test]
    fn plain_errors_disables_the_banner() {
        let s = Settings::resolve(Some(OutputFormat::Json), true, true).unwrap();
        assert!(!s.error_banner);
    }

    #[test]
    fn truthy_values() {
        assert!(is_truthy(" Yes "));
        assert!(is_truthy("1"));
        assert!(!is_truthy("0"));
        assert!(!is_truthy("nope"));
    }

    #[test]
    fn load_commands_registers_hooks_from_every_file() {
        let (factory, commands) = load_commands(&Settings::default()).unwrap();
        assert_eq!(commands.len(), 16);
        assert_eq!(factory.hook_manager().len(), 6);
        assert!(commands.iter().any(|c| c.name() == "do:cat"));
    }

    #[test]
    fn error_banner_boxes_the_message() {
        let mut out = Vec::new();
        error_banner(&mut out, "Irrational value error.");
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Irrational value error."));
        assert_eq!(text.lines().count(), 3);
    }
}
