/*!
`get.rs`

Implements the `get` subcommand: full detail for one command, looked up by
name or alias.

Human output: boxed synopsis, description / help, arguments and options
tables, usage examples and the hooks that currently apply (per stage, with
their source operations).

JSON output:
{
  "status": "ok",
  "command": { ...serialized descriptor... },
  "synopsis": "my:cat [--flip] [--] <one> [<two>]",
  "lookup_names": ["my:cat", "demo::example-command-file"],
  "hooks": { "interact": [], "validate": [], "alter": ["..."] }
}
*/

use anyhow::{Context, Result};
use clap::Args;
use serde_json::{Map, Value, json};

use annotated_cmd::factory::find_command;
use annotated_cmd::operation::value_to_string;
use annotated_cmd::{Command, CommandFactory, HookEntry, HookType};

use crate::cmd::format::{Role, StyleOptions, box_header, color, emoji, table};
use crate::cmd::shared::{Settings, load_commands, output_error};

/// CLI arguments for `acmd get <name>`
#[derive(Args, Debug)]
pub struct GetArgs {
    /// Command name or alias
    #[arg(value_name = "NAME")]
    pub name: String,

    /// Output JSON
    #[arg(long)]
    pub json: bool,
}

pub fn execute_get(args: GetArgs, settings: &Settings) -> Result<()> {
    let name = args.name.trim();
    if name.is_empty() {
        return output_error(args.json, "command name cannot be empty");
    }

    let (factory, commands) = load_commands(settings)?;
    let Some(command) = find_command(&commands, name) else {
        return output_error(args.json, &format!("unknown command '{name}'"));
    };

    if args.json {
        let detail = detail_json(&factory, command)?;
        println!(
            "{}",
            serde_json::to_string_pretty(&detail).unwrap_or_else(|_| detail.to_string())
        );
        return Ok(());
    }
    print_detail(&factory, command);
    Ok(())
}

/// Sources of every hook that applies to `command`, per stage.
fn applied_hooks(factory: &CommandFactory, command: &Command) -> Vec<(HookType, Vec<String>)> {
    let names = command.names();
    HookType::variants()
        .iter()
        .map(|t| {
            let entries = factory.hook_manager().get_for_names(&names, *t);
            (*t, entries.iter().map(HookEntry::source).map(str::to_string).collect())
        })
        .collect()
}

fn detail_json(factory: &CommandFactory, command: &Command) -> Result<Value> {
    let descriptor =
        serde_json::to_value(command.descriptor()).context("Failed to serialize descriptor")?;
    let mut hooks = Map::new();
    for (hook_type, sources) in applied_hooks(factory, command) {
        hooks.insert(hook_type.to_string(), json!(sources));
    }
    Ok(json!({
        "status": "ok",
        "command": descriptor,
        "synopsis": command.synopsis(),
        "lookup_names": command.names(),
        "hooks": hooks,
    }))
}

fn print_detail(factory: &CommandFactory, command: &Command) {
    let style = StyleOptions::detect();
    let d = command.descriptor();

    println!(
        "{}",
        box_header(
            format!("{} {}", emoji("command", &style), d.name()),
            Some(d.synopsis()),
            &style
        )
    );
    if !d.description().is_empty() {
        println!("{}", d.description());
    }
    if !d.help().is_empty() {
        println!("\n{}", d.help());
    }
    if !d.aliases().is_empty() {
        println!(
            "\n{} {}",
            color(Role::Accent, "Aliases:", &style),
            d.aliases().join(", ")
        );
    }

    if !d.arguments().is_empty() {
        let rows: Vec<Vec<String>> = d
            .arguments()
            .iter()
            .map(|a| {
                vec![
                    if a.is_array { format!("{}...", a.name) } else { a.name.clone() },
                    if a.required { "yes".into() } else { "no".into() },
                    a.default.as_ref().map(render_default).unwrap_or_else(|| "-".into()),
                    a.description.clone(),
                ]
            })
            .collect();
        println!("\n{}", color(Role::Accent, "Arguments:", &style));
        println!("{}", table(&["NAME", "REQUIRED", "DEFAULT", "DESCRIPTION"], &rows, &style));
    }

    if !d.options().is_empty() {
        let rows: Vec<Vec<String>> = d
            .options()
            .iter()
            .map(|o| {
                let flag = match o.shortcut {
                    Some(s) => format!("-{s}, --{}", o.name),
                    None => format!("--{}", o.name),
                };
                vec![
                    flag,
                    format!("{:?}", o.mode).to_lowercase(),
                    render_default(&o.default),
                    o.description.clone(),
                ]
            })
            .collect();
        println!("\n{}", color(Role::Accent, "Options:", &style));
        println!("{}", table(&["OPTION", "MODE", "DEFAULT", "DESCRIPTION"], &rows, &style));
    }

    if !d.usages().is_empty() {
        println!("\n{}", color(Role::Accent, "Usage:", &style));
        for usage in d.usages() {
            match &usage.description {
                Some(text) => {
                    println!("  {}\n    {}", usage.example, color(Role::Dim, text, &style))
                }
                None => println!("  {}", usage.example),
            }
        }
    }

    let hooks: Vec<(HookType, Vec<String>)> = applied_hooks(factory, command)
        .into_iter()
        .filter(|(_, sources)| !sources.is_empty())
        .collect();
    if !hooks.is_empty() {
        println!("\n{}", color(Role::Accent, "Hooks:", &style));
        for (hook_type, sources) in hooks {
            println!("  {hook_type}: {}", sources.join(" -> "));
        }
    }
}

fn render_default(value: &Value) -> String {
    match value {
        Value::String(s) if s.is_empty() => "\"\"".to_string(),
        Value::Array(items) if items.is_empty() => "[]".to_string(),
        Value::Null => "null".to_string(),
        other => value_to_string(other),
    }
}
