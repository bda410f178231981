/*!
`list.rs`

Implements the `list` subcommand of `acmd`.

Subjects:
  - commands (default): every runnable command with aliases and description
  - hooks            : every registered (target, type) with its source operations

JSON Output Shape (commands):
{
  "status": "ok",
  "subject": "commands",
  "count": 2,
  "commands": [
    { "name": "my:cat", "aliases": ["c"], "group": "...", "description": "...", "synopsis": "..." }
  ]
}
*/

use anyhow::Result;
use clap::Args;
use serde_json::{Value, json};

use annotated_cmd::{Command, CommandFactory, HookEntry};

use crate::cmd::format::{Role, StyleOptions, box_header, color, emoji, table};
use crate::cmd::shared::{Settings, load_commands};
use crate::cmd::subject::Subject;

/// CLI arguments for `acmd list [subject]`
#[derive(Args, Debug)]
pub struct ListArgs {
    /// What to list (commands|hooks)
    #[arg(value_parser = parse_subject, default_value_t = Subject::Commands)]
    pub subject: Subject,

    /// Output JSON instead of human-readable text
    #[arg(long)]
    pub json: bool,
}

pub fn execute_list(args: ListArgs, settings: &Settings) -> Result<()> {
    let (factory, commands) = load_commands(settings)?;
    match args.subject {
        Subject::Commands => list_commands(&commands, args.json),
        Subject::Hooks => list_hooks(&factory, args.json),
    }
}

fn parse_subject(raw: &str) -> Result<Subject, String> {
    Subject::from_str_ci(raw).ok_or_else(|| {
        let known: Vec<String> = Subject::variants().iter().map(ToString::to_string).collect();
        format!("unknown subject '{raw}' (expected {})", known.join("|"))
    })
}

fn command_json(command: &Command) -> Value {
    let d = command.descriptor();
    json!({
        "name": d.name(),
        "aliases": d.aliases(),
        "group": d.group(),
        "description": d.description(),
        "synopsis": d.synopsis(),
    })
}

fn list_commands(commands: &[Command], json: bool) -> Result<()> {
    if json {
        let items: Vec<Value> = commands.iter().map(command_json).collect();
        println!(
            "{}",
            json!({
                "status": "ok",
                "subject": "commands",
                "count": items.len(),
                "commands": items,
            })
        );
        return Ok(());
    }

    let style = StyleOptions::detect();
    println!(
        "{}",
        box_header(
            format!("{} Commands ({})", emoji("list", &style), commands.len()),
            None::<&str>,
            &style
        )
    );

    let rows: Vec<Vec<String>> = commands
        .iter()
        .enumerate()
        .map(|(idx, c)| {
            let d = c.descriptor();
            vec![
                (idx + 1).to_string(),
                d.name().to_string(),
                d.aliases().join(", "),
                d.description().to_string(),
            ]
        })
        .collect();
    println!("{}", table(&["#", "NAME", "ALIASES", "DESCRIPTION"], &rows, &style));
    println!(
        "\n{} {}",
        emoji("info", &style),
        color(
            Role::Dim,
            "Use `acmd get <name>` for arguments, options and usage examples",
            &style
        )
    );
    Ok(())
}

fn sources(entries: &[HookEntry]) -> Vec<&str> {
    entries.iter().map(HookEntry::source).collect()
}

fn list_hooks(factory: &CommandFactory, json: bool) -> Result<()> {
    let manager = factory.hook_manager();
    let targets = manager.targets();

    if json {
        let items: Vec<Value> = targets
            .iter()
            .map(|(target, hook_type, count)| {
                let entries = manager.get(target, *hook_type);
                json!({
                    "target": target,
                    "type": hook_type,
                    "count": count,
                    "sources": sources(&entries),
                })
            })
            .collect();
        println!(
            "{}",
            json!({
                "status": "ok",
                "subject": "hooks",
                "count": manager.len(),
                "hooks": items,
            })
        );
        return Ok(());
    }

    let style = StyleOptions::detect();
    println!(
        "{}",
        box_header(
            format!("{} Hooks ({})", emoji("hook", &style), manager.len()),
            Some(format!("{} targets", targets.len())),
            &style
        )
    );
    if targets.is_empty() {
        println!("{}", color(Role::Dim, "(none)", &style));
        return Ok(());
    }

    let rows: Vec<Vec<String>> = targets
        .iter()
        .map(|(target, hook_type, _)| {
            let entries = manager.get(target, *hook_type);
            vec![target.clone(), hook_type.to_string(), sources(&entries).join(", ")]
        })
        .collect();
    println!("{}", table(&["TARGET", "TYPE", "SOURCES"], &rows, &style));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser, Debug)]
    struct TestCli {
        #[command(subcommand)]
        cmd: TestSub,
    }

    #[derive(clap::Subcommand, Debug)]
    enum TestSub {
        List(ListArgs),
    }

    fn parse(args: &[&str]) -> ListArgs {
        let TestSub::List(a) = TestCli::try_parse_from(args).unwrap().cmd;
        a
    }

    #[test]
    fn subject_defaults_to_commands() {
        let a = parse(&["t", "list"]);
        assert_eq!(a.subject, Subject::Commands);
        assert!(!a.json);
    }

    #[test]
    fn parses_hooks_with_json() {
        let a = parse(&["t", "list", "hooks", "--json"]);
        assert_eq!(a.subject, Subject::Hooks);
        assert!(a.json);
    }

    #[test]
    fn subject_accepts_singular_and_any_case() {
        assert_eq!(parse(&["t", "list", "Hook"]).subject, Subject::Hooks);
        let err = TestCli::try_parse_from(["t", "list", "tools"]).unwrap_err();
        assert!(err.to_string().contains("expected commands|hooks"));
    }

    #[test]
    fn command_json_shape() {
        let (_, commands) = load_commands(&Settings::default()).unwrap();
        let cat = commands.iter().find(|c| c.name() == "my:cat").unwrap();
        let v = command_json(cat);
        assert_eq!(v["aliases"], json!(["c"]));
        assert_eq!(v["synopsis"], json!("my:cat [--flip] [--] <one> [<two>]"));
    }
}
