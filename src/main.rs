use anyhow::Result;
use clap::{Parser, Subcommand};

use annotated_cmd::OutputFormat;

mod cmd;
mod utils;

use cmd::{ExecArgs, GetArgs, ListArgs, Settings};

/// acmd - run annotated commands through the interact / validate / alter pipeline
///
/// Command layout:
///   acmd list [commands|hooks] [--json]
///   acmd get  <name> [--json]
///   acmd exec <command line...> [-- passthrough...]
///
/// Global flags / env:
///   -v / -vv          Increase verbosity (RUST_LOG overrides)
///   -q / --quiet      Errors only
///   --format          json|yaml for structured results (or ACMD_FORMAT)
///   --error-banner    Box error messages (or ACMD_ERROR_BANNER=1)
///   --plain-errors    Print error messages as-is
///
/// Examples:
///   acmd exec test:arithmatic 2 3 --negate
///   acmd exec "test:hello 'Donald Duck'"
///   acmd exec test:passthrough a b c -- x y z
///   acmd get my:cat --json
#[derive(Parser, Debug)]
#[command(
    name = "acmd",
    version,
    author,
    about = "Run annotated commands through the hook pipeline",
    propagate_version = true,
    disable_help_subcommand = true
)]
pub struct Cli {
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Silence all non-error output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Rendering of structured results (falls back to ACMD_FORMAT)
    #[arg(long, value_enum, global = true, value_name = "FORMAT")]
    format: Option<OutputFormat>,

    /// Render error messages in a box
    #[arg(long = "error-banner", global = true)]
    error_banner: bool,

    /// Print error messages as-is (overrides --error-banner and ACMD_ERROR_BANNER)
    #[arg(long = "plain-errors", global = true)]
    plain_errors: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List commands or registered hooks
    List(ListArgs),

    /// Show one command in detail
    Get(GetArgs),

    /// Execute a command line
    Exec(ExecArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = utils::derive_level(cli.verbose, cli.quiet);
    utils::init_logging(level);

    let settings = match Settings::resolve(cli.format, cli.error_banner, cli.plain_errors) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("{e:#}");
            std::process::exit(2);
        }
    };

    match cli.command {
        Commands::List(args) => cmd::execute_list(args, &settings),
        Commands::Get(args) => cmd::execute_get(args, &settings),
        Commands::Exec(args) => cmd::execute_exec(args, &settings),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli =
            Cli::try_parse_from(["acmd", "list", "hooks", "-vv", "--format", "yaml"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.format, Some(OutputFormat::Yaml));
        assert!(matches!(cli.command, Commands::List(_)));
    }

    #[test]
    fn exec_keeps_command_options() {
        let cli = Cli::try_parse_from([
            "acmd",
            "--plain-errors",
            "exec",
            "c",
            "bet",
            "alpha",
            "--flip",
        ])
        .unwrap();
        assert!(cli.plain_errors);
        match cli.command {
            Commands::Exec(args) => assert_eq!(args.line, vec!["c", "bet", "alpha", "--flip"]),
            other => panic!("unexpected subcommand: {other:?}"),
        }
    }
}
