/*!
Bound command input.

`CommandInput` holds argument and option values by name plus any
pass-through values (everything after a bare `--` on the command line).

Binding a raw command line is delegated to clap: `clap_command(descriptor)`
builds a `clap::Command` from the descriptor and `bind(descriptor, tokens)`
turns the matches into a `CommandInput`. Required arguments are NOT enforced
here; interact hooks get a chance to fill them first and the processor checks
afterwards.
*/

use clap::{Arg, ArgAction, ArgMatches};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::descriptor::{CommandDescriptor, ValueMode};
use crate::error::InputError;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CommandInput {
    arguments: Map<String, Value>,
    options: Map<String, Value>,
    passthrough: Vec<String>,
}

impl CommandInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_argument(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set_argument(name, value);
        self
    }

    pub fn with_option(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set_option(name, value);
        self
    }

    pub fn with_passthrough<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.passthrough.extend(values.into_iter().map(Into::into));
        self
    }

    pub fn argument(&self, name: &str) -> Option<&Value> {
        self.arguments.get(name)
    }

    /// Present and not null.
    pub fn has_argument(&self, name: &str) -> bool {
        self.arguments.get(name).is_some_and(|v| !v.is_null())
    }

    pub fn set_argument(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.arguments.insert(name.into(), value.into());
    }

    pub fn option(&self, name: &str) -> Option<&Value> {
        self.options.get(name)
    }

    pub fn set_option(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.options.insert(name.into(), value.into());
    }

    pub fn arguments(&self) -> &Map<String, Value> {
        &self.arguments
    }

    pub fn options(&self) -> &Map<String, Value> {
        &self.options
    }

    pub fn passthrough(&self) -> &[String] {
        &self.passthrough
    }

    /// Fill in declared defaults for anything not supplied.
    pub fn apply_defaults(&mut self, descriptor: &CommandDescriptor) {
        for argument in descriptor.arguments() {
            if !self.arguments.contains_key(&argument.name)
                && let Some(default) = &argument.default
            {
                self.arguments.insert(argument.name.clone(), default.clone());
            }
        }
        for option in descriptor.options() {
            if !self.options.contains_key(&option.name) {
                self.options
                    .insert(option.name.clone(), option.default.clone());
            }
        }
    }

    /// Names of required arguments still missing.
    pub fn missing_required(&self, descriptor: &CommandDescriptor) -> Vec<String> {
        descriptor
            .arguments()
            .iter()
            .filter(|a| a.required && !self.has_argument(&a.name))
            .map(|a| a.name.clone())
            .collect()
    }

    /// Arguments as handed to the operation: pass-through values go to the
    /// last argument (appended when it is an array, joined with spaces otherwise).
    pub fn resolved_arguments(&self, descriptor: &CommandDescriptor) -> Map<String, Value> {
        let mut arguments = self.arguments.clone();
        if self.passthrough.is_empty() {
            return arguments;
        }
        let Some(last) = descriptor.arguments().last() else {
            return arguments;
        };
        let value = if last.is_array {
            let mut items = match arguments.remove(&last.name) {
                Some(Value::Array(items)) => items,
                Some(Value::Null) | None => Vec::new(),
                Some(other) => vec![other],
            };
            items.extend(self.passthrough.iter().cloned().map(Value::String));
            Value::Array(items)
        } else {
            Value::String(self.passthrough.join(" "))
        };
        arguments.insert(last.name.clone(), value);
        arguments
    }
}

/// Split at the first bare `--`: (command tokens, pass-through tokens).
pub fn split_passthrough(tokens: Vec<String>) -> (Vec<String>, Vec<String>) {
    match tokens.iter().position(|t| t == "--") {
        Some(idx) => {
            let mut head = tokens;
            let tail = head.split_off(idx + 1);
            head.pop();
            (head, tail)
        }
        None => (tokens, Vec::new()),
    }
}

/// clap definition for one descriptor. Every argument is optional at this level.
pub fn clap_command(descriptor: &CommandDescriptor) -> clap::Command {
    let mut command = clap::Command::new(descriptor.name().to_string())
        .no_binary_name(true)
        .disable_help_flag(true)
        .disable_version_flag(true)
        .about(descriptor.description().to_string());

    for (idx, argument) in descriptor.arguments().iter().enumerate() {
        let mut arg = Arg::new(argument.name.clone())
            .index(idx + 1)
            .value_name(argument.name.clone())
            .help(argument.description.clone());
        arg = if argument.is_array {
            arg.num_args(0..).action(ArgAction::Append)
        } else {
            arg.action(ArgAction::Set)
        };
        command = command.arg(arg);
    }

    for option in descriptor.options() {
        let mut arg = Arg::new(option.name.clone())
            .long(option.name.clone())
            .help(option.description.clone());
        if let Some(shortcut) = option.shortcut {
            arg = arg.short(shortcut);
        }
        arg = match option.mode {
            ValueMode::Flag => arg.action(ArgAction::SetTrue),
            ValueMode::Optional => arg.action(ArgAction::Set).num_args(0..=1),
            ValueMode::Required => arg
                .action(ArgAction::Set)
                .num_args(1)
                .value_name(option.name.to_uppercase()),
        };
        command = command.arg(arg);
    }

    command
}

/// Bind tokens (without the command name) to `descriptor`.
pub fn bind(
    descriptor: &CommandDescriptor,
    tokens: Vec<String>,
) -> Result<CommandInput, InputError> {
    let (tokens, passthrough) = split_passthrough(tokens);
    let matches = clap_command(descriptor).try_get_matches_from(tokens)?;
    let mut input = CommandInput::new().with_passthrough(passthrough);

    for argument in descriptor.arguments() {
        let hint = argument.type_hint.as_deref().unwrap_or("string");
        if argument.is_array {
            if let Some(values) = matches.get_many::<String>(argument.name.as_str()) {
                let items = values.map(|v| coerce_value(v, hint)).collect();
                input.set_argument(argument.name.clone(), Value::Array(items));
            }
        } else if let Some(value) = matches.get_one::<String>(argument.name.as_str()) {
            input.set_argument(argument.name.clone(), coerce_value(value, hint));
        }
    }

    for option in descriptor.options() {
        let hint = option.type_hint.as_deref();
        if let Some(value) = option_value(&matches, option.name.as_str(), option.mode, hint) {
            input.set_option(option.name.clone(), value);
        }
    }

    input.apply_defaults(descriptor);
    Ok(input)
}

fn option_value(
    matches: &ArgMatches,
    name: &str,
    mode: ValueMode,
    hint: Option<&str>,
) -> Option<Value> {
    match mode {
        ValueMode::Flag => matches.get_flag(name).then_some(Value::Bool(true)),
        ValueMode::Optional | ValueMode::Required => matches
            .get_one::<String>(name)
            .map(|v| coerce_value(v, hint.unwrap_or("auto"))),
    }
}

/// Bind a full command line, `name args... [-- passthrough...]`, choosing the
/// descriptor by name or alias.
pub fn bind_line<'a, I>(
    descriptors: I,
    line: &str,
) -> Result<(&'a CommandDescriptor, CommandInput), InputError>
where
    I: IntoIterator<Item = &'a CommandDescriptor>,
{
    let mut tokens = shell_words::split(line)?;
    if tokens.is_empty() {
        return Err(InputError::Empty);
    }
    let name = tokens.remove(0);
    let descriptor = descriptors
        .into_iter()
        .find(|d| !d.is_hook() && d.answers_to(&name))
        .ok_or_else(|| InputError::UnknownCommand(name.clone()))?;
    let input = bind(descriptor, tokens)?;
    Ok((descriptor, input))
}

/// Coerce a raw string using a primitive type hint.
///
/// `auto` tries integer, then number, then boolean, falling back to a string.
pub fn coerce_value(raw: &str, type_hint: &str) -> Value {
    match type_hint {
        "int" | "integer" => raw
            .parse::<i64>()
            .map(|n| Value::Number(n.into()))
            .unwrap_or_else(|_| Value::String(raw.to_string())),
        "float" | "number" => raw
            .parse::<f64>()
            .ok()
            .and_then(serde_json::Number::from_f64)
            .map(Value::Number)
            .unwrap_or_else(|| Value::String(raw.to_string())),
        "bool" | "boolean" => match raw.to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" | "y" => Value::Bool(true),
            "false" | "0" | "no" | "n" => Value::Bool(false),
            _ => Value::String(raw.to_string()),
        },
        "array" => Value::Array(
            raw.split(',')
                .map(|s| Value::String(s.trim().to_string()))
                .collect(),
        ),
        "auto" => {
            if let Ok(n) = raw.parse::<i64>() {
                Value::Number(n.into())
            } else if let Some(n) = raw.parse::<f64>().ok().and_then(serde_json::Number::from_f64) {
                Value::Number(n)
            } else {
                Value::String(raw.to_string())
            }
        }
        _ => Value::String(raw.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::build;
    use crate::operation::Parameter;
    use crate::parser::{RawMetadata, TagMap};
    use serde_json::json;

    fn descriptor(
        operation: &str,
        tags: &[(&str, &str)],
        parameters: Vec<Parameter>,
    ) -> CommandDescriptor {
        let mut tag_map = TagMap::new();
        for (k, v) in tags {
            tag_map.push(*k, *v);
        }
        build(RawMetadata {
            operation: operation.to_string(),
            group: "tests".to_string(),
            summary: String::new(),
            description: String::new(),
            tags: tag_map,
            parameters,
            param_docs: Vec::new(),
        })
        .unwrap()
    }

    fn tokens(line: &str) -> Vec<String> {
        shell_words::split(line).unwrap()
    }

    fn arithmatic() -> CommandDescriptor {
        descriptor(
            "testArithmatic",
            &[("aliases", "arithmatic")],
            vec![
                Parameter::required("one").typed("integer"),
                Parameter::required("two").typed("integer"),
                Parameter::flag("negate"),
            ],
        )
    }

    #[test]
    fn binds_positionals_and_flags() {
        let input = bind(&arithmatic(), tokens("2 3 --negate")).unwrap();
        assert_eq!(input.argument("one"), Some(&json!(2)));
        assert_eq!(input.argument("two"), Some(&json!(3)));
        assert_eq!(input.option("negate"), Some(&json!(true)));
    }

    #[test]
    fn missing_required_is_not_a_bind_error() {
        let d = arithmatic();
        let input = bind(&d, tokens("2")).unwrap();
        assert_eq!(input.missing_required(&d), vec!["two".to_string()]);
        assert_eq!(input.option("negate"), Some(&json!(false)));
    }

    #[test]
    fn short_and_valued_options() {
        let d = descriptor(
            "myRepeat",
            &[("option", "repeat Times")],
            vec![
                Parameter::required("one"),
                Parameter::optional("two", ""),
                Parameter::optional("repeat", 1).typed("integer"),
                Parameter::flag("silent|s"),
            ],
        );
        let input = bind(&d, tokens("bet --repeat=2 -s")).unwrap();
        assert_eq!(input.option("repeat"), Some(&json!(2)));
        assert_eq!(input.option("silent"), Some(&json!(true)));
        assert_eq!(input.argument("two"), Some(&json!("")));

        let defaulted = bind(&d, tokens("bet")).unwrap();
        assert_eq!(defaulted.option("repeat"), Some(&json!(1)));
    }

    #[test]
    fn unknown_option_is_a_parse_error() {
        let err = bind(&arithmatic(), tokens("1 2 --bogus")).unwrap_err();
        assert!(matches!(err, InputError::Parse(_)));
    }

    #[test]
    fn passthrough_goes_to_last_argument() {
        let cat = descriptor(
            "myCat",
            &[],
            vec![Parameter::required("one"), Parameter::optional("two", "")],
        );
        let input = bind(&cat, tokens("bet -- x y z")).unwrap();
        assert_eq!(input.passthrough(), ["x", "y", "z"]);
        let resolved = input.resolved_arguments(&cat);
        assert_eq!(resolved.get("two"), Some(&json!("x y z")));
        // The bound input itself is untouched.
        assert_eq!(input.argument("two"), Some(&json!("")));

        let rest = descriptor("testPassthrough", &[], vec![Parameter::variadic("params")]);
        let input = bind(&rest, tokens("a b c -- x y z")).unwrap();
        assert_eq!(
            input.resolved_arguments(&rest).get("params"),
            Some(&json!(["a", "b", "c", "x", "y", "z"]))
        );
    }

    #[test]
    fn bind_line_resolves_aliases() {
        let d = arithmatic();
        let (found, input) = bind_line([&d], "arithmatic 2 3 --negate").unwrap();
        assert_eq!(found.name(), "test:arithmatic");
        assert_eq!(input.argument("one"), Some(&json!(2)));

        assert!(matches!(bind_line([&d], "   "), Err(InputError::Empty)));
        assert!(matches!(
            bind_line([&d], "nope 1"),
            Err(InputError::UnknownCommand(name)) if name == "nope"
        ));
        assert!(matches!(bind_line([&d], "x \"unclosed"), Err(InputError::Split(_))));
    }

    #[test]
    fn split_passthrough_only_at_first_marker() {
        let (head, tail) = split_passthrough(tokens("a -- b -- c"));
        assert_eq!(head, vec!["a"]);
        assert_eq!(tail, vec!["b", "--", "c"]);
    }

    #[test]
    fn coercion() {
        assert_eq!(coerce_value("42", "integer"), json!(42));
        assert_eq!(coerce_value("x42", "integer"), json!("x42"));
        assert_eq!(coerce_value("No", "boolean"), json!(false));
        assert_eq!(coerce_value("a,b, c", "array"), json!(["a", "b", "c"]));
        assert_eq!(coerce_value("2", "auto"), json!(2));
        assert_eq!(coerce_value("two", "auto"), json!("two"));
    }
}
