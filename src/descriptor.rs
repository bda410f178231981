/*!
Command descriptors.

`build(raw)` turns extracted metadata into an immutable `CommandDescriptor`:

  1. name      explicit `@command`, else derived from the identifier (`myCat` -> `my:cat`)
  2. partition parameters into positional arguments and `--options`
  3. required arguments must precede optional ones (checked here, not at run time)
  4. synopsis  `<name> [options] [--] <required> [<optional>]`
  5. usages    `@usage` values in declaration order
  6. hook      `@hook <type> [<target>]` marks the operation as a hook, not a command

Option detection: a parameter is an option when its default is a boolean or
null, or when an `@option` tag names it. Everything else is positional.
*/

use std::collections::HashMap;

use serde::Serialize;
use serde_json::Value;

use crate::error::ConstructionError;
use crate::hooks::HookType;
use crate::parser::{RawMetadata, TagMap};

/// Tags with structural meaning. They never act as symbolic `@tag` hook targets.
pub const STRUCTURAL_TAGS: &[&str] = &["command", "aliases", "usage", "option", "default", "hook"];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArgumentSpec {
    pub name: String,
    pub required: bool,
    pub default: Option<Value>,
    pub is_array: bool,
    pub description: String,
    pub type_hint: Option<String>,
}

/// How an option takes its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueMode {
    /// `--name`, boolean.
    Flag,
    /// `--name[=VALUE]`.
    Optional,
    /// `--name=VALUE`.
    Required,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptionSpec {
    pub name: String,
    pub shortcut: Option<char>,
    pub default: Value,
    pub description: String,
    pub mode: ValueMode,
    pub type_hint: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UsageExample {
    pub example: String,
    pub description: Option<String>,
}

/// Hook metadata of an operation declared with `@hook`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HookSpec {
    pub hook_type: HookType,
    /// `None` means every command of the declaring group.
    pub target: Option<String>,
}

/// Immutable CLI-facing shape of one operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommandDescriptor {
    operation: String,
    group: String,
    name: String,
    aliases: Vec<String>,
    description: String,
    help: String,
    arguments: Vec<ArgumentSpec>,
    options: Vec<OptionSpec>,
    usages: Vec<UsageExample>,
    annotations: TagMap,
    hook: Option<HookSpec>,
}

impl CommandDescriptor {
    /// Declared identifier of the operation this was built from.
    pub fn operation(&self) -> &str {
        &self.operation
    }

    pub fn group(&self) -> &str {
        &self.group
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn help(&self) -> &str {
        &self.help
    }

    pub fn arguments(&self) -> &[ArgumentSpec] {
        &self.arguments
    }

    pub fn options(&self) -> &[OptionSpec] {
        &self.options
    }

    pub fn usages(&self) -> &[UsageExample] {
        &self.usages
    }

    pub fn hook(&self) -> Option<&HookSpec> {
        self.hook.as_ref()
    }

    pub fn is_hook(&self) -> bool {
        self.hook.is_some()
    }

    pub fn has_annotation(&self, key: &str) -> bool {
        self.annotations.has(key)
    }

    pub fn annotation(&self, key: &str) -> Option<&str> {
        self.annotations.get(key)
    }

    /// Tags exactly as declared (plus inherited file-level defaults).
    pub fn annotations(&self) -> &TagMap {
        &self.annotations
    }

    /// Tags as seen by hooks: a runnable command always carries `command`.
    pub fn annotations_for_command(&self) -> TagMap {
        let mut tags = self.annotations.clone();
        if !self.is_hook() && !tags.has("command") {
            tags.push("command", self.name.clone());
        }
        tags
    }

    /// Hook lookup keys: the name, each non-structural `@tag`, then the group.
    pub fn lookup_names(&self) -> Vec<String> {
        let mut names = vec![self.name.clone()];
        for key in self.annotations.keys() {
            if !STRUCTURAL_TAGS.contains(&key) {
                names.push(format!("@{key}"));
            }
        }
        if !self.group.is_empty() && !names.contains(&self.group) {
            names.push(self.group.clone());
        }
        names
    }

    /// Name or alias match.
    pub fn answers_to(&self, name: &str) -> bool {
        self.name == name || self.aliases.iter().any(|a| a == name)
    }

    pub fn option(&self, name: &str) -> Option<&OptionSpec> {
        self.options.iter().find(|o| o.name == name)
    }

    pub fn argument(&self, name: &str) -> Option<&ArgumentSpec> {
        self.arguments.iter().find(|a| a.name == name)
    }

    /// Full synopsis, e.g. `my:cat [--flip] [--] <one> [<two>]`.
    pub fn synopsis(&self) -> String {
        self.render_synopsis(false)
    }

    /// Synopsis with the option list collapsed to `[options]`.
    pub fn synopsis_short(&self) -> String {
        self.render_synopsis(true)
    }

    fn render_synopsis(&self, short: bool) -> String {
        let mut elements: Vec<String> = vec![self.name.clone()];

        if short && !self.options.is_empty() {
            elements.push("[options]".to_string());
        } else {
            for option in &self.options {
                let shortcut = option
                    .shortcut
                    .map(|s| format!("-{s}|"))
                    .unwrap_or_default();
                let value = match option.mode {
                    ValueMode::Flag => String::new(),
                    ValueMode::Optional => format!(" [{}]", option.name.to_uppercase()),
                    ValueMode::Required => format!(" {}", option.name.to_uppercase()),
                };
                elements.push(format!("[{shortcut}--{}{value}]", option.name));
            }
        }

        if !self.options.is_empty() && !self.arguments.is_empty() {
            elements.push("[--]".to_string());
        }

        for argument in &self.arguments {
            let mut element = format!("<{}>", argument.name);
            if !argument.required {
                element = format!("[{element}]");
            }
            if argument.is_array {
                element.push_str("...");
            }
            elements.push(element);
        }

        elements.join(" ").trim().to_string()
    }
}

/// Derive a command name from a declared identifier.
///
/// Words split where a lowercase letter is followed by an uppercase one, and
/// at `_` / `-`. The first boundary becomes `:`, later ones `-`:
/// `commandWithNoOptions` -> `command:with-no-options`.
pub fn derive_name(identifier: &str) -> String {
    let mut kebab = String::with_capacity(identifier.len() + 4);
    let mut prev_lower = false;
    for c in identifier.trim().chars() {
        if c == '_' || c == '-' {
            if !kebab.is_empty() && !kebab.ends_with('-') {
                kebab.push('-');
            }
            prev_lower = false;
            continue;
        }
        if c.is_ascii_uppercase() && prev_lower {
            kebab.push('-');
        }
        prev_lower = c.is_ascii_lowercase();
        kebab.push(c.to_ascii_lowercase());
    }
    kebab.trim_end_matches('-').replacen('-', ":", 1)
}

/// Build a descriptor from extracted metadata.
pub fn build(raw: RawMetadata) -> Result<CommandDescriptor, ConstructionError> {
    let hook = match raw.tags.get("hook") {
        Some(value) => Some(parse_hook_tag(&raw.operation, value)?),
        None => None,
    };

    let name = raw
        .tags
        .get("command")
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| derive_name(&raw.operation));
    if name.is_empty() && hook.is_none() {
        return Err(ConstructionError::EmptyName {
            operation: raw.operation.clone(),
        });
    }

    let overrides = default_overrides(&raw.tags);
    let declared_options = option_declarations(&raw.tags);
    let (arguments, options) =
        partition_parameters(&name, &raw, &overrides, &declared_options)?;
    check_arguments(&name, &arguments)?;
    check_options(&name, &arguments, &options)?;

    let descriptor = CommandDescriptor {
        aliases: aliases(&raw.tags, &name),
        usages: usages(&raw.tags),
        operation: raw.operation,
        group: raw.group,
        name,
        description: raw.summary,
        help: raw.description,
        arguments,
        options,
        annotations: raw.tags,
        hook,
    };
    tracing::debug!(
        operation = descriptor.operation(),
        name = descriptor.name(),
        hook = descriptor.is_hook(),
        "built command descriptor"
    );
    Ok(descriptor)
}

/// `@hook <type> [<target>]`
fn parse_hook_tag(operation: &str, value: &str) -> Result<HookSpec, ConstructionError> {
    let mut parts = value.split_whitespace();
    let kind = parts.next().unwrap_or_default();
    let hook_type =
        HookType::from_str_ci(kind).ok_or_else(|| ConstructionError::UnknownHookType {
            operation: operation.to_string(),
            kind: kind.to_string(),
        })?;
    Ok(HookSpec {
        hook_type,
        target: parts.next().map(str::to_string),
    })
}

/// `name|s` -> ("name", Some('s')). Leading `$` / `--` are ignored.
fn split_shortcut(declared: &str) -> (String, Option<char>) {
    let declared = declared.trim().trim_start_matches('$').trim_start_matches("--");
    match declared.split_once('|') {
        Some((name, shortcut)) => (
            name.trim().to_string(),
            shortcut.trim().trim_start_matches('-').chars().next(),
        ),
        None => (declared.to_string(), None),
    }
}

/// `@default <param> <value>`; value parsed as JSON when it is valid JSON.
fn default_overrides(tags: &TagMap) -> HashMap<String, Value> {
    let mut overrides = HashMap::new();
    for value in tags.get_all("default") {
        let value = value.trim();
        let (param, text) = value
            .split_once(char::is_whitespace)
            .unwrap_or((value, ""));
        if param.is_empty() {
            continue;
        }
        let text = text.trim();
        let parsed =
            serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()));
        overrides.insert(split_shortcut(param).0, parsed);
    }
    overrides
}

struct OptionDecl {
    name: String,
    shortcut: Option<char>,
    description: String,
}

/// `@option name[|s] description`
fn option_declarations(tags: &TagMap) -> Vec<OptionDecl> {
    tags.get_all("option")
        .filter_map(|value| {
            let value = value.trim();
            let (head, description) = value
                .split_once(char::is_whitespace)
                .unwrap_or((value, ""));
            let (name, shortcut) = split_shortcut(head);
            if name.is_empty() {
                return None;
            }
            Some(OptionDecl {
                name,
                shortcut,
                description: description.split_whitespace().collect::<Vec<_>>().join(" "),
            })
        })
        .collect()
}

fn partition_parameters(
    command: &str,
    raw: &RawMetadata,
    overrides: &HashMap<String, Value>,
    declared: &[OptionDecl],
) -> Result<(Vec<ArgumentSpec>, Vec<OptionSpec>), ConstructionError> {
    let mut arguments = Vec::new();
    let mut options = Vec::new();

    for param in &raw.parameters {
        let (name, param_shortcut) = split_shortcut(&param.name);
        let default = overrides.get(&name).cloned().or_else(|| param.default.clone());
        let decl = declared.iter().find(|d| d.name == name);
        let doc = raw.param_doc(&name).unwrap_or_default().to_string();

        let is_option =
            decl.is_some() || matches!(default, Some(Value::Bool(_)) | Some(Value::Null));
        if is_option && !param.variadic {
            let mode = match &default {
                Some(Value::Bool(_)) => ValueMode::Flag,
                Some(Value::Null) | None => ValueMode::Optional,
                Some(_) => ValueMode::Required,
            };
            options.push(OptionSpec {
                shortcut: param_shortcut.or_else(|| decl.and_then(|d| d.shortcut)),
                description: decl
                    .map(|d| d.description.clone())
                    .filter(|d| !d.is_empty())
                    .unwrap_or(doc),
                default: default.unwrap_or(Value::Null),
                mode,
                type_hint: param.type_hint.clone(),
                name,
            });
        } else {
            arguments.push(ArgumentSpec {
                required: default.is_none() && !param.variadic,
                default: default.or_else(|| param.variadic.then(|| Value::Array(Vec::new()))),
                is_array: param.variadic,
                description: doc,
                type_hint: param.type_hint.clone(),
                name,
            });
        }
    }

    // `@option` naming no parameter: a plain flag.
    for decl in declared {
        let is_param = raw
            .parameters
            .iter()
            .any(|p| split_shortcut(&p.name).0 == decl.name);
        if !is_param {
            if options.iter().any(|o: &OptionSpec| o.name == decl.name) {
                return Err(ConstructionError::DuplicateOption {
                    command: command.to_string(),
                    option: decl.name.clone(),
                });
            }
            options.push(OptionSpec {
                name: decl.name.clone(),
                shortcut: decl.shortcut,
                default: Value::Bool(false),
                description: decl.description.clone(),
                mode: ValueMode::Flag,
                type_hint: None,
            });
        }
    }

    Ok((arguments, options))
}

fn check_arguments(command: &str, arguments: &[ArgumentSpec]) -> Result<(), ConstructionError> {
    let mut first_optional: Option<&str> = None;
    for (idx, argument) in arguments.iter().enumerate() {
        if arguments[..idx].iter().any(|a| a.name == argument.name) {
            return Err(ConstructionError::DuplicateArgument {
                command: command.to_string(),
                argument: argument.name.clone(),
            });
        }
        if argument.is_array && idx + 1 != arguments.len() {
            return Err(ConstructionError::ArrayNotLast {
                command: command.to_string(),
                argument: argument.name.clone(),
            });
        }
        match (argument.required, first_optional) {
            (true, Some(optional)) => {
                return Err(ConstructionError::RequiredAfterOptional {
                    command: command.to_string(),
                    argument: argument.name.clone(),
                    optional: optional.to_string(),
                });
            }
            (false, None) => first_optional = Some(&argument.name),
            _ => {}
        }
    }
    Ok(())
}

fn check_options(
    command: &str,
    arguments: &[ArgumentSpec],
    options: &[OptionSpec],
) -> Result<(), ConstructionError> {
    for (idx, option) in options.iter().enumerate() {
        if options[..idx].iter().any(|o| o.name == option.name) {
            return Err(ConstructionError::DuplicateOption {
                command: command.to_string(),
                option: option.name.clone(),
            });
        }
        if let Some(shortcut) = option.shortcut
            && let Some(first) = options[..idx].iter().find(|o| o.shortcut == Some(shortcut))
        {
            return Err(ConstructionError::DuplicateShortcut {
                command: command.to_string(),
                shortcut,
                first: first.name.clone(),
                second: option.name.clone(),
            });
        }
        if arguments.iter().any(|a| a.name == option.name) {
            return Err(ConstructionError::OptionShadowsArgument {
                command: command.to_string(),
                name: option.name.clone(),
            });
        }
    }
    Ok(())
}

/// `@aliases a, b c` -> ["a", "b", "c"], deduplicated, the name itself dropped.
fn aliases(tags: &TagMap, name: &str) -> Vec<String> {
    let mut aliases: Vec<String> = Vec::new();
    for value in tags.get_all("aliases") {
        for alias in value.split(|c: char| c == ',' || c.is_whitespace()) {
            if !alias.is_empty() && alias != name && !aliases.iter().any(|a| a == alias) {
                aliases.push(alias.to_string());
            }
        }
    }
    aliases
}

/// First line is the example; continuation lines describe it.
fn usages(tags: &TagMap) -> Vec<UsageExample> {
    tags.get_all("usage")
        .filter_map(|value| {
            let mut lines = value.lines();
            let example = lines.next()?.trim().to_string();
            if example.is_empty() {
                return None;
            }
            let rest = lines.map(str::trim).collect::<Vec<_>>().join(" ");
            Some(UsageExample {
                example,
                description: (!rest.is_empty()).then_some(rest),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operation::Parameter;
    use crate::parser::parse_doc_block;
    use serde_json::json;

    fn raw(operation: &str, doc: &str, parameters: Vec<Parameter>) -> RawMetadata {
        let block = parse_doc_block(doc);
        RawMetadata {
            operation: operation.to_string(),
            group: "tests".to_string(),
            summary: block.summary,
            description: block.description,
            tags: block.tags,
            parameters,
            param_docs: block.param_docs,
        }
    }

    #[test]
    fn derived_names() {
        assert_eq!(derive_name("myCat"), "my:cat");
        assert_eq!(derive_name("commandWithNoOptions"), "command:with-no-options");
        assert_eq!(derive_name("commandWithNoArguments"), "command:with-no-arguments");
        assert_eq!(derive_name("defaults"), "defaults");
        assert_eq!(derive_name("alterMeToo"), "alter:me-too");
        assert_eq!(derive_name("my_cat"), "my:cat");
        assert_eq!(derive_name("getURLInfo"), "get:urlinfo");
        assert_eq!(derive_name("myCat"), derive_name("myCat"));
    }

    #[test]
    fn explicit_command_tag_wins() {
        let d = build(raw("alterMe", "@command alter-me", vec![])).unwrap();
        assert_eq!(d.name(), "alter-me");
    }

    #[test]
    fn arithmatic_synopsis() {
        let d = build(raw(
            "testArithmatic",
            "@command test:arithmatic\n@option negate Whether or not to negate.",
            vec![
                Parameter::required("one").typed("integer"),
                Parameter::required("two").typed("integer"),
                Parameter::flag("negate"),
            ],
        ))
        .unwrap();
        assert_eq!(d.synopsis(), "test:arithmatic [--negate] [--] <one> <two>");
        assert_eq!(d.synopsis_short(), "test:arithmatic [options] [--] <one> <two>");
        assert_eq!(d.options()[0].description, "Whether or not to negate.");
        assert_eq!(d.options()[0].mode, ValueMode::Flag);
    }

    #[test]
    fn synopsis_variants() {
        let no_options = build(raw(
            "commandWithNoOptions",
            "",
            vec![Parameter::required("one"), Parameter::optional("two", "default")],
        ))
        .unwrap();
        assert_eq!(no_options.synopsis(), "command:with-no-options <one> [<two>]");

        let shortcut = build(raw(
            "commandWithNoArguments",
            "",
            vec![Parameter::flag("silent|s")],
        ))
        .unwrap();
        assert_eq!(shortcut.synopsis(), "command:with-no-arguments [-s|--silent]");

        let on_tag = build(raw(
            "shortcutOnAnnotation",
            "@option silent|s Supress output.",
            vec![Parameter::flag("silent")],
        ))
        .unwrap();
        assert_eq!(on_tag.synopsis(), "shortcut:on-annotation [-s|--silent]");

        let valued = build(raw(
            "myRepeat",
            "@option repeat Number of times.",
            vec![
                Parameter::required("one"),
                Parameter::optional("two", ""),
                Parameter::optional("repeat", 1).typed("integer"),
                Parameter::optional("format", Value::Null),
            ],
        ))
        .unwrap();
        assert_eq!(
            valued.synopsis(),
            "my:repeat [--repeat REPEAT] [--format [FORMAT]] [--] <one> [<two>]"
        );

        let rest = build(raw("testPassthrough", "", vec![Parameter::variadic("params")])).unwrap();
        assert_eq!(rest.synopsis(), "test:passthrough [<params>...]");

        let bare = build(raw("defaults", "", vec![])).unwrap();
        assert_eq!(bare.synopsis(), "defaults");
    }

    #[test]
    fn required_after_optional_is_a_construction_error() {
        let err = build(raw(
            "badOrder",
            "",
            vec![Parameter::optional("one", "x"), Parameter::required("two")],
        ))
        .unwrap_err();
        assert_eq!(
            err,
            ConstructionError::RequiredAfterOptional {
                command: "bad:order".into(),
                argument: "two".into(),
                optional: "one".into(),
            }
        );
    }

    #[test]
    fn conflicting_options_are_rejected() {
        let dup_shortcut = build(raw(
            "clash",
            "",
            vec![Parameter::flag("silent|s"), Parameter::flag("strict|s")],
        ))
        .unwrap_err();
        assert!(matches!(dup_shortcut, ConstructionError::DuplicateShortcut { shortcut: 's', .. }));

        let dup_name = build(raw(
            "clash",
            "@option silent\n@option silent",
            vec![],
        ))
        .unwrap_err();
        assert!(matches!(dup_name, ConstructionError::DuplicateOption { .. }));

        let array_first = build(raw(
            "clash",
            "",
            vec![Parameter::variadic("rest"), Parameter::optional("two", "")],
        ))
        .unwrap_err();
        assert!(matches!(array_first, ConstructionError::ArrayNotLast { .. }));

        let shadowed = build(raw(
            "clash",
            "",
            vec![Parameter::required("x"), Parameter::flag("x")],
        ))
        .unwrap_err();
        assert_eq!(
            shadowed,
            ConstructionError::OptionShadowsArgument {
                command: "clash".into(),
                name: "x".into(),
            }
        );
    }

    #[test]
    fn repeated_argument_name_is_a_construction_error() {
        let err = build(raw(
            "dup",
            "",
            vec![Parameter::required("one"), Parameter::required("one")],
        ))
        .unwrap_err();
        assert_eq!(
            err,
            ConstructionError::DuplicateArgument {
                command: "dup".into(),
                argument: "one".into(),
            }
        );

        let dup_rest = build(raw(
            "dup",
            "",
            vec![Parameter::required("words"), Parameter::variadic("words")],
        ))
        .unwrap_err();
        assert!(matches!(dup_rest, ConstructionError::DuplicateArgument { .. }));
    }

    #[test]
    fn identifier_without_words_has_no_name() {
        assert_eq!(derive_name("_"), "");
        let err = build(raw("_", "", vec![])).unwrap_err();
        assert_eq!(err, ConstructionError::EmptyName { operation: "_".into() });

        // hooks need no name of their own
        let hook = build(raw("_", "@hook alter", vec![])).unwrap();
        assert!(hook.is_hook());
    }

    #[test]
    fn default_tag_overrides_parameter_default() {
        let d = build(raw(
            "defaults",
            "@default one \"ichi\"\n@default two 2",
            vec![Parameter::optional("one", ""), Parameter::optional("two", "")],
        ))
        .unwrap();
        assert_eq!(d.argument("one").unwrap().default, Some(json!("ichi")));
        assert_eq!(d.argument("two").unwrap().default, Some(json!(2)));
    }

    #[test]
    fn default_tag_can_make_a_parameter_an_option() {
        let d = build(raw("quiet", "@default loud false", vec![Parameter::required("loud")]))
            .unwrap();
        assert!(d.arguments().is_empty());
        assert_eq!(d.option("loud").unwrap().mode, ValueMode::Flag);
    }

    #[test]
    fn aliases_and_usages() {
        let d = build(raw(
            "myCat",
            "@aliases c, kitty c\n@usage my:cat bet alpha --flip\n  Concatenate reversed.\n@usage my:cat a b",
            vec![Parameter::required("one")],
        ))
        .unwrap();
        assert_eq!(d.aliases(), ["c".to_string(), "kitty".to_string()]);
        assert_eq!(d.usages().len(), 2);
        assert_eq!(d.usages()[0].example, "my:cat bet alpha --flip");
        assert_eq!(d.usages()[0].description.as_deref(), Some("Concatenate reversed."));
        assert_eq!(d.usages()[1].description, None);
        assert!(d.answers_to("kitty"));
        assert!(d.answers_to("my:cat"));
    }

    #[test]
    fn hook_tags() {
        let targeted = build(raw("hookTestHook", "@hook alter test:hook", vec![])).unwrap();
        assert_eq!(
            targeted.hook(),
            Some(&HookSpec {
                hook_type: HookType::Alter,
                target: Some("test:hook".into())
            })
        );
        assert_eq!(targeted.annotation("hook"), Some("alter test:hook"));
        // Hooks do not gain a synthetic `command` tag.
        assert!(!targeted.annotations_for_command().has("command"));

        let untargeted = build(raw("alterAllCommands", "@hook alter", vec![])).unwrap();
        assert_eq!(untargeted.hook().unwrap().target, None);

        let bad = build(raw("hookBad", "@hook before", vec![])).unwrap_err();
        assert!(matches!(bad, ConstructionError::UnknownHookType { .. }));
    }

    #[test]
    fn command_facing_annotations_always_carry_command() {
        let declared =
            build(raw("alterMe", "@command alter-me\n@addmycommandname", vec![])).unwrap();
        assert_eq!(declared.annotations().keys(), vec!["command", "addmycommandname"]);
        assert_eq!(
            declared.annotations_for_command().keys(),
            vec!["command", "addmycommandname"]
        );

        let implicit = build(raw("alterMeToo", "@addmycommandname", vec![])).unwrap();
        assert_eq!(implicit.annotations().keys(), vec!["addmycommandname"]);
        let for_command = implicit.annotations_for_command();
        assert_eq!(for_command.keys(), vec!["addmycommandname", "command"]);
        assert_eq!(for_command.get("command"), Some("alter:me-too"));
    }

    #[test]
    fn lookup_names_skip_structural_tags() {
        let d = build(raw(
            "testAnnotationHook",
            "@hookme\n@before\n@after\n@usage x",
            vec![Parameter::required("parameter")],
        ))
        .unwrap();
        assert_eq!(
            d.lookup_names(),
            vec!["test:annotation-hook", "@hookme", "@before", "@after", "tests"]
        );
    }
}
