//! Example command files.
//!
//! `example_command_file()` covers arguments, options, defaults, state,
//! pass-through values and targeted / `@tag` hooks. `hook_all_command_file()`
//! carries a hook without a target, which applies to every command of its
//! group. Both back the `acmd` binary and the end-to-end tests.

use serde_json::{Value, json};

use crate::error::CommandError;
use crate::hooks::Hook;
use crate::operation::{CommandFile, Operation, Parameter, value_to_string};

pub const EXAMPLE_GROUP: &str = "demo::example-command-file";
pub const HOOK_ALL_GROUP: &str = "demo::hook-all-command-file";

pub fn example_command_file() -> CommandFile {
    example_command_file_with_state(Value::Null)
}

/// Same operations, bound to a fresh state value.
pub fn example_command_file_with_state(state: impl Into<Value>) -> CommandFile {
    CommandFile::new(EXAMPLE_GROUP)
        .with_doc("/** Example commands for the annotated command pipeline. */")
        .with_state(state)
        .with_operation(Operation::command(
            "testArithmatic",
            r#"
            /**
             * This is the test:arithmatic command
             *
             * This command will add one and two. If the --negate flag
             * is provided, then the result is negated.
             *
             * @command test:arithmatic
             * @param integer $one The first number to add.
             * @param integer $two The other number to add.
             * @option negate Whether or not the result should be negated.
             * @aliases arithmatic
             * @usage test:arithmatic 2 2 --negate
             *   Add two plus two and then negate.
             */
            "#,
            vec![
                Parameter::required("one").typed("integer"),
                Parameter::required("two").typed("integer"),
                Parameter::flag("negate"),
            ],
            |call| {
                let sum = call.arg_i64("one").unwrap_or(0) + call.arg_i64("two").unwrap_or(0);
                Ok(json!(if call.option_flag("negate") { -sum } else { sum }))
            },
        ))
        .with_operation(Operation::command(
            "myCat",
            r#"
            /**
             * This is the my:cat command
             *
             * This command will concatenate two parameters. If the --flip flag
             * is provided, then the result is the concatenation of two and one.
             *
             * @param string $one The first parameter.
             * @param string $two The other parameter.
             * @option flip Whether or not the second parameter should come first in the result.
             * @aliases c
             * @usage my:cat bet alpha --flip
             *   Concatenate "alpha" and "bet".
             */
            "#,
            vec![
                Parameter::required("one"),
                Parameter::optional("two", ""),
                Parameter::flag("flip"),
            ],
            |call| {
                let (one, two) = (call.arg_str("one"), call.arg_str("two"));
                Ok(json!(if call.option_flag("flip") {
                    format!("{two}{one}")
                } else {
                    format!("{one}{two}")
                }))
            },
        ))
        .with_operation(Operation::command(
            "myRepeat",
            r#"
            /**
             * This is the my:repeat command
             *
             * This command will concatenate two parameters and repeat the result.
             *
             * @option repeat The number of times to repeat the result.
             */
            "#,
            vec![
                Parameter::required("one"),
                Parameter::optional("two", ""),
                Parameter::optional("repeat", 1).typed("integer"),
            ],
            |call| {
                let times = call.option_i64("repeat").unwrap_or(1).max(0);
                let text = format!("{}{}", call.arg_str("one"), call.arg_str("two"));
                Ok(json!(text.repeat(usize::try_from(times).unwrap_or_default())))
            },
        ))
        .with_operation(Operation::command(
            "defaults",
            "/// Test default values in arguments",
            vec![Parameter::optional("one", ""), Parameter::optional("two", "")],
            |call| {
                let (one, two) = (call.arg_str("one"), call.arg_str("two"));
                Ok(json!(match (one.is_empty(), two.is_empty()) {
                    (false, false) => format!("{one} and {two}"),
                    (false, true) => format!("only {one}"),
                    _ => "nothing provided".to_string(),
                }))
            },
        ))
        .with_operation(Operation::command(
            "commandWithNoOptions",
            r#"
            /**
             * This is a command with no options
             *
             * This command will concatenate two parameters.
             *
             * @param $one The first parameter.
             * @param $two The other parameter.
             * @aliases nope
             * @usage command:with-no-options alpha bet
             *   Concatenate "alpha" and "bet".
             */
            "#,
            vec![Parameter::required("one"), Parameter::optional("two", "default")],
            |call| Ok(json!(format!("{}{}", call.arg_str("one"), call.arg_str("two")))),
        ))
        .with_operation(Operation::command(
            "commandWithNoArguments",
            r#"
            /**
             * This command has no arguments--only options
             *
             * Return a result only if not silent.
             *
             * @param $silent Supress output.
             */
            "#,
            vec![Parameter::flag("silent|s")],
            hello_unless_silent,
        ))
        .with_operation(Operation::command(
            "shortcutOnAnnotation",
            r#"
            /**
             * Shortcut on annotation
             *
             * This command defines the option shortcut on the annotation instead of in the options array.
             *
             * @option silent|s Supress output.
             */
            "#,
            vec![Parameter::flag("silent")],
            hello_unless_silent,
        ))
        .with_operation(Operation::command(
            "testState",
            "/**\n * Return the state this command file was created with.\n */",
            vec![],
            |call| Ok(call.state()),
        ))
        .with_operation(Operation::command(
            "testPassthrough",
            "/**\n * Join every argument, including pass-through values, with commas.\n */",
            vec![Parameter::variadic("params")],
            |call| Ok(json!(call.arg_list("params").join(","))),
        ))
        .with_operation(Operation::command(
            "testHook",
            "/**\n * Wrap the parameter in square brackets.\n *\n * @command test:hook\n */",
            vec![Parameter::required("parameter")],
            |call| Ok(json!(format!("[{}]", call.arg_str("parameter")))),
        ))
        .with_operation(Operation::hook(
            "hookTestHook",
            "/**\n * Wrap the test:hook result in angle brackets.\n *\n * @hook alter test:hook\n */",
            Hook::alter(|result, _| json!(format!("<{}>", value_to_string(&result)))),
        ))
        .with_operation(Operation::command(
            "testAnnotationHook",
            r#"
            /**
             * Wrap the parameter in parentheses; altered by every @hookme hook.
             *
             * @hookme
             * @before Functions annotated with @hookme run after this one.
             * @after
             */
            "#,
            vec![Parameter::required("parameter")],
            |call| Ok(json!(format!("({})", call.arg_str("parameter")))),
        ))
        .with_operation(Operation::hook(
            "hookTestAnnotatedHook",
            "/**\n * Alter every command annotated with @hookme.\n *\n * @hook alter @hookme\n */",
            Hook::alter(|result, _| json!(format!(">{}<", value_to_string(&result)))),
        ))
        .with_operation(Operation::command(
            "alterMe",
            "/**\n * @command alter-me\n * @addmycommandname\n */",
            vec![],
            |_| Ok(json!("splendiferous")),
        ))
        .with_operation(Operation::command(
            "alterMeToo",
            "/**\n * @addmycommandname\n */",
            vec![],
            |_| Ok(json!("fantabulous")),
        ))
        .with_operation(Operation::hook(
            "hookAddCommandName",
            "/**\n * Append the name of the command that produced the result.\n *\n * @hook alter @addmycommandname\n */",
            Hook::alter(|result, ctx| {
                let name = ctx.annotations().get("command").unwrap_or(ctx.name());
                json!(format!("{} from {name}", value_to_string(&result)))
            }),
        ))
        .with_operation(Operation::command(
            "testHello",
            "/**\n * Say hello.\n *\n * @command test:hello\n * @param $who Who to greet.\n */",
            vec![Parameter::required("who")],
            |call| Ok(json!(format!("Hello, {}.", call.arg_str("who")))),
        ))
        .with_operation(Operation::hook(
            "interactTestHello",
            "/**\n * Fill in a name when none was given.\n *\n * @hook interact test:hello\n */",
            Hook::interact(|input, _| {
                if !input.has_argument("who") {
                    input.set_argument("who", "Goofey");
                }
                Ok(())
            }),
        ))
        .with_operation(Operation::hook(
            "validateTestHello",
            "/**\n * Refuse to greet some names.\n *\n * @hook validate test:hello\n */",
            Hook::validate(|input, _| {
                match input.argument("who").and_then(Value::as_str) {
                    Some("Donald Duck") => {
                        Err(CommandError::new("I won't say hello to Donald Duck."))
                    }
                    Some("Drumph") => Err(CommandError::new("Irrational value error.")),
                    _ => Ok(()),
                }
            }),
        ))
}

/// Commands plus one `@hook alter` without a target: it wraps the result of
/// every command in this file.
pub fn hook_all_command_file() -> CommandFile {
    CommandFile::new(HOOK_ALL_GROUP)
        .with_doc("/**\n * Commands whose results are all decorated.\n *\n * @topic cats\n */")
        .with_operation(Operation::command(
            "doCat",
            r#"
            /**
             * This is the do:cat command
             *
             * This command will concatenate two parameters. If the --flip flag
             * is provided, then the result is the concatenation of two and one.
             *
             * @option flip Whether or not the second parameter should come first in the result.
             */
            "#,
            vec![
                Parameter::required("one"),
                Parameter::optional("two", ""),
                Parameter::flag("flip"),
            ],
            |call| {
                let (one, two) = (call.arg_str("one"), call.arg_str("two"));
                Ok(json!(if call.option_flag("flip") {
                    format!("{two}{one}")
                } else {
                    format!("{one}{two}")
                }))
            },
        ))
        .with_operation(Operation::command(
            "doEcho",
            "/// Echo every argument back, space separated.",
            vec![Parameter::variadic("words")],
            |call| Ok(json!(call.arg_list("words").join(" "))),
        ))
        .with_operation(Operation::hook(
            "alterAllCommands",
            "/**\n * Decorate the result of every command in this file.\n *\n * @hook alter\n */",
            Hook::alter(|result, _| json!(format!("*** {} ***", value_to_string(&result)))),
        ))
}

fn hello_unless_silent(call: &crate::operation::CommandCall<'_>) -> Result<Value, CommandError> {
    if call.option_flag("silent") {
        return Ok(json!(""));
    }
    Ok(json!("Hello, world"))
}
