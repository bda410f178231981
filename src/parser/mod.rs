//! Doc-block parsing and metadata extraction.
//!
//! parse_doc_block(text) -> DocBlock { summary, description, tags, param_docs }
//! extract(file, operation) -> RawMetadata (method tags merged over file-level defaults)
//!
//! Parsing is total: any text (including none at all) yields a DocBlock.
//! Command files are user-authored, so malformed metadata degrades to empty
//! values instead of failing.

mod tags;

pub use tags::TagMap;

use crate::operation::{CommandFile, Operation, Parameter};

/// Tags that describe a single operation's identity and are never inherited
/// from the command file's own doc block.
const NON_INHERITED: &[&str] = &["command", "hook"];

/// Tags consumed by the parser itself instead of landing in the multimap.
const PARAM_TAG: &str = "param";
const DROPPED_TAGS: &[&str] = &["return", "var"];

/// Parsed structured comment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocBlock {
    /// First paragraph, lines joined with a space.
    pub summary: String,
    /// Remaining untagged paragraphs, lines joined with `\n`.
    pub description: String,
    pub tags: TagMap,
    /// `@param` entries as (name, description), `$` stripped.
    pub param_docs: Vec<(String, String)>,
}

/// Everything the descriptor builder needs, gathered from one operation.
#[derive(Debug, Clone, PartialEq)]
pub struct RawMetadata {
    /// Declared identifier of the operation (e.g. `myCat`).
    pub operation: String,
    /// Group key of the command file the operation was declared in.
    pub group: String,
    pub summary: String,
    pub description: String,
    pub tags: TagMap,
    pub parameters: Vec<Parameter>,
    pub param_docs: Vec<(String, String)>,
}

impl RawMetadata {
    pub fn param_doc(&self, name: &str) -> Option<&str> {
        self.param_docs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, d)| d.as_str())
    }
}

/// Read an operation's doc block and parameter list.
///
/// Tags declared on the operation win; keys it leaves out fall back to the
/// command file's doc block (except `command` and `hook`).
pub fn extract(file: &CommandFile, operation: &Operation) -> RawMetadata {
    let doc = parse_doc_block(operation.doc());
    let file_doc = parse_doc_block(file.doc());

    let mut inherited = TagMap::new();
    for (k, v) in file_doc.tags.iter() {
        if !NON_INHERITED.contains(&k) {
            inherited.push(k, v);
        }
    }
    let mut tags = doc.tags;
    tags.merge_defaults(&inherited);

    tracing::trace!(
        operation = operation.name(),
        tags = tags.len(),
        params = operation.parameters().len(),
        "extracted metadata"
    );

    RawMetadata {
        operation: operation.name().to_string(),
        group: file.group().to_string(),
        summary: doc.summary,
        description: doc.description,
        tags,
        parameters: operation.parameters().to_vec(),
        param_docs: doc.param_docs,
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Section {
    Summary,
    Description,
    Tags,
}

#[derive(Clone, Copy)]
enum LastTag {
    None,
    Kept,
    Param(usize),
    Dropped,
}

/// Parse a structured comment.
///
/// Accepts `/** ... */` blocks (with or without ` * ` gutters), `///` or
/// `//!` line comments, or bare text.
pub fn parse_doc_block(text: &str) -> DocBlock {
    let mut block = DocBlock::default();
    let mut summary: Vec<&str> = Vec::new();
    let mut description: Vec<&str> = Vec::new();
    let mut section = Section::Summary;
    let mut last = LastTag::None;

    for raw in text.lines() {
        let line = strip_framing(raw);

        if let Some((key, value)) = split_tag(line) {
            section = Section::Tags;
            last = if key == PARAM_TAG {
                block.param_docs.push(parse_param_doc(value));
                LastTag::Param(block.param_docs.len() - 1)
            } else if DROPPED_TAGS.contains(&key) {
                LastTag::Dropped
            } else {
                block.tags.push(key, value);
                LastTag::Kept
            };
            continue;
        }

        match section {
            Section::Summary => {
                if line.is_empty() {
                    if !summary.is_empty() {
                        section = Section::Description;
                    }
                } else {
                    summary.push(line);
                }
            }
            Section::Description => description.push(line),
            Section::Tags => {
                if line.is_empty() {
                    continue;
                }
                match last {
                    LastTag::Kept => block.tags.append_to_last(line),
                    LastTag::Param(idx) => {
                        let doc = &mut block.param_docs[idx].1;
                        if !doc.is_empty() {
                            doc.push(' ');
                        }
                        doc.push_str(line);
                    }
                    LastTag::None | LastTag::Dropped => {}
                }
            }
        }
    }

    block.summary = summary.join(" ");
    block.description = description.join("\n").trim().to_string();
    block
}

fn strip_framing(raw: &str) -> &str {
    let mut line = raw.trim();
    for open in ["/**", "/*!", "/*"] {
        if let Some(rest) = line.strip_prefix(open) {
            line = rest;
            break;
        }
    }
    if let Some(rest) = line.strip_suffix("*/") {
        line = rest;
    }
    let line = line.trim_start();
    if let Some(rest) = line
        .strip_prefix("///")
        .or_else(|| line.strip_prefix("//!"))
        .or_else(|| line.strip_prefix("//"))
    {
        return rest.trim();
    }
    line.strip_prefix('*').unwrap_or(line).trim()
}

/// `@key rest of line` -> (key, rest). The key must start with a letter.
fn split_tag(line: &str) -> Option<(&str, &str)> {
    let body = line.strip_prefix('@')?;
    if !body.starts_with(|c: char| c.is_ascii_alphabetic()) {
        return None;
    }
    let end = body
        .find(|c: char| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ':' | '.')))
        .unwrap_or(body.len());
    let (key, rest) = body.split_at(end);
    if !rest.is_empty() && !rest.starts_with(char::is_whitespace) {
        return None;
    }
    Some((key, rest.trim()))
}

/// `@param [type] $name description` or `@param name description`.
fn parse_param_doc(value: &str) -> (String, String) {
    let tokens: Vec<&str> = value.split_whitespace().collect();
    let name_at = tokens
        .iter()
        .take(2)
        .position(|t| t.starts_with('$'))
        .unwrap_or(0);
    let Some(name) = tokens.get(name_at) else {
        return (String::new(), String::new());
    };
    let name = name.trim_start_matches('$').to_string();
    let description = tokens.get(name_at + 1..).unwrap_or_default().join(" ");
    (name, description)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ARITHMATIC: &str = r#"
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
         * @usage 2 2 --negate
         *   Add two plus two and then negate.
         * @return integer
         */
    "#;

    #[test]
    fn splits_summary_help_and_tags() {
        let block = parse_doc_block(ARITHMATIC);
        assert_eq!(block.summary, "This is the test:arithmatic command");
        assert_eq!(
            block.description,
            "This command will add one and two. If the --negate flag\nis provided, then the result is negated."
        );
        assert_eq!(block.tags.keys(), vec!["command", "option", "aliases", "usage"]);
        assert_eq!(
            block.tags.get("usage"),
            Some("2 2 --negate\nAdd two plus two and then negate.")
        );
    }

    #[test]
    fn param_tags_feed_param_docs_not_tags() {
        let block = parse_doc_block(ARITHMATIC);
        assert!(!block.tags.has("param"));
        assert!(!block.tags.has("return"));
        assert_eq!(
            block.param_docs,
            vec![
                ("one".to_string(), "The first number to add.".to_string()),
                ("two".to_string(), "The other number to add.".to_string()),
            ]
        );
    }

    #[test]
    fn line_comments_and_bare_text_are_accepted() {
        let block = parse_doc_block("/// Say hello\n///\n/// @command hi\n/// @aliases h");
        assert_eq!(block.summary, "Say hello");
        assert_eq!(block.tags.get("command"), Some("hi"));

        let bare = parse_doc_block("Say hello\n@hookme\n@before");
        assert_eq!(bare.tags.keys(), vec!["hookme", "before"]);
        assert_eq!(bare.tags.get("hookme"), Some(""));
    }

    #[test]
    fn malformed_or_empty_input_degrades_to_defaults() {
        assert_eq!(parse_doc_block(""), DocBlock::default());

        // Not tags: kept as plain summary text.
        let block = parse_doc_block("/**\n * @\n * @1abc\n */");
        assert!(block.tags.is_empty());
        assert_eq!(block.summary, "@ @1abc");

        let block = parse_doc_block("@param");
        assert_eq!(block.param_docs, vec![(String::new(), String::new())]);
        assert!(block.tags.is_empty());
    }

    #[test]
    fn tag_detection_requires_a_word_boundary() {
        assert_eq!(split_tag("@hook alter test:hook"), Some(("hook", "alter test:hook")));
        assert_eq!(split_tag("@hook"), Some(("hook", "")));
        assert_eq!(split_tag("@hook!x"), None);
        assert_eq!(split_tag("no tag"), None);
    }

    #[test]
    fn param_doc_without_type_or_sigil() {
        assert_eq!(
            parse_param_doc("who The person to greet"),
            ("who".to_string(), "The person to greet".to_string())
        );
        assert_eq!(
            parse_param_doc("$who The person"),
            ("who".to_string(), "The person".to_string())
        );
    }

    #[test]
    fn extract_inherits_file_tags_except_identity() {
        use crate::hooks::Hook;

        let file = CommandFile::new("tests::inherit")
            .with_doc(
                "/**\n * File doc.\n *\n * @topic cats\n * @command nope\n * @hook alter\n \
                 * @usage file-level\n */",
            )
            .with_operation(Operation::command(
                "doCat",
                "/**\n * Concatenate.\n *\n * @usage do:cat a b\n */",
                vec![Parameter::required("one")],
                |_| Ok(serde_json::Value::Null),
            ))
            .with_operation(Operation::hook(
                "decorate",
                "/** @hook alter do:cat */",
                Hook::alter(|v, _| v),
            ));

        let raw = extract(&file, &file.operations()[0]);
        assert_eq!(raw.operation, "doCat");
        assert_eq!(raw.group, "tests::inherit");
        assert_eq!(raw.summary, "Concatenate.");
        assert_eq!(raw.tags.get("topic"), Some("cats"));
        // Declared on the operation: the file value is not added.
        assert_eq!(raw.tags.get_all("usage").collect::<Vec<_>>(), vec!["do:cat a b"]);
        assert!(!raw.tags.has("command"));
        assert!(!raw.tags.has("hook"));
        assert_eq!(raw.parameters.len(), 1);

        let hook = extract(&file, &file.operations()[1]);
        assert_eq!(hook.tags.get("hook"), Some("alter do:cat"));
    }
}
