//! `@TypeGraphQL.*` directives embedded in schema documentation
//!
//! ```text
//! /// @TypeGraphQL.type(name: "Client", plural: "Clients")
//! /// @TypeGraphQL.field(name: "emailAddress")
//! /// @TypeGraphQL.omit(output: true, input: ["create", "update"])
//! ```

use once_cell::sync::Lazy;
use regex::Regex;

static DIRECTIVE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*@TypeGraphQL\.(type|field|omit)\((.*)\)\s*$").expect("valid directive regex")
});

static ARG_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(\w+)\s*:\s*("[^"]*"|true|false|\[[^\]]*\])"#).expect("valid argument regex")
});

/// Sub-contexts an input field may be hidden from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputOmitContext {
    Create,
    Update,
    Where,
    OrderBy,
}

impl InputOmitContext {
    fn parse(value: &str) -> Option<Self> {
        match value {
            "create" => Some(InputOmitContext::Create),
            "update" => Some(InputOmitContext::Update),
            "where" => Some(InputOmitContext::Where),
            "orderBy" => Some(InputOmitContext::OrderBy),
            _ => None,
        }
    }

    /// Marker that identifies an input type of this context by name
    pub fn type_name_marker(&self) -> &'static str {
        match self {
            InputOmitContext::Create => "Create",
            InputOmitContext::Update => "Update",
            InputOmitContext::Where => "Where",
            InputOmitContext::OrderBy => "OrderBy",
        }
    }
}

/// Input omission of a field
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum InputOmit {
    #[default]
    Never,
    Always,
    In(Vec<InputOmitContext>),
}

impl InputOmit {
    /// Whether the field is hidden from the input type with this name
    pub fn hides_in(&self, input_type_name: &str) -> bool {
        match self {
            InputOmit::Never => false,
            InputOmit::Always => true,
            InputOmit::In(contexts) => contexts
                .iter()
                .any(|ctx| input_type_name.contains(ctx.type_name_marker())),
        }
    }
}

/// Directives found in one documentation block
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Annotations {
    /// `type(name:)` or `field(name:)`
    pub name: Option<String>,
    /// `type(plural:)`
    pub plural: Option<String>,
    /// `omit(output:)`
    pub omit_output: Option<bool>,
    /// `omit(input:)`
    pub omit_input: Option<InputOmit>,
    /// Documentation with directive lines removed
    pub docs: Option<String>,
}

/// Split documentation into directives and the remaining text
pub fn parse(documentation: Option<&str>) -> Annotations {
    let mut result = Annotations::default();
    let Some(doc) = documentation else {
        return result;
    };

    let mut doc_lines = Vec::new();
    for line in doc.lines() {
        let Some(caps) = DIRECTIVE_RE.captures(line) else {
            doc_lines.push(line.trim_end());
            continue;
        };
        let directive = &caps[1];
        for arg in ARG_RE.captures_iter(&caps[2]) {
            let value = &arg[2];
            match (directive, &arg[1]) {
                ("type" | "field", "name") => result.name = Some(unquote(value)),
                ("type", "plural") => result.plural = Some(unquote(value)),
                ("omit", "output") => result.omit_output = Some(value == "true"),
                ("omit", "input") => result.omit_input = Some(parse_input_omit(value)),
                (directive, key) => {
                    tracing::debug!(directive, key, "ignoring unknown directive argument")
                }
            }
        }
    }

    let text = doc_lines.join("\n");
    let text = text.trim();
    if !text.is_empty() {
        result.docs = Some(text.to_string());
    }
    result
}

fn unquote(value: &str) -> String {
    value.trim_matches('"').to_string()
}

fn parse_input_omit(value: &str) -> InputOmit {
    match value {
        "true" => InputOmit::Always,
        "false" => InputOmit::Never,
        list => {
            let contexts: Vec<_> = list
                .trim_matches(|c| c == '[' || c == ']')
                .split(',')
                .filter_map(|item| InputOmitContext::parse(item.trim().trim_matches('"')))
                .collect();
            if contexts.is_empty() {
                InputOmit::Never
            } else {
                InputOmit::In(contexts)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_alias_and_docs() {
        let ann = parse(Some(
            "A registered customer\n@TypeGraphQL.type(name: \"Client\", plural: \"Clientele\")",
        ));
        assert_eq!(ann.name.as_deref(), Some("Client"));
        assert_eq!(ann.plural.as_deref(), Some("Clientele"));
        assert_eq!(ann.docs.as_deref(), Some("A registered customer"));
    }

    #[test]
    fn test_omit_contexts() {
        let ann = parse(Some(
            "@TypeGraphQL.omit(output: true, input: [\"create\", \"orderBy\"])",
        ));
        assert_eq!(ann.omit_output, Some(true));
        let input = ann.omit_input.unwrap();
        assert!(input.hides_in("UserCreateInput"));
        assert!(input.hides_in("UserOrderByWithRelationInput"));
        assert!(!input.hides_in("UserUpdateInput"));
        assert!(ann.docs.is_none());
    }

    #[test]
    fn test_no_documentation() {
        assert_eq!(parse(None), Annotations::default());
        let ann = parse(Some("@TypeGraphQL.field(name: \"emailAddress\")"));
        assert_eq!(ann.name.as_deref(), Some("emailAddress"));
        assert_eq!(ann.omit_input, None);
    }
}
