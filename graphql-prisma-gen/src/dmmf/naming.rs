//! Identifier helpers shared by the transform and the generators
//!
//! Casing goes through heck. Pluralization only needs to cover English model
//! names, so it is a small rule table.

use heck::{ToLowerCamelCase, ToSnakeCase, ToUpperCamelCase};
use proc_macro2::Ident;
use quote::format_ident;

/// `PascalCase` a model or type name
///
/// Names without separators keep their inner casing (`HTTPLog` stays as is).
pub fn pascal_case(name: &str) -> String {
    if name.contains(['_', '-', ' ']) {
        return name.to_upper_camel_case();
    }
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `camelCase` a model or type name, keeping inner casing
pub fn camel_case(name: &str) -> String {
    if name.contains(['_', '-', ' ']) {
        return name.to_lower_camel_case();
    }
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Rust module name for a generated type
pub fn module_name(type_name: &str) -> String {
    type_name.to_snake_case()
}

const UNCOUNTABLE: &[&str] = &[
    "data",
    "equipment",
    "feedback",
    "fish",
    "information",
    "media",
    "metadata",
    "money",
    "news",
    "rice",
    "series",
    "sheep",
    "species",
    "deer",
];

const IRREGULAR: &[(&str, &str)] = &[
    ("person", "people"),
    ("child", "children"),
    ("man", "men"),
    ("woman", "women"),
    ("mouse", "mice"),
    ("goose", "geese"),
    ("tooth", "teeth"),
    ("foot", "feet"),
    ("ox", "oxen"),
];

const F_TO_VES: &[&str] = &["leaf", "life", "knife", "wife", "half", "wolf", "shelf", "calf"];

/// English plural of an identifier, applied to its last word
pub fn pluralize(name: &str) -> String {
    let split = last_word_start(name);
    let (head, word) = name.split_at(split);
    let lower = word.to_lowercase();

    if UNCOUNTABLE.contains(&lower.as_str()) || lower.is_empty() {
        return name.to_string();
    }
    if let Some((_, plural)) = IRREGULAR.iter().find(|(single, _)| *single == lower) {
        return format!("{}{}", head, match_case(word, plural));
    }
    if IRREGULAR.iter().any(|(_, plural)| *plural == lower) {
        return name.to_string();
    }
    if F_TO_VES.contains(&lower.as_str()) {
        let stem = word.trim_end_matches('e').trim_end_matches('f');
        return format!("{}{}ves", head, stem);
    }

    let ends_with = |suffix: &str| lower.ends_with(suffix);
    if ends_with("ss") || ends_with("sh") || ends_with("ch") || ends_with("x") || ends_with("z") {
        return format!("{}es", name);
    }
    if ends_with("s") {
        // already plural ("posts", "news")
        return name.to_string();
    }
    if ends_with("y") {
        let before = lower.chars().rev().nth(1);
        if before.is_some_and(|c| !"aeiou".contains(c)) {
            return format!("{}ies", &name[..name.len() - 1]);
        }
    }
    format!("{}s", name)
}

/// Start byte of the last word in a camel/pascal/snake identifier
fn last_word_start(name: &str) -> usize {
    let bytes: Vec<(usize, char)> = name.char_indices().collect();
    for idx in (1..bytes.len()).rev() {
        let (pos, c) = bytes[idx];
        let prev = bytes[idx - 1].1;
        if prev == '_' {
            return pos;
        }
        if c.is_uppercase() && prev.is_lowercase() {
            return pos;
        }
    }
    0
}

fn match_case(original: &str, plural: &str) -> String {
    if original.chars().next().is_some_and(|c| c.is_uppercase()) {
        pascal_case(plural)
    } else {
        plural.to_string()
    }
}

/// Escape Rust keywords by prefixing with r#
pub fn escape_rust_keyword(name: &str) -> Ident {
    const RUST_KEYWORDS: &[&str] = &[
        "as", "break", "const", "continue", "crate", "else", "enum", "extern", "false", "fn",
        "for", "if", "impl", "in", "let", "loop", "match", "mod", "move", "mut", "pub", "ref",
        "return", "static", "struct", "trait", "true", "type", "unsafe", "use", "where",
        "while", "async", "await", "dyn", "abstract", "become", "box", "do", "final", "macro",
        "override", "priv", "typeof", "unsized", "virtual", "yield", "try",
    ];

    if RUST_KEYWORDS.contains(&name) {
        format_ident!("r#{}", name)
    } else if matches!(name, "self" | "Self" | "super") {
        format_ident!("{}_", name)
    } else {
        format_ident!("{}", name)
    }
}

/// Rust field identifier for a GraphQL field name
pub fn field_ident(name: &str) -> Ident {
    let snake = name.to_snake_case();
    if name.starts_with('_') && !snake.starts_with('_') {
        return format_ident!("_{}", snake);
    }
    escape_rust_keyword(&snake)
}

/// Whether async-graphql's default camelCase renaming reproduces `name`
pub fn needs_explicit_name(name: &str) -> bool {
    let snake = field_ident(name).to_string();
    let snake = snake.trim_start_matches("r#");
    snake.to_lower_camel_case() != name
}
