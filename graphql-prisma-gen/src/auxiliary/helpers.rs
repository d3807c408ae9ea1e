//! Shared runtime helpers
//!
//! Every generated resolver goes through these functions: they turn the
//! requested selection set into client arguments and run the client call.
//! The client type is imported from the configured path and must provide
//!
//! ```ignore
//! async fn query(&self, model: &str, action: &str, args: serde_json::Value)
//!     -> Result<serde_json::Value, impl std::fmt::Display>;
//! ```

use crate::dmmf::DmmfDocument;
use crate::emit::file_header;
use crate::error::GeneratorError;
use proc_macro2::TokenStream;
use quote::quote;
use std::collections::BTreeMap;

pub const HELPERS_FILE: &str = "helpers.rs";

/// GraphQL alias to client field name, over every emitted model
fn field_aliases(doc: &DmmfDocument) -> BTreeMap<String, String> {
    let mut aliases = BTreeMap::new();
    for model in doc.emitted_models() {
        for field in &model.fields {
            let Some(alias) = &field.alias else {
                continue;
            };
            if let Some(previous) = aliases.insert(alias.clone(), field.name.clone()) {
                if previous != field.name {
                    tracing::warn!(alias = %alias, "field alias maps to different client fields");
                }
            }
        }
    }
    aliases
}

pub fn generate_helpers(doc: &DmmfDocument) -> Result<TokenStream, GeneratorError> {
    let header = file_header("Runtime helpers shared by generated resolvers");
    let client_path: syn::Path = syn::parse_str(&doc.options.client_import_path).map_err(|e| {
        GeneratorError::InvalidOption {
            key: "customPrismaImportPath".to_string(),
            value: doc.options.client_import_path.clone(),
            expected: format!("a Rust module path ({})", e),
        }
    })?;

    let aliases = field_aliases(doc);
    let alias_entries = aliases.iter().map(|(alias, name)| quote! { (#alias, #name) });

    Ok(quote! {
        #header

        use async_graphql::{Context, Error, Result, SelectionField};
        use serde::de::DeserializeOwned;
        use serde_json::{Map, Value};

        pub use #client_path::PrismaClient;

        /// Exposed field aliases and the client fields behind them
        pub const FIELD_ALIASES: &[(&str, &str)] = &[#(#alias_entries),*];

        /// Requested selection, converted to client form
        #[derive(Debug, Clone, Default)]
        pub struct PrismaSelection {
            pub select: Map<String, Value>,
            /// `_count` selection, usually `{ "select": { .. } }`
            pub count: Option<Value>,
        }

        pub fn get_prisma_from_context<'a>(ctx: &Context<'a>) -> Result<&'a PrismaClient> {
            ctx.data::<PrismaClient>()
        }

        fn client_field_name(name: &str) -> &str {
            FIELD_ALIASES
                .iter()
                .find(|(alias, _)| *alias == name)
                .map(|(_, field)| *field)
                .unwrap_or(name)
        }

        fn transform_field(field: SelectionField<'_>) -> Value {
            let mut args = Map::new();
            if let Ok(arguments) = field.arguments() {
                for (name, value) in arguments {
                    if let Ok(value) = value.into_json() {
                        args.insert(name.to_string(), value);
                    }
                }
            }
            let nested = transform_selection_set(field);
            if !nested.is_empty() {
                args.insert("select".to_string(), Value::Object(nested));
            }
            if args.is_empty() {
                Value::Bool(true)
            } else {
                Value::Object(args)
            }
        }

        fn transform_selection_set(field: SelectionField<'_>) -> Map<String, Value> {
            field
                .selection_set()
                .filter(|child| child.name() != "__typename")
                .map(|child| (client_field_name(child.name()).to_string(), transform_field(child)))
                .collect()
        }

        /// Selection of the field being resolved
        pub fn transform_info_into_prisma_args(ctx: &Context<'_>) -> PrismaSelection {
            let mut selection = PrismaSelection::default();
            for (name, value) in transform_selection_set(ctx.field()) {
                if name == "_count" {
                    selection.count = Some(value);
                } else {
                    selection.select.insert(name, value);
                }
            }
            selection
        }

        /// Add the requested relation counts to read arguments
        pub fn with_count(args: Value, selection: &PrismaSelection) -> Value {
            let mut args = match args {
                Value::Object(map) => map,
                _ => Map::new(),
            };
            if let Some(count) = &selection.count {
                let include = args
                    .entry("include")
                    .or_insert_with(|| Value::Object(Map::new()));
                if let Value::Object(include) = include {
                    include.insert("_count".to_string(), count.clone());
                }
            }
            Value::Object(args)
        }

        fn aggregate_selection(value: &Value) -> Value {
            match value {
                Value::Object(map) => map.get("select").cloned().unwrap_or(Value::Bool(true)),
                other => other.clone(),
            }
        }

        /// Add the requested aggregate fields (`_count`, `_avg`, ..) to aggregate arguments
        pub fn with_aggregate_fields(args: Value, selection: &PrismaSelection) -> Value {
            let mut args = match args {
                Value::Object(map) => map,
                _ => Map::new(),
            };
            for (name, value) in selection.select.iter().filter(|(name, _)| name.starts_with('_')) {
                args.insert(name.clone(), aggregate_selection(value));
            }
            if let Some(count) = &selection.count {
                args.insert("_count".to_string(), aggregate_selection(count));
            }
            Value::Object(args)
        }

        /// Run one client action and decode its result
        pub async fn execute<T: DeserializeOwned>(
            ctx: &Context<'_>,
            model: &str,
            action: &str,
            args: Value,
        ) -> Result<T> {
            let client = get_prisma_from_context(ctx)?;
            let value = client
                .query(model, action, args)
                .await
                .map_err(|e| Error::new(e.to_string()))?;
            serde_json::from_value(value).map_err(|e| Error::new(e.to_string()))
        }

        /// Fetch one relation of a parent record located by `filter`
        pub async fn execute_relation<T: DeserializeOwned>(
            ctx: &Context<'_>,
            model: &str,
            filter: Value,
            field: &str,
            args: Value,
        ) -> Result<T> {
            let select = match args {
                Value::Object(map) if map.is_empty() => Value::Bool(true),
                other => other,
            };
            let mut fields = Map::new();
            fields.insert(field.to_string(), select);
            let query = serde_json::json!({ "where": filter, "select": fields });
            let mut parent: Value = execute(ctx, model, "findUniqueOrThrow", query).await?;
            serde_json::from_value(parent[field].take()).map_err(|e| Error::new(e.to_string()))
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GeneratorOptions;
    use crate::dmmf::fixtures;

    #[test]
    fn test_helpers_contract() {
        let doc = DmmfDocument::new(&fixtures::blog(), &GeneratorOptions::new("out")).unwrap();
        let tokens = generate_helpers(&doc).unwrap();
        let file: syn::File = syn::parse2(tokens).unwrap();
        let text = prettyplease::unparse(&file);

        assert!(text.contains("pub use crate::prisma::PrismaClient;"));
        for name in [
            "fn get_prisma_from_context",
            "fn transform_info_into_prisma_args",
            "fn with_count",
            "fn with_aggregate_fields",
            "async fn execute<",
            "async fn execute_relation<",
        ] {
            assert!(text.contains(name), "missing {name}");
        }
        assert!(text.contains("(\"displayName\", \"name\")"));
    }

    #[test]
    fn test_custom_client_path() {
        let mut options = GeneratorOptions::new("out");
        options.client_import_path = "db::client".to_string();
        let doc = DmmfDocument::new(&fixtures::blog(), &options).unwrap();
        let text = generate_helpers(&doc).unwrap().to_string();
        assert!(text.contains("pub use db :: client :: PrismaClient"));
    }
}
