//! Enum generation
//!
//! Emits one async-graphql `Enum` per datamodel or schema enum. Variants
//! carry the GraphQL name (field alias for scalar-field enums) and the
//! client value as their serde name.

use super::{emit_each, BlockGenerator};
use crate::config::EmitBlock;
use crate::dmmf::naming::module_name;
use crate::dmmf::{DmmfDocument, Enum};
use crate::emit::{doc_attrs, file_header, module_index, type_ident, ModuleEntry, SourceTree};
use crate::error::GeneratorError;
use heck::ToUpperCamelCase;
use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use std::collections::HashSet;
use std::path::PathBuf;

pub struct EnumsGenerator;

impl BlockGenerator for EnumsGenerator {
    fn block(&self) -> EmitBlock {
        EmitBlock::Enums
    }

    fn should_generate(&self, doc: &DmmfDocument) -> bool {
        doc.should_generate(EmitBlock::Enums) && !doc.enums.is_empty()
    }

    fn emit(&self, doc: &DmmfDocument, tree: &SourceTree) -> Result<usize, GeneratorError> {
        // de-duplicate by display name, first wins
        let mut seen = HashSet::new();
        let enums: Vec<&Enum> = doc
            .enums
            .iter()
            .filter(|e| seen.insert(e.type_name.as_str()))
            .collect();

        let count = emit_each(&enums, |e| {
            let path = PathBuf::from("enums").join(format!("{}.rs", module_name(&e.type_name)));
            tree.create_source_file(path, generate_enum(e))
        })?;

        let entries: Vec<ModuleEntry> = enums
            .iter()
            .map(|e| ModuleEntry::new(module_name(&e.type_name), vec![e.type_name.clone()]))
            .collect();
        tree.create_source_file("enums/mod.rs", module_index("Generated enums", &entries))?;

        Ok(count)
    }
}

/// Rust variant identifier of an enum value
fn variant_ident(value: &str) -> proc_macro2::Ident {
    let name = value.to_upper_camel_case();
    if name.is_empty() || name.starts_with(|c: char| c.is_ascii_digit()) {
        format_ident!("V{}", name)
    } else {
        type_ident(&name)
    }
}

/// Variant identifiers of one enum, suffixed where casing folds values together
fn variant_idents(e: &Enum) -> Vec<proc_macro2::Ident> {
    let mut taken = HashSet::new();
    e.values
        .iter()
        .map(|value| {
            let base = variant_ident(&value.value);
            if taken.insert(base.to_string()) {
                return base;
            }
            let mut n: u32 = 2;
            loop {
                let candidate = format_ident!("{}{}", base, n);
                if taken.insert(candidate.to_string()) {
                    return candidate;
                }
                n += 1;
            }
        })
        .collect()
}

fn generate_enum(e: &Enum) -> TokenStream {
    let header = file_header(&format!("GraphQL enum {}", e.type_name));
    let ident = type_ident(&e.type_name);
    let type_name = &e.type_name;
    let docs = doc_attrs(e.docs.as_deref());

    let variants = e.values.iter().zip(variant_idents(e)).map(|(value, variant)| {
        let graphql_name = &value.name;
        let wire_name = &value.value;
        quote! {
            #[graphql(name = #graphql_name)]
            #[serde(rename = #wire_name)]
            #variant,
        }
    });

    quote! {
        #header

        use async_graphql::Enum;
        use serde::{Deserialize, Serialize};

        #docs
        #[derive(Enum, Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
        #[graphql(name = #type_name)]
        pub enum #ident {
            #(#variants)*
        }
    }
}
