//! Input type generation
//!
//! One `InputObject` per client input type. The selected variant decides each
//! member's type; members hidden for this input context are left out.

use super::{emit_each, graphql_name_attr, serde_rename_attr, BlockGenerator};
use crate::config::EmitBlock;
use crate::dmmf::naming::{field_ident, module_name};
use crate::dmmf::{DmmfDocument, InputType};
use crate::emit::{
    file_header, input_field_type, module_index, root_path_for, type_ident, ModuleEntry, SourceTree,
};
use crate::error::GeneratorError;
use proc_macro2::TokenStream;
use quote::quote;
use std::path::Path;

const INPUTS_DIR: &str = "resolvers/inputs";

pub struct InputsGenerator;

impl BlockGenerator for InputsGenerator {
    fn block(&self) -> EmitBlock {
        EmitBlock::Inputs
    }

    fn emit(&self, doc: &DmmfDocument, tree: &SourceTree) -> Result<usize, GeneratorError> {
        let count = emit_each(&doc.input_types, |input| {
            let path = Path::new(INPUTS_DIR).join(format!("{}.rs", module_name(&input.type_name)));
            let tokens = generate_input_type(input, &root_path_for(&path));
            tree.create_source_file(path, tokens)
        })?;

        let entries: Vec<ModuleEntry> = doc
            .input_types
            .iter()
            .map(|i| ModuleEntry::new(module_name(&i.type_name), vec![i.type_name.clone()]))
            .collect();
        tree.create_source_file(
            Path::new(INPUTS_DIR).join("mod.rs"),
            module_index("Generated input types", &entries),
        )?;

        Ok(count)
    }
}

fn generate_input_type(input: &InputType, root: &TokenStream) -> TokenStream {
    let header = file_header(&format!("GraphQL input type {}", input.type_name));
    let ident = type_ident(&input.type_name);
    let type_name = &input.type_name;

    let members = input.fields.iter().filter(|f| !f.is_omitted).map(|field| {
        let member = field_ident(&field.name);
        let ty = input_field_type(field, root);
        let rename = serde_rename_attr(&field.name);
        let graphql_name = if field.type_name != field.name {
            let alias = &field.type_name;
            quote! { #[graphql(name = #alias)] }
        } else {
            graphql_name_attr(&field.name)
        };
        let skip = if field.is_required {
            quote! {}
        } else {
            quote! { #[serde(skip_serializing_if = "Option::is_none")] }
        };
        quote! {
            #rename
            #skip
            #graphql_name
            pub #member: #ty,
        }
    });

    quote! {
        #header

        use async_graphql::InputObject;
        use serde::Serialize;

        #[derive(InputObject, Clone, Debug, Serialize)]
        #[graphql(name = #type_name)]
        pub struct #ident {
            #(#members)*
        }
    }
}
