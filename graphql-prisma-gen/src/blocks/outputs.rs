//! Output type generation
//!
//! Aggregate, group-by, count and other client result shapes. Root types and
//! model types are handled elsewhere. Fields taking arguments get a bundle in
//! `outputs/args`.

use super::args::{arg_params, args_init, args_struct_file};
use super::{emit_each, graphql_name_attr, serde_rename_attr, BlockGenerator};
use crate::config::EmitBlock;
use crate::dmmf::naming::{field_ident, module_name};
use crate::dmmf::{DmmfDocument, OutputField, OutputType};
use crate::emit::{
    file_header, module_index, output_type, root_path_for, type_ident, ModuleEntry, SourceTree,
};
use crate::error::GeneratorError;
use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use std::path::{Path, PathBuf};

const OUTPUTS_DIR: &str = "resolvers/outputs";

pub struct OutputsGenerator;

impl BlockGenerator for OutputsGenerator {
    fn block(&self) -> EmitBlock {
        EmitBlock::Outputs
    }

    fn emit(&self, doc: &DmmfDocument, tree: &SourceTree) -> Result<usize, GeneratorError> {
        let outputs: Vec<&OutputType> = doc.generated_output_types().collect();

        let count = emit_each(&outputs, |output| {
            let path = Path::new(OUTPUTS_DIR).join(format!("{}.rs", module_name(&output.type_name)));
            let tokens = generate_output_type(output, &root_path_for(&path));
            tree.create_source_file(path, tokens)
        })?;

        // argument bundles, keyed `<OutputType><Field>Args`
        let with_args: Vec<(&str, &OutputField)> = outputs
            .iter()
            .flat_map(|output| output.fields.iter())
            .filter_map(|field| field.args_type_name.as_deref().map(|name| (name, field)))
            .collect();
        emit_each(&with_args, |(args_type, field)| {
            let path = Path::new(OUTPUTS_DIR)
                .join("args")
                .join(format!("{}.rs", module_name(args_type)));
            let tokens = args_struct_file(args_type, &field.args, &root_path_for(&path));
            tree.create_source_file(path, tokens)
        })?;

        let mut entries: Vec<ModuleEntry> = outputs
            .iter()
            .map(|o| ModuleEntry::new(module_name(&o.type_name), vec![o.type_name.clone()]))
            .collect();
        if !with_args.is_empty() {
            let arg_entries: Vec<ModuleEntry> = with_args
                .iter()
                .map(|(name, _)| ModuleEntry::new(module_name(name), vec![name.to_string()]))
                .collect();
            tree.create_source_file(
                PathBuf::from(OUTPUTS_DIR).join("args/mod.rs"),
                module_index("Output field argument bundles", &arg_entries),
            )?;
            entries.push(ModuleEntry::new(
                "args",
                with_args.iter().map(|(name, _)| name.to_string()).collect(),
            ));
        }
        tree.create_source_file(
            PathBuf::from(OUTPUTS_DIR).join("mod.rs"),
            module_index("Generated output types", &entries),
        )?;

        Ok(count)
    }
}

fn generate_output_type(output: &OutputType, root: &TokenStream) -> TokenStream {
    let header = file_header(&format!("GraphQL output type {}", output.type_name));
    let ident = type_ident(&output.type_name);
    let type_name = &output.type_name;

    let mut members = Vec::new();
    let mut accessors = Vec::new();
    for field in &output.fields {
        let member = field_ident(&field.name);
        let ty = output_type(&field.output, field.is_required, root);
        let rename = serde_rename_attr(&field.name);

        let Some(args_type) = &field.args_type_name else {
            let graphql_name = graphql_name_attr(&field.name);
            members.push(quote! {
                #rename
                #graphql_name
                pub #member: #ty,
            });
            continue;
        };

        members.push(quote! {
            #rename
            #[graphql(skip)]
            pub #member: #ty,
        });
        let name = &field.name;
        let method = format_ident!("{}_field", member.to_string().trim_start_matches("r#"));
        let bundle = type_ident(args_type);
        let params = arg_params(&field.args, root);
        let init = args_init(&quote! { #root::resolvers::outputs::#bundle }, &field.args);
        accessors.push(quote! {
            #[graphql(name = #name)]
            async fn #method(&self, #(#params),*) -> #ty {
                // applied by the parent query through the selection set
                let _args = #init;
                self.#member.clone()
            }
        });
    }

    let (complex_attr, complex_impl) = if accessors.is_empty() {
        (quote! {}, quote! {})
    } else {
        (
            quote! { #[graphql(complex)] },
            quote! {
                #[ComplexObject]
                impl #ident {
                    #(#accessors)*
                }
            },
        )
    };

    quote! {
        #header

        use async_graphql::{ComplexObject, SimpleObject};
        use serde::{Deserialize, Serialize};

        #[derive(SimpleObject, Clone, Debug, Serialize, Deserialize)]
        #[graphql(name = #type_name)]
        #complex_attr
        pub struct #ident {
            #(#members)*
        }

        #complex_impl
    }
}
