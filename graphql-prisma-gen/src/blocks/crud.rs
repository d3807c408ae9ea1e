//! CRUD resolver generation
//!
//! Every mapped action gets its own `<Action><Model>Resolver` object; the
//! per-model `<Model>CrudResolver` merges them into query and mutation halves
//! that the top-level manifest wires into the schema.

use super::args::{arg_params, args_init, args_struct_file};
use super::{emit_each, BlockGenerator};
use crate::config::EmitBlock;
use crate::dmmf::naming::{field_ident, module_name};
use crate::dmmf::{Action, ActionKind, DmmfDocument, Mapping, OperationKind};
use crate::emit::{
    file_header, module_index, output_type, root_path_for, type_ident, ModuleEntry, SourceTree,
};
use crate::error::GeneratorError;
use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use std::path::{Path, PathBuf};

const CRUD_DIR: &str = "resolvers/crud";

pub struct CrudGenerator;

impl BlockGenerator for CrudGenerator {
    fn block(&self) -> EmitBlock {
        EmitBlock::CrudResolvers
    }

    fn should_generate(&self, doc: &DmmfDocument) -> bool {
        doc.should_generate(EmitBlock::CrudResolvers) && doc.resolver_mappings().next().is_some()
    }

    fn emit(&self, doc: &DmmfDocument, tree: &SourceTree) -> Result<usize, GeneratorError> {
        let mappings: Vec<&Mapping> = doc.resolver_mappings().collect();
        emit_each(&mappings, |mapping| emit_mapping(doc, mapping, tree))?;

        let entries: Vec<ModuleEntry> = mappings
            .iter()
            .map(|m| ModuleEntry::new(module_name(&m.model_type_name), exports(m)))
            .collect();
        tree.create_source_file(
            Path::new(CRUD_DIR).join("mod.rs"),
            module_index("Generated CRUD resolvers", &entries),
        )?;

        // one per action plus the merged resolver of each model
        Ok(mappings.iter().map(|m| m.actions.len() + 1).sum())
    }
}

/// Name of the query or mutation half of a model's CRUD resolver, if non-empty
pub fn crud_half_name(mapping: &Mapping, operation: OperationKind) -> Option<String> {
    let suffix = match operation {
        OperationKind::Query => "Query",
        OperationKind::Mutation => "Mutation",
    };
    mapping
        .actions
        .iter()
        .any(|a| a.operation() == operation)
        .then(|| format!("{}{}", mapping.resolver_name, suffix))
}

fn exports(mapping: &Mapping) -> Vec<String> {
    let mut names: Vec<String> = mapping.actions.iter().map(|a| a.resolver_name.clone()).collect();
    names.push(mapping.resolver_name.clone());
    names.extend(crud_half_name(mapping, OperationKind::Query));
    names.extend(crud_half_name(mapping, OperationKind::Mutation));
    names.extend(mapping.actions.iter().filter_map(|a| a.args_type_name.clone()));
    names
}

fn emit_mapping(doc: &DmmfDocument, mapping: &Mapping, tree: &SourceTree) -> Result<(), GeneratorError> {
    let dir = PathBuf::from(CRUD_DIR).join(module_name(&mapping.model_type_name));
    let mut entries = Vec::new();

    for action in &mapping.actions {
        let module = module_name(&action.resolver_name);
        let path = dir.join(format!("{}.rs", module));
        let tokens = generate_action_resolver(doc, mapping, action, &root_path_for(&path));
        tree.create_source_file(path, tokens)?;
        entries.push(ModuleEntry::new(module, vec![action.resolver_name.clone()]));
    }

    let crud_module = module_name(&mapping.resolver_name);
    let crud_path = dir.join(format!("{}.rs", crud_module));
    tree.create_source_file(&crud_path, generate_crud_resolver(mapping, &root_path_for(&crud_path)))?;
    let mut crud_exports = vec![mapping.resolver_name.clone()];
    crud_exports.extend(crud_half_name(mapping, OperationKind::Query));
    crud_exports.extend(crud_half_name(mapping, OperationKind::Mutation));
    entries.push(ModuleEntry::new(crud_module, crud_exports));

    let args: Vec<&Action> = mapping.actions.iter().filter(|a| a.args_type_name.is_some()).collect();
    if !args.is_empty() {
        let mut arg_entries = Vec::new();
        for action in &args {
            let Some(args_type) = &action.args_type_name else {
                continue;
            };
            let path = dir.join("args").join(format!("{}.rs", module_name(args_type)));
            tree.create_source_file(&path, args_struct_file(args_type, &action.args, &root_path_for(&path)))?;
            arg_entries.push(ModuleEntry::new(module_name(args_type), vec![args_type.clone()]));
        }
        tree.create_source_file(dir.join("args/mod.rs"), module_index("CRUD argument bundles", &arg_entries))?;
        entries.push(ModuleEntry::new(
            "args",
            args.iter().filter_map(|a| a.args_type_name.clone()).collect(),
        ));
    }

    tree.create_source_file(
        dir.join("mod.rs"),
        module_index(&format!("CRUD resolvers of {}", mapping.model_type_name), &entries),
    )
}

fn generate_action_resolver(
    doc: &DmmfDocument,
    mapping: &Mapping,
    action: &Action,
    root: &TokenStream,
) -> TokenStream {
    let header = file_header(&format!("{} resolver", action.resolver_name));
    let ident = type_ident(&action.resolver_name);
    let method = field_ident(&action.name);
    let operation_name = &action.name;
    let ty = output_type(&action.output, action.is_required, root);
    let model_name = &mapping.model;
    let client_action = action.kind.client_method();

    // Arguments arrive as resolver params and are bundled for the client
    let (params, args) = match &action.args_type_name {
        Some(args_type) => {
            let bundle = type_ident(args_type);
            let init = args_init(&quote! { #root::resolvers::crud::#bundle }, &action.args);
            (
                arg_params(&action.args, root),
                quote! {
                    let args = #init;
                    let args = serde_json::to_value(&args)?;
                },
            )
        }
        None => (Vec::new(), quote! { let args = serde_json::json!({}); }),
    };

    // aggregates select their fields directly; everything else may count relations
    let merge = match action.kind {
        ActionKind::Aggregate | ActionKind::GroupBy => quote! { with_aggregate_fields },
        _ => quote! { with_count },
    };

    // First line of the model docs, prefixed by the action
    let docs = match doc.model(&mapping.model).and_then(|m| m.docs.as_deref()) {
        Some(model_docs) => {
            let line = format!(" {} ({})", action.kind.as_str(), model_docs.lines().next().unwrap_or_default());
            quote! { #[doc = #line] }
        }
        None => quote! {},
    };

    quote! {
        #header

        use async_graphql::{Context, Object, Result};
        use #root::helpers::{execute, transform_info_into_prisma_args, with_aggregate_fields, with_count};

        #[derive(Debug, Clone, Copy, Default)]
        pub struct #ident;

        #[Object]
        impl #ident {
            #docs
            #[graphql(name = #operation_name)]
            async fn #method(&self, ctx: &Context<'_>, #(#params),*) -> Result<#ty> {
                #args
                let selection = transform_info_into_prisma_args(ctx);
                execute(ctx, #model_name, #client_action, #merge(args, &selection)).await
            }
        }
    }
}

fn generate_crud_resolver(mapping: &Mapping, root: &TokenStream) -> TokenStream {
    let header = file_header(&format!("CRUD resolver for {}", mapping.model_type_name));
    let ident = type_ident(&mapping.resolver_name);

    let half = |operation: OperationKind| {
        let name = crud_half_name(mapping, operation)?;
        let half_ident = type_ident(&name);
        let members = mapping
            .actions
            .iter()
            .filter(|a| a.operation() == operation)
            .map(|a| {
                let resolver = type_ident(&a.resolver_name);
                quote! { pub #root::resolvers::crud::#resolver }
            });
        let field = match operation {
            OperationKind::Query => format_ident!("query"),
            OperationKind::Mutation => format_ident!("mutation"),
        };
        Some((
            quote! {
                #[derive(MergedObject, Default)]
                pub struct #half_ident(#(#members),*);
            },
            quote! { pub #field: #half_ident, },
        ))
    };
    let (halves, fields): (Vec<_>, Vec<_>) = [OperationKind::Query, OperationKind::Mutation]
        .into_iter()
        .filter_map(half)
        .unzip();

    quote! {
        #header

        use async_graphql::MergedObject;

        #(#halves)*

        /// Every operation of the model, split by root type
        #[derive(Default)]
        pub struct #ident {
            #(#fields)*
        }
    }
}
