//! Relation resolver generation
//!
//! One resolver per relation model. Each relation field re-fetches its parent
//! by a unique filter and follows the relation, with the same selection
//! handling as direct reads. Model objects delegate to these resolvers.

use super::args::args_struct_file;
use super::{emit_each, BlockGenerator};
use crate::config::EmitBlock;
use crate::dmmf::naming::{field_ident, module_name};
use crate::dmmf::{DmmfDocument, RelationModel, UniqueFilter};
use crate::emit::{
    file_header, module_index, output_type, root_path_for, type_ident, ModuleEntry, SourceTree,
};
use crate::error::GeneratorError;
use proc_macro2::TokenStream;
use quote::quote;
use std::path::{Path, PathBuf};

const RELATIONS_DIR: &str = "resolvers/relations";

pub struct RelationsGenerator;

impl BlockGenerator for RelationsGenerator {
    fn block(&self) -> EmitBlock {
        EmitBlock::RelationResolvers
    }

    fn should_generate(&self, doc: &DmmfDocument) -> bool {
        doc.should_generate(EmitBlock::RelationResolvers) && !doc.relation_models.is_empty()
    }

    fn emit(&self, doc: &DmmfDocument, tree: &SourceTree) -> Result<usize, GeneratorError> {
        let count = emit_each(&doc.relation_models, |relation_model| {
            emit_relation_model(relation_model, tree)
        })?;

        let entries: Vec<ModuleEntry> = doc
            .relation_models
            .iter()
            .map(|r| ModuleEntry::new(module_name(&r.type_name), exports(r)))
            .collect();
        tree.create_source_file(
            Path::new(RELATIONS_DIR).join("mod.rs"),
            module_index("Generated relation resolvers", &entries),
        )?;

        Ok(count)
    }
}

fn args_types(relation_model: &RelationModel) -> Vec<String> {
    relation_model
        .fields
        .iter()
        .filter_map(|f| f.args_type_name.clone())
        .collect()
}

fn exports(relation_model: &RelationModel) -> Vec<String> {
    let mut names = vec![relation_model.resolver_name()];
    names.extend(args_types(relation_model));
    names
}

fn emit_relation_model(relation_model: &RelationModel, tree: &SourceTree) -> Result<(), GeneratorError> {
    // fails fast for models with no usable identity
    let filter = relation_model.unique_filter()?;

    let dir = PathBuf::from(RELATIONS_DIR).join(module_name(&relation_model.type_name));
    let resolver_name = relation_model.resolver_name();
    let resolver_module = module_name(&resolver_name);
    let resolver_path = dir.join(format!("{}.rs", resolver_module));
    tree.create_source_file(
        &resolver_path,
        generate_resolver(relation_model, &filter, &root_path_for(&resolver_path)),
    )?;

    let mut entries = vec![ModuleEntry::new(resolver_module, vec![resolver_name])];
    let args = args_types(relation_model);
    if !args.is_empty() {
        for relation in &relation_model.fields {
            let Some(args_type) = &relation.args_type_name else {
                continue;
            };
            let path = dir.join("args").join(format!("{}.rs", module_name(args_type)));
            let tokens = args_struct_file(args_type, &relation.output.args, &root_path_for(&path));
            tree.create_source_file(path, tokens)?;
        }
        let arg_entries: Vec<ModuleEntry> = args
            .iter()
            .map(|name| ModuleEntry::new(module_name(name), vec![name.clone()]))
            .collect();
        tree.create_source_file(
            dir.join("args/mod.rs"),
            module_index("Relation argument bundles", &arg_entries),
        )?;
        entries.push(ModuleEntry::new("args", args));
    }

    tree.create_source_file(
        dir.join("mod.rs"),
        module_index(&format!("Relation resolvers of {}", relation_model.type_name), &entries),
    )
}

/// `json!` filter locating the parent record
fn filter_tokens(filter: &UniqueFilter) -> TokenStream {
    match filter {
        UniqueFilter::Single(field) => {
            let member = field_ident(field);
            quote! { serde_json::json!({ #field: parent.#member }) }
        }
        UniqueFilter::Composite { name, fields } => {
            let members = fields.iter().map(|f| field_ident(f));
            quote! { serde_json::json!({ #name: { #(#fields: parent.#members),* } }) }
        }
    }
}

fn generate_resolver(relation_model: &RelationModel, filter: &UniqueFilter, root: &TokenStream) -> TokenStream {
    let header = file_header(&format!("Relation resolver for {}", relation_model.type_name));
    let ident = type_ident(&relation_model.resolver_name());
    let model_ident = type_ident(&relation_model.type_name);
    let model_name = &relation_model.model;
    let filter = filter_tokens(filter);

    let methods = relation_model.fields.iter().map(|relation| {
        let method = field_ident(&relation.field.name);
        let field_name = &relation.field.name;
        let ty = output_type(&relation.output.output, relation.output.is_required, root);
        let (param, args) = match &relation.args_type_name {
            Some(args_type) => {
                let bundle = type_ident(args_type);
                (
                    quote! { , args: #root::resolvers::relations::#bundle },
                    quote! { serde_json::to_value(&args)? },
                )
            }
            None => (quote! {}, quote! { serde_json::json!({}) }),
        };
        quote! {
            pub async fn #method(
                &self,
                ctx: &Context<'_>,
                parent: &#root::models::#model_ident
                #param
            ) -> Result<#ty> {
                let selection = transform_info_into_prisma_args(ctx);
                let args = with_count(#args, &selection);
                execute_relation(ctx, #model_name, #filter, #field_name, args).await
            }
        }
    });

    quote! {
        #header

        use async_graphql::{Context, Result};
        use #root::helpers::{execute_relation, transform_info_into_prisma_args, with_count};

        #[derive(Debug, Clone, Copy, Default)]
        pub struct #ident;

        impl #ident {
            #(#methods)*
        }
    }
}
