//! Model object generation
//!
//! Each model (and composite type) becomes a `SimpleObject` holding the
//! scalar fields exactly as the client returns them. Aliased fields, ID
//! exposure and relation fields are served by a `ComplexObject` impl so the
//! stored field keeps its client name.

use super::args::{arg_params, args_init};
use super::{emit_each, graphql_name_attr, serde_rename_attr, BlockGenerator};
use crate::config::EmitBlock;
use crate::dmmf::naming::{field_ident, module_name};
use crate::dmmf::{DmmfDocument, FieldKind, Model, ModelField, TypeLocation};
use crate::emit::{
    doc_attrs, file_header, module_index, output_type, root_path_for, type_ident, ModuleEntry,
    SourceTree,
};
use crate::error::GeneratorError;
use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use std::path::PathBuf;

pub struct ModelsGenerator;

impl BlockGenerator for ModelsGenerator {
    fn block(&self) -> EmitBlock {
        EmitBlock::Models
    }

    fn emit(&self, doc: &DmmfDocument, tree: &SourceTree) -> Result<usize, GeneratorError> {
        let models: Vec<&Model> = doc.emitted_models().collect();

        let count = emit_each(&models, |model| {
            let path = PathBuf::from("models").join(format!("{}.rs", module_name(&model.type_name)));
            let tokens = generate_model(doc, model, &root_path_for(&path))?;
            tree.create_source_file(path, tokens)
        })?;

        let entries: Vec<ModuleEntry> = models
            .iter()
            .map(|m| ModuleEntry::new(module_name(&m.type_name), vec![m.type_name.clone()]))
            .collect();
        tree.create_source_file("models/mod.rs", module_index("Generated models", &entries))?;

        Ok(count)
    }
}

/// Embedded composite type that is not emitted
fn embeds_hidden_type(doc: &DmmfDocument, field: &ModelField) -> bool {
    field.kind == FieldKind::Embedded
        && doc
            .model(&field.type_ref.name)
            .is_some_and(|target| target.omit_output)
}

fn generate_model(doc: &DmmfDocument, model: &Model, root: &TokenStream) -> Result<TokenStream, GeneratorError> {
    let header = file_header(&format!("GraphQL object {}", model.type_name));
    let ident = type_ident(&model.type_name);
    let type_name = &model.type_name;
    let docs = doc_attrs(model.docs.as_deref());
    let id_as_id = doc.options.emit_id_as_id_type;

    // Stored members mirror the client row; accessors go on the ComplexObject
    let mut members = Vec::new();
    let mut accessors = Vec::new();

    for field in model.fields.iter() {
        // relations are served by the relation resolvers below
        if field.kind == FieldKind::Relation || embeds_hidden_type(doc, field) {
            continue;
        }
        let member = field_ident(&field.name);
        let ty = output_type(&field.type_ref, field.is_required, root);
        let rename = serde_rename_attr(&field.name);
        let field_docs = doc_attrs(field.docs.as_deref());
        let exposes_id = id_as_id && field.is_id && field.type_ref.location == TypeLocation::Scalar;

        // stored under the client name; exposed through an accessor
        if field.omit_output || field.alias.is_some() || exposes_id {
            members.push(quote! {
                #rename
                #[graphql(skip)]
                pub #member: #ty,
            });
            if !field.omit_output {
                accessors.push(field_accessor(field, exposes_id, &ty));
            }
            continue;
        }

        let graphql_name = graphql_name_attr(&field.name);
        members.push(quote! {
            #field_docs
            #rename
            #graphql_name
            pub #member: #ty,
        });
    }

    // `_count` is only meaningful alongside the CRUD resolvers that fill it
    let count_field = doc
        .output_type(&model.name)
        .and_then(|output| output.field("_count"))
        .filter(|_| doc.should_generate(EmitBlock::CrudResolvers) && !model.is_composite_type);
    if let Some(count) = count_field {
        let ty = output_type(&count.output, false, root);
        members.push(quote! {
            #[serde(rename = "_count", default)]
            #[graphql(name = "_count")]
            pub _count: #ty,
        });
    }

    // Relation fields delegate to the model's relation resolver
    if doc.should_generate(EmitBlock::RelationResolvers) {
        if let Some(relation_model) = doc.relation_models.iter().find(|r| r.model == model.name) {
            let resolver = type_ident(&relation_model.resolver_name());
            for relation in &relation_model.fields {
                let method = field_ident(&relation.field.name);
                let graphql_name = relation.field.output_name();
                let docs = doc_attrs(relation.field.docs.as_deref());
                let ty = output_type(&relation.output.output, relation.output.is_required, root);
                let (params, call_args) = match &relation.args_type_name {
                    Some(args_type) => {
                        let bundle = type_ident(args_type);
                        let init = args_init(&quote! { #root::resolvers::relations::#bundle }, &relation.output.args);
                        (arg_params(&relation.output.args, root), quote! { , #init })
                    }
                    None => (Vec::new(), quote! {}),
                };
                accessors.push(quote! {
                    #docs
                    #[graphql(name = #graphql_name)]
                    async fn #method(&self, ctx: &Context<'_>, #(#params),*) -> Result<#ty> {
                        #root::resolvers::relations::#resolver
                            .#method(ctx, self #call_args)
                            .await
                    }
                });
            }
        }
    }

    // Only derive complex when there is something to put in the impl
    let complex_attr = if accessors.is_empty() {
        quote! {}
    } else {
        quote! { #[graphql(complex)] }
    };
    let complex_impl = if accessors.is_empty() {
        quote! {}
    } else {
        quote! {
            #[ComplexObject]
            impl #ident {
                #(#accessors)*
            }
        }
    };

    Ok(quote! {
        #header

        use async_graphql::{ComplexObject, Context, Result, SimpleObject, ID};
        use serde::{Deserialize, Serialize};

        #docs
        #[derive(SimpleObject, Clone, Debug, Serialize, Deserialize)]
        #[graphql(name = #type_name)]
        #complex_attr
        pub struct #ident {
            #(#members)*
        }

        #complex_impl
    })
}

/// Accessor exposing a stored field under its alias or as `ID`
fn field_accessor(field: &ModelField, exposes_id: bool, ty: &TokenStream) -> TokenStream {
    let member = field_ident(&field.name);
    let graphql_name = field.output_name();
    let method = format_ident!("{}_field", member.to_string().trim_start_matches("r#"));
    let docs = doc_attrs(field.docs.as_deref());

    if exposes_id {
        let (ret, body) = if field.is_required {
            (quote! { ID }, quote! { ID(self.#member.to_string()) })
        } else {
            (
                quote! { Option<ID> },
                quote! { self.#member.as_ref().map(|value| ID(value.to_string())) },
            )
        };
        return quote! {
            #docs
            #[graphql(name = #graphql_name)]
            async fn #method(&self) -> #ret {
                #body
            }
        };
    }

    quote! {
        #docs
        #[graphql(name = #graphql_name)]
        async fn #method(&self) -> #ty {
            self.#member.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GeneratorOptions;
    use crate::dmmf::fixtures;

    fn generate(options: GeneratorOptions) -> SourceTree {
        let doc = DmmfDocument::new(&fixtures::blog(), &options).unwrap();
        let tree = SourceTree::new();
        ModelsGenerator.emit(&doc, &tree).unwrap();
        tree
    }

    #[test]
    fn test_model_with_alias_and_relations() {
        let tree = generate(GeneratorOptions::new("out"));
        let user = tree.get("models/user.rs").unwrap();
        assert!(user.contains("\"displayName\""));
        assert!(user.contains("name_field"));
        assert!(user.contains("UserRelationsResolver"));
        assert!(user.contains("UserPostsArgs"));
        assert!(user.contains("_count"));
        // password is stored but hidden
        assert!(user.contains("password"));
        syn::parse_file(&user).unwrap();

        let post = tree.get("models/post.rs").unwrap();
        assert!(post.contains("A blog entry"));
        assert!(post.contains("rename = \"authorId\""));
        assert!(tree.get("models/mod.rs").unwrap().contains("pub mod post"));
    }

    #[test]
    fn test_models_only_has_no_resolver_references() {
        let mut config = std::collections::BTreeMap::new();
        config.insert("output".to_string(), "out".to_string());
        config.insert("emitOnly".to_string(), "models".to_string());
        let tree = generate(GeneratorOptions::from_config(&config).unwrap());
        let user = tree.get("models/user.rs").unwrap();
        assert!(!user.contains("resolvers"));
        assert!(!user.contains("_count"));
    }

    #[test]
    fn test_id_as_id_type() {
        let mut options = GeneratorOptions::new("out");
        options.emit_id_as_id_type = true;
        let tree = generate(options);
        let post = tree.get("models/post.rs").unwrap();
        assert!(post.replace(' ', "").contains("ID(self.id.to_string())"));
    }

    #[test]
    fn test_composite_type_is_a_plain_member() {
        let doc = DmmfDocument::new(&fixtures::blog_with_address(), &GeneratorOptions::new("out")).unwrap();
        let tree = SourceTree::new();
        ModelsGenerator.emit(&doc, &tree).unwrap();

        let user = tree.get("models/user.rs").unwrap();
        syn::parse_file(&user).unwrap();
        let user = user.replace(' ', "");
        assert!(user.contains("pubaddress:super::super::models::Address,"));
        assert!(!user.contains("fnaddress("));

        let address = tree.get("models/address.rs").unwrap().replace(' ', "");
        assert!(address.contains("pubstreet:String"));
        assert!(!address.contains("_count"));
        assert!(!address.contains("graphql(complex)"));
        assert!(tree.get("models/mod.rs").unwrap().contains("pub mod address"));
    }
}
