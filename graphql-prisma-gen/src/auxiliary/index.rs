//! Top-level manifests
//!
//! `mod.rs` declares only the categories present in the tree, so disabling a
//! block never leaves a dangling `mod`. With CRUD resolvers it also merges
//! every model's query and mutation halves into the schema roots.

use crate::blocks::crud::crud_half_name;
use crate::dmmf::{DmmfDocument, OperationKind};
use crate::emit::{file_header, module_index, type_ident, ModuleEntry, SourceTree};
use proc_macro2::TokenStream;
use quote::{format_ident, quote};

const CATEGORIES: &[&str] = &["enums", "models"];
const RESOLVER_CATEGORIES: &[&str] = &["inputs", "outputs", "relations", "crud"];

/// `resolvers/mod.rs`, if any resolver category was emitted
pub fn generate_resolvers_index(tree: &SourceTree) -> Option<TokenStream> {
    let entries: Vec<ModuleEntry> = RESOLVER_CATEGORIES
        .iter()
        .filter(|category| tree.contains(format!("resolvers/{}/mod.rs", category)))
        .map(|category| ModuleEntry::nested(*category))
        .collect();
    if entries.is_empty() {
        return None;
    }
    Some(module_index("Generated resolvers and their types", &entries))
}

fn schema_roots(doc: &DmmfDocument) -> TokenStream {
    let halves = |operation: OperationKind| -> Vec<TokenStream> {
        doc.resolver_mappings()
            .filter_map(|m| crud_half_name(m, operation))
            .map(|name| {
                let ident = type_ident(&name);
                quote! { pub self::resolvers::crud::#ident }
            })
            .collect()
    };
    let queries = halves(OperationKind::Query);
    let mutations = halves(OperationKind::Mutation);
    if queries.is_empty() {
        return quote! {};
    }

    let mutation = if mutations.is_empty() {
        quote! { pub type Mutation = async_graphql::EmptyMutation; }
    } else {
        quote! {
            #[derive(MergedObject, Default)]
            pub struct Mutation(#(#mutations),*);
        }
    };

    quote! {
        use async_graphql::{EmptySubscription, MergedObject, Schema};

        #[derive(MergedObject, Default)]
        pub struct Query(#(#queries),*);

        #mutation

        pub type GeneratedSchema = Schema<Query, Mutation, EmptySubscription>;

        /// Schema with every generated operation, serving through `client`
        pub fn build_schema(client: PrismaClient) -> GeneratedSchema {
            Schema::build(Query::default(), Mutation::default(), EmptySubscription)
                .data(client)
                .finish()
        }
    }
}

/// Root `mod.rs`
pub fn generate_root_index(doc: &DmmfDocument, tree: &SourceTree) -> TokenStream {
    let header = file_header("Generated GraphQL API");

    let mut modules: Vec<_> = CATEGORIES
        .iter()
        .filter(|category| tree.contains(format!("{}/mod.rs", category)))
        .map(|category| format_ident!("{}", category))
        .collect();
    if tree.contains("resolvers/mod.rs") {
        modules.push(format_ident!("resolvers"));
    }
    modules.extend(["enhance", "helpers", "scalars"].map(|m| format_ident!("{}", m)));

    let roots = if tree.contains("resolvers/crud/mod.rs") {
        schema_roots(doc)
    } else {
        quote! {}
    };

    quote! {
        #header

        #(pub mod #modules;)*

        pub use helpers::PrismaClient;

        #roots
    }
}
