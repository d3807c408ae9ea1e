//! Block generators
//!
//! One generator per category of output. Each reads the semantic model and
//! writes into the shared [`SourceTree`]; the orchestrator runs them in a
//! fixed order.

mod args;
pub mod crud;
pub mod enums;
pub mod inputs;
pub mod models;
pub mod orchestrator;
pub mod outputs;
pub mod relations;

pub use orchestrator::{BlockOrchestrator, OrchestratorOutput};

use crate::config::EmitBlock;
use crate::dmmf::naming::{field_ident, needs_explicit_name};
use crate::dmmf::DmmfDocument;
use crate::emit::SourceTree;
use crate::error::GeneratorError;
use proc_macro2::TokenStream;
use quote::quote;
use rayon::prelude::*;
use std::time::{Duration, Instant};

/// Result of one block run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BlockMetrics {
    /// Items emitted (types, resolvers), manifests excluded
    pub items: usize,
    pub elapsed: Duration,
}

/// Capability shared by every block generator
pub trait BlockGenerator: Send + Sync {
    /// Category this generator emits
    fn block(&self) -> EmitBlock;

    fn name(&self) -> &'static str {
        self.block().as_str()
    }

    /// Enabled by configuration plus block-specific preconditions
    fn should_generate(&self, doc: &DmmfDocument) -> bool {
        doc.should_generate(self.block())
    }

    /// Emit every unit of the block; returns the item count
    fn emit(&self, doc: &DmmfDocument, tree: &SourceTree) -> Result<usize, GeneratorError>;

    /// Timed [`BlockGenerator::emit`]
    fn generate(&self, doc: &DmmfDocument, tree: &SourceTree) -> Result<BlockMetrics, GeneratorError> {
        let start = Instant::now();
        let items = self.emit(doc, tree)?;
        Ok(BlockMetrics {
            items,
            elapsed: start.elapsed(),
        })
    }
}

/// Run `f` for every item on the rayon pool, failing on the first error
pub(crate) fn emit_each<T, F>(items: &[T], f: F) -> Result<usize, GeneratorError>
where
    T: Sync,
    F: Fn(&T) -> Result<(), GeneratorError> + Sync + Send,
{
    items.par_iter().try_for_each(&f)?;
    Ok(items.len())
}

/// `#[graphql(name = ..)]` when the default renaming would not reproduce `name`
pub(crate) fn graphql_name_attr(name: &str) -> TokenStream {
    if needs_explicit_name(name) {
        quote! { #[graphql(name = #name)] }
    } else {
        quote! {}
    }
}

/// `#[serde(rename = ..)]` when the Rust identifier differs from the wire name
pub(crate) fn serde_rename_attr(name: &str) -> TokenStream {
    let ident = field_ident(name).to_string();
    if ident.trim_start_matches("r#") == name {
        quote! {}
    } else {
        quote! { #[serde(rename = #name)] }
    }
}
