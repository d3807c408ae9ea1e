//! Source tree collaborator and token helpers shared by all emitters
//!
//! Emitters build `quote!` token streams and hand them to [`SourceTree`],
//! which renders and stores one unit per relative path. Nothing here writes
//! to disk; persistence belongs to the pipeline.

mod types;

pub use types::{input_field_type, output_type, scalar_type, type_path};

use crate::dmmf::naming::escape_rust_keyword;
use crate::error::GeneratorError;
use proc_macro2::{Ident, TokenStream};
use quote::{format_ident, quote};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// In-memory output tree keyed by path relative to the output directory
#[derive(Debug, Default)]
pub struct SourceTree {
    files: Mutex<BTreeMap<PathBuf, String>>,
}

impl SourceTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create or overwrite the unit at `path`
    ///
    /// Tokens are rendered on the calling thread; `TokenStream` is not `Send`.
    pub fn create_source_file(
        &self,
        path: impl Into<PathBuf>,
        tokens: TokenStream,
    ) -> Result<(), GeneratorError> {
        let path = path.into();
        let content = tokens.to_string();
        tracing::trace!(path = %path.display(), bytes = content.len(), "rendered source file");
        let mut files = self
            .files
            .lock()
            .map_err(|_| GeneratorError::CodeGenError("source tree lock poisoned".to_string()))?;
        files.insert(path, content);
        Ok(())
    }

    pub fn contains(&self, path: impl AsRef<Path>) -> bool {
        self.files
            .lock()
            .map(|files| files.contains_key(path.as_ref()))
            .unwrap_or(false)
    }

    /// Rendered text of one unit
    pub fn get(&self, path: impl AsRef<Path>) -> Option<String> {
        self.files
            .lock()
            .ok()
            .and_then(|files| files.get(path.as_ref()).cloned())
    }

    pub fn len(&self) -> usize {
        self.files.lock().map(|files| files.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Consume the tree, yielding units in path order
    pub fn into_files(self) -> Result<BTreeMap<PathBuf, String>, GeneratorError> {
        self.files
            .into_inner()
            .map_err(|_| GeneratorError::CodeGenError("source tree lock poisoned".to_string()))
    }
}

/// Nesting depth of the module a file defines, relative to the output root
///
/// `enums/role.rs` is two levels deep, `enums/mod.rs` one.
pub fn module_depth(path: &Path) -> usize {
    let components = path.components().count();
    if path.file_name().is_some_and(|name| name == "mod.rs") {
        components - 1
    } else {
        components
    }
}

/// Path from a module back to the output root, e.g. `super::super`
pub fn root_path(depth: usize) -> TokenStream {
    let supers = std::iter::repeat_n(format_ident!("super"), depth.max(1));
    quote! { #(#supers)::* }
}

/// Root path for the file at `path`
pub fn root_path_for(path: &Path) -> TokenStream {
    root_path(module_depth(path))
}

/// Identifier of a generated type
pub fn type_ident(name: &str) -> Ident {
    escape_rust_keyword(name)
}

/// `#[doc]` attributes for optional documentation text
pub fn doc_attrs(docs: Option<&str>) -> TokenStream {
    let Some(docs) = docs else {
        return quote! {};
    };
    let lines = docs.lines().map(|line| format!(" {}", line.trim_end()));
    quote! { #(#[doc = #lines])* }
}

/// Inner attributes every generated file starts with
pub fn file_header(title: &str) -> TokenStream {
    let title = format!(" {}", title);
    quote! {
        #![doc = #title]
        #![doc = ""]
        #![doc = " @generated"]

        #![allow(missing_docs)]
        #![allow(unused_imports)]
        #![allow(clippy::all)]
    }
}

/// One child module of a manifest and the names it re-exports
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleEntry {
    pub module: String,
    pub exports: Vec<String>,
}

impl ModuleEntry {
    pub fn new(module: impl Into<String>, exports: Vec<String>) -> Self {
        Self {
            module: module.into(),
            exports,
        }
    }

    /// Module with no re-exports (a sub-directory)
    pub fn nested(module: impl Into<String>) -> Self {
        Self::new(module, Vec::new())
    }
}

/// Manifest (`mod.rs`) declaring and re-exporting child modules
pub fn module_index(title: &str, entries: &[ModuleEntry]) -> TokenStream {
    let header = file_header(title);
    let items = entries.iter().map(|entry| {
        let module = format_ident!("{}", entry.module);
        let exports = entry.exports.iter().map(|name| type_ident(name));
        let reexport = if entry.exports.is_empty() {
            quote! {}
        } else {
            quote! { pub use #module::{#(#exports),*}; }
        };
        quote! {
            pub mod #module;
            #reexport
        }
    });
    quote! {
        #header
        #(#items)*
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_depth() {
        assert_eq!(module_depth(Path::new("mod.rs")), 0);
        assert_eq!(module_depth(Path::new("enums/mod.rs")), 1);
        assert_eq!(module_depth(Path::new("enums/role.rs")), 2);
        assert_eq!(module_depth(Path::new("resolvers/crud/post/args/mod.rs")), 4);
        assert_eq!(root_path(3).to_string(), "super :: super :: super");
    }

    #[test]
    fn test_source_tree_overwrites() {
        let tree = SourceTree::new();
        tree.create_source_file("enums/mod.rs", quote! { pub mod a; }).unwrap();
        tree.create_source_file("enums/mod.rs", quote! { pub mod b; }).unwrap();
        assert_eq!(tree.len(), 1);
        assert!(tree.get("enums/mod.rs").unwrap().contains("b"));
        assert!(tree.contains("enums/mod.rs"));
        assert!(!tree.contains("models/mod.rs"));
    }

    #[test]
    fn test_module_index() {
        let index = module_index(
            "Enums",
            &[
                ModuleEntry::new("role", vec!["Role".to_string()]),
                ModuleEntry::nested("args"),
            ],
        );
        let file = syn::parse2::<syn::File>(index).unwrap();
        let text = prettyplease::unparse(&file);
        assert!(text.contains("pub mod role;"));
        assert!(text.contains("pub use role::{Role};") || text.contains("pub use role::Role;"));
        assert!(text.contains("pub mod args;"));
        assert!(text.contains("@generated"));
    }
}
