//! Auxiliary emitters
//!
//! Files written after every block: the enhancement map, scalar
//! declarations, runtime helpers and the manifests tying the tree together.

pub mod enhance;
pub mod helpers;
pub mod index;
pub mod scalars;

use crate::dmmf::DmmfDocument;
use crate::emit::SourceTree;
use crate::error::GeneratorError;

/// Emit all auxiliary files; returns the number written
pub fn emit_auxiliary(
    doc: &DmmfDocument,
    tree: &SourceTree,
    generated_output_types: &[String],
) -> Result<usize, GeneratorError> {
    let mut written = 0;

    tree.create_source_file(
        enhance::ENHANCE_FILE,
        enhance::generate_enhance_map(doc, generated_output_types),
    )?;
    tree.create_source_file(scalars::SCALARS_FILE, scalars::generate_scalars())?;
    tree.create_source_file(helpers::HELPERS_FILE, helpers::generate_helpers(doc)?)?;
    written += 3;

    if let Some(resolvers) = index::generate_resolvers_index(tree) {
        tree.create_source_file("resolvers/mod.rs", resolvers)?;
        written += 1;
    }
    tree.create_source_file("mod.rs", index::generate_root_index(doc, tree))?;
    written += 1;

    tracing::debug!(files = written, "emitted auxiliary files");
    Ok(written)
}
