//! Generation pipeline
//!
//! One run moves through a fixed sequence of states:
//!
//! ```text
//! Idle -> DirectorySetup -> SemanticModelBuilt -> BlocksEmitted
//!      -> AuxiliaryEmitted -> Persisted -> [Formatted] -> Done
//! ```
//!
//! Any error moves the run to `Failed`. A failed run may leave a partial
//! output directory behind; the next run's directory setup clears it.

use crate::auxiliary::emit_auxiliary;
use crate::blocks::BlockOrchestrator;
use crate::config::{FormatStrategy, GeneratorOptions};
use crate::dmmf::{raw, DmmfDocument};
use crate::emit::SourceTree;
use crate::error::GeneratorError;
use crate::format::format_output;
use crate::metrics::{GenerationReport, MetricsCollector, MetricsListener};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Instant;
use syn::ext::IdentExt;

/// File written in bundled mode
pub const BUNDLE_FILE: &str = "bundle.rs";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    DirectorySetup,
    SemanticModelBuilt,
    BlocksEmitted,
    AuxiliaryEmitted,
    Persisted,
    Formatted,
    Done,
    Failed,
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineState::Idle => "idle",
            PipelineState::DirectorySetup => "directory setup",
            PipelineState::SemanticModelBuilt => "semantic model built",
            PipelineState::BlocksEmitted => "blocks emitted",
            PipelineState::AuxiliaryEmitted => "auxiliary emitted",
            PipelineState::Persisted => "persisted",
            PipelineState::Formatted => "formatted",
            PipelineState::Done => "done",
            PipelineState::Failed => "failed",
        };
        f.write_str(name)
    }
}

pub struct Pipeline {
    options: GeneratorOptions,
    state: PipelineState,
    metrics: MetricsCollector,
}

impl Pipeline {
    pub fn new(options: GeneratorOptions) -> Self {
        let metrics = MetricsCollector::new(options.verbose_logging);
        Self {
            options,
            state: PipelineState::Idle,
            metrics,
        }
    }

    /// Forward metric events to `listener`
    pub fn with_listener(mut self, listener: impl MetricsListener + 'static) -> Self {
        self.metrics = MetricsCollector::new(self.options.verbose_logging).with_listener(listener);
        self
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    fn transition(&mut self, next: PipelineState) {
        tracing::debug!(from = %self.state, to = %next, "pipeline state");
        self.state = next;
    }

    /// Generate the whole output tree for `raw`
    pub fn run(&mut self, raw: &raw::Document) -> Result<GenerationReport, GeneratorError> {
        let started = Instant::now();
        match self.execute(raw) {
            Ok((files, warnings)) => {
                self.transition(PipelineState::Done);
                self.metrics.record("total", started.elapsed(), Some(files.len()));
                tracing::info!(
                    files = files.len(),
                    output = %self.options.output_dir.display(),
                    elapsed = ?started.elapsed(),
                    "generation finished"
                );
                Ok(GenerationReport {
                    output_dir: self.options.output_dir.clone(),
                    files,
                    events: self.metrics.events().to_vec(),
                    warnings,
                    total_ms: started.elapsed().as_secs_f64() * 1000.0,
                })
            }
            Err(e) => {
                tracing::error!(state = %self.state, error = %e, "generation failed");
                self.transition(PipelineState::Failed);
                Err(e)
            }
        }
    }

    fn execute(&mut self, raw: &raw::Document) -> Result<(Vec<PathBuf>, Vec<String>), GeneratorError> {
        let output_dir = self.options.output_dir.clone();

        self.transition(PipelineState::DirectorySetup);
        let start = Instant::now();
        setup_directory(&output_dir)?;
        self.metrics.record("directorySetup", start.elapsed(), None);

        let start = Instant::now();
        let doc = DmmfDocument::new(raw, &self.options)?;
        self.transition(PipelineState::SemanticModelBuilt);
        self.metrics.record("semanticModel", start.elapsed(), Some(doc.models.len()));

        let tree = SourceTree::new();
        let blocks = BlockOrchestrator::new().run(&doc, &tree, &mut self.metrics)?;
        self.transition(PipelineState::BlocksEmitted);

        let start = Instant::now();
        let auxiliary = emit_auxiliary(&doc, &tree, &blocks.generated_output_types)?;
        self.transition(PipelineState::AuxiliaryEmitted);
        self.metrics.record("auxiliary", start.elapsed(), Some(auxiliary));

        let start = Instant::now();
        let files = tree.into_files()?;
        let written = if self.options.emit_bundled {
            persist_bundle(&output_dir, &files)?
        } else {
            persist_source(&output_dir, &files)?
        };
        self.transition(PipelineState::Persisted);
        self.metrics.record("persist", start.elapsed(), Some(written.len()));

        let mut warnings = Vec::new();
        if self.options.format != FormatStrategy::Disabled {
            let start = Instant::now();
            let absolute: Vec<PathBuf> = written.iter().map(|p| output_dir.join(p)).collect();
            for error in format_output(self.options.format, &absolute) {
                tracing::warn!(path = %error.path.display(), "{}", error.message);
                warnings.push(error.to_string());
            }
            self.transition(PipelineState::Formatted);
            self.metrics.record("format", start.elapsed(), Some(absolute.len()));
        }

        Ok((written, warnings))
    }
}

/// Decode a raw document and run the pipeline with `options`
pub fn generate(schema_json: &str, options: GeneratorOptions) -> Result<GenerationReport, GeneratorError> {
    let raw = raw::Document::from_json(schema_json)?;
    Pipeline::new(options).run(&raw)
}

/// Recreate `dir` empty
fn setup_directory(dir: &Path) -> Result<(), GeneratorError> {
    if dir.exists() {
        std::fs::remove_dir_all(dir).map_err(|e| GeneratorError::io(dir, e))?;
    }
    std::fs::create_dir_all(dir).map_err(|e| GeneratorError::io(dir, e))
}

fn write_file(path: &Path, content: &str) -> Result<(), GeneratorError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| GeneratorError::io(parent, e))?;
    }
    std::fs::write(path, content).map_err(|e| GeneratorError::io(path, e))
}

/// Write every unit as its own file
fn persist_source(dir: &Path, files: &BTreeMap<PathBuf, String>) -> Result<Vec<PathBuf>, GeneratorError> {
    for (path, content) in files {
        write_file(&dir.join(path), content)?;
    }
    Ok(files.keys().cloned().collect())
}

/// Fold the tree into one file of inline modules
fn persist_bundle(dir: &Path, files: &BTreeMap<PathBuf, String>) -> Result<Vec<PathBuf>, GeneratorError> {
    let bundle = inline_modules(files, Path::new("mod.rs"))?;
    write_file(&dir.join(BUNDLE_FILE), &prettyplease::unparse(&bundle))?;
    Ok(vec![PathBuf::from(BUNDLE_FILE)])
}

/// Directory holding the children of the module defined at `path`
fn module_dir(path: &Path) -> PathBuf {
    let parent = path.parent().map(Path::to_path_buf).unwrap_or_default();
    match path.file_stem() {
        Some(stem) if path.file_name().is_some_and(|name| name != "mod.rs") => parent.join(stem),
        _ => parent,
    }
}

fn inline_modules(files: &BTreeMap<PathBuf, String>, path: &Path) -> Result<syn::File, GeneratorError> {
    let content = files
        .get(path)
        .ok_or_else(|| GeneratorError::CodeGenError(format!("missing module file {}", path.display())))?;
    let mut file = syn::parse_file(content)
        .map_err(|e| GeneratorError::CodeGenError(format!("{}: {}", path.display(), e)))?;

    // Replace each `mod x;` with the contents of x.rs or x/mod.rs
    let dir = module_dir(path);
    for item in &mut file.items {
        let syn::Item::Mod(module) = item else {
            continue;
        };
        if module.content.is_some() {
            continue;
        }
        let name = module.ident.unraw().to_string();
        let flat = dir.join(format!("{}.rs", name));
        let child = if files.contains_key(&flat) {
            flat
        } else {
            dir.join(&name).join("mod.rs")
        };
        let inner = inline_modules(files, &child)?;
        // keep the child's header attributes on the inline module
        module.attrs.extend(inner.attrs);
        module.content = Some((Default::default(), inner.items));
        module.semi = None;
    }
    Ok(file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EmitBlock;
    use crate::dmmf::fixtures;
    use std::sync::{Arc, Mutex};

    fn options(dir: &Path) -> GeneratorOptions {
        let mut options = GeneratorOptions::new(dir);
        options.emit_bundled = false;
        options
    }

    fn read(dir: &Path, path: &str) -> String {
        std::fs::read_to_string(dir.join(path)).unwrap()
    }

    #[test]
    fn test_single_model_without_relations() {
        let tmp = tempfile::tempdir().unwrap();
        let out = tmp.path().join("generated");
        let mut pipeline = Pipeline::new(options(&out));
        let report = pipeline.run(&fixtures::single_post()).unwrap();
        assert_eq!(pipeline.state(), PipelineState::Done);

        assert!(read(&out, "models/post.rs").contains("pub struct Post"));
        for input in ["post_where_input", "post_where_unique_input", "post_create_input", "post_update_input"] {
            assert!(out.join(format!("resolvers/inputs/{input}.rs")).exists(), "{input}");
        }
        for action in [
            "find_unique_post_resolver",
            "find_many_post_resolver",
            "create_one_post_resolver",
            "update_one_post_resolver",
            "delete_one_post_resolver",
        ] {
            assert!(out.join(format!("resolvers/crud/post/{action}.rs")).exists(), "{action}");
        }
        assert!(!out.join("resolvers/relations").exists());
        assert!(!read(&out, "resolvers/mod.rs").contains("relations"));
        for file in ["mod.rs", "enhance.rs", "helpers.rs", "scalars.rs"] {
            assert!(out.join(file).exists(), "{file}");
        }
        assert_eq!(report.items("crudResolvers"), Some(6));
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_emit_only_enums_and_models() {
        let tmp = tempfile::tempdir().unwrap();
        let out = tmp.path().join("generated");
        let mut config = BTreeMap::new();
        config.insert("output".to_string(), out.display().to_string());
        config.insert("emitOnly".to_string(), "enums,models".to_string());
        let options = GeneratorOptions::from_config(&config).unwrap();
        Pipeline::new(options).run(&fixtures::blog()).unwrap();

        assert!(out.join("enums/mod.rs").exists());
        assert!(out.join("models/user.rs").exists());
        assert!(!out.join("resolvers").exists());
        let root = read(&out, "mod.rs");
        assert!(root.contains("pub mod enums;"));
        assert!(!root.contains("resolvers"));
    }

    #[test]
    fn test_relation_resolvers_filter_by_id() {
        let tmp = tempfile::tempdir().unwrap();
        let out = tmp.path().join("generated");
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = events.clone();
        let report = Pipeline::new(options(&out))
            .with_listener(move |event: &crate::metrics::MetricEvent| {
                sink.lock().unwrap().push(event.phase.clone());
            })
            .run(&fixtures::blog())
            .unwrap();

        let user = read(&out, "resolvers/relations/user/user_relations_resolver.rs");
        assert!(user.contains("pub struct UserRelationsResolver"));
        assert!(user.replace(' ', "").contains("\"id\":parent.id"));
        assert!(out.join("resolvers/relations/post/post_relations_resolver.rs").exists());
        assert_eq!(report.items("relationResolvers"), Some(2));

        let phases = events.lock().unwrap();
        assert_eq!(phases.first().map(String::as_str), Some("directorySetup"));
        assert!(phases.iter().any(|p| p == "format"));
    }

    #[test]
    fn test_composite_types_get_objects_only() {
        let tmp = tempfile::tempdir().unwrap();
        let out = tmp.path().join("generated");
        let report = Pipeline::new(options(&out)).run(&fixtures::blog_with_address()).unwrap();

        assert!(read(&out, "models/address.rs").contains("pub struct Address"));
        assert!(read(&out, "models/user.rs").replace(' ', "").contains("pubaddress:super::super::models::Address"));
        assert!(!out.join("resolvers/crud/address").exists());
        assert!(!out.join("resolvers/relations/address").exists());
        let user_relations = read(&out, "resolvers/relations/user/user_relations_resolver.rs");
        assert!(!user_relations.contains("address"));
        assert!(!read(&out, "enhance.rs").contains("\"Address\""));
        assert_eq!(report.items("relationResolvers"), Some(2));
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_disabled_relation_resolvers_leave_no_references() {
        let tmp = tempfile::tempdir().unwrap();
        let out = tmp.path().join("generated");
        let mut options = options(&out);
        options.blocks.remove(&EmitBlock::RelationResolvers);
        Pipeline::new(options).run(&fixtures::blog()).unwrap();

        assert!(!out.join("resolvers/relations").exists());
        for (path, content) in walk(&out) {
            assert!(!content.contains("relations"), "{} references relations", path.display());
        }
    }

    #[test]
    fn test_bundled_output() {
        let tmp = tempfile::tempdir().unwrap();
        let out = tmp.path().join("target").join("generated");
        let options = GeneratorOptions::new(&out);
        assert!(options.emit_bundled);
        let report = Pipeline::new(options).run(&fixtures::blog()).unwrap();

        assert_eq!(report.files, vec![PathBuf::from(BUNDLE_FILE)]);
        let bundle = read(&out, BUNDLE_FILE);
        assert!(bundle.contains("pub mod models {"));
        assert!(bundle.contains("pub mod crud {"));
        assert!(!out.join("models").exists());
        syn::parse_file(&bundle).unwrap();
    }

    #[test]
    fn test_rerun_clears_previous_output() {
        let tmp = tempfile::tempdir().unwrap();
        let out = tmp.path().join("generated");
        std::fs::create_dir_all(out.join("stale")).unwrap();
        std::fs::write(out.join("stale/old.rs"), "").unwrap();

        let mut options = options(&out);
        options.format = FormatStrategy::Disabled;
        let report = Pipeline::new(options).run(&fixtures::blog()).unwrap();
        assert!(!out.join("stale").exists());
        assert!(report.events.iter().all(|e| e.phase != "format"));
    }

    #[test]
    fn test_schema_errors_fail_the_run() {
        let tmp = tempfile::tempdir().unwrap();
        let mut value = fixtures::blog_json();
        value["mappings"]["modelOperations"][0]["findMany"] = serde_json::json!("findManyMissing");
        let raw: raw::Document = serde_json::from_value(value).unwrap();

        let mut pipeline = Pipeline::new(options(&tmp.path().join("generated")));
        let err = pipeline.run(&raw).unwrap_err();
        assert!(matches!(err, GeneratorError::MissingMappedField { .. }));
        assert_eq!(pipeline.state(), PipelineState::Failed);
    }

    #[test]
    fn test_module_dir() {
        assert_eq!(module_dir(Path::new("mod.rs")), PathBuf::new());
        assert_eq!(module_dir(Path::new("resolvers/mod.rs")), PathBuf::from("resolvers"));
        assert_eq!(module_dir(Path::new("models/user.rs")), PathBuf::from("models/user"));
    }

    fn walk(dir: &Path) -> Vec<(PathBuf, String)> {
        let mut files = Vec::new();
        for entry in std::fs::read_dir(dir).unwrap() {
            let path = entry.unwrap().path();
            if path.is_dir() {
                files.extend(walk(&path));
            } else {
                let content = std::fs::read_to_string(&path).unwrap();
                files.push((path, content));
            }
        }
        files
    }
}
