//! Generator options
//!
//! Options arrive as a flat key/value map (the ORM generator block, CLI `-c`
//! pairs or a TOML file) and are resolved once, before anything is written.

use crate::error::GeneratorError;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Component, Path, PathBuf};

/// Default import path of the upstream client in emitted code
pub const DEFAULT_CLIENT_IMPORT_PATH: &str = "crate::prisma";

/// Category of generated output
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EmitBlock {
    Enums,
    Models,
    Inputs,
    Outputs,
    RelationResolvers,
    CrudResolvers,
}

impl EmitBlock {
    /// Every block, in emission order
    pub const ALL: [EmitBlock; 6] = [
        EmitBlock::Enums,
        EmitBlock::Models,
        EmitBlock::Outputs,
        EmitBlock::Inputs,
        EmitBlock::RelationResolvers,
        EmitBlock::CrudResolvers,
    ];

    /// Config spelling
    pub fn as_str(&self) -> &'static str {
        match self {
            EmitBlock::Enums => "enums",
            EmitBlock::Models => "models",
            EmitBlock::Inputs => "inputs",
            EmitBlock::Outputs => "outputs",
            EmitBlock::RelationResolvers => "relationResolvers",
            EmitBlock::CrudResolvers => "crudResolvers",
        }
    }

    fn parse(value: &str) -> Option<Self> {
        EmitBlock::ALL.into_iter().find(|b| b.as_str() == value)
    }

    /// Blocks whose types this block references
    fn dependencies(&self) -> &'static [EmitBlock] {
        match self {
            EmitBlock::Enums => &[],
            EmitBlock::Models | EmitBlock::Inputs => &[EmitBlock::Enums],
            EmitBlock::Outputs => &[EmitBlock::Enums, EmitBlock::Models],
            EmitBlock::RelationResolvers | EmitBlock::CrudResolvers => {
                &[EmitBlock::Models, EmitBlock::Inputs, EmitBlock::Outputs]
            }
        }
    }
}

/// Close a requested set of blocks over their dependencies
pub fn blocks_to_emit(requested: &[EmitBlock]) -> BTreeSet<EmitBlock> {
    let mut blocks = BTreeSet::new();
    let mut pending: Vec<EmitBlock> = requested.to_vec();
    while let Some(block) = pending.pop() {
        if blocks.insert(block) {
            pending.extend_from_slice(block.dependencies());
        }
    }
    blocks
}

/// Post-processing applied to the written tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormatStrategy {
    /// Re-print every file with prettyplease
    #[default]
    Prettyplease,
    /// Run the external rustfmt binary
    Rustfmt,
    /// Parse every file with syn and report syntax errors only
    Check,
    /// Leave the rendered token text as is
    Disabled,
}

impl FormatStrategy {
    fn parse(value: &str) -> Option<Self> {
        match value {
            "prettyplease" => Some(FormatStrategy::Prettyplease),
            "rustfmt" => Some(FormatStrategy::Rustfmt),
            "check" => Some(FormatStrategy::Check),
            "false" => Some(FormatStrategy::Disabled),
            _ => None,
        }
    }
}

/// Fully resolved generator options
#[derive(Debug, Clone)]
pub struct GeneratorOptions {
    pub output_dir: PathBuf,
    pub emit_bundled: bool,
    pub format: FormatStrategy,
    pub blocks: BTreeSet<EmitBlock>,
    pub use_simple_inputs: bool,
    pub use_unchecked_scalar_inputs: bool,
    pub use_original_mapping: bool,
    pub omit_input_fields_by_default: Vec<String>,
    pub omit_output_fields_by_default: Vec<String>,
    pub verbose_logging: bool,
    pub client_import_path: String,
    pub emit_id_as_id_type: bool,
}

impl GeneratorOptions {
    /// Options with every default applied for the given output directory
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        let output_dir = output_dir.into();
        Self {
            emit_bundled: is_dependency_dir(&output_dir),
            output_dir,
            format: FormatStrategy::default(),
            blocks: EmitBlock::ALL.into_iter().collect(),
            use_simple_inputs: false,
            use_unchecked_scalar_inputs: false,
            use_original_mapping: false,
            omit_input_fields_by_default: Vec::new(),
            omit_output_fields_by_default: Vec::new(),
            verbose_logging: false,
            client_import_path: DEFAULT_CLIENT_IMPORT_PATH.to_string(),
            emit_id_as_id_type: false,
        }
    }

    /// Resolve options from a flat key/value map
    pub fn from_config(config: &BTreeMap<String, String>) -> Result<Self, GeneratorError> {
        let output = config
            .get("output")
            .ok_or_else(|| GeneratorError::MissingOption("output".to_string()))?;
        let mut options = GeneratorOptions::new(output);

        for (key, value) in config {
            let value = value.trim();
            match key.as_str() {
                "output" => {}
                "emitBundled" => options.emit_bundled = parse_bool(key, value)?,
                "formatGeneratedCode" => {
                    options.format =
                        FormatStrategy::parse(value).ok_or_else(|| GeneratorError::InvalidOption {
                            key: key.clone(),
                            value: value.to_string(),
                            expected: "one of prettyplease, rustfmt, check, false".to_string(),
                        })?;
                }
                "emitOnly" => {
                    let mut requested = Vec::new();
                    for item in split_list(value) {
                        let block =
                            EmitBlock::parse(&item).ok_or_else(|| GeneratorError::InvalidOption {
                                key: key.clone(),
                                value: item.clone(),
                                expected: format!(
                                    "one of {}",
                                    EmitBlock::ALL.map(|b| b.as_str()).join(", ")
                                ),
                            })?;
                        requested.push(block);
                    }
                    options.blocks = blocks_to_emit(&requested);
                }
                "useSimpleInputs" => options.use_simple_inputs = parse_bool(key, value)?,
                "useUncheckedScalarInputs" => {
                    options.use_unchecked_scalar_inputs = parse_bool(key, value)?
                }
                "useOriginalMapping" => options.use_original_mapping = parse_bool(key, value)?,
                "omitInputFieldsByDefault" => {
                    options.omit_input_fields_by_default = split_list(value)
                }
                "omitOutputFieldsByDefault" => {
                    options.omit_output_fields_by_default = split_list(value)
                }
                "verboseLogging" => options.verbose_logging = parse_bool(key, value)?,
                "customPrismaImportPath" => {
                    if syn::parse_str::<syn::Path>(value).is_err() {
                        return Err(GeneratorError::InvalidOption {
                            key: key.clone(),
                            value: value.to_string(),
                            expected: "a Rust module path".to_string(),
                        });
                    }
                    options.client_import_path = value.to_string();
                }
                "emitIdAsIDType" => options.emit_id_as_id_type = parse_bool(key, value)?,
                other => tracing::debug!(key = other, "ignoring unknown generator option"),
            }
        }

        Ok(options)
    }

    /// Whether a block is part of this run
    pub fn emits(&self, block: EmitBlock) -> bool {
        self.blocks.contains(&block)
    }
}

/// Output inside a build or dependency directory is bundled into one file
pub fn is_dependency_dir(path: &Path) -> bool {
    path.components().any(|c| match c {
        Component::Normal(name) => name == "target" || name == ".cargo",
        _ => false,
    })
}

fn parse_bool(key: &str, value: &str) -> Result<bool, GeneratorError> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(GeneratorError::InvalidOption {
            key: key.to_string(),
            value: value.to_string(),
            expected: "true or false".to_string(),
        }),
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .trim_matches(|c| c == '[' || c == ']')
        .split(',')
        .map(|s| s.trim().trim_matches('"').to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Flatten a TOML table into the key/value form accepted by [`GeneratorOptions::from_config`]
pub fn flatten_toml(table: &toml::Table) -> BTreeMap<String, String> {
    table
        .iter()
        .map(|(key, value)| {
            let text = match value {
                toml::Value::String(s) => s.clone(),
                toml::Value::Array(items) => items
                    .iter()
                    .map(|item| match item {
                        toml::Value::String(s) => s.clone(),
                        other => other.to_string(),
                    })
                    .collect::<Vec<_>>()
                    .join(","),
                other => other.to_string(),
            };
            (key.clone(), text)
        })
        .collect()
}
