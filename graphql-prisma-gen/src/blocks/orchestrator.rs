//! Fixed-order block execution
//!
//! Blocks run strictly one after another: enums, models, outputs, inputs,
//! relation resolvers, CRUD resolvers. Later blocks reference names the
//! earlier ones emitted.

use super::crud::CrudGenerator;
use super::enums::EnumsGenerator;
use super::inputs::InputsGenerator;
use super::models::ModelsGenerator;
use super::outputs::OutputsGenerator;
use super::relations::RelationsGenerator;
use super::{BlockGenerator, BlockMetrics};
use crate::config::EmitBlock;
use crate::dmmf::DmmfDocument;
use crate::emit::SourceTree;
use crate::error::GeneratorError;
use crate::metrics::MetricsCollector;

/// What the block pass produced
#[derive(Debug, Clone, Default)]
pub struct OrchestratorOutput {
    /// Blocks that emitted at least one item, in run order
    pub blocks: Vec<(EmitBlock, BlockMetrics)>,
    /// Output types emitted by the outputs block
    pub generated_output_types: Vec<String>,
}

impl OrchestratorOutput {
    pub fn emitted(&self, block: EmitBlock) -> bool {
        self.blocks.iter().any(|(b, _)| *b == block)
    }
}

pub struct BlockOrchestrator {
    generators: [Box<dyn BlockGenerator>; 6],
}

impl Default for BlockOrchestrator {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockOrchestrator {
    pub fn new() -> Self {
        Self {
            generators: [
                Box::new(EnumsGenerator),
                Box::new(ModelsGenerator),
                Box::new(OutputsGenerator),
                Box::new(InputsGenerator),
                Box::new(RelationsGenerator),
                Box::new(CrudGenerator),
            ],
        }
    }

    /// Block order of this orchestrator
    pub fn order(&self) -> Vec<EmitBlock> {
        self.generators.iter().map(|g| g.block()).collect()
    }

    pub fn run(
        &self,
        doc: &DmmfDocument,
        tree: &SourceTree,
        metrics: &mut MetricsCollector,
    ) -> Result<OrchestratorOutput, GeneratorError> {
        let mut output = OrchestratorOutput::default();

        for generator in &self.generators {
            if !generator.should_generate(doc) {
                tracing::debug!(block = generator.name(), "skipping block");
                continue;
            }

            let result = generator.generate(doc, tree)?;
            tracing::debug!(
                block = generator.name(),
                items = result.items,
                elapsed = ?result.elapsed,
                "block generated"
            );
            if result.items == 0 {
                continue;
            }

            metrics.record(generator.name(), result.elapsed, Some(result.items));
            if generator.block() == EmitBlock::Outputs {
                output.generated_output_types = doc
                    .generated_output_types()
                    .map(|o| o.type_name.clone())
                    .collect();
            }
            output.blocks.push((generator.block(), result));
        }

        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GeneratorOptions;
    use crate::dmmf::fixtures;

    #[test]
    fn test_fixed_order() {
        assert_eq!(BlockOrchestrator::new().order(), EmitBlock::ALL.to_vec());
    }

    #[test]
    fn test_run_all_blocks() {
        let doc = DmmfDocument::new(&fixtures::blog(), &GeneratorOptions::new("out")).unwrap();
        let tree = SourceTree::new();
        let mut metrics = MetricsCollector::new(false);
        let output = BlockOrchestrator::new().run(&doc, &tree, &mut metrics).unwrap();

        assert_eq!(output.blocks.len(), 6);
        assert!(output.generated_output_types.contains(&"AggregatePost".to_string()));
        assert!(!output.generated_output_types.contains(&"Post".to_string()));

        let phases: Vec<&str> = metrics.events().iter().map(|e| e.phase.as_str()).collect();
        assert_eq!(
            phases,
            vec!["enums", "models", "outputs", "inputs", "relationResolvers", "crudResolvers"]
        );
        assert!(tree.contains("resolvers/crud/mod.rs"));
    }

    #[test]
    fn test_disabled_blocks_are_not_reported() {
        let mut options = GeneratorOptions::new("out");
        options.blocks = [EmitBlock::Enums, EmitBlock::Models].into_iter().collect();
        let doc = DmmfDocument::new(&fixtures::blog(), &options).unwrap();
        let tree = SourceTree::new();
        let mut metrics = MetricsCollector::new(false);
        let output = BlockOrchestrator::new().run(&doc, &tree, &mut metrics).unwrap();

        assert_eq!(metrics.events().len(), 2);
        assert!(output.generated_output_types.is_empty());
        assert!(!output.emitted(EmitBlock::Inputs));
        assert!(!tree.contains("resolvers/inputs/mod.rs"));
    }
}
