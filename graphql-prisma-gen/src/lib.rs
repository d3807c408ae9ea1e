//! graphql-prisma-gen
//!
//! Generates an async-graphql API (object types, input types, enums and
//! resolvers) from the DMMF document of a Prisma schema.
//!
//! ```no_run
//! use graphql_prisma_gen::{GeneratorOptions, Pipeline};
//!
//! let json = std::fs::read_to_string("dmmf.json")?;
//! let raw = graphql_prisma_gen::dmmf::raw::Document::from_json(&json)?;
//! let report = Pipeline::new(GeneratorOptions::new("src/generated")).run(&raw)?;
//! println!("wrote {} files", report.files.len());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![recursion_limit = "256"]

pub mod auxiliary;
pub mod blocks;
pub mod config;
pub mod dmmf;
pub mod emit;
mod error;
pub mod format;
pub mod metrics;
pub mod pipeline;

pub use config::{EmitBlock, FormatStrategy, GeneratorOptions};
pub use dmmf::DmmfDocument;
pub use error::{FormatError, GeneratorError};
pub use metrics::{GenerationReport, MetricEvent, MetricsCollector, MetricsListener};
pub use pipeline::{generate, Pipeline, PipelineState};
