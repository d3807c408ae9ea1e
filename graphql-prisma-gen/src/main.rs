//! graphql-prisma-gen: generate an async-graphql API from a Prisma DMMF document
//!
//! Usage:
//!   prisma-dmmf | graphql-prisma-gen --output src/generated
//!   graphql-prisma-gen --schema dmmf.json -c emitOnly=enums,models -c output=gen

use clap::Parser;
use graphql_prisma_gen::config::flatten_toml;
use graphql_prisma_gen::dmmf::raw;
use graphql_prisma_gen::{GeneratorError, GeneratorOptions, Pipeline};
use std::collections::BTreeMap;
use std::io::{self, Read};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "graphql-prisma-gen")]
#[command(about = "Generate async-graphql types and resolvers from a Prisma DMMF document")]
struct Args {
    /// DMMF JSON document; read from stdin when omitted
    #[arg(short, long)]
    schema: Option<PathBuf>,

    /// Output directory, same as `-c output=<dir>`
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Generator option as key=value, repeatable
    #[arg(short = 'c', long = "config", value_parser = parse_key_value)]
    config: Vec<(String, String)>,

    /// TOML file with generator options; `-c` values take precedence
    #[arg(long)]
    config_file: Option<PathBuf>,
}

fn parse_key_value(value: &str) -> Result<(String, String), String> {
    let (key, value) = value
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got `{}`", value))?;
    Ok((key.trim().to_string(), value.trim().to_string()))
}

fn resolve_config(args: &Args) -> Result<BTreeMap<String, String>, GeneratorError> {
    let mut config = BTreeMap::new();
    if let Some(path) = &args.config_file {
        let text = std::fs::read_to_string(path).map_err(|e| GeneratorError::io(path, e))?;
        let table: toml::Table = toml::from_str(&text)
            .map_err(|e| GeneratorError::Parse(format!("{}: {}", path.display(), e)))?;
        config.extend(flatten_toml(&table));
    }
    config.extend(args.config.iter().cloned());
    if let Some(output) = &args.output {
        config.insert("output".to_string(), output.display().to_string());
    }
    Ok(config)
}

fn read_schema(path: Option<&PathBuf>) -> Result<String, GeneratorError> {
    match path {
        Some(path) => std::fs::read_to_string(path).map_err(|e| GeneratorError::io(path, e)),
        None => {
            let mut input = String::new();
            io::stdin()
                .read_to_string(&mut input)
                .map_err(|e| GeneratorError::io("<stdin>", e))?;
            Ok(input)
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let options = GeneratorOptions::from_config(&resolve_config(&args)?)?;

    let default_level = if options.verbose_logging { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(io::stderr)
        .init();

    let raw = raw::Document::from_json(&read_schema(args.schema.as_ref())?)?;
    let report = Pipeline::new(options).run(&raw)?;

    eprintln!(
        "Generated {} files in {} ({:.1} ms)",
        report.files.len(),
        report.output_dir.display(),
        report.total_ms
    );
    for warning in &report.warnings {
        eprintln!("warning: {}", warning);
    }

    Ok(())
}
