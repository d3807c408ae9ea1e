//! Post-processing of the written tree
//!
//! Runs after every file is on disk. Failures are collected and returned,
//! never raised: unformatted output is still valid.

use crate::config::FormatStrategy;
use crate::error::FormatError;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Apply `strategy` to `files`; returns the problems encountered
pub fn format_output(strategy: FormatStrategy, files: &[PathBuf]) -> Vec<FormatError> {
    match strategy {
        FormatStrategy::Disabled => Vec::new(),
        FormatStrategy::Prettyplease => files.par_iter().filter_map(|f| prettyplease_file(f).err()).collect(),
        FormatStrategy::Check => files.par_iter().filter_map(|f| check_file(f).err()).collect(),
        FormatStrategy::Rustfmt => rustfmt(files),
    }
}

fn read(path: &Path) -> Result<String, FormatError> {
    std::fs::read_to_string(path).map_err(|e| FormatError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

fn parse(path: &Path, content: &str) -> Result<syn::File, FormatError> {
    syn::parse_file(content).map_err(|e| FormatError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

fn prettyplease_file(path: &Path) -> Result<(), FormatError> {
    let content = read(path)?;
    let file = parse(path, &content)?;
    std::fs::write(path, prettyplease::unparse(&file)).map_err(|e| FormatError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

fn check_file(path: &Path) -> Result<(), FormatError> {
    let content = read(path)?;
    parse(path, &content).map(|_| ())
}

fn rustfmt(files: &[PathBuf]) -> Vec<FormatError> {
    let Some(first) = files.first() else {
        return Vec::new();
    };
    let output = Command::new("rustfmt")
        .arg("--edition")
        .arg("2021")
        .args(files)
        .output();
    match output {
        Ok(output) if output.status.success() => Vec::new(),
        Ok(output) => vec![FormatError {
            path: first.clone(),
            message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        }],
        Err(e) => vec![FormatError {
            path: first.clone(),
            message: format!("failed to run rustfmt: {}", e),
        }],
    }
}
