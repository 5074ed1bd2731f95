//! Schema discovery: glob resolution, exclusion handling, model-name derivation.

use crate::error::ConfigError;
use glob::Pattern;
use std::collections::HashSet;
use std::path::PathBuf;

/// One schema file resolved from the configured patterns.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DiscoveredSchema {
    /// Absolute path to the file.
    pub path: PathBuf,
    /// File name with extension, used in error messages (`animal.json`).
    pub base: String,
    /// File stem (`animal`), the factory-registry key.
    pub stem: String,
    /// Derived model name: stem with the first letter capitalized (`Animal`).
    pub name: String,
}

/// Resolves the patterns to an ordered, deduplicated set of files.
///
/// Inclusion patterns apply in order; a `!`-prefixed pattern net-removes its
/// matches from the final set wherever it appears in the list. Directory
/// matches are skipped. Two files sharing a stem collide on model name and
/// the last-resolved one wins when models are collected.
pub fn discover(patterns: &[String]) -> Result<Vec<DiscoveredSchema>, ConfigError> {
    let mut excludes = Vec::new();
    let mut includes = Vec::new();
    for pattern in patterns {
        match pattern.strip_prefix('!') {
            Some(negated) => excludes.push(compile(negated)?),
            None => includes.push(pattern.as_str()),
        }
    }

    let mut seen = HashSet::new();
    let mut matched: Vec<PathBuf> = Vec::new();
    for pattern in includes {
        let paths = glob::glob(pattern).map_err(|e| ConfigError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;
        for entry in paths {
            let path = entry.map_err(|e| ConfigError::InvalidPattern {
                pattern: pattern.to_string(),
                reason: e.to_string(),
            })?;
            if !path.is_file() {
                continue;
            }
            if seen.insert(path.clone()) {
                matched.push(path);
            }
        }
    }

    matched.retain(|path| !excludes.iter().any(|x| x.matches_path(path)));

    matched.into_iter().map(describe).collect()
}

fn compile(pattern: &str) -> Result<Pattern, ConfigError> {
    Pattern::new(pattern).map_err(|e| ConfigError::InvalidPattern {
        pattern: format!("!{pattern}"),
        reason: e.to_string(),
    })
}

fn describe(path: PathBuf) -> Result<DiscoveredSchema, ConfigError> {
    let base = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = capitalize(&stem);
    let path = if path.is_absolute() {
        path
    } else {
        std::env::current_dir()
            .map_err(|e| ConfigError::InvalidPattern {
                pattern: path.display().to_string(),
                reason: e.to_string(),
            })?
            .join(path)
    };
    Ok(DiscoveredSchema {
        path,
        base,
        stem,
        name,
    })
}

/// `animal` -> `Animal`; case of the remaining letters is preserved.
pub(crate) fn capitalize(stem: &str) -> String {
    let mut chars = stem.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
