//! Input handling for lineage source files and stdin.

use anyhow::{Context, Result};
use lineagelens_core::LineageSource;
use std::io::{self, Read};
use std::path::Path;
use tracing::debug;

/// Raw lineage source text and where it came from.
#[derive(Debug, Clone)]
pub struct SourceInput {
    pub name: String,
    pub content: String,
}

/// Read lineage source JSON from a file, or from stdin when no path is given.
pub fn read_input(path: Option<&Path>) -> Result<SourceInput> {
    match path {
        Some(path) => read_from_file(path),
        None => read_from_stdin(),
    }
}

/// Read and parse a lineage source.
pub fn load_source(path: Option<&Path>) -> Result<(String, LineageSource)> {
    let input = read_input(path)?;
    let source = parse_source(&input)?;
    Ok((input.name, source))
}

fn parse_source(input: &SourceInput) -> Result<LineageSource> {
    let source = LineageSource::from_json(&input.content)
        .with_context(|| format!("Failed to parse lineage source {}", input.name))?;
    debug!(
        source = %input.name,
        bytes = input.content.len(),
        items = source.item_count(),
        "parsed lineage source"
    );
    Ok(source)
}

fn read_from_stdin() -> Result<SourceInput> {
    let mut content = String::new();
    io::stdin()
        .read_to_string(&mut content)
        .context("Failed to read from stdin")?;

    Ok(SourceInput {
        name: "<stdin>".to_string(),
        content,
    })
}

fn read_from_file(path: &Path) -> Result<SourceInput> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;

    Ok(SourceInput {
        name: path.display().to_string(),
        content,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_source_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"{{ "depths": [ {{ "level": 0, "groups": [] }} ] }}"#
        )
        .unwrap();

        let (name, source) = load_source(Some(file.path())).unwrap();
        assert_eq!(name, file.path().display().to_string());
        assert_eq!(source.depths.len(), 1);
    }

    #[test]
    fn test_parse_error_names_the_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "not json").unwrap();

        let err = load_source(Some(file.path())).unwrap_err();
        assert!(format!("{err:#}").contains("Failed to parse lineage source"));
    }

    #[test]
    fn test_read_missing_file() {
        let result = read_input(Some(&PathBuf::from("/nonexistent/lineage.json")));
        assert!(result.is_err());
    }
}
