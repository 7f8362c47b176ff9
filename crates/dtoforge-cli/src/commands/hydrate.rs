//! Hydrate command implementation.

use anyhow::{Context, Result};
use serde_json::Value;
use std::io::Read;
use std::path::Path;

use crate::config_resolver::ConfigSource;
use crate::OutputFormat;

/// Runs the hydrate command.
pub fn run(class: &str, input: &Path, format: OutputFormat, source: &ConfigSource) -> Result<()> {
    let project = super::load_project(source)?;
    let value = read_input(input)?;

    tracing::debug!("Constructing {class}");

    match project.create(class, &value) {
        Ok(instance) => super::output::print(&instance, format),
        Err(err) => {
            super::output::print_error(err);
            std::process::exit(1);
        }
    }
}

fn read_input(input: &Path) -> Result<Value> {
    let content = if input == Path::new("-") {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read stdin")?;
        buffer
    } else {
        std::fs::read_to_string(input)
            .with_context(|| format!("Failed to read {}", input.display()))?
    };

    serde_json::from_str(&content).with_context(|| format!("Invalid JSON in {}", input.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn reads_json_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("input.json");
        fs::write(&path, r#"{"fullName": "Jane"}"#).unwrap();

        let value = read_input(&path).unwrap();
        assert_eq!(value["fullName"], "Jane");
    }

    #[test]
    fn rejects_invalid_json() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("input.json");
        fs::write(&path, "{ not json").unwrap();

        let err = read_input(&path).unwrap_err();
        assert!(err.to_string().starts_with("Invalid JSON in"));
    }

    #[test]
    fn missing_file() {
        let tmp = TempDir::new().unwrap();
        assert!(read_input(&tmp.path().join("absent.json")).is_err());
    }
}
