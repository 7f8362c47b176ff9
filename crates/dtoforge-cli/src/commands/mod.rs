//! Subcommand implementations.

pub mod hydrate;
pub mod init;
pub mod list_rules;
pub mod output;
pub mod rules;

use anyhow::{Context, Result};
use dtoforge::Project;

use crate::config_resolver::ConfigSource;

/// Loads the project named by the resolved config source.
///
/// Without a config file the project has default settings and no classes.
pub fn load_project(source: &ConfigSource) -> Result<Project> {
    match source {
        ConfigSource::Default => {
            tracing::info!("No dtoforge.toml found, using defaults");
            Project::from_toml("").context("Failed to build default project")
        }
        other => {
            // Invariant: non-Default variants always have a path
            let p = other.path().context("resolved config has no path")?;
            if source.is_global() {
                tracing::info!("Using global config: {}", p.display());
            }
            Project::load(p).with_context(|| format!("Failed to load config: {}", p.display()))
        }
    }
}
