//! Rules command implementation.

use anyhow::{bail, Result};
use dtoforge::schema::DtoClass;
use std::fmt::Write;

use crate::config_resolver::ConfigSource;

/// Runs the rules command.
pub fn run(class: Option<&str>, source: &ConfigSource) -> Result<()> {
    let project = super::load_project(source)?;
    let schema = project.schema();

    if let Some(name) = class {
        let Some(found) = schema.class(name) else {
            bail!("Unknown DTO class `{name}`");
        };
        print!("{}", render(found));
        return Ok(());
    }

    if schema.is_empty() {
        println!("No DTO classes declared.");
        return Ok(());
    }

    for class in schema.classes() {
        println!("{}", render(class));
    }

    for dangling in schema.dangling_references() {
        println!(
            "\x1b[33mwarning\x1b[0m: {}.{} collects unknown class `{}`",
            dangling.class, dangling.field, dangling.target
        );
    }

    Ok(())
}

fn render(class: &DtoClass) -> String {
    let rules = class.rules();
    let width = rules.iter().map(|(key, _)| key.len()).max().unwrap_or(0);

    let mut out = format!("{}\n", class.name());
    for (key, rule) in rules.iter() {
        let _ = writeln!(out, "  {key:<width$}  {rule}");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use dtoforge::Project;

    #[test]
    fn renders_aligned_rules() {
        let project = Project::from_toml(
            r#"
[[dto]]
name = "Member"

[[dto.fields]]
name = "groups"
type = "array<string>"

[[dto.fields]]
name = "nickname"
type = "?string"
rules = "max:20"
"#,
        )
        .unwrap();

        let member = project.schema().class("Member").unwrap();
        assert_eq!(
            render(member),
            "Member\n  groups    required|array\n  groups.*  string\n  nickname  max:20|nullable|string\n"
        );
    }
}
