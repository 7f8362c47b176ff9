//! Init command implementation.

use anyhow::{bail, Result};
use std::path::Path;

const DEFAULT_CONFIG: &str = r#"# dtoforge configuration

[engine]
# Maximum nesting depth for nested and collection DTO fields
max_depth = 32

[validator]
# Trim leading and trailing whitespace from every string
trim_strings = true
# Treat empty strings as null
empty_string_as_null = true

# DTO classes
# `type` is a signature such as "string", "?int", "array<string>",
# "Address" (nested DTO) or "Collection<Address>".

[[dto]]
name = "Address"

[[dto.fields]]
name = "addressOne"
input = "address_one"
type = "string"
rules = "max:255"

[[dto.fields]]
name = "buildingNumber"
type = "?string"
rules = "max:10"

[[dto.fields]]
name = "floor"
type = "?string"
rules = "required_with:buildingNumber"

[[dto]]
name = "Customer"

[[dto.fields]]
name = "fullName"
type = "string"
rules = "max:100"

[[dto.fields]]
name = "addresses"
type = "Collection<Address>"
"#;

/// Runs the init command.
pub fn run(force: bool) -> Result<()> {
    write_config(Path::new("dtoforge.toml"), force)?;

    println!("Created dtoforge.toml");
    println!("\nNext steps:");
    println!("  1. Edit dtoforge.toml to declare your DTO classes");
    println!("  2. Run: dtoforge rules");
    println!("  3. Run: dtoforge hydrate --class Customer input.json");

    Ok(())
}

fn write_config(config_path: &Path, force: bool) -> Result<()> {
    if config_path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    std::fs::write(config_path, DEFAULT_CONFIG)?;
    Ok(())
}
