//! List rules command implementation.

use dtoforge::rules::rule_catalog;

/// Runs the list-rules command.
pub fn run() {
    println!("Available rules:\n");
    println!("{:<20} {:<22} Description", "Name", "Parameters");
    println!("{}", "-".repeat(80));

    for rule in rule_catalog() {
        println!("{:<20} {:<22} {}", rule.name, rule.params, rule.description);
        if !rule.aliases.is_empty() {
            println!("{:<20} {:<22} (alias: {})", "", "", rule.aliases.join(", "));
        }
    }

    println!("\nRules are joined with `|`, e.g.:");
    println!("  rules = \"required|string|max:255\"");
    println!("  rules = \"required_with:buildingNumber\"");
    println!("  rules = \"regex:/^[a-z]+(-[a-z]+)*$/i\"");
}
