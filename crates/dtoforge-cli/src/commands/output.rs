//! Shared output formatting for constructed instances.

use anyhow::Result;
use dtoforge::{DtoError, DtoInstance, FieldValue};
use std::fmt::Write;

use crate::OutputFormat;

/// Print an instance in the specified format.
pub fn print(instance: &DtoInstance, format: OutputFormat) -> Result<()> {
    let rendered = match format {
        OutputFormat::Text => render_text(instance),
        OutputFormat::Json => serde_json::to_string_pretty(instance)?,
        OutputFormat::Compact => serde_json::to_string(instance)?,
    };
    println!("{rendered}");
    Ok(())
}

/// Print a construction failure to stderr.
pub fn print_error(err: DtoError) {
    let errors = match &err {
        DtoError::Validation { errors, .. } if errors.len() > 1 => Some(errors.clone()),
        _ => None,
    };

    eprintln!("{:?}", miette::Report::new(err));

    if let Some(errors) = errors {
        eprintln!("All field errors:");
        for (key, messages) in errors.iter() {
            for message in messages {
                eprintln!("  \x1b[31m{key}\x1b[0m: {message}");
            }
        }
    }
}

fn render_text(instance: &DtoInstance) -> String {
    let mut out = String::new();
    out.push_str(instance.class());
    write_fields(&mut out, instance, 1);
    out
}

fn write_fields(out: &mut String, instance: &DtoInstance, indent: usize) {
    let pad = "  ".repeat(indent);
    for (name, value) in instance.fields() {
        match value {
            FieldValue::Scalar(value) => {
                let _ = write!(out, "\n{pad}{name}: {value}");
            }
            FieldValue::Nested(nested) => {
                let _ = write!(out, "\n{pad}{name}: {}", nested.class());
                write_fields(out, nested, indent + 1);
            }
            FieldValue::Collection(items) if items.is_empty() => {
                let _ = write!(out, "\n{pad}{name}: []");
            }
            FieldValue::Collection(items) => {
                let _ = write!(out, "\n{pad}{name}:");
                for (index, item) in items.iter().enumerate() {
                    let _ = write!(out, "\n{pad}  [{index}] {}", item.class());
                    write_fields(out, item, indent + 2);
                }
            }
        }
    }
}
