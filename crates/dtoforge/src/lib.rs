//! # dtoforge
//!
//! Validated construction of data-transfer objects.
//!
//! This is the main facade crate that re-exports core functionality, the
//! derive macro and the built-in rule validator.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use dtoforge::Dto;
//!
//! #[derive(Debug, Dto)]
//! struct Address {
//!     #[dto(rules = "max:255")]
//!     address_one: String,
//!     #[dto(input = "buildingNumber", rules = "max:10")]
//!     building_number: Option<String>,
//!     #[dto(rules = "required_with:buildingNumber")]
//!     floor: Option<String>,
//! }
//!
//! let address: Address = dtoforge::create(&serde_json::json!({
//!     "address_one": "Main St",
//! }))?;
//! ```
//!
//! ## Declared Schemas
//!
//! Classes can also be declared in `dtoforge.toml` and constructed as
//! [`DtoInstance`] values:
//!
//! ```rust,ignore
//! let project = dtoforge::Project::load("dtoforge.toml".as_ref())?;
//! let customer = project.create("Customer", &input)?;
//! println!("{}", customer.to_json());
//! ```

#![forbid(unsafe_code)]

use serde_json::Value;
use std::sync::OnceLock;

// Re-export core types and traits
pub use dtoforge_core::*;

// Re-export the derive macro for #[derive(dtoforge::Dto)]
pub use dtoforge_macros::Dto;

pub use dtoforge_rules::RuleValidator;

/// Rule composition and the built-in rule validator.
pub mod rules {
    pub use dtoforge_core::rules::*;
    pub use dtoforge_rules::*;
}

mod project;

pub use project::{Project, ProjectError};

/// Returns a new engine using the built-in [`RuleValidator`] and defaults.
#[must_use]
pub fn engine() -> Engine {
    Engine::new(RuleValidator::new())
}

/// Constructs `T` with a shared default engine.
///
/// # Errors
///
/// See [`Engine::create`].
pub fn create<T: Dto>(input: &Value) -> Result<T, DtoError> {
    static ENGINE: OnceLock<Engine> = OnceLock::new();
    ENGINE.get_or_init(engine).create(input)
}
