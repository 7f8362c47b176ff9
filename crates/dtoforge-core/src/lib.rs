//! # dtoforge-core
//!
//! Core framework for constructing validated data-transfer objects.
//!
//! This crate provides the foundational traits and types for turning
//! untrusted key-value input into typed DTO instances. It includes:
//!
//! - [`FieldMeta`] and [`TypeSignature`] for describing fields
//! - [`rules`] for deriving and composing per-field validation rules
//! - [`Validator`] trait for the pluggable validation delegate
//! - [`Dto`] trait for statically typed DTOs
//! - [`schema`] for DTO classes declared in TOML
//! - [`Engine`] for orchestrating validation and hydration
//!
//! ## Example
//!
//! ```ignore
//! use dtoforge_core::Engine;
//!
//! let engine = Engine::builder()
//!     .validator(MyValidator::new())
//!     .max_depth(16)
//!     .build()?;
//!
//! let customer: Customer = engine.create(&input)?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod dto;
mod engine;
mod error;
mod field;
mod hydrate;
mod instance;
mod signature;
mod validator;

pub mod rules;
pub mod schema;

pub use config::{Config, ConfigError, EngineConfig, ValidatorConfig, DEFAULT_MAX_DEPTH};
pub use dto::Dto;
pub use engine::{Engine, EngineBuilder, EngineError};
pub use error::DtoError;
pub use field::{FieldMeta, ModelError};
pub use hydrate::Hydration;
pub use instance::{DtoInstance, FieldValue};
pub use rules::RuleSet;
pub use schema::{load_schema_from_toml, LoadSchemaError, Schema};
pub use signature::{
    generic_argument, is_generic_array_of_primitive, is_generic_collection_of_dto, is_nullable,
    outer_text, ClassRef, FieldKind, TypeSignature,
};
pub use validator::{FieldErrors, ValidationFailure, Validator, ValidatorBox};
