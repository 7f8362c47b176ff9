//! # dtoforge-rules
//!
//! Built-in rule validator for dtoforge.
//!
//! [`RuleValidator`] evaluates the rule strings composed by
//! `dtoforge-core` and reports a message per failing rule.
//!
//! ## Available Rules
//!
//! | Group | Rules |
//! |-------|-------|
//! | Presence | `required`, `nullable`, `sometimes`, `filled`, `present` |
//! | Conditional | `required_with`, `required_without`, `required_if`, `required_unless` |
//! | Type | `string`, `numeric`, `integer`/`int`, `float`/`double`, `boolean`/`bool`, `array`, `mixed` |
//! | Format | `email`, `url`, `uuid`, `alpha`, `alpha_num`, `alpha_dash`, `regex`, `not_regex` |
//! | Size | `min`, `max`, `between`, `size` |
//! | Value | `in`, `not_in`, `starts_with`, `ends_with` |
//! | Cross-field | `same`, `different`, `confirmed` |
//!
//! ## Usage
//!
//! ```ignore
//! use dtoforge_core::Engine;
//! use dtoforge_rules::RuleValidator;
//!
//! let engine = Engine::builder()
//!     .validator(RuleValidator::new())
//!     .build()?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod catalog;
mod checks;
mod rule;
mod validator;

pub use catalog::{lookup, rule_catalog, RuleInfo};
pub use rule::{parse_rules, split_rules, Limit, Rule, RuleError};
pub use validator::RuleValidator;

/// Re-export core types for convenience.
pub use dtoforge_core::{FieldErrors, RuleSet, ValidationFailure, Validator};
