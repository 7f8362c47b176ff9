//! Statically typed DTOs.

use crate::error::DtoError;
use crate::field::FieldMeta;
use crate::hydrate::Hydration;

/// A Rust type constructible from validated input.
///
/// Usually derived with `#[derive(Dto)]`. A hand-written implementation
/// looks like this:
///
/// ```ignore
/// use dtoforge_core::{Dto, DtoError, FieldMeta, Hydration};
/// use std::sync::OnceLock;
///
/// struct Address {
///     address_one: String,
///     floor: Option<String>,
/// }
///
/// impl Dto for Address {
///     const CLASS: &'static str = "Address";
///
///     fn fields() -> &'static [FieldMeta] {
///         static FIELDS: OnceLock<Vec<FieldMeta>> = OnceLock::new();
///         FIELDS.get_or_init(|| {
///             vec![
///                 FieldMeta::declared("address_one", "address_one", "string", Some("max:255")),
///                 FieldMeta::declared("floor", "floor", "?string", None),
///             ]
///         })
///     }
///
///     fn hydrate(values: &mut Hydration<'_>) -> Result<Self, DtoError> {
///         Ok(Self {
///             address_one: values.scalar("address_one")?,
///             floor: values.scalar("floor")?,
///         })
///     }
/// }
/// ```
pub trait Dto: Sized {
    /// Class name used in error reports.
    const CLASS: &'static str;

    /// Returns the field metadata, computed once per type.
    fn fields() -> &'static [FieldMeta];

    /// Builds the instance from validated values.
    ///
    /// # Errors
    ///
    /// Returns an error if a nested construction fails or a value does not
    /// fit its Rust type.
    fn hydrate(values: &mut Hydration<'_>) -> Result<Self, DtoError>;
}
