//! # dtoforge-macros
//!
//! Procedural macros for declaring dtoforge DTOs.
//!
//! Use through the `dtoforge` facade, which re-exports [`macro@Dto`].

#![forbid(unsafe_code)]

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

mod dto;
mod signature;

/// Derives `dtoforge::Dto` for a struct with named fields.
///
/// Each field's type signature is inferred from its Rust type and its
/// hydration follows from the same type: `Vec<T>` of a non-primitive `T`
/// becomes a DTO collection, any other non-primitive type a nested DTO.
///
/// # Attributes
///
/// Container:
/// - `#[dto(class = "billing::Customer")]` - class name in errors (default: struct name)
/// - `#[dto(crate = "path")]` - path to the `dtoforge` crate
///
/// Field:
/// - `#[dto(input = "fullName")]` - input key (default: field name)
/// - `#[dto(rules = "max:100|email")]` - explicit rules
/// - `#[dto(signature = "?string")]` - override the inferred signature
/// - `#[dto(scalar)]` - assign the validated value via serde instead of nesting
///
/// # Example
///
/// ```ignore
/// use dtoforge::Dto;
///
/// #[derive(Dto)]
/// struct Address {
///     #[dto(rules = "max:255")]
///     address_one: String,
///     #[dto(input = "buildingNumber", rules = "max:10")]
///     building_number: Option<String>,
/// }
///
/// #[derive(Dto)]
/// struct Customer {
///     #[dto(input = "fullName", rules = "max:100")]
///     full_name: String,
///     addresses: Vec<Address>,
///     billing: Option<Address>,
/// }
/// ```
#[proc_macro_derive(Dto, attributes(dto))]
pub fn derive_dto(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    dto::impl_dto(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
