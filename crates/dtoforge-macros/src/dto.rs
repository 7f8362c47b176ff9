//! `Dto` derive expansion.

use crate::signature::{infer, Mode};
use proc_macro2::TokenStream;
use quote::quote;
use syn::{Attribute, Data, DeriveInput, Error, Fields, LitStr, Path};

#[derive(Default)]
struct ContainerAttrs {
    class: Option<String>,
    krate: Option<Path>,
}

#[derive(Default)]
struct FieldAttrs {
    input: Option<String>,
    rules: Option<String>,
    signature: Option<String>,
    scalar: bool,
}

pub fn impl_dto(input: &DeriveInput) -> syn::Result<TokenStream> {
    if !input.generics.params.is_empty() {
        return Err(Error::new_spanned(
            &input.generics,
            "`Dto` cannot be derived for generic types",
        ));
    }
    let Data::Struct(data) = &input.data else {
        return Err(Error::new_spanned(
            &input.ident,
            "`Dto` can only be derived for structs",
        ));
    };
    let Fields::Named(named) = &data.fields else {
        return Err(Error::new_spanned(
            &input.ident,
            "`Dto` requires a struct with named fields",
        ));
    };

    let container = parse_container_attrs(&input.attrs)?;
    let ident = &input.ident;
    let krate = container
        .krate
        .unwrap_or_else(|| syn::parse_quote!(::dtoforge));
    let class = container.class.unwrap_or_else(|| ident.to_string());
    if class.trim().is_empty() {
        return Err(Error::new_spanned(ident, "`class` must not be empty"));
    }

    let mut metas = Vec::new();
    let mut inits = Vec::new();
    let mut input_names: Vec<String> = Vec::new();

    for field in &named.named {
        let Some(field_ident) = &field.ident else {
            continue;
        };
        let attrs = parse_field_attrs(&field.attrs)?;

        let raw_name = field_ident.to_string();
        let name = raw_name.strip_prefix("r#").unwrap_or(&raw_name).to_string();
        let input_name = attrs.input.unwrap_or_else(|| name.clone());
        if input_name.trim().is_empty() {
            return Err(Error::new_spanned(field_ident, "`input` must not be empty"));
        }
        if input_names.contains(&input_name) {
            return Err(Error::new_spanned(
                field_ident,
                format!("input key `{input_name}` is used by more than one field"),
            ));
        }
        input_names.push(input_name.clone());

        // A full override needs no inference, so any field type is accepted.
        let (declared, mode) = match (attrs.signature, attrs.scalar) {
            (Some(signature), true) => (signature, Mode::Scalar),
            (signature, scalar) => {
                let inferred = infer(&field.ty)?;
                let mode = if scalar { Mode::Scalar } else { inferred.mode };
                (signature.unwrap_or(inferred.signature), mode)
            }
        };
        let signature: String = declared.split_whitespace().collect();
        if signature.is_empty() {
            return Err(Error::new_spanned(field_ident, "`signature` must not be empty"));
        }

        let rules = match attrs.rules.filter(|r| !r.trim().is_empty()) {
            Some(rules) => quote!(::core::option::Option::Some(#rules)),
            None => quote!(::core::option::Option::None),
        };
        metas.push(quote! {
            #krate::FieldMeta::declared(#name, #input_name, #signature, #rules)
        });

        let read = match mode {
            Mode::Scalar => quote!(values.scalar(#input_name)?),
            Mode::Nested => quote!(values.nested(#input_name)?),
            Mode::NestedOpt => quote!(values.nested_opt(#input_name)?),
            Mode::Collection => quote!(values.collection(#input_name)?),
            Mode::CollectionOpt => quote!(values.collection_opt(#input_name)?),
        };
        inits.push(quote!(#field_ident: #read));
    }

    Ok(quote! {
        impl #krate::Dto for #ident {
            const CLASS: &'static str = #class;

            fn fields() -> &'static [#krate::FieldMeta] {
                static FIELDS: ::std::sync::OnceLock<::std::vec::Vec<#krate::FieldMeta>> =
                    ::std::sync::OnceLock::new();
                FIELDS.get_or_init(|| ::std::vec![#(#metas),*])
            }

            #[allow(unused_variables)]
            fn hydrate(
                values: &mut #krate::Hydration<'_>,
            ) -> ::core::result::Result<Self, #krate::DtoError> {
                ::core::result::Result::Ok(Self { #(#inits),* })
            }
        }
    })
}

fn parse_container_attrs(attrs: &[Attribute]) -> syn::Result<ContainerAttrs> {
    let mut parsed = ContainerAttrs::default();
    for attr in attrs.iter().filter(|a| a.path().is_ident("dto")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("class") {
                parsed.class = Some(meta.value()?.parse::<LitStr>()?.value());
                Ok(())
            } else if meta.path.is_ident("crate") {
                parsed.krate = Some(meta.value()?.parse::<LitStr>()?.parse()?);
                Ok(())
            } else {
                Err(meta.error("unknown container attribute, expected `class` or `crate`"))
            }
        })?;
    }
    Ok(parsed)
}

fn parse_field_attrs(attrs: &[Attribute]) -> syn::Result<FieldAttrs> {
    let mut parsed = FieldAttrs::default();
    for attr in attrs.iter().filter(|a| a.path().is_ident("dto")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("input") {
                parsed.input = Some(meta.value()?.parse::<LitStr>()?.value());
            } else if meta.path.is_ident("rules") {
                parsed.rules = Some(meta.value()?.parse::<LitStr>()?.value());
            } else if meta.path.is_ident("signature") {
                parsed.signature = Some(meta.value()?.parse::<LitStr>()?.value());
            } else if meta.path.is_ident("scalar") {
                parsed.scalar = true;
            } else {
                return Err(meta.error(
                    "unknown field attribute, expected `input`, `rules`, `signature` or `scalar`",
                ));
            }
            Ok(())
        })?;
    }
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    /// Expanded tokens with all whitespace removed.
    fn expand(input: DeriveInput) -> String {
        impl_dto(&input)
            .unwrap()
            .to_string()
            .split_whitespace()
            .collect()
    }

    #[test]
    fn expands_fields_in_order() {
        let out = expand(parse_quote! {
            struct Customer {
                #[dto(input = "fullName", rules = "max:100")]
                full_name: String,
                addresses: Vec<Address>,
                billing: Option<Address>,
            }
        });

        assert!(out.contains("constCLASS:&'staticstr=\"Customer\""));
        assert!(out.contains(
            "FieldMeta::declared(\"full_name\",\"fullName\",\"string\",::core::option::Option::Some(\"max:100\"))"
        ));
        assert!(out.contains("\"Collection<Address>\""));
        assert!(out.contains("values.collection(\"addresses\")"));
        assert!(out.contains("values.nested_opt(\"billing\")"));
        assert!(out.find("full_name").unwrap() < out.find("addresses").unwrap());
    }

    #[test]
    fn container_attributes() {
        let out = expand(parse_quote! {
            #[dto(class = "billing::Address", crate = "crate")]
            struct Address {
                city: String,
            }
        });
        assert!(out.contains("\"billing::Address\""));
        assert!(out.contains("implcrate::DtoforAddress"));
    }

    #[test]
    fn scalar_override() {
        let out = expand(parse_quote! {
            struct Event {
                #[dto(scalar, signature = "string")]
                at: Timestamp,
            }
        });
        assert!(out.contains("values.scalar(\"at\")"));
        assert!(out.contains("\"string\""));
    }

    #[test]
    fn rejects_unsupported_shapes() {
        let tuple: DeriveInput = parse_quote!(struct Pair(String, String););
        assert!(impl_dto(&tuple).is_err());

        let generic: DeriveInput = parse_quote!(struct Wrapper<T> { inner: T });
        assert!(impl_dto(&generic).is_err());

        let duplicate: DeriveInput = parse_quote! {
            struct Dup {
                a: String,
                #[dto(input = "a")]
                b: String,
            }
        };
        let err = impl_dto(&duplicate).unwrap_err();
        assert!(err.to_string().contains("more than one field"));

        let unknown: DeriveInput = parse_quote! {
            struct Unknown {
                #[dto(bogus = "x")]
                a: String,
            }
        };
        assert!(impl_dto(&unknown).is_err());
    }

    #[test]
    fn rejects_sequences_of_dto_sequences() {
        let grid: DeriveInput = parse_quote! {
            struct Grid {
                rows: Vec<Vec<Cell>>,
            }
        };
        let err = impl_dto(&grid).unwrap_err();
        assert!(err.to_string().contains("sequence of DTO sequences"));

        let overridden: DeriveInput = parse_quote! {
            struct Grid {
                #[dto(scalar, signature = "array")]
                rows: Vec<Vec<Cell>>,
            }
        };
        assert!(impl_dto(&overridden).is_ok());
    }

    #[test]
    fn optional_items_stay_nullable() {
        let out = expand(parse_quote! {
            struct Scores {
                scores: Vec<Option<i64>>,
                matrix: Vec<Vec<i64>>,
            }
        });
        assert!(out.contains("FieldMeta::declared(\"scores\",\"scores\",\"array<?int>\""));
        assert!(out.contains("FieldMeta::declared(\"matrix\",\"matrix\",\"array\""));
    }
}
