//! Inference of type signatures and hydration modes from Rust types.

use syn::{Error, GenericArgument, PathArguments, Type, TypePath};

/// How the generated `hydrate` reads one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Scalar,
    Nested,
    NestedOpt,
    Collection,
    CollectionOpt,
}

/// The inferred signature text and hydration mode of a field type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inferred {
    pub signature: String,
    pub mode: Mode,
}

const INT_TYPES: &[&str] = &[
    "i8", "i16", "i32", "i64", "i128", "isize", "u8", "u16", "u32", "u64", "u128", "usize",
];
const SEQUENCE_TYPES: &[&str] = &["Vec", "VecDeque", "HashSet", "BTreeSet"];
const MAP_TYPES: &[&str] = &["HashMap", "BTreeMap", "Map", "IndexMap"];

/// Infers the signature and mode of a field type.
///
/// Fails for sequences of DTO sequences, which no signature can describe.
pub fn infer(ty: &Type) -> syn::Result<Inferred> {
    match ty {
        Type::Array(array) => sequence(&array.elem),
        Type::Path(path) => infer_path(path),
        _ => Ok(scalar("mixed")),
    }
}

fn infer_path(path: &TypePath) -> syn::Result<Inferred> {
    let Some(last) = path.path.segments.last() else {
        return Ok(scalar("mixed"));
    };
    let ident = last.ident.to_string();
    let argument = single_type_argument(&last.arguments);

    match (ident.as_str(), argument) {
        ("Option", Some(inner)) => {
            let inner = infer(inner)?;
            let signature = if inner.signature.starts_with('?') {
                inner.signature
            } else {
                format!("?{}", inner.signature)
            };
            let mode = match inner.mode {
                Mode::Nested | Mode::NestedOpt => Mode::NestedOpt,
                Mode::Collection | Mode::CollectionOpt => Mode::CollectionOpt,
                Mode::Scalar => Mode::Scalar,
            };
            Ok(Inferred { signature, mode })
        }
        (name, Some(inner)) if SEQUENCE_TYPES.contains(&name) => sequence(inner),
        (name, _) if MAP_TYPES.contains(&name) => Ok(scalar("array")),
        (name, _) => Ok(match primitive_signature(name) {
            Some(signature) => scalar(signature),
            None => Inferred {
                signature: class_name(path),
                mode: Mode::Nested,
            },
        }),
    }
}

/// `array<T>` for one level of scalar items, with `?` kept on optional
/// items. Nested scalar sequences are plain `array`.
fn sequence(item_ty: &Type) -> syn::Result<Inferred> {
    let item = infer(item_ty)?;
    match item.mode {
        Mode::Scalar if item.signature.contains('<') => Ok(scalar("array")),
        Mode::Scalar => Ok(scalar_owned(format!("array<{}>", item.signature))),
        Mode::Nested => Ok(Inferred {
            signature: format!("Collection<{}>", item.signature),
            mode: Mode::Collection,
        }),
        Mode::NestedOpt => Err(Error::new_spanned(
            item_ty,
            "collection items must not be optional; drop the `Option` around the DTO type",
        )),
        Mode::Collection | Mode::CollectionOpt => Err(Error::new_spanned(
            item_ty,
            "a sequence of DTO sequences has no signature; \
             use `#[dto(scalar, signature = \"array\")]` to take it unvalidated",
        )),
    }
}

fn primitive_signature(ident: &str) -> Option<&'static str> {
    match ident {
        "String" | "char" => Some("string"),
        "f32" | "f64" => Some("float"),
        "bool" => Some("bool"),
        "Value" => Some("mixed"),
        name if INT_TYPES.contains(&name) => Some("int"),
        _ => None,
    }
}

/// Path segments without generic arguments, joined by `::`.
fn class_name(path: &TypePath) -> String {
    path.path
        .segments
        .iter()
        .map(|s| s.ident.to_string())
        .collect::<Vec<_>>()
        .join("::")
}

fn single_type_argument(arguments: &PathArguments) -> Option<&Type> {
    let PathArguments::AngleBracketed(args) = arguments else {
        return None;
    };
    let mut types = args.args.iter().filter_map(|arg| match arg {
        GenericArgument::Type(ty) => Some(ty),
        _ => None,
    });
    match (types.next(), types.next()) {
        (Some(ty), None) => Some(ty),
        _ => None,
    }
}

fn scalar(signature: &str) -> Inferred {
    scalar_owned(signature.to_string())
}

fn scalar_owned(signature: String) -> Inferred {
    Inferred {
        signature,
        mode: Mode::Scalar,
    }
}
