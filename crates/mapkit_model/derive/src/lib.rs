//! Derive macros of `mapkit_model`:
//!
//! - [`Model`]
//! - [`RawEnum`]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(clippy::std_instead_of_core, reason = "proc-macro lib")]
#![allow(clippy::std_instead_of_alloc, reason = "proc-macro lib")]

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

static MODEL_ATTRIBUTE_NAME: &str = "model";
static RAW_ENUM_ATTRIBUTE_NAME: &str = "raw_enum";

// -----------------------------------------------------------------------------
// Modules

mod attributes;
mod model;
mod raw_enum;
mod utils;

// -----------------------------------------------------------------------------
// Crate Path

/// Path of the `mapkit_model` crate as seen from the crate being built.
///
/// `::mapkit_model` for direct dependents, `::mapkit::model` for crates
/// depending on the facade only.
pub(crate) fn mapkit_model() -> syn::Path {
    mapkit_macro_utils::Manifest::shared(|manifest| manifest.get_crate_path("mapkit_model"))
}

// -----------------------------------------------------------------------------
// Macros

/// # Record Derivation
///
/// `#[derive(Model)]` implements `Typed`, `Transformable`, `Model` and, by
/// default, an empty `MappingHooks` for a struct with named fields. The
/// struct must implement `Default`.
///
/// Every field type must be `Transformable`. Field identities are exposed as
/// `<T as Model>::FIELDS.<field>`.
///
/// ## Type attributes
///
/// - `#[model(MappingHooks = false)]`: skip the empty `MappingHooks` impl,
///   to write one by hand.
///
/// ## Field attributes
///
/// - `#[model(skip)]`: the field is not described and never mapped.
/// - `#[model(rename = "key")]`: document key of the field.
/// - `#[model(base)]`: the field holds the base record. Its fields are
///   described first, as if declared on this record. At most one per struct.
///
/// ```rust, ignore
/// #[derive(Model, Default)]
/// struct Employee {
///     #[model(base)]
///     person: Person,
///     #[model(rename = "monthly_salary")]
///     salary: f64,
///     #[model(skip)]
///     cache: Vec<u8>,
/// }
/// ```
#[proc_macro_derive(Model, attributes(model))]
pub fn derive_model(input: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);

    match model::ModelDerive::parse(&ast) {
        Ok(derive) => derive.to_tokens(&mapkit_model()).into(),
        Err(err) => err.into_compile_error().into(),
    }
}

/// # Raw Value Enumeration Derivation
///
/// `#[derive(RawEnum)]` implements `RawEnum`, `Typed` and `Transformable`
/// for an enum of unit variants.
///
/// By default the raw value is a `String` holding the variant name, which
/// `#[raw_enum(rename_all = "...")]` on the enum (`lowercase`, `UPPERCASE`,
/// `snake_case`, `SCREAMING_SNAKE_CASE`, `camelCase`) or
/// `#[raw_enum(rename = "...")]` on a variant change.
///
/// With `#[raw_enum(repr = "i32")]` (any integer type) the raw value is the
/// variant discriminant.
///
/// ```rust, ignore
/// #[derive(RawEnum)]
/// #[raw_enum(repr = "u8")]
/// enum Status {
///     Active = 1,
///     Banned = 9,
/// }
/// ```
#[proc_macro_derive(RawEnum, attributes(raw_enum))]
pub fn derive_raw_enum(input: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);

    match raw_enum::RawEnumDerive::parse(&ast) {
        Ok(derive) => derive.to_tokens(&mapkit_model()).into(),
        Err(err) => err.into_compile_error().into(),
    }
}
