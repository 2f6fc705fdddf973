//! Parsing of `#[model(...)]` and `#[raw_enum(...)]`.

use proc_macro2::Span;
use syn::spanned::Spanned;
use syn::{Attribute, LitBool, LitStr, Type};

use crate::utils::RenameRule;
use crate::{MODEL_ATTRIBUTE_NAME, RAW_ENUM_ATTRIBUTE_NAME};

// -----------------------------------------------------------------------------
// Model

/// Attributes on a struct deriving `Model`.
pub(crate) struct ModelAttributes {
    /// `#[model(MappingHooks = false)]` turns it off.
    pub impl_mapping_hooks: bool,
}

impl ModelAttributes {
    pub fn parse_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut this = Self {
            impl_mapping_hooks: true,
        };
        for attr in attrs {
            if !attr.path().is_ident(MODEL_ATTRIBUTE_NAME) {
                continue;
            }
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("MappingHooks") {
                    this.impl_mapping_hooks = meta.value()?.parse::<LitBool>()?.value;
                    Ok(())
                } else {
                    Err(meta.error("unknown model attribute, expected `MappingHooks = false`"))
                }
            })?;
        }
        Ok(this)
    }
}

/// Attributes on a field of a struct deriving `Model`.
#[derive(Default)]
pub(crate) struct FieldAttributes {
    pub skip: Option<Span>,
    pub base: Option<Span>,
    pub rename: Option<LitStr>,
}

impl FieldAttributes {
    pub fn parse_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut this = Self::default();
        for attr in attrs {
            if !attr.path().is_ident(MODEL_ATTRIBUTE_NAME) {
                continue;
            }
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("skip") {
                    this.skip = Some(meta.path.span());
                } else if meta.path.is_ident("base") {
                    this.base = Some(meta.path.span());
                } else if meta.path.is_ident("rename") {
                    this.rename = Some(meta.value()?.parse()?);
                } else {
                    return Err(meta.error("unknown field attribute, expected `skip`, `base` or `rename`"));
                }
                Ok(())
            })?;
        }
        this.validity()?;
        Ok(this)
    }

    fn validity(&self) -> syn::Result<()> {
        if let (Some(span), true) = (self.skip, self.base.is_some() || self.rename.is_some()) {
            return Err(syn::Error::new(span, "a skipped field takes no other attribute"));
        }
        if let (Some(span), Some(_)) = (self.base, &self.rename) {
            return Err(syn::Error::new(span, "a base field has no document key to rename"));
        }
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// RawEnum

/// Attributes on an enum deriving `RawEnum`.
#[derive(Default)]
pub(crate) struct RawEnumAttributes {
    pub repr: Option<Type>,
    pub rename_all: Option<RenameRule>,
}

impl RawEnumAttributes {
    pub fn parse_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut this = Self::default();
        for attr in attrs {
            if !attr.path().is_ident(RAW_ENUM_ATTRIBUTE_NAME) {
                continue;
            }
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("repr") {
                    let lit: LitStr = meta.value()?.parse()?;
                    this.repr = Some(parse_integer_type(&lit)?);
                } else if meta.path.is_ident("rename_all") {
                    let lit: LitStr = meta.value()?.parse()?;
                    this.rename_all = Some(RenameRule::from_lit(&lit)?);
                } else {
                    return Err(meta.error("unknown raw_enum attribute, expected `repr` or `rename_all`"));
                }
                Ok(())
            })?;
        }
        Ok(this)
    }
}

fn parse_integer_type(lit: &LitStr) -> syn::Result<Type> {
    const INTEGERS: &[&str] = &[
        "i8", "i16", "i32", "i64", "isize", "u8", "u16", "u32", "u64", "usize",
    ];
    if INTEGERS.contains(&lit.value().as_str()) {
        lit.parse()
    } else {
        Err(syn::Error::new(lit.span(), "`repr` must name an integer type"))
    }
}

/// Attributes on a variant of an enum deriving `RawEnum`.
#[derive(Default)]
pub(crate) struct VariantAttributes {
    pub rename: Option<LitStr>,
}

impl VariantAttributes {
    pub fn parse_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut this = Self::default();
        for attr in attrs {
            if !attr.path().is_ident(RAW_ENUM_ATTRIBUTE_NAME) {
                continue;
            }
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("rename") {
                    this.rename = Some(meta.value()?.parse()?);
                    Ok(())
                } else {
                    Err(meta.error("unknown variant attribute, expected `rename`"))
                }
            })?;
        }
        Ok(this)
    }
}
