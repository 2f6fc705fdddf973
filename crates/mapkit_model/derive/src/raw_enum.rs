//! `#[derive(RawEnum)]`.

use proc_macro2::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Fields, Ident, Type};

use crate::attributes::{RawEnumAttributes, VariantAttributes};

// -----------------------------------------------------------------------------
// Parsed input

enum Backing {
    Integer(Type),
    /// One raw string per variant.
    String(Vec<String>),
}

pub(crate) struct RawEnumDerive<'a> {
    ident: &'a Ident,
    variants: Vec<&'a Ident>,
    backing: Backing,
}

impl<'a> RawEnumDerive<'a> {
    pub fn parse(ast: &'a DeriveInput) -> syn::Result<Self> {
        let Data::Enum(data) = &ast.data else {
            return Err(syn::Error::new_spanned(
                &ast.ident,
                "`RawEnum` can only be derived for enums",
            ));
        };
        if !ast.generics.params.is_empty() {
            return Err(syn::Error::new_spanned(
                &ast.generics,
                "`RawEnum` does not support generic enums",
            ));
        }
        if data.variants.is_empty() {
            return Err(syn::Error::new_spanned(
                &ast.ident,
                "`RawEnum` needs at least one variant",
            ));
        }

        let attrs = RawEnumAttributes::parse_attrs(&ast.attrs)?;

        let mut variants = Vec::with_capacity(data.variants.len());
        let mut names = Vec::with_capacity(data.variants.len());
        for variant in &data.variants {
            if !matches!(variant.fields, Fields::Unit) {
                return Err(syn::Error::new_spanned(
                    &variant.fields,
                    "`RawEnum` variants cannot hold data",
                ));
            }
            let variant_attrs = VariantAttributes::parse_attrs(&variant.attrs)?;
            let name = match (&variant_attrs.rename, &attrs.repr) {
                (Some(rename), Some(_)) => {
                    return Err(syn::Error::new(
                        rename.span(),
                        "integer backed variants are identified by their discriminant",
                    ));
                }
                (Some(rename), None) => rename.value(),
                (None, _) => {
                    let name = variant.ident.to_string();
                    attrs.rename_all.map_or(name.clone(), |rule| rule.apply(&name))
                }
            };
            variants.push(&variant.ident);
            names.push(name);
        }

        if let Some(repr) = attrs.repr {
            return Ok(Self {
                ident: &ast.ident,
                variants,
                backing: Backing::Integer(repr),
            });
        }

        for (i, name) in names.iter().enumerate() {
            if names[..i].contains(name) {
                return Err(syn::Error::new_spanned(
                    variants[i],
                    format!("raw value `{name}` is used by two variants"),
                ));
            }
        }

        Ok(Self {
            ident: &ast.ident,
            variants,
            backing: Backing::String(names),
        })
    }

    pub fn to_tokens(&self, path: &syn::Path) -> TokenStream {
        let ident = self.ident;
        let variants = &self.variants;
        let variant_names = variants.iter().map(|v| v.to_string());

        let (raw, from_raw, to_raw) = match &self.backing {
            Backing::Integer(repr) => (
                quote!(#repr),
                quote! {
                    #(
                        if *raw == Self::#variants as #repr {
                            return ::core::option::Option::Some(Self::#variants);
                        }
                    )*
                    ::core::option::Option::None
                },
                quote! {
                    match self {
                        #(Self::#variants => Self::#variants as #repr,)*
                    }
                },
            ),
            Backing::String(names) => (
                quote!(#path::__macro_exports::String),
                quote! {
                    match raw.as_str() {
                        #(#names => ::core::option::Option::Some(Self::#variants),)*
                        _ => ::core::option::Option::None,
                    }
                },
                quote! {
                    match self {
                        #(Self::#variants => #path::__macro_exports::String::from(#names),)*
                    }
                },
            ),
        };

        quote! {
            const _: () = {
                impl #path::RawEnum for #ident {
                    type Raw = #raw;

                    fn from_raw(raw: &Self::Raw) -> ::core::option::Option<Self> {
                        #from_raw
                    }

                    fn to_raw(&self) -> Self::Raw {
                        #to_raw
                    }

                    fn variant_names() -> &'static [&'static str] {
                        &[#(#variant_names),*]
                    }
                }

                #path::impl_raw_enum!(#ident);
            };
        }
    }
}

// -----------------------------------------------------------------------------
// Tests
