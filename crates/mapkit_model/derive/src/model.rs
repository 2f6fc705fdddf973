//! `#[derive(Model)]`.

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{
    Data, DeriveInput, Fields, GenericParam, Generics, Ident, LitStr, Type, WherePredicate,
    parse_quote,
};

use crate::attributes::{FieldAttributes, ModelAttributes};
use crate::utils::mentions;

// -----------------------------------------------------------------------------
// Parsed input

struct ModelField<'a> {
    ident: &'a Ident,
    ty: &'a Type,
    rename: Option<LitStr>,
}

pub(crate) struct ModelDerive<'a> {
    ident: &'a Ident,
    generics: &'a Generics,
    attrs: ModelAttributes,
    base: Option<ModelField<'a>>,
    fields: Vec<ModelField<'a>>,
}

impl<'a> ModelDerive<'a> {
    pub fn parse(ast: &'a DeriveInput) -> syn::Result<Self> {
        let Data::Struct(data) = &ast.data else {
            return Err(syn::Error::new_spanned(
                &ast.ident,
                "`Model` can only be derived for structs with named fields",
            ));
        };
        let Fields::Named(named) = &data.fields else {
            return Err(syn::Error::new_spanned(
                &data.fields,
                "`Model` can only be derived for structs with named fields",
            ));
        };
        if let Some(lifetime) = ast.generics.lifetimes().next() {
            return Err(syn::Error::new_spanned(
                lifetime,
                "`Model` records cannot borrow, lifetime parameters are not supported",
            ));
        }

        let attrs = ModelAttributes::parse_attrs(&ast.attrs)?;

        let mut base = None;
        let mut fields = Vec::with_capacity(named.named.len());
        for field in &named.named {
            let field_attrs = FieldAttributes::parse_attrs(&field.attrs)?;
            if field_attrs.skip.is_some() {
                continue;
            }
            // Named fields always have an ident.
            let Some(ident) = field.ident.as_ref() else {
                continue;
            };
            let parsed = ModelField {
                ident,
                ty: &field.ty,
                rename: field_attrs.rename,
            };
            match field_attrs.base {
                Some(span) if base.is_some() => {
                    return Err(syn::Error::new(span, "a record has at most one base field"));
                }
                Some(_) => base = Some(parsed),
                None => fields.push(parsed),
            }
        }

        Ok(Self {
            ident: &ast.ident,
            generics: &ast.generics,
            attrs,
            base,
            fields,
        })
    }

    fn is_generic(&self) -> bool {
        self.generics.type_params().next().is_some() || self.generics.const_params().next().is_some()
    }

    /// Opening tokens of a cache lookup; `kind` names the cell family,
    /// `TypeInfoCell` or `ModelInfoCell`.
    fn cell_tokens(&self, path: &syn::Path, kind: &str) -> TokenStream {
        if self.is_generic() {
            let cell = format_ident!("Generic{}", kind);
            quote! {
                static CELL: #path::info::#cell = #path::info::#cell::new();
                CELL.get_or_insert::<Self>
            }
        } else {
            let cell = format_ident!("NonGeneric{}", kind);
            quote! {
                static CELL: #path::info::#cell = #path::info::#cell::new();
                CELL.get_or_init
            }
        }
    }

    /// Bounds every impl needs on a generic record.
    ///
    /// Non-generic records get none, so that a record may hold itself
    /// through `Option<Box<Self>>` without a cyclic obligation.
    fn extra_predicates(&self, path: &syn::Path) -> Vec<WherePredicate> {
        if !self.is_generic() {
            return Vec::new();
        }
        let ident = self.ident;
        let (_, ty_generics, _) = self.generics.split_for_impl();
        let params: Vec<&Ident> = self.generics.type_params().map(|p| &p.ident).collect();

        let mut predicates: Vec<WherePredicate> = params
            .iter()
            .map(|param| parse_quote!(#param: 'static))
            .collect();
        for field in &self.fields {
            let ty = field.ty;
            if mentions(ty, &params) && !mentions(ty, &[ident]) {
                predicates.push(parse_quote!(#ty: #path::Transformable));
            }
        }
        if let Some(base) = &self.base {
            let ty = base.ty;
            predicates.push(parse_quote!(#ty: #path::Model));
        }
        predicates.push(parse_quote!(#ident #ty_generics: ::core::default::Default));
        predicates
    }

    pub fn to_tokens(&self, path: &syn::Path) -> TokenStream {
        let ident = self.ident;
        let fields_ident = format_ident!("{}Fields", ident);

        let mut generics = self.generics.clone();
        generics
            .make_where_clause()
            .predicates
            .extend(self.extra_predicates(path));
        let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();
        let (_, _, struct_where) = self.generics.split_for_impl();
        let fields_params = fields_struct_params(self.generics);

        let record = quote!(#ident #ty_generics);

        // Field identities
        let base_count = match &self.base {
            Some(base) => {
                let ty = base.ty;
                quote!(<#ty as #path::Model>::FIELD_COUNT)
            }
            None => quote!(0usize),
        };
        let own_count = self.fields.len();

        let token_decls = self.fields.iter().map(|f| {
            let (name, ty) = (f.ident, f.ty);
            quote!(pub #name: #path::Field<#record, #ty>,)
        });
        let token_values = self.fields.iter().enumerate().map(|(i, f)| {
            let name = f.ident;
            let name_str = name.to_string();
            quote!(#name: #path::Field::new(#base_count + #i, #name_str),)
        });

        // Descriptor caches
        let type_info_cell = self.cell_tokens(path, "TypeInfoCell");
        let model_info_cell = self.cell_tokens(path, "ModelInfoCell");

        let base_tokens = self.base.as_ref().map(|base| {
            let (name, ty) = (base.ident, base.ty);
            quote! {
                .base::<#ty>(#path::info::Projection::new(
                    |record| record.downcast_ref::<Self>().map(|r| &r.#name as &dyn __mx::Any),
                    |record| record.downcast_mut::<Self>().map(|r| &mut r.#name as &mut dyn __mx::Any),
                ))
            }
        });

        let field_tokens = self.fields.iter().map(|f| {
            let (name, ty) = (f.ident, f.ty);
            let name_str = name.to_string();
            let rename = f.rename.as_ref().map(|key| quote!(.with_key(#key)));
            quote! {
                .field(#path::info::FieldInfo::new::<#ty>(
                    #name_str,
                    #path::info::FieldAccessor::new(
                        |record| record
                            .downcast_ref::<Self>()
                            .map(|r| &r.#name as &dyn #path::DynTransformable),
                        |record| record
                            .downcast_mut::<Self>()
                            .map(|r| &mut r.#name as &mut dyn #path::DynTransformable),
                    ),
                )#rename)
            }
        });

        let mapping_hooks = self.attrs.impl_mapping_hooks.then(|| {
            quote! {
                impl #impl_generics #path::MappingHooks for #record #where_clause {}
            }
        });

        let inherits = self.base.as_ref().map(|base| {
            let ty = base.ty;
            quote! {
                impl #impl_generics #path::Inherits<#ty> for #record #where_clause {}
            }
        });

        quote! {
            const _: () = {
                use #path::__macro_exports as __mx;

                #[doc(hidden)]
                pub struct #fields_ident #fields_params #struct_where {
                    #(#token_decls)*
                    #[doc(hidden)]
                    pub __model: __mx::PhantomData<fn() -> #record>,
                }

                impl #impl_generics #path::info::Typed for #record #where_clause {
                    fn type_info() -> &'static #path::info::TypeInfo {
                        #type_info_cell(|| {
                            #path::info::TypeInfo::Model(<Self as #path::Model>::model_info())
                        })
                    }
                }

                impl #impl_generics #path::Transformable for #record #where_clause {
                    const KIND: #path::info::TransformKind = #path::info::TransformKind::Model;

                    #[inline]
                    fn transform_from(
                        value: &__mx::Value,
                        ctx: &mut #path::Context<'_>,
                    ) -> ::core::option::Option<Self> {
                        __mx::decode_model::<Self>(value, ctx)
                    }

                    #[inline]
                    fn plain_value(
                        &self,
                        ctx: &mut #path::Context<'_>,
                    ) -> ::core::option::Option<__mx::Value> {
                        __mx::encode_model(self, ctx)
                    }
                }

                impl #impl_generics #path::Model for #record #where_clause {
                    type Fields = #fields_ident #ty_generics;

                    const FIELDS: Self::Fields = #fields_ident {
                        #(#token_values)*
                        __model: __mx::PhantomData,
                    };

                    const FIELD_COUNT: usize = #base_count + #own_count;

                    fn model_info() -> &'static #path::info::ModelInfo {
                        #model_info_cell(|| {
                            #path::info::ModelInfo::builder::<Self>()
                                #base_tokens
                                #(#field_tokens)*
                                .build()
                        })
                    }
                }

                #mapping_hooks

                #inherits
            };
        }
    }
}

/// Generic parameters of the field identity struct: those of the record,
/// without defaults.
fn fields_struct_params(generics: &Generics) -> TokenStream {
    if generics.params.is_empty() {
        return TokenStream::new();
    }
    let params = generics.params.iter().map(|param| match param {
        GenericParam::Type(p) => {
            let (name, bounds) = (&p.ident, &p.bounds);
            if bounds.is_empty() {
                quote!(#name)
            } else {
                quote!(#name: #bounds)
            }
        }
        GenericParam::Const(p) => {
            let (name, ty) = (&p.ident, &p.ty);
            quote!(const #name: #ty)
        }
        GenericParam::Lifetime(p) => quote!(#p),
    });
    quote!(<#(#params),*>)
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use syn::{DeriveInput, parse_quote};

    use super::ModelDerive;

    fn parse(ast: &DeriveInput) -> Result<ModelDerive<'_>, String> {
        ModelDerive::parse(ast).map_err(|e| e.to_string())
    }

    #[test]
    fn rejects_unsupported_shapes() {
        let tuple: DeriveInput = parse_quote!(struct A(u8););
        assert!(parse(&tuple).is_err());

        let borrowed: DeriveInput = parse_quote!(struct A<'a> { s: &'a str });
        assert!(parse(&borrowed).is_err());

        let two_bases: DeriveInput = parse_quote! {
            struct A { #[model(base)] x: B, #[model(base)] y: C }
        };
        let err = parse(&two_bases).err().unwrap();
        assert!(err.contains("at most one base"));
    }

    #[test]
    fn splits_base_and_skipped_fields() {
        let ast: DeriveInput = parse_quote! {
            struct A {
                a: u8,
                #[model(base)]
                parent: B,
                #[model(skip)]
                cache: u8,
                #[model(rename = "B")]
                b: u8,
            }
        };
        let derive = ModelDerive::parse(&ast).unwrap();
        assert!(derive.base.is_some());
        let names: Vec<_> = derive.fields.iter().map(|f| f.ident.to_string()).collect();
        assert_eq!(names, ["a", "b"]);
        assert!(!derive.is_generic());
    }

    #[test]
    fn generic_records_bound_their_fields() {
        let ast: DeriveInput = parse_quote! {
            struct Page<T> { items: Vec<T>, next: Option<Box<Page<T>>>, total: u32 }
        };
        let derive = ModelDerive::parse(&ast).unwrap();
        let path: syn::Path = parse_quote!(::mapkit_model);
        let predicates: Vec<String> = derive
            .extra_predicates(&path)
            .iter()
            .map(|p| quote::quote!(#p).to_string())
            .collect();

        assert_eq!(predicates.len(), 3);
        assert!(predicates[1].starts_with("Vec < T >"));
    }

    #[test]
    fn each_cache_gets_its_own_cell() {
        let path: syn::Path = parse_quote!(::mapkit_model);

        let plain: DeriveInput = parse_quote!(struct A { a: u8 });
        let tokens = ModelDerive::parse(&plain).unwrap().to_tokens(&path).to_string();
        assert!(tokens.contains("NonGenericTypeInfoCell"));
        assert!(tokens.contains("NonGenericModelInfoCell"));

        let generic: DeriveInput = parse_quote!(struct B<T> { items: Vec<T> });
        let tokens = ModelDerive::parse(&generic).unwrap().to_tokens(&path).to_string();
        assert!(tokens.contains("GenericTypeInfoCell :: new"));
        assert!(tokens.contains("GenericModelInfoCell :: new"));
        assert!(!tokens.contains("NonGeneric"));
    }
}
