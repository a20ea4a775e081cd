//! Derive macro for the `bindoc` conversion contract.
//!
//! `#[derive(Convert)]` derives the three contract operations (`is`,
//! `decode`, `encode`) mechanically from a struct's fields:
//!
//! - a named-field struct maps to an object keyed by the field names in
//!   declared order;
//! - a tuple struct maps to a fixed-arity array;
//! - a unit struct maps to null.
//!
//! The generated impl lives in the defining module, so private fields need no
//! visibility escape hatch. Field attributes:
//!
//! - `#[convert(rename = "key")]` — use `key` instead of the field name;
//! - `#[convert(skip)]` — exclude the field; it is filled from `Default` on
//!   decode;
//! - `#[convert(default)]` — fill the field from `Default` when the key is
//!   absent.

extern crate proc_macro;

use proc_macro::TokenStream;
use quote::quote;
use syn::{
    parse_macro_input, spanned::Spanned, Attribute, Data, DataStruct, DeriveInput, Fields,
    GenericArgument, Generics, Ident, LitStr, PathArguments, Type,
};

#[derive(Default)]
struct ConvertAttr {
    rename: Option<String>,
    skip: bool,
    default: bool,
}

fn parse_convert_attrs(attrs: &[Attribute]) -> syn::Result<ConvertAttr> {
    let mut out = ConvertAttr::default();
    for attr in attrs {
        if !attr.path().is_ident("convert") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("skip") {
                out.skip = true;
                return Ok(());
            }
            if meta.path.is_ident("default") {
                out.default = true;
                return Ok(());
            }
            if meta.path.is_ident("rename") {
                let lit: LitStr = meta.value()?.parse()?;
                out.rename = Some(lit.value());
                return Ok(());
            }
            Err(meta.error("unsupported convert attribute"))
        })?;
    }
    Ok(out)
}

fn is_option_type(ty: &Type) -> bool {
    let Type::Path(tp) = ty else { return false };
    let Some(seg) = tp.path.segments.last() else {
        return false;
    };
    seg.ident == "Option"
}

fn type_mentions_ident(ty: &Type, ident: &Ident) -> bool {
    match ty {
        Type::Path(tp) => tp.path.segments.iter().any(|seg| {
            if seg.ident == *ident {
                return true;
            }
            match &seg.arguments {
                PathArguments::AngleBracketed(args) => args.args.iter().any(|arg| match arg {
                    GenericArgument::Type(inner) => type_mentions_ident(inner, ident),
                    _ => false,
                }),
                _ => false,
            }
        }),
        Type::Reference(tr) => type_mentions_ident(&tr.elem, ident),
        Type::Tuple(tt) => tt.elems.iter().any(|elem| type_mentions_ident(elem, ident)),
        Type::Array(ta) => type_mentions_ident(&ta.elem, ident),
        Type::Group(tg) => type_mentions_ident(&tg.elem, ident),
        Type::Paren(tp) => type_mentions_ident(&tp.elem, ident),
        _ => false,
    }
}

fn add_where_bound(
    where_clause: &mut syn::WhereClause,
    ty: &Type,
    bound: proc_macro2::TokenStream,
) {
    let pred: syn::WherePredicate = syn::parse_quote!(#ty: #bound);
    where_clause.predicates.push(pred);
}

fn derive_struct(name: &Ident, generics: &Generics, data: &DataStruct) -> proc_macro2::TokenStream {
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();
    let base_where_clause = where_clause;

    let mut where_clause = base_where_clause.cloned();
    let wc = where_clause.get_or_insert_with(|| syn::WhereClause {
        where_token: Default::default(),
        predicates: Default::default(),
    });

    match &data.fields {
        Fields::Named(fields) => {
            let mut is_checks = Vec::new();
            let mut decodes = Vec::new();
            let mut encodes = Vec::new();

            for field in &fields.named {
                let attr = match parse_convert_attrs(&field.attrs) {
                    Ok(attr) => attr,
                    Err(err) => return err.to_compile_error(),
                };
                let ident = field.ident.as_ref().unwrap();
                let ty = &field.ty;

                if attr.skip {
                    add_where_bound(wc, ty, quote!(::core::default::Default));
                    decodes.push(quote! {
                        #ident: ::core::default::Default::default(),
                    });
                    continue;
                }

                let key = attr.rename.unwrap_or_else(|| ident.to_string());
                let optional = is_option_type(ty) || attr.default;

                if !type_mentions_ident(ty, name) {
                    add_where_bound(wc, ty, quote!(::bindoc::Convert));
                }
                if optional {
                    add_where_bound(wc, ty, quote!(::core::default::Default));
                }

                if optional {
                    is_checks.push(quote! {
                        obj.get(#key).map_or(true, <#ty as ::bindoc::Convert>::is)
                    });
                    decodes.push(quote! {
                        #ident: match obj.get(#key) {
                            ::core::option::Option::Some(v) => {
                                <#ty as ::bindoc::Convert>::decode(v)
                                    .map_err(|e| e.in_field(#key))?
                            }
                            ::core::option::Option::None => {
                                ::core::default::Default::default()
                            }
                        },
                    });
                } else {
                    is_checks.push(quote! {
                        obj.get(#key).is_some_and(<#ty as ::bindoc::Convert>::is)
                    });
                    decodes.push(quote! {
                        #ident: match obj.get(#key) {
                            ::core::option::Option::Some(v) => {
                                <#ty as ::bindoc::Convert>::decode(v)
                                    .map_err(|e| e.in_field(#key))?
                            }
                            ::core::option::Option::None => {
                                return ::core::result::Result::Err(
                                    ::bindoc::Error::for_field(
                                        ::bindoc::ErrorCode::MissingField,
                                        #key,
                                    ),
                                );
                            }
                        },
                    });
                }

                encodes.push(quote! {
                    obj.insert(#key, ::bindoc::Convert::encode(&self.#ident));
                });
            }

            quote! {
                impl #impl_generics ::bindoc::Convert for #name #ty_generics #where_clause {
                    fn is(value: &::bindoc::Value) -> bool {
                        let ::core::option::Option::Some(obj) = value.as_object() else {
                            return false;
                        };
                        true #(&& #is_checks)*
                    }

                    fn decode(value: &::bindoc::Value) -> ::core::result::Result<Self, ::bindoc::Error> {
                        let obj = value.as_object().ok_or_else(|| {
                            ::bindoc::Error::new(::bindoc::ErrorCode::ExpectedObject, 0)
                        })?;
                        ::core::result::Result::Ok(Self { #(#decodes)* })
                    }

                    fn encode(&self) -> ::bindoc::Value {
                        // Fields appear in declared order.
                        let mut obj = ::bindoc::Object::insertion();
                        #(#encodes)*
                        ::bindoc::Value::Object(obj)
                    }
                }
                impl #impl_generics ::bindoc::Element for #name #ty_generics #base_where_clause {}
            }
        }
        Fields::Unnamed(fields) => {
            let mut is_checks = Vec::new();
            let mut decodes = Vec::new();
            let mut encodes = Vec::new();

            for (idx, field) in fields.unnamed.iter().enumerate() {
                let attr = match parse_convert_attrs(&field.attrs) {
                    Ok(attr) => attr,
                    Err(err) => return err.to_compile_error(),
                };
                if attr.skip || attr.default || attr.rename.is_some() {
                    return syn::Error::new(
                        field.span(),
                        "convert attributes are not supported on tuple fields",
                    )
                    .to_compile_error();
                }
                let ty = &field.ty;
                if !type_mentions_ident(ty, name) {
                    add_where_bound(wc, ty, quote!(::bindoc::Convert));
                }
                let index = syn::Index::from(idx);
                is_checks.push(quote! {
                    <#ty as ::bindoc::Convert>::is(&items[#idx])
                });
                decodes.push(quote! {
                    <#ty as ::bindoc::Convert>::decode(&items[#idx])?,
                });
                encodes.push(quote! {
                    ::bindoc::Convert::encode(&self.#index),
                });
            }
            let len = fields.unnamed.len();

            quote! {
                impl #impl_generics ::bindoc::Convert for #name #ty_generics #where_clause {
                    fn is(value: &::bindoc::Value) -> bool {
                        let ::core::option::Option::Some(items) = value.as_array() else {
                            return false;
                        };
                        items.len() == #len #(&& #is_checks)*
                    }

                    fn decode(value: &::bindoc::Value) -> ::core::result::Result<Self, ::bindoc::Error> {
                        let items = value.as_array().ok_or_else(|| {
                            ::bindoc::Error::new(::bindoc::ErrorCode::ExpectedArray, 0)
                        })?;
                        if items.len() != #len {
                            return ::core::result::Result::Err(::bindoc::Error::new(
                                ::bindoc::ErrorCode::InvalidStructure,
                                0,
                            ));
                        }
                        ::core::result::Result::Ok(Self(#(#decodes)*))
                    }

                    fn encode(&self) -> ::bindoc::Value {
                        ::bindoc::Value::Array(::std::vec![#(#encodes)*])
                    }
                }
                impl #impl_generics ::bindoc::Element for #name #ty_generics #base_where_clause {}
            }
        }
        Fields::Unit => quote! {
            impl #impl_generics ::bindoc::Convert for #name #ty_generics #base_where_clause {
                fn is(value: &::bindoc::Value) -> bool {
                    value.is_null()
                }

                fn decode(value: &::bindoc::Value) -> ::core::result::Result<Self, ::bindoc::Error> {
                    if value.is_null() {
                        ::core::result::Result::Ok(Self)
                    } else {
                        ::core::result::Result::Err(::bindoc::Error::new(
                            ::bindoc::ErrorCode::ExpectedNull,
                            0,
                        ))
                    }
                }

                fn encode(&self) -> ::bindoc::Value {
                    ::bindoc::Value::Null
                }
            }
            impl #impl_generics ::bindoc::Element for #name #ty_generics #base_where_clause {}
        },
    }
}

/// Derives the `bindoc::Convert` contract from a struct's field list.
#[proc_macro_derive(Convert, attributes(convert))]
pub fn derive_convert(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let out = match &input.data {
        Data::Struct(data) => derive_struct(&input.ident, &input.generics, data),
        Data::Enum(e) => syn::Error::new(
            e.enum_token.span(),
            "Convert cannot be derived for enums; implement the contract manually",
        )
        .to_compile_error(),
        Data::Union(u) => {
            syn::Error::new(u.union_token.span(), "Convert not supported for unions")
                .to_compile_error()
        }
    };
    TokenStream::from(out)
}
