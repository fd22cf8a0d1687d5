//! Purpose: `#[derive(Strict)]` for named-field structs.
//! Exports: the `Strict` derive macro.
//! Role: Turns field declarations and `#[strict(...)]` attributes into a static
//!   field policy table plus per-field storage accessors.
//! Invariants: Generated code refers only to `::strictjson::api` paths.
//! Invariants: Duplicate wire names and unknown attribute keys fail at compile time.
use std::collections::HashMap;

use proc_macro::TokenStream;
use proc_macro2::Span;
use quote::quote;
use syn::ext::IdentExt;
use syn::{parse_macro_input, Data, DeriveInput, Fields, LitStr};

/// Derive strict decoding for a struct with named fields.
///
/// Field attributes:
/// #[strict(rename = "wire")]   match this key instead of the field name
/// #[strict(omit_empty)]        never required (alias: `optional`)
/// #[strict(skip)]              not decoded; its key is reported as not allowed
#[proc_macro_derive(Strict, attributes(strict))]
pub fn derive_strict(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

struct FieldSpec {
    member: syn::Ident,
    ty: syn::Type,
    ident: String,
    rename: Option<LitStr>,
    omit_empty: bool,
    skip: bool,
}

impl FieldSpec {
    fn wire_name(&self) -> String {
        match &self.rename {
            Some(name) if !name.value().is_empty() => name.value(),
            _ => self.ident.clone(),
        }
    }
}

fn expand(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "#[derive(Strict)] does not support generic records",
        ));
    }
    let named = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    &input.ident,
                    "#[derive(Strict)] requires a struct with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &input.ident,
                "#[derive(Strict)] only supports structs",
            ));
        }
    };

    let mut specs = Vec::with_capacity(named.len());
    for field in named {
        let Some(member) = field.ident.clone() else {
            continue;
        };
        let mut spec = FieldSpec {
            ident: member.unraw().to_string(),
            member,
            ty: field.ty.clone(),
            rename: None,
            omit_empty: false,
            skip: false,
        };
        for attr in &field.attrs {
            if !attr.path().is_ident("strict") {
                continue;
            }
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("rename") {
                    spec.rename = Some(meta.value()?.parse()?);
                    Ok(())
                } else if meta.path.is_ident("omit_empty") || meta.path.is_ident("optional") {
                    spec.omit_empty = true;
                    Ok(())
                } else if meta.path.is_ident("skip") {
                    spec.skip = true;
                    Ok(())
                } else {
                    Err(meta.error("unknown strict attribute; expected rename, omit_empty, optional, or skip"))
                }
            })?;
        }
        specs.push(spec);
    }

    let mut seen: HashMap<String, &FieldSpec> = HashMap::new();
    for spec in specs.iter().filter(|spec| !spec.skip) {
        let wire = spec.wire_name();
        if let Some(previous) = seen.insert(wire.clone(), spec) {
            return Err(syn::Error::new_spanned(
                &spec.member,
                format!(
                    "wire name {wire:?} is already used by field `{}`",
                    previous.member
                ),
            ));
        }
    }

    let name = &input.ident;
    let name_lit = LitStr::new(&name.to_string(), Span::call_site());
    let count = specs.len();

    let metas = specs.iter().map(|spec| {
        let ident_lit = LitStr::new(&spec.ident, Span::call_site());
        let ty = &spec.ty;
        let kind = if spec.skip {
            quote! { ::strictjson::api::ShapeKind::Scalar }
        } else {
            quote! { <#ty as ::strictjson::api::Shaped>::KIND }
        };
        let rename = spec
            .rename
            .as_ref()
            .map(|lit| quote! { .rename(#lit) });
        let omit_empty = spec.omit_empty.then(|| quote! { .omit_empty() });
        let skip = spec.skip.then(|| quote! { .ignore() });
        quote! {
            ::strictjson::api::FieldPolicy::resolve(
                ::strictjson::api::FieldMeta::new(#ident_lit, #kind) #rename #omit_empty #skip
            )
        }
    });

    let live: Vec<(usize, &FieldSpec)> = specs
        .iter()
        .enumerate()
        .filter(|(_, spec)| !spec.skip)
        .collect();
    let mut_arms = live.iter().map(|(index, spec)| {
        let member = &spec.member;
        quote! { #index => ::core::option::Option::Some(&mut self.#member as &mut dyn ::strictjson::api::Strict), }
    });
    let ref_arms = live.iter().map(|(index, spec)| {
        let member = &spec.member;
        quote! { #index => ::core::option::Option::Some(&self.#member as &dyn ::strictjson::api::Strict), }
    });

    Ok(quote! {
        impl ::strictjson::api::Shaped for #name {
            const KIND: ::strictjson::api::ShapeKind = ::strictjson::api::ShapeKind::Record;
        }

        impl ::strictjson::api::Strict for #name {
            fn target(&mut self) -> ::strictjson::api::Target<'_> {
                ::strictjson::api::Target::Record(self)
            }
        }

        impl ::strictjson::api::Record for #name {
            fn record_name(&self) -> &'static str {
                #name_lit
            }

            fn fields(&self) -> &'static [::strictjson::api::FieldPolicy] {
                static FIELDS: [::strictjson::api::FieldPolicy; #count] = [ #( #metas ),* ];
                &FIELDS
            }

            fn field_mut(&mut self, index: usize) -> ::core::option::Option<&mut dyn ::strictjson::api::Strict> {
                match index {
                    #( #mut_arms )*
                    _ => ::core::option::Option::None,
                }
            }

            fn field_ref(&self, index: usize) -> ::core::option::Option<&dyn ::strictjson::api::Strict> {
                match index {
                    #( #ref_arms )*
                    _ => ::core::option::Option::None,
                }
            }
        }
    })
}
