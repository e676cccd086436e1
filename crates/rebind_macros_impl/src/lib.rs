// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! Macros for the [`rebind`](https://docs.rs/rebind) crate.

// Internal implementation crate (no proc-macro entrypoints).
// Generates a Bindable impl against an arbitrary crate root path.

use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::ext::IdentExt;
use syn::{Data, DeriveInput, Field, Fields, GenericParam, Ident, Path, parse_quote};

/// Parsing of the `#[bind(...)]` helper attribute.
pub mod field_attrs;

/// Classification of slot types.
pub mod slot_type;

#[cfg(test)]
mod tests;

use field_attrs::{FieldOptions, MarkerOption, parse_field_attrs};
use slot_type::{inject_inner, type_key_expr};

/// Core implementation of `#[derive(Bindable)]`.
///
/// This crate is a normal library crate (not `proc-macro`), so we operate purely
/// on `proc_macro2::TokenStream` and let the wrapper perform the conversion.
#[must_use]
pub fn derive_bindable(input: TokenStream2, root_path: &Path) -> TokenStream2 {
    let parsed: syn::Result<DeriveInput> = syn::parse2(input);
    parsed
        .and_then(|di| impl_bindable(&di, root_path))
        .unwrap_or_else(|e| e.to_compile_error())
}

struct Slots {
    parent: Option<Ident>,
    attributes: Vec<TokenStream2>,
    properties: Vec<TokenStream2>,
}

fn impl_bindable(input: &DeriveInput, root_path: &Path) -> syn::Result<TokenStream2> {
    let name = &input.ident;

    let fields = match &input.data {
        Data::Struct(s) => &s.fields,
        Data::Enum(_) => {
            return Err(syn::Error::new_spanned(name, "#[derive(Bindable)] does not support enums"));
        }
        Data::Union(_) => {
            return Err(syn::Error::new_spanned(name, "#[derive(Bindable)] does not support unions"));
        }
    };

    let slots = match fields {
        Fields::Named(named) => collect_slots(named.named.iter(), root_path)?,
        Fields::Unit => Slots {
            parent: None,
            attributes: Vec::new(),
            properties: Vec::new(),
        },
        Fields::Unnamed(_) => {
            return Err(syn::Error::new_spanned(
                fields,
                "#[derive(Bindable)] needs named fields; tuple structs are not supported",
            ));
        }
    };

    let mut generics = input.generics.clone();
    for param in &mut generics.params {
        if let GenericParam::Type(ty_param) = param {
            ty_param.bounds.push(parse_quote!(::core::marker::Send));
            ty_param.bounds.push(parse_quote!(::core::marker::Sync));
            ty_param.bounds.push(parse_quote!('static));
        }
    }
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let lineage = collect(
        &[quote! { #root_path::TypeKey::of::<Self>() }],
        slots.parent.as_ref(),
        &quote! { #root_path::Bindable::lineage },
    );
    let attributes = collect(&slots.attributes, slots.parent.as_ref(), &quote! { #root_path::Bindable::attributes });
    let properties = collect(&slots.properties, slots.parent.as_ref(), &quote! { #root_path::Bindable::properties });

    Ok(quote! {
        impl #impl_generics #root_path::Bindable for #name #ty_generics #where_clause {
            fn lineage(&self) -> ::std::vec::Vec<#root_path::TypeKey> {
                #lineage
            }

            fn attributes(&self) -> ::std::vec::Vec<#root_path::Attribute<'_>> {
                #attributes
            }

            fn properties(&self) -> ::std::vec::Vec<#root_path::Property<'_>> {
                #properties
            }
        }
    })
}

fn collect(own: &[TokenStream2], parent: Option<&Ident>, inherited: &TokenStream2) -> TokenStream2 {
    match parent {
        Some(parent) => quote! {
            let mut items = ::std::vec::Vec::from([#(#own),*]);
            items.extend(#inherited(&self.#parent));
            items
        },
        None if own.is_empty() => quote! { ::std::vec::Vec::new() },
        None => quote! { ::std::vec::Vec::from([#(#own),*]) },
    }
}

fn collect_slots<'a>(fields: impl Iterator<Item = &'a Field>, root_path: &Path) -> syn::Result<Slots> {
    let mut slots = Slots {
        parent: None,
        attributes: Vec::new(),
        properties: Vec::new(),
    };

    for field in fields {
        let options = parse_field_attrs(&field.attrs)?;
        let Some(ident) = &field.ident else {
            continue;
        };

        if options.parent {
            if slots.parent.is_some() {
                return Err(syn::Error::new_spanned(ident, "a struct has at most one `parent` field"));
            }
            slots.parent = Some(ident.clone());
            continue;
        }

        if options.skip {
            continue;
        }

        let Some(inner) = inject_inner(&field.ty) else {
            if options.describes_slot() {
                return Err(syn::Error::new_spanned(
                    &field.ty,
                    "bind options describe a slot, which must have type `Inject<T>`",
                ));
            }
            continue;
        };

        let slot_name = ident.unraw().to_string();
        let declared = type_key_expr(inner, root_path);
        let marker = marker_call(&options, root_path);

        if options.property {
            if options.is_static || options.is_constant {
                return Err(syn::Error::new_spanned(
                    ident,
                    "`static` and `constant` apply to attributes, not to properties",
                ));
            }

            slots.properties.push(quote! {
                #root_path::Property::new(
                    #slot_name,
                    #declared,
                    #root_path::Writer::new(#root_path::TypeKey::of::<Self>(), &self.#ident) #marker,
                )
            });
        } else {
            let modifiers = modifiers_call(&options, root_path);
            slots.attributes.push(quote! {
                #root_path::Attribute::new(#slot_name, #root_path::TypeKey::of::<Self>(), #declared, &self.#ident)
                    #marker
                    #modifiers
            });
        }
    }

    Ok(slots)
}

fn marker_call(options: &FieldOptions, root_path: &Path) -> TokenStream2 {
    let Some(marker) = &options.marker else {
        return TokenStream2::new();
    };

    let kind = match marker {
        MarkerOption::Resource => quote! { #root_path::MarkerKind::RESOURCE },
        MarkerOption::Inject => quote! { #root_path::MarkerKind::INJECT },
        MarkerOption::Named => quote! { #root_path::MarkerKind::NAMED },
        MarkerOption::Binding => quote! { #root_path::MarkerKind::BINDING },
        MarkerOption::Custom(kind) => quote! { #root_path::MarkerKind::new(#kind) },
    };
    let name = options.name.as_ref().map(|name| quote! { .with_name(#name) });
    let mode = options.mode.as_ref().map(|mode| quote! { .with_mode(#mode) });

    quote! { .with_marker(#root_path::BindingMarker::new(#kind) #name #mode) }
}

fn modifiers_call(options: &FieldOptions, root_path: &Path) -> TokenStream2 {
    if !options.is_static && !options.is_constant {
        return TokenStream2::new();
    }

    let is_static = options.is_static;
    let is_constant = options.is_constant;
    quote! {
        .with_modifiers(#root_path::Modifiers {
            is_static: #is_static,
            is_constant: #is_constant,
        })
    }
}
