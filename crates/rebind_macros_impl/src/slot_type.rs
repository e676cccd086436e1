// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{GenericArgument, Path, PathArguments, Type, TypeParamBound};

const SCALARS: &[&str] = &[
    "bool", "char", "i8", "i16", "i32", "i64", "i128", "isize", "u8", "u16", "u32", "u64", "u128", "usize", "f32", "f64",
];

/// Returns `T` when `ty` is written as `Inject<T>` (optionally path-qualified).
#[must_use]
pub fn inject_inner(ty: &Type) -> Option<&Type> {
    let Type::Path(type_path) = ty else {
        return None;
    };

    if type_path.qself.is_some() {
        return None;
    }

    let segment = type_path.path.segments.last()?;
    if segment.ident != "Inject" {
        return None;
    }

    let PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };

    let mut types = args.args.iter().filter_map(|arg| match arg {
        GenericArgument::Type(inner) => Some(inner),
        _ => None,
    });

    match (types.next(), types.next()) {
        (Some(inner), None) => Some(inner),
        _ => None,
    }
}

/// Builds the `TypeKey` expression describing the declared type of a slot.
#[must_use]
pub fn type_key_expr(inner: &Type, root_path: &Path) -> TokenStream2 {
    match peel(inner) {
        Type::TraitObject(object) if object.bounds.iter().any(is_any_bound) => {
            quote! { #root_path::TypeKey::with_kind::<#inner>(#root_path::TypeKind::AnyObject) }
        }
        Type::TraitObject(_) => quote! { #root_path::TypeKey::interface::<#inner>() },
        Type::Path(type_path) if type_path.qself.is_none() && is_scalar(&type_path.path) => {
            quote! { #root_path::TypeKey::primitive::<#inner>() }
        }
        _ => quote! { #root_path::TypeKey::of::<#inner>() },
    }
}

fn peel(ty: &Type) -> &Type {
    match ty {
        Type::Paren(paren) => peel(&paren.elem),
        Type::Group(group) => peel(&group.elem),
        other => other,
    }
}

fn is_any_bound(bound: &TypeParamBound) -> bool {
    matches!(bound, TypeParamBound::Trait(trait_bound) if trait_bound.path.segments.last().is_some_and(|seg| seg.ident == "Any"))
}

fn is_scalar(path: &Path) -> bool {
    path.leading_colon.is_none()
        && path.segments.len() == 1
        && path.segments[0].arguments.is_none()
        && SCALARS.iter().any(|scalar| path.segments[0].ident == scalar)
}

#[cfg_attr(coverage_nightly, coverage(off))]
#[cfg(test)]
mod tests {
    use syn::parse_quote;

    use super::*;

    fn key(ty: &Type) -> String {
        let root: Path = parse_quote!(::rebind);
        type_key_expr(ty, &root).to_string()
    }

    #[test]
    fn finds_inject_inner_type() {
        let ty: Type = parse_quote!(Inject<dyn Clock>);
        assert!(inject_inner(&ty).is_some());

        let ty: Type = parse_quote!(::rebind::Inject<Billing>);
        assert!(inject_inner(&ty).is_some());
    }

    #[test]
    fn ignores_other_types() {
        let ty: Type = parse_quote!(Option<Billing>);
        assert!(inject_inner(&ty).is_none());

        let ty: Type = parse_quote!(Inject);
        assert!(inject_inner(&ty).is_none());

        let ty: Type = parse_quote!(&'static Inject<Billing>);
        assert!(inject_inner(&ty).is_none());
    }

    #[test]
    fn classifies_declared_types() {
        assert!(key(&parse_quote!(dyn Any + Send + Sync)).contains("TypeKind :: AnyObject"));
        assert!(key(&parse_quote!(dyn std::any::Any + Send + Sync)).contains("TypeKind :: AnyObject"));
        assert!(key(&parse_quote!(dyn Clock)).contains("TypeKey :: interface"));
        assert!(key(&parse_quote!(u32)).contains("TypeKey :: primitive"));
        assert!(key(&parse_quote!(bool)).contains("TypeKey :: primitive"));
        assert!(key(&parse_quote!(Billing)).contains("TypeKey :: of"));
        assert!(key(&parse_quote!(std::string::String)).contains("TypeKey :: of"));
    }

    #[test]
    fn qualified_scalars_are_not_primitive() {
        assert!(key(&parse_quote!(core::primitive::u32)).contains("TypeKey :: of"));
    }
}
