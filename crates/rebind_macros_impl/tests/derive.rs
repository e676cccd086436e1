// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![expect(missing_docs, reason = "This is a test module")]

use quote::quote;
use rebind_macros_impl::derive_bindable;

fn expand(input: proc_macro2::TokenStream) -> String {
    let root: syn::Path = syn::parse_quote!(::rebind);
    let ts = derive_bindable(input, &root);
    // Pretty print if it parses as a file; fall back to raw tokens.
    syn::parse_file(&ts.to_string()).map_or_else(|_| ts.to_string(), |f| prettyplease::unparse(&f))
}

#[test]
#[cfg_attr(miri, ignore)]
fn marked_slots() {
    let output = expand(quote! {
        #[derive(Bindable)]
        struct InvoiceTest {
            #[bind(resource, name = "fooService")]
            helper: Inject<FooService>,
            #[bind(inject)]
            clock: Inject<dyn Clock>,
            #[bind(named)]
            billing: Inject<Billing>,
            #[bind(binding = "none")]
            audit: Inject<Audit>,
        }
    });

    assert!(output.contains("::rebind::MarkerKind::RESOURCE"));
    assert!(output.contains(".with_name(\"fooService\")"));
    assert!(output.contains("::rebind::MarkerKind::INJECT"));
    assert!(output.contains("::rebind::MarkerKind::NAMED"));
    assert!(output.contains("::rebind::MarkerKind::BINDING"));
    assert!(output.contains(".with_mode(\"none\")"));
}

#[test]
#[cfg_attr(miri, ignore)]
fn declared_type_kinds() {
    let output = expand(quote! {
        #[derive(Bindable)]
        struct Holder {
            anything: Inject<dyn Any + Send + Sync>,
            clock: Inject<dyn Clock>,
            count: Inject<u64>,
            billing: Inject<Billing>,
        }
    });

    assert!(output.contains("::rebind::TypeKind::AnyObject"));
    assert!(output.contains("::rebind::TypeKey::interface::<dyn Clock>()"));
    assert!(output.contains("::rebind::TypeKey::primitive::<u64>()"));
    assert!(output.contains("::rebind::TypeKey::of::<Billing>()"));
}

#[test]
#[cfg_attr(miri, ignore)]
fn modifiers() {
    let output = expand(quote! {
        #[derive(Bindable)]
        struct Holder {
            #[bind(constant)]
            shared: Inject<Billing>,
        }
    });

    assert!(output.contains(".with_modifiers("));
    assert!(output.contains("::rebind::Modifiers"));
    assert!(output.contains("is_static: false"));
    assert!(output.contains("is_constant: true"));
}

#[test]
#[cfg_attr(miri, ignore)]
fn custom_root_path() {
    let root: syn::Path = syn::parse_quote!(crate::binding);
    let output = derive_bindable(
        quote! {
            struct Holder {
                clock: Inject<dyn Clock>,
            }
        },
        &root,
    )
    .to_string();

    assert!(output.contains("crate :: binding :: Bindable"));
    assert!(!output.contains(":: rebind"));
}

#[test]
#[cfg_attr(miri, ignore)]
fn errors_carry_spans() {
    let output = expand(quote! {
        #[derive(Bindable)]
        struct Holder {
            #[bind(parent, resource)]
            base: Base,
        }
    });

    assert!(output.contains("compile_error"));
    assert!(output.contains("`parent` cannot be combined"));
}
