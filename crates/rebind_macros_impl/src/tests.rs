// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg_attr(coverage_nightly, coverage(off))]

use quote::quote;

fn expand(input: proc_macro2::TokenStream) -> String {
    let root: syn::Path = syn::parse_quote!(::rebind);
    let ts = super::derive_bindable(input, &root);
    // Pretty print if it parses as a file; fall back to raw tokens.
    syn::parse_file(&ts.to_string()).map_or_else(|_| ts.to_string(), |f| prettyplease::unparse(&f))
}

#[test]
fn exposes_only_inject_fields() {
    let output = expand(quote! {
        struct Report {
            clock: Inject<dyn Clock>,
            title: String,
        }
    });

    assert!(output.contains("impl ::rebind::Bindable for Report"));
    assert!(output.contains("\"clock\""));
    assert!(output.contains("::rebind::TypeKey::interface::<dyn Clock>()"));
    assert!(!output.contains("title"));
}

#[test]
fn unit_struct_has_no_slots() {
    let output = expand(quote! { struct Empty; });

    assert!(output.contains("::std::vec::Vec::from([::rebind::TypeKey::of::<Self>()])"));
    assert!(output.contains("::std::vec::Vec::new()"));
}

#[test]
fn skipped_fields_are_hidden() {
    let output = expand(quote! {
        struct Report {
            #[bind(skip)]
            clock: Inject<dyn Clock>,
        }
    });

    assert!(!output.contains("\"clock\""));
}

#[test]
fn raw_identifiers_keep_their_name() {
    let output = expand(quote! {
        struct Report {
            r#type: Inject<Kind>,
        }
    });

    assert!(output.contains("\"type\""));
    assert!(output.contains("&self.r#type"));
}

#[test]
fn parent_adds_mutable_collection() {
    let output = expand(quote! {
        struct Child {
            #[bind(parent)]
            base: Base,
            clock: Inject<dyn Clock>,
        }
    });

    assert!(output.contains("let mut items"));
    assert!(output.contains("::rebind::Bindable::lineage(&self.base)"));
    assert!(output.contains("::rebind::Bindable::attributes(&self.base)"));
    assert!(output.contains("::rebind::Bindable::properties(&self.base)"));
}

#[test]
fn generic_params_get_bounds() {
    let output = expand(quote! {
        struct Holder<T> {
            value: Inject<T>,
        }
    });

    assert!(output.contains("::core::marker::Send"));
    assert!(output.contains("'static"));
    assert!(output.contains("for Holder<T>"));
}

#[test]
fn property_without_marker() {
    let output = expand(quote! {
        struct Report {
            #[bind(property)]
            printer: Inject<Printer>,
        }
    });

    assert!(output.contains("::rebind::Property::new("));
    assert!(output.contains("::rebind::Writer::new("));
    assert!(output.contains("&self.printer"));
    assert!(!output.contains(".with_marker("));
}

#[test]
fn custom_marker_kind() {
    let output = expand(quote! {
        struct Report {
            #[bind(marker = "autowired")]
            printer: Inject<Printer>,
        }
    });

    assert!(output.contains(".with_marker("));
    assert!(output.contains("::rebind::MarkerKind::new(\"autowired\")"));
}

#[test]
fn rejects_enums() {
    let output = expand(quote! { enum Mode { A, B } });

    assert!(output.contains("compile_error"));
    assert!(output.contains("does not support enums"));
}

#[test]
fn rejects_unions() {
    let output = expand(quote! { union Bits { a: u32, b: f32 } });

    assert!(output.contains("does not support unions"));
}

#[test]
fn rejects_tuple_structs() {
    let output = expand(quote! { struct Pair(Inject<Clock>, u32); });

    assert!(output.contains("tuple structs are not supported"));
}

#[test]
fn rejects_two_parents() {
    let output = expand(quote! {
        struct Child {
            #[bind(parent)]
            first: Base,
            #[bind(parent)]
            second: Base,
        }
    });

    assert!(output.contains("at most one `parent`"));
}

#[test]
fn rejects_slot_options_on_plain_fields() {
    let output = expand(quote! {
        struct Report {
            #[bind(resource)]
            title: String,
        }
    });

    assert!(output.contains("must have type `Inject<T>`"));
}

#[test]
fn rejects_modifiers_on_properties() {
    let output = expand(quote! {
        struct Report {
            #[bind(property, static)]
            printer: Inject<Printer>,
        }
    });

    assert!(output.contains("apply to attributes, not to properties"));
}

#[test]
fn rejects_unknown_options() {
    let output = expand(quote! {
        struct Report {
            #[bind(autowire)]
            printer: Inject<Printer>,
        }
    });

    assert!(output.contains("unknown bind option"));
}
