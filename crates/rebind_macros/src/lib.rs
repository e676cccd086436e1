// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Macros for the [`rebind`](https://docs.rs/rebind) crate.
//!
//! # Provided Derives
//!
//! * `#[derive(Bindable)]` – Implements `rebind::Bindable` by reporting every `Inject<T>` field
//!   as a slot that can be bound and later reverted.

use proc_macro::TokenStream;
use syn::{Path, parse_quote};

/// Derive macro implementing `Bindable` for structs with named fields.
///
/// Each field of type `Inject<T>` is reported as a structural attribute declared by the
/// struct. Other fields are ignored unless they are marked as the parent.
///
/// # Attributes
/// * `#[bind(resource)]`, `#[bind(inject)]`, `#[bind(named)]` – Attach a marker of that kind.
/// * `#[bind(binding)]`, `#[bind(binding = "none")]` – Attach a `binding` marker, optionally with a mode.
/// * `#[bind(marker = "kind")]` – Attach a marker of a custom kind.
/// * `#[bind(name = "component")]` – Explicit component name; needs a marker.
/// * `#[bind(static)]`, `#[bind(constant)]` – Exclude the slot from binding.
/// * `#[bind(property)]` – Report the field as a property instead of an attribute.
/// * `#[bind(skip)]` – Do not report the field.
/// * `#[bind(parent)]` – The field holds the ancestor; its lineage and slots follow the struct's own.
///
/// Enums, unions and tuple structs produce a compile error.
///
/// # Example
///
/// The derive is re-exported as `rebind::Bindable`, and its runnable examples live in that crate:
/// the [`Bindable`](https://docs.rs/rebind/latest/rebind/trait.Bindable.html) trait derives a type
/// with a parent and an explicitly named slot, and the [crate documentation](https://docs.rs/rebind)
/// binds a derived test case through a session.
#[proc_macro_derive(Bindable, attributes(bind))]
#[cfg_attr(test, mutants::skip)]
pub fn derive_bindable(input: TokenStream) -> TokenStream {
    let root_path: Path = parse_quote!(::rebind);
    rebind_macros_impl::derive_bindable(input.into(), &root_path).into()
}
