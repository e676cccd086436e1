// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Test-time binding of container components into plain objects, and exact revert.
//!
//! Test code builds ordinary objects and has their dependency slots filled the way a
//! component container would fill them. Every mutation is recorded, so the binding can be
//! undone at teardown without losing references to live container-managed objects.
//!
//! # Concepts
//!
//! - [`Inject<T>`] is a slot: a cell holding an optional `Arc<T>`, writable through `&self`.
//! - [`Bindable`] reports the slots of a type and its ancestors. Derive it with
//!   `#[derive(Bindable)]` and describe each slot with `#[bind(...)]`.
//! - [`BindingMarker`]s attached to slots are interpreted through a [`RuleCatalog`].
//! - [`ComponentSource`] is the container capability components are resolved from;
//!   [`Container`] is a simple in-memory implementation.
//! - [`ComponentBinder`] binds one object and returns a [`BoundResult`] ledger that reverts it.
//! - [`InjectionSession`] owns the mocks and suppressions of one test and reverts everything
//!   on teardown.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//!
//! use rebind::{Bindable, Component, Container, Inject, InjectionSession};
//!
//! trait Clock: Send + Sync {
//!     fn now(&self) -> u64;
//! }
//!
//! struct FixedClock(u64);
//!
//! impl Clock for FixedClock {
//!     fn now(&self) -> u64 {
//!         self.0
//!     }
//! }
//!
//! struct Billing;
//!
//! #[derive(Bindable)]
//! struct InvoiceTest {
//!     billing: Inject<Billing>,
//!     #[bind(inject)]
//!     clock: Inject<dyn Clock>,
//! }
//!
//! let container = Container::new();
//! container.register_named("billing", Component::new(Arc::new(Billing)));
//!
//! let mut session = InjectionSession::new(container);
//! let clock = Arc::new(FixedClock(42));
//! session.register_mock(Component::new(Arc::clone(&clock)).implements::<dyn Clock>(clock));
//!
//! let test = Arc::new(InvoiceTest {
//!     billing: Inject::new(),
//!     clock: Inject::new(),
//! });
//! session.bind_test_case(Arc::clone(&test))?;
//!
//! assert!(test.billing.is_set());
//! assert_eq!(test.clock.get().map(|clock| clock.now()), Some(42));
//!
//! session.teardown();
//! assert!(!test.billing.is_set());
//! assert!(!test.clock.is_set());
//! # Ok::<(), rebind::Error>(())
//! ```
//!
//! # Logging
//!
//! The crate emits `tracing` events and never installs a subscriber:
//!
//! - `rebind.bind` (DEBUG) for every slot written,
//! - `rebind.skip` (TRACE) for every slot deliberately left alone,
//! - `rebind.revert` (WARN) for every slot that could not be restored,
//! - `rebind.teardown` (DEBUG) when a session is torn down.
//!
//! # Feature Flags
//!
//! * **`derive`** *(default)*: re-exports `#[derive(Bindable)]` from `rebind_macros`.
//! * **`serde`**: (de)serialization of [`BindPolicy`] and [`SessionOptions`].

extern crate self as rebind;

mod bindable;
mod binder;
mod catalog;
mod component;
mod container;
mod error;
mod ledger;
mod marker;
mod naming;
mod session;
mod slot;
mod source;
mod type_key;

#[cfg(test)]
mod testing;

pub use bindable::Bindable;
pub use binder::{BindPolicy, ComponentBinder};
pub use catalog::{BindingRule, RuleCatalog, RuleCatalogBuilder, SuppressFn};
pub use component::{Component, ObjectId};
pub use container::Container;
pub use error::{Error, Result, SlotAccessError};
pub use ledger::{BoundField, BoundProperty, BoundResult};
pub use marker::{BindingMarker, MarkerKind};
pub use naming::{NamingConvention, NamingFilter, PassThrough};
/// Derives [`Bindable`] for a struct with named fields.
///
/// Every field of type `Inject<T>` becomes a structural slot declared by the struct. The
/// `#[bind(...)]` attribute refines a field:
///
/// | option | effect |
/// |---|---|
/// | `resource`, `inject`, `named` | attaches a marker of that kind |
/// | `binding = "<mode>"` | attaches a `binding` marker with the given mode |
/// | `marker = "<kind>"` | attaches a marker of a custom kind |
/// | `name = "<component>"` | explicit component name for the marker |
/// | `constant`, `static` | excludes the slot from binding |
/// | `property` | exposes the field as a property written by the struct |
/// | `skip` | does not expose the field |
/// | `parent` | the field holds the ancestor object |
///
/// `dyn Any` slots are never resolved, other `dyn Trait` slots are interfaces, and slots of
/// scalar types are primitives.
#[cfg(feature = "derive")]
#[cfg_attr(docsrs, doc(cfg(feature = "derive")))]
pub use rebind_macros::Bindable;
pub use session::{InjectionSession, InjectionSessionBuilder, SessionOptions};
pub use slot::{Attribute, Inject, Modifiers, Property, SlotAccess, SlotId, SlotValue, Writer};
pub use source::{ComponentSource, EmergencyComponents};
pub use type_key::{TypeKey, TypeKind};
