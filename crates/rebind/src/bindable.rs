// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::{Attribute, Property, TypeKey};

/// Structural introspection of an object whose slots can be bound.
///
/// Types usually get this through `#[derive(Bindable)]`; a hand-written implementation is needed for
/// anything the derive does not express, such as inaccessible slots or read-only properties.
///
/// Inheritance is modelled by composition: an ancestor object embedded in a field contributes its
/// [`lineage`][Bindable::lineage] after the embedding type, and its attributes and properties after
/// the embedding type's own.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
///
/// use rebind::{Attribute, Bindable, Inject, Property, TypeKey};
///
/// struct Clock;
///
/// struct Scheduler {
///     clock: Inject<Clock>,
/// }
///
/// impl Bindable for Scheduler {
///     fn lineage(&self) -> Vec<TypeKey> {
///         vec![TypeKey::of::<Self>()]
///     }
///
///     fn attributes(&self) -> Vec<Attribute<'_>> {
///         vec![Attribute::new("clock", TypeKey::of::<Self>(), TypeKey::of::<Clock>(), &self.clock)]
///     }
/// }
///
/// let scheduler = Scheduler { clock: Inject::new() };
/// assert_eq!(scheduler.attributes().len(), 1);
/// assert!(scheduler.properties().is_empty());
/// ```
///
/// Deriving it, with the ancestor embedded through `#[bind(parent)]`:
///
/// ```
/// use rebind::{Bindable, Inject, TypeKey};
///
/// trait Clock: Send + Sync {}
/// struct Billing;
///
/// #[derive(Bindable)]
/// struct BaseTest {
///     #[bind(inject)]
///     clock: Inject<dyn Clock>,
/// }
///
/// #[derive(Bindable)]
/// struct InvoiceTest {
///     #[bind(parent)]
///     base: BaseTest,
///     #[bind(resource, name = "billingService")]
///     billing: Inject<Billing>,
/// }
///
/// let test = InvoiceTest {
///     base: BaseTest { clock: Inject::new() },
///     billing: Inject::new(),
/// };
///
/// assert_eq!(test.lineage(), vec![TypeKey::of::<InvoiceTest>(), TypeKey::of::<BaseTest>()]);
///
/// let attributes = test.attributes();
/// assert_eq!(attributes.len(), 2);
/// assert_eq!(attributes[0].marker().and_then(|marker| marker.explicit_name()), Some("billingService"));
/// assert_eq!(attributes[1].declaring_type(), TypeKey::of::<BaseTest>());
/// ```
pub trait Bindable: Send + Sync + 'static {
    /// The concrete type followed by its ancestors, nearest first.
    fn lineage(&self) -> Vec<TypeKey>;

    /// Every structural slot, across the whole lineage.
    fn attributes(&self) -> Vec<Attribute<'_>>;

    /// Every property, across the whole lineage.
    fn properties(&self) -> Vec<Property<'_>> {
        Vec::new()
    }
}
