// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::any::{Any, type_name};
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::{BindingMarker, Component, SlotAccessError, TypeKey};

/// Identity of one slot: the type that declares it and its name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotId {
    declaring: TypeKey,
    name: &'static str,
}

impl SlotId {
    /// Identity of the slot `name` declared by `declaring`.
    #[must_use]
    pub fn new(declaring: TypeKey, name: &'static str) -> Self {
        Self { declaring, name }
    }

    /// The type that declares the slot.
    #[must_use]
    pub fn declaring(&self) -> TypeKey {
        self.declaring
    }

    /// Name of the slot within its declaring type.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.declaring.simple_name(), self.name)
    }
}

/// A type-erased snapshot of what a slot held, used to restore it later.
pub struct SlotValue {
    // `Some(Box<Arc<T>>)` for a populated slot of type `T`.
    value: Option<Box<dyn Any + Send + Sync>>,
    type_name: &'static str,
}

impl SlotValue {
    /// Snapshot of an `Inject<T>` cell.
    #[must_use]
    pub fn of<T: ?Sized + Send + Sync + 'static>(value: Option<Arc<T>>) -> Self {
        Self {
            value: value.map(|value| Box::new(value) as Box<dyn Any + Send + Sync>),
            type_name: type_name::<T>(),
        }
    }

    /// Whether the slot held nothing.
    #[must_use]
    pub fn is_none(&self) -> bool {
        self.value.is_none()
    }

    /// The held value viewed as `T`, if the slot held one of that type.
    #[must_use]
    pub fn get<T: ?Sized + 'static>(&self) -> Option<&Arc<T>> {
        self.value.as_ref().and_then(|value| value.downcast_ref::<Arc<T>>())
    }

    /// Name of the slot type the snapshot was taken from.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    fn into_inner<T: ?Sized + Send + Sync + 'static>(self) -> Result<Option<Arc<T>>, SlotAccessError> {
        if self.type_name != type_name::<T>() {
            return Err(SlotAccessError::TypeMismatch {
                expected: type_name::<T>(),
                actual: self.type_name,
            });
        }

        match self.value {
            None => Ok(None),
            Some(value) => value
                .downcast::<Arc<T>>()
                .map(|value| Some(*value))
                .map_err(|_| SlotAccessError::TypeMismatch {
                    expected: type_name::<T>(),
                    actual: self.type_name,
                }),
        }
    }
}

impl fmt::Debug for SlotValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SlotValue")
            .field("type_name", &self.type_name)
            .field("is_none", &self.is_none())
            .finish_non_exhaustive()
    }
}

/// Read and write access to one slot, independent of its static type.
///
/// All operations take `&self`: slots live in shared objects and are mutated in place.
pub trait SlotAccess: Send + Sync {
    /// Whether the slot holds its default (empty) value.
    fn holds_default(&self) -> bool;

    /// Captures the current value.
    fn snapshot(&self) -> SlotValue;

    /// Writes `component` into the slot, viewed as the slot's type.
    ///
    /// # Errors
    ///
    /// Returns an error when the component cannot be viewed as the slot's type.
    fn assign(&self, component: &Component) -> Result<(), SlotAccessError>;

    /// Puts back a value previously captured with [`snapshot`][SlotAccess::snapshot].
    ///
    /// # Errors
    ///
    /// Returns an error when the snapshot was taken from a slot of another type.
    fn restore(&self, value: SlotValue) -> Result<(), SlotAccessError>;
}

/// A slot that the binder can fill.
///
/// `Inject<T>` starts empty and is written through a shared reference, so a container-managed object
/// held in an `Arc` can still be rebound.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
///
/// use rebind::Inject;
///
/// let slot: Inject<String> = Inject::new();
/// assert!(slot.get().is_none());
///
/// slot.set(Some(Arc::new("bound".to_string())));
/// assert_eq!(slot.get().as_deref().map(String::as_str), Some("bound"));
/// ```
pub struct Inject<T: ?Sized> {
    cell: RwLock<Option<Arc<T>>>,
}

impl<T: ?Sized> Inject<T> {
    /// An empty slot.
    #[must_use]
    pub fn new() -> Self {
        Self { cell: RwLock::new(None) }
    }

    /// A slot that already holds `value`.
    #[must_use]
    pub fn with(value: Arc<T>) -> Self {
        Self {
            cell: RwLock::new(Some(value)),
        }
    }

    /// The current value, if any.
    #[must_use]
    pub fn get(&self) -> Option<Arc<T>> {
        self.cell.read().clone()
    }

    /// Replaces the current value.
    pub fn set(&self, value: Option<Arc<T>>) {
        *self.cell.write() = value;
    }

    /// Whether the slot holds a value.
    #[must_use]
    pub fn is_set(&self) -> bool {
        self.cell.read().is_some()
    }
}

impl<T: ?Sized> Default for Inject<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized> fmt::Debug for Inject<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Inject")
            .field("type", &type_name::<T>())
            .field("is_set", &self.is_set())
            .finish_non_exhaustive()
    }
}

impl<T: ?Sized + Send + Sync + 'static> SlotAccess for Inject<T> {
    fn holds_default(&self) -> bool {
        !self.is_set()
    }

    fn snapshot(&self) -> SlotValue {
        SlotValue::of(self.get())
    }

    fn assign(&self, component: &Component) -> Result<(), SlotAccessError> {
        let value = component.view::<T>().ok_or_else(|| SlotAccessError::TypeMismatch {
            expected: type_name::<T>(),
            actual: component.concrete_type().name(),
        })?;

        self.set(Some(value));
        Ok(())
    }

    fn restore(&self, value: SlotValue) -> Result<(), SlotAccessError> {
        self.set(value.into_inner::<T>()?);
        Ok(())
    }
}

/// Modifiers of a structural attribute that exclude it from binding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    /// The attribute belongs to its type rather than to an instance.
    pub is_static: bool,

    /// The attribute cannot be reassigned once initialized.
    pub is_constant: bool,
}

/// A structural slot reported by a [`Bindable`][crate::Bindable] type.
#[derive(Clone, Copy)]
pub struct Attribute<'a> {
    name: &'static str,
    declaring: TypeKey,
    declared: TypeKey,
    modifiers: Modifiers,
    marker: Option<BindingMarker>,
    access: Option<&'a dyn SlotAccess>,
}

impl<'a> Attribute<'a> {
    /// An accessible, unmarked attribute.
    #[must_use]
    pub fn new(name: &'static str, declaring: TypeKey, declared: TypeKey, access: &'a dyn SlotAccess) -> Self {
        Self {
            name,
            declaring,
            declared,
            modifiers: Modifiers::default(),
            marker: None,
            access: Some(access),
        }
    }

    /// An attribute the binder can see but cannot read or write.
    #[must_use]
    pub fn inaccessible(name: &'static str, declaring: TypeKey, declared: TypeKey) -> Self {
        Self {
            name,
            declaring,
            declared,
            modifiers: Modifiers::default(),
            marker: None,
            access: None,
        }
    }

    /// Attaches a binding marker to the attribute.
    #[must_use]
    pub fn with_marker(mut self, marker: BindingMarker) -> Self {
        self.marker = Some(marker);
        self
    }

    /// Replaces the attribute's modifiers.
    #[must_use]
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Name of the attribute.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Identity of the attribute: its declaring type and name.
    #[must_use]
    pub fn id(&self) -> SlotId {
        SlotId::new(self.declaring, self.name)
    }

    /// The type that declares the attribute.
    #[must_use]
    pub fn declaring_type(&self) -> TypeKey {
        self.declaring
    }

    /// The type of value the attribute holds.
    #[must_use]
    pub fn declared_type(&self) -> TypeKey {
        self.declared
    }

    /// Modifiers of the attribute.
    #[must_use]
    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    /// The binding marker, if the attribute carries one.
    #[must_use]
    pub fn marker(&self) -> Option<&BindingMarker> {
        self.marker.as_ref()
    }

    /// Read and write access to the slot, or `None` when it is inaccessible.
    #[must_use]
    pub fn access(&self) -> Option<&'a dyn SlotAccess> {
        self.access
    }
}

impl fmt::Debug for Attribute<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Attribute")
            .field("id", &self.id())
            .field("declared", &self.declared)
            .field("modifiers", &self.modifiers)
            .field("marker", &self.marker)
            .field("accessible", &self.access.is_some())
            .finish()
    }
}

/// The write accessor of a [`Property`].
#[derive(Clone, Copy)]
pub struct Writer<'a> {
    declaring: TypeKey,
    marker: Option<BindingMarker>,
    access: Option<&'a dyn SlotAccess>,
}

impl<'a> Writer<'a> {
    /// A callable write accessor declared by `declaring`.
    #[must_use]
    pub fn new(declaring: TypeKey, access: &'a dyn SlotAccess) -> Self {
        Self {
            declaring,
            marker: None,
            access: Some(access),
        }
    }

    /// A write accessor that exists but cannot be called.
    #[must_use]
    pub fn inaccessible(declaring: TypeKey) -> Self {
        Self {
            declaring,
            marker: None,
            access: None,
        }
    }

    /// Attaches a binding marker to the accessor.
    #[must_use]
    pub fn with_marker(mut self, marker: BindingMarker) -> Self {
        self.marker = Some(marker);
        self
    }

    /// The type that declares the accessor.
    #[must_use]
    pub fn declaring_type(&self) -> TypeKey {
        self.declaring
    }

    /// The binding marker, if the accessor carries one.
    #[must_use]
    pub fn marker(&self) -> Option<&BindingMarker> {
        self.marker.as_ref()
    }

    /// Write access to the property, or `None` when the accessor cannot be called.
    #[must_use]
    pub fn access(&self) -> Option<&'a dyn SlotAccess> {
        self.access
    }
}

impl fmt::Debug for Writer<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Writer")
            .field("declaring", &self.declaring)
            .field("marker", &self.marker)
            .field("accessible", &self.access.is_some())
            .finish()
    }
}

/// A property slot reported by a [`Bindable`][crate::Bindable] type.
///
/// Properties are considered independently of structural attributes, so a property and an attribute
/// of the same name are each evaluated under their own rules.
#[derive(Debug, Clone, Copy)]
pub struct Property<'a> {
    name: &'static str,
    declared: TypeKey,
    writer: Option<Writer<'a>>,
}

impl<'a> Property<'a> {
    /// A property written through `writer`.
    #[must_use]
    pub fn new(name: &'static str, declared: TypeKey, writer: Writer<'a>) -> Self {
        Self {
            name,
            declared,
            writer: Some(writer),
        }
    }

    /// A property without a write accessor.
    #[must_use]
    pub fn read_only(name: &'static str, declared: TypeKey) -> Self {
        Self {
            name,
            declared,
            writer: None,
        }
    }

    /// Name of the property.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The type of value the property takes.
    #[must_use]
    pub fn declared_type(&self) -> TypeKey {
        self.declared
    }

    /// The write accessor, if the property has one.
    #[must_use]
    pub fn writer(&self) -> Option<&Writer<'a>> {
        self.writer.as_ref()
    }

    /// Identity of the property, keyed by the type declaring its write accessor.
    #[must_use]
    pub fn id(&self) -> Option<SlotId> {
        self.writer.as_ref().map(|writer| SlotId::new(writer.declaring, self.name))
    }
}
