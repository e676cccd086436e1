// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

use crate::{Bindable, TypeKey};

/// Identity of a shared object: the address of its allocation.
///
/// Two handles to the same `Arc` allocation share an identity regardless of the (possibly unsized)
/// type they are viewed through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectId(usize);

impl ObjectId {
    /// Identity of the allocation behind `value`.
    #[must_use]
    pub fn of<T: ?Sized>(value: &Arc<T>) -> Self {
        Self(Arc::as_ptr(value).cast::<()>().addr())
    }
}

#[derive(Clone)]
struct View {
    key: TypeKey,
    // Always an `Arc<T>` where `TypeId::of::<T>() == key.id()`.
    value: Arc<dyn Any + Send + Sync>,
}

/// A type-erased handle to a shared value that can be written into slots.
///
/// A component is an instance of every type it has a view for: its concrete type, plus any
/// interface views added through [`implements`][Component::implements]. Cloning a component is
/// cheap and never clones the underlying value.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
///
/// use rebind::{Component, TypeKey};
///
/// trait Greeter: Send + Sync {
///     fn greet(&self) -> String;
/// }
///
/// struct English;
///
/// impl Greeter for English {
///     fn greet(&self) -> String {
///         "hello".to_string()
///     }
/// }
///
/// let english = Arc::new(English);
/// let component = Component::new(Arc::clone(&english)).implements::<dyn Greeter>(english);
///
/// assert!(component.is_instance_of(&TypeKey::interface::<dyn Greeter>()));
/// assert_eq!(component.view::<dyn Greeter>().unwrap().greet(), "hello");
/// ```
#[derive(Clone)]
pub struct Component {
    concrete: TypeKey,
    identity: ObjectId,
    views: Vec<View>,
    bindable: Option<Arc<dyn Bindable>>,
}

impl Component {
    /// Wraps a shared value, viewable as its concrete type.
    #[must_use]
    pub fn new<T: Send + Sync + 'static>(value: Arc<T>) -> Self {
        let concrete = TypeKey::of::<T>();

        Self {
            concrete,
            identity: ObjectId::of(&value),
            views: vec![View {
                key: concrete,
                value: Arc::new(value),
            }],
            bindable: None,
        }
    }

    /// Wraps a shared value whose own slots can be bound by nested binding passes.
    #[must_use]
    pub fn bindable<T: Bindable>(value: Arc<T>) -> Self {
        let mut component = Self::new(Arc::clone(&value));
        let bindable: Arc<dyn Bindable> = value;
        component.bindable = Some(bindable);
        component
    }

    /// Adds a trait-object view of the same value.
    ///
    /// `view` must point at the same allocation as the wrapped value, typically obtained by
    /// cloning the original `Arc` and letting it coerce.
    #[must_use]
    pub fn implements<I: ?Sized + Send + Sync + 'static>(self, view: Arc<I>) -> Self {
        self.with_view(TypeKey::interface::<I>(), view)
    }

    /// Adds a view of the same value under an explicit key.
    #[must_use]
    pub fn with_view<I: ?Sized + Send + Sync + 'static>(mut self, key: TypeKey, view: Arc<I>) -> Self {
        debug_assert_eq!(
            ObjectId::of(&view),
            self.identity,
            "a component view must share the allocation of the wrapped value"
        );
        debug_assert_eq!(key.id(), TypeId::of::<I>(), "a view key must describe the view type");

        self.views.retain(|existing| existing.key != key);
        self.views.push(View {
            key,
            value: Arc::new(view),
        });
        self
    }

    /// The concrete type of the wrapped value.
    #[must_use]
    pub fn concrete_type(&self) -> TypeKey {
        self.concrete
    }

    /// Identity of the wrapped allocation.
    #[must_use]
    pub fn identity(&self) -> ObjectId {
        self.identity
    }

    /// Every key this component can be handed out as, concrete type first.
    pub fn types(&self) -> impl Iterator<Item = TypeKey> + '_ {
        self.views.iter().map(|view| view.key)
    }

    /// Whether the component can be assigned to a slot declared as `key`.
    #[must_use]
    pub fn is_instance_of(&self, key: &TypeKey) -> bool {
        key.is_any_object() || self.views.iter().any(|view| view.key.id() == key.id())
    }

    /// Returns the value viewed as `T`, if the component has such a view.
    #[must_use]
    pub fn view<T: ?Sized + 'static>(&self) -> Option<Arc<T>> {
        let wanted = TypeId::of::<T>();

        self.views
            .iter()
            .find(|view| view.key.id() == wanted)
            .and_then(|view| view.value.downcast_ref::<Arc<T>>())
            .cloned()
    }

    /// The bindable view of the value, present when built with [`Component::bindable`].
    #[must_use]
    pub fn as_bindable(&self) -> Option<Arc<dyn Bindable>> {
        self.bindable.clone()
    }
}

impl fmt::Debug for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Component")
            .field("concrete", &self.concrete.name())
            .field("identity", &self.identity)
            .field("views", &self.views.iter().map(|view| view.key.name()).collect::<Vec<_>>())
            .field("bindable", &self.bindable.is_some())
            .finish()
    }
}
