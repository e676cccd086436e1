// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::any::{Any, TypeId, type_name};
use std::fmt;
use std::hash::{Hash, Hasher};

/// How a type participates in resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    /// A concrete struct or enum.
    Concrete,

    /// A trait object type such as `dyn Greeter`.
    Interface,

    /// A scalar such as `u32` or `bool`. Never bindable.
    Primitive,

    /// The universal "any object" type. Never resolves.
    AnyObject,
}

/// Identity of a type as seen by the binder.
///
/// Two keys are equal when they describe the same [`TypeId`]; every [`TypeKind::AnyObject`] key is
/// equal to every other, whichever `dyn Any` flavour produced it.
///
/// # Examples
///
/// ```
/// use rebind::{TypeKey, TypeKind};
///
/// trait Greeter {}
///
/// let key = TypeKey::interface::<dyn Greeter>();
/// assert_eq!(key.kind(), TypeKind::Interface);
/// assert_eq!(key.simple_name(), "Greeter");
/// ```
#[derive(Clone, Copy)]
pub struct TypeKey {
    id: TypeId,
    name: &'static str,
    kind: TypeKind,
}

impl TypeKey {
    /// Describes a concrete type.
    #[must_use]
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self::with_kind::<T>(TypeKind::Concrete)
    }

    /// Describes a trait object type.
    #[must_use]
    pub fn interface<T: ?Sized + 'static>() -> Self {
        Self::with_kind::<T>(TypeKind::Interface)
    }

    /// Describes a scalar type.
    #[must_use]
    pub fn primitive<T: 'static>() -> Self {
        Self::with_kind::<T>(TypeKind::Primitive)
    }

    /// The canonical "any object" key.
    #[must_use]
    pub fn any_object() -> Self {
        Self::with_kind::<dyn Any + Send + Sync>(TypeKind::AnyObject)
    }

    /// Describes `T` with an explicit kind.
    #[must_use]
    pub fn with_kind<T: ?Sized + 'static>(kind: TypeKind) -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
            kind,
        }
    }

    /// The underlying [`TypeId`].
    #[must_use]
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// The full type name as reported by [`std::any::type_name`].
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// How the type participates in resolution.
    #[must_use]
    pub fn kind(&self) -> TypeKind {
        self.kind
    }

    /// Whether the key describes a trait object type.
    #[must_use]
    pub fn is_interface(&self) -> bool {
        self.kind == TypeKind::Interface
    }

    /// Whether the key describes a scalar.
    #[must_use]
    pub fn is_primitive(&self) -> bool {
        self.kind == TypeKind::Primitive
    }

    /// Whether the key is the "any object" type.
    #[must_use]
    pub fn is_any_object(&self) -> bool {
        self.kind == TypeKind::AnyObject
    }

    /// The last path segment of the type name, generic arguments included.
    ///
    /// `alloc::vec::Vec<my_crate::Item>` becomes `Vec<my_crate::Item>`.
    #[must_use]
    pub fn simple_name(&self) -> &'static str {
        let head_end = self.name.find('<').unwrap_or(self.name.len());
        let head = &self.name[..head_end];
        let start = head.rfind("::").map_or(0, |index| index + 2);

        &self.name[start..]
    }
}

impl PartialEq for TypeKey {
    fn eq(&self, other: &Self) -> bool {
        if self.is_any_object() || other.is_any_object() {
            return self.kind == other.kind;
        }

        self.id == other.id
    }
}

impl Eq for TypeKey {}

impl Hash for TypeKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        if self.is_any_object() {
            TypeKind::AnyObject.hash(state);
        } else {
            self.id.hash(state);
        }
    }
}

impl fmt::Debug for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeKey")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

#[cfg_attr(coverage_nightly, coverage(off))]
#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    trait Greeter {}

    struct Greeting;

    #[test]
    fn assert_types() {
        static_assertions::assert_impl_all!(TypeKey: Send, Sync, Copy);
    }

    #[test]
    fn equality_follows_type_id() {
        assert_eq!(TypeKey::of::<Greeting>(), TypeKey::of::<Greeting>());
        assert_ne!(TypeKey::of::<Greeting>(), TypeKey::interface::<dyn Greeter>());
        assert_eq!(TypeKey::of::<Greeting>(), TypeKey::with_kind::<Greeting>(TypeKind::Interface));
    }

    #[test]
    fn any_object_keys_collapse() {
        let plain = TypeKey::with_kind::<dyn Any>(TypeKind::AnyObject);

        assert_eq!(plain, TypeKey::any_object());
        assert_ne!(TypeKey::any_object(), TypeKey::of::<dyn Any + Send + Sync>());

        let set: HashSet<_> = [plain, TypeKey::any_object()].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn simple_name_strips_path() {
        assert_eq!(TypeKey::of::<Greeting>().simple_name(), "Greeting");
        assert_eq!(TypeKey::primitive::<u32>().simple_name(), "u32");
        assert_eq!(TypeKey::of::<Vec<Greeting>>().simple_name(), "Vec<rebind::type_key::tests::Greeting>");
    }

    #[test]
    fn kind_predicates() {
        assert!(TypeKey::interface::<dyn Greeter>().is_interface());
        assert!(TypeKey::primitive::<bool>().is_primitive());
        assert!(TypeKey::any_object().is_any_object());
        assert!(!TypeKey::of::<Greeting>().is_interface());
    }
}
