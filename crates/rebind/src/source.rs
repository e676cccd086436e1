// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::collections::HashMap;
use std::sync::Arc;

use crate::{Component, ObjectId, TypeKey};

/// The container capability the binder resolves against.
///
/// Existence checks must not fail; a fetch is only issued after the matching existence check
/// answered `true`. Implementations own any caching.
#[cfg_attr(test, mockall::automock)]
pub trait ComponentSource: Send + Sync {
    /// Whether a component is registered under `name`.
    fn has_named(&self, name: &str) -> bool;

    /// Whether exactly one component can be handed out as `key`.
    fn has_type(&self, key: &TypeKey) -> bool;

    /// Fetches the component registered under `name`.
    fn fetch_named(&self, name: &str) -> Option<Component>;

    /// Fetches the component that can be handed out as `key`.
    fn fetch_type(&self, key: &TypeKey) -> Option<Component>;
}

impl<S: ComponentSource + ?Sized> ComponentSource for Arc<S> {
    fn has_named(&self, name: &str) -> bool {
        (**self).has_named(name)
    }

    fn has_type(&self, key: &TypeKey) -> bool {
        (**self).has_type(key)
    }

    fn fetch_named(&self, name: &str) -> Option<Component> {
        (**self).fetch_named(name)
    }

    fn fetch_type(&self, key: &TypeKey) -> Option<Component> {
        (**self).fetch_type(key)
    }
}

/// Components supplied up front for slot types nothing else can tell apart.
pub type EmergencyComponents = HashMap<TypeKey, Component>;

/// Answers by type only, from the registered mocks, first match wins.
///
/// The object currently being bound is never offered to itself.
#[derive(Debug)]
pub(crate) struct MockListSource {
    mocks: Arc<[Component]>,
    excluded: ObjectId,
}

impl MockListSource {
    pub(crate) fn new(mocks: Arc<[Component]>, excluded: ObjectId) -> Self {
        Self { mocks, excluded }
    }

    fn find(&self, key: &TypeKey) -> Option<&Component> {
        self.mocks
            .iter()
            .find(|mock| mock.identity() != self.excluded && mock.is_instance_of(key))
    }
}

impl ComponentSource for MockListSource {
    fn has_named(&self, _name: &str) -> bool {
        false
    }

    fn has_type(&self, key: &TypeKey) -> bool {
        self.find(key).is_some()
    }

    fn fetch_named(&self, _name: &str) -> Option<Component> {
        None
    }

    fn fetch_type(&self, key: &TypeKey) -> Option<Component> {
        self.find(key).cloned()
    }
}

/// Answers by type only, from the emergency component map.
#[derive(Debug)]
pub(crate) struct EmergencySource {
    components: Arc<EmergencyComponents>,
}

impl EmergencySource {
    pub(crate) fn new(components: Arc<EmergencyComponents>) -> Self {
        Self { components }
    }
}

impl ComponentSource for EmergencySource {
    fn has_named(&self, _name: &str) -> bool {
        false
    }

    fn has_type(&self, key: &TypeKey) -> bool {
        self.components.contains_key(key)
    }

    fn fetch_named(&self, _name: &str) -> Option<Component> {
        None
    }

    fn fetch_type(&self, key: &TypeKey) -> Option<Component> {
        self.components.get(key).cloned()
    }
}
