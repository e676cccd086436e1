// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::fmt;

use parking_lot::RwLock;

use crate::{Component, ComponentSource, TypeKey};

struct Entry {
    name: Option<String>,
    component: Component,
}

/// A simple in-memory component registry.
///
/// Components are registered with or without a name. A type lookup only succeeds when exactly one
/// registered component is an instance of the requested type; ambiguous lookups report "absent",
/// the same as a missing registration.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
///
/// use rebind::{Component, ComponentSource, Container, TypeKey};
///
/// struct Clock;
///
/// let container = Container::new();
/// container.register_named("clock", Component::new(Arc::new(Clock)));
///
/// assert!(container.has_named("clock"));
/// assert!(container.has_type(&TypeKey::of::<Clock>()));
/// ```
#[derive(Default)]
pub struct Container {
    entries: RwLock<Vec<Entry>>,
}

impl Container {
    /// An empty container.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an unnamed component, reachable by type only.
    pub fn register(&self, component: Component) {
        self.entries.write().push(Entry { name: None, component });
    }

    /// Registers `component` under `name`, replacing any component previously registered under it.
    pub fn register_named(&self, name: impl Into<String>, component: Component) {
        let name = name.into();
        let mut entries = self.entries.write();

        entries.retain(|entry| entry.name.as_deref() != Some(name.as_str()));
        entries.push(Entry {
            name: Some(name),
            component,
        });
    }

    /// Number of registered components.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Whether nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    fn unique_of_type(&self, key: &TypeKey) -> Option<Component> {
        let entries = self.entries.read();
        let mut matches = entries.iter().filter(|entry| entry.component.is_instance_of(key));

        let first = matches.next()?;
        if matches.next().is_some() {
            tracing::event!(
                name: "rebind.container.ambiguous",
                tracing::Level::DEBUG,
                rebind.type_name = key.name(),
                "more than one component matches the requested type"
            );
            return None;
        }

        Some(first.component.clone())
    }
}

impl ComponentSource for Container {
    fn has_named(&self, name: &str) -> bool {
        self.entries.read().iter().any(|entry| entry.name.as_deref() == Some(name))
    }

    fn has_type(&self, key: &TypeKey) -> bool {
        !key.is_any_object() && self.unique_of_type(key).is_some()
    }

    fn fetch_named(&self, name: &str) -> Option<Component> {
        self.entries
            .read()
            .iter()
            .find(|entry| entry.name.as_deref() == Some(name))
            .map(|entry| entry.component.clone())
    }

    fn fetch_type(&self, key: &TypeKey) -> Option<Component> {
        if key.is_any_object() {
            return None;
        }

        self.unique_of_type(key)
    }
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entries = self.entries.read();

        f.debug_struct("Container")
            .field(
                "entries",
                &entries
                    .iter()
                    .map(|entry| (entry.name.as_deref(), entry.component.concrete_type().name()))
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}
