// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::fmt;

/// The kind of a binding marker, looked up in a [`RuleCatalog`][crate::RuleCatalog].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MarkerKind(&'static str);

impl MarkerKind {
    /// Resolve by name when a name is available, otherwise by type.
    pub const RESOURCE: Self = Self("resource");

    /// Resolve by type only.
    pub const INJECT: Self = Self("inject");

    /// Resolve by name only.
    pub const NAMED: Self = Self("named");

    /// General-purpose marker whose `mode` can switch binding off.
    pub const BINDING: Self = Self("binding");

    /// A marker kind identified by `kind`.
    #[must_use]
    pub const fn new(kind: &'static str) -> Self {
        Self(kind)
    }

    /// The identifier of the kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for MarkerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Metadata attached to a slot that marks it as a binding candidate.
///
/// # Examples
///
/// ```
/// use rebind::{BindingMarker, MarkerKind};
///
/// let marker = BindingMarker::new(MarkerKind::RESOURCE).with_name("fooService");
///
/// assert_eq!(marker.kind(), MarkerKind::RESOURCE);
/// assert_eq!(marker.explicit_name(), Some("fooService"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BindingMarker {
    kind: MarkerKind,
    name: Option<&'static str>,
    mode: Option<&'static str>,
}

impl BindingMarker {
    /// A marker of `kind` without a name or mode.
    #[must_use]
    pub const fn new(kind: MarkerKind) -> Self {
        Self {
            kind,
            name: None,
            mode: None,
        }
    }

    /// Sets the explicit component name. An empty name counts as no name.
    #[must_use]
    pub const fn with_name(mut self, name: &'static str) -> Self {
        self.name = if name.is_empty() { None } else { Some(name) };
        self
    }

    /// Sets the free-form binding mode consulted by suppressing rules.
    #[must_use]
    pub const fn with_mode(mut self, mode: &'static str) -> Self {
        self.mode = Some(mode);
        self
    }

    /// The marker's kind.
    #[must_use]
    pub const fn kind(&self) -> MarkerKind {
        self.kind
    }

    /// The component name the slot asks for, when one was set.
    #[must_use]
    pub const fn explicit_name(&self) -> Option<&'static str> {
        self.name
    }

    /// The binding mode, when one was set.
    #[must_use]
    pub const fn mode(&self) -> Option<&'static str> {
        self.mode
    }
}

#[cfg_attr(coverage_nightly, coverage(off))]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_name_is_no_name() {
        let marker = BindingMarker::new(MarkerKind::NAMED).with_name("");

        assert_eq!(marker.explicit_name(), None);
    }

    #[test]
    fn custom_kinds_compare_by_value() {
        assert_eq!(MarkerKind::new("resource"), MarkerKind::RESOURCE);
        assert_ne!(MarkerKind::new("autowired"), MarkerKind::INJECT);
        assert_eq!(MarkerKind::BINDING.to_string(), "binding");
    }

    #[test]
    fn mode_is_recorded() {
        let marker = BindingMarker::new(MarkerKind::BINDING).with_mode("none");

        assert_eq!(marker.mode(), Some("none"));
        assert_eq!(marker.explicit_name(), None);
    }
}
