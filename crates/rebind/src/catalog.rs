// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::collections::HashMap;
use std::fmt;

use crate::{BindingMarker, MarkerKind};

/// Decides whether a marker switches binding off for its slot.
pub type SuppressFn = fn(&BindingMarker) -> bool;

/// How slots carrying one kind of marker are resolved.
#[derive(Clone, Copy)]
pub struct BindingRule {
    by_name_only: bool,
    by_type_only: bool,
    suppresses: SuppressFn,
}

impl BindingRule {
    /// A rule that forces nothing and never suppresses.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            by_name_only: false,
            by_type_only: false,
            suppresses: never,
        }
    }

    /// Resolve matching slots by name only.
    #[must_use]
    pub const fn by_name_only(mut self) -> Self {
        self.by_name_only = true;
        self
    }

    /// Resolve matching slots by type only.
    #[must_use]
    pub const fn by_type_only(mut self) -> Self {
        self.by_type_only = true;
        self
    }

    /// Skip a slot whenever `suppresses` returns `true` for its marker.
    #[must_use]
    pub const fn suppress_when(mut self, suppresses: SuppressFn) -> Self {
        self.suppresses = suppresses;
        self
    }

    /// Whether the rule forces resolution by name.
    #[must_use]
    pub const fn forces_by_name(&self) -> bool {
        self.by_name_only
    }

    /// Whether the rule forces resolution by type.
    #[must_use]
    pub const fn forces_by_type(&self) -> bool {
        self.by_type_only
    }

    /// Whether `marker` means "do not bind this slot".
    #[must_use]
    pub fn suppresses(&self, marker: &BindingMarker) -> bool {
        (self.suppresses)(marker)
    }
}

impl Default for BindingRule {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for BindingRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BindingRule")
            .field("by_name_only", &self.by_name_only)
            .field("by_type_only", &self.by_type_only)
            .finish_non_exhaustive()
    }
}

const fn never(_: &BindingMarker) -> bool {
    false
}

fn mode_is_none(marker: &BindingMarker) -> bool {
    marker.mode().is_some_and(|mode| mode.eq_ignore_ascii_case("none"))
}

/// Maps marker kinds to the rules that govern them.
///
/// A catalog is filled once through its [builder][RuleCatalog::builder] and is read-only afterwards.
/// Marker kinds it does not know are not binding markers.
///
/// # Examples
///
/// ```
/// use rebind::{BindingRule, MarkerKind, RuleCatalog};
///
/// let catalog = RuleCatalog::builder()
///     .standard()
///     .rule(MarkerKind::new("autowired"), BindingRule::new().by_type_only())
///     .build();
///
/// assert!(catalog.rule_for(MarkerKind::new("autowired")).unwrap().forces_by_type());
/// assert!(catalog.rule_for(MarkerKind::new("unknown")).is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct RuleCatalog {
    rules: HashMap<MarkerKind, BindingRule>,
}

impl RuleCatalog {
    /// Starts an empty catalog.
    /// Freezes the registered rules into a catalog.
    #[must_use]
    pub fn builder() -> RuleCatalogBuilder {
        RuleCatalogBuilder::default()
    }

    /// The catalog with the four standard marker kinds.
    ///
    /// | kind | forces by name | forces by type | suppresses |
    /// |---|---|---|---|
    /// | `resource` | no | no | never |
    /// | `inject` | no | yes | never |
    /// | `named` | yes | no | never |
    /// | `binding` | no | no | when its mode is `none` |
    #[must_use]
    pub fn standard() -> Self {
        Self::builder().standard().build()
    }

    /// The rule registered for `kind`, or `None` when `kind` is not a binding marker.
    #[must_use]
    pub fn rule_for(&self, kind: MarkerKind) -> Option<&BindingRule> {
        self.rules.get(&kind)
    }

    /// Whether `kind` is a registered binding marker.
    #[must_use]
    pub fn contains(&self, kind: MarkerKind) -> bool {
        self.rules.contains_key(&kind)
    }

    /// Number of registered marker kinds.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether no marker kind is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Builder for [`RuleCatalog`].
#[derive(Debug, Default)]
#[must_use]
pub struct RuleCatalogBuilder {
    rules: HashMap<MarkerKind, BindingRule>,
}

impl RuleCatalogBuilder {
    /// Registers the standard marker kinds. See [`RuleCatalog::standard`].
    pub fn standard(self) -> Self {
        self.rule(MarkerKind::RESOURCE, BindingRule::new())
            .rule(MarkerKind::INJECT, BindingRule::new().by_type_only())
            .rule(MarkerKind::NAMED, BindingRule::new().by_name_only())
            .rule(MarkerKind::BINDING, BindingRule::new().suppress_when(mode_is_none))
    }

    /// Registers `rule` for `kind`, replacing any earlier registration.
    pub fn rule(mut self, kind: MarkerKind, rule: BindingRule) -> Self {
        self.rules.insert(kind, rule);
        self
    }

    /// Freezes the registered rules into a catalog.
    #[must_use]
    pub fn build(self) -> RuleCatalog {
        RuleCatalog { rules: self.rules }
    }
}
