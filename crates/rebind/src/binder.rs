// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use crate::ledger::{BoundField, BoundProperty, BoundResult};
use crate::source::{EmergencySource, MockListSource};
use crate::{
    Bindable, BindingMarker, BindingRule, Component, ComponentSource, EmergencyComponents, Error, NamingConvention,
    NamingFilter, ObjectId, Result, RuleCatalog, SlotAccess, SlotAccessError, SlotId, SlotValue, TypeKey,
};

/// Policy switches of a [`ComponentBinder`].
///
/// Nested binders inherit the policy of the binder that spawned them, with loose names switched off
/// and overriding switched on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[expect(clippy::struct_excessive_bools, reason = "independent switches, each documented on its own")]
pub struct BindPolicy {
    /// Properties whose write accessor carries no known marker are skipped.
    pub annotation_only: bool,

    /// Slots declared with a non-interface type are resolved by name only.
    pub interface_only_by_type: bool,

    /// Unmarked slots are bound too, and one leading `_` is stripped from slot names.
    pub loose_names: bool,

    /// Slots that already hold a value are rebound.
    pub override_existing: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Route {
    Mock,
    Name,
    Type,
}

impl Route {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Mock => "mock",
            Self::Name => "name",
            Self::Type => "type",
        }
    }
}

struct Resolved {
    component: Component,
    route: Route,
}

/// One bindable slot, structural or property, as seen by the resolution algorithm.
struct Slot<'a> {
    id: SlotId,
    declared: TypeKey,
    marker: Option<&'a BindingMarker>,
    access: Option<&'a dyn SlotAccess>,
}

struct Bound {
    prior: SlotValue,
    component: Component,
    mocked: bool,
}

/// Fills the slots of an object from a [`ComponentSource`] and undoes it again.
///
/// Every slot reported by the target's [`Bindable`] implementation within the ancestor cutoff is
/// considered once. A slot is resolved, in order of precedence:
///
/// 1. from the first registered mock that is an instance of the slot's declared type,
/// 2. by name, when the slot's marker forces it, carries an explicit name, or when
///    [`interface_only_by_type`][BindPolicy::interface_only_by_type] is on and the declared type is
///    not an interface,
/// 3. by type, when the slot's marker forces it,
/// 4. otherwise by name, falling back to by type.
///
/// Slots that resolve to nothing are left alone. Each value written into a slot is itself bound by
/// nested passes that answer only from the emergency components and from the mocks.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
///
/// use rebind::{Bindable, Component, ComponentBinder, Container, Inject};
///
/// struct Clock;
///
/// #[derive(Bindable)]
/// struct Scheduler {
///     #[bind(resource)]
///     clock: Inject<Clock>,
/// }
///
/// let container = Container::new();
/// container.register_named("clock", Component::new(Arc::new(Clock)));
///
/// let scheduler = Arc::new(Scheduler { clock: Inject::new() });
/// let binder = ComponentBinder::new(container);
///
/// let mut result = binder.bind(Arc::clone(&scheduler))?;
/// assert!(scheduler.clock.is_set());
///
/// binder.revert(&mut result);
/// assert!(!scheduler.clock.is_set());
/// # Ok::<(), rebind::Error>(())
/// ```
#[derive(Clone)]
pub struct ComponentBinder {
    source: Arc<dyn ComponentSource>,
    catalog: Arc<RuleCatalog>,
    naming: Arc<dyn NamingFilter>,
    cutoff: Option<TypeKey>,
    policy: BindPolicy,
    non_binding: Arc<[TypeKey]>,
    mocks: Arc<[Component]>,
    emergency: Arc<EmergencyComponents>,
}

impl ComponentBinder {
    /// A binder resolving from `source` with the standard catalog and naming convention.
    #[must_use]
    pub fn new(source: impl ComponentSource + 'static) -> Self {
        Self::with_source(Arc::new(source))
    }

    fn with_source(source: Arc<dyn ComponentSource>) -> Self {
        Self {
            source,
            catalog: Arc::new(RuleCatalog::standard()),
            naming: Arc::new(NamingConvention::new()),
            cutoff: None,
            policy: BindPolicy::default(),
            non_binding: Arc::from([]),
            mocks: Arc::from([]),
            emergency: Arc::default(),
        }
    }

    /// Replaces the rule catalog that decides which markers are binding markers.
    #[must_use]
    pub fn catalog(mut self, catalog: impl Into<Arc<RuleCatalog>>) -> Self {
        self.catalog = catalog.into();
        self
    }

    /// Replaces the filter applied to names before by-name lookups.
    #[must_use]
    pub fn naming(mut self, naming: impl NamingFilter + 'static) -> Self {
        self.naming = Arc::new(naming);
        self
    }

    /// Stops the ancestor walk at `cutoff`; slots declared by `cutoff` and its ancestors are never touched.
    #[must_use]
    pub fn with_cutoff(mut self, cutoff: impl Into<Option<TypeKey>>) -> Self {
        self.cutoff = cutoff.into();
        self
    }

    /// Replaces every policy switch at once.
    #[must_use]
    pub fn with_policy(mut self, policy: BindPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// See [`BindPolicy::annotation_only`].
    #[must_use]
    pub fn annotation_only(mut self, enabled: bool) -> Self {
        self.policy.annotation_only = enabled;
        self
    }

    /// See [`BindPolicy::interface_only_by_type`].
    #[must_use]
    pub fn interface_only_by_type(mut self, enabled: bool) -> Self {
        self.policy.interface_only_by_type = enabled;
        self
    }

    /// See [`BindPolicy::loose_names`].
    #[must_use]
    pub fn loose_names(mut self, enabled: bool) -> Self {
        self.policy.loose_names = enabled;
        self
    }

    /// See [`BindPolicy::override_existing`].
    #[must_use]
    pub fn override_existing(mut self, enabled: bool) -> Self {
        self.policy.override_existing = enabled;
        self
    }

    /// Slots declared with any of these types are never bound.
    #[must_use]
    pub fn non_binding_types(mut self, types: impl IntoIterator<Item = TypeKey>) -> Self {
        self.non_binding = types.into_iter().collect();
        self
    }

    /// Stand-ins that win resolution for every slot whose type they satisfy, first match first.
    #[must_use]
    pub fn mocks(mut self, mocks: impl IntoIterator<Item = Component>) -> Self {
        self.mocks = mocks.into_iter().collect();
        self
    }

    /// Components offered to the slots of injected values by a nested pass.
    #[must_use]
    pub fn emergency(mut self, emergency: EmergencyComponents) -> Self {
        self.emergency = Arc::new(emergency);
        self
    }

    /// The policy switches in effect.
    #[must_use]
    pub fn policy(&self) -> BindPolicy {
        self.policy
    }

    /// The ancestor cutoff, if any.
    #[must_use]
    pub fn cutoff(&self) -> Option<TypeKey> {
        self.cutoff
    }

    /// Binds the slots of `target`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SlotAccess`] when a slot the binder decided to bind cannot be read or
    /// written, and [`Error::InvalidArgument`] when `target` reports no lineage. Mutations already
    /// made by the call are reverted before the error is returned.
    pub fn bind<T: Bindable>(&self, target: Arc<T>) -> Result<BoundResult> {
        self.bind_dyn(target)
    }

    /// Binds the slots of a type-erased `target`.
    ///
    /// # Errors
    ///
    /// See [`bind`][Self::bind].
    pub fn bind_dyn(&self, target: Arc<dyn Bindable>) -> Result<BoundResult> {
        self.bind_guarded(target, &mut Vec::new())
    }

    /// Restores every slot recorded in `result`. Failures are logged, never returned.
    pub fn revert(&self, result: &mut BoundResult) {
        result.revert();
    }

    /// Reverts `results` newest first.
    pub fn revert_all(&self, results: &mut [BoundResult]) {
        for result in results.iter_mut().rev() {
            result.revert();
        }
    }

    fn bind_guarded(&self, target: Arc<dyn Bindable>, stack: &mut Vec<ObjectId>) -> Result<BoundResult> {
        let lineage = target.lineage();
        let Some(concrete) = lineage.first().copied() else {
            return Err(Error::InvalidArgument("bind target reports an empty lineage".to_string()));
        };

        let levels: Vec<TypeKey> = lineage.into_iter().take_while(|key| Some(*key) != self.cutoff).collect();
        let mut result = BoundResult::new(Arc::clone(&target), concrete.name());

        stack.push(ObjectId::of(&target));
        let outcome = self.bind_slots(target.as_ref(), &levels, &mut result, stack);
        stack.pop();

        match outcome {
            Ok(()) => Ok(result),
            Err(error) => {
                result.revert();
                Err(error)
            }
        }
    }

    fn bind_slots(&self, target: &dyn Bindable, levels: &[TypeKey], result: &mut BoundResult, stack: &mut Vec<ObjectId>) -> Result<()> {
        let target_name = result.target_name();
        let mut seen = HashSet::new();

        for attribute in target.attributes() {
            let id = attribute.id();
            if !levels.contains(&attribute.declaring_type()) || !seen.insert(id) {
                continue;
            }

            let modifiers = attribute.modifiers();
            if modifiers.is_static || modifiers.is_constant {
                skip(target_name, id, "static or constant");
                continue;
            }

            let slot = Slot {
                id,
                declared: attribute.declared_type(),
                marker: attribute.marker(),
                access: attribute.access(),
            };

            if let Some(bound) = self.bind_slot(target_name, &slot, stack)? {
                result.push_field(BoundField::new(id, bound.prior));
                self.bind_nested(&bound.component, bound.mocked, result, stack)?;
            }
        }

        seen.clear();
        for property in target.properties() {
            let (Some(writer), Some(id)) = (property.writer(), property.id()) else {
                continue;
            };

            if !levels.contains(&writer.declaring_type()) || !seen.insert(id) {
                continue;
            }

            if writer.access().is_none() {
                skip(target_name, id, "write accessor is not accessible");
                continue;
            }

            if self.policy.annotation_only && !writer.marker().is_some_and(|marker| self.catalog.contains(marker.kind())) {
                skip(target_name, id, "write accessor is unmarked");
                continue;
            }

            let slot = Slot {
                id,
                declared: property.declared_type(),
                marker: writer.marker(),
                access: writer.access(),
            };

            if let Some(bound) = self.bind_slot(target_name, &slot, stack)? {
                result.push_property(BoundProperty::new(id, bound.prior));
                self.bind_nested(&bound.component, bound.mocked, result, stack)?;
            }
        }

        Ok(())
    }

    fn bind_slot(&self, target_name: &'static str, slot: &Slot<'_>, stack: &[ObjectId]) -> Result<Option<Bound>> {
        if slot.declared.is_primitive() {
            skip(target_name, slot.id, "primitive type");
            return Ok(None);
        }

        let marker = slot.marker.filter(|marker| self.catalog.contains(marker.kind()));
        let rule = marker.and_then(|marker| self.catalog.rule_for(marker.kind()));

        if marker.is_none() && !self.policy.loose_names {
            skip(target_name, slot.id, "no binding marker");
            return Ok(None);
        }

        if self.non_binding.contains(&slot.declared) {
            skip(target_name, slot.id, "non-binding type");
            return Ok(None);
        }

        if rule.zip(marker).is_some_and(|(rule, marker)| rule.suppresses(marker)) {
            skip(target_name, slot.id, "suppressed by marker");
            return Ok(None);
        }

        let access = slot.access.ok_or(Error::SlotAccess {
            target: target_name,
            slot: slot.id,
            source: SlotAccessError::Inaccessible,
        })?;

        if !self.policy.override_existing && !access.holds_default() {
            skip(target_name, slot.id, "already holds a value");
            return Ok(None);
        }

        let excluded = stack.last().copied();
        let Some(resolved) = self.resolve(slot, marker, rule, excluded) else {
            skip(target_name, slot.id, "nothing to bind");
            return Ok(None);
        };

        let prior = access.snapshot();
        access.assign(&resolved.component).map_err(|source| Error::SlotAccess {
            target: target_name,
            slot: slot.id,
            source,
        })?;

        tracing::event!(
            name: "rebind.bind",
            tracing::Level::DEBUG,
            rebind.target = target_name,
            rebind.slot = %slot.id,
            rebind.route = resolved.route.as_str(),
            rebind.component = resolved.component.concrete_type().name(),
            "bound slot"
        );

        Ok(Some(Bound {
            prior,
            mocked: resolved.route == Route::Mock,
            component: resolved.component,
        }))
    }

    fn resolve(&self, slot: &Slot<'_>, marker: Option<&BindingMarker>, rule: Option<&BindingRule>, excluded: Option<ObjectId>) -> Option<Resolved> {
        let declared = slot.declared;
        if declared.is_any_object() {
            return None;
        }

        if let Some(mock) = self
            .mocks
            .iter()
            .find(|mock| Some(mock.identity()) != excluded && mock.is_instance_of(&declared))
        {
            return Some(Resolved {
                component: mock.clone(),
                route: Route::Mock,
            });
        }

        let explicit_name = marker.and_then(BindingMarker::explicit_name);
        let by_name_forced = rule.is_some_and(BindingRule::forces_by_name)
            || explicit_name.is_some()
            || (self.policy.interface_only_by_type && !declared.is_interface());
        let by_type_forced = rule.is_some_and(BindingRule::forces_by_type);

        if by_name_forced {
            self.resolve_by_name(slot, explicit_name)
        } else if by_type_forced {
            self.resolve_by_type(&declared)
        } else {
            self.resolve_by_name(slot, None).or_else(|| self.resolve_by_type(&declared))
        }
    }

    fn resolve_by_name(&self, slot: &Slot<'_>, explicit_name: Option<&str>) -> Option<Resolved> {
        let name = match explicit_name {
            Some(name) => name.to_string(),
            None => {
                let candidate = slot.id.name();
                let candidate = if self.policy.loose_names {
                    candidate.strip_prefix('_').unwrap_or(candidate)
                } else {
                    candidate
                };

                self.naming.filter(candidate, &slot.declared)?
            }
        };

        if !self.source.has_named(&name) {
            return None;
        }

        let component = self.source.fetch_named(&name)?;
        if !component.is_instance_of(&slot.declared) {
            return None;
        }

        Some(Resolved {
            component,
            route: Route::Name,
        })
    }

    fn resolve_by_type(&self, declared: &TypeKey) -> Option<Resolved> {
        if !self.source.has_type(declared) {
            return None;
        }

        let component = self.source.fetch_type(declared)?;
        if !component.is_instance_of(declared) {
            return None;
        }

        Some(Resolved {
            component,
            route: Route::Type,
        })
    }

    fn bind_nested(&self, component: &Component, mocked: bool, result: &mut BoundResult, stack: &mut Vec<ObjectId>) -> Result<()> {
        let Some(value) = component.as_bindable() else {
            return Ok(());
        };

        if stack.contains(&component.identity()) {
            tracing::event!(
                name: "rebind.skip",
                tracing::Level::TRACE,
                rebind.target = component.concrete_type().name(),
                rebind.reason = "already being bound",
                "skipped nested binding"
            );
            return Ok(());
        }

        if !self.emergency.is_empty() {
            let mut child = self.child(Arc::new(EmergencySource::new(Arc::clone(&self.emergency))));
            child.mocks = Arc::from([]);
            result.push_nested(child.bind_guarded(Arc::clone(&value), stack)?);
        }

        if !self.mocks.is_empty() && !mocked {
            let child = self.child(Arc::new(MockListSource::new(Arc::clone(&self.mocks), component.identity())));
            result.push_nested(child.bind_guarded(value, stack)?);
        }

        Ok(())
    }

    fn child(&self, source: Arc<dyn ComponentSource>) -> Self {
        let mut child = self.clone();
        child.source = source;
        child.policy.loose_names = false;
        child.policy.override_existing = true;
        child
    }
}

fn skip(target: &'static str, slot: SlotId, reason: &'static str) {
    tracing::event!(
        name: "rebind.skip",
        tracing::Level::TRACE,
        rebind.target = target,
        rebind.slot = %slot,
        rebind.reason = reason,
        "skipped slot"
    );
}

impl fmt::Debug for ComponentBinder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentBinder")
            .field("catalog", &self.catalog)
            .field("naming", &self.naming)
            .field("cutoff", &self.cutoff)
            .field("policy", &self.policy)
            .field("non_binding", &self.non_binding)
            .field("mocks", &self.mocks.len())
            .field("emergency", &self.emergency.len())
            .finish_non_exhaustive()
    }
}
