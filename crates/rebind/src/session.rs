// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::sync::Arc;

use crate::{
    Bindable, BindPolicy, BoundResult, Component, ComponentBinder, ComponentSource, EmergencyComponents, NamingFilter, Result,
    RuleCatalog, TypeKey,
};

/// Flags for the binders an [`InjectionSession`] creates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SessionOptions {
    /// Policy shared by all binders of the session. The test case binder always uses loose names.
    pub policy: BindPolicy,

    /// Ancestor cutoff when binding the test case.
    #[cfg_attr(feature = "serde", serde(skip))]
    pub test_case_cutoff: Option<TypeKey>,

    /// Ancestor cutoff when binding objects passed to [`InjectionSession::inject`].
    #[cfg_attr(feature = "serde", serde(skip))]
    pub inject_cutoff: Option<TypeKey>,
}

/// The binding state of one test.
///
/// A session collects the mocks, suppressed types and emergency components registered by a test,
/// binds the test case and any object the test asks for with binders carrying that state, and
/// reverts everything at [`teardown`][Self::teardown]: the test case first, then injected objects
/// newest first. Dropping a session tears it down.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
///
/// use rebind::{Bindable, Component, Container, Inject, InjectionSession};
///
/// trait Mailer: Send + Sync {}
///
/// struct FakeMailer;
///
/// impl Mailer for FakeMailer {}
///
/// #[derive(Bindable)]
/// struct Signup {
///     #[bind(inject)]
///     mailer: Inject<dyn Mailer>,
/// }
///
/// let mut session = InjectionSession::new(Container::new());
///
/// let fake = Arc::new(FakeMailer);
/// session.register_mock(Component::new(Arc::clone(&fake)).implements::<dyn Mailer>(fake));
///
/// let signup = Arc::new(Signup { mailer: Inject::new() });
/// session.inject(Arc::clone(&signup))?;
/// assert!(signup.mailer.is_set());
///
/// session.teardown();
/// assert!(!signup.mailer.is_set());
/// # Ok::<(), rebind::Error>(())
/// ```
#[derive(Debug)]
pub struct InjectionSession {
    binder: ComponentBinder,
    options: SessionOptions,
    mocks: Vec<Component>,
    suppressed: Vec<TypeKey>,
    emergency: EmergencyComponents,
    test_case: Option<BoundResult>,
    injected: Vec<BoundResult>,
}

impl InjectionSession {
    /// A session resolving from `source` with the standard catalog, naming convention and options.
    #[must_use]
    pub fn new(source: impl ComponentSource + 'static) -> Self {
        Self::builder(source).build()
    }

    /// Starts a session resolving from `source`.
    pub fn builder(source: impl ComponentSource + 'static) -> InjectionSessionBuilder {
        InjectionSessionBuilder {
            binder: ComponentBinder::new(source),
            options: SessionOptions::default(),
        }
    }

    /// Registers a stand-in. Earlier registrations win over later ones of the same type.
    pub fn register_mock(&mut self, mock: Component) {
        self.mocks.push(mock);
    }

    /// Slots declared as `key` are left alone by every binder of this session.
    pub fn suppress_binding_of(&mut self, key: TypeKey) {
        if !self.suppressed.contains(&key) {
            self.suppressed.push(key);
        }
    }

    /// Offers `component` to slots declared as `key` on injected values.
    pub fn supply_emergency(&mut self, key: TypeKey, component: Component) {
        self.emergency.insert(key, component);
    }

    /// Binds the test case itself, with loose names.
    ///
    /// A previously bound test case is reverted first.
    ///
    /// # Errors
    ///
    /// Returns the binder's error; nothing stays bound in that case.
    pub fn bind_test_case<T: Bindable>(&mut self, test_case: Arc<T>) -> Result<&BoundResult> {
        if let Some(mut previous) = self.test_case.take() {
            previous.revert();
        }

        let result = self.binder(self.options.test_case_cutoff).loose_names(true).bind(test_case)?;
        Ok(&*self.test_case.insert(result))
    }

    /// Binds `bean` and keeps the result for teardown.
    ///
    /// # Errors
    ///
    /// Returns the binder's error; nothing stays bound in that case.
    pub fn inject<T: Bindable>(&mut self, bean: Arc<T>) -> Result<&BoundResult> {
        let result = self.binder(self.options.inject_cutoff).bind(bean)?;

        let index = self.injected.len();
        self.injected.push(result);
        Ok(&self.injected[index])
    }

    /// Reverts everything the session bound and forgets its registrations.
    ///
    /// Calling it again does nothing.
    pub fn teardown(&mut self) {
        let test_case = self.test_case.take();
        let reverted = usize::from(test_case.is_some()) + self.injected.len();

        if let Some(mut test_case) = test_case {
            test_case.revert();
        }

        for mut result in self.injected.drain(..).rev() {
            result.revert();
        }

        self.mocks.clear();
        self.suppressed.clear();
        self.emergency.clear();

        tracing::event!(
            name: "rebind.teardown",
            tracing::Level::DEBUG,
            rebind.reverted = reverted,
            "session torn down"
        );
    }

    /// Registered mocks, in registration order.
    #[must_use]
    pub fn mocks(&self) -> &[Component] {
        &self.mocks
    }

    /// Types whose slots are never bound.
    #[must_use]
    pub fn suppressed(&self) -> &[TypeKey] {
        &self.suppressed
    }

    /// Components supplied for nested passes.
    #[must_use]
    pub fn emergency(&self) -> &EmergencyComponents {
        &self.emergency
    }

    /// Result of the current test case binding, if any.
    #[must_use]
    pub fn test_case_result(&self) -> Option<&BoundResult> {
        self.test_case.as_ref()
    }

    /// Results of [`inject`][Self::inject] calls not yet torn down, oldest first.
    #[must_use]
    pub fn injected_results(&self) -> &[BoundResult] {
        &self.injected
    }

    /// The options binders of this session are created with.
    #[must_use]
    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    fn binder(&self, cutoff: Option<TypeKey>) -> ComponentBinder {
        self.binder
            .clone()
            .with_policy(self.options.policy)
            .with_cutoff(cutoff)
            .mocks(self.mocks.iter().cloned())
            .non_binding_types(self.suppressed.iter().copied())
            .emergency(self.emergency.clone())
    }
}

impl Drop for InjectionSession {
    fn drop(&mut self) {
        self.teardown();
    }
}

/// Builder for [`InjectionSession`].
#[derive(Debug)]
#[must_use]
pub struct InjectionSessionBuilder {
    binder: ComponentBinder,
    options: SessionOptions,
}

impl InjectionSessionBuilder {
    /// Replaces the rule catalog used by every binder of the session.
    pub fn catalog(mut self, catalog: impl Into<Arc<RuleCatalog>>) -> Self {
        self.binder = self.binder.catalog(catalog);
        self
    }

    /// Replaces the naming filter used by every binder of the session.
    pub fn naming(mut self, naming: impl NamingFilter + 'static) -> Self {
        self.binder = self.binder.naming(naming);
        self
    }

    /// Replaces the session options.
    pub fn options(mut self, options: SessionOptions) -> Self {
        self.options = options;
        self
    }

    /// Creates the session.
    #[must_use]
    pub fn build(self) -> InjectionSession {
        InjectionSession {
            binder: self.binder,
            options: self.options,
            mocks: Vec::new(),
            suppressed: Vec::new(),
            emergency: EmergencyComponents::new(),
            test_case: None,
            injected: Vec::new(),
        }
    }
}
