// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![expect(missing_docs, reason = "Test code")]
#![cfg(feature = "derive")]

use std::sync::Arc;

use rebind::{Bindable, BoundResult, Component, ComponentBinder, Container, Error, Inject, SlotAccessError, TypeKey};

trait Clock: Send + Sync {
    fn now(&self) -> u64;
}

struct FixedClock(u64);

impl Clock for FixedClock {
    fn now(&self) -> u64 {
        self.0
    }
}

struct FooService;

struct Billing(&'static str);

fn clock(now: u64) -> (Arc<FixedClock>, Component) {
    let clock = Arc::new(FixedClock(now));
    let component = Component::new(Arc::clone(&clock));
    let view: Arc<dyn Clock> = Arc::<FixedClock>::clone(&clock);

    (clock, component.implements::<dyn Clock>(view))
}

fn billing(label: &'static str) -> (Arc<Billing>, Component) {
    let billing = Arc::new(Billing(label));
    (Arc::clone(&billing), Component::new(billing))
}

#[derive(Bindable)]
struct Checkout {
    #[bind(resource)]
    clock: Inject<dyn Clock>,
    #[bind(resource)]
    billing: Inject<Billing>,
    #[bind(resource, name = "fooService")]
    foo_helper: Inject<FooService>,
    note: Inject<String>,
}

impl Checkout {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            clock: Inject::new(),
            billing: Inject::new(),
            foo_helper: Inject::new(),
            note: Inject::new(),
        })
    }
}

fn slots(result: &BoundResult) -> Vec<&'static str> {
    result.fields().iter().map(|field| field.slot().name()).collect()
}

#[test]
fn binding_is_deterministic() {
    let container = Container::new();
    container.register(clock(7).1);
    container.register_named("billing", billing("main").1);
    container.register_named("fooService", Component::new(Arc::new(FooService)));
    let binder = ComponentBinder::new(container);

    let first = Checkout::new();
    let second = Checkout::new();
    let first_result = binder.bind(Arc::clone(&first)).unwrap();
    let second_result = binder.bind(Arc::clone(&second)).unwrap();

    assert_eq!(slots(&first_result), vec!["clock", "billing", "foo_helper"]);
    assert_eq!(slots(&first_result), slots(&second_result));
    assert!(Arc::ptr_eq(&first.billing.get().unwrap(), &second.billing.get().unwrap()));
    assert!(!first.note.is_set());
}

#[test]
fn existing_values_are_not_clobbered() {
    let container = Container::new();
    container.register_named("billing", billing("container").1);
    let binder = ComponentBinder::new(container);

    let (own, _) = billing("own");
    let checkout = Checkout::new();
    checkout.billing.set(Some(Arc::clone(&own)));

    let mut result = binder.bind(Arc::clone(&checkout)).unwrap();
    assert!(result.is_empty());
    assert_eq!(checkout.billing.get().unwrap().0, "own");

    binder.revert(&mut result);
    assert!(Arc::ptr_eq(&checkout.billing.get().unwrap(), &own));
}

#[test]
fn revert_restores_the_pre_bind_state() {
    let container = Container::new();
    container.register(clock(1).1);
    container.register_named("billing", billing("container").1);
    let binder = ComponentBinder::new(container).override_existing(true);

    let (own, _) = billing("own");
    let checkout = Checkout::new();
    checkout.billing.set(Some(Arc::clone(&own)));

    let mut result = binder.bind(Arc::clone(&checkout)).unwrap();
    assert_eq!(result.mutation_count(), 2);
    assert_eq!(checkout.billing.get().unwrap().0, "container");
    assert_eq!(checkout.clock.get().unwrap().now(), 1);

    binder.revert(&mut result);
    assert!(Arc::ptr_eq(&checkout.billing.get().unwrap(), &own));
    assert!(!checkout.clock.is_set());
}

#[test]
fn mocks_take_precedence_over_the_container() {
    let container = Container::new();
    container.register(clock(1).1);
    container.register_named("billing", billing("container").1);

    let (mock_clock, mock_component) = clock(99);
    let binder = ComponentBinder::new(container).mocks([mock_component]);

    let checkout = Checkout::new();
    binder.bind(Arc::clone(&checkout)).unwrap();

    let bound: Arc<dyn Clock> = checkout.clock.get().unwrap();
    let expected: Arc<dyn Clock> = mock_clock;
    assert!(Arc::ptr_eq(&bound, &expected));
    assert_eq!(checkout.billing.get().unwrap().0, "container");
}

#[test]
fn explicit_name_replaces_the_slot_name() {
    let container = Container::new();
    container.register_named("foo_helper", Component::new(Arc::new(FooService)));
    let binder = ComponentBinder::new(container);

    let checkout = Checkout::new();
    binder.bind(Arc::clone(&checkout)).unwrap();
    assert!(!checkout.foo_helper.is_set());

    let container = Container::new();
    let service = Arc::new(FooService);
    container.register_named("fooService", Component::new(Arc::clone(&service)));
    let binder = ComponentBinder::new(container);

    let checkout = Checkout::new();
    binder.bind(Arc::clone(&checkout)).unwrap();
    assert!(Arc::ptr_eq(&checkout.foo_helper.get().unwrap(), &service));
}

#[test]
fn mocks_are_picked_by_assignability() {
    let (mock_billing, billing_component) = billing("mock");
    let (mock_clock, clock_component) = clock(5);

    let binder = ComponentBinder::new(Container::new()).mocks([billing_component, clock_component]);

    let checkout = Checkout::new();
    let result = binder.bind(Arc::clone(&checkout)).unwrap();

    assert_eq!(slots(&result), vec!["clock", "billing"]);
    assert!(Arc::ptr_eq(&checkout.billing.get().unwrap(), &mock_billing));
    assert_eq!(checkout.clock.get().unwrap().now(), mock_clock.now());
}

#[test]
fn first_matching_mock_wins() {
    let (first, first_component) = clock(1);
    let (_, second_component) = clock(2);

    let binder = ComponentBinder::new(Container::new()).mocks([first_component, second_component]);

    let checkout = Checkout::new();
    binder.bind(Arc::clone(&checkout)).unwrap();

    assert_eq!(checkout.clock.get().unwrap().now(), first.now());
}

#[test]
fn reverts_run_newest_first() {
    let binder = |label| ComponentBinder::new(Container::new()).override_existing(true).mocks([billing(label).1]);

    let checkout = Checkout::new();
    let mut results = vec![
        binder("a").bind(Arc::clone(&checkout)).unwrap(),
        binder("b").bind(Arc::clone(&checkout)).unwrap(),
        binder("c").bind(Arc::clone(&checkout)).unwrap(),
    ];
    assert_eq!(checkout.billing.get().unwrap().0, "c");

    binder("unused").revert_all(&mut results);
    assert!(!checkout.billing.is_set());
}

#[test]
fn any_object_slots_are_never_bound() {
    #[derive(Bindable)]
    struct Loose {
        #[bind(resource)]
        anything: Inject<dyn std::any::Any + Send + Sync>,
    }

    let container = Container::new();
    container.register_named("anything", billing("any").1);
    let binder = ComponentBinder::new(container).loose_names(true);

    let loose = Arc::new(Loose { anything: Inject::new() });
    assert!(binder.bind(Arc::clone(&loose)).unwrap().is_empty());
    assert!(!loose.anything.is_set());
}

#[test]
fn generic_types_are_vetoed_by_name() {
    #[derive(Bindable)]
    struct Generic {
        #[bind(resource)]
        items: Inject<Vec<Billing>>,
    }

    let container = Container::new();
    container.register_named("items", Component::new(Arc::new(vec![Billing("a")])));
    container.register(billing("b").1);
    let binder = ComponentBinder::new(container);

    let generic = Arc::new(Generic { items: Inject::new() });
    binder.bind(Arc::clone(&generic)).unwrap();

    // by name is vetoed, by type finds the single Vec<Billing> registered under "items"
    assert_eq!(generic.items.get().unwrap().len(), 1);
}

#[test]
fn inaccessible_slots_abort_the_bind() {
    struct Sealed {
        open: Inject<Billing>,
    }

    impl Bindable for Sealed {
        fn lineage(&self) -> Vec<TypeKey> {
            vec![TypeKey::of::<Self>()]
        }

        fn attributes(&self) -> Vec<rebind::Attribute<'_>> {
            vec![
                rebind::Attribute::new("open", TypeKey::of::<Self>(), TypeKey::of::<Billing>(), &self.open)
                    .with_marker(rebind::BindingMarker::new(rebind::MarkerKind::RESOURCE)),
                rebind::Attribute::inaccessible("sealed", TypeKey::of::<Self>(), TypeKey::of::<Billing>())
                    .with_marker(rebind::BindingMarker::new(rebind::MarkerKind::RESOURCE)),
            ]
        }
    }

    let container = Container::new();
    container.register(billing("only").1);
    let binder = ComponentBinder::new(container);

    let sealed = Arc::new(Sealed { open: Inject::new() });
    let error = binder.bind(Arc::clone(&sealed)).unwrap_err();

    assert!(matches!(
        error,
        Error::SlotAccess {
            source: SlotAccessError::Inaccessible,
            ..
        }
    ));
    assert!(error.to_string().contains("Sealed::sealed"));
    assert!(!sealed.open.is_set());
}
