// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Binding a test fixture from a container, overriding one collaborator with a mock.

use std::sync::Arc;

use rebind::{Bindable, Component, Container, Inject, InjectionSession};

trait Mailer: Send + Sync {
    fn send(&self, to: &str) -> String;
}

struct SmtpMailer;

impl Mailer for SmtpMailer {
    fn send(&self, to: &str) -> String {
        format!("smtp -> {to}")
    }
}

struct RecordingMailer;

impl Mailer for RecordingMailer {
    fn send(&self, to: &str) -> String {
        format!("recorded -> {to}")
    }
}

struct Accounts;

#[derive(Bindable)]
struct SignupTest {
    accounts: Inject<Accounts>,
    #[bind(inject)]
    mailer: Inject<dyn Mailer>,
}

fn mailer<M: Mailer + 'static>(value: M) -> Component {
    let value = Arc::new(value);
    let view: Arc<dyn Mailer> = Arc::<M>::clone(&value);
    Component::new(value).implements::<dyn Mailer>(view)
}

fn main() -> Result<(), rebind::Error> {
    tracing_subscriber::fmt().with_max_level(tracing::Level::TRACE).init();

    // The container a real application would run with
    let container = Container::new();
    container.register_named("accounts", Component::new(Arc::new(Accounts)));
    container.register(mailer(SmtpMailer));

    let mut session = InjectionSession::new(container);
    session.register_mock(mailer(RecordingMailer));

    let test = Arc::new(SignupTest {
        accounts: Inject::new(),
        mailer: Inject::new(),
    });

    let result = session.bind_test_case(Arc::clone(&test))?;
    println!("bound {} slot(s) of {}", result.mutation_count(), result.target_name());

    if let Some(mailer) = test.mailer.get() {
        println!("{}", mailer.send("ada@example.com"));
    }

    // Everything the session bound is restored here
    session.teardown();
    println!("accounts bound after teardown: {}", test.accounts.is_set());

    Ok(())
}
