use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::container::{Container, Key};
use crate::kernel::error::Error;

trait Greeter: Send + Sync {
    fn greet(&self) -> String;
}

struct English;

impl Greeter for English {
    fn greet(&self) -> String {
        "hello".to_string()
    }
}

struct Formal {
    inner: Arc<dyn Greeter>,
}

impl Greeter for Formal {
    fn greet(&self) -> String {
        format!("{}, sir", self.inner.greet())
    }
}

const GREETER: Key<dyn Greeter> = Key::new("greeter");
const FORMAL: Key<dyn Greeter> = Key::new("formal-greeter");
const COUNTER: Key<AtomicUsize> = Key::new("counter");

#[test]
fn test_singleton_is_lazy_and_memoized() {
    let container = Container::new();
    let calls = Arc::new(AtomicUsize::new(0));

    let calls_in_factory = calls.clone();
    container
        .singleton(GREETER, move |_| {
            calls_in_factory.fetch_add(1, Ordering::SeqCst);
            Ok(Arc::new(English) as Arc<dyn Greeter>)
        })
        .unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 0, "Binding must not construct");
    assert!(container.resolved(&GREETER).is_none());

    let first = container.make(&GREETER).unwrap();
    let second = container.make(&GREETER).unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(first.greet(), "hello");
    assert!(container.resolved(&GREETER).is_some());
}

#[test]
fn test_factory_resolves_dependencies() {
    let container = Container::new();
    container
        .singleton(GREETER, |_| Ok(Arc::new(English) as Arc<dyn Greeter>))
        .unwrap();
    container
        .singleton(FORMAL, |c| {
            let inner = c.make(&GREETER)?;
            Ok(Arc::new(Formal { inner }) as Arc<dyn Greeter>)
        })
        .unwrap();

    let formal = container.make(&FORMAL).unwrap();
    assert_eq!(formal.greet(), "hello, sir");
}

#[test]
fn test_instance_binding() {
    let container = Container::new();
    let counter = Arc::new(AtomicUsize::new(7));
    container.instance(COUNTER, counter.clone()).unwrap();

    let resolved = container.make(&COUNTER).unwrap();
    assert!(Arc::ptr_eq(&counter, &resolved));
    assert!(container.resolved(&COUNTER).is_some());
}

#[test]
fn test_missing_binding() {
    let container = Container::new();
    match container.make(&GREETER) {
        Err(Error::BindingNotFound { key }) => assert_eq!(key, "greeter"),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected BindingNotFound"),
    }
}

#[test]
fn test_type_mismatch() {
    let container = Container::new();
    container
        .instance(COUNTER, Arc::new(AtomicUsize::new(0)))
        .unwrap();

    let wrong: Key<String> = Key::new("counter");
    assert!(matches!(
        container.make(&wrong),
        Err(Error::TypeMismatch { .. })
    ));
}

#[test]
fn test_failed_factory_is_retried() {
    let container = Container::new();
    let attempts = Arc::new(AtomicUsize::new(0));

    let attempts_in_factory = attempts.clone();
    container
        .singleton(COUNTER, move |_| {
            if attempts_in_factory.fetch_add(1, Ordering::SeqCst) == 0 {
                Err(Error::from("database unavailable"))
            } else {
                Ok(Arc::new(AtomicUsize::new(0)))
            }
        })
        .unwrap();

    match container.make(&COUNTER) {
        Err(Error::Resolution { key, source }) => {
            assert_eq!(key, "counter");
            assert!(source.to_string().contains("database unavailable"));
        }
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("first attempt should fail"),
    }
    assert!(container.make(&COUNTER).is_ok());
    assert_eq!(attempts.load(Ordering::SeqCst), 2);
}

#[test]
fn test_rebinding_unresolved_factory_replaces_it() {
    let container = Container::new();
    container
        .singleton(COUNTER, |_| Ok(Arc::new(AtomicUsize::new(1))))
        .unwrap();
    container
        .singleton(COUNTER, |_| Ok(Arc::new(AtomicUsize::new(2))))
        .unwrap();

    let counter = container.make(&COUNTER).unwrap();
    assert_eq!(counter.load(Ordering::SeqCst), 2);
}

#[test]
fn test_rebinding_resolved_key_is_rejected() {
    let container = Container::new();
    container
        .singleton(COUNTER, |_| Ok(Arc::new(AtomicUsize::new(1))))
        .unwrap();
    container.make(&COUNTER).unwrap();

    let result = container.singleton(COUNTER, |_| Ok(Arc::new(AtomicUsize::new(2))));
    assert!(matches!(result, Err(Error::AlreadyResolved { .. })));

    let instance_result = container.instance(COUNTER, Arc::new(AtomicUsize::new(3)));
    assert!(matches!(instance_result, Err(Error::AlreadyResolved { .. })));
    assert_eq!(container.make(&COUNTER).unwrap().load(Ordering::SeqCst), 1);
}

#[test]
fn test_circular_dependency_is_reported() {
    const A: Key<AtomicUsize> = Key::new("a");
    const B: Key<AtomicUsize> = Key::new("b");

    let container = Container::new();
    container.singleton(A, |c| c.make(&B)).unwrap();
    container.singleton(B, |c| c.make(&A)).unwrap();

    let err = container.make(&A).unwrap_err();
    assert!(
        err.to_string().contains("a -> b -> a"),
        "Unexpected error message: {err}"
    );
    // The failed resolution leaves both keys retryable and the thread clean.
    assert!(container.resolved(&A).is_none());
    assert!(container.resolved(&B).is_none());
}

#[test]
fn test_keys_and_has() {
    let container = Container::new();
    container
        .singleton(GREETER, |_| Ok(Arc::new(English) as Arc<dyn Greeter>))
        .unwrap();
    container
        .instance(COUNTER, Arc::new(AtomicUsize::new(0)))
        .unwrap();

    assert!(container.has(&GREETER));
    assert!(!container.has(&FORMAL));
    assert_eq!(container.keys(), vec!["counter", "greeter"]);
}
