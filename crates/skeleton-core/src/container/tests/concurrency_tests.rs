use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;
use std::sync::{Arc, Barrier, Mutex};
use std::thread;
use std::time::Duration;

use crate::container::{Container, Key};
use crate::kernel::error::Error;

struct Expensive {
    id: usize,
}

const EXPENSIVE: Key<Expensive> = Key::new("expensive");

#[test]
fn test_concurrent_first_resolution_constructs_once() {
    const THREADS: usize = 16;

    let container = Arc::new(Container::new());
    let calls = Arc::new(AtomicUsize::new(0));

    let calls_in_factory = calls.clone();
    container
        .singleton(EXPENSIVE, move |_| {
            let id = calls_in_factory.fetch_add(1, Ordering::SeqCst);
            // Widen the race window so losers arrive while the winner builds.
            thread::sleep(Duration::from_millis(20));
            Ok(Arc::new(Expensive { id }))
        })
        .unwrap();

    let barrier = Arc::new(Barrier::new(THREADS));
    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let container = container.clone();
            let barrier = barrier.clone();
            thread::spawn(move || {
                barrier.wait();
                container.make(&EXPENSIVE).unwrap()
            })
        })
        .collect();

    let instances: Vec<Arc<Expensive>> = handles
        .into_iter()
        .map(|handle| handle.join().expect("resolver thread panicked"))
        .collect();

    assert_eq!(calls.load(Ordering::SeqCst), 1, "Factory must run exactly once");
    let first = &instances[0];
    assert_eq!(first.id, 0);
    for instance in &instances[1..] {
        assert!(Arc::ptr_eq(first, instance), "All callers must observe the same instance");
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_resolution_from_tasks() {
    let container = Arc::new(Container::new());
    let calls = Arc::new(AtomicUsize::new(0));

    let calls_in_factory = calls.clone();
    container
        .singleton(EXPENSIVE, move |_| {
            let id = calls_in_factory.fetch_add(1, Ordering::SeqCst);
            Ok(Arc::new(Expensive { id }))
        })
        .unwrap();

    let tasks: Vec<_> = (0..32)
        .map(|_| {
            let container = container.clone();
            tokio::spawn(async move { container.make(&EXPENSIVE) })
        })
        .collect();

    let mut instances = Vec::new();
    for task in tasks {
        instances.push(task.await.unwrap().unwrap());
    }

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(instances.iter().all(|i| Arc::ptr_eq(i, &instances[0])));
}

#[test]
fn test_rebind_while_constructing_is_rejected() {
    let container = Arc::new(Container::new());
    let (started_tx, started_rx) = mpsc::channel::<()>();
    let (release_tx, release_rx) = mpsc::channel::<()>();
    let started_tx = Mutex::new(started_tx);
    let release_rx = Mutex::new(release_rx);

    container
        .singleton(EXPENSIVE, move |_| {
            started_tx.lock().unwrap().send(()).unwrap();
            // Hold construction open until the rebind has been attempted.
            release_rx.lock().unwrap().recv().unwrap();
            Ok(Arc::new(Expensive { id: 1 }))
        })
        .unwrap();

    let resolver = {
        let container = container.clone();
        thread::spawn(move || container.make(&EXPENSIVE).unwrap())
    };
    started_rx.recv().unwrap();

    let rebind = container.singleton(EXPENSIVE, |_| Ok(Arc::new(Expensive { id: 2 })));
    assert!(matches!(rebind, Err(Error::BindingInUse { ref key }) if key == "expensive"));

    release_tx.send(()).unwrap();
    let first = resolver.join().expect("resolver thread panicked");
    let second = container.make(&EXPENSIVE).unwrap();

    assert_eq!(first.id, 1);
    assert!(Arc::ptr_eq(&first, &second));

    // Once constructed, the usual rule applies.
    let rebind = container.singleton(EXPENSIVE, |_| Ok(Arc::new(Expensive { id: 3 })));
    assert!(matches!(rebind, Err(Error::AlreadyResolved { .. })));
}

#[test]
fn test_rebind_after_failed_construction_is_allowed() {
    let container = Container::new();
    container
        .singleton(EXPENSIVE, |_| Err(Error::from("not yet")))
        .unwrap();
    assert!(container.make(&EXPENSIVE).is_err());

    container
        .singleton(EXPENSIVE, |_| Ok(Arc::new(Expensive { id: 9 })))
        .unwrap();
    assert_eq!(container.make(&EXPENSIVE).unwrap().id, 9);
}
