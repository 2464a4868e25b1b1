// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn ws(name: &str) -> WorkspaceName {
    WorkspaceName::parse(name).unwrap()
}

#[tokio::test]
async fn register_signal_deregister_scenario() {
    let registry = ReadinessRegistry::new();
    let name = ws("ws-1");

    let wait = registry.register(&name).unwrap();
    registry.signal(&name).unwrap();

    wait.wait(Duration::from_millis(100)).await.unwrap();

    registry.deregister(&name);
    assert_eq!(registry.signal(&name), Err(RegistryError::NotFound(name)));
}

#[tokio::test]
async fn second_signal_is_not_found() {
    let registry = ReadinessRegistry::new();
    let name = ws("ws-1");

    let _wait = registry.register(&name).unwrap();
    assert!(registry.signal(&name).is_ok());
    assert_eq!(registry.signal(&name), Err(RegistryError::NotFound(name.clone())));
    assert!(!registry.is_pending(&name));
}

#[test]
fn signal_without_register_is_not_found() {
    let registry = ReadinessRegistry::new();
    let name = ws("never");
    assert_eq!(registry.signal(&name), Err(RegistryError::NotFound(name)));
}

#[test]
fn deregister_is_idempotent() {
    let registry = ReadinessRegistry::new();
    let name = ws("ws-1");

    registry.deregister(&name);

    let _wait = registry.register(&name).unwrap();
    registry.deregister(&name);
    registry.deregister(&name);
    assert!(registry.is_empty());
}

#[test]
fn duplicate_register_is_a_conflict() {
    let registry = ReadinessRegistry::new();
    let name = ws("ws-1");

    let first = registry.register(&name).unwrap();
    assert_eq!(registry.register(&name).unwrap_err(), RegistryError::Conflict(name.clone()));

    drop(first);
    assert!(registry.register(&name).is_ok());
}

#[test]
fn dropping_wait_deregisters() {
    let registry = ReadinessRegistry::new();
    let name = ws("ws-1");

    let wait = registry.register(&name).unwrap();
    assert!(registry.is_pending(&name));
    drop(wait);
    assert!(!registry.is_pending(&name));
}

#[test]
fn stale_drop_does_not_remove_newer_entry() {
    let registry = ReadinessRegistry::new();
    let name = ws("ws-1");

    let first = registry.register(&name).unwrap();
    registry.deregister(&name);
    let _second = registry.register(&name).unwrap();

    drop(first);
    assert!(registry.is_pending(&name), "newer wait must survive the older handle's drop");
}

#[tokio::test(start_paused = true)]
async fn wait_times_out_and_deregisters() {
    let registry = ReadinessRegistry::new();
    let name = ws("ws-1");

    let wait = registry.register(&name).unwrap();
    assert_eq!(wait.wait(Duration::from_secs(30)).await, Err(WaitError::TimedOut));
    assert!(registry.is_empty());
    assert_eq!(registry.signal(&name), Err(RegistryError::NotFound(name)));
}

#[tokio::test]
async fn zero_timeout_still_sees_earlier_signal() {
    let registry = ReadinessRegistry::new();
    let name = ws("ws-1");

    let wait = registry.register(&name).unwrap();
    registry.signal(&name).unwrap();
    assert_eq!(wait.wait(Duration::ZERO).await, Ok(()));
}

#[tokio::test]
async fn external_deregister_abandons_waiter() {
    let registry = ReadinessRegistry::new();
    let name = ws("ws-1");

    let wait = registry.register(&name).unwrap();
    registry.deregister(&name);
    assert_eq!(wait.wait(Duration::from_secs(1)).await, Err(WaitError::Abandoned));
}

#[tokio::test]
async fn signal_from_other_task_wakes_waiter() {
    let registry = ReadinessRegistry::new();
    let name = ws("ws-1");
    let wait = registry.register(&name).unwrap();

    let signaller = {
        let registry = Arc::clone(&registry);
        let name = name.clone();
        tokio::spawn(async move {
            tokio::task::yield_now().await;
            registry.signal(&name)
        })
    };

    wait.wait(Duration::from_secs(5)).await.unwrap();
    assert!(signaller.await.unwrap().is_ok());
}

#[test]
fn distinct_names_are_independent() {
    let registry = ReadinessRegistry::new();
    let a = ws("ws-a");
    let b = ws("ws-b");

    let _wa = registry.register(&a).unwrap();
    let _wb = registry.register(&b).unwrap();
    assert_eq!(registry.len(), 2);

    registry.signal(&a).unwrap();
    assert!(!registry.is_pending(&a));
    assert!(registry.is_pending(&b));
}
