//! End-to-end resolution scenarios: lifetime behavior across scope
//! generations, contract bindings with mixed lifetimes, and the
//! auto-construction cascade.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::assigned;
use crate::container::autowiring::{Injectable, Resolver};
use crate::container::builder::ContainerBuilder;

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

struct Stamp {
    serial: usize,
}

trait Labeled: Send + Sync {
    fn label(&self) -> String;
}

struct Tag {
    label: String,
}

impl Labeled for Tag {
    fn label(&self) -> String {
        self.label.clone()
    }
}

trait Reporting: Send + Sync {
    fn dependency_label(&self) -> String;
}

struct Report {
    tag: Arc<dyn Labeled>,
}

impl Reporting for Report {
    fn dependency_label(&self) -> String {
        self.tag.label()
    }
}

impl Injectable for Report {
    fn construct<R: Resolver>(resolver: &R) -> Self {
        Self {
            tag: resolver.resolve(),
        }
    }
}

#[test]
fn transient_is_never_shared() {
    init_tracing();
    let calls = Arc::new(AtomicUsize::new(0));
    let mut builder = ContainerBuilder::new();
    {
        let calls = calls.clone();
        builder.transient(move || Stamp {
            serial: calls.fetch_add(1, Ordering::SeqCst),
        });
    }
    let root = builder.build();

    let a: Arc<Stamp> = root.resolve();
    let b: Arc<Stamp> = root.resolve();
    assert!(!Arc::ptr_eq(&a, &b));
    assert_ne!(a.serial, b.serial);

    let child = root.scope();
    let c: Arc<Stamp> = child.resolve();
    assert_ne!(c.serial, b.serial);
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[test]
fn singleton_resolves_once_across_three_generations() {
    init_tracing();
    let calls = Arc::new(AtomicUsize::new(0));
    let mut builder = ContainerBuilder::new();
    {
        let calls = calls.clone();
        builder.singleton(move || {
            calls.fetch_add(1, Ordering::SeqCst);
            Stamp { serial: 0 }
        });
    }
    let root = builder.build();

    let reference: Arc<Stamp> = root.resolve();
    let mut seen = vec![reference.clone()];
    for _ in 0..16 {
        let child = root.scope();
        seen.push(child.resolve::<Stamp>());
        seen.push(child.scope().resolve::<Stamp>());
    }

    assert_eq!(seen.len(), 33);
    assert!(seen.iter().all(|stamp| Arc::ptr_eq(stamp, &reference)));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn scoped_resolves_once_per_scope() {
    init_tracing();
    let calls = Arc::new(AtomicUsize::new(0));
    let mut builder = ContainerBuilder::new();
    {
        let calls = calls.clone();
        builder.scoped(move || Stamp {
            serial: calls.fetch_add(1, Ordering::SeqCst),
        });
    }
    let root = builder.build();
    let child = root.scope();
    let grandchild = child.scope();

    for scope in [&root, &child, &grandchild] {
        let first: Arc<Stamp> = scope.resolve();
        for _ in 0..2 {
            assert!(Arc::ptr_eq(&first, &scope.resolve::<Stamp>()));
        }
    }

    assert_eq!(calls.load(Ordering::SeqCst), 3);
    assert_ne!(root.resolve::<Stamp>().serial, child.resolve::<Stamp>().serial);
    assert_ne!(
        child.resolve::<Stamp>().serial,
        grandchild.resolve::<Stamp>().serial
    );
}

#[test]
fn scoped_contract_over_singleton_implementation_matches_across_scopes() {
    let serial = Arc::new(AtomicUsize::new(0));
    let mut builder = ContainerBuilder::new();
    {
        let serial = serial.clone();
        builder.singleton(move || Report {
            tag: Arc::new(Tag {
                label: format!("report-{}", serial.fetch_add(1, Ordering::SeqCst)),
            }),
        });
    }
    builder.scoped_assigned(assigned!(dyn Reporting, Report));
    let root = builder.build();

    assert_eq!(
        root.resolve::<dyn Reporting>().dependency_label(),
        root.scope().resolve::<dyn Reporting>().dependency_label()
    );
}

#[test]
fn singleton_contract_over_scoped_implementation_matches_across_scopes() {
    let serial = Arc::new(AtomicUsize::new(0));
    let mut builder = ContainerBuilder::new();
    {
        let serial = serial.clone();
        builder.scoped(move || Report {
            tag: Arc::new(Tag {
                label: format!("report-{}", serial.fetch_add(1, Ordering::SeqCst)),
            }),
        });
    }
    builder.singleton_assigned(assigned!(dyn Reporting, Report));
    let root = builder.build();

    assert_eq!(
        root.resolve::<dyn Reporting>().dependency_label(),
        root.scope().resolve::<dyn Reporting>().dependency_label()
    );
}

#[test]
fn transient_contract_over_scoped_implementation_follows_the_scope() {
    let serial = Arc::new(AtomicUsize::new(0));
    let mut builder = ContainerBuilder::new();
    {
        let serial = serial.clone();
        builder.scoped(move || Report {
            tag: Arc::new(Tag {
                label: format!("report-{}", serial.fetch_add(1, Ordering::SeqCst)),
            }),
        });
    }
    builder.transient_assigned(assigned!(dyn Reporting, Report));
    let root = builder.build();
    let sub = root.scope();

    assert_ne!(
        root.resolve::<dyn Reporting>().dependency_label(),
        sub.resolve::<dyn Reporting>().dependency_label()
    );
    assert_eq!(
        sub.resolve::<dyn Reporting>().dependency_label(),
        sub.resolve::<dyn Reporting>().dependency_label()
    );
}

#[test]
fn contract_to_self_constructing_implementation_pulls_registered_dependency() {
    let mut builder = ContainerBuilder::new();
    builder.singleton_assigned_injectable(assigned!(dyn Reporting, Report));
    builder.singleton_for::<dyn Labeled, _>(|| {
        Arc::new(Tag {
            label: "fixed-label".to_string(),
        })
    });
    let root = builder.build();

    assert_eq!(
        root.resolve::<dyn Reporting>().dependency_label(),
        "fixed-label"
    );
}

#[test]
fn explicit_registration_overrides_auto_construction() {
    let mut builder = ContainerBuilder::new();
    builder.singleton_assigned_injectable(assigned!(dyn Reporting, Report));
    builder.singleton(|| Report {
        tag: Arc::new(Tag {
            label: "override".to_string(),
        }),
    });
    builder.singleton_for::<dyn Labeled, _>(|| {
        Arc::new(Tag {
            label: "constructed".to_string(),
        })
    });
    let root = builder.build();

    assert_eq!(root.resolve::<dyn Reporting>().dependency_label(), "override");
}

#[test]
fn resolve_injectable_constructs_unregistered_types() {
    let mut builder = ContainerBuilder::new();
    builder.singleton_for::<dyn Labeled, _>(|| {
        Arc::new(Tag {
            label: "ambient".to_string(),
        })
    });
    let root = builder.build();

    let report = root.resolve_injectable::<Report>();
    assert_eq!(report.dependency_label(), "ambient");
    // Nothing caches the fallback: each call constructs anew.
    assert!(!Arc::ptr_eq(&report, &root.resolve_injectable::<Report>()));
}

#[test]
fn self_constructing_singleton_shares_one_instance() {
    let mut builder = ContainerBuilder::new();
    builder.singleton_self::<Report>();
    builder.singleton_for::<dyn Labeled, _>(|| {
        Arc::new(Tag {
            label: "shared".to_string(),
        })
    });
    let root = builder.build();

    let from_root = root.resolve::<Report>();
    let from_grandchild = root.scope().scope().resolve::<Report>();
    assert!(Arc::ptr_eq(&from_root, &from_grandchild));
}

#[test]
#[should_panic(expected = "no registration for")]
fn assigned_contract_requires_a_registered_implementation() {
    let mut builder = ContainerBuilder::new();
    builder.transient_assigned(assigned!(dyn Reporting, Report));
    let root = builder.build();
    let _ = root.resolve::<dyn Reporting>();
}

struct Ping {
    #[allow(dead_code)]
    pong: Arc<Pong>,
}

struct Pong {
    #[allow(dead_code)]
    ping: Arc<Ping>,
}

impl Injectable for Ping {
    fn construct<R: Resolver>(resolver: &R) -> Self {
        Self {
            pong: resolver.resolve(),
        }
    }
}

impl Injectable for Pong {
    fn construct<R: Resolver>(resolver: &R) -> Self {
        Self {
            ping: resolver.resolve(),
        }
    }
}

#[test]
#[should_panic(expected = "circular dependency")]
fn mutual_registrations_panic_instead_of_hanging() {
    let mut builder = ContainerBuilder::new();
    builder.singleton_self::<Ping>();
    builder.singleton_self::<Pong>();
    let root = builder.build();
    let _ = root.resolve::<Ping>();
}
