//! Example: request-scoped wiring over a shared application core
//!
//! One connection pool for the whole process, one unit of work per request
//! scope, and a handler assembled fresh every time it is asked for.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use wirebox_core::{assigned, ContainerBuilder, Injectable, Resolver, Scope};

trait Pool: Send + Sync {
    fn checkout(&self) -> String;
}

struct PgPool {
    dsn: &'static str,
    checkouts: AtomicUsize,
}

impl Pool for PgPool {
    fn checkout(&self) -> String {
        let n = self.checkouts.fetch_add(1, Ordering::SeqCst);
        format!("{}#{}", self.dsn, n)
    }
}

struct UnitOfWork {
    connection: String,
}

impl Injectable for UnitOfWork {
    fn construct<R: Resolver>(resolver: &R) -> Self {
        let pool: Arc<dyn Pool> = resolver.resolve();
        Self {
            connection: pool.checkout(),
        }
    }
}

trait Handler: Send + Sync {
    fn handle(&self, path: &str) -> String;
}

struct EchoHandler {
    work: Arc<UnitOfWork>,
}

impl Handler for EchoHandler {
    fn handle(&self, path: &str) -> String {
        format!("{} via {}", path, self.work.connection)
    }
}

impl Injectable for EchoHandler {
    fn construct<R: Resolver>(resolver: &R) -> Self {
        Self {
            work: resolver.resolve(),
        }
    }
}

fn serve(app: &Scope, path: &str) {
    app.with_scope(|request| {
        let first: Arc<dyn Handler> = request.resolve();
        let second: Arc<dyn Handler> = request.resolve();
        // Two handlers, one unit of work: both lines show the same
        // connection checkout.
        println!("{}", first.handle(path));
        println!("{}", second.handle(path));
    });
}

fn main() {
    let mut builder = ContainerBuilder::new();
    builder.singleton_for::<dyn Pool, _>(|| {
        Arc::new(PgPool {
            dsn: "postgres://app",
            checkouts: AtomicUsize::new(0),
        })
    });
    builder.scoped_self::<UnitOfWork>();
    builder.transient_assigned_injectable(assigned!(dyn Handler, EchoHandler));

    let root = builder.build();

    for path in ["/users/1", "/users/2"] {
        serve(&root, path);
    }
}
