use std::sync::{Arc, RwLock};

// --- Module Structure ---

// Core navigation services and components.
pub mod classifier;
pub mod config;
pub mod driver;
pub mod errors;
pub mod guard;
pub mod models;
pub mod notify;
pub mod observe;
pub mod registry;
pub mod session;

// Static route tables, segregated by audience (User, Admin, Admin-Async).
pub mod routes;

// --- Public Re-exports ---

// Makes the core types easily accessible to the binary and to tests.
pub use classifier::{Zone, classify};
pub use config::{AppConfig, Env};
pub use driver::NavigationDriver;
pub use errors::{NavError, NavResult};
pub use guard::{NavigationGuard, NavigationOutcome};
pub use models::{NavigationTransition, PrincipalInfo, ResolvedRoute, RouteDescriptor};
pub use registry::RouterTable;
pub use session::{
    HttpPrincipalClient, InMemoryTokenStore, MockPrincipalClient, PrincipalClient,
    SessionService, TokenStore,
};

use notify::{NotifierState, TracingNotifier};
use observe::{ObserverState, TracingObserver};
use session::PrincipalClientState;

/// GuardState
///
/// The assembled navigation core: the shared session, the live route table,
/// the guard wired to both, and a driver interpreting its outcomes. One
/// instance per router; everything inside is shareable across tasks.
pub struct GuardState {
    pub session: Arc<SessionService>,
    pub table: Arc<RwLock<RouterTable>>,
    pub guard: Arc<NavigationGuard>,
    pub driver: NavigationDriver,
}

/// create_guard
///
/// Assembles the full navigation stack around the given collaborators,
/// defaulting the notifier and observer to their tracing-backed
/// implementations.
pub fn create_guard(tokens: Arc<dyn TokenStore>, client: PrincipalClientState) -> GuardState {
    create_guard_with(
        tokens,
        client,
        Arc::new(TracingNotifier),
        Arc::new(TracingObserver),
    )
}

/// create_guard_with
///
/// Same assembly with explicit notifier and observer, used by tests to plug
/// in recording implementations.
pub fn create_guard_with(
    tokens: Arc<dyn TokenStore>,
    client: PrincipalClientState,
    notifier: NotifierState,
    observer: ObserverState,
) -> GuardState {
    let session = Arc::new(SessionService::new(tokens));
    let table = Arc::new(RwLock::new(RouterTable::new()));
    let guard = Arc::new(NavigationGuard::new(
        session.clone(),
        client,
        table.clone(),
        notifier,
        observer,
    ));
    let driver = NavigationDriver::new(guard.clone(), table.clone(), session.clone());

    GuardState {
        session,
        table,
        guard,
        driver,
    }
}
