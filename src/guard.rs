use std::sync::{Arc, RwLock};

use chrono::Utc;
use uuid::Uuid;

use crate::classifier::{
    self, ADMIN_DASHBOARD, ADMIN_LOGIN, USER_DASHBOARD, USER_LOGIN, Zone, classify,
};
use crate::models::{NavigationTransition, ResolvedRoute};
use crate::notify::{
    MSG_FETCH_FAILED, MSG_NO_ADMIN_ACCESS, MSG_NO_ADMIN_PERMISSION, NotifierState,
};
use crate::observe::{NavigationEvent, ObserverState};
use crate::registry::{RouterTable, compute_accessible_routes};
use crate::session::{PrincipalClientState, SessionService};

/// NavigationOutcome
///
/// The guard's terminal transition, returned as a tagged value instead of a
/// one-shot callback. The host driver interprets it:
/// - `Proceed`: the target resolved before the guard ran; render it.
/// - `ProceedWithOverride`: the dispatch table changed mid-navigation and the
///   target was re-resolved against it; render `route`, and when `replace` is
///   set do not record a new history entry.
/// - `Redirect`: navigate to `location` instead (query string included).
#[derive(Debug, Clone, PartialEq)]
pub enum NavigationOutcome {
    Proceed,
    ProceedWithOverride { route: ResolvedRoute, replace: bool },
    Redirect { location: String },
}

impl NavigationOutcome {
    fn redirect(location: impl Into<String>) -> Self {
        NavigationOutcome::Redirect {
            location: location.into(),
        }
    }

    /// Terse label used in navigation events.
    fn label(&self) -> String {
        match self {
            NavigationOutcome::Proceed => "proceed".to_string(),
            NavigationOutcome::ProceedWithOverride { route, .. } => {
                format!("proceed-override:{}", route.path)
            }
            NavigationOutcome::Redirect { location } => format!("redirect:{}", location),
        }
    }
}

/// NavigationGuard
///
/// The orchestrator run before every route transition. It classifies the
/// target, reads session state, and drives the authentication/authorization
/// decision table, registering permission-gated routes on the first
/// successful admin fetch of the session.
///
/// Concurrency: one navigation is normally in flight at a time, but
/// programmatic redirects can overlap. The permission fetch-and-register
/// critical section is serialized behind `fetch_gate`; a navigation that
/// loses the race re-reads session state after the winner finishes and
/// never repeats the fetch. Session resets committed by the winner are not
/// rolled back.
pub struct NavigationGuard {
    session: Arc<SessionService>,
    client: PrincipalClientState,
    table: Arc<RwLock<RouterTable>>,
    notifier: NotifierState,
    observer: ObserverState,
    fetch_gate: tokio::sync::Mutex<()>,
}

impl NavigationGuard {
    pub fn new(
        session: Arc<SessionService>,
        client: PrincipalClientState,
        table: Arc<RwLock<RouterTable>>,
        notifier: NotifierState,
        observer: ObserverState,
    ) -> Self {
        Self {
            session,
            client,
            table,
            notifier,
            observer,
            fetch_gate: tokio::sync::Mutex::new(()),
        }
    }

    /// before_each
    ///
    /// The pre-navigation hook. Always reaches a terminal outcome and always
    /// emits exactly one `NavigationEvent`, on every exit path, so progress
    /// reporting downstream can rely on a terminal signal. No error escapes
    /// this function: fetch failures are converted into a session reset plus
    /// a login redirect.
    pub async fn before_each(&self, transition: &NavigationTransition) -> NavigationOutcome {
        // 1. Classification
        let zone = classify(&transition.to);
        let had_token = self.session.has_token();
        let mut fetched = false;

        // 2. Zone dispatch
        let outcome = match zone {
            Zone::User => self.decide_user(transition, had_token),
            Zone::Admin => {
                self.decide_admin(transition, had_token, &mut fetched)
                    .await
            }
            // 3. Root and unclassified paths degrade to the default login
            // page rather than erroring.
            Zone::Root | Zone::Other => NavigationOutcome::redirect(USER_LOGIN),
        };

        // 4. Terminal event
        self.observer.on_decision(&NavigationEvent {
            id: Uuid::new_v4(),
            at: Utc::now(),
            from: transition.from.clone(),
            to: transition.to.clone(),
            zone,
            had_token,
            fetched,
            outcome: outcome.label(),
        });

        outcome
    }

    /// User-portal branch of the decision table. Fully synchronous: the user
    /// portal never needs permission data.
    fn decide_user(&self, transition: &NavigationTransition, has_token: bool) -> NavigationOutcome {
        let to = transition.to.as_str();

        if has_token {
            // A logged-in visitor has no business on the login page.
            if to == USER_LOGIN {
                NavigationOutcome::redirect(USER_DASHBOARD)
            } else {
                NavigationOutcome::Proceed
            }
        } else if classifier::on_user_allow_list(to) {
            NavigationOutcome::Proceed
        } else if to.starts_with(classifier::USER_ROOT) {
            // Protected user page: bounce to login, remembering the target.
            NavigationOutcome::redirect(format!("{}?redirect={}", USER_LOGIN, to))
        } else {
            // Public user-zone pages outside /user/* (e.g. nested sub-paths
            // of an allow-list literal) stay reachable.
            NavigationOutcome::Proceed
        }
    }

    /// Admin branch of the decision table. May suspend on the principal
    /// fetch and on the session reset; both are awaited to completion before
    /// a terminal outcome is returned.
    async fn decide_admin(
        &self,
        transition: &NavigationTransition,
        has_token: bool,
        fetched: &mut bool,
    ) -> NavigationOutcome {
        let to = transition.to.as_str();

        if !has_token {
            // Anonymous visitors only reach the admin allow-list.
            return if classifier::on_admin_allow_list(to) {
                NavigationOutcome::Proceed
            } else {
                NavigationOutcome::redirect(format!("{}?redirect={}", ADMIN_LOGIN, to))
            };
        }

        if to == ADMIN_LOGIN {
            self.decide_admin_login(fetched).await
        } else {
            self.decide_admin_page(transition, fetched).await
        }
    }

    /// Token-holding visitor at the admin login page.
    async fn decide_admin_login(&self, fetched: &mut bool) -> NavigationOutcome {
        // Already authorized: straight to the dashboard, no fetch.
        if self.session.has_permissions() {
            return NavigationOutcome::redirect(ADMIN_DASHBOARD);
        }

        // Token but no permission data yet: fetch inside the gate.
        let _permit = self.fetch_gate.lock().await;
        if self.session.has_permissions() {
            // A concurrent navigation completed the fetch while we waited.
            return NavigationOutcome::redirect(ADMIN_DASHBOARD);
        }

        *fetched = true;
        match self.client.fetch_principal_info(&self.token()).await {
            Ok(info) if !info.permissions.is_empty() => {
                self.session.set_permissions(info.permissions.clone());
                self.ensure_routes_registered(&info.permissions);
                NavigationOutcome::redirect(ADMIN_DASHBOARD)
            }
            Ok(_) => {
                // Authenticated, but the account holds no admin permission.
                // Fully log it out rather than leaving a dangling token.
                self.session.reset_session().await;
                self.notifier.warning(MSG_NO_ADMIN_PERMISSION);
                NavigationOutcome::redirect(USER_LOGIN)
            }
            Err(e) => {
                tracing::warn!(error = %e, "principal info fetch failed at admin login");
                self.session.reset_session().await;
                self.notifier.error(MSG_FETCH_FAILED);
                NavigationOutcome::redirect(USER_LOGIN)
            }
        }
    }

    /// Token-holding visitor at any admin page other than the login page.
    async fn decide_admin_page(
        &self,
        transition: &NavigationTransition,
        fetched: &mut bool,
    ) -> NavigationOutcome {
        // Permission data already present: routes were registered when it
        // was fetched, so the target either matches or falls to the
        // catch-all. Nothing to do.
        if self.session.has_permissions() {
            return NavigationOutcome::Proceed;
        }

        let _permit = self.fetch_gate.lock().await;
        if self.session.has_permissions() {
            // The fetch we were about to perform already happened on a
            // concurrent navigation. Our pre-guard resolution may predate
            // the registration it did, so re-resolve instead of proceeding
            // blind.
            return self.proceed_re_resolved(transition);
        }

        *fetched = true;
        match self.client.fetch_principal_info(&self.token()).await {
            Ok(info) if !info.permissions.is_empty() => {
                self.session.set_permissions(info.permissions.clone());
                self.ensure_routes_registered(&info.permissions);
                // The dispatch table changed mid-navigation: the original
                // lookup ran before registration and reported no match, so
                // the same target must be re-resolved and re-entered as a
                // history-replacing transition.
                self.proceed_re_resolved(transition)
            }
            Ok(_) => {
                self.session.reset_session().await;
                self.notifier.warning(MSG_NO_ADMIN_ACCESS);
                NavigationOutcome::redirect(USER_DASHBOARD)
            }
            Err(e) => {
                tracing::warn!(error = %e, "principal info fetch failed");
                self.session.reset_session().await;
                self.notifier.error(MSG_FETCH_FAILED);
                NavigationOutcome::redirect(format!(
                    "{}?redirect={}",
                    ADMIN_LOGIN, transition.to
                ))
            }
        }
    }

    /// Re-resolves the in-flight target against the (possibly just
    /// extended) table and returns a history-replacing override.
    fn proceed_re_resolved(&self, transition: &NavigationTransition) -> NavigationOutcome {
        let table = self.table.read().unwrap();
        match table.resolve(&transition.to) {
            Some(route) => NavigationOutcome::ProceedWithOverride {
                route,
                replace: true,
            },
            // Unmatched even after registration and without a catch-all:
            // send the visitor to the error page.
            None => NavigationOutcome::redirect(classifier::NOT_FOUND),
        }
    }

    /// Registers the accessible subset of the async admin tree, at most once
    /// per session. Callers hold the fetch gate, so the check-then-register
    /// pair cannot interleave.
    fn ensure_routes_registered(&self, perms: &[String]) {
        let mut table = self.table.write().unwrap();
        if table.has_dynamic_routes() {
            return;
        }
        let accessible = compute_accessible_routes(perms);
        table.register(&accessible);
    }

    fn token(&self) -> String {
        // Callers only reach the fetch paths with a token present; an empty
        // fallback keeps the request well-formed if it was cleared mid-way.
        self.session.token().unwrap_or_default()
    }
}
