use std::sync::{Arc, RwLock};

use crate::errors::{NavError, NavResult};
use crate::guard::{NavigationGuard, NavigationOutcome};
use crate::models::{NavigationTransition, ResolvedRoute};
use crate::registry::RouterTable;
use crate::session::SessionService;

/// Redirect chains longer than this abort the navigation. A well-formed
/// table never chains more than login-redirect plus dashboard-forwarding.
const MAX_REDIRECT_HOPS: usize = 8;

/// NavigationDriver
///
/// The host side of the routing contract: it owns the dispatch table and the
/// history stack, runs the guard before every transition, and interprets the
/// guard's tagged outcome. This is the single place that knows what
/// "proceed", "override" and "redirect" mean in terms of history entries.
pub struct NavigationDriver {
    guard: Arc<NavigationGuard>,
    table: Arc<RwLock<RouterTable>>,
    session: Arc<SessionService>,
    history: Vec<ResolvedRoute>,
}

impl NavigationDriver {
    pub fn new(
        guard: Arc<NavigationGuard>,
        table: Arc<RwLock<RouterTable>>,
        session: Arc<SessionService>,
    ) -> Self {
        Self {
            guard,
            table,
            session,
            history: Vec::new(),
        }
    }

    /// navigate
    ///
    /// Runs one user-initiated navigation to `location` (path plus optional
    /// query string), following guard redirects until a route renders.
    /// Returns the route that ended up current.
    pub async fn navigate(&mut self, location: &str) -> NavResult<ResolvedRoute> {
        let mut current = location.to_string();

        for _ in 0..MAX_REDIRECT_HOPS {
            let (path, _query) = split_location(&current);
            let transition = NavigationTransition {
                to: path.to_string(),
                from: self
                    .history
                    .last()
                    .map(|r| r.path.clone())
                    .unwrap_or_else(|| "/".to_string()),
                resolved: self.resolve(path),
            };

            match self.guard.before_each(&transition).await {
                NavigationOutcome::Proceed => {
                    let route = transition
                        .resolved
                        .ok_or_else(|| NavError::NoMatch(path.to_string()))?;
                    self.history.push(route.clone());
                    return Ok(route);
                }
                NavigationOutcome::ProceedWithOverride { route, replace } => {
                    // Replace-style entry: the in-flight navigation was
                    // re-resolved, so it must not add a history record.
                    if replace && !self.history.is_empty() {
                        *self.history.last_mut().unwrap() = route.clone();
                    } else {
                        self.history.push(route.clone());
                    }
                    return Ok(route);
                }
                NavigationOutcome::Redirect { location } => {
                    tracing::debug!(from = %current, to = %location, "guard redirect");
                    current = location;
                }
            }
        }

        Err(NavError::RedirectLoop(location.to_string()))
    }

    /// The route currently rendered, if any navigation has completed.
    pub fn current(&self) -> Option<&ResolvedRoute> {
        self.history.last()
    }

    /// The history stack, oldest first.
    pub fn history(&self) -> &[ResolvedRoute] {
        &self.history
    }

    /// logout
    ///
    /// Clears the session and rebuilds the router's matcher, dropping all
    /// dynamically registered routes so the next login starts from the
    /// static table.
    pub async fn logout(&mut self) {
        self.session.reset_session().await;
        self.table.write().unwrap().reset();
    }

    fn resolve(&self, path: &str) -> Option<ResolvedRoute> {
        self.table.read().unwrap().resolve(path)
    }
}

/// Splits a location string into its path and optional query part.
pub fn split_location(location: &str) -> (&str, Option<&str>) {
    match location.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (location, None),
    }
}

/// Extracts the `redirect=` parameter from a query string. The login flow
/// uses this to return the visitor to their original destination after
/// authenticating.
pub fn redirect_target(query: &str) -> Option<&str> {
    query
        .split('&')
        .find_map(|pair| pair.strip_prefix("redirect="))
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_path_and_query() {
        assert_eq!(
            split_location("/login?redirect=/user/dashboard"),
            ("/login", Some("redirect=/user/dashboard"))
        );
        assert_eq!(split_location("/user/dashboard"), ("/user/dashboard", None));
    }

    #[test]
    fn extracts_redirect_parameter() {
        assert_eq!(
            redirect_target("redirect=/admin-panel/system/user"),
            Some("/admin-panel/system/user")
        );
        assert_eq!(redirect_target("foo=1&redirect=/x"), Some("/x"));
        assert_eq!(redirect_target("foo=1"), None);
        assert_eq!(redirect_target("redirect="), None);
    }
}
