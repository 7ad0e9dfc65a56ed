//! The live route table and the permission filter feeding it.
//!
//! The table flattens descriptor trees into exact-path entries. Dynamic
//! (permission-gated) entries are appended at most once per session; the
//! guard owns the first-time-only gating, the table only records whether a
//! dynamic registration has happened so the guard can check cheaply.

use crate::models::{ResolvedRoute, RouteDescriptor};
use crate::routes;

/// RouterTable
///
/// The dispatch table navigations resolve against. Built from the two
/// always-on trees at startup; extended by `register` after a successful
/// permission fetch; rebuilt from scratch by `reset` on logout so a later
/// login with different permissions never sees stale entries.
#[derive(Debug)]
pub struct RouterTable {
    entries: Vec<ResolvedRoute>,
    /// Redirect target of a `*` catch-all entry, if one was registered.
    wildcard: Option<String>,
    dynamic_registered: bool,
}

impl Default for RouterTable {
    fn default() -> Self {
        Self::new()
    }
}

impl RouterTable {
    /// Builds the table from the always-on user and admin trees.
    pub fn new() -> Self {
        let mut table = Self {
            entries: Vec::new(),
            wildcard: None,
            dynamic_registered: false,
        };
        table.append(&routes::user_routes(), false);
        table.append(&routes::admin_routes(), false);
        table
    }

    /// register
    ///
    /// Appends an already-filtered tree to the dispatch table. The table
    /// itself gives no idempotence guarantee; callers must gate repeat
    /// registration (the guard does, via `has_dynamic_routes`).
    pub fn register(&mut self, tree: &[RouteDescriptor]) {
        self.append(tree, true);
        self.dynamic_registered = true;
        tracing::debug!(entries = self.entries.len(), "dynamic routes registered");
    }

    /// reset
    ///
    /// Rebuilds the matcher from the static trees, dropping every
    /// dynamically added entry.
    pub fn reset(&mut self) {
        *self = Self::new();
        tracing::debug!("router table reset to static routes");
    }

    /// True once a dynamic registration has happened this session.
    pub fn has_dynamic_routes(&self) -> bool {
        self.dynamic_registered
    }

    /// resolve
    ///
    /// Exact-path lookup, following container redirects (a bounded number of
    /// hops, so a mis-declared redirect cycle cannot spin). Falls back to
    /// the catch-all redirect when one is registered and nothing matched.
    pub fn resolve(&self, path: &str) -> Option<ResolvedRoute> {
        let mut target = path.to_string();
        for _ in 0..4 {
            let entry = match self.lookup(&target) {
                Some(e) => e,
                None => match &self.wildcard {
                    Some(fallback) => {
                        target = fallback.clone();
                        continue;
                    }
                    None => return None,
                },
            };
            match &entry.redirect {
                Some(next) => target = next.clone(),
                None => return Some(entry.clone()),
            }
        }
        None
    }

    fn lookup(&self, path: &str) -> Option<&ResolvedRoute> {
        self.entries.iter().find(|e| e.path == path)
    }

    fn append(&mut self, tree: &[RouteDescriptor], dynamic: bool) {
        for node in tree {
            self.append_node(node, None, dynamic);
        }
    }

    fn append_node(&mut self, node: &RouteDescriptor, parent: Option<&str>, dynamic: bool) {
        if node.path == "*" {
            self.wildcard = node.redirect.clone();
            return;
        }
        let path = match parent {
            // Children carry relative segments joined under the parent.
            Some(base) => format!("{}/{}", base.trim_end_matches('/'), node.path),
            None => node.path.clone(),
        };
        self.entries.push(ResolvedRoute {
            path: path.clone(),
            name: node.name.clone(),
            title: node.meta.title.clone(),
            redirect: node.redirect.clone(),
            dynamic,
        });
        for child in &node.children {
            self.append_node(child, Some(&path), dynamic);
        }
    }
}

/// compute_accessible_routes
///
/// Pure filter over the async admin tree. A node survives iff:
/// - it declares no required permissions (visible to anyone who was granted
///   admin access at all), or
/// - the intersection of its requirement with the principal's permissions is
///   non-empty, or
/// - a descendant declares a matching permission (holding `user_manage`
///   must expose `/admin-panel/system/user`, so the gated `system`
///   container survives as a pass-through).
///
/// Ungated nodes never propagate survival upward: an empty permission list
/// keeps nothing but the catch-all.
pub fn compute_accessible_routes(perms: &[String]) -> Vec<RouteDescriptor> {
    filter_tree(&routes::admin_async_routes(), perms)
}

fn filter_tree(tree: &[RouteDescriptor], perms: &[String]) -> Vec<RouteDescriptor> {
    tree.iter()
        .filter(|node| direct_match(node, perms) || subtree_grant(node, perms))
        .map(|node| {
            let mut kept = node.clone();
            kept.children = filter_tree(&node.children, perms);
            kept
        })
        .collect()
}

/// No requirement, or a requirement the principal satisfies.
fn direct_match(node: &RouteDescriptor, perms: &[String]) -> bool {
    match &node.perms {
        None => true,
        Some(required) => required.iter().any(|r| perms.contains(r)),
    }
}

/// A declared, satisfied requirement somewhere below this node.
fn subtree_grant(node: &RouteDescriptor, perms: &[String]) -> bool {
    node.children
        .iter()
        .any(|c| declared_match(c, perms) || subtree_grant(c, perms))
}

fn declared_match(node: &RouteDescriptor, perms: &[String]) -> bool {
    node.perms
        .as_ref()
        .is_some_and(|required| required.iter().any(|r| perms.contains(r)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn perms(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn static_table_resolves_known_paths() {
        let table = RouterTable::new();
        assert_eq!(table.resolve("/login").unwrap().path, "/login");
        assert_eq!(table.resolve("/user/dashboard").unwrap().path, "/user/dashboard");
        assert_eq!(table.resolve("/404").unwrap().path, "/404");
        // Container redirect: /admin-panel lands on its dashboard child.
        assert_eq!(
            table.resolve("/admin-panel").unwrap().path,
            "/admin-panel/dashboard"
        );
        // Root forwards through /login.
        assert_eq!(table.resolve("/").unwrap().path, "/login");
    }

    #[test]
    fn dynamic_paths_miss_until_registered() {
        let mut table = RouterTable::new();
        assert!(table.resolve("/admin-panel/system/user").is_none());
        assert!(!table.has_dynamic_routes());

        let accessible = compute_accessible_routes(&perms(&["system_manage", "user_manage"]));
        table.register(&accessible);

        let hit = table.resolve("/admin-panel/system/user").unwrap();
        assert!(hit.dynamic);
        assert!(table.has_dynamic_routes());
    }

    #[test]
    fn filter_keeps_only_intersecting_nodes() {
        let accessible = compute_accessible_routes(&perms(&["system_manage", "user_manage"]));
        // Only the system tree survives.
        let roots: Vec<&str> = accessible.iter().map(|r| r.path.as_str()).collect();
        assert!(roots.contains(&"/admin-panel/system"));
        assert!(!roots.contains(&"/admin-panel/workflow"));
        assert!(!roots.contains(&"/admin-panel/monitor"));

        let system = accessible.iter().find(|r| r.path == "/admin-panel/system").unwrap();
        let children: Vec<&str> = system.children.iter().map(|c| c.path.as_str()).collect();
        assert_eq!(children, vec!["user"]);
    }

    #[test]
    fn child_permission_keeps_its_gated_parent() {
        // Holding only a leaf permission still exposes the path to that
        // leaf: the container survives as a pass-through.
        let accessible = compute_accessible_routes(&perms(&["user_manage"]));
        let system = accessible
            .iter()
            .find(|r| r.path == "/admin-panel/system")
            .expect("system container kept for a user_manage holder");
        let children: Vec<&str> = system.children.iter().map(|c| c.path.as_str()).collect();
        assert_eq!(children, vec!["user"]);
    }

    #[test]
    fn ungated_children_survive_with_their_parent() {
        let accessible = compute_accessible_routes(&perms(&["workflow_manage"]));
        let workflow = accessible
            .iter()
            .find(|r| r.path == "/admin-panel/workflow")
            .unwrap();
        // The gated children fall away, the ungated detail pages stay.
        let children: Vec<&str> = workflow.children.iter().map(|c| c.path.as_str()).collect();
        assert!(children.contains(&"workFlowTickets"));
        assert!(children.contains(&"ticketDetail"));
        assert!(!children.contains(&"index"));
        assert!(!children.contains(&"ticket"));
    }

    #[test]
    fn wildcard_catches_unknown_admin_paths_after_registration() {
        let mut table = RouterTable::new();
        table.register(&compute_accessible_routes(&perms(&["system_manage"])));
        // The catch-all forwards unmatched paths to the error page.
        assert_eq!(table.resolve("/admin-panel/nope").unwrap().path, "/404");
    }

    #[test]
    fn reset_drops_dynamic_entries() {
        let mut table = RouterTable::new();
        table.register(&compute_accessible_routes(&perms(&[
            "system_manage",
            "user_manage",
        ])));
        assert!(table.resolve("/admin-panel/system/user").is_some());

        table.reset();
        assert!(table.resolve("/admin-panel/system/user").is_none());
        assert!(!table.has_dynamic_routes());
        // Static entries are intact after the rebuild.
        assert!(table.resolve("/login").is_some());
    }

    #[test]
    fn empty_permission_list_keeps_only_ungated_roots() {
        let accessible = compute_accessible_routes(&[]);
        // Every feature root is gated, so nothing but the catch-all remains.
        assert!(accessible.iter().all(|r| r.path == "*"));
    }
}
