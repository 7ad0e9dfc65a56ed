use serde::{Deserialize, Serialize};

// --- Route table schema ---

/// RouteMeta
///
/// Display metadata attached to a route node: the sidebar/breadcrumb title,
/// an icon name, and the hidden flag that keeps a route out of the sidebar
/// while leaving it navigable.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RouteMeta {
    pub title: String,
    pub icon: Option<String>,
    pub hidden: bool,
}

impl RouteMeta {
    pub fn titled(title: &str, icon: Option<&str>) -> Self {
        Self {
            title: title.to_string(),
            icon: icon.map(str::to_string),
            hidden: false,
        }
    }

    pub fn hidden(title: &str) -> Self {
        Self {
            title: title.to_string(),
            icon: None,
            hidden: true,
        }
    }
}

/// RouteDescriptor
///
/// A node in one of the three static route trees. Top-level nodes carry an
/// absolute path; children carry a segment that is joined onto the parent
/// path by the router table when the tree is flattened.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RouteDescriptor {
    /// Absolute path for roots, relative segment for children.
    pub path: String,
    /// Route name used for lookups and diagnostics.
    pub name: Option<String>,
    /// Container nodes forward to this absolute path instead of rendering.
    pub redirect: Option<String>,
    /// Permissions that grant access to this node. `None` means the node is
    /// visible to anyone who reached its tree at all; `Some` requires a
    /// non-empty intersection with the principal's permissions.
    pub perms: Option<Vec<String>>,
    pub meta: RouteMeta,
    pub children: Vec<RouteDescriptor>,
}

impl RouteDescriptor {
    /// A plain leaf node with no permission requirement.
    pub fn leaf(path: &str, meta: RouteMeta) -> Self {
        Self {
            path: path.to_string(),
            meta,
            ..Default::default()
        }
    }

    /// A permission-gated node.
    pub fn gated(path: &str, perms: &[&str], meta: RouteMeta) -> Self {
        Self {
            path: path.to_string(),
            perms: Some(perms.iter().map(|p| p.to_string()).collect()),
            meta,
            ..Default::default()
        }
    }

    pub fn named(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn redirecting(mut self, target: &str) -> Self {
        self.redirect = Some(target.to_string());
        self
    }

    pub fn with_children(mut self, children: Vec<RouteDescriptor>) -> Self {
        self.children = children;
        self
    }
}

// --- Navigation records ---

/// ResolvedRoute
///
/// The flattened, matchable form of a route node: the absolute path it
/// answers to, plus the metadata the host needs for rendering. Produced by
/// the router table, consumed by the guard and the driver.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedRoute {
    pub path: String,
    pub name: Option<String>,
    pub title: String,
    /// Set when this entry only forwards to another absolute path.
    pub redirect: Option<String>,
    /// True for entries registered dynamically after a permission fetch.
    pub dynamic: bool,
}

/// NavigationTransition
///
/// An ephemeral record of one navigation attempt, passed to the guard exactly
/// once. It is not retained beyond the guard call.
#[derive(Debug, Clone)]
pub struct NavigationTransition {
    /// Path being navigated to, query string already stripped.
    pub to: String,
    /// Path being navigated from (`/` for the initial navigation).
    pub from: String,
    /// The target's match against the table at the time the navigation
    /// started. `None` when nothing matched, which is the normal state for
    /// an admin page whose route has not been registered yet.
    pub resolved: Option<ResolvedRoute>,
}

// --- Principal info payload ---

/// PrincipalInfo
///
/// The validated response of the principal-info endpoint. The wire contract
/// requires a `permissions` field holding an array of string identifiers;
/// the HTTP client rejects any other shape before this struct is built, so
/// holders of a `PrincipalInfo` can trust the list (it may still be empty).
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PrincipalInfo {
    pub permissions: Vec<String>,
    /// Display name, when the backend provides one.
    #[serde(default)]
    pub name: Option<String>,
}
