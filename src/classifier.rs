//! Pure path classification for the split user-portal / admin-panel router.
//!
//! Classification looks at the path string alone. It is evaluated in a fixed
//! precedence (User, then Admin, then Root, then Other): the zone prefixes
//! never overlap by construction, but allow-list literals could in principle
//! collide, and the fixed order resolves any such collision deterministically.

/// Prefix of every authenticated user-portal page.
pub const USER_ROOT: &str = "/user";
/// Prefix of the admin panel proper. Deliberately non-obvious.
pub const ADMIN_ROOT: &str = "/admin-panel";
/// Prefix of the concealed admin login area. Deliberately non-obvious.
pub const ADMIN_AREA: &str = "/sys-admin-2024";

/// User-portal login page.
pub const USER_LOGIN: &str = "/login";
/// Landing page after a successful user login.
pub const USER_DASHBOARD: &str = "/user/dashboard";
/// Admin login page, inside the concealed area.
pub const ADMIN_LOGIN: &str = "/sys-admin-2024/login";
/// Landing page after a successful admin login.
pub const ADMIN_DASHBOARD: &str = "/admin-panel/dashboard";
/// Catch-all error page. Lives in the admin zone even without its prefix.
pub const NOT_FOUND: &str = "/404";

/// User-portal pages reachable without a token.
pub const USER_ALLOW_LIST: [&str; 3] = ["/login", "/register", "/forgot-password"];

/// Admin pages reachable without a token (the login page and the error page).
pub const ADMIN_ALLOW_LIST: [&str; 2] = [ADMIN_LOGIN, NOT_FOUND];

/// Zone
///
/// The four mutually exclusive path classifications. Exactly one applies to
/// any path; the guard selects its decision branch from this value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Zone {
    User,
    Admin,
    Root,
    Other,
}

impl Zone {
    /// Stable lowercase label used in structured log fields.
    pub fn label(&self) -> &'static str {
        match self {
            Zone::User => "user",
            Zone::Admin => "admin",
            Zone::Root => "root",
            Zone::Other => "other",
        }
    }
}

/// classify
///
/// Total, deterministic classification of a path. No side effects, no I/O.
pub fn classify(path: &str) -> Zone {
    if is_user_path(path) {
        Zone::User
    } else if is_admin_path(path) {
        Zone::Admin
    } else if path == "/" {
        Zone::Root
    } else {
        Zone::Other
    }
}

/// User-zone membership: the `/user` prefix, an allow-list literal, or a
/// nested sub-path under an allow-list literal (e.g. `/register/verify`).
pub fn is_user_path(path: &str) -> bool {
    path.starts_with(USER_ROOT)
        || USER_ALLOW_LIST
            .iter()
            .any(|entry| path == *entry || path.starts_with(&format!("{}/", entry)))
}

/// Admin-zone membership: either admin prefix, or an exact allow-list
/// literal. `/404` carries no admin prefix but is still an admin-zone page.
pub fn is_admin_path(path: &str) -> bool {
    path.starts_with(ADMIN_ROOT)
        || path.starts_with(ADMIN_AREA)
        || ADMIN_ALLOW_LIST.contains(&path)
}

/// True iff the path is reachable without a token in the user portal.
/// Exact membership only: nested sub-paths of an allow-list literal are
/// classified as user-zone but are not themselves allow-listed.
pub fn on_user_allow_list(path: &str) -> bool {
    USER_ALLOW_LIST.contains(&path)
}

/// True iff the path is reachable without a token in the admin zone.
pub fn on_admin_allow_list(path: &str) -> bool {
    ADMIN_ALLOW_LIST.contains(&path)
}
