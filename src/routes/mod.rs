/// Route Table Index
///
/// Organizes the static route tables into audience-segregated modules. The
/// split is a security boundary, not a cosmetic one: the user and always-on
/// admin tables are registered at startup, while the async admin table is
/// materialized per session, only after the principal's permissions are
/// known.

/// The public user portal: login pages and the `/user` area.
pub mod user;

/// Admin pages that exist before any permission check: the concealed login
/// page, the error page, and the dashboard shell.
pub mod admin;

/// Permission-gated admin feature pages, registered dynamically.
pub mod admin_async;

pub use admin::admin_routes;
pub use admin_async::admin_async_routes;
pub use user::user_routes;
