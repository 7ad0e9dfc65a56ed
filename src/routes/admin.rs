use crate::models::{RouteDescriptor, RouteMeta};

/// Always-On Admin Route Table
///
/// The admin pages that must exist before any permission data is available:
/// the concealed login page, the shared error page, and the dashboard shell
/// an admin lands on right after login. Feature pages live in the async
/// table and are registered per session.
///
/// The login page sits under a deliberately non-obvious prefix so the admin
/// entry point cannot be guessed from the public portal.
pub fn admin_routes() -> Vec<RouteDescriptor> {
    vec![
        // Concealed admin login page.
        RouteDescriptor::leaf("/sys-admin-2024/login", RouteMeta::hidden("Admin Login"))
            .named("AdminLogin"),
        // Error page shared by both audiences, owned by the admin zone.
        RouteDescriptor::leaf("/404", RouteMeta::hidden("Not Found")).named("NotFound"),
        // Admin shell: container forwards to the dashboard child.
        RouteDescriptor::leaf("/admin-panel", RouteMeta::titled("Admin", Some("dashboard")))
            .redirecting("/admin-panel/dashboard")
            .with_children(vec![
                RouteDescriptor::leaf("dashboard", RouteMeta::titled("Dashboard", Some("dashboard")))
                    .named("AdminDashboard"),
            ]),
        // Password change page, present for every admin regardless of perms.
        RouteDescriptor::leaf("/admin-panel/changepassword", RouteMeta::hidden("Change Password"))
            .named("ChangePassword"),
    ]
}
