use crate::models::{RouteDescriptor, RouteMeta};

/// Async Admin Route Table
///
/// Permission-gated admin feature pages. This table is never registered
/// wholesale: the registry filters it against the principal's permission
/// list and registers only the surviving subtree, once per session.
///
/// Gating rules: a node declaring `perms` survives only if the principal
/// holds at least one of them; a node declaring none is visible to anyone
/// whose parent survived.
pub fn admin_async_routes() -> Vec<RouteDescriptor> {
    vec![
        // Workflow management.
        RouteDescriptor::gated(
            "/admin-panel/workflow",
            &["workflow_manage"],
            RouteMeta::titled("Workflow", Some("example")),
        )
        .named("Workflow")
        .redirecting("/admin-panel/workflow/index")
        .with_children(vec![
            RouteDescriptor::gated(
                "index",
                &["workflow_index"],
                RouteMeta::titled("Workflow", Some("example")),
            )
            .named("WorkflowIndex"),
            RouteDescriptor::gated(
                "ticket",
                &["workflow_ticket"],
                RouteMeta::titled("Tickets", Some("example")),
            )
            .named("WorkflowTicket"),
            // Detail pages reached by in-app links only, so no gate of
            // their own and hidden from the sidebar.
            RouteDescriptor::leaf("workFlowTickets", RouteMeta::hidden("My Tickets"))
                .named("WorkflowTickets"),
            RouteDescriptor::leaf("configuration", RouteMeta::hidden("Workflow Configuration"))
                .named("WorkflowConfiguration"),
            RouteDescriptor::leaf("ticketHandle", RouteMeta::hidden("Ticket Handling"))
                .named("TicketHandle"),
            RouteDescriptor::leaf("ticketDetail", RouteMeta::hidden("Ticket Detail"))
                .named("TicketDetail"),
        ]),
        // System management.
        RouteDescriptor::gated(
            "/admin-panel/system",
            &["system_manage"],
            RouteMeta::titled("System", Some("example")),
        )
        .named("System")
        .redirecting("/admin-panel/system/user")
        .with_children(vec![
            RouteDescriptor::gated("user", &["user_manage"], RouteMeta::titled("Users", Some("user")))
                .named("User"),
            RouteDescriptor::gated(
                "organization",
                &["org_manage"],
                RouteMeta::titled("Organizations", Some("tree")),
            )
            .named("Organization"),
            RouteDescriptor::gated("role", &["role_manage"], RouteMeta::titled("Roles", Some("lock")))
                .named("Role"),
            RouteDescriptor::gated(
                "position",
                &["position_manage"],
                RouteMeta::titled("Positions", Some("position")),
            )
            .named("Position"),
            RouteDescriptor::gated(
                "dict",
                &["dict_manage"],
                RouteMeta::titled("Dictionaries", Some("example")),
            )
            .named("Dict"),
            RouteDescriptor::gated(
                "file",
                &["file_room"],
                RouteMeta::titled("File Library", Some("documentation")),
            )
            .named("File"),
            RouteDescriptor::gated(
                "task",
                &["ptask_manage"],
                RouteMeta::titled("Scheduled Tasks", Some("list")),
            )
            .named("Task"),
            RouteDescriptor::gated(
                "github-trending",
                &["github_trending_manage"],
                RouteMeta::titled("GitHub Trending", Some("star")),
            )
            .named("GithubTrendingAdmin"),
        ]),
        // Service monitoring.
        RouteDescriptor::gated(
            "/admin-panel/monitor",
            &["monitor_set"],
            RouteMeta::titled("Monitoring", Some("example")),
        )
        .named("Monitor")
        .redirecting("/admin-panel/monitor/service")
        .with_children(vec![
            RouteDescriptor::gated(
                "service",
                &["service_manage"],
                RouteMeta::titled("Service Monitor", Some("example")),
            )
            .named("ServiceMonitor"),
        ]),
        // Developer configuration.
        RouteDescriptor::gated(
            "/admin-panel/develop",
            &["dev_set"],
            RouteMeta::titled("Development", Some("example")),
        )
        .named("Develop")
        .redirecting("/admin-panel/develop/perm")
        .with_children(vec![
            RouteDescriptor::gated(
                "perm",
                &["perm_manage"],
                RouteMeta::titled("Permission Menu", Some("example")),
            )
            .named("Perm"),
        ]),
        // Catch-all. Must stay last so it only matches what nothing else did.
        RouteDescriptor::leaf("*", RouteMeta::hidden("Catch All")).redirecting("/404"),
    ]
}
