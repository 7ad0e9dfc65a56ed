use crate::models::{RouteDescriptor, RouteMeta};

/// User Portal Route Table
///
/// Defines the pages every visitor can reach: the login/registration flow
/// and the authenticated `/user` area. Always registered; the guard (not
/// the table) decides which entries require a token.
pub fn user_routes() -> Vec<RouteDescriptor> {
    vec![
        // Root path forwards straight to the user login page.
        RouteDescriptor::leaf("/", RouteMeta::hidden("Root")).redirecting("/login"),
        // User login page.
        RouteDescriptor::leaf("/login", RouteMeta::hidden("Login")).named("UserLogin"),
        // Registration page.
        RouteDescriptor::leaf("/register", RouteMeta::hidden("Register")).named("UserRegister"),
        // Password recovery page.
        RouteDescriptor::leaf("/forgot-password", RouteMeta::hidden("Forgot Password"))
            .named("ForgotPassword"),
        // The authenticated user area. The container forwards to the
        // dashboard; children are joined as /user/<segment>.
        RouteDescriptor::leaf("/user", RouteMeta::titled("User Area", Some("user")))
            .redirecting("/user/dashboard")
            .with_children(vec![
                RouteDescriptor::leaf("dashboard", RouteMeta::titled("Dashboard", Some("user")))
                    .named("UserDashboard"),
                RouteDescriptor::leaf(
                    "github-trending",
                    RouteMeta::titled("GitHub Trending", Some("star")),
                )
                .named("GithubTrending"),
                RouteDescriptor::leaf("profile", RouteMeta::hidden("Profile")).named("UserProfile"),
            ]),
        // Public trending page, reachable without a token.
        RouteDescriptor::leaf("/github-trending", RouteMeta::hidden("GitHub Trending"))
            .named("GithubTrendingPublic"),
    ]
}
