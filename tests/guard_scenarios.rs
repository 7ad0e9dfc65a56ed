//! Decision-table scenarios for the navigation guard, driven end to end
//! through the host driver with an in-memory token store and a scripted
//! principal client.

use std::sync::Arc;

use portal_nav::notify::{
    Level, MSG_FETCH_FAILED, MSG_NO_ADMIN_ACCESS, MSG_NO_ADMIN_PERMISSION, RecordingNotifier,
};
use portal_nav::observe::RecordingObserver;
use portal_nav::{
    GuardState, InMemoryTokenStore, MockPrincipalClient, NavigationOutcome, NavigationTransition,
    create_guard_with,
};

// --- Test Bed ---

struct TestBed {
    state: GuardState,
    client: Arc<MockPrincipalClient>,
    notifier: Arc<RecordingNotifier>,
    observer: Arc<RecordingObserver>,
}

fn bed(token: Option<&str>) -> TestBed {
    let tokens = Arc::new(InMemoryTokenStore::new(token.map(str::to_string)));
    let client = Arc::new(MockPrincipalClient::new());
    let notifier = Arc::new(RecordingNotifier::new());
    let observer = Arc::new(RecordingObserver::new());
    let state = create_guard_with(
        tokens,
        client.clone(),
        notifier.clone(),
        observer.clone(),
    );
    TestBed {
        state,
        client,
        notifier,
        observer,
    }
}

/// Builds a transition the way the driver would: resolution against the
/// table as it stands when the navigation starts.
fn transition(bed: &TestBed, to: &str) -> NavigationTransition {
    NavigationTransition {
        to: to.to_string(),
        from: "/".to_string(),
        resolved: bed.state.table.read().unwrap().resolve(to),
    }
}

fn redirect_of(outcome: &NavigationOutcome) -> &str {
    match outcome {
        NavigationOutcome::Redirect { location } => location,
        other => panic!("expected redirect, got {other:?}"),
    }
}

// --- User zone ---

#[tokio::test]
async fn logged_in_visitor_is_bounced_from_the_login_page() {
    let bed = bed(Some("tok"));
    let outcome = bed.state.guard.before_each(&transition(&bed, "/login")).await;
    assert_eq!(redirect_of(&outcome), "/user/dashboard");
}

#[tokio::test]
async fn logged_in_visitor_proceeds_into_the_user_area() {
    let bed = bed(Some("tok"));
    let outcome = bed
        .state
        .guard
        .before_each(&transition(&bed, "/user/dashboard"))
        .await;
    assert_eq!(outcome, NavigationOutcome::Proceed);
}

#[tokio::test]
async fn anonymous_user_page_redirects_to_login_with_redirect_param() {
    let bed = bed(None);
    let outcome = bed
        .state
        .guard
        .before_each(&transition(&bed, "/user/dashboard"))
        .await;
    assert_eq!(redirect_of(&outcome), "/login?redirect=/user/dashboard");
}

#[tokio::test]
async fn anonymous_allow_listed_pages_proceed() {
    let bed = bed(None);
    for path in ["/login", "/register", "/forgot-password"] {
        let outcome = bed.state.guard.before_each(&transition(&bed, path)).await;
        assert_eq!(outcome, NavigationOutcome::Proceed, "path {path}");
    }
}

#[tokio::test]
async fn anonymous_public_user_zone_page_outside_user_root_proceeds() {
    // Classified user-zone via the allow-list literal prefix, but neither
    // allow-listed exactly nor under /user: public, so it proceeds.
    let bed = bed(None);
    let outcome = bed
        .state
        .guard
        .before_each(&transition(&bed, "/register/verify"))
        .await;
    assert_eq!(outcome, NavigationOutcome::Proceed);
}

// --- Root and unclassified paths (Scenario D) ---

#[tokio::test]
async fn root_redirects_to_user_login_regardless_of_token() {
    for token in [None, Some("tok")] {
        let bed = bed(token);
        let outcome = bed.state.guard.before_each(&transition(&bed, "/")).await;
        assert_eq!(redirect_of(&outcome), "/login", "token {token:?}");
    }
}

#[tokio::test]
async fn unclassified_paths_redirect_to_user_login() {
    let bed = bed(Some("tok"));
    let outcome = bed.state.guard.before_each(&transition(&bed, "/nowhere")).await;
    assert_eq!(redirect_of(&outcome), "/login");
}

// --- Admin zone, token absent ---

#[tokio::test]
async fn anonymous_admin_page_redirects_to_admin_login() {
    let bed = bed(None);
    let outcome = bed
        .state
        .guard
        .before_each(&transition(&bed, "/admin-panel/dashboard"))
        .await;
    assert_eq!(
        redirect_of(&outcome),
        "/sys-admin-2024/login?redirect=/admin-panel/dashboard"
    );
}

#[tokio::test]
async fn anonymous_admin_allow_list_proceeds() {
    let bed = bed(None);
    for path in ["/sys-admin-2024/login", "/404"] {
        let outcome = bed.state.guard.before_each(&transition(&bed, path)).await;
        assert_eq!(outcome, NavigationOutcome::Proceed, "path {path}");
    }
}

// --- Scenario A: first admin navigation registers accessible routes ---

#[tokio::test]
async fn first_admin_navigation_fetches_registers_and_re_resolves() {
    let bed = bed(Some("tok"));
    bed.client.push_permissions(&["user_manage"]);

    let t = transition(&bed, "/admin-panel/system/user");
    // The table has no entry for the target before registration.
    assert!(t.resolved.is_none());

    let outcome = bed.state.guard.before_each(&t).await;
    match outcome {
        NavigationOutcome::ProceedWithOverride { route, replace } => {
            assert_eq!(route.path, "/admin-panel/system/user");
            assert!(route.dynamic);
            assert!(replace, "re-resolution must not add a history entry");
        }
        other => panic!("expected override, got {other:?}"),
    }
    assert_eq!(bed.client.call_count(), 1);
    assert_eq!(bed.state.session.permissions(), vec!["user_manage"]);
    assert!(bed.state.table.read().unwrap().has_dynamic_routes());
}

// --- Scenario B: empty permission set is an authorization denial ---

#[tokio::test]
async fn empty_permissions_warns_and_redirects_to_user_dashboard() {
    let bed = bed(Some("tok"));
    bed.client.push_permissions(&[]);

    let outcome = bed
        .state
        .guard
        .before_each(&transition(&bed, "/admin-panel/system/user"))
        .await;

    assert_eq!(redirect_of(&outcome), "/user/dashboard");
    assert_eq!(bed.notifier.warnings(), vec![MSG_NO_ADMIN_ACCESS]);
    // A no-permission account is fully logged out.
    assert!(!bed.state.session.has_token());
    assert!(!bed.state.session.has_permissions());
}

// --- Scenario C: populated permissions skip the fetch at the login page ---

#[tokio::test]
async fn admin_login_with_known_permissions_redirects_without_fetching() {
    let bed = bed(Some("tok"));
    bed.state
        .session
        .set_permissions(vec!["workflow_manage".to_string()]);

    let outcome = bed
        .state
        .guard
        .before_each(&transition(&bed, "/sys-admin-2024/login"))
        .await;

    assert_eq!(redirect_of(&outcome), "/admin-panel/dashboard");
    assert_eq!(bed.client.call_count(), 0);
}

#[tokio::test]
async fn admin_login_fetch_with_permissions_redirects_to_dashboard() {
    let bed = bed(Some("tok"));
    bed.client.push_permissions(&["system_manage", "user_manage"]);

    let outcome = bed
        .state
        .guard
        .before_each(&transition(&bed, "/sys-admin-2024/login"))
        .await;

    assert_eq!(redirect_of(&outcome), "/admin-panel/dashboard");
    assert_eq!(bed.client.call_count(), 1);
    // The fetch also materialized the accessible routes, so the dashboard
    // redirect lands in a fully built admin area.
    assert!(bed.state.table.read().unwrap().has_dynamic_routes());
}

#[tokio::test]
async fn admin_login_fetch_with_empty_permissions_logs_out() {
    let bed = bed(Some("tok"));
    bed.client.push_permissions(&[]);

    let outcome = bed
        .state
        .guard
        .before_each(&transition(&bed, "/sys-admin-2024/login"))
        .await;

    assert_eq!(redirect_of(&outcome), "/login");
    assert_eq!(bed.notifier.warnings(), vec![MSG_NO_ADMIN_PERMISSION]);
    assert!(!bed.state.session.has_token());
}

// --- Scenario E: fetch failure resets the session ---

#[tokio::test]
async fn fetch_failure_resets_session_and_redirects_to_admin_login() {
    let bed = bed(Some("tok"));
    bed.client.push_failure(503);

    let outcome = bed
        .state
        .guard
        .before_each(&transition(&bed, "/admin-panel/system/user"))
        .await;

    assert_eq!(
        redirect_of(&outcome),
        "/sys-admin-2024/login?redirect=/admin-panel/system/user"
    );
    assert_eq!(bed.notifier.errors(), vec![MSG_FETCH_FAILED]);
    assert!(!bed.state.session.has_token());
    assert!(!bed.state.session.has_permissions());
}

#[tokio::test]
async fn fetch_failure_at_admin_login_redirects_to_user_login() {
    let bed = bed(Some("tok"));
    bed.client.push_failure(500);

    let outcome = bed
        .state
        .guard
        .before_each(&transition(&bed, "/sys-admin-2024/login"))
        .await;

    assert_eq!(redirect_of(&outcome), "/login");
    assert_eq!(bed.notifier.notices(), vec![(Level::Error, MSG_FETCH_FAILED.to_string())]);
    assert!(!bed.state.session.has_token());
}

// --- Idempotence ---

#[tokio::test]
async fn repeated_navigation_with_populated_permissions_proceeds_without_refetch() {
    let bed = bed(Some("tok"));
    bed.client.push_permissions(&["system_manage", "user_manage"]);

    // First navigation performs the one fetch and registration.
    let first = bed
        .state
        .guard
        .before_each(&transition(&bed, "/admin-panel/system/user"))
        .await;
    assert!(matches!(first, NavigationOutcome::ProceedWithOverride { .. }));

    // Second and third navigations to the same target proceed plainly.
    for _ in 0..2 {
        let again = bed
            .state
            .guard
            .before_each(&transition(&bed, "/admin-panel/system/user"))
            .await;
        assert_eq!(again, NavigationOutcome::Proceed);
    }
    assert_eq!(bed.client.call_count(), 1);
}

// --- Racing navigations ---

#[tokio::test]
async fn concurrent_navigations_share_a_single_fetch() {
    let bed = bed(Some("tok"));
    bed.client.push_permissions(&["system_manage", "user_manage"]);

    let guard = bed.state.guard.clone();
    let t1 = transition(&bed, "/admin-panel/system/user");
    let t2 = transition(&bed, "/admin-panel/dashboard");

    let (o1, o2) = tokio::join!(guard.before_each(&t1), guard.before_each(&t2));

    // Exactly one fetch happened; both navigations terminated successfully.
    assert_eq!(bed.client.call_count(), 1);
    for outcome in [o1, o2] {
        assert!(
            matches!(
                outcome,
                NavigationOutcome::Proceed | NavigationOutcome::ProceedWithOverride { .. }
            ),
            "unexpected outcome {outcome:?}"
        );
    }
}

// --- Observability ---

#[tokio::test]
async fn every_exit_path_emits_exactly_one_event() {
    let bed = bed(Some("tok"));
    bed.client.push_failure(503);

    // A redirect, a failure, and a plain proceed: one event each.
    bed.state.guard.before_each(&transition(&bed, "/")).await;
    bed.state
        .guard
        .before_each(&transition(&bed, "/admin-panel/system/user"))
        .await;
    bed.state
        .guard
        .before_each(&transition(&bed, "/register/verify"))
        .await;

    let events = bed.observer.events();
    assert_eq!(events.len(), 3);
    assert_eq!(events[0].outcome, "redirect:/login");
    assert!(events[1].fetched);
    assert!(!events[2].fetched);
}
