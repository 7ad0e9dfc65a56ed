use thiserror::Error;

/// NavError
///
/// The failure taxonomy for the navigation core. Guard-level failures are
/// always caught before they reach the host application: the guard converts
/// them into a session reset plus a redirect, so `AuthInfoFetch` never
/// escapes `before_each`. The driver-level variants (`RedirectLoop`,
/// `NoMatch`) are surfaced to the host, which decides how to recover.
#[derive(Debug, Error)]
pub enum NavError {
    /// The principal-info endpoint could not be reached.
    #[error("principal info request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The endpoint answered, but with a non-success status.
    #[error("principal info request rejected with status {0}")]
    BadStatus(u16),

    /// The endpoint answered 2xx, but the body violates the contract:
    /// the `permissions` field is missing or is not an array of strings.
    #[error("malformed principal info payload: {0}")]
    MalformedPayload(String),

    /// A navigation chained through more redirects than the driver allows.
    #[error("redirect loop detected while navigating to {0}")]
    RedirectLoop(String),

    /// The guard allowed the navigation but the router table has no entry
    /// for the target path.
    #[error("no route matches {0}")]
    NoMatch(String),
}

/// Convenience alias used throughout the crate.
pub type NavResult<T> = Result<T, NavError>;
