use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::config::AppConfig;
use crate::errors::{NavError, NavResult};
use crate::models::PrincipalInfo;

// 1. TokenStore Contract

/// TokenStore
///
/// Abstract access to the persisted authentication token. Reads are
/// synchronous (presence checks run on every navigation and must not
/// suspend); clearing is asynchronous because the backing store is
/// persistent client storage. The external login flow writes the token;
/// the guard only reads it and clears it on irrecoverable auth failures.
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Returns the current token, if one was issued and not yet cleared.
    fn get(&self) -> Option<String>;
    /// Stores a freshly issued token. Called by the login flow.
    fn set(&self, token: String);
    /// Removes the token from the backing store.
    async fn clear(&self);
}

/// InMemoryTokenStore
///
/// Process-local token storage. Stands in for cookie-backed storage, whose
/// mechanics are outside this crate.
#[derive(Default)]
pub struct InMemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl InMemoryTokenStore {
    pub fn new(initial: Option<String>) -> Self {
        Self {
            token: Mutex::new(initial),
        }
    }
}

#[async_trait]
impl TokenStore for InMemoryTokenStore {
    fn get(&self) -> Option<String> {
        self.token.lock().unwrap().clone()
    }

    fn set(&self, token: String) {
        *self.token.lock().unwrap() = Some(token);
    }

    async fn clear(&self) {
        *self.token.lock().unwrap() = None;
    }
}

// 2. PrincipalClient Contract

/// PrincipalClient
///
/// Abstract contract for the remote principal-info endpoint. The request
/// carries the current token; the response must contain a `permissions`
/// field holding an array of string identifiers (possibly empty). Any other
/// shape is a protocol error, reported as `NavError::MalformedPayload`.
#[async_trait]
pub trait PrincipalClient: Send + Sync {
    async fn fetch_principal_info(&self, token: &str) -> NavResult<PrincipalInfo>;
}

/// The concrete type used to share the principal client across the guard.
pub type PrincipalClientState = Arc<dyn PrincipalClient>;

// 3. The Real Implementation (HTTP)

/// HttpPrincipalClient
///
/// The concrete implementation backed by the portal's HTTP API. Sends the
/// token as a bearer credential and validates the payload shape by hand, so
/// a missing or non-array `permissions` field is distinguished from a
/// transport fault.
pub struct HttpPrincipalClient {
    client: reqwest::Client,
    info_url: String,
}

impl HttpPrincipalClient {
    /// Constructs the client from the loaded configuration.
    pub fn new(config: &AppConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_default();
        Self {
            client,
            info_url: format!("{}{}", config.api_base_url, config.info_path),
        }
    }
}

#[async_trait]
impl PrincipalClient for HttpPrincipalClient {
    async fn fetch_principal_info(&self, token: &str) -> NavResult<PrincipalInfo> {
        let response = self
            .client
            .get(&self.info_url)
            .bearer_auth(token)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "principal info request rejected");
            return Err(NavError::BadStatus(status.as_u16()));
        }

        let body: Value = response.json().await?;
        parse_principal_info(&body)
    }
}

/// parse_principal_info
///
/// Enforces the wire contract on an already-decoded JSON body. Kept
/// separate from the transport so the validation rules are testable
/// without a server.
pub fn parse_principal_info(body: &Value) -> NavResult<PrincipalInfo> {
    let perms = body
        .get("permissions")
        .ok_or_else(|| NavError::MalformedPayload("missing `permissions` field".into()))?;

    let list = perms
        .as_array()
        .ok_or_else(|| NavError::MalformedPayload("`permissions` is not an array".into()))?;

    let mut permissions = Vec::with_capacity(list.len());
    for entry in list {
        match entry.as_str() {
            Some(p) => permissions.push(p.to_string()),
            None => {
                return Err(NavError::MalformedPayload(
                    "`permissions` contains a non-string entry".into(),
                ));
            }
        }
    }

    Ok(PrincipalInfo {
        permissions,
        name: body.get("name").and_then(Value::as_str).map(str::to_string),
    })
}

// 4. The Mock Implementation (tests and the offline harness)

/// MockPrincipalClient
///
/// Scriptable principal client: responses are queued up front and consumed
/// in order, and every call is counted. The queue holds `Ok` permission
/// lists or error markers; an exhausted queue replays the last scripted
/// response.
#[derive(Default)]
pub struct MockPrincipalClient {
    script: Mutex<VecDeque<Result<Vec<String>, u16>>>,
    calls: AtomicUsize,
}

impl MockPrincipalClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a successful response carrying the given permission list.
    pub fn push_permissions(&self, perms: &[&str]) {
        self.script
            .lock()
            .unwrap()
            .push_back(Ok(perms.iter().map(|p| p.to_string()).collect()));
    }

    /// Queues a failure that surfaces as a bad-status fetch error.
    pub fn push_failure(&self, status: u16) {
        self.script.lock().unwrap().push_back(Err(status));
    }

    /// Number of fetches performed so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PrincipalClient for MockPrincipalClient {
    async fn fetch_principal_info(&self, _token: &str) -> NavResult<PrincipalInfo> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut script = self.script.lock().unwrap();
        let scripted = if script.len() > 1 {
            script.pop_front()
        } else {
            script.front().cloned()
        };
        match scripted {
            Some(Ok(permissions)) => Ok(PrincipalInfo {
                permissions,
                name: None,
            }),
            Some(Err(status)) => Err(NavError::BadStatus(status)),
            None => Err(NavError::BadStatus(503)),
        }
    }
}

// 5. Session State

/// SessionService
///
/// Process-wide session state: the token (via the store) and the permission
/// list fetched for the current principal. Permissions start empty, are
/// populated only by a successful fetch, and are cleared whenever the token
/// is cleared. The guard is the only writer besides the external login flow.
pub struct SessionService {
    tokens: Arc<dyn TokenStore>,
    permissions: Mutex<Vec<String>>,
}

impl SessionService {
    pub fn new(tokens: Arc<dyn TokenStore>) -> Self {
        Self {
            tokens,
            permissions: Mutex::new(Vec::new()),
        }
    }

    /// Presence check. No I/O.
    pub fn has_token(&self) -> bool {
        self.tokens.get().is_some()
    }

    /// The raw token, for the principal-info request.
    pub fn token(&self) -> Option<String> {
        self.tokens.get()
    }

    /// Snapshot of the fetched permission list (empty until a fetch
    /// succeeds).
    pub fn permissions(&self) -> Vec<String> {
        self.permissions.lock().unwrap().clone()
    }

    pub fn has_permissions(&self) -> bool {
        !self.permissions.lock().unwrap().is_empty()
    }

    /// Records the result of a successful principal-info fetch.
    pub fn set_permissions(&self, perms: Vec<String>) {
        *self.permissions.lock().unwrap() = perms;
    }

    /// reset_session
    ///
    /// Clears the permission list and the persisted token. Awaited to
    /// completion before any redirect the caller issues, so a stale token
    /// can never re-trigger the branch that just failed.
    pub async fn reset_session(&self) {
        self.permissions.lock().unwrap().clear();
        self.tokens.clear().await;
        tracing::debug!("session reset: token and permissions cleared");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_well_formed_payload() {
        let body = json!({ "permissions": ["user_manage", "role_manage"], "name": "ops" });
        let info = parse_principal_info(&body).unwrap();
        assert_eq!(info.permissions, vec!["user_manage", "role_manage"]);
        assert_eq!(info.name.as_deref(), Some("ops"));
    }

    #[test]
    fn empty_permission_array_is_valid() {
        let info = parse_principal_info(&json!({ "permissions": [] })).unwrap();
        assert!(info.permissions.is_empty());
    }

    #[test]
    fn missing_or_non_array_permissions_is_a_protocol_error() {
        for body in [json!({}), json!({ "permissions": "admin" }), json!({ "permissions": 3 })] {
            let err = parse_principal_info(&body).unwrap_err();
            assert!(matches!(err, NavError::MalformedPayload(_)), "body {body}");
        }
    }

    #[test]
    fn non_string_entries_are_rejected() {
        let err = parse_principal_info(&json!({ "permissions": ["ok", 1] })).unwrap_err();
        assert!(matches!(err, NavError::MalformedPayload(_)));
    }

    #[tokio::test]
    async fn reset_clears_token_and_permissions() {
        let store = Arc::new(InMemoryTokenStore::new(Some("tok".into())));
        let session = SessionService::new(store.clone());
        session.set_permissions(vec!["user_manage".into()]);

        session.reset_session().await;

        assert!(!session.has_token());
        assert!(!session.has_permissions());
        assert!(store.get().is_none());
    }
}
