use std::sync::{Arc, Mutex};

/// Message shown when an authenticated account holds no admin permission at
/// the admin login page.
pub const MSG_NO_ADMIN_PERMISSION: &str = "您没有管理权限";
/// Message shown when an authenticated account may not enter the admin
/// system at all.
pub const MSG_NO_ADMIN_ACCESS: &str = "您没有权限访问管理系统";
/// Message shown when the principal-info fetch fails.
pub const MSG_FETCH_FAILED: &str = "获取权限信息失败";

/// Notifier
///
/// The user-facing notification seam. The guard reports authorization
/// denials as warnings and fetch faults as errors; rendering (toast,
/// banner, console) is the host's concern.
pub trait Notifier: Send + Sync {
    fn warning(&self, message: &str);
    fn error(&self, message: &str);
}

/// The concrete type used to share the notifier across the guard.
pub type NotifierState = Arc<dyn Notifier>;

/// TracingNotifier
///
/// Default implementation: surfaces notices through the tracing pipeline.
#[derive(Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn warning(&self, message: &str) {
        tracing::warn!(notice = message, "user notice");
    }

    fn error(&self, message: &str) {
        tracing::error!(notice = message, "user notice");
    }
}

/// RecordingNotifier
///
/// Test implementation that captures every notice for later assertion.
#[derive(Default)]
pub struct RecordingNotifier {
    records: Mutex<Vec<(Level, String)>>,
}

/// Severity of a recorded notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Warning,
    Error,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every notice recorded so far, in emission order.
    pub fn notices(&self) -> Vec<(Level, String)> {
        self.records.lock().unwrap().clone()
    }

    pub fn warnings(&self) -> Vec<String> {
        self.records
            .lock()
            .unwrap()
            .iter()
            .filter(|(l, _)| *l == Level::Warning)
            .map(|(_, m)| m.clone())
            .collect()
    }

    pub fn errors(&self) -> Vec<String> {
        self.records
            .lock()
            .unwrap()
            .iter()
            .filter(|(l, _)| *l == Level::Error)
            .map(|(_, m)| m.clone())
            .collect()
    }
}

impl Notifier for RecordingNotifier {
    fn warning(&self, message: &str) {
        self.records
            .lock()
            .unwrap()
            .push((Level::Warning, message.to_string()));
    }

    fn error(&self, message: &str) {
        self.records
            .lock()
            .unwrap()
            .push((Level::Error, message.to_string()));
    }
}
