use std::env;

/// AppConfig
///
/// Holds the navigation core's runtime configuration. The struct is immutable
/// once loaded, so it can be cloned freely into the guard, the HTTP principal
/// client, and the host driver without synchronization.
#[derive(Clone, Debug)]
pub struct AppConfig {
    // Base URL of the backend serving the principal-info endpoint.
    pub api_base_url: String,
    // Path of the principal-info endpoint, joined onto `api_base_url`.
    pub info_path: String,
    // Runtime environment marker. Controls log formatting in the binary.
    pub env: Env,
}

/// Env
///
/// Defines the runtime context, used to switch between human-readable local
/// logging and JSON logs suitable for centralized aggregation in production.
#[derive(Clone, PartialEq, Debug)]
pub enum Env {
    Local,
    Production,
}

impl Default for AppConfig {
    /// default
    ///
    /// Provides a safe, non-panicking AppConfig instance primarily used for
    /// test setup. This allows tests to build guard state without touching
    /// environment variables.
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8000".to_string(),
            info_path: "/api/system/user/info".to_string(),
            env: Env::Local,
        }
    }
}

impl AppConfig {
    /// load
    ///
    /// The canonical function for initializing configuration at startup. It
    /// reads all parameters from environment variables and implements the
    /// fail-fast principle.
    ///
    /// # Panics
    /// Panics if a variable required for the current runtime environment
    /// (especially Production) is not set, preventing the application from
    /// starting with an incomplete configuration.
    pub fn load() -> Self {
        let env_str = env::var("APP_ENV").unwrap_or_else(|_| "local".to_string());
        let env = match env_str.as_str() {
            "production" => Env::Production,
            _ => Env::Local,
        };

        let info_path = env::var("PORTAL_INFO_PATH")
            .unwrap_or_else(|_| "/api/system/user/info".to_string());

        match env {
            Env::Local => Self {
                env: Env::Local,
                // Local development talks to the Dockerized backend by default.
                api_base_url: env::var("PORTAL_API_URL")
                    .unwrap_or_else(|_| "http://localhost:8000".to_string()),
                info_path,
            },
            Env::Production => Self {
                env: Env::Production,
                // The production backend URL is mandatory and must be explicit.
                api_base_url: env::var("PORTAL_API_URL")
                    .expect("FATAL: PORTAL_API_URL required in production"),
                info_path,
            },
        }
    }
}
