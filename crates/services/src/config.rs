use crate::auth::jwt::JwtConfig;

/// Top-level configuration for the service layer.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// JWT signing and expiry settings.
    pub jwt: JwtConfig,
    /// Base URL of the frontend application, used to build password-reset
    /// links (e.g. `https://app.juridix.fr`).
    pub app_url: String,
}

/// Default frontend base URL for local development.
const DEFAULT_APP_URL: &str = "http://localhost:5173";

impl ServiceConfig {
    /// Load service configuration from environment variables.
    ///
    /// | Env Var   | Required | Default                 |
    /// |-----------|----------|-------------------------|
    /// | `APP_URL` | no       | `http://localhost:5173` |
    ///
    /// JWT settings are loaded via [`JwtConfig::from_env`].
    pub fn from_env() -> Self {
        let app_url =
            std::env::var("APP_URL").unwrap_or_else(|_| DEFAULT_APP_URL.to_string());

        Self {
            jwt: JwtConfig::from_env(),
            app_url,
        }
    }
}
