//! Upstream endpoint configuration.
//!
//! Defaults point at the Containership stage environment; each URL can be
//! overridden through the environment.

/// Stage provisioning service.
pub const STAGE_PROVISION_BASE_URL: &str = "https://stage-provision.containership.io";

/// Stage Kubernetes API proxy.
pub const STAGE_PROXY_BASE_URL: &str = "https://stage-proxy.containership.io";

/// Base URLs of the services the suite talks to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    /// Provisioning service base URL.
    pub provision_url: String,

    /// Kubernetes API proxy base URL.
    pub proxy_url: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            provision_url: STAGE_PROVISION_BASE_URL.to_string(),
            proxy_url: STAGE_PROXY_BASE_URL.to_string(),
        }
    }
}

impl Endpoints {
    /// Load endpoints through a variable lookup, falling back to stage.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let pick = |key: &str, default: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or_else(|| default.to_string())
        };

        Self {
            provision_url: pick("CONTAINERSHIP_PROVISION_URL", STAGE_PROVISION_BASE_URL),
            proxy_url: pick("CONTAINERSHIP_PROXY_URL", STAGE_PROXY_BASE_URL),
        }
    }
}
