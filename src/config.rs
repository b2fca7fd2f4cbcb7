//! Runtime configuration assembled from the CLI and environment.

use std::env;

pub const DEFAULT_DOWNLOAD_URL: &str = "https://download.orbit.dev";
pub const DEFAULT_SETUP_URL: &str = "https://setup.orbit.dev";
pub const DEFAULT_CHANNEL: &str = "stable";

/// The product packages installed when `install` is requested.
pub const PRODUCT_PACKAGES: &[&str] = &[
    "orbit-engine",
    "orbit-cli",
    "orbit-buildkit",
    "orbit-compose-plugin",
];

/// Immutable settings for a single provisioning run.
#[derive(Debug, Clone)]
pub struct SetupConfig {
    /// Host root the repository definition points package downloads at.
    pub download_url: String,
    /// Host the signing key and .repo definition are fetched from.
    pub setup_url: String,
    /// Release channel embedded in the apt source line.
    pub channel: String,
    /// Install the product packages after registering the repository.
    pub install: bool,
    /// Print privileged commands instead of executing them.
    pub dry_run: bool,
}

impl SetupConfig {
    pub fn from_env(install: bool, dry_run: bool) -> Self {
        Self {
            download_url: env_or("DOWNLOAD_URL", DEFAULT_DOWNLOAD_URL),
            setup_url: env_or("SETUP_URL", DEFAULT_SETUP_URL),
            channel: env_or("CHANNEL", DEFAULT_CHANNEL),
            install,
            dry_run,
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key)
        .ok()
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}
