use thiserror::Error;

/// Fatal setup failures with a dedicated message and exit code 1.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("root privileges are required but neither sudo nor su is available")]
    PrivilegeUnavailable,
    #[error("unsupported distribution '{0}'")]
    UnsupportedDistribution(String),
}
