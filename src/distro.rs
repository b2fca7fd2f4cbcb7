//! Distribution detection for the two supported packaging families.
//!
//! Detection reads `/etc/os-release` for the distribution ID, then derives
//! the release codename from distribution-specific sources: the
//! `/etc/debian_version` numeral on Debian, `lsb_release` or
//! `/etc/lsb-release` on Ubuntu. A final fork-detection pass maps derivative
//! distributions back onto their upstream base.

use std::fs;
use std::path::{Path, PathBuf};

use duct::cmd;

/// Normalized identity of the host distribution.
///
/// `distro_id` is the lowercased os-release `ID` (e.g. "debian", "ubuntu",
/// "centos"). `version_codename` is the release codename used when building
/// repository paths (e.g. "bookworm"), or empty when it could not be
/// determined. An all-empty identity means detection found no usable
/// release metadata; dispatch rejects it as unsupported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostIdentity {
    pub distro_id: String,
    pub version_codename: String,
}

impl HostIdentity {
    /// Detect the current host's distribution.
    pub fn resolve() -> Self {
        resolve_from(&ReleaseSources::system(), lsb_release_available())
    }

    pub fn is_empty(&self) -> bool {
        self.distro_id.is_empty()
    }
}

impl std::fmt::Display for HostIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.version_codename.is_empty() {
            write!(f, "{}", self.distro_id)
        } else {
            write!(f, "{} ({})", self.distro_id, self.version_codename)
        }
    }
}

/// Locations of the release metadata files, injectable for tests.
pub struct ReleaseSources {
    pub os_release: PathBuf,
    pub debian_version: PathBuf,
    pub lsb_release: PathBuf,
}

impl ReleaseSources {
    fn system() -> Self {
        Self {
            os_release: PathBuf::from("/etc/os-release"),
            debian_version: PathBuf::from("/etc/debian_version"),
            lsb_release: PathBuf::from("/etc/lsb-release"),
        }
    }
}

fn lsb_release_available() -> bool {
    which::which("lsb_release").is_ok()
}

/// Resolve the host identity from the given metadata sources.
///
/// `lsb_tool` reports whether the `lsb_release` binary may be invoked;
/// tests pass `false` to keep resolution purely file-based.
fn resolve_from(sources: &ReleaseSources, lsb_tool: bool) -> HostIdentity {
    let distro_id = fs::read_to_string(&sources.os_release)
        .ok()
        .and_then(|content| parse_os_release_id(&content))
        .unwrap_or_default();

    let version_codename = match distro_id.as_str() {
        "debian" => debian_codename(&sources.debian_version),
        "ubuntu" => ubuntu_codename(sources, lsb_tool),
        _ => String::new(),
    };

    let identity = HostIdentity {
        distro_id,
        version_codename,
    };
    apply_fork_detection(identity, sources, lsb_tool)
}

/// Extract the lowercased `ID` value from os-release content.
fn parse_os_release_id(content: &str) -> Option<String> {
    content
        .lines()
        .find_map(|line| line.strip_prefix("ID="))
        .map(|val| val.trim().trim_matches('"').to_lowercase())
        .filter(|id| !id.is_empty())
}

fn debian_codename(debian_version: &Path) -> String {
    match fs::read_to_string(debian_version) {
        Ok(content) => codename_from_debian_version(&content),
        // Missing version file is not an error, just an unknown codename
        Err(_) => String::new(),
    }
}

/// Map `/etc/debian_version` content to a release codename.
///
/// The file carries either a dotted version ("12.4") or, on testing/sid,
/// a "codename/sid" string. Everything after the first `/` and the first
/// `.` is stripped before looking the numeral up; unmapped values keep the
/// raw string as the codename.
fn codename_from_debian_version(content: &str) -> String {
    let raw = content.trim();
    let raw = raw.split('/').next().unwrap_or(raw);
    let raw = raw.split('.').next().unwrap_or(raw);
    match raw {
        "12" => "bookworm".to_string(),
        "11" => "bullseye".to_string(),
        "10" => "buster".to_string(),
        "9" => "stretch".to_string(),
        "8" => "jessie".to_string(),
        other => other.to_string(),
    }
}

fn ubuntu_codename(sources: &ReleaseSources, lsb_tool: bool) -> String {
    if lsb_tool
        && let Ok(out) = cmd!("lsb_release", "-cs").stderr_null().read()
    {
        return out.trim().to_lowercase();
    }
    fs::read_to_string(&sources.lsb_release)
        .map(|content| parse_lsb_release_codename(&content))
        .unwrap_or_default()
}

/// Extract `DISTRIB_CODENAME` from /etc/lsb-release content.
fn parse_lsb_release_codename(content: &str) -> String {
    content
        .lines()
        .find_map(|line| line.strip_prefix("DISTRIB_CODENAME="))
        .map(|val| val.trim().trim_matches('"').to_lowercase())
        .unwrap_or_default()
}

/// Correct the identity of derivative distributions.
///
/// When `lsb_release` supports the upstream query mode, the upstream ID and
/// codename override the primary result, so rebrands of Debian/Ubuntu are
/// provisioned as their base. Without upstream support, the presence of the
/// Debian marker file forces any non-Ubuntu identity to `debian`.
fn apply_fork_detection(
    identity: HostIdentity,
    sources: &ReleaseSources,
    lsb_tool: bool,
) -> HostIdentity {
    if lsb_tool && let Some(upstream) = upstream_identity() {
        return upstream;
    }
    if identity.distro_id != "ubuntu" && sources.debian_version.exists() {
        return HostIdentity {
            distro_id: "debian".to_string(),
            version_codename: debian_codename(&sources.debian_version),
        };
    }
    identity
}

/// Query `lsb_release` in upstream mode. Returns `None` when the installed
/// tool does not support `-u` or reports nothing usable.
fn upstream_identity() -> Option<HostIdentity> {
    let id = cmd!("lsb_release", "-u", "-is").stderr_null().read().ok()?;
    let codename = cmd!("lsb_release", "-u", "-cs").stderr_null().read().ok()?;
    let id = id.trim().to_lowercase();
    if id.is_empty() {
        return None;
    }
    Some(HostIdentity {
        distro_id: id,
        version_codename: codename.trim().to_lowercase(),
    })
}
