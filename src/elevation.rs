//! Privilege elevation for package-manager commands.
//!
//! Every provisioning step that touches system state runs as a shell
//! command through the strategy selected here, mirroring how the commands
//! would be typed on the host: plain `sh -c` as root, `sudo -E sh -c` when
//! sudo exists, `su -c` as a last resort.

use duct::{Expression, cmd};
use sudo::RunningAs;

use crate::error::SetupError;

/// How privileged commands get run on this host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElevationStrategy {
    /// Already running as root, no wrapper needed.
    None,
    /// Wrap commands in `sudo -E sh -c`.
    Sudo,
    /// Wrap commands in `su -c`.
    Su,
}

impl ElevationStrategy {
    /// Pick a strategy for the current user.
    ///
    /// Root needs no wrapper; otherwise sudo is preferred over su. With
    /// neither tool on the PATH the run cannot continue.
    pub fn select() -> Result<Self, SetupError> {
        Self::from_probes(
            matches!(sudo::check(), RunningAs::Root),
            which::which("sudo").is_ok(),
            which::which("su").is_ok(),
        )
    }

    /// Decision table, separated from the probes for testing.
    fn from_probes(is_root: bool, have_sudo: bool, have_su: bool) -> Result<Self, SetupError> {
        if is_root {
            Ok(Self::None)
        } else if have_sudo {
            Ok(Self::Sudo)
        } else if have_su {
            Ok(Self::Su)
        } else {
            Err(SetupError::PrivilegeUnavailable)
        }
    }

    /// Build a runnable expression for a privileged shell command.
    pub fn command(&self, script: &str) -> Expression {
        let argv = self.argv(script);
        cmd(argv[0].as_str(), &argv[1..])
    }

    /// The argv used to run `script` with elevated privileges.
    fn argv(&self, script: &str) -> Vec<String> {
        let wrapper: &[&str] = match self {
            Self::None => &["sh", "-c"],
            Self::Sudo => &["sudo", "-E", "sh", "-c"],
            Self::Su => &["su", "-c"],
        };
        let mut argv: Vec<String> = wrapper.iter().map(|s| s.to_string()).collect();
        argv.push(script.to_string());
        argv
    }

    /// Human-readable wrapper prefix, used in dry-run output.
    pub fn display_prefix(&self) -> &'static str {
        match self {
            Self::None => "sh -c",
            Self::Sudo => "sudo -E sh -c",
            Self::Su => "su -c",
        }
    }
}

/// Escape a string for embedding in an `sh -c` script.
///
/// Quotes only when necessary, using single quotes for safety.
pub fn shell_quote(s: &str) -> String {
    if s.is_empty() {
        return "''".to_string();
    }

    if s.chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '-' | '_' | '=' | '/' | '.' | ':' | ','))
    {
        return s.to_string();
    }

    format!("'{}'", s.replace('\'', r"'\''"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_needs_no_wrapper() {
        // Tool availability must not matter once running as root
        assert_eq!(
            ElevationStrategy::from_probes(true, true, true).unwrap(),
            ElevationStrategy::None
        );
        assert_eq!(
            ElevationStrategy::from_probes(true, false, false).unwrap(),
            ElevationStrategy::None
        );
    }

    #[test]
    fn test_sudo_preferred_over_su() {
        assert_eq!(
            ElevationStrategy::from_probes(false, true, true).unwrap(),
            ElevationStrategy::Sudo
        );
        assert_eq!(
            ElevationStrategy::from_probes(false, false, true).unwrap(),
            ElevationStrategy::Su
        );
    }

    #[test]
    fn test_no_elevation_tooling_is_fatal() {
        let err = ElevationStrategy::from_probes(false, false, false).unwrap_err();
        assert!(matches!(err, SetupError::PrivilegeUnavailable));
    }

    #[test]
    fn test_argv_wrapping() {
        assert_eq!(
            ElevationStrategy::None.argv("apt-get -qq update"),
            vec!["sh", "-c", "apt-get -qq update"]
        );
        assert_eq!(
            ElevationStrategy::Sudo.argv("dnf makecache -q"),
            vec!["sudo", "-E", "sh", "-c", "dnf makecache -q"]
        );
        assert_eq!(
            ElevationStrategy::Su.argv("yum makecache -q"),
            vec!["su", "-c", "yum makecache -q"]
        );
    }

    #[test]
    fn test_shell_quote() {
        assert_eq!(shell_quote(""), "''");
        assert_eq!(shell_quote("foo"), "foo");
        assert_eq!(shell_quote("foo bar"), "'foo bar'");
        assert_eq!(shell_quote("foo'bar"), "'foo'\\''bar'");
        assert_eq!(shell_quote("https://setup.orbit.dev/gpg"), "https://setup.orbit.dev/gpg");
        assert_eq!(
            shell_quote("deb [arch=amd64] https://example.com stable"),
            "'deb [arch=amd64] https://example.com stable'"
        );
    }
}
