//! RPM-family provisioning: dnf/yum repository registration and install.

use anyhow::Result;
use colored::Colorize;

use super::Runner;
use crate::config::{PRODUCT_PACKAGES, SetupConfig};
use crate::distro::HostIdentity;
use crate::elevation::shell_quote;

/// Which RPM package manager drives the provisioning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RpmTool {
    Dnf,
    Yum,
}

impl RpmTool {
    fn detect() -> Result<Self> {
        let dnf = which::which("dnf").is_ok();
        if !dnf && which::which("yum").is_err() {
            anyhow::bail!("neither dnf nor yum is available on this host");
        }
        Ok(Self::from_availability(dnf))
    }

    /// Prefer dnf when present, fall back to yum.
    fn from_availability(dnf_present: bool) -> Self {
        if dnf_present { Self::Dnf } else { Self::Yum }
    }

    fn package_manager(&self) -> &'static str {
        match self {
            Self::Dnf => "dnf",
            Self::Yum => "yum",
        }
    }

    /// Extra install flag; dnf pins the best available candidate.
    fn install_flags(&self) -> &'static str {
        match self {
            Self::Dnf => "--best",
            Self::Yum => "",
        }
    }

    fn config_manager(&self) -> &'static str {
        match self {
            Self::Dnf => "dnf config-manager",
            Self::Yum => "yum-config-manager",
        }
    }

    /// The plugin package providing the config-manager subcommand.
    fn prerequisite(&self) -> &'static str {
        match self {
            Self::Dnf => "dnf-plugins-core",
            Self::Yum => "yum-utils",
        }
    }
}

pub fn provision(identity: &HostIdentity, runner: &Runner, config: &SetupConfig) -> Result<()> {
    let tool = RpmTool::detect()?;
    let pm = tool.package_manager();

    println!("Setting up the Orbit rpm repository for {identity} with {pm}...");

    runner.run(&format!("{pm} install -y -q {}", tool.prerequisite()))?;

    let repo_url = format!("{}/orbit.repo", config.setup_url);
    runner.run(&format!(
        "{} --add-repo {}",
        tool.config_manager(),
        shell_quote(&repo_url)
    ))?;

    runner.run(&format!("{pm} makecache -q"))?;

    if config.install {
        let packages = PRODUCT_PACKAGES.join(" ");
        let flags = tool.install_flags();
        if flags.is_empty() {
            runner.run(&format!("{pm} install -y -q {packages}"))?;
        } else {
            runner.run(&format!("{pm} install -y -q {flags} {packages}"))?;
        }
    }

    println!("{}", "Orbit rpm repository configured.".green());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dnf_selected_when_present() {
        let tool = RpmTool::from_availability(true);
        assert_eq!(tool, RpmTool::Dnf);
        assert_eq!(tool.package_manager(), "dnf");
        assert_eq!(tool.install_flags(), "--best");
        assert_eq!(tool.config_manager(), "dnf config-manager");
        assert_eq!(tool.prerequisite(), "dnf-plugins-core");
    }

    #[test]
    fn test_yum_fallback_when_dnf_absent() {
        let tool = RpmTool::from_availability(false);
        assert_eq!(tool, RpmTool::Yum);
        assert_eq!(tool.package_manager(), "yum");
        assert_eq!(tool.install_flags(), "");
        assert_eq!(tool.config_manager(), "yum-config-manager");
        assert_eq!(tool.prerequisite(), "yum-utils");
    }
}
