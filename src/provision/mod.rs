//! Repository provisioning procedures, one per packaging family.

mod apt;
mod rpm;

use anyhow::{Context, Result};
use colored::Colorize;

use crate::config::SetupConfig;
use crate::distro::HostIdentity;
use crate::elevation::ElevationStrategy;
use crate::error::SetupError;

/// Route the detected distribution to its provisioning procedure.
///
/// Anything outside the two known families, including the empty identity
/// produced when no release metadata was readable, is rejected.
pub fn dispatch(
    identity: &HostIdentity,
    elevation: ElevationStrategy,
    config: &SetupConfig,
) -> Result<()> {
    let runner = Runner {
        elevation,
        dry_run: config.dry_run,
    };

    match identity.distro_id.as_str() {
        "debian" | "ubuntu" => apt::provision(identity, &runner, config),
        "amzn" | "centos" | "fedora" | "rhel" => rpm::provision(identity, &runner, config),
        _ => Err(SetupError::UnsupportedDistribution(identity.distro_id.clone()).into()),
    }
}

/// Executes privileged shell commands through the elevation wrapper.
///
/// With dry-run active, commands are printed instead of executed and no
/// network fetches happen.
pub struct Runner {
    elevation: ElevationStrategy,
    dry_run: bool,
}

impl Runner {
    pub fn run(&self, script: &str) -> Result<()> {
        if self.dry_run {
            println!(
                "{} {} '{}'",
                "[DRY RUN]".cyan(),
                self.elevation.display_prefix(),
                script
            );
            return Ok(());
        }

        self.elevation
            .command(script)
            .run()
            .with_context(|| format!("command failed: {script}"))?;
        Ok(())
    }

    pub fn dry_run(&self) -> bool {
        self.dry_run
    }
}
