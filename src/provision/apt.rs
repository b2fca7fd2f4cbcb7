//! Debian-family provisioning: signing key, apt source, package install.

use std::io::Write;

use anyhow::{Context, Result};
use colored::Colorize;
use duct::cmd;

use super::Runner;
use crate::config::{PRODUCT_PACKAGES, SetupConfig};
use crate::distro::HostIdentity;
use crate::elevation::shell_quote;

const KEYRING_PATH: &str = "/etc/apt/keyrings/orbit.asc";
const SOURCES_PATH: &str = "/etc/apt/sources.list.d/orbit.list";

pub fn provision(identity: &HostIdentity, runner: &Runner, config: &SetupConfig) -> Result<()> {
    println!("Setting up the Orbit apt repository for {identity}...");

    runner.run("apt-get -qq update >/dev/null")?;
    runner.run(
        "DEBIAN_FRONTEND=noninteractive apt-get -y -qq install ca-certificates >/dev/null",
    )?;

    install_signing_key(runner, config)?;

    let arch = dpkg_architecture()?;
    let source_line = repo_source_line(&arch, identity, config);
    runner.run(&format!(
        "install -d -m 0755 /etc/apt/sources.list.d && printf '%s\\n' {} > {}",
        shell_quote(&source_line),
        SOURCES_PATH
    ))?;

    runner.run("apt-get -qq update >/dev/null")?;

    if config.install {
        let packages = PRODUCT_PACKAGES.join(" ");
        runner.run(&format!(
            "DEBIAN_FRONTEND=noninteractive apt-get -y -qq install {packages} >/dev/null"
        ))?;
    }

    println!("{}", "Orbit apt repository configured.".green());
    Ok(())
}

/// Fetch the ASCII-armored signing key and install it into the apt keyring
/// directory. The key is staged in a temp file because only the final copy
/// runs elevated.
fn install_signing_key(runner: &Runner, config: &SetupConfig) -> Result<()> {
    let key_url = format!("{}/gpg", config.setup_url);

    if runner.dry_run() {
        println!("{} fetch {} -> {}", "[DRY RUN]".cyan(), key_url, KEYRING_PATH);
        return Ok(());
    }

    let key = reqwest::blocking::get(&key_url)
        .and_then(|resp| resp.error_for_status())
        .with_context(|| format!("failed to fetch signing key from {key_url}"))?
        .bytes()
        .context("failed to read signing key body")?;

    let mut staged =
        tempfile::NamedTempFile::new().context("failed to stage signing key on disk")?;
    staged
        .write_all(&key)
        .context("failed to stage signing key on disk")?;

    runner.run(&format!(
        "install -D -m 0644 {} {}",
        shell_quote(&staged.path().to_string_lossy()),
        KEYRING_PATH
    ))
}

/// The apt source line pointing at the Orbit repository for this host.
fn repo_source_line(arch: &str, identity: &HostIdentity, config: &SetupConfig) -> String {
    format!(
        "deb [arch={arch} signed-by={KEYRING_PATH}] {}/linux/{} {} {}",
        config.download_url, identity.distro_id, identity.version_codename, config.channel
    )
}

fn dpkg_architecture() -> Result<String> {
    let arch = cmd!("dpkg", "--print-architecture")
        .read()
        .context("failed to detect the architecture with dpkg")?;
    Ok(arch.trim().to_string())
}
