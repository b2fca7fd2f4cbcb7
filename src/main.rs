mod config;
mod distro;
mod elevation;
mod error;
mod provision;

use clap::Parser;
use colored::Colorize;

use crate::config::SetupConfig;
use crate::distro::HostIdentity;
use crate::elevation::ElevationStrategy;

/// Set up the Orbit package repository on this host.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Optional action; `install` also installs the Orbit packages
    action: Option<String>,

    /// Print privileged commands instead of executing them
    #[arg(long)]
    dry_run: bool,
}

fn main() {
    let cli = Cli::parse();

    let install = match cli.action.as_deref() {
        Some("install") => true,
        Some(other) => {
            eprintln!(
                "{} unknown argument '{}', ignoring",
                "warning:".yellow().bold(),
                other
            );
            false
        }
        None => false,
    };

    let config = SetupConfig::from_env(install, cli.dry_run);

    if let Err(e) = run(&config) {
        eprintln!("{} {:#}", "error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn run(config: &SetupConfig) -> anyhow::Result<()> {
    let identity = HostIdentity::resolve();
    if identity.is_empty() {
        eprintln!(
            "{} could not detect the host distribution",
            "warning:".yellow().bold()
        );
    } else {
        println!("Detected distribution: {identity}");
    }

    let elevation = ElevationStrategy::select()?;
    provision::dispatch(&identity, elevation, config)
}
