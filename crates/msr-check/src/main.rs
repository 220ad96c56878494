//! CLI entry point for the TDX guest MSR conformance checker.
//!
//! # Usage
//!
//! ```bash
//! # Show the built-in table for one module revision
//! tdx-msr-check list --version 1.5
//!
//! # Run it against the host, CPU 0
//! tdx-msr-check run --version 1.5
//!
//! # Dry run against a platform that behaves exactly as expected
//! tdx-msr-check run --version 2.0 --conforming --json report.json
//!
//! # Run a custom registry against a simulated profile
//! tdx-msr-check run --version 1.0 --registry cases.json --profile host.json
//! ```
//!
//! Exit status is 0 when every case passed, 1 when at least one failed, and 2
//! when the run could not be set up or was aborted.

use std::io;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
#[cfg(unix)]
use libc as _;
use msr_check::load::{load_profile, load_registry};
use msr_check::render::{case_line, write_json, write_report};
use msr_check::CliError;
use msr_engine::{run, Access, Platform, Registry, RunConfig, SimulatedPlatform, VersionTag};
use serde as _;
use serde_json as _;
#[cfg(test)]
use tempfile as _;
use thiserror as _;

#[derive(Parser)]
#[command(name = "tdx-msr-check")]
#[command(about = "MSR virtualization conformance checks for TDX guests")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the case registry.
    List {
        /// Only cases applicable to this module version (1.0, 1.5, 2.0).
        #[arg(short, long)]
        version: Option<VersionTag>,

        /// Only cases whose name contains this substring.
        #[arg(short, long)]
        filter: Option<String>,

        /// JSON registry to list instead of the built-in table.
        #[arg(long)]
        registry: Option<PathBuf>,
    },

    /// Run the suite for one module version.
    Run(RunArgs),
}

#[derive(clap::Args)]
struct RunArgs {
    /// Module version under test (1.0, 1.5, 2.0).
    #[arg(short, long)]
    version: VersionTag,

    /// Only cases whose name contains this substring.
    #[arg(short, long)]
    filter: Option<String>,

    /// Only cases of this direction (read or write).
    #[arg(short, long)]
    access: Option<Access>,

    /// JSON registry to run instead of the built-in table.
    #[arg(long)]
    registry: Option<PathBuf>,

    /// Run against a simulated platform described by this JSON profile.
    #[arg(long, conflicts_with_all = ["conforming", "cpu"])]
    profile: Option<PathBuf>,

    /// Run against a simulated platform that matches every expectation.
    #[arg(long, conflicts_with = "cpu")]
    conforming: bool,

    /// Host logical CPU to run on through /dev/cpu (default 0).
    #[arg(long)]
    cpu: Option<u32>,

    /// Also write the report as JSON to this file.
    #[arg(long)]
    json: Option<PathBuf>,
}

impl RunArgs {
    fn config(&self) -> RunConfig {
        let mut config = RunConfig::new(self.version);
        if let Some(filter) = &self.filter {
            config = config.with_name_filter(filter.clone());
        }
        if let Some(access) = self.access {
            config = config.with_access(access);
        }
        config
    }

    fn backend(&self) -> Backend<'_> {
        if let Some(path) = &self.profile {
            Backend::Profile(path)
        } else if self.conforming {
            Backend::Conforming
        } else {
            Backend::Host(self.cpu.unwrap_or(0))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Backend<'a> {
    Profile(&'a Path),
    Conforming,
    Host(u32),
}

impl Backend<'_> {
    fn label(self) -> String {
        match self {
            Self::Profile(path) => format!("profile:{}", path.display()),
            Self::Conforming => "conforming".to_string(),
            Self::Host(cpu) => format!("cpu{cpu}"),
        }
    }

    fn open(self, registry: &Registry, config: &RunConfig) -> Result<Box<dyn Platform>, CliError> {
        match self {
            Self::Profile(path) => {
                let profile = load_profile(path)?;
                Ok(Box::new(SimulatedPlatform::from_profile(&profile)))
            }
            Self::Conforming => Ok(Box::new(SimulatedPlatform::conforming(registry, config))),
            Self::Host(cpu) => open_host(cpu),
        }
    }
}

#[cfg(unix)]
fn open_host(cpu: u32) -> Result<Box<dyn Platform>, CliError> {
    Ok(Box::new(msr_check::devcpu::DevCpu::open(cpu)?))
}

#[cfg(not(unix))]
fn open_host(_cpu: u32) -> Result<Box<dyn Platform>, CliError> {
    Err(CliError::HostUnsupported)
}

fn registry_from(path: Option<&Path>) -> Result<Registry, CliError> {
    match path {
        Some(path) => load_registry(path),
        None => Ok(Registry::builtin()?),
    }
}

fn run_list(
    version: Option<VersionTag>,
    filter: Option<&str>,
    registry: Option<&Path>,
) -> Result<i32, CliError> {
    let registry = registry_from(registry)?;
    let shown: Vec<_> = registry
        .iter()
        .filter(|case| version.is_none_or(|v| case.applies_to(v)))
        .filter(|case| filter.is_none_or(|f| case.name.contains(f)))
        .collect();
    for case in &shown {
        println!("{}", case_line(case));
    }
    println!();
    println!("{} of {} cases", shown.len(), registry.len());
    Ok(0)
}

fn run_suite(args: &RunArgs) -> Result<i32, CliError> {
    let registry = registry_from(args.registry.as_deref())?;
    let config = args.config();
    let backend = args.backend();
    log::info!(
        "running TDX {} suite on {}",
        config.version,
        backend.label()
    );

    let mut platform = backend.open(&registry, &config)?;
    let report = run(&registry, &config, &mut *platform)?;

    if let Err(source) = write_report(&mut io::stdout().lock(), &report) {
        return Err(CliError::Io {
            path: PathBuf::from("<stdout>"),
            source,
        });
    }

    if let Some(path) = &args.json {
        write_json(path, &backend.label(), &report)?;
    }
    Ok(i32::from(!report.all_passed()))
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::List {
            version,
            filter,
            registry,
        } => run_list(version, filter.as_deref(), registry.as_deref()),
        Commands::Run(args) => run_suite(&args),
    };

    let exit_code = result.unwrap_or_else(|e| {
        eprintln!("error: {e}");
        e.exit_code()
    });
    std::process::exit(exit_code);
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from([&["tdx-msr-check"][..], args].concat())
    }

    fn run_args(args: &[&str]) -> RunArgs {
        match parse(args).expect("valid run args").command {
            Commands::Run(run) => run,
            Commands::List { .. } => panic!("expected run"),
        }
    }

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn run_defaults_to_host_cpu_zero() {
        let args = run_args(&["run", "--version", "1.5"]);
        assert_eq!(args.backend(), Backend::Host(0));
        assert_eq!(args.config(), RunConfig::new(VersionTag::V1_5));
    }

    #[test]
    fn run_filters_reach_the_config() {
        let args = run_args(&[
            "run", "-v", "2.0", "--filter", "X2APIC", "--access", "wrmsr", "--cpu", "3",
        ]);
        assert_eq!(
            args.config(),
            RunConfig::new(VersionTag::V2_0)
                .with_name_filter("X2APIC")
                .with_access(Access::Write)
        );
        assert_eq!(args.backend(), Backend::Host(3));
    }

    #[test]
    fn profile_selects_the_simulated_backend() {
        let args = run_args(&["run", "--version", "1.0", "--profile", "host.json"]);
        assert_eq!(args.backend(), Backend::Profile(Path::new("host.json")));
        assert_eq!(args.backend().label(), "profile:host.json");
    }

    #[test]
    fn backends_are_mutually_exclusive() {
        let conforming_on_cpu = ["run", "--version", "1.5", "--conforming", "--cpu", "1"];
        assert!(parse(&conforming_on_cpu).is_err());
        let profile_and_conforming = ["run", "-v", "1.5", "--profile", "p.json", "--conforming"];
        assert!(parse(&profile_and_conforming).is_err());
    }

    #[test]
    fn unknown_versions_are_rejected_at_parse_time() {
        assert!(parse(&["run", "--version", "1.4"]).is_err());
        assert!(parse(&["list", "--version", "3.0"]).is_err());
    }

    #[test]
    fn run_requires_a_version() {
        assert!(parse(&["run", "--conforming"]).is_err());
    }
}
