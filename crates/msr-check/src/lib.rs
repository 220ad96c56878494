//! Command-line front end for TDX guest MSR conformance runs.
//!
//! Loads case registries and simulated platform profiles from JSON, drives
//! the host `/dev/cpu` backend, and renders reports as text or JSON.

use clap as _;
use env_logger as _;

/// Front-end error type and exit code mapping.
pub mod error;
/// JSON registry and profile loading.
pub mod load;
/// Report and registry rendering.
pub mod render;

/// Linux `/dev/cpu` MSR and CPUID backend.
#[cfg(unix)]
pub mod devcpu;

pub use error::CliError;
