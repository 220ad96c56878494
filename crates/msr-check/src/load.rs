//! JSON loading of case registries and simulated platform profiles.

use std::fs;
use std::path::Path;

use msr_engine::{PlatformProfile, Registry, TestCase};
use serde::de::DeserializeOwned;

use crate::error::CliError;

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, CliError> {
    let text = fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| CliError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Loads and validates a registry file: a JSON array of test cases.
///
/// # Errors
///
/// Returns [`CliError::Io`] or [`CliError::Json`] when the file cannot be read
/// or parsed, and [`CliError::Registry`] when the cases fail validation.
pub fn load_registry(path: &Path) -> Result<Registry, CliError> {
    let cases: Vec<TestCase> = read_json(path)?;
    let count = cases.len();
    let registry = Registry::new(cases)?;
    log::info!("loaded {count} cases from {}", path.display());
    Ok(registry)
}

/// Loads a simulated platform profile.
///
/// # Errors
///
/// Returns [`CliError::Io`] or [`CliError::Json`] when the file cannot be read
/// or parsed.
pub fn load_profile(path: &Path) -> Result<PlatformProfile, CliError> {
    let profile: PlatformProfile = read_json(path)?;
    log::debug!(
        "profile {}: {} cpuid leaves, {} msrs",
        path.display(),
        profile.cpuid.len(),
        profile.msrs.len()
    );
    Ok(profile)
}
