//! Source-tree checks for layout and lint settings shared by every crate.

use clap as _;
use env_logger as _;
#[cfg(unix)]
use libc as _;
use log as _;
use msr_check as _;
use msr_engine as _;
use serde as _;
use serde_json as _;
use tempfile as _;
use thiserror as _;

use std::fs;
use std::path::{Path, PathBuf};

const MAX_WIDTH: usize = 100;

fn crates_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .to_path_buf()
}

fn rust_sources(dir: &Path, found: &mut Vec<PathBuf>) {
    for entry in fs::read_dir(dir).unwrap() {
        let path = entry.unwrap().path();
        if path.is_dir() {
            if path.file_name().is_some_and(|name| name == "target") {
                continue;
            }
            rust_sources(&path, found);
        } else if path.extension().is_some_and(|ext| ext == "rs") {
            found.push(path);
        }
    }
}

fn all_sources() -> Vec<PathBuf> {
    let mut found = Vec::new();
    rust_sources(&crates_dir(), &mut found);
    assert!(!found.is_empty());
    found
}

#[test]
fn code_lines_fit_the_default_width() {
    let mut overlong = Vec::new();
    for path in all_sources() {
        let text = fs::read_to_string(&path).unwrap();
        for (number, line) in text.lines().enumerate() {
            // String literals are left as written.
            let literal = line.trim_start().starts_with('"');
            if line.chars().count() > MAX_WIDTH && !literal {
                overlong.push(format!("{}:{}", path.display(), number + 1));
            }
        }
    }
    assert!(overlong.is_empty(), "lines over {MAX_WIDTH}: {overlong:#?}");
}

#[test]
fn section_comments_are_plain() {
    for path in all_sources() {
        let text = fs::read_to_string(&path).unwrap();
        assert!(
            !text.contains('\u{2500}'),
            "banner comment in {}",
            path.display()
        );
    }
}

#[test]
fn unused_dependencies_are_denied_in_every_crate() {
    for name in ["msr-engine", "msr-check"] {
        let manifest = crates_dir().join(name).join("Cargo.toml");
        let text = fs::read_to_string(&manifest).unwrap();
        assert!(
            text.contains("unused_crate_dependencies = \"deny\""),
            "{}",
            manifest.display()
        );
    }
}
