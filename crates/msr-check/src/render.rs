//! Text and JSON rendering of registries and reports.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use msr_engine::{CaseVerdict, Report, RunSummary, TestCase};
use serde::Serialize;

use crate::error::CliError;

/// One `list` line: name, first MSR, access, width, baseline, precondition
/// and module versions.
#[must_use]
pub fn case_line(case: &TestCase) -> String {
    let precondition = case.precondition.map_or("-", |p| p.name());
    let baseline = case.baseline.to_string();
    format!(
        "{:<36} {:#010x} {:<5} {:>3} {:<8} {:<14} {}",
        case.name,
        case.msr,
        case.access.as_str(),
        case.width,
        baseline,
        precondition,
        case.versions
    )
}

/// Writes one line per case, the first mismatch of each failure and a
/// closing summary.
///
/// # Errors
///
/// Propagates write errors from `out`.
pub fn write_report<W: Write>(out: &mut W, report: &Report) -> io::Result<()> {
    for result in &report.results {
        writeln!(out, "{result}")?;
        if let CaseVerdict::Fail { first, .. } = &result.verdict {
            writeln!(out, "  gate: {:?}, first mismatch: {first}", result.gate)?;
        }
    }
    writeln!(out)?;
    writeln!(out, "TDX {}: {}", report.version, report.summary())
}

#[derive(Serialize)]
struct ReportDocument<'a> {
    backend: &'a str,
    summary: RunSummary,
    #[serde(flatten)]
    report: &'a Report,
}

/// Writes `report` as pretty-printed JSON, tagged with the backend it ran on.
///
/// # Errors
///
/// Returns [`CliError::Json`] when serialisation fails and [`CliError::Io`]
/// when the file cannot be written.
pub fn write_json(path: &Path, backend: &str, report: &Report) -> Result<(), CliError> {
    let document = ReportDocument {
        backend,
        summary: report.summary(),
        report,
    };
    let mut bytes = serde_json::to_vec_pretty(&document).map_err(|source| CliError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    bytes.push(b'\n');
    fs::write(path, bytes).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use std::fs;

    use msr_engine::{
        run, Access, Outcome, Precondition, Registry, RunConfig, SimulatedPlatform, TestCase,
        VersionTag,
    };

    use super::{case_line, write_json, write_report};

    fn registry() -> Registry {
        Registry::new(vec![
            TestCase::new(
                "IA32_TSC_read",
                &VersionTag::ALL,
                0x10,
                Access::Read,
                Outcome::NoFault,
            ),
            TestCase::new(
                "IA32_X2APIC_IRRX_write",
                &[VersionTag::V1_5],
                0x820,
                Access::Write,
                Outcome::GeneralProtection,
            )
            .with_width(8),
        ])
        .expect("valid")
    }

    #[test]
    fn list_line_shows_every_column() {
        let case = TestCase::new(
            "IA32_PKRS_read",
            &[VersionTag::V2_0],
            0x6e1,
            Access::Read,
            Outcome::NoFault,
        )
        .with_precondition(Precondition::Pks);
        let line = case_line(&case);
        assert!(line.starts_with("IA32_PKRS_read"));
        for column in ["0x000006e1", "read", "no fault", "pks", "2.0"] {
            assert!(line.contains(column), "{line}");
        }
    }

    #[test]
    fn ungated_cases_show_a_dash() {
        let case = TestCase::new(
            "IA32_TSC_read",
            &VersionTag::ALL,
            0x10,
            Access::Read,
            Outcome::NoFault,
        );
        assert!(case_line(&case).contains(" - "));
    }

    #[test]
    fn report_text_lists_failures_and_summary() {
        let registry = registry();
        let config = RunConfig::new(VersionTag::V1_5);
        let mut platform = SimulatedPlatform::new();
        platform.define_msr(0x10, 7, Outcome::NoFault, Outcome::NoFault);
        platform.define_msr(0x822, 0, Outcome::NoFault, Outcome::NoFault);
        let report = run(&registry, &config, &mut platform).expect("contained");

        let mut out = Vec::new();
        write_report(&mut out, &report).expect("in-memory write");
        let text = String::from_utf8(out).expect("utf-8");

        assert!(text.contains("PASS IA32_TSC_read"));
        assert!(text.contains("FAIL IA32_X2APIC_IRRX_write"));
        assert!(text.contains("first mismatch"));
        assert!(text
            .trim_end()
            .ends_with("TDX 1.5: 1 passed, 1 failed, 2 total"));
    }

    #[test]
    fn json_report_carries_backend_and_summary() {
        let registry = registry();
        let config = RunConfig::new(VersionTag::V1_5);
        let mut platform = SimulatedPlatform::conforming(&registry, &config);
        let report = run(&registry, &config, &mut platform).expect("contained");

        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("report.json");
        write_json(&path, "conforming", &report).expect("written");

        let text = fs::read_to_string(&path).expect("read");
        let value: serde_json::Value = serde_json::from_str(&text).expect("json");
        assert_eq!(value["backend"], "conforming");
        assert_eq!(value["version"], "1.5");
        assert_eq!(value["summary"]["passed"], 2);
        assert_eq!(value["results"].as_array().map(Vec::len), Some(2));
    }
}
