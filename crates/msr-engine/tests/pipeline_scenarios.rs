//! End-to-end pipeline scenarios over synthetic and built-in registries.

#![allow(clippy::pedantic, clippy::nursery, clippy::too_many_lines)]

use log as _;
use msr_engine::{
    run, verify, Access, CaseVerdict, CpuidQuery, CpuidRegister, CpuidResult, Gate,
    OffsetVerdict, Outcome, Precondition, Registry, RunConfig, RunError, SimulatedPlatform,
    TestCase, TrapKind, VersionTag,
};
use proptest as _;
use rstest::rstest;
#[cfg(feature = "serde")]
use serde as _;
use thiserror as _;

const TSC: u32 = 0x10;
const VMX_BASIC: u32 = 0x480;
const PKRS: u32 = 0x6e1;
const X2APIC_IRR: u32 = 0x820;

#[test]
fn silent_read_of_tsc_passes() {
    let case = TestCase::new(
        "IA32_TSC_read",
        &VersionTag::ALL,
        TSC,
        Access::Read,
        Outcome::NoFault,
    );
    let mut platform = SimulatedPlatform::new();
    platform.define_msr(
        TSC,
        0x1234_5678,
        Outcome::NoFault,
        Outcome::VirtualizationException,
    );

    let result = verify(&case, &mut platform).expect("contained");
    assert_eq!(result.expected, Outcome::NoFault);
    assert_eq!(result.gate, Gate::Ungated);
    assert_eq!(result.verdict, CaseVerdict::Pass);
}

fn vmx_basic_registry() -> Registry {
    Registry::new(vec![
        TestCase::new(
            "IA32_VMX_BASIC_read",
            &[VersionTag::V1_0],
            VMX_BASIC,
            Access::Read,
            Outcome::GeneralProtection,
        ),
        TestCase::new(
            "IA32_VMX_BASIC_read",
            &[VersionTag::V1_5, VersionTag::V2_0],
            VMX_BASIC,
            Access::Read,
            Outcome::NoFault,
        ),
    ])
    .expect("valid registry")
}

#[test]
fn vmx_basic_faults_under_1_0_without_vmx() {
    let report = run(
        &vmx_basic_registry(),
        &RunConfig::new(VersionTag::V1_0),
        &mut SimulatedPlatform::new(),
    )
    .expect("contained");
    assert!(report.all_passed());
    assert_eq!(report.results.len(), 1);
}

#[rstest]
#[case(Outcome::NoFault, true)]
#[case(Outcome::GeneralProtection, false)]
fn vmx_basic_under_1_5_depends_on_observed_outcome(
    #[case] observed: Outcome,
    #[case] passes: bool,
) {
    let mut platform = SimulatedPlatform::new();
    platform.define_msr(
        VMX_BASIC,
        0x00da_0400_0000_0001,
        observed,
        Outcome::GeneralProtection,
    );

    let report = run(
        &vmx_basic_registry(),
        &RunConfig::new(VersionTag::V1_5),
        &mut platform,
    )
    .expect("contained");
    let result = report.get("IA32_VMX_BASIC_read").expect("selected");
    assert_eq!(result.passed(), passes);
    if let CaseVerdict::Fail { first, .. } = result.verdict {
        assert_eq!(
            first.verdict(),
            OffsetVerdict::UnexpectedFault(TrapKind::GeneralProtection)
        );
    }
}

#[test]
fn missing_pks_forces_gp_over_a_silent_baseline() {
    let case = TestCase::new(
        "IA32_PKRS_read",
        &VersionTag::ALL,
        PKRS,
        Access::Read,
        Outcome::NoFault,
    )
    .with_precondition(Precondition::Pks);
    let mut platform = SimulatedPlatform::new();
    platform.set_cpuid(
        CpuidQuery::new(0x7, 0),
        CpuidResult {
            ebx: 0xf3bf_a7eb,
            ecx: 0x1b41_5f6e,
            ..CpuidResult::default()
        },
    );
    platform.define_msr(PKRS, 0, Outcome::NoFault, Outcome::NoFault);

    let result = verify(&case, &mut platform).expect("contained");
    assert_eq!(result.expected, Outcome::GeneralProtection);
    assert_eq!(result.gate, Gate::Unsatisfied);
    match result.verdict {
        CaseVerdict::Fail { first, mismatches } => {
            assert_eq!(mismatches, 1);
            assert_eq!(
                first.verdict(),
                OffsetVerdict::ExpectedButNoFault(TrapKind::GeneralProtection)
            );
        }
        CaseVerdict::Pass => panic!("PKRS read without PKS must be reported"),
    }
}

#[test]
fn present_pks_keeps_the_silent_baseline() {
    let case = TestCase::new(
        "IA32_PKRS_read",
        &VersionTag::ALL,
        PKRS,
        Access::Read,
        Outcome::NoFault,
    )
    .with_precondition(Precondition::Pks);
    let mut platform = SimulatedPlatform::new();
    platform.set_cpuid_bit(CpuidQuery::new(0x7, 0), CpuidRegister::Ecx, 31);
    platform.define_msr(PKRS, 0, Outcome::NoFault, Outcome::NoFault);

    let result = verify(&case, &mut platform).expect("contained");
    assert_eq!(result.gate, Gate::Satisfied);
    assert!(result.passed());
}

#[test]
fn irr_block_write_cites_the_silent_offset() {
    let case = TestCase::new(
        "IA32_X2APIC_IRRX_write",
        &[VersionTag::V1_5, VersionTag::V2_0],
        X2APIC_IRR,
        Access::Write,
        Outcome::GeneralProtection,
    )
    .with_width(8);
    let mut platform = SimulatedPlatform::new();
    for msr in X2APIC_IRR..X2APIC_IRR + 8 {
        platform.define_msr(msr, 0, Outcome::NoFault, Outcome::GeneralProtection);
    }
    platform.define_msr(X2APIC_IRR + 3, 0, Outcome::NoFault, Outcome::NoFault);

    let result = verify(&case, &mut platform).expect("contained");
    assert_eq!(result.checked, 8);
    match result.verdict {
        CaseVerdict::Fail { first, mismatches } => {
            assert_eq!(first.offset, 3);
            assert_eq!(first.msr, 0x823);
            assert_eq!(first.expected, Outcome::GeneralProtection);
            assert_eq!(first.observed, Outcome::NoFault);
            assert_eq!(mismatches, 1);
        }
        CaseVerdict::Pass => panic!("offset 3 did not fault"),
    }
}

#[test]
fn irr_block_write_passes_when_every_offset_faults() {
    let case = TestCase::new(
        "IA32_X2APIC_IRRX_write",
        &[VersionTag::V1_5],
        X2APIC_IRR,
        Access::Write,
        Outcome::GeneralProtection,
    )
    .with_width(8);
    let result = verify(&case, &mut SimulatedPlatform::new()).expect("contained");
    assert!(result.passed());
    assert_eq!(result.checked, 8);
}

#[rstest]
#[case(VersionTag::V1_0)]
#[case(VersionTag::V1_5)]
#[case(VersionTag::V2_0)]
fn builtin_table_is_green_on_a_conforming_platform(#[case] version: VersionTag) {
    let registry = Registry::builtin().expect("built-in table is consistent");
    let config = RunConfig::new(version);
    let mut platform = SimulatedPlatform::conforming(&registry, &config);

    let report = run(&registry, &config, &mut platform).expect("contained");
    let failures: Vec<_> = report.failures().map(|r| r.to_string()).collect();
    assert!(failures.is_empty(), "{failures:#?}");
    assert_eq!(report.summary().total, registry.select(&config).count());
}

#[test]
fn builtin_table_is_green_with_every_capability_present() {
    let registry = Registry::builtin().expect("built-in table is consistent");
    let config = RunConfig::new(VersionTag::V1_5);

    let mut platform = SimulatedPlatform::new();
    platform.set_cpuid(
        CpuidQuery::new(0xA, 0),
        CpuidResult {
            eax: 0x0830_0805,
            edx: 0x0000_0603,
            ..CpuidResult::default()
        },
    );
    platform.set_cpuid(
        CpuidQuery::new(0x1, 0),
        CpuidResult {
            ecx: (1 << 24) | (1 << 18),
            ..CpuidResult::default()
        },
    );
    platform.set_cpuid(
        CpuidQuery::new(0x7, 0),
        CpuidResult {
            ebx: 1 << 25,
            ecx: (1 << 31) | (1 << 13) | (1 << 5),
            edx: (1 << 19) | (1 << 18) | (1 << 5),
            ..CpuidResult::default()
        },
    );
    platform.set_cpuid(
        CpuidQuery::new(0xD, 1),
        CpuidResult {
            eax: 1 << 4,
            ecx: 1 << 11,
            ..CpuidResult::default()
        },
    );
    platform.define_msr(0x10a, 1 << 7, Outcome::NoFault, Outcome::GeneralProtection);
    platform.conform_to(&registry, &config);

    let report = run(&registry, &config, &mut platform).expect("contained");
    assert!(report.all_passed());
    let tsx = report.get("IA32_TSX_CTRL_read").expect("selected");
    assert_eq!(tsx.gate, Gate::Satisfied);
    assert_eq!(tsx.expected, Outcome::NoFault);
    let pkrs = report.get("IA32_PKRS_write").expect("selected");
    assert_eq!(pkrs.gate, Gate::Satisfied);
}

#[test]
fn faulting_tsx_probe_forces_gp_instead_of_aborting() {
    let registry = Registry::builtin().expect("valid");
    let config = RunConfig::new(VersionTag::V1_5).with_name_filter("TSX_CTRL");
    let mut platform = SimulatedPlatform::new();
    platform.define_msr(
        0x10a,
        0,
        Outcome::VirtualizationException,
        Outcome::GeneralProtection,
    );
    platform.define_msr(
        0x122,
        0,
        Outcome::GeneralProtection,
        Outcome::GeneralProtection,
    );

    let report = run(&registry, &config, &mut platform).expect("probe faults are contained");
    assert_eq!(report.results.len(), 2);
    for result in &report.results {
        assert_eq!(result.gate, Gate::ProbeFailed);
        assert_eq!(result.expected, Outcome::GeneralProtection);
        assert!(result.passed());
    }
}

#[test]
fn containment_escape_aborts_with_case_identity() {
    let registry = Registry::builtin().expect("valid");
    let config = RunConfig::new(VersionTag::V2_0);
    let mut platform = SimulatedPlatform::conforming(&registry, &config);
    platform.mark_uncontained(0x83f);

    let err = run(&registry, &config, &mut platform).expect_err("SELF_IPI read escapes");
    let RunError::Containment { case, msr, .. } = err else {
        panic!("expected a containment failure, got {err:?}");
    };
    assert_eq!(case, "IA32_X2APIC_SELF_IPI_read");
    assert_eq!(msr, 0x83f);
}

#[test]
fn escaping_capability_read_aborts_instead_of_forcing_gp() {
    let registry = Registry::builtin().expect("valid");
    let config = RunConfig::new(VersionTag::V1_5).with_name_filter("TSX_CTRL");
    let mut platform = SimulatedPlatform::new();
    platform.define_msr(0x10a, 0, Outcome::NoFault, Outcome::GeneralProtection);
    platform.define_msr(
        0x122,
        0,
        Outcome::GeneralProtection,
        Outcome::GeneralProtection,
    );
    platform.mark_uncontained(0x10a);

    let err = run(&registry, &config, &mut platform)
        .expect_err("escaping capability read must not be recovered");
    let RunError::Containment { case, msr, .. } = err else {
        panic!("expected a containment failure, got {err:?}");
    };
    assert!(case.starts_with("IA32_TSX_CTRL_"), "{case}");
    assert_eq!(msr, 0x10a);
}
