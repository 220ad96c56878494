#![no_main]

use libfuzzer_sys::fuzz_target;
use msr_engine::{
    run, Access, CpuidQuery, CpuidResult, Outcome, Precondition, Registry, RunConfig,
    SimulatedPlatform, TestCase, VersionTag,
};

const fn outcome(byte: u8) -> Outcome {
    match byte % 3 {
        0 => Outcome::NoFault,
        1 => Outcome::GeneralProtection,
        _ => Outcome::VirtualizationException,
    }
}

fn word(chunk: &[u8]) -> u32 {
    let mut bytes = [0u8; 4];
    for (slot, byte) in bytes.iter_mut().zip(chunk) {
        *slot = *byte;
    }
    u32::from_le_bytes(bytes)
}

fuzz_target!(|data: &[u8]| {
    if data.len() < 16 {
        return;
    }
    let (header, records) = data.split_at(16);

    let mut platform = SimulatedPlatform::new();
    platform.set_cpuid(
        CpuidQuery::new(0x7, 0),
        CpuidResult {
            eax: 0,
            ebx: word(&header[0..4]),
            ecx: word(&header[4..8]),
            edx: word(&header[8..12]),
        },
    );
    platform.set_cpuid(
        CpuidQuery::new(0xA, 0),
        CpuidResult {
            eax: word(&header[12..16]),
            ..CpuidResult::default()
        },
    );

    let mut cases = Vec::new();
    for (index, record) in records.chunks_exact(8).enumerate().take(64) {
        let msr = u32::from(u16::from_le_bytes([record[0], record[1]]));
        let width = u32::from(record[2]);
        let access = if record[3] & 1 == 0 {
            Access::Read
        } else {
            Access::Write
        };
        let precondition = Precondition::ALL.get(usize::from(record[5])).copied();
        let versions: Vec<_> = VersionTag::ALL
            .into_iter()
            .enumerate()
            .filter(|(bit, _)| record[6] & (1 << bit) != 0)
            .map(|(_, tag)| tag)
            .collect();

        let mut case = TestCase::new(
            format!("FUZZ_{index}"),
            &versions,
            msr,
            access,
            outcome(record[4]),
        )
        .with_width(width);
        case.precondition = precondition;
        cases.push(case);

        platform.define_msr(
            msr,
            u64::from(record[7]),
            outcome(record[7]),
            outcome(record[7] >> 2),
        );
    }

    let Ok(registry) = Registry::new(cases) else {
        return;
    };
    for version in VersionTag::ALL {
        let config = RunConfig::new(version);
        let report = run(&registry, &config, &mut platform)
            .expect("simulated accesses are contained");
        assert_eq!(report.results.len(), registry.select(&config).count());
        for (case, result) in registry.select(&config).zip(&report.results) {
            assert!(
                result.expected == case.baseline || result.expected == Outcome::GeneralProtection
            );
            assert_eq!(result.checked, case.width);
        }
    }
});
