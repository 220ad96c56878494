//! The built-in TDX guest MSR table.
//!
//! Expectations are those a TD guest observes under TDX module 1.0, 1.5 and
//! 2.0. Writes to the x2APIC self-IPI register and to the syscall/segment base
//! MSRs terminate the TD, so only their reads are listed.

#[allow(clippy::wildcard_imports)]
use crate::msr::index::*;
use crate::{Access, Outcome, Precondition, TestCase, VersionSet, VersionTag};

const NONE: Outcome = Outcome::NoFault;
const GP: Outcome = Outcome::GeneralProtection;
const VE: Outcome = Outcome::VirtualizationException;

macro_rules! msr {
    (@access read) => { Access::Read };
    (@access write) => { Access::Write };
    (@pre -) => { None };
    (@pre $pre:ident) => { Some(Precondition::$pre) };
    ($dir:ident $msr:ident, $baseline:ident, $pre:tt, $width:literal, $($version:ident)|+) => {
        TestCase {
            name: concat!(stringify!($msr), "_", stringify!($dir)).to_string(),
            versions: VersionSet::of(&[$(VersionTag::$version),+]),
            msr: $msr,
            access: msr!(@access $dir),
            width: $width,
            baseline: $baseline,
            precondition: msr!(@pre $pre),
        }
    };
}

/// Every case of the built-in table, in execution order.
#[must_use]
#[allow(clippy::too_many_lines)]
pub fn builtin_cases() -> Vec<TestCase> {
    vec![
        msr!(read IA32_PLATFORM_ID, VE, -, 1, V1_5 | V2_0),
        msr!(write IA32_PLATFORM_ID, VE, -, 1, V1_5 | V2_0),
        // APIC base reads are serviced by the guest kernel.
        msr!(read IA32_APICBASE, NONE, -, 1, V1_5 | V2_0),
        msr!(write IA32_APICBASE, VE, -, 1, V1_5 | V2_0),
        msr!(read TEST_CTRL, VE, -, 1, V1_5 | V2_0),
        msr!(write TEST_CTRL, VE, -, 1, V1_5 | V2_0),
        msr!(read IA32_TSC_ADJUST, VE, -, 1, V1_5 | V2_0),
        msr!(write IA32_TSC_ADJUST, VE, -, 1, V1_5 | V2_0),
        msr!(read IA32_TSC, NONE, -, 1, V1_0 | V1_5 | V2_0),
        msr!(write IA32_TSC, VE, -, 1, V1_0 | V1_5 | V2_0),
        msr!(read IA32_SPEC_CTRL, NONE, -, 1, V1_0 | V1_5 | V2_0),
        msr!(write IA32_SPEC_CTRL, NONE, -, 1, V1_0 | V1_5 | V2_0),
        msr!(read IA32_PRED_CMD, NONE, -, 1, V1_0),
        msr!(read IA32_PRED_CMD, GP, -, 1, V1_5 | V2_0),
        msr!(write IA32_PRED_CMD, NONE, -, 1, V1_0 | V1_5 | V2_0),
        msr!(read IA32_MKTME_PARTITIONING, VE, Pconfig, 1, V1_0 | V1_5 | V2_0),
        msr!(write IA32_MKTME_PARTITIONING, VE, Pconfig, 1, V1_0 | V1_5 | V2_0),
        msr!(read IA32_SGXLEPUBKEYHASH0, GP, -, 4, V1_0 | V1_5 | V2_0),
        msr!(write IA32_SGXLEPUBKEYHASH0, GP, -, 4, V1_0 | V1_5 | V2_0),
        msr!(read WBINVDP, GP, -, 1, V1_0 | V1_5 | V2_0),
        msr!(write WBINVDP, GP, -, 1, V1_0 | V1_5 | V2_0),
        msr!(read WBNOINVDP, GP, -, 1, V1_0 | V1_5 | V2_0),
        msr!(write WBNOINVDP, GP, -, 1, V1_0 | V1_5 | V2_0),
        msr!(read INTR_PENDING, GP, -, 1, V1_0 | V1_5 | V2_0),
        msr!(write INTR_PENDING, GP, -, 1, V1_0 | V1_5 | V2_0),
        msr!(read IA32_SMM_MONITOR_CTL, GP, -, 1, V1_0 | V1_5 | V2_0),
        msr!(write IA32_SMM_MONITOR_CTL, GP, -, 1, V1_0 | V1_5 | V2_0),
        msr!(read IA32_SMBASE, GP, -, 1, V1_0 | V1_5 | V2_0),
        msr!(write IA32_SMBASE, GP, -, 1, V1_0 | V1_5 | V2_0),
        msr!(read IA32_MISC_PACKAGE_CTLS, NONE, -, 1, V1_5 | V2_0),
        msr!(write IA32_MISC_PACKAGE_CTLS, VE, -, 1, V1_5 | V2_0),
        msr!(read IA32_PERFCTR0, NONE, Perfmon, 8, V1_5 | V2_0),
        msr!(write IA32_PERFCTR0, NONE, Perfmon, 8, V1_5 | V2_0),
        msr!(read IA32_UMWAIT_CONTROL, NONE, Waitpkg, 1, V1_0 | V1_5 | V2_0),
        msr!(write IA32_UMWAIT_CONTROL, NONE, Waitpkg, 1, V1_0 | V1_5 | V2_0),
        msr!(write IA32_ARCH_CAPABILITIES, NONE, -, 1, V1_0),
        msr!(write IA32_ARCH_CAPABILITIES, GP, -, 1, V1_5 | V2_0),
        msr!(read IA32_FLUSH_CMD, NONE, -, 1, V1_0),
        msr!(read IA32_FLUSH_CMD, GP, -, 1, V1_5 | V2_0),
        msr!(write IA32_FLUSH_CMD, NONE, -, 1, V1_0 | V1_5 | V2_0),
        msr!(read IA32_TSX_CTRL, GP, -, 1, V1_0),
        msr!(write IA32_TSX_CTRL, GP, -, 1, V1_0),
        msr!(read IA32_TSX_CTRL, NONE, Tsx, 1, V1_5),
        msr!(write IA32_TSX_CTRL, NONE, Tsx, 1, V1_5),
        msr!(read IA32_TSX_CTRL, NONE, -, 1, V2_0),
        msr!(write IA32_TSX_CTRL, NONE, -, 1, V2_0),
        msr!(read IA32_SYSENTER_CS, NONE, -, 1, V1_5 | V2_0),
        msr!(write IA32_SYSENTER_CS, NONE, -, 1, V1_5 | V2_0),
        msr!(read IA32_SYSENTER_ESP, NONE, -, 1, V1_5 | V2_0),
        msr!(write IA32_SYSENTER_ESP, NONE, -, 1, V1_5 | V2_0),
        msr!(read IA32_SYSENTER_EIP, NONE, -, 1, V1_5 | V2_0),
        msr!(write IA32_SYSENTER_EIP, NONE, -, 1, V1_5 | V2_0),
        msr!(read P6_EVNTSEL0, NONE, Perfmon, 8, V1_0 | V1_5 | V2_0),
        msr!(write P6_EVNTSEL0, NONE, Perfmon, 8, V1_0 | V1_5 | V2_0),
        msr!(write IA32_MISC_ENABLE, VE, -, 1, V1_0 | V1_5 | V2_0),
        msr!(read OFFCORE_RSP_0, NONE, Perfmon, 2, V1_0 | V1_5 | V2_0),
        msr!(write OFFCORE_RSP_0, NONE, Perfmon, 2, V1_0 | V1_5 | V2_0),
        msr!(read IA32_XFD, NONE, Xfd, 1, V1_0 | V1_5 | V2_0),
        msr!(write IA32_XFD, NONE, Xfd, 1, V1_0 | V1_5 | V2_0),
        msr!(read IA32_XFD_ERR, NONE, Xfd, 1, V1_0 | V1_5 | V2_0),
        msr!(write IA32_XFD_ERR, NONE, Xfd, 1, V1_0 | V1_5 | V2_0),
        msr!(read IA32_PLATFORM_DCA_CAP, VE, Dca, 1, V1_0 | V1_5 | V2_0),
        msr!(write IA32_PLATFORM_DCA_CAP, VE, Dca, 1, V1_0 | V1_5 | V2_0),
        msr!(read IA32_CPU_DCA_CAP, VE, Dca, 1, V1_0 | V1_5 | V2_0),
        msr!(write IA32_CPU_DCA_CAP, VE, Dca, 1, V1_0 | V1_5 | V2_0),
        msr!(read IA32_DCA_0_CAP, VE, Dca, 1, V1_0 | V1_5 | V2_0),
        msr!(write IA32_DCA_0_CAP, VE, Dca, 1, V1_0 | V1_5 | V2_0),
        msr!(read SLAM_ENABLE, GP, -, 1, V1_0 | V1_5 | V2_0),
        msr!(write SLAM_ENABLE, GP, -, 1, V1_0 | V1_5 | V2_0),
        msr!(read IA32_CR_PAT, NONE, -, 1, V1_0 | V1_5 | V2_0),
        msr!(write IA32_CR_PAT, NONE, -, 1, V1_0 | V1_5 | V2_0),
        // Only the first fixed counter is checked; higher counters depend on
        // the CPUID(0xA).EDX[4:0] count reported to the TD.
        msr!(read CORE_PERF_FIXED_CTR0, NONE, FixedCounters, 1, V1_0 | V1_5),
        msr!(write CORE_PERF_FIXED_CTR0, NONE, FixedCounters, 1, V1_0 | V1_5),
        msr!(read CORE_PERF_FIXED_CTR0, NONE, FixedCounters, 1, V2_0),
        msr!(write CORE_PERF_FIXED_CTR0, NONE, FixedCounters, 1, V2_0),
        msr!(read PERF_METRICS, NONE, Perfmon, 1, V1_0 | V1_5 | V2_0),
        msr!(write PERF_METRICS, NONE, Perfmon, 1, V1_0 | V1_5 | V2_0),
        msr!(write IA32_PERF_CAPABILITIES, GP, Perfmon, 1, V1_0 | V1_5 | V2_0),
        msr!(read CORE_PERF_FIXED_CTR_CTRL, NONE, Perfmon, 1, V1_0 | V1_5 | V2_0),
        msr!(write CORE_PERF_FIXED_CTR_CTRL, NONE, Perfmon, 1, V1_0 | V1_5 | V2_0),
        msr!(read CORE_PERF_GLOBAL_STATUS, NONE, Perfmon, 1, V1_0 | V1_5 | V2_0),
        msr!(write CORE_PERF_GLOBAL_STATUS, GP, Perfmon, 1, V1_0 | V1_5 | V2_0),
        msr!(read CORE_PERF_GLOBAL_CTRL, NONE, Perfmon, 1, V1_0 | V1_5 | V2_0),
        msr!(write CORE_PERF_GLOBAL_CTRL, NONE, Perfmon, 1, V1_0 | V1_5 | V2_0),
        msr!(read CORE_PERF_GLOBAL_OVF_CTRL, NONE, Perfmon, 1, V1_0 | V1_5 | V2_0),
        msr!(write CORE_PERF_GLOBAL_OVF_CTRL, NONE, Perfmon, 1, V1_0 | V1_5 | V2_0),
        msr!(read IA32_PERF_GLOBAL_STATUS_SET, NONE, Perfmon, 1, V1_0 | V1_5 | V2_0),
        msr!(write IA32_PERF_GLOBAL_STATUS_SET, NONE, Perfmon, 1, V1_0 | V1_5 | V2_0),
        msr!(read IA32_PERF_GLOBAL_INUSE, NONE, Perfmon, 1, V1_0 | V1_5 | V2_0),
        msr!(write IA32_PERF_GLOBAL_INUSE, GP, Perfmon, 1, V1_0 | V1_5 | V2_0),
        msr!(read IA32_PEBS_ENABLE, NONE, Perfmon, 1, V1_0 | V1_5 | V2_0),
        msr!(write IA32_PEBS_ENABLE, NONE, Perfmon, 1, V1_0 | V1_5 | V2_0),
        msr!(read PEBS_DATA_CFG, NONE, Perfmon, 1, V1_0 | V1_5 | V2_0),
        msr!(write PEBS_DATA_CFG, NONE, Perfmon, 1, V1_0 | V1_5 | V2_0),
        msr!(read PEBS_LD_LAT_THRESHOLD, NONE, Perfmon, 1, V1_0 | V1_5 | V2_0),
        msr!(write PEBS_LD_LAT_THRESHOLD, NONE, Perfmon, 1, V1_0 | V1_5 | V2_0),
        msr!(read PEBS_FRONTEND, NONE, Perfmon, 1, V1_0 | V1_5 | V2_0),
        msr!(write PEBS_FRONTEND, NONE, Perfmon, 1, V1_0 | V1_5 | V2_0),
        // VMX capability MSRs: #GP under 1.0, virtualized from 1.5 on.
        msr!(read IA32_VMX_BASIC, GP, -, 1, V1_0),
        msr!(read IA32_VMX_BASIC, NONE, -, 1, V1_5 | V2_0),
        msr!(write IA32_VMX_BASIC, GP, -, 1, V1_0 | V1_5 | V2_0),
        msr!(read IA32_VMX_PINBASED_CTLS, GP, -, 1, V1_0),
        msr!(read IA32_VMX_PINBASED_CTLS, VE, -, 1, V1_5 | V2_0),
        msr!(write IA32_VMX_PINBASED_CTLS, GP, -, 1, V1_0 | V1_5 | V2_0),
        msr!(read IA32_VMX_PROCBASED_CTLS, GP, -, 1, V1_0),
        msr!(read IA32_VMX_PROCBASED_CTLS, VE, -, 1, V1_5 | V2_0),
        msr!(write IA32_VMX_PROCBASED_CTLS, GP, -, 1, V1_0 | V1_5 | V2_0),
        msr!(read IA32_VMX_EXIT_CTLS, GP, -, 1, V1_0),
        msr!(read IA32_VMX_EXIT_CTLS, VE, -, 1, V1_5 | V2_0),
        msr!(write IA32_VMX_EXIT_CTLS, GP, -, 1, V1_0 | V1_5 | V2_0),
        msr!(read IA32_VMX_ENTRY_CTLS, GP, -, 1, V1_0),
        msr!(read IA32_VMX_ENTRY_CTLS, VE, -, 1, V1_5 | V2_0),
        msr!(write IA32_VMX_ENTRY_CTLS, GP, -, 1, V1_0 | V1_5 | V2_0),
        msr!(read IA32_VMX_MISC, GP, -, 1, V1_0),
        msr!(read IA32_VMX_MISC, NONE, -, 1, V1_5 | V2_0),
        msr!(write IA32_VMX_MISC, GP, -, 1, V1_0 | V1_5 | V2_0),
        msr!(read IA32_VMX_CR0_FIXED0, GP, -, 1, V1_0),
        msr!(read IA32_VMX_CR0_FIXED0, NONE, -, 1, V1_5 | V2_0),
        msr!(write IA32_VMX_CR0_FIXED0, GP, -, 1, V1_0 | V1_5 | V2_0),
        msr!(read IA32_VMX_CR0_FIXED1, GP, -, 1, V1_0),
        msr!(read IA32_VMX_CR0_FIXED1, NONE, -, 1, V1_5 | V2_0),
        msr!(write IA32_VMX_CR0_FIXED1, GP, -, 1, V1_0 | V1_5 | V2_0),
        msr!(read IA32_VMX_CR4_FIXED0, GP, -, 1, V1_0),
        msr!(read IA32_VMX_CR4_FIXED0, NONE, -, 1, V1_5 | V2_0),
        msr!(write IA32_VMX_CR4_FIXED0, GP, -, 1, V1_0 | V1_5 | V2_0),
        msr!(read IA32_VMX_CR4_FIXED1, GP, -, 1, V1_0),
        msr!(read IA32_VMX_CR4_FIXED1, NONE, -, 1, V1_5 | V2_0),
        msr!(write IA32_VMX_CR4_FIXED1, GP, -, 1, V1_0 | V1_5 | V2_0),
        msr!(read IA32_VMX_VMCS_ENUM, GP, -, 1, V1_0),
        msr!(read IA32_VMX_VMCS_ENUM, VE, -, 1, V1_5 | V2_0),
        msr!(write IA32_VMX_VMCS_ENUM, GP, -, 1, V1_0 | V1_5 | V2_0),
        msr!(read IA32_VMX_PROCBASED_CTLS2, GP, -, 1, V1_0),
        msr!(read IA32_VMX_PROCBASED_CTLS2, NONE, -, 1, V1_5 | V2_0),
        msr!(write IA32_VMX_PROCBASED_CTLS2, GP, -, 1, V1_0 | V1_5 | V2_0),
        msr!(read IA32_VMX_EPT_VPID_CAP, GP, -, 1, V1_0),
        msr!(read IA32_VMX_EPT_VPID_CAP, NONE, -, 1, V1_5 | V2_0),
        msr!(write IA32_VMX_EPT_VPID_CAP, GP, -, 1, V1_0 | V1_5 | V2_0),
        msr!(read IA32_VMX_TRUE_PINBASED_CTLS, GP, -, 1, V1_0),
        msr!(read IA32_VMX_TRUE_PINBASED_CTLS, NONE, -, 1, V1_5 | V2_0),
        msr!(write IA32_VMX_TRUE_PINBASED_CTLS, GP, -, 1, V1_0 | V1_5 | V2_0),
        msr!(read IA32_VMX_TRUE_PROCBASED_CTLS, GP, -, 1, V1_0),
        msr!(read IA32_VMX_TRUE_PROCBASED_CTLS, NONE, -, 1, V1_5 | V2_0),
        msr!(write IA32_VMX_TRUE_PROCBASED_CTLS, GP, -, 1, V1_0 | V1_5 | V2_0),
        msr!(read IA32_VMX_TRUE_EXIT_CTLS, GP, -, 1, V1_0),
        msr!(read IA32_VMX_TRUE_EXIT_CTLS, NONE, -, 1, V1_5 | V2_0),
        msr!(write IA32_VMX_TRUE_EXIT_CTLS, GP, -, 1, V1_0 | V1_5 | V2_0),
        msr!(read IA32_VMX_TRUE_ENTRY_CTLS, GP, -, 1, V1_0),
        msr!(read IA32_VMX_TRUE_ENTRY_CTLS, NONE, -, 1, V1_5 | V2_0),
        msr!(write IA32_VMX_TRUE_ENTRY_CTLS, GP, -, 1, V1_0 | V1_5 | V2_0),
        msr!(read IA32_VMX_VMFUNC, GP, -, 1, V1_0),
        msr!(read IA32_VMX_VMFUNC, NONE, -, 1, V1_5 | V2_0),
        msr!(write IA32_VMX_VMFUNC, GP, -, 1, V1_0 | V1_5 | V2_0),
        msr!(read IA32_VMX_PROCBASED_CTLS3, GP, -, 1, V1_0),
        msr!(read IA32_VMX_PROCBASED_CTLS3, NONE, -, 1, V1_5 | V2_0),
        msr!(write IA32_VMX_PROCBASED_CTLS3, GP, -, 1, V1_0 | V1_5 | V2_0),
        msr!(read IA32_PMC0, NONE, Perfmon, 8, V1_0 | V1_5 | V2_0),
        msr!(write IA32_PMC0, NONE, Perfmon, 8, V1_0 | V1_5 | V2_0),
        msr!(read IA32_SGX_SVN_STATUS, GP, -, 1, V1_0 | V1_5 | V2_0),
        msr!(write IA32_SGX_SVN_STATUS, GP, -, 1, V1_0 | V1_5 | V2_0),
        msr!(read IA32_SE_SVN_EXPAN, VE, -, 1, V1_5 | V2_0),
        msr!(write IA32_SE_SVN_EXPAN, VE, -, 1, V1_5 | V2_0),
        msr!(read IA32_RTIT_OUTPUT_BASE, NONE, Rtit, 1, V1_0 | V1_5 | V2_0),
        msr!(write IA32_RTIT_OUTPUT_BASE, NONE, Rtit, 1, V1_0 | V1_5 | V2_0),
        msr!(read IA32_RTIT_OUTPUT_MASK, NONE, Rtit, 1, V1_0 | V1_5 | V2_0),
        msr!(write IA32_RTIT_OUTPUT_MASK, NONE, Rtit, 1, V1_0 | V1_5 | V2_0),
        msr!(read IA32_RTIT_CTL, NONE, Rtit, 1, V1_0 | V1_5 | V2_0),
        msr!(write IA32_RTIT_CTL, NONE, Rtit, 1, V1_0 | V1_5 | V2_0),
        msr!(read IA32_RTIT_STATUS, NONE, Rtit, 1, V1_0 | V1_5 | V2_0),
        msr!(write IA32_RTIT_STATUS, NONE, Rtit, 1, V1_0 | V1_5 | V2_0),
        msr!(read IA32_RTIT_CR3_MATCH, NONE, Rtit, 1, V1_0 | V1_5 | V2_0),
        msr!(write IA32_RTIT_CR3_MATCH, NONE, Rtit, 1, V1_0 | V1_5 | V2_0),
        msr!(read IA32_RTIT_ADDR0_A, NONE, Rtit, 1, V1_0 | V1_5 | V2_0),
        msr!(write IA32_RTIT_ADDR0_A, NONE, Rtit, 1, V1_0 | V1_5 | V2_0),
        msr!(read IA32_RTIT_ADDR0_B, NONE, Rtit, 1, V1_0 | V1_5 | V2_0),
        msr!(write IA32_RTIT_ADDR0_B, NONE, Rtit, 1, V1_0 | V1_5 | V2_0),
        msr!(read IA32_RTIT_ADDR1_A, NONE, Rtit, 1, V1_0 | V1_5 | V2_0),
        msr!(write IA32_RTIT_ADDR1_A, NONE, Rtit, 1, V1_0 | V1_5 | V2_0),
        msr!(read IA32_RTIT_ADDR1_B, NONE, Rtit, 1, V1_0 | V1_5 | V2_0),
        msr!(write IA32_RTIT_ADDR1_B, NONE, Rtit, 1, V1_0 | V1_5 | V2_0),
        msr!(read IA32_RTIT_ADDR2_A, NONE, Rtit, 1, V1_0 | V1_5 | V2_0),
        msr!(write IA32_RTIT_ADDR2_A, NONE, Rtit, 1, V1_0 | V1_5 | V2_0),
        msr!(read IA32_RTIT_ADDR2_B, NONE, Rtit, 1, V1_0 | V1_5 | V2_0),
        msr!(write IA32_RTIT_ADDR2_B, NONE, Rtit, 1, V1_0 | V1_5 | V2_0),
        msr!(read IA32_RTIT_ADDR3_A, NONE, Rtit, 1, V1_0 | V1_5 | V2_0),
        msr!(write IA32_RTIT_ADDR3_A, NONE, Rtit, 1, V1_0 | V1_5 | V2_0),
        msr!(read IA32_RTIT_ADDR3_B, NONE, Rtit, 1, V1_0 | V1_5 | V2_0),
        msr!(write IA32_RTIT_ADDR3_B, NONE, Rtit, 1, V1_0 | V1_5 | V2_0),
        msr!(read IA32_DS_AREA, NONE, -, 1, V1_0 | V1_5 | V2_0),
        msr!(write IA32_DS_AREA, NONE, -, 1, V1_0 | V1_5 | V2_0),
        msr!(read IA32_U_CET, NONE, Cet, 1, V1_0 | V1_5 | V2_0),
        msr!(write IA32_U_CET, NONE, Cet, 1, V1_0 | V1_5 | V2_0),
        msr!(read IA32_S_CET, NONE, Cet, 1, V1_0 | V1_5 | V2_0),
        msr!(write IA32_S_CET, NONE, Cet, 1, V1_0 | V1_5 | V2_0),
        msr!(read IA32_PL0_SSP, NONE, Cet, 1, V1_0 | V1_5 | V2_0),
        msr!(write IA32_PL0_SSP, NONE, Cet, 1, V1_0 | V1_5 | V2_0),
        msr!(read IA32_PL1_SSP, NONE, Cet, 1, V1_0 | V1_5 | V2_0),
        msr!(write IA32_PL1_SSP, NONE, Cet, 1, V1_0 | V1_5 | V2_0),
        msr!(read IA32_PL2_SSP, NONE, Cet, 1, V1_0 | V1_5 | V2_0),
        msr!(write IA32_PL2_SSP, NONE, Cet, 1, V1_0 | V1_5 | V2_0),
        msr!(read IA32_PL3_SSP, NONE, Cet, 1, V1_0 | V1_5 | V2_0),
        msr!(write IA32_PL3_SSP, NONE, Cet, 1, V1_0 | V1_5 | V2_0),
        msr!(read IA32_INT_SSP_TAB, NONE, Cet, 1, V1_0 | V1_5 | V2_0),
        msr!(write IA32_INT_SSP_TAB, NONE, Cet, 1, V1_0 | V1_5 | V2_0),
        msr!(read IA32_TSC_DEADLINE, VE, TscDeadline, 1, V1_5),
        msr!(write IA32_TSC_DEADLINE, VE, TscDeadline, 1, V1_5),
        // Serviced by the guest kernel under 2.0.
        msr!(read IA32_TSC_DEADLINE, NONE, -, 1, V2_0),
        msr!(write IA32_TSC_DEADLINE, NONE, -, 1, V2_0),
        msr!(read IA32_PKRS, NONE, Pks, 1, V1_0 | V1_5 | V2_0),
        msr!(write IA32_PKRS, NONE, Pks, 1, V1_0 | V1_5 | V2_0),
        // x2APIC window.
        msr!(read RESERVED_XAPIC_0X0800, GP, -, 2, V1_0 | V1_5 | V2_0),
        msr!(write RESERVED_XAPIC_0X0800, GP, -, 2, V1_0 | V1_5 | V2_0),
        msr!(read IA32_X2APIC_APICID, NONE, -, 1, V1_5 | V2_0),
        msr!(write IA32_X2APIC_APICID, VE, -, 1, V1_5 | V2_0),
        msr!(read IA32_X2APIC_VERSION, NONE, -, 1, V1_5 | V2_0),
        msr!(write IA32_X2APIC_VERSION, VE, -, 1, V1_5 | V2_0),
        msr!(read RESERVED_XAPIC_0X0804, GP, -, 4, V1_0 | V1_5 | V2_0),
        msr!(write RESERVED_XAPIC_0X0804, GP, -, 4, V1_0 | V1_5 | V2_0),
        msr!(read IA32_X2APIC_TPR, NONE, -, 1, V1_0 | V1_5 | V2_0),
        msr!(write IA32_X2APIC_TPR, NONE, -, 1, V1_0 | V1_5 | V2_0),
        msr!(read IA32_X2APIC_PPR, NONE, -, 1, V1_0 | V1_5 | V2_0),
        msr!(write IA32_X2APIC_PPR, NONE, -, 1, V1_0),
        msr!(write IA32_X2APIC_PPR, GP, -, 1, V1_5 | V2_0),
        msr!(read IA32_X2APIC_EOI, NONE, -, 1, V1_0 | V1_5 | V2_0),
        msr!(write IA32_X2APIC_EOI, NONE, -, 1, V1_0 | V1_5 | V2_0),
        msr!(read IA32_X2APIC_ISRX, NONE, -, 8, V1_0 | V1_5 | V2_0),
        msr!(write IA32_X2APIC_ISRX, NONE, -, 8, V1_0),
        msr!(write IA32_X2APIC_ISRX, GP, -, 8, V1_5 | V2_0),
        msr!(read IA32_X2APIC_TMRX, NONE, -, 8, V1_0 | V1_5 | V2_0),
        msr!(write IA32_X2APIC_TMRX, NONE, -, 8, V1_0),
        msr!(write IA32_X2APIC_TMRX, GP, -, 8, V1_5 | V2_0),
        msr!(read IA32_X2APIC_IRRX, NONE, -, 8, V1_0 | V1_5 | V2_0),
        msr!(write IA32_X2APIC_IRRX, NONE, -, 8, V1_0),
        msr!(write IA32_X2APIC_IRRX, GP, -, 8, V1_5 | V2_0),
        msr!(read RESERVED_XAPIC_0X0829, GP, -, 6, V1_0 | V1_5 | V2_0),
        msr!(write RESERVED_XAPIC_0X0829, GP, -, 6, V1_0 | V1_5 | V2_0),
        msr!(read RESERVED_XAPIC_0X0831, GP, -, 1, V1_0 | V1_5 | V2_0),
        msr!(write RESERVED_XAPIC_0X0831, GP, -, 1, V1_0 | V1_5 | V2_0),
        msr!(read IA32_X2APIC_SELF_IPI, NONE, -, 1, V1_0 | V1_5 | V2_0),
        msr!(read RESERVED_XAPIC_0X0840, GP, -, 0x40, V1_0 | V1_5 | V2_0),
        msr!(write RESERVED_XAPIC_0X0840, GP, -, 0x40, V1_0 | V1_5 | V2_0),
        msr!(read RESERVED_XAPIC_0X0880, GP, -, 0x40, V1_0 | V1_5 | V2_0),
        msr!(write RESERVED_XAPIC_0X0880, GP, -, 0x40, V1_0 | V1_5 | V2_0),
        msr!(read RESERVED_XAPIC_0X08C0, GP, -, 0x40, V1_0 | V1_5 | V2_0),
        msr!(write RESERVED_XAPIC_0X08C0, GP, -, 0x40, V1_0 | V1_5 | V2_0),
        msr!(read IA32_TME_CAPABILITIES, VE, Tme, 1, V1_0 | V1_5 | V2_0),
        msr!(write IA32_TME_CAPABILITIES, VE, Tme, 1, V1_0 | V1_5 | V2_0),
        msr!(read IA32_TME_ACTIVATE, VE, Tme, 1, V1_0 | V1_5 | V2_0),
        msr!(write IA32_TME_ACTIVATE, VE, Tme, 1, V1_0 | V1_5 | V2_0),
        msr!(read IA32_TME_EXCLUDE_MASK, VE, Tme, 1, V1_0 | V1_5 | V2_0),
        msr!(write IA32_TME_EXCLUDE_MASK, VE, Tme, 1, V1_0 | V1_5 | V2_0),
        msr!(read IA32_TME_EXCLUDE_BASE, VE, Tme, 1, V1_0 | V1_5 | V2_0),
        msr!(write IA32_TME_EXCLUDE_BASE, VE, Tme, 1, V1_0 | V1_5 | V2_0),
        msr!(read IA32_UINT_RR, NONE, Uli, 1, V1_0 | V1_5 | V2_0),
        msr!(write IA32_UINT_RR, NONE, Uli, 1, V1_0 | V1_5 | V2_0),
        msr!(read IA32_UINT_HANDLER, NONE, Uli, 1, V1_0 | V1_5 | V2_0),
        msr!(write IA32_UINT_HANDLER, NONE, Uli, 1, V1_0 | V1_5 | V2_0),
        msr!(read IA32_UINT_STACKADJUST, NONE, Uli, 1, V1_0 | V1_5 | V2_0),
        msr!(write IA32_UINT_STACKADJUST, NONE, Uli, 1, V1_0 | V1_5 | V2_0),
        msr!(read IA32_UINT_MISC, NONE, Uli, 1, V1_0 | V1_5 | V2_0),
        msr!(write IA32_UINT_MISC, NONE, Uli, 1, V1_0 | V1_5 | V2_0),
        msr!(read IA32_UINT_PD, NONE, Uli, 1, V1_0 | V1_5 | V2_0),
        msr!(write IA32_UINT_PD, NONE, Uli, 1, V1_0 | V1_5 | V2_0),
        msr!(read IA32_UINT_TT, NONE, Uli, 1, V1_0 | V1_5 | V2_0),
        msr!(write IA32_UINT_TT, NONE, Uli, 1, V1_0 | V1_5 | V2_0),
        msr!(read IA32_DEBUG_INTERFACE, NONE, -, 1, V1_0 | V1_5 | V2_0),
        msr!(write IA32_DEBUG_INTERFACE, VE, -, 1, V1_0 | V1_5 | V2_0),
        msr!(read IA32_BNDCFGS, GP, -, 1, V1_0 | V1_5 | V2_0),
        msr!(write IA32_BNDCFGS, GP, -, 1, V1_0 | V1_5 | V2_0),
        msr!(read IA32_PASID, GP, -, 1, V1_0 | V1_5 | V2_0),
        msr!(write IA32_PASID, GP, -, 1, V1_0 | V1_5 | V2_0),
        msr!(read IA32_XSS, NONE, -, 1, V1_0 | V1_5 | V2_0),
        msr!(read ARCH_LBR_INFO_0, NONE, ArchLbr, 0x100, V1_0 | V1_5 | V2_0),
        msr!(write ARCH_LBR_INFO_0, NONE, ArchLbr, 0x100, V1_0 | V1_5 | V2_0),
        msr!(read ARCH_LBR_CTL, NONE, ArchLbr, 1, V1_0 | V1_5 | V2_0),
        msr!(write ARCH_LBR_CTL, NONE, ArchLbr, 1, V1_0 | V1_5 | V2_0),
        msr!(read ARCH_LBR_DEPTH, NONE, ArchLbr, 1, V1_0 | V1_5 | V2_0),
        msr!(write ARCH_LBR_DEPTH, NONE, ArchLbr, 1, V1_0 | V1_5 | V2_0),
        msr!(read ARCH_LBR_FROM_0, NONE, ArchLbr, 0x100, V1_0 | V1_5 | V2_0),
        msr!(write ARCH_LBR_FROM_0, NONE, ArchLbr, 0x100, V1_0 | V1_5 | V2_0),
        msr!(read ARCH_LBR_TO_0, NONE, ArchLbr, 0x100, V1_0 | V1_5 | V2_0),
        msr!(write ARCH_LBR_TO_0, NONE, ArchLbr, 0x100, V1_0 | V1_5 | V2_0),
        msr!(read IA32_UARCH_MISC_CTL, NONE, -, 1, V1_5),
        msr!(write IA32_UARCH_MISC_CTL, NONE, -, 1, V1_5),
        // Read-only from here on: writing any of these kills the TD.
        msr!(read EFER, NONE, -, 1, V1_0 | V1_5 | V2_0),
        msr!(read STAR, NONE, -, 1, V1_0 | V1_5 | V2_0),
        msr!(read LSTAR, NONE, -, 1, V1_0 | V1_5 | V2_0),
        msr!(read CSTAR, VE, -, 1, V1_5 | V2_0),
        msr!(read SYSCALL_MASK, NONE, -, 1, V1_0 | V1_5 | V2_0),
        msr!(read FS_BASE, NONE, -, 1, V1_0 | V1_5 | V2_0),
        msr!(read GS_BASE, NONE, -, 1, V1_0 | V1_5 | V2_0),
        msr!(read KERNEL_GS_BASE, NONE, -, 1, V1_0 | V1_5 | V2_0),
        msr!(read TSC_AUX, NONE, -, 1, V1_0 | V1_5 | V2_0),
    ]
}

#[cfg(test)]
mod tests {
    use super::builtin_cases;
    use crate::msr::index::{IA32_X2APIC_IRRX, IA32_X2APIC_SELF_IPI};
    use crate::{Access, Outcome, Registry, VersionTag};

    #[test]
    fn builtin_table_passes_validation() {
        let registry = Registry::builtin().expect("built-in table is consistent");
        assert_eq!(registry.len(), builtin_cases().len());
    }

    #[test]
    fn names_carry_msr_and_direction() {
        let registry = Registry::builtin().expect("valid");
        let tsc = registry.find("IA32_TSC_read").expect("present");
        assert_eq!(tsc.msr, 0x10);
        assert_eq!(tsc.access, Access::Read);
        assert!(registry.find("IA32_TSC_write").is_some());
    }

    #[test]
    fn irr_block_write_faults_from_1_5() {
        let registry = Registry::builtin().expect("valid");
        let irr = registry
            .iter()
            .find(|c| {
                c.msr == IA32_X2APIC_IRRX
                    && c.access == Access::Write
                    && c.applies_to(VersionTag::V1_5)
            })
            .expect("IRR write case");
        assert_eq!(irr.width, 8);
        assert_eq!(irr.baseline, Outcome::GeneralProtection);
    }

    #[test]
    fn self_ipi_is_only_read() {
        let registry = Registry::builtin().expect("valid");
        assert!(registry.find("IA32_X2APIC_SELF_IPI_read").is_some());
        assert!(registry
            .iter()
            .all(|c| !(c.msr == IA32_X2APIC_SELF_IPI && c.access == Access::Write)));
    }

    #[test]
    fn every_version_has_cases() {
        let registry = Registry::builtin().expect("valid");
        for version in VersionTag::ALL {
            assert!(registry.iter().any(|c| c.applies_to(version)), "{version}");
        }
    }
}
