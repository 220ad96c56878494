//! Names follow the Intel SDM and the Linux `msr-index.h` spellings without
//! the `MSR_` prefix, so case names line up with kernel-side tooling.

#![allow(missing_docs)]

// Core and platform

pub const IA32_TSC: u32 = 0x0010;
pub const IA32_PLATFORM_ID: u32 = 0x0017;
pub const IA32_APICBASE: u32 = 0x001b;
pub const TEST_CTRL: u32 = 0x0033;
pub const IA32_TSC_ADJUST: u32 = 0x003b;
pub const IA32_SPEC_CTRL: u32 = 0x0048;
pub const IA32_PRED_CMD: u32 = 0x0049;
pub const IA32_MKTME_PARTITIONING: u32 = 0x0087;
pub const IA32_SGXLEPUBKEYHASH0: u32 = 0x008c;
pub const WBINVDP: u32 = 0x0098;
pub const WBNOINVDP: u32 = 0x0099;
pub const INTR_PENDING: u32 = 0x009a;
pub const IA32_SMM_MONITOR_CTL: u32 = 0x009b;
pub const IA32_SMBASE: u32 = 0x009e;
pub const IA32_MISC_PACKAGE_CTLS: u32 = 0x00bc;
pub const IA32_PERFCTR0: u32 = 0x00c1;
pub const IA32_UMWAIT_CONTROL: u32 = 0x00e1;
pub const IA32_ARCH_CAPABILITIES: u32 = 0x010a;
pub const IA32_FLUSH_CMD: u32 = 0x010b;
pub const IA32_TSX_CTRL: u32 = 0x0122;
pub const IA32_SYSENTER_CS: u32 = 0x0174;
pub const IA32_SYSENTER_ESP: u32 = 0x0175;
pub const IA32_SYSENTER_EIP: u32 = 0x0176;
pub const P6_EVNTSEL0: u32 = 0x0186;
pub const IA32_MISC_ENABLE: u32 = 0x01a0;
pub const OFFCORE_RSP_0: u32 = 0x01a6;
pub const IA32_XFD: u32 = 0x01c4;
pub const IA32_XFD_ERR: u32 = 0x01c5;
pub const IA32_PLATFORM_DCA_CAP: u32 = 0x01f8;
pub const IA32_CPU_DCA_CAP: u32 = 0x01f9;
pub const IA32_DCA_0_CAP: u32 = 0x01fa;
pub const SLAM_ENABLE: u32 = 0x0276;
pub const IA32_CR_PAT: u32 = 0x0277;

// Performance monitoring

pub const CORE_PERF_FIXED_CTR0: u32 = 0x0309;
pub const PERF_METRICS: u32 = 0x0329;
pub const IA32_PERF_CAPABILITIES: u32 = 0x0345;
pub const CORE_PERF_FIXED_CTR_CTRL: u32 = 0x038d;
pub const CORE_PERF_GLOBAL_STATUS: u32 = 0x038e;
pub const CORE_PERF_GLOBAL_CTRL: u32 = 0x038f;
pub const CORE_PERF_GLOBAL_OVF_CTRL: u32 = 0x0390;
pub const IA32_PERF_GLOBAL_STATUS_SET: u32 = 0x0391;
pub const IA32_PERF_GLOBAL_INUSE: u32 = 0x0392;
pub const IA32_PEBS_ENABLE: u32 = 0x03f1;
pub const PEBS_DATA_CFG: u32 = 0x03f2;
pub const PEBS_LD_LAT_THRESHOLD: u32 = 0x03f6;
pub const PEBS_FRONTEND: u32 = 0x03f7;
pub const IA32_PMC0: u32 = 0x04c1;

// VMX capability reporting

pub const IA32_VMX_BASIC: u32 = 0x0480;
pub const IA32_VMX_PINBASED_CTLS: u32 = 0x0481;
pub const IA32_VMX_PROCBASED_CTLS: u32 = 0x0482;
pub const IA32_VMX_EXIT_CTLS: u32 = 0x0483;
pub const IA32_VMX_ENTRY_CTLS: u32 = 0x0484;
pub const IA32_VMX_MISC: u32 = 0x0485;
pub const IA32_VMX_CR0_FIXED0: u32 = 0x0486;
pub const IA32_VMX_CR0_FIXED1: u32 = 0x0487;
pub const IA32_VMX_CR4_FIXED0: u32 = 0x0488;
pub const IA32_VMX_CR4_FIXED1: u32 = 0x0489;
pub const IA32_VMX_VMCS_ENUM: u32 = 0x048a;
pub const IA32_VMX_PROCBASED_CTLS2: u32 = 0x048b;
pub const IA32_VMX_EPT_VPID_CAP: u32 = 0x048c;
pub const IA32_VMX_TRUE_PINBASED_CTLS: u32 = 0x048d;
pub const IA32_VMX_TRUE_PROCBASED_CTLS: u32 = 0x048e;
pub const IA32_VMX_TRUE_EXIT_CTLS: u32 = 0x048f;
pub const IA32_VMX_TRUE_ENTRY_CTLS: u32 = 0x0490;
pub const IA32_VMX_VMFUNC: u32 = 0x0491;
pub const IA32_VMX_PROCBASED_CTLS3: u32 = 0x0492;

// SGX, trace and CET

pub const IA32_SGX_SVN_STATUS: u32 = 0x0500;
pub const IA32_SE_SVN_EXPAN: u32 = 0x0501;
pub const IA32_RTIT_OUTPUT_BASE: u32 = 0x0560;
pub const IA32_RTIT_OUTPUT_MASK: u32 = 0x0561;
pub const IA32_RTIT_CTL: u32 = 0x0570;
pub const IA32_RTIT_STATUS: u32 = 0x0571;
pub const IA32_RTIT_CR3_MATCH: u32 = 0x0572;
pub const IA32_RTIT_ADDR0_A: u32 = 0x0580;
pub const IA32_RTIT_ADDR0_B: u32 = 0x0581;
pub const IA32_RTIT_ADDR1_A: u32 = 0x0582;
pub const IA32_RTIT_ADDR1_B: u32 = 0x0583;
pub const IA32_RTIT_ADDR2_A: u32 = 0x0584;
pub const IA32_RTIT_ADDR2_B: u32 = 0x0585;
pub const IA32_RTIT_ADDR3_A: u32 = 0x0586;
pub const IA32_RTIT_ADDR3_B: u32 = 0x0587;
pub const IA32_DS_AREA: u32 = 0x0600;
pub const IA32_U_CET: u32 = 0x06a0;
pub const IA32_S_CET: u32 = 0x06a2;
pub const IA32_PL0_SSP: u32 = 0x06a4;
pub const IA32_PL1_SSP: u32 = 0x06a5;
pub const IA32_PL2_SSP: u32 = 0x06a6;
pub const IA32_PL3_SSP: u32 = 0x06a7;
pub const IA32_INT_SSP_TAB: u32 = 0x06a8;
pub const IA32_TSC_DEADLINE: u32 = 0x06e0;
pub const IA32_PKRS: u32 = 0x06e1;

// x2APIC window

pub const RESERVED_XAPIC_0X0800: u32 = 0x0800;
pub const IA32_X2APIC_APICID: u32 = 0x0802;
pub const IA32_X2APIC_VERSION: u32 = 0x0803;
pub const RESERVED_XAPIC_0X0804: u32 = 0x0804;
pub const IA32_X2APIC_TPR: u32 = 0x0808;
pub const IA32_X2APIC_PPR: u32 = 0x080a;
pub const IA32_X2APIC_EOI: u32 = 0x080b;
pub const IA32_X2APIC_ISRX: u32 = 0x0810;
pub const IA32_X2APIC_TMRX: u32 = 0x0818;
pub const IA32_X2APIC_IRRX: u32 = 0x0820;
pub const RESERVED_XAPIC_0X0829: u32 = 0x0829;
pub const RESERVED_XAPIC_0X0831: u32 = 0x0831;
pub const IA32_X2APIC_SELF_IPI: u32 = 0x083f;
pub const RESERVED_XAPIC_0X0840: u32 = 0x0840;
pub const RESERVED_XAPIC_0X0880: u32 = 0x0880;
pub const RESERVED_XAPIC_0X08C0: u32 = 0x08c0;

// TME, user interrupts and miscellany

pub const IA32_TME_CAPABILITIES: u32 = 0x0981;
pub const IA32_TME_ACTIVATE: u32 = 0x0982;
pub const IA32_TME_EXCLUDE_MASK: u32 = 0x0983;
pub const IA32_TME_EXCLUDE_BASE: u32 = 0x0984;
pub const IA32_UINT_RR: u32 = 0x0985;
pub const IA32_UINT_HANDLER: u32 = 0x0986;
pub const IA32_UINT_STACKADJUST: u32 = 0x0987;
pub const IA32_UINT_MISC: u32 = 0x0988;
pub const IA32_UINT_PD: u32 = 0x0989;
pub const IA32_UINT_TT: u32 = 0x098a;
pub const IA32_DEBUG_INTERFACE: u32 = 0x0c80;
pub const IA32_BNDCFGS: u32 = 0x0d90;
pub const IA32_PASID: u32 = 0x0d93;
pub const IA32_XSS: u32 = 0x0da0;
pub const ARCH_LBR_INFO_0: u32 = 0x1200;
pub const ARCH_LBR_CTL: u32 = 0x14ce;
pub const ARCH_LBR_DEPTH: u32 = 0x14cf;
pub const ARCH_LBR_FROM_0: u32 = 0x1500;
pub const ARCH_LBR_TO_0: u32 = 0x1600;
pub const IA32_UARCH_MISC_CTL: u32 = 0x1b01;

// Syscall and segment base MSRs

pub const EFER: u32 = 0xc000_0080;
pub const STAR: u32 = 0xc000_0081;
pub const LSTAR: u32 = 0xc000_0082;
pub const CSTAR: u32 = 0xc000_0083;
pub const SYSCALL_MASK: u32 = 0xc000_0084;
pub const FS_BASE: u32 = 0xc000_0100;
pub const GS_BASE: u32 = 0xc000_0101;
pub const KERNEL_GS_BASE: u32 = 0xc000_0102;
pub const TSC_AUX: u32 = 0xc000_0103;

/// Bit of `IA32_ARCH_CAPABILITIES` reporting TSX control support.
pub const ARCH_CAP_TSX_CTRL_MSR_BIT: u8 = 7;

/// MSRs whose write kills the guest instead of raising a classifiable trap.
///
/// Write cases touching any of these are refused by the registry.
pub const DESTRUCTIVE_WRITE_MSRS: &[u32] = &[
    IA32_X2APIC_SELF_IPI,
    EFER,
    STAR,
    LSTAR,
    CSTAR,
    SYSCALL_MASK,
    FS_BASE,
    GS_BASE,
    KERNEL_GS_BASE,
    TSC_AUX,
];
