//! Host backend over the Linux `msr` and `cpuid` character devices.
//!
//! `/dev/cpu/<n>/msr` maps MSR index to file offset: an 8-byte positioned read
//! is `RDMSR`, an 8-byte positioned write is `WRMSR`. The kernel turns a #GP
//! raised by the access into `EIO`. A #VE is handled inside the guest kernel
//! and therefore looks like a silent access from here.
//!
//! Write cases store zero. The backend cannot learn a register's current
//! value without a second privileged access.
//!
//! `/dev/cpu/<n>/cpuid` takes the leaf in the low and the sub-leaf in the high
//! 32 bits of the offset and returns EAX, EBX, ECX and EDX as 16 bytes.

use std::fs::{File, OpenOptions};
use std::io;
use std::os::unix::fs::FileExt;
use std::path::{Path, PathBuf};

use msr_engine::{AccessError, CpuidQuery, CpuidResult, CpuidSource, MsrBus, TrapKind};

use crate::error::CliError;

/// Root of the per-CPU device nodes.
pub const DEV_CPU_ROOT: &str = "/dev/cpu";

/// MSR and CPUID access to one logical CPU of the host.
#[derive(Debug)]
pub struct DevCpu {
    cpu: u32,
    msr: File,
    cpuid: Option<File>,
}

impl DevCpu {
    /// Opens the device nodes of `cpu` under `/dev/cpu`.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Device`] when the MSR node cannot be opened for
    /// reading and writing.
    pub fn open(cpu: u32) -> Result<Self, CliError> {
        Self::open_at(Path::new(DEV_CPU_ROOT), cpu)
    }

    /// Opens `<root>/<cpu>/msr` and, if present, `<root>/<cpu>/cpuid`.
    ///
    /// A missing CPUID node is tolerated; every query then reports zeros.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Device`] when the MSR node cannot be opened for
    /// reading and writing.
    pub fn open_at(root: &Path, cpu: u32) -> Result<Self, CliError> {
        let dir = root.join(cpu.to_string());
        let msr_path = dir.join("msr");
        let msr = OpenOptions::new()
            .read(true)
            .write(true)
            .open(&msr_path)
            .map_err(|source| CliError::Device {
                path: msr_path,
                source,
            })?;

        let cpuid_path: PathBuf = dir.join("cpuid");
        let cpuid = match File::open(&cpuid_path) {
            Ok(file) => Some(file),
            Err(err) => {
                log::warn!(
                    "{}: {err}; capability probes will report zeros",
                    cpuid_path.display()
                );
                None
            }
        };

        log::debug!("opened host backend for cpu {cpu}");
        Ok(Self { cpu, msr, cpuid })
    }

    /// Logical CPU this backend is bound to.
    #[must_use]
    pub const fn cpu(&self) -> u32 {
        self.cpu
    }
}

/// Maps a device error to the engine's access error taxonomy.
#[must_use]
pub fn classify(err: &io::Error) -> AccessError {
    if err.raw_os_error() == Some(libc::EIO) {
        AccessError::Trapped(TrapKind::GeneralProtection)
    } else {
        AccessError::Uncontained(err.to_string())
    }
}

impl MsrBus for DevCpu {
    fn read_msr(&mut self, msr: u32) -> Result<u64, AccessError> {
        let mut buf = [0u8; 8];
        self.msr
            .read_exact_at(&mut buf, u64::from(msr))
            .map_err(|err| classify(&err))?;
        Ok(u64::from_le_bytes(buf))
    }

    fn write_msr(&mut self, msr: u32, value: u64) -> Result<(), AccessError> {
        self.msr
            .write_all_at(&value.to_le_bytes(), u64::from(msr))
            .map_err(|err| classify(&err))
    }
}

impl CpuidSource for DevCpu {
    fn cpuid(&self, query: CpuidQuery) -> CpuidResult {
        let Some(file) = &self.cpuid else {
            return CpuidResult::default();
        };
        let offset = u64::from(query.leaf) | (u64::from(query.sub_leaf) << 32);
        let mut buf = [0u8; 16];
        if let Err(err) = file.read_exact_at(&mut buf, offset) {
            log::warn!(
                "cpu {}: cpuid({:#x}, {:#x}) failed: {err}",
                self.cpu,
                query.leaf,
                query.sub_leaf
            );
            return CpuidResult::default();
        }
        let word = |i: usize| u32::from_le_bytes([buf[i], buf[i + 1], buf[i + 2], buf[i + 3]]);
        CpuidResult {
            eax: word(0),
            ebx: word(4),
            ecx: word(8),
            edx: word(12),
        }
    }
}
