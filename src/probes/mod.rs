/// Platform probes for machine identifiers
///
/// Each OS family gets one [`PlatformProbes`] strategy, chosen once by
/// [`select_probes`]. Probes never fail loudly: anything that goes wrong is
/// reported as `None`.
use serde::Serialize;
use std::fmt;

use crate::command::SystemCommandRunner;
use crate::config::FingerprintConfig;

pub mod darwin;
pub mod linux;
pub mod native;
pub mod unsupported;
pub mod windows;


pub use darwin::DarwinProbes;
pub use linux::LinuxProbes;
pub use unsupported::UnsupportedProbes;
pub use windows::WindowsProbes;

/// Separator for aggregated probes (MAC addresses, disk serials)
pub const AGGREGATE_SEPARATOR: &str = ",";

/// Separator for composite probes (OS info, BIOS info)
pub const COMPOSITE_SEPARATOR: &str = "-";

/// Operating system family a probe strategy targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Darwin,
    Linux,
    Windows,
    Unsupported,
}

impl Platform {
    /// Family of the platform this binary was built for
    pub fn current() -> Self {
        if cfg!(target_os = "macos") {
            Platform::Darwin
        } else if cfg!(target_os = "linux") {
            Platform::Linux
        } else if cfg!(target_os = "windows") {
            Platform::Windows
        } else {
            Platform::Unsupported
        }
    }

    /// Fixed token used as the first half of the OS info probe
    pub fn token(&self) -> &'static str {
        match self {
            Platform::Darwin => "darwin",
            Platform::Linux => "linux",
            Platform::Windows => "windows",
            Platform::Unsupported => "unsupported",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// One identifier category, in the order it contributes to the fingerprint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbeKind {
    Hostname,
    MacAddresses,
    CpuInfo,
    CpuCores,
    Memory,
    OsInfo,
    SerialNumber,
    HardwareUuid,
    BaseboardSerial,
    DiskUuid,
    SystemModel,
    GpuInfo,
    BiosInfo,
    DiskSerials,
}

impl ProbeKind {
    /// Declaration order. Changing it changes every fingerprint.
    pub const ALL: [ProbeKind; 14] = [
        ProbeKind::Hostname,
        ProbeKind::MacAddresses,
        ProbeKind::CpuInfo,
        ProbeKind::CpuCores,
        ProbeKind::Memory,
        ProbeKind::OsInfo,
        ProbeKind::SerialNumber,
        ProbeKind::HardwareUuid,
        ProbeKind::BaseboardSerial,
        ProbeKind::DiskUuid,
        ProbeKind::SystemModel,
        ProbeKind::GpuInfo,
        ProbeKind::BiosInfo,
        ProbeKind::DiskSerials,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ProbeKind::Hostname => "hostname",
            ProbeKind::MacAddresses => "mac_addresses",
            ProbeKind::CpuInfo => "cpu_info",
            ProbeKind::CpuCores => "cpu_cores",
            ProbeKind::Memory => "memory",
            ProbeKind::OsInfo => "os_info",
            ProbeKind::SerialNumber => "serial_number",
            ProbeKind::HardwareUuid => "hardware_uuid",
            ProbeKind::BaseboardSerial => "baseboard_serial",
            ProbeKind::DiskUuid => "disk_uuid",
            ProbeKind::SystemModel => "system_model",
            ProbeKind::GpuInfo => "gpu_info",
            ProbeKind::BiosInfo => "bios_info",
            ProbeKind::DiskSerials => "disk_serials",
        }
    }

    /// Whether the probe merges several discovered values into one
    pub fn is_aggregated(&self) -> bool {
        matches!(self, ProbeKind::MacAddresses | ProbeKind::DiskSerials)
    }

    /// Run this probe against a platform strategy.
    pub fn collect(&self, probes: &dyn PlatformProbes) -> Option<String> {
        let value = match self {
            ProbeKind::Hostname => probes.hostname(),
            ProbeKind::MacAddresses => probes.mac_addresses(),
            ProbeKind::CpuInfo => probes.cpu_info(),
            ProbeKind::CpuCores => probes.cpu_cores(),
            ProbeKind::Memory => probes.memory(),
            ProbeKind::OsInfo => probes.os_info(),
            ProbeKind::SerialNumber => probes.serial_number(),
            ProbeKind::HardwareUuid => probes.hardware_uuid(),
            ProbeKind::BaseboardSerial => probes.baseboard_serial(),
            ProbeKind::DiskUuid => probes.disk_uuid(),
            ProbeKind::SystemModel => probes.system_model(),
            ProbeKind::GpuInfo => probes.gpu_info(),
            ProbeKind::BiosInfo => probes.bios_info(),
            ProbeKind::DiskSerials => probes.disk_serials(),
        };
        value.filter(|v| !v.trim().is_empty())
    }
}

impl fmt::Display for ProbeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Per-OS-family source for every identifier category.
///
/// Implementations must swallow their own failures and return `None`.
pub trait PlatformProbes {
    fn platform(&self) -> Platform;

    fn hostname(&self) -> Option<String>;
    /// All MAC addresses, sorted and comma-joined
    fn mac_addresses(&self) -> Option<String>;
    fn cpu_info(&self) -> Option<String>;
    fn cpu_cores(&self) -> Option<String>;
    /// Total RAM in bytes
    fn memory(&self) -> Option<String>;
    /// Platform token plus kernel version, hyphen-joined
    fn os_info(&self) -> Option<String>;
    fn serial_number(&self) -> Option<String>;
    fn hardware_uuid(&self) -> Option<String>;
    fn baseboard_serial(&self) -> Option<String>;
    /// UUID of the root (system) volume
    fn disk_uuid(&self) -> Option<String>;
    fn system_model(&self) -> Option<String>;
    fn gpu_info(&self) -> Option<String>;
    /// Firmware vendor and version, hyphen-joined
    fn bios_info(&self) -> Option<String>;
    /// All physical disk serials, sorted and comma-joined
    fn disk_serials(&self) -> Option<String>;
}

/// Build the probe strategy for `platform`.
pub fn select_probes(platform: Platform, config: &FingerprintConfig) -> Box<dyn PlatformProbes> {
    let runner = SystemCommandRunner::new(config.command_timeout);
    match platform {
        Platform::Darwin => Box::new(DarwinProbes::new(runner)),
        Platform::Linux => Box::new(LinuxProbes::new(runner, config.system_root.clone())),
        Platform::Windows => Box::new(WindowsProbes::new(runner)),
        Platform::Unsupported => Box::new(UnsupportedProbes),
    }
}

/// Trim a raw value, treating whitespace-only text as absent.
pub fn non_empty(value: impl AsRef<str>) -> Option<String> {
    let trimmed = value.as_ref().trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Merge discovered values: drop blanks, sort, comma-join.
///
/// Sorting makes the result independent of device enumeration order.
pub fn aggregate<I, S>(values: I) -> Option<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut collected: Vec<String> = values.into_iter().filter_map(non_empty).collect();
    if collected.is_empty() {
        return None;
    }
    collected.sort();
    Some(collected.join(AGGREGATE_SEPARATOR))
}

/// Hyphen-join sub-parts, only when every part is present.
pub fn compose_parts(parts: &[Option<String>]) -> Option<String> {
    let mut present = Vec::with_capacity(parts.len());
    for part in parts {
        present.push(non_empty(part.as_deref()?)?);
    }
    if present.is_empty() {
        return None;
    }
    Some(present.join(COMPOSITE_SEPARATOR))
}

/// OS info always carries the platform token; the kernel version is optional.
pub fn os_info(platform: Platform, kernel_version: Option<String>) -> String {
    match kernel_version.and_then(non_empty) {
        Some(version) => format!("{}{}{}", platform.token(), COMPOSITE_SEPARATOR, version),
        None => platform.token().to_string(),
    }
}

/// Value following `key` and `separator` on the first line that contains both.
///
/// Surrounding quotes are stripped, so this handles `key: value` listings as
/// well as `"key" = "value"` registry dumps.
pub(crate) fn find_value(text: &str, key: &str, separator: &str) -> Option<String> {
    text.lines()
        .filter_map(|line| {
            let (left, right) = line.split_once(separator)?;
            if left.trim().trim_matches('"') == key {
                non_empty(right.trim().trim_matches('"'))
            } else {
                None
            }
        })
        .next()
}

/// Every value following `key` and `separator`, in output order.
pub(crate) fn find_values(text: &str, key: &str, separator: &str) -> Vec<String> {
    text.lines()
        .filter_map(|line| {
            let (left, right) = line.split_once(separator)?;
            if left.trim().trim_matches('"') == key {
                non_empty(right.trim().trim_matches('"'))
            } else {
                None
            }
        })
        .collect()
}
