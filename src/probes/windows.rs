//! Windows strategy: OS APIs for network/CPU/memory/kernel, CIM queries for hardware IDs.
use super::{aggregate, compose_parts, native, non_empty, os_info, Platform, PlatformProbes};
use crate::command::CommandRunner;

pub struct WindowsProbes<R> {
    runner: R,
}

impl<R: CommandRunner> WindowsProbes<R> {
    pub fn new(runner: R) -> Self {
        Self { runner }
    }

    fn powershell(&self, script: &str) -> Option<String> {
        self.runner
            .run("powershell", &["-NoProfile", "-NonInteractive", "-Command", script])
    }

    /// One property across all instances of a CIM class, one line per instance.
    fn cim_property(&self, class: &str, property: &str) -> Option<String> {
        self.powershell(&format!(
            "(Get-CimInstance -ClassName {}).{}",
            class, property
        ))
    }

    /// First non-blank instance value of a CIM property.
    fn cim_first(&self, class: &str, property: &str) -> Option<String> {
        self.cim_property(class, property)?
            .lines()
            .find_map(non_empty)
    }
}

impl<R: CommandRunner> PlatformProbes for WindowsProbes<R> {
    fn platform(&self) -> Platform {
        Platform::Windows
    }

    fn hostname(&self) -> Option<String> {
        native::host_name()
    }

    fn mac_addresses(&self) -> Option<String> {
        native::mac_addresses()
    }

    fn cpu_info(&self) -> Option<String> {
        native::cpu_brand()
    }

    fn cpu_cores(&self) -> Option<String> {
        native::cpu_count()
    }

    fn memory(&self) -> Option<String> {
        native::total_memory()
    }

    fn os_info(&self) -> Option<String> {
        Some(os_info(Platform::Windows, native::kernel_version()))
    }

    fn serial_number(&self) -> Option<String> {
        self.cim_first("Win32_BIOS", "SerialNumber")
    }

    fn hardware_uuid(&self) -> Option<String> {
        self.cim_first("Win32_ComputerSystemProduct", "UUID")
    }

    fn baseboard_serial(&self) -> Option<String> {
        self.cim_first("Win32_BaseBoard", "SerialNumber")
    }

    fn disk_uuid(&self) -> Option<String> {
        self.powershell(
            "(Get-CimInstance -ClassName Win32_LogicalDisk -Filter \"DeviceID='$env:SystemDrive'\").VolumeSerialNumber",
        )
    }

    fn system_model(&self) -> Option<String> {
        self.cim_first("Win32_ComputerSystem", "Model")
    }

    fn gpu_info(&self) -> Option<String> {
        let output = self.cim_property("Win32_VideoController", "Name")?;
        let names: Vec<String> = output.lines().filter_map(non_empty).collect();
        non_empty(names.join(", "))
    }

    fn bios_info(&self) -> Option<String> {
        compose_parts(&[
            self.cim_first("Win32_BIOS", "Manufacturer"),
            self.cim_first("Win32_BIOS", "SMBIOSBIOSVersion"),
        ])
    }

    fn disk_serials(&self) -> Option<String> {
        let output = self.cim_property("Win32_DiskDrive", "SerialNumber")?;
        aggregate(output.lines())
    }
}
