use super::{Platform, PlatformProbes};

/// Strategy for OS families without known identifier sources; every probe is absent.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnsupportedProbes;

impl PlatformProbes for UnsupportedProbes {
    fn platform(&self) -> Platform {
        Platform::Unsupported
    }

    fn hostname(&self) -> Option<String> {
        None
    }

    fn mac_addresses(&self) -> Option<String> {
        None
    }

    fn cpu_info(&self) -> Option<String> {
        None
    }

    fn cpu_cores(&self) -> Option<String> {
        None
    }

    fn memory(&self) -> Option<String> {
        None
    }

    fn os_info(&self) -> Option<String> {
        None
    }

    fn serial_number(&self) -> Option<String> {
        None
    }

    fn hardware_uuid(&self) -> Option<String> {
        None
    }

    fn baseboard_serial(&self) -> Option<String> {
        None
    }

    fn disk_uuid(&self) -> Option<String> {
        None
    }

    fn system_model(&self) -> Option<String> {
        None
    }

    fn gpu_info(&self) -> Option<String> {
        None
    }

    fn bios_info(&self) -> Option<String> {
        None
    }

    fn disk_serials(&self) -> Option<String> {
        None
    }
}
