//! macOS strategy built on `sysctl`, `ioreg`, `diskutil` and `system_profiler`.
use super::{
    aggregate, compose_parts, find_value, find_values, native, non_empty, os_info, Platform,
    PlatformProbes,
};
use crate::command::CommandRunner;

const FIRMWARE_VENDOR: &str = "Apple";
const FIRMWARE_KEYS: [&str; 2] = ["System Firmware Version", "Boot ROM Version"];

pub struct DarwinProbes<R> {
    runner: R,
}

impl<R: CommandRunner> DarwinProbes<R> {
    pub fn new(runner: R) -> Self {
        Self { runner }
    }

    fn sysctl(&self, key: &str) -> Option<String> {
        self.runner.run("sysctl", &["-n", key])
    }

    fn platform_expert(&self, key: &str) -> Option<String> {
        let output = self
            .runner
            .run("ioreg", &["-rd1", "-c", "IOPlatformExpertDevice"])?;
        find_value(&output, key, "=").and_then(strip_data_brackets)
    }

    fn profiler(&self, data_types: &[&str]) -> Option<String> {
        self.runner.run("system_profiler", data_types)
    }
}

/// `ioreg` renders data properties as `<"value">`.
fn strip_data_brackets(value: String) -> Option<String> {
    non_empty(
        value
            .trim_start_matches('<')
            .trim_end_matches('>')
            .trim_matches('"'),
    )
}

impl<R: CommandRunner> PlatformProbes for DarwinProbes<R> {
    fn platform(&self) -> Platform {
        Platform::Darwin
    }

    fn hostname(&self) -> Option<String> {
        native::host_name()
    }

    fn mac_addresses(&self) -> Option<String> {
        native::mac_addresses()
    }

    fn cpu_info(&self) -> Option<String> {
        self.sysctl("machdep.cpu.brand_string")
    }

    fn cpu_cores(&self) -> Option<String> {
        self.sysctl("hw.ncpu")
    }

    fn memory(&self) -> Option<String> {
        self.sysctl("hw.memsize")
    }

    fn os_info(&self) -> Option<String> {
        Some(os_info(Platform::Darwin, self.runner.run("uname", &["-r"])))
    }

    fn serial_number(&self) -> Option<String> {
        self.platform_expert("IOPlatformSerialNumber")
    }

    fn hardware_uuid(&self) -> Option<String> {
        self.platform_expert("IOPlatformUUID")
    }

    fn baseboard_serial(&self) -> Option<String> {
        self.platform_expert("board-id")
    }

    fn disk_uuid(&self) -> Option<String> {
        let output = self.runner.run("diskutil", &["info", "/"])?;
        find_value(&output, "Volume UUID", ":")
    }

    fn system_model(&self) -> Option<String> {
        self.sysctl("hw.model")
    }

    fn gpu_info(&self) -> Option<String> {
        let output = self.profiler(&["SPDisplaysDataType"])?;
        non_empty(find_values(&output, "Chipset Model", ":").join(", "))
    }

    fn bios_info(&self) -> Option<String> {
        let output = self.profiler(&["SPHardwareDataType"]);
        let version = output.and_then(|text| {
            FIRMWARE_KEYS
                .iter()
                .find_map(|key| find_value(&text, key, ":"))
        });
        compose_parts(&[Some(FIRMWARE_VENDOR.to_string()), version])
    }

    fn disk_serials(&self) -> Option<String> {
        let output = self.profiler(&["SPSerialATADataType", "SPNVMeDataType"])?;
        aggregate(find_values(&output, "Serial Number", ":"))
    }
}
