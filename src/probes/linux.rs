//! Linux strategy: pseudo-filesystem reads plus a few util-linux/pciutils commands.
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::{aggregate, compose_parts, native, non_empty, os_info, Platform, PlatformProbes};
use crate::command::CommandRunner;

const GPU_CLASSES: [&str; 3] = [
    "VGA compatible controller",
    "3D controller",
    "Display controller",
];

pub struct LinuxProbes<R> {
    runner: R,
    root: PathBuf,
}

impl<R: CommandRunner> LinuxProbes<R> {
    /// `root` is normally `/`; tests point it at a fake tree.
    pub fn new(runner: R, root: impl Into<PathBuf>) -> Self {
        Self {
            runner,
            root: root.into(),
        }
    }

    fn path(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }

    fn read(&self, relative: &str) -> Option<String> {
        read_trimmed(&self.path(relative))
    }

    fn dmi(&self, field: &str) -> Option<String> {
        self.read(&format!("sys/class/dmi/id/{}", field))
    }
}

fn read_trimmed(path: &Path) -> Option<String> {
    match fs::read_to_string(path) {
        Ok(contents) => non_empty(contents),
        Err(error) => {
            debug!(path = %path.display(), %error, "unreadable identifier source");
            None
        }
    }
}

/// Descriptions of display-class devices from `lspci` output, in bus order.
pub(crate) fn parse_lspci_gpus(output: &str) -> Vec<String> {
    output
        .lines()
        .filter_map(|line| {
            let (_slot, rest) = line.split_once(' ')?;
            let (class, description) = rest.split_once(": ")?;
            if GPU_CLASSES.contains(&class.trim()) {
                non_empty(description)
            } else {
                None
            }
        })
        .collect()
}

/// `MemTotal` from `/proc/meminfo`, converted from kB to bytes.
pub(crate) fn parse_mem_total(meminfo: &str) -> Option<String> {
    let raw = super::find_value(meminfo, "MemTotal", ":")?;
    let kilobytes: u64 = raw.split_whitespace().next()?.parse().ok()?;
    kilobytes.checked_mul(1024).map(|bytes| bytes.to_string())
}

impl<R: CommandRunner> PlatformProbes for LinuxProbes<R> {
    fn platform(&self) -> Platform {
        Platform::Linux
    }

    fn hostname(&self) -> Option<String> {
        native::host_name()
    }

    fn mac_addresses(&self) -> Option<String> {
        native::mac_addresses()
    }

    fn cpu_info(&self) -> Option<String> {
        let cpuinfo = self.read("proc/cpuinfo")?;
        super::find_value(&cpuinfo, "model name", ":")
    }

    fn cpu_cores(&self) -> Option<String> {
        let cpuinfo = self.read("proc/cpuinfo")?;
        match super::find_values(&cpuinfo, "processor", ":").len() {
            0 => None,
            count => Some(count.to_string()),
        }
    }

    fn memory(&self) -> Option<String> {
        parse_mem_total(&self.read("proc/meminfo")?)
    }

    fn os_info(&self) -> Option<String> {
        Some(os_info(
            Platform::Linux,
            self.read("proc/sys/kernel/osrelease"),
        ))
    }

    fn serial_number(&self) -> Option<String> {
        self.dmi("product_serial")
    }

    fn hardware_uuid(&self) -> Option<String> {
        self.dmi("product_uuid")
    }

    fn baseboard_serial(&self) -> Option<String> {
        self.dmi("board_serial")
    }

    fn disk_uuid(&self) -> Option<String> {
        self.runner.run("findmnt", &["-n", "-o", "UUID", "/"])
    }

    fn system_model(&self) -> Option<String> {
        self.dmi("product_name")
    }

    fn gpu_info(&self) -> Option<String> {
        let output = self.runner.run("lspci", &[])?;
        non_empty(parse_lspci_gpus(&output).join(", "))
    }

    fn bios_info(&self) -> Option<String> {
        compose_parts(&[self.dmi("bios_vendor"), self.dmi("bios_version")])
    }

    fn disk_serials(&self) -> Option<String> {
        let output = self.runner.run("lsblk", &["-d", "-n", "-o", "SERIAL"])?;
        aggregate(output.lines())
    }
}
