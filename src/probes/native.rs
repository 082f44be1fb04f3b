//! Readings taken through OS APIs rather than external commands.
use sysinfo::{Networks, System};

use super::{aggregate, non_empty};

const LOOPBACK_INTERFACES: [&str; 2] = ["lo", "lo0"];

pub fn host_name() -> Option<String> {
    System::host_name().and_then(non_empty)
}

pub fn kernel_version() -> Option<String> {
    System::kernel_version().and_then(non_empty)
}

/// Brand string of the first logical CPU
pub fn cpu_brand() -> Option<String> {
    let mut system = System::new();
    system.refresh_cpu_all();
    system
        .cpus()
        .first()
        .and_then(|cpu| non_empty(cpu.brand()))
}

/// Number of logical CPUs
pub fn cpu_count() -> Option<String> {
    let mut system = System::new();
    system.refresh_cpu_all();
    match system.cpus().len() {
        0 => None,
        count => Some(count.to_string()),
    }
}

/// Total physical memory in bytes
pub fn total_memory() -> Option<String> {
    let mut system = System::new();
    system.refresh_memory();
    match system.total_memory() {
        0 => None,
        bytes => Some(bytes.to_string()),
    }
}

/// Hardware addresses of every interface, sorted and comma-joined
pub fn mac_addresses() -> Option<String> {
    let networks = Networks::new_with_refreshed_list();
    let interfaces = networks
        .iter()
        .map(|(name, data)| (name.as_str(), data.mac_address().0));
    aggregate(usable_macs(interfaces))
}

/// Colon-separated lowercase addresses, skipping loopback and all-zero ones.
pub(crate) fn usable_macs<'a, I>(interfaces: I) -> Vec<String>
where
    I: IntoIterator<Item = (&'a str, [u8; 6])>,
{
    interfaces
        .into_iter()
        .filter(|(name, bytes)| {
            !LOOPBACK_INTERFACES.contains(name) && bytes.iter().any(|b| *b != 0)
        })
        .map(|(_, bytes)| {
            bytes
                .iter()
                .map(|b| format!("{:02x}", b))
                .collect::<Vec<_>>()
                .join(":")
        })
        .collect()
}
