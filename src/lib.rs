//! Stable machine fingerprints built from hardware and OS identifiers.
//!
//! ```no_run
//! let id = machine_fingerprint::generate(Some("my-app")).expect("no identifiers available");
//! assert_eq!(id.len(), 64);
//! ```
pub mod command;
pub mod config;
pub mod error;
pub mod fingerprint;
pub mod probes;

pub use command::{CommandRunner, SystemCommandRunner};
pub use config::FingerprintConfig;
pub use error::{FingerprintError, Result};
pub use fingerprint::{generate, Fingerprinter, ProbePlan, ProbeReport};
pub use probes::{Platform, PlatformProbes, ProbeKind};
