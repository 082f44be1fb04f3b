/// Fingerprint composition
///
/// Runs the probe plan in order, drops absent results, appends the optional
/// salt, joins with the plan delimiter and hashes the result with SHA-256.
use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::{debug, info};

use crate::config::FingerprintConfig;
use crate::error::{FingerprintError, Result};
use crate::probes::{select_probes, Platform, PlatformProbes, ProbeKind};

/// Field delimiter for the fingerprint input string
pub const DEFAULT_DELIMITER: char = ':';

/// Ordered probe descriptors plus the join delimiter.
///
/// Built once and handed to the [`Fingerprinter`]; the order determines the
/// fingerprint, so two plans with the same probes in a different order yield
/// different identifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbePlan {
    probes: Vec<ProbeKind>,
    delimiter: char,
}

impl Default for ProbePlan {
    fn default() -> Self {
        ProbePlan {
            probes: ProbeKind::ALL.to_vec(),
            delimiter: DEFAULT_DELIMITER,
        }
    }
}

impl ProbePlan {
    pub fn new(probes: Vec<ProbeKind>, delimiter: char) -> Self {
        Self { probes, delimiter }
    }

    pub fn probes(&self) -> &[ProbeKind] {
        &self.probes
    }

    pub fn delimiter(&self) -> char {
        self.delimiter
    }
}

/// Whether one probe contributed to the component list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProbeOutcome {
    pub probe: ProbeKind,
    pub collected: bool,
}

/// Per-probe success summary. Carries no identifier values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProbeReport {
    pub platform: Platform,
    pub outcomes: Vec<ProbeOutcome>,
    pub collected_count: usize,
}

pub struct Fingerprinter {
    plan: ProbePlan,
    probes: Box<dyn PlatformProbes>,
}

impl Fingerprinter {
    pub fn new(plan: ProbePlan, probes: Box<dyn PlatformProbes>) -> Self {
        Self { plan, probes }
    }

    /// Default plan with the strategy for the platform this binary targets.
    pub fn from_config(config: &FingerprintConfig) -> Self {
        let platform = Platform::current();
        debug!(%platform, "selecting probe strategy");
        Self::new(ProbePlan::default(), select_probes(platform, config))
    }

    pub fn platform(&self) -> Platform {
        self.probes.platform()
    }

    pub fn plan(&self) -> &ProbePlan {
        &self.plan
    }

    fn run_probes(&self) -> Vec<(ProbeKind, Option<String>)> {
        self.plan
            .probes()
            .iter()
            .map(|kind| {
                let value = kind.collect(self.probes.as_ref());
                debug!(probe = %kind, collected = value.is_some(), "probe finished");
                (*kind, value)
            })
            .collect()
    }

    /// Present, non-blank probe values in plan order.
    pub fn components(&self) -> Vec<String> {
        self.run_probes()
            .into_iter()
            .filter_map(|(_, value)| value)
            .collect()
    }

    /// Compute the fingerprint, optionally salted.
    ///
    /// A present but empty salt still adds a trailing empty field and so
    /// differs from `None`.
    pub fn generate(&self, salt: Option<&str>) -> Result<String> {
        let components = self.components();
        if components.is_empty() {
            return Err(FingerprintError::ComponentCollection {
                platform: self.platform().to_string(),
            });
        }

        info!(
            platform = %self.platform(),
            components = components.len(),
            salted = salt.is_some(),
            "fingerprint generated"
        );

        Ok(digest(&components, salt, self.plan.delimiter()))
    }

    /// Run every probe once and summarize which ones produced a value.
    pub fn report(&self) -> ProbeReport {
        let outcomes: Vec<ProbeOutcome> = self
            .run_probes()
            .into_iter()
            .map(|(probe, value)| ProbeOutcome {
                probe,
                collected: value.is_some(),
            })
            .collect();
        let collected_count = outcomes.iter().filter(|o| o.collected).count();

        ProbeReport {
            platform: self.platform(),
            outcomes,
            collected_count,
        }
    }
}

impl Default for Fingerprinter {
    fn default() -> Self {
        Self::from_config(&FingerprintConfig::from_env())
    }
}

/// Lowercase hex SHA-256 of the delimiter-joined components and salt.
pub fn digest(components: &[String], salt: Option<&str>, delimiter: char) -> String {
    let mut fields: Vec<&str> = components.iter().map(String::as_str).collect();
    if let Some(salt) = salt {
        fields.push(salt);
    }

    let separator = delimiter.to_string();
    let input = fields.join(separator.as_str());

    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Fingerprint of this machine using settings from the environment.
pub fn generate(salt: Option<&str>) -> Result<String> {
    Fingerprinter::default().generate(salt)
}
