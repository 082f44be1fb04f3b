use thiserror::Error;

/// Result alias for fingerprint operations
pub type Result<T> = std::result::Result<T, FingerprintError>;

/// Errors surfaced by the fingerprint composer
///
/// Probe-level failures never show up here. They are absorbed at the probe
/// boundary and only become visible through [`FingerprintError::ComponentCollection`]
/// when nothing at all could be collected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FingerprintError {
    #[error("no machine identifiers could be collected on this platform ({platform})")]
    ComponentCollection { platform: String },
}

impl From<FingerprintError> for String {
    fn from(error: FingerprintError) -> Self {
        error.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_component_collection_message_names_platform() {
        let error = FingerprintError::ComponentCollection {
            platform: "unsupported".to_string(),
        };
        let message: String = error.into();
        assert!(message.contains("no machine identifiers"));
        assert!(message.contains("unsupported"));
    }
}
