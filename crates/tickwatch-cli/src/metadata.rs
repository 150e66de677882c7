use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use tickwatch_core::{EnvelopeMeta, ProviderId, ValidationError};
use uuid::Uuid;

/// Request identifier (UUID v4) stamped on every envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(Uuid);

impl RequestId {
    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Display for RequestId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

/// Command metadata accumulated while a command runs, converted into
/// envelope metadata at the end.
#[derive(Debug, Clone)]
pub struct Metadata {
    pub request_id: RequestId,
    pub provider: Option<ProviderId>,
    pub latency_ms: u64,
    pub warnings: Vec<String>,
}

impl Metadata {
    pub fn new(provider: Option<ProviderId>, latency_ms: u64) -> Self {
        Self {
            request_id: RequestId::new_v4(),
            provider,
            latency_ms,
            warnings: Vec::new(),
        }
    }

    pub fn push_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    pub fn into_envelope_meta(self) -> Result<EnvelopeMeta, ValidationError> {
        let mut meta =
            EnvelopeMeta::new(self.request_id.to_string())?.with_latency_ms(self.latency_ms);
        if let Some(provider) = self.provider {
            meta = meta.with_provider(provider);
        }

        for warning in self.warnings {
            meta.push_warning(warning);
        }

        Ok(meta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_id_is_uuid_v4() {
        let request_id = RequestId::new_v4();
        assert_eq!(request_id.0.get_version_num(), 4);
    }

    #[test]
    fn metadata_converts_into_envelope_meta() {
        let mut metadata = Metadata::new(Some(ProviderId::Yahoo), 42);
        metadata.push_warning("first");
        metadata.push_warning("second");

        let meta = metadata.into_envelope_meta().expect("meta");
        assert_eq!(meta.provider, Some(ProviderId::Yahoo));
        assert_eq!(meta.latency_ms, 42);
        assert_eq!(meta.warnings, vec!["first", "second"]);
        assert!(!meta.request_id.is_empty());
    }
}
