//! Gate policy
//!
//! Pre-flight check run once per invocation, before any provisioning action.
//! Every verb except the configuration verbs needs both the API token and
//! the software artifact location to be set; both misses are reported in a
//! single error so the user fixes the configuration in one round trip.

use crate::ConfigRecord;
use clusterlab_core::Verb;
use thiserror::Error;

/// One missing configuration requirement.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateRequirement {
    #[error("API token is not set (run: clab update-config --token <TOKEN>)")]
    MissingToken,

    #[error("software artifact location is not set (run: clab update-config --location <PATH>)")]
    MissingLocation,
}

/// Refusal to run a verb against an incomplete configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateError {
    pub verb: Verb,
    pub missing: Vec<GateRequirement>,
}

impl std::fmt::Display for GateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "cannot run '{}', configuration is incomplete:", self.verb)?;
        for requirement in &self.missing {
            writeln!(f, "  - {}", requirement)?;
        }
        Ok(())
    }
}

impl std::error::Error for GateError {}

/// Check whether `verb` may run against the given configuration.
pub fn check_gate(verb: Verb, record: &ConfigRecord) -> Result<(), GateError> {
    if verb.is_config_verb() {
        return Ok(());
    }

    let mut missing = Vec::new();
    if record.api_token().is_none() {
        missing.push(GateRequirement::MissingToken);
    }
    if record.location().is_none() {
        missing.push(GateRequirement::MissingLocation);
    }

    if missing.is_empty() {
        Ok(())
    } else {
        Err(GateError { verb, missing })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ConfigStore, KEY_API_TOKEN, KEY_LOCATION};
    use serde_json::json;

    fn record_with(token: Option<&str>, location: Option<&str>) -> ConfigRecord {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigStore::at(dir.path().join("config.json"));
        if let Some(t) = token {
            store.set_field(KEY_API_TOKEN, json!(t)).unwrap();
        }
        if let Some(l) = location {
            store.set_field(KEY_LOCATION, json!(l)).unwrap();
        }
        store.load().unwrap()
    }

    #[test]
    fn test_empty_config_fails_with_both_requirements() {
        let err = check_gate(Verb::Create, &ConfigRecord::default()).unwrap_err();
        assert_eq!(err.verb, Verb::Create);
        assert_eq!(
            err.missing,
            vec![
                GateRequirement::MissingToken,
                GateRequirement::MissingLocation
            ]
        );
    }

    #[test]
    fn test_update_config_always_passes() {
        assert!(check_gate(Verb::UpdateConfig, &ConfigRecord::default()).is_ok());
        assert!(check_gate(Verb::DeleteConfig, &ConfigRecord::default()).is_ok());
    }

    #[test]
    fn test_partial_config_reports_only_the_missing_field() {
        let record = record_with(Some("token"), None);
        let err = check_gate(Verb::Up, &record).unwrap_err();
        assert_eq!(err.missing, vec![GateRequirement::MissingLocation]);
    }

    #[test]
    fn test_complete_config_passes_every_verb() {
        let record = record_with(Some("token"), Some("/opt/artifacts"));
        for verb in [
            Verb::Create,
            Verb::Up,
            Verb::Stop,
            Verb::Restart,
            Verb::Destroy,
            Verb::Status,
            Verb::Ssh,
            Verb::List,
        ] {
            assert!(check_gate(verb, &record).is_ok(), "verb {} gated", verb);
        }
    }

    #[test]
    fn test_error_message_names_remediation() {
        let err = check_gate(Verb::Create, &ConfigRecord::default()).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("update-config"));
        assert!(message.contains("--token"));
        assert!(message.contains("--location"));
    }
}
