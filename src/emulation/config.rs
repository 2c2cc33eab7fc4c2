//! JSON loading of profile definitions.

use super::definition::ProfileDefinition;
use super::registry::ProfileRegistry;
use crate::base::profileerror::ProfileError;
use std::path::Path;

/// A document holds either one definition or a list of them. The shape is
/// picked from the first token so serde's own error reaches the caller.
fn parse_definitions(json: &str) -> Result<Vec<ProfileDefinition>, ProfileError> {
    if json.trim_start().starts_with('[') {
        Ok(serde_json::from_str(json)?)
    } else {
        Ok(vec![serde_json::from_str(json)?])
    }
}

impl ProfileDefinition {
    /// Parse a single definition from JSON.
    pub fn from_json(json: &str) -> Result<Self, ProfileError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, ProfileError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl ProfileRegistry {
    /// Register the profile(s) declared in a JSON document.
    ///
    /// Either all definitions are registered or none: the document is fully
    /// parsed and validated before the registry is touched. Returns the
    /// names that were added.
    pub fn load_json(&mut self, json: &str) -> Result<Vec<String>, ProfileError> {
        let definitions = parse_definitions(json)?;

        let mut staged = self.clone();
        let mut added = Vec::new();
        for def in definitions {
            let profile = def.into_profile()?;
            added.push(profile.name().to_string());
            staged.register(profile)?;
        }

        *self = staged;
        tracing::debug!(count = added.len(), "loaded profile definitions");
        Ok(added)
    }

    /// Register the profile(s) declared in a JSON file.
    pub fn load_json_file(&mut self, path: impl AsRef<Path>) -> Result<Vec<String>, ProfileError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            ProfileError::Config(format!("cannot read {}: {e}", path.display()))
        })?;
        tracing::debug!(path = %path.display(), "loading profile definitions");
        self.load_json(&json)
    }
}
