//! Named impersonation profiles.
//!
//! The built-in registry is built once, on first use, and is read-only
//! afterwards. Callers that need custom profiles start from
//! [`ProfileRegistry::with_builtin`] and register their own.

use super::profiles;
use super::{Browser, ImpersonationProfile};
use crate::base::profileerror::ProfileError;
use std::collections::HashMap;
use std::sync::LazyLock;

static BUILTIN: LazyLock<Result<ProfileRegistry, ProfileError>> = LazyLock::new(|| {
    let registry = ProfileRegistry::load_builtin();
    match &registry {
        Ok(r) => tracing::debug!(profiles = r.len(), "built-in profile registry initialized"),
        Err(e) => tracing::error!(error = %e, "built-in profile registry failed to initialize"),
    }
    registry
});

/// Collection of profiles addressable by name.
///
/// Lookups are forgiving about spelling: case is ignored, as are spaces,
/// `_`, `-` and `.`, so `"Chrome 120"`, `"chrome_120"` and `"chrome120"`
/// name the same profile.
#[derive(Debug, Clone, Default)]
pub struct ProfileRegistry {
    profiles: Vec<ImpersonationProfile>,
    index: HashMap<String, usize>,
}

impl ProfileRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide registry of built-in profiles.
    pub fn builtin() -> Result<&'static ProfileRegistry, ProfileError> {
        (*BUILTIN).as_ref().map_err(ProfileError::clone)
    }

    /// An owned registry seeded with the built-in profiles.
    pub fn with_builtin() -> Result<Self, ProfileError> {
        Ok(Self::builtin()?.clone())
    }

    fn load_builtin() -> Result<Self, ProfileError> {
        let mut registry = Self::new();
        for build in profiles::BUILTIN {
            registry.insert(build()?)?;
        }
        Ok(registry)
    }

    /// Add a profile.
    ///
    /// The profile is re-validated; a name that collides with a registered
    /// one after normalization is rejected.
    pub fn register(&mut self, profile: ImpersonationProfile) -> Result<(), ProfileError> {
        profile.validate()?;
        let name = profile.name().to_string();
        self.insert(profile)?;
        tracing::debug!(profile = %name, total = self.len(), "registered impersonation profile");
        Ok(())
    }

    fn insert(&mut self, profile: ImpersonationProfile) -> Result<(), ProfileError> {
        let key = normalize(profile.name());
        if key.is_empty() {
            return Err(ProfileError::invalid(profile.name(), "profile name is empty"));
        }
        if let Some(&existing) = self.index.get(&key) {
            return Err(ProfileError::invalid(
                profile.name(),
                format!(
                    "name collides with registered profile `{}`",
                    self.profiles[existing].name()
                ),
            ));
        }
        self.index.insert(key, self.profiles.len());
        self.profiles.push(profile);
        Ok(())
    }

    /// Look up a profile by name.
    pub fn get(&self, name: &str) -> Result<&ImpersonationProfile, ProfileError> {
        self.index
            .get(&normalize(name))
            .map(|&i| &self.profiles[i])
            .ok_or_else(|| ProfileError::UnknownProfile(name.to_string()))
    }

    /// Look up a profile by browser family and major version.
    pub fn get_version(
        &self,
        browser: Browser,
        version: u16,
    ) -> Result<&ImpersonationProfile, ProfileError> {
        self.profiles
            .iter()
            .find(|p| p.browser() == browser && p.version() == version)
            .ok_or_else(|| ProfileError::UnknownProfile(format!("{browser} {version}")))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(&normalize(name))
    }

    /// Registered names, in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.profiles.iter().map(ImpersonationProfile::name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ImpersonationProfile> {
        self.profiles.iter()
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

impl<'a> IntoIterator for &'a ProfileRegistry {
    type Item = &'a ImpersonationProfile;
    type IntoIter = std::slice::Iter<'a, ImpersonationProfile>;

    fn into_iter(self) -> Self::IntoIter {
        self.profiles.iter()
    }
}

/// Registry key: lower-cased, separators dropped.
fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, ' ' | '_' | '-' | '.'))
        .flat_map(char::to_lowercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("Chrome 120"), "chrome120");
        assert_eq!(normalize("chrome_120"), "chrome120");
        assert_eq!(normalize("Safari-17.0"), "safari170");
    }

    #[test]
    fn test_builtin_order() {
        let registry = ProfileRegistry::builtin().unwrap();
        let names: Vec<_> = registry.names().collect();
        assert_eq!(names, vec!["chrome_120", "edge_120", "firefox_120", "safari_17"]);
    }

    #[test]
    fn test_lookup_spellings() {
        let registry = ProfileRegistry::builtin().unwrap();
        for name in ["chrome_120", "Chrome 120", "chrome120", "CHROME-120"] {
            assert_eq!(registry.get(name).unwrap().name(), "chrome_120");
        }
    }

    #[test]
    fn test_unknown_profile() {
        let registry = ProfileRegistry::builtin().unwrap();
        let err = registry.get("netscape_4").unwrap_err();
        assert_eq!(err, ProfileError::UnknownProfile("netscape_4".into()));
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_get_version() {
        let registry = ProfileRegistry::builtin().unwrap();
        assert_eq!(
            registry.get_version(Browser::Firefox, 120).unwrap().name(),
            "firefox_120"
        );
        assert!(registry.get_version(Browser::Safari, 16).is_err());
    }

    #[test]
    fn test_register_collision() {
        let mut registry = ProfileRegistry::with_builtin().unwrap();
        let dup = ImpersonationProfile::builder("Chrome-120").build().unwrap();
        assert!(matches!(
            registry.register(dup),
            Err(ProfileError::InvalidProfile { .. })
        ));
        assert_eq!(registry.len(), 4);
    }

    #[test]
    fn test_register_does_not_touch_builtin() {
        let mut registry = ProfileRegistry::with_builtin().unwrap();
        registry
            .register(ImpersonationProfile::builder("internal_bot").build().unwrap())
            .unwrap();
        assert!(registry.contains("internal bot"));
        assert!(!ProfileRegistry::builtin().unwrap().contains("internal_bot"));
    }
}
