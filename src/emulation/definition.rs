//! Serializable profile definitions.
//!
//! A [`ProfileDefinition`] is the on-disk shape of an
//! [`ImpersonationProfile`]: plain names instead of typed handles, so
//! profiles can be declared in configuration files.
//!
//! ```json
//! {
//!   "name": "internal_crawler",
//!   "tls_fingerprint": "chrome_120",
//!   "http2_settings": [
//!     { "id": "HEADER_TABLE_SIZE", "value": 65536 },
//!     { "id": "ENABLE_PUSH", "value": 0 }
//!   ],
//!   "window_increment": 15663105,
//!   "pseudo_header_order": [":method", ":authority", ":scheme", ":path"],
//!   "header_order": ["host", "user-agent", "accept"],
//!   "default_headers": [["user-agent", "crawler/1.0"]],
//!   "header_priority": { "stream_dependency": 0, "exclusive": true, "weight": 255 },
//!   "boundary": "webkit"
//! }
//! ```

use super::{Browser, ImpersonationProfile};
use crate::base::profileerror::ProfileError;
use crate::http::boundary::{BoundaryGenerator, BoundaryStyle};
use crate::http::h2fingerprint::{PriorityParam, PseudoOrder};
use crate::http::h2settings::H2Settings;
use crate::tls::TlsFingerprintId;
use serde::{Deserialize, Serialize};

/// Declarative form of an [`ImpersonationProfile`].
///
/// Every field except `name` is optional and falls back to the protocol
/// default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProfileDefinition {
    pub name: String,
    #[serde(default = "default_browser")]
    pub browser: Browser,
    #[serde(default)]
    pub version: u16,
    #[serde(default)]
    pub tls_fingerprint: TlsFingerprintId,
    #[serde(default)]
    pub http2_settings: H2Settings,
    #[serde(default)]
    pub window_increment: u32,
    #[serde(default)]
    pub pseudo_header_order: PseudoOrder,
    #[serde(default)]
    pub header_order: Vec<String>,
    /// `(name, value)` pairs, in emission order for unlisted headers.
    #[serde(default)]
    pub default_headers: Vec<(String, String)>,
    #[serde(default)]
    pub header_priority: PriorityParam,
    #[serde(default = "default_boundary")]
    pub boundary: BoundaryStyle,
}

fn default_browser() -> Browser {
    Browser::Custom
}

fn default_boundary() -> BoundaryStyle {
    BoundaryStyle::WebKit
}

impl ProfileDefinition {
    /// Minimal definition with protocol defaults.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            browser: default_browser(),
            version: 0,
            tls_fingerprint: TlsFingerprintId::default(),
            http2_settings: H2Settings::default(),
            window_increment: 0,
            pseudo_header_order: PseudoOrder::default(),
            header_order: Vec::new(),
            default_headers: Vec::new(),
            header_priority: PriorityParam::default(),
            boundary: default_boundary(),
        }
    }

    /// Validate and convert into a profile.
    pub fn into_profile(self) -> Result<ImpersonationProfile, ProfileError> {
        ImpersonationProfile::builder(self.name)
            .identity(self.browser, self.version)
            .tls_fingerprint(self.tls_fingerprint)
            .http2_settings(self.http2_settings)
            .window_increment(self.window_increment)
            .pseudo_header_order(self.pseudo_header_order)
            .header_order(&self.header_order)
            .default_headers(
                self.default_headers
                    .iter()
                    .map(|(name, value)| (name.as_str(), value.as_str())),
            )
            .header_priority(self.header_priority)
            .boundary(BoundaryGenerator::from_style(self.boundary))
            .build()
    }
}

impl TryFrom<ProfileDefinition> for ImpersonationProfile {
    type Error = ProfileError;

    fn try_from(def: ProfileDefinition) -> Result<Self, Self::Error> {
        def.into_profile()
    }
}

impl ImpersonationProfile {
    /// Export to a [`ProfileDefinition`].
    ///
    /// Fails for profiles whose boundary generator is a custom function or a
    /// fixed string, since those have no declarative form.
    pub fn to_definition(&self) -> Result<ProfileDefinition, ProfileError> {
        let boundary = self.boundary().style().ok_or_else(|| {
            ProfileError::Config(format!(
                "profile `{}` uses a boundary generator that cannot be serialized",
                self.name()
            ))
        })?;

        let mut default_headers = Vec::with_capacity(self.default_headers().len());
        for (name, value) in self.default_headers() {
            let value = value.to_str().map_err(|_| {
                ProfileError::Config(format!("default header {name} is not visible ASCII"))
            })?;
            default_headers.push((name.as_str().to_string(), value.to_string()));
        }

        Ok(ProfileDefinition {
            name: self.name().to_string(),
            browser: self.browser(),
            version: self.version(),
            tls_fingerprint: self.tls_fingerprint(),
            http2_settings: self.http2_settings().clone(),
            window_increment: self.window_increment(),
            pseudo_header_order: *self.pseudo_header_order(),
            header_order: self.header_order().clone().into(),
            default_headers,
            header_priority: self.header_priority(),
            boundary,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emulation::profiles::chrome::chrome_v120;
    use crate::http::h2settings::SettingId;

    #[test]
    fn test_minimal_definition() {
        let profile = ProfileDefinition::new("plain").into_profile().unwrap();
        assert_eq!(profile.browser(), Browser::Custom);
        assert_eq!(profile.boundary().style(), Some(BoundaryStyle::WebKit));
        assert_eq!(profile.pseudo_header_order(), &PseudoOrder::PROTOCOL_DEFAULT);
    }

    #[test]
    fn test_builtin_exports_and_rebuilds() {
        let chrome = chrome_v120().unwrap();
        let rebuilt = chrome.to_definition().unwrap().into_profile().unwrap();
        assert_eq!(rebuilt, chrome);
    }

    #[test]
    fn test_invalid_definition_rejected() {
        let mut def = ProfileDefinition::new("broken");
        def.http2_settings = H2Settings::new()
            .with(SettingId::EnablePush, 0)
            .with(SettingId::EnablePush, 1);
        assert!(matches!(
            def.into_profile(),
            Err(ProfileError::InvalidProfile { .. })
        ));
    }

    #[test]
    fn test_fixed_boundary_not_exportable() {
        let profile = ImpersonationProfile::builder("fixed")
            .boundary(BoundaryGenerator::fixed("xyz"))
            .build()
            .unwrap();
        assert!(matches!(profile.to_definition(), Err(ProfileError::Config(_))));
    }
}
