//! Browser emulation module.
//!
//! An [`ImpersonationProfile`] bundles everything that makes a client look
//! like one specific browser build on the wire:
//! - TLS ClientHello template (by identifier)
//! - HTTP/2 SETTINGS order and values, connection WINDOW_UPDATE
//! - pseudo-header order, header order and default header values
//! - stream priority for the request stream
//! - multipart boundary format
//!
//! Profiles are immutable once built. Built-in ones live in the
//! [`ProfileRegistry`].

#[cfg(feature = "json")]
mod config;
pub mod definition;
mod factory;
pub mod profiles;
pub mod registry;

pub use definition::ProfileDefinition;
pub use factory::ProfileFactory;
pub use profiles::{Chrome, Edge, Firefox, Safari};
pub use registry::ProfileRegistry;

use crate::base::profileerror::ProfileError;
use crate::http::boundary::BoundaryGenerator;
use crate::http::h2fingerprint::{validate_window_increment, PriorityParam, PseudoOrder};
use crate::http::h2settings::H2Settings;
use crate::http::orderedheaders::HeaderOrder;
use crate::tls::TlsFingerprintId;
use http::header::{HeaderName, HeaderValue};
use http::HeaderMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Look up a built-in profile by name.
///
/// ```
/// let chrome = wiremask::emulation::get_profile("Chrome 120").unwrap();
/// assert_eq!(chrome.window_increment(), 15663105);
/// ```
pub fn get_profile(name: &str) -> Result<&'static ImpersonationProfile, ProfileError> {
    ProfileRegistry::builtin()?.get(name)
}

/// Browser family a profile imitates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Browser {
    Chrome,
    Edge,
    Firefox,
    Safari,
    /// Hand-built, non-browser configuration.
    Custom,
}

impl fmt::Display for Browser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Browser::Chrome => "Chrome",
            Browser::Edge => "Edge",
            Browser::Firefox => "Firefox",
            Browser::Safari => "Safari",
            Browser::Custom => "Custom",
        };
        f.write_str(name)
    }
}

/// A complete, validated browser wire signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImpersonationProfile {
    name: String,
    browser: Browser,
    version: u16,
    tls_fingerprint: TlsFingerprintId,
    http2_settings: H2Settings,
    window_increment: u32,
    pseudo_header_order: PseudoOrder,
    header_order: HeaderOrder,
    default_headers: HeaderMap,
    header_priority: PriorityParam,
    boundary: BoundaryGenerator,
}

impl ImpersonationProfile {
    /// Start building a profile registered under `name`.
    pub fn builder(name: impl Into<String>) -> ImpersonationProfileBuilder {
        ImpersonationProfileBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn browser(&self) -> Browser {
        self.browser
    }

    pub fn version(&self) -> u16 {
        self.version
    }

    pub fn tls_fingerprint(&self) -> TlsFingerprintId {
        self.tls_fingerprint
    }

    pub fn http2_settings(&self) -> &H2Settings {
        &self.http2_settings
    }

    pub fn window_increment(&self) -> u32 {
        self.window_increment
    }

    pub fn pseudo_header_order(&self) -> &PseudoOrder {
        &self.pseudo_header_order
    }

    pub fn header_order(&self) -> &HeaderOrder {
        &self.header_order
    }

    pub fn default_headers(&self) -> &HeaderMap {
        &self.default_headers
    }

    pub fn header_priority(&self) -> PriorityParam {
        self.header_priority
    }

    pub fn boundary(&self) -> &BoundaryGenerator {
        &self.boundary
    }

    /// Akamai-style HTTP/2 fingerprint string of this profile.
    pub fn http2_fingerprint(&self) -> String {
        format!(
            "{}|{}|0|{}",
            self.http2_settings.fingerprint(),
            self.window_increment,
            self.pseudo_header_order.fingerprint()
        )
    }

    /// Re-check every construction invariant.
    pub fn validate(&self) -> Result<(), ProfileError> {
        if self.name.trim().is_empty() {
            return Err(ProfileError::invalid(&self.name, "profile name is empty"));
        }
        self.http2_settings.validate(&self.name)?;
        validate_window_increment(&self.name, self.window_increment)?;
        self.header_priority.validate(&self.name)?;
        Ok(())
    }
}

/// Builder for [`ImpersonationProfile`].
///
/// Invalid inputs are remembered and reported by [`build`](Self::build), so
/// calls can be chained.
#[derive(Debug, Clone)]
#[must_use]
pub struct ImpersonationProfileBuilder {
    profile: ImpersonationProfile,
    error: Option<String>,
}

impl ImpersonationProfileBuilder {
    fn new(name: impl Into<String>) -> Self {
        Self {
            profile: ImpersonationProfile {
                name: name.into(),
                browser: Browser::Custom,
                version: 0,
                tls_fingerprint: TlsFingerprintId::Default,
                http2_settings: H2Settings::default(),
                window_increment: 0,
                pseudo_header_order: PseudoOrder::default(),
                header_order: HeaderOrder::default(),
                default_headers: HeaderMap::new(),
                header_priority: PriorityParam::default(),
                boundary: BoundaryGenerator::default(),
            },
            error: None,
        }
    }

    fn fail(&mut self, err: ProfileError) {
        if self.error.is_none() {
            let reason = match err {
                ProfileError::InvalidProfile { reason, .. } => reason,
                other => other.to_string(),
            };
            self.error = Some(reason);
        }
    }

    /// Browser family and major version.
    pub fn identity(mut self, browser: Browser, version: u16) -> Self {
        self.profile.browser = browser;
        self.profile.version = version;
        self
    }

    pub fn tls_fingerprint(mut self, id: TlsFingerprintId) -> Self {
        self.profile.tls_fingerprint = id;
        self
    }

    pub fn http2_settings(mut self, settings: H2Settings) -> Self {
        self.profile.http2_settings = settings;
        self
    }

    pub fn window_increment(mut self, increment: u32) -> Self {
        self.profile.window_increment = increment;
        self
    }

    pub fn pseudo_header_order(mut self, order: PseudoOrder) -> Self {
        self.profile.pseudo_header_order = order;
        self
    }

    pub fn header_order<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        match HeaderOrder::new(names) {
            Ok(order) => self.profile.header_order = order,
            Err(e) => self.fail(e),
        }
        self
    }

    /// Add one default header. Names are lower-cased.
    pub fn default_header(mut self, name: &str, value: &str) -> Self {
        let parsed = HeaderName::from_str(name)
            .map_err(|_| ProfileError::InvalidHeader(format!("invalid default header name {name:?}")))
            .and_then(|n| {
                HeaderValue::from_str(value)
                    .map(|v| (n, v))
                    .map_err(|_| ProfileError::InvalidHeader(format!("invalid value for {name}")))
            });
        match parsed {
            Ok((n, v)) => {
                self.profile.default_headers.insert(n, v);
            }
            Err(e) => self.fail(e),
        }
        self
    }

    /// Add default headers from `(name, value)` pairs, in order.
    pub fn default_headers<'a, I>(self, headers: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        headers
            .into_iter()
            .fold(self, |builder, (name, value)| builder.default_header(name, value))
    }

    pub fn header_priority(mut self, priority: PriorityParam) -> Self {
        self.profile.header_priority = priority;
        self
    }

    pub fn boundary(mut self, generator: BoundaryGenerator) -> Self {
        self.profile.boundary = generator;
        self
    }

    /// Validate and build. Fails with [`ProfileError::InvalidProfile`].
    pub fn build(self) -> Result<ImpersonationProfile, ProfileError> {
        if let Some(reason) = self.error {
            return Err(ProfileError::invalid(self.profile.name, reason));
        }
        self.profile.validate()?;
        Ok(self.profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::h2settings::SettingId;

    #[test]
    fn test_builder_defaults() {
        let profile = ImpersonationProfile::builder("bare").build().unwrap();
        assert_eq!(profile.browser(), Browser::Custom);
        assert_eq!(profile.tls_fingerprint(), TlsFingerprintId::Default);
        assert!(profile.http2_settings().is_empty());
        assert_eq!(profile.window_increment(), 0);
        assert!(profile.header_order().is_empty());
        assert!(profile.default_headers().is_empty());
    }

    #[test]
    fn test_empty_name_rejected() {
        let err = ImpersonationProfile::builder("  ").build().unwrap_err();
        assert!(matches!(err, ProfileError::InvalidProfile { .. }));
    }

    #[test]
    fn test_duplicate_setting_rejected() {
        let err = ImpersonationProfile::builder("dup")
            .http2_settings(
                H2Settings::new()
                    .with(SettingId::MaxConcurrentStreams, 100)
                    .with(SettingId::MaxConcurrentStreams, 1000),
            )
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("MAX_CONCURRENT_STREAMS"));
    }

    #[test]
    fn test_window_increment_overflow_rejected() {
        let res = ImpersonationProfile::builder("w")
            .window_increment(0x8000_0000)
            .build();
        assert!(res.is_err());
    }

    #[test]
    fn test_header_order_error_carries_profile_name() {
        let err = ImpersonationProfile::builder("mine")
            .header_order(["accept", "Accept"])
            .build()
            .unwrap_err();
        match err {
            ProfileError::InvalidProfile { profile, reason } => {
                assert_eq!(profile, "mine");
                assert!(reason.contains("accept"));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_invalid_default_header_rejected() {
        let res = ImpersonationProfile::builder("bad")
            .default_header("x-ok", "fine")
            .default_header("bad name", "v")
            .build();
        assert!(matches!(res, Err(ProfileError::InvalidProfile { .. })));
    }

    #[test]
    fn test_default_headers_lowercased() {
        let profile = ImpersonationProfile::builder("case")
            .default_header("User-Agent", "X/1")
            .build()
            .unwrap();
        assert_eq!(profile.default_headers()["user-agent"], "X/1");
    }

    #[test]
    fn test_http2_fingerprint_string() {
        let profile = ImpersonationProfile::builder("fp")
            .http2_settings(H2Settings::chrome())
            .window_increment(15663105)
            .pseudo_header_order(PseudoOrder::CHROME)
            .build()
            .unwrap();
        assert_eq!(
            profile.http2_fingerprint(),
            "1:65536;2:0;3:1000;4:6291456;6:262144|15663105|0|m,a,s,p"
        );
    }
}
