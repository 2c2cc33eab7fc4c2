//! Client handle carrying the per-connection wire configuration.
//!
//! The transport (TLS engine, HTTP/2 engine, request serializer) consults a
//! [`Client`] for everything that shapes the bytes it sends. Applying an
//! [`ImpersonationProfile`] replaces all of it at once.
//!
//! # Example
//!
//! ```
//! use wiremask::client::Client;
//! use wiremask::emulation::Chrome;
//!
//! let client = Client::builder().profile(Chrome::V120).build()?;
//!
//! let preface = client.connection_preface();
//! assert_eq!(preface.h2.window_increment, 15663105);
//!
//! let request = http::Request::get("https://example.com/").body(())?;
//! let fields = client.encode_headers(&request)?;
//! assert_eq!(fields[0].name, ":method");
//! assert_eq!(fields[1].name, ":authority");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use crate::base::profileerror::ProfileError;
use crate::emulation::{ImpersonationProfile, ProfileFactory, ProfileRegistry};
use crate::http::boundary::BoundaryGenerator;
use crate::http::h2fingerprint::{validate_window_increment, H2Preface, PriorityParam, PseudoOrder};
use crate::http::h2settings::H2Settings;
use crate::http::multipart::Form;
use crate::http::orderedheaders::{order_headers, HeaderField, HeaderOrder, OrderedHeaderMap};
use crate::tls::{TlsFingerprintId, TlsOptions};
use bytes::Bytes;
use http::{HeaderMap, Method, Request, Uri};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Name reported in errors raised by the individual setters.
const CUSTOM_CONFIG: &str = "custom";

/// Everything about a client's connections and requests that fingerprinting
/// can observe.
///
/// A fresh client starts from protocol defaults: the TLS engine's own
/// ClientHello, an empty SETTINGS frame, no connection WINDOW_UPDATE
/// (`window_increment == 0`), pseudo-headers in `:method, :scheme,
/// :authority, :path` order, no header ordering, no default headers, the
/// RFC 9113 default priority and WebKit-style boundaries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientWireConfig {
    pub tls_fingerprint: TlsFingerprintId,
    pub http2_settings: H2Settings,
    pub window_increment: u32,
    pub pseudo_header_order: PseudoOrder,
    pub header_order: HeaderOrder,
    pub default_headers: HeaderMap,
    pub header_priority: PriorityParam,
    pub boundary: BoundaryGenerator,
}

impl Default for ClientWireConfig {
    fn default() -> Self {
        Self {
            tls_fingerprint: TlsFingerprintId::Default,
            http2_settings: H2Settings::default(),
            window_increment: 0,
            pseudo_header_order: PseudoOrder::PROTOCOL_DEFAULT,
            header_order: HeaderOrder::default(),
            default_headers: HeaderMap::new(),
            header_priority: PriorityParam::default(),
            boundary: BoundaryGenerator::webkit(),
        }
    }
}

impl From<&ImpersonationProfile> for ClientWireConfig {
    fn from(profile: &ImpersonationProfile) -> Self {
        Self {
            tls_fingerprint: profile.tls_fingerprint(),
            http2_settings: profile.http2_settings().clone(),
            window_increment: profile.window_increment(),
            pseudo_header_order: *profile.pseudo_header_order(),
            header_order: profile.header_order().clone(),
            default_headers: profile.default_headers().clone(),
            header_priority: profile.header_priority(),
            boundary: profile.boundary().clone(),
        }
    }
}

/// What the transport needs to open a connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionPreface {
    pub tls_fingerprint: TlsFingerprintId,
    /// ClientHello template for `tls_fingerprint`.
    pub tls: TlsOptions,
    pub h2: H2Preface,
}

impl ConnectionPreface {
    /// SETTINGS and WINDOW_UPDATE frames, ready to follow the preface magic.
    pub fn encode(&self) -> Bytes {
        self.h2.encode()
    }
}

/// Client handle.
///
/// Cloning is cheap and clones share one configuration, like clones of any
/// connection-pooling client. Use [`Client::new`] for an independent one.
#[derive(Debug, Clone, Default)]
pub struct Client {
    config: Arc<RwLock<ClientWireConfig>>,
}

impl Client {
    /// Create a client with protocol-default wire configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new client builder.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    // The configuration is only ever replaced by whole-field assignment, so a
    // poisoned lock still guards a consistent value.
    fn read(&self) -> RwLockReadGuard<'_, ClientWireConfig> {
        self.config.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, ClientWireConfig> {
        self.config.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replace the whole wire configuration with the one derived from
    /// `profile`. Nothing from an earlier profile or setter survives.
    pub fn apply_profile(&self, profile: &ImpersonationProfile) {
        let config = ClientWireConfig::from(profile);
        *self.write() = config;
        tracing::debug!(
            profile = %profile.name(),
            tls = %profile.tls_fingerprint(),
            h2 = %profile.http2_fingerprint(),
            "applied impersonation profile"
        );
    }

    /// Resolve `factory` and apply the resulting profile.
    pub fn apply<P: ProfileFactory>(&self, factory: P) -> Result<(), ProfileError> {
        let profile = factory.profile()?;
        self.apply_profile(&profile);
        Ok(())
    }

    /// Apply a built-in profile by name.
    pub fn impersonate(&self, name: &str) -> Result<(), ProfileError> {
        let profile = ProfileRegistry::builtin()?.get(name)?;
        self.apply_profile(profile);
        Ok(())
    }

    /// Snapshot of the current configuration.
    pub fn wire_config(&self) -> ClientWireConfig {
        self.read().clone()
    }

    pub fn set_tls_fingerprint(&self, id: TlsFingerprintId) {
        self.write().tls_fingerprint = id;
        tracing::debug!(tls = %id, "overrode TLS fingerprint");
    }

    pub fn set_http2_settings(&self, settings: H2Settings) -> Result<(), ProfileError> {
        settings.validate(CUSTOM_CONFIG)?;
        tracing::debug!(settings = %settings.fingerprint(), "overrode HTTP/2 settings");
        self.write().http2_settings = settings;
        Ok(())
    }

    /// Set the connection WINDOW_UPDATE increment; `0` disables the frame.
    pub fn set_window_increment(&self, increment: u32) -> Result<(), ProfileError> {
        validate_window_increment(CUSTOM_CONFIG, increment)?;
        self.write().window_increment = increment;
        tracing::debug!(increment, "overrode window increment");
        Ok(())
    }

    pub fn set_pseudo_header_order(&self, order: PseudoOrder) {
        self.write().pseudo_header_order = order;
        tracing::debug!(order = %order.fingerprint(), "overrode pseudo-header order");
    }

    pub fn set_header_order<I, S>(&self, names: I) -> Result<(), ProfileError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let order = HeaderOrder::new(names).map_err(|e| match e {
            ProfileError::InvalidProfile { reason, .. } => {
                ProfileError::invalid(CUSTOM_CONFIG, reason)
            }
            other => other,
        })?;
        tracing::debug!(headers = order.len(), "overrode header order");
        self.write().header_order = order;
        Ok(())
    }

    pub fn set_default_headers(&self, headers: HeaderMap) {
        tracing::debug!(headers = headers.len(), "overrode default headers");
        self.write().default_headers = headers;
    }

    pub fn set_header_priority(&self, priority: PriorityParam) -> Result<(), ProfileError> {
        priority.validate(CUSTOM_CONFIG)?;
        self.write().header_priority = priority;
        tracing::debug!(
            dependency = priority.stream_dependency,
            exclusive = priority.exclusive,
            weight = priority.weight,
            "overrode header priority"
        );
        Ok(())
    }

    pub fn set_boundary_generator(&self, generator: BoundaryGenerator) {
        tracing::debug!(boundary = ?generator, "overrode boundary generator");
        self.write().boundary = generator;
    }

    /// Parameters for a new connection.
    pub fn connection_preface(&self) -> ConnectionPreface {
        let (tls_fingerprint, h2) = {
            let config = self.read();
            (
                config.tls_fingerprint,
                H2Preface {
                    settings: config.http2_settings.clone(),
                    window_increment: config.window_increment,
                    first_stream_priority: config.header_priority,
                },
            )
        };
        ConnectionPreface {
            tls_fingerprint,
            tls: tls_fingerprint.template(),
            h2,
        }
    }

    /// Serialize a request's header block in the configured order.
    ///
    /// Unlisted headers follow `http::HeaderMap` iteration order. That is
    /// insertion order only while nothing has been removed from the map,
    /// since removal swaps the last entry into the freed slot. Callers that
    /// need an exact order for unlisted headers should build an
    /// [`OrderedHeaderMap`] and use [`encode_ordered`](Self::encode_ordered).
    pub fn encode_headers<B>(&self, request: &Request<B>) -> Result<Vec<HeaderField>, ProfileError> {
        let config = self.read();
        order_headers(
            &config.pseudo_header_order,
            &config.header_order,
            &config.default_headers,
            request.method(),
            request.uri(),
            request.headers(),
        )
    }

    /// Serialize a header block whose unlisted headers keep the caller's
    /// insertion order exactly, removals included.
    pub fn encode_ordered(
        &self,
        method: &Method,
        uri: &Uri,
        headers: &OrderedHeaderMap,
    ) -> Result<Vec<HeaderField>, ProfileError> {
        let config = self.read();
        order_headers(
            &config.pseudo_header_order,
            &config.header_order,
            &config.default_headers,
            method,
            uri,
            headers.iter(),
        )
    }

    /// Start a multipart form with a freshly generated boundary.
    pub fn multipart_form(&self) -> Result<Form, ProfileError> {
        let generator = self.read().boundary.clone();
        Form::generate(&generator)
    }
}

/// Replace `client`'s wire configuration with `profile`'s.
pub fn apply_profile(client: &Client, profile: &ImpersonationProfile) {
    client.apply_profile(profile);
}

/// Builder for creating a [`Client`].
#[derive(Default)]
#[must_use]
pub struct ClientBuilder {
    profile: Option<Result<ImpersonationProfile, ProfileError>>,
    boundary: Option<BoundaryGenerator>,
}

impl ClientBuilder {
    /// Start from a profile (a version enum, a name, or a profile value).
    pub fn profile<P: ProfileFactory>(mut self, factory: P) -> Self {
        self.profile = Some(factory.profile());
        self
    }

    /// Start from a built-in profile by name.
    pub fn impersonate(self, name: &str) -> Self {
        self.profile(name)
    }

    /// Override the boundary generator (applied after the profile).
    pub fn boundary_generator(mut self, generator: BoundaryGenerator) -> Self {
        self.boundary = Some(generator);
        self
    }

    /// Build the client. Fails if the selected profile could not be resolved.
    pub fn build(self) -> Result<Client, ProfileError> {
        let client = Client::new();
        if let Some(profile) = self.profile {
            client.apply_profile(&profile?);
        }
        if let Some(generator) = self.boundary {
            client.set_boundary_generator(generator);
        }
        Ok(client)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::h2fingerprint::PseudoId;
    use crate::http::h2settings::SettingId;

    #[test]
    fn test_fresh_client_defaults() {
        let config = Client::new().wire_config();
        assert_eq!(config, ClientWireConfig::default());
        assert!(config.http2_settings.is_empty());
        assert_eq!(config.window_increment, 0);
        assert_eq!(config.header_priority.weight, 15);
        assert_eq!(config.pseudo_header_order.as_array()[1], PseudoId::Scheme);
    }

    #[test]
    fn test_default_preface_has_no_window_update() {
        let bytes = Client::new().connection_preface().encode();
        // Empty SETTINGS frame only.
        assert_eq!(&bytes[..], &[0, 0, 0, 0x4, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_setters_validate() {
        let client = Client::new();
        assert!(client.set_window_increment(0x8000_0000).is_err());
        assert!(client
            .set_http2_settings(H2Settings::new().with(SettingId::EnablePush, 7))
            .is_err());
        let err = client.set_header_order(["accept", "ACCEPT"]).unwrap_err();
        match err {
            ProfileError::InvalidProfile { profile, .. } => assert_eq!(profile, CUSTOM_CONFIG),
            other => panic!("unexpected error {other:?}"),
        }
        assert_eq!(client.wire_config(), ClientWireConfig::default());
    }

    #[test]
    fn test_builder_unknown_profile() {
        let res = Client::builder().impersonate("lynx_2").build();
        assert!(matches!(res, Err(ProfileError::UnknownProfile(_))));
    }

    #[test]
    fn test_builder_boundary_override() {
        let client = Client::builder()
            .impersonate("chrome_120")
            .boundary_generator(BoundaryGenerator::fixed("fixed-boundary"))
            .build()
            .unwrap();
        let form = client.multipart_form().unwrap();
        assert_eq!(form.boundary(), "fixed-boundary");
        assert_eq!(client.wire_config().window_increment, 15663105);
    }

    #[test]
    fn test_clones_share_config() {
        let client = Client::new();
        let clone = client.clone();
        clone.impersonate("safari_17").unwrap();
        assert_eq!(client.wire_config().tls_fingerprint, TlsFingerprintId::Safari17);
        assert_eq!(Client::new().wire_config().tls_fingerprint, TlsFingerprintId::Default);
    }
}
