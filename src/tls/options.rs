use super::{AlpnProtocol, CertCompressAlg, TlsVersion};

/// Builder for `TlsOptions`.
#[must_use]
#[derive(Debug, Clone)]
pub struct TlsOptionsBuilder {
    config: TlsOptions,
}

/// ClientHello template handed to the TLS engine.
///
/// String lists use OpenSSL/BoringSSL syntax and are emitted in the order
/// given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsOptions {
    /// ALPN protocols.
    pub alpn_protocols: Vec<AlpnProtocol>,

    /// ALPS protocols (application settings extension).
    pub alps_protocols: Vec<AlpnProtocol>,

    /// Use the new ALPS codepoint (0x44cd) instead of 0x4469.
    pub alps_use_new_codepoint: bool,

    /// Minimum TLS version.
    pub min_tls_version: Option<TlsVersion>,

    /// Maximum TLS version.
    pub max_tls_version: Option<TlsVersion>,

    /// Enable session tickets.
    pub session_ticket: bool,

    /// Cipher suite configuration string.
    pub cipher_list: Option<String>,

    /// Supported curves list.
    pub curves_list: Option<String>,

    /// Supported signature algorithms.
    pub sigalgs_list: Option<String>,

    /// Enable OCSP stapling.
    pub enable_ocsp_stapling: bool,

    /// Enable Signed Certificate Timestamps (SCT).
    pub enable_signed_cert_timestamps: bool,

    /// Enable GREASE.
    pub grease_enabled: bool,

    /// Randomize extension order per connection.
    pub permute_extensions: bool,

    /// Enable ECH GREASE.
    pub enable_ech_grease: bool,

    /// Offer pre-shared key resumption.
    pub pre_shared_key: bool,

    /// record_size_limit extension value (Firefox).
    pub record_size_limit: Option<u16>,

    /// Certificate compression algorithms, in preference order.
    pub certificate_compression_algorithms: Vec<CertCompressAlg>,
}

impl Default for TlsOptions {
    fn default() -> Self {
        Self {
            alpn_protocols: vec![AlpnProtocol::HTTP2, AlpnProtocol::HTTP1],
            alps_protocols: Vec::new(),
            alps_use_new_codepoint: false,
            min_tls_version: Some(TlsVersion::TLS_1_2),
            max_tls_version: Some(TlsVersion::TLS_1_3),
            session_ticket: true,
            cipher_list: None,
            curves_list: None,
            sigalgs_list: None,
            enable_ocsp_stapling: false,
            enable_signed_cert_timestamps: false,
            grease_enabled: false,
            permute_extensions: false,
            enable_ech_grease: false,
            pre_shared_key: false,
            record_size_limit: None,
            certificate_compression_algorithms: Vec::new(),
        }
    }
}

impl TlsOptionsBuilder {
    pub fn new() -> Self {
        Self {
            config: TlsOptions::default(),
        }
    }

    pub fn alpn_protocols<I>(mut self, alpn: I) -> Self
    where
        I: IntoIterator<Item = AlpnProtocol>,
    {
        self.config.alpn_protocols = alpn.into_iter().collect();
        self
    }

    pub fn alps_protocols<I>(mut self, alps: I) -> Self
    where
        I: IntoIterator<Item = AlpnProtocol>,
    {
        self.config.alps_protocols = alps.into_iter().collect();
        self
    }

    pub fn alps_use_new_codepoint(mut self, enabled: bool) -> Self {
        self.config.alps_use_new_codepoint = enabled;
        self
    }

    pub fn min_tls_version(mut self, version: TlsVersion) -> Self {
        self.config.min_tls_version = Some(version);
        self
    }

    pub fn max_tls_version(mut self, version: TlsVersion) -> Self {
        self.config.max_tls_version = Some(version);
        self
    }

    pub fn session_ticket(mut self, enabled: bool) -> Self {
        self.config.session_ticket = enabled;
        self
    }

    pub fn cipher_list(mut self, ciphers: &str) -> Self {
        self.config.cipher_list = Some(ciphers.to_string());
        self
    }

    pub fn curves_list(mut self, curves: &str) -> Self {
        self.config.curves_list = Some(curves.to_string());
        self
    }

    pub fn sigalgs_list(mut self, sigalgs: &str) -> Self {
        self.config.sigalgs_list = Some(sigalgs.to_string());
        self
    }

    pub fn grease_enabled(mut self, enabled: bool) -> Self {
        self.config.grease_enabled = enabled;
        self
    }

    pub fn enable_ocsp_stapling(mut self, enabled: bool) -> Self {
        self.config.enable_ocsp_stapling = enabled;
        self
    }

    pub fn enable_signed_cert_timestamps(mut self, enabled: bool) -> Self {
        self.config.enable_signed_cert_timestamps = enabled;
        self
    }

    pub fn permute_extensions(mut self, permute: bool) -> Self {
        self.config.permute_extensions = permute;
        self
    }

    pub fn enable_ech_grease(mut self, enabled: bool) -> Self {
        self.config.enable_ech_grease = enabled;
        self
    }

    pub fn pre_shared_key(mut self, enabled: bool) -> Self {
        self.config.pre_shared_key = enabled;
        self
    }

    pub fn record_size_limit(mut self, limit: u16) -> Self {
        self.config.record_size_limit = Some(limit);
        self
    }

    pub fn certificate_compression_algorithms(mut self, algs: &[CertCompressAlg]) -> Self {
        self.config.certificate_compression_algorithms = algs.to_vec();
        self
    }

    pub fn build(self) -> TlsOptions {
        self.config
    }
}

impl Default for TlsOptionsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TlsOptions {
    pub fn builder() -> TlsOptionsBuilder {
        TlsOptionsBuilder::new()
    }

    /// Cipher suites as individual names, in ClientHello order.
    pub fn ciphers(&self) -> impl Iterator<Item = &str> {
        self.cipher_list
            .as_deref()
            .unwrap_or_default()
            .split(':')
            .filter(|s| !s.is_empty())
    }

    /// ALPN extension payload.
    pub fn alpn_wire(&self) -> Vec<u8> {
        AlpnProtocol::encode_list(&self.alpn_protocols)
    }
}
