//! TLS ClientHello templates.
//!
//! The handshake itself belongs to the TLS engine. A profile only names a
//! template through [`TlsFingerprintId`]; the engine looks it up with
//! [`TlsFingerprintId::template`] and configures its ClientHello from the
//! returned [`TlsOptions`].

pub mod impersonate;
pub mod options;

pub use self::impersonate::TlsFingerprintId;
pub use self::options::{TlsOptions, TlsOptionsBuilder};

use std::fmt;

/// TLS protocol version (wire code).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TlsVersion(pub u16);

impl TlsVersion {
    pub const TLS_1_0: TlsVersion = TlsVersion(0x0301);
    pub const TLS_1_1: TlsVersion = TlsVersion(0x0302);
    pub const TLS_1_2: TlsVersion = TlsVersion(0x0303);
    pub const TLS_1_3: TlsVersion = TlsVersion(0x0304);
}

impl fmt::Display for TlsVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            TlsVersion::TLS_1_0 => f.write_str("TLSv1.0"),
            TlsVersion::TLS_1_1 => f.write_str("TLSv1.1"),
            TlsVersion::TLS_1_2 => f.write_str("TLSv1.2"),
            TlsVersion::TLS_1_3 => f.write_str("TLSv1.3"),
            TlsVersion(other) => write!(f, "TLS({other:#06x})"),
        }
    }
}

/// ALPN protocol identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AlpnProtocol(&'static str);

impl AlpnProtocol {
    pub const HTTP1: AlpnProtocol = AlpnProtocol("http/1.1");
    pub const HTTP2: AlpnProtocol = AlpnProtocol("h2");
    pub const HTTP3: AlpnProtocol = AlpnProtocol("h3");

    pub fn as_str(&self) -> &'static str {
        self.0
    }

    /// Length-prefixed wire encoding of a protocol list.
    pub fn encode_list(protocols: &[AlpnProtocol]) -> Vec<u8> {
        let mut wire = Vec::new();
        for proto in protocols {
            wire.push(proto.0.len() as u8);
            wire.extend_from_slice(proto.0.as_bytes());
        }
        wire
    }
}

/// Certificate compression algorithm (RFC 8879).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CertCompressAlg {
    Zlib,
    Brotli,
    Zstd,
}

impl CertCompressAlg {
    pub fn code(self) -> u16 {
        match self {
            CertCompressAlg::Zlib => 1,
            CertCompressAlg::Brotli => 2,
            CertCompressAlg::Zstd => 3,
        }
    }
}
