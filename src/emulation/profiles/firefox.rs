//! Firefox browser profiles.

use crate::base::profileerror::ProfileError;
use crate::emulation::registry::ProfileRegistry;
use crate::emulation::{Browser, ImpersonationProfile, ProfileFactory};
use crate::http::boundary::BoundaryGenerator;
use crate::http::h2fingerprint::{PriorityParam, PseudoOrder};
use crate::http::h2settings::H2Settings;
use crate::tls::TlsFingerprintId;

/// Firefox browser versions for emulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[non_exhaustive]
pub enum Firefox {
    /// Firefox 120
    #[default]
    V120,
}

impl Firefox {
    pub fn name(self) -> &'static str {
        match self {
            Firefox::V120 => "firefox_120",
        }
    }
}

impl ProfileFactory for Firefox {
    fn profile(self) -> Result<ImpersonationProfile, ProfileError> {
        ProfileRegistry::builtin()?.get(self.name()).cloned()
    }
}

pub(crate) fn firefox_v120() -> Result<ImpersonationProfile, ProfileError> {
    ImpersonationProfile::builder(Firefox::V120.name())
        .identity(Browser::Firefox, 120)
        .tls_fingerprint(TlsFingerprintId::Firefox120)
        .http2_settings(H2Settings::firefox())
        .window_increment(12_517_377)
        .pseudo_header_order(PseudoOrder::FIREFOX)
        .header_order([
            "host",
            "user-agent",
            "accept",
            "accept-language",
            "accept-encoding",
            "referer",
            "cookie",
            "upgrade-insecure-requests",
            "sec-fetch-dest",
            "sec-fetch-mode",
            "sec-fetch-site",
            "sec-fetch-user",
            "te",
        ])
        .default_headers([
            (
                "user-agent",
                "Mozilla/5.0 (Macintosh; Intel Mac OS X 10.15; rv:120.0) Gecko/20100101 Firefox/120.0",
            ),
            (
                "accept",
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8",
            ),
            ("accept-language", "en-US,en;q=0.5"),
            ("upgrade-insecure-requests", "1"),
            ("sec-fetch-dest", "document"),
            ("sec-fetch-mode", "navigate"),
            ("sec-fetch-site", "none"),
            ("sec-fetch-user", "?1"),
            ("te", "trailers"),
        ])
        .header_priority(PriorityParam::firefox())
        .boundary(BoundaryGenerator::gecko())
        .build()
}
