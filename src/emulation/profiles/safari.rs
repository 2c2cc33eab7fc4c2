//! Safari browser profiles.

use crate::base::profileerror::ProfileError;
use crate::emulation::registry::ProfileRegistry;
use crate::emulation::{Browser, ImpersonationProfile, ProfileFactory};
use crate::http::boundary::BoundaryGenerator;
use crate::http::h2fingerprint::{PriorityParam, PseudoOrder};
use crate::http::h2settings::H2Settings;
use crate::tls::TlsFingerprintId;

/// Safari browser versions for emulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[non_exhaustive]
pub enum Safari {
    /// Safari 17 (macOS Sonoma)
    #[default]
    V17,
}

impl Safari {
    pub fn name(self) -> &'static str {
        match self {
            Safari::V17 => "safari_17",
        }
    }
}

impl ProfileFactory for Safari {
    fn profile(self) -> Result<ImpersonationProfile, ProfileError> {
        ProfileRegistry::builtin()?.get(self.name()).cloned()
    }
}

pub(crate) fn safari_v17() -> Result<ImpersonationProfile, ProfileError> {
    ImpersonationProfile::builder(Safari::V17.name())
        .identity(Browser::Safari, 17)
        .tls_fingerprint(TlsFingerprintId::Safari17)
        .http2_settings(H2Settings::safari())
        .window_increment(10_485_760)
        .pseudo_header_order(PseudoOrder::SAFARI)
        // Safari does not sort its headers alphabetically or by importance.
        .header_order([
            "host",
            "accept",
            "sec-fetch-site",
            "cookie",
            "sec-fetch-dest",
            "accept-language",
            "sec-fetch-mode",
            "user-agent",
            "referer",
            "accept-encoding",
        ])
        .default_headers([
            ("accept", "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"),
            ("sec-fetch-site", "none"),
            ("sec-fetch-dest", "document"),
            ("accept-language", "en-US,en;q=0.9"),
            ("sec-fetch-mode", "navigate"),
            (
                "user-agent",
                "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.0 Safari/605.1.15",
            ),
        ])
        .header_priority(PriorityParam::safari())
        .boundary(BoundaryGenerator::webkit())
        .build()
}
