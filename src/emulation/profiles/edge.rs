//! Edge browser profiles.
//!
//! Edge is Chromium underneath: same SETTINGS, window, pseudo order and
//! header order as Chrome, with Edge branding in the client hints and UA.

use super::chrome::{CHROMIUM_ACCEPT, CHROMIUM_HEADER_ORDER, CHROMIUM_WINDOW_INCREMENT};
use crate::base::profileerror::ProfileError;
use crate::emulation::registry::ProfileRegistry;
use crate::emulation::{Browser, ImpersonationProfile, ProfileFactory};
use crate::http::boundary::BoundaryGenerator;
use crate::http::h2fingerprint::{PriorityParam, PseudoOrder};
use crate::http::h2settings::H2Settings;
use crate::tls::TlsFingerprintId;

/// Edge browser versions for emulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[non_exhaustive]
pub enum Edge {
    /// Edge 120
    #[default]
    V120,
}

impl Edge {
    pub fn name(self) -> &'static str {
        match self {
            Edge::V120 => "edge_120",
        }
    }
}

impl ProfileFactory for Edge {
    fn profile(self) -> Result<ImpersonationProfile, ProfileError> {
        ProfileRegistry::builtin()?.get(self.name()).cloned()
    }
}

pub(crate) fn edge_v120() -> Result<ImpersonationProfile, ProfileError> {
    ImpersonationProfile::builder(Edge::V120.name())
        .identity(Browser::Edge, 120)
        .tls_fingerprint(TlsFingerprintId::Edge120)
        .http2_settings(H2Settings::chrome())
        .window_increment(CHROMIUM_WINDOW_INCREMENT)
        .pseudo_header_order(PseudoOrder::CHROME)
        .header_order(CHROMIUM_HEADER_ORDER)
        .default_headers([
            (
                "sec-ch-ua",
                r#""Not_A Brand";v="8", "Chromium";v="120", "Microsoft Edge";v="120""#,
            ),
            ("sec-ch-ua-mobile", "?0"),
            ("sec-ch-ua-platform", r#""Windows""#),
            ("upgrade-insecure-requests", "1"),
            (
                "user-agent",
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36 Edg/120.0.0.0",
            ),
            ("accept", CHROMIUM_ACCEPT),
            ("sec-fetch-site", "none"),
            ("sec-fetch-mode", "navigate"),
            ("sec-fetch-user", "?1"),
            ("sec-fetch-dest", "document"),
            ("accept-language", "en-US,en;q=0.9"),
        ])
        .header_priority(PriorityParam::chrome())
        .boundary(BoundaryGenerator::webkit())
        .build()
}
