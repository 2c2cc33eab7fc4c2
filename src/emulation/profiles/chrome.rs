//! Chrome browser profiles.
//!
//! Values captured from Chrome 120 on macOS.

use crate::base::profileerror::ProfileError;
use crate::emulation::registry::ProfileRegistry;
use crate::emulation::{Browser, ImpersonationProfile, ProfileFactory};
use crate::http::boundary::BoundaryGenerator;
use crate::http::h2fingerprint::{PriorityParam, PseudoOrder};
use crate::http::h2settings::H2Settings;
use crate::tls::TlsFingerprintId;

/// Connection-level WINDOW_UPDATE Chromium sends after SETTINGS (15 MB minus the 64 KB default).
pub(crate) const CHROMIUM_WINDOW_INCREMENT: u32 = 15_663_105;

/// Header order Chromium uses for a top-level navigation.
pub(crate) const CHROMIUM_HEADER_ORDER: [&str; 17] = [
    "host",
    "pragma",
    "cache-control",
    "sec-ch-ua",
    "sec-ch-ua-mobile",
    "sec-ch-ua-platform",
    "upgrade-insecure-requests",
    "user-agent",
    "accept",
    "sec-fetch-site",
    "sec-fetch-mode",
    "sec-fetch-user",
    "sec-fetch-dest",
    "referer",
    "accept-encoding",
    "accept-language",
    "cookie",
];

pub(crate) const CHROMIUM_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,image/apng,*/*;q=0.8,application/signed-exchange;v=b3;q=0.7";

/// Chrome browser versions for emulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[non_exhaustive]
pub enum Chrome {
    /// Chrome 120
    #[default]
    V120,
}

impl Chrome {
    /// Registry key of this version.
    pub fn name(self) -> &'static str {
        match self {
            Chrome::V120 => "chrome_120",
        }
    }
}

impl ProfileFactory for Chrome {
    fn profile(self) -> Result<ImpersonationProfile, ProfileError> {
        ProfileRegistry::builtin()?.get(self.name()).cloned()
    }
}

/// Build the Chrome 120 profile.
pub(crate) fn chrome_v120() -> Result<ImpersonationProfile, ProfileError> {
    ImpersonationProfile::builder(Chrome::V120.name())
        .identity(Browser::Chrome, 120)
        .tls_fingerprint(TlsFingerprintId::Chrome120)
        .http2_settings(H2Settings::chrome())
        .window_increment(CHROMIUM_WINDOW_INCREMENT)
        .pseudo_header_order(PseudoOrder::CHROME)
        .header_order(CHROMIUM_HEADER_ORDER)
        .default_headers([
            ("pragma", "no-cache"),
            ("cache-control", "no-cache"),
            (
                "sec-ch-ua",
                r#""Not_A Brand";v="8", "Chromium";v="120", "Google Chrome";v="120""#,
            ),
            ("sec-ch-ua-mobile", "?0"),
            ("sec-ch-ua-platform", r#""macOS""#),
            ("upgrade-insecure-requests", "1"),
            (
                "user-agent",
                "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
            ),
            ("accept", CHROMIUM_ACCEPT),
            ("sec-fetch-site", "none"),
            ("sec-fetch-mode", "navigate"),
            ("sec-fetch-user", "?1"),
            ("sec-fetch-dest", "document"),
        ])
        .header_priority(PriorityParam::chrome())
        .boundary(BoundaryGenerator::webkit())
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::h2settings::SettingId;

    #[test]
    fn test_chrome_v120_values() {
        let profile = chrome_v120().unwrap();
        assert_eq!(profile.name(), "chrome_120");
        assert_eq!(profile.window_increment(), 15663105);
        assert_eq!(profile.header_priority(), PriorityParam::new(0, true, 255));
        assert_eq!(
            profile.http2_settings().get(SettingId::MaxHeaderListSize),
            Some(262144)
        );
        assert_eq!(profile.header_order().len(), 17);
        assert_eq!(profile.default_headers()["sec-ch-ua-platform"], "\"macOS\"");
    }

    #[test]
    fn test_chrome_enum_resolves_registry_profile() {
        let profile = Chrome::V120.profile().unwrap();
        assert_eq!(profile, chrome_v120().unwrap());
    }
}
