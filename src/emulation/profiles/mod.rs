//! Built-in browser profiles.
//!
//! Contains predefined profiles for Chrome, Edge, Firefox, and Safari.

pub mod chrome;
pub mod edge;
pub mod firefox;
pub mod safari;

pub use chrome::Chrome;
pub use edge::Edge;
pub use firefox::Firefox;
pub use safari::Safari;

use super::ImpersonationProfile;
use crate::base::profileerror::ProfileError;

/// Constructors of every built-in profile, in registration order.
pub(crate) const BUILTIN: [fn() -> Result<ImpersonationProfile, ProfileError>; 4] = [
    chrome::chrome_v120,
    edge::edge_v120,
    firefox::firefox_v120,
    safari::safari_v17,
];
