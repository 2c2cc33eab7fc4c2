//! Profile factory trait.

use super::registry::ProfileRegistry;
use super::ImpersonationProfile;
use crate::base::profileerror::ProfileError;

/// Anything that can produce an [`ImpersonationProfile`].
///
/// Implemented by the browser version enums (which resolve through the
/// built-in registry), by registry names, and by profiles themselves, so
/// [`Client::apply`](crate::client::Client::apply) and
/// [`ClientBuilder::profile`](crate::client::ClientBuilder::profile) accept
/// any of them.
pub trait ProfileFactory {
    /// Resolve to a profile.
    fn profile(self) -> Result<ImpersonationProfile, ProfileError>;
}

impl ProfileFactory for ImpersonationProfile {
    #[inline]
    fn profile(self) -> Result<ImpersonationProfile, ProfileError> {
        Ok(self)
    }
}

impl ProfileFactory for &ImpersonationProfile {
    #[inline]
    fn profile(self) -> Result<ImpersonationProfile, ProfileError> {
        Ok(self.clone())
    }
}

impl ProfileFactory for &str {
    fn profile(self) -> Result<ImpersonationProfile, ProfileError> {
        ProfileRegistry::builtin()?.get(self).cloned()
    }
}
