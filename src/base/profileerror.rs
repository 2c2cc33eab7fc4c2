use thiserror::Error;

/// Errors raised while defining, looking up, or consuming impersonation profiles.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ProfileError {
    /// No profile is registered under the requested name.
    #[error("Unknown profile: {0}")]
    UnknownProfile(String),

    /// A profile violates one of its construction invariants.
    #[error("Invalid profile `{profile}`: {reason}")]
    InvalidProfile { profile: String, reason: String },

    /// The operating system entropy source could not be read.
    #[error("Randomness unavailable: {0}")]
    RandomnessUnavailable(String),

    /// A request carries a value that cannot be encoded as a header field.
    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    /// A profile definition could not be parsed.
    #[error("Profile configuration error: {0}")]
    Config(String),
}

impl ProfileError {
    /// Shorthand for an [`ProfileError::InvalidProfile`] error.
    pub fn invalid(profile: impl Into<String>, reason: impl Into<String>) -> Self {
        ProfileError::InvalidProfile {
            profile: profile.into(),
            reason: reason.into(),
        }
    }

    /// Errors that must abort startup rather than be handled per request.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ProfileError::InvalidProfile { .. } | ProfileError::RandomnessUnavailable(_)
        )
    }
}

#[cfg(feature = "json")]
impl From<serde_json::Error> for ProfileError {
    fn from(err: serde_json::Error) -> Self {
        ProfileError::Config(err.to_string())
    }
}
