//! Multipart boundary generators.
//!
//! The boundary string of a `multipart/form-data` body is browser specific
//! and fingerprintable. Blink and WebKit share one format, Gecko another.
//!
//! Entropy always comes from the operating system. If it cannot be read the
//! generator fails with [`ProfileError::RandomnessUnavailable`]; there is no
//! fallback to a weaker source.

use crate::base::profileerror::ProfileError;
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Prefix used by Blink and WebKit.
pub const WEBKIT_PREFIX: &str = "----WebKitFormBoundary";

/// Random characters after [`WEBKIT_PREFIX`].
pub const WEBKIT_RANDOM_LEN: usize = 16;

/// Blink/WebKit encoding table. The trailing `AB` repeats the first two
/// entries, giving them double weight.
const WEBKIT_ALPHABET: &[u8; 64] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789AB";

/// Dash run used by Gecko before its random digits.
pub const GECKO_PREFIX: &str = "---------------------------";

/// Named boundary formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoundaryStyle {
    /// `----WebKitFormBoundary` + 16 characters (Chrome, Edge, Safari).
    WebKit,
    /// 27 dashes + three random 32-bit decimals (Firefox).
    Gecko,
}

type BoundaryFn = dyn Fn() -> Result<String, ProfileError> + Send + Sync;

#[derive(Clone)]
enum Inner {
    Style(BoundaryStyle),
    Fixed(Arc<str>),
    Custom(Arc<BoundaryFn>),
}

/// A zero-argument boundary generator.
///
/// Cheap to clone and safe to call concurrently; every call draws fresh
/// randomness.
#[derive(Clone)]
pub struct BoundaryGenerator {
    inner: Inner,
}

impl BoundaryGenerator {
    /// Wrap a custom generator function.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn() -> Result<String, ProfileError> + Send + Sync + 'static,
    {
        Self {
            inner: Inner::Custom(Arc::new(f)),
        }
    }

    pub fn webkit() -> Self {
        Self::from_style(BoundaryStyle::WebKit)
    }

    pub fn gecko() -> Self {
        Self::from_style(BoundaryStyle::Gecko)
    }

    pub fn from_style(style: BoundaryStyle) -> Self {
        Self {
            inner: Inner::Style(style),
        }
    }

    /// Always return the same boundary. Only useful for non-browser clients
    /// and tests.
    pub fn fixed(boundary: impl Into<String>) -> Self {
        Self {
            inner: Inner::Fixed(Arc::from(boundary.into())),
        }
    }

    /// Produce a fresh boundary.
    pub fn generate(&self) -> Result<String, ProfileError> {
        match &self.inner {
            Inner::Style(BoundaryStyle::WebKit) => webkit_boundary(),
            Inner::Style(BoundaryStyle::Gecko) => gecko_boundary(),
            Inner::Fixed(s) => Ok(s.to_string()),
            Inner::Custom(f) => f(),
        }
    }

    /// The named style, if this is one of the built-in formats.
    pub fn style(&self) -> Option<BoundaryStyle> {
        match self.inner {
            Inner::Style(style) => Some(style),
            _ => None,
        }
    }
}

impl Default for BoundaryGenerator {
    fn default() -> Self {
        Self::webkit()
    }
}

impl PartialEq for BoundaryGenerator {
    fn eq(&self, other: &Self) -> bool {
        match (&self.inner, &other.inner) {
            (Inner::Style(a), Inner::Style(b)) => a == b,
            (Inner::Fixed(a), Inner::Fixed(b)) => a == b,
            (Inner::Custom(a), Inner::Custom(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl Eq for BoundaryGenerator {}

impl fmt::Debug for BoundaryGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.inner {
            Inner::Style(style) => f.debug_tuple("BoundaryGenerator").field(style).finish(),
            Inner::Fixed(s) => f.debug_tuple("BoundaryGenerator::Fixed").field(s).finish(),
            Inner::Custom(_) => f.write_str("BoundaryGenerator::Custom(..)"),
        }
    }
}

fn fill_random(buf: &mut [u8]) -> Result<(), ProfileError> {
    OsRng.try_fill_bytes(buf).map_err(|e| {
        tracing::error!(error = %e, "OS entropy source unavailable");
        ProfileError::RandomnessUnavailable(e.to_string())
    })
}

/// Blink/WebKit boundary: `----WebKitFormBoundary` + 16 characters.
///
/// Each character indexes the 64-entry table with the low 6 bits of an OS
/// random byte, exactly as Blink's `FormDataEncoder` does.
pub fn webkit_boundary() -> Result<String, ProfileError> {
    let mut random = [0u8; WEBKIT_RANDOM_LEN];
    fill_random(&mut random)?;

    let mut boundary = String::with_capacity(WEBKIT_PREFIX.len() + WEBKIT_RANDOM_LEN);
    boundary.push_str(WEBKIT_PREFIX);
    boundary.extend(
        random
            .iter()
            .map(|b| char::from(WEBKIT_ALPHABET[usize::from(b & 0x3F)])),
    );
    Ok(boundary)
}

/// Gecko boundary: 27 dashes followed by three random `u32` in decimal.
pub fn gecko_boundary() -> Result<String, ProfileError> {
    let mut random = [0u8; 12];
    fill_random(&mut random)?;

    let mut boundary = String::from(GECKO_PREFIX);
    for chunk in random.chunks_exact(4) {
        let n = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        boundary.push_str(&n.to_string());
    }
    Ok(boundary)
}
