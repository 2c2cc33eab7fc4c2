//! HTTP/2 SETTINGS configuration for browser fingerprinting.
//!
//! Browsers emit the SETTINGS frame parameters in a fixed order, and
//! fingerprinting systems (Akamai-style HTTP/2 hashes) record both the
//! values and the order. [`H2Settings`] is therefore an ordered list
//! rather than a struct of optional fields.
//!
//! Values are taken from real browser captures.

use crate::base::profileerror::ProfileError;
use serde::{Deserialize, Serialize};
use std::fmt;

const MAX_INITIAL_WINDOW_SIZE: u32 = 0x7FFF_FFFF;
const MIN_MAX_FRAME_SIZE: u32 = 16_384;
const MAX_MAX_FRAME_SIZE: u32 = 16_777_215;

/// HTTP/2 SETTINGS parameter identifier (RFC 9113 §6.5.2, RFC 8441, RFC 9218).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SettingId {
    /// SETTINGS_HEADER_TABLE_SIZE (0x1) - HPACK dynamic table size
    HeaderTableSize,
    /// SETTINGS_ENABLE_PUSH (0x2)
    EnablePush,
    /// SETTINGS_MAX_CONCURRENT_STREAMS (0x3)
    MaxConcurrentStreams,
    /// SETTINGS_INITIAL_WINDOW_SIZE (0x4) - Stream-level flow control
    InitialWindowSize,
    /// SETTINGS_MAX_FRAME_SIZE (0x5)
    MaxFrameSize,
    /// SETTINGS_MAX_HEADER_LIST_SIZE (0x6)
    MaxHeaderListSize,
    /// SETTINGS_ENABLE_CONNECT_PROTOCOL (0x8)
    EnableConnectProtocol,
    /// SETTINGS_NO_RFC7540_PRIORITIES (0x9)
    NoRfc7540Priorities,
    /// Any other identifier (GREASE or experimental settings).
    Unknown(u16),
}

impl SettingId {
    /// Wire identifier.
    pub fn code(self) -> u16 {
        match self {
            SettingId::HeaderTableSize => 0x1,
            SettingId::EnablePush => 0x2,
            SettingId::MaxConcurrentStreams => 0x3,
            SettingId::InitialWindowSize => 0x4,
            SettingId::MaxFrameSize => 0x5,
            SettingId::MaxHeaderListSize => 0x6,
            SettingId::EnableConnectProtocol => 0x8,
            SettingId::NoRfc7540Priorities => 0x9,
            SettingId::Unknown(code) => code,
        }
    }

    /// Map a wire identifier back to a known setting.
    pub fn from_code(code: u16) -> Self {
        match code {
            0x1 => SettingId::HeaderTableSize,
            0x2 => SettingId::EnablePush,
            0x3 => SettingId::MaxConcurrentStreams,
            0x4 => SettingId::InitialWindowSize,
            0x5 => SettingId::MaxFrameSize,
            0x6 => SettingId::MaxHeaderListSize,
            0x8 => SettingId::EnableConnectProtocol,
            0x9 => SettingId::NoRfc7540Priorities,
            other => SettingId::Unknown(other),
        }
    }
}

impl fmt::Display for SettingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SettingId::HeaderTableSize => "HEADER_TABLE_SIZE",
            SettingId::EnablePush => "ENABLE_PUSH",
            SettingId::MaxConcurrentStreams => "MAX_CONCURRENT_STREAMS",
            SettingId::InitialWindowSize => "INITIAL_WINDOW_SIZE",
            SettingId::MaxFrameSize => "MAX_FRAME_SIZE",
            SettingId::MaxHeaderListSize => "MAX_HEADER_LIST_SIZE",
            SettingId::EnableConnectProtocol => "ENABLE_CONNECT_PROTOCOL",
            SettingId::NoRfc7540Priorities => "NO_RFC7540_PRIORITIES",
            SettingId::Unknown(code) => return write!(f, "UNKNOWN_{code:#x}"),
        };
        f.write_str(name)
    }
}

/// A single SETTINGS parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Setting {
    pub id: SettingId,
    pub value: u32,
}

impl Setting {
    pub const fn new(id: SettingId, value: u32) -> Self {
        Self { id, value }
    }
}

impl From<(SettingId, u32)> for Setting {
    fn from((id, value): (SettingId, u32)) -> Self {
        Setting::new(id, value)
    }
}

/// Ordered SETTINGS parameters, sent in the connection preface in this order.
///
/// An empty list means "send an empty SETTINGS frame" (protocol defaults).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct H2Settings {
    settings: Vec<Setting>,
}

impl H2Settings {
    /// Empty settings list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(id, value)` pairs, keeping their order.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (SettingId, u32)>,
    {
        Self {
            settings: pairs.into_iter().map(Setting::from).collect(),
        }
    }

    /// Append a setting (builder style).
    pub fn with(mut self, id: SettingId, value: u32) -> Self {
        self.settings.push(Setting::new(id, value));
        self
    }

    /// Chrome 120 SETTINGS.
    pub fn chrome() -> Self {
        Self::from_pairs([
            (SettingId::HeaderTableSize, 65536),
            (SettingId::EnablePush, 0), // Chrome disabled push in 2022
            (SettingId::MaxConcurrentStreams, 1000),
            (SettingId::InitialWindowSize, 6291456), // 6MB
            (SettingId::MaxHeaderListSize, 262144),  // 256KB
        ])
    }

    /// Firefox 120 SETTINGS.
    pub fn firefox() -> Self {
        Self::from_pairs([
            (SettingId::HeaderTableSize, 65536),
            (SettingId::InitialWindowSize, 131072),
            (SettingId::MaxFrameSize, 16384),
        ])
    }

    /// Safari 17 SETTINGS.
    pub fn safari() -> Self {
        Self::from_pairs([
            (SettingId::EnablePush, 0),
            (SettingId::InitialWindowSize, 4194304),
            (SettingId::MaxConcurrentStreams, 100),
        ])
    }

    /// Check that no wire id appears twice and that values are in range.
    ///
    /// `Unknown` may only carry codes without a named variant, so every id
    /// is range-checked under its real meaning.
    pub fn validate(&self, profile: &str) -> Result<(), ProfileError> {
        for (i, setting) in self.settings.iter().enumerate() {
            let code = setting.id.code();
            if let SettingId::Unknown(_) = setting.id {
                let known = SettingId::from_code(code);
                if !matches!(known, SettingId::Unknown(_)) {
                    return Err(ProfileError::invalid(
                        profile,
                        format!("HTTP/2 setting {code:#x} must be written as {known}"),
                    ));
                }
            }
            if self.settings[..i].iter().any(|s| s.id.code() == code) {
                return Err(ProfileError::invalid(
                    profile,
                    format!("duplicate HTTP/2 setting {}", setting.id),
                ));
            }
            let in_range = match setting.id {
                SettingId::EnablePush | SettingId::EnableConnectProtocol => setting.value <= 1,
                SettingId::NoRfc7540Priorities => setting.value <= 1,
                SettingId::InitialWindowSize => setting.value <= MAX_INITIAL_WINDOW_SIZE,
                SettingId::MaxFrameSize => {
                    (MIN_MAX_FRAME_SIZE..=MAX_MAX_FRAME_SIZE).contains(&setting.value)
                }
                _ => true,
            };
            if !in_range {
                return Err(ProfileError::invalid(
                    profile,
                    format!("{} value {} out of range", setting.id, setting.value),
                ));
            }
        }
        Ok(())
    }

    /// Value of a setting, if present.
    pub fn get(&self, id: SettingId) -> Option<u32> {
        self.settings
            .iter()
            .find(|s| s.id.code() == id.code())
            .map(|s| s.value)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Setting> {
        self.settings.iter()
    }

    pub fn as_slice(&self) -> &[Setting] {
        &self.settings
    }

    pub fn len(&self) -> usize {
        self.settings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.settings.is_empty()
    }

    /// Akamai fingerprint segment, e.g. `1:65536;2:0;3:1000`.
    pub fn fingerprint(&self) -> String {
        self.settings
            .iter()
            .map(|s| format!("{}:{}", s.id.code(), s.value))
            .collect::<Vec<_>>()
            .join(";")
    }
}

impl<'a> IntoIterator for &'a H2Settings {
    type Item = &'a Setting;
    type IntoIter = std::slice::Iter<'a, Setting>;

    fn into_iter(self) -> Self::IntoIter {
        self.settings.iter()
    }
}
