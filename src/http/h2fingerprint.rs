//! HTTP/2 Fingerprint Emulation Types
//!
//! Anti-bot systems fingerprint HTTP/2 at multiple levels:
//! - SETTINGS frame parameter order (see [`H2Settings`])
//! - the connection-level WINDOW_UPDATE sent right after SETTINGS
//! - pseudo-header field order in HEADERS frames
//! - the stream priority carried by the first request stream
//!
//! This module provides the types for the last three and the frame
//! encoder for the connection preface.

use crate::base::profileerror::ProfileError;
use crate::http::h2settings::H2Settings;
use bytes::{BufMut, Bytes, BytesMut};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Largest flow-control window increment (2^31 - 1).
pub const MAX_WINDOW_INCREMENT: u32 = 0x7FFF_FFFF;

/// Largest stream identifier (31 bits).
pub const MAX_STREAM_ID: u32 = 0x7FFF_FFFF;

const FRAME_TYPE_PRIORITY: u8 = 0x2;
const FRAME_TYPE_SETTINGS: u8 = 0x4;
const FRAME_TYPE_WINDOW_UPDATE: u8 = 0x8;

/// HTTP/2 request pseudo-header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PseudoId {
    Method,
    Authority,
    Scheme,
    Path,
}

impl PseudoId {
    pub const ALL: [PseudoId; 4] = [
        PseudoId::Method,
        PseudoId::Authority,
        PseudoId::Scheme,
        PseudoId::Path,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PseudoId::Method => ":method",
            PseudoId::Authority => ":authority",
            PseudoId::Scheme => ":scheme",
            PseudoId::Path => ":path",
        }
    }
}

impl fmt::Display for PseudoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PseudoId {
    type Err = ProfileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ":method" => Ok(PseudoId::Method),
            ":authority" => Ok(PseudoId::Authority),
            ":scheme" => Ok(PseudoId::Scheme),
            ":path" => Ok(PseudoId::Path),
            other => Err(ProfileError::InvalidHeader(format!(
                "unknown pseudo-header {other}"
            ))),
        }
    }
}

/// Order of the four request pseudo-headers in a HEADERS frame.
///
/// Always a permutation of `:method`, `:authority`, `:scheme`, `:path`;
/// the fallible constructors reject anything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct PseudoOrder([PseudoId; 4]);

impl PseudoOrder {
    /// Chrome / Edge: `:method, :authority, :scheme, :path`
    pub const CHROME: PseudoOrder = PseudoOrder([
        PseudoId::Method,
        PseudoId::Authority,
        PseudoId::Scheme,
        PseudoId::Path,
    ]);

    /// Firefox: `:method, :path, :authority, :scheme`
    pub const FIREFOX: PseudoOrder = PseudoOrder([
        PseudoId::Method,
        PseudoId::Path,
        PseudoId::Authority,
        PseudoId::Scheme,
    ]);

    /// Safari: `:method, :scheme, :path, :authority`
    pub const SAFARI: PseudoOrder = PseudoOrder([
        PseudoId::Method,
        PseudoId::Scheme,
        PseudoId::Path,
        PseudoId::Authority,
    ]);

    /// Order emitted by the `h2` crate when nothing is configured.
    pub const PROTOCOL_DEFAULT: PseudoOrder = PseudoOrder([
        PseudoId::Method,
        PseudoId::Scheme,
        PseudoId::Authority,
        PseudoId::Path,
    ]);

    /// Build an order, rejecting duplicates.
    pub fn new(order: [PseudoId; 4]) -> Result<Self, ProfileError> {
        for (i, id) in order.iter().enumerate() {
            if order[..i].contains(id) {
                return Err(ProfileError::invalid(
                    "pseudo-order",
                    format!("pseudo-header {id} listed twice"),
                ));
            }
        }
        Ok(Self(order))
    }

    /// Parse from pseudo-header names such as `[":method", ":path", ...]`.
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Result<Self, ProfileError> {
        if names.len() != 4 {
            return Err(ProfileError::invalid(
                "pseudo-order",
                format!("expected 4 pseudo-headers, got {}", names.len()),
            ));
        }
        let mut order = [PseudoId::Method; 4];
        for (slot, name) in order.iter_mut().zip(names) {
            *slot = name
                .as_ref()
                .parse()
                .map_err(|e: ProfileError| ProfileError::invalid("pseudo-order", e.to_string()))?;
        }
        Self::new(order)
    }

    pub fn as_array(&self) -> &[PseudoId; 4] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = PseudoId> + '_ {
        self.0.iter().copied()
    }

    /// Akamai fingerprint segment, e.g. `m,a,s,p`.
    pub fn fingerprint(&self) -> String {
        self.0
            .iter()
            .map(|id| &id.as_str()[1..2])
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl Default for PseudoOrder {
    fn default() -> Self {
        PseudoOrder::PROTOCOL_DEFAULT
    }
}

impl TryFrom<Vec<String>> for PseudoOrder {
    type Error = ProfileError;

    fn try_from(names: Vec<String>) -> Result<Self, Self::Error> {
        PseudoOrder::from_names(&names)
    }
}

impl From<PseudoOrder> for Vec<String> {
    fn from(order: PseudoOrder) -> Self {
        order.iter().map(|id| id.as_str().to_string()).collect()
    }
}

/// HTTP/2 stream priority (RFC 9113 §5.3 / §6.2).
///
/// `weight` is the wire value (0-255), i.e. effective weight minus one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PriorityParam {
    pub stream_dependency: u32,
    pub exclusive: bool,
    pub weight: u8,
}

impl PriorityParam {
    pub const fn new(stream_dependency: u32, exclusive: bool, weight: u8) -> Self {
        Self {
            stream_dependency,
            exclusive,
            weight,
        }
    }

    /// Chrome: exclusive dependency on the root with the highest weight.
    pub const fn chrome() -> Self {
        Self::new(0, true, 255)
    }

    /// Firefox: depends on its idle "follower" group stream 13, weight 42.
    pub const fn firefox() -> Self {
        Self::new(13, false, 41)
    }

    /// Safari: non-exclusive dependency on the root, weight 256.
    pub const fn safari() -> Self {
        Self::new(0, false, 255)
    }

    pub fn validate(&self, profile: &str) -> Result<(), ProfileError> {
        if self.stream_dependency > MAX_STREAM_ID {
            return Err(ProfileError::invalid(
                profile,
                format!(
                    "stream dependency {} exceeds 31 bits",
                    self.stream_dependency
                ),
            ));
        }
        Ok(())
    }

    /// The 5-byte priority block used by PRIORITY frames and HEADERS with
    /// the PRIORITY flag.
    pub fn to_bytes(&self) -> [u8; 5] {
        let mut dep = self.stream_dependency & MAX_STREAM_ID;
        if self.exclusive {
            dep |= 0x8000_0000;
        }
        let d = dep.to_be_bytes();
        [d[0], d[1], d[2], d[3], self.weight]
    }

    /// Encode a standalone PRIORITY frame for `stream_id`.
    pub fn encode_frame(&self, stream_id: u32) -> Bytes {
        let mut buf = BytesMut::with_capacity(9 + 5);
        put_frame_header(&mut buf, 5, FRAME_TYPE_PRIORITY, 0, stream_id);
        buf.put_slice(&self.to_bytes());
        buf.freeze()
    }
}

impl Default for PriorityParam {
    /// RFC 9113 default: depends on stream 0, non-exclusive, weight 16.
    fn default() -> Self {
        Self::new(0, false, 15)
    }
}

/// Validate a connection-level WINDOW_UPDATE increment.
///
/// Zero is accepted and means no WINDOW_UPDATE frame is sent.
pub fn validate_window_increment(profile: &str, increment: u32) -> Result<(), ProfileError> {
    if increment > MAX_WINDOW_INCREMENT {
        return Err(ProfileError::invalid(
            profile,
            format!("window increment {increment} exceeds 2^31-1"),
        ));
    }
    Ok(())
}

/// The client side of the HTTP/2 connection preface after the magic string:
/// SETTINGS, then the optional connection WINDOW_UPDATE.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct H2Preface {
    pub settings: H2Settings,
    pub window_increment: u32,
    /// Priority for the first request stream (sent on its HEADERS frame).
    pub first_stream_priority: PriorityParam,
}

impl H2Preface {
    /// The client connection preface magic (RFC 9113 §3.4).
    pub const MAGIC: &'static [u8] = b"PRI * HTTP/2.0\r\n\r\nSM\r\n\r\n";

    /// Encode SETTINGS followed by WINDOW_UPDATE (when non-zero).
    pub fn encode(&self) -> Bytes {
        let settings_len = self.settings.len() * 6;
        let mut buf = BytesMut::with_capacity(9 + settings_len + 13);

        put_frame_header(&mut buf, settings_len as u32, FRAME_TYPE_SETTINGS, 0, 0);
        for setting in &self.settings {
            buf.put_u16(setting.id.code());
            buf.put_u32(setting.value);
        }

        if self.window_increment > 0 {
            put_frame_header(&mut buf, 4, FRAME_TYPE_WINDOW_UPDATE, 0, 0);
            buf.put_u32(self.window_increment & MAX_WINDOW_INCREMENT);
        }

        buf.freeze()
    }

    /// Akamai-style HTTP/2 fingerprint: `settings|window|priority|pseudo`.
    ///
    /// The priority segment is `0` since no standalone PRIORITY frames are sent.
    pub fn fingerprint(&self, pseudo: &PseudoOrder) -> String {
        format!(
            "{}|{}|0|{}",
            self.settings.fingerprint(),
            self.window_increment,
            pseudo.fingerprint()
        )
    }
}

fn put_frame_header(buf: &mut BytesMut, len: u32, kind: u8, flags: u8, stream_id: u32) {
    buf.put_uint(u64::from(len), 3);
    buf.put_u8(kind);
    buf.put_u8(flags);
    buf.put_u32(stream_id & MAX_STREAM_ID);
}
