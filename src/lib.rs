//! # wiremask
//!
//! Browser impersonation profiles for Rust HTTP clients.
//!
//! Servers fingerprint clients from the static shape of what they send: the
//! TLS ClientHello, the HTTP/2 SETTINGS frame and WINDOW_UPDATE that open a
//! connection, the order of pseudo-headers and headers, the PRIORITY of the
//! request stream, even the format of a multipart boundary. `wiremask`
//! bundles all of these into named profiles captured from real browsers and
//! installs them on a client in one step.
//!
//! ## Features
//!
//! - **Profile Registry**: built-in Chrome, Edge, Firefox and Safari profiles,
//!   looked up by forgiving names (`"Chrome 120"`, `"chrome_120"`)
//! - **Profile Applicator**: atomically replaces a client's wire configuration
//! - **Header ordering**: pseudo-headers, profile order, defaults, then the rest
//! - **Multipart boundaries**: WebKit and Gecko formats from OS entropy
//! - **JSON definitions**: declare custom profiles in configuration (`json` feature)
//!
//! ## Quick Start
//!
//! ```
//! use wiremask::client::Client;
//!
//! let client = Client::new();
//! client.impersonate("chrome_120")?;
//!
//! let config = client.wire_config();
//! assert_eq!(config.window_increment, 15663105);
//! # Ok::<(), wiremask::ProfileError>(())
//! ```
//!
//! ## Modules
//!
//! - [`base`] - Error definitions
//! - [`client`] - Client handle, wire configuration and the applicator
//! - [`emulation`] - Profiles, the registry and profile definitions
//! - [`http`] - HTTP/2 fingerprint types, header ordering, multipart bodies
//! - [`tls`] - ClientHello templates referenced by profiles

pub mod base;
pub mod client;
pub mod emulation;
pub mod http;
pub mod tls;

pub use base::profileerror::ProfileError;
pub use client::{apply_profile, Client, ClientBuilder, ClientWireConfig, ConnectionPreface};
pub use emulation::{ImpersonationProfile, ProfileFactory, ProfileRegistry};
