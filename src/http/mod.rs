//! HTTP wire-shape primitives consumed by the request-encoding path.
//!
//! - [`h2settings`]: ordered SETTINGS parameters
//! - [`h2fingerprint`]: pseudo-header order, stream priority, preface frames
//! - [`orderedheaders`]: header ordering policy
//! - [`boundary`] / [`multipart`]: browser-format multipart bodies

pub mod boundary;
pub mod h2fingerprint;
pub mod h2settings;
pub mod multipart;
pub mod orderedheaders;

// Re-exports for convenience
pub use boundary::{BoundaryGenerator, BoundaryStyle};
pub use h2fingerprint::{H2Preface, PriorityParam, PseudoId, PseudoOrder};
pub use h2settings::{H2Settings, Setting, SettingId};
pub use orderedheaders::{order_headers, HeaderField, HeaderOrder, OrderedHeaderMap};
