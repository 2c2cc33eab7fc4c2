//! `multipart/form-data` framing with a browser-format boundary.
//!
//! [`Form`] only frames parts; it never reads files or streams bodies. The
//! boundary comes from the client's [`BoundaryGenerator`], and field names
//! are escaped the way browsers escape them (`"`, CR and LF become
//! `%22`, `%0D` and `%0A`).
//!
//! ```
//! use wiremask::http::multipart::Form;
//! use wiremask::http::BoundaryGenerator;
//!
//! let body = Form::generate(&BoundaryGenerator::webkit())?
//!     .text("q", "rust")
//!     .file("upload", "a.txt", "text/plain", b"hello")
//!     .finish();
//! assert!(body.starts_with(b"------WebKitFormBoundary"));
//! # Ok::<(), wiremask::ProfileError>(())
//! ```

use crate::base::profileerror::ProfileError;
use crate::http::boundary::BoundaryGenerator;
use bytes::{BufMut, Bytes, BytesMut};
use std::borrow::Cow;

/// A `multipart/form-data` body under construction.
#[derive(Debug)]
pub struct Form {
    boundary: String,
    body: BytesMut,
    parts: usize,
}

impl Form {
    /// Empty form framed by `boundary`.
    pub fn new(boundary: impl Into<String>) -> Self {
        Self {
            boundary: boundary.into(),
            body: BytesMut::new(),
            parts: 0,
        }
    }

    /// Empty form with a fresh boundary from `generator`.
    pub fn generate(generator: &BoundaryGenerator) -> Result<Self, ProfileError> {
        Ok(Self::new(generator.generate()?))
    }

    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    /// Value for the request's `Content-Type` header.
    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }

    /// Number of parts framed so far.
    pub fn parts(&self) -> usize {
        self.parts
    }

    /// Append a plain field. Browsers send these without a Content-Type.
    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.open_part(name, None, None);
        self.close_part(value.as_bytes());
        self
    }

    /// Append a file field.
    pub fn file(mut self, name: &str, file_name: &str, content_type: &str, data: &[u8]) -> Self {
        self.open_part(name, Some(file_name), Some(content_type));
        self.close_part(data);
        self
    }

    /// Close the form and return the body. A form without parts is empty.
    pub fn finish(mut self) -> Bytes {
        if self.parts == 0 {
            return Bytes::new();
        }
        self.put_delimiter();
        self.body.put_slice(b"--\r\n");
        self.body.freeze()
    }

    fn put_delimiter(&mut self) {
        self.body.put_slice(b"--");
        self.body.put_slice(self.boundary.as_bytes());
    }

    fn open_part(&mut self, name: &str, file_name: Option<&str>, content_type: Option<&str>) {
        self.put_delimiter();
        self.body.put_slice(b"\r\nContent-Disposition: form-data; name=\"");
        self.body.put_slice(escape_field(name).as_bytes());
        self.body.put_u8(b'"');
        if let Some(file_name) = file_name {
            self.body.put_slice(b"; filename=\"");
            self.body.put_slice(escape_field(file_name).as_bytes());
            self.body.put_u8(b'"');
        }
        self.body.put_slice(b"\r\n");
        if let Some(content_type) = content_type {
            self.body.put_slice(b"Content-Type: ");
            self.body.put_slice(content_type.as_bytes());
            self.body.put_slice(b"\r\n");
        }
        self.body.put_slice(b"\r\n");
    }

    fn close_part(&mut self, data: &[u8]) {
        self.body.put_slice(data);
        self.body.put_slice(b"\r\n");
        self.parts += 1;
    }
}

fn escape_field(s: &str) -> Cow<'_, str> {
    if !s.contains(['"', '\r', '\n']) {
        return Cow::Borrowed(s);
    }
    let mut escaped = String::with_capacity(s.len() + 6);
    for c in s.chars() {
        match c {
            '"' => escaped.push_str("%22"),
            '\r' => escaped.push_str("%0D"),
            '\n' => escaped.push_str("%0A"),
            c => escaped.push(c),
        }
    }
    Cow::Owned(escaped)
}
