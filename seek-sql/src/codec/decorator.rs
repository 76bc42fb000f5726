//! String decorators applied to the assembled cursor.
//!
//! A decorator is a reversible transform of the cursor string. Decorators
//! are applied in registration order on encode and in reverse order on
//! decode, so any chain of invertible decorators round-trips exactly.

use std::fmt;

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use sha2::{Digest, Sha256};

use super::error::CursorError;

/// A reversible transform over the cursor string.
pub trait CursorDecorator: Send + Sync + fmt::Debug {
    /// Short name reported by [`CursorEnv::decorator_names`](crate::CursorEnv::decorator_names)
    /// and in cursor rejection events.
    fn name(&self) -> &'static str;

    /// Apply the transform.
    fn wrap(&self, inner: String) -> String;

    /// Reverse the transform, rejecting strings this decorator did not produce.
    fn unwrap(&self, outer: &str) -> Result<String, CursorError>;

    /// Compose with `next`, which is applied after `self` on encode.
    fn then<B: CursorDecorator>(self, next: B) -> Chain<Self, B>
    where
        Self: Sized,
    {
        Chain(self, next)
    }
}

/// Two decorators applied in sequence, see [`CursorDecorator::then`].
#[derive(Debug, Clone)]
pub struct Chain<A, B>(A, B);

impl<A: CursorDecorator, B: CursorDecorator> CursorDecorator for Chain<A, B> {
    fn name(&self) -> &'static str {
        "chain"
    }

    fn wrap(&self, inner: String) -> String {
        self.1.wrap(self.0.wrap(inner))
    }

    fn unwrap(&self, outer: &str) -> Result<String, CursorError> {
        self.0.unwrap(&self.1.unwrap(outer)?)
    }
}

/// URL-safe base64 without padding.
#[derive(Debug, Clone, Copy, Default)]
#[non_exhaustive]
pub struct Base64Url;

impl CursorDecorator for Base64Url {
    fn name(&self) -> &'static str {
        "base64url"
    }

    fn wrap(&self, inner: String) -> String {
        URL_SAFE_NO_PAD.encode(inner)
    }

    fn unwrap(&self, outer: &str) -> Result<String, CursorError> {
        let bytes = URL_SAFE_NO_PAD
            .decode(outer)
            .map_err(|_| CursorError::InvalidEncoding)?;
        String::from_utf8(bytes).map_err(|_| CursorError::InvalidEncoding)
    }
}

/// Length of the HMAC tag carried in the cursor, in bytes.
const TAG_LEN: usize = 16;
const BLOCK_LEN: usize = 64;

/// Appends a truncated HMAC-SHA256 tag: `<inner>.<hex tag>`.
///
/// Cursors stay readable by clients; the tag only detects modification.
#[derive(Clone)]
pub struct Signed {
    key: Vec<u8>,
}

impl Signed {
    /// Create a signer with a server-side secret.
    pub fn new(key: impl Into<Vec<u8>>) -> Self {
        Self { key: key.into() }
    }

    fn tag(&self, message: &str) -> String {
        let mac = hmac_sha256(&self.key, message.as_bytes());
        mac.iter().take(TAG_LEN).map(|b| format!("{b:02x}")).collect()
    }
}

impl fmt::Debug for Signed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signed").field("key", &"<redacted>").finish()
    }
}

impl CursorDecorator for Signed {
    fn name(&self) -> &'static str {
        "hmac-sha256"
    }

    fn wrap(&self, inner: String) -> String {
        let tag = self.tag(&inner);
        format!("{inner}.{tag}")
    }

    fn unwrap(&self, outer: &str) -> Result<String, CursorError> {
        let (inner, tag) = outer.rsplit_once('.').ok_or(CursorError::InvalidEncoding)?;
        if constant_time_eq(tag.as_bytes(), self.tag(inner).as_bytes()) {
            Ok(inner.to_string())
        } else {
            Err(CursorError::Tampered)
        }
    }
}

fn hmac_sha256(key: &[u8], message: &[u8]) -> Vec<u8> {
    let mut block = [0u8; BLOCK_LEN];
    if key.len() > BLOCK_LEN {
        for (dst, src) in block.iter_mut().zip(Sha256::digest(key)) {
            *dst = src;
        }
    } else {
        for (dst, src) in block.iter_mut().zip(key) {
            *dst = *src;
        }
    }

    let ipad: Vec<u8> = block.iter().map(|b| b ^ 0x36).collect();
    let opad: Vec<u8> = block.iter().map(|b| b ^ 0x5c).collect();

    let inner = Sha256::new().chain_update(&ipad).chain_update(message).finalize();
    Sha256::new()
        .chain_update(&opad)
        .chain_update(inner)
        .finalize()
        .to_vec()
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
