//! Cursor environment: sequence codec, direction tag and decorator chain.

use std::fmt;
use std::sync::Arc;

use crate::builder::CursorDirection;
use crate::config::PageConfig;

use super::decorator::{Base64Url, CursorDecorator};
use super::error::CursorError;
use super::value::Encoded;

/// Joins the encoded sort-key values of one row into a single payload.
pub trait SequenceCodec: Send + Sync + fmt::Debug {
    /// Encode an ordered value sequence.
    fn encode(&self, values: &[Encoded]) -> Result<String, CursorError>;

    /// Decode a payload produced by [`encode`](Self::encode).
    fn decode(&self, payload: &str) -> Result<Vec<Encoded>, CursorError>;
}

/// Sequence codec producing a compact JSON array.
#[derive(Debug, Clone, Copy, Default)]
#[non_exhaustive]
pub struct JsonSequence;

impl SequenceCodec for JsonSequence {
    fn encode(&self, values: &[Encoded]) -> Result<String, CursorError> {
        serde_json::to_string(values).map_err(|_| CursorError::InvalidFormat)
    }

    fn decode(&self, payload: &str) -> Result<Vec<Encoded>, CursorError> {
        serde_json::from_str(payload).map_err(|_| CursorError::InvalidFormat)
    }
}

/// A successfully parsed cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedCursor {
    /// Traversal direction the cursor was issued for.
    pub direction: CursorDirection,
    /// Encoded sort-key values of the boundary row, in key order.
    pub values: Vec<Encoded>,
}

/// Turns `(direction, values)` into an opaque cursor string and back.
///
/// The payload is the direction tag (`>` forward, `<` backward) followed by
/// the sequence codec output; decorators then run over the whole payload.
///
/// ```
/// use seek_sql::{CursorDirection, CursorEnv, Encoded, Signed};
///
/// let env = CursorEnv::default().decorate(Signed::new("server secret"));
/// let values = vec![Encoded::from("Bob"), Encoded::from(2)];
///
/// let cursor = env.encode(CursorDirection::Backward, &values).unwrap();
/// let decoded = env.decode(&cursor).unwrap();
/// assert_eq!(decoded.direction, CursorDirection::Backward);
/// assert_eq!(decoded.values, values);
/// ```
#[derive(Debug, Clone)]
pub struct CursorEnv {
    sequence: Arc<dyn SequenceCodec>,
    decorators: Vec<Arc<dyn CursorDecorator>>,
    max_cursor_size: usize,
    max_cursor_values: usize,
}

impl Default for CursorEnv {
    /// JSON payload, base64url transport, default limits.
    fn default() -> Self {
        Self::plain().decorate(Base64Url)
    }
}

impl CursorEnv {
    /// JSON payload with no decorators. Cursors are human-readable.
    #[must_use]
    pub fn plain() -> Self {
        let config = PageConfig::default();
        Self {
            sequence: Arc::new(JsonSequence),
            decorators: Vec::new(),
            max_cursor_size: config.max_cursor_size,
            max_cursor_values: config.max_cursor_values,
        }
    }

    /// Append a decorator; it runs after the existing ones on encode.
    #[must_use]
    pub fn decorate<D: CursorDecorator + 'static>(mut self, decorator: D) -> Self {
        self.decorators.push(Arc::new(decorator));
        self
    }

    /// Replace the sequence codec.
    #[must_use]
    pub fn with_sequence<C: SequenceCodec + 'static>(mut self, codec: C) -> Self {
        self.sequence = Arc::new(codec);
        self
    }

    /// Set the size and value-count limits.
    #[must_use]
    pub fn with_limits(mut self, max_cursor_size: usize, max_cursor_values: usize) -> Self {
        self.max_cursor_size = max_cursor_size;
        self.max_cursor_values = max_cursor_values;
        self
    }

    /// Take the limits from a [`PageConfig`].
    #[must_use]
    pub fn with_config(self, config: &PageConfig) -> Self {
        self.with_limits(config.max_cursor_size, config.max_cursor_values)
    }

    /// Maximum accepted cursor length in bytes.
    pub const fn max_cursor_size(&self) -> usize {
        self.max_cursor_size
    }

    /// Maximum number of values a cursor may carry.
    pub const fn max_cursor_values(&self) -> usize {
        self.max_cursor_values
    }

    /// Decorator names in encode order.
    pub fn decorator_names(&self) -> Vec<&'static str> {
        self.decorators.iter().map(|d| d.name()).collect()
    }

    /// Encode a cursor.
    ///
    /// Fails with a limit error when the result could not be decoded again
    /// under this environment's limits.
    pub fn encode(
        &self,
        direction: CursorDirection,
        values: &[Encoded],
    ) -> Result<String, CursorError> {
        if values.len() > self.max_cursor_values {
            return Err(CursorError::TooManyValues {
                found: values.len(),
                max: self.max_cursor_values,
            });
        }

        let mut payload = String::new();
        payload.push(direction.tag());
        payload.push_str(&self.sequence.encode(values)?);

        let cursor = self
            .decorators
            .iter()
            .fold(payload, |inner, decorator| decorator.wrap(inner));

        if cursor.len() > self.max_cursor_size {
            return Err(CursorError::TooLarge {
                len: cursor.len(),
                max: self.max_cursor_size,
            });
        }
        Ok(cursor)
    }

    /// Decode a cursor.
    pub fn decode(&self, cursor: &str) -> Result<DecodedCursor, CursorError> {
        // Size check before any decoding work
        if cursor.len() > self.max_cursor_size {
            return Err(CursorError::TooLarge {
                len: cursor.len(),
                max: self.max_cursor_size,
            });
        }

        let mut payload = cursor.to_string();
        for decorator in self.decorators.iter().rev() {
            payload = decorator.unwrap(&payload).inspect_err(|err| {
                tracing::debug!(
                    decorator = decorator.name(),
                    error = %err,
                    "cursor layer rejected"
                );
            })?;
        }

        let mut chars = payload.chars();
        let direction = chars
            .next()
            .and_then(CursorDirection::from_tag)
            .ok_or(CursorError::InvalidFormat)?;
        let values = self.sequence.decode(chars.as_str())?;

        if values.len() > self.max_cursor_values {
            return Err(CursorError::TooManyValues {
                found: values.len(),
                max: self.max_cursor_values,
            });
        }

        Ok(DecodedCursor { direction, values })
    }

    /// Decode an optional cursor.
    ///
    /// `None` and the empty string mean "first page" and yield `Ok(None)`.
    /// Any other input must decode; a bad cursor is never treated as absent.
    pub fn decode_with_direction(
        &self,
        cursor: Option<&str>,
    ) -> Result<Option<DecodedCursor>, CursorError> {
        match cursor {
            None | Some("") => Ok(None),
            Some(cursor) => self.decode(cursor).map(Some),
        }
    }
}
