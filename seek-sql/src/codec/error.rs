//! Cursor decode/encode errors.

/// Errors that can occur when encoding or decoding a cursor.
///
/// Every variant is a request-level error: a cursor that fails to decode is
/// never treated as "no cursor".
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum CursorError {
    /// The cursor string exceeds the configured maximum size.
    #[error("cursor exceeds maximum size ({len} bytes, limit {max})")]
    TooLarge {
        /// Length of the cursor in bytes.
        len: usize,
        /// Configured maximum.
        max: usize,
    },

    /// The cursor carries more values than allowed.
    #[error("cursor has too many values ({found}, max {max})")]
    TooManyValues {
        /// Values carried by the cursor.
        found: usize,
        /// Configured maximum.
        max: usize,
    },

    /// A decorator could not reverse its transport encoding (e.g. bad base64).
    #[error("invalid cursor encoding")]
    InvalidEncoding,

    /// A signing decorator rejected the cursor.
    #[error("cursor signature verification failed")]
    Tampered,

    /// The payload or its direction tag could not be parsed.
    #[error("invalid cursor format")]
    InvalidFormat,

    /// The cursor carries a different number of values than the sort keys.
    #[error("cursor carries {found} values, expected {expected}")]
    ArityMismatch {
        /// Number of sort keys.
        expected: usize,
        /// Values carried by the cursor.
        found: usize,
    },

    /// A value does not fit the codec declared for its column.
    #[error("cursor value for `{column}` does not match its declared type")]
    TypeMismatch {
        /// Column whose codec rejected the value.
        column: String,
    },
}

impl CursorError {
    /// Returns `true` if the cursor was malformed or stale.
    ///
    /// Includes `InvalidEncoding`, `InvalidFormat`, `ArityMismatch` and `TypeMismatch`.
    #[inline]
    #[must_use]
    pub const fn is_format_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidEncoding
                | Self::InvalidFormat
                | Self::ArityMismatch { .. }
                | Self::TypeMismatch { .. }
        )
    }

    /// Returns `true` if a decorator detected tampering.
    #[inline]
    #[must_use]
    pub const fn is_tamper_error(&self) -> bool {
        matches!(self, Self::Tampered)
    }

    /// Returns `true` if this is a size/limit error.
    ///
    /// Includes `TooLarge` and `TooManyValues`.
    #[inline]
    #[must_use]
    pub const fn is_limit_error(&self) -> bool {
        matches!(self, Self::TooLarge { .. } | Self::TooManyValues { .. })
    }
}
