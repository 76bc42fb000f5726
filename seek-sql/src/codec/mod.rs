//! Cursor codecs.
//!
//! A cursor is assembled in three layers:
//!
//! 1. each sort-key value is turned into an [`Encoded`] value by the
//!    [`ValueCodec`] registered for its type in a [`CodecRegistry`];
//! 2. the ordered values are joined into one payload by a [`SequenceCodec`]
//!    and prefixed with the traversal direction tag;
//! 3. the payload runs through the [`CursorDecorator`] chain (base64,
//!    signing, ...), and the reverse chain on the way back in.
//!
//! [`CursorEnv`] owns layers 2 and 3.

mod decorator;
mod env;
mod error;
mod value;

pub use decorator::{Base64Url, Chain, CursorDecorator, Signed};
pub use env::{CursorEnv, DecodedCursor, JsonSequence, SequenceCodec};
pub use error::CursorError;
pub use value::{CodecRegistry, Encoded, FnCodec, SerdeCodec, ValueCodec};
