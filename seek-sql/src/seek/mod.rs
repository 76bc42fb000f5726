//! Seek strategies: how a boundary tuple becomes a predicate and an ordering.
//!
//! Two strategies implement [`Seek`]:
//!
//! - [`SeekSpec`], the general engine. Keys may mix directions and may be
//!   nullable; the predicate is the expanded lexicographic disjunction.
//! - [`UniformSeek`], the tuple fast path. Every key is non-null and shares
//!   one direction fixed by a type parameter, so the predicate is a single
//!   row-value comparison `(a, b) > ($1, $2)`.

mod key;
mod spec;
mod tuple;

pub use key::{KeyColumn, NonNull, SortKey};
pub use spec::{SeekSpec, SeekSpecBuilder, keyset_predicate};
pub use tuple::{Ascending, Descending, UniformDirection, UniformSeek, UniformSeekBuilder};

use crate::builder::{CursorDirection, FilterExpr, SortField, Value};
use crate::codec::{CursorError, Encoded};

/// Errors building a seek strategy.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum SpecError {
    /// No codec is registered for a key's value type.
    #[error("no codec registered for `{type_name}` (sort key `{column}`)")]
    MissingCodec {
        /// The key's column.
        column: String,
        /// The key's value type.
        type_name: &'static str,
    },

    /// No sort keys were added.
    #[error("seek has no sort keys")]
    Empty,

    /// The same column was added twice.
    #[error("sort key `{0}` appears more than once")]
    DuplicateColumn(String),
}

/// A total order over rows of type `Row`, and how to seek past a boundary in it.
///
/// The last key (or keys) should be unique across rows; otherwise rows that
/// tie on every key can be skipped or repeated between pages.
pub trait Seek {
    /// The row type keys are read from.
    type Row;

    /// The resolved keys, highest priority first.
    fn keys(&self) -> &[KeyColumn<Self::Row>];

    /// Predicate selecting rows strictly after `values` in the order
    /// traversed in `direction`.
    fn boundary(&self, direction: CursorDirection, values: &[Value]) -> FilterExpr;

    /// `ORDER BY` items for traversing in `direction`.
    fn ordering(&self, direction: CursorDirection) -> Vec<SortField> {
        self.keys().iter().map(|key| key.sort_field(direction)).collect()
    }

    /// Encoded key values of a row, in key order.
    fn encode_row(&self, row: &Self::Row) -> Vec<Encoded> {
        self.keys().iter().map(|key| key.encode(row)).collect()
    }

    /// Decode a cursor's values against the keys.
    ///
    /// The value count must match the key count exactly, and every value
    /// must fit its key's codec.
    fn decode_values(&self, encoded: &[Encoded]) -> Result<Vec<Value>, CursorError> {
        let keys = self.keys();
        if encoded.len() != keys.len() {
            return Err(CursorError::ArityMismatch {
                expected: keys.len(),
                found: encoded.len(),
            });
        }
        keys.iter()
            .zip(encoded)
            .map(|(key, value)| {
                key.decode(value).ok_or_else(|| CursorError::TypeMismatch {
                    column: key.column().to_string(),
                })
            })
            .collect()
    }
}
