//! Tuple-comparison fast path.

use std::fmt;
use std::marker::PhantomData;

use crate::builder::{CursorDirection, FilterExpr, Operator, RowFilter, SortDir, Value};
use crate::codec::CodecRegistry;

use super::key::{KeyColumn, NonNull, SortKey};
use super::spec::check_keys;
use super::{Seek, SpecError};

mod sealed {
    #[allow(unreachable_pub)]
    pub trait Sealed {}
    impl Sealed for super::Ascending {}
    impl Sealed for super::Descending {}
}

/// Type-level sort direction shared by every key of a [`UniformSeek`].
pub trait UniformDirection: sealed::Sealed {
    /// The direction as a value.
    const DIR: SortDir;
}

/// Every key ascending.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ascending;

/// Every key descending.
#[derive(Debug, Clone, Copy, Default)]
pub struct Descending;

impl UniformDirection for Ascending {
    const DIR: SortDir = SortDir::Asc;
}

impl UniformDirection for Descending {
    const DIR: SortDir = SortDir::Desc;
}

/// Seek strategy rendering one row-value comparison.
///
/// The direction is part of the type and keys carry no direction of
/// their own, so mixed directions cannot be expressed. Key types must
/// implement [`NonNull`]:
///
/// ```
/// use seek_sql::{CodecRegistry, CursorDirection, Seek, UniformSeek, Value, postgres};
///
/// struct Event { created_at: String, id: i64 }
///
/// let registry = CodecRegistry::with_defaults();
/// let seek = UniformSeek::descending(&registry)
///     .key("created_at", |e: &Event| e.created_at.clone())
///     .key("id", |e: &Event| e.id)
///     .build()
///     .unwrap();
///
/// let predicate = seek.boundary(
///     CursorDirection::Forward,
///     &[Value::from("2024-01-15"), Value::Int(42)],
/// );
/// let sql = postgres("events").filter_expr(predicate).build().sql;
/// assert_eq!(sql, "SELECT * FROM events WHERE (created_at, id) < ($1, $2)");
/// ```
///
/// A nullable key does not compile:
///
/// ```compile_fail
/// use seek_sql::{CodecRegistry, UniformSeek};
///
/// struct User { email: Option<String> }
///
/// let registry = CodecRegistry::with_defaults();
/// let _ = UniformSeek::ascending(&registry).key("email", |u: &User| u.email.clone());
/// ```
pub struct UniformSeek<R, D> {
    keys: Vec<KeyColumn<R>>,
    _dir: PhantomData<fn() -> D>,
}

impl<R> UniformSeek<R, Ascending> {
    /// Start an all-ascending seek.
    pub fn ascending(registry: &CodecRegistry) -> UniformSeekBuilder<'_, R, Ascending> {
        UniformSeekBuilder::new(registry)
    }
}

impl<R> UniformSeek<R, Descending> {
    /// Start an all-descending seek.
    pub fn descending(registry: &CodecRegistry) -> UniformSeekBuilder<'_, R, Descending> {
        UniformSeekBuilder::new(registry)
    }
}

impl<R, D: UniformDirection> UniformSeek<R, D> {
    /// Comparison operator for a traversal direction.
    const fn operator(direction: CursorDirection) -> Operator {
        match (D::DIR, direction) {
            (SortDir::Asc, CursorDirection::Forward) | (SortDir::Desc, CursorDirection::Backward) => {
                Operator::Gt
            },
            (SortDir::Asc, CursorDirection::Backward) | (SortDir::Desc, CursorDirection::Forward) => {
                Operator::Lt
            },
        }
    }
}

impl<R, D> Clone for UniformSeek<R, D> {
    fn clone(&self) -> Self {
        Self {
            keys: self.keys.clone(),
            _dir: PhantomData,
        }
    }
}

impl<R, D> fmt::Debug for UniformSeek<R, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UniformSeek")
            .field("direction", &std::any::type_name::<D>())
            .field("keys", &self.keys)
            .finish()
    }
}

impl<R, D: UniformDirection> Seek for UniformSeek<R, D> {
    type Row = R;

    fn keys(&self) -> &[KeyColumn<R>] {
        &self.keys
    }

    fn boundary(&self, direction: CursorDirection, values: &[Value]) -> FilterExpr {
        if self.keys.is_empty() || values.is_empty() {
            return FilterExpr::TRUE;
        }
        FilterExpr::Row(RowFilter {
            fields: self.keys.iter().map(|key| key.column().to_string()).collect(),
            op: Self::operator(direction),
            values: values.to_vec(),
        })
    }
}

/// Builder for [`UniformSeek`].
pub struct UniformSeekBuilder<'a, R, D> {
    registry: &'a CodecRegistry,
    keys: Vec<KeyColumn<R>>,
    error: Option<SpecError>,
    _dir: PhantomData<fn() -> D>,
}

impl<'a, R, D> UniformSeekBuilder<'a, R, D> {
    const fn new(registry: &'a CodecRegistry) -> Self {
        Self {
            registry,
            keys: Vec::new(),
            error: None,
            _dir: PhantomData,
        }
    }
}

impl<R: 'static, D: UniformDirection> UniformSeekBuilder<'_, R, D> {
    /// Append a non-null key sorted in direction `D`.
    ///
    /// # Panics
    ///
    /// Panics if `column` is not a valid column reference.
    pub fn key<T, F>(mut self, column: impl Into<String>, extract: F) -> Self
    where
        T: NonNull + Into<Value> + 'static,
        F: Fn(&R) -> T + Send + Sync + 'static,
    {
        let key = SortKey::new(column, extract);
        let key = match D::DIR {
            SortDir::Asc => key.asc(),
            SortDir::Desc => key.desc(),
        };
        if self.error.is_none() {
            match key.resolve(self.registry) {
                Ok(column) => self.keys.push(column),
                Err(err) => self.error = Some(err),
            }
        }
        self
    }

    /// Finish the seek.
    pub fn build(self) -> Result<UniformSeek<R, D>, SpecError> {
        if let Some(err) = self.error {
            return Err(err);
        }
        check_keys(&self.keys)?;
        Ok(UniformSeek {
            keys: self.keys,
            _dir: PhantomData,
        })
    }
}

impl<R, D> fmt::Debug for UniformSeekBuilder<'_, R, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UniformSeekBuilder")
            .field("keys", &self.keys)
            .field("error", &self.error)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::SortField;
    use crate::{SeekSpec, sqlite};

    struct Row {
        name: String,
        id: i64,
    }

    fn asc() -> UniformSeek<Row, Ascending> {
        UniformSeek::ascending(&CodecRegistry::with_defaults())
            .key("name", |r: &Row| r.name.clone())
            .key("id", |r: &Row| r.id)
            .build()
            .unwrap()
    }

    fn values() -> Vec<Value> {
        vec![Value::from("Bob"), Value::Int(2)]
    }

    #[test]
    fn test_operator_table() {
        assert_eq!(UniformSeek::<Row, Ascending>::operator(CursorDirection::Forward), Operator::Gt);
        assert_eq!(UniformSeek::<Row, Ascending>::operator(CursorDirection::Backward), Operator::Lt);
        assert_eq!(UniformSeek::<Row, Descending>::operator(CursorDirection::Forward), Operator::Lt);
        assert_eq!(UniformSeek::<Row, Descending>::operator(CursorDirection::Backward), Operator::Gt);
    }

    #[test]
    fn test_row_predicate() {
        let expr = asc().boundary(CursorDirection::Backward, &values());
        assert_eq!(
            sqlite("users").filter_expr(expr).build().sql,
            "SELECT * FROM users WHERE (name, id) < (?1, ?2)"
        );
    }

    #[test]
    fn test_first_page_has_no_predicate() {
        assert_eq!(asc().boundary(CursorDirection::Forward, &[]), FilterExpr::TRUE);
    }

    #[test]
    fn test_uniform_ordering() {
        let seek = asc();
        let forward: Vec<String> =
            seek.ordering(CursorDirection::Forward).iter().map(SortField::to_sql).collect();
        let backward: Vec<String> =
            seek.ordering(CursorDirection::Backward).iter().map(SortField::to_sql).collect();
        assert_eq!(forward, ["name ASC", "id ASC"]);
        assert_eq!(backward, ["name DESC", "id DESC"]);
    }

    #[test]
    fn test_same_ordering_as_general_engine() {
        let registry = CodecRegistry::with_defaults();
        let general = SeekSpec::builder(&registry)
            .key(crate::SortKey::new("name", |r: &Row| r.name.clone()))
            .key(crate::SortKey::new("id", |r: &Row| r.id))
            .build()
            .unwrap();
        for direction in [CursorDirection::Forward, CursorDirection::Backward] {
            assert_eq!(general.ordering(direction), asc().ordering(direction));
        }
    }

    #[test]
    fn test_duplicate_key_rejected() {
        let err = UniformSeek::descending(&CodecRegistry::with_defaults())
            .key("id", |r: &Row| r.id)
            .key("id", |r: &Row| r.id)
            .build()
            .unwrap_err();
        assert_eq!(err, SpecError::DuplicateColumn("id".into()));
    }
}
