//! General seek engine.

use std::collections::HashSet;
use std::fmt;

use crate::builder::{
    CursorDirection, Filter, FilterExpr, NullOrder, Operator, SortDir, SortField, Value,
};
use crate::codec::CodecRegistry;

use super::key::{KeyColumn, SortKey};
use super::{Seek, SpecError};

/// Predicate selecting rows strictly after `values` in `ordering`.
///
/// `ordering` is the effective ordering (already reversed for backward
/// traversal) and `values` the boundary tuple, one value per item. Built
/// by a right-to-left fold starting from `FALSE`:
///
/// ```text
/// acc = FALSE
/// for i in (0..n).rev():
///     acc = after_i OR (eq_i AND acc)
/// ```
///
/// so the first key ends up as the outermost disjunct. An item whose
/// `nulls` is `None` is a non-null column and gets no `NULL` handling.
/// With no items or no values the predicate is `TRUE`.
///
/// ```
/// use seek_sql::{FilterExpr, SortDir, SortField, Value, keyset_predicate, sqlite};
///
/// let ordering = [SortField::new("name", SortDir::Asc), SortField::new("id", SortDir::Asc)];
/// let predicate = keyset_predicate(&ordering, &[Value::from("Bob"), Value::Int(2)]);
///
/// let sql = sqlite("users").filter_expr(predicate).build().sql;
/// assert_eq!(sql, "SELECT * FROM users WHERE (name > ?1 OR (name = ?2 AND id > ?3))");
/// assert_eq!(keyset_predicate(&ordering, &[]), FilterExpr::TRUE);
/// ```
pub fn keyset_predicate(ordering: &[SortField], values: &[Value]) -> FilterExpr {
    if ordering.is_empty() || values.is_empty() {
        return FilterExpr::TRUE;
    }

    ordering
        .iter()
        .zip(values)
        .rev()
        .fold(FilterExpr::FALSE, |acc, (field, value)| {
            let (after, eq) = key_terms(field, value);
            after.either(eq.both(acc))
        })
}

/// `(after, eq)` conditions for one key against its boundary value.
fn key_terms(field: &SortField, value: &Value) -> (FilterExpr, FilterExpr) {
    let column = field.field.as_str();
    let is_null = |op| FilterExpr::Simple(Filter::new(column, op, Value::Null));

    if value.is_null() {
        // NULL boundary: every non-null value is after it only when nulls come first
        let after = match field.effective_nulls() {
            NullOrder::First => is_null(Operator::Ne),
            NullOrder::Last => FilterExpr::FALSE,
        };
        return (after, is_null(Operator::Eq));
    }

    let op = match field.dir {
        SortDir::Asc => Operator::Gt,
        SortDir::Desc => Operator::Lt,
    };
    let cmp = FilterExpr::Simple(Filter::new(column, op, value.clone()));
    let after = match field.nulls {
        Some(NullOrder::Last) => cmp.either(is_null(Operator::Eq)),
        Some(NullOrder::First) | None => cmp,
    };
    let eq = FilterExpr::Simple(Filter::new(column, Operator::Eq, value.clone()));
    (after, eq)
}

/// General seek over rows of type `R`.
///
/// ```
/// use seek_sql::{CodecRegistry, CursorDirection, Seek, SeekSpec, SortKey};
///
/// struct Post { published_at: Option<String>, id: i64 }
///
/// let registry = CodecRegistry::with_defaults();
/// let spec = SeekSpec::builder(&registry)
///     .key(SortKey::nullable("published_at", |p: &Post| p.published_at.clone()).desc())
///     .key(SortKey::new("id", |p: &Post| p.id))
///     .build()
///     .unwrap();
///
/// let order: Vec<String> = spec
///     .ordering(CursorDirection::Forward)
///     .iter()
///     .map(|f| f.to_sql())
///     .collect();
/// assert_eq!(order, ["published_at DESC NULLS FIRST", "id ASC"]);
/// ```
pub struct SeekSpec<R> {
    keys: Vec<KeyColumn<R>>,
}

impl<R> SeekSpec<R> {
    /// Start building a seek whose codecs come from `registry`.
    pub fn builder(registry: &CodecRegistry) -> SeekSpecBuilder<'_, R> {
        SeekSpecBuilder {
            registry,
            keys: Vec::new(),
            error: None,
        }
    }
}

impl<R> Clone for SeekSpec<R> {
    fn clone(&self) -> Self {
        Self {
            keys: self.keys.clone(),
        }
    }
}

impl<R> fmt::Debug for SeekSpec<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SeekSpec").field("keys", &self.keys).finish()
    }
}

impl<R> Seek for SeekSpec<R> {
    type Row = R;

    fn keys(&self) -> &[KeyColumn<R>] {
        &self.keys
    }

    fn boundary(&self, direction: CursorDirection, values: &[Value]) -> FilterExpr {
        keyset_predicate(&self.ordering(direction), values)
    }
}

/// Builder for [`SeekSpec`]. The first error is kept and returned by
/// [`build`](Self::build).
pub struct SeekSpecBuilder<'a, R> {
    registry: &'a CodecRegistry,
    keys: Vec<KeyColumn<R>>,
    error: Option<SpecError>,
}

impl<R> SeekSpecBuilder<'_, R> {
    /// Append a key. Keys added first take priority.
    pub fn key<T>(mut self, key: SortKey<R, T>) -> Self {
        if self.error.is_some() {
            return self;
        }
        match key.resolve(self.registry) {
            Ok(column) => self.keys.push(column),
            Err(err) => self.error = Some(err),
        }
        self
    }

    /// Finish the seek.
    pub fn build(self) -> Result<SeekSpec<R>, SpecError> {
        if let Some(err) = self.error {
            return Err(err);
        }
        check_keys(&self.keys)?;
        Ok(SeekSpec { keys: self.keys })
    }
}

impl<R> fmt::Debug for SeekSpecBuilder<'_, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SeekSpecBuilder")
            .field("keys", &self.keys)
            .field("error", &self.error)
            .finish_non_exhaustive()
    }
}

pub(super) fn check_keys<R>(keys: &[KeyColumn<R>]) -> Result<(), SpecError> {
    if keys.is_empty() {
        return Err(SpecError::Empty);
    }
    let mut seen = HashSet::new();
    for key in keys {
        if !seen.insert(key.column()) {
            return Err(SpecError::DuplicateColumn(key.column().to_string()));
        }
    }
    Ok(())
}
