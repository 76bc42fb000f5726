//! SQL dialects: placeholder syntax and list binding.
//!
//! Both supported engines accept row-value comparisons and explicit
//! `NULLS FIRST/LAST`, so seek predicates and orderings render the same
//! text everywhere; only parameters differ.

use crate::Value;

/// Database-specific parameter syntax.
pub trait Dialect: Clone + Copy {
    /// Short name used in log events.
    fn name(&self) -> &'static str;

    /// Placeholder for the 1-based parameter `idx` (`$1`, `?1`).
    fn param(&self, idx: usize) -> String;

    /// Whether an `IN` list binds as a single array parameter instead of
    /// one placeholder per element.
    fn binds_arrays(&self) -> bool;

    /// Parenthesized placeholders for `count` parameters starting at `start_idx`:
    /// `($1, $2)`.
    fn param_list(&self, count: usize, start_idx: usize) -> String {
        let params: Vec<String> = (start_idx..start_idx + count).map(|i| self.param(i)).collect();
        format!("({})", params.join(", "))
    }

    /// `field IN (...)` or its array form. Returns the fragment and its parameters.
    fn in_clause(&self, field: &str, values: &[Value], start_idx: usize) -> (String, Vec<Value>) {
        membership(self, field, values, start_idx, false)
    }

    /// `field NOT IN (...)` or its array form.
    fn not_in_clause(
        &self,
        field: &str,
        values: &[Value],
        start_idx: usize,
    ) -> (String, Vec<Value>) {
        membership(self, field, values, start_idx, true)
    }
}

fn membership<D: Dialect + ?Sized>(
    dialect: &D,
    field: &str,
    values: &[Value],
    start_idx: usize,
    negated: bool,
) -> (String, Vec<Value>) {
    if dialect.binds_arrays() {
        let op = if negated { "!= ALL" } else { "= ANY" };
        let sql = format!("{field} {op}({})", dialect.param(start_idx));
        (sql, vec![Value::Array(values.to_vec())])
    } else {
        let op = if negated { "NOT IN" } else { "IN" };
        let sql = format!("{field} {op} {}", dialect.param_list(values.len(), start_idx));
        (sql, values.to_vec())
    }
}

/// Postgres: `$n` placeholders, `IN` lists bound as arrays.
#[derive(Debug, Clone, Copy, Default)]
#[non_exhaustive]
pub struct Postgres;

impl Dialect for Postgres {
    #[inline]
    fn name(&self) -> &'static str {
        "postgres"
    }

    #[inline]
    fn param(&self, idx: usize) -> String {
        format!("${idx}")
    }

    #[inline]
    fn binds_arrays(&self) -> bool {
        true
    }
}

/// `SQLite`: `?n` placeholders, `IN` lists expanded.
#[derive(Debug, Clone, Copy, Default)]
#[non_exhaustive]
pub struct Sqlite;

impl Dialect for Sqlite {
    #[inline]
    fn name(&self) -> &'static str {
        "sqlite"
    }

    #[inline]
    fn param(&self, idx: usize) -> String {
        format!("?{idx}")
    }

    #[inline]
    fn binds_arrays(&self) -> bool {
        false
    }
}
