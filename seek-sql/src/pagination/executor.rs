//! The query-execution seam.

use crate::builder::{FilterExpr, SortField};

/// What the paginator asks an executor to run for one page.
#[derive(Debug, Clone, PartialEq)]
pub struct SeekPlan {
    /// Boundary predicate, ANDed with the executor's base filter.
    /// [`FilterExpr::TRUE`] on the first page.
    pub predicate: FilterExpr,
    /// Effective ordering, already reversed for backward traversal.
    pub ordering: Vec<SortField>,
    /// Row limit including the look-ahead row.
    pub limit: u32,
}

/// Runs page and count queries for the paginator.
///
/// Implementations own the base query (table, projection, base filters).
/// `fetch` applies the plan on top of it; `count` counts the base query
/// alone. Errors are passed through to the caller unchanged.
///
/// A SQL-backed executor typically renders with
/// [`QueryBuilder::seek`](crate::QueryBuilder::seek) and
/// [`QueryBuilder::build_count`](crate::QueryBuilder::build_count).
pub trait QueryExecutor {
    /// Row type produced by `fetch`.
    type Row;
    /// Execution error.
    type Error: std::error::Error + 'static;

    /// Fetch at most `plan.limit` rows matching the plan, in plan order.
    fn fetch(&self, plan: &SeekPlan) -> Result<Vec<Self::Row>, Self::Error>;

    /// Count every row of the base query.
    fn count(&self) -> Result<u64, Self::Error>;
}

impl<E: QueryExecutor + ?Sized> QueryExecutor for &E {
    type Row = E::Row;
    type Error = E::Error;

    fn fetch(&self, plan: &SeekPlan) -> Result<Vec<Self::Row>, Self::Error> {
        (**self).fetch(plan)
    }

    fn count(&self) -> Result<u64, Self::Error> {
        (**self).count()
    }
}
