//! In-memory executor.
//!
//! Evaluates [`FilterExpr`] trees against rows held in a `Vec`, with SQL's
//! three-valued logic: a comparison involving `NULL` is unknown, and only
//! rows whose predicate is definitely true are returned.

use std::cmp::Ordering;
use std::convert::Infallible;
use std::fmt;

use crate::builder::{
    CompoundFilter, Filter, FilterExpr, LogicalOp, NullOrder, Operator, RowFilter, SortDir,
    SortField, Value,
};

use super::executor::{QueryExecutor, SeekPlan};

type ColumnFn<R> = Box<dyn Fn(&R, &str) -> Value + Send + Sync>;

/// [`QueryExecutor`] over a vector of rows.
///
/// `column` reads a named column from a row; columns it does not know
/// should read as [`Value::Null`].
///
/// ```
/// use seek_sql::{FilterExpr, MemoryExecutor, QueryExecutor, SeekPlan, SortDir, SortField, Value};
///
/// let exec = MemoryExecutor::new(vec![3i64, 1, 2], |n: &i64, _col: &str| Value::Int(*n));
/// let plan = SeekPlan {
///     predicate: FilterExpr::TRUE,
///     ordering: vec![SortField::new("n", SortDir::Asc)],
///     limit: 2,
/// };
/// assert_eq!(exec.fetch(&plan).unwrap(), vec![1, 2]);
/// assert_eq!(exec.count().unwrap(), 3);
/// ```
pub struct MemoryExecutor<R> {
    rows: Vec<R>,
    column: ColumnFn<R>,
    filter: FilterExpr,
}

impl<R> MemoryExecutor<R> {
    /// Create an executor over `rows`.
    pub fn new<F>(rows: Vec<R>, column: F) -> Self
    where
        F: Fn(&R, &str) -> Value + Send + Sync + 'static,
    {
        Self {
            rows,
            column: Box::new(column),
            filter: FilterExpr::TRUE,
        }
    }

    /// Add a base filter, applied to both fetches and counts.
    pub fn with_filter(mut self, filter: FilterExpr) -> Self {
        self.filter = std::mem::replace(&mut self.filter, FilterExpr::TRUE).both(filter);
        self
    }

    /// The rows, in insertion order.
    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    /// Evaluate `expr` against `row`: `Some(true)`, `Some(false)`, or
    /// `None` when the result is unknown because of a `NULL`.
    pub fn evaluate(&self, row: &R, expr: &FilterExpr) -> Option<bool> {
        match expr {
            FilterExpr::Const(value) => Some(*value),
            FilterExpr::Simple(filter) => self.evaluate_filter(row, filter),
            FilterExpr::Compound(compound) => self.evaluate_compound(row, compound),
            FilterExpr::Row(filter) => self.evaluate_row(row, filter),
        }
    }

    fn evaluate_compound(&self, row: &R, compound: &CompoundFilter) -> Option<bool> {
        match compound.op {
            LogicalOp::And => {
                let mut result = Some(true);
                for expr in &compound.filters {
                    match self.evaluate(row, expr) {
                        Some(false) => return Some(false),
                        None => result = None,
                        Some(true) => {},
                    }
                }
                result
            },
            LogicalOp::Or => {
                let mut result = Some(false);
                for expr in &compound.filters {
                    match self.evaluate(row, expr) {
                        Some(true) => return Some(true),
                        None => result = None,
                        Some(false) => {},
                    }
                }
                result
            },
            // Rendered as `NOT (1=0)` when empty
            LogicalOp::Not => compound
                .filters
                .first()
                .map_or(Some(true), |expr| self.evaluate(row, expr).map(|b| !b)),
        }
    }

    fn evaluate_filter(&self, row: &R, filter: &Filter) -> Option<bool> {
        let left = (self.column)(row, &filter.field);
        match (filter.op, &filter.value) {
            (Operator::Eq, Value::Null) => Some(left.is_null()),
            (Operator::Ne, Value::Null) => Some(!left.is_null()),
            (Operator::In, Value::Array(values)) => contains(&left, values),
            (Operator::NotIn, Value::Array(values)) => contains(&left, values).map(|b| !b),
            (Operator::In, value) => left.compare(value).map(|o| o == Ordering::Equal),
            (Operator::NotIn, value) => left.compare(value).map(|o| o != Ordering::Equal),
            (Operator::Like, Value::String(pattern)) => match left {
                Value::String(text) => Some(like_match(&text, pattern)),
                Value::Null => None,
                _ => Some(false),
            },
            (Operator::Like, _) => None,
            (op, value) => left.compare(value).map(|o| op.accepts(o)),
        }
    }

    fn evaluate_row(&self, row: &R, filter: &RowFilter) -> Option<bool> {
        if filter.fields.is_empty() || filter.fields.len() != filter.values.len() {
            return Some(false);
        }
        for (field, value) in filter.fields.iter().zip(&filter.values) {
            let ordering = (self.column)(row, field).compare(value)?;
            if ordering != Ordering::Equal {
                return Some(filter.op.accepts(ordering));
            }
        }
        Some(filter.op.accepts(Ordering::Equal))
    }

    fn compare_rows(&self, a: &R, b: &R, ordering: &[SortField]) -> Ordering {
        for field in ordering {
            let left = (self.column)(a, &field.field);
            let right = (self.column)(b, &field.field);
            let nulls_first = field.effective_nulls() == NullOrder::First;
            let ordering = match (left.is_null(), right.is_null()) {
                (true, true) => Ordering::Equal,
                (true, false) if nulls_first => Ordering::Less,
                (true, false) => Ordering::Greater,
                (false, true) if nulls_first => Ordering::Greater,
                (false, true) => Ordering::Less,
                (false, false) => {
                    let ordering = left.compare(&right).unwrap_or(Ordering::Equal);
                    match field.dir {
                        SortDir::Asc => ordering,
                        SortDir::Desc => ordering.reverse(),
                    }
                },
            };
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    }

    fn matches(&self, row: &R, expr: &FilterExpr) -> bool {
        self.evaluate(row, expr) == Some(true)
    }
}

impl<R: Clone> QueryExecutor for MemoryExecutor<R> {
    type Row = R;
    type Error = Infallible;

    fn fetch(&self, plan: &SeekPlan) -> Result<Vec<R>, Infallible> {
        let predicate = self.filter.clone().both(plan.predicate.clone());
        let mut matched: Vec<&R> = self
            .rows
            .iter()
            .filter(|row| self.matches(row, &predicate))
            .collect();
        // Stable, so rows tying on every key keep insertion order
        matched.sort_by(|a, b| self.compare_rows(a, b, &plan.ordering));
        Ok(matched
            .into_iter()
            .take(plan.limit as usize)
            .cloned()
            .collect())
    }

    fn count(&self) -> Result<u64, Infallible> {
        Ok(self
            .rows
            .iter()
            .filter(|row| self.matches(row, &self.filter))
            .count() as u64)
    }
}

impl<R: fmt::Debug> fmt::Debug for MemoryExecutor<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryExecutor")
            .field("rows", &self.rows)
            .field("filter", &self.filter)
            .finish_non_exhaustive()
    }
}

fn contains(value: &Value, list: &[Value]) -> Option<bool> {
    if value.is_null() {
        return None;
    }
    let mut unknown = false;
    for item in list {
        match value.compare(item) {
            Some(Ordering::Equal) => return Some(true),
            Some(_) => {},
            None => unknown |= item.is_null(),
        }
    }
    if unknown { None } else { Some(false) }
}

/// SQL `LIKE`: `%` matches any run of characters, `_` exactly one.
fn like_match(text: &str, pattern: &str) -> bool {
    let text: Vec<char> = text.chars().collect();
    let pattern: Vec<char> = pattern.chars().collect();
    let (mut ti, mut pi) = (0, 0);
    let mut backtrack: Option<(usize, usize)> = None;

    while let Some(&tc) = text.get(ti) {
        match pattern.get(pi) {
            Some('%') => {
                backtrack = Some((pi, ti));
                pi += 1;
            },
            Some(&pc) if pc == '_' || pc == tc => {
                ti += 1;
                pi += 1;
            },
            _ => match backtrack {
                Some((star, start)) => {
                    pi = star + 1;
                    ti = start + 1;
                    backtrack = Some((star, start + 1));
                },
                None => return false,
            },
        }
    }
    pattern.iter().skip(pi).all(|c| *c == '%')
}
