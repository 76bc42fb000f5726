//! Shared filter building functions.
//!
//! Translates a [`FilterExpr`] tree into a SQL fragment plus positional
//! parameters. Each function returns the next free parameter index.

use super::types::{CompoundFilter, Filter, FilterExpr, LogicalOp, Operator, RowFilter, Value};
use crate::dialect::Dialect;

/// Build a filter expression (constant, simple, compound or row).
pub(crate) fn build_filter_expr_impl<D: Dialect>(
    dialect: &D,
    expr: &FilterExpr,
    start_idx: usize,
) -> (String, Vec<Value>, usize) {
    match expr {
        FilterExpr::Const(true) => ("1=1".to_string(), vec![], start_idx),
        FilterExpr::Const(false) => ("1=0".to_string(), vec![], start_idx),
        FilterExpr::Simple(filter) => build_condition_impl(dialect, filter, start_idx),
        FilterExpr::Compound(compound) => build_compound_filter_impl(dialect, compound, start_idx),
        FilterExpr::Row(row) => build_row_impl(dialect, row, start_idx),
    }
}

/// Build a compound filter (AND, OR, NOT).
pub(super) fn build_compound_filter_impl<D: Dialect>(
    dialect: &D,
    compound: &CompoundFilter,
    start_idx: usize,
) -> (String, Vec<Value>, usize) {
    let mut idx = start_idx;
    let mut all_params = Vec::new();
    let mut conditions = Vec::new();

    for filter_expr in &compound.filters {
        let (condition, params, new_idx) = build_filter_expr_impl(dialect, filter_expr, idx);
        conditions.push(condition);
        all_params.extend(params);
        idx = new_idx;
    }

    let sql = match compound.op {
        // An empty conjunction is vacuously true, an empty disjunction false
        LogicalOp::And if conditions.is_empty() => "1=1".to_string(),
        LogicalOp::Or if conditions.is_empty() => "1=0".to_string(),
        LogicalOp::And | LogicalOp::Or if conditions.len() == 1 => {
            conditions.into_iter().next().unwrap_or_default()
        },
        LogicalOp::And => format!("({})", conditions.join(" AND ")),
        LogicalOp::Or => format!("({})", conditions.join(" OR ")),
        LogicalOp::Not => {
            let inner = conditions.into_iter().next().unwrap_or_else(|| "1=0".to_string());
            format!("NOT ({inner})")
        },
    };

    (sql, all_params, idx)
}

/// Build a single filter condition.
pub(super) fn build_condition_impl<D: Dialect>(
    dialect: &D,
    filter: &Filter,
    start_idx: usize,
) -> (String, Vec<Value>, usize) {
    let field = &filter.field;
    let idx = start_idx;

    match (&filter.op, &filter.value) {
        // NULL handling
        (Operator::Eq, Value::Null) => (format!("{field} IS NULL"), vec![], idx),
        (Operator::Ne, Value::Null) => (format!("{field} IS NOT NULL"), vec![], idx),

        // IN/NOT IN with arrays
        (Operator::In, Value::Array(values)) => {
            let (sql, params) = dialect.in_clause(field, values, idx);
            let new_idx = idx + params.len();
            (sql, params, new_idx)
        },
        (Operator::NotIn, Value::Array(values)) => {
            let (sql, params) = dialect.not_in_clause(field, values, idx);
            let new_idx = idx + params.len();
            (sql, params, new_idx)
        },

        // IN/NOT IN against a scalar degrade to equality
        (Operator::In, value) => {
            let sql = format!("{} = {}", field, dialect.param(idx));
            (sql, vec![value.clone()], idx + 1)
        },
        (Operator::NotIn, value) => {
            let sql = format!("{} != {}", field, dialect.param(idx));
            (sql, vec![value.clone()], idx + 1)
        },

        // Standard comparisons
        (op, value) => {
            let sql = format!("{} {} {}", field, op.sql(), dialect.param(idx));
            (sql, vec![value.clone()], idx + 1)
        },
    }
}

/// Build a row-value comparison: `(a, b) > ($1, $2)`.
///
/// A single-column row renders as a plain comparison.
pub(super) fn build_row_impl<D: Dialect>(
    dialect: &D,
    row: &RowFilter,
    start_idx: usize,
) -> (String, Vec<Value>, usize) {
    if row.fields.is_empty() || row.fields.len() != row.values.len() {
        // Safe fallback that produces no results
        return (
            format!(
                "1=0 /* row comparison arity mismatch: {} fields, {} values */",
                row.fields.len(),
                row.values.len()
            ),
            vec![],
            start_idx,
        );
    }

    if let ([field], [value]) = (row.fields.as_slice(), row.values.as_slice()) {
        return build_condition_impl(dialect, &Filter::new(field, row.op, value.clone()), start_idx);
    }

    let sql = format!(
        "({}) {} {}",
        row.fields.join(", "),
        row.op.sql(),
        dialect.param_list(row.values.len(), start_idx)
    );

    (sql, row.values.clone(), start_idx + row.values.len())
}
