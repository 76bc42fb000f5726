//! SELECT query builder.
//!
//! A `QueryBuilder` describes the base query a page is cut from: table,
//! projection and base filters. The seek engine supplies the boundary
//! predicate, ordering and look-ahead limit through a [`SeekPlan`].

use crate::dialect::Dialect;
use crate::pagination::SeekPlan;
use crate::validate::{assert_valid_column_ref, assert_valid_sql_identifier};

use super::filter::build_filter_expr_impl;
use super::types::{Filter, FilterExpr, Operator, QueryResult, SortDir, SortField, Value};

/// SQL query builder with dialect support.
#[derive(Debug, Clone)]
pub struct QueryBuilder<D: Dialect> {
    dialect: D,
    table: String,
    fields: Vec<String>,
    filters: Vec<Filter>,
    filter_expr: Option<FilterExpr>,
    sorts: Vec<SortField>,
    limit: Option<u32>,
}

impl<D: Dialect> QueryBuilder<D> {
    /// Create a new query builder for the given table.
    ///
    /// # Panics
    ///
    /// Panics if the table name is not a valid SQL identifier.
    pub fn new(dialect: D, table: impl Into<String>) -> Self {
        let table = table.into();
        assert_valid_sql_identifier(&table, "table");
        Self {
            dialect,
            table,
            fields: Vec::new(),
            filters: Vec::new(),
            filter_expr: None,
            sorts: Vec::new(),
            limit: None,
        }
    }

    /// Set the fields to SELECT.
    ///
    /// # Panics
    ///
    /// Panics if any field name is not a valid column reference.
    pub fn fields(mut self, fields: &[&str]) -> Self {
        for field in fields {
            assert_valid_column_ref(field, "field");
        }
        self.fields = fields.iter().map(|s| (*s).to_string()).collect();
        self
    }

    /// Add a filter condition.
    ///
    /// # Panics
    ///
    /// Panics if the field name is not a valid column reference.
    pub fn filter(mut self, field: impl Into<String>, op: Operator, value: Value) -> Self {
        let field = field.into();
        assert_valid_column_ref(&field, "filter field");
        self.filters.push(Filter { field, op, value });
        self
    }

    /// Add a compound filter expression, combined with AND with any existing one.
    pub fn filter_expr(mut self, expr: FilterExpr) -> Self {
        self.filter_expr = Some(match self.filter_expr.take() {
            Some(existing) => existing.both(expr),
            None => expr,
        });
        self
    }

    /// Add a sort field (used by [`build`](Self::build); seek queries use the plan's ordering).
    ///
    /// # Panics
    ///
    /// Panics if the field name is not a valid column reference.
    pub fn sort(mut self, field: impl Into<String>, dir: SortDir) -> Self {
        let field = field.into();
        assert_valid_column_ref(&field, "sort field");
        self.sorts.push(SortField::new(field, dir));
        self
    }

    /// Set a limit.
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// The dialect this builder renders for.
    pub const fn dialect(&self) -> &D {
        &self.dialect
    }

    /// Build the plain query with its own sorts and limit.
    pub fn build(&self) -> QueryResult {
        self.render(&self.select_clause(), None, &self.sorts, self.limit)
    }

    /// Build the page query for a seek plan.
    ///
    /// The plan's predicate is ANDed after the base filters, its ordering
    /// replaces the builder's sorts and its limit (already including the
    /// look-ahead row) replaces the builder's limit.
    pub fn seek(&self, plan: &SeekPlan) -> QueryResult {
        let result = self.render(
            &self.select_clause(),
            Some(&plan.predicate),
            &plan.ordering,
            Some(plan.limit),
        );
        tracing::trace!(dialect = self.dialect.name(), sql = %result.sql, "rendered seek query");
        result
    }

    /// Build `SELECT COUNT(*)` over the base filters, ignoring any seek boundary.
    pub fn build_count(&self) -> QueryResult {
        self.render("COUNT(*) AS count", None, &[], None)
    }

    fn select_clause(&self) -> String {
        if self.fields.is_empty() {
            "*".to_string()
        } else {
            self.fields.join(", ")
        }
    }

    fn render(
        &self,
        select: &str,
        seek: Option<&FilterExpr>,
        sorts: &[SortField],
        limit: Option<u32>,
    ) -> QueryResult {
        let mut sql = format!("SELECT {select} FROM {}", self.table);
        let mut params = Vec::new();
        let mut param_idx = 1usize;

        // WHERE clause - base filter_expr, simple filters, then the seek boundary
        let simple: Vec<FilterExpr> = self.filters.iter().cloned().map(FilterExpr::Simple).collect();
        let mut conditions: Vec<&FilterExpr> = Vec::new();
        if let Some(ref expr) = self.filter_expr {
            conditions.push(expr);
        }
        conditions.extend(simple.iter());
        if let Some(expr) = seek.filter(|expr| !expr.is_always_true()) {
            conditions.push(expr);
        }

        if !conditions.is_empty() {
            let mut parts = Vec::with_capacity(conditions.len());
            for expr in conditions {
                let (condition, new_params, new_idx) =
                    build_filter_expr_impl(&self.dialect, expr, param_idx);
                parts.push(condition);
                params.extend(new_params);
                param_idx = new_idx;
            }
            sql.push_str(" WHERE ");
            sql.push_str(&parts.join(" AND "));
        }

        if !sorts.is_empty() {
            let sort_parts: Vec<String> = sorts.iter().map(SortField::to_sql).collect();
            sql.push_str(" ORDER BY ");
            sql.push_str(&sort_parts.join(", "));
        }

        if let Some(limit) = limit {
            sql.push_str(&format!(" LIMIT {limit}"));
        }

        QueryResult { sql, params }
    }
}
