//! Core types for the SQL query builder.

use std::cmp::Ordering;

/// SQL comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Operator {
    /// Equal: `=` (or `IS NULL` against [`Value::Null`])
    Eq,
    /// Not equal: `!=` (or `IS NOT NULL` against [`Value::Null`])
    Ne,
    /// Greater than: `>`
    Gt,
    /// Greater than or equal: `>=`
    Gte,
    /// Less than: `<`
    Lt,
    /// Less than or equal: `<=`
    Lte,
    /// In array: `IN` or `= ANY`
    In,
    /// Not in array: `NOT IN` or `!= ALL`
    NotIn,
    /// Pattern match: `LIKE`
    Like,
}

impl Operator {
    /// SQL spelling of a plain binary comparison.
    pub(crate) const fn sql(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Ne => "!=",
            Self::Gt => ">",
            Self::Gte => ">=",
            Self::Lt => "<",
            Self::Lte => "<=",
            Self::Like => "LIKE",
            Self::In => "IN",
            Self::NotIn => "NOT IN",
        }
    }

    /// Whether `ordering` (left compared to right) satisfies this operator.
    ///
    /// Only meaningful for the ordering operators and `Eq`/`Ne`.
    pub(crate) fn accepts(self, ordering: Ordering) -> bool {
        match self {
            Self::Eq => ordering == Ordering::Equal,
            Self::Ne => ordering != Ordering::Equal,
            Self::Gt => ordering == Ordering::Greater,
            Self::Gte => ordering != Ordering::Less,
            Self::Lt => ordering == Ordering::Less,
            Self::Lte => ordering != Ordering::Greater,
            Self::In | Self::NotIn | Self::Like => false,
        }
    }
}

/// Logical operators for compound filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum LogicalOp {
    /// All conditions must match: `AND`
    And,
    /// At least one condition must match: `OR`
    Or,
    /// Negate the condition: `NOT`
    Not,
}

/// A predicate tree.
///
/// The seek engine produces these; the dialect layer and the in-memory
/// executor each translate them for their own backend.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum FilterExpr {
    /// A constant condition (`1=1` or `1=0`).
    Const(bool),
    /// A simple field comparison.
    Simple(Filter),
    /// A compound filter with logical operator.
    Compound(CompoundFilter),
    /// A row-value comparison: `(a, b) > ($1, $2)`.
    Row(RowFilter),
}

impl FilterExpr {
    /// The condition that matches every row.
    pub const TRUE: Self = Self::Const(true);
    /// The condition that matches no row.
    pub const FALSE: Self = Self::Const(false);

    /// Conjunction that folds constants and flattens nested `AND`s.
    #[must_use]
    pub fn both(self, other: Self) -> Self {
        match (self, other) {
            (Self::Const(false), _) | (_, Self::Const(false)) => Self::FALSE,
            (Self::Const(true), expr) | (expr, Self::Const(true)) => expr,
            (Self::Compound(mut left), right) if left.op == LogicalOp::And => {
                left.filters.push(right);
                Self::Compound(left)
            },
            (left, right) => Self::Compound(CompoundFilter::and(vec![left, right])),
        }
    }

    /// Disjunction that folds constants and flattens nested `OR`s.
    #[must_use]
    pub fn either(self, other: Self) -> Self {
        match (self, other) {
            (Self::Const(true), _) | (_, Self::Const(true)) => Self::TRUE,
            (Self::Const(false), expr) | (expr, Self::Const(false)) => expr,
            (Self::Compound(mut left), right) if left.op == LogicalOp::Or => {
                left.filters.push(right);
                Self::Compound(left)
            },
            (left, right) => Self::Compound(CompoundFilter::or(vec![left, right])),
        }
    }

    /// Returns `true` for the constant `TRUE` condition.
    #[inline]
    #[must_use]
    pub const fn is_always_true(&self) -> bool {
        matches!(self, Self::Const(true))
    }

    /// Returns `true` for the constant `FALSE` condition.
    #[inline]
    #[must_use]
    pub const fn is_always_false(&self) -> bool {
        matches!(self, Self::Const(false))
    }
}

impl From<Filter> for FilterExpr {
    fn from(filter: Filter) -> Self {
        Self::Simple(filter)
    }
}

/// A compound filter combining multiple expressions with a logical operator.
#[derive(Debug, Clone, PartialEq)]
pub struct CompoundFilter {
    /// How the children combine.
    pub op: LogicalOp,
    /// Child expressions; `Not` uses only the first.
    pub filters: Vec<FilterExpr>,
}

impl CompoundFilter {
    /// Create an AND compound filter.
    #[must_use]
    pub fn and(filters: Vec<FilterExpr>) -> Self {
        Self {
            op: LogicalOp::And,
            filters,
        }
    }

    /// Create an OR compound filter.
    #[must_use]
    pub fn or(filters: Vec<FilterExpr>) -> Self {
        Self {
            op: LogicalOp::Or,
            filters,
        }
    }

    /// Create a NOT compound filter (wraps a single filter).
    #[must_use]
    pub fn not(filter: FilterExpr) -> Self {
        Self {
            op: LogicalOp::Not,
            filters: vec![filter],
        }
    }
}

/// SQL parameter values.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// SQL `NULL`.
    Null,
    /// Boolean.
    Bool(bool),
    /// 64-bit integer.
    Int(i64),
    /// Double-precision float.
    Float(f64),
    /// Text.
    String(String),
    /// List, bound for `IN` comparisons.
    Array(Vec<Value>),
}

impl Value {
    /// Returns `true` for [`Value::Null`].
    #[inline]
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Compare two non-null scalar values.
    ///
    /// Returns `None` when either side is `NULL` or the kinds are not
    /// comparable, which is how SQL treats such comparisons: not true.
    #[must_use]
    pub fn compare(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => Some(a.cmp(b)),
            (Self::Int(a), Self::Float(b)) => (*a as f64).partial_cmp(b),
            (Self::Float(a), Self::Int(b)) => a.partial_cmp(&(*b as f64)),
            (Self::Float(a), Self::Float(b)) => a.partial_cmp(b),
            (Self::String(a), Self::String(b)) => Some(a.as_bytes().cmp(b.as_bytes())),
            (Self::Bool(a), Self::Bool(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortDir {
    /// Ascending.
    Asc,
    /// Descending.
    Desc,
}

impl SortDir {
    /// The opposite direction.
    #[inline]
    #[must_use]
    pub const fn reverse(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }

    pub(crate) const fn sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Where `NULL`s sort relative to non-null values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NullOrder {
    /// `NULL`s before every non-null value.
    First,
    /// `NULL`s after every non-null value.
    Last,
}

impl NullOrder {
    /// Placement used when a key does not override it:
    /// nulls last for `Asc`, nulls first for `Desc`.
    #[inline]
    #[must_use]
    pub const fn default_for(dir: SortDir) -> Self {
        match dir {
            SortDir::Asc => Self::Last,
            SortDir::Desc => Self::First,
        }
    }

    /// The opposite placement.
    #[inline]
    #[must_use]
    pub const fn reverse(self) -> Self {
        match self {
            Self::First => Self::Last,
            Self::Last => Self::First,
        }
    }

    pub(crate) const fn sql(self) -> &'static str {
        match self {
            Self::First => "NULLS FIRST",
            Self::Last => "NULLS LAST",
        }
    }
}

/// Sort field with direction and optional null placement.
///
/// `nulls` is `None` for columns that can never hold `NULL`; no
/// `NULLS FIRST/LAST` clause is rendered for them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortField {
    /// Column reference.
    pub field: String,
    /// Sort direction.
    pub dir: SortDir,
    /// Explicit null placement, `None` for non-null columns.
    pub nulls: Option<NullOrder>,
}

impl SortField {
    /// Create a new sort field.
    pub fn new(field: impl Into<String>, dir: SortDir) -> Self {
        Self {
            field: field.into(),
            dir,
            nulls: None,
        }
    }

    /// Set an explicit null placement.
    #[must_use]
    pub const fn with_nulls(mut self, nulls: NullOrder) -> Self {
        self.nulls = Some(nulls);
        self
    }

    /// The same field ordered the opposite way, nulls included.
    #[must_use]
    pub fn reversed(&self) -> Self {
        Self {
            field: self.field.clone(),
            dir: self.dir.reverse(),
            nulls: self.nulls.map(NullOrder::reverse),
        }
    }

    /// Null placement in effect, falling back to [`NullOrder::default_for`].
    #[must_use]
    pub const fn effective_nulls(&self) -> NullOrder {
        match self.nulls {
            Some(nulls) => nulls,
            None => NullOrder::default_for(self.dir),
        }
    }

    /// Render as an `ORDER BY` item.
    #[must_use]
    pub fn to_sql(&self) -> String {
        match self.nulls {
            Some(nulls) => format!("{} {} {}", self.field, self.dir.sql(), nulls.sql()),
            None => format!("{} {}", self.field, self.dir.sql()),
        }
    }
}

/// Filter condition.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    /// Column reference.
    pub field: String,
    /// Comparison operator.
    pub op: Operator,
    /// Right-hand value.
    pub value: Value,
}

impl Filter {
    /// Create a filter without identifier validation.
    ///
    /// Used by the seek engine, whose column names were validated when the
    /// sort keys were declared.
    pub(crate) fn new(field: &str, op: Operator, value: Value) -> Self {
        Self {
            field: field.to_string(),
            op,
            value,
        }
    }
}

/// Row-value comparison: `(fields...) op (values...)`.
#[derive(Debug, Clone, PartialEq)]
pub struct RowFilter {
    /// Columns of the left-hand row.
    pub fields: Vec<String>,
    /// Comparison operator.
    pub op: Operator,
    /// Values of the right-hand row, one per column.
    pub values: Vec<Value>,
}

/// Query result with SQL string and parameters.
#[derive(Debug)]
#[must_use = "QueryResult must be used to execute the query"]
pub struct QueryResult {
    /// SQL text with positional placeholders.
    pub sql: String,
    /// Parameters in placeholder order.
    pub params: Vec<Value>,
}

/// Cursor traversal direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CursorDirection {
    /// Paginate forward (after the boundary row).
    #[default]
    Forward,
    /// Paginate backward (before the boundary row).
    Backward,
}

impl CursorDirection {
    #[inline]
    #[must_use]
    pub const fn is_backward(self) -> bool {
        matches!(self, Self::Backward)
    }

    /// Tag character embedded at the front of an encoded cursor payload.
    #[inline]
    #[must_use]
    pub const fn tag(self) -> char {
        match self {
            Self::Forward => '>',
            Self::Backward => '<',
        }
    }

    /// Inverse of [`tag`](Self::tag).
    #[must_use]
    pub const fn from_tag(tag: char) -> Option<Self> {
        match tag {
            '>' => Some(Self::Forward),
            '<' => Some(Self::Backward),
            _ => None,
        }
    }
}

/// Helper function to create a simple filter expression.
///
/// # Panics
///
/// Panics if the field name is not a valid column reference.
pub fn simple(field: impl Into<String>, op: Operator, value: Value) -> FilterExpr {
    let field = field.into();
    crate::validate::assert_valid_column_ref(&field, "filter field");
    FilterExpr::Simple(Filter { field, op, value })
}

/// Helper function to create an AND compound filter.
#[must_use]
pub fn and(filters: Vec<FilterExpr>) -> FilterExpr {
    FilterExpr::Compound(CompoundFilter::and(filters))
}

/// Helper function to create an OR compound filter.
#[must_use]
pub fn or(filters: Vec<FilterExpr>) -> FilterExpr {
    FilterExpr::Compound(CompoundFilter::or(filters))
}

/// Helper function to create a NOT filter.
#[must_use]
pub fn not(filter: FilterExpr) -> FilterExpr {
    FilterExpr::Compound(CompoundFilter::not(filter))
}
