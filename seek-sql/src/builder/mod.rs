//! Query builder: predicate tree, SQL rendering and the base SELECT.

mod filter;
mod select;
mod types;
mod value_conv;

pub use select::QueryBuilder;
pub use types::{
    CompoundFilter, CursorDirection, Filter, FilterExpr, LogicalOp, NullOrder, Operator,
    QueryResult, RowFilter, SortDir, SortField, Value, and, not, or, simple,
};
