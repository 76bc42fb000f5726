// =============================================================================
// CRATE-LEVEL QUALITY LINTS (following Tokio/Serde standards)
// =============================================================================
#![forbid(unsafe_code)]
#![deny(unused_must_use)]
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![warn(rust_2018_idioms)]
#![warn(unreachable_pub)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::broken_intra_doc_links)]
// =============================================================================
// CLIPPY CONFIGURATION
// =============================================================================
#![allow(clippy::doc_markdown)] // Code items in docs - extensive doc changes needed
#![allow(clippy::missing_errors_doc)] // # Errors sections - doc-heavy
#![allow(clippy::missing_panics_doc)] // # Panics sections - doc-heavy
#![allow(clippy::module_name_repetitions)] // Type names matching module - acceptable
#![allow(clippy::return_self_not_must_use)] // Builder pattern methods return Self by design
#![allow(clippy::must_use_candidate)] // Builder methods - fluent API doesn't need must_use
#![allow(clippy::match_same_arms)] // Intentional for clarity in some match expressions
#![allow(clippy::format_push_string)] // String building style preference
#![allow(clippy::cast_possible_truncation)] // Row counts and limits fit in u32/u64
#![allow(clippy::cast_precision_loss)] // Int/Float comparison follows SQL numeric promotion
#![allow(clippy::type_complexity)] // Boxed extractor closures

//! # seek-sql - Keyset Pagination with Opaque Cursors
//!
//! Stable, bidirectional pages over an ordered result set without `OFFSET`.
//! A cursor carries the traversal direction and the sort-key values of a
//! boundary row; the next page is everything strictly after that row.
//!
//! ## Quick Start
//!
//! ```
//! use seek_sql::prelude::*;
//!
//! #[derive(Debug, Clone, PartialEq)]
//! struct User { id: i64, name: String }
//!
//! let names = ["Alice", "Bob", "Charlie", "Diana", "Eve"];
//! let rows: Vec<User> = names
//!     .iter()
//!     .zip(1..)
//!     .map(|(name, id)| User { id, name: name.to_string() })
//!     .collect();
//!
//! let registry = CodecRegistry::with_defaults();
//! let spec = SeekSpec::builder(&registry)
//!     .key(SortKey::new("name", |u: &User| u.name.clone()))
//!     .key(SortKey::new("id", |u: &User| u.id))
//!     .build()
//!     .unwrap();
//! let paginator = Paginator::new(spec);
//!
//! let exec = MemoryExecutor::new(rows, |u: &User, column: &str| match column {
//!     "id" => Value::Int(u.id),
//!     "name" => Value::from(u.name.as_str()),
//!     _ => Value::Null,
//! });
//!
//! let first = paginator.page(&exec, &PageRequest::first(2)).unwrap();
//! assert_eq!(first.total, 5);
//! assert_eq!(first.items[1].name, "Bob");
//! assert!(first.prev_cursor.is_none());
//!
//! let next = first.next_cursor.unwrap();
//! let second = paginator
//!     .page_without_count(&exec, &PageRequest::first(2).with_cursor(next))
//!     .unwrap();
//! let names: Vec<&str> = second.items.iter().map(|u| u.name.as_str()).collect();
//! assert_eq!(names, ["Charlie", "Diana"]);
//! ```
//!
//! ## Rendering SQL
//!
//! A SQL executor renders the paginator's [`SeekPlan`] over its base query:
//!
//! ```
//! use seek_sql::prelude::*;
//!
//! let plan = SeekPlan {
//!     predicate: keyset_predicate(
//!         &[SortField::new("created_at", SortDir::Desc), SortField::new("id", SortDir::Desc)],
//!         &[Value::from("2024-01-15"), Value::Int(42)],
//!     ),
//!     ordering: vec![SortField::new("created_at", SortDir::Desc), SortField::new("id", SortDir::Desc)],
//!     limit: 21,
//! };
//!
//! let result = postgres("posts")
//!     .fields(&["id", "title"])
//!     .filter("published", Operator::Eq, Value::Bool(true))
//!     .seek(&plan);
//!
//! assert_eq!(
//!     result.sql,
//!     "SELECT id, title FROM posts WHERE published = $1 AND \
//!      (created_at < $2 OR (created_at = $3 AND id < $4)) \
//!      ORDER BY created_at DESC, id DESC LIMIT 21"
//! );
//! ```
//!
//! ## Strategies
//!
//! | Strategy          | Keys                                | Predicate                         |
//! |-------------------|-------------------------------------|-----------------------------------|
//! | [`SeekSpec`]      | any direction per key, nullable ok  | `a > $1 OR (a = $2 AND b > $3)`   |
//! | [`UniformSeek`]   | one direction, [`NonNull`] types    | `(a, b) > ($1, $2)`               |
//!
//! ## Cursors
//!
//! [`CursorEnv`] turns `(direction, values)` into a string: a direction tag,
//! a JSON array of the encoded values, then a chain of [`CursorDecorator`]s
//! (base64url by default, optionally [`Signed`]). A cursor that does not
//! decode is an error, never a silent first page.

mod builder;
mod codec;
mod config;
mod dialect;
mod pagination;
mod seek;
mod validate;

pub use builder::{
    CompoundFilter, CursorDirection, Filter, FilterExpr, LogicalOp, NullOrder, Operator,
    QueryBuilder, QueryResult, RowFilter, SortDir, SortField, Value, and, not, or, simple,
};
pub use codec::{
    Base64Url, Chain, CodecRegistry, CursorDecorator, CursorEnv, CursorError, DecodedCursor,
    Encoded, FnCodec, JsonSequence, SequenceCodec, SerdeCodec, Signed, ValueCodec,
};
pub use config::{
    ConfigError, DEFAULT_MAX_CURSOR_SIZE, DEFAULT_MAX_CURSOR_VALUES, DEFAULT_MAX_LIMIT, PageConfig,
};
pub use dialect::{Dialect, Postgres, Sqlite};
pub use pagination::{
    MemoryExecutor, Page, PageError, PageInfo, PageRequest, PageWithoutCount, Paginator,
    PlannedPage, QueryExecutor, SeekPlan, normalize_limit,
};
pub use seek::{
    Ascending, Descending, KeyColumn, NonNull, Seek, SeekSpec, SeekSpecBuilder, SortKey,
    SpecError, UniformDirection, UniformSeek, UniformSeekBuilder, keyset_predicate,
};
pub use validate::{
    assert_valid_column_ref, assert_valid_sql_identifier, is_valid_column_ref,
    is_valid_sql_identifier,
};

/// Build a query for Postgres.
///
/// Convenience function that creates a `QueryBuilder` with Postgres dialect.
#[must_use]
pub fn postgres(table: &str) -> QueryBuilder<Postgres> {
    QueryBuilder::new(Postgres, table)
}

/// Build a query for `SQLite`.
///
/// Convenience function that creates a `QueryBuilder` with `SQLite` dialect.
#[must_use]
pub fn sqlite(table: &str) -> QueryBuilder<Sqlite> {
    QueryBuilder::new(Sqlite, table)
}

/// Prelude module for convenient imports.
///
/// ```
/// use seek_sql::prelude::*;
/// let result = postgres("users").fields(&["id"]).build();
/// assert!(result.sql.contains("SELECT id FROM users"));
/// ```
pub mod prelude {
    pub use crate::{
        Ascending, CodecRegistry, CursorDirection, CursorEnv, CursorError, Descending, Dialect,
        FilterExpr, MemoryExecutor, NullOrder, Operator, Page, PageConfig, PageError, PageRequest,
        PageWithoutCount, Paginator, Postgres, QueryBuilder, QueryExecutor, QueryResult, Seek,
        SeekPlan, SeekSpec, Signed, SortDir, SortField, SortKey, Sqlite, UniformSeek, Value,
        keyset_predicate, postgres, simple, sqlite,
    };
}


// ============================================================================
// API Contract Tests (compile-time assertions)
// ============================================================================

#[cfg(test)]
mod api_contracts {
    use static_assertions::{assert_impl_all, assert_not_impl_any};

    // Only types that can never hold NULL may be tuple keys
    assert_impl_all!(i64: crate::NonNull);
    assert_impl_all!(String: crate::NonNull);
    assert_not_impl_any!(Option<i64>: crate::NonNull);
    assert_not_impl_any!(Option<String>: crate::NonNull);

    // Paginators and cursor environments are shared across request handlers
    assert_impl_all!(crate::CursorEnv: Clone, Send, Sync, std::fmt::Debug);
    assert_impl_all!(crate::CodecRegistry: Clone, Send, Sync);
    assert_impl_all!(crate::Paginator<crate::SeekSpec<String>>: Clone, Send, Sync);
    assert_impl_all!(crate::Paginator<crate::UniformSeek<String, crate::Descending>>: Clone, Send, Sync);

    // Error types
    assert_impl_all!(crate::CursorError: Clone, std::fmt::Debug, PartialEq, Eq, std::error::Error);
    assert_impl_all!(crate::SpecError: Clone, std::fmt::Debug, PartialEq, Eq);
    assert_impl_all!(crate::PageError<std::io::Error>: std::error::Error, From<crate::CursorError>);

    // Pages serialize as response bodies
    assert_impl_all!(crate::Page<String>: serde::Serialize, Clone, PartialEq, Eq);
    assert_impl_all!(crate::PageWithoutCount<String>: serde::Serialize, Clone, PartialEq, Eq);
}
