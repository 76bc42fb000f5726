//! Identifier validation for table names and column references.
//!
//! Seek keys, base filters and projected fields all end up spliced into SQL
//! text, so every name is checked once when it is declared.

mod column;

pub use column::{
    assert_valid_column_ref, assert_valid_sql_identifier, is_valid_column_ref,
    is_valid_sql_identifier,
};
