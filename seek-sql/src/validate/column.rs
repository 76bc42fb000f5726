//! Column/identifier validation logic for SQL injection prevention.

/// Maximum length for SQL identifiers (`PostgreSQL` limit is 63).
const MAX_IDENTIFIER_LENGTH: usize = 63;

/// Validate that a string is a safe SQL identifier.
///
/// A valid SQL identifier starts with an ASCII letter or underscore, contains
/// only ASCII letters, digits and underscores, and is 1-63 characters long.
///
/// # Examples
///
/// ```
/// use seek_sql::is_valid_sql_identifier;
///
/// assert!(is_valid_sql_identifier("users"));
/// assert!(is_valid_sql_identifier("_private"));
///
/// assert!(!is_valid_sql_identifier(""));
/// assert!(!is_valid_sql_identifier("123abc"));
/// assert!(!is_valid_sql_identifier("user; DROP"));
/// ```
#[inline]
#[must_use]
pub fn is_valid_sql_identifier(s: &str) -> bool {
    if s.is_empty() || s.len() > MAX_IDENTIFIER_LENGTH {
        return false;
    }

    let mut chars = s.chars();

    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {},
        _ => return false,
    }

    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Validate a column reference: `column` or `table.column`.
///
/// Seek keys over joined queries need the qualified form to stay unambiguous.
///
/// ```
/// use seek_sql::is_valid_column_ref;
///
/// assert!(is_valid_column_ref("id"));
/// assert!(is_valid_column_ref("users.created_at"));
/// assert!(!is_valid_column_ref("users."));
/// assert!(!is_valid_column_ref("a.b.c"));
/// ```
#[must_use]
pub fn is_valid_column_ref(s: &str) -> bool {
    match s.split_once('.') {
        Some((table, column)) => is_valid_sql_identifier(table) && is_valid_sql_identifier(column),
        None => is_valid_sql_identifier(s),
    }
}

/// Assert that a string is a valid SQL identifier.
///
/// # Panics
///
/// Panics with a descriptive error if the identifier is invalid.
/// Intended for programmer errors (invalid table names in code),
/// not for user input validation.
#[inline]
pub fn assert_valid_sql_identifier(s: &str, context: &str) {
    assert!(
        is_valid_sql_identifier(s),
        "Invalid SQL {context} name '{s}': must start with letter/underscore, \
         contain only ASCII alphanumeric/underscore, and be 1-63 chars"
    );
}

/// Assert that a string is a valid column reference.
///
/// # Panics
///
/// Panics if [`is_valid_column_ref`] rejects the name.
#[inline]
pub fn assert_valid_column_ref(s: &str, context: &str) {
    assert!(
        is_valid_column_ref(s),
        "Invalid SQL {context} '{s}': expected `column` or `table.column` made of \
         ASCII alphanumeric/underscore identifiers"
    );
}
