//! Pagination configuration.
//!
//! ```
//! use seek_sql::PageConfig;
//!
//! let config = PageConfig::from_toml_str("default_max_limit = 50").unwrap();
//! assert_eq!(config.default_max_limit, 50);
//! assert_eq!(config.max_cursor_size, 4096);
//! ```

use serde::{Deserialize, Serialize};

/// Default upper bound for a requested page size.
pub const DEFAULT_MAX_LIMIT: u32 = 100;

/// Default maximum cursor size in bytes (4KB).
pub const DEFAULT_MAX_CURSOR_SIZE: usize = 4 * 1024;

/// Default maximum number of values in a cursor.
pub const DEFAULT_MAX_CURSOR_VALUES: usize = 16;

/// Limits applied by the paginator and its cursor environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PageConfig {
    /// Page size bound used when a request does not carry its own.
    pub default_max_limit: u32,
    /// Cursor strings longer than this are rejected before decoding.
    pub max_cursor_size: usize,
    /// Cursors carrying more values than this are rejected. A paginator
    /// raises it to its key count.
    pub max_cursor_values: usize,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            default_max_limit: DEFAULT_MAX_LIMIT,
            max_cursor_size: DEFAULT_MAX_CURSOR_SIZE,
            max_cursor_values: DEFAULT_MAX_CURSOR_VALUES,
        }
    }
}

/// Errors loading a [`PageConfig`].
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// The TOML document could not be parsed.
    #[error("invalid pagination config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A field holds a value the paginator cannot work with.
    #[error("invalid pagination config: `{field}` must be at least 1")]
    Invalid {
        /// Name of the offending field.
        field: &'static str,
    },
}

impl PageConfig {
    /// Parse and validate a TOML document. Missing fields take their defaults.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every limit is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_max_limit == 0 {
            return Err(ConfigError::Invalid {
                field: "default_max_limit",
            });
        }
        if self.max_cursor_values == 0 {
            return Err(ConfigError::Invalid {
                field: "max_cursor_values",
            });
        }
        if self.max_cursor_size == 0 {
            return Err(ConfigError::Invalid {
                field: "max_cursor_size",
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PageConfig::default();
        assert_eq!(config.default_max_limit, 100);
        assert_eq!(config.max_cursor_size, 4096);
        assert_eq!(config.max_cursor_values, 16);
        assert_eq!(PageConfig::from_toml_str("").unwrap(), config);
    }

    #[test]
    fn test_partial_document() {
        let config = PageConfig::from_toml_str(
            r"
            default_max_limit = 25
            max_cursor_values = 4
            ",
        )
        .unwrap();
        assert_eq!(config.default_max_limit, 25);
        assert_eq!(config.max_cursor_values, 4);
        assert_eq!(config.max_cursor_size, DEFAULT_MAX_CURSOR_SIZE);
    }

    #[test]
    fn test_rejects_zero_limit() {
        let err = PageConfig::from_toml_str("default_max_limit = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "default_max_limit" }));
    }

    #[test]
    fn test_rejects_unknown_field() {
        let err = PageConfig::from_toml_str("max_limit = 10").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_rejects_wrong_type() {
        assert!(PageConfig::from_toml_str("default_max_limit = \"ten\"").is_err());
    }
}
