//! Page orchestration: decode, plan, fetch N+1, trim, assemble.

use crate::builder::{CursorDirection, FilterExpr};
use crate::codec::{CursorEnv, CursorError};
use crate::config::PageConfig;
use crate::seek::Seek;

use super::executor::{QueryExecutor, SeekPlan};
use super::page::{Page, PageWithoutCount};

/// Inputs of one page request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageRequest {
    /// Requested page size. Clamped to `[1, max_limit]`.
    pub limit: i64,
    /// Cursor returned by a previous page. `None` or empty for the first page.
    pub cursor: Option<String>,
    /// Upper bound for `limit`; the paginator's configured default when `None`.
    pub max_limit: Option<u32>,
}

impl PageRequest {
    /// First-page request.
    pub const fn first(limit: i64) -> Self {
        Self {
            limit,
            cursor: None,
            max_limit: None,
        }
    }

    /// Request the page a cursor points to.
    pub fn with_cursor(mut self, cursor: impl Into<String>) -> Self {
        self.cursor = Some(cursor.into());
        self
    }

    /// Bound the limit for this request.
    pub const fn with_max_limit(mut self, max_limit: u32) -> Self {
        self.max_limit = Some(max_limit);
        self
    }
}

/// Errors from a page request.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum PageError<E> {
    /// The supplied cursor could not be decoded, or a new one could not be
    /// encoded.
    #[error("invalid cursor: {0}")]
    Cursor(#[from] CursorError),

    /// The executor failed. The error is returned unchanged.
    #[error("query execution failed")]
    Execution(#[source] E),
}

impl<E> PageError<E> {
    /// Returns `true` if this is a cursor error.
    pub const fn is_cursor_error(&self) -> bool {
        matches!(self, Self::Cursor(_))
    }

    /// The cursor error, if any.
    pub const fn as_cursor_error(&self) -> Option<&CursorError> {
        match self {
            Self::Cursor(err) => Some(err),
            Self::Execution(_) => None,
        }
    }
}

/// Clamp a requested limit to `[1, max_limit]`. A `max_limit` of 0 acts as 1.
pub fn normalize_limit(limit: i64, max_limit: u32) -> u32 {
    let max_limit = max_limit.max(1);
    u32::try_from(limit.clamp(1, i64::from(max_limit))).unwrap_or(max_limit)
}

/// Keyset paginator over a seek strategy.
///
/// Stateless between requests: every page call decodes its cursor, runs
/// one fetch (plus one count for [`page`](Self::page)) and encodes the
/// cursors of the new page.
#[derive(Debug, Clone)]
pub struct Paginator<S> {
    seek: S,
    env: CursorEnv,
    config: PageConfig,
}

impl<S: Seek> Paginator<S> {
    /// Create a paginator with the default cursor environment and config.
    pub fn new(seek: S) -> Self {
        Self {
            seek,
            env: CursorEnv::default(),
            config: PageConfig::default(),
        }
        .fit_env()
    }

    /// Replace the cursor environment.
    ///
    /// The environment keeps its own limits; call [`with_config`](Self::with_config)
    /// afterwards to apply the config's cursor limits to it.
    pub fn with_env(mut self, env: CursorEnv) -> Self {
        self.env = env;
        self.fit_env()
    }

    /// Replace the configuration, applying its cursor limits to the environment.
    pub fn with_config(mut self, config: PageConfig) -> Self {
        self.env = self.env.with_config(&config);
        self.config = config;
        self.fit_env()
    }

    // A cursor always carries one value per key, so the value limit never
    // drops below the key count.
    fn fit_env(mut self) -> Self {
        let keys = self.seek.keys().len();
        if keys > self.env.max_cursor_values() {
            tracing::debug!(
                keys,
                max_cursor_values = self.env.max_cursor_values(),
                "raising cursor value limit to the key count"
            );
            let max_cursor_size = self.env.max_cursor_size();
            self.env = self.env.with_limits(max_cursor_size, keys);
        }
        self
    }

    /// The seek strategy.
    pub const fn seek(&self) -> &S {
        &self.seek
    }

    /// The cursor environment.
    pub const fn env(&self) -> &CursorEnv {
        &self.env
    }

    /// The configuration.
    pub const fn config(&self) -> &PageConfig {
        &self.config
    }

    /// Cursor pointing past `row` in `direction`.
    pub fn cursor_for(&self, row: &S::Row, direction: CursorDirection) -> Result<String, CursorError> {
        self.env.encode(direction, &self.seek.encode_row(row))
    }

    /// Decode a request's cursor and build the plan for it.
    ///
    /// Returns the plan, the traversal direction, the normalized limit and
    /// whether a cursor was supplied.
    pub fn plan(&self, request: &PageRequest) -> Result<PlannedPage, CursorError> {
        let decoded = self
            .env
            .decode_with_direction(request.cursor.as_deref())
            .and_then(|decoded| match decoded {
                Some(cursor) => {
                    let values = self.seek.decode_values(&cursor.values)?;
                    Ok(Some((cursor.direction, values)))
                },
                None => Ok(None),
            })
            .inspect_err(|err| {
                tracing::warn!(
                    error = %err,
                    decorators = ?self.env.decorator_names(),
                    "rejected pagination cursor"
                );
            })?;

        let limit = normalize_limit(
            request.limit,
            request.max_limit.unwrap_or(self.config.default_max_limit),
        );
        let (direction, predicate, has_cursor) = match decoded {
            Some((direction, values)) => (direction, self.seek.boundary(direction, &values), true),
            None => (CursorDirection::Forward, FilterExpr::TRUE, false),
        };

        let plan = SeekPlan {
            predicate,
            ordering: self.seek.ordering(direction),
            limit: limit.saturating_add(1),
        };
        tracing::trace!(?plan, "built seek plan");

        Ok(PlannedPage {
            plan,
            direction,
            limit,
            has_cursor,
        })
    }

    /// Fetch one page without counting.
    pub fn page_without_count<E>(
        &self,
        exec: &E,
        request: &PageRequest,
    ) -> Result<PageWithoutCount<S::Row>, PageError<E::Error>>
    where
        E: QueryExecutor<Row = S::Row> + ?Sized,
    {
        let PlannedPage {
            plan,
            direction,
            limit,
            has_cursor,
        } = self.plan(request)?;

        let mut rows = exec.fetch(&plan).map_err(PageError::Execution)?;
        let fetched = rows.len();
        let has_more = fetched > limit as usize;
        rows.truncate(limit as usize);

        let backward = direction.is_backward();
        if backward {
            rows.reverse();
        }

        let (has_next, has_prev) = if backward {
            (has_cursor, has_more)
        } else {
            (has_more, has_cursor)
        };

        let next_cursor = match rows.last() {
            Some(row) if has_next => Some(self.cursor_for(row, CursorDirection::Forward)?),
            _ => None,
        };
        let prev_cursor = match rows.first() {
            Some(row) if has_prev => Some(self.cursor_for(row, CursorDirection::Backward)?),
            _ => None,
        };

        tracing::debug!(
            ?direction,
            limit,
            fetched,
            items = rows.len(),
            has_next,
            has_prev,
            "fetched page"
        );

        Ok(PageWithoutCount::new(rows, prev_cursor, next_cursor))
    }

    /// Fetch one page and the total row count of the base query.
    ///
    /// The two queries are independent; under concurrent writes the count
    /// may not match the pages.
    pub fn page<E>(
        &self,
        exec: &E,
        request: &PageRequest,
    ) -> Result<Page<S::Row>, PageError<E::Error>>
    where
        E: QueryExecutor<Row = S::Row> + ?Sized,
    {
        let page = self.page_without_count(exec, request)?;
        let total = exec.count().map_err(PageError::Execution)?;
        Ok(page.with_count(total))
    }
}

/// A decoded request, ready to execute.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedPage {
    /// What to fetch.
    pub plan: SeekPlan,
    /// Traversal direction of the supplied cursor, forward on the first page.
    pub direction: CursorDirection,
    /// Normalized page size, without the look-ahead row.
    pub limit: u32,
    /// Whether a cursor was supplied.
    pub has_cursor: bool,
}
