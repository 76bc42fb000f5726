//! Page result types.

use serde::{Deserialize, Serialize};

/// One page of items, without a total count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageWithoutCount<T> {
    /// Items in forward sort order.
    pub items: Vec<T>,
    /// Cursor for the page before this one.
    pub prev_cursor: Option<String>,
    /// Cursor for the page after this one.
    pub next_cursor: Option<String>,
}

impl<T> PageWithoutCount<T> {
    /// Assemble a page.
    pub const fn new(
        items: Vec<T>,
        prev_cursor: Option<String>,
        next_cursor: Option<String>,
    ) -> Self {
        Self {
            items,
            prev_cursor,
            next_cursor,
        }
    }

    /// Whether a following page exists.
    pub const fn has_next(&self) -> bool {
        self.next_cursor.is_some()
    }

    /// Whether a preceding page exists.
    pub const fn has_prev(&self) -> bool {
        self.prev_cursor.is_some()
    }

    /// Transform every item, keeping both cursors.
    ///
    /// Cursors come from sort-key values, not from item shape, so they stay
    /// valid after the transform.
    pub fn map_items<U, F: FnMut(T) -> U>(self, f: F) -> PageWithoutCount<U> {
        PageWithoutCount {
            items: self.items.into_iter().map(f).collect(),
            prev_cursor: self.prev_cursor,
            next_cursor: self.next_cursor,
        }
    }

    /// Attach a total count.
    pub fn with_count(self, total: u64) -> Page<T> {
        Page {
            total,
            items: self.items,
            prev_cursor: self.prev_cursor,
            next_cursor: self.next_cursor,
        }
    }

    /// Navigation summary.
    pub fn info(&self) -> PageInfo {
        PageInfo {
            has_next: self.has_next(),
            has_prev: self.has_prev(),
            next_cursor: self.next_cursor.clone(),
            prev_cursor: self.prev_cursor.clone(),
            total: None,
        }
    }
}

/// One page of items with the total row count of the base query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Rows matching the base query, ignoring limit and cursor.
    pub total: u64,
    /// Items in forward sort order.
    pub items: Vec<T>,
    /// Cursor for the page before this one.
    pub prev_cursor: Option<String>,
    /// Cursor for the page after this one.
    pub next_cursor: Option<String>,
}

impl<T> Page<T> {
    /// Whether a following page exists.
    pub const fn has_next(&self) -> bool {
        self.next_cursor.is_some()
    }

    /// Whether a preceding page exists.
    pub const fn has_prev(&self) -> bool {
        self.prev_cursor.is_some()
    }

    /// Transform every item, keeping the cursors and the total.
    pub fn map_items<U, F: FnMut(T) -> U>(self, f: F) -> Page<U> {
        Page {
            total: self.total,
            items: self.items.into_iter().map(f).collect(),
            prev_cursor: self.prev_cursor,
            next_cursor: self.next_cursor,
        }
    }

    /// Drop the total count.
    pub fn without_count(self) -> PageWithoutCount<T> {
        PageWithoutCount {
            items: self.items,
            prev_cursor: self.prev_cursor,
            next_cursor: self.next_cursor,
        }
    }

    /// Navigation summary including the total.
    pub fn info(&self) -> PageInfo {
        PageInfo {
            has_next: self.has_next(),
            has_prev: self.has_prev(),
            next_cursor: self.next_cursor.clone(),
            prev_cursor: self.prev_cursor.clone(),
            total: Some(self.total),
        }
    }
}

/// Page information for paginated responses.
///
/// ```
/// use seek_sql::PageWithoutCount;
///
/// let page = PageWithoutCount::new(vec![1, 2], None, Some("next".to_string()));
/// let json = serde_json::to_value(page.info()).unwrap();
/// assert_eq!(json["has_next"], true);
/// assert_eq!(json["has_prev"], false);
/// assert!(json.get("total").is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageInfo {
    /// Whether there are more items after this page.
    pub has_next: bool,
    /// Whether there are items before this page.
    pub has_prev: bool,
    /// Cursor to fetch the next page.
    pub next_cursor: Option<String>,
    /// Cursor to fetch the previous page.
    pub prev_cursor: Option<String>,
    /// Total count (if available).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
}
