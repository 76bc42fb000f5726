//! Keyset pagination: the orchestrator, its execution seam and results.
//!
//! # Flow of one request
//!
//! 1. decode the cursor (direction + boundary values) through the [`CursorEnv`](crate::CursorEnv);
//! 2. clamp the limit to `[1, max_limit]`;
//! 3. ask the [`Seek`](crate::Seek) strategy for the boundary predicate and the
//!    ordering for that direction;
//! 4. fetch `limit + 1` rows; the extra row only signals that more exist;
//! 5. trim, restore forward order when paging backward, and encode the
//!    next/previous cursors from the last/first item.
//!
//! | Traversal | `has_next`        | `has_prev`        |
//! |-----------|-------------------|-------------------|
//! | forward   | extra row fetched | cursor supplied   |
//! | backward  | cursor supplied   | extra row fetched |

mod executor;
mod memory;
mod page;
mod paginator;

pub use executor::{QueryExecutor, SeekPlan};
pub use memory::MemoryExecutor;
pub use page::{Page, PageInfo, PageWithoutCount};
pub use paginator::{PageError, PageRequest, Paginator, PlannedPage, normalize_limit};
