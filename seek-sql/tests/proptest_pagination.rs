//! Property-based tests for keyset traversal using proptest.
//!
//! Random row sets, key shapes and page sizes are paged through the
//! in-memory executor and compared against a single unpaginated fetch.

use proptest::prelude::*;
use seek_sql::{
    CodecRegistry, CursorDirection, CursorEnv, FilterExpr, MemoryExecutor, NullOrder,
    PageRequest, PageWithoutCount, Paginator, QueryExecutor, Seek, SeekPlan, SeekSpec, Signed,
    SortKey, UniformSeek, Value, normalize_limit,
};

#[derive(Debug, Clone, PartialEq)]
struct Item {
    id: i64,
    score: Option<i64>,
    tag: String,
}

#[derive(Debug, Clone, Copy)]
struct Shape {
    score_desc: bool,
    score_nulls: Option<NullOrder>,
    tag_desc: bool,
    id_desc: bool,
}

fn column(item: &Item, column: &str) -> Value {
    match column {
        "id" => Value::Int(item.id),
        "score" => Value::from(item.score),
        "tag" => Value::from(item.tag.as_str()),
        _ => Value::Null,
    }
}

fn spec(shape: Shape) -> SeekSpec<Item> {
    let registry = CodecRegistry::with_defaults();
    let score = SortKey::nullable("score", |i: &Item| i.score);
    let score = if shape.score_desc { score.desc() } else { score };
    let score = match shape.score_nulls {
        Some(NullOrder::First) => score.nulls_first(),
        Some(NullOrder::Last) => score.nulls_last(),
        None => score,
    };
    let tag = SortKey::new("tag", |i: &Item| i.tag.clone());
    let tag = if shape.tag_desc { tag.desc() } else { tag };
    let id = SortKey::new("id", |i: &Item| i.id);
    let id = if shape.id_desc { id.desc() } else { id };

    SeekSpec::builder(&registry).key(score).key(tag).key(id).build().unwrap()
}

fn full_order<S: Seek<Row = Item>>(seek: &S, exec: &MemoryExecutor<Item>) -> Vec<Item> {
    let plan = SeekPlan {
        predicate: FilterExpr::TRUE,
        ordering: seek.ordering(CursorDirection::Forward),
        limit: u32::MAX,
    };
    exec.fetch(&plan).unwrap()
}

fn forward<S: Seek<Row = Item>>(
    paginator: &Paginator<S>,
    exec: &MemoryExecutor<Item>,
    limit: i64,
) -> Vec<PageWithoutCount<Item>> {
    let mut pages = Vec::new();
    let mut request = PageRequest::first(limit);
    loop {
        let page = paginator.page_without_count(exec, &request).unwrap();
        let next = page.next_cursor.clone();
        pages.push(page);
        match next {
            Some(cursor) => request = PageRequest::first(limit).with_cursor(cursor),
            None => return pages,
        }
    }
}

fn items() -> impl Strategy<Value = Vec<Item>> {
    prop::collection::vec((prop::option::of(0i64..4), "[a-c]"), 0..30).prop_map(|rows| {
        rows.into_iter()
            .zip(1..)
            .map(|((score, tag), id)| Item { id, score, tag })
            .collect()
    })
}

fn shape() -> impl Strategy<Value = Shape> {
    (
        any::<bool>(),
        prop_oneof![Just(None), Just(Some(NullOrder::First)), Just(Some(NullOrder::Last))],
        any::<bool>(),
        any::<bool>(),
    )
        .prop_map(|(score_desc, score_nulls, tag_desc, id_desc)| Shape {
            score_desc,
            score_nulls,
            tag_desc,
            id_desc,
        })
}

fn encoded() -> impl Strategy<Value = serde_json::Value> {
    prop_oneof![
        Just(serde_json::Value::Null),
        any::<bool>().prop_map(serde_json::Value::from),
        any::<i64>().prop_map(serde_json::Value::from),
        "[a-zA-Z0-9 ._-]{0,12}".prop_map(serde_json::Value::from),
    ]
}

// =============================================================================
// Traversal Property Tests
// =============================================================================

proptest! {
    /// Paging forward visits every row exactly once, in sort order
    #[test]
    fn forward_traversal_is_complete(rows in items(), shape in shape(), limit in 1i64..8) {
        let spec = spec(shape);
        let exec = MemoryExecutor::new(rows, column);
        let expected = full_order(&spec, &exec);
        let paginator = Paginator::new(spec);

        let pages = forward(&paginator, &exec, limit);
        let collected: Vec<Item> = pages.iter().flat_map(|p| p.items.clone()).collect();
        prop_assert_eq!(collected, expected);

        for page in &pages[..pages.len() - 1] {
            prop_assert_eq!(page.items.len() as i64, limit);
        }
        prop_assert!(pages.last().unwrap().next_cursor.is_none());
    }

    /// Walking back from the last page reproduces the earlier pages
    #[test]
    fn backward_traversal_mirrors_forward(rows in items(), shape in shape(), limit in 1i64..8) {
        let paginator = Paginator::new(spec(shape));
        let exec = MemoryExecutor::new(rows, column);
        let pages = forward(&paginator, &exec, limit);

        let mut cursor = pages.last().unwrap().prev_cursor.clone();
        let mut backward = Vec::new();
        while let Some(prev) = cursor {
            let page = paginator
                .page_without_count(&exec, &PageRequest::first(limit).with_cursor(prev))
                .unwrap();
            cursor = page.prev_cursor.clone();
            backward.push(page.items);
        }
        backward.reverse();

        let expected: Vec<Vec<Item>> =
            pages[..pages.len() - 1].iter().map(|p| p.items.clone()).collect();
        prop_assert_eq!(backward, expected);
    }

    /// The tuple fast path pages like the general engine, in both directions
    #[test]
    fn tuple_traversal_is_complete(rows in items(), descending in any::<bool>(), limit in 1i64..8) {
        let registry = CodecRegistry::with_defaults();
        let exec = MemoryExecutor::new(rows, column);

        let (tuple, general) = if descending {
            let tuple = forward(
                &Paginator::new(
                    UniformSeek::descending(&registry)
                        .key("tag", |i: &Item| i.tag.clone())
                        .key("id", |i: &Item| i.id)
                        .build()
                        .unwrap(),
                ),
                &exec,
                limit,
            );
            let spec = SeekSpec::builder(&registry)
                .key(SortKey::new("tag", |i: &Item| i.tag.clone()).desc())
                .key(SortKey::new("id", |i: &Item| i.id).desc())
                .build()
                .unwrap();
            (tuple, full_order(&spec, &exec))
        } else {
            let tuple = forward(
                &Paginator::new(
                    UniformSeek::ascending(&registry)
                        .key("tag", |i: &Item| i.tag.clone())
                        .key("id", |i: &Item| i.id)
                        .build()
                        .unwrap(),
                ),
                &exec,
                limit,
            );
            let spec = SeekSpec::builder(&registry)
                .key(SortKey::new("tag", |i: &Item| i.tag.clone()))
                .key(SortKey::new("id", |i: &Item| i.id))
                .build()
                .unwrap();
            (tuple, full_order(&spec, &exec))
        };

        let collected: Vec<Item> = tuple.iter().flat_map(|p| p.items.clone()).collect();
        prop_assert_eq!(collected, general);
        for page in &tuple[..tuple.len() - 1] {
            prop_assert_eq!(page.items.len() as i64, limit);
        }
    }

    /// Walking back through tuple pages reproduces the earlier pages
    #[test]
    fn tuple_backward_mirrors_forward(rows in items(), limit in 1i64..8) {
        let registry = CodecRegistry::with_defaults();
        let paginator = Paginator::new(
            UniformSeek::descending(&registry)
                .key("tag", |i: &Item| i.tag.clone())
                .key("id", |i: &Item| i.id)
                .build()
                .unwrap(),
        );
        let exec = MemoryExecutor::new(rows, column);
        let pages = forward(&paginator, &exec, limit);

        let mut cursor = pages.last().unwrap().prev_cursor.clone();
        let mut backward = Vec::new();
        while let Some(prev) = cursor {
            let page = paginator
                .page_without_count(&exec, &PageRequest::first(limit).with_cursor(prev))
                .unwrap();
            cursor = page.prev_cursor.clone();
            backward.push(page.items);
        }
        backward.reverse();

        let expected: Vec<Vec<Item>> =
            pages[..pages.len() - 1].iter().map(|p| p.items.clone()).collect();
        prop_assert_eq!(backward, expected);
    }

    /// Every page's total is the row count, whatever the cursor
    #[test]
    fn total_ignores_cursor(rows in items(), limit in 1i64..8) {
        let total = rows.len() as u64;
        let paginator = Paginator::new(spec(Shape {
            score_desc: false,
            score_nulls: None,
            tag_desc: false,
            id_desc: false,
        }));
        let exec = MemoryExecutor::new(rows, column);

        let first = paginator.page(&exec, &PageRequest::first(limit)).unwrap();
        prop_assert_eq!(first.total, total);
        if let Some(next) = first.next_cursor {
            let second = paginator
                .page(&exec, &PageRequest::first(limit).with_cursor(next))
                .unwrap();
            prop_assert_eq!(second.total, total);
        }
    }
}

// =============================================================================
// Cursor and Page Property Tests
// =============================================================================

proptest! {
    /// Encoded cursors decode to the same direction and values
    #[test]
    fn cursor_round_trip(
        values in prop::collection::vec(encoded(), 0..16),
        backward in any::<bool>(),
        signed in any::<bool>()
    ) {
        let env = if signed {
            CursorEnv::default().decorate(Signed::new("proptest-key"))
        } else {
            CursorEnv::default()
        };
        let direction = if backward { CursorDirection::Backward } else { CursorDirection::Forward };

        let cursor = env.encode(direction, &values).unwrap();
        let decoded = env.decode(&cursor).unwrap();
        prop_assert_eq!(decoded.direction, direction);
        prop_assert_eq!(decoded.values, values);
    }

    /// Arbitrary strings never decode into a cursor silently treated as absent
    #[test]
    fn arbitrary_cursor_rejected_or_decoded(input in ".{1,64}") {
        let env = CursorEnv::default().decorate(Signed::new("proptest-key"));
        let decoded = env.decode_with_direction(Some(&input));
        prop_assert!(!matches!(decoded, Ok(None)));
    }

    /// Attaching and dropping a count loses nothing
    #[test]
    fn count_round_trip(
        items in prop::collection::vec(any::<i64>(), 0..10),
        prev in prop::option::of("[a-z]{1,8}"),
        next in prop::option::of("[a-z]{1,8}"),
        total in any::<u64>()
    ) {
        let page = PageWithoutCount::new(items, prev, next);
        let counted = page.clone().with_count(total);
        prop_assert_eq!(counted.total, total);
        prop_assert_eq!(counted.without_count(), page);
    }

    /// Normalized limits stay within [1, max]
    #[test]
    fn limit_within_bounds(limit in any::<i64>(), max in 0u32..500) {
        let normalized = normalize_limit(limit, max);
        prop_assert!(normalized >= 1);
        prop_assert!(normalized <= max.max(1));
        if limit >= 1 && limit <= i64::from(max) {
            prop_assert_eq!(i64::from(normalized), limit);
        }
    }
}
