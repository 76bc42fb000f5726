//! Snapshots of the SQL rendered for seek plans.

use insta::assert_snapshot;
use seek_sql::{
    CodecRegistry, CursorEnv, Operator, PageRequest, Paginator, Seek, SeekPlan, SeekSpec,
    SortKey, UniformSeek, Value, postgres, sqlite,
};

struct Post {
    id: i64,
    created_at: String,
}

struct User {
    id: i64,
    email: Option<String>,
}

// Plain cursors keep the payloads readable: tag, then the JSON values
fn plan_sql<S: Seek>(
    seek: S,
    cursor: Option<&str>,
    render: impl Fn(&SeekPlan) -> String,
) -> String {
    let paginator = Paginator::new(seek).with_env(CursorEnv::plain());
    let mut request = PageRequest::first(20);
    if let Some(cursor) = cursor {
        request = request.with_cursor(cursor);
    }
    render(&paginator.plan(&request).unwrap().plan)
}

fn newest_first() -> SeekSpec<Post> {
    SeekSpec::builder(&CodecRegistry::with_defaults())
        .key(SortKey::new("created_at", |p: &Post| p.created_at.clone()).desc())
        .key(SortKey::new("id", |p: &Post| p.id).desc())
        .build()
        .unwrap()
}

fn postgres_posts(plan: &SeekPlan) -> String {
    postgres("posts")
        .fields(&["id", "title"])
        .filter("published", Operator::Eq, Value::Bool(true))
        .seek(plan)
        .sql
}

fn sqlite_posts(plan: &SeekPlan) -> String {
    sqlite("posts")
        .fields(&["id", "title"])
        .filter("published", Operator::Eq, Value::Bool(true))
        .seek(plan)
        .sql
}

#[test]
fn test_first_page() {
    assert_snapshot!(
        plan_sql(newest_first(), None, postgres_posts),
        @"SELECT id, title FROM posts WHERE published = $1 ORDER BY created_at DESC, id DESC LIMIT 21"
    );
}

#[test]
fn test_forward_page() {
    assert_snapshot!(
        plan_sql(newest_first(), Some(r#">["2024-01-15",42]"#), postgres_posts),
        @"SELECT id, title FROM posts WHERE published = $1 AND (created_at < $2 OR (created_at = $3 AND id < $4)) ORDER BY created_at DESC, id DESC LIMIT 21"
    );
}

#[test]
fn test_backward_page() {
    assert_snapshot!(
        plan_sql(newest_first(), Some(r#"<["2024-01-15",42]"#), postgres_posts),
        @"SELECT id, title FROM posts WHERE published = $1 AND (created_at > $2 OR (created_at = $3 AND id > $4)) ORDER BY created_at ASC, id ASC LIMIT 21"
    );
}

#[test]
fn test_forward_page_sqlite() {
    assert_snapshot!(
        plan_sql(newest_first(), Some(r#">["2024-01-15",42]"#), sqlite_posts),
        @"SELECT id, title FROM posts WHERE published = ?1 AND (created_at < ?2 OR (created_at = ?3 AND id < ?4)) ORDER BY created_at DESC, id DESC LIMIT 21"
    );
}

#[test]
fn test_tuple_pages() {
    let tuple = || {
        UniformSeek::descending(&CodecRegistry::with_defaults())
            .key("created_at", |p: &Post| p.created_at.clone())
            .key("id", |p: &Post| p.id)
            .build()
            .unwrap()
    };
    assert_snapshot!(
        plan_sql(tuple(), Some(r#">["2024-01-15",42]"#), sqlite_posts),
        @"SELECT id, title FROM posts WHERE published = ?1 AND (created_at, id) < (?2, ?3) ORDER BY created_at DESC, id DESC LIMIT 21"
    );
    assert_snapshot!(
        plan_sql(tuple(), Some(r#"<["2024-01-15",42]"#), postgres_posts),
        @"SELECT id, title FROM posts WHERE published = $1 AND (created_at, id) > ($2, $3) ORDER BY created_at ASC, id ASC LIMIT 21"
    );
}

#[test]
fn test_nullable_key_pages() {
    let by_email = || {
        SeekSpec::builder(&CodecRegistry::with_defaults())
            .key(SortKey::nullable("email", |u: &User| u.email.clone()))
            .key(SortKey::new("id", |u: &User| u.id))
            .build()
            .unwrap()
    };
    let users = |plan: &SeekPlan| postgres("users").seek(plan).sql;

    assert_snapshot!(
        plan_sql(by_email(), Some(r#">["a@example.com",7]"#), users),
        @"SELECT * FROM users WHERE (email > $1 OR email IS NULL OR (email = $2 AND id > $3)) ORDER BY email ASC NULLS LAST, id ASC LIMIT 21"
    );
    assert_snapshot!(
        plan_sql(by_email(), Some(">[null,7]"), users),
        @"SELECT * FROM users WHERE (email IS NULL AND id > $1) ORDER BY email ASC NULLS LAST, id ASC LIMIT 21"
    );
    assert_snapshot!(
        plan_sql(by_email(), Some("<[null,7]"), users),
        @"SELECT * FROM users WHERE (email IS NOT NULL OR (email IS NULL AND id < $1)) ORDER BY email DESC NULLS FIRST, id DESC LIMIT 21"
    );
}

#[test]
fn test_count_ignores_seek() {
    let posts = postgres("posts").filter("published", Operator::Eq, Value::Bool(true));
    assert_snapshot!(
        posts.build_count().sql,
        @"SELECT COUNT(*) AS count FROM posts WHERE published = $1"
    );
}
