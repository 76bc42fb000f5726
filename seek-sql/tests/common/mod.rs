//! SQLite-backed executor shared by the integration tests.

#![allow(dead_code)]

use rusqlite::{Connection, params_from_iter, types::Value as SqlValue};
use seek_sql::{QueryBuilder, QueryExecutor, SeekPlan, Sqlite, Value, sqlite};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: Option<String>,
}

pub const NAMES: [&str; 10] = [
    "Alice", "Bob", "Charlie", "Diana", "Eve", "Frank", "Grace", "Henry", "Iris", "Jack",
];

/// Open an in-memory database with an empty `users` table.
pub fn open() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE users (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            email TEXT
        );",
    )
    .unwrap();
    conn
}

pub fn insert(conn: &Connection, user: &User) {
    conn.execute(
        "INSERT INTO users (id, name, email) VALUES (?1, ?2, ?3)",
        rusqlite::params![user.id, user.name, user.email],
    )
    .unwrap();
}

/// Users named "Alice".."Jack" with ids 1..=10. Every third user has no email.
pub fn seed(conn: &Connection) -> Vec<User> {
    let users: Vec<User> = NAMES
        .iter()
        .zip(1..)
        .map(|(name, id)| User {
            id,
            name: (*name).to_string(),
            email: (id % 3 != 0).then(|| format!("{}@example.com", name.to_lowercase())),
        })
        .collect();
    for user in &users {
        insert(conn, user);
    }
    users
}

pub fn to_sql(value: &Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::Null,
        Value::Bool(b) => SqlValue::Integer(i64::from(*b)),
        Value::Int(n) => SqlValue::Integer(*n),
        Value::Float(f) => SqlValue::Real(*f),
        Value::String(s) => SqlValue::Text(s.clone()),
        Value::Array(_) => panic!("array parameters are expanded by the builder"),
    }
}

/// Executor rendering seek plans with the `SQLite` dialect.
pub struct SqliteExecutor<'c> {
    pub conn: &'c Connection,
    pub base: QueryBuilder<Sqlite>,
}

impl<'c> SqliteExecutor<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self {
            conn,
            base: sqlite("users").fields(&["id", "name", "email"]),
        }
    }

    pub fn with_base(conn: &'c Connection, base: QueryBuilder<Sqlite>) -> Self {
        Self { conn, base }
    }
}

impl QueryExecutor for SqliteExecutor<'_> {
    type Row = User;
    type Error = rusqlite::Error;

    fn fetch(&self, plan: &SeekPlan) -> Result<Vec<User>, rusqlite::Error> {
        let query = self.base.seek(plan);
        let mut stmt = self.conn.prepare(&query.sql)?;
        let rows = stmt.query_map(params_from_iter(query.params.iter().map(to_sql)), |row| {
            Ok(User {
                id: row.get(0)?,
                name: row.get(1)?,
                email: row.get(2)?,
            })
        })?;
        rows.collect()
    }

    fn count(&self) -> Result<u64, rusqlite::Error> {
        let query = self.base.build_count();
        let count: i64 = self.conn.query_row(
            &query.sql,
            params_from_iter(query.params.iter().map(to_sql)),
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }
}
