//! Sort keys: column, direction, null placement and value access.

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::builder::{CursorDirection, NullOrder, SortDir, SortField, Value};
use crate::codec::{CodecRegistry, Encoded, ValueCodec};
use crate::validate::assert_valid_column_ref;

use super::SpecError;

/// Marker for value types that can never be `NULL`.
///
/// Implemented for the primitive scalars and `String`, and never for
/// `Option<T>`. The tuple fast path only accepts keys of these types.
/// Implement it for your own non-optional key types.
pub trait NonNull {}

macro_rules! non_null {
    ($($ty:ty),*) => {
        $(impl NonNull for $ty {})*
    };
}

non_null!(i8, i16, i32, i64, u8, u16, u32, f64, bool, String);

/// Reads one key from a row and converts it to and from its cursor form.
pub(crate) trait KeyAccess<R>: Send + Sync {
    fn encode(&self, row: &R) -> Encoded;

    /// `None` when `encoded` does not fit the key's declared type.
    fn decode(&self, encoded: &Encoded) -> Option<Value>;
}

struct Plain<T, F> {
    extract: F,
    codec: Arc<dyn ValueCodec<T>>,
}

impl<R, T, F> KeyAccess<R> for Plain<T, F>
where
    T: Into<Value>,
    F: Fn(&R) -> T + Send + Sync,
{
    fn encode(&self, row: &R) -> Encoded {
        self.codec.encode(&(self.extract)(row))
    }

    fn decode(&self, encoded: &Encoded) -> Option<Value> {
        self.codec.decode(encoded).map(Into::into)
    }
}

struct Optional<T, F> {
    extract: F,
    codec: Arc<dyn ValueCodec<T>>,
}

impl<R, T, F> KeyAccess<R> for Optional<T, F>
where
    T: Into<Value>,
    F: Fn(&R) -> Option<T> + Send + Sync,
{
    fn encode(&self, row: &R) -> Encoded {
        (self.extract)(row).map_or(Encoded::Null, |value| self.codec.encode(&value))
    }

    fn decode(&self, encoded: &Encoded) -> Option<Value> {
        if encoded.is_null() {
            return Some(Value::Null);
        }
        self.codec.decode(encoded).map(Into::into)
    }
}

type Resolver<R> =
    Box<dyn FnOnce(&CodecRegistry) -> Option<Arc<dyn KeyAccess<R>>> + Send + Sync>;

/// One sort column of a seek.
///
/// `T` is the key's value type. Non-null keys are created with
/// [`SortKey::new`]; keys whose column may hold `NULL` are created with
/// [`SortKey::nullable`] and have `T = Option<_>`.
///
/// ```
/// use seek_sql::SortKey;
///
/// struct User { id: i64, email: Option<String> }
///
/// let id = SortKey::new("id", |u: &User| u.id).desc();
/// let email = SortKey::nullable("email", |u: &User| u.email.clone()).nulls_first();
/// # let _ = (id, email);
/// ```
pub struct SortKey<R, T> {
    column: String,
    dir: SortDir,
    nulls: Option<NullOrder>,
    nullable: bool,
    type_name: &'static str,
    resolve: Resolver<R>,
    _value: PhantomData<fn() -> T>,
}

impl<R, T> SortKey<R, T>
where
    R: 'static,
    T: NonNull + Into<Value> + 'static,
{
    /// A non-null ascending key.
    ///
    /// # Panics
    ///
    /// Panics if `column` is not a valid column reference.
    pub fn new<F>(column: impl Into<String>, extract: F) -> Self
    where
        F: Fn(&R) -> T + Send + Sync + 'static,
    {
        let column = column.into();
        assert_valid_column_ref(&column, "sort key");
        Self {
            column,
            dir: SortDir::Asc,
            nulls: None,
            nullable: false,
            type_name: std::any::type_name::<T>(),
            resolve: Box::new(move |registry| {
                let codec = registry.get::<T>()?;
                Some(Arc::new(Plain { extract, codec }) as Arc<dyn KeyAccess<R>>)
            }),
            _value: PhantomData,
        }
    }
}

impl<R, T> SortKey<R, Option<T>>
where
    R: 'static,
    T: Into<Value> + 'static,
{
    /// An ascending key over a column that may hold `NULL`.
    ///
    /// The codec registered for `T` is used for present values.
    ///
    /// # Panics
    ///
    /// Panics if `column` is not a valid column reference.
    pub fn nullable<F>(column: impl Into<String>, extract: F) -> Self
    where
        F: Fn(&R) -> Option<T> + Send + Sync + 'static,
    {
        let column = column.into();
        assert_valid_column_ref(&column, "sort key");
        Self {
            column,
            dir: SortDir::Asc,
            nulls: None,
            nullable: true,
            type_name: std::any::type_name::<T>(),
            resolve: Box::new(move |registry| {
                let codec = registry.get::<T>()?;
                Some(Arc::new(Optional { extract, codec }) as Arc<dyn KeyAccess<R>>)
            }),
            _value: PhantomData,
        }
    }

    /// Sort `NULL`s before every non-null value.
    pub const fn nulls_first(mut self) -> Self {
        self.nulls = Some(NullOrder::First);
        self
    }

    /// Sort `NULL`s after every non-null value.
    pub const fn nulls_last(mut self) -> Self {
        self.nulls = Some(NullOrder::Last);
        self
    }
}

impl<R, T> SortKey<R, T> {
    /// Sort ascending.
    pub fn asc(mut self) -> Self {
        self.dir = SortDir::Asc;
        self
    }

    /// Sort descending.
    pub fn desc(mut self) -> Self {
        self.dir = SortDir::Desc;
        self
    }

    /// The column name.
    pub fn column(&self) -> &str {
        &self.column
    }

    /// The declared direction.
    pub const fn dir(&self) -> SortDir {
        self.dir
    }

    pub(crate) fn resolve(self, registry: &CodecRegistry) -> Result<KeyColumn<R>, SpecError> {
        let Self {
            column,
            dir,
            nulls,
            nullable,
            type_name,
            resolve,
            ..
        } = self;
        let access = resolve(registry).ok_or_else(|| SpecError::MissingCodec {
            column: column.clone(),
            type_name,
        })?;
        Ok(KeyColumn {
            column,
            dir,
            // Only nullable keys carry a placement, defaulted from the direction
            nulls: nullable.then(|| nulls.unwrap_or_else(|| NullOrder::default_for(dir))),
            access,
        })
    }
}

impl<R, T> fmt::Debug for SortKey<R, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SortKey")
            .field("column", &self.column)
            .field("dir", &self.dir)
            .field("nulls", &self.nulls)
            .field("nullable", &self.nullable)
            .field("type", &self.type_name)
            .finish_non_exhaustive()
    }
}

/// A sort key with its codec resolved.
pub struct KeyColumn<R> {
    column: String,
    dir: SortDir,
    nulls: Option<NullOrder>,
    access: Arc<dyn KeyAccess<R>>,
}

impl<R> Clone for KeyColumn<R> {
    fn clone(&self) -> Self {
        Self {
            column: self.column.clone(),
            dir: self.dir,
            nulls: self.nulls,
            access: Arc::clone(&self.access),
        }
    }
}

impl<R> KeyColumn<R> {
    /// The column name.
    pub fn column(&self) -> &str {
        &self.column
    }

    /// The declared direction.
    pub const fn dir(&self) -> SortDir {
        self.dir
    }

    /// Null placement, `None` for non-null keys.
    pub const fn nulls(&self) -> Option<NullOrder> {
        self.nulls
    }

    /// Whether the column may hold `NULL`.
    pub const fn is_nullable(&self) -> bool {
        self.nulls.is_some()
    }

    /// The ordering item for a traversal direction.
    ///
    /// Backward traversal reverses the whole order, so both the direction
    /// and the null placement flip.
    pub fn sort_field(&self, direction: CursorDirection) -> SortField {
        let field = SortField {
            field: self.column.clone(),
            dir: self.dir,
            nulls: self.nulls,
        };
        if direction.is_backward() {
            field.reversed()
        } else {
            field
        }
    }

    pub(crate) fn encode(&self, row: &R) -> Encoded {
        self.access.encode(row)
    }

    pub(crate) fn decode(&self, encoded: &Encoded) -> Option<Value> {
        self.access.decode(encoded)
    }
}

impl<R> fmt::Debug for KeyColumn<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyColumn")
            .field("column", &self.column)
            .field("dir", &self.dir)
            .field("nulls", &self.nulls)
            .finish_non_exhaustive()
    }
}
