//! Per-type value codecs and the registry they are resolved from.

use std::any::{Any, TypeId, type_name};
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;

/// Transport representation shared by every value codec.
pub type Encoded = serde_json::Value;

/// Converts one sort-key value to and from its [`Encoded`] form.
///
/// `decode` returns `None` for input it cannot interpret; the seek layer
/// turns that into [`CursorError::TypeMismatch`](crate::CursorError::TypeMismatch).
pub trait ValueCodec<T>: Send + Sync {
    /// Encode a value.
    fn encode(&self, value: &T) -> Encoded;

    /// Decode a value, or `None` if `encoded` does not fit `T`.
    fn decode(&self, encoded: &Encoded) -> Option<T>;
}

/// Codec for any serde type, through `serde_json::Value`.
pub struct SerdeCodec<T>(PhantomData<fn() -> T>);

impl<T> SerdeCodec<T> {
    /// Create the codec.
    #[must_use]
    pub const fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T> Default for SerdeCodec<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for SerdeCodec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SerdeCodec<{}>", type_name::<T>())
    }
}

impl<T> ValueCodec<T> for SerdeCodec<T>
where
    T: Serialize + DeserializeOwned,
{
    fn encode(&self, value: &T) -> Encoded {
        // Non-finite floats and non-string map keys have no JSON form; they
        // encode as null and fail to decode back.
        serde_json::to_value(value).unwrap_or(Encoded::Null)
    }

    fn decode(&self, encoded: &Encoded) -> Option<T> {
        T::deserialize(encoded).ok()
    }
}

/// Codec built from a pair of closures.
///
/// ```
/// use seek_sql::{Encoded, FnCodec, ValueCodec};
///
/// // Unix seconds carried as a decimal string.
/// let codec = FnCodec::new(
///     |secs: &u64| Encoded::String(secs.to_string()),
///     |e: &Encoded| e.as_str()?.parse().ok(),
/// );
/// assert_eq!(codec.decode(&codec.encode(&1_700_000_000)), Some(1_700_000_000));
/// ```
pub struct FnCodec<T, E, D> {
    encode: E,
    decode: D,
    _marker: PhantomData<fn() -> T>,
}

impl<T, E, D> FnCodec<T, E, D>
where
    E: Fn(&T) -> Encoded + Send + Sync,
    D: Fn(&Encoded) -> Option<T> + Send + Sync,
{
    /// Create a codec from an encoder and a decoder.
    pub const fn new(encode: E, decode: D) -> Self {
        Self {
            encode,
            decode,
            _marker: PhantomData,
        }
    }
}

impl<T, E, D> fmt::Debug for FnCodec<T, E, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FnCodec<{}>", type_name::<T>())
    }
}

impl<T, E, D> ValueCodec<T> for FnCodec<T, E, D>
where
    E: Fn(&T) -> Encoded + Send + Sync,
    D: Fn(&Encoded) -> Option<T> + Send + Sync,
{
    fn encode(&self, value: &T) -> Encoded {
        (self.encode)(value)
    }

    fn decode(&self, encoded: &Encoded) -> Option<T> {
        (self.decode)(encoded)
    }
}

/// Typed map from a value type to its codec.
///
/// Sort keys look their codec up here when a seek strategy is built, so a
/// missing registration is reported before any query runs.
#[derive(Clone, Default)]
pub struct CodecRegistry {
    // Each entry holds an `Arc<dyn ValueCodec<T>>` for the keyed `T`.
    codecs: HashMap<TypeId, Arc<dyn Any + Send + Sync>>,
    names: HashMap<TypeId, &'static str>,
}

impl CodecRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with [`SerdeCodec`]s for the integer types up to
    /// 32 bits, `i64`, `f64`, `bool` and `String`.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new()
            .with::<i8>(SerdeCodec::new())
            .with::<i16>(SerdeCodec::new())
            .with::<i32>(SerdeCodec::new())
            .with::<i64>(SerdeCodec::new())
            .with::<u8>(SerdeCodec::new())
            .with::<u16>(SerdeCodec::new())
            .with::<u32>(SerdeCodec::new())
            .with::<f64>(SerdeCodec::new())
            .with::<bool>(SerdeCodec::new())
            .with::<String>(SerdeCodec::new())
    }

    /// Register (or replace) the codec for `T`.
    pub fn register<T: 'static>(&mut self, codec: impl ValueCodec<T> + 'static) -> &mut Self {
        let codec: Arc<dyn ValueCodec<T>> = Arc::new(codec);
        self.codecs.insert(TypeId::of::<T>(), Arc::new(codec));
        self.names.insert(TypeId::of::<T>(), type_name::<T>());
        self
    }

    /// Builder form of [`register`](Self::register).
    #[must_use]
    pub fn with<T: 'static>(mut self, codec: impl ValueCodec<T> + 'static) -> Self {
        self.register::<T>(codec);
        self
    }

    /// The codec registered for `T`.
    #[must_use]
    pub fn get<T: 'static>(&self) -> Option<Arc<dyn ValueCodec<T>>> {
        self.codecs
            .get(&TypeId::of::<T>())
            .and_then(|entry| entry.downcast_ref::<Arc<dyn ValueCodec<T>>>())
            .cloned()
    }

    /// Whether a codec is registered for `T`.
    #[must_use]
    pub fn contains<T: 'static>(&self) -> bool {
        self.codecs.contains_key(&TypeId::of::<T>())
    }

    /// Number of registered codecs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.codecs.len()
    }

    /// Whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.codecs.is_empty()
    }
}

impl fmt::Debug for CodecRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.names.values().copied().collect();
        names.sort_unstable();
        f.debug_struct("CodecRegistry").field("types", &names).finish()
    }
}
