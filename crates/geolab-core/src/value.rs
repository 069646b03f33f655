//! Type-erased backend values and call arguments
//!
//! A [`Value`] is an immutable, cheaply clonable handle to any backend-native
//! object (an array, a scalar, a sparse matrix, a random generator, a dtype).
//! The registry only ever inspects its [`TypeId`]; implementations recover the
//! concrete type with [`Value::get`].

use crate::error::{Error, Result};
use std::any::{Any, TypeId};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Immutable handle to a backend value of any type
#[derive(Clone)]
pub struct Value {
    inner: Arc<dyn Any + Send + Sync>,
    type_id: TypeId,
    type_name: &'static str,
}

impl Value {
    /// Wrap a backend-native value
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self {
            inner: Arc::new(value),
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
        }
    }

    /// Runtime type used for dispatch
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Fully qualified name of the wrapped type
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Check whether the wrapped value has type `T`
    pub fn is<T: Any>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }

    /// Borrow the wrapped value if it has type `T`
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }

    /// Borrow the wrapped value, failing with [`Error::InvalidArgument`] on a type mismatch
    pub fn get<T: Any>(&self) -> Result<&T> {
        self.downcast_ref::<T>().ok_or_else(|| {
            Error::type_mismatch("value", std::any::type_name::<T>(), self.type_name)
        })
    }

    /// Extract an owned copy of the wrapped value
    ///
    /// Avoids the copy when this handle is the only one left.
    pub fn take<T: Any + Send + Sync + Clone>(self) -> Result<T> {
        let type_name = self.type_name;
        let arc = self.inner.downcast::<T>().map_err(|_| {
            Error::type_mismatch("value", std::any::type_name::<T>(), type_name)
        })?;
        Ok(Arc::try_unwrap(arc).unwrap_or_else(|shared| (*shared).clone()))
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Value")
            .field("type", &self.type_name)
            .finish_non_exhaustive()
    }
}

/// Positional and keyword arguments for one registry call
#[derive(Clone, Debug, Default)]
pub struct CallArgs {
    positional: Vec<Value>,
    keywords: BTreeMap<String, Value>,
}

impl CallArgs {
    /// Create arguments from positional values
    pub fn new(positional: impl IntoIterator<Item = Value>) -> Self {
        Self {
            positional: positional.into_iter().collect(),
            keywords: BTreeMap::new(),
        }
    }

    /// Add a keyword argument wrapping `value`
    pub fn with<T: Any + Send + Sync>(self, name: &str, value: T) -> Self {
        self.with_value(name, Value::new(value))
    }

    /// Add a keyword argument that is already a [`Value`]
    pub fn with_value(mut self, name: &str, value: Value) -> Self {
        self.keywords.insert(name.to_string(), value);
        self
    }

    /// Positional arguments in call order
    pub fn positional(&self) -> &[Value] {
        &self.positional
    }

    /// Keyword arguments by name
    pub fn keywords(&self) -> &BTreeMap<String, Value> {
        &self.keywords
    }

    /// Number of positional arguments
    pub fn len(&self) -> usize {
        self.positional.len()
    }

    /// Whether there are no positional arguments
    pub fn is_empty(&self) -> bool {
        self.positional.is_empty()
    }

    /// Positional argument at `index`
    pub fn value(&self, index: usize) -> Result<&Value> {
        self.positional.get(index).ok_or_else(|| {
            Error::InvalidArgument(format!(
                "missing positional argument {index} (got {})",
                self.positional.len()
            ))
        })
    }

    /// Positional argument at `index`, downcast to `T`
    pub fn arg<T: Any>(&self, index: usize) -> Result<&T> {
        let value = self.value(index)?;
        value.downcast_ref::<T>().ok_or_else(|| {
            Error::type_mismatch(
                &format!("argument {index}"),
                std::any::type_name::<T>(),
                value.type_name(),
            )
        })
    }

    /// Keyword argument `name`, if supplied
    pub fn keyword_value(&self, name: &str) -> Option<&Value> {
        self.keywords.get(name)
    }

    /// Keyword argument `name` downcast to `T`, if supplied
    pub fn keyword<T: Any>(&self, name: &str) -> Result<Option<&T>> {
        match self.keywords.get(name) {
            None => Ok(None),
            Some(value) => value.downcast_ref::<T>().map(Some).ok_or_else(|| {
                Error::type_mismatch(
                    &format!("keyword `{name}`"),
                    std::any::type_name::<T>(),
                    value.type_name(),
                )
            }),
        }
    }

    /// Keyword argument `name`, or `default` when absent
    pub fn keyword_or<T: Any + Clone>(&self, name: &str, default: T) -> Result<T> {
        Ok(self.keyword::<T>(name)?.cloned().unwrap_or(default))
    }

    /// Keyword argument `name`, which must be supplied
    pub fn require<T: Any>(&self, name: &str) -> Result<&T> {
        self.keyword::<T>(name)?
            .ok_or_else(|| Error::missing_keyword(name))
    }

    /// Comma-separated runtime type names, used in diagnostics
    pub fn describe(&self) -> String {
        let mut parts: Vec<String> = self
            .positional
            .iter()
            .map(|v| v.type_name().to_string())
            .collect();
        parts.extend(
            self.keywords
                .iter()
                .map(|(name, v)| format!("{name}={}", v.type_name())),
        );
        parts.join(", ")
    }
}

/// Output of a registry call: one value or a tuple
#[derive(Clone, Debug)]
pub enum Returned {
    Value(Value),
    Tuple(Vec<Value>),
}

impl Returned {
    /// Wrap a single backend value
    pub fn single<T: Any + Send + Sync>(value: T) -> Self {
        Self::Value(Value::new(value))
    }

    /// Wrap a pair of backend values
    pub fn pair<A: Any + Send + Sync, B: Any + Send + Sync>(a: A, b: B) -> Self {
        Self::Tuple(vec![Value::new(a), Value::new(b)])
    }

    /// Expect a single value
    pub fn into_value(self) -> Result<Value> {
        match self {
            Self::Value(v) => Ok(v),
            Self::Tuple(items) => Err(Error::InvalidArgument(format!(
                "expected a single value, got a tuple of {}",
                items.len()
            ))),
        }
    }

    /// Expect a two-element tuple
    pub fn into_pair(self) -> Result<(Value, Value)> {
        match self {
            Self::Tuple(items) if items.len() == 2 => {
                let mut it = items.into_iter();
                match (it.next(), it.next()) {
                    (Some(a), Some(b)) => Ok((a, b)),
                    _ => unreachable!("length checked above"),
                }
            }
            Self::Tuple(items) => Err(Error::InvalidArgument(format!(
                "expected a pair, got a tuple of {}",
                items.len()
            ))),
            Self::Value(v) => Err(Error::InvalidArgument(format!(
                "expected a pair, got a single {}",
                v.type_name()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_downcast() {
        let v = Value::new(3.5f64);
        assert!(v.is::<f64>());
        assert!(!v.is::<f32>());
        assert_eq!(v.get::<f64>().unwrap(), &3.5);
        assert!(v.get::<i64>().is_err());
        assert_eq!(v.type_name(), "f64");
    }

    #[test]
    fn test_value_clone_shares_payload() {
        let v = Value::new(vec![1.0f64, 2.0]);
        let w = v.clone();
        assert!(std::ptr::eq(
            v.get::<Vec<f64>>().unwrap(),
            w.get::<Vec<f64>>().unwrap()
        ));
        assert_eq!(w.take::<Vec<f64>>().unwrap(), vec![1.0, 2.0]);
        assert_eq!(v.take::<Vec<f64>>().unwrap(), vec![1.0, 2.0]);
    }

    #[test]
    fn test_call_args_accessors() {
        let args = CallArgs::new([Value::new(1.0f64), Value::new(2i64)])
            .with("axis", 1isize);

        assert_eq!(args.len(), 2);
        assert_eq!(*args.arg::<f64>(0).unwrap(), 1.0);
        assert_eq!(*args.arg::<i64>(1).unwrap(), 2);
        assert!(args.arg::<f64>(1).is_err());
        assert!(args.arg::<f64>(2).is_err());

        assert_eq!(args.keyword_or("axis", 0isize).unwrap(), 1);
        assert_eq!(args.keyword_or("missing", 7usize).unwrap(), 7);
        assert!(args.keyword::<usize>("axis").is_err());
        assert!(matches!(
            args.require::<usize>("k"),
            Err(Error::InvalidArgument(_))
        ));
        assert_eq!(args.describe(), "f64, i64, axis=isize");
    }

    #[test]
    fn test_returned_shapes() {
        let single = Returned::single(1.0f64);
        assert!(single.clone().into_pair().is_err());
        assert_eq!(*single.into_value().unwrap().get::<f64>().unwrap(), 1.0);

        let pair = Returned::pair(1.0f64, -2.0f64);
        assert!(pair.clone().into_value().is_err());
        let (a, b) = pair.into_pair().unwrap();
        assert_eq!(*a.get::<f64>().unwrap(), 1.0);
        assert_eq!(*b.get::<f64>().unwrap(), -2.0);
    }
}
