use std::fmt;

use itertools::Itertools;
use smallvec::SmallVec;

use crate::{
    Enumeration, Force, Key, Map, Options, Result, Shared, Value, View, ViewKind, force,
};

pub type Path = SmallVec<[Key; 4]>;

/// An unevaluated reference into nested data: a root plus a path.
///
/// Digging never evaluates anything and never nests pointers: the new pointer
/// shares this pointer's root and extends its path, so forcing stays a single
/// walk no matter how many times `dig` was chained.
#[derive(Debug, Clone, PartialEq)]
pub struct Pointer {
    root: Value,
    path: Path,
    options: Options,
}

impl Pointer {
    pub fn new(root: impl Into<Value>) -> Self {
        Self {
            root: root.into(),
            path: Path::new(),
            options: Options::default(),
        }
    }

    /// Roots a pointer at something force-able, typically a shared
    /// [`Memo`](crate::Memo).
    pub fn from_source(source: Shared<dyn Force>) -> Self {
        Self::new(Value::Lazy(source))
    }

    pub fn with_options(mut self, options: Options) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn root(&self) -> &Value {
        &self.root
    }

    pub fn path(&self) -> &[Key] {
        &self.path
    }

    pub fn dig<I>(&self, keys: I) -> Pointer
    where
        I: IntoIterator,
        I::Item: Into<Key>,
    {
        let mut path = self.path.clone();
        path.extend(keys.into_iter().map(Into::into));

        Pointer {
            root: self.root.clone(),
            path,
            options: self.options,
        }
    }

    pub fn field(&self, key: impl Into<Key>) -> Pointer {
        self.dig([key.into()])
    }

    pub fn dig_as<V, I>(&self, keys: I) -> V
    where
        V: View,
        I: IntoIterator,
        I::Item: Into<Key>,
    {
        V::from(self.dig(keys))
    }

    pub fn view<V: View>(&self) -> V {
        V::from(self.clone())
    }

    /// Resolves the root, walks the path and unwraps the result.
    ///
    /// An absent value anywhere along the path makes the whole result absent.
    /// A value that cannot be looked up into fails with
    /// [`Error::ShapeMismatch`](crate::Error::ShapeMismatch).
    pub fn force(&self) -> Result<Value> {
        self.walk(&self.root, &self.path)
    }

    /// Walks by reference: cached sources lend their value, and only the
    /// value found at the end of the path is cloned.
    fn walk(&self, current: &Value, path: &[Key]) -> Result<Value> {
        if current.is_lazy() {
            return force::resolve(current, &self.options, &mut |value| self.walk(value, path));
        }

        let Some((key, rest)) = path.split_first() else {
            return Ok(current.clone());
        };

        if current.is_none() {
            tracing::trace!(%key, pointer = %self, "absent value, skipping the rest of the path");
            return Ok(Value::None);
        }

        tracing::trace!(%key, found = current.name(), "digging");
        match current.get(key)? {
            Some(next) => self.walk(next, rest),
            None => Ok(Value::None),
        }
    }

    /// Forces and coerces into a sequence, see [`Value::into_vec`].
    pub fn to_vec(&self) -> Result<Vec<Value>> {
        Ok(self.force()?.into_vec())
    }

    /// Forces and coerces into a map, see [`Value::into_map`].
    pub fn to_map(&self) -> Result<Map> {
        self.force()?.into_map()
    }

    pub fn lazy(&self) -> Enumeration {
        let pointer = self.clone();
        Enumeration::new(move || pointer.to_vec())
    }
}

impl Force for Pointer {
    fn force(&self) -> Result<Value> {
        Pointer::force(self)
    }
}

impl View for Pointer {
    const KIND: ViewKind = ViewKind::Indexed;

    fn pointer(&self) -> &Pointer {
        self
    }
}

impl From<Pointer> for Value {
    fn from(pointer: Pointer) -> Self {
        Value::lazy(pointer)
    }
}

impl fmt::Display for Pointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} in {:?}", self.path.iter().join("."), self.root)
    }
}
