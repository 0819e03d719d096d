//! Typed views over a [`Pointer`].
//!
//! A view owns no data. It decides what an absent result normalizes to and
//! which shape a present result must have:
//!
//! | view         | absent becomes | present must be |
//! |--------------|----------------|-----------------|
//! | [`MapView`]    | `{}`           | dict            |
//! | [`SeqView`]    | `[]`           | array           |
//! | [`TextView`]   | stays absent   | string          |
//! | [`ScalarView`] | stays absent   | anything        |
use crate::{Enumeration, Error, Force, Key, Map, Pointer, Result, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewKind {
    /// The plain [`Pointer`], no normalization.
    Indexed,
    Map,
    Seq,
    Text,
    Scalar,
}

pub trait View: From<Pointer> + Force {
    const KIND: ViewKind;

    fn pointer(&self) -> &Pointer;

    fn field(&self, key: impl Into<Key>) -> Pointer {
        self.pointer().field(key)
    }

    fn dig<I>(&self, keys: I) -> Pointer
    where
        I: IntoIterator,
        I::Item: Into<Key>,
    {
        self.pointer().dig(keys)
    }
}

macro_rules! impl_view {
    ($view:ident, $kind:expr) => {
        impl From<Pointer> for $view {
            fn from(pointer: Pointer) -> Self {
                Self { pointer }
            }
        }

        impl View for $view {
            const KIND: ViewKind = $kind;

            fn pointer(&self) -> &Pointer {
                &self.pointer
            }
        }
    };
}

/// A dict-shaped view; absence is autovivified into an empty map.
#[derive(Debug, Clone, PartialEq)]
pub struct MapView {
    pointer: Pointer,
}

impl_view!(MapView, ViewKind::Map);

impl MapView {
    pub fn force(&self) -> Result<Map> {
        self.pointer.force()?.into_map()
    }

    pub fn to_map(&self) -> Result<Map> {
        self.force()
    }

    /// `[key, value]` pairs in key order.
    pub fn to_vec(&self) -> Result<Vec<Value>> {
        Ok(Value::Dict(self.force()?).into_vec())
    }

    /// Forces the map, then looks `key` up in it immediately.
    pub fn get(&self, key: impl Into<Key>) -> Result<Value> {
        let key = key.into();
        Ok(Value::Dict(self.force()?)
            .get(&key)?
            .cloned()
            .unwrap_or_default())
    }

    pub fn len(&self) -> Result<usize> {
        Ok(self.force()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.force()?.is_empty())
    }

    pub fn lazy(&self) -> Enumeration {
        let view = self.clone();
        Enumeration::new(move || view.to_vec())
    }
}

impl Force for MapView {
    fn force(&self) -> Result<Value> {
        MapView::force(self).map(Value::Dict)
    }
}

/// An array-shaped view; absence is autovivified into an empty sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct SeqView {
    pointer: Pointer,
}

impl_view!(SeqView, ViewKind::Seq);

impl SeqView {
    pub fn force(&self) -> Result<Vec<Value>> {
        match self.pointer.force()? {
            Value::None => Ok(Vec::new()),
            Value::Array(array) => Ok(array),
            other => Err(Error::Coercion {
                expected: "array",
                found: other.name(),
            }),
        }
    }

    pub fn to_vec(&self) -> Result<Vec<Value>> {
        self.force()
    }

    pub fn get(&self, index: i64) -> Result<Value> {
        Ok(Value::Array(self.force()?)
            .get(&Key::Index(index))?
            .cloned()
            .unwrap_or_default())
    }

    pub fn len(&self) -> Result<usize> {
        Ok(self.force()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.force()?.is_empty())
    }

    pub fn lazy(&self) -> Enumeration {
        let view = self.clone();
        Enumeration::new(move || view.force())
    }
}

impl Force for SeqView {
    fn force(&self) -> Result<Value> {
        SeqView::force(self).map(Value::Array)
    }
}

/// A string-shaped view. Absence is kept, so callers can tell "no text" from
/// "empty text".
#[derive(Debug, Clone, PartialEq)]
pub struct TextView {
    pointer: Pointer,
}

impl_view!(TextView, ViewKind::Text);

impl TextView {
    pub fn force(&self) -> Result<Option<String>> {
        match self.pointer.force()? {
            Value::None => Ok(None),
            Value::String(s) => Ok(Some(s)),
            other => Err(Error::Coercion {
                expected: "string",
                found: other.name(),
            }),
        }
    }

    /// Like [`TextView::force`], but absence is an error.
    pub fn to_text(&self) -> Result<String> {
        self.force()?.ok_or(Error::Absent { expected: "string" })
    }

    pub fn to_vec(&self) -> Result<Vec<Value>> {
        Ok(self.force()?.into_iter().map(Value::String).collect())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.force()?.is_none_or(|s| s.is_empty()))
    }
}

impl Force for TextView {
    fn force(&self) -> Result<Value> {
        TextView::force(self).map(Value::from)
    }
}

/// A single value treated as a zero-or-one element sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarView {
    pointer: Pointer,
}

impl_view!(ScalarView, ViewKind::Scalar);

impl ScalarView {
    pub fn force(&self) -> Result<Value> {
        self.pointer.force()
    }

    pub fn to_vec(&self) -> Result<Vec<Value>> {
        Ok(match self.force()? {
            Value::None => Vec::new(),
            value => vec![value],
        })
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.force()?.is_empty())
    }

    /// Forces, then looks `key` up with the usual traversal rules.
    pub fn get(&self, key: impl Into<Key>) -> Result<Value> {
        self.pointer.field(key).force()
    }

    pub fn lazy(&self) -> Enumeration {
        let view = self.clone();
        Enumeration::new(move || view.to_vec())
    }
}

impl Force for ScalarView {
    fn force(&self) -> Result<Value> {
        ScalarView::force(self)
    }
}
