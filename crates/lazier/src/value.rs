use std::{
    borrow::Cow,
    collections::BTreeMap,
    fmt::{self, Debug, Display, Formatter},
};

use crate::{Error, Force, Ident, Result, Shared, number::Number};

pub type Map = BTreeMap<Ident, Value>;

/// One segment of a pointer path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    Field(Ident),
    /// Negative indices count from the end of a sequence.
    Index(i64),
}

impl From<&str> for Key {
    fn from(s: &str) -> Self {
        Key::Field(Ident::new(s))
    }
}

impl From<String> for Key {
    fn from(s: String) -> Self {
        Key::Field(Ident::new(&s))
    }
}

impl From<Ident> for Key {
    fn from(ident: Ident) -> Self {
        Key::Field(ident)
    }
}

impl From<i64> for Key {
    fn from(i: i64) -> Self {
        Key::Index(i)
    }
}

impl From<i32> for Key {
    fn from(i: i32) -> Self {
        Key::Index(i as i64)
    }
}

impl From<usize> for Key {
    fn from(i: usize) -> Self {
        // Indices beyond i64 stay out of range instead of wrapping negative.
        Key::Index(i64::try_from(i).unwrap_or(i64::MAX))
    }
}

impl Display for Key {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Key::Field(ident) => write!(f, "{}", ident),
            Key::Index(i) => write!(f, "{}", i),
        }
    }
}

/// Builds a path out of mixed field names and indices.
///
/// ```
/// use lazier::{Key, path};
///
/// assert_eq!(path!["e", "g", 0], vec![Key::from("e"), Key::from("g"), Key::Index(0)]);
/// ```
#[macro_export]
macro_rules! path {
    ($($key:expr),* $(,)?) => {
        vec![$($crate::Key::from($key)),*]
    };
}

/// A concrete datum, or a deferred one behind [`Value::Lazy`].
#[derive(Clone, Default)]
pub enum Value {
    Number(Number),
    Bool(bool),
    String(String),
    Array(Vec<Value>),
    Dict(Map),
    Lazy(Shared<dyn Force>),
    #[default]
    None,
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Dict(a), Value::Dict(b)) => a == b,
            (Value::Lazy(a), Value::Lazy(b)) => {
                std::ptr::addr_eq(Shared::as_ptr(a), Shared::as_ptr(b))
            }
            (Value::None, Value::None) => true,
            _ => false,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<Number> for Value {
    fn from(n: Number) -> Self {
        Value::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n.into())
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(n.into())
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n.into())
    }
}

impl From<Vec<Value>> for Value {
    fn from(arr: Vec<Value>) -> Self {
        Value::Array(arr)
    }
}

impl From<Map> for Value {
    fn from(map: Map) -> Self {
        Value::Dict(map)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::None, Into::into)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::None,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n.into()),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(a) => Value::Array(a.into_iter().map(Value::from).collect()),
            serde_json::Value::Object(o) => Value::Dict(
                o.into_iter()
                    .map(|(k, v)| (Ident::new(&k), Value::from(v)))
                    .collect(),
            ),
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let value: Cow<'_, str> = match self {
            Self::String(s) => Cow::Borrowed(s),
            a => a.string(),
        };
        write!(f, "{}", value)
    }
}

impl Debug for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.string())
    }
}

impl Value {
    pub const NONE: Value = Self::None;
    pub const TRUE: Value = Self::Bool(true);
    pub const FALSE: Value = Self::Bool(false);
    pub const EMPTY_ARRAY: Value = Self::Array(Vec::new());

    /// Wraps anything force-able so it can sit inside the data tree.
    pub fn lazy<F: Force + 'static>(source: F) -> Value {
        Value::Lazy(Shared::new(source))
    }

    #[inline(always)]
    pub fn new_dict() -> Value {
        Value::Dict(BTreeMap::new())
    }

    #[inline(always)]
    pub fn name(&self) -> &'static str {
        match self {
            Value::Number(_) => "number",
            Value::Bool(_) => "bool",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Dict(_) => "dict",
            Value::Lazy(_) => "lazy",
            Value::None => "None",
        }
    }

    #[inline(always)]
    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }

    #[inline(always)]
    pub fn is_lazy(&self) -> bool {
        matches!(self, Value::Lazy(_))
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        match self {
            Value::Array(a) => a.is_empty(),
            Value::String(s) => s.is_empty(),
            Value::Dict(m) => m.is_empty(),
            Value::None => true,
            _ => false,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<Number> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_dict(&self) -> Option<&Map> {
        match self {
            Value::Dict(m) => Some(m),
            _ => None,
        }
    }

    /// Looks up one path segment.
    ///
    /// Dicts answer field keys, arrays answer index keys; a missing entry is
    /// `Ok(None)`. Looking up an index in a dict is also a miss. Every other
    /// combination is a shape mismatch.
    pub fn get(&self, key: &Key) -> Result<Option<&Value>> {
        match (self, key) {
            (Value::Dict(map), Key::Field(ident)) => Ok(map.get(ident)),
            (Value::Dict(_), Key::Index(_)) => Ok(None),
            (Value::Array(array), Key::Index(i)) => {
                let len = array.len() as i64;
                let i = if *i < 0 { len + i } else { *i };
                if (0..len).contains(&i) {
                    Ok(array.get(i as usize))
                } else {
                    Ok(None)
                }
            }
            _ => Err(Error::ShapeMismatch {
                key: key.clone(),
                found: self.name(),
            }),
        }
    }

    /// Coerces into a sequence: `None` is empty, a dict becomes `[key, value]`
    /// pairs and any other value becomes a single element.
    pub fn into_vec(self) -> Vec<Value> {
        match self {
            Value::None => Vec::new(),
            Value::Array(a) => a,
            Value::Dict(map) => map
                .into_iter()
                .map(|(k, v)| Value::Array(vec![Value::String(k.as_str()), v]))
                .collect(),
            other => vec![other],
        }
    }

    /// Coerces into a map: `None` is empty, a dict is itself, anything else is
    /// rejected.
    pub fn into_map(self) -> Result<Map> {
        match self {
            Value::None => Ok(Map::new()),
            Value::Dict(map) => Ok(map),
            other => Err(Error::Coercion {
                expected: "dict",
                found: other.name(),
            }),
        }
    }

    fn string(&self) -> Cow<'_, str> {
        match self {
            Self::Number(n) => Cow::Owned(n.to_string()),
            Self::Bool(b) => Cow::Owned(b.to_string()),
            Self::String(s) => Cow::Owned(format!(r#""{}""#, s)),
            Self::Array(a) => Cow::Owned(format!(
                "[{}]",
                a.iter()
                    .map(|v| v.string())
                    .collect::<Vec<_>>()
                    .join(", ")
            )),
            Self::Dict(map) => Cow::Owned(format!(
                "{{{}}}",
                map.iter()
                    .map(|(k, v)| format!(r#""{}": {}"#, k, v.string()))
                    .collect::<Vec<_>>()
                    .join(", ")
            )),
            Self::Lazy(_) => Cow::Borrowed("<lazy>"),
            Self::None => Cow::Borrowed("None"),
        }
    }
}
