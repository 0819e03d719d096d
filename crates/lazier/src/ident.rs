use std::{
    cmp::Ordering,
    sync::{LazyLock, Mutex, MutexGuard, PoisonError},
};

use string_interner::{DefaultBackend, DefaultSymbol, StringInterner};

static STRING_INTERNER: LazyLock<Mutex<StringInterner<DefaultBackend>>> =
    LazyLock::new(|| Mutex::new(StringInterner::default()));

fn interner() -> MutexGuard<'static, StringInterner<DefaultBackend>> {
    STRING_INTERNER
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
}

/// An interned field name, used for dict keys and field path segments.
///
/// Ordering follows the resolved text, so dicts keyed by `Ident` iterate
/// alphabetically regardless of interning order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ident(DefaultSymbol);

impl Ident {
    pub fn new(s: &str) -> Self {
        Self(interner().get_or_intern(s))
    }

    pub fn as_str(&self) -> String {
        self.resolve_with(str::to_string)
    }

    pub fn resolve_with<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&str) -> R,
    {
        let interner = interner();
        f(interner.resolve(self.0).unwrap_or_default())
    }
}

impl PartialOrd for Ident {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Ident {
    fn cmp(&self, other: &Self) -> Ordering {
        if self.0 == other.0 {
            return Ordering::Equal;
        }

        let interner = interner();
        let lhs = interner.resolve(self.0).unwrap_or_default();
        let rhs = interner.resolve(other.0).unwrap_or_default();
        lhs.cmp(rhs)
    }
}

impl Default for Ident {
    fn default() -> Self {
        Ident::new("")
    }
}

impl From<&str> for Ident {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Ident {
    fn from(s: String) -> Self {
        Self::new(&s)
    }
}

impl From<&String> for Ident {
    fn from(s: &String) -> Self {
        Self::new(s)
    }
}

impl std::fmt::Display for Ident {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.resolve_with(|s| write!(f, "{}", s))
    }
}
