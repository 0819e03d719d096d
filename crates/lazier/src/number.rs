use std::cmp::Ordering;
use std::fmt;

#[derive(Debug, Clone, Copy)]
enum Repr {
    /// Wide enough for every `i64` and `u64`, so ingested integers stay exact.
    Int(i128),
    Float(f64),
}

/// Numeric scalar held by a [`Value`](crate::Value).
#[derive(Debug, Clone, Copy)]
pub struct Number(Repr);

impl Number {
    /// Creates a new `Number` from an `f64` value.
    pub fn new(value: f64) -> Self {
        Number(Repr::Float(value))
    }

    /// Returns the value as an `f64`, rounding integers that do not fit.
    pub fn value(&self) -> f64 {
        match self.0 {
            Repr::Int(i) => i as f64,
            Repr::Float(f) => f,
        }
    }

    /// Returns the value as an `i64`, truncating any fractional part and
    /// saturating at the bounds.
    pub fn to_int(self) -> i64 {
        match self.0 {
            Repr::Int(i) => i64::try_from(i).unwrap_or(if i < 0 { i64::MIN } else { i64::MAX }),
            Repr::Float(f) => f as i64,
        }
    }

    /// The exact integer, if this number was created from one that fits.
    pub fn as_i64(&self) -> Option<i64> {
        match self.0 {
            Repr::Int(i) => i64::try_from(i).ok(),
            Repr::Float(_) => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self.0 {
            Repr::Int(i) => u64::try_from(i).ok(),
            Repr::Float(_) => None,
        }
    }

    /// Returns `true` if the number represents an integer value.
    ///
    /// Uses epsilon comparison to account for floating-point precision.
    pub fn is_int(&self) -> bool {
        match self.0 {
            Repr::Int(_) => true,
            Repr::Float(f) => (f - f.trunc()).abs() < f64::EPSILON,
        }
    }
}

impl Default for Number {
    fn default() -> Self {
        Number(Repr::Int(0))
    }
}

impl From<i64> for Number {
    fn from(value: i64) -> Self {
        Number(Repr::Int(value.into()))
    }
}

impl From<i32> for Number {
    fn from(value: i32) -> Self {
        Number(Repr::Int(value.into()))
    }
}

impl From<u64> for Number {
    fn from(value: u64) -> Self {
        Number(Repr::Int(value.into()))
    }
}

impl From<usize> for Number {
    fn from(value: usize) -> Self {
        Number(Repr::Int(value as i128))
    }
}

impl From<f64> for Number {
    fn from(value: f64) -> Self {
        Number::new(value)
    }
}

impl From<serde_json::Number> for Number {
    fn from(n: serde_json::Number) -> Self {
        if let Some(i) = n.as_i64() {
            i.into()
        } else if let Some(u) = n.as_u64() {
            u.into()
        } else {
            Number::new(n.as_f64().unwrap_or(f64::NAN))
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Repr::Int(i) => write!(f, "{}", i),
            Repr::Float(n) if self.is_int() => write!(f, "{}", n.trunc()),
            Repr::Float(n) => {
                let s = format!("{:.6}", n);
                let s = s.trim_end_matches('0').trim_end_matches('.');
                write!(f, "{}", s)
            }
        }
    }
}

fn cmp_floats(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
    }
}

fn cmp_int_float(i: i128, f: f64) -> Ordering {
    if f.is_nan() {
        return Ordering::Less;
    }

    let whole = f.trunc();
    // `as` saturates, so infinities and huge floats still order correctly
    match i.cmp(&(whole as i128)) {
        Ordering::Equal if f > whole => Ordering::Less,
        Ordering::Equal if f < whole => Ordering::Greater,
        ordering => ordering,
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Eq for Number {}

impl Ord for Number {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.0, other.0) {
            (Repr::Int(a), Repr::Int(b)) => a.cmp(&b),
            (Repr::Int(a), Repr::Float(b)) => cmp_int_float(a, b),
            (Repr::Float(a), Repr::Int(b)) => cmp_int_float(b, a).reverse(),
            (Repr::Float(a), Repr::Float(b)) => cmp_floats(a, b),
        }
    }
}
