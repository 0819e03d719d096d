use std::fmt;

use itertools::{EitherOrBoth, Itertools};

use crate::{Force, Options, Result, Shared, Value, force};

type ValueIter = Box<dyn Iterator<Item = Value>>;
type Source = Shared<dyn Fn() -> Result<Vec<Value>>>;
type Stage = Shared<dyn Fn(ValueIter) -> Result<ValueIter>>;

fn boxed<I>(iter: I) -> Result<ValueIter>
where
    I: Iterator<Item = Value> + 'static,
{
    Ok(Box::new(iter))
}

/// A deferred chain of sequence transformations.
///
/// Nothing is forced when stages are added; the source is forced and the
/// stages run only when a terminal such as [`Enumeration::to_vec`] is called.
/// Every stage returns a new `Enumeration` and leaves `self` untouched.
#[derive(Clone)]
pub struct Enumeration {
    source: Source,
    stages: Vec<Stage>,
}

impl Enumeration {
    pub fn new<F>(source: F) -> Self
    where
        F: Fn() -> Result<Vec<Value>> + 'static,
    {
        Self {
            source: Shared::new(source),
            stages: Vec::new(),
        }
    }

    pub fn from_values(values: Vec<Value>) -> Self {
        Self::new(move || Ok(values.clone()))
    }

    /// Enumerates whatever `source` forces to, coerced with
    /// [`Value::into_vec`]. `options` bounds the unwrapping of the source.
    pub fn from_source(source: Shared<dyn Force>, options: Options) -> Self {
        let source = Value::Lazy(source);
        Self::new(move || Ok(force::unwrap(source.clone(), &options)?.into_vec()))
    }

    fn then<S>(&self, stage: S) -> Self
    where
        S: Fn(ValueIter) -> Result<ValueIter> + 'static,
    {
        let mut stages = self.stages.clone();
        stages.push(Shared::new(stage));

        Self {
            source: Shared::clone(&self.source),
            stages,
        }
    }

    pub fn map<F>(&self, f: F) -> Self
    where
        F: Fn(Value) -> Value + 'static,
    {
        let f = Shared::new(f);
        self.then(move |iter| {
            let f = Shared::clone(&f);
            boxed(iter.map(move |v| f(v)))
        })
    }

    pub fn filter<F>(&self, predicate: F) -> Self
    where
        F: Fn(&Value) -> bool + 'static,
    {
        let predicate = Shared::new(predicate);
        self.then(move |iter| {
            let predicate = Shared::clone(&predicate);
            boxed(iter.filter(move |v| predicate(v)))
        })
    }

    pub fn reject<F>(&self, predicate: F) -> Self
    where
        F: Fn(&Value) -> bool + 'static,
    {
        self.filter(move |v| !predicate(v))
    }

    pub fn filter_map<F>(&self, f: F) -> Self
    where
        F: Fn(Value) -> Option<Value> + 'static,
    {
        let f = Shared::new(f);
        self.then(move |iter| {
            let f = Shared::clone(&f);
            boxed(iter.filter_map(move |v| f(v)))
        })
    }

    /// Maps, then splices returned arrays into the output. Non-array results
    /// are kept as single elements.
    pub fn flat_map<F>(&self, f: F) -> Self
    where
        F: Fn(Value) -> Value + 'static,
    {
        let f = Shared::new(f);
        self.then(move |iter| {
            let f = Shared::clone(&f);
            boxed(iter.flat_map(move |v| match f(v) {
                Value::Array(values) => values,
                value => vec![value],
            }))
        })
    }

    pub fn take(&self, n: usize) -> Self {
        self.then(move |iter| boxed(iter.take(n)))
    }

    pub fn drop(&self, n: usize) -> Self {
        self.then(move |iter| boxed(iter.skip(n)))
    }

    pub fn take_while<F>(&self, predicate: F) -> Self
    where
        F: Fn(&Value) -> bool + 'static,
    {
        let predicate = Shared::new(predicate);
        self.then(move |iter| {
            let predicate = Shared::clone(&predicate);
            boxed(iter.take_while(move |v| predicate(v)))
        })
    }

    pub fn drop_while<F>(&self, predicate: F) -> Self
    where
        F: Fn(&Value) -> bool + 'static,
    {
        let predicate = Shared::new(predicate);
        self.then(move |iter| {
            let predicate = Shared::clone(&predicate);
            boxed(iter.skip_while(move |v| predicate(v)))
        })
    }

    /// Pairs elements with `other`'s as `[a, b]` arrays. The output is as long
    /// as `self`; missing partners are `None`.
    pub fn zip(&self, other: &Enumeration) -> Self {
        let other = other.clone();
        self.then(move |iter| {
            let others = other.to_vec()?;
            boxed(iter.zip_longest(others).filter_map(|pair| match pair {
                EitherOrBoth::Both(a, b) => Some(Value::Array(vec![a, b])),
                EitherOrBoth::Left(a) => Some(Value::Array(vec![a, Value::None])),
                EitherOrBoth::Right(_) => None,
            }))
        })
    }

    /// Groups consecutive elements into arrays while `predicate` holds for
    /// each neighbouring pair.
    pub fn chunk_while<F>(&self, predicate: F) -> Self
    where
        F: Fn(&Value, &Value) -> bool + 'static,
    {
        let predicate = Shared::new(predicate);
        self.then(move |iter| {
            let predicate = Shared::clone(&predicate);
            boxed(
                iter.map(|v| vec![v])
                    .coalesce(move |mut chunk, next| {
                        let joined = match (chunk.last(), next.first()) {
                            (Some(last), Some(first)) => predicate(last, first),
                            _ => false,
                        };
                        if joined {
                            chunk.extend(next);
                            Ok(chunk)
                        } else {
                            Err((chunk, next))
                        }
                    })
                    .map(Value::Array),
            )
        })
    }

    /// Forces the source and runs every stage.
    pub fn iter(&self) -> Result<ValueIter> {
        let mut iter: ValueIter = Box::new((self.source)()?.into_iter());
        for stage in &self.stages {
            iter = stage(iter)?;
        }
        Ok(iter)
    }

    pub fn to_vec(&self) -> Result<Vec<Value>> {
        Ok(self.iter()?.collect())
    }

    pub fn force(&self) -> Result<Vec<Value>> {
        self.to_vec()
    }

    pub fn first(&self) -> Result<Option<Value>> {
        Ok(self.iter()?.next())
    }

    pub fn count(&self) -> Result<usize> {
        Ok(self.iter()?.count())
    }

    pub fn any<F>(&self, predicate: F) -> Result<bool>
    where
        F: Fn(&Value) -> bool,
    {
        Ok(self.iter()?.any(|v| predicate(&v)))
    }

    pub fn all<F>(&self, predicate: F) -> Result<bool>
    where
        F: Fn(&Value) -> bool,
    {
        Ok(self.iter()?.all(|v| predicate(&v)))
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.first()?.is_none())
    }
}

impl fmt::Debug for Enumeration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Enumeration")
            .field("stages", &self.stages.len())
            .finish_non_exhaustive()
    }
}

impl Force for Enumeration {
    fn force(&self) -> Result<Value> {
        self.to_vec().map(Value::Array)
    }
}
