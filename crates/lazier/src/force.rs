use std::{cell::Cell, fmt::Debug};

use crate::{Error, Options, Result, Value};

/// Anything that can be resolved to a concrete [`Value`] on demand.
///
/// The returned value may itself be [`Value::Lazy`]; callers that need a
/// concrete value go through [`unwrap`].
pub trait Force: Debug {
    fn force(&self) -> Result<Value>;

    /// Forces, then hands the result to `f` by reference. Sources that cache
    /// their value lend it here instead of cloning it.
    fn force_with(&self, f: &mut dyn FnMut(&Value) -> Result<Value>) -> Result<Value> {
        f(&self.force()?)
    }
}

thread_local! {
    static DEPTH: Cell<usize> = const { Cell::new(0) };
}

/// A lazy layer currently being forced on this thread.
///
/// Layers nest across every force in progress, including forces started from
/// inside another source, so a cycle running through pointers and memos still
/// hits the bound.
struct Layer;

impl Layer {
    fn enter(options: &Options) -> Result<Self> {
        DEPTH.with(|depth| {
            let current = depth.get();
            if current >= options.max_unwrap_depth {
                tracing::debug!(depth = current, "giving up on lazy value");
                return Err(Error::UnwrapDepthExceeded(options.max_unwrap_depth));
            }

            depth.set(current + 1);
            tracing::trace!(depth = current + 1, "unwrapping lazy value");
            Ok(Layer)
        })
    }
}

impl Drop for Layer {
    fn drop(&mut self) {
        DEPTH.with(|depth| depth.set(depth.get().saturating_sub(1)));
    }
}

/// Forces `value` until it is no longer lazy and passes the concrete result to
/// `f` by reference.
pub(crate) fn resolve(
    value: &Value,
    options: &Options,
    f: &mut dyn FnMut(&Value) -> Result<Value>,
) -> Result<Value> {
    match value {
        Value::Lazy(source) => {
            let _layer = Layer::enter(options)?;
            source.force_with(&mut |inner| resolve(inner, options, &mut *f))
        }
        value => f(value),
    }
}

/// Forces `value` until it is no longer lazy, peeling at most
/// `options.max_unwrap_depth` nested layers.
pub(crate) fn unwrap(value: Value, options: &Options) -> Result<Value> {
    match value {
        Value::Lazy(_) => resolve(&value, options, &mut |inner| Ok(inner.clone())),
        value => Ok(value),
    }
}
