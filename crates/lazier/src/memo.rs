use std::fmt::{self, Debug, Formatter};

use crate::{Error, Force, Result, SharedCell, Value};

type Computation<T> = Box<dyn FnOnce() -> Result<T>>;

#[derive(Debug, Clone, PartialEq)]
pub enum MemoState<T> {
    Pending,
    /// The computation is running; only observable from inside it.
    Evaluating,
    Success(T),
    Failure(Error),
}

/// A computation that runs at most once and replays its outcome forever after.
///
/// Not thread-safe: state lives in a `RefCell`, so a `Memo` cannot be shared
/// across threads. Use a once-cell or a future for that.
pub struct Memo<T> {
    state: SharedCell<MemoState<T>>,
    computation: SharedCell<Option<Computation<T>>>,
}

impl<T: Clone> Memo<T> {
    pub fn new<F>(f: F) -> Self
    where
        F: FnOnce() -> T + 'static,
    {
        Self::try_new(move || Ok(f()))
    }

    /// Wraps a computation whose errors are already [`Error`]s; they are
    /// replayed as-is.
    pub fn try_new<F>(f: F) -> Self
    where
        F: FnOnce() -> Result<T> + 'static,
    {
        Self {
            state: SharedCell::new(MemoState::Pending),
            computation: SharedCell::new(Some(Box::new(f))),
        }
    }

    /// Wraps a computation with a foreign error type; failures are kept as
    /// [`Error::Computation`].
    pub fn fallible<F, E>(f: F) -> Self
    where
        F: FnOnce() -> std::result::Result<T, E> + 'static,
        E: std::error::Error + 'static,
    {
        Self::try_new(move || f().map_err(Error::computation))
    }

    pub fn ready(value: T) -> Self {
        Self {
            state: SharedCell::new(MemoState::Success(value)),
            computation: SharedCell::new(None),
        }
    }

    pub fn failed(error: Error) -> Self {
        Self {
            state: SharedCell::new(MemoState::Failure(error)),
            computation: SharedCell::new(None),
        }
    }

    /// Returns the cached outcome, running the computation first if nothing
    /// has been cached yet.
    pub fn force(&self) -> Result<T> {
        self.with(|outcome| outcome.cloned().map_err(Error::clone))
    }

    /// Like [`Memo::force`], but lends the cached outcome to `f` instead of
    /// cloning it.
    pub fn with<R>(&self, f: impl FnOnce(std::result::Result<&T, &Error>) -> R) -> R {
        self.evaluate();

        match &*self.state.borrow() {
            MemoState::Success(value) => f(Ok(value)),
            MemoState::Failure(error) => f(Err(error)),
            MemoState::Pending | MemoState::Evaluating => f(Err(&Error::Cycle)),
        }
    }

    fn evaluate(&self) {
        let Some(computation) = self.computation.borrow_mut().take() else {
            return;
        };

        *self.state.borrow_mut() = MemoState::Evaluating;
        scopeguard::defer_on_unwind! {
            tracing::debug!("memoized computation panicked");
            if let Ok(mut state) = self.state.try_borrow_mut() {
                *state = MemoState::Failure(Error::Panicked);
            }
        }

        let state = match computation() {
            Ok(value) => {
                tracing::debug!("memoized computation succeeded");
                MemoState::Success(value)
            }
            Err(error) => {
                tracing::debug!(%error, "memoized computation failed");
                MemoState::Failure(error)
            }
        };
        *self.state.borrow_mut() = state;
    }

    pub fn is_pending(&self) -> bool {
        matches!(
            *self.state.borrow(),
            MemoState::Pending | MemoState::Evaluating
        )
    }

    pub fn is_success(&self) -> bool {
        matches!(*self.state.borrow(), MemoState::Success(_))
    }

    pub fn is_error(&self) -> bool {
        matches!(*self.state.borrow(), MemoState::Failure(_))
    }

    /// The cached success value. Never runs the computation.
    pub fn value(&self) -> Option<T> {
        match &*self.state.borrow() {
            MemoState::Success(value) => Some(value.clone()),
            _ => None,
        }
    }

    /// The cached failure. Never runs the computation.
    pub fn error(&self) -> Option<Error> {
        match &*self.state.borrow() {
            MemoState::Failure(error) => Some(error.clone()),
            _ => None,
        }
    }

    pub fn state(&self) -> MemoState<T> {
        self.state.borrow().clone()
    }
}

impl<T: Debug> Debug for Memo<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.state.try_borrow() {
            Ok(state) => f.debug_struct("Memo").field("state", &*state).finish(),
            Err(_) => f.debug_struct("Memo").finish_non_exhaustive(),
        }
    }
}

impl Force for Memo<Value> {
    fn force(&self) -> Result<Value> {
        Memo::force(self)
    }

    fn force_with(&self, f: &mut dyn FnMut(&Value) -> Result<Value>) -> Result<Value> {
        self.with(|outcome| match outcome {
            Ok(value) => f(value),
            Err(error) => Err(error.clone()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Shared;
    use rstest::rstest;
    use std::{cell::Cell, panic, rc::Weak};

    #[derive(Debug, thiserror::Error)]
    #[error("connection reset")]
    struct ConnectionReset;

    fn counting(calls: &Shared<Cell<usize>>, value: Value) -> Memo<Value> {
        let calls = Shared::clone(calls);
        Memo::new(move || {
            calls.set(calls.get() + 1);
            value
        })
    }

    #[rstest]
    #[case::value(Value::from(42))]
    #[case::none(Value::None)]
    #[case::dict(serde_json::json!({"a": [1, 2]}).into())]
    fn test_force_runs_once(#[case] value: Value) {
        let calls = Shared::new(Cell::new(0));
        let memo = counting(&calls, value.clone());

        assert!(memo.is_pending());
        for _ in 0..3 {
            assert_eq!(memo.force().unwrap(), value);
        }
        assert_eq!(calls.get(), 1);
        assert!(memo.is_success());
        assert!(!memo.is_error());
    }

    #[test]
    fn test_failure_is_cached_and_identical() {
        let calls = Shared::new(Cell::new(0));
        let counter = Shared::clone(&calls);
        let memo: Memo<Value> = Memo::fallible(move || {
            counter.set(counter.get() + 1);
            Err(ConnectionReset)
        });

        let first = memo.force().unwrap_err();
        let second = memo.force().unwrap_err();

        assert_eq!(first, second);
        assert_eq!(first.to_string(), "Computation failed: connection reset");
        assert_eq!(calls.get(), 1);
        assert!(memo.is_error());
        assert!(!memo.is_pending());
        assert_eq!(memo.error(), Some(first));
        assert_eq!(memo.value(), None);
    }

    #[test]
    fn test_try_new_replays_error_verbatim() {
        let memo: Memo<Value> = Memo::try_new(|| Err(Error::Absent { expected: "dict" }));
        assert_eq!(memo.force(), Err(Error::Absent { expected: "dict" }));
        assert_eq!(memo.state(), MemoState::Failure(Error::Absent { expected: "dict" }));
    }

    #[test]
    fn test_queries_do_not_evaluate() {
        let calls = Shared::new(Cell::new(0));
        let memo = counting(&calls, Value::from(1));

        assert_eq!(memo.value(), None);
        assert_eq!(memo.error(), None);
        assert!(!memo.is_success());
        assert_eq!(memo.state(), MemoState::Pending);
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn test_absence_is_success() {
        let memo = Memo::new(|| Value::None);
        assert_eq!(memo.force().unwrap(), Value::None);
        assert!(memo.is_success());
        assert_eq!(memo.value(), Some(Value::None));
    }

    #[test]
    fn test_ready_and_failed() {
        let ready = Memo::ready(Value::from("done"));
        assert!(ready.is_success());
        assert_eq!(ready.force().unwrap(), Value::from("done"));

        let failed: Memo<Value> = Memo::failed(Error::Cycle);
        assert!(failed.is_error());
        assert_eq!(failed.force(), Err(Error::Cycle));
    }

    #[test]
    fn test_reentrant_force_is_a_cycle() {
        let memo: Shared<Memo<Value>> = Shared::new_cyclic(|weak: &Weak<Memo<Value>>| {
            let weak = weak.clone();
            Memo::try_new(move || match weak.upgrade() {
                Some(memo) => memo.force(),
                None => Ok(Value::None),
            })
        });

        assert_eq!(memo.force(), Err(Error::Cycle));
        assert_eq!(memo.force(), Err(Error::Cycle));
        assert!(memo.is_error());
    }

    #[test]
    fn test_generic_payload() {
        let memo = Memo::new(|| vec![1, 2, 3]);
        assert_eq!(memo.force().unwrap(), vec![1, 2, 3]);
        assert_eq!(memo.value(), Some(vec![1, 2, 3]));
    }

    #[test]
    fn test_panicking_computation_is_recorded() {
        let memo: Memo<Value> = Memo::new(|| panic!("computation blew up"));

        let unwound = panic::catch_unwind(panic::AssertUnwindSafe(|| memo.force()));
        assert!(unwound.is_err());

        assert!(memo.is_error());
        assert!(!memo.is_pending());
        assert_eq!(memo.force(), Err(Error::Panicked));
    }

    #[test]
    fn test_with_lends_cached_value() {
        let memo = Memo::new(|| vec![1, 2, 3]);
        assert_eq!(memo.with(|outcome| outcome.map(|v| v.len()).map_err(Error::clone)), Ok(3));
        assert_eq!(memo.with(|outcome| outcome.map(|v| v[0]).map_err(Error::clone)), Ok(1));
    }
}
