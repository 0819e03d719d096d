//! `lazier` provides lazy pointers into nested data, once-only memoized
//! computations, and typed views that normalize what a pointer resolves to.
//!
//! ## Examples
//!
//! ```rust
//! use lazier::{Memo, Pointer, SeqView, Shared, Value};
//!
//! let memo: Shared<Memo<Value>> = Shared::new(Memo::new(|| {
//!     serde_json::json!({"e": {"g": ["foo", "bar"]}}).into()
//! }));
//!
//! // Nothing is computed until a pointer is forced.
//! let pointer = Pointer::from_source(memo.clone()).dig(["e", "g"]);
//! assert!(memo.is_pending());
//!
//! assert_eq!(pointer.field(-1).force().unwrap(), Value::from("bar"));
//! assert!(pointer.field("x").field(0).force().is_err());
//!
//! let tags: SeqView = pointer.view();
//! assert_eq!(tags.len().unwrap(), 2);
//!
//! let missing: SeqView = Pointer::from_source(memo).dig_as(["nope"]);
//! assert!(missing.force().unwrap().is_empty());
//! ```
mod enumeration;
mod error;
mod force;
mod ident;
mod memo;
mod number;
mod options;
mod pointer;
mod schema;
mod value;
mod view;

pub use enumeration::Enumeration;
pub use error::{Error, SharedError};
pub use force::Force;
pub use ident::Ident;
pub use memo::{Memo, MemoState};
pub use number::Number;
pub use options::{DEFAULT_MAX_UNWRAP_DEPTH, Options};
pub use pointer::{Path, Pointer};
pub use schema::{Field, Record, Schema};
pub use value::{Key, Map, Value};
pub use view::{MapView, ScalarView, SeqView, TextView, View, ViewKind};

pub type Shared<T> = std::rc::Rc<T>;
pub type SharedCell<T> = std::cell::RefCell<T>;

pub type Result<T, E = Error> = std::result::Result<T, E>;
