use rustc_hash::FxHashMap;

use crate::{
    Error, Force, Ident, Map, MapView, Pointer, Result, ScalarView, SeqView, Shared, TextView,
    Value, ViewKind,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Access {
    Lazy(ViewKind),
    Eager,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct FieldDecl {
    source: Ident,
    access: Access,
}

/// Named field accessors over a dict-shaped record.
///
/// ```
/// use lazier::{Pointer, Record, Schema, ViewKind};
///
/// let schema = Schema::new()
///     .field("name", ViewKind::Text)
///     .field_as("tags", "labels", ViewKind::Seq)
///     .eager("id");
/// let record = Record::new(schema, Pointer::new(serde_json::json!({"id": 7, "name": "lazier"})));
///
/// assert_eq!(record.get("tags").unwrap().force().unwrap(), lazier::Value::EMPTY_ARRAY);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Schema {
    fields: FxHashMap<Ident, FieldDecl>,
    order: Vec<Ident>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a lazy accessor reading the field of the same name.
    pub fn field(self, name: &str, kind: ViewKind) -> Self {
        self.field_as(name, name, kind)
    }

    /// Declares a lazy accessor `name` reading field `source`.
    pub fn field_as(self, name: &str, source: &str, kind: ViewKind) -> Self {
        self.declare(
            name,
            FieldDecl {
                source: Ident::new(source),
                access: Access::Lazy(kind),
            },
        )
    }

    /// Declares an accessor that forces the field as soon as it is read.
    pub fn eager(self, name: &str) -> Self {
        self.eager_as(name, name)
    }

    pub fn eager_as(self, name: &str, source: &str) -> Self {
        self.declare(
            name,
            FieldDecl {
                source: Ident::new(source),
                access: Access::Eager,
            },
        )
    }

    fn declare(mut self, name: &str, decl: FieldDecl) -> Self {
        let name = Ident::new(name);
        if self.fields.insert(name, decl).is_none() {
            self.order.push(name);
        }
        self
    }

    /// Field names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = Ident> + '_ {
        self.order.iter().copied()
    }

    /// The view kind of a lazy field; `None` for eager or undeclared fields.
    pub fn kind(&self, name: &str) -> Option<ViewKind> {
        match self.fields.get(&Ident::new(name))?.access {
            Access::Lazy(kind) => Some(kind),
            Access::Eager => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }
}

/// What a [`Record`] accessor hands back.
#[derive(Debug, Clone, PartialEq)]
pub enum Field {
    Indexed(Pointer),
    Map(MapView),
    Seq(SeqView),
    Text(TextView),
    Scalar(ScalarView),
    /// An eager field, already forced.
    Value(Value),
}

impl Field {
    fn new(pointer: Pointer, kind: ViewKind) -> Self {
        match kind {
            ViewKind::Indexed => Field::Indexed(pointer),
            ViewKind::Map => Field::Map(pointer.into()),
            ViewKind::Seq => Field::Seq(pointer.into()),
            ViewKind::Text => Field::Text(pointer.into()),
            ViewKind::Scalar => Field::Scalar(pointer.into()),
        }
    }

    /// Forces the field through its view's normalization.
    pub fn force(&self) -> Result<Value> {
        match self {
            Field::Indexed(pointer) => Force::force(pointer),
            Field::Map(view) => Force::force(view),
            Field::Seq(view) => Force::force(view),
            Field::Text(view) => Force::force(view),
            Field::Scalar(view) => Force::force(view),
            Field::Value(value) => Ok(value.clone()),
        }
    }

    pub fn pointer(&self) -> Option<&Pointer> {
        match self {
            Field::Indexed(pointer) => Some(pointer),
            Field::Map(view) => Some(crate::View::pointer(view)),
            Field::Seq(view) => Some(crate::View::pointer(view)),
            Field::Text(view) => Some(crate::View::pointer(view)),
            Field::Scalar(view) => Some(crate::View::pointer(view)),
            Field::Value(_) => None,
        }
    }
}

/// A dict-shaped pointer paired with the [`Schema`] describing its fields.
#[derive(Debug, Clone)]
pub struct Record {
    schema: Shared<Schema>,
    pointer: Pointer,
}

impl Record {
    pub fn new(schema: impl Into<Shared<Schema>>, pointer: Pointer) -> Self {
        Self {
            schema: schema.into(),
            pointer,
        }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn pointer(&self) -> &Pointer {
        &self.pointer
    }

    /// Looks up a declared field. Lazy fields come back unevaluated; eager
    /// ones are forced right away.
    pub fn get(&self, name: &str) -> Result<Field> {
        let decl = self
            .schema
            .fields
            .get(&Ident::new(name))
            .ok_or_else(|| Error::UnknownField(name.to_string()))?;
        let pointer = self.pointer.field(decl.source);

        match decl.access {
            Access::Lazy(kind) => Ok(Field::new(pointer, kind)),
            Access::Eager => Ok(Field::Value(pointer.force()?)),
        }
    }

    /// Forces the whole record as a map; absence becomes `{}`.
    pub fn force(&self) -> Result<Map> {
        self.pointer.view::<MapView>().force()
    }
}

impl Force for Record {
    fn force(&self) -> Result<Value> {
        Record::force(self).map(Value::Dict)
    }
}
