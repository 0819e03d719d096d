use std::cell::Cell;

use lazier::{
    Enumeration, Error, Field, Ident, Key, Map, MapView, Memo, Pointer, Record, Result,
    ScalarView, Schema, SeqView, Shared, TextView, Value, View, ViewKind, path,
};
use rstest::{fixture, rstest};
use serde_json::json;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

#[fixture]
fn resource() -> Value {
    json!({"a": null, "b": 123, "e": {"f": 1, "g": ["foo", "bar"]}}).into()
}

#[fixture]
fn calls() -> Shared<Cell<usize>> {
    Shared::new(Cell::new(0))
}

fn lazy_resource(calls: &Shared<Cell<usize>>, resource: Value) -> Pointer {
    init_tracing();
    let calls = Shared::clone(calls);
    let memo: Shared<Memo<Value>> = Shared::new(Memo::new(move || {
        calls.set(calls.get() + 1);
        resource
    }));
    Pointer::from_source(memo)
}

#[rstest]
#[case::nested_index(path!["e", "g", 0], Ok(Value::from("foo")))]
#[case::past_the_end(path!["e", "g", 3], Ok(Value::None))]
#[case::missing_field(path!["z"], Ok(Value::None))]
#[case::through_null(path!["a", "b", "c"], Ok(Value::None))]
#[case::into_string(
    path!["e", "g", 0, 2],
    Err(Error::ShapeMismatch { key: Key::Index(2), found: "string" })
)]
#[case::field_into_array(
    path!["e", "g", "x"],
    Err(Error::ShapeMismatch { key: Key::from("x"), found: "array" })
)]
fn test_force_scenarios(
    resource: Value,
    calls: Shared<Cell<usize>>,
    #[case] path: Vec<Key>,
    #[case] expected: Result<Value>,
) {
    let pointer = lazy_resource(&calls, resource).dig(path);
    assert_eq!(calls.get(), 0);
    assert_eq!(pointer.force(), expected);
    assert_eq!(pointer.force(), expected);
    assert_eq!(calls.get(), 1);
}

#[rstest]
fn test_scalar_coercions(resource: Value) {
    let pointer = Pointer::new(resource).field("b");
    assert_eq!(pointer.to_vec().unwrap(), vec![Value::from(123)]);
    assert_eq!(
        pointer.to_map(),
        Err(Error::Coercion {
            expected: "dict",
            found: "number"
        })
    );
}

#[rstest]
fn test_views_over_shared_source(resource: Value, calls: Shared<Cell<usize>>) {
    let root = lazy_resource(&calls, resource);

    let e: MapView = root.dig_as(["e"]);
    let g: SeqView = e.dig(["g"]).view();
    let first: TextView = g.pointer().dig_as([0]);
    let missing: MapView = root.dig_as(path!["z", "y"]);
    let b: ScalarView = root.dig_as(["b"]);
    assert_eq!(calls.get(), 0);

    assert_eq!(e.len().unwrap(), 2);
    assert_eq!(g.to_vec().unwrap(), vec![Value::from("foo"), Value::from("bar")]);
    assert_eq!(first.to_text().unwrap(), "foo");
    assert_eq!(missing.force().unwrap(), Map::new());
    assert_eq!(b.to_vec().unwrap(), vec![Value::from(123)]);
    assert_eq!(calls.get(), 1);
}

#[rstest]
fn test_failure_is_replayed_everywhere(calls: Shared<Cell<usize>>) {
    init_tracing();
    let counter = Shared::clone(&calls);
    let memo: Shared<Memo<Value>> = Shared::new(Memo::fallible(move || {
        counter.set(counter.get() + 1);
        Err(std::io::Error::other("backend unavailable"))
    }));

    let root = Pointer::from_source(memo.clone());
    let a = root.dig(path!["e", "g", 0]).force().unwrap_err();
    let b = root.view::<SeqView>().to_vec().unwrap_err();
    let c = root.lazy().first().unwrap_err();

    assert_eq!(a, b);
    assert_eq!(b, c);
    assert_eq!(memo.error(), Some(a.clone()));
    assert!(matches!(a, Error::Computation(_)));
    assert_eq!(a.to_string(), "Computation failed: backend unavailable");
    assert_eq!(calls.get(), 1);
}

#[rstest]
fn test_record_over_lazy_source(calls: Shared<Cell<usize>>) {
    let schema = Schema::new()
        .field("title", ViewKind::Text)
        .field_as("items", "entries", ViewKind::Seq)
        .field("meta", ViewKind::Map)
        .eager("id");
    let root = lazy_resource(
        &calls,
        json!({"id": 9, "title": "list", "entries": [{"n": 1}, {"n": 2}, {"n": 3}]}).into(),
    );
    let record = Record::new(schema, root);

    let items = record.get("items").unwrap();
    assert_eq!(calls.get(), 0);

    let Field::Seq(items) = items else {
        panic!("expected a sequence field");
    };
    let total = items
        .lazy()
        .map(|item| match item {
            Value::Dict(map) => map.get(&Ident::new("n")).cloned().unwrap_or_default(),
            other => other,
        })
        .filter(|n| n.as_number().is_some_and(|n| n.value() > 1.0))
        .count()
        .unwrap();
    assert_eq!(total, 2);
    assert_eq!(record.get("meta").unwrap().force().unwrap(), Value::new_dict());
    assert_eq!(record.get("id").unwrap(), Field::Value(Value::from(9)));
    assert_eq!(record.get("nope"), Err(Error::UnknownField("nope".to_string())));
    assert_eq!(calls.get(), 1);
}

#[rstest]
fn test_enumeration_zip_against_pointer(resource: Value) {
    let pointer = Pointer::new(resource);
    let zipped = pointer
        .dig(["e", "g"])
        .lazy()
        .zip(&Enumeration::from_values(vec![Value::from(1)]))
        .to_vec()
        .unwrap();

    assert_eq!(
        zipped,
        vec![
            Value::from(vec![Value::from("foo"), Value::from(1)]),
            Value::from(vec![Value::from("bar"), Value::None]),
        ]
    );
}
