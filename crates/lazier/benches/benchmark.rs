use lazier::{Enumeration, Memo, Pointer, SeqView, Shared, Value};

fn main() {
    divan::main();
}

fn nested(depth: usize) -> Value {
    (0..depth).fold(Value::from(vec![Value::from("leaf")]), |inner, _| {
        let mut map = lazier::Map::new();
        map.insert("next".into(), inner);
        Value::from(map)
    })
}

#[divan::bench(args = [8, 64, 256])]
fn force_deep_pointer(bencher: divan::Bencher, depth: usize) {
    let root = nested(depth);
    let path = std::iter::repeat_n("next", depth).collect::<Vec<_>>();
    let pointer = Pointer::new(root).dig(path).field(0);

    bencher.bench(|| pointer.force().unwrap());
}

#[divan::bench(args = [8, 64])]
fn dig_chained(bencher: divan::Bencher, depth: usize) {
    let pointer = Pointer::new(nested(depth));

    bencher.bench(|| (0..depth).fold(pointer.clone(), |p, _| p.field("next")));
}

#[divan::bench]
fn memo_replay(bencher: divan::Bencher) {
    let memo: Shared<Memo<Value>> = Shared::new(Memo::new(|| nested(16)));
    let pointer = Pointer::from_source(memo).dig(["next", "next"]);
    let _ = pointer.force();

    bencher.bench(|| pointer.force().unwrap());
}

#[divan::bench(args = [1_000])]
fn enumeration_pipeline(bencher: divan::Bencher, n: i64) {
    let enumeration = Enumeration::new(move || Ok((0..n).map(Value::from).collect()))
        .map(|v| Value::from(v.as_number().map_or(0.0, |n| n.value()) * 2.0))
        .filter(|v| v.as_number().is_some_and(|n| n.to_int() % 3 == 0))
        .take(100);

    bencher.bench(|| enumeration.to_vec().unwrap());
}

#[divan::bench]
fn seq_view_of_absent(bencher: divan::Bencher) {
    let view: SeqView = Pointer::new(nested(4)).dig_as(["missing", "path"]);

    bencher.bench(|| view.force().unwrap());
}
