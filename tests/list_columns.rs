use vector_batch::{
    RowBatch, RowValue, TypeDescriptor, WriterOptions, fill_row_batch, vector::ListColumnVector,
};

fn fill(schema: &TypeDescriptor, rows: &[RowValue]) -> RowBatch {
    let mut batch = RowBatch::new(schema, rows.len()).unwrap();
    fill_row_batch(&mut batch, rows, &WriterOptions::default()).unwrap();
    batch
}

fn longs(values: &[i64]) -> RowValue {
    RowValue::List(values.iter().copied().map(RowValue::Long).collect())
}

fn assert_partitioned(list: &ListColumnVector, rows: usize) {
    let index = list.index();
    let offsets = &index.offsets()[..rows];
    let lengths = &index.lengths()[..rows];

    // offsets never go backwards
    assert!(offsets.windows(2).all(|w| w[0] <= w[1]), "{offsets:?}");

    // child count is the sum of non-null lengths
    let total: usize = (0..rows)
        .filter(|&i| !index.nulls().is_null(i))
        .map(|i| lengths[i])
        .sum();
    assert_eq!(index.child_count(), total);

    // non-empty ranges don't overlap
    let mut ranges: Vec<_> = (0..rows).filter_map(|i| index.range(i)).collect();
    ranges.retain(|r| !r.is_empty());
    ranges.sort_by_key(|r| r.start);
    for pair in ranges.windows(2) {
        assert!(pair[0].end <= pair[1].start, "{ranges:?}");
    }
}

#[test]
fn list_of_long_layout() {
    // rows [[1,2,3], [], [4]]
    let schema = TypeDescriptor::list(TypeDescriptor::long());
    let batch = fill(&schema, &[longs(&[1, 2, 3]), longs(&[]), longs(&[4])]);

    let list = batch.column(0).as_list().unwrap();
    let index = list.index();
    assert_eq!(&index.offsets()[..3], &[0, 3, 3]);
    assert_eq!(&index.lengths()[..3], &[3, 0, 1]);
    assert_eq!(index.child_count(), 4);

    let child = list.child().as_long().unwrap();
    assert_eq!(&child.values()[..4], &[1, 2, 3, 4]);
    assert_partitioned(list, 3);
}

#[test]
fn null_and_empty_lists_are_null_with_zero_length() {
    let schema = TypeDescriptor::list(TypeDescriptor::string());
    let rows = vec![
        RowValue::Null,
        RowValue::List(vec![]),
        RowValue::List(vec![RowValue::from("a")]),
        RowValue::from("not a list"),
    ];
    let batch = fill(&schema, &rows);
    let list = batch.column(0).as_list().unwrap();
    let index = list.index();
    for row in [0, 1, 3] {
        assert!(index.nulls().is_null(row), "row {row}");
        assert_eq!(index.lengths()[row], 0, "row {row}");
        assert_eq!(batch.column(0).value(row), RowValue::Null);
    }
    assert!(!index.nulls().is_null(2));
    assert_eq!(index.range(2), Some(0..1));
    assert_partitioned(list, 4);
}

#[test]
fn null_list_elements_are_kept_in_place() {
    let schema = TypeDescriptor::list(TypeDescriptor::long());
    let row = RowValue::List(vec![RowValue::Long(1), RowValue::Null, RowValue::Long(3)]);
    let batch = fill(&schema, &[row.clone()]);
    let child = batch.column(0).as_list().unwrap().child();
    assert!(child.is_null(1));
    assert_eq!(batch.column(0).value(0), row);
}

#[test]
fn growth_preserves_earlier_elements() {
    // each row forces the element vector to grow past its previous capacity
    let schema = TypeDescriptor::list(TypeDescriptor::string());
    let rows: Vec<RowValue> = (0..50)
        .map(|i| {
            RowValue::List(
                (0..=i % 7)
                    .map(|k| RowValue::Str(format!("r{i}e{k}")))
                    .collect(),
            )
        })
        .collect();
    let batch = fill(&schema, &rows);
    let list = batch.column(0).as_list().unwrap();
    assert_partitioned(list, rows.len());
    for (i, row) in rows.iter().enumerate() {
        assert_eq!(&batch.column(0).value(i), row, "row {i}");
    }
}

#[test]
fn list_of_list_round_trip() {
    let schema = TypeDescriptor::list(TypeDescriptor::list(TypeDescriptor::long()));
    let rows = vec![
        RowValue::List(vec![longs(&[1, 2]), longs(&[3])]),
        RowValue::Null,
        RowValue::List(vec![longs(&[]), longs(&[4, 5, 6])]),
    ];
    let batch = fill(&schema, &rows);
    assert_eq!(batch.column(0).value(0), rows[0]);
    assert_eq!(batch.column(0).value(1), RowValue::Null);
    // the empty inner list comes back as null
    assert_eq!(
        batch.column(0).value(2),
        RowValue::List(vec![RowValue::Null, longs(&[4, 5, 6])])
    );

    let outer = batch.column(0).as_list().unwrap();
    let inner = outer.child().as_list().unwrap();
    assert_eq!(outer.index().child_count(), 4);
    assert_eq!(inner.index().child_count(), 6);
    assert_partitioned(inner, 4);
}

#[test]
fn list_of_struct_round_trip() {
    let point = TypeDescriptor::struct_of([
        ("x", TypeDescriptor::long()),
        ("label", TypeDescriptor::string()),
    ]);
    let schema = TypeDescriptor::struct_of([("points", TypeDescriptor::list(point))]);
    let p = |x: i64, label: &str| {
        RowValue::record([("x", RowValue::Long(x)), ("label", RowValue::from(label))])
    };
    let rows = vec![
        RowValue::record([("points", RowValue::List(vec![p(1, "a"), p(2, "b")]))]),
        RowValue::record([("points", RowValue::List(vec![p(3, "c")]))]),
        RowValue::record([(
            "points",
            RowValue::List(vec![
                RowValue::record([("x", RowValue::Long(4))]),
                RowValue::Null,
            ]),
        )]),
    ];
    let batch = fill(&schema, &rows);
    let points = batch.column_by_name("points").unwrap();
    assert_eq!(
        points.value(0),
        RowValue::List(vec![p(1, "a"), p(2, "b")])
    );
    assert_eq!(points.value(1), RowValue::List(vec![p(3, "c")]));
    assert_eq!(
        points.value(2),
        RowValue::List(vec![
            RowValue::record([("x", RowValue::Long(4)), ("label", RowValue::Null)]),
            RowValue::Null,
        ])
    );

    let list = points.as_list().unwrap();
    assert_eq!(&list.index().offsets()[..3], &[0, 2, 3]);
    let structs = list.child().as_struct().unwrap();
    assert!(structs.nulls().is_null(4));
    assert_eq!(structs.field("x").unwrap().value(2), RowValue::Long(3));
}
