use vector_batch::{
    BatchError, BatchWriter, Category, MemorySink, MismatchPolicy, RowBatch, RowValue,
    TypeDescriptor, WriterOptions,
    arrow_array::{cast::AsArray, types::Int64Type},
    fill_row_batch,
};

fn strict() -> WriterOptions {
    WriterOptions::default().with_mismatch(MismatchPolicy::Error)
}

#[test]
fn default_policy_is_lenient() {
    assert_eq!(WriterOptions::default().mismatch, MismatchPolicy::Null);
}

#[test]
fn mismatch_reports_path_and_kinds() {
    let schema = TypeDescriptor::struct_of([(
        "person",
        TypeDescriptor::struct_of([("tags", TypeDescriptor::list(TypeDescriptor::long()))]),
    )]);
    let row = RowValue::record([(
        "person",
        RowValue::record([("tags", RowValue::List(vec![RowValue::from("oops")]))]),
    )]);
    let mut batch = RowBatch::new(&schema, 1).unwrap();
    let err = fill_row_batch(&mut batch, &[row], &strict()).unwrap_err();
    match err {
        BatchError::TypeMismatch {
            path,
            expected,
            found,
        } => {
            assert_eq!(path, "person.tags[]");
            assert_eq!(expected, Category::Long);
            assert_eq!(found, "Str");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn nulls_and_missing_fields_are_still_allowed() {
    let schema = TypeDescriptor::struct_of([
        ("id", TypeDescriptor::long()),
        ("name", TypeDescriptor::string()),
        ("tags", TypeDescriptor::list(TypeDescriptor::string())),
    ]);
    let rows = vec![
        RowValue::record([("id", RowValue::Long(1)), ("name", RowValue::Null)]),
        RowValue::Null,
        RowValue::record([("tags", RowValue::List(vec![]))]),
    ];
    let mut batch = RowBatch::new(&schema, rows.len()).unwrap();
    fill_row_batch(&mut batch, &rows, &strict()).unwrap();
    assert_eq!(batch.size, 3);
    assert!(batch.column_by_name("name").unwrap().is_null(0));
    assert!(batch.column_by_name("tags").unwrap().is_null(2));
}

#[test]
fn widening_is_not_a_mismatch() {
    let schema = TypeDescriptor::struct_of([
        ("i", TypeDescriptor::integer()),
        ("d", TypeDescriptor::double()),
    ]);
    let row = RowValue::record([("i", RowValue::Byte(3)), ("d", RowValue::Float(1.5))]);
    let mut batch = RowBatch::new(&schema, 1).unwrap();
    fill_row_batch(&mut batch, &[row], &strict()).unwrap();
    assert_eq!(batch.column(0).value(0), RowValue::Long(3));
    assert_eq!(batch.column(1).value(0), RowValue::Double(1.5));
}

#[test]
fn non_record_row_fails_at_root() {
    let schema = TypeDescriptor::struct_of([("id", TypeDescriptor::long())]);
    let mut batch = RowBatch::new(&schema, 1).unwrap();
    let err = fill_row_batch(&mut batch, &[RowValue::Long(1)], &strict()).unwrap_err();
    assert!(
        matches!(&err, BatchError::TypeMismatch { path, expected: Category::Struct, found: "Long" } if path == "<root>"),
        "{err}"
    );
}

#[test]
fn failed_write_appends_nothing() {
    let schema = TypeDescriptor::map(TypeDescriptor::string(), TypeDescriptor::double());
    let mut writer = BatchWriter::new(MemorySink::new(), schema).with_options(strict());

    writer.write(&[RowValue::map([("a", 1.0f64)])]).unwrap();
    let bad = RowValue::Map(vec![(RowValue::from("b"), RowValue::from("x"))]);
    let err = writer.write(&[bad]).unwrap_err();
    assert!(
        matches!(&err, BatchError::TypeMismatch { path, .. } if path == "_col0.value"),
        "{err}"
    );

    assert_eq!(writer.rows_written(), 1);
    assert_eq!(writer.sink().num_rows(), 1);
    assert_eq!(writer.into_sink().close().len(), 1);
}

#[test]
fn mismatched_map_key_fails_at_key_path() {
    let schema = TypeDescriptor::map(TypeDescriptor::string(), TypeDescriptor::long());
    let row = RowValue::Map(vec![(RowValue::Long(1), RowValue::Long(2))]);
    let mut batch = RowBatch::new(&schema, 1).unwrap();
    let err = fill_row_batch(&mut batch, &[row], &strict()).unwrap_err();
    assert!(
        matches!(&err, BatchError::TypeMismatch { path, expected: Category::String, found: "Long" } if path == "_col0.key"),
        "{err}"
    );

    // a null key is dropped rather than reported
    let row = RowValue::Map(vec![
        (RowValue::Null, RowValue::Long(1)),
        (RowValue::from("k"), RowValue::Long(2)),
    ]);
    fill_row_batch(&mut batch, &[row], &strict()).unwrap();
    assert_eq!(batch.column(0).value(0), RowValue::map([("k", 2i64)]));
}

#[test]
fn failed_fill_keeps_earlier_rows() {
    let schema = TypeDescriptor::struct_of([("id", TypeDescriptor::long())]);
    let mut batch = RowBatch::new(&schema, 1).unwrap();
    fill_row_batch(
        &mut batch,
        &[RowValue::record([("id", RowValue::Long(1))])],
        &WriterOptions::default(),
    )
    .unwrap();

    let bad = RowValue::record([("id", RowValue::from("x"))]);
    let err = fill_row_batch(&mut batch, &[bad], &strict()).unwrap_err();
    assert!(
        matches!(&err, BatchError::TypeMismatch { path, .. } if path == "id"),
        "{err}"
    );
    assert_eq!(batch.num_columns(), 1);
    assert_eq!(batch.size, 1);
    assert_eq!(batch.column(0).value(0), RowValue::Long(1));

    fill_row_batch(
        &mut batch,
        &[RowValue::record([("id", RowValue::Long(2))])],
        &WriterOptions::default(),
    )
    .unwrap();
    assert_eq!(batch.size, 2);
    assert_eq!(batch.column(0).value(1), RowValue::Long(2));
    assert_eq!(batch.to_record_batch().unwrap().num_rows(), 2);
}

#[test]
fn failed_fill_rewinds_list_children() {
    let schema = TypeDescriptor::struct_of([
        ("tags", TypeDescriptor::list(TypeDescriptor::long())),
        ("id", TypeDescriptor::long()),
    ]);
    let row = |tags: Vec<i64>, id: RowValue| {
        RowValue::record([("tags", RowValue::from(tags)), ("id", id)])
    };
    let mut batch = RowBatch::new(&schema, 1).unwrap();
    fill_row_batch(
        &mut batch,
        &[row(vec![1, 2], RowValue::Long(1))],
        &WriterOptions::default(),
    )
    .unwrap();

    // the first row fits and the second fails after its list was written
    let rows = [
        row(vec![3, 4, 5], RowValue::Long(2)),
        row(vec![6], RowValue::from("x")),
    ];
    fill_row_batch(&mut batch, &rows, &strict()).unwrap_err();
    assert_eq!(batch.size, 1);
    let tags = batch.column_by_name("tags").unwrap().as_list().unwrap();
    assert_eq!(tags.index().child_count(), 2);
    assert_eq!(tags.index().lengths()[1], 0);

    fill_row_batch(
        &mut batch,
        &[row(vec![7], RowValue::Long(3))],
        &WriterOptions::default(),
    )
    .unwrap();
    assert_eq!(batch.size, 2);
    assert_eq!(
        batch.column_by_name("tags").unwrap().value(1),
        RowValue::from(vec![7i64])
    );

    let exported = batch.to_record_batch().unwrap();
    let list = exported.column(0).as_list::<i32>();
    assert_eq!(list.value_offsets(), &[0, 2, 3]);
    assert_eq!(&list.values().as_primitive::<Int64Type>().values()[..], &[1, 2, 7]);
}
