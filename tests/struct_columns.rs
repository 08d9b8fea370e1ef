use vector_batch::{RowBatch, RowValue, TypeDescriptor, WriterOptions, fill_row_batch};

fn fill(schema: &TypeDescriptor, rows: &[RowValue]) -> RowBatch {
    let mut batch = RowBatch::new(schema, rows.len()).unwrap();
    fill_row_batch(&mut batch, rows, &WriterOptions::default()).unwrap();
    batch
}

#[test]
fn missing_field_is_null_with_zero_length() {
    // schema struct<a:string,b:array<bigint>>, row {a: "x"}
    let schema = TypeDescriptor::struct_of([
        ("a", TypeDescriptor::string()),
        ("b", TypeDescriptor::list(TypeDescriptor::long())),
    ]);
    let batch = fill(&schema, &[RowValue::record([("a", RowValue::from("x"))])]);

    let a = batch.column_by_name("a").unwrap().as_bytes().unwrap();
    assert_eq!(a.get_str(0), Some("x"));

    let b = batch.column_by_name("b").unwrap().as_list().unwrap();
    assert!(b.index().nulls().is_null(0));
    assert_eq!(b.index().lengths()[0], 0);
    assert_eq!(b.index().child_count(), 0);
}

#[test]
fn unknown_record_keys_are_ignored() {
    let schema = TypeDescriptor::struct_of([("a", TypeDescriptor::long())]);
    let row = RowValue::record([("a", RowValue::Long(1)), ("zzz", RowValue::Long(2))]);
    let batch = fill(&schema, &[row]);
    assert_eq!(batch.num_columns(), 1);
    assert_eq!(batch.column(0).value(0), RowValue::Long(1));
}

#[test]
fn nested_struct_fields_share_the_parent_row() {
    let inner = TypeDescriptor::struct_of([
        ("n", TypeDescriptor::long()),
        ("s", TypeDescriptor::string()),
    ]);
    let schema = TypeDescriptor::struct_of([("inner", inner)]);
    let rows = vec![
        RowValue::record([(
            "inner",
            RowValue::record([("n", RowValue::Long(1)), ("s", RowValue::from("one"))]),
        )]),
        RowValue::record([("inner", RowValue::record([("n", RowValue::Long(2))]))]),
    ];
    let batch = fill(&schema, &rows);
    let inner = batch.column(0).as_struct().unwrap();
    assert_eq!(inner.names(), &["n".to_string(), "s".to_string()]);
    assert_eq!(inner.field("n").unwrap().value(1), RowValue::Long(2));
    assert!(inner.field("s").unwrap().is_null(1));
    assert_eq!(
        batch.column(0).value(1),
        RowValue::record([("n", RowValue::Long(2)), ("s", RowValue::Null)])
    );
}

#[test]
fn non_record_marks_struct_null_but_not_its_fields() {
    let schema = TypeDescriptor::struct_of([(
        "inner",
        TypeDescriptor::struct_of([("n", TypeDescriptor::long())]),
    )]);
    let rows = vec![
        RowValue::record([("inner", RowValue::record([("n", RowValue::Long(7))]))]),
        RowValue::record([("inner", RowValue::Long(5))]),
        RowValue::record([("inner", RowValue::Null)]),
    ];
    let batch = fill(&schema, &rows);
    let column = batch.column(0);
    assert!(!column.is_null(0));
    assert!(column.is_null(1));
    assert!(column.is_null(2));
    assert_eq!(column.value(1), RowValue::Null);

    // the field vector is left alone under a null struct row
    let n = column.as_struct().unwrap().field("n").unwrap();
    assert!(!n.is_null(1));
    assert!(!n.is_null(2));
    assert_eq!(n.value(0), RowValue::Long(7));
}

#[test]
fn struct_of_map_round_trip() {
    let schema = TypeDescriptor::struct_of([
        ("name", TypeDescriptor::string()),
        (
            "scores",
            TypeDescriptor::map(TypeDescriptor::string(), TypeDescriptor::double()),
        ),
    ]);
    let rows = vec![
        RowValue::record([
            ("name", RowValue::from("ann")),
            ("scores", RowValue::map([("math", 9.5f64), ("art", 7.0)])),
        ]),
        RowValue::record([("name", RowValue::from("bo")), ("scores", RowValue::Null)]),
        RowValue::record([
            ("name", RowValue::Null),
            ("scores", RowValue::map([("math", 6.25f64)])),
        ]),
    ];
    let wrapped = TypeDescriptor::struct_of([("person", schema)]);
    let batch = fill(
        &wrapped,
        &rows
            .iter()
            .cloned()
            .map(|r| RowValue::record([("person", r)]))
            .collect::<Vec<_>>(),
    );
    let person = batch.column_by_name("person").unwrap();
    assert_eq!(person.value(0), rows[0]);
    assert_eq!(person.value(1), rows[1]);
    assert_eq!(person.value(2), rows[2]);

    let scores = person.as_struct().unwrap().field("scores").unwrap();
    let index = scores.as_map().unwrap().index();
    assert_eq!(&index.offsets()[..3], &[0, 2, 2]);
    assert_eq!(&index.lengths()[..3], &[2, 0, 1]);
}

#[test]
fn deep_nesting_paths_round_trip() {
    // struct<events:array<struct<kind:string,tags:map<string,array<int>>>>>
    let event = TypeDescriptor::struct_of([
        ("kind", TypeDescriptor::string()),
        (
            "tags",
            TypeDescriptor::map(
                TypeDescriptor::string(),
                TypeDescriptor::list(TypeDescriptor::integer()),
            ),
        ),
    ]);
    let schema = TypeDescriptor::struct_of([("events", TypeDescriptor::list(event))]);
    assert_eq!(
        schema.to_string(),
        "struct<events:array<struct<kind:string,tags:map<string,array<int>>>>>"
    );

    let ev = |kind: &str, tags: RowValue| {
        RowValue::record([("kind", RowValue::from(kind)), ("tags", tags)])
    };
    let events = RowValue::List(vec![
        ev(
            "click",
            RowValue::Map(vec![(RowValue::from("ids"), RowValue::from(vec![1i64, 2]))]),
        ),
        ev("view", RowValue::Null),
    ]);
    let batch = fill(&schema, &[RowValue::record([("events", events.clone())])]);
    assert_eq!(batch.column(0).value(0), events);
}
