use data_sweeper::SweepError;
use data_sweeper::format::TableFormat;
use data_sweeper::ingestion::csv::load_csv_from_reader;
use data_sweeper::ingestion::{LoadOptions, load, load_from_path, load_named};
use data_sweeper::types::{DataType, Value};

#[test]
fn load_from_path_happy_path() {
    let t = load_from_path("tests/fixtures/people.csv", &LoadOptions::default()).unwrap();

    assert_eq!(t.shape(), (2, 4));
    assert_eq!(
        t.rows[0],
        vec![
            Value::Int64(1),
            Value::Utf8("Ada".to_string()),
            Value::Float64(98.5),
            Value::Bool(true),
        ]
    );
    assert_eq!(t.rows[1][2], Value::Null);
}

#[test]
fn sales_fixture_infers_one_type_per_column() {
    let t = load_from_path("tests/fixtures/sales.csv", &LoadOptions::default()).unwrap();
    let types: Vec<DataType> = t.schema.fields.iter().map(|f| f.data_type).collect();
    assert_eq!(
        types,
        vec![
            DataType::Int64,
            DataType::Utf8,
            DataType::Int64,
            DataType::Float64,
            DataType::Bool,
        ]
    );
    assert_eq!(t.row_count(), 5);
    assert_eq!(t.missing_count(), 4);
}

#[test]
fn load_from_existing_reader() {
    let input = "name;id\nAda;1\n";
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(b';')
        .has_headers(true)
        .from_reader(input.as_bytes());

    let t = load_csv_from_reader(&mut rdr, &LoadOptions::default()).unwrap();
    assert_eq!(t.column_names(), vec!["name", "id"]);
    assert_eq!(t.rows[0][1], Value::Int64(1));
}

#[test]
fn mixed_column_falls_back_to_text() {
    let t = load(b"code\n7\nA1\n", TableFormat::Csv).unwrap();
    assert_eq!(t.schema.fields[0].data_type, DataType::Utf8);
    assert_eq!(t.rows[0][0], Value::Utf8("7".to_string()));
}

#[test]
fn header_only_input_gives_empty_float_columns() {
    let t = load(b"a,b\n", TableFormat::Csv).unwrap();
    assert_eq!(t.shape(), (0, 2));
    assert_eq!(t.column_names(), vec!["a", "b"]);
    assert!(t.schema.fields.iter().all(|f| f.data_type == DataType::Float64));
}

#[test]
fn nan_and_inf_words_stay_text() {
    let t = load(b"name\nNan\nInf\n", TableFormat::Csv).unwrap();
    assert_eq!(t.schema.fields[0].data_type, DataType::Utf8);
    assert_eq!(
        t.rows,
        vec![vec![Value::Utf8("Nan".to_string())], vec![Value::Utf8("Inf".to_string())]]
    );
}

#[test]
fn blank_and_repeated_headers_are_renamed() {
    let t = load(b"x,,x\n1,2,3\n", TableFormat::Csv).unwrap();
    assert_eq!(t.column_names(), vec!["x", "Unnamed: 1", "x.1"]);
}

#[test]
fn empty_input_is_a_parse_error() {
    let err = load(b"", TableFormat::Csv).unwrap_err();
    assert!(matches!(err, SweepError::ParseError { format: TableFormat::Csv, .. }));
    assert!(err.to_string().contains("failed to parse csv input"));
}

#[test]
fn unknown_extension_is_unsupported() {
    let err = load_named("notes.txt", b"a\n1\n", &LoadOptions::default()).unwrap_err();
    assert!(matches!(err, SweepError::UnsupportedFormat { .. }));
}

#[test]
fn missing_file_is_an_io_error() {
    let err = load_from_path("tests/fixtures/does_not_exist.csv", &LoadOptions::default()).unwrap_err();
    assert!(matches!(err, SweepError::Io(_)));
}
