use std::fs;
use std::path::PathBuf;

use chrono::NaiveDate;

use crate::errors::LoadError;
use crate::model::TABLE_COLUMNS;
use crate::{load_transactions, parse_date, parse_transactions};

fn fixture_path(path: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/data")
        .join(path)
}

fn fixture(path: &str) -> String {
    let full_path = fixture_path(path);
    fs::read_to_string(&full_path)
        .unwrap_or_else(|err| panic!("failed to read fixture {}: {}", full_path.display(), err))
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn loads_sales_fixture_in_file_order() {
    let table = load_transactions(fixture_path("sales_data.csv")).expect("fixture load failed");

    assert_eq!(table.len(), 12);
    assert_eq!(table.df().get_column_names_str(), TABLE_COLUMNS);

    let products = table.products().unwrap();
    assert_eq!(products.get(0), Some("Laptop"));
    assert_eq!(products.get(11), Some("Smartwatch"));

    let regions = table.regions().unwrap();
    assert_eq!(regions.get(1), Some("South"));

    let sales = table.total_sales().unwrap();
    assert_eq!(sales.get(0), Some(110000.0));
    let total: f64 = sales.into_iter().flatten().sum();
    assert!((total - 523000.0).abs() < 1e-6);

    let dates = table.dates().unwrap();
    assert_eq!(dates[0], Some(date(2024, 1, 3)));
    assert_eq!(dates[11], Some(date(2024, 2, 14)));
}

#[test]
fn column_order_does_not_matter() {
    let table = parse_transactions(fixture("reordered_columns.csv").as_bytes()).unwrap();

    assert_eq!(table.df().get_column_names_str(), TABLE_COLUMNS);
    assert_eq!(table.products().unwrap().get(1), Some("Gadget"));
    assert_eq!(table.total_sales().unwrap().get(1), Some(300.0));
    assert_eq!(table.dates().unwrap()[0], Some(date(2024, 1, 1)));
}

#[test]
fn missing_column_is_reported_by_name() {
    let content = "Date,Product,Total_Sales\n2024-01-01,Widget,10\n";
    let err = parse_transactions(content.as_bytes()).unwrap_err();

    assert!(matches!(err, LoadError::MissingColumn { column: "Region" }));
}

#[test]
fn header_names_are_case_sensitive() {
    let content = "date,Product,Region,Total_Sales\n2024-01-01,Widget,North,10\n";
    let err = parse_transactions(content.as_bytes()).unwrap_err();

    assert!(matches!(err, LoadError::MissingColumn { column: "Date" }));
}

#[test]
fn unparseable_date_aborts_with_line_number() {
    let err = parse_transactions(fixture("bad_date.csv").as_bytes()).unwrap_err();

    match err {
        LoadError::DataRow { line, message } => {
            assert_eq!(line, 3);
            assert!(message.contains("not-a-date"), "unexpected message: {message}");
        }
        other => panic!("expected DataRow error, got {other:?}"),
    }
}

#[test]
fn blank_date_is_rejected() {
    let content = "Date,Product,Region,Total_Sales\n,Widget,North,10\n";
    let err = parse_transactions(content.as_bytes()).unwrap_err();

    assert!(matches!(err, LoadError::DataRow { line: 2, .. }));
}

#[test]
fn mixed_date_spellings_normalise_to_calendar_dates() {
    let content = "\
Date,Product,Region,Total_Sales
2024-03-01,A,North,1
2024/03/02,A,North,1
03/03/2024,A,North,1
2024-03-04 17:45:00,A,North,1
2024-03-05T08:00:00.250,A,North,1
";
    let table = parse_transactions(content.as_bytes()).unwrap();
    let dates: Vec<NaiveDate> = table.dates().unwrap().into_iter().flatten().collect();

    assert_eq!(
        dates,
        vec![
            date(2024, 3, 1),
            date(2024, 3, 2),
            date(2024, 3, 3),
            date(2024, 3, 4),
            date(2024, 3, 5),
        ]
    );
    assert_eq!(
        table.date_span().unwrap(),
        Some((date(2024, 3, 1), date(2024, 3, 5)))
    );
}

#[test]
fn blank_cells_become_nulls() {
    let content = "\
Date,Product,Region,Total_Sales
2024-01-01,,North,10
2024-01-02,Widget,,NaN
2024-01-03,Widget,South,
";
    let table = parse_transactions(content.as_bytes()).unwrap();

    assert_eq!(table.len(), 3);
    assert_eq!(table.products().unwrap().get(0), None);
    assert_eq!(table.regions().unwrap().get(1), None);
    assert_eq!(table.total_sales().unwrap().get(1), None);
    assert_eq!(table.total_sales().unwrap().get(2), None);
    assert_eq!(table.total_sales().unwrap().null_count(), 2);
}

#[test]
fn non_numeric_amount_is_rejected() {
    let content = "Date,Product,Region,Total_Sales\n2024-01-01,Widget,North,lots\n";
    let err = parse_transactions(content.as_bytes()).unwrap_err();

    match err {
        LoadError::DataRow { line, message } => {
            assert_eq!(line, 2);
            assert!(message.contains("Total_Sales"));
        }
        other => panic!("expected DataRow error, got {other:?}"),
    }
}

#[test]
fn ragged_row_is_a_csv_error() {
    let content = "Date,Product,Region,Total_Sales\n2024-01-01,Widget,North\n";
    let err = parse_transactions(content.as_bytes()).unwrap_err();

    assert!(matches!(err, LoadError::Csv { .. }));
}

#[test]
fn empty_input_has_no_header() {
    let err = parse_transactions("".as_bytes()).unwrap_err();

    assert!(matches!(err, LoadError::MissingColumn { column: "Date" }));
}

#[test]
fn header_only_input_yields_empty_table() {
    let table = parse_transactions("Date,Product,Region,Total_Sales\n".as_bytes()).unwrap();

    assert!(table.is_empty());
    assert_eq!(table.df().get_column_names_str(), TABLE_COLUMNS);
    assert_eq!(table.date_span().unwrap(), None);
}

#[test]
fn missing_file_is_distinguishable_from_parse_failure() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_transactions(dir.path().join("absent.csv")).unwrap_err();

    assert!(err.is_not_found());
    assert!(err.to_string().contains("absent.csv"));

    let parse_err = parse_transactions(fixture("bad_date.csv").as_bytes()).unwrap_err();
    assert!(!parse_err.is_not_found());
}

#[test]
fn parse_date_rejects_impossible_dates() {
    assert!(parse_date("2024-02-30", 7).is_err());
    assert_eq!(parse_date(" 2024-02-29 ", 7).unwrap(), date(2024, 2, 29));
}
