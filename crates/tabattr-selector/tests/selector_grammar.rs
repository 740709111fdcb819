//! Selector grammar integration tests

use proptest::prelude::*;
use rstest::rstest;
use tabattr_selector::{
    parse_literal, parse_selector, ColumnKey, Literal, RowSpec, SelectionRequest, SelectorError,
    SheetRef, DELIMITED_LAYOUT, SPREADSHEET_LAYOUT,
};

// === Documented selector forms ===

#[rstest]
#[case("", None, None, None)]
#[case(r#""Sheet""#, Some("Sheet"), None, None)]
#[case(r#""Sheet",["column1"]"#, Some("Sheet"), Some(vec!["column1"]), None)]
#[case(
    r#""Sheet",["column1","column2"]"#,
    Some("Sheet"),
    Some(vec!["column1", "column2"]),
    None
)]
#[case(r#""Sheet",[],[0]"#, Some("Sheet"), None, Some(RowSpec::Single(0)))]
#[case(r#""",[],[0,7]"#, None, None, Some(RowSpec::Range { start: 0, end: 7 }))]
fn test_spreadsheet_selector_forms(
    #[case] text: &str,
    #[case] sheet: Option<&str>,
    #[case] columns: Option<Vec<&str>>,
    #[case] rows: Option<RowSpec>,
) {
    let request = parse_selector(text, SPREADSHEET_LAYOUT).unwrap();
    assert_eq!(request.sheet, sheet.map(|s| SheetRef::Name(s.to_string())));
    assert_eq!(
        request.columns,
        columns.map(|cols| cols.into_iter().map(ColumnKey::label).collect::<Vec<_>>())
    );
    assert_eq!(request.rows, rows);
    assert!(request.options.is_empty());
}

#[test]
fn test_options_pass_through() {
    let request = parse_selector(r#"{"parse_cols":"A:B"}"#, SPREADSHEET_LAYOUT).unwrap();
    assert_eq!(
        request,
        SelectionRequest {
            options: [("parse_cols".to_string(), Literal::str("A:B"))]
                .into_iter()
                .collect(),
            ..SelectionRequest::all()
        }
    );
}

#[test]
fn test_later_duplicate_option_wins() {
    let request = parse_selector(r#"{"nrows": 1, "nrows": 2}"#, DELIMITED_LAYOUT).unwrap();
    assert_eq!(request.options.get("nrows"), Some(&Literal::Int(2)));
}

#[test]
fn test_empty_tuple_has_no_arguments() {
    let request = parse_selector("()", DELIMITED_LAYOUT).unwrap();
    assert_eq!(request, SelectionRequest::all());
}

#[rstest]
#[case("[\"a\"")]
#[case("column")]
#[case("[1,,2]")]
#[case("{\"a\":}")]
#[case("os.system('ls')")]
fn test_malformed_selectors_fail(#[case] text: &str) {
    let err = parse_selector(text, DELIMITED_LAYOUT).unwrap_err();
    assert!(matches!(err, SelectorError::Syntax(_)), "{text}: {err:?}");
}

// === Properties ===

fn literal_strategy() -> impl Strategy<Value = Literal> {
    let leaf = prop_oneof![
        any::<bool>().prop_map(Literal::Bool),
        any::<i64>().prop_map(Literal::Int),
        "[a-zA-Z0-9_ ]{0,8}".prop_map(Literal::Str),
    ];
    leaf.prop_recursive(3, 16, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Literal::List),
            prop::collection::vec(inner.clone(), 2..4).prop_map(Literal::Tuple),
            prop::collection::vec(("[a-z]{1,4}".prop_map(Literal::Str), inner), 0..3)
                .prop_map(Literal::Dict),
        ]
    })
}

proptest! {
    #[test]
    fn prop_display_reparses_to_same_literal(literal in literal_strategy()) {
        let text = literal.to_string();
        prop_assert_eq!(parse_literal(&text).unwrap(), literal);
    }

    #[test]
    fn prop_parsing_is_deterministic(text in "[\\[\\]\"a-c0-9,{}:() ]{0,16}") {
        let first = parse_selector(&text, DELIMITED_LAYOUT);
        let second = parse_selector(&text, DELIMITED_LAYOUT);
        prop_assert_eq!(first, second);
    }
}
