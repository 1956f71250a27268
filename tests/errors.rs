//! Parse Error Tests
//!
//! Every failure aborts the parse with a single error carrying a message and the source
//! offset of the offending token.

mod common;

use common::{error_at, format_error};
use condition_parser::{ExpressionParser, ParserConfig, parse_container, parse_term};
use rstest::rstest;

#[rstest]
#[case("-", "expected expression after minus", 1)]
#[case("a = 1 AND", "expected expression", 9)]
#[case("a = ", "expected expression", 4)]
#[case("(a = 1", "expected ')' to close '('", 6)]
#[case("x IN (1, 2 3)", "expected ',' after 2", 11)]
#[case("CASE WHEN a THEN b", "expected END after b", 18)]
#[case("CASE WHEN a b END", "expected THEN after a", 12)]
#[case("CASE a END", "expected WHEN after a", 7)]
#[case("a = 1 b", "unexpected trailing token 'b'", 6)]
#[case("a = 1)", "unexpected trailing token ')'", 5)]
#[case("a = )", "unexpected token ')'", 4)]
#[case("a = 'x", "unclosed string literal", 4)]
#[case("\"a = 1", "unclosed quoted identifier", 0)]
#[case("a ? b", "invalid character '?'", 2)]
#[case("f(a, b", "expected ')' to close '('", 6)]
#[case("CAST(a AS)", "expected type name after AS", 9)]
fn reports_message_and_position(
    #[case] source: &str,
    #[case] message: &str,
    #[case] position: usize,
) {
    let error = error_at(source);
    assert_eq!(error.message, message, "{source:?}");
    assert_eq!(error.position, position, "{source:?}");
    assert_eq!(error.span.start, error.position);
}

#[test]
fn error_display_is_the_message() {
    let error = parse_term("a = ").unwrap_err();
    assert_eq!(error.to_string(), "expected expression");
}

#[test]
fn report_renders_source_context() {
    let source = "CASE WHEN a = 1 THEN b";
    let error = parse_container(source).unwrap_err();
    let rendered = format_error(&error, source);

    assert!(rendered.contains("expected END after b"), "{rendered}");
}

#[test]
fn unclosed_constructs_point_back_at_their_opener() {
    let source = "a = 1 AND CASE WHEN b THEN c";
    let error = parse_container(source).unwrap_err();
    assert_eq!(error.position, source.len());
    assert_eq!(error.context.as_ref().map(|label| label.span.clone()), Some(10..14));
    assert_eq!(error.help.as_deref(), Some("close the CASE expression with END"));

    let report = error.to_report(source);
    let labels: Vec<_> = report.labels().into_iter().flatten().collect();
    assert_eq!(labels.len(), 2);
    assert_eq!(labels[1].offset(), 10);

    let error = parse_container("x = (a + (b - c)").unwrap_err();
    assert_eq!(error.message, "expected ')' to close '('");
    assert_eq!(error.context.map(|label| label.span), Some(4..5));
}

#[test]
fn report_tolerates_foreign_source() {
    let error = parse_container("a = 1 AND").unwrap_err();
    let rendered = format_error(&error, "");
    assert!(rendered.contains("expected expression"), "{rendered}");
}

#[test]
fn deep_nesting_fails_cleanly() {
    let deep = format!("{}a{}", "(".repeat(10_000), ")".repeat(10_000));
    let error = parse_container(&deep).unwrap_err();
    assert_eq!(
        error.message,
        "expression nesting exceeds maximum depth of 128"
    );

    let parser = ExpressionParser::new(ParserConfig::new().with_max_depth(4));
    let error = parser.parse_container("NOT NOT NOT NOT NOT a").unwrap_err();
    assert!(error.message.starts_with("expression nesting exceeds"));
    assert!(parser.parse_container("NOT NOT a").is_ok());
}

#[test]
fn deep_case_nesting_fails_cleanly() {
    let depth = 200;
    let mut source = String::new();
    for _ in 0..depth {
        source.push_str("CASE WHEN a THEN ");
    }
    source.push('1');
    for _ in 0..depth {
        source.push_str(" END");
    }

    let error = parse_container(&source).unwrap_err();
    assert!(error.message.starts_with("expression nesting exceeds"));
}
