//! CASE Expression Tests
//!
//! This module tests CASE parsing through the bounded clause scanner:
//! - Searched and simple CASE forms
//! - CASE nested in conditions, results and ELSE branches
//! - CASE as an operand of comparisons and formulas
//! - Error positions for truncated or malformed CASE expressions

mod common;

use common::{assert_chain_invariants, container, error_at, term};
use condition_parser::{CaseConditional, ConditionalTerm, parse_container};

fn case(term: &ConditionalTerm) -> &CaseConditional {
    term.as_case()
        .unwrap_or_else(|| panic!("expected CASE, got {term:?}"))
}

#[test]
fn searched_case() {
    let parsed = term("CASE WHEN a > 0 THEN 'pos' WHEN a < 0 THEN 'neg' ELSE 'zero' END");
    let case = case(&parsed);

    assert!(case.input.is_none());
    assert_eq!(case.when_then.len(), 2);
    assert!(case.when_then[0].0.as_conditional().is_some());
    assert_eq!(case.when_then[1].1, ConditionalTerm::constant("'neg'"));
    assert_eq!(
        case.else_term.as_deref(),
        Some(&ConditionalTerm::constant("'zero'"))
    );
}

#[test]
fn simple_case_with_input() {
    let parsed = term("CASE status WHEN 1 THEN 'open' WHEN 2 THEN 'closed' END");
    let case = case(&parsed);

    assert_eq!(
        case.input.as_deref(),
        Some(&ConditionalTerm::column("status"))
    );
    assert_eq!(case.when_then.len(), 2);
    assert!(case.else_term.is_none());
    assert_eq!(
        parsed.to_text(),
        "CASE status WHEN 1 THEN 'open' WHEN 2 THEN 'closed' END"
    );
}

#[test]
fn case_nested_in_a_condition() {
    let parsed = term("CASE WHEN (CASE WHEN a THEN b ELSE c END) = 1 THEN x ELSE y END");
    let outer = case(&parsed);

    assert_eq!(outer.when_then.len(), 1);
    let condition = outer.when_then[0].0.as_conditional().unwrap();
    let inner = case(&condition.left);
    assert_eq!(inner.when_then.len(), 1);
    assert_eq!(
        inner.else_term.as_deref(),
        Some(&ConditionalTerm::column("c"))
    );
    assert_eq!(outer.when_then[0].1, ConditionalTerm::column("x"));
}

#[test]
fn case_nested_without_parentheses() {
    let parsed = term("CASE WHEN CASE WHEN a THEN 1 END = 1 THEN x END");
    let outer = case(&parsed);
    let condition = outer.when_then[0].0.as_conditional().unwrap();
    assert!(condition.left.as_case().is_some());
}

#[test]
fn case_nested_in_results() {
    let parsed = term(
        "CASE WHEN a THEN CASE WHEN b THEN 1 ELSE 2 END ELSE CASE c WHEN 3 THEN 4 END END",
    );
    let outer = case(&parsed);

    let then = case(&outer.when_then[0].1);
    assert_eq!(then.else_term.as_deref(), Some(&ConditionalTerm::constant("2")));
    let otherwise = outer.else_term.as_deref().map(case).unwrap();
    assert_eq!(
        otherwise.input.as_deref(),
        Some(&ConditionalTerm::column("c"))
    );
}

#[test]
fn case_clauses_hold_chains() {
    let parsed = term("CASE WHEN a = 1 AND b = 2 OR c THEN x + 1 ELSE NULL END");
    let case = case(&parsed);

    let condition = case.when_then[0].0.as_container().unwrap();
    assert_eq!(condition.len(), 3);
    assert!(case.when_then[0].1.as_formula().is_some());
    assert_eq!(
        parsed.to_text(),
        "CASE WHEN a = 1 AND b = 2 OR c THEN x + 1 ELSE NULL END"
    );
}

#[test]
fn case_as_an_operand() {
    let parsed = container("x = 1 AND CASE WHEN y THEN 1 ELSE 0 END + 1 > 0");
    assert_chain_invariants(&parsed);
    assert_eq!(parsed.len(), 2);

    let conditional = parsed.terms()[1].as_conditional().unwrap();
    assert_eq!(conditional.operator.text, ">");
    let left = conditional.left.as_formula().unwrap();
    assert!(left.parts()[0].as_case().is_some());
    assert_eq!(
        parsed.to_text(),
        "x = 1 AND CASE WHEN y THEN 1 ELSE 0 END + 1 > 0"
    );
}

#[test]
fn case_inside_function_arguments() {
    let parsed = term("SUM(CASE WHEN paid THEN amount ELSE 0 END) > 100");
    let call = parsed
        .as_conditional()
        .and_then(|conditional| conditional.left.as_function_call())
        .unwrap();
    assert!(
        call.parameters[0]
            .as_ref()
            .and_then(ConditionalTerm::as_case)
            .is_some()
    );
}

#[test]
fn lowercase_keywords() {
    let parsed = term("case when a then 1 else 0 end");
    assert_eq!(parsed.to_text(), "CASE WHEN a THEN 1 ELSE 0 END");
}

// ===== Errors =====

#[test]
fn truncated_case_reports_the_end() {
    let source = "CASE WHEN a = 1 THEN b";
    let error = error_at(source);

    assert_eq!(error.message, "expected END after b");
    assert!(error.position > 0);
    assert!(error.position >= source.len() - 1);
}

#[test]
fn missing_then() {
    let error = error_at("CASE WHEN a b END");
    assert_eq!(error.message, "expected THEN after a");
    assert_eq!(error.position, 12);
}

#[test]
fn missing_when() {
    let error = error_at("CASE a END");
    assert_eq!(error.message, "expected WHEN after a");
    assert_eq!(error.position, 7);

    let error = error_at("CASE ELSE 1 END");
    assert_eq!(error.message, "unexpected token 'ELSE'");
}

#[test]
fn empty_clauses() {
    let error = error_at("CASE WHEN THEN 1 END");
    assert_eq!(error.message, "expected expression");
    assert_eq!(error.position, 10);

    let error = error_at("CASE WHEN a THEN END");
    assert_eq!(error.message, "expected expression");
    assert_eq!(error.position, 17);
}

#[test]
fn unterminated_nested_case() {
    let error = parse_container("CASE WHEN a THEN CASE WHEN b THEN 1 END").unwrap_err();
    assert_eq!(error.message, "expected END after CASE WHEN b THEN 1 END");
    assert!(error.position > 0);
}
