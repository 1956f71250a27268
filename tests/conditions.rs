//! Condition Parser Tests
//!
//! This module tests parsing of AND/OR chains and their conditionals:
//! - Comparison, IS, LIKE and IN operators
//! - Nested groups and unwrapping of redundant parentheses
//! - Qualified and quoted column names
//! - Sub-queries captured verbatim
//! - Clone independence of parsed containers

mod common;

use common::{assert_chain_invariants, container, term};
use condition_parser::{
    Column, ConditionalTerm, LogicalOperator, ParserConfig, ExpressionParser, ValuesArray,
};

// ===== Chains =====

#[test]
fn chain_keeps_connectives_in_order() {
    let parsed = container("a = 1 AND b <> 'x' OR c LIKE 'y%' AND d IS NOT NULL");

    assert_eq!(parsed.len(), 4);
    assert_eq!(
        parsed.logical_operators(),
        &[
            LogicalOperator::And,
            LogicalOperator::Or,
            LogicalOperator::And
        ]
    );
    let operators: Vec<&str> = parsed
        .terms()
        .iter()
        .filter_map(ConditionalTerm::as_conditional)
        .map(|conditional| conditional.operator.text.as_str())
        .collect();
    assert_eq!(operators, vec!["=", "<>", "LIKE", "IS NOT"]);
    assert_chain_invariants(&parsed);
}

#[test]
fn keywords_are_case_insensitive() {
    let parsed = container("a = 1 and b like 'x' Or c is null");
    assert_eq!(parsed.to_text(), "a = 1 AND b LIKE 'x' OR c IS NULL");
}

#[test]
fn comments_and_whitespace_are_ignored() {
    let parsed = container("a = 1 -- first\n  AND /* second */ b = 2");
    assert_eq!(parsed.to_text(), "a = 1 AND b = 2");
}

#[test]
fn bare_terms_are_conditions() {
    let parsed = container("active OR TRUE");
    assert_eq!(parsed.terms()[0], ConditionalTerm::column("active"));
    assert_eq!(parsed.terms()[1], ConditionalTerm::constant("TRUE"));
}

// ===== Groups =====

#[test]
fn groups_nest_containers() {
    let parsed = container("(a = 1 OR b = 2) AND (c = 3 OR d = 4) AND e = 5");

    assert_eq!(parsed.len(), 3);
    let first = parsed.terms()[0].as_container().unwrap();
    assert_eq!(first.logical_operators(), &[LogicalOperator::Or]);
    assert!(parsed.terms()[2].as_conditional().is_some());
    assert_eq!(
        parsed.to_text(),
        "(a = 1 OR b = 2) AND (c = 3 OR d = 4) AND e = 5"
    );
    assert_chain_invariants(&parsed);
}

#[test]
fn redundant_parentheses_unwrap() {
    assert_eq!(container("((a = 1))").to_text(), "a = 1");
    assert_eq!(container("(a = 1 OR b = 2)").len(), 2);
    assert_eq!(term("(((price)))"), ConditionalTerm::column("price"));
}

#[test]
fn parenthesised_right_operand() {
    let parsed = term("a = (b + c)");
    let conditional = parsed.as_conditional().unwrap();
    assert!(
        conditional
            .right
            .as_deref()
            .and_then(ConditionalTerm::as_formula)
            .is_some()
    );
    assert_eq!(parsed.to_text(), "a = (b + c)");
}

// ===== IN =====

#[test]
fn in_list_is_a_values_array() {
    let parsed = term("x IN (1,2,3)");
    let conditional = parsed.as_conditional().unwrap();

    assert_eq!(conditional.operator.text, "IN");
    assert!(conditional.operator.is_membership());
    let values = conditional
        .right
        .as_deref()
        .and_then(ConditionalTerm::as_values)
        .unwrap();
    assert_eq!(
        values,
        &ValuesArray::new(vec![
            ConditionalTerm::constant("1"),
            ConditionalTerm::constant("2"),
            ConditionalTerm::constant("3"),
        ])
    );
    assert_eq!(parsed.to_text(), "x IN (1, 2, 3)");
}

#[test]
fn in_list_of_expressions() {
    let parsed = term("code NOT IN (prefix + 'a', UPPER(name), @other)");
    let values = parsed
        .as_conditional()
        .and_then(|conditional| conditional.right.as_deref())
        .and_then(ConditionalTerm::as_values)
        .unwrap();

    assert_eq!(values.len(), 3);
    assert!(values.values[0].as_formula().is_some());
    assert!(values.values[1].as_function_call().is_some());
    assert_eq!(values.values[2], ConditionalTerm::variable("other"));
}

#[test]
fn in_subquery_is_kept() {
    let parsed = term("id IN (SELECT order_id FROM lines WHERE qty > 0)");
    let right = parsed
        .as_conditional()
        .and_then(|conditional| conditional.right.as_deref());

    match right {
        Some(ConditionalTerm::Subquery(subquery)) => {
            assert_eq!(subquery.text, "SELECT order_id FROM lines WHERE qty > 0")
        }
        other => panic!("expected sub-query, got {other:?}"),
    }
    assert_eq!(
        parsed.to_text(),
        "id IN (SELECT order_id FROM lines WHERE qty > 0)"
    );
}

// ===== EXISTS =====

#[test]
fn not_exists_is_unary() {
    let parsed = container("NOT EXISTS (SELECT 1 FROM t WHERE t.id = o.id) AND o.total > 0");
    let exists = parsed.terms()[0].as_conditional().unwrap();

    assert_eq!(exists.operator.text, "NOT EXISTS");
    assert!(exists.right.is_none());
    assert!(matches!(*exists.left, ConditionalTerm::Subquery(_)));
}

// ===== Leaves =====

#[test]
fn qualified_and_quoted_columns() {
    let parsed = container("\"order\".\"id\" = [dbo].[lines].[order_id] AND `t`.x = 1");
    let columns = parsed.columns();

    assert_eq!(
        columns,
        vec![
            Column::qualified("\"order\"", "\"id\""),
            Column::qualified("[dbo].[lines]", "[order_id]"),
            Column::qualified("`t`", "x"),
        ]
    );
    assert_eq!(
        parsed.to_text(),
        "\"order\".\"id\" = [dbo].[lines].[order_id] AND `t`.x = 1"
    );
}

#[test]
fn variables_in_both_notations() {
    let parsed = container("a = @first AND b = :second");
    let names: Vec<String> = parsed.variables().into_iter().map(String::from).collect();
    assert_eq!(names, vec!["first", "second"]);
    assert_eq!(parsed.to_text(), "a = @first AND b = @second");
}

#[test]
fn niladic_date_functions_are_constants() {
    let parsed = term("created_at < CURRENT_TIMESTAMP");
    let right = parsed
        .as_conditional()
        .and_then(|conditional| conditional.right.as_deref());
    assert_eq!(right, Some(&ConditionalTerm::constant("CURRENT_TIMESTAMP")));
}

// ===== Arithmetic =====

#[test]
fn arithmetic_is_left_to_right() {
    let parsed = term("price * qty - discount >= 100");
    let conditional = parsed.as_conditional().unwrap();
    let formula = conditional.left.as_formula().unwrap();

    assert_eq!(formula.parts().len(), 3);
    assert_eq!(parsed.to_text(), "price * qty - discount >= 100");
}

#[test]
fn arithmetic_after_a_conditional_wraps_it() {
    let parsed = container("a = b + c");
    let formula = parsed.terms()[0].as_formula().unwrap();
    assert!(formula.parts()[0].as_conditional().is_some());
    assert_eq!(parsed.to_text(), "(a = b) + c");
}

// ===== Ownership =====

#[test]
fn clones_are_independent() {
    let template = container("status = @status");
    let mut first = template.clone();
    let mut second = template.clone();

    first.and(term("total > 100"));
    second.or(term("priority = 1")).or(term("flagged"));

    assert_eq!(template.len(), 1);
    assert_eq!(template.to_text(), "status = @status");
    assert_eq!(first.to_text(), "status = @status AND total > 100");
    assert_eq!(second.len(), 3);
    assert_chain_invariants(&second);
}

#[test]
fn custom_configuration() {
    let parser = ExpressionParser::new(
        ParserConfig::new()
            .with_delimiter(condition_parser::ContainerDelimiter::BRACES)
            .with_max_depth(32),
    );
    let parsed = parser.parse_container("{a = 1 OR b = 2} AND (c = 3)").unwrap();

    assert_eq!(parsed.len(), 2);
    assert_eq!(parsed.to_text(), "(a = 1 OR b = 2) AND c = 3");
}
