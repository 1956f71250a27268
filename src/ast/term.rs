//! Conditional term nodes.
//!
//! [`ConditionalTerm`] is the closed family of nodes produced by the parser:
//! - leaves (columns, constants, variables, opaque sub-queries)
//! - binary and unary conditionals (`a = b`, `x IN (..)`, `NOT EXISTS (..)`)
//! - AND/OR chains ([`ConditionalContainer`])
//! - CASE expressions, formulas, function calls and value lists
//!
//! Every node is an owned value: cloning a term deep-copies the whole subtree.

use crate::ast::container::ConditionalContainer;
use crate::ast::visitors::{ColumnCollector, VariableCollector};
use crate::lexer::token::TokenKind;
use rustc_hash::FxHasher;
use smol_str::SmolStr;
use std::collections::BTreeSet;
use std::hash::{Hash, Hasher};

// ============================================================================
// ConditionalTerm - Top-level node type
// ============================================================================

/// Any node of a parsed condition, projection entry or formula.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ConditionalTerm {
    /// Column reference, optionally qualified by its owner.
    Column(Column),
    /// Literal kept exactly as written.
    Constant(Constant),
    /// Late-bound parameter placeholder.
    Variable(Variable),
    /// `left op right`, or a unary form such as `EXISTS left`.
    Conditional(Conditional),
    /// AND/OR chain.
    Container(ConditionalContainer),
    /// CASE expression.
    Case(CaseConditional),
    /// Left-to-right arithmetic chain.
    Formula(Formula),
    /// Function call.
    FunctionCall(FunctionCall),
    /// Parenthesised value list.
    Values(ValuesArray),
    /// Unary minus applied to a term.
    Negated(Box<ConditionalTerm>),
    /// Parenthesised sub-query, kept verbatim.
    Subquery(Subquery),
}

impl ConditionalTerm {
    /// Creates an unqualified column term.
    pub fn column(name: impl Into<SmolStr>) -> Self {
        ConditionalTerm::Column(Column::new(name))
    }

    /// Creates a constant term.
    pub fn constant(text: impl Into<SmolStr>) -> Self {
        ConditionalTerm::Constant(Constant::new(text))
    }

    /// Creates a variable term.
    pub fn variable(name: impl Into<SmolStr>) -> Self {
        ConditionalTerm::Variable(Variable::new(name))
    }

    /// Renders the canonical text of this term.
    pub fn to_text(&self) -> String {
        self.to_string()
    }

    /// Stable hash of the canonical text, suitable as a cache key.
    pub fn fingerprint(&self) -> u64 {
        fingerprint_text(&self.to_text())
    }

    /// Names of all variables referenced by this term.
    pub fn variables(&self) -> BTreeSet<SmolStr> {
        VariableCollector::collect_from_term(self)
    }

    /// Distinct columns referenced by this term, in source order.
    pub fn columns(&self) -> Vec<Column> {
        ColumnCollector::collect_from_term(self)
    }

    /// Returns the column if this term is one.
    pub fn as_column(&self) -> Option<&Column> {
        match self {
            ConditionalTerm::Column(column) => Some(column),
            _ => None,
        }
    }

    /// Returns the constant if this term is one.
    pub fn as_constant(&self) -> Option<&Constant> {
        match self {
            ConditionalTerm::Constant(constant) => Some(constant),
            _ => None,
        }
    }

    /// Returns the conditional if this term is one.
    pub fn as_conditional(&self) -> Option<&Conditional> {
        match self {
            ConditionalTerm::Conditional(conditional) => Some(conditional),
            _ => None,
        }
    }

    /// Returns the container if this term is one.
    pub fn as_container(&self) -> Option<&ConditionalContainer> {
        match self {
            ConditionalTerm::Container(container) => Some(container),
            _ => None,
        }
    }

    /// Returns the CASE expression if this term is one.
    pub fn as_case(&self) -> Option<&CaseConditional> {
        match self {
            ConditionalTerm::Case(case) => Some(case),
            _ => None,
        }
    }

    /// Returns the formula if this term is one.
    pub fn as_formula(&self) -> Option<&Formula> {
        match self {
            ConditionalTerm::Formula(formula) => Some(formula),
            _ => None,
        }
    }

    /// Returns the function call if this term is one.
    pub fn as_function_call(&self) -> Option<&FunctionCall> {
        match self {
            ConditionalTerm::FunctionCall(call) => Some(call),
            _ => None,
        }
    }

    /// Returns the value list if this term is one.
    pub fn as_values(&self) -> Option<&ValuesArray> {
        match self {
            ConditionalTerm::Values(values) => Some(values),
            _ => None,
        }
    }

    /// Returns true for column, constant, variable and sub-query leaves.
    pub fn is_leaf(&self) -> bool {
        matches!(
            self,
            ConditionalTerm::Column(_)
                | ConditionalTerm::Constant(_)
                | ConditionalTerm::Variable(_)
                | ConditionalTerm::Subquery(_)
        )
    }
}

impl From<Column> for ConditionalTerm {
    fn from(column: Column) -> Self {
        ConditionalTerm::Column(column)
    }
}

impl From<Constant> for ConditionalTerm {
    fn from(constant: Constant) -> Self {
        ConditionalTerm::Constant(constant)
    }
}

impl From<Variable> for ConditionalTerm {
    fn from(variable: Variable) -> Self {
        ConditionalTerm::Variable(variable)
    }
}

impl From<Conditional> for ConditionalTerm {
    fn from(conditional: Conditional) -> Self {
        ConditionalTerm::Conditional(conditional)
    }
}

impl From<ConditionalContainer> for ConditionalTerm {
    fn from(container: ConditionalContainer) -> Self {
        ConditionalTerm::Container(container)
    }
}

impl From<CaseConditional> for ConditionalTerm {
    fn from(case: CaseConditional) -> Self {
        ConditionalTerm::Case(case)
    }
}

impl From<Formula> for ConditionalTerm {
    fn from(formula: Formula) -> Self {
        ConditionalTerm::Formula(formula)
    }
}

impl From<FunctionCall> for ConditionalTerm {
    fn from(call: FunctionCall) -> Self {
        ConditionalTerm::FunctionCall(call)
    }
}

impl From<ValuesArray> for ConditionalTerm {
    fn from(values: ValuesArray) -> Self {
        ConditionalTerm::Values(values)
    }
}

pub(crate) fn fingerprint_text(text: &str) -> u64 {
    let mut hasher = FxHasher::default();
    text.hash(&mut hasher);
    hasher.finish()
}

// ============================================================================
// Leaves
// ============================================================================

/// Column reference such as `price` or `t.price`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Column {
    /// Qualifying prefix before the last dot (table alias, schema-qualified table).
    pub owner: Option<SmolStr>,
    /// Column name.
    pub name: SmolStr,
}

impl Column {
    /// Creates an unqualified column.
    pub fn new(name: impl Into<SmolStr>) -> Self {
        Self {
            owner: None,
            name: name.into(),
        }
    }

    /// Creates a column qualified by `owner`.
    pub fn qualified(owner: impl Into<SmolStr>, name: impl Into<SmolStr>) -> Self {
        Self {
            owner: Some(owner.into()),
            name: name.into(),
        }
    }

    /// Splits dotted identifier text at its last unquoted dot.
    ///
    /// Dots inside `"..."`, `` `...` `` or `[...]` quoting belong to the name.
    pub fn from_qualified_text(text: &str) -> Self {
        match last_unquoted_dot(text) {
            Some(dot) => Self::qualified(&text[..dot], &text[dot + 1..]),
            None => Self::new(text),
        }
    }
}

fn last_unquoted_dot(text: &str) -> Option<usize> {
    let mut closing: Option<char> = None;
    let mut last = None;

    for (index, ch) in text.char_indices() {
        match closing {
            Some(close) if ch == close => closing = None,
            Some(_) => {}
            None => match ch {
                '"' => closing = Some('"'),
                '`' => closing = Some('`'),
                '[' => closing = Some(']'),
                '.' => last = Some(index),
                _ => {}
            },
        }
    }

    last
}

/// Literal value kept exactly as lexed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Constant {
    /// Literal text, including quotes for strings.
    pub text: SmolStr,
}

impl Constant {
    /// Creates a constant from its literal text.
    pub fn new(text: impl Into<SmolStr>) -> Self {
        Self { text: text.into() }
    }

    /// Returns true for the `NULL` literal.
    pub fn is_null(&self) -> bool {
        self.text.eq_ignore_ascii_case("NULL")
    }

    /// Returns true for quoted string literals.
    pub fn is_string(&self) -> bool {
        self.text.starts_with('\'')
    }

    /// Returns the unquoted content of a string literal.
    pub fn string_value(&self) -> Option<String> {
        let inner = self.text.strip_prefix('\'')?.strip_suffix('\'')?;
        Some(inner.replace("''", "'"))
    }
}

/// Late-bound parameter placeholder (`@name` or `:name`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Variable {
    /// Parameter name without its sigil.
    pub name: SmolStr,
}

impl Variable {
    /// Creates a variable. A leading `@` or `:` sigil is stripped.
    pub fn new(name: impl Into<SmolStr>) -> Self {
        let name: SmolStr = name.into();
        match name.strip_prefix(['@', ':']) {
            Some(bare) => Self {
                name: SmolStr::new(bare),
            },
            None => Self { name },
        }
    }
}

/// Opaque parenthesised sub-query such as `(SELECT 1 FROM t)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Subquery {
    /// Source text between the parentheses.
    pub text: SmolStr,
}

impl Subquery {
    /// Creates a sub-query from the text between its parentheses.
    pub fn new(text: impl Into<SmolStr>) -> Self {
        Self { text: text.into() }
    }
}

// ============================================================================
// Operators
// ============================================================================

/// Conditional operator text, e.g. `=`, `IN`, `IS NOT`, `NOT EXISTS`.
///
/// Operators are only meaningful inside a [`Conditional`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Operator {
    /// Canonical operator text.
    pub text: SmolStr,
}

impl Operator {
    /// Creates an operator from its text.
    pub fn new(text: impl Into<SmolStr>) -> Self {
        Self { text: text.into() }
    }

    /// Returns true if the operator is `text`, ignoring ASCII case.
    pub fn is(&self, text: &str) -> bool {
        self.text.eq_ignore_ascii_case(text)
    }

    /// Returns true for `IN` and `NOT IN`.
    pub fn is_membership(&self) -> bool {
        self.is("IN") || self.is("NOT IN")
    }
}

/// Logical connective between the terms of a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LogicalOperator {
    And,
    Or,
}

impl LogicalOperator {
    /// Maps an `AND`/`OR` token kind.
    pub fn from_token_kind(kind: TokenKind) -> Option<Self> {
        match kind {
            TokenKind::And => Some(LogicalOperator::And),
            TokenKind::Or => Some(LogicalOperator::Or),
            _ => None,
        }
    }

    /// Keyword text of the operator.
    pub fn as_str(&self) -> &'static str {
        match self {
            LogicalOperator::And => "AND",
            LogicalOperator::Or => "OR",
        }
    }
}

/// Arithmetic operator inside a [`Formula`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ArithmeticOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
}

impl ArithmeticOperator {
    /// Maps an arithmetic token kind.
    pub fn from_token_kind(kind: TokenKind) -> Option<Self> {
        match kind {
            TokenKind::Plus => Some(ArithmeticOperator::Add),
            TokenKind::Minus => Some(ArithmeticOperator::Subtract),
            TokenKind::Star => Some(ArithmeticOperator::Multiply),
            TokenKind::Slash => Some(ArithmeticOperator::Divide),
            TokenKind::Percent => Some(ArithmeticOperator::Modulo),
            _ => None,
        }
    }

    /// Symbol of the operator.
    pub fn symbol(&self) -> &'static str {
        match self {
            ArithmeticOperator::Add => "+",
            ArithmeticOperator::Subtract => "-",
            ArithmeticOperator::Multiply => "*",
            ArithmeticOperator::Divide => "/",
            ArithmeticOperator::Modulo => "%",
        }
    }
}

// ============================================================================
// Compound nodes
// ============================================================================

/// `left operator right`, or a unary form when `right` is `None`.
///
/// Unary forms render with the operator first: `EXISTS (SELECT ..)`, `NOT a = 1`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Conditional {
    pub left: Box<ConditionalTerm>,
    pub operator: Operator,
    pub right: Option<Box<ConditionalTerm>>,
}

impl Conditional {
    /// Creates a binary conditional.
    pub fn binary(left: ConditionalTerm, operator: Operator, right: ConditionalTerm) -> Self {
        Self {
            left: Box::new(left),
            operator,
            right: Some(Box::new(right)),
        }
    }

    /// Creates a unary conditional (`EXISTS`, `NOT EXISTS`, `NOT`).
    pub fn unary(operator: Operator, operand: ConditionalTerm) -> Self {
        Self {
            left: Box::new(operand),
            operator,
            right: None,
        }
    }

    /// Returns true for forms without a right-hand side.
    pub fn is_unary(&self) -> bool {
        self.right.is_none()
    }
}

/// `CASE [input] WHEN .. THEN .. [ELSE ..] END`.
///
/// `when_then` is never empty for parsed expressions.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CaseConditional {
    /// Operand of a simple CASE; `None` for a searched CASE.
    pub input: Option<Box<ConditionalTerm>>,
    /// `(condition, result)` pairs in source order.
    pub when_then: Vec<(ConditionalTerm, ConditionalTerm)>,
    /// Result of the ELSE branch.
    pub else_term: Option<Box<ConditionalTerm>>,
}

impl CaseConditional {
    /// Creates a CASE expression. Returns `None` when `when_then` is empty.
    pub fn new(
        input: Option<ConditionalTerm>,
        when_then: Vec<(ConditionalTerm, ConditionalTerm)>,
        else_term: Option<ConditionalTerm>,
    ) -> Option<Self> {
        if when_then.is_empty() {
            return None;
        }
        Some(Self {
            input: input.map(Box::new),
            when_then,
            else_term: else_term.map(Box::new),
        })
    }
}

/// Arithmetic chain `part (op part)*`.
///
/// Formulas have no precedence tiers: operators apply strictly left to right, so
/// `a + b * c` means `(a + b) * c`. Consumers re-parse stored formula text with the
/// same rule, so introducing precedence here would change the meaning of stored text.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Formula {
    parts: Vec<ConditionalTerm>,
    operators: Vec<ArithmeticOperator>,
}

impl Formula {
    /// Starts a formula with its first operand.
    pub fn new(first: ConditionalTerm) -> Self {
        Self {
            parts: vec![first],
            operators: Vec::new(),
        }
    }

    /// Appends `operator part`.
    pub fn push(&mut self, operator: ArithmeticOperator, part: ConditionalTerm) {
        self.operators.push(operator);
        self.parts.push(part);
    }

    /// Builder form of [`push`](Self::push).
    pub fn then(mut self, operator: ArithmeticOperator, part: ConditionalTerm) -> Self {
        self.push(operator, part);
        self
    }

    /// Operands in order.
    pub fn parts(&self) -> &[ConditionalTerm] {
        &self.parts
    }

    /// Operators; `operators().len() == parts().len() - 1`.
    pub fn operators(&self) -> &[ArithmeticOperator] {
        &self.operators
    }

    pub(crate) fn parts_mut(&mut self) -> &mut [ConditionalTerm] {
        &mut self.parts
    }
}

/// Function call `call(params..)`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FunctionCall {
    /// Called function, normally a [`Column`] naming it.
    pub call: Box<ConditionalTerm>,
    /// Arguments; `None` is an explicit `NULL` argument.
    pub parameters: Vec<Option<ConditionalTerm>>,
    /// Set by a `DISTINCT` marker in the argument list.
    pub distinct: bool,
}

impl FunctionCall {
    /// Creates a call with no arguments.
    pub fn new(call: ConditionalTerm) -> Self {
        Self {
            call: Box::new(call),
            parameters: Vec::new(),
            distinct: false,
        }
    }

    /// Appends an argument.
    pub fn with_parameter(mut self, parameter: Option<ConditionalTerm>) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Marks the call as `DISTINCT`.
    pub fn with_distinct(mut self, distinct: bool) -> Self {
        self.distinct = distinct;
        self
    }

    /// Name of the called function when it is a plain column reference.
    pub fn name(&self) -> Option<&str> {
        self.call.as_column().map(|column| column.name.as_str())
    }

    /// Returns true if the called function is `name`, ignoring ASCII case.
    pub fn is_named(&self, name: &str) -> bool {
        self.name()
            .is_some_and(|own| own.eq_ignore_ascii_case(name))
    }
}

/// Parenthesised value list, e.g. the right side of `IN (1, 2, 3)`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ValuesArray {
    pub values: Vec<ConditionalTerm>,
}

impl ValuesArray {
    /// Creates a value list.
    pub fn new(values: Vec<ConditionalTerm>) -> Self {
        Self { values }
    }

    /// Number of values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true when the list holds no values.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
