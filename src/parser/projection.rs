//! Projection list splitting.
//!
//! Splitting a projection list at its commas needs to know which commas are top level.
//! Commas inside user-written parentheses are easy to recognise from container markers;
//! commas inside CASE expressions are not, because `CASE ... END` has no brackets. Two
//! pre-passes fix that before splitting:
//!
//! 1. `owner . name` triples are fused into a single identifier token.
//! 2. Synthetic brackets are inserted around every `CASE ... END` and inside every
//!    `WHEN ... THEN`, `THEN ... ELSE` and `ELSE ... END` region.
//!
//! The bracket pass first matches all keyword pairs on the original token indices and
//! then applies every insertion in one merge sweep. The shifted index of any original
//! token is computed analytically from the number of insertions in front of it.

use smol_str::SmolStr;
use tracing::trace;

use crate::error::{ParseError, ParseResult};
use crate::lexer::assign_containers;
use crate::lexer::token::{Token, TokenKind};
use crate::parser::base::{fuse_qualified, is_name_part};

/// Where the synthetic brackets of a matched keyword pair go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Placement {
    /// `( open ... close )`
    Around,
    /// `open ( ... ) close`
    Inside,
}

/// Keyword pairs that receive synthetic brackets, in processing order.
const BRACKETED_PAIRS: [(TokenKind, TokenKind, Placement); 4] = [
    (TokenKind::Case, TokenKind::End, Placement::Around),
    (TokenKind::When, TokenKind::Then, Placement::Inside),
    (TokenKind::Then, TokenKind::Else, Placement::Inside),
    (TokenKind::Else, TokenKind::End, Placement::Inside),
];

/// A matched keyword pair, by original token index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct MatchedPair {
    pub open: usize,
    pub close: usize,
    pub placement: Placement,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Insertion {
    /// Original index of the token the bracket is inserted in front of.
    before: usize,
    /// Order among insertions in front of the same token.
    rank: u8,
    opens: bool,
}

/// Synthetic bracket insertions for one token sequence.
#[derive(Debug, Clone)]
pub(crate) struct BracketPlan {
    pairs: Vec<MatchedPair>,
    insertions: Vec<Insertion>,
}

impl BracketPlan {
    /// Matches every bracketed keyword pair of `tokens` and plans the insertions.
    pub(crate) fn new(tokens: &[Token]) -> Self {
        let pairs = match_pairs(tokens);
        let mut insertions = Vec::with_capacity(pairs.len() * 2);

        for pair in &pairs {
            let (open_before, close_before) = match pair.placement {
                Placement::Around => (pair.open, pair.close + 1),
                Placement::Inside => (pair.open + 1, pair.close),
            };
            // A close in front of the same token as its own open must follow it; every
            // other close ends a region that started earlier and goes first.
            let close_rank = if close_before == open_before { 2 } else { 0 };
            insertions.push(Insertion {
                before: open_before,
                rank: 1,
                opens: true,
            });
            insertions.push(Insertion {
                before: close_before,
                rank: close_rank,
                opens: false,
            });
        }
        insertions.sort_by_key(|insertion| (insertion.before, insertion.rank));

        Self { pairs, insertions }
    }

    /// Matched keyword pairs in processing order.
    pub(crate) fn pairs(&self) -> &[MatchedPair] {
        &self.pairs
    }

    /// Index of original token `index` once all insertions are applied.
    pub(crate) fn shifted_index(&self, index: usize) -> usize {
        index
            + self
                .insertions
                .iter()
                .take_while(|insertion| insertion.before <= index)
                .count()
    }

    /// Returns `tokens` with all synthetic brackets inserted.
    pub(crate) fn apply(&self, tokens: &[Token]) -> Vec<Token> {
        let end = tokens.last().map_or(0, |token| token.span.end);
        let mut output = Vec::with_capacity(tokens.len() + self.insertions.len());
        let mut pending = self.insertions.iter().peekable();

        for index in 0..=tokens.len() {
            let offset = tokens.get(index).map_or(end, Token::offset);
            while let Some(insertion) = pending.next_if(|insertion| insertion.before == index) {
                let kind = if insertion.opens {
                    TokenKind::LParen
                } else {
                    TokenKind::RParen
                };
                output.push(Token::synthetic(kind, offset));
            }
            if let Some(token) = tokens.get(index) {
                debug_assert_eq!(output.len(), self.shifted_index(index));
                output.push(token.clone());
            }
        }

        output
    }
}

/// Matches each bracketed keyword pair with a stack, supporting arbitrary nesting.
fn match_pairs(tokens: &[Token]) -> Vec<MatchedPair> {
    let mut pairs = Vec::new();

    for (open_kind, close_kind, placement) in BRACKETED_PAIRS {
        let mut open = Vec::new();
        for (index, token) in tokens.iter().enumerate() {
            if token.kind == open_kind {
                open.push(index);
            } else if token.kind == close_kind {
                match open.pop() {
                    Some(start) => pairs.push(MatchedPair {
                        open: start,
                        close: index,
                        placement,
                    }),
                    None => trace!(index, close = %close_kind, "unmatched closing keyword"),
                }
            }
        }
        for index in open {
            trace!(index, open = %open_kind, "unmatched opening keyword");
        }
    }

    pairs
}

/// Fuses every `identifier . identifier` triple into one identifier token.
pub(crate) fn fuse_qualified_names(tokens: Vec<Token>) -> Vec<Token> {
    let mut fused: Vec<Token> = Vec::with_capacity(tokens.len());
    let mut iter = tokens.into_iter().peekable();

    while let Some(token) = iter.next() {
        if token.kind == TokenKind::Dot {
            if let Some(owner) = fused.last_mut().filter(|owner| owner.kind.is_identifier()) {
                if let Some(name) = iter.next_if(|name| is_name_part(name.kind)) {
                    *owner = fuse_qualified(owner, &name);
                    continue;
                }
            }
        }
        fused.push(token);
    }

    fused
}

/// Tokens of one projection entry.
#[derive(Debug, Clone)]
pub(crate) struct EntryTokens {
    /// Entry tokens with synthetic brackets removed.
    pub tokens: Vec<Token>,
    /// Top-level comma that ends the entry; `None` for the last entry.
    pub separator: Option<Token>,
}

/// Splits a projection token sequence into its top-level entries.
pub(crate) fn split_projection(tokens: &[Token]) -> Vec<EntryTokens> {
    let source: Vec<Token> = tokens
        .iter()
        .filter(|token| token.kind != TokenKind::Eof)
        .cloned()
        .collect();
    let before = source.len();
    let fused = fuse_qualified_names(source);
    trace!(fused = before - fused.len(), "fused qualified names");

    let plan = BracketPlan::new(&fused);
    for pair in plan.pairs() {
        trace!(
            open = plan.shifted_index(pair.open),
            close = plan.shifted_index(pair.close),
            placement = ?pair.placement,
            "bracketed CASE region"
        );
    }
    let mut bracketed = plan.apply(&fused);
    assign_containers(&mut bracketed);

    let mut entries = Vec::new();
    let mut current = Vec::new();
    for token in bracketed {
        if token.synthetic {
            continue;
        }
        if token.kind == TokenKind::Comma && token.container.is_none() {
            entries.push(EntryTokens {
                tokens: std::mem::take(&mut current),
                separator: Some(token),
            });
        } else {
            current.push(token);
        }
    }
    entries.push(EntryTokens {
        tokens: current,
        separator: None,
    });

    trace!(entries = entries.len(), "split projection");
    entries
}

/// Splits the alias off an entry, inserting a synthetic `AS` for implicit aliases.
pub(crate) fn extract_alias(
    mut tokens: Vec<Token>,
    implicit: bool,
) -> ParseResult<(Vec<Token>, Option<SmolStr>)> {
    if implicit && implicit_alias_applies(&tokens) {
        let at = tokens.len() - 1;
        let offset = tokens[at].offset();
        tokens.insert(at, Token::synthetic(TokenKind::As, offset));
    }

    let len = tokens.len();
    if let Some(last) = tokens.last() {
        if last.kind == TokenKind::As && last.container.is_none() {
            return Err(ParseError::at("expected alias after AS", last.span.end));
        }
    }
    if len < 2 || tokens[len - 2].kind != TokenKind::As || tokens[len - 2].container.is_some() {
        return Ok((tokens, None));
    }

    let alias = &tokens[len - 1];
    if !is_alias_token(alias.kind) {
        return Err(ParseError::new(
            "expected alias after AS",
            alias.span.clone(),
        ));
    }
    let alias = alias.text.clone();
    tokens.truncate(len - 2);
    Ok((tokens, Some(alias)))
}

fn is_alias_token(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Identifier | TokenKind::QuotedIdentifier | TokenKind::StringLiteral
    )
}

/// An entry ends in an implicit alias when its last token is a bare name separated by
/// whitespace from a token that cannot take an operand.
fn implicit_alias_applies(tokens: &[Token]) -> bool {
    let [.., previous, last] = tokens else {
        return false;
    };

    let bare_name = match last.kind {
        TokenKind::QuotedIdentifier => true,
        TokenKind::Identifier => !last.text.contains('.'),
        _ => false,
    };

    bare_name
        && last.container.is_none()
        && previous.gap_to(last) > 0
        && !expects_operand(previous.kind)
}

fn expects_operand(kind: TokenKind) -> bool {
    kind.is_operator()
        || matches!(
            kind,
            TokenKind::And
                | TokenKind::Or
                | TokenKind::Not
                | TokenKind::In
                | TokenKind::Is
                | TokenKind::Like
                | TokenKind::Case
                | TokenKind::When
                | TokenKind::Then
                | TokenKind::Else
                | TokenKind::As
                | TokenKind::Distinct
                | TokenKind::Exists
                | TokenKind::Select
                | TokenKind::LParen
                | TokenKind::LBrace
                | TokenKind::Comma
                | TokenKind::Dot
        )
}
