//! Keyword recognition for condition text.
//!
//! Keywords are case-insensitive; every other word lexes as an identifier.

use super::token::TokenKind;

/// Looks up a keyword by name (case-insensitive).
pub fn lookup_keyword(name: &str) -> Option<TokenKind> {
    match name.to_ascii_uppercase().as_str() {
        "AND" => Some(TokenKind::And),
        "OR" => Some(TokenKind::Or),
        "NOT" => Some(TokenKind::Not),
        "IN" => Some(TokenKind::In),
        "IS" => Some(TokenKind::Is),
        "LIKE" => Some(TokenKind::Like),
        "NULL" => Some(TokenKind::Null),
        "TRUE" => Some(TokenKind::True),
        "FALSE" => Some(TokenKind::False),
        "CASE" => Some(TokenKind::Case),
        "WHEN" => Some(TokenKind::When),
        "THEN" => Some(TokenKind::Then),
        "ELSE" => Some(TokenKind::Else),
        "END" => Some(TokenKind::End),
        "EXISTS" => Some(TokenKind::Exists),
        "DISTINCT" => Some(TokenKind::Distinct),
        "AS" => Some(TokenKind::As),
        "SELECT" => Some(TokenKind::Select),
        _ => None,
    }
}

/// Returns true if `name` is a reserved keyword (case-insensitive).
pub fn is_keyword(name: &str) -> bool {
    lookup_keyword(name).is_some()
}

/// Niladic date/time functions that are written without parentheses.
pub fn is_niladic_date_function(name: &str) -> bool {
    matches!(
        name.to_ascii_uppercase().as_str(),
        "CURRENT_DATE" | "CURRENT_TIME" | "CURRENT_TIMESTAMP" | "LOCALTIME" | "LOCALTIMESTAMP"
    )
}

/// Functions whose first argument is a bare date-part word.
pub fn takes_date_part_argument(function: &str) -> bool {
    matches!(
        function.to_ascii_uppercase().as_str(),
        "DATEADD" | "DATEDIFF" | "DATEDIFF_BIG" | "DATEPART" | "DATENAME" | "DATE_TRUNC"
            | "DATETRUNC"
    )
}

/// Date-part words accepted as the first argument of date functions.
pub fn is_date_part(name: &str) -> bool {
    matches!(
        name.to_ascii_lowercase().as_str(),
        "year"
            | "yy"
            | "yyyy"
            | "quarter"
            | "qq"
            | "q"
            | "month"
            | "mm"
            | "m"
            | "dayofyear"
            | "dy"
            | "y"
            | "day"
            | "dd"
            | "d"
            | "week"
            | "wk"
            | "ww"
            | "weekday"
            | "dw"
            | "hour"
            | "hh"
            | "minute"
            | "mi"
            | "n"
            | "second"
            | "ss"
            | "s"
            | "millisecond"
            | "ms"
            | "microsecond"
            | "mcs"
    )
}
