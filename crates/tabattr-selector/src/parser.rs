//! Restricted literal parser using nom
//!
//! Grammar:
//! ```text
//! selector  := item (',' item)* ','?
//! item      := string | float | int | bool | list | paren | dict
//! list      := '[' (item (',' item)* ','?)? ']'
//! paren     := '(' ')' | '(' item ')' | '(' item ',' (item (',' item)* ','?)? ')'
//! dict      := '{' (item ':' item (',' item ':' item)* ','?)? '}'
//! string    := '"' chars '"' | '\'' chars '\''
//! bool      := 'True' | 'False' | 'true' | 'false'
//! ```
//!
//! A top-level sequence with at least one comma is a tuple; a single item
//! without a trailing comma is returned as itself.

use crate::literal::Literal;
use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::{char, digit1, multispace0, one_of, satisfy},
    combinator::{map, map_res, not, opt, recognize, value},
    error::ErrorKind,
    multi::separated_list0,
    sequence::{delimited, pair, preceded, separated_pair, terminated, tuple},
    IResult,
};
use thiserror::Error;

/// Selector errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SelectorError {
    /// The text is not a valid literal expression
    #[error("Syntax error: {0}")]
    Syntax(String),

    /// The text is empty or only whitespace
    #[error("Unexpected end of input")]
    UnexpectedEnd,

    /// The literal parsed but cannot be used as a selection
    #[error("Invalid selector shape: {0}")]
    Shape(String),
}

/// Result type for selector operations
pub type SelectorResult<T> = Result<T, SelectorError>;

/// Deepest bracket nesting a selector may use
pub const MAX_NESTING: usize = 64;

/// Parse a literal expression from a string
pub fn parse_literal(input: &str) -> SelectorResult<Literal> {
    let input = input.trim();
    if input.is_empty() {
        return Err(SelectorError::UnexpectedEnd);
    }
    check_nesting(input)?;

    match top_level(input) {
        Ok(("", result)) => Ok(result),
        Ok((remaining, _)) => Err(SelectorError::Syntax(format!(
            "Unexpected characters at end: '{}'",
            remaining
        ))),
        Err(e) => Err(SelectorError::Syntax(format!("{:?}", e))),
    }
}

/// Reject nesting past `MAX_NESTING` before the recursive parsers see it
fn check_nesting(input: &str) -> SelectorResult<()> {
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for c in input.chars() {
        match quote {
            Some(_) if escaped => escaped = false,
            Some(_) if c == '\\' => escaped = true,
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None => match c {
                '"' | '\'' => quote = Some(c),
                '[' | '(' | '{' => {
                    depth += 1;
                    if depth > MAX_NESTING {
                        return Err(SelectorError::Syntax(format!(
                            "nesting deeper than {} levels",
                            MAX_NESTING
                        )));
                    }
                }
                ']' | ')' | '}' => depth = depth.saturating_sub(1),
                _ => {}
            },
        }
    }
    Ok(())
}

fn reject(input: &str) -> nom::Err<nom::error::Error<&str>> {
    nom::Err::Error(nom::error::Error::new(input, ErrorKind::Verify))
}

/// Parse whitespace
fn ws<'a, F, O>(inner: F) -> impl FnMut(&'a str) -> IResult<&'a str, O>
where
    F: FnMut(&'a str) -> IResult<&'a str, O>,
{
    delimited(multispace0, inner, multispace0)
}

/// Parse the whole selector: a single item or a bare tuple
fn top_level(input: &str) -> IResult<&str, Literal> {
    let (rest, (mut items, trailing)) = sequence_items(input)?;
    if items.is_empty() {
        return Err(reject(input));
    }
    if items.len() == 1 && !trailing {
        return Ok((rest, items.remove(0)));
    }
    Ok((rest, Literal::Tuple(items)))
}

/// Parse any literal, surrounded by optional whitespace
fn literal(input: &str) -> IResult<&str, Literal> {
    ws(alt((
        map(string_literal, Literal::Str),
        // Floats must come before integers so "1.5" is not split
        map(float_literal, Literal::Float),
        map(int_literal, Literal::Int),
        map(bool_literal, Literal::Bool),
        list_literal,
        paren_literal,
        dict_literal,
    )))(input)
}

/// Comma separated items with an optional trailing comma
fn sequence_items(input: &str) -> IResult<&str, (Vec<Literal>, bool)> {
    let (input, items) = separated_list0(char(','), literal)(input)?;
    let (input, trailing) = opt(char(','))(input)?;
    if items.is_empty() && trailing.is_some() {
        return Err(reject(input));
    }
    Ok((input, (items, trailing.is_some())))
}

/// Parse a list: [a, b, ...]
fn list_literal(input: &str) -> IResult<&str, Literal> {
    let (input, _) = char('[')(input)?;
    let (input, (items, _)) = sequence_items(input)?;
    let (input, _) = preceded(multispace0, char(']'))(input)?;
    Ok((input, Literal::List(items)))
}

/// Parse a parenthesized item or tuple
fn paren_literal(input: &str) -> IResult<&str, Literal> {
    let (input, _) = char('(')(input)?;
    let (input, (mut items, trailing)) = sequence_items(input)?;
    let (input, _) = preceded(multispace0, char(')'))(input)?;
    if items.len() == 1 && !trailing {
        return Ok((input, items.remove(0)));
    }
    Ok((input, Literal::Tuple(items)))
}

/// Parse a mapping: {key: value, ...}
fn dict_literal(input: &str) -> IResult<&str, Literal> {
    let (input, _) = char('{')(input)?;
    let (input, entries) =
        separated_list0(char(','), separated_pair(literal, char(':'), literal))(input)?;
    let (input, trailing) = opt(char(','))(input)?;
    if entries.is_empty() && trailing.is_some() {
        return Err(reject(input));
    }
    let (input, _) = preceded(multispace0, char('}'))(input)?;
    Ok((input, Literal::Dict(entries)))
}

/// Parse a boolean keyword not followed by identifier characters
fn bool_literal(input: &str) -> IResult<&str, bool> {
    terminated(
        alt((
            value(true, tag("True")),
            value(false, tag("False")),
            value(true, tag("true")),
            value(false, tag("false")),
        )),
        not(satisfy(|c: char| c.is_alphanumeric() || c == '_')),
    )(input)
}

fn exponent(input: &str) -> IResult<&str, &str> {
    recognize(tuple((one_of("eE"), opt(one_of("+-")), digit1)))(input)
}

/// Parse a float: requires a decimal point or an exponent
fn float_literal(input: &str) -> IResult<&str, f64> {
    map_res(
        recognize(pair(
            opt(one_of("+-")),
            alt((
                recognize(tuple((digit1, char('.'), opt(digit1), opt(exponent)))),
                recognize(tuple((char('.'), digit1, opt(exponent)))),
                recognize(pair(digit1, exponent)),
            )),
        )),
        |s: &str| s.parse::<f64>(),
    )(input)
}

fn int_literal(input: &str) -> IResult<&str, i64> {
    map_res(recognize(pair(opt(one_of("+-")), digit1)), |s: &str| {
        s.parse::<i64>()
    })(input)
}

/// Parse a quoted string with backslash escapes
fn string_literal(input: &str) -> IResult<&str, String> {
    let mut chars = input.char_indices();
    let quote = match chars.next() {
        Some((_, c)) if c == '"' || c == '\'' => c,
        _ => return Err(reject(input)),
    };

    let mut out = String::new();
    let mut escaped = false;
    for (idx, c) in chars {
        if escaped {
            match c {
                'n' => out.push('\n'),
                't' => out.push('\t'),
                'r' => out.push('\r'),
                '0' => out.push('\0'),
                '\\' | '\'' | '"' => out.push(c),
                other => {
                    // Unknown escapes are kept verbatim
                    out.push('\\');
                    out.push(other);
                }
            }
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == quote {
            return Ok((&input[idx + c.len_utf8()..], out));
        } else if c == '\n' {
            return Err(reject(input));
        } else {
            out.push(c);
        }
    }

    // Unterminated
    Err(reject(input))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(v: &str) -> Literal {
        Literal::str(v)
    }

    #[test]
    fn test_parse_scalars() {
        assert_eq!(parse_literal(r#""Sheet1""#).unwrap(), s("Sheet1"));
        assert_eq!(parse_literal("'single'").unwrap(), s("single"));
        assert_eq!(parse_literal("42").unwrap(), Literal::Int(42));
        assert_eq!(parse_literal("-7").unwrap(), Literal::Int(-7));
        assert_eq!(parse_literal("1.5").unwrap(), Literal::Float(1.5));
        assert_eq!(parse_literal("2e3").unwrap(), Literal::Float(2000.0));
        assert_eq!(parse_literal(".5").unwrap(), Literal::Float(0.5));
        assert_eq!(parse_literal("True").unwrap(), Literal::Bool(true));
        assert_eq!(parse_literal("false").unwrap(), Literal::Bool(false));
    }

    #[test]
    fn test_parse_string_escapes() {
        assert_eq!(parse_literal(r#""a\"b""#).unwrap(), s("a\"b"));
        assert_eq!(parse_literal(r"'it\'s'").unwrap(), s("it's"));
        assert_eq!(parse_literal(r#""tab\there""#).unwrap(), s("tab\there"));
        assert_eq!(parse_literal(r#""keep\d""#).unwrap(), s("keep\\d"));
    }

    #[test]
    fn test_parse_list() {
        assert_eq!(
            parse_literal(r#"["column1", "column2"]"#).unwrap(),
            Literal::List(vec![s("column1"), s("column2")])
        );
        assert_eq!(parse_literal("[]").unwrap(), Literal::List(vec![]));
        assert_eq!(parse_literal("[ ]").unwrap(), Literal::List(vec![]));
        assert_eq!(
            parse_literal("[0, 7,]").unwrap(),
            Literal::List(vec![Literal::Int(0), Literal::Int(7)])
        );
    }

    #[test]
    fn test_parse_bare_tuple() {
        let result = parse_literal(r#""Sheet",["col"]"#).unwrap();
        assert_eq!(
            result,
            Literal::Tuple(vec![s("Sheet"), Literal::List(vec![s("col")])])
        );

        // A trailing comma makes a one-element tuple
        assert_eq!(
            parse_literal(r#""Sheet","#).unwrap(),
            Literal::Tuple(vec![s("Sheet")])
        );
    }

    #[test]
    fn test_parse_parenthesized() {
        assert_eq!(parse_literal("(1)").unwrap(), Literal::Int(1));
        assert_eq!(
            parse_literal("(1,)").unwrap(),
            Literal::Tuple(vec![Literal::Int(1)])
        );
        assert_eq!(parse_literal("()").unwrap(), Literal::Tuple(vec![]));
        assert_eq!(
            parse_literal("(1, 2)").unwrap(),
            Literal::Tuple(vec![Literal::Int(1), Literal::Int(2)])
        );
    }

    #[test]
    fn test_parse_dict() {
        let result = parse_literal(r#"{"parse_cols": "A:B", "nrows": 3}"#).unwrap();
        assert_eq!(
            result,
            Literal::Dict(vec![
                (s("parse_cols"), s("A:B")),
                (s("nrows"), Literal::Int(3)),
            ])
        );
        assert_eq!(parse_literal("{}").unwrap(), Literal::Dict(vec![]));
    }

    #[test]
    fn test_parse_nested() {
        let result = parse_literal(r#""", [], [0, 7], {"header": 1}"#).unwrap();
        match result {
            Literal::Tuple(items) => {
                assert_eq!(items.len(), 4);
                assert!(items[3].is_dict());
            }
            other => panic!("Expected tuple, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_rejects_non_literals() {
        assert!(parse_literal("column1").is_err());
        assert!(parse_literal("__import__('os')").is_err());
        assert!(parse_literal("1 + 2").is_err());
        assert!(parse_literal("None").is_err());
        assert!(parse_literal("{1, 2}").is_err());
        assert!(parse_literal("Truex").is_err());
    }

    #[test]
    fn test_nesting_limit() {
        let deep = "[".repeat(10_000) + &"]".repeat(10_000);
        assert!(matches!(parse_literal(&deep), Err(SelectorError::Syntax(_))));

        let unbalanced = "(".repeat(10_000);
        assert!(matches!(parse_literal(&unbalanced), Err(SelectorError::Syntax(_))));

        let limit = "[".repeat(MAX_NESTING) + &"]".repeat(MAX_NESTING);
        assert!(parse_literal(&limit).is_ok());

        // Brackets inside strings do not count
        let quoted = format!("[\"{}\"]", "[".repeat(1_000));
        assert_eq!(
            parse_literal(&quoted).unwrap(),
            Literal::List(vec![s(&"[".repeat(1_000))])
        );
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(parse_literal(r#"["a""#).is_err());
        assert!(parse_literal(r#""unterminated"#).is_err());
        assert!(parse_literal("[,]").is_err());
        assert!(parse_literal(",").is_err());
        assert!(parse_literal("[1 2]").is_err());
        assert!(parse_literal("{'a' 1}").is_err());
        assert_eq!(parse_literal("   "), Err(SelectorError::UnexpectedEnd));
    }
}
