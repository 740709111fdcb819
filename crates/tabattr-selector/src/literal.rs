//! Literal values produced by the selector parser

use serde::{Deserialize, Serialize};
use std::fmt;

/// A literal value in a selector expression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Literal {
    /// `True` / `False` (lowercase spellings are accepted too)
    Bool(bool),

    /// A signed 64-bit integer
    Int(i64),

    /// A floating point number
    Float(f64),

    /// A single or double quoted string
    Str(String),

    /// `[a, b, ...]`
    List(Vec<Literal>),

    /// `(a, b, ...)` or a bare comma-separated sequence at the top level
    Tuple(Vec<Literal>),

    /// `{key: value, ...}`, kept in source order
    Dict(Vec<(Literal, Literal)>),
}

impl Literal {
    /// Create a string literal
    pub fn str(value: impl Into<String>) -> Self {
        Literal::Str(value.into())
    }

    /// Short name of the literal's type, used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Literal::Bool(_) => "bool",
            Literal::Int(_) => "int",
            Literal::Float(_) => "float",
            Literal::Str(_) => "str",
            Literal::List(_) => "list",
            Literal::Tuple(_) => "tuple",
            Literal::Dict(_) => "dict",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Literal::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Literal::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Elements of a list or tuple
    pub fn as_sequence(&self) -> Option<&[Literal]> {
        match self {
            Literal::List(items) | Literal::Tuple(items) => Some(items),
            _ => None,
        }
    }

    pub fn is_dict(&self) -> bool {
        matches!(self, Literal::Dict(_))
    }
}

fn write_items(f: &mut fmt::Formatter<'_>, items: &[Literal]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Bool(true) => write!(f, "True"),
            Literal::Bool(false) => write!(f, "False"),
            Literal::Int(i) => write!(f, "{}", i),
            Literal::Float(x) => write!(f, "{:?}", x),
            Literal::Str(s) => write!(f, "{:?}", s),
            Literal::List(items) => {
                write!(f, "[")?;
                write_items(f, items)?;
                write!(f, "]")
            }
            Literal::Tuple(items) => {
                write!(f, "(")?;
                write_items(f, items)?;
                if items.len() == 1 {
                    write!(f, ",")?;
                }
                write!(f, ")")
            }
            Literal::Dict(entries) => {
                write!(f, "{{")?;
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", key, value)?;
                }
                write!(f, "}}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors() {
        assert_eq!(Literal::str("a").as_str(), Some("a"));
        assert_eq!(Literal::Int(3).as_int(), Some(3));
        assert_eq!(Literal::Int(3).as_str(), None);

        let list = Literal::List(vec![Literal::Int(1), Literal::Int(2)]);
        assert_eq!(list.as_sequence().map(|s| s.len()), Some(2));
        assert!(Literal::Dict(vec![]).is_dict());
    }

    #[test]
    fn test_display() {
        let tuple = Literal::Tuple(vec![
            Literal::str("Sheet"),
            Literal::List(vec![Literal::str("col")]),
            Literal::Dict(vec![(Literal::str("nrows"), Literal::Int(2))]),
        ]);
        assert_eq!(tuple.to_string(), r#"("Sheet", ["col"], {"nrows": 2})"#);
        assert_eq!(Literal::Tuple(vec![Literal::Int(1)]).to_string(), "(1,)");
        assert_eq!(Literal::Float(1.0).to_string(), "1.0");
    }
}
