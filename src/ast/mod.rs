//! Abstract Syntax Tree for Eva
//!
//! Programs are nested lists of atoms. The first element of a list names the
//! form; everything else is an operand.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A parsed expression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value")]
pub enum Expr {
    /// Numeric literal
    Number(f64),
    /// String literal, stored without the surrounding quotes
    Str(String),
    /// Identifier or operator name
    Symbol(String),
    /// Parenthesised list
    List(Vec<Expr>),
}

impl Expr {
    pub fn symbol(name: impl Into<String>) -> Self {
        Expr::Symbol(name.into())
    }

    pub fn list(items: impl IntoIterator<Item = Expr>) -> Self {
        Expr::List(items.into_iter().collect())
    }

    /// Build a list whose head is the symbol `head`
    pub fn form(head: &str, rest: impl IntoIterator<Item = Expr>) -> Self {
        let mut items = vec![Expr::symbol(head)];
        items.extend(rest);
        Expr::List(items)
    }

    /// Wrap a statement sequence in `(begin ...)`
    pub fn block(body: impl IntoIterator<Item = Expr>) -> Self {
        Expr::form("begin", body)
    }

    pub fn as_symbol(&self) -> Option<&str> {
        match self {
            Expr::Symbol(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Expr]> {
        match self {
            Expr::List(items) => Some(items),
            _ => None,
        }
    }

    /// The head symbol of a list, if any
    pub fn head(&self) -> Option<&str> {
        self.as_list()
            .and_then(|items| items.first())
            .and_then(Expr::as_symbol)
    }

    pub fn is_atom(&self) -> bool {
        !matches!(self, Expr::List(_))
    }
}

/// Format a number the way Eva prints it: integral values without a fraction
pub fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Number(n) => write!(f, "{}", format_number(*n)),
            Expr::Str(s) => write!(f, "\"{}\"", escape(s)),
            Expr::Symbol(s) => write!(f, "{}", s),
            Expr::List(items) => {
                write!(f, "(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, ")")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_round_trips_text() {
        let e = Expr::form(
            "var",
            [
                Expr::symbol("greeting"),
                Expr::Str("say \"hi\"".to_string()),
            ],
        );
        assert_eq!(e.to_string(), r#"(var greeting "say \"hi\"")"#);
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(10.0), "10");
        assert_eq!(format_number(2.5), "2.5");
        assert_eq!(format_number(-3.0), "-3");
    }

    #[test]
    fn test_head() {
        let e = Expr::block([Expr::Number(1.0)]);
        assert_eq!(e.head(), Some("begin"));
        assert_eq!(Expr::Number(1.0).head(), None);
    }
}
