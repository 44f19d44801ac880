//! Form classification
//!
//! Maps a raw [`Expr`] onto the closed set of shapes the evaluator knows how
//! to run. Special-form keywords take precedence over user bindings of the
//! same name; any other non-empty list is a function application.

use crate::ast::Expr;
use crate::interp::RuntimeError;
use crate::transform::Sugar;

/// An expression classified by shape
#[derive(Debug, Clone, PartialEq)]
pub enum Form<'a> {
    Number(f64),
    Str(&'a str),
    Symbol(&'a str),
    Begin(&'a [Expr]),
    Var {
        name: &'a str,
        value: &'a Expr,
    },
    Set {
        target: SetTarget<'a>,
        value: &'a Expr,
    },
    If {
        condition: &'a Expr,
        consequent: &'a Expr,
        alternate: &'a Expr,
    },
    While {
        condition: &'a Expr,
        body: &'a Expr,
    },
    Sugar(Sugar<'a>),
    Lambda {
        params: Vec<&'a str>,
        body: &'a Expr,
    },
    Class {
        name: &'a str,
        parent: &'a Expr,
        body: &'a Expr,
    },
    Super {
        class: &'a str,
    },
    New {
        class: &'a Expr,
        args: &'a [Expr],
    },
    Prop {
        object: &'a Expr,
        name: &'a str,
    },
    Module {
        name: &'a str,
        body: &'a Expr,
    },
    Import {
        name: &'a str,
    },
    Apply {
        callee: &'a Expr,
        args: &'a [Expr],
    },
}

/// Left-hand side of `set`
#[derive(Debug, Clone, PartialEq)]
pub enum SetTarget<'a> {
    Name(&'a str),
    Prop { object: &'a Expr, name: &'a str },
}

impl<'a> Form<'a> {
    /// Classify `expr`.
    ///
    /// Fails with `UnimplementedForm` for the empty list and `MalformedForm`
    /// when a special-form keyword is used with the wrong shape.
    pub fn classify(expr: &'a Expr) -> Result<Form<'a>, RuntimeError> {
        let items = match expr {
            Expr::Number(n) => return Ok(Form::Number(*n)),
            Expr::Str(s) => return Ok(Form::Str(s)),
            Expr::Symbol(s) => return Ok(Form::Symbol(s)),
            Expr::List(items) => items.as_slice(),
        };

        let Some((head, rest)) = items.split_first() else {
            return Err(RuntimeError::UnimplementedForm {
                form: expr.to_string(),
            });
        };

        let Some(keyword) = head.as_symbol() else {
            return Ok(Form::Apply { callee: head, args: rest });
        };

        let malformed = |keyword: &'static str, expected: &'static str| {
            RuntimeError::MalformedForm {
                keyword,
                expected,
                form: expr.to_string(),
            }
        };

        const SET_SHAPE: &str = "(set name value) or (set (prop obj name) value)";
        const DEF_SHAPE: &str = "(def name (params...) body)";

        let form = match (keyword, rest) {
            ("begin", body) => Form::Begin(body),

            ("var", [name, value]) => Form::Var {
                name: symbol(name).ok_or_else(|| malformed("var", "(var name value)"))?,
                value,
            },
            ("var", _) => return Err(malformed("var", "(var name value)")),

            ("set", [target, value]) => Form::Set {
                target: set_target(target).ok_or_else(|| malformed("set", SET_SHAPE))?,
                value,
            },
            ("set", _) => return Err(malformed("set", SET_SHAPE)),

            ("if", [condition, consequent, alternate]) => Form::If {
                condition,
                consequent,
                alternate,
            },
            ("if", _) => return Err(malformed("if", "(if condition consequent alternate)")),

            ("while", [condition, body]) => Form::While { condition, body },
            ("while", _) => return Err(malformed("while", "(while condition body)")),

            ("def", [name, params, body]) => {
                let name = symbol(name).ok_or_else(|| malformed("def", DEF_SHAPE))?;
                param_names(params).ok_or_else(|| malformed("def", DEF_SHAPE))?;
                Form::Sugar(Sugar::Def { name, params, body })
            }
            ("def", _) => return Err(malformed("def", DEF_SHAPE)),

            ("switch", clauses) if !clauses.is_empty() => {
                let clauses = clauses
                    .iter()
                    .map(|clause| match clause.as_list() {
                        Some([condition, body]) => Some((condition, body)),
                        _ => None,
                    })
                    .collect::<Option<Vec<_>>>()
                    .ok_or_else(|| malformed("switch", "(switch (condition expr)...)"))?;
                Form::Sugar(Sugar::Switch { clauses })
            }
            ("switch", _) => return Err(malformed("switch", "(switch (condition expr)...)")),

            ("for", [init, condition, update, body]) => Form::Sugar(Sugar::For {
                init,
                condition,
                update,
                body,
            }),
            ("for", _) => return Err(malformed("for", "(for init condition update body)")),

            ("++", [target]) if set_target(target).is_some() => {
                Form::Sugar(Sugar::Increment(target))
            }
            ("++", _) => return Err(malformed("++", "(++ name)")),

            ("--", [target]) if set_target(target).is_some() => {
                Form::Sugar(Sugar::Decrement(target))
            }
            ("--", _) => return Err(malformed("--", "(-- name)")),

            ("+=", [target, delta]) if set_target(target).is_some() => {
                Form::Sugar(Sugar::AddAssign { target, delta })
            }
            ("+=", _) => return Err(malformed("+=", "(+= name delta)")),

            ("-=", [target, delta]) if set_target(target).is_some() => {
                Form::Sugar(Sugar::SubAssign { target, delta })
            }
            ("-=", _) => return Err(malformed("-=", "(-= name delta)")),

            ("lambda", [params, body]) => Form::Lambda {
                params: param_names(params)
                    .ok_or_else(|| malformed("lambda", "(lambda (params...) body)"))?,
                body,
            },
            ("lambda", _) => return Err(malformed("lambda", "(lambda (params...) body)")),

            ("class", [name, parent, body]) => Form::Class {
                name: symbol(name).ok_or_else(|| malformed("class", "(class Name Parent body)"))?,
                parent,
                body,
            },
            ("class", _) => return Err(malformed("class", "(class Name Parent body)")),

            ("super", [class]) => Form::Super {
                class: symbol(class).ok_or_else(|| malformed("super", "(super ClassName)"))?,
            },
            ("super", _) => return Err(malformed("super", "(super ClassName)")),

            ("new", [class, args @ ..]) => Form::New { class, args },
            ("new", _) => return Err(malformed("new", "(new Class args...)")),

            ("prop", [object, name]) => Form::Prop {
                object,
                name: symbol(name).ok_or_else(|| malformed("prop", "(prop object name)"))?,
            },
            ("prop", _) => return Err(malformed("prop", "(prop object name)")),

            ("module", [name, body]) => Form::Module {
                name: symbol(name).ok_or_else(|| malformed("module", "(module Name body)"))?,
                body,
            },
            ("module", _) => return Err(malformed("module", "(module Name body)")),

            ("import", [name]) => Form::Import {
                name: symbol(name).ok_or_else(|| malformed("import", "(import Name)"))?,
            },
            ("import", _) => return Err(malformed("import", "(import Name)")),

            _ => Form::Apply { callee: head, args: rest },
        };

        Ok(form)
    }
}

fn symbol(expr: &Expr) -> Option<&str> {
    expr.as_symbol()
}

fn param_names(params: &Expr) -> Option<Vec<&str>> {
    params
        .as_list()?
        .iter()
        .map(Expr::as_symbol)
        .collect::<Option<Vec<_>>>()
}

fn set_target(target: &Expr) -> Option<SetTarget<'_>> {
    match target {
        Expr::Symbol(name) => Some(SetTarget::Name(name)),
        Expr::List(items) => match items.as_slice() {
            [head, object, name] if head.as_symbol() == Some("prop") => Some(SetTarget::Prop {
                object,
                name: name.as_symbol()?,
            }),
            _ => None,
        },
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::lex;
    use crate::parser::parse_expr;

    fn read(source: &str) -> Expr {
        let tokens = lex(source).unwrap();
        parse_expr(&tokens, source).unwrap()
    }

    #[test]
    fn test_empty_list_is_unimplemented() {
        let e = read("()");
        assert!(matches!(
            Form::classify(&e),
            Err(RuntimeError::UnimplementedForm { .. })
        ));
    }

    #[test]
    fn test_set_prop_target() {
        let e = read("(set (prop self x) 1)");
        match Form::classify(&e).unwrap() {
            Form::Set {
                target: SetTarget::Prop { name, .. },
                ..
            } => assert_eq!(name, "x"),
            other => panic!("expected prop set, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_var() {
        let e = read("(var x)");
        assert!(matches!(
            Form::classify(&e),
            Err(RuntimeError::MalformedForm { keyword: "var", .. })
        ));
    }

    #[test]
    fn test_lambda_params_must_be_symbols() {
        let e = read("(lambda (x 1) x)");
        assert!(Form::classify(&e).is_err());
    }

    #[test]
    fn test_unknown_head_is_application() {
        let e = read("(square 2)");
        assert!(matches!(Form::classify(&e).unwrap(), Form::Apply { .. }));
    }

    #[test]
    fn test_list_head_is_application() {
        let e = read("((prop p calc) p)");
        assert!(matches!(Form::classify(&e).unwrap(), Form::Apply { .. }));
    }
}
