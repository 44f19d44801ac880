//! Syntactic sugar
//!
//! Each rewrite maps one sugared form to core forms and stops there. Sugar
//! nested inside the result is handled when the evaluator reaches it.

use crate::ast::Expr;

/// A validated sugared form, borrowed from the expression it came from
#[derive(Debug, Clone, PartialEq)]
pub enum Sugar<'a> {
    /// `(def name (params...) body)`
    Def {
        name: &'a str,
        params: &'a Expr,
        body: &'a Expr,
    },
    /// `(switch (cond expr)... (else expr))`, at least one clause
    Switch { clauses: Vec<(&'a Expr, &'a Expr)> },
    /// `(for init cond update body)`
    For {
        init: &'a Expr,
        condition: &'a Expr,
        update: &'a Expr,
        body: &'a Expr,
    },
    /// `(++ target)`
    Increment(&'a Expr),
    /// `(-- target)`
    Decrement(&'a Expr),
    /// `(+= target delta)`
    AddAssign { target: &'a Expr, delta: &'a Expr },
    /// `(-= target delta)`
    SubAssign { target: &'a Expr, delta: &'a Expr },
}

/// Rewrite `sugar` into core forms
pub fn desugar(sugar: &Sugar<'_>) -> Expr {
    match sugar {
        Sugar::Def { name, params, body } => def_to_var_lambda(name, params, body),
        Sugar::Switch { clauses } => switch_to_if(clauses),
        Sugar::For {
            init,
            condition,
            update,
            body,
        } => for_to_while(init, condition, update, body),
        Sugar::Increment(target) => read_modify_write(target, "+", Expr::Number(1.0)),
        Sugar::Decrement(target) => read_modify_write(target, "-", Expr::Number(1.0)),
        Sugar::AddAssign { target, delta } => read_modify_write(target, "+", (*delta).clone()),
        Sugar::SubAssign { target, delta } => read_modify_write(target, "-", (*delta).clone()),
    }
}

/// `(def name params body)` => `(var name (lambda params body))`
fn def_to_var_lambda(name: &str, params: &Expr, body: &Expr) -> Expr {
    Expr::form(
        "var",
        [
            Expr::symbol(name),
            Expr::form("lambda", [params.clone(), body.clone()]),
        ],
    )
}

/// Nested `if`s built from the last clause backwards. The last clause's
/// condition is never evaluated: its body is the final else branch.
fn switch_to_if(clauses: &[(&Expr, &Expr)]) -> Expr {
    let Some(((_, last_body), rest)) = clauses.split_last() else {
        return Expr::symbol("null");
    };

    rest.iter()
        .rev()
        .fold((*last_body).clone(), |alternate, (condition, consequent)| {
            Expr::form(
                "if",
                [(*condition).clone(), (*consequent).clone(), alternate],
            )
        })
}

/// `(for init cond update body)` => `(begin init (while cond (begin body update)))`
fn for_to_while(init: &Expr, condition: &Expr, update: &Expr, body: &Expr) -> Expr {
    Expr::block([
        init.clone(),
        Expr::form(
            "while",
            [
                condition.clone(),
                Expr::block([body.clone(), update.clone()]),
            ],
        ),
    ])
}

/// `(set target (op target operand))`
fn read_modify_write(target: &Expr, op: &str, operand: Expr) -> Expr {
    Expr::form(
        "set",
        [
            target.clone(),
            Expr::form(op, [target.clone(), operand]),
        ],
    )
}
