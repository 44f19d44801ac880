//! Property tests for evaluation
//!
//! Sugar must behave exactly like the core forms it stands for, and
//! arithmetic on small integers must agree with Rust's.

use eva::interp::{Interpreter, Value};
use proptest::prelude::*;

fn eval(source: &str) -> Value {
    let program = eva::parse(source).expect("parse error");
    Interpreter::builder()
        .capture_output()
        .build()
        .eval_global(&program)
        .expect("evaluation failed")
}

// ============================================================================
// Strategies
// ============================================================================

/// Integers that stay exact as f64 through a few operations
fn small_int() -> impl Strategy<Value = i64> {
    -10_000i64..10_000i64
}

fn non_zero_int() -> impl Strategy<Value = i64> {
    small_int().prop_filter("Must be non-zero", |x| *x != 0)
}

/// Loop bounds small enough to keep each case fast
fn loop_bound() -> impl Strategy<Value = i64> {
    0i64..40i64
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn add_matches_rust(a in small_int(), b in small_int()) {
        prop_assert_eq!(eval(&format!("(+ {} {})", a, b)), Value::Number((a + b) as f64));
    }

    #[test]
    fn add_commutative(a in small_int(), b in small_int()) {
        prop_assert_eq!(
            eval(&format!("(+ {} {})", a, b)),
            eval(&format!("(+ {} {})", b, a))
        );
    }

    #[test]
    fn mul_sub_match_rust(a in small_int(), b in small_int()) {
        prop_assert_eq!(eval(&format!("(* {} {})", a, b)), Value::Number((a * b) as f64));
        prop_assert_eq!(eval(&format!("(- {} {})", a, b)), Value::Number((a - b) as f64));
    }

    #[test]
    fn div_matches_rust(a in small_int(), b in non_zero_int()) {
        prop_assert_eq!(
            eval(&format!("(/ {} {})", a, b)),
            Value::Number(a as f64 / b as f64)
        );
    }

    #[test]
    fn comparison_matches_rust(a in small_int(), b in small_int()) {
        prop_assert_eq!(eval(&format!("(< {} {})", a, b)), Value::Bool(a < b));
        prop_assert_eq!(eval(&format!("(>= {} {})", a, b)), Value::Bool(a >= b));
    }

    #[test]
    fn for_matches_hand_expanded_while(
        start in loop_bound(),
        end in loop_bound(),
        step in 1i64..5
    ) {
        let sugared = format!(
            "(var sum 0) (for (var i {start}) (< i {end}) (+= i {step}) (set sum (+ sum i))) sum"
        );
        let core = format!(
            "(var sum 0) \
             (begin (var i {start}) \
                 (while (< i {end}) (begin (set sum (+ sum i)) (set i (+ i {step}))))) \
             sum"
        );
        let expected: i64 = (start..end).step_by(step as usize).sum();

        prop_assert_eq!(eval(&sugared), eval(&core));
        prop_assert_eq!(eval(&sugared), Value::Number(expected as f64));
    }

    #[test]
    fn switch_picks_first_true_clause(x in small_int()) {
        let source = format!(
            r#"(var x {x}) (switch ((< x 0) "negative") ((= x 0) "zero") (else "positive"))"#
        );
        let expected = if x < 0 { "negative" } else if x == 0 { "zero" } else { "positive" };
        prop_assert_eq!(eval(&source), Value::from(expected));
    }

    #[test]
    fn recursion_agrees_with_loop(n in 1i64..30) {
        let recursive = format!(
            "(def sum_to (n) (if (= n 0) 0 (+ n (sum_to (- n 1))))) (sum_to {n})"
        );
        let iterative = format!(
            "(var total 0) (for (var i 1) (<= i {n}) (++ i) (+= total i)) total"
        );
        prop_assert_eq!(eval(&recursive), eval(&iterative));
    }
}
