//! Numeric tolerance and literal evaluation
//!
//! All "is this value effectively X" checks in the engine go through the
//! magnitude-scaled tolerance defined here. The constant-folding evaluator
//! lets identity rules see through expressions like `(2 - 1)`.

use crate::ast::{BinOp, Expr, ExprKind, UnaryOp};

/// Symmetric bound for "value ≈ expected" checks, scaled by magnitude
pub fn tolerance(expected: f64) -> f64 {
    f64::EPSILON * expected.abs().max(1.0) * 4.0
}

/// Compare a value to an expected target within [`tolerance`]
pub fn approx_eq(value: f64, expected: f64) -> bool {
    (value - expected).abs() <= tolerance(expected)
}

/// Parse the raw text of a literal to a number
///
/// Supports decimal and GML hex forms (`0x1F`, `$1F`). Returns `None` on
/// malformed input instead of failing.
pub fn parse_literal(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    if let Some(hex) = raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")) {
        return u64::from_str_radix(hex, 16).ok().map(|v| v as f64);
    }
    if let Some(hex) = raw.strip_prefix('$') {
        return u64::from_str_radix(hex, 16).ok().map(|v| v as f64);
    }
    raw.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Constant-fold an expression
///
/// Handles literals, parentheses, unary sign, and `+ - * /`. Returns `None`
/// on any non-constant leaf (identifiers included — `pi` is recognized
/// separately where it matters) and on division by an approximately-zero
/// divisor.
pub fn evaluate(expr: &Expr) -> Option<f64> {
    match &expr.kind {
        ExprKind::Literal(raw) => parse_literal(raw),
        ExprKind::Paren(inner) => evaluate(inner),
        ExprKind::Unary { op, operand } => match op {
            UnaryOp::Neg => evaluate(operand).map(|v| -v),
            UnaryOp::Plus => evaluate(operand),
            UnaryOp::Not => None,
        },
        ExprKind::Binary { op, left, right } => {
            let l = evaluate(left)?;
            let r = evaluate(right)?;
            match op {
                BinOp::Add => Some(l + r),
                BinOp::Sub => Some(l - r),
                BinOp::Mul => Some(l * r),
                BinOp::Div => {
                    if approx_eq(r, 0.0) {
                        None
                    } else {
                        Some(l / r)
                    }
                }
                BinOp::Mod => None,
            }
        }
        _ => None,
    }
}

/// Check whether an expression constant-folds to approximately `target`
pub fn folds_to(expr: &Expr, target: f64) -> bool {
    evaluate(expr).is_some_and(|v| approx_eq(v, target))
}

/// Render a numeric value as minimal literal text
pub(crate) fn format_number(value: f64) -> String {
    if value == 0.0 {
        // Normalizes -0.0
        "0".to_string()
    } else if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_literal() {
        assert_eq!(parse_literal("180"), Some(180.0));
        assert_eq!(parse_literal("0.5"), Some(0.5));
        assert_eq!(parse_literal("0x10"), Some(16.0));
        assert_eq!(parse_literal("$FF"), Some(255.0));
        assert_eq!(parse_literal("abc"), None);
        assert_eq!(parse_literal(""), None);
    }

    #[test]
    fn test_tolerance_scales_with_magnitude() {
        assert!(tolerance(1e6) > tolerance(1.0));
        // Small targets keep the floor of max(1, |expected|)
        assert_eq!(tolerance(0.0), tolerance(0.5));
    }

    #[test]
    fn test_approx_eq() {
        assert!(approx_eq(1.0, 1.0));
        assert!(approx_eq(0.1 + 0.2, 0.3));
        assert!(!approx_eq(1.0001, 1.0));
    }

    #[test]
    fn test_evaluate_folds_constants() {
        // (2 - 1) * 3
        let expr = Expr::binary(
            BinOp::Mul,
            Expr::paren(Expr::binary(
                BinOp::Sub,
                Expr::literal("2"),
                Expr::literal("1"),
            )),
            Expr::literal("3"),
        );
        assert_eq!(evaluate(&expr), Some(3.0));
    }

    #[test]
    fn test_evaluate_rejects_symbols_and_zero_division() {
        let sym = Expr::binary(BinOp::Add, Expr::identifier("x"), Expr::literal("1"));
        assert_eq!(evaluate(&sym), None);

        let div = Expr::binary(BinOp::Div, Expr::literal("1"), Expr::literal("0"));
        assert_eq!(evaluate(&div), None);

        // pi is not a constant for the evaluator
        assert_eq!(evaluate(&Expr::identifier("pi")), None);
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(3.0), "3");
        assert_eq!(format_number(0.5), "0.5");
        assert_eq!(format_number(-2.0), "-2");
        assert_eq!(format_number(-0.0), "0");
    }
}
