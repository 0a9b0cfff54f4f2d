//! Arithmetic identity and constant-folding rules

use crate::ast::{BinOp, Expr, ExprKind, UnaryOp};
use crate::chain::{collect_multiplicative, rebuild_multiplicative, Factor};
use crate::comments::comment_between;
use crate::equivalence::approx;
use crate::normalize::rules::rule;
use crate::numeric::{approx_eq, evaluate, folds_to, parse_literal};

rule!(MulZeroRule, "mul_zero", |expr: &Expr, ctx: &NormalizeContext| {
    if let ExprKind::Binary {
        op: BinOp::Mul,
        left,
        right,
    } = &expr.kind
        && !comment_between(ctx.source, left, right)
    {
        // Dropping the other operand erases any side effects it had, so
        // only operands known to be effect-free qualify.
        if folds_to(left, 0.0) && right.is_safe_operand() {
            return Some(Expr::literal("0"));
        }
        if folds_to(right, 0.0) && left.is_safe_operand() {
            return Some(Expr::literal("0"));
        }
    }
    None
});

rule!(MulOneRule, "mul_one", |expr: &Expr, ctx: &NormalizeContext| {
    if let ExprKind::Binary {
        op: BinOp::Mul,
        left,
        right,
    } = &expr.kind
        && !comment_between(ctx.source, left, right)
    {
        if folds_to(left, 1.0) {
            return Some(right.as_ref().clone().marked_identity());
        }
        if folds_to(right, 1.0) {
            return Some(left.as_ref().clone().marked_identity());
        }
    }
    None
});

rule!(DivOneRule, "div_one", |expr: &Expr, ctx: &NormalizeContext| {
    if let ExprKind::Binary {
        op: BinOp::Div,
        left,
        right,
    } = &expr.kind
        && !comment_between(ctx.source, left, right)
        && folds_to(right, 1.0)
    {
        return Some(left.as_ref().clone().marked_identity());
    }
    None
});

rule!(AddZeroRule, "add_zero", |expr: &Expr, ctx: &NormalizeContext| {
    if let ExprKind::Binary {
        op: BinOp::Add,
        left,
        right,
    } = &expr.kind
        && !comment_between(ctx.source, left, right)
    {
        if folds_to(left, 0.0) {
            return Some(right.as_ref().clone().marked_identity());
        }
        if folds_to(right, 0.0) {
            return Some(left.as_ref().clone().marked_identity());
        }
    }
    None
});

rule!(SubZeroRule, "sub_zero", |expr: &Expr, ctx: &NormalizeContext| {
    if let ExprKind::Binary {
        op: BinOp::Sub,
        left,
        right,
    } = &expr.kind
        && !comment_between(ctx.source, left, right)
        && folds_to(right, 0.0)
    {
        return Some(left.as_ref().clone().marked_identity());
    }
    None
});

// `1 - <const>` folds to a literal so downstream shape matchers see a
// plain number instead of a subtraction.
rule!(OneMinusFoldRule, "one_minus_fold", |expr: &Expr,
                                           ctx: &NormalizeContext| {
    if let ExprKind::Binary {
        op: BinOp::Sub,
        left,
        right,
    } = &expr.kind
        && !comment_between(ctx.source, left, right)
        && folds_to(left, 1.0)
        && let Some(value) = evaluate(right)
        && !approx_eq(value, 0.0)
    {
        return Some(Expr::number(1.0 - value).marked_identity());
    }
    None
});

// `(1 / x) * x` and reorderings cancel to the remaining factors. The
// reciprocal numerator must be the literal 1; the matching factor must be
// effect-free since both occurrences vanish.
rule!(ReciprocalCancelRule, "reciprocal_cancel", |expr: &Expr,
                                                  ctx: &NormalizeContext| {
    let ExprKind::Binary { op, .. } = &expr.kind else {
        return None;
    };
    if !op.is_multiplicative() {
        return None;
    }
    let factors = collect_multiplicative(expr, ctx.source)?;
    if factors.len() < 2 {
        return None;
    }
    for (i, candidate) in factors.iter().enumerate() {
        if !candidate.is_numerator() {
            continue;
        }
        let ExprKind::Binary {
            op: BinOp::Div,
            left,
            right,
        } = &candidate.unwrapped().kind
        else {
            continue;
        };
        if left.literal_raw().and_then(parse_literal) != Some(1.0) {
            continue;
        }
        for (j, other) in factors.iter().enumerate() {
            if j == i || !other.is_numerator() || !other.node.is_safe_operand() {
                continue;
            }
            if approx(right, &other.node) {
                let remaining: Vec<Factor> = factors
                    .iter()
                    .enumerate()
                    .filter(|(k, _)| *k != i && *k != j)
                    .map(|(_, factor)| factor.clone())
                    .collect();
                return Some(rebuild_multiplicative(&remaining));
            }
        }
    }
    None
});

/// Recognize coefficients that are the reciprocal of a small integer, so
/// `x * 0.006944..` can render as `x / 144`
fn unit_fraction(coefficient: f64) -> Option<f64> {
    if coefficient <= 0.0 {
        return None;
    }
    let inverse = 1.0 / coefficient;
    let rounded = inverse.round();
    if rounded >= 2.0 && rounded <= 1.0e9 && approx_eq(inverse, rounded) {
        Some(rounded)
    } else {
        None
    }
}

// Folds every numeric factor of a product chain into one leading
// coefficient. Requires at least two factors that are not +/-1 so a
// freshly condensed chain can never re-fire.
rule!(ScalarCondenseRule, "scalar_condense", |expr: &Expr,
                                              ctx: &NormalizeContext| {
    let ExprKind::Binary { op, .. } = &expr.kind else {
        return None;
    };
    if !op.is_multiplicative() {
        return None;
    }
    let factors = collect_multiplicative(expr, ctx.source)?;
    let mut coefficient = 1.0;
    let mut meaningful = 0;
    let mut symbolic: Vec<Factor> = Vec::new();
    for factor in &factors {
        match evaluate(&factor.node) {
            Some(value) => {
                if factor.is_numerator() {
                    coefficient *= value;
                } else {
                    if approx_eq(value, 0.0) {
                        return None;
                    }
                    coefficient /= value;
                }
                if !approx_eq(value.abs(), 1.0) {
                    meaningful += 1;
                }
            }
            None => symbolic.push(factor.clone()),
        }
    }
    if meaningful < 2 || !coefficient.is_finite() {
        return None;
    }
    if symbolic.is_empty() {
        return Some(Expr::number(coefficient));
    }
    let remainder = rebuild_multiplicative(&symbolic);
    let condensed = if approx_eq(coefficient, 1.0) {
        remainder.marked_identity()
    } else if approx_eq(coefficient, -1.0) {
        Expr::unary(UnaryOp::Neg, remainder)
    } else if let Some(divisor) = unit_fraction(coefficient) {
        Expr::binary(BinOp::Div, remainder, Expr::number(divisor))
    } else {
        Expr::binary(BinOp::Mul, Expr::number(coefficient), remainder)
    };
    Some(condensed)
});
