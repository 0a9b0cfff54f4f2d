//! Power, root, logarithm, and averaging rules

use crate::ast::{BinOp, Expr, ExprKind};
use crate::chain::{collect_multiplicative, rebuild_multiplicative, Factor, FactorSide};
use crate::comments::comment_between;
use crate::equivalence::approx;
use crate::normalize::rules::rule;
use crate::numeric::{evaluate, folds_to};

// Repeated equivalent factors become sqr/power calls. A chain of 2-4
// identical factors folds wholesale; otherwise the first equivalent pair
// of numerator factors folds to sqr and the rest of the chain rebuilds
// around it. Constant factors are left for scalar condensing.
rule!(RepeatedFactorRule, "repeated_factor", |expr: &Expr,
                                              ctx: &NormalizeContext| {
    let ExprKind::Binary { op, .. } = &expr.kind else {
        return None;
    };
    if !op.is_multiplicative() {
        return None;
    }
    let factors = collect_multiplicative(expr, ctx.source)?;
    if factors.len() >= 2
        && factors.len() <= 4
        && factors.iter().all(|factor| factor.is_numerator())
    {
        let base = factors[0].unwrapped();
        if base.is_safe_operand()
            && evaluate(base).is_none()
            && factors
                .iter()
                .skip(1)
                .all(|factor| approx(base, factor.unwrapped()))
        {
            let operand = base.clone();
            return Some(match factors.len() {
                2 => Expr::call("sqr", vec![operand]),
                n => Expr::call("power", vec![operand, Expr::number(n as f64)]),
            });
        }
    }
    for i in 0..factors.len() {
        if !factors[i].is_numerator() {
            continue;
        }
        let base = factors[i].unwrapped();
        if !base.is_safe_operand() || evaluate(base).is_some() {
            continue;
        }
        for j in i + 1..factors.len() {
            if !factors[j].is_numerator() || !approx(base, factors[j].unwrapped()) {
                continue;
            }
            let squared = Factor {
                node: Expr::call("sqr", vec![base.clone()]),
                side: FactorSide::Numerator,
            };
            let rebuilt: Vec<Factor> = factors
                .iter()
                .enumerate()
                .filter(|(k, _)| *k != j)
                .map(|(k, factor)| if k == i { squared.clone() } else { factor.clone() })
                .collect();
            return Some(rebuild_multiplicative(&rebuilt));
        }
    }
    None
});

rule!(MeanRule, "mean", |expr: &Expr, ctx: &NormalizeContext| {
    let ExprKind::Binary { op, left, right } = &expr.kind else {
        return None;
    };
    if comment_between(ctx.source, left, right) {
        return None;
    }
    let pair = |sum: &Expr| -> Option<(Expr, Expr)> {
        if let ExprKind::Binary {
            op: BinOp::Add,
            left: a,
            right: b,
        } = &sum.unwrapped().kind
            && !comment_between(ctx.source, a, b)
        {
            Some((a.as_ref().clone(), b.as_ref().clone()))
        } else {
            None
        }
    };
    match op {
        BinOp::Div if folds_to(right, 2.0) => {
            let (a, b) = pair(left)?;
            Some(Expr::call("mean", vec![a, b]))
        }
        BinOp::Mul => {
            for (sum, half) in [(left, right), (right, left)] {
                if folds_to(half, 0.5)
                    && let Some((a, b)) = pair(sum)
                {
                    return Some(Expr::call("mean", vec![a, b]));
                }
            }
            None
        }
        _ => None,
    }
});

// ln(a) / ln(2) is the change-of-base spelling of log2
rule!(Log2Rule, "log2", |expr: &Expr, ctx: &NormalizeContext| {
    if let ExprKind::Binary {
        op: BinOp::Div,
        left,
        right,
    } = &expr.kind
        && !comment_between(ctx.source, left, right)
        && let ExprKind::Call { name, args } = &left.unwrapped().kind
        && name == "ln"
        && args.len() == 1
        && let ExprKind::Call {
            name: divisor_name,
            args: divisor_args,
        } = &right.unwrapped().kind
        && divisor_name == "ln"
        && divisor_args.len() == 1
        && folds_to(&divisor_args[0], 2.0)
    {
        return Some(Expr::call("log2", vec![args[0].clone()]));
    }
    None
});

rule!(PowerToSqrtRule, "power_to_sqrt", |expr: &Expr,
                                         _ctx: &NormalizeContext| {
    if let ExprKind::Call { name, args } = &expr.kind
        && name == "power"
        && args.len() == 2
        && folds_to(&args[1], 0.5)
    {
        return Some(Expr::call("sqrt", vec![args[0].clone()]));
    }
    None
});

/// Tolerance for spotting a written-out Euler's number base; looser than
/// the scaled epsilon since authors round the constant themselves
const EULER_SLACK: f64 = 1.0e-9;

rule!(PowerToExpRule, "power_to_exp", |expr: &Expr,
                                       _ctx: &NormalizeContext| {
    if let ExprKind::Call { name, args } = &expr.kind
        && name == "power"
        && args.len() == 2
        && let Some(base) = evaluate(&args[0])
        && (base - std::f64::consts::E).abs() < EULER_SLACK
    {
        return Some(Expr::call("exp", vec![args[1].clone()]));
    }
    None
});
