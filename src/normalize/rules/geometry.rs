//! Trigonometric and vector-geometry idioms
//!
//! Covers the lengthdir family, dot products, point distance/direction,
//! and the half-difference product shared with the statement merger.

use crate::ast::{BinOp, Expr, ExprKind, UnaryOp};
use crate::chain::collect_additive;
use crate::comments::comment_between;
use crate::equivalence::{approx, exact};
use crate::normalize::rules::rule;
use crate::numeric::folds_to;

#[derive(Clone, Copy, Debug, PartialEq)]
enum TrigAxis {
    X,
    Y,
}

impl TrigAxis {
    fn lengthdir(self) -> &'static str {
        match self {
            TrigAxis::X => "lengthdir_x",
            TrigAxis::Y => "lengthdir_y",
        }
    }
}

/// A degree-argument trig call: `dcos(a)`, `dsin(a)`, or the radian
/// variants wrapped around `degtorad(a)`
fn trig_angle(expr: &Expr) -> Option<(TrigAxis, &Expr)> {
    let ExprKind::Call { name, args } = &expr.kind else {
        return None;
    };
    if args.len() != 1 {
        return None;
    }
    match name.as_str() {
        "dcos" => Some((TrigAxis::X, &args[0])),
        "dsin" => Some((TrigAxis::Y, &args[0])),
        "cos" | "sin" => {
            let ExprKind::Call {
                name: inner_name,
                args: inner_args,
            } = &args[0].unwrapped().kind
            else {
                return None;
            };
            if inner_name != "degtorad" || inner_args.len() != 1 {
                return None;
            }
            let axis = if name == "cos" { TrigAxis::X } else { TrigAxis::Y };
            Some((axis, &inner_args[0]))
        }
        _ => None,
    }
}

/// Peel parentheses and unary signs, tracking net negation
pub(crate) fn extract_sign(expr: &Expr) -> (bool, &Expr) {
    let mut negated = false;
    let mut current = expr;
    loop {
        match &current.kind {
            ExprKind::Paren(inner) => current = inner,
            ExprKind::Unary {
                op: UnaryOp::Neg,
                operand,
            } => {
                negated = !negated;
                current = operand;
            }
            ExprKind::Unary {
                op: UnaryOp::Plus,
                operand,
            } => current = operand,
            _ => return (negated, current),
        }
    }
}

// `len * dcos(a)` is lengthdir_x(len, a); a net-negated `len * dsin(a)`
// is lengthdir_y(len, a). The GML y axis points down, so an un-negated
// sine product is left alone rather than guessed at.
rule!(LengthdirRule, "lengthdir", |expr: &Expr, ctx: &NormalizeContext| {
    if let ExprKind::Binary {
        op: BinOp::Mul,
        left,
        right,
    } = &expr.kind
        && !comment_between(ctx.source, left, right)
    {
        let (left_negated, left_core) = extract_sign(left);
        let (right_negated, right_core) = extract_sign(right);
        let negated = left_negated ^ right_negated;
        for (trig, len) in [(left_core, right_core), (right_core, left_core)] {
            let Some((axis, angle)) = trig_angle(trig) else {
                continue;
            };
            return match (axis, negated) {
                (TrigAxis::X, false) | (TrigAxis::Y, true) => Some(Expr::call(
                    axis.lengthdir(),
                    vec![len.clone(), angle.clone()],
                )),
                _ => None,
            };
        }
    }
    None
});

// 2-3 positive product terms summed component-wise form a dot product.
// Terms that are squares belong to the sqr family and disqualify.
rule!(DotProductRule, "dot_product", |expr: &Expr, ctx: &NormalizeContext| {
    if !matches!(
        &expr.kind,
        ExprKind::Binary {
            op: BinOp::Add,
            ..
        }
    ) {
        return None;
    }
    let addends = collect_additive(expr, ctx.source)?;
    if addends.len() < 2 || addends.len() > 3 || addends.iter().any(|addend| addend.negated) {
        return None;
    }
    let mut firsts = Vec::new();
    let mut seconds = Vec::new();
    for addend in &addends {
        let ExprKind::Binary {
            op: BinOp::Mul,
            left,
            right,
        } = &addend.unwrapped().kind
        else {
            return None;
        };
        if comment_between(ctx.source, left, right) || approx(left, right) {
            return None;
        }
        firsts.push(left.as_ref().clone());
        seconds.push(right.as_ref().clone());
    }
    let builtin = if addends.len() == 2 {
        "dot_product"
    } else {
        "dot_product_3d"
    };
    Some(Expr::call(
        builtin,
        firsts.into_iter().chain(seconds).collect(),
    ))
});

/// Match one squared coordinate difference: `(b - a) * (b - a)`,
/// `sqr(b - a)`, or `power(b - a, 2)`. Returns `(origin, target)`.
fn squared_difference<'a>(
    term: &'a Expr,
    source: &str,
) -> Option<(&'a Expr, &'a Expr)> {
    let difference = match &term.unwrapped().kind {
        ExprKind::Binary {
            op: BinOp::Mul,
            left,
            right,
        } => {
            if comment_between(source, left, right) || !approx(left, right) {
                return None;
            }
            left.as_ref()
        }
        ExprKind::Call { name, args } if name == "sqr" && args.len() == 1 => &args[0],
        ExprKind::Call { name, args }
            if name == "power" && args.len() == 2 && folds_to(&args[1], 2.0) =>
        {
            &args[0]
        }
        _ => return None,
    };
    if let ExprKind::Binary {
        op: BinOp::Sub,
        left,
        right,
    } = &difference.unwrapped().kind
    {
        Some((right.as_ref(), left.as_ref()))
    } else {
        None
    }
}

rule!(PointDistanceRule, "point_distance", |expr: &Expr,
                                            ctx: &NormalizeContext| {
    if let ExprKind::Call { name, args } = &expr.kind
        && name == "sqrt"
        && args.len() == 1
    {
        let addends = collect_additive(args[0].unwrapped(), ctx.source)?;
        if addends.len() < 2 || addends.len() > 3 || addends.iter().any(|addend| addend.negated) {
            return None;
        }
        let mut origins = Vec::new();
        let mut targets = Vec::new();
        for addend in &addends {
            let (origin, target) = squared_difference(&addend.node, ctx.source)?;
            origins.push(origin.clone());
            targets.push(target.clone());
        }
        let builtin = if addends.len() == 2 {
            "point_distance"
        } else {
            "point_distance_3d"
        };
        return Some(Expr::call(
            builtin,
            origins.into_iter().chain(targets).collect(),
        ));
    }
    None
});

// darctan2(y1 - y2, x2 - x1) is point_direction(x1, y1, x2, y2). Only the
// degree-valued arctangent maps soundly; atan2 variants return radians.
rule!(PointDirectionRule, "point_direction", |expr: &Expr,
                                              ctx: &NormalizeContext| {
    if let ExprKind::Call { name, args } = &expr.kind
        && name == "darctan2"
        && args.len() == 2
        && let ExprKind::Binary {
            op: BinOp::Sub,
            left: y1,
            right: y2,
        } = &args[0].unwrapped().kind
        && let ExprKind::Binary {
            op: BinOp::Sub,
            left: x2,
            right: x1,
        } = &args[1].unwrapped().kind
        && !comment_between(ctx.source, y1, y2)
        && !comment_between(ctx.source, x2, x1)
    {
        return Some(Expr::call(
            "point_direction",
            vec![
                x1.as_ref().clone(),
                y1.as_ref().clone(),
                x2.as_ref().clone(),
                y2.as_ref().clone(),
            ],
        ));
    }
    None
});

/// If `expr` is half of something, return that something: `x / 2`,
/// `x * 0.5`, `0.5 * x`, or the difference spellings `x - x / 2` and
/// `x - x * 0.5`
pub(crate) fn half_base(expr: &Expr) -> Option<&Expr> {
    match &expr.unwrapped().kind {
        ExprKind::Binary {
            op: BinOp::Div,
            left,
            right,
        } if folds_to(right, 2.0) => Some(left.as_ref()),
        ExprKind::Binary {
            op: BinOp::Mul,
            left,
            right,
        } => {
            if folds_to(right, 0.5) {
                Some(left.as_ref())
            } else if folds_to(left, 0.5) {
                Some(right.as_ref())
            } else {
                None
            }
        }
        ExprKind::Binary {
            op: BinOp::Sub,
            left,
            right,
        } => {
            let base = half_base(right)?;
            if approx(left, base) { Some(left.as_ref()) } else { None }
        }
        _ => None,
    }
}

pub(crate) fn is_lengthdir_name(name: &str) -> bool {
    name == "lengthdir_x" || name == "lengthdir_y"
}

/// Canonical folded form `base * 0.5 * (1 - lengthdir_*(1, angle))`
pub(crate) fn half_difference_product(base: &Expr, builtin: &str, angle: &Expr) -> Expr {
    Expr::binary(
        BinOp::Mul,
        Expr::binary(BinOp::Mul, base.clone(), Expr::literal("0.5")),
        Expr::paren(Expr::binary(
            BinOp::Sub,
            Expr::literal("1"),
            Expr::call(builtin, vec![Expr::literal("1"), angle.clone()]),
        )),
    )
}

/// Recognize the folded form produced by [`half_difference_product`],
/// yielding the base, builtin name, and angle
pub(crate) fn match_half_difference_folded(expr: &Expr) -> Option<(&Expr, &str, &Expr)> {
    if let ExprKind::Binary {
        op: BinOp::Mul,
        left,
        right,
    } = &expr.unwrapped().kind
        && let ExprKind::Binary {
            op: BinOp::Sub,
            left: one,
            right: call,
        } = &right.unwrapped().kind
        && folds_to(one, 1.0)
        && let ExprKind::Call { name, args } = &call.unwrapped().kind
        && is_lengthdir_name(name)
        && args.len() == 2
        && folds_to(&args[0], 1.0)
    {
        let base = half_base(left)?;
        return Some((base, name.as_str(), &args[1]));
    }
    None
}

// `<half of a> - lengthdir_*(<half of a>, angle)` factors into the
// canonical half-difference product.
rule!(HalfDifferenceRule, "lengthdir_half_difference", |expr: &Expr,
                                                        ctx: &NormalizeContext| {
    if let ExprKind::Binary {
        op: BinOp::Sub,
        left,
        right,
    } = &expr.kind
        && !comment_between(ctx.source, left, right)
        && let ExprKind::Call { name, args } = &right.unwrapped().kind
        && is_lengthdir_name(name)
        && args.len() == 2
    {
        let outer = half_base(left)?;
        let inner = half_base(&args[0])?;
        if exact(outer, inner) || approx(outer, inner) {
            return Some(half_difference_product(outer, name, &args[1]));
        }
    }
    None
});

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn expr_of(source: &str) -> Expr {
        let script = parse(source).unwrap();
        match script.stmts.into_iter().next().map(|s| s.kind) {
            Some(crate::ast::StmtKind::Expr(e)) => e,
            other => panic!("expected expression statement, got {other:?}"),
        }
    }

    #[test]
    fn trig_angle_spots_degree_calls() {
        let e = expr_of("dcos(a)");
        let (axis, angle) = trig_angle(&e).unwrap();
        assert_eq!(axis, TrigAxis::X);
        assert_eq!(angle.identifier_name(), Some("a"));

        let e = expr_of("sin(degtorad(a))");
        let (axis, angle) = trig_angle(&e).unwrap();
        assert_eq!(axis, TrigAxis::Y);
        assert_eq!(angle.identifier_name(), Some("a"));

        assert!(trig_angle(&expr_of("cos(a)")).is_none());
    }

    #[test]
    fn extract_sign_counts_negations() {
        let e = expr_of("-(-(x))");
        let (negated, core) = extract_sign(&e);
        assert!(!negated);
        assert_eq!(core.identifier_name(), Some("x"));

        let e = expr_of("-+x");
        let (negated, core) = extract_sign(&e);
        assert!(negated);
        assert_eq!(core.identifier_name(), Some("x"));
    }

    #[test]
    fn half_base_forms() {
        assert_eq!(half_base(&expr_of("a / 2")).unwrap().identifier_name(), Some("a"));
        assert_eq!(half_base(&expr_of("a * 0.5")).unwrap().identifier_name(), Some("a"));
        assert_eq!(half_base(&expr_of("0.5 * a")).unwrap().identifier_name(), Some("a"));
        assert_eq!(
            half_base(&expr_of("a - a / 2")).unwrap().identifier_name(),
            Some("a")
        );
        assert!(half_base(&expr_of("a / 3")).is_none());
        assert!(half_base(&expr_of("a - b / 2")).is_none());
    }

    #[test]
    fn folded_half_difference_round_trips() {
        let base = expr_of("a");
        let angle = expr_of("ang");
        let folded = half_difference_product(&base, "lengthdir_x", &angle);
        let (b, name, ang) = match_half_difference_folded(&folded).unwrap();
        assert_eq!(b.identifier_name(), Some("a"));
        assert_eq!(name, "lengthdir_x");
        assert_eq!(ang.identifier_name(), Some("ang"));
    }

    #[test]
    fn squared_difference_spellings() {
        let src = "(x2 - x1) * (x2 - x1)";
        let e = expr_of(src);
        let (origin, target) = squared_difference(&e, src).unwrap();
        assert_eq!(origin.identifier_name(), Some("x1"));
        assert_eq!(target.identifier_name(), Some("x2"));

        let e = expr_of("sqr(b - a)");
        let (origin, target) = squared_difference(&e, "sqr(b - a)").unwrap();
        assert_eq!(origin.identifier_name(), Some("a"));
        assert_eq!(target.identifier_name(), Some("b"));

        assert!(squared_difference(&expr_of("(a - b) * (a - c)"), "").is_none());
    }
}
