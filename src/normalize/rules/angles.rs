//! Degree/radian conversion recognition
//!
//! Both directions share one matcher that accepts the multiplied-factor
//! form (`a * pi / 180`, `a * (pi / 180)`, `a * 0.01745...`) and the
//! reciprocal division form (`a / 57.29...`, `a / (180 / pi)`).

use crate::ast::{BinOp, Expr, ExprKind};
use crate::comments::comment_between;
use crate::normalize::rules::rule;
use crate::normalize::NormalizeContext;
use crate::numeric::{approx_eq, evaluate, folds_to, parse_literal};

const DEG_TO_RAD: f64 = std::f64::consts::PI / 180.0;
const RAD_TO_DEG: f64 = 180.0 / std::f64::consts::PI;

#[derive(Clone, Copy, PartialEq)]
enum Conversion {
    DegToRad,
    RadToDeg,
}

impl Conversion {
    fn builtin(self) -> &'static str {
        match self {
            Conversion::DegToRad => "degtorad",
            Conversion::RadToDeg => "radtodeg",
        }
    }

    fn factor(self) -> f64 {
        match self {
            Conversion::DegToRad => DEG_TO_RAD,
            Conversion::RadToDeg => RAD_TO_DEG,
        }
    }

    fn flipped(self) -> Conversion {
        match self {
            Conversion::DegToRad => Conversion::RadToDeg,
            Conversion::RadToDeg => Conversion::DegToRad,
        }
    }
}

/// The symbol `pi` (any case) or a literal within tolerance of it
pub(crate) fn is_pi(expr: &Expr) -> bool {
    match &expr.unwrapped().kind {
        ExprKind::Identifier(name) => name.eq_ignore_ascii_case("pi"),
        ExprKind::Literal(raw) => {
            parse_literal(raw).is_some_and(|v| approx_eq(v, std::f64::consts::PI))
        }
        _ => false,
    }
}

/// A factor expression equal to the conversion constant: a bare literal
/// or the `pi / 180` (resp. `180 / pi`) ratio written out
fn is_conversion_factor(expr: &Expr, conversion: Conversion) -> bool {
    if let Some(value) = evaluate(expr) {
        return approx_eq(value, conversion.factor());
    }
    if let ExprKind::Binary {
        op: BinOp::Div,
        left,
        right,
    } = &expr.unwrapped().kind
    {
        return match conversion {
            Conversion::DegToRad => is_pi(left) && folds_to(right, 180.0),
            Conversion::RadToDeg => folds_to(left, 180.0) && is_pi(right),
        };
    }
    false
}

fn convert(conversion: Conversion, angle: &Expr) -> Option<Expr> {
    Some(Expr::call(conversion.builtin(), vec![angle.clone()]))
}

fn match_conversion(
    expr: &Expr,
    ctx: &NormalizeContext<'_>,
    conversion: Conversion,
) -> Option<Expr> {
    let ExprKind::Binary { op, left, right } = &expr.kind else {
        return None;
    };
    if comment_between(ctx.source, left, right) {
        return None;
    }
    match op {
        BinOp::Mul => {
            for (factor, angle) in [(left, right), (right, left)] {
                if is_conversion_factor(factor, conversion) {
                    return convert(conversion, angle);
                }
            }
        }
        BinOp::Div => {
            // dividing by the opposite direction's constant
            if let Some(value) = evaluate(right)
                && approx_eq(value, conversion.flipped().factor())
            {
                return convert(conversion, left);
            }
            if is_conversion_factor(right, conversion.flipped()) {
                return convert(conversion, left);
            }
            // `a * pi / 180` parses as `(a * pi) / 180`
            if conversion == Conversion::DegToRad
                && folds_to(right, 180.0)
                && let ExprKind::Binary {
                    op: BinOp::Mul,
                    left: x,
                    right: y,
                } = &left.unwrapped().kind
                && !comment_between(ctx.source, x, y)
            {
                if is_pi(y) {
                    return convert(conversion, x);
                }
                if is_pi(x) {
                    return convert(conversion, y);
                }
            }
            // `a * 180 / pi` parses as `(a * 180) / pi`
            if conversion == Conversion::RadToDeg
                && is_pi(right)
                && let ExprKind::Binary {
                    op: BinOp::Mul,
                    left: x,
                    right: y,
                } = &left.unwrapped().kind
                && !comment_between(ctx.source, x, y)
            {
                if folds_to(y, 180.0) {
                    return convert(conversion, x);
                }
                if folds_to(x, 180.0) {
                    return convert(conversion, y);
                }
            }
        }
        _ => {}
    }
    None
}

rule!(DegToRadRule, "deg_to_rad", |expr: &Expr, ctx: &NormalizeContext| {
    match_conversion(expr, ctx, Conversion::DegToRad)
});

rule!(RadToDegRule, "rad_to_deg", |expr: &Expr, ctx: &NormalizeContext| {
    match_conversion(expr, ctx, Conversion::RadToDeg)
});
