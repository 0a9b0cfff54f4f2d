//! Compound-assignment folding

use crate::ast::{AssignOp, Expr, ExprKind};
use crate::comments::comment_between;
use crate::equivalence::exact;
use crate::normalize::rules::rule;

// `x = x + e` folds to `x += e` (likewise -, *, /). The target must be
// effect-free since one of its two occurrences disappears; for
// commutative operators the target may sit on either side.
rule!(CompoundFromSelfRule, "compound_from_self", |expr: &Expr,
                                                   ctx: &NormalizeContext| {
    if let ExprKind::Assignment {
        op: AssignOp::Assign,
        target,
        value,
    } = &expr.kind
        && target.is_safe_operand()
        && !comment_between(ctx.source, target, value)
        && let ExprKind::Binary { op, left, right } = &value.unwrapped().kind
        && !comment_between(ctx.source, left, right)
        && let Some(compound) = AssignOp::from_bin(*op)
    {
        if exact(left, target) {
            return Some(Expr::assignment(
                compound,
                target.as_ref().clone(),
                right.as_ref().clone(),
            ));
        }
        if op.is_commutative() && exact(right, target) {
            return Some(Expr::assignment(
                compound,
                target.as_ref().clone(),
                left.as_ref().clone(),
            ));
        }
    }
    None
});
