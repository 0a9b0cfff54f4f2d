//! The per-node pass cap must stop rule sets that never converge

use crate::ast::{BinOp, Expr, ExprKind};
use crate::normalize::engine::{fixpoint_with, MAX_RULE_PASSES};
use crate::normalize::rules::{rules_for, Rule};
use crate::normalize::NormalizeContext;

/// A deliberately non-converging rule: swapping operands always fires
struct SwapOperands;

impl Rule for SwapOperands {
    fn name(&self) -> &'static str {
        "swap_operands"
    }

    fn apply(&self, expr: &Expr, _ctx: &NormalizeContext<'_>) -> Option<Expr> {
        if let ExprKind::Binary { op, left, right } = &expr.kind {
            Some(Expr::binary(
                *op,
                right.as_ref().clone(),
                left.as_ref().clone(),
            ))
        } else {
            None
        }
    }
}

static OSCILLATING: &[&dyn Rule] = &[&SwapOperands];

fn select_oscillating(_expr: &Expr) -> &'static [&'static dyn Rule] {
    OSCILLATING
}

#[test]
fn test_non_converging_rules_hit_the_cap() {
    let mut expr = Expr::binary(BinOp::Add, Expr::identifier("a"), Expr::identifier("b"));
    let ctx = NormalizeContext::new("");
    let passes = fixpoint_with(&mut expr, select_oscillating, &ctx);
    assert_eq!(passes, MAX_RULE_PASSES);
    // The node is still a well-formed binary expression afterwards
    assert!(matches!(expr.kind, ExprKind::Binary { .. }));
}

#[test]
fn test_production_rules_converge_quickly() {
    let source = "x * 1";
    let mut script = crate::parse("x * 1;").unwrap();
    let Some(crate::ast::StmtKind::Expr(expr)) =
        script.stmts.first_mut().map(|s| &mut s.kind)
    else {
        panic!("expected expression statement");
    };
    let ctx = NormalizeContext::new(source);
    let passes = fixpoint_with(expr, rules_for, &ctx);
    assert_eq!(passes, 1);
    assert_eq!(expr.identifier_name(), Some("x"));
}

#[test]
fn test_chained_rules_converge() {
    // repeated-factor then condensing, still far from the cap
    let source = "2 * x * x * 3;";
    let mut script = crate::parse(source).unwrap();
    let Some(crate::ast::StmtKind::Expr(expr)) =
        script.stmts.first_mut().map(|s| &mut s.kind)
    else {
        panic!("expected expression statement");
    };
    let ctx = NormalizeContext::new(source);
    let passes = fixpoint_with(expr, rules_for, &ctx);
    assert!(passes < 10, "took {passes} passes");
    assert_eq!(expr.to_string(), "6 * sqr(x)");
}
