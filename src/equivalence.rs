//! Structural equivalence of expression subtrees
//!
//! Two modes: exact (identical operators, names, and literal values) and
//! approximate (literal values compared within tolerance, plus
//! commutative-insensitive recursion on the same operator). Both modes treat
//! parenthesization as transparent.

use crate::ast::{Expr, ExprKind};
use crate::numeric::{approx_eq, parse_literal};

/// Exact structural equivalence
pub fn exact(a: &Expr, b: &Expr) -> bool {
    equivalent(a, b, false)
}

/// Tolerance-based structural equivalence
pub fn approx(a: &Expr, b: &Expr) -> bool {
    equivalent(a, b, true)
}

fn equivalent(a: &Expr, b: &Expr, approx_mode: bool) -> bool {
    let a = a.unwrapped();
    let b = b.unwrapped();

    match (&a.kind, &b.kind) {
        (ExprKind::Literal(ra), ExprKind::Literal(rb)) => {
            match (parse_literal(ra), parse_literal(rb)) {
                (Some(va), Some(vb)) => {
                    if approx_mode {
                        approx_eq(va, vb)
                    } else {
                        va == vb
                    }
                }
                // Unparseable literals fall back to raw text comparison
                _ => ra == rb,
            }
        }
        (ExprKind::Identifier(na), ExprKind::Identifier(nb)) => na == nb,
        (
            ExprKind::Unary { op: oa, operand: a1 },
            ExprKind::Unary { op: ob, operand: b1 },
        ) => oa == ob && equivalent(a1, b1, approx_mode),
        (
            ExprKind::Binary {
                op: oa,
                left: la,
                right: ra,
            },
            ExprKind::Binary {
                op: ob,
                left: lb,
                right: rb,
            },
        ) => {
            if oa != ob {
                return false;
            }
            if equivalent(la, lb, approx_mode) && equivalent(ra, rb, approx_mode) {
                return true;
            }
            // Commutative-insensitive matching only in approximate mode
            approx_mode
                && oa.is_commutative()
                && equivalent(la, rb, approx_mode)
                && equivalent(ra, lb, approx_mode)
        }
        (
            ExprKind::Call { name: na, args: aa },
            ExprKind::Call { name: nb, args: ab },
        ) => {
            na == nb
                && aa.len() == ab.len()
                && aa
                    .iter()
                    .zip(ab.iter())
                    .all(|(x, y)| equivalent(x, y, approx_mode))
        }
        (
            ExprKind::Member {
                object: oa,
                property: pa,
            },
            ExprKind::Member {
                object: ob,
                property: pb,
            },
        ) => pa == pb && equivalent(oa, ob, approx_mode),
        (
            ExprKind::Index {
                object: oa,
                index: ia,
            },
            ExprKind::Index {
                object: ob,
                index: ib,
            },
        ) => equivalent(oa, ob, approx_mode) && equivalent(ia, ib, approx_mode),
        (
            ExprKind::Assignment {
                op: oa,
                target: ta,
                value: va,
            },
            ExprKind::Assignment {
                op: ob,
                target: tb,
                value: vb,
            },
        ) => {
            oa == ob
                && equivalent(ta, tb, approx_mode)
                && equivalent(va, vb, approx_mode)
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::BinOp;

    #[test]
    fn test_parens_transparent() {
        let plain = Expr::identifier("x");
        let wrapped = Expr::paren(Expr::identifier("x"));
        assert!(exact(&plain, &wrapped));
        assert!(approx(&plain, &wrapped));
    }

    #[test]
    fn test_literal_modes() {
        let a = Expr::literal("0.30000000000000004");
        let b = Expr::literal("0.3");
        assert!(!exact(&a, &b));
        assert!(approx(&a, &b));
    }

    #[test]
    fn test_commutative_only_in_approx() {
        let ab = Expr::binary(BinOp::Mul, Expr::identifier("a"), Expr::identifier("b"));
        let ba = Expr::binary(BinOp::Mul, Expr::identifier("b"), Expr::identifier("a"));
        assert!(!exact(&ab, &ba));
        assert!(approx(&ab, &ba));

        // Subtraction is never commutative
        let sub1 = Expr::binary(BinOp::Sub, Expr::identifier("a"), Expr::identifier("b"));
        let sub2 = Expr::binary(BinOp::Sub, Expr::identifier("b"), Expr::identifier("a"));
        assert!(!approx(&sub1, &sub2));
    }

    #[test]
    fn test_calls() {
        let a = Expr::call("sqr", vec![Expr::identifier("x")]);
        let b = Expr::call("sqr", vec![Expr::paren(Expr::identifier("x"))]);
        let c = Expr::call("sqr", vec![Expr::identifier("y")]);
        assert!(exact(&a, &b));
        assert!(!exact(&a, &c));
    }

    #[test]
    fn test_reflexive_symmetric() {
        let expr = Expr::binary(
            BinOp::Add,
            Expr::call("sqr", vec![Expr::identifier("x")]),
            Expr::literal("1"),
        );
        assert!(exact(&expr, &expr));
        let other = expr.clone();
        assert_eq!(exact(&expr, &other), exact(&other, &expr));
    }
}
