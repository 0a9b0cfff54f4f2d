//! Chain decomposition and reconstruction
//!
//! Flattens nested `*`/`/` expressions into numerator/denominator factor
//! lists and nested `+`/`-` expressions into signed addends, then rebuilds
//! left-associative trees from them. Every split point is checked by the
//! comment-safety guard; a blocked split aborts the whole decomposition.

use crate::ast::{BinOp, Expr, ExprKind, UnaryOp};
use crate::comments::comment_between;
use crate::numeric::evaluate;

/// Position of a factor in a multiplicative chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FactorSide {
    Numerator,
    Denominator,
}

/// One term of a multiplicative chain
#[derive(Debug, Clone)]
pub struct Factor {
    pub node: Expr,
    pub side: FactorSide,
}

impl Factor {
    pub fn unwrapped(&self) -> &Expr {
        self.node.unwrapped()
    }

    pub fn is_numerator(&self) -> bool {
        self.side == FactorSide::Numerator
    }
}

/// One term of an additive chain
#[derive(Debug, Clone)]
pub struct Addend {
    pub node: Expr,
    pub negated: bool,
}

impl Addend {
    pub fn unwrapped(&self) -> &Expr {
        self.node.unwrapped()
    }
}

/// Flatten a `*`/`/` expression into factors in source order
///
/// A `/` whose right operand is not constant-foldable is kept as one atomic
/// term: an unevaluable divisor must not look cancelable, and splitting it
/// would lose precedence semantics. Returns `None` when a comment blocks a
/// split point.
pub fn collect_multiplicative(expr: &Expr, source: &str) -> Option<Vec<Factor>> {
    let mut factors = Vec::new();
    if collect_mul_into(expr, source, &mut factors, false) {
        Some(factors)
    } else {
        None
    }
}

fn collect_mul_into(expr: &Expr, source: &str, out: &mut Vec<Factor>, denominator: bool) -> bool {
    match &expr.kind {
        ExprKind::Binary {
            op: BinOp::Mul,
            left,
            right,
        } => {
            if comment_between(source, left, right) {
                return false;
            }
            collect_mul_into(left, source, out, denominator)
                && collect_mul_into(right, source, out, denominator)
        }
        ExprKind::Binary {
            op: BinOp::Div,
            left,
            right,
        } if evaluate(right).is_some() => {
            if comment_between(source, left, right) {
                return false;
            }
            collect_mul_into(left, source, out, denominator)
                && collect_mul_into(right, source, out, !denominator)
        }
        _ => {
            out.push(Factor {
                node: expr.clone(),
                side: if denominator {
                    FactorSide::Denominator
                } else {
                    FactorSide::Numerator
                },
            });
            true
        }
    }
}

/// Rebuild a left-associative expression from a factor list
///
/// Zero terms reconstitute the multiplicative identity literal; a single
/// numerator term passes through unchanged.
pub fn rebuild_multiplicative(factors: &[Factor]) -> Expr {
    let numerators: Vec<&Expr> = factors
        .iter()
        .filter(|f| f.is_numerator())
        .map(|f| &f.node)
        .collect();
    let denominators: Vec<&Expr> = factors
        .iter()
        .filter(|f| !f.is_numerator())
        .map(|f| &f.node)
        .collect();

    let numerator = product_of(&numerators);
    if denominators.is_empty() {
        return numerator;
    }
    Expr::binary(BinOp::Div, numerator, product_of(&denominators))
}

fn product_of(nodes: &[&Expr]) -> Expr {
    let mut iter = nodes.iter();
    match iter.next() {
        None => Expr::literal("1"),
        Some(first) => iter.fold((*first).clone(), |acc, node| {
            Expr::binary(BinOp::Mul, acc, (*node).clone())
        }),
    }
}

/// Flatten a `+`/`-` expression into signed addends in source order
///
/// A top-level unary minus contributes a negated addend. Returns `None`
/// when a comment blocks a split point.
pub fn collect_additive(expr: &Expr, source: &str) -> Option<Vec<Addend>> {
    let mut addends = Vec::new();
    if collect_add_into(expr, source, &mut addends, false) {
        Some(addends)
    } else {
        None
    }
}

fn collect_add_into(expr: &Expr, source: &str, out: &mut Vec<Addend>, negated: bool) -> bool {
    match &expr.kind {
        ExprKind::Binary {
            op: op @ (BinOp::Add | BinOp::Sub),
            left,
            right,
        } => {
            if comment_between(source, left, right) {
                return false;
            }
            let right_negated = if *op == BinOp::Sub { !negated } else { negated };
            collect_add_into(left, source, out, negated)
                && collect_add_into(right, source, out, right_negated)
        }
        ExprKind::Unary {
            op: UnaryOp::Neg,
            operand,
        } => {
            out.push(Addend {
                node: operand.as_ref().clone(),
                negated: !negated,
            });
            true
        }
        _ => {
            out.push(Addend {
                node: expr.clone(),
                negated,
            });
            true
        }
    }
}

/// Rebuild a left-associative expression from signed addends
///
/// Zero terms reconstitute the additive identity literal; a single positive
/// term passes through unchanged.
pub fn rebuild_additive(addends: &[Addend]) -> Expr {
    let mut iter = addends.iter();
    let Some(first) = iter.next() else {
        return Expr::literal("0");
    };
    let head = if first.negated {
        Expr::unary(UnaryOp::Neg, first.node.clone())
    } else {
        first.node.clone()
    };
    iter.fold(head, |acc, addend| {
        let op = if addend.negated { BinOp::Sub } else { BinOp::Add };
        Expr::binary(op, acc, addend.node.clone())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn first_expr(source: &str) -> Expr {
        let script = parse(source).unwrap();
        match &script.stmts[0].kind {
            crate::ast::StmtKind::Expr(e) => e.clone(),
            _ => panic!("expected expression statement"),
        }
    }

    #[test]
    fn test_collect_multiplicative_sides() {
        let source = "a * b / 2 * c";
        let expr = first_expr(source);
        let factors = collect_multiplicative(&expr, source).unwrap();
        assert_eq!(factors.len(), 4);
        assert_eq!(factors[0].side, FactorSide::Numerator);
        assert_eq!(factors[1].side, FactorSide::Numerator);
        assert_eq!(factors[2].side, FactorSide::Denominator);
        assert_eq!(factors[3].side, FactorSide::Numerator);
    }

    #[test]
    fn test_unevaluable_divisor_is_atomic() {
        let source = "a / x * b";
        let expr = first_expr(source);
        let factors = collect_multiplicative(&expr, source).unwrap();
        // a / x stays one atomic numerator term
        assert_eq!(factors.len(), 2);
        assert_eq!(factors[0].node.to_string(), "a / x");
        assert_eq!(factors[1].node.to_string(), "b");
    }

    #[test]
    fn test_comment_aborts_collection() {
        let source = "a * /* note */ b";
        let expr = first_expr(source);
        assert!(collect_multiplicative(&expr, source).is_none());
    }

    #[test]
    fn test_rebuild_multiplicative_edge_cases() {
        assert_eq!(rebuild_multiplicative(&[]).to_string(), "1");

        let single = [Factor {
            node: Expr::identifier("x"),
            side: FactorSide::Numerator,
        }];
        assert_eq!(rebuild_multiplicative(&single).to_string(), "x");

        let ratio = [
            Factor {
                node: Expr::identifier("x"),
                side: FactorSide::Numerator,
            },
            Factor {
                node: Expr::literal("2"),
                side: FactorSide::Denominator,
            },
        ];
        assert_eq!(rebuild_multiplicative(&ratio).to_string(), "x / 2");
    }

    #[test]
    fn test_collect_additive_signs() {
        let source = "a - b + c - d";
        let expr = first_expr(source);
        let addends = collect_additive(&expr, source).unwrap();
        let signs: Vec<bool> = addends.iter().map(|a| a.negated).collect();
        assert_eq!(signs, vec![false, true, false, true]);
    }

    #[test]
    fn test_unary_minus_term() {
        let source = "-a + b";
        let expr = first_expr(source);
        let addends = collect_additive(&expr, source).unwrap();
        assert!(addends[0].negated);
        assert_eq!(addends[0].node.to_string(), "a");
        assert!(!addends[1].negated);
    }

    #[test]
    fn test_rebuild_additive_round_trips_signs() {
        let addends = [
            Addend {
                node: Expr::identifier("a"),
                negated: true,
            },
            Addend {
                node: Expr::identifier("b"),
                negated: false,
            },
        ];
        assert_eq!(rebuild_additive(&addends).to_string(), "-a + b");
        assert_eq!(rebuild_additive(&[]).to_string(), "0");
    }
}
