//! Parenthesis cleanup
//!
//! Identity removal can leave a replacement node parenthesized where the
//! parentheses no longer bind anything, e.g. `(x * 1)` becoming `(x)`.
//! Only nodes the rewriter itself produced (marked via `from_identity`)
//! are unwrapped, and only when the inner node is atomic enough that
//! removing the parens cannot change parsing. Operands of `mod` and of
//! logical negation keep their parentheses: precedence there is easy to
//! misread and the original grouping is left intact.

use crate::ast::{BinOp, Expr, ExprKind, Script, StmtKind, UnaryOp};

pub(crate) fn cleanup_script(script: &mut Script) {
    for stmt in &mut script.stmts {
        match &mut stmt.kind {
            StmtKind::Var(declarators) => {
                for declarator in declarators {
                    if let Some(init) = &mut declarator.init {
                        cleanup_expr(init, false);
                    }
                }
            }
            StmtKind::Expr(expr) => cleanup_expr(expr, false),
        }
    }
}

pub(crate) fn cleanup_expr(expr: &mut Expr, parens_required: bool) {
    if !parens_required {
        while let ExprKind::Paren(inner) = &expr.kind
            && inner.from_identity
            && is_replacement_safe(inner)
        {
            let ExprKind::Paren(inner) =
                std::mem::replace(&mut expr.kind, ExprKind::Literal(String::new()))
            else {
                break;
            };
            *expr = *inner;
        }
    }
    match &mut expr.kind {
        ExprKind::Binary {
            op: BinOp::Mod,
            left,
            right,
        } => {
            cleanup_expr(left, true);
            cleanup_expr(right, true);
        }
        ExprKind::Unary {
            op: UnaryOp::Not,
            operand,
        } => cleanup_expr(operand, true),
        _ => {
            for child in expr.children_mut() {
                cleanup_expr(child, false);
            }
        }
    }
}

/// Inner nodes that parse identically with or without surrounding parens
fn is_replacement_safe(expr: &Expr) -> bool {
    match &expr.kind {
        ExprKind::Identifier(_)
        | ExprKind::Literal(_)
        | ExprKind::Call { .. }
        | ExprKind::Member { .. }
        | ExprKind::Index { .. } => true,
        ExprKind::Paren(inner) => is_replacement_safe(inner),
        _ => false,
    }
}
