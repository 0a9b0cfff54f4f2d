//! Statement-level merging
//!
//! The per-expression rules cannot see across statements. This pass
//! recognizes the declare-then-shrink idiom
//!
//! ```text
//! var w = a - a / 2;
//! w = (a - a / 2) - lengthdir_x(a / 2, ang);
//! ```
//!
//! and folds both statements into one declaration of the canonical
//! half-difference product. The expression rules may already have folded
//! the reassignment's value, so both the raw subtraction and the folded
//! product are accepted.

use rustc_hash::FxHashSet;

use crate::ast::{AssignOp, Declarator, Expr, ExprKind, BinOp, Stmt, StmtKind};
use crate::comments::has_comment_in;
use crate::equivalence::{approx, exact};
use crate::error::Span;
use crate::normalize::rules::geometry::{
    half_base, half_difference_product, is_lengthdir_name, match_half_difference_folded,
};
use crate::normalize::{engine, NormalizeContext};

pub(crate) fn merge_statements(stmts: &mut Vec<Stmt>, ctx: &NormalizeContext<'_>) {
    let mut i = 0;
    while i + 1 < stmts.len() {
        let Some(folded) = match_pair(&stmts[i], &stmts[i + 1], ctx) else {
            i += 1;
            continue;
        };
        let removed = stmts.remove(i + 1);
        if ctx.options.record_original
            && let StmtKind::Var(declarators) = &stmts[i].kind
            && let Some(first) = declarators.first()
        {
            let mut original = Stmt::new(StmtKind::Var(vec![Declarator {
                span: Span::empty(),
                name: first.name.clone(),
                init: first.init.clone(),
            }]));
            original.original_form = true;
            stmts.insert(i, original);
            i += 1;
        }
        if let StmtKind::Var(declarators) = &mut stmts[i].kind
            && let Some(first) = declarators.first_mut()
        {
            let mut new_init = folded;
            engine::rewrite_expr(&mut new_init, ctx, &mut FxHashSet::default());
            first.init = Some(new_init);
        }
        // the removed statement's preceding blank line shifts to whatever
        // now follows the merged declaration
        if removed.blank_before
            && let Some(next) = stmts.get_mut(i + 1)
        {
            next.blank_before = true;
        }
        i += 1;
    }
}

fn match_pair(decl: &Stmt, reassign: &Stmt, ctx: &NormalizeContext<'_>) -> Option<Expr> {
    let StmtKind::Var(declarators) = &decl.kind else {
        return None;
    };
    let [declarator] = declarators.as_slice() else {
        return None;
    };
    let init = declarator.init.as_ref()?;
    let StmtKind::Expr(expr) = &reassign.kind else {
        return None;
    };
    let ExprKind::Assignment {
        op: AssignOp::Assign,
        target,
        value,
    } = &expr.kind
    else {
        return None;
    };
    if target.identifier_name() != Some(declarator.name.as_str()) {
        return None;
    }
    // a comment anywhere around the doomed statement would be lost
    if decl.span.is_valid()
        && reassign.span.is_valid()
        && decl.span.end <= reassign.span.end
        && has_comment_in(ctx.source, decl.span.end, reassign.span.end)
    {
        return None;
    }
    let outer = half_base(init)?;
    // raw form: <init> - lengthdir_*(<half of base>, angle)
    if let ExprKind::Binary {
        op: BinOp::Sub,
        left,
        right,
    } = &value.unwrapped().kind
        && let ExprKind::Call { name, args } = &right.unwrapped().kind
        && is_lengthdir_name(name)
        && args.len() == 2
        && exact(left, init)
        && let Some(inner) = half_base(&args[0])
        && approx(outer, inner)
    {
        return Some(half_difference_product(outer, name, &args[1]));
    }
    // already folded by the expression rules
    if let Some((base, name, angle)) = match_half_difference_folded(value)
        && approx(outer, base)
    {
        return Some(half_difference_product(base, name, angle));
    }
    None
}
