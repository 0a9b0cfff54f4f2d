//! Fixpoint rewrite driver
//!
//! Walks the tree top-down. At each node the matching rule table is
//! retried until no rule fires (the node's shape can change between
//! passes, so the table is re-selected every pass), then the driver
//! recurses into the children of whatever node is now in place.
//! Replacement nodes carry fresh ids, so the visited set keys on node
//! identity rather than structure.

use std::sync::OnceLock;

use rustc_hash::FxHashSet;

use crate::ast::{Expr, Script, Stmt, StmtKind};
use crate::normalize::rules::{self, Rule};
use crate::normalize::NormalizeContext;

/// Hard cap on rewrite passes for a single node. Well-formed rule sets
/// converge in a handful of passes; hitting the cap indicates a rule pair
/// that undoes each other.
pub(crate) const MAX_RULE_PASSES: usize = 1000;

fn trace_enabled() -> bool {
    static TRACE: OnceLock<bool> = OnceLock::new();
    *TRACE.get_or_init(|| std::env::var_os("GML_MATHNORM_TRACE").is_some())
}

pub(crate) fn rewrite_script(script: &mut Script, ctx: &NormalizeContext<'_>) {
    let mut visited = FxHashSet::default();
    for stmt in &mut script.stmts {
        rewrite_stmt(stmt, ctx, &mut visited);
    }
}

fn rewrite_stmt(stmt: &mut Stmt, ctx: &NormalizeContext<'_>, visited: &mut FxHashSet<u64>) {
    match &mut stmt.kind {
        StmtKind::Var(declarators) => {
            for declarator in declarators {
                if let Some(init) = &mut declarator.init {
                    rewrite_expr(init, ctx, visited);
                }
            }
        }
        StmtKind::Expr(expr) => rewrite_expr(expr, ctx, visited),
    }
}

pub(crate) fn rewrite_expr(expr: &mut Expr, ctx: &NormalizeContext<'_>, visited: &mut FxHashSet<u64>) {
    if !visited.insert(expr.id) {
        return;
    }
    fixpoint_with(expr, rules::rules_for, ctx);
    for child in expr.children_mut() {
        rewrite_expr(child, ctx, visited);
    }
}

/// Retry rules on one node until none fires or the pass cap is reached.
/// Returns the number of passes that fired a rule.
pub(crate) fn fixpoint_with(
    expr: &mut Expr,
    select: fn(&Expr) -> &'static [&'static dyn Rule],
    ctx: &NormalizeContext<'_>,
) -> usize {
    let mut passes = 0;
    while passes < MAX_RULE_PASSES {
        let mut fired = false;
        for rule in select(expr) {
            if let Some(replacement) = rule.apply(expr, ctx) {
                if trace_enabled() {
                    eprintln!("[mathnorm] {}: {} => {}", rule.name(), expr, replacement);
                }
                *expr = replacement;
                fired = true;
                break;
            }
        }
        if !fired {
            return passes;
        }
        passes += 1;
    }
    eprintln!(
        "[mathnorm] warning: node failed to converge after {} passes; leaving as-is",
        MAX_RULE_PASSES
    );
    passes
}
