//! Expression normalization pipeline
//!
//! Three phases run in order: the per-node fixpoint rewriter
//! ([`engine`]), a statement-level merge pass for declaration/reassignment
//! pairs ([`merge`]), and a parenthesis cleanup sweep over parens made
//! redundant by identity removal ([`parens`]).

pub(crate) mod engine;
pub(crate) mod merge;
pub(crate) mod parens;
pub(crate) mod rules;

use crate::ast::{Expr, Script};

/// Knobs for the normalization passes
#[derive(Debug, Clone, Copy, Default)]
pub struct NormalizeOptions {
    /// Keep a synthesized copy of the original declaration when the merge
    /// pass folds a reassignment into it
    pub record_original: bool,
}

/// Shared state threaded through every rule application
#[derive(Debug)]
pub struct NormalizeContext<'a> {
    /// Original source text, consulted for the comment-safety guards
    pub source: &'a str,
    pub options: NormalizeOptions,
}

impl<'a> NormalizeContext<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            options: NormalizeOptions::default(),
        }
    }

    pub fn with_options(source: &'a str, options: NormalizeOptions) -> Self {
        Self { source, options }
    }
}

/// Normalize a whole script in place
pub fn normalize(script: &mut Script, ctx: &NormalizeContext<'_>) {
    engine::rewrite_script(script, ctx);
    merge::merge_statements(&mut script.stmts, ctx);
    parens::cleanup_script(script);
}

/// Normalize a single expression in place. Statement-level merging does
/// not apply here.
pub fn normalize_expr(expr: &mut Expr, ctx: &NormalizeContext<'_>) {
    let mut visited = rustc_hash::FxHashSet::default();
    engine::rewrite_expr(expr, ctx, &mut visited);
    parens::cleanup_expr(expr, false);
}
