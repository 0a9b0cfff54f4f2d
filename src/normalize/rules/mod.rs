//! Rewrite rule library
//!
//! Rules are grouped by the node shape they match; each shape has one fixed,
//! ordered table tried first-match-wins per pass. A rule either declines
//! with `None` (the only failure mode — shape mismatches and tripped safety
//! guards are never errors) or returns a full replacement node for the
//! driver to swap in.

use crate::ast::{Expr, ExprKind};
use crate::normalize::NormalizeContext;

/// Core trait for all rewrite rules
pub(crate) trait Rule: Sync {
    fn name(&self) -> &'static str;

    /// Attempt the rewrite. `Some` carries the replacement node; callers
    /// must re-attempt the same family before moving on.
    fn apply(&self, expr: &Expr, ctx: &NormalizeContext<'_>) -> Option<Expr>;
}

/// Define a rule as a unit struct with an inline matcher body
macro_rules! rule {
    ($struct_name:ident, $name:literal, |$expr:ident: &Expr, $ctx:ident: &NormalizeContext| $body:block) => {
        pub(crate) struct $struct_name;

        impl $crate::normalize::rules::Rule for $struct_name {
            fn name(&self) -> &'static str {
                $name
            }

            fn apply(
                &self,
                $expr: &$crate::ast::Expr,
                $ctx: &$crate::normalize::NormalizeContext<'_>,
            ) -> Option<$crate::ast::Expr> {
                $body
            }
        }
    };
}
pub(crate) use rule;

pub(crate) mod angles;
pub(crate) mod assignment;
pub(crate) mod geometry;
pub(crate) mod identities;
pub(crate) mod powers;

/// Rules for binary expressions, in priority order
pub(crate) static BINARY_RULES: &[&dyn Rule] = &[
    &identities::MulZeroRule,
    &identities::MulOneRule,
    &identities::DivOneRule,
    &identities::AddZeroRule,
    &identities::SubZeroRule,
    &identities::OneMinusFoldRule,
    &angles::DegToRadRule,
    &angles::RadToDegRule,
    &powers::MeanRule,
    &powers::Log2Rule,
    &identities::ReciprocalCancelRule,
    &powers::RepeatedFactorRule,
    &geometry::LengthdirRule,
    &geometry::DotProductRule,
    &geometry::HalfDifferenceRule,
    &identities::ScalarCondenseRule,
];

/// Rules for assignment expressions
pub(crate) static ASSIGNMENT_RULES: &[&dyn Rule] = &[&assignment::CompoundFromSelfRule];

/// Rules for call expressions
pub(crate) static CALL_RULES: &[&dyn Rule] = &[
    &powers::PowerToSqrtRule,
    &powers::PowerToExpRule,
    &geometry::PointDistanceRule,
    &geometry::PointDirectionRule,
];

/// Select the rule table for a node's shape
pub(crate) fn rules_for(expr: &Expr) -> &'static [&'static dyn Rule] {
    match &expr.kind {
        ExprKind::Binary { .. } => BINARY_RULES,
        ExprKind::Assignment { .. } => ASSIGNMENT_RULES,
        ExprKind::Call { .. } => CALL_RULES,
        _ => &[],
    }
}
