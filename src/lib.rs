//! Normalization engine for hand-written GML arithmetic
//!
//! Detects hand-rolled spellings of GameMaker built-ins inside expression
//! trees and rewrites them to the canonical calls: `x * x` becomes
//! `sqr(x)`, `a * pi / 180` becomes `degtorad(a)`,
//! `sqrt((x2 - x1) * (x2 - x1) + (y2 - y1) * (y2 - y1))` becomes
//! `point_distance(x1, y1, x2, y2)`, and so on.
//!
//! Rewrites are conservative: numeric matching uses magnitude-scaled
//! tolerances, operands that might carry side effects are never dropped,
//! and any rewrite that would swallow a comment in the original source is
//! declined.
//!
//! ```
//! let out = gml_mathnorm::normalize_str("legs * dcos(facing);").unwrap();
//! assert_eq!(out, "lengthdir_x(legs, facing);");
//! ```

mod ast;
mod chain;
mod comments;
mod display;
mod equivalence;
mod error;
pub mod normalize;
mod numeric;
mod parser;

#[cfg(test)]
mod tests;

pub use ast::{
    AssignOp, BinOp, Declarator, Expr, ExprKind, Script, Stmt, StmtKind, UnaryOp,
};
pub use error::{ParseError, Span};
pub use normalize::{normalize, normalize_expr, NormalizeContext, NormalizeOptions};
pub use parser::parse;

/// Parse, normalize, and print a script in one step
pub fn normalize_str(source: &str) -> Result<String, ParseError> {
    let mut script = parse(source)?;
    let ctx = NormalizeContext::new(source);
    normalize(&mut script, &ctx);
    Ok(script.to_string())
}
