//! Comment-safety guard
//!
//! Rewrite rules delete, reorder, or merge sibling operands; any comment
//! sitting between those operands in the raw source would be silently lost.
//! Every such rule checks this guard first and declines when it trips.

use crate::ast::Expr;

/// Comment markers recognized in the source text
const MARKERS: [&str; 3] = ["//", "/*", "#"];

/// True if the source range contains a comment marker
pub fn has_comment_in(source: &str, from: usize, to: usize) -> bool {
    if from >= to || to > source.len() {
        return false;
    }
    let Some(window) = source.get(from..to) else {
        // Offsets landing inside a multi-byte character: be conservative
        return true;
    };
    MARKERS.iter().any(|m| window.contains(m))
}

/// True (unsafe) if a comment lies strictly between two sibling operands
///
/// Synthesized nodes carry empty spans and have no surrounding source text
/// to protect, so they never block.
pub fn comment_between(source: &str, left: &Expr, right: &Expr) -> bool {
    if !left.span.is_valid() || !right.span.is_valid() {
        return false;
    }
    if right.span.start < left.span.end {
        return false;
    }
    has_comment_in(source, left.span.end, right.span.start)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Span;

    fn spanned(name: &str, start: usize, end: usize) -> Expr {
        let mut e = Expr::identifier(name);
        e.span = Span::new(start, end);
        e
    }

    #[test]
    fn test_detects_each_marker() {
        assert!(has_comment_in("a // b", 1, 6));
        assert!(has_comment_in("a /* b */ c", 1, 11));
        assert!(has_comment_in("a # b", 1, 5));
        assert!(!has_comment_in("a + b", 0, 5));
    }

    #[test]
    fn test_comment_between_operands() {
        let source = "a * /* keep */ b";
        let a = spanned("a", 0, 1);
        let b = spanned("b", 15, 16);
        assert!(comment_between(source, &a, &b));

        let clean = "a * b";
        let a2 = spanned("a", 0, 1);
        let b2 = spanned("b", 4, 5);
        assert!(!comment_between(clean, &a2, &b2));
    }

    #[test]
    fn test_synthesized_nodes_never_block() {
        let source = "// whole line";
        let a = Expr::identifier("a");
        let b = Expr::identifier("b");
        assert!(!comment_between(source, &a, &b));
    }
}
