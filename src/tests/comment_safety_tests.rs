//! Rewrites must decline when they would swallow a comment

use super::{norm, printed};

#[test]
fn test_identity_removal_blocked_by_comment() {
    let source = "x * /* keep me */ 1;";
    assert_eq!(norm(source), printed(source));

    let source = "x + // trailing note\n0;";
    assert_eq!(norm(source), printed(source));

    let source = "x * # gml note\n1;";
    assert_eq!(norm(source), printed(source));
}

#[test]
fn test_chain_rules_blocked_by_comment_at_any_split() {
    let source = "2 * x /* mid */ * 3;";
    assert_eq!(norm(source), printed(source));

    let source = "x * /* mid */ x;";
    assert_eq!(norm(source), printed(source));
}

#[test]
fn test_conversion_blocked_by_comment() {
    let source = "a * /* degrees */ pi / 180;";
    assert_eq!(norm(source), printed(source));
}

#[test]
fn test_compound_assignment_blocked_by_comment() {
    let source = "x = /* why */ x + 1;";
    assert_eq!(norm(source), printed(source));
}

#[test]
fn test_merge_blocked_by_comment_between_statements() {
    let source =
        "var w = a - a / 2;\n// explanation\nw = (a - a / 2) - lengthdir_x(a / 2, ang);";
    let out = norm(source);
    // The statements stay separate; the expression-level fold inside the
    // reassignment is unaffected by a comment outside its operands.
    assert_eq!(out.lines().count(), 2);
    assert!(out.starts_with("var w = a - a / 2;"));
    assert!(out.ends_with("w = a * 0.5 * (1 - lengthdir_x(1, ang));"));
}

#[test]
fn test_comment_outside_operands_does_not_block() {
    // Before or after the whole expression is fine
    assert_eq!(norm("/* lead */ x * 1;"), "x;");
    assert_eq!(norm("x * 1; // tail"), "x;");
}
