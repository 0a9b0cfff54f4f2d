//! Crate-level test suites

mod comment_safety_tests;
mod termination_tests;

/// Parse, normalize with default options, and print
pub(crate) fn norm(source: &str) -> String {
    match crate::normalize_str(source) {
        Ok(out) => out,
        Err(err) => panic!("failed to normalize {source:?}: {err}"),
    }
}

/// Parse and print without normalizing. Comments are trivia in both
/// paths, so norm(s) == printed(s) asserts that no rewrite fired.
pub(crate) fn printed(source: &str) -> String {
    match crate::parse(source) {
        Ok(script) => script.to_string(),
        Err(err) => panic!("failed to parse {source:?}: {err}"),
    }
}
