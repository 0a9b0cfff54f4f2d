//! Abstract Syntax Tree for GML expressions and statements
//!
//! Nodes carry a unique identity (for the traversal's visited set), a source
//! span (for the comment-safety guard), and the `from_identity` marker that
//! the parenthesis cleanup pass consumes. Structural equality deliberately
//! ignores identity, spans, and markers.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::Span;

/// Global counter for node IDs
static NODE_ID_COUNTER: AtomicU64 = AtomicU64::new(0);

fn next_id() -> u64 {
    NODE_ID_COUNTER.fetch_add(1, Ordering::Relaxed)
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

impl BinOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Mod => "%",
        }
    }

    pub fn is_additive(&self) -> bool {
        matches!(self, BinOp::Add | BinOp::Sub)
    }

    pub fn is_multiplicative(&self) -> bool {
        matches!(self, BinOp::Mul | BinOp::Div)
    }

    pub fn is_commutative(&self) -> bool {
        matches!(self, BinOp::Add | BinOp::Mul)
    }
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Plus,
    Not,
}

impl UnaryOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            UnaryOp::Neg => "-",
            UnaryOp::Plus => "+",
            UnaryOp::Not => "!",
        }
    }
}

/// Assignment operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignOp {
    Assign,
    AddAssign,
    SubAssign,
    MulAssign,
    DivAssign,
}

impl AssignOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            AssignOp::Assign => "=",
            AssignOp::AddAssign => "+=",
            AssignOp::SubAssign => "-=",
            AssignOp::MulAssign => "*=",
            AssignOp::DivAssign => "/=",
        }
    }

    /// Compound assignment operator for a binary operator, if one exists
    pub fn from_bin(op: BinOp) -> Option<AssignOp> {
        match op {
            BinOp::Add => Some(AssignOp::AddAssign),
            BinOp::Sub => Some(AssignOp::SubAssign),
            BinOp::Mul => Some(AssignOp::MulAssign),
            BinOp::Div => Some(AssignOp::DivAssign),
            BinOp::Mod => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Expr {
    /// Unique ID keying the traversal's visited set (not part of equality)
    pub id: u64,
    /// Source location; `Span::empty()` for synthesized nodes
    pub span: Span,
    /// Marker set by identity-removal rules, consumed by the paren cleanup
    pub from_identity: bool,
    pub kind: ExprKind,
}

// Structural equality over kind only
impl PartialEq for Expr {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
    }
}

impl Eq for Expr {}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    /// Literal with its raw source text (e.g. "180", "0.5", "0x1F")
    Literal(String),

    /// Variable or built-in constant name (e.g. "x", "pi")
    Identifier(String),

    /// Unary operation
    Unary { op: UnaryOp, operand: Box<Expr> },

    /// Binary operation
    Binary {
        op: BinOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },

    /// Explicit parentheses from the source (or inserted by rewrite rules)
    Paren(Box<Expr>),

    /// Function call by callee name
    Call { name: String, args: Vec<Expr> },

    /// Dotted member access (e.g. `other.x`)
    Member { object: Box<Expr>, property: String },

    /// Indexed access (e.g. `arr[i]`)
    Index { object: Box<Expr>, index: Box<Expr> },

    /// Assignment, plain or compound
    Assignment {
        op: AssignOp,
        target: Box<Expr>,
        value: Box<Expr>,
    },
}

impl Expr {
    pub fn new(kind: ExprKind) -> Self {
        Expr {
            id: next_id(),
            span: Span::empty(),
            from_identity: false,
            kind,
        }
    }

    pub fn with_span(kind: ExprKind, span: Span) -> Self {
        Expr {
            id: next_id(),
            span,
            from_identity: false,
            kind,
        }
    }

    // Convenience constructors (synthesized nodes, empty spans)

    pub fn literal(raw: impl Into<String>) -> Self {
        Expr::new(ExprKind::Literal(raw.into()))
    }

    /// Create a literal from a numeric value, rendered minimally
    pub fn number(value: f64) -> Self {
        Expr::literal(crate::numeric::format_number(value))
    }

    pub fn identifier(name: impl Into<String>) -> Self {
        Expr::new(ExprKind::Identifier(name.into()))
    }

    pub fn unary(op: UnaryOp, operand: Expr) -> Self {
        Expr::new(ExprKind::Unary {
            op,
            operand: Box::new(operand),
        })
    }

    pub fn binary(op: BinOp, left: Expr, right: Expr) -> Self {
        Expr::new(ExprKind::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    pub fn paren(inner: Expr) -> Self {
        Expr::new(ExprKind::Paren(Box::new(inner)))
    }

    pub fn call(name: impl Into<String>, args: Vec<Expr>) -> Self {
        Expr::new(ExprKind::Call {
            name: name.into(),
            args,
        })
    }

    pub fn member(object: Expr, property: impl Into<String>) -> Self {
        Expr::new(ExprKind::Member {
            object: Box::new(object),
            property: property.into(),
        })
    }

    pub fn index(object: Expr, index: Expr) -> Self {
        Expr::new(ExprKind::Index {
            object: Box::new(object),
            index: Box::new(index),
        })
    }

    pub fn assignment(op: AssignOp, target: Expr, value: Expr) -> Self {
        Expr::new(ExprKind::Assignment {
            op,
            target: Box::new(target),
            value: Box::new(value),
        })
    }

    /// Consume self, setting the identity-derived marker
    pub(crate) fn marked_identity(mut self) -> Self {
        self.from_identity = true;
        self
    }

    // Accessors

    /// Strip any number of parenthesis wrappers
    pub fn unwrapped(&self) -> &Expr {
        let mut current = self;
        while let ExprKind::Paren(inner) = &current.kind {
            current = inner;
        }
        current
    }

    /// Identifier name, looking through parentheses
    pub fn identifier_name(&self) -> Option<&str> {
        match &self.unwrapped().kind {
            ExprKind::Identifier(name) => Some(name),
            _ => None,
        }
    }

    /// Raw literal text, looking through parentheses
    pub fn literal_raw(&self) -> Option<&str> {
        match &self.unwrapped().kind {
            ExprKind::Literal(raw) => Some(raw),
            _ => None,
        }
    }

    /// Check whether this expression is free of observable side effects and
    /// therefore eligible for duplication, reordering, or removal by rules:
    /// identifiers, literals, and dotted/indexed member access over safe
    /// operands. Calls are opaque and never safe.
    pub fn is_safe_operand(&self) -> bool {
        match &self.kind {
            ExprKind::Literal(_) | ExprKind::Identifier(_) => true,
            ExprKind::Unary { operand, .. } => operand.is_safe_operand(),
            ExprKind::Paren(inner) => inner.is_safe_operand(),
            ExprKind::Member { object, .. } => object.is_safe_operand(),
            ExprKind::Index { object, index } => {
                object.is_safe_operand() && index.is_safe_operand()
            }
            _ => false,
        }
    }

    /// Mutable references to all direct child expressions
    pub(crate) fn children_mut(&mut self) -> Vec<&mut Expr> {
        match &mut self.kind {
            ExprKind::Literal(_) | ExprKind::Identifier(_) => Vec::new(),
            ExprKind::Unary { operand, .. } => vec![operand],
            ExprKind::Binary { left, right, .. } => vec![left, right],
            ExprKind::Paren(inner) => vec![inner],
            ExprKind::Call { args, .. } => args.iter_mut().collect(),
            ExprKind::Member { object, .. } => vec![object],
            ExprKind::Index { object, index } => vec![object, index],
            ExprKind::Assignment { target, value, .. } => vec![target, value],
        }
    }

    /// Shared references to all direct child expressions
    pub fn children(&self) -> Vec<&Expr> {
        match &self.kind {
            ExprKind::Literal(_) | ExprKind::Identifier(_) => Vec::new(),
            ExprKind::Unary { operand, .. } => vec![operand],
            ExprKind::Binary { left, right, .. } => vec![left, right],
            ExprKind::Paren(inner) => vec![inner],
            ExprKind::Call { args, .. } => args.iter().collect(),
            ExprKind::Member { object, .. } => vec![object],
            ExprKind::Index { object, index } => vec![object, index],
            ExprKind::Assignment { target, value, .. } => vec![target, value],
        }
    }

    /// Count the total number of nodes in the subtree
    pub fn node_count(&self) -> usize {
        1 + self.children().iter().map(|c| c.node_count()).sum::<usize>()
    }
}

/// A single `name = init` inside a `var` declaration
#[derive(Debug, Clone, PartialEq)]
pub struct Declarator {
    pub span: Span,
    pub name: String,
    pub init: Option<Expr>,
}

#[derive(Debug, Clone)]
pub struct Stmt {
    pub id: u64,
    pub span: Span,
    /// A deliberate blank line preceded this statement in the source
    pub blank_before: bool,
    /// Synthesized "original form" declaration recorded by the statement
    /// merger for downstream comment/printing logic
    pub original_form: bool,
    pub kind: StmtKind,
}

impl PartialEq for Stmt {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
    }
}

impl Eq for Stmt {}

#[derive(Debug, Clone, PartialEq)]
pub enum StmtKind {
    /// `var a = x, b = y`
    Var(Vec<Declarator>),
    /// Expression statement (assignments included)
    Expr(Expr),
}

impl Stmt {
    pub fn new(kind: StmtKind) -> Self {
        Stmt {
            id: next_id(),
            span: Span::empty(),
            blank_before: false,
            original_form: false,
            kind,
        }
    }

    pub fn with_span(kind: StmtKind, span: Span) -> Self {
        let mut stmt = Stmt::new(kind);
        stmt.span = span;
        stmt
    }
}

/// A parsed script: the unit `normalize` operates on
#[derive(Debug, Clone, PartialEq)]
pub struct Script {
    pub stmts: Vec<Stmt>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_unique_equality_structural() {
        let a = Expr::identifier("x");
        let b = Expr::identifier("x");
        let c = Expr::identifier("y");

        assert_ne!(a.id, b.id);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_unwrapped() {
        let inner = Expr::identifier("x");
        let wrapped = Expr::paren(Expr::paren(inner));
        assert_eq!(wrapped.unwrapped().identifier_name(), Some("x"));
    }

    #[test]
    fn test_safe_operand() {
        assert!(Expr::identifier("x").is_safe_operand());
        assert!(Expr::literal("2").is_safe_operand());
        assert!(Expr::member(Expr::identifier("other"), "x").is_safe_operand());
        assert!(
            Expr::index(Expr::identifier("arr"), Expr::identifier("i")).is_safe_operand()
        );
        assert!(!Expr::call("instance_create", vec![]).is_safe_operand());
        assert!(
            !Expr::index(Expr::identifier("arr"), Expr::call("irandom", vec![]))
                .is_safe_operand()
        );
    }

    #[test]
    fn test_node_count() {
        let expr = Expr::binary(
            BinOp::Mul,
            Expr::identifier("x"),
            Expr::literal("1"),
        );
        assert_eq!(expr.node_count(), 3);
    }

    #[test]
    fn test_marker_ignored_by_equality() {
        let plain = Expr::identifier("x");
        let marked = Expr::identifier("x").marked_identity();
        assert_eq!(plain, marked);
    }
}
