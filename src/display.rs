// Display formatting for the AST
use std::fmt;

use crate::ast::{Expr, ExprKind, Script, Stmt, StmtKind};

/// Relative precedence for parenthesization decisions when printing
fn precedence(expr: &Expr) -> u8 {
    match &expr.kind {
        ExprKind::Assignment { .. } => 1,
        ExprKind::Binary { op, .. } if op.is_additive() => 4,
        ExprKind::Binary { .. } => 5,
        ExprKind::Unary { .. } => 7,
        _ => 9,
    }
}

fn write_operand(f: &mut fmt::Formatter<'_>, operand: &Expr, wrap: bool) -> fmt::Result {
    if wrap {
        write!(f, "({})", operand)
    } else {
        write!(f, "{}", operand)
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ExprKind::Literal(raw) => write!(f, "{}", raw),
            ExprKind::Identifier(name) => write!(f, "{}", name),
            ExprKind::Paren(inner) => write!(f, "({})", inner),
            ExprKind::Unary { op, operand } => {
                write!(f, "{}", op.symbol())?;
                write_operand(f, operand, precedence(operand) < precedence(self))
            }
            ExprKind::Binary { op, left, right } => {
                let prec = precedence(self);
                write_operand(f, left, precedence(left) < prec)?;
                write!(f, " {} ", op.symbol())?;
                // Right operands group at equal precedence so the printed
                // form re-parses to the same tree
                write_operand(f, right, precedence(right) <= prec)
            }
            ExprKind::Call { name, args } => {
                write!(f, "{}(", name)?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                write!(f, ")")
            }
            ExprKind::Member { object, property } => {
                write_operand(f, object, precedence(object) < 9)?;
                write!(f, ".{}", property)
            }
            ExprKind::Index { object, index } => {
                write_operand(f, object, precedence(object) < 9)?;
                write!(f, "[{}]", index)
            }
            ExprKind::Assignment { op, target, value } => {
                write!(f, "{} {} {}", target, op.symbol(), value)
            }
        }
    }
}

impl fmt::Display for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            StmtKind::Var(declarators) => {
                write!(f, "var ")?;
                for (i, declarator) in declarators.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", declarator.name)?;
                    if let Some(init) = &declarator.init {
                        write!(f, " = {}", init)?;
                    }
                }
                write!(f, ";")
            }
            StmtKind::Expr(expr) => write!(f, "{};", expr),
        }
    }
}

impl fmt::Display for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, stmt) in self.stmts.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
                if stmt.blank_before {
                    writeln!(f)?;
                }
            }
            write!(f, "{}", stmt)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{BinOp, Expr, UnaryOp};

    #[test]
    fn test_precedence_parens() {
        // a - (b + c) must keep grouping
        let expr = Expr::binary(
            BinOp::Sub,
            Expr::identifier("a"),
            Expr::binary(BinOp::Add, Expr::identifier("b"), Expr::identifier("c")),
        );
        assert_eq!(expr.to_string(), "a - (b + c)");

        // (a + b) * c
        let expr = Expr::binary(
            BinOp::Mul,
            Expr::binary(BinOp::Add, Expr::identifier("a"), Expr::identifier("b")),
            Expr::identifier("c"),
        );
        assert_eq!(expr.to_string(), "(a + b) * c");

        // Left-associative chains print flat
        let expr = Expr::binary(
            BinOp::Sub,
            Expr::binary(BinOp::Sub, Expr::identifier("a"), Expr::identifier("b")),
            Expr::identifier("c"),
        );
        assert_eq!(expr.to_string(), "a - b - c");
    }

    #[test]
    fn test_division_grouping() {
        // a / (b * c) keeps parens
        let expr = Expr::binary(
            BinOp::Div,
            Expr::identifier("a"),
            Expr::binary(BinOp::Mul, Expr::identifier("b"), Expr::identifier("c")),
        );
        assert_eq!(expr.to_string(), "a / (b * c)");
    }

    #[test]
    fn test_unary() {
        let expr = Expr::unary(
            UnaryOp::Neg,
            Expr::binary(BinOp::Add, Expr::identifier("a"), Expr::identifier("b")),
        );
        assert_eq!(expr.to_string(), "-(a + b)");

        let simple = Expr::unary(UnaryOp::Neg, Expr::identifier("x"));
        assert_eq!(simple.to_string(), "-x");
    }

    #[test]
    fn test_script_blank_lines() {
        let source = "a;\n\nb;";
        let script = crate::parser::parse(source).unwrap();
        assert_eq!(script.to_string(), "a;\n\nb;");
    }
}
