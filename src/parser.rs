//! Lexer and Pratt parser for the GML expression/statement subset the
//! normalization engine consumes
//!
//! Comments are skipped as trivia but stay in the source text, where the
//! comment-safety guard finds them via node spans. Two or more consecutive
//! newlines before a statement set its `blank_before` flag.

use crate::ast::{AssignOp, BinOp, Declarator, Expr, ExprKind, Script, Stmt, StmtKind, UnaryOp};
use crate::error::{ParseError, Span};

#[derive(Debug, Clone, PartialEq)]
enum TokKind {
    Number(String),
    Ident(String),
    Op(&'static str),
}

#[derive(Debug, Clone)]
struct Token {
    kind: TokKind,
    span: Span,
}

struct Lexer<'a> {
    src: &'a [u8],
    pos: usize,
}

impl<'a> Lexer<'a> {
    fn new(source: &'a str) -> Self {
        Lexer {
            src: source.as_bytes(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.src.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.src.get(self.pos + offset).copied()
    }

    fn tokenize(mut self) -> Result<Vec<Token>, ParseError> {
        let mut tokens = Vec::new();
        while let Some(ch) = self.peek() {
            match ch {
                b' ' | b'\t' | b'\r' | b'\n' => {
                    self.pos += 1;
                }
                b'/' if self.peek_at(1) == Some(b'/') => self.skip_line_comment(),
                b'#' => self.skip_line_comment(),
                b'/' if self.peek_at(1) == Some(b'*') => self.skip_block_comment(),
                b'0'..=b'9' => tokens.push(self.lex_number()?),
                b'.' if self.peek_at(1).is_some_and(|c| c.is_ascii_digit()) => {
                    tokens.push(self.lex_number()?)
                }
                b'$' => tokens.push(self.lex_number()?),
                b'a'..=b'z' | b'A'..=b'Z' | b'_' => tokens.push(self.lex_ident()),
                _ => tokens.push(self.lex_op()?),
            }
        }
        Ok(tokens)
    }

    fn skip_line_comment(&mut self) {
        while let Some(ch) = self.peek() {
            if ch == b'\n' {
                break;
            }
            self.pos += 1;
        }
    }

    fn skip_block_comment(&mut self) {
        self.pos += 2;
        while self.pos < self.src.len() {
            if self.src[self.pos] == b'*' && self.peek_at(1) == Some(b'/') {
                self.pos += 2;
                return;
            }
            self.pos += 1;
        }
    }

    fn lex_number(&mut self) -> Result<Token, ParseError> {
        let start = self.pos;
        if self.peek() == Some(b'$') {
            self.pos += 1;
            while self.peek().is_some_and(|c| c.is_ascii_hexdigit()) {
                self.pos += 1;
            }
        } else if self.peek() == Some(b'0')
            && matches!(self.peek_at(1), Some(b'x') | Some(b'X'))
        {
            self.pos += 2;
            while self.peek().is_some_and(|c| c.is_ascii_hexdigit()) {
                self.pos += 1;
            }
        } else {
            let mut seen_dot = false;
            while let Some(ch) = self.peek() {
                match ch {
                    b'0'..=b'9' => self.pos += 1,
                    b'.' if !seen_dot => {
                        seen_dot = true;
                        self.pos += 1;
                    }
                    _ => break,
                }
            }
        }
        let span = Span::new(start, self.pos);
        let raw = std::str::from_utf8(&self.src[start..self.pos])
            .unwrap_or_default()
            .to_string();
        if crate::numeric::parse_literal(&raw).is_none() {
            return Err(ParseError::InvalidNumber { value: raw, span });
        }
        Ok(Token {
            kind: TokKind::Number(raw),
            span,
        })
    }

    fn lex_ident(&mut self) -> Token {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| c.is_ascii_alphanumeric() || c == b'_')
        {
            self.pos += 1;
        }
        let span = Span::new(start, self.pos);
        let name = std::str::from_utf8(&self.src[start..self.pos])
            .unwrap_or_default()
            .to_string();
        // GML spells modulo both ways
        if name == "mod" {
            return Token {
                kind: TokKind::Op("%"),
                span,
            };
        }
        Token {
            kind: TokKind::Ident(name),
            span,
        }
    }

    fn lex_op(&mut self) -> Result<Token, ParseError> {
        let start = self.pos;
        let two: &[u8] = &self.src[self.pos..(self.pos + 2).min(self.src.len())];
        for op in ["+=", "-=", "*=", "/="] {
            if two == op.as_bytes() {
                self.pos += 2;
                return Ok(Token {
                    kind: TokKind::Op(op),
                    span: Span::new(start, self.pos),
                });
            }
        }
        let single = match self.src[self.pos] {
            b'+' => "+",
            b'-' => "-",
            b'*' => "*",
            b'/' => "/",
            b'%' => "%",
            b'(' => "(",
            b')' => ")",
            b'[' => "[",
            b']' => "]",
            b',' => ",",
            b'.' => ".",
            b';' => ";",
            b'=' => "=",
            b'!' => "!",
            other => {
                return Err(ParseError::UnexpectedChar {
                    ch: other as char,
                    span: Span::at(start),
                });
            }
        };
        self.pos += 1;
        Ok(Token {
            kind: TokKind::Op(single),
            span: Span::new(start, self.pos),
        })
    }
}

/// Parse a script source into statements
pub fn parse(source: &str) -> Result<Script, ParseError> {
    if source.trim().is_empty() {
        return Err(ParseError::EmptySource);
    }
    let tokens = Lexer::new(source).tokenize()?;
    Parser {
        source,
        tokens,
        pos: 0,
    }
    .parse_script()
}

struct Parser<'a> {
    source: &'a str,
    tokens: Vec<Token>,
    pos: usize,
}

// Binding powers: additive (1, 2), multiplicative (3, 4), unary rhs 5
const UNARY_BP: u8 = 5;

fn binary_binding(op: &str) -> Option<(BinOp, u8, u8)> {
    match op {
        "+" => Some((BinOp::Add, 1, 2)),
        "-" => Some((BinOp::Sub, 1, 2)),
        "*" => Some((BinOp::Mul, 3, 4)),
        "/" => Some((BinOp::Div, 3, 4)),
        "%" => Some((BinOp::Mod, 3, 4)),
        _ => None,
    }
}

fn assign_op(op: &str) -> Option<AssignOp> {
    match op {
        "=" => Some(AssignOp::Assign),
        "+=" => Some(AssignOp::AddAssign),
        "-=" => Some(AssignOp::SubAssign),
        "*=" => Some(AssignOp::MulAssign),
        "/=" => Some(AssignOp::DivAssign),
        _ => None,
    }
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn peek_op(&self) -> Option<&'static str> {
        match self.peek() {
            Some(Token {
                kind: TokKind::Op(op),
                ..
            }) => Some(op),
            _ => None,
        }
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn last_end(&self) -> usize {
        self.tokens
            .get(self.pos.saturating_sub(1))
            .map(|t| t.span.end)
            .unwrap_or(0)
    }

    fn expect_op(&mut self, op: &'static str) -> Result<Span, ParseError> {
        match self.advance() {
            Some(Token {
                kind: TokKind::Op(got),
                span,
            }) if got == op => Ok(span),
            Some(token) => Err(ParseError::unexpected_token(
                format!("'{}'", op),
                describe(&token.kind),
                token.span,
            )),
            None => Err(ParseError::UnexpectedEndOfInput),
        }
    }

    fn parse_script(mut self) -> Result<Script, ParseError> {
        let mut stmts: Vec<Stmt> = Vec::new();
        loop {
            while self.peek_op() == Some(";") {
                self.advance();
            }
            if self.peek().is_none() {
                break;
            }
            let prev_end = stmts.last().map(|s| s.span.end);
            let mut stmt = self.parse_stmt()?;
            if let Some(prev_end) = prev_end {
                let gap = &self.source[prev_end.min(self.source.len())
                    ..stmt.span.start.min(self.source.len())];
                if gap.matches('\n').count() >= 2 {
                    stmt.blank_before = true;
                }
            }
            stmts.push(stmt);
        }
        Ok(Script { stmts })
    }

    fn parse_stmt(&mut self) -> Result<Stmt, ParseError> {
        if let Some(Token {
            kind: TokKind::Ident(name),
            span,
        }) = self.peek()
            && name == "var"
        {
            let start = span.start;
            self.advance();
            let declarators = self.parse_declarators()?;
            let span = Span::new(start, self.last_end());
            return Ok(Stmt::with_span(StmtKind::Var(declarators), span));
        }

        let expr = self.parse_expr(0)?;
        let expr = if let Some(op) = self.peek_op().and_then(assign_op) {
            self.advance();
            let value = self.parse_expr(0)?;
            let span = expr.span.join(value.span);
            Expr::with_span(
                ExprKind::Assignment {
                    op,
                    target: Box::new(expr),
                    value: Box::new(value),
                },
                span,
            )
        } else {
            expr
        };
        let span = expr.span;
        Ok(Stmt::with_span(StmtKind::Expr(expr), span))
    }

    fn parse_declarators(&mut self) -> Result<Vec<Declarator>, ParseError> {
        let mut declarators = Vec::new();
        loop {
            let (name, name_span) = match self.advance() {
                Some(Token {
                    kind: TokKind::Ident(name),
                    span,
                }) => (name, span),
                Some(token) => {
                    return Err(ParseError::unexpected_token(
                        "identifier",
                        describe(&token.kind),
                        token.span,
                    ));
                }
                None => return Err(ParseError::UnexpectedEndOfInput),
            };
            let init = if self.peek_op() == Some("=") {
                self.advance();
                Some(self.parse_expr(0)?)
            } else {
                None
            };
            let span = Span::new(
                name_span.start,
                init.as_ref().map(|e| e.span.end).unwrap_or(name_span.end),
            );
            declarators.push(Declarator { span, name, init });
            if self.peek_op() == Some(",") {
                self.advance();
            } else {
                break;
            }
        }
        Ok(declarators)
    }

    fn parse_expr(&mut self, min_bp: u8) -> Result<Expr, ParseError> {
        let mut lhs = self.parse_prefix()?;
        lhs = self.parse_postfix(lhs)?;

        while let Some((op, l_bp, r_bp)) = self.peek_op().and_then(binary_binding) {
            if l_bp < min_bp {
                break;
            }
            self.advance();
            let rhs = self.parse_expr(r_bp)?;
            let span = lhs.span.join(rhs.span);
            lhs = Expr::with_span(
                ExprKind::Binary {
                    op,
                    left: Box::new(lhs),
                    right: Box::new(rhs),
                },
                span,
            );
        }
        Ok(lhs)
    }

    fn parse_prefix(&mut self) -> Result<Expr, ParseError> {
        let token = self.advance().ok_or(ParseError::UnexpectedEndOfInput)?;
        match token.kind {
            TokKind::Number(raw) => {
                Ok(Expr::with_span(ExprKind::Literal(raw), token.span))
            }
            TokKind::Ident(name) => {
                if self.peek_op() == Some("(") {
                    self.advance();
                    let mut args = Vec::new();
                    if self.peek_op() != Some(")") {
                        loop {
                            args.push(self.parse_expr(0)?);
                            if self.peek_op() == Some(",") {
                                self.advance();
                            } else {
                                break;
                            }
                        }
                    }
                    let close = self.expect_op(")")?;
                    let span = Span::new(token.span.start, close.end);
                    return Ok(Expr::with_span(ExprKind::Call { name, args }, span));
                }
                Ok(Expr::with_span(ExprKind::Identifier(name), token.span))
            }
            TokKind::Op("(") => {
                let inner = self.parse_expr(0)?;
                let close = self.expect_op(")")?;
                let span = Span::new(token.span.start, close.end);
                Ok(Expr::with_span(ExprKind::Paren(Box::new(inner)), span))
            }
            TokKind::Op(op @ ("-" | "+" | "!")) => {
                let unary = match op {
                    "-" => UnaryOp::Neg,
                    "+" => UnaryOp::Plus,
                    _ => UnaryOp::Not,
                };
                let operand = self.parse_expr(UNARY_BP)?;
                let span = Span::new(token.span.start, operand.span.end);
                Ok(Expr::with_span(
                    ExprKind::Unary {
                        op: unary,
                        operand: Box::new(operand),
                    },
                    span,
                ))
            }
            kind => Err(ParseError::unexpected_token(
                "expression",
                describe(&kind),
                token.span,
            )),
        }
    }

    fn parse_postfix(&mut self, mut expr: Expr) -> Result<Expr, ParseError> {
        loop {
            match self.peek_op() {
                Some(".") => {
                    self.advance();
                    let (property, prop_span) = match self.advance() {
                        Some(Token {
                            kind: TokKind::Ident(name),
                            span,
                        }) => (name, span),
                        Some(token) => {
                            return Err(ParseError::unexpected_token(
                                "member name",
                                describe(&token.kind),
                                token.span,
                            ));
                        }
                        None => return Err(ParseError::UnexpectedEndOfInput),
                    };
                    let span = Span::new(expr.span.start, prop_span.end);
                    expr = Expr::with_span(
                        ExprKind::Member {
                            object: Box::new(expr),
                            property,
                        },
                        span,
                    );
                }
                Some("[") => {
                    self.advance();
                    let index = self.parse_expr(0)?;
                    let close = self.expect_op("]")?;
                    let span = Span::new(expr.span.start, close.end);
                    expr = Expr::with_span(
                        ExprKind::Index {
                            object: Box::new(expr),
                            index: Box::new(index),
                        },
                        span,
                    );
                }
                _ => return Ok(expr),
            }
        }
    }
}

fn describe(kind: &TokKind) -> String {
    match kind {
        TokKind::Number(raw) => raw.clone(),
        TokKind::Ident(name) => name.clone(),
        TokKind::Op(op) => (*op).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expr_of(stmt: &Stmt) -> &Expr {
        match &stmt.kind {
            StmtKind::Expr(e) => e,
            _ => panic!("expected expression statement"),
        }
    }

    #[test]
    fn test_precedence() {
        let script = parse("a + b * c").unwrap();
        assert_eq!(expr_of(&script.stmts[0]).to_string(), "a + b * c");

        let script = parse("(a + b) * c").unwrap();
        assert_eq!(expr_of(&script.stmts[0]).to_string(), "(a + b) * c");
    }

    #[test]
    fn test_unary_binds_tighter_than_mul() {
        let script = parse("-a * b").unwrap();
        let expr = expr_of(&script.stmts[0]);
        assert!(matches!(
            &expr.kind,
            ExprKind::Binary { op: BinOp::Mul, .. }
        ));
    }

    #[test]
    fn test_call_member_index() {
        let script = parse("point_distance(x1, y1, x2, y2); other.x; arr[i]").unwrap();
        assert_eq!(
            expr_of(&script.stmts[0]).to_string(),
            "point_distance(x1, y1, x2, y2)"
        );
        assert_eq!(expr_of(&script.stmts[1]).to_string(), "other.x");
        assert_eq!(expr_of(&script.stmts[2]).to_string(), "arr[i]");
    }

    #[test]
    fn test_spans_reference_source() {
        let source = "aa * bb";
        let script = parse(source).unwrap();
        let expr = expr_of(&script.stmts[0]);
        if let ExprKind::Binary { left, right, .. } = &expr.kind {
            assert_eq!(&source[left.span.start..left.span.end], "aa");
            assert_eq!(&source[right.span.start..right.span.end], "bb");
        } else {
            panic!("expected binary expression");
        }
    }

    #[test]
    fn test_var_declaration() {
        let script = parse("var a = 1, b;").unwrap();
        match &script.stmts[0].kind {
            StmtKind::Var(declarators) => {
                assert_eq!(declarators.len(), 2);
                assert_eq!(declarators[0].name, "a");
                assert!(declarators[0].init.is_some());
                assert!(declarators[1].init.is_none());
            }
            _ => panic!("expected var statement"),
        }
    }

    #[test]
    fn test_assignment_forms() {
        let script = parse("x = 1; x += 2").unwrap();
        assert!(matches!(
            &expr_of(&script.stmts[0]).kind,
            ExprKind::Assignment {
                op: AssignOp::Assign,
                ..
            }
        ));
        assert!(matches!(
            &expr_of(&script.stmts[1]).kind,
            ExprKind::Assignment {
                op: AssignOp::AddAssign,
                ..
            }
        ));
    }

    #[test]
    fn test_comments_are_trivia() {
        let script = parse("a /* inline */ + b // trailing\n; c").unwrap();
        assert_eq!(script.stmts.len(), 2);
        assert_eq!(expr_of(&script.stmts[0]).to_string(), "a + b");
    }

    #[test]
    fn test_blank_line_detection() {
        let script = parse("a;\n\nb;\nc;").unwrap();
        assert!(script.stmts[1].blank_before);
        assert!(!script.stmts[2].blank_before);
    }

    #[test]
    fn test_hex_and_mod_keyword() {
        let script = parse("0x10 % 3; $F mod 2").unwrap();
        assert_eq!(expr_of(&script.stmts[0]).to_string(), "0x10 % 3");
        assert_eq!(expr_of(&script.stmts[1]).to_string(), "$F % 2");
    }

    #[test]
    fn test_errors() {
        assert!(matches!(parse("   "), Err(ParseError::EmptySource)));
        assert!(matches!(
            parse("a + "),
            Err(ParseError::UnexpectedEndOfInput)
        ));
        assert!(matches!(
            parse("a @ b"),
            Err(ParseError::UnexpectedChar { ch: '@', .. })
        ));
    }
}
