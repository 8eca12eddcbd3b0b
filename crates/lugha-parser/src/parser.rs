//! Parser for the Lugha programming language.
//!
//! Transforms a stream of tokens into an Abstract Syntax Tree (AST) by
//! recursive descent. Precedence, loosest first: assignment, `&&`/`||`,
//! comparison, `+`/`-`, `*`/`/`/`%`, unary, `^`, call, atom.

use crate::ast::*;
use lugha_core::{LughaError, Span};
use lugha_lexer::{Token, TokenKind};
use std::rc::Rc;

/// The parser for Lugha source code.
pub struct Parser {
    tokens: Vec<Token>,
    current: usize,
}

impl Parser {
    /// Create a new parser with the given tokens.
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, current: 0 }
    }

    /// Parse a complete program into a block node.
    pub fn parse_program(&mut self) -> Result<Node, LughaError> {
        let start_span = self.current_span();
        let mut statements = Vec::new();

        self.skip_terminators();

        while !self.is_at_end() {
            statements.push(self.parse_statement()?);
            if !self.is_at_end() {
                self.expect_terminator()?;
                self.skip_terminators();
            }
        }

        let span = if statements.is_empty() {
            start_span
        } else {
            start_span.to(&self.previous_span())
        };
        Ok(Node::Block(BlockNode { statements, span }))
    }

    /// Parse a single expression (the whole input must be one expression).
    pub fn parse_single_expression(&mut self) -> Result<Node, LughaError> {
        let expr = self.parse_expression()?;
        self.skip_terminators();
        if !self.is_at_end() {
            return Err(self.error("Expected end of input after expression"));
        }
        Ok(expr)
    }

    /// Parse a statement: `rudisha expr?` or an expression.
    fn parse_statement(&mut self) -> Result<Node, LughaError> {
        if self.check(&TokenKind::Rudisha) {
            let start_span = self.current_span();
            self.advance();

            let value = if self.at_statement_end() {
                None
            } else {
                Some(Box::new(self.parse_expression()?))
            };

            return Ok(Node::Return(ReturnNode {
                value,
                span: start_span.to(&self.previous_span()),
            }));
        }

        self.parse_expression()
    }

    /// Parse an expression, starting with assignment.
    fn parse_expression(&mut self) -> Result<Node, LughaError> {
        // Assignment needs two tokens of lookahead: IDENT '=' (but not '==').
        if let TokenKind::Identifier(name) = self.peek_kind().clone() {
            if self.peek_kind_at(1) == Some(&TokenKind::Equal) {
                let start_span = self.current_span();
                self.advance(); // identifier
                self.advance(); // '='
                let value = self.parse_expression()?;
                return Ok(Node::VarAssign(VarAssignNode {
                    name,
                    span: start_span.to(&self.previous_span()),
                    value: Box::new(value),
                }));
            }
        }

        self.parse_logic()
    }

    /// `comp (("&&" | "||") comp)*`
    fn parse_logic(&mut self) -> Result<Node, LughaError> {
        let mut lhs = self.parse_comparison()?;

        loop {
            let op = match self.peek_kind() {
                TokenKind::And => BinOp::And,
                TokenKind::Or => BinOp::Or,
                _ => break,
            };
            self.advance();
            let rhs = self.parse_comparison()?;
            lhs = self.bin_op(op, lhs, rhs);
        }

        Ok(lhs)
    }

    /// `"!" comp | arith (compare-op arith)*`
    fn parse_comparison(&mut self) -> Result<Node, LughaError> {
        if self.check(&TokenKind::Not) {
            let start_span = self.current_span();
            self.advance();
            let operand = self.parse_comparison()?;
            return Ok(Node::UnaryOp(UnaryOpNode {
                op: UnaryOp::Not,
                span: start_span.to(&self.previous_span()),
                operand: Box::new(operand),
            }));
        }

        let mut lhs = self.parse_arith()?;

        loop {
            let op = match self.peek_kind() {
                TokenKind::EqEq => BinOp::Eq,
                TokenKind::NotEq => BinOp::NotEq,
                TokenKind::Less => BinOp::Lt,
                TokenKind::Greater => BinOp::Gt,
                TokenKind::LessEq => BinOp::Lte,
                TokenKind::GreaterEq => BinOp::Gte,
                _ => break,
            };
            self.advance();
            let rhs = self.parse_arith()?;
            lhs = self.bin_op(op, lhs, rhs);
        }

        Ok(lhs)
    }

    /// `term (("+" | "-") term)*`
    fn parse_arith(&mut self) -> Result<Node, LughaError> {
        let mut lhs = self.parse_term()?;

        loop {
            let op = match self.peek_kind() {
                TokenKind::Plus => BinOp::Add,
                TokenKind::Minus => BinOp::Sub,
                _ => break,
            };
            self.advance();
            let rhs = self.parse_term()?;
            lhs = self.bin_op(op, lhs, rhs);
        }

        Ok(lhs)
    }

    /// `factor (("*" | "/" | "%") factor)*`
    fn parse_term(&mut self) -> Result<Node, LughaError> {
        let mut lhs = self.parse_factor()?;

        loop {
            let op = match self.peek_kind() {
                TokenKind::Mul => BinOp::Mul,
                TokenKind::Div => BinOp::Div,
                TokenKind::Mod => BinOp::Mod,
                _ => break,
            };
            self.advance();
            let rhs = self.parse_factor()?;
            lhs = self.bin_op(op, lhs, rhs);
        }

        Ok(lhs)
    }

    /// `("+" | "-") factor | power`
    fn parse_factor(&mut self) -> Result<Node, LughaError> {
        match self.peek_kind() {
            TokenKind::Plus => {
                // Unary plus is the identity; no node for it.
                self.advance();
                self.parse_factor()
            }
            TokenKind::Minus => {
                let start_span = self.current_span();
                self.advance();
                let operand = self.parse_factor()?;
                Ok(Node::UnaryOp(UnaryOpNode {
                    op: UnaryOp::Neg,
                    span: start_span.to(&self.previous_span()),
                    operand: Box::new(operand),
                }))
            }
            _ => self.parse_power(),
        }
    }

    /// `call ("^" factor)*` — the right operand re-enters this level
    /// through `factor`, so `^` is right-associative.
    fn parse_power(&mut self) -> Result<Node, LughaError> {
        let mut lhs = self.parse_call()?;

        while self.check(&TokenKind::Pow) {
            self.advance();
            let rhs = self.parse_factor()?;
            lhs = self.bin_op(BinOp::Pow, lhs, rhs);
        }

        Ok(lhs)
    }

    /// `atom ("(" args ")")*` — repeated suffixes allow `gen(10)(5)`.
    fn parse_call(&mut self) -> Result<Node, LughaError> {
        let mut callee = self.parse_atom()?;

        while self.check(&TokenKind::LeftParen) {
            self.advance();
            let mut args = Vec::new();

            if !self.check(&TokenKind::RightParen) {
                args.push(self.parse_expression()?);
                while self.check(&TokenKind::Comma) {
                    self.advance();
                    args.push(self.parse_expression()?);
                }
            }

            self.expect(TokenKind::RightParen)?;
            let span = callee.span().to(&self.previous_span());
            callee = Node::Call(CallNode {
                callee: Box::new(callee),
                args,
                span,
            });
        }

        Ok(callee)
    }

    fn parse_atom(&mut self) -> Result<Node, LughaError> {
        let start_span = self.current_span();

        match self.peek_kind().clone() {
            TokenKind::Number(value) => {
                self.advance();
                Ok(Node::Number(NumberNode {
                    value,
                    span: start_span,
                }))
            }
            TokenKind::Str(value) => {
                self.advance();
                Ok(Node::Str(StrNode {
                    value,
                    span: start_span,
                }))
            }
            TokenKind::Identifier(name) => {
                self.advance();
                Ok(Node::VarAccess(VarAccessNode {
                    name,
                    span: start_span,
                }))
            }
            TokenKind::LeftParen => {
                self.advance();
                let expr = self.parse_expression()?;
                self.expect(TokenKind::RightParen)?;
                Ok(expr)
            }
            TokenKind::LeftBracket => self.parse_list(),
            TokenKind::Kama => self.parse_if(),
            TokenKind::Kwa => self.parse_for(),
            TokenKind::Wakati => self.parse_while(),
            TokenKind::Shughuli => self.parse_func_def(),
            TokenKind::Eof => Err(LughaError::UnexpectedEof { span: start_span }),
            _ => Err(self.error("Expected an expression")),
        }
    }

    /// `"[" (expr ("," expr)*)? "]"`
    fn parse_list(&mut self) -> Result<Node, LughaError> {
        let start_span = self.current_span();
        self.expect(TokenKind::LeftBracket)?;

        let mut elements = Vec::new();
        if !self.check(&TokenKind::RightBracket) {
            elements.push(self.parse_expression()?);
            while self.check(&TokenKind::Comma) {
                self.advance();
                elements.push(self.parse_expression()?);
            }
        }

        self.expect(TokenKind::RightBracket)?;
        Ok(Node::List(ListNode {
            elements,
            span: start_span.to(&self.previous_span()),
        }))
    }

    /// `"kama" expr body ("sivyo" "kama" expr body)* ("sivyo" body)?`
    ///
    /// Arms are flattened into one node: ordered cases plus an optional else.
    fn parse_if(&mut self) -> Result<Node, LughaError> {
        let start_span = self.current_span();
        self.expect(TokenKind::Kama)?;

        let mut cases = Vec::new();
        let mut else_body = None;

        let condition = self.parse_expression()?;
        let body = self.parse_body()?;
        cases.push(IfCase { condition, body });

        while self.terminator_separated_check(&TokenKind::Sivyo) {
            self.skip_terminators();
            self.expect(TokenKind::Sivyo)?;

            if self.check(&TokenKind::Kama) {
                self.advance();
                let condition = self.parse_expression()?;
                let body = self.parse_body()?;
                cases.push(IfCase { condition, body });
            } else {
                else_body = Some(Box::new(self.parse_body()?));
                break;
            }
        }

        Ok(Node::If(IfNode {
            cases,
            else_body,
            span: start_span.to(&self.previous_span()),
        }))
    }

    /// `"kwa" IDENT "=" expr "mpaka" expr ("hatua" expr)? body`
    fn parse_for(&mut self) -> Result<Node, LughaError> {
        let start_span = self.current_span();
        self.expect(TokenKind::Kwa)?;

        let var = self.expect_identifier()?;
        self.expect(TokenKind::Equal)?;
        let start = self.parse_expression()?;
        self.expect(TokenKind::Mpaka)?;
        let end = self.parse_expression()?;

        let step = if self.check(&TokenKind::Hatua) {
            self.advance();
            Some(Box::new(self.parse_expression()?))
        } else {
            None
        };

        let body = self.parse_body()?;

        Ok(Node::For(ForNode {
            var,
            start: Box::new(start),
            end: Box::new(end),
            step,
            body: Box::new(body),
            span: start_span.to(&self.previous_span()),
        }))
    }

    /// `"wakati" expr body`
    fn parse_while(&mut self) -> Result<Node, LughaError> {
        let start_span = self.current_span();
        self.expect(TokenKind::Wakati)?;

        let condition = self.parse_expression()?;
        let body = self.parse_body()?;

        Ok(Node::While(WhileNode {
            condition: Box::new(condition),
            body: Box::new(body),
            span: start_span.to(&self.previous_span()),
        }))
    }

    /// `"shughuli" IDENT? "(" (IDENT ("," IDENT)*)? ")" body`
    fn parse_func_def(&mut self) -> Result<Node, LughaError> {
        let start_span = self.current_span();
        self.expect(TokenKind::Shughuli)?;

        let name = if let TokenKind::Identifier(name) = self.peek_kind().clone() {
            self.advance();
            Some(name)
        } else {
            None
        };

        self.expect(TokenKind::LeftParen)?;
        let mut params = Vec::new();
        if !self.check(&TokenKind::RightParen) {
            params.push(self.expect_identifier()?);
            while self.check(&TokenKind::Comma) {
                self.advance();
                params.push(self.expect_identifier()?);
            }
        }
        self.expect(TokenKind::RightParen)?;

        let body = self.parse_body()?;

        Ok(Node::FuncDef(FuncDefNode {
            name,
            params,
            body: Rc::new(body),
            span: start_span.to(&self.previous_span()),
        }))
    }

    /// A braced statement sequence, or a single statement without braces.
    fn parse_body(&mut self) -> Result<Node, LughaError> {
        if !self.check(&TokenKind::LeftBrace) {
            return self.parse_statement();
        }

        let start_span = self.current_span();
        self.advance();
        self.skip_terminators();

        let mut statements = Vec::new();
        while !self.check(&TokenKind::RightBrace) && !self.is_at_end() {
            statements.push(self.parse_statement()?);
            if self.check(&TokenKind::RightBrace) {
                break;
            }
            self.expect_terminator()?;
            self.skip_terminators();
        }

        self.expect(TokenKind::RightBrace)?;
        Ok(Node::Block(BlockNode {
            statements,
            span: start_span.to(&self.previous_span()),
        }))
    }

    // === Cursor helpers ===

    fn bin_op(&self, op: BinOp, lhs: Node, rhs: Node) -> Node {
        let span = lhs.span().to(&rhs.span());
        Node::BinOp(BinOpNode {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
            span,
        })
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.current.min(self.tokens.len() - 1)]
    }

    fn peek_kind(&self) -> &TokenKind {
        &self.peek().kind
    }

    fn peek_kind_at(&self, offset: usize) -> Option<&TokenKind> {
        self.tokens.get(self.current + offset).map(|t| &t.kind)
    }

    fn check(&self, kind: &TokenKind) -> bool {
        self.peek_kind() == kind
    }

    /// Check whether `kind` is the next non-terminator token, without
    /// consuming anything. Lets `sivyo` sit on the line after a `}`.
    fn terminator_separated_check(&self, kind: &TokenKind) -> bool {
        let mut index = self.current;
        while self
            .tokens
            .get(index)
            .map(|t| t.is_terminator())
            .unwrap_or(false)
        {
            index += 1;
        }
        self.tokens.get(index).map(|t| &t.kind) == Some(kind)
    }

    fn is_at_end(&self) -> bool {
        matches!(self.peek_kind(), TokenKind::Eof)
    }

    fn at_statement_end(&self) -> bool {
        self.peek().is_terminator()
            || matches!(self.peek_kind(), TokenKind::RightBrace | TokenKind::Eof)
    }

    fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.current += 1;
        }
        &self.tokens[self.current - 1]
    }

    fn current_span(&self) -> Span {
        self.peek().span
    }

    fn previous_span(&self) -> Span {
        self.tokens[self.current.saturating_sub(1)].span
    }

    fn skip_terminators(&mut self) {
        while self.peek().is_terminator() {
            self.advance();
        }
    }

    fn expect(&mut self, kind: TokenKind) -> Result<&Token, LughaError> {
        if self.check(&kind) {
            Ok(self.advance())
        } else if self.is_at_end() {
            Err(LughaError::UnexpectedEof {
                span: self.current_span(),
            })
        } else {
            Err(LughaError::UnexpectedToken {
                expected: kind.name().to_string(),
                found: self.peek_kind().name().to_string(),
                span: self.current_span(),
            })
        }
    }

    fn expect_terminator(&mut self) -> Result<(), LughaError> {
        if self.peek().is_terminator() {
            self.advance();
            Ok(())
        } else if self.is_at_end() {
            Ok(())
        } else {
            Err(LughaError::UnexpectedToken {
                expected: "newline or ';'".to_string(),
                found: self.peek_kind().name().to_string(),
                span: self.current_span(),
            })
        }
    }

    fn expect_identifier(&mut self) -> Result<String, LughaError> {
        if let TokenKind::Identifier(name) = self.peek_kind().clone() {
            self.advance();
            Ok(name)
        } else if self.is_at_end() {
            Err(LughaError::UnexpectedEof {
                span: self.current_span(),
            })
        } else {
            Err(LughaError::UnexpectedToken {
                expected: "identifier".to_string(),
                found: self.peek_kind().name().to_string(),
                span: self.current_span(),
            })
        }
    }

    fn error(&self, message: &str) -> LughaError {
        LughaError::ParseError {
            message: message.to_string(),
            span: self.current_span(),
        }
    }
}
