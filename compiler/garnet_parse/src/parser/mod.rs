//! Recursive descent parser.
//!
//! Produces the raw tree: sugar assignments are kept as `OpAssign`, bare
//! identifiers as `UnresolvedIdent`, constants as `UnresolvedConstant`. Names
//! are interned as they are read, so the caller must hold the names table
//! unfrozen.
//!
//! Errors never abort the file. The failing statement is dropped and parsing
//! resumes at the next line.

mod cursor;

use garnet_core::GlobalState;
use garnet_diagnostic::{Diagnostic, ErrorCode};
use garnet_ir::{
    AssignOp, ClassDef, ClassKind, Expr, ExprKind, FileRef, IdentKind, Literal, Loc, MethodDef,
    NameRef, Param, Send, Span, SymbolRef,
};

use crate::lexer::{tokenize, Lexed, Token};
use cursor::Cursor;

/// Result of parsing one file.
#[derive(Debug)]
pub struct ParseOutput {
    pub tree: Expr,
    pub errors: Vec<Diagnostic>,
}

impl ParseOutput {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Parse the current text of `file`.
pub fn parse_file(gs: &mut GlobalState, file: FileRef) -> ParseOutput {
    let source = gs.file(file).source_arc();
    let mut errors = Vec::new();
    let tokens = tokenize(&source, file, &mut errors);
    let mut parser = Parser {
        cursor: Cursor::new(&source, tokens),
        gs,
        file,
        errors,
    };
    let tree = parser.parse_program();
    ParseOutput {
        tree,
        errors: parser.errors,
    }
}

struct Parser<'a, 'gs> {
    cursor: Cursor<'a>,
    gs: &'gs mut GlobalState,
    file: FileRef,
    errors: Vec<Diagnostic>,
}

impl Parser<'_, '_> {
    fn parse_program(&mut self) -> Expr {
        let stmts = self.parse_stmts(&[]);
        let end = self.cursor.current_span().end;
        Expr::seq(stmts, Span::new(0, end))
    }

    // Names

    fn intern(&mut self, span: Span) -> NameRef {
        let text = self.cursor.text(span);
        self.gs.enter_name_utf8(text)
    }

    fn intern_str(&mut self, text: &str) -> NameRef {
        self.gs.enter_name_utf8(text)
    }

    fn intern_constant(&mut self, span: Span) -> NameRef {
        let utf8 = self.intern(span);
        self.gs.enter_name_constant(utf8)
    }

    // Errors

    fn error(&mut self, code: ErrorCode, message: String, span: Span) {
        self.errors.push(
            Diagnostic::error(code)
                .with_message(message)
                .at(Loc::new(self.file, span)),
        );
    }

    fn unexpected(&mut self, expected: &str) {
        let current = self.cursor.current();
        let found = self.cursor.describe(current);
        self.error(
            ErrorCode::E1001,
            format!("Unexpected {found}, expected {expected}"),
            current.span,
        );
    }

    fn expect(&mut self, token: Token, expected: &str) -> Option<Span> {
        if self.cursor.check(token) {
            Some(self.cursor.bump().span)
        } else {
            self.unexpected(expected);
            None
        }
    }

    /// Consume the `end` closing a construct opened at `opener`.
    fn expect_end(&mut self, keyword: &str, opener: Span) -> Span {
        if self.cursor.check(Token::End) {
            return self.cursor.bump().span;
        }
        self.error(
            ErrorCode::E1003,
            format!("Missing `end` for `{keyword}`"),
            opener,
        );
        Span::point(self.cursor.previous_end())
    }

    // Statements

    /// Parse statements until one of `stops` (or end of file) is reached.
    fn parse_stmts(&mut self, stops: &[Token]) -> Vec<Expr> {
        let mut stmts = Vec::new();
        loop {
            self.cursor.skip_terminators();
            let token = self.cursor.peek();
            if token == Token::Eof || stops.contains(&token) {
                break;
            }
            let before = self.cursor.position();
            if let Some(stmt) = self.parse_stmt() {
                stmts.push(stmt);
                let next = self.cursor.peek();
                if !next.is_terminator() && !stops.contains(&next) {
                    self.unexpected("end of statement");
                    self.cursor.recover();
                }
            } else {
                self.cursor.recover();
            }
            if self.cursor.position() == before {
                self.cursor.bump();
            }
        }
        stmts
    }

    /// Statements until a stop token, as one expression.
    fn parse_body(&mut self, stops: &[Token]) -> Expr {
        let stmts = self.parse_stmts(stops);
        let span = stmts
            .iter()
            .fold(Span::NONE, |acc, stmt| acc.merge(stmt.span));
        Expr::seq(stmts, span)
    }

    fn parse_stmt(&mut self) -> Option<Expr> {
        match self.cursor.peek() {
            Token::Class => self.parse_class(ClassKind::Class),
            Token::Module => self.parse_class(ClassKind::Module),
            Token::Def => self.parse_def(),
            Token::Return => {
                let keyword = self.cursor.bump().span;
                let value = if self.cursor.peek().is_terminator()
                    || matches!(self.cursor.peek(), Token::End | Token::Else | Token::Elsif)
                {
                    Expr::empty()
                } else {
                    self.parse_expr()?
                };
                let span = keyword.merge(value.span);
                Some(Expr::new(ExprKind::Return(Box::new(value)), span))
            }
            _ => self.parse_expr_stmt(),
        }
    }

    fn parse_class(&mut self, kind: ClassKind) -> Option<Expr> {
        let keyword = self.cursor.bump().span;
        let name = self.parse_constant_path()?;
        let superclass = if kind == ClassKind::Class && self.cursor.eat(Token::Lt) {
            Some(self.parse_expr()?)
        } else {
            None
        };
        let decl_span = Span::new(keyword.start, self.cursor.previous_end());
        let body = self.parse_stmts(&[Token::End]);
        let label = match kind {
            ClassKind::Class => "class",
            ClassKind::Module => "module",
        };
        let end = self.expect_end(label, keyword);
        let class = ClassDef {
            kind,
            decl_span,
            name,
            superclass,
            body,
            symbol: SymbolRef::NONE,
        };
        Some(Expr::new(ExprKind::ClassDef(Box::new(class)), keyword.merge(end)))
    }

    fn parse_def(&mut self) -> Option<Expr> {
        let keyword = self.cursor.bump().span;
        let is_self_method = self.cursor.check(Token::SelfKw) && self.cursor.peek_nth(1) == Token::Dot;
        if is_self_method {
            self.cursor.bump();
            self.cursor.bump();
        }
        let name = self.parse_method_name()?;

        let mut params = Vec::new();
        if self.cursor.eat(Token::LParen) {
            if !self.cursor.check(Token::RParen) {
                self.parse_params(&mut params)?;
            }
            self.expect(Token::RParen, "`)`")?;
        } else if self.cursor.check(Token::Ident) {
            self.parse_params(&mut params)?;
        }
        let decl_span = Span::new(keyword.start, self.cursor.previous_end());

        let body = self.parse_body(&[Token::End]);
        let end = self.expect_end("def", keyword);
        let method = MethodDef {
            decl_span,
            name,
            params,
            body,
            is_self_method,
            synthetic: false,
            symbol: SymbolRef::NONE,
        };
        Some(Expr::new(ExprKind::MethodDef(Box::new(method)), keyword.merge(end)))
    }

    /// A method name after `def`, including setters (`name=`) and operators.
    fn parse_method_name(&mut self) -> Option<NameRef> {
        let current = self.cursor.current();
        match current.token {
            Token::Ident | Token::Constant => {
                self.cursor.bump();
                let next = self.cursor.current();
                if next.token == Token::Eq && next.span.start == current.span.end {
                    self.cursor.bump();
                    let text = format!("{}=", self.cursor.text(current.span));
                    Some(self.intern_str(&text))
                } else {
                    Some(self.intern(current.span))
                }
            }
            Token::Plus
            | Token::Minus
            | Token::Star
            | Token::Slash
            | Token::EqEq
            | Token::NotEq
            | Token::Lt
            | Token::LtEq
            | Token::Gt
            | Token::GtEq
            | Token::Bang => {
                self.cursor.bump();
                Some(self.intern(current.span))
            }
            _ => {
                let found = self.cursor.describe(current);
                self.error(
                    ErrorCode::E1004,
                    format!("Expected a method name, found {found}"),
                    current.span,
                );
                None
            }
        }
    }

    fn parse_params(&mut self, params: &mut Vec<Param>) -> Option<()> {
        loop {
            let span = self.expect(Token::Ident, "a parameter name")?;
            let name = self.intern(span);
            params.push(Param { name, span });
            if !self.cursor.eat(Token::Comma) {
                return Some(());
            }
        }
    }

    /// An expression, or an assignment to one.
    fn parse_expr_stmt(&mut self) -> Option<Expr> {
        let lhs = self.parse_expr()?;
        let op = match self.cursor.peek() {
            Token::Eq => None,
            Token::OrAssign => Some(AssignOp::Or),
            Token::AndAssign => Some(AssignOp::And),
            Token::PlusAssign => Some(AssignOp::Add),
            _ => return Some(lhs),
        };
        if !is_assignable(&lhs) {
            self.error(
                ErrorCode::E1001,
                "Cannot assign to this expression".to_owned(),
                lhs.span,
            );
            return None;
        }
        self.cursor.bump();
        self.cursor.skip_newlines();
        let rhs = self.parse_expr_stmt()?;
        let span = lhs.span.merge(rhs.span);

        let kind = match op {
            Some(op) => ExprKind::OpAssign {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            },
            None => match lhs.kind {
                ExprKind::Send(send) => {
                    let text = format!("{}=", self.gs.short_name(send.fun));
                    let fun = self.intern_str(&text);
                    ExprKind::Send(Box::new(Send {
                        recv: send.recv,
                        fun,
                        fun_span: send.fun_span,
                        args: vec![rhs],
                        implicit_self: false,
                    }))
                }
                kind => ExprKind::Assign {
                    lhs: Box::new(Expr::new(kind, lhs.span)),
                    rhs: Box::new(rhs),
                },
            },
        };
        Some(Expr::new(kind, span))
    }

    // Expressions, lowest precedence first

    fn parse_expr(&mut self) -> Option<Expr> {
        self.parse_or()
    }

    fn parse_or(&mut self) -> Option<Expr> {
        let mut lhs = self.parse_and()?;
        while self.cursor.eat(Token::OrOr) {
            self.cursor.skip_newlines();
            let rhs = self.parse_and()?;
            let span = lhs.span.merge(rhs.span);
            // a || b  =>  if a then a else b
            lhs = Expr::new(
                ExprKind::If {
                    cond: Box::new(lhs.clone()),
                    then_branch: Box::new(lhs),
                    else_branch: Box::new(rhs),
                },
                span,
            );
        }
        Some(lhs)
    }

    fn parse_and(&mut self) -> Option<Expr> {
        let mut lhs = self.parse_binary(0)?;
        while self.cursor.eat(Token::AndAnd) {
            self.cursor.skip_newlines();
            let rhs = self.parse_binary(0)?;
            let span = lhs.span.merge(rhs.span);
            // a && b  =>  if a then b else a
            lhs = Expr::new(
                ExprKind::If {
                    cond: Box::new(lhs.clone()),
                    then_branch: Box::new(rhs),
                    else_branch: Box::new(lhs),
                },
                span,
            );
        }
        Some(lhs)
    }

    /// Binary operators as sends, by precedence level.
    fn parse_binary(&mut self, level: usize) -> Option<Expr> {
        const LEVELS: [&[Token]; 4] = [
            &[Token::EqEq, Token::NotEq],
            &[Token::Lt, Token::LtEq, Token::Gt, Token::GtEq],
            &[Token::Plus, Token::Minus],
            &[Token::Star, Token::Slash],
        ];
        let Some(ops) = LEVELS.get(level) else {
            return self.parse_unary();
        };
        let mut lhs = self.parse_binary(level + 1)?;
        while ops.contains(&self.cursor.peek()) {
            let op = self.cursor.bump();
            self.cursor.skip_newlines();
            let rhs = self.parse_binary(level + 1)?;
            lhs = self.binary_send(lhs, op, rhs);
        }
        Some(lhs)
    }

    fn binary_send(&mut self, lhs: Expr, op: Lexed, rhs: Expr) -> Expr {
        let fun = self.intern(op.span);
        let span = lhs.span.merge(rhs.span);
        let send = Send {
            recv: lhs,
            fun,
            fun_span: op.span,
            args: vec![rhs],
            implicit_self: false,
        };
        Expr::new(ExprKind::Send(Box::new(send)), span)
    }

    fn parse_unary(&mut self) -> Option<Expr> {
        let current = self.cursor.current();
        match current.token {
            Token::Bang => {
                self.cursor.bump();
                let operand = self.parse_unary()?;
                let fun = self.intern(current.span);
                let span = current.span.merge(operand.span);
                let send = Send {
                    recv: operand,
                    fun,
                    fun_span: current.span,
                    args: Vec::new(),
                    implicit_self: false,
                };
                Some(Expr::new(ExprKind::Send(Box::new(send)), span))
            }
            Token::Minus if self.cursor.peek_nth(1) == Token::Int => {
                self.cursor.bump();
                let int = self.cursor.bump();
                let span = current.span.merge(int.span);
                let value = self.int_value(int.span, true)?;
                Some(Expr::new(ExprKind::Literal(Literal::Int(value)), span))
            }
            _ => self.parse_postfix(),
        }
    }

    fn parse_postfix(&mut self) -> Option<Expr> {
        let mut expr = self.parse_primary()?;
        loop {
            if self.cursor.check(Token::Dot) {
                self.cursor.bump();
                self.cursor.skip_newlines();
                let name_tok = self.cursor.current();
                if !matches!(name_tok.token, Token::Ident | Token::Constant) {
                    self.unexpected("a method name");
                    return None;
                }
                self.cursor.bump();
                let fun = self.intern(name_tok.span);
                let args = self.parse_call_args()?.unwrap_or_default();
                let span = Span::new(expr.span.start, self.cursor.previous_end());
                let send = Send {
                    recv: expr,
                    fun,
                    fun_span: name_tok.span,
                    args,
                    implicit_self: false,
                };
                expr = Expr::new(ExprKind::Send(Box::new(send)), span);
            } else {
                return Some(expr);
            }
        }
    }

    /// Arguments of a call: parenthesized, or written bare up to the end
    /// of the line. `Some(None)` when there is no argument list.
    fn parse_call_args(&mut self) -> Option<Option<Vec<Expr>>> {
        if self.cursor.eat(Token::LParen) {
            let mut args = Vec::new();
            self.cursor.skip_newlines();
            if !self.cursor.check(Token::RParen) {
                loop {
                    args.push(self.parse_expr()?);
                    self.cursor.skip_newlines();
                    if !self.cursor.eat(Token::Comma) {
                        break;
                    }
                    self.cursor.skip_newlines();
                }
            }
            self.expect(Token::RParen, "`)`")?;
            return Some(Some(args));
        }
        if self.cursor.peek().starts_command_arg() {
            let mut args = vec![self.parse_expr()?];
            while self.cursor.eat(Token::Comma) {
                self.cursor.skip_newlines();
                args.push(self.parse_expr()?);
            }
            return Some(Some(args));
        }
        Some(None)
    }

    fn parse_primary(&mut self) -> Option<Expr> {
        let current = self.cursor.current();
        let span = current.span;
        let kind = match current.token {
            Token::Int => {
                self.cursor.bump();
                ExprKind::Literal(Literal::Int(self.int_value(span, false)?))
            }
            Token::Str => {
                self.cursor.bump();
                let inner = Span::new(span.start + 1, span.end - 1);
                ExprKind::Literal(Literal::String(self.intern(inner)))
            }
            Token::Symbol => {
                self.cursor.bump();
                let inner = Span::new(span.start + 1, span.end);
                ExprKind::Literal(Literal::Symbol(self.intern(inner)))
            }
            Token::Nil => {
                self.cursor.bump();
                ExprKind::Literal(Literal::Nil)
            }
            Token::True => {
                self.cursor.bump();
                ExprKind::Literal(Literal::True)
            }
            Token::False => {
                self.cursor.bump();
                ExprKind::Literal(Literal::False)
            }
            Token::SelfKw => {
                self.cursor.bump();
                ExprKind::SelfRef
            }
            Token::InstanceVar | Token::ClassVar | Token::GlobalVar => {
                self.cursor.bump();
                let kind = match current.token {
                    Token::InstanceVar => IdentKind::Instance,
                    Token::ClassVar => IdentKind::Class,
                    _ => IdentKind::Global,
                };
                ExprKind::UnresolvedIdent {
                    kind,
                    name: self.intern(span),
                }
            }
            Token::Constant | Token::ColonColon => return self.parse_constant_path(),
            Token::Ident => {
                self.cursor.bump();
                let name = self.intern(span);
                return match self.parse_call_args()? {
                    Some(args) => {
                        let send = Send {
                            recv: Expr::new(ExprKind::SelfRef, Span::point(span.start)),
                            fun: name,
                            fun_span: span,
                            args,
                            implicit_self: true,
                        };
                        let full = Span::new(span.start, self.cursor.previous_end());
                        Some(Expr::new(ExprKind::Send(Box::new(send)), full))
                    }
                    None => Some(Expr::new(
                        ExprKind::UnresolvedIdent {
                            kind: IdentKind::Local,
                            name,
                        },
                        span,
                    )),
                };
            }
            Token::LParen => {
                self.cursor.bump();
                self.cursor.skip_newlines();
                let inner = self.parse_expr_stmt()?;
                self.cursor.skip_newlines();
                self.expect(Token::RParen, "`)`")?;
                return Some(inner);
            }
            Token::If => {
                let keyword = self.cursor.bump().span;
                let expr = self.parse_if_clauses(keyword, false)?;
                let end = self.expect_end("if", keyword);
                return Some(Expr::new(expr.kind, keyword.merge(end)));
            }
            Token::Unless => {
                let keyword = self.cursor.bump().span;
                let expr = self.parse_if_clauses(keyword, true)?;
                let end = self.expect_end("unless", keyword);
                return Some(Expr::new(expr.kind, keyword.merge(end)));
            }
            _ => {
                let found = self.cursor.describe(current);
                self.error(
                    ErrorCode::E1002,
                    format!("Expected an expression, found {found}"),
                    span,
                );
                return None;
            }
        };
        Some(Expr::new(kind, span))
    }

    /// Everything of an `if`/`elsif`/`unless` after the keyword, up to but
    /// not including the shared `end`.
    fn parse_if_clauses(&mut self, keyword: Span, negated: bool) -> Option<Expr> {
        let cond = self.parse_expr_stmt()?;
        self.cursor.eat(Token::Then);
        let body = self.parse_body(&[Token::Elsif, Token::Else, Token::End]);
        let rest = if !negated && self.cursor.check(Token::Elsif) {
            let elsif = self.cursor.bump().span;
            self.parse_if_clauses(elsif, false)?
        } else if self.cursor.eat(Token::Else) {
            self.parse_body(&[Token::End])
        } else {
            Expr::empty()
        };
        let (then_branch, else_branch) = if negated { (rest, body) } else { (body, rest) };
        let span = Span::new(keyword.start, self.cursor.previous_end());
        Some(Expr::new(
            ExprKind::If {
                cond: Box::new(cond),
                then_branch: Box::new(then_branch),
                else_branch: Box::new(else_branch),
            },
            span,
        ))
    }

    /// `Name`, `A::B::C`, `::Name`.
    fn parse_constant_path(&mut self) -> Option<Expr> {
        let start = self.cursor.current_span().start;
        let mut scope = if self.cursor.check(Token::ColonColon) {
            let span = self.cursor.bump().span;
            Expr::new(ExprKind::RootScope, span)
        } else {
            Expr::empty()
        };
        loop {
            let current = self.cursor.current();
            if current.token != Token::Constant {
                let found = self.cursor.describe(current);
                self.error(
                    ErrorCode::E1004,
                    format!("Expected a constant name, found {found}"),
                    current.span,
                );
                return None;
            }
            self.cursor.bump();
            let name = self.intern_constant(current.span);
            let expr = Expr::new(
                ExprKind::UnresolvedConstant {
                    scope: Box::new(scope),
                    name,
                },
                Span::new(start, current.span.end),
            );
            if self.cursor.check(Token::ColonColon) && self.cursor.peek_nth(1) == Token::Constant {
                self.cursor.bump();
                scope = expr;
            } else {
                return Some(expr);
            }
        }
    }

    fn int_value(&mut self, span: Span, negative: bool) -> Option<i64> {
        let text = self.cursor.text(span);
        let parsed = if negative {
            format!("-{text}").parse::<i64>()
        } else {
            text.parse::<i64>()
        };
        match parsed {
            Ok(value) => Some(value),
            Err(_) => {
                self.error(
                    ErrorCode::E1001,
                    "Integer literal is too large".to_owned(),
                    span,
                );
                None
            }
        }
    }
}

fn is_assignable(expr: &Expr) -> bool {
    match &expr.kind {
        ExprKind::UnresolvedIdent { .. } | ExprKind::UnresolvedConstant { .. } => true,
        ExprKind::Send(send) => !send.implicit_self && send.args.is_empty(),
        _ => false,
    }
}
