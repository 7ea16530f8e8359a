//! ABOUTME: Pratt parser — token stream to AST with correct precedence and associativity

use crate::ast::{
    ArrayLiteral, BlockStatement, BooleanLiteral, CallExpression, Expression, ExpressionStatement,
    FunctionLiteral, HashLiteral, Identifier, IfExpression, IndexExpression, InfixExpression,
    IntegerLiteral, LetStatement, MacroLiteral, PrefixExpression, Program, ReturnStatement,
    Statement, StringLiteral,
};
use crate::lexer::Lexer;
use crate::token::{Token, TokenKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Precedence {
    Lowest,
    Equals,
    LessGreater,
    Sum,
    Product,
    Prefix,
    Call,
}

fn precedence_of(kind: TokenKind) -> Precedence {
    match kind {
        TokenKind::Equal | TokenKind::NotEqual => Precedence::Equals,
        TokenKind::LessThan | TokenKind::GreaterThan => Precedence::LessGreater,
        TokenKind::Plus | TokenKind::Minus => Precedence::Sum,
        TokenKind::Slash | TokenKind::Asterisk => Precedence::Product,
        TokenKind::LParen | TokenKind::LBracket => Precedence::Call,
        _ => Precedence::Lowest,
    }
}

pub struct Parser {
    lexer: Lexer,
    current: Token,
    next: Token,
    errors: Vec<String>,
}

impl Parser {
    pub fn new(mut lexer: Lexer) -> Self {
        let current = lexer.next_token();
        let next = lexer.next_token();
        Parser {
            lexer,
            current,
            next,
            errors: Vec::new(),
        }
    }

    fn advance(&mut self) {
        self.current = std::mem::replace(&mut self.next, self.lexer.next_token());
    }

    fn add_error(&mut self, message: String) {
        self.errors.push(message);
    }

    fn invalid_next_token(&mut self, expected: TokenKind) {
        let message = format!(
            "[Error] Invalid next token type: received {} {}, expected {}",
            self.next.kind, self.next.literal, expected
        );
        self.add_error(message);
    }

    fn expect_next(&mut self, expected: TokenKind) -> bool {
        if self.next.kind == expected {
            self.advance();
            true
        } else {
            self.invalid_next_token(expected);
            false
        }
    }

    /// Parses the whole token stream, returning the program built so far
    /// and every parser error accumulated along the way. Parsing never
    /// aborts early; a statement that fails to parse is simply omitted.
    pub fn parse_program(&mut self) -> (Program, Vec<String>) {
        let mut statements = Vec::new();
        while self.current.kind != TokenKind::Eof {
            if let Some(statement) = self.parse_statement() {
                statements.push(statement);
            }
            self.advance();
        }
        (Program { statements }, std::mem::take(&mut self.errors))
    }

    fn parse_statement(&mut self) -> Option<Statement> {
        match self.current.kind {
            TokenKind::Let => self.parse_let_statement().map(Statement::Let),
            TokenKind::Return => self.parse_return_statement().map(Statement::Return),
            _ => self.parse_expression_statement().map(Statement::Expression),
        }
    }

    fn parse_let_statement(&mut self) -> Option<LetStatement> {
        let token = self.current.clone();

        if !self.expect_next(TokenKind::Identifier) {
            return None;
        }
        let name = Identifier {
            token: self.current.clone(),
            value: self.current.literal.clone(),
        };

        if !self.expect_next(TokenKind::Assign) {
            return None;
        }
        self.advance();

        let value = self.parse_expression(Precedence::Lowest)?;

        if self.next.kind == TokenKind::Semicolon {
            self.advance();
        }

        Some(LetStatement { token, name, value })
    }

    fn parse_return_statement(&mut self) -> Option<ReturnStatement> {
        let token = self.current.clone();
        self.advance();

        let value = self.parse_expression(Precedence::Lowest)?;

        if self.next.kind == TokenKind::Semicolon {
            self.advance();
        }

        Some(ReturnStatement { token, value })
    }

    fn parse_expression_statement(&mut self) -> Option<ExpressionStatement> {
        let token = self.current.clone();
        let value = self.parse_expression(Precedence::Lowest)?;

        if self.next.kind == TokenKind::Semicolon {
            self.advance();
        }

        Some(ExpressionStatement { token, value })
    }

    fn parse_block_statement(&mut self) -> BlockStatement {
        let token = self.current.clone();
        let mut statements = Vec::new();
        self.advance();

        while self.current.kind != TokenKind::RBrace && self.current.kind != TokenKind::Eof {
            if let Some(statement) = self.parse_statement() {
                statements.push(statement);
            }
            self.advance();
        }

        BlockStatement { token, statements }
    }

    fn parse_expression(&mut self, precedence: Precedence) -> Option<Expression> {
        let mut left = self.parse_prefix()?;

        while self.next.kind != TokenKind::Semicolon && precedence < precedence_of(self.next.kind)
        {
            self.advance();
            left = self.parse_infix(left)?;
        }

        Some(left)
    }

    fn parse_prefix(&mut self) -> Option<Expression> {
        match self.current.kind {
            TokenKind::Identifier => Some(Expression::Identifier(Identifier {
                token: self.current.clone(),
                value: self.current.literal.clone(),
            })),
            TokenKind::Int => self.parse_integer_literal(),
            TokenKind::String => Some(Expression::StringLiteral(StringLiteral {
                token: self.current.clone(),
                value: self.current.literal.clone(),
            })),
            TokenKind::True | TokenKind::False => Some(Expression::Boolean(BooleanLiteral {
                token: self.current.clone(),
                value: self.current.kind == TokenKind::True,
            })),
            TokenKind::Bang | TokenKind::Minus => self.parse_prefix_expression(),
            TokenKind::LParen => self.parse_grouped_expression(),
            TokenKind::If => self.parse_if_expression(),
            TokenKind::Function => self.parse_function_literal(),
            TokenKind::Macro => self.parse_macro_literal(),
            TokenKind::LBracket => self.parse_array_literal(),
            TokenKind::LBrace => self.parse_hash_literal(),
            other => {
                self.add_error(format!("[Error] Invalid prefix for {other}"));
                None
            }
        }
    }

    fn parse_infix(&mut self, left: Expression) -> Option<Expression> {
        match self.current.kind {
            TokenKind::Plus
            | TokenKind::Minus
            | TokenKind::Slash
            | TokenKind::Asterisk
            | TokenKind::Equal
            | TokenKind::NotEqual
            | TokenKind::LessThan
            | TokenKind::GreaterThan => self.parse_infix_expression(left),
            TokenKind::LParen => self.parse_call_expression(left),
            TokenKind::LBracket => self.parse_index_expression(left),
            _ => Some(left),
        }
    }

    fn parse_integer_literal(&mut self) -> Option<Expression> {
        let token = self.current.clone();
        match token.literal.parse::<i64>() {
            Ok(value) => Some(Expression::IntegerLiteral(IntegerLiteral { token, value })),
            Err(_) => {
                self.add_error(format!(
                    "[Error] Invalid token literal. Could not parse {} as int",
                    token.literal
                ));
                None
            }
        }
    }

    fn parse_prefix_expression(&mut self) -> Option<Expression> {
        let token = self.current.clone();
        let operator = token.literal.clone();
        self.advance();
        let right = self.parse_expression(Precedence::Prefix)?;
        Some(Expression::Prefix(PrefixExpression {
            token,
            operator,
            right: Box::new(right),
        }))
    }

    fn parse_infix_expression(&mut self, left: Expression) -> Option<Expression> {
        let token = self.current.clone();
        let operator = token.literal.clone();
        let precedence = precedence_of(self.current.kind);
        self.advance();
        let right = self.parse_expression(precedence)?;
        Some(Expression::Infix(InfixExpression {
            token,
            left: Box::new(left),
            operator,
            right: Box::new(right),
        }))
    }

    fn parse_grouped_expression(&mut self) -> Option<Expression> {
        self.advance();
        let expr = self.parse_expression(Precedence::Lowest)?;
        if !self.expect_next(TokenKind::RParen) {
            return None;
        }
        Some(expr)
    }

    fn parse_if_expression(&mut self) -> Option<Expression> {
        let token = self.current.clone();

        if !self.expect_next(TokenKind::LParen) {
            return None;
        }
        self.advance();
        let condition = self.parse_expression(Precedence::Lowest)?;

        if !self.expect_next(TokenKind::RParen) {
            return None;
        }
        if !self.expect_next(TokenKind::LBrace) {
            return None;
        }
        let consequence = self.parse_block_statement();

        let alternative = if self.next.kind == TokenKind::Else {
            self.advance();
            if !self.expect_next(TokenKind::LBrace) {
                return None;
            }
            Some(self.parse_block_statement())
        } else {
            None
        };

        Some(Expression::If(IfExpression {
            token,
            condition: Box::new(condition),
            consequence,
            alternative,
        }))
    }

    fn parse_function_parameters(&mut self) -> Option<Vec<Identifier>> {
        let mut params = Vec::new();

        if self.next.kind == TokenKind::RParen {
            self.advance();
            return Some(params);
        }

        self.advance();
        params.push(Identifier {
            token: self.current.clone(),
            value: self.current.literal.clone(),
        });

        while self.next.kind == TokenKind::Comma {
            self.advance();
            self.advance();
            params.push(Identifier {
                token: self.current.clone(),
                value: self.current.literal.clone(),
            });
        }

        if !self.expect_next(TokenKind::RParen) {
            return None;
        }

        Some(params)
    }

    fn parse_function_literal(&mut self) -> Option<Expression> {
        let token = self.current.clone();

        if !self.expect_next(TokenKind::LParen) {
            return None;
        }
        let parameters = self.parse_function_parameters()?;

        if !self.expect_next(TokenKind::LBrace) {
            return None;
        }
        let body = self.parse_block_statement();

        Some(Expression::FunctionLiteral(FunctionLiteral {
            token,
            parameters,
            body,
        }))
    }

    fn parse_macro_literal(&mut self) -> Option<Expression> {
        let token = self.current.clone();

        if !self.expect_next(TokenKind::LParen) {
            return None;
        }
        let parameters = self.parse_function_parameters()?;

        if !self.expect_next(TokenKind::LBrace) {
            return None;
        }
        let body = self.parse_block_statement();

        Some(Expression::MacroLiteral(MacroLiteral {
            token,
            parameters,
            body,
        }))
    }

    fn parse_expression_list(&mut self, end: TokenKind) -> Option<Vec<Expression>> {
        let mut list = Vec::new();

        if self.next.kind == end {
            self.advance();
            return Some(list);
        }

        self.advance();
        list.push(self.parse_expression(Precedence::Lowest)?);

        while self.next.kind == TokenKind::Comma {
            self.advance();
            self.advance();
            list.push(self.parse_expression(Precedence::Lowest)?);
        }

        if !self.expect_next(end) {
            return None;
        }

        Some(list)
    }

    fn parse_call_expression(&mut self, function: Expression) -> Option<Expression> {
        let token = self.current.clone();
        let arguments = self.parse_expression_list(TokenKind::RParen)?;
        Some(Expression::Call(CallExpression {
            token,
            function: Box::new(function),
            arguments,
        }))
    }

    fn parse_array_literal(&mut self) -> Option<Expression> {
        let token = self.current.clone();
        let elements = self.parse_expression_list(TokenKind::RBracket)?;
        Some(Expression::ArrayLiteral(ArrayLiteral { token, elements }))
    }

    fn parse_index_expression(&mut self, left: Expression) -> Option<Expression> {
        let token = self.current.clone();
        self.advance();
        let index = self.parse_expression(Precedence::Lowest)?;
        if !self.expect_next(TokenKind::RBracket) {
            return None;
        }
        Some(Expression::Index(IndexExpression {
            token,
            left: Box::new(left),
            index: Box::new(index),
        }))
    }

    fn parse_hash_literal(&mut self) -> Option<Expression> {
        let token = self.current.clone();
        let mut pairs = Vec::new();

        while self.next.kind != TokenKind::RBrace {
            self.advance();
            let key = self.parse_expression(Precedence::Lowest)?;

            if !self.expect_next(TokenKind::Colon) {
                return None;
            }
            self.advance();
            let value = self.parse_expression(Precedence::Lowest)?;

            pairs.push((key, value));

            if self.next.kind != TokenKind::RBrace && !self.expect_next(TokenKind::Comma) {
                return None;
            }
        }

        if !self.expect_next(TokenKind::RBrace) {
            return None;
        }

        Some(Expression::HashLiteral(HashLiteral { token, pairs }))
    }
}
