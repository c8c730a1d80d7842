// ABOUTME: Recursive-descent parser building an AST from a token stream

use crate::ast::{BinaryOp, Expression, Program, Statement};
use crate::error::ParseError;
use crate::lexer::{Token, TokenKind};

pub struct Parser {
    tokens: Vec<Token>,
    current: usize,
}

type PResult<T> = Result<T, ParseError>;

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, current: 0 }
    }

    pub fn parse_program(mut self) -> PResult<Program> {
        let mut statements = Vec::new();
        self.skip_newlines();
        while !self.check(TokenKind::Eof) {
            statements.push(self.parse_statement()?);
            self.skip_statement_end();
        }
        Ok(statements)
    }

    // -- token stream helpers ------------------------------------------------

    fn peek(&self) -> &Token {
        &self.tokens[self.current]
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    fn advance(&mut self) -> Token {
        let token = self.tokens[self.current].clone();
        if self.current + 1 < self.tokens.len() {
            self.current += 1;
        }
        token
    }

    fn matches(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: TokenKind, expected: &str) -> PResult<Token> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            let found = self.peek();
            Err(ParseError::UnexpectedToken {
                expected: expected.to_string(),
                found: found.lexeme.clone(),
                line: found.line,
            })
        }
    }

    fn skip_newlines(&mut self) {
        while self.matches(TokenKind::Newline) {}
    }

    /// Newlines and semicolons both act as soft statement terminators.
    fn skip_statement_end(&mut self) {
        while self.matches(TokenKind::Newline) || self.matches(TokenKind::Semicolon) {}
    }

    // -- statements -----------------------------------------------------------

    fn parse_statement(&mut self) -> PResult<Statement> {
        match self.peek().kind {
            TokenKind::Ef => self.parse_fn_decl(),
            TokenKind::If => self.parse_if(),
            TokenKind::While => self.parse_while(),
            TokenKind::Ret => self.parse_return(),
            TokenKind::Ec => self.parse_system_call(),
            TokenKind::Import => self.parse_import(),
            TokenKind::New => self.parse_new_variable(),
            TokenKind::Save => self.parse_save(),
            TokenKind::Message => self.parse_message(),
            TokenKind::Identifier if self.peek_is_assign() => self.parse_assign(),
            _ => Ok(Statement::ExprStmt(self.parse_expression()?)),
        }
    }

    fn peek_is_assign(&self) -> bool {
        self.tokens
            .get(self.current + 1)
            .map(|t| t.kind == TokenKind::Assign)
            .unwrap_or(false)
    }

    fn parse_fn_decl(&mut self) -> PResult<Statement> {
        self.expect(TokenKind::Ef, "'ef'")?;
        let name = self.expect(TokenKind::Identifier, "function name")?.lexeme;
        self.expect(TokenKind::LParen, "'('")?;
        let parameters = self.parse_param_list()?;
        self.expect(TokenKind::RParen, "')'")?;
        let body = self.parse_block()?;
        Ok(Statement::FunctionDecl { name, parameters, body })
    }

    fn parse_param_list(&mut self) -> PResult<Vec<String>> {
        let mut params = Vec::new();
        if self.check(TokenKind::RParen) {
            return Ok(params);
        }
        loop {
            params.push(self.expect(TokenKind::Identifier, "parameter name")?.lexeme);
            if !self.matches(TokenKind::Comma) {
                break;
            }
        }
        Ok(params)
    }

    fn parse_block(&mut self) -> PResult<Vec<Statement>> {
        self.expect(TokenKind::LBrace, "'{'")?;
        self.skip_newlines();
        let mut statements = Vec::new();
        while !self.check(TokenKind::RBrace) {
            statements.push(self.parse_statement()?);
            self.skip_statement_end();
        }
        self.expect(TokenKind::RBrace, "'}'")?;
        Ok(statements)
    }

    fn parse_if(&mut self) -> PResult<Statement> {
        self.expect(TokenKind::If, "'if'")?;
        self.expect(TokenKind::LParen, "'('")?;
        let condition = self.parse_expression()?;
        self.expect(TokenKind::RParen, "')'")?;
        let then_block = self.parse_block()?;

        let saved = self.current;
        self.skip_newlines();
        let else_block = if self.matches(TokenKind::Diff) {
            if self.check(TokenKind::If) {
                Some(vec![self.parse_if()?])
            } else {
                Some(self.parse_block()?)
            }
        } else {
            self.current = saved;
            None
        };

        Ok(Statement::If { condition, then_block, else_block })
    }

    fn parse_while(&mut self) -> PResult<Statement> {
        self.expect(TokenKind::While, "'while'")?;
        self.expect(TokenKind::LParen, "'('")?;
        let condition = self.parse_expression()?;
        self.expect(TokenKind::RParen, "')'")?;
        let body = self.parse_block()?;
        Ok(Statement::While { condition, body })
    }

    fn parse_return(&mut self) -> PResult<Statement> {
        self.expect(TokenKind::Ret, "'ret'")?;
        if self.at_statement_end() {
            Ok(Statement::Return(None))
        } else {
            Ok(Statement::Return(Some(self.parse_expression()?)))
        }
    }

    fn at_statement_end(&self) -> bool {
        matches!(
            self.peek().kind,
            TokenKind::Newline | TokenKind::Semicolon | TokenKind::Eof | TokenKind::RBrace
        )
    }

    fn parse_system_call(&mut self) -> PResult<Statement> {
        self.expect(TokenKind::Ec, "'ec'")?;
        self.expect(TokenKind::LParen, "'('")?;
        let command = self.parse_expression()?;
        self.expect(TokenKind::RParen, "')'")?;
        Ok(Statement::SystemCall(command))
    }

    fn parse_import(&mut self) -> PResult<Statement> {
        self.expect(TokenKind::Import, "'^'")?;
        let name = self.expect(TokenKind::Identifier, "library name")?.lexeme;
        Ok(Statement::Import(name))
    }

    fn parse_new_variable(&mut self) -> PResult<Statement> {
        self.expect(TokenKind::New, "'new'")?;
        let name = self.expect(TokenKind::Identifier, "variable name")?.lexeme;
        self.expect(TokenKind::Assign, "'='")?;
        let value = self.parse_expression()?;
        Ok(Statement::NewVariable { name, value })
    }

    fn parse_assign(&mut self) -> PResult<Statement> {
        let name = self.expect(TokenKind::Identifier, "identifier")?.lexeme;
        self.expect(TokenKind::Assign, "'='")?;
        let value = self.parse_expression()?;
        Ok(Statement::Assign { name, value })
    }

    fn parse_save(&mut self) -> PResult<Statement> {
        self.expect(TokenKind::Save, "'Save'")?;
        self.expect(TokenKind::LParen, "'('")?;
        let name = self.expect(TokenKind::Identifier, "slot name")?.lexeme;
        self.expect(TokenKind::RParen, "')'")?;
        Ok(Statement::Save(name))
    }

    fn parse_message(&mut self) -> PResult<Statement> {
        self.expect(TokenKind::Message, "'Message'")?;
        self.expect(TokenKind::LParen, "'('")?;
        let slot = self.expect(TokenKind::Identifier, "slot name")?.lexeme;
        self.expect(TokenKind::RParen, "')'")?;
        self.expect(TokenKind::Assign, "'='")?;
        let value = self.parse_expression()?;
        Ok(Statement::Message { slot, value })
    }

    // -- expressions: precedence ladder ---------------------------------------

    fn parse_expression(&mut self) -> PResult<Expression> {
        self.parse_comparison()
    }

    fn parse_comparison(&mut self) -> PResult<Expression> {
        let mut left = self.parse_term()?;
        loop {
            let op = match self.peek().kind {
                TokenKind::Equal => BinaryOp::Eq,
                TokenKind::NotEqual => BinaryOp::NotEq,
                TokenKind::Less => BinaryOp::Less,
                TokenKind::Greater => BinaryOp::Greater,
                TokenKind::LessEqual => BinaryOp::LessEq,
                TokenKind::GreaterEqual => BinaryOp::GreaterEq,
                _ => break,
            };
            self.advance();
            let right = self.parse_term()?;
            left = Expression::Binary { left: Box::new(left), op, right: Box::new(right) };
        }
        Ok(left)
    }

    fn parse_term(&mut self) -> PResult<Expression> {
        let mut left = self.parse_factor()?;
        loop {
            let op = match self.peek().kind {
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::Minus => BinaryOp::Sub,
                _ => break,
            };
            self.advance();
            let right = self.parse_factor()?;
            left = Expression::Binary { left: Box::new(left), op, right: Box::new(right) };
        }
        Ok(left)
    }

    fn parse_factor(&mut self) -> PResult<Expression> {
        let mut left = self.parse_postfix()?;
        loop {
            let op = match self.peek().kind {
                TokenKind::Star => BinaryOp::Mul,
                TokenKind::Slash => BinaryOp::Div,
                TokenKind::Percent => BinaryOp::Mod,
                _ => break,
            };
            self.advance();
            let right = self.parse_postfix()?;
            left = Expression::Binary { left: Box::new(left), op, right: Box::new(right) };
        }
        Ok(left)
    }

    fn parse_postfix(&mut self) -> PResult<Expression> {
        let mut expr = self.parse_primary()?;
        loop {
            match self.peek().kind {
                TokenKind::Dot => {
                    self.advance();
                    let name = self.expect(TokenKind::Identifier, "property name")?.lexeme;
                    if self.matches(TokenKind::LParen) {
                        let arguments = self.parse_arg_list()?;
                        self.expect(TokenKind::RParen, "')'")?;
                        expr = Expression::MethodCall {
                            receiver: Box::new(expr),
                            method: name,
                            arguments,
                        };
                    } else {
                        expr = Expression::Member { object: Box::new(expr), property: name };
                    }
                }
                TokenKind::LBracket => {
                    self.advance();
                    let index = self.parse_expression()?;
                    self.expect(TokenKind::RBracket, "']'")?;
                    expr = Expression::Index { object: Box::new(expr), index: Box::new(index) };
                }
                TokenKind::LParen => {
                    // Only a bare identifier primary can be called.
                    let Expression::Identifier(name) = expr else {
                        break;
                    };
                    self.advance();
                    let arguments = self.parse_arg_list()?;
                    self.expect(TokenKind::RParen, "')'")?;
                    expr = Expression::Call { function: name, arguments };
                }
                _ => break,
            }
        }
        Ok(expr)
    }

    fn parse_arg_list(&mut self) -> PResult<Vec<Expression>> {
        let mut args = Vec::new();
        if self.check(TokenKind::RParen) {
            return Ok(args);
        }
        loop {
            args.push(self.parse_expression()?);
            if !self.matches(TokenKind::Comma) {
                break;
            }
        }
        Ok(args)
    }

    fn parse_primary(&mut self) -> PResult<Expression> {
        let token = self.peek().clone();
        match token.kind {
            TokenKind::Number => {
                self.advance();
                let n: f64 = token.lexeme.parse().map_err(|_| ParseError::InvalidNumber {
                    text: token.lexeme.clone(),
                    line: token.line,
                })?;
                Ok(Expression::Number(n))
            }
            TokenKind::String => {
                self.advance();
                self.parse_string_or_interpolation(token.lexeme)
            }
            TokenKind::LBracket => self.parse_array(),
            TokenKind::LBrace => self.parse_object(),
            TokenKind::Ef => self.parse_function_literal(),
            TokenKind::Typeof => {
                self.advance();
                self.expect(TokenKind::LParen, "'('")?;
                let inner = self.parse_expression()?;
                self.expect(TokenKind::RParen, "')'")?;
                Ok(Expression::Typeof(Box::new(inner)))
            }
            TokenKind::Identifier if token.lexeme == "c" && self.peek_at(1).kind == TokenKind::At => {
                self.parse_color_string()
            }
            TokenKind::Identifier => {
                self.advance();
                Ok(Expression::Identifier(token.lexeme))
            }
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_expression()?;
                self.expect(TokenKind::RParen, "')'")?;
                Ok(inner)
            }
            _ => Err(ParseError::UnexpectedToken {
                expected: "expression".to_string(),
                found: token.lexeme,
                line: token.line,
            }),
        }
    }

    fn peek_at(&self, offset: usize) -> &Token {
        self.tokens
            .get(self.current + offset)
            .unwrap_or_else(|| self.tokens.last().unwrap())
    }

    fn parse_color_string(&mut self) -> PResult<Expression> {
        self.advance(); // 'c'
        self.expect(TokenKind::At, "'@'")?;
        let color = self.expect(TokenKind::Identifier, "color name")?.lexeme;
        let text_token = self.expect(TokenKind::String, "string literal")?;
        Ok(Expression::ColorString { color, text: text_token.lexeme })
    }

    fn parse_array(&mut self) -> PResult<Expression> {
        self.expect(TokenKind::LBracket, "'['")?;
        self.skip_newlines();
        let mut items = Vec::new();
        if !self.check(TokenKind::RBracket) {
            loop {
                self.skip_newlines();
                items.push(self.parse_expression()?);
                self.skip_newlines();
                if !self.matches(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.skip_newlines();
        self.expect(TokenKind::RBracket, "']'")?;
        Ok(Expression::Array(items))
    }

    fn parse_object(&mut self) -> PResult<Expression> {
        self.expect(TokenKind::LBrace, "'{'")?;
        self.skip_newlines();
        let mut entries = Vec::new();
        if !self.check(TokenKind::RBrace) {
            loop {
                self.skip_newlines();
                let key = self.expect(TokenKind::Identifier, "property name")?.lexeme;
                self.expect(TokenKind::Colon, "':'")?;
                let value = self.parse_expression()?;
                entries.push((key, value));
                self.skip_newlines();
                if !self.matches(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.skip_newlines();
        self.expect(TokenKind::RBrace, "'}'")?;
        Ok(Expression::Object(entries))
    }

    fn parse_function_literal(&mut self) -> PResult<Expression> {
        self.expect(TokenKind::Ef, "'ef'")?;
        self.expect(TokenKind::LParen, "'('")?;
        let parameters = self.parse_param_list()?;
        self.expect(TokenKind::RParen, "')'")?;
        let body = self.parse_block()?;
        Ok(Expression::Function { parameters, body })
    }

    /// A string literal becomes an `Interpolation` if `<<` appears before any
    /// of `, ) ; newline`.
    fn parse_string_or_interpolation(&mut self, first: String) -> PResult<Expression> {
        if !self.check(TokenKind::InterpolateStart) {
            return Ok(Expression::String(first));
        }

        let mut parts = vec![Expression::String(first)];
        while self.matches(TokenKind::InterpolateStart) {
            let inner = self.parse_expression()?;
            self.expect(TokenKind::InterpolateEnd, "'>>'")?;
            parts.push(inner);
            if self.check(TokenKind::String) {
                let next = self.advance().lexeme;
                parts.push(Expression::String(next));
            }
        }
        Ok(Expression::Interpolation(parts))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;

    fn parse(src: &str) -> Program {
        let tokens = Lexer::new(src).tokenize().unwrap();
        Parser::new(tokens).parse_program().unwrap()
    }

    #[test]
    fn test_new_variable() {
        let program = parse("new x = 5");
        assert_eq!(
            program,
            vec![Statement::NewVariable { name: "x".into(), value: Expression::Number(5.0) }]
        );
    }

    #[test]
    fn test_precedence_ladder() {
        let program = parse("new x = 1 + 2 * 3");
        let Statement::NewVariable { value, .. } = &program[0] else { panic!() };
        assert_eq!(
            *value,
            Expression::Binary {
                left: Box::new(Expression::Number(1.0)),
                op: BinaryOp::Add,
                right: Box::new(Expression::Binary {
                    left: Box::new(Expression::Number(2.0)),
                    op: BinaryOp::Mul,
                    right: Box::new(Expression::Number(3.0)),
                }),
            }
        );
    }

    #[test]
    fn test_if_diff_if_chain() {
        let program = parse("if (1) { ret 1 } diff if (2) { ret 2 } diff { ret 3 }");
        let Statement::If { else_block, .. } = &program[0] else { panic!() };
        let else_block = else_block.as_ref().unwrap();
        assert!(matches!(else_block[0], Statement::If { .. }));
    }

    #[test]
    fn test_method_call_parses() {
        let program = parse("obj.greet(1, 2)");
        assert_eq!(
            program,
            vec![Statement::ExprStmt(Expression::MethodCall {
                receiver: Box::new(Expression::Identifier("obj".into())),
                method: "greet".into(),
                arguments: vec![Expression::Number(1.0), Expression::Number(2.0)],
            })]
        );
    }

    #[test]
    fn test_color_literal() {
        let program = parse(r#"c@red"hi""#);
        assert_eq!(
            program,
            vec![Statement::ExprStmt(Expression::ColorString {
                color: "red".into(),
                text: "hi".into(),
            })]
        );
    }

    #[test]
    fn test_interpolation() {
        let program = parse(r#""a" << 1 + 1 >> "b""#);
        assert_eq!(
            program,
            vec![Statement::ExprStmt(Expression::Interpolation(vec![
                Expression::String("a".into()),
                Expression::Binary {
                    left: Box::new(Expression::Number(1.0)),
                    op: BinaryOp::Add,
                    right: Box::new(Expression::Number(1.0)),
                },
                Expression::String("b".into()),
            ]))]
        );
    }

    #[test]
    fn test_array_and_index() {
        let program = parse("new a = [1, 2, 3]\na[0]");
        assert_eq!(
            program[0],
            Statement::NewVariable {
                name: "a".into(),
                value: Expression::Array(vec![
                    Expression::Number(1.0),
                    Expression::Number(2.0),
                    Expression::Number(3.0),
                ]),
            }
        );
        assert_eq!(
            program[1],
            Statement::ExprStmt(Expression::Index {
                object: Box::new(Expression::Identifier("a".into())),
                index: Box::new(Expression::Number(0.0)),
            })
        );
    }

    #[test]
    fn test_invalid_number_is_parse_error() {
        let tokens = Lexer::new("new x = 1.2.3").tokenize().unwrap();
        let err = Parser::new(tokens).parse_program().unwrap_err();
        assert!(matches!(err, ParseError::InvalidNumber { .. }));
    }
}
