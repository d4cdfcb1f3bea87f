use crate::ast::{BinaryOp, LogicalOp, Node, NodeKind, UnaryOp};
use crate::error::{Error, Result};
use crate::position::{Position, Span};
use crate::token::{Literal, Token, TokenKind};
use log::trace;
use std::rc::Rc;

/// Builds a `Program` node from a token stream ending in EOF.
pub fn parse(tokens: &[Token]) -> Result<Node> {
    Parser::new(tokens)?.parse()
}

pub struct Parser<'a> {
    tokens: Vec<&'a Token>,
    current: usize,
}

impl<'a> Parser<'a> {
    /// Comment tokens are dropped here; the grammar never sees them.
    pub fn new(tokens: &'a [Token]) -> Result<Parser<'a>> {
        let tokens: Vec<&'a Token> = tokens
            .iter()
            .filter(|t| t.kind != TokenKind::Comment)
            .collect();
        match tokens.last() {
            Some(t) if t.kind == TokenKind::EOF => Ok(Parser { tokens, current: 0 }),
            Some(t) => Err(Error::syntax(
                "Token stream must end with EOF",
                t.span.clone(),
            )),
            None => Err(Error::syntax(
                "Token stream must end with EOF",
                Span::at(Position::new("<input>")),
            )),
        }
    }
    pub fn parse(&mut self) -> Result<Node> {
        trace!("parsing {} tokens", self.tokens.len());
        let start = self.peek().span.clone();
        let mut body: Vec<Node> = Vec::new();
        self.skip_terminators();
        while !self.is_at_end() {
            body.push(self.statement()?);
            self.skip_terminators();
        }
        let span = start.to(&self.peek().span);
        Ok(Node::new(NodeKind::Program { body }, span))
    }

    // Statements

    fn statement(&mut self) -> Result<Node> {
        let token = self.peek();
        if token.kind != TokenKind::Keyword {
            return self.expression();
        }
        match token.text() {
            Some("var") | Some("let") => {
                self.advance();
                self.var_declaration(token)
            }
            Some("if") => {
                self.advance();
                self.if_statement(token)
            }
            Some("for") => {
                self.advance();
                self.for_statement(token)
            }
            Some("while") => {
                self.advance();
                self.while_statement(token)
            }
            Some("return") => {
                self.advance();
                self.return_statement(token)
            }
            _ => self.expression(),
        }
    }
    fn var_declaration(&mut self, keyword: &Token) -> Result<Node> {
        let name = self.peek();
        let ident = match (name.kind, name.text()) {
            (TokenKind::Ident, Some(ident)) => ident.to_string(),
            _ => return Err(self.error("Expected a variable name")),
        };
        self.advance();
        let value = if self.check(TokenKind::Symbol, "=") {
            self.advance();
            self.expression()?
        } else {
            Node::new(NodeKind::Literal("undefined".to_string()), name.span.clone())
        };
        let span = keyword.span.to(&value.span);
        Ok(Node::new(
            NodeKind::VarDeclaration {
                ident,
                value: Box::new(value),
            },
            span,
        ))
    }
    fn if_statement(&mut self, keyword: &Token) -> Result<Node> {
        let condition = self.expression()?;
        let block = self.block()?;
        let alternate = if self.check(TokenKind::Keyword, "else") {
            self.advance();
            let next = self.peek();
            if next.is(TokenKind::Keyword, "if") {
                self.advance();
                Some(Box::new(self.if_statement(next)?))
            } else {
                Some(Box::new(self.block()?))
            }
        } else {
            None
        };
        let end = match &alternate {
            Some(alternate) => alternate.span.clone(),
            None => block.span.clone(),
        };
        Ok(Node::new(
            NodeKind::IfStatement {
                condition: Box::new(condition),
                block: Box::new(block),
                alternate,
            },
            keyword.span.to(&end),
        ))
    }
    fn for_statement(&mut self, keyword: &Token) -> Result<Node> {
        self.consume(TokenKind::Paren, "(", "Expected '(' after 'for'")?;
        let init = self.statement()?;
        self.consume(TokenKind::Symbol, ";", "Expected ';' after loop initializer")?;
        let test = self.expression()?;
        self.consume(TokenKind::Symbol, ";", "Expected ';' after loop condition")?;
        let update = self.expression()?;
        self.consume(TokenKind::Paren, ")", "Expected ')' after loop clauses")?;
        let block = self.block()?;
        let span = keyword.span.to(&block.span);
        Ok(Node::new(
            NodeKind::ForStatement {
                init: Box::new(init),
                test: Box::new(test),
                update: Box::new(update),
                block: Box::new(block),
            },
            span,
        ))
    }
    fn while_statement(&mut self, keyword: &Token) -> Result<Node> {
        self.consume(TokenKind::Paren, "(", "Expected '(' after 'while'")?;
        let test = self.expression()?;
        self.consume(TokenKind::Paren, ")", "Expected ')' after while condition")?;
        let block = self.block()?;
        let span = keyword.span.to(&block.span);
        Ok(Node::new(
            NodeKind::WhileStatement {
                test: Box::new(test),
                block: Box::new(block),
            },
            span,
        ))
    }
    fn return_statement(&mut self, keyword: &Token) -> Result<Node> {
        let next = self.peek();
        let argument = if self.is_at_end()
            || next.is(TokenKind::Symbol, ";")
            || next.is(TokenKind::Brace, "}")
        {
            Node::new(
                NodeKind::Literal("undefined".to_string()),
                keyword.span.clone(),
            )
        } else {
            self.expression()?
        };
        let span = keyword.span.to(&argument.span);
        Ok(Node::new(
            NodeKind::ReturnStatement {
                argument: Box::new(argument),
            },
            span,
        ))
    }
    fn block(&mut self) -> Result<Node> {
        let open = self.consume(TokenKind::Brace, "{", "Expected '{' to start a block")?;
        let mut body: Vec<Node> = Vec::new();
        self.skip_terminators();
        while !self.is_at_end() && !self.check(TokenKind::Brace, "}") {
            body.push(self.statement()?);
            self.skip_terminators();
        }
        let close = self.consume(TokenKind::Brace, "}", "Expected '}' after block")?;
        Ok(Node::new(
            NodeKind::BlockStatement { body },
            open.span.to(&close.span),
        ))
    }

    // Expressions, loosest binding first

    fn expression(&mut self) -> Result<Node> {
        let token = self.peek();
        if token.is(TokenKind::Keyword, "function") {
            self.advance();
            return self.function_declaration(token);
        }
        self.logical()
    }
    fn logical(&mut self) -> Result<Node> {
        let mut expr = self.comparison()?;
        while self.peek().kind == TokenKind::LogicalOp {
            let op: LogicalOp = self.operator()?;
            let right = self.comparison()?;
            let span = expr.span.to(&right.span);
            expr = Node::new(
                NodeKind::LogicalExpr {
                    left: Box::new(expr),
                    op,
                    right: Box::new(right),
                },
                span,
            );
        }
        Ok(expr)
    }
    fn comparison(&mut self) -> Result<Node> {
        let mut expr = self.object_or_additive()?;
        while self.peek().kind == TokenKind::CompOp {
            let op: BinaryOp = self.operator()?;
            let right = self.object_or_additive()?;
            expr = binary(expr, op, right);
        }
        Ok(expr)
    }
    fn object_or_additive(&mut self) -> Result<Node> {
        if self.check(TokenKind::Brace, "{") {
            self.object_literal()
        } else {
            self.additive()
        }
    }
    fn additive(&mut self) -> Result<Node> {
        let mut expr = self.multiplicative()?;
        while self.check(TokenKind::Operator, "+") || self.check(TokenKind::Operator, "-") {
            let op: BinaryOp = self.operator()?;
            let right = self.multiplicative()?;
            expr = binary(expr, op, right);
        }
        Ok(expr)
    }
    fn multiplicative(&mut self) -> Result<Node> {
        let mut expr = self.call()?;
        while self.check(TokenKind::Operator, "*")
            || self.check(TokenKind::Operator, "/")
            || self.check(TokenKind::Operator, "%")
        {
            let op: BinaryOp = self.operator()?;
            let right = self.call()?;
            expr = binary(expr, op, right);
        }
        Ok(expr)
    }
    fn call(&mut self) -> Result<Node> {
        let callee = self.primary()?;
        if !self.check(TokenKind::Paren, "(") {
            return Ok(callee);
        }
        self.advance();
        let mut args: Vec<Node> = Vec::new();
        if !self.check(TokenKind::Paren, ")") {
            loop {
                args.push(self.expression()?);
                if self.check(TokenKind::Symbol, ",") {
                    self.advance();
                    continue;
                }
                break;
            }
        }
        let close = self.consume(TokenKind::Paren, ")", "Expected ')' after arguments")?;
        let span = callee.span.to(&close.span);
        Ok(Node::new(
            NodeKind::CallExpr {
                callee: Box::new(callee),
                args,
            },
            span,
        ))
    }
    fn primary(&mut self) -> Result<Node> {
        let token = self.peek();
        match (token.kind, &token.literal) {
            (TokenKind::Number, Literal::Number(x)) => {
                self.advance();
                Ok(Node::new(NodeKind::NumericLiteral(*x), token.span.clone()))
            }
            (TokenKind::String, Literal::Text(x)) => {
                self.advance();
                Ok(Node::new(
                    NodeKind::StringLiteral(x.clone()),
                    token.span.clone(),
                ))
            }
            (TokenKind::Keyword, Literal::Text(x))
                if matches!(x.as_str(), "undefined" | "null" | "true" | "false") =>
            {
                self.advance();
                Ok(Node::new(NodeKind::Literal(x.clone()), token.span.clone()))
            }
            (TokenKind::Ident, Literal::Text(x)) => {
                self.advance();
                if self.check(TokenKind::Symbol, "=") {
                    self.advance();
                    let value = self.expression()?;
                    let span = token.span.to(&value.span);
                    return Ok(Node::new(
                        NodeKind::VarAssignment {
                            ident: x.clone(),
                            value: Box::new(value),
                        },
                        span,
                    ));
                }
                Ok(Node::new(NodeKind::Identifier(x.clone()), token.span.clone()))
            }
            (TokenKind::Bracket, Literal::Text(x)) if x == "[" => self.array_literal(),
            (TokenKind::Operator, Literal::Text(x)) if x == "-" || x == "!" => {
                let prefix: UnaryOp = self.operator()?;
                let operand = self.call()?;
                let span = token.span.to(&operand.span);
                Ok(Node::new(
                    NodeKind::UnaryExpr {
                        prefix,
                        operand: Box::new(operand),
                    },
                    span,
                ))
            }
            (TokenKind::Paren, Literal::Text(x)) if x == "(" => {
                self.advance();
                let expr = self.expression()?;
                self.consume(TokenKind::Paren, ")", "Expected ')' after expression")?;
                Ok(expr)
            }
            _ => Err(self.error("Expected an expression")),
        }
    }
    fn array_literal(&mut self) -> Result<Node> {
        let open = self.consume(TokenKind::Bracket, "[", "Expected '['")?;
        let mut values: Vec<Node> = Vec::new();
        while !self.check(TokenKind::Bracket, "]") {
            values.push(self.expression()?);
            if self.check(TokenKind::Symbol, ",") {
                self.advance();
            } else {
                break;
            }
        }
        let close = self.consume(TokenKind::Bracket, "]", "Expected ',' or ']' in array")?;
        Ok(Node::new(
            NodeKind::ArrayLiteral(values),
            open.span.to(&close.span),
        ))
    }
    fn object_literal(&mut self) -> Result<Node> {
        let open = self.consume(TokenKind::Brace, "{", "Expected '{'")?;
        let mut properties: Vec<(String, Option<Node>)> = Vec::new();
        while !self.check(TokenKind::Brace, "}") {
            let key = self.peek();
            let name = match (key.kind, key.text()) {
                (TokenKind::Ident, Some(name)) | (TokenKind::String, Some(name)) => {
                    name.to_string()
                }
                _ => return Err(self.error("Expected a property name")),
            };
            self.advance();
            let value = if self.check(TokenKind::Symbol, ":") {
                self.advance();
                Some(self.expression()?)
            } else {
                None
            };
            properties.push((name, value));
            if self.check(TokenKind::Symbol, ",") {
                self.advance();
            } else {
                break;
            }
        }
        let close = self.consume(TokenKind::Brace, "}", "Expected ',' or '}' in object")?;
        Ok(Node::new(
            NodeKind::ObjectLiteral(properties),
            open.span.to(&close.span),
        ))
    }
    fn function_declaration(&mut self, keyword: &Token) -> Result<Node> {
        let name = match (self.peek().kind, self.peek().text()) {
            (TokenKind::Ident, Some(name)) => {
                self.advance();
                Some(name.to_string())
            }
            _ => None,
        };
        self.consume(TokenKind::Paren, "(", "Expected '(' before parameters")?;
        let mut params: Vec<Node> = Vec::new();
        while !self.check(TokenKind::Paren, ")") {
            let param = self.peek();
            match (param.kind, param.text()) {
                (TokenKind::Ident, Some(x)) => {
                    if params.iter().any(|p| p.kind == NodeKind::Identifier(x.to_string())) {
                        return Err(Error::syntax(
                            format!("Duplicate parameter name '{}'", x),
                            param.span.clone(),
                        ));
                    }
                    self.advance();
                    params.push(Node::new(
                        NodeKind::Identifier(x.to_string()),
                        param.span.clone(),
                    ));
                }
                _ => return Err(self.error("Expected a parameter name")),
            }
            if self.check(TokenKind::Symbol, ",") {
                self.advance();
            } else {
                break;
            }
        }
        self.consume(TokenKind::Paren, ")", "Expected ')' after parameters")?;
        let block = self.block()?;
        let span = keyword.span.to(&block.span);
        let is_anonymous = name.is_none();
        Ok(Node::new(
            NodeKind::FunctionDeclaration {
                name,
                params,
                block: Rc::new(block),
                is_anonymous,
            },
            span,
        ))
    }

    // Cursor helpers

    /// Consumes the current token as an operator of type `T`.
    fn operator<T: std::str::FromStr>(&mut self) -> Result<T> {
        let token = self.peek();
        match token.text().and_then(|x| x.parse::<T>().ok()) {
            Some(op) => {
                self.advance();
                Ok(op)
            }
            None => Err(self.error("Expected an operator")),
        }
    }
    fn skip_terminators(&mut self) {
        while self.check(TokenKind::Symbol, ";") {
            self.advance();
        }
    }
    fn check(&self, kind: TokenKind, text: &str) -> bool {
        self.peek().is(kind, text)
    }
    fn consume(&mut self, kind: TokenKind, text: &str, msg: &str) -> Result<&'a Token> {
        if self.check(kind, text) {
            Ok(self.advance())
        } else {
            Err(self.error(msg))
        }
    }
    fn advance(&mut self) -> &'a Token {
        if !self.is_at_end() {
            self.current += 1;
        }
        self.previous()
    }
    fn is_at_end(&self) -> bool {
        self.peek().kind == TokenKind::EOF
    }
    fn peek(&self) -> &'a Token {
        self.tokens[self.current]
    }
    fn previous(&self) -> &'a Token {
        self.tokens[self.current.saturating_sub(1)]
    }
    fn error(&self, msg: &str) -> Error {
        let token = self.peek();
        let found = match (token.kind, &token.literal) {
            (TokenKind::EOF, _) => "end of input".to_string(),
            (_, Literal::Number(x)) => format!("'{}'", x),
            (_, Literal::Text(x)) => format!("'{}'", x),
            (_, Literal::Empty) => token.kind.to_string(),
        };
        Error::syntax(format!("{}, found {}", msg, found), token.span.clone())
    }
}

fn binary(left: Node, op: BinaryOp, right: Node) -> Node {
    let span = left.span.to(&right.span);
    Node::new(
        NodeKind::BinaryExpr {
            left: Box::new(left),
            op,
            right: Box::new(right),
        },
        span,
    )
}

#[cfg(test)]
mod parser_tests {
    use crate::ast::{AstPrinter, Node, NodeKind};
    use crate::error::Error;
    use crate::parser::parse;
    use crate::scanner::tokenize;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn parse_source(source: &str) -> Result<Node, Error> {
        parse(&tokenize("test", source))
    }

    fn print(source: &str) -> String {
        let program = parse_source(source).unwrap();
        program.accept(&mut AstPrinter {})
    }

    #[rstest]
    #[case("1 + 2 * 3", "(program (+ 1 (* 2 3)))")]
    #[case("1 + 2 + 3", "(program (+ (+ 1 2) 3))")]
    #[case("8 / 4 % 3", "(program (% (/ 8 4) 3))")]
    #[case("(1 + 2) * 3", "(program (* (+ 1 2) 3))")]
    #[case("a < b == true", "(program (== (< a b) true))")]
    #[case("a && b || c", "(program (|| (&& a b) c))")]
    #[case("-x * !y", "(program (* (- x) (! y)))")]
    #[case("-f(2)", "(program (- (call f 2)))")]
    #[case("x = y = 3", "(program (assign x (assign y 3)))")]
    #[case("[1, 'a', [],]", "(program (array 1 \"a\" (array)))")]
    #[case("{ a, b: 2, }", "(program (object a (b 2)))")]
    fn expression_shapes(#[case] source: &str, #[case] expected: &str) {
        assert_eq!(print(source), expected);
    }

    #[test]
    fn statements() {
        assert_eq!(
            print("let x = 1; var y; x = 2;;"),
            "(program (let x 1) (let y undefined) (assign x 2))"
        );
        assert_eq!(
            print("if x < 1 { 1 } else if (x) { 2 } else { 3 }"),
            "(program (if (< x 1) (block 1) (if x (block 2) (block 3))))"
        );
        assert_eq!(
            print("for (let i = 0; i < 3; i = i + 1) { f(i); }"),
            "(program (for (let i 0) (< i 3) (assign i (+ i 1)) (block (call f i))))"
        );
        assert_eq!(
            print("while (n > 0) { n = n - 1 }"),
            "(program (while (> n 0) (block (assign n (- n 1)))))"
        );
    }

    #[test]
    fn functions_are_expressions() {
        assert_eq!(
            print("function add(a, b) { return a + b; } add(2, 3)"),
            "(program (function add (a b) (block (return (+ a b)))) (call add 2 3))"
        );
        assert_eq!(
            print("let f = function() { return; }"),
            "(program (let f (function () (block (return undefined)))))"
        );
        let program = parse_source("function () {}").unwrap();
        match &program.kind {
            NodeKind::Program { body } => match &body[0].kind {
                NodeKind::FunctionDeclaration {
                    name, is_anonymous, ..
                } => {
                    assert_eq!(name, &None);
                    assert!(is_anonymous);
                }
                other => panic!("unexpected node {:?}", other),
            },
            other => panic!("unexpected node {:?}", other),
        }
    }

    #[test]
    fn comments_never_reach_the_grammar() {
        assert_eq!(print("1 /* one */ + // plus\n 2"), "(program (+ 1 2))");
    }

    #[test]
    fn spans_cover_the_source() {
        let program = parse_source("  1 + 23").unwrap();
        match &program.kind {
            NodeKind::Program { body } => {
                assert_eq!(body[0].span.left.column, 2);
                assert_eq!(body[0].span.right.column, 8);
            }
            other => panic!("unexpected node {:?}", other),
        }
    }

    #[rstest]
    #[case("(1 + 2", "test:1:7: Expected ')' after expression, found end of input")]
    #[case("let 5 = 1", "test:1:5: Expected a variable name, found '5'")]
    #[case("f(1 2)", "test:1:5: Expected ')' after arguments, found '2'")]
    #[case("while x { }", "test:1:7: Expected '(' after 'while', found 'x'")]
    #[case("for (let i = 0, i < 3) {}", "test:1:15: Expected ';' after loop initializer, found ','")]
    #[case("if x 1", "test:1:6: Expected '{' to start a block, found '1'")]
    #[case("\n  )", "test:2:3: Expected an expression, found ')'")]
    #[case("function f(a, a) {}", "test:1:15: Duplicate parameter name 'a'")]
    fn syntax_errors(#[case] source: &str, #[case] expected: &str) {
        let err = parse_source(source).unwrap_err();
        assert_eq!(err.kind_name(), "SyntaxError");
        assert_eq!(err.to_string(), expected);
    }
}
