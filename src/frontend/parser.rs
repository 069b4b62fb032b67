use crate::ast::{BinaryOp, Expr, Program, Statement};
use crate::errors::{PbcError, PbcResult};
use crate::frontend::token::Token;
use std::slice::Iter;

pub struct Parser<'a> {
    current_token: Token,
    line_number: usize,
    iter: Iter<'a, (Token, usize)>,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a [(Token, usize)]) -> Self {
        let mut parser = Self {
            current_token: Token::Null,
            line_number: 1,
            iter: tokens.iter(),
        };
        parser.next();
        parser
    }

    fn next(&mut self) {
        match self.iter.next() {
            Some((token, line)) => {
                self.current_token = token.clone();
                self.line_number = *line;
            }
            None => self.current_token = Token::Null,
        }
    }

    fn peek(&self) -> Token {
        match self.iter.clone().next() {
            Some((token, _)) => token.clone(),
            None => Token::Null,
        }
    }

    fn expect(&mut self, expected: Token) -> PbcResult<()> {
        if std::mem::discriminant(&expected) != std::mem::discriminant(&self.current_token) {
            return Err(PbcError::SyntaxError {
                expected: expected.to_string(),
                found: self.current_token.to_string(),
                line: self.line_number,
            });
        }
        self.next();
        Ok(())
    }

    fn get_identifier(&self, token: &Token) -> PbcResult<String> {
        match token {
            Token::Ident(id) => Ok(id.clone()),
            _ => Err(PbcError::GenericError(format!(
                "Not able to extract the identifier from token: {:?} at line {}",
                token, self.line_number
            ))),
        }
    }

    fn get_numeric_literal(&self, token: &Token) -> PbcResult<i64> {
        match token {
            Token::Number(n) => Ok(*n),
            _ => Err(PbcError::GenericError(format!(
                "Not able to extract the numeric literal from token: {:?} at line {}",
                token, self.line_number
            ))),
        }
    }

    /**
     * Parse a program according to the grammar:
     * program = statement { statement }
     */
    pub fn parse(&mut self) -> PbcResult<Program> {
        let mut statements = Vec::new();
        statements.push(self.statement()?);
        while self.current_token != Token::Null {
            statements.push(self.statement()?);
        }
        Ok(Program { statements })
    }

    /**
     * Parse a statement according to the grammar:
     * statement = expression ";"
     */
    fn statement(&mut self) -> PbcResult<Statement> {
        let expr = self.expression()?;
        self.expect(Token::Semicolon)?;
        Ok(Statement { expr })
    }

    /**
     * Parse an expression according to the grammar:
     * expression = "if" expression "{" { statement } "}"
     *            | ident "=" expression
     *            | portdef "=" expression
     *            | equality
     *
     * Precedence, lowest to highest: conditional, equality, assignment,
     * additive. A port reference at expression head is an output write
     * when followed by "=", otherwise an input read flowing into the
     * arithmetic chain.
     */
    fn expression(&mut self) -> PbcResult<Expr> {
        match &self.current_token {
            Token::If => self.conditional(),
            Token::Ident(_) if self.peek() == Token::Equal => {
                let name = self.get_identifier(&self.current_token)?;
                self.next();
                self.expect(Token::Equal)?;
                let value = self.expression()?;
                Ok(Expr::Assign { name, value: Box::new(value) })
            }
            Token::Dollar => {
                let port = self.portdef()?;
                if self.current_token == Token::Equal {
                    self.expect(Token::Equal)?;
                    let value = self.expression()?;
                    Ok(Expr::OutputWrite { port, value: Box::new(value) })
                } else {
                    let lhs = self.additive_rest(Expr::InputRead(port))?;
                    self.equality_rest(lhs)
                }
            }
            _ => self.equality(),
        }
    }

    /**
     * Parse a conditional block according to the grammar:
     * conditional = "if" expression "{" { statement } "}"
     *
     * The condition may be parenthesized since "(" expression ")" is a
     * factor. The block jumps past its body when the comparison flags
     * say not-equal.
     */
    fn conditional(&mut self) -> PbcResult<Expr> {
        self.expect(Token::If)?;
        let condition = self.expression()?;
        self.expect(Token::LBrace)?;
        let mut body = Vec::new();
        while self.current_token != Token::RBrace && self.current_token != Token::Null {
            body.push(self.statement()?);
        }
        self.expect(Token::RBrace)?;
        Ok(Expr::Conditional { condition: Box::new(condition), body })
    }

    /**
     * Parse an equality chain according to the grammar:
     * equality = additive { "==" additive }
     */
    fn equality(&mut self) -> PbcResult<Expr> {
        let lhs = self.additive()?;
        self.equality_rest(lhs)
    }

    fn equality_rest(&mut self, mut lhs: Expr) -> PbcResult<Expr> {
        while self.current_token == Token::IsEqual {
            self.expect(Token::IsEqual)?;
            let rhs = self.additive()?;
            lhs = Expr::Equality { lhs: Box::new(lhs), rhs: Box::new(rhs) };
        }
        Ok(lhs)
    }

    /**
     * Parse an additive chain according to the grammar:
     * additive = factor { ( "+" | "-" ) factor }
     */
    fn additive(&mut self) -> PbcResult<Expr> {
        let lhs = self.factor()?;
        self.additive_rest(lhs)
    }

    fn additive_rest(&mut self, mut lhs: Expr) -> PbcResult<Expr> {
        while matches!(self.current_token, Token::Plus | Token::Minus) {
            let op = if self.current_token == Token::Plus {
                BinaryOp::Add
            } else {
                BinaryOp::Sub
            };
            self.next();
            let rhs = self.factor()?;
            lhs = Expr::Binary { op, lhs: Box::new(lhs), rhs: Box::new(rhs) };
        }
        Ok(lhs)
    }

    /**
     * Parse a factor according to the grammar:
     * factor = number | ident | "(" expression ")" | portdef
     */
    fn factor(&mut self) -> PbcResult<Expr> {
        match &self.current_token {
            Token::Number(_) => {
                let num = self.get_numeric_literal(&self.current_token)?;
                self.next();
                Ok(Expr::Number(num))
            }
            Token::Ident(_) => {
                let id = self.get_identifier(&self.current_token)?;
                self.next();
                Ok(Expr::Variable(id))
            }
            Token::LParen => {
                self.expect(Token::LParen)?;
                let expr = self.expression()?;
                self.expect(Token::RParen)?;
                Ok(expr)
            }
            Token::Dollar => Ok(Expr::InputRead(self.portdef()?)),
            _ => Err(PbcError::syntax_error(
                "expression",
                self.current_token.to_string(),
                self.line_number,
            )),
        }
    }

    /**
     * Parse a port reference according to the grammar:
     * portdef = "$" "[" number "]"
     */
    fn portdef(&mut self) -> PbcResult<i64> {
        self.expect(Token::Dollar)?;
        self.expect(Token::LBrack)?;
        let port = match &self.current_token {
            Token::Number(n) => *n,
            _ => {
                return Err(PbcError::syntax_error(
                    "number",
                    self.current_token.to_string(),
                    self.line_number,
                ))
            }
        };
        self.next();
        self.expect(Token::RBrack)?;
        Ok(port)
    }
}
