//! Recursive-descent parser for SyReC.

use std::rc::Rc;

use rustc_hash::FxHashMap;

use crate::ast::{
    AssignOp, BinaryOp, Expression, LoopMap, Module, Number, NumericOp, Program, ShiftOp,
    Statement, UnaryOp, Variable, VariableAccess, VariableKind,
};
use crate::error::{ParseError, ParseResult};
use crate::lexer::{tokenize, SpannedToken, Token};

/// Settings consumed while reading a program.
#[derive(Debug, Clone)]
pub struct ReadProgramSettings {
    /// Bit width assumed for signals declared without one.
    pub default_bitwidth: u32,
}

impl Default for ReadProgramSettings {
    fn default() -> Self {
        Self {
            default_bitwidth: 32,
        }
    }
}

/// Parse a SyReC source string into a [`Program`].
pub fn parse_program(source: &str) -> ParseResult<Program> {
    parse_program_with_settings(source, &ReadProgramSettings::default())
}

/// Parse with explicit settings.
pub fn parse_program_with_settings(
    source: &str,
    settings: &ReadProgramSettings,
) -> ParseResult<Program> {
    let mut parser = Parser::new(source, settings.clone())?;
    parser.parse_program()
}

/// Parser state.
struct Parser {
    tokens: Vec<SpannedToken>,
    pos: usize,
    settings: ReadProgramSettings,
    /// Modules parsed so far (callees must precede their callers).
    modules: Vec<Rc<Module>>,
    /// Signals of the module being parsed.
    symbols: FxHashMap<String, Rc<Variable>>,
    /// Loop variables in scope.
    loop_variables: Vec<String>,
}

impl Parser {
    fn new(source: &str, settings: ReadProgramSettings) -> ParseResult<Self> {
        let mut tokens = Vec::new();
        for result in tokenize(source) {
            match result {
                Ok(token) => tokens.push(token),
                Err((span, message)) => {
                    return Err(ParseError::LexerError {
                        position: span.start,
                        message,
                    });
                }
            }
        }
        Ok(Self {
            tokens,
            pos: 0,
            settings,
            modules: Vec::new(),
            symbols: FxHashMap::default(),
            loop_variables: Vec::new(),
        })
    }

    fn is_eof(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|t| &t.token)
    }

    fn position(&self) -> usize {
        self.tokens
            .get(self.pos)
            .map_or_else(|| self.tokens.last().map_or(0, |t| t.span.end), |t| t.span.start)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos)?.token.clone();
        self.pos += 1;
        Some(token)
    }

    fn check(&self, token: &Token) -> bool {
        self.peek()
            .is_some_and(|t| std::mem::discriminant(t) == std::mem::discriminant(token))
    }

    fn consume(&mut self, token: &Token) -> bool {
        if self.check(token) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: &Token) -> ParseResult<()> {
        if self.consume(expected) {
            return Ok(());
        }
        Err(self.unexpected(&format!("{expected}")))
    }

    fn unexpected(&self, expected: &str) -> ParseError {
        match self.peek() {
            Some(found) => ParseError::UnexpectedToken {
                position: self.position(),
                expected: expected.into(),
                found: found.to_string(),
            },
            None => ParseError::UnexpectedEof(expected.into()),
        }
    }

    fn expect_ident(&mut self) -> ParseResult<String> {
        match self.peek() {
            Some(Token::Ident(_)) => {
                let Some(Token::Ident(name)) = self.advance() else {
                    unreachable!()
                };
                Ok(name)
            }
            _ => Err(self.unexpected("identifier")),
        }
    }

    fn expect_int(&mut self) -> ParseResult<u32> {
        match self.peek() {
            Some(Token::Int(_)) => {
                let Some(Token::Int(value)) = self.advance() else {
                    unreachable!()
                };
                Ok(value)
            }
            _ => Err(self.unexpected("integer literal")),
        }
    }

    // =========================================================================
    // Program and modules
    // =========================================================================

    fn parse_program(&mut self) -> ParseResult<Program> {
        while !self.is_eof() {
            let module = self.parse_module()?;
            self.modules.push(Rc::new(module));
        }
        if self.modules.is_empty() {
            return Err(ParseError::EmptyProgram);
        }
        Ok(Program {
            modules: std::mem::take(&mut self.modules),
        })
    }

    fn parse_module(&mut self) -> ParseResult<Module> {
        self.expect(&Token::Module)?;
        let name = self.expect_ident()?;
        self.symbols.clear();
        self.loop_variables.clear();

        self.expect(&Token::LParen)?;
        let mut parameters = Vec::new();
        if !self.check(&Token::RParen) {
            loop {
                let kind = match self.advance() {
                    Some(Token::In) => VariableKind::In,
                    Some(Token::Out) => VariableKind::Out,
                    Some(Token::Inout) => VariableKind::Inout,
                    _ => return Err(self.unexpected("in, out or inout")),
                };
                let variable = self.parse_signal_declaration(kind)?;
                parameters.push(variable);
                if !self.consume(&Token::Comma) {
                    break;
                }
            }
        }
        self.expect(&Token::RParen)?;

        let mut variables = Vec::new();
        loop {
            let kind = match self.peek() {
                Some(Token::Wire) => VariableKind::Wire,
                Some(Token::State) => VariableKind::State,
                _ => break,
            };
            self.advance();
            loop {
                let variable = self.parse_signal_declaration(kind)?;
                variables.push(variable);
                if !self.consume(&Token::Comma) {
                    break;
                }
            }
        }

        let statements = self.parse_statement_list()?;

        Ok(Module {
            name,
            parameters,
            variables,
            statements,
        })
    }

    fn parse_signal_declaration(&mut self, kind: VariableKind) -> ParseResult<Rc<Variable>> {
        let name = self.expect_ident()?;
        if self.symbols.contains_key(&name) {
            return Err(ParseError::DuplicateDeclaration(name));
        }

        let mut dimensions = Vec::new();
        while self.consume(&Token::LBracket) {
            dimensions.push(self.expect_int()?);
            self.expect(&Token::RBracket)?;
        }

        let bitwidth = if self.consume(&Token::LParen) {
            let width = self.expect_int()?;
            self.expect(&Token::RParen)?;
            width
        } else {
            self.settings.default_bitwidth
        };

        let variable = Rc::new(Variable {
            kind,
            name: name.clone(),
            dimensions,
            bitwidth,
        });
        self.symbols.insert(name, variable.clone());
        Ok(variable)
    }

    // =========================================================================
    // Statements
    // =========================================================================

    fn parse_statement_list(&mut self) -> ParseResult<Vec<Statement>> {
        let mut statements = vec![self.parse_statement()?];
        while self.consume(&Token::Semicolon) {
            if self.statement_list_ended() {
                break;
            }
            statements.push(self.parse_statement()?);
        }
        Ok(statements)
    }

    fn statement_list_ended(&self) -> bool {
        matches!(
            self.peek(),
            None | Some(Token::Else | Token::Fi | Token::Rof | Token::Module)
        )
    }

    fn parse_statement(&mut self) -> ParseResult<Statement> {
        match self.peek() {
            Some(Token::Skip) => {
                self.advance();
                Ok(Statement::Skip)
            }
            Some(Token::Call | Token::Uncall) => self.parse_call(),
            Some(Token::For) => self.parse_for(),
            Some(Token::If) => self.parse_if(),
            Some(Token::IncrementEq) => self.parse_unary(UnaryOp::Increment),
            Some(Token::DecrementEq) => self.parse_unary(UnaryOp::Decrement),
            Some(Token::InvertEq) => self.parse_unary(UnaryOp::Invert),
            Some(Token::Ident(_)) => self.parse_assign_or_swap(),
            _ => Err(self.unexpected("statement")),
        }
    }

    fn parse_unary(&mut self, op: UnaryOp) -> ParseResult<Statement> {
        self.advance();
        let access = self.parse_variable_access()?;
        Ok(Statement::Unary(op, access))
    }

    fn parse_assign_or_swap(&mut self) -> ParseResult<Statement> {
        let lhs = self.parse_variable_access()?;
        match self.advance() {
            Some(Token::AddEq) => self.parse_assign(lhs, AssignOp::Add),
            Some(Token::SubtractEq) => self.parse_assign(lhs, AssignOp::Subtract),
            Some(Token::ExorEq) => self.parse_assign(lhs, AssignOp::Exor),
            Some(Token::SwapOp) => {
                let rhs = self.parse_variable_access()?;
                Ok(Statement::Swap(lhs, rhs))
            }
            _ => Err(self.unexpected("+=, -=, ^= or <=>")),
        }
    }

    fn parse_assign(&mut self, lhs: VariableAccess, op: AssignOp) -> ParseResult<Statement> {
        let width = self.access_width(&lhs);
        let rhs = self.parse_expression(width)?;
        Ok(Statement::Assign(lhs, op, rhs))
    }

    fn parse_if(&mut self) -> ParseResult<Statement> {
        self.expect(&Token::If)?;
        let condition = self.parse_expression(1)?;
        self.expect(&Token::Then)?;
        let then_statements = self.parse_statement_list()?;
        self.expect(&Token::Else)?;
        let else_statements = self.parse_statement_list()?;
        self.expect(&Token::Fi)?;
        let fi_condition = self.parse_expression(1)?;
        Ok(Statement::If {
            condition,
            then_statements,
            else_statements,
            fi_condition,
        })
    }

    fn parse_for(&mut self) -> ParseResult<Statement> {
        self.expect(&Token::For)?;

        let mut loop_variable = String::new();
        let from;
        let to;

        if self.consume(&Token::Dollar) {
            loop_variable = self.expect_ident()?;
            self.expect(&Token::Equals)?;
            from = self.parse_number()?;
            self.expect(&Token::To)?;
            // the loop variable is visible in its own bounds
            self.loop_variables.push(loop_variable.clone());
            to = self.parse_number()?;
        } else {
            let first = self.parse_number()?;
            if self.consume(&Token::To) {
                from = first;
                to = self.parse_number()?;
            } else {
                from = Number::Constant(1);
                to = first;
            }
        }

        let mut negative_step = false;
        let step = if self.consume(&Token::Step) {
            negative_step = self.consume(&Token::Minus);
            self.parse_number()?
        } else {
            Number::Constant(1)
        };

        self.expect(&Token::Do)?;
        let statements = self.parse_statement_list()?;
        self.expect(&Token::Rof)?;

        if !loop_variable.is_empty() {
            self.loop_variables.pop();
        }

        Ok(Statement::For {
            loop_variable,
            range: (from, to),
            step,
            negative_step,
            statements,
        })
    }

    fn parse_call(&mut self) -> ParseResult<Statement> {
        let uncall = matches!(self.advance(), Some(Token::Uncall));
        let module = self.expect_ident()?;

        self.expect(&Token::LParen)?;
        let mut arguments = Vec::new();
        if !self.check(&Token::RParen) {
            loop {
                let name = self.expect_ident()?;
                if !self.symbols.contains_key(&name) {
                    return Err(ParseError::UndeclaredVariable(name));
                }
                arguments.push(name);
                if !self.consume(&Token::Comma) {
                    break;
                }
            }
        }
        self.expect(&Token::RParen)?;

        let target = self
            .modules
            .iter()
            .find(|m| m.name == module)
            .ok_or_else(|| ParseError::UnknownModule(module.clone()))?;
        if target.parameters.len() != arguments.len() {
            return Err(ParseError::WrongArgumentCount {
                module,
                expected: target.parameters.len(),
                got: arguments.len(),
            });
        }

        if uncall {
            Ok(Statement::Uncall { module, arguments })
        } else {
            Ok(Statement::Call { module, arguments })
        }
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    fn parse_expression(&mut self, expected_width: u32) -> ParseResult<Expression> {
        match self.peek() {
            Some(Token::Int(_) | Token::Hash | Token::Dollar) => {
                let number = self.parse_number()?;
                Ok(Expression::Numeric(number, expected_width))
            }
            Some(Token::Ident(_)) => {
                let access = self.parse_variable_access()?;
                Ok(Expression::Variable(access))
            }
            Some(Token::LParen) => self.parse_parenthesised(expected_width),
            _ => Err(self.unexpected("expression")),
        }
    }

    fn parse_parenthesised(&mut self, expected_width: u32) -> ParseResult<Expression> {
        self.expect(&Token::LParen)?;
        let lhs = self.parse_expression(expected_width)?;

        // shifts take a compile-time number on the right
        if self.check(&Token::ShiftLeft) || self.check(&Token::ShiftRight) {
            let op = if matches!(self.advance(), Some(Token::ShiftLeft)) {
                ShiftOp::Left
            } else {
                ShiftOp::Right
            };
            let amount = self.parse_number()?;
            self.expect(&Token::RParen)?;
            return Ok(Expression::Shift(Box::new(lhs), op, amount));
        }

        let op = match self.advance() {
            Some(Token::Plus) => BinaryOp::Add,
            Some(Token::Minus) => BinaryOp::Subtract,
            Some(Token::Caret) => BinaryOp::Exor,
            Some(Token::Star) => BinaryOp::Multiply,
            Some(Token::Slash) => BinaryOp::Divide,
            Some(Token::Percent) => BinaryOp::Modulo,
            Some(Token::FracDivide) => BinaryOp::FracDivide,
            Some(Token::Ampersand) => BinaryOp::BitwiseAnd,
            Some(Token::Pipe) => BinaryOp::BitwiseOr,
            Some(Token::LogicalAnd) => BinaryOp::LogicalAnd,
            Some(Token::LogicalOr) => BinaryOp::LogicalOr,
            Some(Token::Less) => BinaryOp::LessThan,
            Some(Token::Greater) => BinaryOp::GreaterThan,
            Some(Token::LessEquals) => BinaryOp::LessEquals,
            Some(Token::GreaterEquals) => BinaryOp::GreaterEquals,
            Some(Token::Equals) => BinaryOp::Equals,
            Some(Token::NotEquals) => BinaryOp::NotEquals,
            _ => return Err(self.unexpected("binary operator")),
        };

        let operand_width = match &lhs {
            Expression::Numeric(..) => expected_width,
            other => other.bitwidth(&|access| self.access_width(access)),
        };
        let rhs = self.parse_expression(operand_width)?;
        self.expect(&Token::RParen)?;

        Ok(fold_constants(lhs, op, rhs, expected_width))
    }

    fn parse_number(&mut self) -> ParseResult<Number> {
        match self.peek() {
            Some(Token::Int(_)) => Ok(Number::Constant(self.expect_int()?)),
            Some(Token::Hash) => {
                self.advance();
                let name = self.expect_ident()?;
                let variable = self
                    .symbols
                    .get(&name)
                    .ok_or(ParseError::UndeclaredVariable(name))?;
                Ok(Number::Constant(variable.bitwidth))
            }
            Some(Token::Dollar) => {
                self.advance();
                let name = self.expect_ident()?;
                if !self.loop_variables.contains(&name) {
                    return Err(ParseError::UnboundLoopVariable(name));
                }
                Ok(Number::LoopVariable(name))
            }
            Some(Token::LParen) => {
                self.advance();
                let lhs = self.parse_number()?;
                let op = match self.advance() {
                    Some(Token::Plus) => NumericOp::Add,
                    Some(Token::Minus) => NumericOp::Subtract,
                    Some(Token::Star) => NumericOp::Multiply,
                    Some(Token::Slash) => NumericOp::Divide,
                    _ => return Err(self.unexpected("numeric operator")),
                };
                let rhs = self.parse_number()?;
                self.expect(&Token::RParen)?;
                Ok(Number::ConstExpr(op, Box::new(lhs), Box::new(rhs)))
            }
            _ => Err(self.unexpected("number")),
        }
    }

    fn parse_variable_access(&mut self) -> ParseResult<VariableAccess> {
        let name = self.expect_ident()?;
        let variable = self
            .symbols
            .get(&name)
            .cloned()
            .ok_or_else(|| ParseError::UndeclaredVariable(name.clone()))?;

        let mut indexes = Vec::new();
        while self.consume(&Token::LBracket) {
            let index = self.parse_expression(self.settings.default_bitwidth)?;
            indexes.push(index);
            self.expect(&Token::RBracket)?;
        }
        if indexes.len() != variable.dimensions.len() {
            return Err(ParseError::WrongIndexCount {
                variable: name,
                expected: variable.dimensions.len(),
                got: indexes.len(),
            });
        }

        let range = if self.consume(&Token::Dot) {
            let first = self.parse_number()?;
            let second = if self.consume(&Token::Colon) {
                self.parse_number()?
            } else {
                first.clone()
            };
            Some((first, second))
        } else {
            None
        };

        Ok(VariableAccess {
            name,
            indexes,
            range,
        })
    }

    /// Width of an access, evaluating range bounds without loop bindings.
    fn access_width(&self, access: &VariableAccess) -> u32 {
        match &access.range {
            Some((first, second)) => {
                let empty = LoopMap::default();
                let first = first.evaluate(&empty);
                let second = second.evaluate(&empty);
                first.abs_diff(second) + 1
            }
            None => self
                .symbols
                .get(&access.name)
                .map_or(self.settings.default_bitwidth, |v| v.bitwidth),
        }
    }
}

/// Fold a binary expression of two compile-time numbers.
fn fold_constants(lhs: Expression, op: BinaryOp, rhs: Expression, width: u32) -> Expression {
    let (Expression::Numeric(a, _), Expression::Numeric(b, _)) = (&lhs, &rhs) else {
        return Expression::Binary(Box::new(lhs), op, Box::new(rhs));
    };

    // loop-variable-free operands evaluate now; +,-,*,/ stay symbolic so
    // loop variables keep working
    if let (Number::Constant(a), Number::Constant(b)) = (a, b) {
        let (a, b) = (*a, *b);
        let mask = if width >= 32 { u32::MAX } else { (1 << width) - 1 };
        let value = match op {
            BinaryOp::Add => a.wrapping_add(b) & mask,
            BinaryOp::Subtract => a.wrapping_sub(b) & mask,
            BinaryOp::Exor => (a ^ b) & mask,
            BinaryOp::Multiply => a.wrapping_mul(b) & mask,
            BinaryOp::Divide => a.checked_div(b).unwrap_or(0) & mask,
            BinaryOp::Modulo => a.checked_rem(b).unwrap_or(0) & mask,
            BinaryOp::FracDivide => ((u64::from(a) * u64::from(b)) >> width) as u32 & mask,
            BinaryOp::BitwiseAnd => a & b,
            BinaryOp::BitwiseOr => a | b,
            BinaryOp::LogicalAnd => u32::from(a != 0 && b != 0),
            BinaryOp::LogicalOr => u32::from(a != 0 || b != 0),
            BinaryOp::LessThan => u32::from(a < b),
            BinaryOp::GreaterThan => u32::from(a > b),
            BinaryOp::LessEquals => u32::from(a <= b),
            BinaryOp::GreaterEquals => u32::from(a >= b),
            BinaryOp::Equals => u32::from(a == b),
            BinaryOp::NotEquals => u32::from(a != b),
        };
        return Expression::Numeric(Number::Constant(value), width);
    }

    let numeric_op = match op {
        BinaryOp::Add => Some(NumericOp::Add),
        BinaryOp::Subtract => Some(NumericOp::Subtract),
        BinaryOp::Multiply => Some(NumericOp::Multiply),
        BinaryOp::Divide => Some(NumericOp::Divide),
        _ => None,
    };
    match numeric_op {
        Some(numeric_op) => Expression::Numeric(
            Number::ConstExpr(numeric_op, Box::new(a.clone()), Box::new(b.clone())),
            width,
        ),
        None => Expression::Binary(Box::new(lhs), op, Box::new(rhs)),
    }
}
