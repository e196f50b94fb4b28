//! Abstract syntax tree of the SyReC language.
//!
//! The tree is immutable after parsing; the synthesizers walk it read-only
//! and carry their own binding environments for `call`/`uncall`.

use std::rc::Rc;

use rustc_hash::FxHashMap;

/// Loop-variable bindings active during evaluation.
pub type LoopMap = FxHashMap<String, u32>;

/// A complete program: one or more modules.
#[derive(Debug, Clone, Default)]
pub struct Program {
    /// The declared modules, in source order.
    pub modules: Vec<Rc<Module>>,
}

impl Program {
    /// Find a module by name.
    pub fn find_module(&self, name: &str) -> Option<&Rc<Module>> {
        self.modules.iter().find(|m| m.name == name)
    }
}

/// A parameterised module.
#[derive(Debug, Clone)]
pub struct Module {
    /// Module name.
    pub name: String,
    /// Formal parameters (`in`, `out`, `inout`).
    pub parameters: Vec<Rc<Variable>>,
    /// Local signals (`wire`, `state`).
    pub variables: Vec<Rc<Variable>>,
    /// Statement list.
    pub statements: Vec<Statement>,
}

impl Module {
    /// Find a parameter or local variable by name.
    pub fn find_parameter_or_variable(&self, name: &str) -> Option<&Rc<Variable>> {
        self.parameters
            .iter()
            .chain(self.variables.iter())
            .find(|v| v.name == name)
    }
}

/// Storage class of a declared signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableKind {
    /// Input parameter; its final value is garbage.
    In,
    /// Output parameter; initialised to constant zero.
    Out,
    /// Read-write parameter.
    Inout,
    /// Local signal, zero-initialised and garbage.
    Wire,
    /// Local signal preserved across invocations.
    State,
}

/// A declared signal.
#[derive(Debug, Clone)]
pub struct Variable {
    /// Storage class.
    pub kind: VariableKind,
    /// Name.
    pub name: String,
    /// Array dimensions (empty for scalars).
    pub dimensions: Vec<u32>,
    /// Width in bits.
    pub bitwidth: u32,
}

/// Access to a variable: optional array indexes and an optional bit range.
#[derive(Debug, Clone)]
pub struct VariableAccess {
    /// Name of the accessed variable.
    pub name: String,
    /// One index expression per dimension.
    pub indexes: Vec<Expression>,
    /// Bit range `.first:second` (inclusive, may run downwards).
    pub range: Option<(Number, Number)>,
}

/// A compile-time number: constant, loop variable, or arithmetic over both.
#[derive(Debug, Clone)]
pub enum Number {
    /// A literal.
    Constant(u32),
    /// A `$variable` loop binding.
    LoopVariable(String),
    /// Arithmetic over two numbers.
    ConstExpr(NumericOp, Box<Number>, Box<Number>),
}

/// Operators allowed inside compile-time numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericOp {
    /// Addition.
    Add,
    /// Subtraction.
    Subtract,
    /// Multiplication.
    Multiply,
    /// Division.
    Divide,
}

impl Number {
    /// Evaluate under the given loop bindings. Unbound loop variables
    /// evaluate to 0; division by zero yields 0.
    pub fn evaluate(&self, loop_map: &LoopMap) -> u32 {
        match self {
            Number::Constant(value) => *value,
            Number::LoopVariable(name) => loop_map.get(name).copied().unwrap_or(0),
            Number::ConstExpr(op, lhs, rhs) => {
                let lhs = lhs.evaluate(loop_map);
                let rhs = rhs.evaluate(loop_map);
                match op {
                    NumericOp::Add => lhs.wrapping_add(rhs),
                    NumericOp::Subtract => lhs.wrapping_sub(rhs),
                    NumericOp::Multiply => lhs.wrapping_mul(rhs),
                    NumericOp::Divide => lhs.checked_div(rhs).unwrap_or(0),
                }
            }
        }
    }
}

/// Reversible assignment operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignOp {
    /// `+=`
    Add,
    /// `-=`
    Subtract,
    /// `^=`
    Exor,
}

impl AssignOp {
    /// The operator undoing this one.
    pub fn inverse(self) -> Self {
        match self {
            AssignOp::Add => AssignOp::Subtract,
            AssignOp::Subtract => AssignOp::Add,
            AssignOp::Exor => AssignOp::Exor,
        }
    }
}

/// Reversible unary statement operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// `++=`
    Increment,
    /// `--=`
    Decrement,
    /// `~=`
    Invert,
}

impl UnaryOp {
    /// The operator undoing this one.
    pub fn inverse(self) -> Self {
        match self {
            UnaryOp::Increment => UnaryOp::Decrement,
            UnaryOp::Decrement => UnaryOp::Increment,
            UnaryOp::Invert => UnaryOp::Invert,
        }
    }
}

/// Binary operators in expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    /// `+`
    Add,
    /// `-`
    Subtract,
    /// `^`
    Exor,
    /// `*` (low word of the product)
    Multiply,
    /// `/`
    Divide,
    /// `%`
    Modulo,
    /// `*>` (high word of the product)
    FracDivide,
    /// `&`
    BitwiseAnd,
    /// `|`
    BitwiseOr,
    /// `&&`
    LogicalAnd,
    /// `||`
    LogicalOr,
    /// `<`
    LessThan,
    /// `>`
    GreaterThan,
    /// `<=`
    LessEquals,
    /// `>=`
    GreaterEquals,
    /// `=`
    Equals,
    /// `!=`
    NotEquals,
}

/// Shift directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShiftOp {
    /// `<<`
    Left,
    /// `>>`
    Right,
}

/// An expression.
#[derive(Debug, Clone)]
pub enum Expression {
    /// A compile-time number, materialised into constant lines.
    Numeric(Number, u32),
    /// A variable access.
    Variable(VariableAccess),
    /// A binary expression.
    Binary(Box<Expression>, BinaryOp, Box<Expression>),
    /// A shift by a compile-time number.
    Shift(Box<Expression>, ShiftOp, Number),
}

impl Expression {
    /// Bit width of the expression's value, given the widths of the
    /// accessed variables are already resolved.
    pub fn bitwidth(&self, width_of: &impl Fn(&VariableAccess) -> u32) -> u32 {
        match self {
            Expression::Numeric(_, width) => *width,
            Expression::Variable(access) => width_of(access),
            Expression::Binary(lhs, op, _) => match op {
                BinaryOp::LogicalAnd
                | BinaryOp::LogicalOr
                | BinaryOp::LessThan
                | BinaryOp::GreaterThan
                | BinaryOp::LessEquals
                | BinaryOp::GreaterEquals
                | BinaryOp::Equals
                | BinaryOp::NotEquals => 1,
                _ => lhs.bitwidth(width_of),
            },
            Expression::Shift(lhs, _, _) => lhs.bitwidth(width_of),
        }
    }
}

/// A statement.
#[derive(Debug, Clone)]
pub enum Statement {
    /// `lhs op= rhs`
    Assign(VariableAccess, AssignOp, Expression),
    /// `++= x`, `--= x`, `~= x`
    Unary(UnaryOp, VariableAccess),
    /// `lhs <=> rhs`
    Swap(VariableAccess, VariableAccess),
    /// `if c then ... else ... fi c'`
    If {
        /// Branch condition.
        condition: Expression,
        /// Statements of the `then` branch.
        then_statements: Vec<Statement>,
        /// Statements of the `else` branch.
        else_statements: Vec<Statement>,
        /// The closing condition after `fi`.
        fi_condition: Expression,
    },
    /// `for $i = a to b step s do ... rof`
    For {
        /// Loop variable name (empty when anonymous).
        loop_variable: String,
        /// Inclusive range (from, to).
        range: (Number, Number),
        /// Step size (defaults to 1).
        step: Number,
        /// Whether the step is negative.
        negative_step: bool,
        /// Loop body.
        statements: Vec<Statement>,
    },
    /// `call module(args)`
    Call {
        /// Callee name.
        module: String,
        /// Caller-side argument names.
        arguments: Vec<String>,
    },
    /// `uncall module(args)`
    Uncall {
        /// Callee name.
        module: String,
        /// Caller-side argument names.
        arguments: Vec<String>,
    },
    /// `skip`
    Skip,
}

impl Statement {
    /// The structural inverse of this statement, used by `uncall`.
    ///
    /// Branch and loop bodies are inverted statement-by-statement in
    /// reverse order; a loop additionally iterates its range backwards.
    pub fn reverse(&self) -> Statement {
        match self {
            Statement::Assign(lhs, op, rhs) => {
                Statement::Assign(lhs.clone(), op.inverse(), rhs.clone())
            }
            Statement::Unary(op, var) => Statement::Unary(op.inverse(), var.clone()),
            Statement::Swap(lhs, rhs) => Statement::Swap(lhs.clone(), rhs.clone()),
            Statement::If {
                condition,
                then_statements,
                else_statements,
                fi_condition,
            } => Statement::If {
                condition: fi_condition.clone(),
                then_statements: reverse_statements(then_statements),
                else_statements: reverse_statements(else_statements),
                fi_condition: condition.clone(),
            },
            Statement::For {
                loop_variable,
                range,
                step,
                negative_step,
                statements,
            } => Statement::For {
                loop_variable: loop_variable.clone(),
                range: (range.1.clone(), range.0.clone()),
                step: step.clone(),
                negative_step: !negative_step,
                statements: reverse_statements(statements),
            },
            Statement::Call { module, arguments } => Statement::Uncall {
                module: module.clone(),
                arguments: arguments.clone(),
            },
            Statement::Uncall { module, arguments } => Statement::Call {
                module: module.clone(),
                arguments: arguments.clone(),
            },
            Statement::Skip => Statement::Skip,
        }
    }
}

fn reverse_statements(statements: &[Statement]) -> Vec<Statement> {
    statements.iter().rev().map(Statement::reverse).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_evaluation() {
        let mut loop_map = LoopMap::default();
        loop_map.insert("i".into(), 3);

        let n = Number::ConstExpr(
            NumericOp::Add,
            Box::new(Number::LoopVariable("i".into())),
            Box::new(Number::Constant(2)),
        );
        assert_eq!(n.evaluate(&loop_map), 5);

        let div = Number::ConstExpr(
            NumericOp::Divide,
            Box::new(Number::Constant(7)),
            Box::new(Number::Constant(0)),
        );
        assert_eq!(div.evaluate(&loop_map), 0);
    }

    #[test]
    fn test_assign_reverse_flips_add_and_subtract() {
        let access = VariableAccess {
            name: "x".into(),
            indexes: vec![],
            range: None,
        };
        let stmt = Statement::Assign(
            access,
            AssignOp::Add,
            Expression::Numeric(Number::Constant(1), 8),
        );
        match stmt.reverse() {
            Statement::Assign(_, AssignOp::Subtract, _) => {}
            other => panic!("unexpected inverse: {other:?}"),
        }
    }

    #[test]
    fn test_if_reverse_inverts_branches_in_reverse_order() {
        let access = VariableAccess {
            name: "x".into(),
            indexes: vec![],
            range: None,
        };
        let inc = Statement::Unary(UnaryOp::Increment, access.clone());
        let inv = Statement::Unary(UnaryOp::Invert, access.clone());
        let stmt = Statement::If {
            condition: Expression::Numeric(Number::Constant(1), 1),
            then_statements: vec![inc, inv],
            else_statements: vec![],
            fi_condition: Expression::Numeric(Number::Constant(1), 1),
        };

        let Statement::If {
            then_statements, ..
        } = stmt.reverse()
        else {
            panic!("expected if");
        };
        assert!(matches!(
            then_statements[0],
            Statement::Unary(UnaryOp::Invert, _)
        ));
        assert!(matches!(
            then_statements[1],
            Statement::Unary(UnaryOp::Decrement, _)
        ));
    }

    #[test]
    fn test_call_reverse_is_uncall() {
        let stmt = Statement::Call {
            module: "adder".into(),
            arguments: vec!["a".into(), "b".into()],
        };
        assert!(matches!(stmt.reverse(), Statement::Uncall { .. }));
    }
}
