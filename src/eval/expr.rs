//! Expression parsing and evaluation.
//!
//! A small pest grammar turns text such as `x*sin(x)` or `2*pi` into a tree
//! that can be evaluated repeatedly for different `x` without reparsing.

use std::f64::consts::{E, PI};
use std::fmt;
use std::sync::LazyLock;

use pest::Parser;
use pest::iterators::{Pair, Pairs};
use pest::pratt_parser::{Assoc, Op, PrattParser};
use pest_derive::Parser;
use thiserror::Error;

#[derive(Parser)]
#[grammar = "eval/expr.pest"]
struct ExprParser;

static PRATT: LazyLock<PrattParser<Rule>> = LazyLock::new(|| {
    PrattParser::new()
        .op(Op::infix(Rule::add, Assoc::Left) | Op::infix(Rule::sub, Assoc::Left))
        .op(Op::infix(Rule::mul, Assoc::Left)
            | Op::infix(Rule::div, Assoc::Left)
            | Op::infix(Rule::rem, Assoc::Left))
        .op(Op::prefix(Rule::neg) | Op::prefix(Rule::pos))
        .op(Op::infix(Rule::pow, Assoc::Right))
});

/// Errors raised while parsing or evaluating an expression.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExprError {
    /// The text does not match the grammar.
    #[error("syntax error: {0}")]
    Syntax(#[from] Box<pest::error::Error<Rule>>),
    /// Nothing but whitespace was entered.
    #[error("empty expression")]
    Empty,
    /// A numeric literal could not be represented.
    #[error("invalid number `{0}`")]
    InvalidNumber(String),
    /// A call to a function that does not exist.
    #[error("unknown function `{0}`")]
    UnknownFunction(String),
    /// A name that is neither `x` nor a known constant.
    #[error("unknown identifier `{0}`")]
    UnknownIdentifier(String),
    /// A function called with the wrong number of arguments.
    #[error("`{name}` takes {expected} argument(s), got {found}")]
    Arity {
        /// Function name.
        name: &'static str,
        /// Accepted argument count.
        expected: &'static str,
        /// Supplied argument count.
        found: usize,
    },
    /// `x` used where a plain number is required.
    #[error("`x` is not bound in a constant expression")]
    UnboundVariable,
    /// Division, remainder or `fmod` by zero.
    #[error("division by zero")]
    DivisionByZero,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Pow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Function {
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    Atan2,
    Sinh,
    Cosh,
    Tanh,
    Sqrt,
    Exp,
    Log,
    Log10,
    Pow,
    Floor,
    Ceil,
    Trunc,
    Abs,
    Fmod,
    Copysign,
    Degrees,
    Radians,
}

impl Function {
    fn from_name(name: &str) -> Option<Self> {
        let function = match name {
            "sin" => Self::Sin,
            "cos" => Self::Cos,
            "tan" => Self::Tan,
            "asin" => Self::Asin,
            "acos" => Self::Acos,
            "atan" => Self::Atan,
            "atan2" => Self::Atan2,
            "sinh" => Self::Sinh,
            "cosh" => Self::Cosh,
            "tanh" => Self::Tanh,
            "sqrt" => Self::Sqrt,
            "exp" => Self::Exp,
            "log" => Self::Log,
            "log10" => Self::Log10,
            "pow" => Self::Pow,
            "floor" => Self::Floor,
            "ceil" => Self::Ceil,
            "trunc" => Self::Trunc,
            "abs" | "fabs" => Self::Abs,
            "fmod" => Self::Fmod,
            "copysign" => Self::Copysign,
            "degrees" => Self::Degrees,
            "radians" => Self::Radians,
            _ => return None,
        };
        Some(function)
    }

    fn name(self) -> &'static str {
        match self {
            Self::Sin => "sin",
            Self::Cos => "cos",
            Self::Tan => "tan",
            Self::Asin => "asin",
            Self::Acos => "acos",
            Self::Atan => "atan",
            Self::Atan2 => "atan2",
            Self::Sinh => "sinh",
            Self::Cosh => "cosh",
            Self::Tanh => "tanh",
            Self::Sqrt => "sqrt",
            Self::Exp => "exp",
            Self::Log => "log",
            Self::Log10 => "log10",
            Self::Pow => "pow",
            Self::Floor => "floor",
            Self::Ceil => "ceil",
            Self::Trunc => "trunc",
            Self::Abs => "abs",
            Self::Fmod => "fmod",
            Self::Copysign => "copysign",
            Self::Degrees => "degrees",
            Self::Radians => "radians",
        }
    }

    /// Accepted argument counts, inclusive.
    fn arity(self) -> (usize, usize) {
        match self {
            Self::Atan2 | Self::Pow | Self::Fmod | Self::Copysign => (2, 2),
            Self::Log => (1, 2),
            _ => (1, 1),
        }
    }

    fn arity_text(self) -> &'static str {
        match self.arity() {
            (1, 1) => "1",
            (2, 2) => "2",
            _ => "1 or 2",
        }
    }

    fn apply(self, args: &[f64]) -> Result<f64, ExprError> {
        let a = args[0];
        let value = match self {
            Self::Sin => a.sin(),
            Self::Cos => a.cos(),
            Self::Tan => a.tan(),
            Self::Asin => a.asin(),
            Self::Acos => a.acos(),
            Self::Atan => a.atan(),
            Self::Atan2 => a.atan2(args[1]),
            Self::Sinh => a.sinh(),
            Self::Cosh => a.cosh(),
            Self::Tanh => a.tanh(),
            Self::Sqrt => a.sqrt(),
            Self::Exp => a.exp(),
            Self::Log => match args.get(1) {
                Some(base) => a.ln() / base.ln(),
                None => a.ln(),
            },
            Self::Log10 => a.log10(),
            Self::Pow => a.powf(args[1]),
            Self::Floor => a.floor(),
            Self::Ceil => a.ceil(),
            Self::Trunc => a.trunc(),
            Self::Abs => a.abs(),
            Self::Fmod => {
                if args[1] == 0.0 {
                    return Err(ExprError::DivisionByZero);
                }
                a % args[1]
            }
            Self::Copysign => a.copysign(args[1]),
            Self::Degrees => a.to_degrees(),
            Self::Radians => a.to_radians(),
        };
        Ok(value)
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Number(f64),
    Variable,
    Neg(Box<Node>),
    Binary(BinaryOp, Box<Node>, Box<Node>),
    Call(Function, Vec<Node>),
}

impl Node {
    fn eval(&self, x: Option<f64>) -> Result<f64, ExprError> {
        match self {
            Self::Number(value) => Ok(*value),
            Self::Variable => x.ok_or(ExprError::UnboundVariable),
            Self::Neg(inner) => Ok(-inner.eval(x)?),
            Self::Binary(op, lhs, rhs) => {
                let a = lhs.eval(x)?;
                let b = rhs.eval(x)?;
                match op {
                    BinaryOp::Add => Ok(a + b),
                    BinaryOp::Sub => Ok(a - b),
                    BinaryOp::Mul => Ok(a * b),
                    BinaryOp::Div if b == 0.0 => Err(ExprError::DivisionByZero),
                    BinaryOp::Div => Ok(a / b),
                    BinaryOp::Rem if b == 0.0 => Err(ExprError::DivisionByZero),
                    BinaryOp::Rem => Ok(floored_rem(a, b)),
                    BinaryOp::Pow => Ok(a.powf(b)),
                }
            }
            Self::Call(function, args) => {
                let values = args
                    .iter()
                    .map(|arg| arg.eval(x))
                    .collect::<Result<Vec<_>, _>>()?;
                function.apply(&values)
            }
        }
    }

    fn uses_variable(&self) -> bool {
        match self {
            Self::Number(_) => false,
            Self::Variable => true,
            Self::Neg(inner) => inner.uses_variable(),
            Self::Binary(_, lhs, rhs) => lhs.uses_variable() || rhs.uses_variable(),
            Self::Call(_, args) => args.iter().any(Node::uses_variable),
        }
    }
}

/// Remainder with the sign of the divisor.
fn floored_rem(a: f64, b: f64) -> f64 {
    let rem = a % b;
    if rem != 0.0 && (rem < 0.0) != (b < 0.0) {
        rem + b
    } else {
        rem
    }
}

/// A parsed single-variable expression.
#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    source: String,
    root: Node,
}

impl Expression {
    /// Parse expression text.
    pub fn parse(source: &str) -> Result<Self, ExprError> {
        if source.trim().is_empty() {
            return Err(ExprError::Empty);
        }
        let mut pairs = ExprParser::parse(Rule::program, source).map_err(Box::new)?;
        let expr = pairs
            .next()
            .and_then(|program| program.into_inner().next())
            .ok_or(ExprError::Empty)?;
        let root = parse_expr(expr.into_inner())?;
        Ok(Self {
            source: source.trim().to_string(),
            root,
        })
    }

    /// Evaluate at `x`.
    pub fn eval(&self, x: f64) -> Result<f64, ExprError> {
        self.root.eval(Some(x))
    }

    /// Evaluate an expression that must not reference `x`.
    pub fn eval_constant(&self) -> Result<f64, ExprError> {
        self.root.eval(None)
    }

    /// Check whether the expression references `x`.
    pub fn uses_variable(&self) -> bool {
        self.root.uses_variable()
    }

    /// The trimmed source text.
    pub fn source(&self) -> &str {
        &self.source
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl std::str::FromStr for Expression {
    type Err = ExprError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn parse_expr(pairs: Pairs<'_, Rule>) -> Result<Node, ExprError> {
    PRATT
        .map_primary(parse_primary)
        .map_prefix(|op, rhs| match op.as_rule() {
            Rule::neg => Ok(Node::Neg(Box::new(rhs?))),
            _ => rhs,
        })
        .map_infix(|lhs, op, rhs| {
            let op = match op.as_rule() {
                Rule::add => BinaryOp::Add,
                Rule::sub => BinaryOp::Sub,
                Rule::mul => BinaryOp::Mul,
                Rule::div => BinaryOp::Div,
                Rule::rem => BinaryOp::Rem,
                Rule::pow => BinaryOp::Pow,
                rule => unreachable!("{rule:?} is not an infix operator"),
            };
            Ok(Node::Binary(op, Box::new(lhs?), Box::new(rhs?)))
        })
        .parse(pairs)
}

fn parse_primary(pair: Pair<'_, Rule>) -> Result<Node, ExprError> {
    match pair.as_rule() {
        Rule::number => {
            let text = pair.as_str();
            text.parse::<f64>()
                .ok()
                .filter(|value| value.is_finite())
                .map(Node::Number)
                .ok_or_else(|| ExprError::InvalidNumber(text.to_string()))
        }
        Rule::ident => match pair.as_str() {
            "x" => Ok(Node::Variable),
            "pi" => Ok(Node::Number(PI)),
            "e" => Ok(Node::Number(E)),
            other => Err(ExprError::UnknownIdentifier(other.to_string())),
        },
        Rule::call => {
            let mut inner = pair.into_inner();
            let name = inner.next().map(|ident| ident.as_str()).unwrap_or_default();
            let function = Function::from_name(name)
                .ok_or_else(|| ExprError::UnknownFunction(name.to_string()))?;
            let args = inner
                .map(|arg| parse_expr(arg.into_inner()))
                .collect::<Result<Vec<_>, _>>()?;
            let (min, max) = function.arity();
            if args.len() < min || args.len() > max {
                return Err(ExprError::Arity {
                    name: function.name(),
                    expected: function.arity_text(),
                    found: args.len(),
                });
            }
            Ok(Node::Call(function, args))
        }
        Rule::expr => parse_expr(pair.into_inner()),
        rule => unreachable!("{rule:?} is not a primary expression"),
    }
}
