use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CalcError, EvalError, ParseError, PartialComp};
use crate::parse::Node;
use crate::token::{FnKind, OpKind};

/// How trigonometric arguments and inverse results are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AngleMode {
    #[serde(rename = "rad")]
    Radians,
    #[serde(rename = "deg")]
    Degrees,
}

impl AngleMode {
    pub fn toggle(self) -> AngleMode {
        match self {
            AngleMode::Radians => AngleMode::Degrees,
            AngleMode::Degrees => AngleMode::Radians,
        }
    }
}

impl Default for AngleMode {
    fn default() -> Self {
        AngleMode::Radians
    }
}

impl fmt::Display for AngleMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            AngleMode::Radians => write!(f, "RAD"),
            AngleMode::Degrees => write!(f, "DEG"),
        }
    }
}

impl FromStr for AngleMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rad" | "radians" => Ok(AngleMode::Radians),
            "deg" | "degrees" => Ok(AngleMode::Degrees),
            _ => Err(format!("unknown angle mode '{}'", s)),
        }
    }
}

/// Settings an evaluation reads but never changes.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EvalContext {
    pub angle_mode: AngleMode,
}

impl EvalContext {
    pub fn new(angle_mode: AngleMode) -> Self {
        EvalContext { angle_mode }
    }

    fn to_radians(&self, x: f64) -> f64 {
        match self.angle_mode {
            AngleMode::Radians => x,
            AngleMode::Degrees => x * (PI / 180.0),
        }
    }

    fn from_radians(&self, x: f64) -> f64 {
        match self.angle_mode {
            AngleMode::Radians => x,
            AngleMode::Degrees => x * (180.0 / PI),
        }
    }
}

/// The result of running the whole engine on an input string.
#[derive(Debug, Clone, PartialEq)]
pub enum EvalOutcome {
    /// A finite value.
    Value(f64),
    /// The input stops short, e.g. a trailing operator.
    Incomplete,
    Malformed(String),
    /// The expression has no finite real value (`NaN` or an infinity).
    DomainIssue,
}

impl EvalOutcome {
    pub fn value(&self) -> Option<f64> {
        match *self {
            EvalOutcome::Value(v) => Some(v),
            _ => None,
        }
    }
}

impl From<Result<f64, CalcError>> for EvalOutcome {
    fn from(result: Result<f64, CalcError>) -> Self {
        match result {
            Ok(v) if v.is_finite() => EvalOutcome::Value(v),
            Ok(_) | Err(CalcError::Eval(_)) => EvalOutcome::DomainIssue,
            Err(CalcError::Parse(ParseError::Incomplete)) => EvalOutcome::Incomplete,
            Err(e @ CalcError::Parse(_)) | Err(e @ CalcError::Lex(_)) => {
                EvalOutcome::Malformed(e.to_string())
            }
        }
    }
}

pub fn eval_node(node: &Node, ctx: &EvalContext) -> Result<f64, EvalError> {
    match *node {
        Node::Literal(n) => Ok(n),
        Node::ConstRef(c) => Ok(c.value()),
        Node::UnaryMinus(ref arg) => Ok(-eval_node(arg, ctx)?),
        Node::BinaryOp(op, ref lhs, ref rhs) => {
            let lhs = eval_node(lhs, ctx)?;
            let rhs = eval_node(rhs, ctx)?;
            binary(op, lhs, rhs)
        }
        Node::Call(func, ref arg) => Ok(call(func, eval_node(arg, ctx)?, ctx)),
    }
}

fn binary(op: OpKind, lhs: f64, rhs: f64) -> Result<f64, EvalError> {
    let value = match op {
        OpKind::Add => lhs + rhs,
        OpKind::Sub => lhs - rhs,
        OpKind::Mul => lhs * rhs,
        OpKind::Div => lhs / rhs,
        OpKind::Mod => lhs % rhs,
        OpKind::Pow => {
            if lhs < 0.0 && rhs.is_finite() && rhs.fract() != 0.0 {
                return Err(EvalError::Domain(PartialComp::binary(
                    op.symbol(),
                    lhs,
                    rhs,
                )));
            }
            lhs.powf(rhs)
        }
    };
    Ok(value)
}

fn call(func: FnKind, x: f64, ctx: &EvalContext) -> f64 {
    match func {
        FnKind::Sin => ctx.to_radians(x).sin(),
        FnKind::Cos => ctx.to_radians(x).cos(),
        FnKind::Tan => ctx.to_radians(x).tan(),
        FnKind::Asin => ctx.from_radians(x.asin()),
        FnKind::Acos => ctx.from_radians(x.acos()),
        FnKind::Atan => ctx.from_radians(x.atan()),
        // Hyperbolic arguments are not angles.
        FnKind::Sinh => x.sinh(),
        FnKind::Cosh => x.cosh(),
        FnKind::Tanh => x.tanh(),
        FnKind::Log10 => x.log10(),
        FnKind::Ln => x.ln(),
        FnKind::Pow10 => 10f64.powf(x),
        FnKind::ExpE => x.exp(),
        FnKind::Sqrt => x.sqrt(),
        FnKind::Square => x * x,
        FnKind::Reciprocal => 1.0 / x,
        FnKind::Factorial => factorial(x),
    }
}

/// Product of `2..=floor(n)`. Negative input has no factorial; the product
/// stops growing once it overflows to infinity.
fn factorial(n: f64) -> f64 {
    if n.is_nan() || n < 0.0 {
        return f64::NAN;
    }
    if n.is_infinite() {
        return f64::INFINITY;
    }
    let bound = n.floor();
    let mut result: f64 = 1.0;
    let mut i = 2.0;
    while i <= bound && result.is_finite() {
        result *= i;
        i += 1.0;
    }
    result
}
