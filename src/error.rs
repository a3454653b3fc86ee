use std::fmt;
use std::io;

use thiserror::Error;

/// Represents a partial computation that can be captured as part of an
/// error message.
#[derive(Debug, Clone, PartialEq)]
pub struct PartialComp {
    op: String,
    lhs: String,
    rhs: String,
}

impl PartialComp {
    pub fn binary<T, U, V>(op: T, lhs: U, rhs: V) -> Self
        where T: ToString, U: ToString, V: ToString
    {
        PartialComp {
            op: op.to_string(),
            lhs: lhs.to_string(),
            rhs: rhs.to_string(),
        }
    }
}

impl fmt::Display for PartialComp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {} {}", self.lhs, self.op, self.rhs)
    }
}

/// Errors raised while splitting the input into tokens. Positions are
/// character offsets into the input.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LexError {
    #[error("unknown character '{0}' at position {1}")]
    UnknownCharacter(char, usize),
    #[error("invalid number '{0}' at position {1}")]
    InvalidNumber(String, usize),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    /// The input stops where an operand was still expected. Live preview
    /// treats this as "nothing to show yet".
    #[error("incomplete expression")]
    Incomplete,
    #[error("malformed expression: {0}")]
    Malformed(String),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    #[error("expression '{0}' has no real value")]
    Domain(PartialComp),
}

/// Any failure of the tokenize → parse → evaluate pipeline.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalcError {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Eval(#[from] EvalError),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("cannot access state file: {0}")]
    Io(#[from] io::Error),
    #[error("invalid state file: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages() {
        let cases = vec![
            (
                CalcError::from(LexError::UnknownCharacter('$', 3)),
                "unknown character '$' at position 3",
            ),
            (
                CalcError::from(ParseError::Malformed("unexpected ')'".into())),
                "malformed expression: unexpected ')'",
            ),
            (
                CalcError::from(EvalError::Domain(
                    PartialComp::binary("^", -8, 0.5),
                )),
                "expression '-8 ^ 0.5' has no real value",
            ),
        ];
        for (error, expected) in cases {
            assert_eq!(error.to_string(), expected);
        }
    }
}
