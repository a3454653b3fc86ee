//! Scientific calculator engine.
//!
//! An input string is tokenized, parsed into an expression tree and
//! evaluated against an angle mode. Inputs that are still being typed
//! (`3+(2`, `sin(`) parse leniently so a [`Session`] can preview a result
//! after every keypress.
//!
//! ```
//! use livecalc::{evaluate, format_number, AngleMode, EvalOutcome};
//!
//! assert_eq!(evaluate("2^3^2", AngleMode::Radians), EvalOutcome::Value(512.0));
//! assert_eq!(evaluate("3+", AngleMode::Radians), EvalOutcome::Incomplete);
//! assert_eq!(format_number(1.0 / 3.0), "0.3333333333");
//! ```

mod error;
mod eval;
mod format;
mod history;
mod keys;
mod parse;
mod session;
mod store;
mod token;

#[cfg(test)]
mod tests;

pub use error::{CalcError, EvalError, LexError, ParseError, PartialComp, StoreError};
pub use eval::{eval_node, AngleMode, EvalContext, EvalOutcome};
pub use format::format_number;
pub use history::{History, HistoryEntry, HISTORY_LIMIT};
pub use keys::Key;
pub use parse::{parse, Node};
pub use session::{Session, Theme};
pub use store::{JsonStore, MemoryStore, Snapshot, Store};
pub use token::{tokenize, ConstKind, FnKind, OpKind, Token};

/// Evaluates `input` in radians.
pub fn eval(input: &str) -> Result<f64, CalcError> {
    eval_with_context(input, &EvalContext::default())
}

pub fn eval_with_context(input: &str, ctx: &EvalContext) -> Result<f64, CalcError> {
    let tokens = token::tokenize(input)?;
    let tree = parse::parse(&tokens)?;
    Ok(eval::eval_node(&tree, ctx)?)
}

/// Runs the whole engine and classifies the result. Never fails: malformed
/// or unfinished input and non-finite results are outcomes like any other.
pub fn evaluate(input: &str, angle_mode: AngleMode) -> EvalOutcome {
    EvalOutcome::from(eval_with_context(input, &EvalContext::new(angle_mode)))
}
