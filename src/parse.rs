use std::fmt;

use crate::error::ParseError;
use crate::token::*;

/// A precedence-resolved expression, ready for evaluation.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Literal(f64),
    UnaryMinus(Box<Node>),
    BinaryOp(OpKind, Box<Node>, Box<Node>),
    Call(FnKind, Box<Node>),
    ConstRef(ConstKind),
}

/// Renders the tree fully parenthesised, which makes the grouping chosen by
/// the parser visible.
impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Node::Literal(n) => write!(f, "{}", n),
            Node::UnaryMinus(ref arg) => write!(f, "(-{})", arg),
            Node::BinaryOp(op, ref lhs, ref rhs) => {
                write!(f, "({} {} {})", lhs, op.symbol(), rhs)
            }
            Node::Call(func, ref arg) => write!(f, "{}({})", func.name(), arg),
            Node::ConstRef(c) => write!(f, "{}", c.symbol()),
        }
    }
}

#[derive(Clone, Debug)]
struct IntermediateResult {
    node: Node,
    tokens_read: usize,
}

impl IntermediateResult {
    fn new(node: Node, tokens_read: usize) -> Self {
        IntermediateResult { node, tokens_read }
    }

    fn binary(self, op: OpKind, rhs: IntermediateResult) -> Self {
        IntermediateResult {
            tokens_read: self.tokens_read + rhs.tokens_read + 1,
            node: Node::BinaryOp(op, Box::new(self.node), Box::new(rhs.node)),
        }
    }
}

/// How deeply groups, signs and exponents may nest before the input is
/// rejected.
const MAX_DEPTH: usize = 256;

fn malformed<T: fmt::Display>(what: T) -> ParseError {
    ParseError::Malformed(what.to_string())
}

// Addition and subtraction
fn e_expr(token_list: &[Token], depth: usize) -> Result<IntermediateResult, ParseError> {
    let mut t1 = t_expr(token_list, depth)?;

    while let Some(&Token::Operator(op)) = token_list.get(t1.tokens_read) {
        match op {
            OpKind::Add | OpKind::Sub => {
                let t2 = t_expr(&token_list[t1.tokens_read + 1..], depth)?;
                t1 = t1.binary(op, t2);
            }
            _ => break,
        }
    }
    Ok(t1)
}

// Multiplication, division and remainder
fn t_expr(token_list: &[Token], depth: usize) -> Result<IntermediateResult, ParseError> {
    let mut u1 = u_expr(token_list, depth)?;

    while let Some(&Token::Operator(op)) = token_list.get(u1.tokens_read) {
        match op {
            OpKind::Mul | OpKind::Div | OpKind::Mod => {
                let u2 = u_expr(&token_list[u1.tokens_read + 1..], depth)?;
                u1 = u1.binary(op, u2);
            }
            _ => break,
        }
    }
    Ok(u1)
}

// Prefix signs. A minus wraps the power expression that follows it, so
// `-2^2` is `-(2^2)` while `-2+3` only negates the `2`.
fn u_expr(token_list: &[Token], depth: usize) -> Result<IntermediateResult, ParseError> {
    if depth > MAX_DEPTH {
        return Err(malformed("expression nested too deeply"));
    }
    match token_list.first() {
        Some(Token::Operator(OpKind::Sub)) => {
            let mut ir = u_expr(&token_list[1..], depth + 1)?;
            ir.node = Node::UnaryMinus(Box::new(ir.node));
            ir.tokens_read += 1;
            Ok(ir)
        }
        Some(Token::Operator(OpKind::Add)) => {
            let mut ir = u_expr(&token_list[1..], depth + 1)?;
            ir.tokens_read += 1;
            Ok(ir)
        }
        _ => f_expr(token_list, depth),
    }
}

// Exponentiation, right associative. The exponent may carry its own sign.
fn f_expr(token_list: &[Token], depth: usize) -> Result<IntermediateResult, ParseError> {
    let g1 = g_expr(token_list, depth)?;

    match token_list.get(g1.tokens_read) {
        Some(Token::Operator(OpKind::Pow)) => {
            let exponent = u_expr(&token_list[g1.tokens_read + 1..], depth + 1)?;
            Ok(g1.binary(OpKind::Pow, exponent))
        }
        _ => Ok(g1),
    }
}

/// Parses the body of a parenthesised group or function argument. Running
/// out of tokens before the closing parenthesis closes the group
/// implicitly.
fn group(token_list: &[Token], depth: usize) -> Result<IntermediateResult, ParseError> {
    if let Some(Token::RParen) = token_list.first() {
        return Err(ParseError::Incomplete);
    }
    let ir = e_expr(token_list, depth + 1)?;
    match token_list.get(ir.tokens_read) {
        Some(Token::RParen) => Ok(IntermediateResult::new(ir.node, ir.tokens_read + 1)),
        Some(token) => Err(malformed(format_args!("expected ')', got {}", token))),
        None => Ok(ir),
    }
}

// Numbers, constants, parenthesized expressions and function calls
fn g_expr(token_list: &[Token], depth: usize) -> Result<IntermediateResult, ParseError> {
    let token = token_list.first().ok_or(ParseError::Incomplete)?;
    match *token {
        Token::Number(n) => Ok(IntermediateResult::new(Node::Literal(n), 1)),
        Token::Constant(c) => Ok(IntermediateResult::new(Node::ConstRef(c), 1)),
        Token::LParen => {
            let ir = group(&token_list[1..], depth)?;
            Ok(IntermediateResult::new(ir.node, ir.tokens_read + 1))
        }
        Token::Function(func) => {
            let ir = group(&token_list[1..], depth)?;
            Ok(IntermediateResult::new(
                Node::Call(func, Box::new(ir.node)),
                ir.tokens_read + 1,
            ))
        }
        Token::BareFunction(func) => Err(malformed(format_args!(
            "function '{}' must be followed by '('",
            func.name()
        ))),
        Token::RParen => Err(malformed("unmatched ')'")),
        Token::Operator(op) => Err(malformed(format_args!(
            "expected a number, got '{}'",
            op.symbol()
        ))),
    }
}

pub fn parse(tokens: &[Token]) -> Result<Node, ParseError> {
    let ir = e_expr(tokens, 0)?;
    match tokens.get(ir.tokens_read) {
        None => Ok(ir.node),
        Some(Token::RParen) => Err(malformed("unmatched ')'")),
        Some(token) => Err(malformed(format_args!("unexpected {}", token))),
    }
}
