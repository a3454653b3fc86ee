use std::fmt;
use std::iter::Peekable;

use crate::error::LexError;

/// Binary operators, from loosest to tightest binding: `+ -`, `* / %`, `^`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpKind {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
}

impl OpKind {
    /// Maps an operator character to its kind. The display glyphs `×` and
    /// `÷` are accepted so rendered input can be pasted back.
    pub fn from_char(c: char) -> Option<OpKind> {
        match c {
            '+' => Some(OpKind::Add),
            '-' => Some(OpKind::Sub),
            '*' | '×' => Some(OpKind::Mul),
            '/' | '÷' => Some(OpKind::Div),
            '%' => Some(OpKind::Mod),
            '^' => Some(OpKind::Pow),
            _ => None,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            OpKind::Add => '+',
            OpKind::Sub => '-',
            OpKind::Mul => '*',
            OpKind::Div => '/',
            OpKind::Mod => '%',
            OpKind::Pow => '^',
        }
    }
}

/// Unary functions. Each is written as its name immediately followed by
/// an opening parenthesis, e.g. `sqrt(`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FnKind {
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    Sinh,
    Cosh,
    Tanh,
    Log10,
    Ln,
    Pow10,
    ExpE,
    Sqrt,
    Square,
    Reciprocal,
    Factorial,
}

impl FnKind {
    pub const ALL: [FnKind; 17] = [
        FnKind::Sin,
        FnKind::Cos,
        FnKind::Tan,
        FnKind::Asin,
        FnKind::Acos,
        FnKind::Atan,
        FnKind::Sinh,
        FnKind::Cosh,
        FnKind::Tanh,
        FnKind::Log10,
        FnKind::Ln,
        FnKind::Pow10,
        FnKind::ExpE,
        FnKind::Sqrt,
        FnKind::Square,
        FnKind::Reciprocal,
        FnKind::Factorial,
    ];

    pub fn name(self) -> &'static str {
        match self {
            FnKind::Sin => "sin",
            FnKind::Cos => "cos",
            FnKind::Tan => "tan",
            FnKind::Asin => "asin",
            FnKind::Acos => "acos",
            FnKind::Atan => "atan",
            FnKind::Sinh => "sinh",
            FnKind::Cosh => "cosh",
            FnKind::Tanh => "tanh",
            FnKind::Log10 => "log",
            FnKind::Ln => "ln",
            FnKind::Pow10 => "antilog",
            FnKind::ExpE => "exp",
            FnKind::Sqrt => "sqrt",
            FnKind::Square => "sqr",
            FnKind::Reciprocal => "reciproc",
            FnKind::Factorial => "fact",
        }
    }

    pub fn from_name(name: &str) -> Option<FnKind> {
        FnKind::ALL.iter().copied().find(|f| f.name() == name)
    }

    /// The function sharing this one's key when the second function set
    /// is active.
    pub fn second(self) -> FnKind {
        match self {
            FnKind::Sin => FnKind::Sinh,
            FnKind::Cos => FnKind::Cosh,
            FnKind::Tan => FnKind::Tanh,
            FnKind::Log10 => FnKind::Pow10,
            FnKind::Ln => FnKind::ExpE,
            other => other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstKind {
    Pi,
    E,
}

impl ConstKind {
    pub fn symbol(self) -> &'static str {
        match self {
            ConstKind::Pi => "π",
            ConstKind::E => "e",
        }
    }

    pub fn value(self) -> f64 {
        match self {
            ConstKind::Pi => std::f64::consts::PI,
            ConstKind::E => std::f64::consts::E,
        }
    }

    fn from_name(name: &str) -> Option<ConstKind> {
        match name {
            "π" | "pi" => Some(ConstKind::Pi),
            "e" => Some(ConstKind::E),
            _ => None,
        }
    }
}

/// Tokens used for parsing an arithmetic expression
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Token {
    Number(f64),
    Operator(OpKind),
    /// A function name together with its opening parenthesis.
    Function(FnKind),
    /// A function name that is not followed by `(`.
    BareFunction(FnKind),
    Constant(ConstKind),
    LParen,
    RParen,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Token::Number(n) => write!(f, "'{}'", n),
            Token::Operator(op) => write!(f, "'{}'", op.symbol()),
            Token::Function(func) => write!(f, "'{}('", func.name()),
            Token::BareFunction(func) => write!(f, "'{}'", func.name()),
            Token::Constant(c) => write!(f, "'{}'", c.symbol()),
            Token::LParen => write!(f, "'('"),
            Token::RParen => write!(f, "')'"),
        }
    }
}

pub fn tokenize(input: &str) -> Result<Vec<Token>, LexError> {
    let mut tokens = Vec::with_capacity(input.len());
    let mut chars = input.chars().enumerate().peekable();

    while let Some(&(pos, c)) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
        } else if c.is_ascii_digit() || c == '.' {
            tokens.push(consume_number(&mut chars)?);
        } else if c == 'π' {
            chars.next();
            tokens.push(Token::Constant(ConstKind::Pi));
        } else if c.is_alphabetic() {
            tokens.push(consume_word(&mut chars)?);
        } else {
            chars.next();
            let token = match c {
                '(' => Token::LParen,
                ')' => Token::RParen,
                '*' if chars.peek().map(|&(_, next)| next) == Some('*') => {
                    chars.next();
                    Token::Operator(OpKind::Pow)
                }
                _ => OpKind::from_char(c)
                    .map(Token::Operator)
                    .ok_or(LexError::UnknownCharacter(c, pos))?,
            };
            tokens.push(token);
        }
    }
    log::trace!("tokenized {:?} into {:?}", input, tokens);
    Ok(tokens)
}

fn digits<I>(input: &mut Peekable<I>) -> String
    where I: Iterator<Item = (usize, char)>
{
    let mut number = String::new();
    while let Some(&(_, c)) = input.peek() {
        if c.is_ascii_digit() {
            number.push(c);
        } else {
            break;
        }
        input.next();
    }
    number
}

/// Digits with at most one decimal point, optionally followed by an
/// exponent such as `e+20` or `e-11`.
fn consume_number<I>(input: &mut Peekable<I>) -> Result<Token, LexError>
    where I: Iterator<Item = (usize, char)> + Clone
{
    let start = input.peek().map(|&(pos, _)| pos).unwrap_or(0);
    let mut number = digits(input);
    if let Some(&(_, '.')) = input.peek() {
        input.next();
        number.push('.');
        number.push_str(&digits(input));
    }
    if number == "." {
        return Err(LexError::InvalidNumber(number, start));
    }
    if let Some(exponent) = consume_exponent(input) {
        number.push_str(&exponent);
    }
    number
        .parse()
        .map(Token::Number)
        .map_err(|_| LexError::InvalidNumber(number, start))
}

/// Only consumes the exponent when digits follow the `e`, so that a bare
/// `e` is left for the constant.
fn consume_exponent<I>(input: &mut Peekable<I>) -> Option<String>
    where I: Iterator<Item = (usize, char)> + Clone
{
    let mut ahead = input.clone();
    let mut exponent = String::new();
    match ahead.next() {
        Some((_, 'e')) => exponent.push('e'),
        _ => return None,
    }
    match ahead.peek() {
        Some(&(_, sign)) if sign == '+' || sign == '-' => {
            exponent.push(sign);
            ahead.next();
        }
        _ => (),
    }
    let digits = digits(&mut ahead);
    if digits.is_empty() {
        return None;
    }
    exponent.push_str(&digits);
    *input = ahead;
    Some(exponent)
}

/// Consume a constant or function name. Function names only form a
/// `Function` token when immediately followed by `(`, which is consumed
/// along with the name.
fn consume_word<I>(input: &mut Peekable<I>) -> Result<Token, LexError>
    where I: Iterator<Item = (usize, char)>
{
    let mut word = String::new();
    let mut first = None;
    while let Some(&(pos, c)) = input.peek() {
        if c.is_alphabetic() && c != 'π' {
            first.get_or_insert((c, pos));
            word.push(c);
            input.next();
        } else {
            break;
        }
    }

    if let Some(constant) = ConstKind::from_name(&word) {
        return Ok(Token::Constant(constant));
    }
    match FnKind::from_name(&word) {
        Some(func) => {
            if let Some(&(_, '(')) = input.peek() {
                input.next();
                Ok(Token::Function(func))
            } else {
                Ok(Token::BareFunction(func))
            }
        }
        None => {
            let (c, pos) = first.unwrap_or(('?', 0));
            Err(LexError::UnknownCharacter(c, pos))
        }
    }
}
