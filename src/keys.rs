use std::str::FromStr;

use crate::token::{ConstKind, FnKind, OpKind};

/// A calculator button. Function keys carry the first-set function; the
/// session swaps in the second-set one while second mode is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// A digit or the decimal point.
    Digit(char),
    Operator(OpKind),
    Equals,
    AllClear,
    Delete,
    ToggleSign,
    Function(FnKind),
    Constant(ConstKind),
    OpenParen,
    CloseParen,
    Second,
    MemoryClear,
    MemoryAdd,
    MemorySubtract,
    MemoryRecall,
}

impl Key {
    /// Maps a keyboard key name to a button, the way a physical keyboard
    /// drives the calculator.
    pub fn from_keyboard(name: &str) -> Option<Key> {
        match name {
            "Enter" => Some(Key::Equals),
            "Escape" => Some(Key::AllClear),
            "Backspace" => Some(Key::Delete),
            _ => {
                let mut chars = name.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) if c.is_ascii_digit() || c == '.' => Some(Key::Digit(c)),
                    (Some('('), None) => Some(Key::OpenParen),
                    (Some(')'), None) => Some(Key::CloseParen),
                    (Some(c), None) if c.is_ascii() => OpKind::from_char(c).map(Key::Operator),
                    _ => None,
                }
            }
        }
    }
}

impl FromStr for Key {
    type Err = String;

    /// Parses a button identifier such as `7`, `+/-`, `sin`, `x2` or `m+`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = match s {
            "=" => Key::Equals,
            "ac" => Key::AllClear,
            "del" => Key::Delete,
            "+/-" => Key::ToggleSign,
            "sin" => Key::Function(FnKind::Sin),
            "cos" => Key::Function(FnKind::Cos),
            "tan" => Key::Function(FnKind::Tan),
            "asin" => Key::Function(FnKind::Asin),
            "acos" => Key::Function(FnKind::Acos),
            "atan" => Key::Function(FnKind::Atan),
            "log" => Key::Function(FnKind::Log10),
            "ln" => Key::Function(FnKind::Ln),
            "sqrt" => Key::Function(FnKind::Sqrt),
            "!" => Key::Function(FnKind::Factorial),
            "x2" => Key::Function(FnKind::Square),
            "1/x" => Key::Function(FnKind::Reciprocal),
            "pi" => Key::Constant(ConstKind::Pi),
            "e" => Key::Constant(ConstKind::E),
            "(" => Key::OpenParen,
            ")" => Key::CloseParen,
            "2nd" => Key::Second,
            "mc" => Key::MemoryClear,
            "m+" => Key::MemoryAdd,
            "m-" => Key::MemorySubtract,
            "mr" => Key::MemoryRecall,
            _ => {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) if c.is_ascii_digit() || c == '.' => Key::Digit(c),
                    (Some(c), None) if c.is_ascii() => OpKind::from_char(c)
                        .map(Key::Operator)
                        .ok_or_else(|| format!("unknown key '{}'", s))?,
                    _ => return Err(format!("unknown key '{}'", s)),
                }
            }
        };
        Ok(key)
    }
}
