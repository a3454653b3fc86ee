//! Calculator session: the input buffer and the settings that travel with
//! it.
//!
//! Every edit re-runs the engine on the buffer and stages the result as a
//! preview. Failures during typing only clear the preview; the buffer is
//! never rewritten because of an error. Only [`Session::commit`] turns a
//! failure into a visible `"Error"`.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::eval::{AngleMode, EvalOutcome};
use crate::format::format_number;
use crate::history::History;
use crate::keys::Key;
use crate::store::Snapshot;
use crate::token::{ConstKind, FnKind, OpKind};

const EMPTY_INPUT: &str = "0";
const ERROR_TEXT: &str = "Error";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub fn toggle(self) -> Theme {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Theme::Light
    }
}

#[derive(Debug, Clone)]
pub struct Session {
    input: String,
    pending_result: Option<String>,
    last_committed: Option<String>,
    memory: f64,
    angle_mode: AngleMode,
    theme: Theme,
    second: bool,
    history: History,
}

impl Default for Session {
    fn default() -> Self {
        Session {
            input: EMPTY_INPUT.to_string(),
            pending_result: None,
            last_committed: None,
            memory: 0.0,
            angle_mode: AngleMode::default(),
            theme: Theme::default(),
            second: false,
            history: History::new(),
        }
    }
}

fn is_operator(c: char) -> bool {
    c.is_ascii() && OpKind::from_char(c).is_some()
}

/// Operators after which a `-` starts a signed operand instead of
/// replacing the operator.
fn takes_signed_operand(c: char) -> bool {
    matches!(c, '*' | '/' | '%' | '^')
}

impl Session {
    pub fn new() -> Self {
        Session::default()
    }

    /// Rebuilds a session from persisted settings. An unreadable memory
    /// value is dropped rather than failing the restore.
    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        let memory = match snapshot.memory.trim().parse::<f64>() {
            Ok(value) if value.is_finite() => value,
            _ => {
                log::warn!("ignoring stored memory value {:?}", snapshot.memory);
                0.0
            }
        };
        Session {
            memory,
            angle_mode: snapshot.angle_mode,
            theme: snapshot.theme,
            history: History::from_entries(snapshot.history),
            ..Session::default()
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            angle_mode: self.angle_mode,
            theme: self.theme,
            memory: self.memory.to_string(),
            history: self.history.iter().cloned().collect(),
        }
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    /// The input with `*` and `/` shown as `×` and `÷`.
    pub fn display_input(&self) -> String {
        self.input.replace('*', "×").replace('/', "÷")
    }

    /// The live preview, or `"Error"` after a failed commit.
    pub fn result(&self) -> Option<&str> {
        self.pending_result.as_deref()
    }

    pub fn last_committed(&self) -> Option<&str> {
        self.last_committed.as_deref()
    }

    pub fn memory(&self) -> f64 {
        self.memory
    }

    pub fn angle_mode(&self) -> AngleMode {
        self.angle_mode
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn is_second(&self) -> bool {
        self.second
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn press(&mut self, key: Key) {
        match key {
            Key::Digit(c) => self.append_digit_or_point(c),
            Key::Operator(op) => self.append_operator(op),
            Key::Equals => {
                self.commit();
            }
            Key::AllClear => self.clear_all(),
            Key::Delete => self.delete_last(),
            Key::ToggleSign => self.toggle_sign(),
            Key::Function(func) => {
                let func = if self.second { func.second() } else { func };
                self.append_function(func)
            }
            Key::Constant(c) => self.append_constant(c),
            Key::OpenParen => self.append_parenthesis('('),
            Key::CloseParen => self.append_parenthesis(')'),
            Key::Second => self.toggle_second(),
            Key::MemoryClear => self.memory_clear(),
            Key::MemoryAdd => self.memory_add(),
            Key::MemorySubtract => self.memory_subtract(),
            Key::MemoryRecall => self.memory_recall(),
        }
    }

    pub fn append_digit_or_point(&mut self, c: char) {
        self.last_committed = None;
        if c != '.' && self.input == EMPTY_INPUT {
            self.input = c.to_string();
        } else if c != '.' && self.input == "-0" {
            self.input = format!("-{}", c);
        } else if c == '.' && self.current_number().contains('.') {
            return;
        } else {
            self.input.push(c);
        }
        self.refresh_preview();
    }

    /// A second operator replaces a trailing one, except that `-` after
    /// `* / % ^` is kept as the sign of the next operand (`5*-`).
    pub fn append_operator(&mut self, op: OpKind) {
        if let Some(result) = self.last_committed.take() {
            self.input = result;
        }
        let symbol = op.symbol();
        let mut tail = self.input.chars().rev();
        match (tail.next(), tail.next()) {
            (Some('-'), Some(before)) if takes_signed_operand(before) => {
                if op != OpKind::Sub {
                    self.input.pop();
                    self.input.pop();
                    self.input.push(symbol);
                }
            }
            (Some(last), _) if takes_signed_operand(last) && op == OpKind::Sub => {
                self.input.push(symbol);
            }
            (Some(last), _) if is_operator(last) => {
                self.input.pop();
                self.input.push(symbol);
            }
            _ => self.input.push(symbol),
        }
        self.refresh_preview();
    }

    pub fn append_function(&mut self, func: FnKind) {
        self.last_committed = None;
        if self.input == EMPTY_INPUT {
            self.input.clear();
        }
        self.input.push_str(func.name());
        self.input.push('(');
        self.refresh_preview();
    }

    pub fn append_constant(&mut self, c: ConstKind) {
        self.last_committed = None;
        self.insert_operand(c.symbol());
        self.refresh_preview();
    }

    pub fn append_parenthesis(&mut self, paren: char) {
        self.last_committed = None;
        if paren == '(' && self.input == EMPTY_INPUT {
            self.input.clear();
        }
        self.input.push(paren);
        self.refresh_preview();
    }

    pub fn toggle_sign(&mut self) {
        self.last_committed = None;
        if self.input == EMPTY_INPUT {
            self.input = "-0".to_string();
        } else if self.input == "-0" {
            self.input = EMPTY_INPUT.to_string();
        } else if self.input.starts_with('-') {
            self.input.remove(0);
        } else {
            self.input.insert(0, '-');
        }
        self.refresh_preview();
    }

    /// Removes the last character, or a whole trailing function opener
    /// such as `sqrt(`.
    pub fn delete_last(&mut self) {
        self.last_committed = None;
        let opener = FnKind::ALL
            .iter()
            .filter(|f| self.ends_with_opener(**f))
            .map(|f| f.name().len() + 1)
            .max();
        let count = self.input.chars().count();
        if let Some(len) = opener {
            self.input.truncate(self.input.len() - len);
        } else if count <= 1 || (count == 2 && self.input.starts_with('-')) {
            self.input.clear();
        } else {
            self.input.pop();
        }
        if self.input.is_empty() {
            self.input = EMPTY_INPUT.to_string();
        }
        self.refresh_preview();
    }

    pub fn clear_all(&mut self) {
        self.input = EMPTY_INPUT.to_string();
        self.pending_result = None;
        self.last_committed = None;
    }

    /// Evaluates the whole buffer. A finite value replaces the buffer and
    /// is recorded in the history; anything else shows `"Error"` and keeps
    /// the buffer.
    pub fn commit(&mut self) -> EvalOutcome {
        let outcome = crate::evaluate(&self.input, self.angle_mode);
        match outcome {
            EvalOutcome::Value(value) => {
                let result = format_number(value);
                debug!("committed {:?} = {}", self.input, result);
                let expression = std::mem::replace(&mut self.input, result.clone());
                self.history.record(expression, result.clone());
                self.last_committed = Some(result);
                self.pending_result = None;
            }
            ref failed => {
                debug!("commit of {:?} failed: {:?}", self.input, failed);
                self.pending_result = Some(ERROR_TEXT.to_string());
            }
        }
        outcome
    }

    pub fn set_angle_mode(&mut self, angle_mode: AngleMode) {
        self.angle_mode = angle_mode;
        self.refresh_preview();
    }

    pub fn toggle_angle_mode(&mut self) {
        self.set_angle_mode(self.angle_mode.toggle());
    }

    pub fn toggle_theme(&mut self) {
        self.theme = self.theme.toggle();
    }

    pub fn toggle_second(&mut self) {
        self.second = !self.second;
    }

    pub fn memory_clear(&mut self) {
        self.memory = 0.0;
    }

    pub fn memory_add(&mut self) {
        if let Some(value) = self.current_value() {
            self.store_memory(self.memory + value);
        }
    }

    pub fn memory_subtract(&mut self) {
        if let Some(value) = self.current_value() {
            self.store_memory(self.memory - value);
        }
    }

    /// The register only ever holds finite values.
    fn store_memory(&mut self, next: f64) {
        if next.is_finite() {
            self.memory = next;
        }
    }

    /// Inserts the memory register into the buffer like a constant. An
    /// empty register inserts nothing.
    pub fn memory_recall(&mut self) {
        if self.memory == 0.0 {
            return;
        }
        self.last_committed = None;
        let text = self.memory.to_string();
        self.insert_operand(&text);
        self.refresh_preview();
    }

    /// Loads an expression into the buffer, e.g. one picked from the
    /// history.
    pub fn load_input(&mut self, expression: &str) {
        self.last_committed = None;
        self.input = if expression.trim().is_empty() {
            EMPTY_INPUT.to_string()
        } else {
            expression.to_string()
        };
        self.refresh_preview();
    }

    /// Puts the expression of the `index`th newest history entry back into
    /// the buffer. Returns false when there is no such entry.
    pub fn replay(&mut self, index: usize) -> bool {
        match self.history.get(index) {
            Some(entry) => {
                let expression = entry.expression.clone();
                self.load_input(&expression);
                true
            }
            None => false,
        }
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    fn refresh_preview(&mut self) {
        self.pending_result = match crate::evaluate(&self.input, self.angle_mode) {
            EvalOutcome::Value(value) => Some(format_number(value)),
            outcome => {
                debug!("no preview for {:?}: {:?}", self.input, outcome);
                None
            }
        };
    }

    fn current_value(&self) -> Option<f64> {
        crate::evaluate(&self.input, self.angle_mode).value()
    }

    /// The run of digits and decimal points at the end of the buffer.
    fn current_number(&self) -> &str {
        self.input
            .rsplit(|c: char| !(c.is_ascii_digit() || c == '.'))
            .next()
            .unwrap_or("")
    }

    fn ends_with_opener(&self, func: FnKind) -> bool {
        self.input
            .strip_suffix('(')
            .map_or(false, |rest| rest.ends_with(func.name()))
    }

    /// Places a constant-like operand: it replaces a bare `0`, follows an
    /// operator or `(` directly, and is multiplied onto anything else.
    fn insert_operand(&mut self, text: &str) {
        if self.input == EMPTY_INPUT {
            self.input = text.to_string();
            return;
        }
        match self.input.chars().last() {
            Some(c) if is_operator(c) || c == '(' => (),
            _ => self.input.push('*'),
        }
        self.input.push_str(text);
    }
}
