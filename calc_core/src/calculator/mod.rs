//! # Keypad Calculator
//!
//! A four-function calculator driven by discrete key events, with the
//! scientific keys layered on top. Evaluation is strictly left to right: each
//! operator press immediately applies the operator already pending, so
//! `9 + 1 +` shows `10` before the next operand is typed. There is no
//! precedence and only one pending operator at a time.
//!
//! [`apply_event`] is the whole state machine as a pure function. [`Calculator`]
//! is the thin adapter that owns a state plus a history list and turns
//! finished evaluations into history entries.
//!
//! ## Example
//!
//! ```rust
//! use calc_core::calculator::{Calculator, Event};
//!
//! let mut calc = Calculator::default();
//! calc.press_keys("5 + 3 =").unwrap();
//!
//! assert_eq!(calc.display(), "8");
//! assert_eq!(calc.history().latest().unwrap().expression, "5 + 3");
//! ```
//!
//! ## Division by zero
//!
//! Any operation without a finite result (`5 ÷ 0`, `ln(-1)`, `(-3)!`, overflow)
//! moves the keypad to its `Undefined` state: the display reads
//! [`UNDEFINED_DISPLAY`], the pending operation is dropped, and operators and
//! equals are ignored until a digit, decimal point, constant or clear key is
//! pressed.

pub mod scientific;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::format::{format_operand, parse_operand, UNDEFINED_DISPLAY};
use crate::history::{CalculationHistory, CalculationHistoryEntry};

pub use scientific::{AngleMode, Constant, UnaryFunction};

// ============================================================================
// Operators and Events
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operator {
    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::Add => "+",
            Operator::Subtract => "-",
            Operator::Multiply => "×",
            Operator::Divide => "÷",
        }
    }

    /// Apply to `(a, b)`. `None` for division by zero or a non-finite result.
    pub fn apply(&self, a: f64, b: f64) -> Option<f64> {
        let result = match self {
            Operator::Add => a + b,
            Operator::Subtract => a - b,
            Operator::Multiply => a * b,
            Operator::Divide if b == 0.0 => return None,
            Operator::Divide => a / b,
        };
        Some(result).filter(|r| r.is_finite())
    }
}

/// One keypad or keyboard input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    /// 0 through 9
    Digit(u8),
    Decimal,
    Operator(Operator),
    Equals,
    ClearAll,
    ClearEntry,
    Backspace,
    Unary(UnaryFunction),
    Constant(Constant),
    ToggleAngleMode,
}

impl Event {
    /// Map a key name or keypad label to an event.
    ///
    /// Accepts keyboard names (`Enter`, `Escape`, `Backspace`, `Delete`),
    /// ASCII and typographic operators, and scientific key labels.
    pub fn from_key(key: &str) -> Option<Event> {
        let key = key.trim();
        if let [b] = key.as_bytes() {
            if b.is_ascii_digit() {
                return Some(Event::Digit(b - b'0'));
            }
        }

        let event = match key {
            "." | "," => Event::Decimal,
            "+" => Event::Operator(Operator::Add),
            "-" | "−" => Event::Operator(Operator::Subtract),
            "*" | "x" | "X" | "×" => Event::Operator(Operator::Multiply),
            "/" | "÷" => Event::Operator(Operator::Divide),
            "=" => Event::Equals,
            "CE" => Event::ClearEntry,
            "C" | "AC" => Event::ClearAll,
            "⌫" => Event::Backspace,
            "π" => Event::Constant(Constant::Pi),
            "√" => Event::Unary(UnaryFunction::Sqrt),
            "x²" => Event::Unary(UnaryFunction::Square),
            "x³" => Event::Unary(UnaryFunction::Cube),
            "±" | "+/-" => Event::Unary(UnaryFunction::Negate),
            "!" | "n!" => Event::Unary(UnaryFunction::Factorial),
            "1/x" => Event::Unary(UnaryFunction::Reciprocal),
            _ => return Self::from_key_name(&key.to_ascii_lowercase()),
        };
        Some(event)
    }

    fn from_key_name(name: &str) -> Option<Event> {
        let event = match name {
            "enter" | "return" => Event::Equals,
            "c" | "ac" | "escape" | "esc" | "clear" => Event::ClearAll,
            "ce" | "delete" | "del" => Event::ClearEntry,
            "backspace" | "bs" => Event::Backspace,
            "pi" => Event::Constant(Constant::Pi),
            "e" => Event::Constant(Constant::E),
            "sin" => Event::Unary(UnaryFunction::Sin),
            "cos" => Event::Unary(UnaryFunction::Cos),
            "tan" => Event::Unary(UnaryFunction::Tan),
            "log" => Event::Unary(UnaryFunction::Log10),
            "ln" => Event::Unary(UnaryFunction::Ln),
            "sqrt" => Event::Unary(UnaryFunction::Sqrt),
            "sqr" | "square" => Event::Unary(UnaryFunction::Square),
            "cube" => Event::Unary(UnaryFunction::Cube),
            "inv" | "recip" => Event::Unary(UnaryFunction::Reciprocal),
            "neg" | "negate" => Event::Unary(UnaryFunction::Negate),
            "fact" => Event::Unary(UnaryFunction::Factorial),
            "deg" | "rad" | "drg" => Event::ToggleAngleMode,
            _ => return None,
        };
        Some(event)
    }
}

/// Split a typed key sequence into events.
///
/// Tokens are whitespace separated. A token that is not itself a key name is
/// read one character at a time, so `"12.5*4="` and `"1 2 . 5 * 4 ="` are the
/// same sequence.
pub fn parse_keys(input: &str) -> CalcResult<Vec<Event>> {
    let mut events = Vec::new();
    for token in input.split_whitespace() {
        if let Some(event) = Event::from_key(token) {
            events.push(event);
            continue;
        }

        for c in token.chars() {
            let mut buf = [0u8; 4];
            let event = Event::from_key(c.encode_utf8(&mut buf))
                .ok_or_else(|| CalcError::invalid_input("keys", token, format!("Unrecognized key '{}'", c)))?;
            events.push(event);
        }
    }
    Ok(events)
}

// ============================================================================
// State
// ============================================================================

/// Where the keypad is in its input cycle, derived from the state fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Building the display value
    Entering,
    /// An operator was chosen; the next digit starts a fresh operand
    OperatorPending,
    /// A computed value is showing; the next digit starts a fresh number
    Result,
}

/// Keypad state for one calculator instance.
///
/// `display` always parses to a finite number. While `undefined` is set the
/// buffer holds `"0"` and [`CalculatorState::display_text`] shows the
/// undefined sentinel instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculatorState {
    pub display: String,
    /// Left operand, set together with `pending_operator`
    pub previous_value: Option<f64>,
    pub pending_operator: Option<Operator>,
    /// Next digit replaces the display instead of appending
    pub awaiting_fresh_operand: bool,
    pub undefined: bool,
    pub angle_mode: AngleMode,
}

impl Default for CalculatorState {
    fn default() -> Self {
        CalculatorState {
            display: "0".to_string(),
            previous_value: None,
            pending_operator: None,
            awaiting_fresh_operand: false,
            undefined: false,
            angle_mode: AngleMode::default(),
        }
    }
}

impl CalculatorState {
    pub fn with_angle_mode(angle_mode: AngleMode) -> Self {
        CalculatorState {
            angle_mode,
            ..Default::default()
        }
    }

    /// Text the user sees
    pub fn display_text(&self) -> &str {
        if self.undefined {
            UNDEFINED_DISPLAY
        } else {
            &self.display
        }
    }

    pub fn is_undefined(&self) -> bool {
        self.undefined
    }

    pub fn phase(&self) -> Phase {
        match (self.pending_operator, self.awaiting_fresh_operand) {
            _ if self.undefined => Phase::Result,
            (Some(_), true) => Phase::OperatorPending,
            (None, true) => Phase::Result,
            (_, false) => Phase::Entering,
        }
    }

    /// Current display as a number
    pub fn operand(&self) -> f64 {
        parse_operand(&self.display)
    }

    /// Drop any pending operation and show the undefined sentinel
    fn enter_undefined(&mut self) {
        self.display = "0".to_string();
        self.previous_value = None;
        self.pending_operator = None;
        self.awaiting_fresh_operand = true;
        self.undefined = true;
    }

    fn show_result(&mut self, value: f64) {
        self.display = format_operand(value);
        self.awaiting_fresh_operand = true;
        self.undefined = false;
    }
}

/// A completed computation produced by a transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evaluation {
    pub expression: String,
    pub result: String,
}

// ============================================================================
// Transitions
// ============================================================================

/// Apply one event to a state.
///
/// Returns the next state and, when the event finished a computation (equals
/// or a unary function), the expression and result to record.
pub fn apply_event(state: &CalculatorState, event: Event) -> (CalculatorState, Option<Evaluation>) {
    let mut next = state.clone();
    let evaluation = match event {
        Event::Digit(d) => {
            press_digit(&mut next, d);
            None
        }
        Event::Decimal => {
            press_decimal(&mut next);
            None
        }
        Event::Operator(op) => {
            press_operator(&mut next, op);
            None
        }
        Event::Equals => press_equals(&mut next),
        Event::ClearAll => {
            next = CalculatorState::with_angle_mode(state.angle_mode);
            None
        }
        Event::ClearEntry => {
            next.display = "0".to_string();
            next.awaiting_fresh_operand = false;
            next.undefined = false;
            None
        }
        Event::Backspace => {
            press_backspace(&mut next);
            None
        }
        Event::Unary(function) => press_unary(&mut next, function),
        Event::Constant(constant) => {
            next.show_result(constant.value());
            None
        }
        Event::ToggleAngleMode => {
            next.angle_mode = next.angle_mode.toggled();
            None
        }
    };
    (next, evaluation)
}

/// Digits accepted in one typed operand; further digits are ignored
const MAX_ENTRY_DIGITS: usize = 16;

fn press_digit(state: &mut CalculatorState, digit: u8) {
    if digit > 9 {
        return;
    }
    let digit = char::from(b'0' + digit);

    if state.awaiting_fresh_operand || state.undefined {
        state.display = digit.to_string();
        state.awaiting_fresh_operand = false;
        state.undefined = false;
    } else if state.display == "0" {
        state.display = digit.to_string();
    } else if entry_digits(&state.display) < MAX_ENTRY_DIGITS {
        state.display.push(digit);
    }
}

fn entry_digits(display: &str) -> usize {
    display.chars().filter(|c| c.is_ascii_digit()).count()
}

fn press_decimal(state: &mut CalculatorState) {
    if state.awaiting_fresh_operand || state.undefined {
        state.display = "0.".to_string();
        state.awaiting_fresh_operand = false;
        state.undefined = false;
    } else if !state.display.contains('.') {
        state.display.push('.');
    }
}

fn press_operator(state: &mut CalculatorState, op: Operator) {
    if state.undefined {
        return;
    }

    let operand = state.operand();
    match (state.previous_value, state.pending_operator) {
        (Some(previous), Some(pending)) => match pending.apply(previous, operand) {
            Some(result) => {
                debug!("chained {} {} {} = {}", previous, pending.symbol(), operand, result);
                state.previous_value = Some(result);
                state.display = format_operand(result);
            }
            None => {
                warn!("chained {} {} {} is undefined", previous, pending.symbol(), operand);
                state.enter_undefined();
                return;
            }
        },
        _ => state.previous_value = Some(operand),
    }

    state.pending_operator = Some(op);
    state.awaiting_fresh_operand = true;
}

fn press_equals(state: &mut CalculatorState) -> Option<Evaluation> {
    if state.undefined {
        return None;
    }
    let (previous, op) = match (state.previous_value, state.pending_operator) {
        (Some(previous), Some(op)) => (previous, op),
        _ => return None,
    };

    let operand = state.operand();
    let expression = format!("{} {} {}", format_operand(previous), op.symbol(), format_operand(operand));

    state.previous_value = None;
    state.pending_operator = None;

    let result = match op.apply(previous, operand) {
        Some(value) => {
            state.show_result(value);
            state.display.clone()
        }
        None => {
            warn!("{} is undefined", expression);
            state.enter_undefined();
            UNDEFINED_DISPLAY.to_string()
        }
    };

    debug!("{} = {}", expression, result);
    Some(Evaluation { expression, result })
}

fn press_backspace(state: &mut CalculatorState) {
    if state.undefined {
        state.display = "0".to_string();
        state.undefined = false;
        state.awaiting_fresh_operand = false;
        return;
    }

    if state.display.chars().count() <= 1 {
        state.display = "0".to_string();
    } else {
        state.display.pop();
        if state.display == "-" {
            state.display = "0".to_string();
        }
    }
}

fn press_unary(state: &mut CalculatorState, function: UnaryFunction) -> Option<Evaluation> {
    if state.undefined {
        return None;
    }

    let operand = state.operand();
    let expression = function.expression(&format_operand(operand));

    let result = match function.apply(operand, state.angle_mode) {
        Some(value) => {
            state.show_result(value);
            state.display.clone()
        }
        None => {
            warn!("{} is undefined", expression);
            state.enter_undefined();
            UNDEFINED_DISPLAY.to_string()
        }
    };

    Some(Evaluation { expression, result })
}

// ============================================================================
// Calculator (state + history)
// ============================================================================

/// A keypad calculator with its own history list.
#[derive(Debug, Clone, Default)]
pub struct Calculator {
    state: CalculatorState,
    history: CalculationHistory,
}

impl Calculator {
    /// Create a calculator whose history keeps at most `history_cap` entries
    pub fn new(history_cap: usize) -> Self {
        Calculator {
            state: CalculatorState::default(),
            history: CalculationHistory::with_cap(history_cap),
        }
    }

    /// Resume with an existing history (e.g., loaded from storage)
    pub fn with_history(history: CalculationHistory) -> Self {
        Calculator {
            state: CalculatorState::default(),
            history,
        }
    }

    pub fn with_angle_mode(mut self, angle_mode: AngleMode) -> Self {
        self.state.angle_mode = angle_mode;
        self
    }

    /// Feed one event. Returns the history entry it created, if any.
    pub fn press(&mut self, event: Event) -> Option<&CalculationHistoryEntry> {
        let (next, evaluation) = apply_event(&self.state, event);
        self.state = next;

        let evaluation = evaluation?;
        self.history
            .push(CalculationHistoryEntry::new(evaluation.expression, evaluation.result));
        self.history.latest()
    }

    pub fn press_all(&mut self, events: impl IntoIterator<Item = Event>) {
        for event in events {
            self.press(event);
        }
    }

    /// Parse and feed a typed key sequence (see [`parse_keys`]).
    ///
    /// The sequence is validated before any key is applied.
    pub fn press_keys(&mut self, input: &str) -> CalcResult<()> {
        let events = parse_keys(input)?;
        self.press_all(events);
        Ok(())
    }

    pub fn display(&self) -> &str {
        self.state.display_text()
    }

    pub fn state(&self) -> &CalculatorState {
        &self.state
    }

    pub fn history(&self) -> &CalculationHistory {
        &self.history
    }

    pub fn history_mut(&mut self) -> &mut CalculationHistory {
        &mut self.history
    }

    pub fn into_history(self) -> CalculationHistory {
        self.history
    }
}
