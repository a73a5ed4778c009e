//! Four-function keypad calculator.
//!
//! The display is text, exactly what a user would read off the screen. Keys
//! are fed one at a time through [`Keypad::press`].
//!
//! A pending operation is evaluated when the next operator arrives, so
//! `2 + 3 × 4 =` reads `20`. Older keypads in this product replaced the
//! pending value instead and showed `12`. Pressing a second operator before
//! any new digit only swaps the operator.

use core::str::FromStr;

use quotedesk_core::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operator {
    fn apply(self, lhs: f64, rhs: f64) -> f64 {
        match self {
            Operator::Add => lhs + rhs,
            Operator::Subtract => lhs - rhs,
            Operator::Multiply => lhs * rhs,
            Operator::Divide => lhs / rhs,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Digit(u8),
    Point,
    Op(Operator),
    Equals,
    /// Divide the display by 100.
    Percent,
    /// Flip the sign of the display.
    Negate,
    /// `AC`: back to `0` with nothing pending.
    Clear,
}

impl FromStr for Key {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = match s {
            "." => Key::Point,
            "+" => Key::Op(Operator::Add),
            "-" | "−" => Key::Op(Operator::Subtract),
            "*" | "x" | "×" => Key::Op(Operator::Multiply),
            "/" | "÷" => Key::Op(Operator::Divide),
            "=" => Key::Equals,
            "%" => Key::Percent,
            "+-" | "±" | "neg" => Key::Negate,
            "AC" | "ac" | "C" | "c" => Key::Clear,
            digit if digit.len() == 1 && digit.as_bytes()[0].is_ascii_digit() => {
                Key::Digit(digit.as_bytes()[0] - b'0')
            }
            other => return Err(DomainError::validation(format!("unknown key `{other}`"))),
        };
        Ok(key)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Keypad {
    display: String,
    previous: Option<f64>,
    operation: Option<Operator>,
    /// The next digit starts a new number instead of extending the display.
    new_number: bool,
}

impl Default for Keypad {
    fn default() -> Self {
        Self::new()
    }
}

impl Keypad {
    pub fn new() -> Self {
        Self {
            display: "0".to_string(),
            previous: None,
            operation: None,
            new_number: true,
        }
    }

    pub fn display(&self) -> &str {
        &self.display
    }

    pub fn press(&mut self, key: Key) {
        match key {
            Key::Clear => *self = Self::new(),
            Key::Percent => self.display = format_number(self.value() / 100.0),
            Key::Negate => self.display = format_number(-self.value()),
            Key::Point => {
                if self.new_number {
                    self.display = "0.".to_string();
                    self.new_number = false;
                } else if !self.display.contains('.') {
                    self.display.push('.');
                }
            }
            Key::Op(operator) => {
                // `2 + 3 *` evaluates the pending `2 + 3` first.
                if self.operation.is_some() && !self.new_number {
                    self.evaluate();
                }
                self.previous = Some(self.value());
                self.operation = Some(operator);
                self.new_number = true;
            }
            Key::Equals => self.evaluate(),
            Key::Digit(digit) => {
                let digit = char::from(b'0' + digit.min(9));
                if self.new_number || self.display == "0" {
                    self.display = digit.to_string();
                } else {
                    self.display.push(digit);
                }
                self.new_number = false;
            }
        }
    }

    /// Feed a whitespace separated key sequence, e.g. `"1 2 + 3 ="`.
    pub fn run(&mut self, keys: &str) -> Result<&str, DomainError> {
        for token in keys.split_whitespace() {
            self.press(token.parse()?);
        }
        Ok(self.display())
    }

    fn value(&self) -> f64 {
        self.display.parse().unwrap_or(0.0)
    }

    fn evaluate(&mut self) {
        if let (Some(previous), Some(operation)) = (self.previous.take(), self.operation.take()) {
            self.display = format_number(operation.apply(previous, self.value()));
            self.new_number = true;
        }
    }
}

fn format_number(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.is_infinite() {
        if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else if value == 0.0 {
        "0".to_string()
    } else {
        value.to_string()
    }
}
