//! Arithmetic evaluation of free-text chat messages.
//!
//! A message is pre-filtered, reduced to the arithmetic alphabet and then
//! parsed by recursive descent:
//!
//! ```text
//! expression := term (('+' | '-') term)*
//! term       := factor (('*' | '/') factor)*
//! factor     := ('+' | '-') factor | '(' expression ')' | number
//! ```
//!
//! Nothing here panics or allocates per token, so it is safe to run
//! speculatively on every incoming message.

use crate::domain::{EvalOutcome, MathError};

/// Reply when a math request contains nothing to calculate.
pub const MATH_PROMPT_REPLY: &str = "I'm tuned for calculations right now—drop in an equation like \"42 / 6\" and I'll crunch it instantly.";

/// Deepest nesting of parentheses and unary signs accepted.
const MAX_DEPTH: usize = 256;

/// Conversational lead-ins removed by [`evaluate_prompt`].
const PROMPT_PREFIXES: &[&str] = &[
    "can you help me with",
    "the result of",
    "what is",
    "what's",
    "what’s",
    "whats",
    "calculate",
    "compute",
    "evaluate",
    "solve",
    "please",
];

const fn is_arithmetic(c: char) -> bool {
    matches!(c, '0'..='9' | '+' | '-' | '*' | '/' | '(' | ')' | '.')
}

const fn is_operator(c: char) -> bool {
    matches!(c, '+' | '-' | '*' | '/')
}

/// Strip every character outside the arithmetic alphabet.
///
/// Whitespace is kept but normalized to ASCII spaces.
#[must_use]
pub fn sanitize(message: &str) -> String {
    message
        .chars()
        .filter_map(|c| {
            if is_arithmetic(c) {
                Some(c)
            } else if c.is_whitespace() {
                Some(' ')
            } else {
                None
            }
        })
        .collect()
}

/// Evaluate a message as arithmetic.
///
/// A message without any digit is never math. Otherwise any ASCII letter
/// or `=` rejects the whole message, even when a valid expression is
/// embedded in it.
#[must_use]
pub fn evaluate(message: &str) -> EvalOutcome {
    if !message.chars().any(|c| c.is_ascii_digit()) {
        return EvalOutcome::NoSignal;
    }

    if message
        .chars()
        .any(|c| c.is_ascii_alphabetic() || c == '=')
    {
        return EvalOutcome::Failed(MathError::NotArithmetic);
    }

    let sanitized = sanitize(message);
    if !has_signal(message, &sanitized) {
        return EvalOutcome::NoSignal;
    }

    match Parser::new(&sanitized).parse() {
        Ok(value) => EvalOutcome::Value(value),
        Err(err) => EvalOutcome::Failed(err),
    }
}

/// Evaluate a message after stripping question framing such as
/// "What's" or a trailing `?`.
#[must_use]
pub fn evaluate_prompt(message: &str) -> EvalOutcome {
    evaluate(strip_prompt_framing(message))
}

/// Remove conversational lead-ins and trailing punctuation.
#[must_use]
pub fn strip_prompt_framing(message: &str) -> &str {
    let mut rest = message.trim();

    'outer: loop {
        for prefix in PROMPT_PREFIXES {
            if let Some(tail) = strip_prefix_ignore_case(rest, prefix) {
                if !tail.starts_with(char::is_alphanumeric) {
                    rest = tail.trim_start_matches(|c: char| c.is_whitespace() || c == ':');
                    continue 'outer;
                }
            }
        }
        break;
    }

    rest.trim_end_matches(|c: char| matches!(c, '?' | '!') || c.is_whitespace())
}

fn strip_prefix_ignore_case<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    let head = text.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix)
        .then(|| &text[prefix.len()..])
}

/// Whether the sanitized text is worth parsing at all.
fn has_signal(message: &str, sanitized: &str) -> bool {
    let trimmed = sanitized.trim();
    if trimmed.is_empty() {
        return false;
    }

    // A leading sign alone ("-5") is not an operation.
    let contains_operator = trimmed
        .trim_start_matches(['+', '-'])
        .chars()
        .any(is_operator);
    if contains_operator {
        return true;
    }

    let stripped_something = message
        .chars()
        .any(|c| !is_arithmetic(c) && !c.is_whitespace());
    if stripped_something {
        return false;
    }

    trimmed.contains(['(', ')'])
}

/// Render a number for display.
///
/// Integers print without a decimal point; everything else is rounded to six
/// decimals with trailing zeros dropped.
#[must_use]
pub fn format_value(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let rounded = if value.fract() == 0.0 {
        value
    } else {
        format!("{value:.6}").parse::<f64>().unwrap_or(value)
    };

    if rounded == 0.0 {
        // Drops the sign of negative zero.
        return "0".to_string();
    }

    rounded.to_string()
}

/// Reply text for a successful calculation.
#[must_use]
pub fn calculation_reply(value: f64) -> String {
    format!("The result of the calculation is: {}", format_value(value))
}

/// Math model: answer with a result, an advisory, or an invitation to type
/// an equation.
#[must_use]
pub fn math_response(message: &str) -> String {
    match evaluate_prompt(message) {
        EvalOutcome::Value(value) => calculation_reply(value),
        EvalOutcome::Failed(err) => err.to_string(),
        EvalOutcome::NoSignal => MATH_PROMPT_REPLY.to_string(),
    }
}

/// Cursor over a sanitized expression.
struct Parser<'a> {
    bytes: &'a [u8],
    pos: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    const fn new(input: &'a str) -> Self {
        Self {
            bytes: input.as_bytes(),
            pos: 0,
            depth: 0,
        }
    }

    fn parse(mut self) -> Result<f64, MathError> {
        let value = self.expression()?;
        self.skip_whitespace();
        if self.pos != self.bytes.len() || !value.is_finite() {
            return Err(MathError::InvalidExpression);
        }
        Ok(value)
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(|b| b.is_ascii_whitespace()) {
            self.pos += 1;
        }
    }

    fn expression(&mut self) -> Result<f64, MathError> {
        let mut value = self.term()?;

        loop {
            self.skip_whitespace();
            match self.peek() {
                Some(b'+') => {
                    self.pos += 1;
                    value += self.term()?;
                }
                Some(b'-') => {
                    self.pos += 1;
                    value -= self.term()?;
                }
                _ => return Ok(value),
            }
        }
    }

    fn term(&mut self) -> Result<f64, MathError> {
        let mut value = self.factor()?;

        loop {
            self.skip_whitespace();
            match self.peek() {
                Some(b'*') => {
                    self.pos += 1;
                    value *= self.factor()?;
                }
                Some(b'/') => {
                    self.pos += 1;
                    let divisor = self.factor()?;
                    if divisor == 0.0 {
                        return Err(MathError::DivisionByZero);
                    }
                    value /= divisor;
                }
                _ => return Ok(value),
            }
        }
    }

    fn factor(&mut self) -> Result<f64, MathError> {
        self.skip_whitespace();
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(MathError::InvalidExpression);
        }

        let value = match self.peek() {
            Some(sign @ (b'+' | b'-')) => {
                self.pos += 1;
                let inner = self.factor()?;
                if sign == b'-' {
                    -inner
                } else {
                    inner
                }
            }
            Some(b'(') => {
                self.pos += 1;
                let inner = self.expression()?;
                self.skip_whitespace();
                if self.peek() != Some(b')') {
                    return Err(MathError::InvalidExpression);
                }
                self.pos += 1;
                inner
            }
            _ => self.number()?,
        };

        self.depth -= 1;
        Ok(value)
    }

    fn number(&mut self) -> Result<f64, MathError> {
        self.skip_whitespace();
        let start = self.pos;
        let mut seen_dot = false;

        while let Some(b) = self.peek() {
            match b {
                b'0'..=b'9' => self.pos += 1,
                b'.' if seen_dot => return Err(MathError::InvalidExpression),
                b'.' => {
                    seen_dot = true;
                    self.pos += 1;
                }
                _ => break,
            }
        }

        std::str::from_utf8(&self.bytes[start..self.pos])
            .ok()
            .filter(|literal| !literal.is_empty())
            .and_then(|literal| literal.parse::<f64>().ok())
            .ok_or(MathError::InvalidExpression)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn value_of(message: &str) -> f64 {
        match evaluate(message) {
            EvalOutcome::Value(v) => v,
            other => panic!("expected a value for {message:?}, got {other:?}"),
        }
    }

    #[test]
    fn test_precedence() {
        assert_eq!(value_of("2 + 2 * 2"), 6.0);
        assert_eq!(value_of("10 - 4 / 2"), 8.0);
        assert_eq!(value_of("2 * 3 + 4 * 5"), 26.0);
    }

    #[test]
    fn test_parentheses_override_precedence() {
        assert_eq!(value_of("(5 - 1) / 2"), 2.0);
        assert_eq!(value_of("((2 + 3) * (4 - 1))"), 15.0);
        assert_eq!(value_of("(7)"), 7.0);
    }

    #[test]
    fn test_left_associativity() {
        assert_eq!(value_of("10 - 3 - 2"), 5.0);
        assert_eq!(value_of("100 / 10 / 5"), 2.0);
    }

    #[test]
    fn test_unary_signs_nest() {
        assert_eq!(value_of("--5 + 1"), 6.0);
        assert_eq!(value_of("3 * -2"), -6.0);
        assert_eq!(value_of("-(2 + 3) * 2"), -10.0);
        assert_eq!(value_of("+-+4 - 1"), -5.0);
    }

    #[test]
    fn test_decimals() {
        assert!((value_of("2.5 + 3.7") - 6.2).abs() < 1e-12);
        assert_eq!(value_of(".5 * 4"), 2.0);
    }

    #[test]
    fn test_letters_or_equals_reject_whole_message() {
        for input in ["3x + 2 = 11", "sin(1)", "what's 2+2, buddy?", "1 + 1 = 2"] {
            assert_eq!(
                evaluate(input),
                EvalOutcome::Failed(MathError::NotArithmetic),
                "{input}"
            );
        }
    }

    #[test]
    fn test_no_signal_for_prose_and_bare_numbers() {
        assert_eq!(evaluate("Hello, how are you?"), EvalOutcome::NoSignal);
        assert_eq!(evaluate("!!! ???"), EvalOutcome::NoSignal);
        assert_eq!(evaluate(""), EvalOutcome::NoSignal);
        assert_eq!(evaluate("42"), EvalOutcome::NoSignal);
        assert_eq!(evaluate("-5"), EvalOutcome::NoSignal);
        assert_eq!(evaluate("5,000"), EvalOutcome::NoSignal);
        assert_eq!(evaluate("+ - * /"), EvalOutcome::NoSignal);
    }

    #[test]
    fn test_parenthesised_number_has_signal() {
        assert_eq!(evaluate("(42)"), EvalOutcome::Value(42.0));
    }

    #[test]
    fn test_division_by_zero_at_any_depth() {
        assert_eq!(
            evaluate("10 / 0"),
            EvalOutcome::Failed(MathError::DivisionByZero)
        );
        assert_eq!(
            evaluate("1 / (4 - 4)"),
            EvalOutcome::Failed(MathError::DivisionByZero)
        );
        assert_eq!(
            evaluate("(1 + (6 / (2 - 2)))"),
            EvalOutcome::Failed(MathError::DivisionByZero)
        );
        // A zero numerator is fine.
        assert_eq!(evaluate("(4-4)/(1+1)"), EvalOutcome::Value(0.0));
    }

    #[test]
    fn test_malformed_input_is_invalid() {
        for input in ["(2 + 3", "2 + 3)", "1.2.3 + 1", "2 +", "* 3", "2 3 + 1", ". + 1"] {
            assert_eq!(
                evaluate(input),
                EvalOutcome::Failed(MathError::InvalidExpression),
                "{input}"
            );
        }
    }

    #[test]
    fn test_overflow_is_invalid() {
        let huge = format!("{} * {}", "9".repeat(200), "9".repeat(200));
        assert_eq!(
            evaluate(&huge),
            EvalOutcome::Failed(MathError::InvalidExpression)
        );
    }

    #[test]
    fn test_deep_nesting_is_rejected_not_overflowed() {
        let deep = format!("{}1 + 1{}", "(".repeat(10_000), ")".repeat(10_000));
        assert_eq!(
            evaluate(&deep),
            EvalOutcome::Failed(MathError::InvalidExpression)
        );
    }

    #[test]
    fn test_sanitize_strips_non_arithmetic() {
        assert_eq!(sanitize("$5 + 3%"), "5 + 3");
        assert_eq!(sanitize("1\t+\u{a0}2"), "1 + 2");
    }

    #[test]
    fn test_stripped_symbols_still_evaluate() {
        assert_eq!(evaluate("$5 + $3"), EvalOutcome::Value(8.0));
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(6.0), "6");
        assert_eq!(format_value(-12.0), "-12");
        assert_eq!(format_value(1.0 / 3.0), "0.333333");
        assert_eq!(format_value(2.5), "2.5");
        assert_eq!(format_value(0.1 + 0.2), "0.3");
        assert_eq!(format_value(-0.0), "0");
        assert_eq!(format_value(-0.000_000_1), "0");
        assert_eq!(format_value(f64::INFINITY), "inf");
    }

    #[test]
    fn test_format_value_is_idempotent() {
        for value in [1.0 / 3.0, 2.0 / 3.0, 6.2, 1e15 + 0.5, -7.125, 42.0] {
            let once = format_value(value);
            let twice = format_value(once.parse().unwrap());
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_integer_results_have_no_decimal_point() {
        for input in ["2 + 2", "10 / 4 * 2", "3 * (2 + 1)"] {
            if let EvalOutcome::Value(v) = evaluate(input) {
                assert!(!format_value(v).contains('.'));
            }
        }
    }

    #[test]
    fn test_math_response() {
        assert_eq!(
            math_response("What's 5 + 3?"),
            "The result of the calculation is: 8"
        );
        assert_eq!(math_response("1 / 3"), "The result of the calculation is: 0.333333");
        assert_eq!(math_response("100 / 0"), "Error: Division by zero");
        assert_eq!(
            math_response("hello there"),
            "I'm tuned for calculations right now—drop in an equation like \"42 / 6\" and I'll crunch it instantly."
        );
        assert!(math_response("3x + 2 = 11").contains("numeric arithmetic"));
    }

    #[test]
    fn test_prompt_framing_is_stripped() {
        assert_eq!(strip_prompt_framing("What's 5 + 3?"), "5 + 3");
        assert_eq!(
            strip_prompt_framing("What's the result of 2.5 + 3.7?"),
            "2.5 + 3.7"
        );
        assert_eq!(strip_prompt_framing("Calculate: 10 - 7"), "10 - 7");
        assert_eq!(strip_prompt_framing("solver 2+2"), "solver 2+2");
    }

    #[test]
    fn test_evaluate_prompt() {
        assert_eq!(evaluate_prompt("What's 5 + 3?"), EvalOutcome::Value(8.0));
        assert_eq!(evaluate_prompt("Solve 8 * 4"), EvalOutcome::Value(32.0));
        assert_eq!(
            evaluate_prompt("Can you help me with 100 / 0?"),
            EvalOutcome::Failed(MathError::DivisionByZero)
        );
        assert_eq!(
            evaluate_prompt("3x + 2 = 11"),
            EvalOutcome::Failed(MathError::NotArithmetic)
        );
        assert_eq!(
            evaluate_prompt("what's 2+2, buddy?"),
            EvalOutcome::Failed(MathError::NotArithmetic)
        );
    }
}
