//! Calculator tool: evaluates arithmetic expressions.
//!
//! Supports `+`, `-`, `*`, `/`, `%`, `**`, parentheses, unary signs, and the
//! functions `abs`, `round`, `min`, `max`, `pow` and `sum`. Uses a
//! recursive-descent parser: anything outside that grammar (names, strings,
//! attribute access) is rejected before evaluation.

use async_trait::async_trait;
use research_agent_core::tool::{Tool, ToolResult, required_str};

pub struct CalculatorTool;

#[async_trait]
impl Tool for CalculatorTool {
    fn name(&self) -> &str {
        "calculate"
    }

    fn description(&self) -> &str {
        "Evaluate a mathematical expression. Supports +, -, *, /, %, ** (power), parentheses, \
         and the functions abs, round, min, max, pow and sum."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "expression": {
                    "type": "string",
                    "description": "The mathematical expression to evaluate, e.g. '(2 + 3) * 4' or 'max(3, 7) ** 2'"
                }
            },
            "required": ["expression"]
        })
    }

    async fn execute(&self, arguments: serde_json::Value) -> ToolResult {
        let expr = match required_str(&arguments, "expression") {
            Ok(e) => e,
            Err(e) => return ToolResult::failure(format!("Error evaluating expression: {e}")),
        };

        match evaluate(expr) {
            Ok(value) => ToolResult::ok(format!("Result of '{expr}': {}", format_number(value)))
                .with_data(serde_json::json!({"result": value})),
            Err(e) => ToolResult::failure(format!("Error evaluating expression: {e}")),
        }
    }
}

/// Format nicely: drop the trailing `.0` of integral values.
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

// ── Recursive-descent expression evaluator ────────────────────────────────

/// Evaluate an arithmetic expression string.
pub fn evaluate(expr: &str) -> Result<f64, String> {
    let tokens = tokenize(expr)?;
    let mut parser = Parser::new(&tokens);
    let result = parser.parse_expr()?;
    if let Some(tok) = parser.peek() {
        return Err(format!("Unexpected token at position {}: {tok}", parser.pos));
    }
    if !result.is_finite() {
        return Err("Result is not a finite number".into());
    }
    Ok(result)
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),
    Ident(String),
    Plus,
    Minus,
    Star,
    StarStar,
    Slash,
    Percent,
    Comma,
    LParen,
    RParen,
    LBracket,
    RBracket,
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Number(n) => write!(f, "{n}"),
            Token::Ident(name) => write!(f, "{name}"),
            Token::Plus => f.write_str("+"),
            Token::Minus => f.write_str("-"),
            Token::Star => f.write_str("*"),
            Token::StarStar => f.write_str("**"),
            Token::Slash => f.write_str("/"),
            Token::Percent => f.write_str("%"),
            Token::Comma => f.write_str(","),
            Token::LParen => f.write_str("("),
            Token::RParen => f.write_str(")"),
            Token::LBracket => f.write_str("["),
            Token::RBracket => f.write_str("]"),
        }
    }
}

fn tokenize(input: &str) -> Result<Vec<Token>, String> {
    let mut tokens = Vec::new();
    let chars: Vec<char> = input.chars().collect();
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            c if c.is_whitespace() => i += 1,
            '+' => { tokens.push(Token::Plus); i += 1; }
            '-' => { tokens.push(Token::Minus); i += 1; }
            '*' if chars.get(i + 1) == Some(&'*') => { tokens.push(Token::StarStar); i += 2; }
            '*' => { tokens.push(Token::Star); i += 1; }
            '/' => { tokens.push(Token::Slash); i += 1; }
            '%' => { tokens.push(Token::Percent); i += 1; }
            ',' => { tokens.push(Token::Comma); i += 1; }
            '(' => { tokens.push(Token::LParen); i += 1; }
            ')' => { tokens.push(Token::RParen); i += 1; }
            '[' => { tokens.push(Token::LBracket); i += 1; }
            ']' => { tokens.push(Token::RBracket); i += 1; }
            c if c.is_ascii_digit() || c == '.' => {
                let start = i;
                while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                    i += 1;
                }
                // exponent: 1e10, 2.5E-3
                if i < chars.len() && (chars[i] == 'e' || chars[i] == 'E') {
                    let mut j = i + 1;
                    if j < chars.len() && (chars[j] == '+' || chars[j] == '-') {
                        j += 1;
                    }
                    if j < chars.len() && chars[j].is_ascii_digit() {
                        i = j;
                        while i < chars.len() && chars[i].is_ascii_digit() {
                            i += 1;
                        }
                    }
                }
                let num_str: String = chars[start..i].iter().collect();
                let num: f64 = num_str
                    .parse()
                    .map_err(|_| format!("Invalid number: {num_str}"))?;
                tokens.push(Token::Number(num));
            }
            c if c.is_alphabetic() || c == '_' => {
                let start = i;
                while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '_') {
                    i += 1;
                }
                tokens.push(Token::Ident(chars[start..i].iter().collect()));
            }
            c => return Err(format!("Unexpected character: '{c}'")),
        }
    }

    Ok(tokens)
}

/// Bound on nested unary operators, parentheses and calls.
const MAX_DEPTH: usize = 100;

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Token]) -> Self {
        Self {
            tokens,
            pos: 0,
            depth: 0,
        }
    }

    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos)
    }

    fn consume(&mut self) -> Option<&'a Token> {
        let tok = self.tokens.get(self.pos);
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    fn expect(&mut self, want: &Token) -> Result<(), String> {
        match self.consume() {
            Some(tok) if tok == want => Ok(()),
            Some(tok) => Err(format!("Expected '{want}', found '{tok}'")),
            None => Err(format!("Expected '{want}' before end of expression")),
        }
    }

    // expr = term (('+' | '-') term)*
    fn parse_expr(&mut self) -> Result<f64, String> {
        let mut left = self.parse_term()?;
        while let Some(op) = self.peek() {
            match op {
                Token::Plus => {
                    self.consume();
                    left += self.parse_term()?;
                }
                Token::Minus => {
                    self.consume();
                    left -= self.parse_term()?;
                }
                _ => break,
            }
        }
        Ok(left)
    }

    // term = unary (('*' | '/' | '%') unary)*
    fn parse_term(&mut self) -> Result<f64, String> {
        let mut left = self.parse_unary()?;
        while let Some(op) = self.peek() {
            match op {
                Token::Star => {
                    self.consume();
                    left *= self.parse_unary()?;
                }
                Token::Slash => {
                    self.consume();
                    let right = self.parse_unary()?;
                    if right == 0.0 {
                        return Err("Division by zero".into());
                    }
                    left /= right;
                }
                Token::Percent => {
                    self.consume();
                    let right = self.parse_unary()?;
                    if right == 0.0 {
                        return Err("Modulo by zero".into());
                    }
                    // result takes the sign of the divisor
                    left -= right * (left / right).floor();
                }
                _ => break,
            }
        }
        Ok(left)
    }

    // Every recursive path passes through here, so this is where depth is counted.
    fn parse_unary(&mut self) -> Result<f64, String> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err("Expression is nested too deeply".into());
        }
        let value = self.parse_unary_inner();
        self.depth -= 1;
        value
    }

    // unary = ('-' | '+') unary | power
    fn parse_unary_inner(&mut self) -> Result<f64, String> {
        match self.peek() {
            Some(Token::Minus) => {
                self.consume();
                Ok(-self.parse_unary()?)
            }
            Some(Token::Plus) => {
                self.consume();
                self.parse_unary()
            }
            _ => self.parse_power(),
        }
    }

    // power = primary ('**' unary)?   (right-associative, binds tighter than unary minus on its left)
    fn parse_power(&mut self) -> Result<f64, String> {
        let base = self.parse_primary()?;
        if let Some(Token::StarStar) = self.peek() {
            self.consume();
            let exponent = self.parse_unary()?;
            return Ok(base.powf(exponent));
        }
        Ok(base)
    }

    // primary = NUMBER | '(' expr ')' | IDENT '(' args ')'
    fn parse_primary(&mut self) -> Result<f64, String> {
        match self.consume() {
            Some(Token::Number(n)) => Ok(*n),
            Some(Token::LParen) => {
                let val = self.parse_expr()?;
                match self.consume() {
                    Some(Token::RParen) => Ok(val),
                    _ => Err("Expected closing parenthesis".into()),
                }
            }
            Some(Token::Ident(name)) => {
                let func = Function::lookup(name)
                    .ok_or_else(|| format!("Name '{name}' is not allowed"))?;
                self.expect(&Token::LParen)?;
                let args = self.parse_args()?;
                func.apply(&args)
            }
            Some(tok) => Err(format!("Unexpected token: {tok}")),
            None => Err("Unexpected end of expression".into()),
        }
    }

    // args = (arg (',' arg)*)? ')'   where arg = expr | '[' expr (',' expr)* ']'
    fn parse_args(&mut self) -> Result<Vec<f64>, String> {
        let mut args = Vec::new();
        if let Some(Token::RParen) = self.peek() {
            self.consume();
            return Ok(args);
        }
        loop {
            if let Some(Token::LBracket) = self.peek() {
                self.consume();
                if let Some(Token::RBracket) = self.peek() {
                    self.consume();
                } else {
                    loop {
                        args.push(self.parse_expr()?);
                        match self.consume() {
                            Some(Token::Comma) => continue,
                            Some(Token::RBracket) => break,
                            _ => return Err("Expected ',' or ']' in list".into()),
                        }
                    }
                }
            } else {
                args.push(self.parse_expr()?);
            }
            match self.consume() {
                Some(Token::Comma) => continue,
                Some(Token::RParen) => return Ok(args),
                _ => return Err("Expected ',' or ')' in argument list".into()),
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Function {
    Abs,
    Round,
    Min,
    Max,
    Pow,
    Sum,
}

impl Function {
    fn lookup(name: &str) -> Option<Self> {
        match name {
            "abs" => Some(Self::Abs),
            "round" => Some(Self::Round),
            "min" => Some(Self::Min),
            "max" => Some(Self::Max),
            "pow" => Some(Self::Pow),
            "sum" => Some(Self::Sum),
            _ => None,
        }
    }

    fn apply(self, args: &[f64]) -> Result<f64, String> {
        match (self, args) {
            (Self::Abs, [x]) => Ok(x.abs()),
            (Self::Round, [x]) => Ok(x.round_ties_even()),
            (Self::Round, [x, digits]) => {
                let factor = 10f64.powi(*digits as i32);
                Ok((x * factor).round_ties_even() / factor)
            }
            (Self::Pow, [base, exponent]) => Ok(base.powf(*exponent)),
            (Self::Min, [first, rest @ ..]) => Ok(rest.iter().copied().fold(*first, f64::min)),
            (Self::Max, [first, rest @ ..]) => Ok(rest.iter().copied().fold(*first, f64::max)),
            (Self::Sum, _) => Ok(args.iter().sum()),
            (func, _) => Err(format!(
                "{}() got an unexpected number of arguments ({})",
                func.name(),
                args.len()
            )),
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::Abs => "abs",
            Self::Round => "round",
            Self::Min => "min",
            Self::Max => "max",
            Self::Pow => "pow",
            Self::Sum => "sum",
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_addition() {
        assert_eq!(evaluate("2 + 2").unwrap(), 4.0);
    }

    #[test]
    fn operator_precedence() {
        assert_eq!(evaluate("2 + 3 * 4").unwrap(), 14.0);
    }

    #[test]
    fn parentheses() {
        assert_eq!(evaluate("((1 + 2) * (3 + 4))").unwrap(), 21.0);
    }

    #[test]
    fn deep_nesting_is_rejected() {
        let nested = format!("{}1{}", "(".repeat(5000), ")".repeat(5000));
        assert_eq!(evaluate(&nested).unwrap_err(), "Expression is nested too deeply");

        let signs = format!("{}1", "-".repeat(200_000));
        assert_eq!(evaluate(&signs).unwrap_err(), "Expression is nested too deeply");

        let calls = format!("{}1{}", "abs(".repeat(5000), ")".repeat(5000));
        assert!(evaluate(&calls).is_err());

        // moderate nesting still evaluates
        let ok = format!("{}7{}", "(".repeat(30), ")".repeat(30));
        assert_eq!(evaluate(&ok).unwrap(), 7.0);
    }

    #[tokio::test]
    async fn deep_nesting_is_a_failed_result() {
        let expression = format!("{}1{}", "(".repeat(5000), ")".repeat(5000));
        let result = CalculatorTool
            .execute(serde_json::json!({ "expression": expression }))
            .await;
        assert!(!result.success);
        assert!(result.output.starts_with("Error evaluating expression:"));
    }

    #[test]
    fn division_by_zero() {
        assert!(evaluate("1 / 0").is_err());
        assert!(evaluate("5 % 0").is_err());
    }

    #[test]
    fn power_is_right_associative() {
        assert_eq!(evaluate("2 ** 3 ** 2").unwrap(), 512.0);
        assert_eq!(evaluate("-2 ** 2").unwrap(), -4.0);
        assert_eq!(evaluate("2 ** -1").unwrap(), 0.5);
    }

    #[test]
    fn modulo_follows_divisor_sign() {
        assert_eq!(evaluate("7 % 3").unwrap(), 1.0);
        assert_eq!(evaluate("-7 % 3").unwrap(), 2.0);
    }

    #[test]
    fn allowed_functions() {
        assert_eq!(evaluate("abs(-5) + max(1, 9, 3)").unwrap(), 14.0);
        assert_eq!(evaluate("min(4, 2) * pow(2, 10)").unwrap(), 2048.0);
        assert_eq!(evaluate("sum([1, 2, 3, 4])").unwrap(), 10.0);
        assert_eq!(evaluate("round(2.5)").unwrap(), 2.0);
        assert_eq!(evaluate("round(3.14159, 2)").unwrap(), 3.14);
    }

    #[test]
    fn scientific_notation() {
        assert_eq!(evaluate("1e3 + 2.5E-1").unwrap(), 1000.25);
    }

    #[test]
    fn rejects_code() {
        assert!(evaluate("__import__('os')").is_err());
        assert!(evaluate("open").is_err());
        assert!(evaluate("abs.__class__").is_err());
    }

    #[test]
    fn wrong_arity() {
        let err = evaluate("pow(2)").unwrap_err();
        assert!(err.contains("pow()"));
    }

    #[test]
    fn invalid_and_empty() {
        assert!(evaluate("2 +").is_err());
        assert!(evaluate("").is_err());
        assert!(evaluate("(1 + 2").is_err());
    }

    #[test]
    fn overflow_is_an_error() {
        assert!(evaluate("10 ** 400").is_err());
    }

    #[tokio::test]
    async fn tool_execute() {
        let result = CalculatorTool
            .execute(serde_json::json!({"expression": "2 + 2"}))
            .await;
        assert!(result.success);
        assert_eq!(result.output, "Result of '2 + 2': 4");
        assert_eq!(result.data.unwrap()["result"], 4.0);
    }

    #[tokio::test]
    async fn tool_formats_decimals() {
        let result = CalculatorTool
            .execute(serde_json::json!({"expression": "10 / 4"}))
            .await;
        assert_eq!(result.output, "Result of '10 / 4': 2.5");
    }

    #[tokio::test]
    async fn tool_rejects_import() {
        let result = CalculatorTool
            .execute(serde_json::json!({"expression": "__import__('os')"}))
            .await;
        assert!(!result.success);
        assert!(result.output.starts_with("Error evaluating expression:"));
    }

    #[tokio::test]
    async fn tool_missing_expression() {
        let result = CalculatorTool.execute(serde_json::json!({})).await;
        assert!(!result.success);
        assert!(result.output.contains("expression"));
    }

    #[test]
    fn tool_definition() {
        assert_eq!(CalculatorTool.to_definition().name, "calculate");
    }
}
