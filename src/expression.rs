//! Expression compiler: text in, `f(x)` out.
//!
//! The input is case-folded and stripped of whitespace, split into tokens and
//! parsed by recursive descent into an [`Expr`] tree which is then evaluated
//! directly. Names are matched as whole identifiers, so `exp` never turns into
//! `e` followed by `xp`, and `x2` is rejected instead of being read as `x * 2`.
//!
//! Precedence, loosest first: `+ -`, `* /`, unary `-`/`+`, `^` (right
//! associative, so `-x^2` is `-(x^2)` and `2^-1` is `0.5`).

use lazy_static::lazy_static;
use log::{debug, warn};
use regex::Regex;
use std::f64::consts::{E, PI};
use std::fmt;

use crate::error::ExpressionError;

lazy_static! {
    static ref TOKEN_REGEX: Regex = Regex::new(
        r"^(?:(?P<num>(?:[0-9]+\.?[0-9]*|\.[0-9]+)(?:e[+-]?[0-9]+)?)|(?P<ident>[a-z_][a-z0-9_]*)|(?P<op>[-+*/^(),]))"
    )
    .unwrap();
    static ref INCOMPLETE_REGEX: Regex = Regex::new(r"[-+*/^(]$").unwrap();
}

/// Sample abscissas used to decide whether an expression can be drawn at all.
pub const PROBE_VALUES: [f64; 6] = [1.0, 2.0, 0.5, -1.0, -2.0, 0.0];

/// Deepest nesting of parentheses, calls and unary signs the parser accepts.
pub const MAX_DEPTH: usize = 256;

/// Longest token stream the parser accepts.
pub const MAX_TOKENS: usize = 2048;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Arity {
    Exactly(usize),
    AtLeast(usize),
}

/// Named numeric functions callable from an expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Func {
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    Sinh,
    Cosh,
    Tanh,
    /// Natural logarithm, spelled `ln`.
    Ln,
    /// Base-10 logarithm, spelled `log`.
    Log,
    Log2,
    Exp,
    Sqrt,
    Cbrt,
    Abs,
    Floor,
    Ceil,
    Round,
    Trunc,
    Sign,
    Min,
    Max,
    Pow,
    Atan2,
    Hypot,
}

impl Func {
    pub fn from_name(name: &str) -> Option<Self> {
        let func = match name {
            "sin" => Func::Sin,
            "cos" => Func::Cos,
            "tan" => Func::Tan,
            "asin" => Func::Asin,
            "acos" => Func::Acos,
            "atan" => Func::Atan,
            "sinh" => Func::Sinh,
            "cosh" => Func::Cosh,
            "tanh" => Func::Tanh,
            "ln" => Func::Ln,
            "log" => Func::Log,
            "log2" => Func::Log2,
            "exp" => Func::Exp,
            "sqrt" => Func::Sqrt,
            "cbrt" => Func::Cbrt,
            "abs" => Func::Abs,
            "floor" => Func::Floor,
            "ceil" => Func::Ceil,
            "round" => Func::Round,
            "trunc" => Func::Trunc,
            "sign" => Func::Sign,
            "min" => Func::Min,
            "max" => Func::Max,
            "pow" => Func::Pow,
            "atan2" => Func::Atan2,
            "hypot" => Func::Hypot,
            _ => return None,
        };
        Some(func)
    }

    fn arity(self) -> Arity {
        match self {
            Func::Pow | Func::Atan2 => Arity::Exactly(2),
            Func::Min | Func::Max | Func::Hypot => Arity::AtLeast(1),
            _ => Arity::Exactly(1),
        }
    }

    fn apply(self, args: &[f64]) -> f64 {
        let a = args.first().copied().unwrap_or(f64::NAN);
        let b = args.get(1).copied().unwrap_or(f64::NAN);
        match self {
            Func::Sin => a.sin(),
            Func::Cos => a.cos(),
            Func::Tan => a.tan(),
            Func::Asin => a.asin(),
            Func::Acos => a.acos(),
            Func::Atan => a.atan(),
            Func::Sinh => a.sinh(),
            Func::Cosh => a.cosh(),
            Func::Tanh => a.tanh(),
            Func::Ln => a.ln(),
            Func::Log => a.log10(),
            Func::Log2 => a.log2(),
            Func::Exp => a.exp(),
            Func::Sqrt => a.sqrt(),
            Func::Cbrt => a.cbrt(),
            Func::Abs => a.abs(),
            Func::Floor => a.floor(),
            Func::Ceil => a.ceil(),
            // halves round towards +inf
            Func::Round => {
                if a.fract() == -0.5 {
                    a.ceil()
                } else {
                    a.round()
                }
            }
            Func::Trunc => a.trunc(),
            Func::Sign => {
                if a.is_nan() || a == 0.0 {
                    a
                } else {
                    a.signum()
                }
            }
            Func::Min => args.iter().copied().fold(f64::INFINITY, nan_min),
            Func::Max => args.iter().copied().fold(f64::NEG_INFINITY, nan_max),
            Func::Pow => a.powf(b),
            Func::Atan2 => a.atan2(b),
            Func::Hypot => args.iter().map(|v| v * v).sum::<f64>().sqrt(),
        }
    }
}

fn nan_min(acc: f64, v: f64) -> f64 {
    if acc.is_nan() || v.is_nan() {
        f64::NAN
    } else {
        acc.min(v)
    }
}

fn nan_max(acc: f64, v: f64) -> f64 {
    if acc.is_nan() || v.is_nan() {
        f64::NAN
    } else {
        acc.max(v)
    }
}

/// Parsed expression tree. `pi` and `e` are folded into `Number` while parsing.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(f64),
    Variable,
    Neg(Box<Expr>),
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Call {
        func: Func,
        args: Vec<Expr>,
    },
}

impl Expr {
    pub fn eval(&self, x: f64) -> f64 {
        match self {
            Expr::Number(n) => *n,
            Expr::Variable => x,
            Expr::Neg(inner) => -inner.eval(x),
            Expr::Binary { op, lhs, rhs } => {
                let l = lhs.eval(x);
                let r = rhs.eval(x);
                match op {
                    BinaryOp::Add => l + r,
                    BinaryOp::Sub => l - r,
                    BinaryOp::Mul => l * r,
                    BinaryOp::Div => l / r,
                    BinaryOp::Pow => l.powf(r),
                }
            }
            Expr::Call { func, args } => {
                let values: Vec<f64> = args.iter().map(|arg| arg.eval(x)).collect();
                func.apply(&values)
            }
        }
    }
}

/// A compiled `y = f(x)`.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledFunction {
    source: String,
    ast: Expr,
}

impl CompiledFunction {
    /// Evaluates the function. Domain errors come back as NaN or ±inf, never as a panic.
    pub fn eval(&self, x: f64) -> f64 {
        self.ast.eval(x)
    }

    /// The normalized (lower-case, whitespace-free) text this was compiled from.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn ast(&self) -> &Expr {
        &self.ast
    }
}

impl fmt::Display for CompiledFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "y = {}", self.source)
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),
    Ident(String),
    Op(char),
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Number(n) => write!(f, "{}", n),
            Token::Ident(name) => write!(f, "{}", name),
            Token::Op(c) => write!(f, "{}", c),
        }
    }
}

/// Case-folds and removes every whitespace character.
pub fn normalize(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect()
}

fn tokenize(input: &str) -> Result<Vec<(usize, Token)>, String> {
    let mut tokens = Vec::new();
    let mut pos = 0;

    while pos < input.len() {
        let rest = &input[pos..];
        let captures = match TOKEN_REGEX.captures(rest) {
            Some(captures) => captures,
            None => {
                let bad = rest.chars().next().unwrap_or('?');
                return Err(format!("unexpected character `{}` at position {}", bad, pos));
            }
        };

        let token = if let Some(num) = captures.name("num") {
            let value = num
                .as_str()
                .parse::<f64>()
                .map_err(|_| format!("malformed number `{}`", num.as_str()))?;
            Token::Number(value)
        } else if let Some(ident) = captures.name("ident") {
            Token::Ident(ident.as_str().to_string())
        } else if let Some(op) = captures.name("op") {
            Token::Op(op.as_str().chars().next().unwrap_or('?'))
        } else {
            return Err(format!("unexpected input at position {}", pos));
        };

        let len = captures.get(0).map_or(1, |m| m.end());
        tokens.push((pos, token));
        pos += len;
    }

    Ok(tokens)
}

struct Parser {
    tokens: Vec<(usize, Token)>,
    index: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.index).map(|(_, token)| token)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.index).map(|(_, token)| token.clone());
        if token.is_some() {
            self.index += 1;
        }
        token
    }

    fn eat(&mut self, op: char) -> bool {
        if self.peek() == Some(&Token::Op(op)) {
            self.index += 1;
            true
        } else {
            false
        }
    }

    fn position(&self) -> String {
        match self.tokens.get(self.index) {
            Some((pos, token)) => format!("`{}` at position {}", token, pos),
            None => "end of input".to_string(),
        }
    }

    fn parse_sum(&mut self) -> Result<Expr, String> {
        let mut lhs = self.parse_product()?;
        loop {
            let op = if self.eat('+') {
                BinaryOp::Add
            } else if self.eat('-') {
                BinaryOp::Sub
            } else {
                return Ok(lhs);
            };
            let rhs = self.parse_product()?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
    }

    fn parse_product(&mut self) -> Result<Expr, String> {
        let mut lhs = self.parse_unary()?;
        loop {
            let op = if self.eat('*') {
                BinaryOp::Mul
            } else if self.eat('/') {
                BinaryOp::Div
            } else {
                return Ok(lhs);
            };
            let rhs = self.parse_unary()?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
    }

    // parentheses, call arguments and signs all recurse through here
    fn parse_unary(&mut self) -> Result<Expr, String> {
        if self.depth >= MAX_DEPTH {
            return Err("expression nested too deeply".to_string());
        }
        self.depth += 1;
        let result = self.parse_signed();
        self.depth -= 1;
        result
    }

    fn parse_signed(&mut self) -> Result<Expr, String> {
        if self.eat('-') {
            return Ok(Expr::Neg(Box::new(self.parse_unary()?)));
        }
        if self.eat('+') {
            return self.parse_unary();
        }
        self.parse_power()
    }

    fn parse_power(&mut self) -> Result<Expr, String> {
        let base = self.parse_primary()?;
        if self.eat('^') {
            let exponent = self.parse_unary()?;
            return Ok(Expr::Binary {
                op: BinaryOp::Pow,
                lhs: Box::new(base),
                rhs: Box::new(exponent),
            });
        }
        Ok(base)
    }

    fn parse_primary(&mut self) -> Result<Expr, String> {
        let at = self.position();
        match self.next() {
            Some(Token::Number(n)) => Ok(Expr::Number(n)),
            Some(Token::Op('(')) => {
                let inner = self.parse_sum()?;
                if !self.eat(')') {
                    return Err(format!("expected `)` but found {}", self.position()));
                }
                Ok(inner)
            }
            Some(Token::Ident(name)) => self.parse_identifier(&name),
            Some(_) => Err(format!("unexpected {}", at)),
            None => Err("unexpected end of input".to_string()),
        }
    }

    fn parse_identifier(&mut self, name: &str) -> Result<Expr, String> {
        match name {
            "x" => return Ok(Expr::Variable),
            "pi" => return Ok(Expr::Number(PI)),
            "e" => return Ok(Expr::Number(E)),
            _ => {}
        }

        let func = Func::from_name(name).ok_or_else(|| format!("unknown name `{}`", name))?;
        if !self.eat('(') {
            return Err(format!("`{}` must be called with parentheses", name));
        }

        let mut args = Vec::new();
        if !self.eat(')') {
            loop {
                args.push(self.parse_sum()?);
                if self.eat(')') {
                    break;
                }
                if !self.eat(',') {
                    return Err(format!("expected `,` or `)` but found {}", self.position()));
                }
            }
        }

        let arity_ok = match func.arity() {
            Arity::Exactly(n) => args.len() == n,
            Arity::AtLeast(n) => args.len() >= n,
        };
        if !arity_ok {
            return Err(format!(
                "`{}` does not take {} argument(s)",
                name,
                args.len()
            ));
        }

        Ok(Expr::Call { func, args })
    }
}

/// Compiles `text` into a function of `x`.
///
/// # Errors
/// * [`ExpressionError::Compile`] if the text is empty, contains characters or
///   names outside the grammar, or is not a well-formed expression.
///   Nesting deeper than [`MAX_DEPTH`] or more than [`MAX_TOKENS`] tokens is
///   rejected the same way.
pub fn compile(text: &str) -> Result<CompiledFunction, ExpressionError> {
    let source = normalize(text);
    let fail = |reason: String| ExpressionError::Compile {
        expression: text.to_string(),
        reason,
    };

    if source.is_empty() {
        return Err(fail("empty expression".to_string()));
    }

    let tokens = tokenize(&source).map_err(fail)?;
    if tokens.len() > MAX_TOKENS {
        return Err(fail(format!("expression longer than {} tokens", MAX_TOKENS)));
    }
    let mut parser = Parser {
        tokens,
        index: 0,
        depth: 0,
    };
    let ast = parser.parse_sum().map_err(fail)?;
    if parser.peek().is_some() {
        return Err(fail(format!("unexpected {}", parser.position())));
    }

    debug!("compiled `{}` into {:?}", source, ast);
    Ok(CompiledFunction { source, ast })
}

/// Checks that `text` is a complete, drawable expression and returns it compiled.
///
/// Rejects text ending in an operator or `(` as incomplete before trying to
/// compile it, then probes the compiled function at [`PROBE_VALUES`] and
/// rejects it if none of them is finite.
pub fn validate(text: &str) -> Result<CompiledFunction, ExpressionError> {
    let trimmed = text.trim();

    if INCOMPLETE_REGEX.is_match(trimmed) {
        warn!("rejected incomplete expression `{}`", trimmed);
        return Err(ExpressionError::Incomplete(trimmed.to_string()));
    }

    let function = compile(trimmed).inspect_err(|e| warn!("{}", e))?;

    if !PROBE_VALUES.iter().any(|&x| function.eval(x).is_finite()) {
        warn!("rejected ungraphable expression `{}`", trimmed);
        return Err(ExpressionError::Ungraphable(trimmed.to_string()));
    }

    Ok(function)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_keep_whole_identifiers() {
        let tokens = tokenize("exp(x)+e").unwrap();
        let kinds: Vec<Token> = tokens.into_iter().map(|(_, t)| t).collect();
        assert_eq!(
            kinds,
            vec![
                Token::Ident("exp".into()),
                Token::Op('('),
                Token::Ident("x".into()),
                Token::Op(')'),
                Token::Op('+'),
                Token::Ident("e".into()),
            ]
        );
    }

    #[test]
    fn number_with_exponent_is_one_token() {
        let tokens = tokenize("2.5e-3*x").unwrap();
        assert_eq!(tokens[0].1, Token::Number(0.0025));
        assert_eq!(tokens[1].1, Token::Op('*'));
    }

    #[test]
    fn stray_character_reports_position() {
        let err = tokenize("x$2").unwrap_err();
        assert!(err.contains("position 1"), "{}", err);
    }

    #[test]
    fn js_style_round_and_sign() {
        assert_eq!(Func::Round.apply(&[-2.5]), -2.0);
        assert_eq!(Func::Round.apply(&[2.5]), 3.0);
        assert_eq!(Func::Sign.apply(&[0.0]), 0.0);
        assert_eq!(Func::Sign.apply(&[-3.0]), -1.0);
    }
}
