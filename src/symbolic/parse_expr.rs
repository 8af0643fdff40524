//! Recursive-descent parser: token stream -> [`Expr`] tree.
//!
//! precedence, lowest first:
//! ```text
//!  expr    := term (('+' | '-') term)*
//!  term    := unary (('*' | '/') unary)*
//!  unary   := ('+' | '-') unary | power
//!  power   := atom ('^' unary)?          right-associative
//!  atom    := number | constant | variable | name '(' expr (',' expr)? ')' | '(' expr ')'
//! ```
//! so `-x^2 = -(x^2)`, `2^-1 = 0.5` and `2^3^2 = 2^9`.
use crate::symbolic::function_table::FunctionTable;
use crate::symbolic::lexer::{LexError, Symbol, Token, tokenize};
use crate::symbolic::symbolic_engine::{EvalError, Expr, FnHandle, Scope};
use std::fmt;

/// Any failure turning text into a number
#[derive(Debug, Clone, PartialEq)]
pub enum ExprError {
    Lex(LexError),
    Eval(EvalError),
}

impl fmt::Display for ExprError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ExprError::Lex(e) => write!(f, "{}", e),
            ExprError::Eval(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for ExprError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExprError::Lex(e) => Some(e),
            ExprError::Eval(e) => Some(e),
        }
    }
}

impl From<LexError> for ExprError {
    fn from(e: LexError) -> Self {
        ExprError::Lex(e)
    }
}

impl From<EvalError> for ExprError {
    fn from(e: EvalError) -> Self {
        ExprError::Eval(e)
    }
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    table: &'a FunctionTable,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos)
    }

    fn peek_symbol(&self) -> Option<Symbol> {
        match self.peek() {
            Some(Token::Symbol(sym)) => Some(*sym),
            _ => None,
        }
    }

    fn advance(&mut self) -> Option<&'a Token> {
        let tok = self.tokens.get(self.pos);
        self.pos += 1;
        tok
    }

    fn expect(&mut self, sym: Symbol, context: &str) -> Result<(), EvalError> {
        match self.peek_symbol() {
            Some(found) if found == sym => {
                self.pos += 1;
                Ok(())
            }
            _ => Err(EvalError::Malformed(format!(
                "expected '{}' {}, found {}",
                sym.as_char(),
                context,
                self.describe_current()
            ))),
        }
    }

    fn describe_current(&self) -> String {
        match self.peek() {
            Some(tok) => format!("'{}'", tok),
            None => "end of expression".to_string(),
        }
    }

    fn parse_expression(&mut self) -> Result<Expr, EvalError> {
        let mut left = self.parse_term()?;
        while let Some(sym @ (Symbol::Plus | Symbol::Minus)) = self.peek_symbol() {
            self.pos += 1;
            let right = self.parse_term()?;
            left = match sym {
                Symbol::Plus => Expr::Add(Box::new(left), Box::new(right)),
                _ => Expr::Sub(Box::new(left), Box::new(right)),
            };
        }
        Ok(left)
    }

    fn parse_term(&mut self) -> Result<Expr, EvalError> {
        let mut left = self.parse_unary()?;
        while let Some(sym @ (Symbol::Star | Symbol::Slash)) = self.peek_symbol() {
            self.pos += 1;
            let right = self.parse_unary()?;
            left = match sym {
                Symbol::Star => Expr::Mul(Box::new(left), Box::new(right)),
                _ => Expr::Div(Box::new(left), Box::new(right)),
            };
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Expr, EvalError> {
        match self.peek_symbol() {
            Some(Symbol::Minus) => {
                self.pos += 1;
                Ok(Expr::Neg(Box::new(self.parse_unary()?)))
            }
            Some(Symbol::Plus) => {
                self.pos += 1;
                self.parse_unary()
            }
            _ => self.parse_power(),
        }
    }

    fn parse_power(&mut self) -> Result<Expr, EvalError> {
        let base = self.parse_atom()?;
        if self.peek_symbol() == Some(Symbol::Caret) {
            self.pos += 1;
            let exponent = self.parse_unary()?;
            return Ok(Expr::Pow(Box::new(base), Box::new(exponent)));
        }
        Ok(base)
    }

    fn parse_atom(&mut self) -> Result<Expr, EvalError> {
        let tok = self
            .advance()
            .ok_or_else(|| EvalError::Malformed("unexpected end of expression".to_string()))?;
        match tok {
            Token::Number(val) => Ok(Expr::Const(*val)),
            Token::Symbol(Symbol::LParen) => {
                let inner = self.parse_expression()?;
                self.expect(Symbol::RParen, "to close '('")?;
                Ok(inner)
            }
            Token::Identifier(name) => {
                if self.peek_symbol() == Some(Symbol::LParen) {
                    self.pos += 1;
                    return self.parse_call(name);
                }
                if let Some(value) = self.table.constant(name) {
                    return Ok(Expr::Const(value));
                }
                if self.table.is_function(name) {
                    return Err(EvalError::Malformed(format!(
                        "function {} used without arguments",
                        name
                    )));
                }
                Ok(Expr::Var(name.clone()))
            }
            Token::Symbol(sym) => Err(EvalError::Malformed(format!(
                "unexpected '{}'",
                sym.as_char()
            ))),
        }
    }

    /// called with the opening bracket already consumed
    fn parse_call(&mut self, name: &str) -> Result<Expr, EvalError> {
        let lower = name.to_lowercase();
        let def = self
            .table
            .function(&lower)
            .ok_or_else(|| EvalError::UnknownFunction(lower.clone()))?;
        let mut args = vec![self.parse_expression()?];
        while self.peek_symbol() == Some(Symbol::Comma) {
            self.pos += 1;
            args.push(self.parse_expression()?);
        }
        self.expect(Symbol::RParen, &format!("to close the call of {}", lower))?;
        if !def.accepts(args.len()) {
            let expected = if def.arity.start() == def.arity.end() {
                def.arity.start().to_string()
            } else {
                format!("{} to {}", def.arity.start(), def.arity.end())
            };
            return Err(EvalError::ArityMismatch {
                name: lower,
                expected,
                found: args.len(),
            });
        }
        Ok(Expr::Call {
            name: lower,
            func: FnHandle(def.eval),
            args,
        })
    }
}

/// parse a token stream into a tree; every token must be consumed
pub fn parse_tokens(tokens: &[Token], table: &FunctionTable) -> Result<Expr, EvalError> {
    let mut parser = Parser { tokens, pos: 0, table };
    let expr = parser.parse_expression()?;
    match parser.peek() {
        None => Ok(expr),
        Some(Token::Symbol(Symbol::RParen)) => Err(EvalError::Malformed(format!(
            "unmatched ')' at token {}",
            parser.pos
        ))),
        Some(tok) => Err(EvalError::Malformed(format!("unexpected '{}' after expression", tok))),
    }
}

impl Expr {
    /// tokenize and parse with an explicit function table
    pub fn parse_with(input: &str, table: &FunctionTable) -> Result<Expr, ExprError> {
        let tokens = tokenize(input.trim())?;
        Ok(parse_tokens(&tokens, table)?)
    }

    /// tokenize and parse with the process-wide function table
    pub fn parse_expression(input: &str) -> Result<Expr, ExprError> {
        Expr::parse_with(input, FunctionTable::global())
    }
}

/// one-shot evaluation of a string against a scope
pub fn evaluate(input: &str, scope: &Scope) -> Result<f64, ExprError> {
    let expr = Expr::parse_expression(input)?;
    Ok(expr.eval(scope)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::{E, PI};

    fn eval_xy(input: &str, x: f64, y: f64) -> f64 {
        evaluate(input, &Scope::from([("x", x), ("y", y)])).unwrap()
    }

    #[test]
    fn test_parse_constant() {
        assert_eq!(Expr::parse_expression("42").unwrap(), Expr::Const(42.0));
        assert_eq!(Expr::parse_expression("pi").unwrap(), Expr::Const(PI));
        assert_eq!(Expr::parse_expression("E").unwrap(), Expr::Const(E));
    }

    #[test]
    fn test_parse_addition_is_left_associative() {
        let expr = Expr::parse_expression("x - 2 - y").unwrap();
        let expected = Expr::Sub(
            Box::new(Expr::Sub(
                Box::new(Expr::Var("x".to_string())),
                Box::new(Expr::Const(2.0)),
            )),
            Box::new(Expr::Var("y".to_string())),
        );
        assert_eq!(expr, expected);
    }

    #[test]
    fn test_precedence() {
        assert_eq!(eval_xy("1 + 2 * 3", 0.0, 0.0), 7.0);
        assert_eq!(eval_xy("(1 + 2) * 3", 0.0, 0.0), 9.0);
        assert_eq!(eval_xy("8 / 4 / 2", 0.0, 0.0), 1.0);
        assert_eq!(eval_xy("2^3^2", 0.0, 0.0), 512.0);
        assert_eq!(eval_xy("-x^2", 3.0, 0.0), -9.0);
        assert_eq!(eval_xy("2^-1", 0.0, 0.0), 0.5);
        assert_eq!(eval_xy("--x", 3.0, 0.0), 3.0);
        assert_eq!(eval_xy("+x", 3.0, 0.0), 3.0);
    }

    #[test]
    fn test_implicit_multiplication_value() {
        for (x, y) in [(0.5, 2.0), (-1.0, 3.0), (7.25, -0.125)] {
            assert_eq!(eval_xy("2x*y", x, y), eval_xy("2*x*y", x, y));
            assert_eq!(eval_xy("x(y+1)", x, y), eval_xy("x*(y+1)", x, y));
            assert_eq!(eval_xy("(x+1)(y-1)", x, y), eval_xy("(x+1)*(y-1)", x, y));
        }
    }

    #[test]
    fn test_function_calls() {
        assert_relative_eq!(eval_xy("sin(pi/2)", 0.0, 0.0), 1.0);
        assert_relative_eq!(eval_xy("SQRT(16)", 0.0, 0.0), 4.0);
        assert_relative_eq!(eval_xy("pow(x, y)", 2.0, 5.0), 32.0);
        assert_relative_eq!(eval_xy("atan2(1, 1)", 0.0, 0.0), PI / 4.0);
        assert_relative_eq!(eval_xy("3exp(0)", 0.0, 0.0), 3.0);
        assert_relative_eq!(eval_xy("ln(e)", 0.0, 0.0), 1.0);
        assert_relative_eq!(eval_xy("max(x, min(y, 4))", 1.0, 9.0), 4.0);
        assert_relative_eq!(eval_xy("dirac(0, 1)", 0.0, 0.0), 1.0 / (2.0 * PI).sqrt());
    }

    #[test]
    fn test_zero_over_zero_is_nan() {
        let value = evaluate("a/b", &Scope::from([("a", 0.0), ("b", 0.0)])).unwrap();
        assert!(value.is_nan());
        assert!(eval_xy("1/(x-1) + 2", 1.0, 0.0).is_nan());
    }

    #[test]
    fn test_infinity_constants() {
        assert_eq!(eval_xy("inf", 0.0, 0.0), f64::INFINITY);
        assert_eq!(eval_xy("-Infinity", 0.0, 0.0), f64::NEG_INFINITY);
    }

    #[test]
    fn test_unknown_identifiers_fail() {
        let scope = Scope::new().with("x", 1.0);
        assert_eq!(
            evaluate("x + z", &scope),
            Err(ExprError::Eval(EvalError::UnknownVariable("z".to_string())))
        );
        assert_eq!(
            evaluate("foo(x)", &scope),
            Err(ExprError::Eval(EvalError::UnknownFunction("foo".to_string())))
        );
        // variables are case-sensitive, function names are not
        assert!(evaluate("X", &scope).is_err());
    }

    #[test]
    fn test_malformed_expressions() {
        let scope = Scope::new().with("x", 1.0);
        for bad in ["(x + 1", "x + 1)", "sin(x", "pow(x)", "x +", "sin", "1.2.3", "*x", ""] {
            match evaluate(bad, &scope) {
                Err(ExprError::Eval(_)) => {}
                other => panic!("{:?} should fail to evaluate, got {:?}", bad, other),
            }
        }
        assert!(matches!(
            evaluate("pow(x)", &scope),
            Err(ExprError::Eval(EvalError::ArityMismatch { found: 1, .. }))
        ));
    }

    #[test]
    fn test_lex_error_propagates() {
        assert!(matches!(
            evaluate("x # 2", &Scope::new()),
            Err(ExprError::Lex(LexError::UnknownCharacter { ch: '#', .. }))
        ));
        // a non-ASCII letter is rejected by the lexer, not looked up as a variable
        assert!(matches!(
            evaluate("2*π", &Scope::new().with("π", 1.0)),
            Err(ExprError::Lex(LexError::UnknownCharacter { ch: 'π', position: 2 }))
        ));
    }

    #[test]
    fn test_repeated_evaluation_is_idempotent() {
        let expr = Expr::parse_expression("x*exp(-y^2) + gamma(x)").unwrap();
        let scope = Scope::from([("x", 1.5), ("y", 0.3)]);
        let first = expr.eval(&scope).unwrap();
        let second = expr.eval(&scope).unwrap();
        assert_eq!(first, second);
        let other = Scope::from([("x", 2.5), ("y", 0.0)]);
        assert_ne!(expr.eval(&other).unwrap(), first);
        assert_eq!(expr.eval(&scope).unwrap(), first);
    }

    #[test]
    fn test_parse_with_owned_table() {
        let table = FunctionTable::new();
        let expr = Expr::parse_with("heaviside(x - 1)", &table).unwrap();
        assert_eq!(expr.eval(&Scope::new().with("x", 2.0)).unwrap(), 1.0);
        assert_eq!(expr.eval(&Scope::new().with("x", 0.0)).unwrap(), 0.0);
    }
}
