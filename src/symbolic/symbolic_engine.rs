//! # Expression tree
//!
//! An integrand is parsed once into an [`Expr`] tree and then evaluated many
//! thousands of times against a changing [`Scope`] during quadrature.
//!
//! ## Main structures
//! - `Expr` - tagged tree: constants, variables, unary minus, binary operations, function calls
//! - `Scope` - variable name to value mapping supplied per evaluation
//! - `EvalError` - unknown names, wrong argument counts, malformed input
//!
//! Division by an operand that evaluates to exactly zero gives NaN instead of an
//! error, so integrands with removable singularities can still be sampled nearby.
use crate::symbolic::function_table::MathFn;
use itertools::Itertools;
use std::collections::HashMap;
use std::fmt;

/// Errors produced while building or evaluating an expression
#[derive(Debug, Clone, PartialEq)]
pub enum EvalError {
    UnknownVariable(String),
    UnknownFunction(String),
    ArityMismatch { name: String, expected: String, found: usize },
    Malformed(String),
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            EvalError::UnknownVariable(name) => write!(f, "Unknown variable: {}", name),
            EvalError::UnknownFunction(name) => write!(f, "Unknown function: {}", name),
            EvalError::ArityMismatch { name, expected, found } => write!(
                f,
                "Function {} expects {} argument(s), found {}",
                name, expected, found
            ),
            EvalError::Malformed(msg) => write!(f, "Malformed expression: {}", msg),
        }
    }
}

impl std::error::Error for EvalError {}

/// Variable bindings for one evaluation. Names are case-sensitive.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Scope {
    vars: HashMap<String, f64>,
}

impl Scope {
    pub fn new() -> Self {
        Scope { vars: HashMap::new() }
    }

    /// builder-style binding
    pub fn with(mut self, name: &str, value: f64) -> Self {
        self.set(name, value);
        self
    }

    /// bind or rebind; rebinding an existing name does not allocate
    pub fn set(&mut self, name: &str, value: f64) {
        match self.vars.get_mut(name) {
            Some(slot) => *slot = value,
            None => {
                self.vars.insert(name.to_string(), value);
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.vars.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.vars.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

impl<'a, const N: usize> From<[(&'a str, f64); N]> for Scope {
    fn from(pairs: [(&'a str, f64); N]) -> Self {
        let mut scope = Scope::new();
        for (name, value) in pairs {
            scope.set(name, value);
        }
        scope
    }
}

/// Function pointer resolved at parse time; compared by address
#[derive(Clone, Copy)]
pub struct FnHandle(pub MathFn);

impl fmt::Debug for FnHandle {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "FnHandle")
    }
}

impl PartialEq for FnHandle {
    fn eq(&self, other: &Self) -> bool {
        self.0 as usize == other.0 as usize
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    /// numeric literal or resolved named constant
    Const(f64),
    /// variable looked up in the scope at evaluation time
    Var(String),
    Neg(Box<Expr>),
    Add(Box<Expr>, Box<Expr>),
    Sub(Box<Expr>, Box<Expr>),
    Mul(Box<Expr>, Box<Expr>),
    Div(Box<Expr>, Box<Expr>),
    Pow(Box<Expr>, Box<Expr>),
    Call { name: String, func: FnHandle, args: Vec<Expr> },
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Expr::Const(val) => write!(f, "{}", val),
            Expr::Var(name) => write!(f, "{}", name),
            Expr::Neg(expr) => write!(f, "(-{})", expr),
            Expr::Add(lhs, rhs) => write!(f, "({} + {})", lhs, rhs),
            Expr::Sub(lhs, rhs) => write!(f, "({} - {})", lhs, rhs),
            Expr::Mul(lhs, rhs) => write!(f, "({} * {})", lhs, rhs),
            Expr::Div(lhs, rhs) => write!(f, "({} / {})", lhs, rhs),
            Expr::Pow(base, exp) => write!(f, "({} ^ {})", base, exp),
            Expr::Call { name, args, .. } => write!(f, "{}({})", name, args.iter().join(", ")),
        }
    }
}

impl Expr {
    /// evaluate against a scope; no state survives the call
    pub fn eval(&self, scope: &Scope) -> Result<f64, EvalError> {
        match self {
            Expr::Const(val) => Ok(*val),
            Expr::Var(name) => scope
                .get(name)
                .ok_or_else(|| EvalError::UnknownVariable(name.clone())),
            Expr::Neg(expr) => Ok(-expr.eval(scope)?),
            Expr::Add(lhs, rhs) => Ok(lhs.eval(scope)? + rhs.eval(scope)?),
            Expr::Sub(lhs, rhs) => Ok(lhs.eval(scope)? - rhs.eval(scope)?),
            Expr::Mul(lhs, rhs) => Ok(lhs.eval(scope)? * rhs.eval(scope)?),
            Expr::Div(lhs, rhs) => {
                let num = lhs.eval(scope)?;
                let den = rhs.eval(scope)?;
                if den == 0.0 { Ok(f64::NAN) } else { Ok(num / den) }
            }
            Expr::Pow(base, exp) => Ok(base.eval(scope)?.powf(exp.eval(scope)?)),
            Expr::Call { func, args, .. } => {
                // no function takes more than two arguments
                let mut values = [0.0_f64; 2];
                for (slot, arg) in values.iter_mut().zip(args) {
                    *slot = arg.eval(scope)?;
                }
                Ok((func.0)(&values[..args.len()]))
            }
        }
    }

    /// names of all free variables, sorted and deduplicated
    pub fn extract_variables(&self) -> Vec<String> {
        let mut vars = Vec::new();
        self.collect_variables(&mut vars);
        vars.sort();
        vars.dedup();
        vars
    }

    fn collect_variables(&self, vars: &mut Vec<String>) {
        match self {
            Expr::Const(_) => {}
            Expr::Var(name) => vars.push(name.clone()),
            Expr::Neg(expr) => expr.collect_variables(vars),
            Expr::Add(lhs, rhs)
            | Expr::Sub(lhs, rhs)
            | Expr::Mul(lhs, rhs)
            | Expr::Div(lhs, rhs)
            | Expr::Pow(lhs, rhs) => {
                lhs.collect_variables(vars);
                rhs.collect_variables(vars);
            }
            Expr::Call { args, .. } => {
                for arg in args {
                    arg.collect_variables(vars);
                }
            }
        }
    }

    pub fn depends_on(&self, var: &str) -> bool {
        match self {
            Expr::Const(_) => false,
            Expr::Var(name) => name == var,
            Expr::Neg(expr) => expr.depends_on(var),
            Expr::Add(lhs, rhs)
            | Expr::Sub(lhs, rhs)
            | Expr::Mul(lhs, rhs)
            | Expr::Div(lhs, rhs)
            | Expr::Pow(lhs, rhs) => lhs.depends_on(var) || rhs.depends_on(var),
            Expr::Call { args, .. } => args.iter().any(|arg| arg.depends_on(var)),
        }
    }

    /// evaluated function of one variable; evaluation errors become NaN
    pub fn lambdify1D<'a>(&'a self, var: &'a str) -> impl Fn(f64) -> f64 + 'a {
        move |x| {
            let scope = Scope::new().with(var, x);
            self.eval(&scope).unwrap_or(f64::NAN)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn var(name: &str) -> Box<Expr> {
        Box::new(Expr::Var(name.to_string()))
    }

    #[test]
    fn test_eval_arithmetic() {
        let expr = Expr::Add(
            Box::new(Expr::Mul(Box::new(Expr::Const(2.0)), var("x"))),
            Box::new(Expr::Neg(var("y"))),
        );
        let scope = Scope::from([("x", 3.0), ("y", 1.0)]);
        assert_eq!(expr.eval(&scope).unwrap(), 5.0);
    }

    #[test]
    fn test_division_by_zero_is_nan() {
        let expr = Expr::Div(var("a"), var("b"));
        let scope = Scope::from([("a", 0.0), ("b", 0.0)]);
        assert!(expr.eval(&scope).unwrap().is_nan());
        let scope = Scope::from([("a", 1.0), ("b", 0.0)]);
        assert!(expr.eval(&scope).unwrap().is_nan());
    }

    #[test]
    fn test_unknown_variable() {
        let expr = Expr::Add(var("x"), var("z"));
        let scope = Scope::new().with("x", 1.0);
        assert_eq!(
            expr.eval(&scope),
            Err(EvalError::UnknownVariable("z".to_string()))
        );
    }

    #[test]
    fn test_scope_is_case_sensitive() {
        let scope = Scope::new().with("X", 2.0);
        assert!(scope.contains("X"));
        assert!(!scope.contains("x"));
    }

    #[test]
    fn test_scope_rebinding() {
        let mut scope = Scope::new();
        scope.set("x", 1.0);
        scope.set("x", 4.0);
        assert_eq!(scope.get("x"), Some(4.0));
        assert_eq!(scope.len(), 1);
    }

    #[test]
    fn test_extract_variables_and_dependency() {
        let expr = Expr::Sub(
            Box::new(Expr::Mul(var("y"), var("x"))),
            Box::new(Expr::Pow(var("x"), Box::new(Expr::Const(2.0)))),
        );
        assert_eq!(expr.extract_variables(), vec!["x".to_string(), "y".to_string()]);
        assert!(expr.depends_on("y"));
        assert!(!expr.depends_on("z"));
    }

    #[test]
    fn test_display() {
        let expr = Expr::Pow(var("x"), Box::new(Expr::Neg(Box::new(Expr::Const(1.0)))));
        assert_eq!(expr.to_string(), "(x ^ (-1))");
    }
}
