//! Integration limits: a literal, a symbolic infinity, or an expression in the
//! outer variable (`1-x`, `sqrt(y)`, `-sqrt(1-x^2)`).
use crate::symbolic::function_table::FunctionTable;
use crate::symbolic::parse_expr::ExprError;
use crate::symbolic::symbolic_engine::{Expr, Scope};
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum BoundError {
    Empty,
    NotReal { text: String },
    Expression { text: String, source: ExprError },
}

impl fmt::Display for BoundError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            BoundError::Empty => write!(f, "Empty bound"),
            BoundError::NotReal { text } => {
                write!(f, "Bound \"{}\" does not evaluate to a real number", text)
            }
            BoundError::Expression { text, source } => {
                write!(f, "Eval error in bound \"{}\": {}", text, source)
            }
        }
    }
}

impl std::error::Error for BoundError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BoundError::Expression { source, .. } => Some(source),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum BoundKind {
    PosInfinity,
    NegInfinity,
    Expression(Expr),
}

/// A parsed integration limit. The source text is kept for display and for
/// the literal matching done by the analytical lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct Bound {
    text: String,
    kind: BoundKind,
}

impl Bound {
    /// text is trimmed and lowercased before anything else
    pub fn parse(text: &str, table: &FunctionTable) -> Result<Bound, BoundError> {
        let clean = text.trim().to_lowercase();
        if clean.is_empty() {
            return Err(BoundError::Empty);
        }
        let kind = match clean.as_str() {
            "inf" | "infinity" | "∞" | "+inf" | "+infinity" => BoundKind::PosInfinity,
            "-inf" | "-infinity" | "-∞" => BoundKind::NegInfinity,
            _ => {
                let expr = Expr::parse_with(&clean, table).map_err(|source| {
                    BoundError::Expression { text: clean.clone(), source }
                })?;
                BoundKind::Expression(expr)
            }
        };
        Ok(Bound { text: clean, kind })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_infinite_literal(&self) -> bool {
        matches!(self.kind, BoundKind::PosInfinity | BoundKind::NegInfinity)
    }

    /// true when the bound is an expression in `var`, i.e. the region is Type I/II
    pub fn depends_on(&self, var: &str) -> bool {
        match &self.kind {
            BoundKind::Expression(expr) => expr.depends_on(var),
            _ => false,
        }
    }

    /// numeric value; ±infinity allowed, NaN rejected
    pub fn resolve(&self, scope: &Scope) -> Result<f64, BoundError> {
        let value = match &self.kind {
            BoundKind::PosInfinity => f64::INFINITY,
            BoundKind::NegInfinity => f64::NEG_INFINITY,
            BoundKind::Expression(expr) => expr.eval(scope).map_err(|e| BoundError::Expression {
                text: self.text.clone(),
                source: ExprError::Eval(e),
            })?,
        };
        if value.is_nan() {
            return Err(BoundError::NotReal { text: self.text.clone() });
        }
        Ok(value)
    }
}

/// parse and resolve in one go
pub fn resolve_bound(text: &str, scope: Option<&Scope>) -> Result<f64, BoundError> {
    let bound = Bound::parse(text, FunctionTable::global())?;
    match scope {
        Some(scope) => bound.resolve(scope),
        None => bound.resolve(&Scope::new()),
    }
}

/// short human-readable form of a resolved bound
pub fn format_bound(val: f64) -> String {
    if val.is_infinite() {
        return if val > 0.0 { "∞".to_string() } else { "-∞".to_string() };
    }
    if val == 0.0 {
        return "0".to_string();
    }
    if val.abs() < 1e-4 || val.abs() > 1e4 {
        return format!("{:.3e}", val);
    }
    let s = format!("{:.6}", val);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" { "0".to_string() } else { s.to_string() }
}
