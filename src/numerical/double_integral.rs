//! # Double integral driver
//!
//! Computes iterated integrals
//! ```text
//! ∫_{a}^{b} ∫_{g(outer)}^{h(outer)} f(x, y) d(inner) d(outer)
//! ```
//! where the inner limits may depend on the outer variable (Type I/II regions)
//! and any limit may be infinite. The integrand is parsed once; the inner limits
//! are re-resolved at every outer sample. Every solve also returns a human-readable
//! step trace and, when the problem is a known textbook case, its closed form.
//!
//! ## Main structures
//! - `IntegrationRequest` - integrand text, four bound texts and the integration order
//! - `DoubleIntegralSolver` - function table, quadrature options and mode policy
//! - `IntegrationResult` - value, step trace, analytical form and evaluation counts
//!
//! ## Example
//! ```
//! use RustedDoubleQuad::numerical::double_integral::{IntegrationRequest, solve_double_integral};
//! let request = IntegrationRequest::new("x+y").x("0", "1").y("0", "1-x");
//! let result = solve_double_integral(&request).unwrap();
//! assert!((result.value - 1.0 / 3.0).abs() < 1e-6);
//! assert_eq!(result.analytical.as_deref(), Some("1/3"));
//! ```
use crate::numerical::analytical_lookup::{BoundTexts, lookup_analytical};
use crate::numerical::bounds::{Bound, BoundError, format_bound};
use crate::numerical::quadrature::{QuadMode, QuadOptions, integrate_1d};
use crate::symbolic::function_table::FunctionTable;
use crate::symbolic::lexer::LexError;
use crate::symbolic::parse_expr::ExprError;
use crate::symbolic::symbolic_engine::{EvalError, Expr, Scope};
use itertools::Itertools;
use log::{debug, info, warn};
use std::cell::{Cell, RefCell};
use std::fmt;
use std::sync::Arc;
use strum_macros::{Display, EnumIter, EnumString};
use tabled::Tabled;

/// which variable is integrated first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, EnumIter)]
#[strum(ascii_case_insensitive)]
pub enum IntegrationOrder {
    /// outer x, inner y
    #[default]
    #[strum(serialize = "dydx")]
    DyDx,
    /// outer y, inner x
    #[strum(serialize = "dxdy")]
    DxDy,
}

impl IntegrationOrder {
    /// (outer, inner)
    pub fn variables(&self) -> (&'static str, &'static str) {
        match self {
            IntegrationOrder::DyDx => ("x", "y"),
            IntegrationOrder::DxDy => ("y", "x"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IntegrationRequest {
    pub integrand: String,
    pub x_min: String,
    pub x_max: String,
    pub y_min: String,
    pub y_max: String,
    pub order: IntegrationOrder,
}

impl IntegrationRequest {
    /// unit square, dy dx
    pub fn new(integrand: &str) -> Self {
        IntegrationRequest {
            integrand: integrand.to_string(),
            x_min: "0".to_string(),
            x_max: "1".to_string(),
            y_min: "0".to_string(),
            y_max: "1".to_string(),
            order: IntegrationOrder::DyDx,
        }
    }

    pub fn x(mut self, min: &str, max: &str) -> Self {
        self.x_min = min.to_string();
        self.x_max = max.to_string();
        self
    }

    pub fn y(mut self, min: &str, max: &str) -> Self {
        self.y_min = min.to_string();
        self.y_max = max.to_string();
        self
    }

    pub fn order(mut self, order: IntegrationOrder) -> Self {
        self.order = order;
        self
    }

    /// (outer_min, outer_max, inner_min, inner_max) as raw text
    fn arranged(&self) -> (&str, &str, &str, &str) {
        match self.order {
            IntegrationOrder::DyDx => (
                self.x_min.as_str(),
                self.x_max.as_str(),
                self.y_min.as_str(),
                self.y_max.as_str(),
            ),
            IntegrationOrder::DxDy => (
                self.y_min.as_str(),
                self.y_max.as_str(),
                self.x_min.as_str(),
                self.x_max.as_str(),
            ),
        }
    }
}

/// one entry of the explanation trace
#[derive(Debug, Clone, PartialEq, Tabled)]
pub struct Step {
    pub title: String,
    pub content: String,
    pub formula: String,
}

impl Step {
    fn new(title: &str, content: &str, formula: String) -> Self {
        Step { title: title.to_string(), content: content.to_string(), formula }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct IntegrationStats {
    /// calls of the outer integrand
    pub outer_evals: usize,
    /// evaluations of the integrand itself
    pub inner_evals: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IntegrationResult {
    pub value: f64,
    pub steps: Vec<Step>,
    pub analytical: Option<String>,
    pub stats: IntegrationStats,
}

#[derive(Debug, Clone, PartialEq)]
pub enum IntegrationError {
    Lex { expression: String, source: LexError },
    Eval { expression: String, source: EvalError },
    Bound(BoundError),
}

impl IntegrationError {
    fn in_integrand(expression: &str, err: ExprError) -> Self {
        let expression = expression.to_string();
        match err {
            ExprError::Lex(source) => IntegrationError::Lex { expression, source },
            ExprError::Eval(source) => IntegrationError::Eval { expression, source },
        }
    }
}

impl fmt::Display for IntegrationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            IntegrationError::Lex { expression, source } => {
                write!(f, "Lex error in \"{}\": {}", expression, source)
            }
            IntegrationError::Eval { expression, source } => {
                write!(f, "Eval error in \"{}\": {}", expression, source)
            }
            IntegrationError::Bound(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for IntegrationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            IntegrationError::Lex { source, .. } => Some(source),
            IntegrationError::Eval { source, .. } => Some(source),
            IntegrationError::Bound(err) => Some(err),
        }
    }
}

impl From<BoundError> for IntegrationError {
    fn from(err: BoundError) -> Self {
        IntegrationError::Bound(err)
    }
}

/// picks the quadrature rule for both levels from the integrand text
pub trait ModePolicy: Send + Sync {
    fn select(&self, integrand: &str) -> QuadMode;
}

/// oscillatory as soon as the text mentions `sin` or `cos`
/// (so `asin`, `sinh` and `sinc` count too)
#[derive(Debug, Clone, Copy, Default)]
pub struct TrigSubstringPolicy;

impl ModePolicy for TrigSubstringPolicy {
    fn select(&self, integrand: &str) -> QuadMode {
        if integrand.contains("sin") || integrand.contains("cos") {
            QuadMode::Oscillatory
        } else {
            QuadMode::Smooth
        }
    }
}

/// always the same mode, whatever the integrand
#[derive(Debug, Clone, Copy)]
pub struct FixedModePolicy(pub QuadMode);

impl ModePolicy for FixedModePolicy {
    fn select(&self, _integrand: &str) -> QuadMode {
        self.0
    }
}

pub struct DoubleIntegralSolver {
    table: Arc<FunctionTable>,
    options: QuadOptions,
    policy: Box<dyn ModePolicy>,
}

impl Default for DoubleIntegralSolver {
    fn default() -> Self {
        DoubleIntegralSolver::new(FunctionTable::shared())
    }
}

impl DoubleIntegralSolver {
    pub fn new(table: Arc<FunctionTable>) -> Self {
        DoubleIntegralSolver {
            table,
            options: QuadOptions::default(),
            policy: Box::new(TrigSubstringPolicy),
        }
    }

    pub fn with_options(mut self, options: QuadOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_policy(mut self, policy: Box<dyn ModePolicy>) -> Self {
        self.policy = policy;
        self
    }

    pub fn options(&self) -> &QuadOptions {
        &self.options
    }

    pub fn solve(&self, request: &IntegrationRequest) -> Result<IntegrationResult, IntegrationError> {
        info!(
            "solving double integral of {} with order {}",
            request.integrand, request.order
        );
        let (outer_var, inner_var) = request.order.variables();
        let (outer_min_text, outer_max_text, inner_min_text, inner_max_text) = request.arranged();
        let table = self.table.as_ref();

        let integrand = Expr::parse_with(&request.integrand, table)
            .map_err(|e| IntegrationError::in_integrand(&request.integrand, e))?;
        let outer_min = Bound::parse(outer_min_text, table)?;
        let outer_max = Bound::parse(outer_max_text, table)?;
        let inner_min = Bound::parse(inner_min_text, table)?;
        let inner_max = Bound::parse(inner_max_text, table)?;

        let mut steps = vec![Step::new(
            "Problem Setup",
            "Evaluating the iterated integral:",
            format!(
                "∫_{{{}}}^{{{}}} ∫_{{{}}}^{{{}}} ({}) d{} d{}",
                outer_min_text, outer_max_text, inner_min_text, inner_max_text,
                request.integrand, inner_var, outer_var
            ),
        )];

        let empty = Scope::new();
        let outer_lo = outer_min.resolve(&empty)?;
        let outer_hi = outer_max.resolve(&empty)?;
        debug!("{} in [{}, {}]", outer_var, outer_lo, outer_hi);
        steps.push(Step::new(
            "Outer Bounds",
            &format!("{} ranges from:", outer_var),
            format!("[{}, {}]", format_bound(outer_lo), format_bound(outer_hi)),
        ));

        if inner_min.depends_on(outer_var) || inner_max.depends_on(outer_var) {
            debug!("inner bounds depend on {}", outer_var);
            steps.push(Step::new(
                "Inner Bounds (Variable)",
                "Type I/II region:",
                format!("{} ∈ [{}, {}]", inner_var, inner_min.text(), inner_max.text()),
            ));
        } else {
            let lo = inner_min.resolve(&empty)?;
            let hi = inner_max.resolve(&empty)?;
            steps.push(Step::new(
                "Inner Bounds (Constant)",
                "Rectangular region:",
                format!("{} ∈ [{}, {}]", inner_var, format_bound(lo), format_bound(hi)),
            ));
        }

        let bound_texts = BoundTexts {
            x_min: request.x_min.trim(),
            x_max: request.x_max.trim(),
            y_min: request.y_min.trim(),
            y_max: request.y_max.trim(),
        };
        let analytical = lookup_analytical(&request.integrand, &bound_texts).map(str::to_string);
        if let Some(form) = &analytical {
            debug!("closed form found: {}", form);
            steps.push(Step::new(
                "Analytical Solution",
                "Known closed form:",
                format!("Result = {}", form),
            ));
        }

        if outer_lo.is_infinite() || outer_hi.is_infinite() {
            steps.push(Step::new(
                "Improper Integral",
                "Using variable transformation for infinite bounds",
                "t = x/(1-x²) mapping".to_string(),
            ));
        }

        let mode = self.policy.select(&request.integrand);
        let options = self.options.with_mode(mode);
        debug!("quadrature mode: {}", mode.description());

        let first_error: RefCell<Option<IntegrationError>> = RefCell::new(None);
        let record = |err: IntegrationError| {
            let mut slot = first_error.borrow_mut();
            if slot.is_none() {
                *slot = Some(err);
            }
        };
        let failed = || first_error.borrow().is_some();
        let outer_evals = Cell::new(0usize);
        let inner_evals = Cell::new(0usize);
        let point = RefCell::new(Scope::new().with(outer_var, 0.0).with(inner_var, 0.0));
        let bound_scope = RefCell::new(Scope::new().with(outer_var, 0.0));

        let outer_fn = |outer: f64| -> f64 {
            if failed() {
                return 0.0;
            }
            outer_evals.set(outer_evals.get() + 1);
            let (lo, hi) = {
                let mut scope = bound_scope.borrow_mut();
                scope.set(outer_var, outer);
                match (inner_min.resolve(&scope), inner_max.resolve(&scope)) {
                    (Ok(lo), Ok(hi)) => (lo, hi),
                    (Err(err), _) | (_, Err(err)) => {
                        record(err.into());
                        return 0.0;
                    }
                }
            };
            if lo >= hi {
                return 0.0;
            }
            let inner_fn = |inner: f64| -> f64 {
                if failed() {
                    return 0.0;
                }
                inner_evals.set(inner_evals.get() + 1);
                let mut scope = point.borrow_mut();
                scope.set(outer_var, outer);
                scope.set(inner_var, inner);
                match integrand.eval(&scope) {
                    Ok(value) => value,
                    Err(source) => {
                        record(IntegrationError::Eval {
                            expression: request.integrand.clone(),
                            source,
                        });
                        0.0
                    }
                }
            };
            integrate_1d(&inner_fn, lo, hi, &options)
        };
        let value = integrate_1d(&outer_fn, outer_lo, outer_hi, &options);

        let failure = first_error.borrow_mut().take();
        if let Some(err) = failure {
            warn!("integration aborted: {}", err);
            return Err(err);
        }
        let stats = IntegrationStats {
            outer_evals: outer_evals.get(),
            inner_evals: inner_evals.get(),
        };
        let per_outer = if stats.outer_evals == 0 {
            0
        } else {
            (stats.inner_evals as f64 / stats.outer_evals as f64).round() as usize
        };
        steps.push(Step::new(
            "Computation Stats",
            "Numerical integration completed:",
            format!(
                "Evaluations: {} outer × ~{} inner = ~{} total",
                stats.outer_evals,
                per_outer,
                group_thousands(stats.inner_evals)
            ),
        ));
        steps.push(Step::new(
            "Final Result",
            "Computed value:",
            format!("{:.12}\n≈ {:.6e}", value, value),
        ));

        if !value.is_finite() {
            warn!("integral of {} is not finite: {}", request.integrand, value);
        }
        info!(
            "integral = {} after {} integrand evaluations",
            value, stats.inner_evals
        );
        Ok(IntegrationResult { value, steps, analytical, stats })
    }
}

/// solve with the default table, options and mode policy
pub fn solve_double_integral(request: &IntegrationRequest) -> Result<IntegrationResult, IntegrationError> {
    DoubleIntegralSolver::default().solve(request)
}

/// 1234567 -> "1,234,567"
fn group_thousands(n: usize) -> String {
    let digits: Vec<char> = n.to_string().chars().collect();
    digits
        .rchunks(3)
        .rev()
        .map(|chunk| chunk.iter().collect::<String>())
        .join(",")
}
