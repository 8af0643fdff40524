//! Read-only registry of the functions and named constants an expression may use.
//!
//! The table maps a lowercase name to its accepted argument count and a plain
//! function pointer. It is built once and then only read: either through the
//! process-wide [`FunctionTable::global`] instance or as an owned value shared
//! by `Arc` between solvers.
use crate::symbolic::special_functions as sf;
use std::collections::HashMap;
use std::f64::consts::{E, PI};
use std::ops::RangeInclusive;
use std::sync::{Arc, OnceLock};

/// numeric implementation of a function; arguments are already arity-checked
pub type MathFn = fn(&[f64]) -> f64;

#[derive(Clone, Debug)]
pub struct FunctionDef {
    pub name: &'static str,
    pub arity: RangeInclusive<usize>,
    pub eval: MathFn,
}

impl FunctionDef {
    pub fn accepts(&self, n_args: usize) -> bool {
        self.arity.contains(&n_args)
    }
}

macro_rules! unary {
    ($name:expr, $f:expr) => {
        FunctionDef { name: $name, arity: 1..=1, eval: |a: &[f64]| $f(a[0]) }
    };
}

macro_rules! binary {
    ($name:expr, $f:expr) => {
        FunctionDef { name: $name, arity: 2..=2, eval: |a: &[f64]| $f(a[0], a[1]) }
    };
}

fn all_definitions() -> Vec<FunctionDef> {
    vec![
        unary!("sin", f64::sin),
        unary!("cos", f64::cos),
        unary!("tan", f64::tan),
        unary!("asin", f64::asin),
        unary!("acos", f64::acos),
        unary!("atan", f64::atan),
        unary!("sinh", f64::sinh),
        unary!("cosh", f64::cosh),
        unary!("tanh", f64::tanh),
        unary!("sec", |x: f64| 1.0 / x.cos()),
        unary!("csc", |x: f64| 1.0 / x.sin()),
        unary!("cot", |x: f64| 1.0 / x.tan()),
        unary!("sqrt", f64::sqrt),
        unary!("cbrt", f64::cbrt),
        unary!("exp", f64::exp),
        unary!("log", f64::ln),
        unary!("ln", f64::ln),
        unary!("log10", f64::log10),
        unary!("log2", f64::log2),
        unary!("abs", f64::abs),
        unary!("sign", sf::sign),
        unary!("ceil", f64::ceil),
        unary!("floor", f64::floor),
        unary!("round", f64::round),
        unary!("gamma", sf::gamma),
        unary!("fact", sf::factorial),
        unary!("besselj0", sf::bessel_j0),
        unary!("erf", sf::erf),
        unary!("heaviside", sf::heaviside),
        unary!("sinc", sf::sinc),
        binary!("pow", f64::powf),
        binary!("atan2", f64::atan2),
        binary!("max", f64::max),
        binary!("min", f64::min),
        FunctionDef {
            name: "dirac",
            arity: 1..=2,
            eval: |a: &[f64]| sf::dirac(a[0], a.get(1).copied().unwrap_or(sf::DIRAC_DEFAULT_EPS)),
        },
    ]
}

/// Functions and constants of the expression language
#[derive(Clone, Debug)]
pub struct FunctionTable {
    functions: HashMap<&'static str, FunctionDef>,
    constants: HashMap<&'static str, f64>,
}

static GLOBAL_TABLE: OnceLock<Arc<FunctionTable>> = OnceLock::new();

impl FunctionTable {
    pub fn new() -> Self {
        let functions = all_definitions()
            .into_iter()
            .map(|def| (def.name, def))
            .collect();
        let constants = HashMap::from([
            ("pi", PI),
            ("e", E),
            ("inf", f64::INFINITY),
            ("infinity", f64::INFINITY),
        ]);
        FunctionTable { functions, constants }
    }

    /// process-wide instance, built on first use
    pub fn global() -> &'static FunctionTable {
        Self::global_arc()
    }

    /// handle to the process-wide instance for owners that keep an `Arc`
    pub fn shared() -> Arc<FunctionTable> {
        Arc::clone(Self::global_arc())
    }

    fn global_arc() -> &'static Arc<FunctionTable> {
        GLOBAL_TABLE.get_or_init(|| Arc::new(FunctionTable::new()))
    }

    /// lookup by name, case-insensitive
    pub fn function(&self, name: &str) -> Option<&FunctionDef> {
        self.functions.get(name.to_lowercase().as_str())
    }

    /// lookup by name, case-insensitive
    pub fn constant(&self, name: &str) -> Option<f64> {
        self.constants.get(name.to_lowercase().as_str()).copied()
    }

    pub fn is_function(&self, name: &str) -> bool {
        self.function(name).is_some()
    }

    /// sorted names, handy for help output
    pub fn function_names(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self.functions.keys().copied().collect();
        names.sort_unstable();
        names
    }
}

impl Default for FunctionTable {
    fn default() -> Self {
        FunctionTable::new()
    }
}
