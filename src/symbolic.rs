#![allow(non_camel_case_types)]
#![allow(non_snake_case)]
/// the expression language integrands and bounds are written in
///
///# Example
/// ```
/// use RustedDoubleQuad::symbolic::symbolic_engine::{Expr, Scope};
/// let parsed_expression = Expr::parse_expression("2x*y + sin(pi*x)").unwrap();
/// println!(" parsed_expression {}", parsed_expression);
/// let scope = Scope::new().with("x", 0.5).with("y", 2.0);
/// let value = parsed_expression.eval(&scope).unwrap();
/// assert!((value - 3.0).abs() < 1e-12);
/// ```
/// ________________________________________________________________________________________________________________________________
/// tokenizer with implicit multiplication (`2x`, `x(y)`, `)(`)
pub mod lexer;
/// recursive-descent parser from tokens to expression tree
pub mod parse_expr;
/// expression tree, variable scope and evaluation errors
pub mod symbolic_engine;
///________________________________________________________________________________________________________________________________
/// read-only registry of functions and constants
/// Example#
/// ```
/// use RustedDoubleQuad::symbolic::function_table::FunctionTable;
/// let table = FunctionTable::global();
/// let gamma = table.function("gamma").unwrap();
/// assert!(((gamma.eval)(&[5.0]) - 24.0).abs() < 1e-9);
/// ```
pub mod function_table;
/// gamma, erf, Bessel J0, Heaviside, sinc, Dirac delta approximation
pub mod special_functions;
