//! numerical integration of iterated double integrals
///  Example#1
/// ```
/// use RustedDoubleQuad::numerical::double_integral::{IntegrationRequest, IntegrationOrder, solve_double_integral};
/// // ∫₀⁴ ∫₀^√y x² dx dy, the inner upper limit depends on the outer variable
/// let request = IntegrationRequest::new("x^2")
///     .x("0", "sqrt(y)")
///     .y("0", "4")
///     .order(IntegrationOrder::DxDy);
/// let result = solve_double_integral(&request).unwrap();
/// for step in &result.steps {
///     println!("{}: {} {}", step.title, step.content, step.formula);
/// }
/// assert!((result.value - 64.0 / 15.0).abs() < 1e-6);
/// ```
/// Example#2
/// ```
/// use RustedDoubleQuad::numerical::double_integral::{DoubleIntegralSolver, FixedModePolicy, IntegrationRequest};
/// use RustedDoubleQuad::numerical::quadrature::{QuadMode, QuadOptions};
/// // force adaptive Simpson at both levels and loosen the tolerance
/// let options = QuadOptions { eps: 1e-8, ..QuadOptions::default() };
/// let solver = DoubleIntegralSolver::default()
///     .with_options(options)
///     .with_policy(Box::new(FixedModePolicy(QuadMode::Singular)));
/// let request = IntegrationRequest::new("exp(x+y)").x("0", "ln(2)").y("0", "ln(5)");
/// let result = solver.solve(&request).unwrap();
/// assert!((result.value - 4.0).abs() < 1e-6);
/// ```
pub mod double_integral;
/// parsing and resolving of integration limits, including infinities and expressions in the outer variable
pub mod bounds;
/// Gauss-Kronrod panels, adaptive Simpson and infinite-interval substitutions
pub mod quadrature;
/// closed forms of a handful of textbook integrals, shown next to the numeric value
pub mod analytical_lookup;
mod double_integral_tests;
