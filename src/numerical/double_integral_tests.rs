/////////////////////////////TESTS////////////////////////////////////////////////////
/*
double integral driver:
closed-form rectangular cases
variable (Type I/II) inner bounds
infinite bounds
degenerate and inverted inner intervals
order swap
mode policies
step trace and statistics
error propagation
*/

#[cfg(test)]
mod tests {
    use crate::numerical::bounds::BoundError;
    use crate::numerical::double_integral::{
        DoubleIntegralSolver, FixedModePolicy, IntegrationError, IntegrationOrder,
        IntegrationRequest, solve_double_integral,
    };
    use crate::numerical::quadrature::{QuadMode, QuadOptions};
    use crate::symbolic::function_table::FunctionTable;
    use crate::symbolic::symbolic_engine::EvalError;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    fn light_solver() -> DoubleIntegralSolver {
        let options = QuadOptions { panels: 20, infinite_panels: 60, ..QuadOptions::default() };
        DoubleIntegralSolver::new(FunctionTable::shared()).with_options(options)
    }

    fn titles(request: &IntegrationRequest) -> Vec<String> {
        let result = light_solver().solve(request).unwrap();
        result.steps.into_iter().map(|step| step.title).collect()
    }

    #[test]
    fn test_2xy_rectangle() {
        let request = IntegrationRequest::new("2*x*y").x("0", "2").y("0", "1");
        let result = solve_double_integral(&request).unwrap();
        assert_relative_eq!(result.value, 2.0, max_relative = 1e-6);
        assert_eq!(result.analytical.as_deref(), Some("2"));
    }

    #[test]
    fn test_x_minus_y_rectangle() {
        let request = IntegrationRequest::new("x-y").x("0", "1").y("-1", "0");
        let result = solve_double_integral(&request).unwrap();
        assert_relative_eq!(result.value, 1.0, max_relative = 1e-6);
        assert_eq!(result.analytical.as_deref(), Some("1"));
    }

    #[test]
    fn test_sum_of_squares_square() {
        let request = IntegrationRequest::new("x^2+y^2").x("-1", "1").y("-1", "1");
        let result = solve_double_integral(&request).unwrap();
        assert_relative_eq!(result.value, 8.0 / 3.0, max_relative = 1e-6);
        assert_eq!(result.analytical.as_deref(), Some("8/3"));
    }

    #[test]
    fn test_triangle_variable_upper_bound() {
        let request = IntegrationRequest::new("x+y").x("0", "1").y("0", "1-x");
        let result = solve_double_integral(&request).unwrap();
        assert_relative_eq!(result.value, 1.0 / 3.0, max_relative = 1e-6);
        assert_eq!(result.analytical.as_deref(), Some("1/3"));
    }

    #[test]
    fn test_gaussian_over_plane() {
        let request = IntegrationRequest::new("exp(-x^2-y^2)").x("-inf", "inf").y("-inf", "inf");
        let result = solve_double_integral(&request).unwrap();
        assert_relative_eq!(result.value, PI, max_relative = 1e-6);
        assert!(result.analytical.is_none());
    }

    #[test]
    fn test_implicit_multiplication_in_integrand() {
        let explicit = light_solver().solve(&IntegrationRequest::new("2*x*y").x("0", "2")).unwrap();
        let implicit = light_solver().solve(&IntegrationRequest::new("2x y").x("0", "2")).unwrap();
        assert_eq!(explicit.value, implicit.value);
    }

    #[test]
    fn test_semi_infinite_outer() {
        // ∫₀^∞ ∫₁² e^{-xy} dy dx = ∫₁² dy / y = ln 2
        let request = IntegrationRequest::new("exp(-x*y)").x("0", "inf").y("1", "2");
        let result = solve_double_integral(&request).unwrap();
        assert_relative_eq!(result.value, 2f64.ln(), epsilon = 1e-3);
    }

    #[test]
    fn test_circle_area() {
        let request = IntegrationRequest::new("1").x("-1", "1").y("-sqrt(1-x^2)", "sqrt(1-x^2)");
        let result = solve_double_integral(&request).unwrap();
        assert_relative_eq!(result.value, PI, epsilon = 1e-5);
    }

    #[test]
    fn test_parabolic_region_dxdy() {
        // ∫₀⁴ ∫₀^√y x² dx dy = 64/15
        let request = IntegrationRequest::new("x^2")
            .x("0", "sqrt(y)")
            .y("0", "4")
            .order(IntegrationOrder::DxDy);
        let result = light_solver().solve(&request).unwrap();
        assert_relative_eq!(result.value, 64.0 / 15.0, max_relative = 1e-6);
    }

    #[test]
    fn test_exp_with_log_bounds() {
        // (2 - 1)(5 - 1) = 4
        let request = IntegrationRequest::new("exp(x+y)").x("0", "ln(2)").y("0", "ln(5)");
        let result = light_solver().solve(&request).unwrap();
        assert_relative_eq!(result.value, 4.0, max_relative = 1e-9);
    }

    #[test]
    fn test_degenerate_inner_interval_is_zero() {
        let request = IntegrationRequest::new("1+x*y").x("0", "1").y("x", "x");
        let result = light_solver().solve(&request).unwrap();
        assert_eq!(result.value, 0.0);
        assert_eq!(result.stats.inner_evals, 0);
        assert!(result.stats.outer_evals > 0);
    }

    #[test]
    fn test_inverted_inner_interval_is_zero() {
        let request = IntegrationRequest::new("x+y").x("0", "1").y("1", "0");
        let result = light_solver().solve(&request).unwrap();
        assert_eq!(result.value, 0.0);
    }

    #[test]
    fn test_partially_empty_region() {
        // y in [0, x - 1/2] is empty for x < 1/2: ∫_{1/2}^{1} (x - 1/2) dx = 1/8
        let request = IntegrationRequest::new("1").x("0", "1").y("0", "x-0.5");
        let result = solve_double_integral(&request).unwrap();
        assert_relative_eq!(result.value, 0.125, epsilon = 1e-4);
    }

    #[test]
    fn test_order_swap_agrees() {
        let dydx = IntegrationRequest::new("x*exp(y)").x("0", "1").y("0", "2");
        let dxdy = dydx.clone().order(IntegrationOrder::DxDy);
        let a = light_solver().solve(&dydx).unwrap().value;
        let b = light_solver().solve(&dxdy).unwrap().value;
        let exact = 0.5 * (2f64.exp() - 1.0);
        assert_relative_eq!(a, exact, max_relative = 1e-9);
        assert_relative_eq!(a, b, max_relative = 1e-9);
    }

    #[test]
    fn test_oscillatory_mode() {
        let request = IntegrationRequest::new("sin(x)*cos(y)").x("0", "pi/2").y("0", "pi/2");
        let result = solve_double_integral(&request).unwrap();
        assert_relative_eq!(result.value, 1.0, max_relative = 1e-6);
    }

    #[test]
    fn test_fixed_singular_policy() {
        let solver = light_solver().with_policy(Box::new(FixedModePolicy(QuadMode::Singular)));
        let request = IntegrationRequest::new("2*x*y").x("0", "2").y("0", "1");
        let result = solver.solve(&request).unwrap();
        assert_relative_eq!(result.value, 2.0, max_relative = 1e-9);
        // Simpson is exact on a bilinear integrand, so no refinement happens
        assert!(result.stats.inner_evals < 100);
    }

    #[test]
    fn test_stats_for_rectangle() {
        let request = IntegrationRequest::new("x*y").x("0", "2").y("0", "3");
        let result = light_solver().solve(&request).unwrap();
        assert_eq!(result.stats.outer_evals, 20 * 15);
        assert_eq!(result.stats.inner_evals, 300 * 300);
        let stats = result.steps.iter().find(|s| s.title == "Computation Stats").unwrap();
        assert_eq!(stats.formula, "Evaluations: 300 outer × ~300 inner = ~90,000 total");
    }

    #[test]
    fn test_step_trace_rectangular() {
        let request = IntegrationRequest::new("2*x*y").x("0", "2").y("0", "1");
        let result = light_solver().solve(&request).unwrap();
        let titles: Vec<&str> = result.steps.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(
            titles,
            vec![
                "Problem Setup",
                "Outer Bounds",
                "Inner Bounds (Constant)",
                "Analytical Solution",
                "Computation Stats",
                "Final Result",
            ]
        );
        assert_eq!(result.steps[0].formula, "∫_{0}^{2} ∫_{0}^{1} (2*x*y) dy dx");
        assert_eq!(result.steps[1].content, "x ranges from:");
        assert_eq!(result.steps[1].formula, "[0, 2]");
        assert_eq!(result.steps[2].formula, "y ∈ [0, 1]");
        assert_eq!(result.steps[3].formula, "Result = 2");
        assert!(result.steps[5].formula.starts_with("2.000000000000\n≈ 2.000000e0"));
    }

    #[test]
    fn test_step_trace_variable_and_improper() {
        let triangle = IntegrationRequest::new("x+y").x("0", "1").y("0", "1-x");
        let result = light_solver().solve(&triangle).unwrap();
        assert_eq!(result.steps[2].title, "Inner Bounds (Variable)");
        assert_eq!(result.steps[2].content, "Type I/II region:");
        assert_eq!(result.steps[2].formula, "y ∈ [0, 1-x]");

        let gaussian = IntegrationRequest::new("exp(-x^2-y^2)").x("-inf", "inf").y("-inf", "inf");
        assert_eq!(
            titles(&gaussian),
            vec![
                "Problem Setup",
                "Outer Bounds",
                "Inner Bounds (Constant)",
                "Improper Integral",
                "Computation Stats",
                "Final Result",
            ]
        );
        let result = light_solver().solve(&gaussian).unwrap();
        assert_eq!(result.steps[1].formula, "[-∞, ∞]");
        assert_eq!(result.steps[3].formula, "t = x/(1-x²) mapping");
    }

    #[test]
    fn test_dxdy_trace_uses_y_as_outer() {
        let request = IntegrationRequest::new("x^2")
            .x("0", "sqrt(y)")
            .y("0", "4")
            .order(IntegrationOrder::DxDy);
        let result = light_solver().solve(&request).unwrap();
        assert_eq!(result.steps[0].formula, "∫_{0}^{4} ∫_{0}^{sqrt(y)} (x^2) dx dy");
        assert_eq!(result.steps[1].content, "y ranges from:");
        assert_eq!(result.steps[2].formula, "x ∈ [0, sqrt(y)]");
    }

    #[test]
    fn test_unknown_variable_aborts() {
        let request = IntegrationRequest::new("x*z");
        let err = light_solver().solve(&request).unwrap_err();
        assert_eq!(
            err,
            IntegrationError::Eval {
                expression: "x*z".to_string(),
                source: EvalError::UnknownVariable("z".to_string()),
            }
        );
        assert!(err.to_string().contains("Unknown variable: z"));
    }

    #[test]
    fn test_parse_errors_abort() {
        assert!(matches!(
            light_solver().solve(&IntegrationRequest::new("x $ y")),
            Err(IntegrationError::Lex { .. })
        ));
        assert!(matches!(
            light_solver().solve(&IntegrationRequest::new("foo(x)")),
            Err(IntegrationError::Eval { source: EvalError::UnknownFunction(_), .. })
        ));
        assert!(matches!(
            light_solver().solve(&IntegrationRequest::new("(x+y")),
            Err(IntegrationError::Eval { source: EvalError::Malformed(_), .. })
        ));
    }

    #[test]
    fn test_bound_errors_abort() {
        let empty = IntegrationRequest::new("x").x("", "1");
        assert_eq!(
            light_solver().solve(&empty),
            Err(IntegrationError::Bound(BoundError::Empty))
        );
        // sqrt of a negative number for every outer sample
        let not_real = IntegrationRequest::new("x").y("0", "sqrt(x-2)");
        assert!(matches!(
            light_solver().solve(&not_real),
            Err(IntegrationError::Bound(BoundError::NotReal { .. }))
        ));
        // the inner variable cannot appear in its own bounds
        let self_ref = IntegrationRequest::new("x").y("0", "y");
        assert!(matches!(
            light_solver().solve(&self_ref),
            Err(IntegrationError::Bound(BoundError::Expression { .. }))
        ));
    }
}
