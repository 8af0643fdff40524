// Copyright (c)  by Gleb E. Zaslavkiy
//MIT License
#![allow(non_snake_case)]

use crate::Examples::presets::{PRESETS, Preset};
use crate::numerical::double_integral::{
    DoubleIntegralSolver, FixedModePolicy, IntegrationOrder, IntegrationRequest, IntegrationResult,
    solve_double_integral,
};
use crate::numerical::quadrature::{QuadMode, QuadOptions, integrate_1d};
use crate::symbolic::parse_expr::evaluate;
use crate::symbolic::symbolic_engine::{Expr, Scope};
use log::{error, info};
use std::time::Instant;
use tabled::settings::Style;
use tabled::{Table, Tabled};

#[derive(Tabled)]
struct PresetRow {
    category: &'static str,
    name: &'static str,
    value: String,
    analytical: String,
    evaluations: usize,
    time_ms: u128,
}

fn print_steps(result: &IntegrationResult) {
    let mut table = Table::new(&result.steps);
    table.with(Style::modern_rounded());
    println!("{}", table);
}

fn solve_preset(preset: &Preset) -> Option<IntegrationResult> {
    match solve_double_integral(&preset.to_request()) {
        Ok(result) => Some(result),
        Err(e) => {
            error!("{}: {}", preset.name, e);
            None
        }
    }
}

#[allow(dead_code)]
pub fn run_example(example: usize) {
    match example {
        0 => {
            // the whole preset catalogue at default settings
            let mut rows = Vec::new();
            for category in PRESETS.iter() {
                for preset in category.presets {
                    let start = Instant::now();
                    if let Some(result) = solve_preset(preset) {
                        rows.push(PresetRow {
                            category: category.label,
                            name: preset.name,
                            value: format!("{:.10}", result.value),
                            analytical: result.analytical.unwrap_or_default(),
                            evaluations: result.stats.inner_evals,
                            time_ms: start.elapsed().as_millis(),
                        });
                    }
                }
            }
            let mut table = Table::new(rows);
            table.with(Style::modern_rounded());
            println!("{}", table);
        }
        1 => {
            // triangular region, inner upper limit depends on x
            let request = IntegrationRequest::new("x+y").x("0", "1").y("0", "1-x");
            match solve_double_integral(&request) {
                Ok(result) => {
                    print_steps(&result);
                    println!("value = {}, closed form = {:?}", result.value, result.analytical);
                }
                Err(e) => println!("error: {}", e),
            }
        }
        2 => {
            // Gaussian over the whole plane, exact value is pi
            let request = IntegrationRequest::new("exp(-x^2-y^2)").x("-inf", "inf").y("-inf", "inf");
            let result = solve_double_integral(&request);
            match result {
                Ok(result) => {
                    print_steps(&result);
                    println!("error vs pi = {:e}", (result.value - std::f64::consts::PI).abs());
                }
                Err(e) => println!("error: {}", e),
            }
        }
        3 => {
            // area of the unit disc with variable bounds in both orders
            for (x, y) in [
                (("-1", "1"), ("-sqrt(1-x^2)", "sqrt(1-x^2)")),
                (("-sqrt(1-y^2)", "sqrt(1-y^2)"), ("-1", "1")),
            ] {
                let request = IntegrationRequest::new("1").x(x.0, x.1).y(y.0, y.1);
                let request = if x.0.contains('y') {
                    request.order(IntegrationOrder::DxDy)
                } else {
                    request
                };
                match solve_double_integral(&request) {
                    Ok(result) => println!(
                        "{} area = {:.12} (pi = {:.12})",
                        request.order,
                        result.value,
                        std::f64::consts::PI
                    ),
                    Err(e) => println!("error: {}", e),
                }
            }
        }
        4 => {
            // forcing the adaptive Simpson rule with a looser tolerance
            let options = QuadOptions { eps: 1e-8, max_depth: 20, ..QuadOptions::default() };
            let solver = DoubleIntegralSolver::default()
                .with_options(options)
                .with_policy(Box::new(FixedModePolicy(QuadMode::Singular)));
            let request = IntegrationRequest::new("sqrt(x*y)").x("0", "1").y("0", "1");
            let start = Instant::now();
            match solver.solve(&request) {
                Ok(result) => {
                    print_steps(&result);
                    info!(
                        "solved in {} ms with eps = {:e}, max_depth = {}",
                        start.elapsed().as_millis(),
                        solver.options().eps,
                        solver.options().max_depth
                    );
                    println!("value = {:.10}, exact = {:.10}", result.value, 4.0 / 9.0);
                }
                Err(e) => println!("error: {}", e),
            }
        }
        5 => {
            // the expression language on its own
            let scope = Scope::new().with("x", 0.5).with("y", 2.0);
            for input in ["2x y", "sin(pi*x)^2 + cos(pi*x)^2", "dirac(x - 0.5)", "0/0", "x + z", "x $ y"] {
                match evaluate(input, &scope) {
                    Ok(value) => println!("{:>28} = {}", input, value),
                    Err(e) => println!("{:>28} -> {}", input, e),
                }
            }
            // one-dimensional integral of a parsed expression
            if let Ok(expr) = Expr::parse_expression("exp(-x^2)") {
                let f = expr.lambdify1D("x");
                let value = integrate_1d(&f, f64::NEG_INFINITY, f64::INFINITY, &QuadOptions::default());
                println!("∫ exp(-x^2) dx over ℝ = {:.12}, sqrt(pi) = {:.12}", value, std::f64::consts::PI.sqrt());
            }
        }
        _ => {
            println!("examples 0..=5 available");
        }
    }
}
