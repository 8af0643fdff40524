//! # One-dimensional quadrature
//!
//! Three rules share one entry point, [`integrate_1d`]:
//! - **Gauss-Kronrod panels** for smooth finite integrands: the interval is cut
//!   into a fixed number of equal panels and the 15-node Kronrod rule is applied
//!   on each. Cost is fixed (`panels * 15` evaluations), there is no error control.
//!   Non-finite samples are dropped from the sum.
//! - **adaptive Simpson** for oscillatory or singular integrands: recursive
//!   bisection, a panel is accepted when `|S_left + S_right - S_whole| <= 15 eps`
//!   or the depth cap is hit; the tolerance halves at every level.
//! - **infinite intervals** are mapped onto a finite `t`-interval first
//!   and the transformed integrand (f times Jacobian) goes through the Gauss-Kronrod panels:
//!   - `(-inf, inf)`: `x = t/(1-t^2)`, `dx = (1+t^2)/(1-t^2)^2 dt`, `t in [-0.9999, 0.9999]`
//!   - `[a, inf)`: `x = a + t/(1-t)`, `dx = dt/(1-t)^2`, `t in [0.0001, 0.9999]`
//!   - `(-inf, b]`: `x = b - (1-t)/t`, `dx = dt/t^2`, `t in [0.0001, 0.9999]`
use log::debug;
use strum_macros::{Display, EnumIter, EnumString};

/// 15-point Kronrod abscissae on [-1, 1]
pub const GK_NODES_15: [f64; 15] = [
    -0.9914553711208126,
    -0.9491079123427585,
    -0.8648644233597691,
    -0.7415311855993945,
    -0.5860872354676911,
    -0.4058451513773972,
    -0.2077849550078985,
    0.0,
    0.2077849550078985,
    0.4058451513773972,
    0.5860872354676911,
    0.7415311855993945,
    0.8648644233597691,
    0.9491079123427585,
    0.9914553711208126,
];

/// weights matching GK_NODES_15
pub const GK_WEIGHTS_15: [f64; 15] = [
    0.02293532201052922,
    0.06309209262997856,
    0.1047900103222502,
    0.1406532597155259,
    0.1690047266392679,
    0.1903505780647854,
    0.2044329400752989,
    0.2094821410847278,
    0.2044329400752989,
    0.1903505780647854,
    0.1690047266392679,
    0.1406532597155259,
    0.1047900103222502,
    0.06309209262997856,
    0.02293532201052922,
];

/// distance kept from the singular end points of the infinite-interval maps
const T_CLAMP: f64 = 1e-4;

/// Which rule to use on a finite interval
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, EnumIter)]
#[strum(ascii_case_insensitive)]
pub enum QuadMode {
    #[strum(serialize = "smooth")]
    Smooth,
    #[strum(serialize = "oscillatory")]
    Oscillatory,
    #[strum(serialize = "singular")]
    Singular,
}

impl QuadMode {
    pub fn description(&self) -> &'static str {
        match self {
            QuadMode::Smooth => "Gauss-Kronrod 15-point rule on fixed panels",
            QuadMode::Oscillatory => "adaptive Simpson refinement (oscillatory integrand)",
            QuadMode::Singular => "adaptive Simpson refinement (singular integrand)",
        }
    }
}

/// Tunable constants of the 1D engine
#[derive(Debug, Clone, PartialEq)]
pub struct QuadOptions {
    pub mode: QuadMode,
    /// adaptive Simpson tolerance at the top level
    pub eps: f64,
    /// adaptive Simpson recursion cap
    pub max_depth: usize,
    /// Gauss-Kronrod panels on a finite interval
    pub panels: usize,
    /// Gauss-Kronrod panels on the transformed infinite interval
    pub infinite_panels: usize,
}

impl Default for QuadOptions {
    fn default() -> Self {
        QuadOptions {
            mode: QuadMode::Smooth,
            eps: 1e-10,
            max_depth: 25,
            panels: 150,
            infinite_panels: 200,
        }
    }
}

impl QuadOptions {
    pub fn with_mode(&self, mode: QuadMode) -> Self {
        QuadOptions { mode, ..self.clone() }
    }
}

/// integrate f over [a, b]; a and b may be infinite
pub fn integrate_1d<F: Fn(f64) -> f64>(f: &F, a: f64, b: f64, opts: &QuadOptions) -> f64 {
    if a.is_infinite() || b.is_infinite() {
        return integrate_infinite(f, a, b, opts.infinite_panels);
    }
    match opts.mode {
        QuadMode::Oscillatory | QuadMode::Singular => {
            adaptive_simpson(f, a, b, opts.eps, opts.max_depth)
        }
        QuadMode::Smooth => gauss_kronrod_panels(f, a, b, opts.panels),
    }
}

/// composite 15-point Gauss-Kronrod over `panels` equal panels
pub fn gauss_kronrod_panels<F: Fn(f64) -> f64>(f: &F, a: f64, b: f64, panels: usize) -> f64 {
    let panels = panels.max(1);
    let h = (b - a) / panels as f64;
    let mut total = 0.0;
    for k in 0..panels {
        let lo = a + k as f64 * h;
        let hi = lo + h;
        let half = (hi - lo) / 2.0;
        let center = (hi + lo) / 2.0;
        let mut panel_sum = 0.0;
        for (node, weight) in GK_NODES_15.iter().zip(GK_WEIGHTS_15.iter()) {
            let v = f(center + half * node);
            if v.is_finite() {
                panel_sum += weight * v;
            }
        }
        total += half * panel_sum;
    }
    total
}

fn simpson(fa: f64, fm: f64, fb: f64, h: f64) -> f64 {
    h * (fa + 4.0 * fm + fb) / 6.0
}

/// adaptive Simpson with Richardson correction and a hard depth cap
pub fn adaptive_simpson<F: Fn(f64) -> f64>(
    f: &F,
    a: f64,
    b: f64,
    eps: f64,
    max_depth: usize,
) -> f64 {
    let fa = f(a);
    let fb = f(b);
    let m = (a + b) / 2.0;
    let fm = f(m);
    let whole = simpson(fa, fm, fb, b - a);
    simpson_step(f, (a, fa), (m, fm), (b, fb), whole, eps, max_depth)
}

fn simpson_step<F: Fn(f64) -> f64>(
    f: &F,
    (a, fa): (f64, f64),
    (m, fm): (f64, f64),
    (b, fb): (f64, f64),
    whole: f64,
    eps: f64,
    depth: usize,
) -> f64 {
    let left = (a + m) / 2.0;
    let fl = f(left);
    let right = (m + b) / 2.0;
    let fr = f(right);
    let h = m - a;
    let left_simpson = simpson(fa, fl, fm, h);
    let right_simpson = simpson(fm, fr, fb, h);
    let delta = left_simpson + right_simpson - whole;
    if depth == 0 || delta.abs() <= 15.0 * eps {
        return left_simpson + right_simpson + delta / 15.0;
    }
    simpson_step(f, (a, fa), (left, fl), (m, fm), left_simpson, eps / 2.0, depth - 1)
        + simpson_step(f, (m, fm), (right, fr), (b, fb), right_simpson, eps / 2.0, depth - 1)
}

/// change of variables for unbounded intervals, then Gauss-Kronrod panels
pub fn integrate_infinite<F: Fn(f64) -> f64>(f: &F, a: f64, b: f64, panels: usize) -> f64 {
    match (a.is_infinite(), b.is_infinite()) {
        (true, true) => {
            if a == b {
                return 0.0;
            }
            let sign = if a < b { 1.0 } else { -1.0 };
            debug!("mapping (-inf, inf) with x = t/(1-t^2)");
            let g = |t: f64| {
                let d = 1.0 - t * t;
                let x = t / d;
                let w = (1.0 + t * t) / (d * d);
                f(x) * w
            };
            sign * gauss_kronrod_panels(&g, -1.0 + T_CLAMP, 1.0 - T_CLAMP, panels)
        }
        (false, true) => {
            // [a, +inf) or, reversed, from a down to -inf
            let upward = b > 0.0;
            debug!("mapping semi-infinite interval from finite end {}", a);
            let g = |t: f64| {
                let d = 1.0 - t;
                let step = t / d;
                let x = if upward { a + step } else { a - step };
                f(x) / (d * d)
            };
            let value = gauss_kronrod_panels(&g, T_CLAMP, 1.0 - T_CLAMP, panels);
            if upward { value } else { -value }
        }
        (true, false) => {
            // (-inf, b] or, reversed, from +inf down to b
            let from_below = a < 0.0;
            debug!("mapping semi-infinite interval to finite end {}", b);
            let g = |t: f64| {
                let step = (1.0 - t) / t;
                let x = if from_below { b - step } else { b + step };
                f(x) / (t * t)
            };
            let value = gauss_kronrod_panels(&g, T_CLAMP, 1.0 - T_CLAMP, panels);
            if from_below { value } else { -value }
        }
        (false, false) => gauss_kronrod_panels(f, a, b, panels),
    }
}
