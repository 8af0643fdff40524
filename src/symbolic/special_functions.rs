//! Special functions available to integrands: gamma, error function,
//! Bessel J0, Heaviside step, sinc and a Gaussian approximation of the Dirac delta.
use std::f64::consts::PI;

const LANCZOS_G: f64 = 7.0;
const LANCZOS_COEFFS: [f64; 9] = [
    0.99999999999980993,
    676.5203681218851,
    -1259.1392167224028,
    771.32342877765313,
    -176.61502916214059,
    12.507343278686905,
    -0.13857109526572012,
    9.9843695780195716e-6,
    1.5056327351493116e-7,
];

/// default width of the Gaussian used for dirac(x)
pub const DIRAC_DEFAULT_EPS: f64 = 0.01;

/// Gamma function, Lanczos approximation with reflection for x < 0.5
pub fn gamma(x: f64) -> f64 {
    if x < 0.5 {
        return PI / ((PI * x).sin() * gamma(1.0 - x));
    }
    let x = x - 1.0;
    let mut a = LANCZOS_COEFFS[0];
    for (i, c) in LANCZOS_COEFFS.iter().enumerate().skip(1) {
        a += c / (x + i as f64);
    }
    let t = x + LANCZOS_G + 0.5;
    (2.0 * PI).sqrt() * t.powf(x + 0.5) * (-t).exp() * a
}

/// x! extended to reals through gamma
pub fn factorial(x: f64) -> f64 {
    gamma(x + 1.0)
}

/// Bessel function of the first kind J0: truncated series for |x| < 8,
/// leading asymptotic term beyond
pub fn bessel_j0(x: f64) -> f64 {
    if x.abs() < 8.0 {
        let y = x * x;
        return 1.0 + y * (-0.25 + y * (0.015625 + y * (-0.0004340277778)));
    }
    (2.0 / (PI * x)).sqrt() * (x - PI / 4.0).cos()
}

/// Error function, Abramowitz & Stegun 7.1.26 (|error| < 1.5e-7)
pub fn erf(x: f64) -> f64 {
    let (a1, a2, a3) = (0.254829592, -0.284496736, 1.421413741);
    let (a4, a5, p) = (-1.453152027, 1.061405429, 0.3275911);
    let sign = if x >= 0.0 { 1.0 } else { -1.0 };
    let x = x.abs();
    let t = 1.0 / (1.0 + p * x);
    let y = 1.0 - (((((a5 * t + a4) * t) + a3) * t + a2) * t + a1) * t * (-x * x).exp();
    sign * y
}

pub fn heaviside(x: f64) -> f64 {
    if x >= 0.0 { 1.0 } else { 0.0 }
}

/// unnormalised sinc: sin(x)/x, 1 at the origin
pub fn sinc(x: f64) -> f64 {
    if x.abs() < 1e-10 { 1.0 } else { x.sin() / x }
}

/// Dirac delta approximated by a normalised Gaussian of width eps
pub fn dirac(x: f64, eps: f64) -> f64 {
    (-x * x / (2.0 * eps * eps)).exp() / (eps * (2.0 * PI).sqrt())
}

/// sign function with sign(0) = 0
pub fn sign(x: f64) -> f64 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        x
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_gamma_integers() {
        assert_relative_eq!(gamma(1.0), 1.0, epsilon = 1e-12);
        assert_relative_eq!(gamma(5.0), 24.0, epsilon = 1e-9);
        assert_relative_eq!(factorial(4.0), 24.0, epsilon = 1e-9);
    }

    #[test]
    fn test_gamma_half_and_reflection() {
        assert_relative_eq!(gamma(0.5), PI.sqrt(), epsilon = 1e-12);
        // Γ(-0.5) = -2√π
        assert_relative_eq!(gamma(-0.5), -2.0 * PI.sqrt(), epsilon = 1e-10);
    }

    #[test]
    fn test_erf() {
        assert_relative_eq!(erf(0.0), 0.0, epsilon = 1e-8);
        assert_relative_eq!(erf(1.0), 0.8427007929, epsilon = 2e-7);
        assert_relative_eq!(erf(-1.0), -0.8427007929, epsilon = 2e-7);
        assert_relative_eq!(erf(5.0), 1.0, epsilon = 1e-7);
    }

    #[test]
    fn test_bessel_small_and_large() {
        assert_relative_eq!(bessel_j0(0.0), 1.0);
        assert_relative_eq!(bessel_j0(0.5), 0.938469807, epsilon = 1e-4);
        let far = bessel_j0(20.0);
        assert!(far.abs() < 0.2);
    }

    #[test]
    fn test_step_sinc_dirac_sign() {
        assert_eq!(heaviside(0.0), 1.0);
        assert_eq!(heaviside(-1e-12), 0.0);
        assert_eq!(sinc(0.0), 1.0);
        assert_relative_eq!(sinc(PI), 0.0, epsilon = 1e-15);
        assert_relative_eq!(dirac(0.0, 1.0), 1.0 / (2.0 * PI).sqrt());
        assert_eq!(sign(-3.0), -1.0);
        assert_eq!(sign(0.0), 0.0);
        assert!(sign(f64::NAN).is_nan());
    }
}
