// Copyright (c)  by Gleb E. Zaslavkiy
//MIT License
//! catalogue of ready-made double integrals, grouped by what they exercise
use crate::numerical::double_integral::IntegrationOrder::{DxDy, DyDx};
use crate::numerical::double_integral::{IntegrationOrder, IntegrationRequest};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Preset {
    pub name: &'static str,
    pub integrand: &'static str,
    pub x_min: &'static str,
    pub x_max: &'static str,
    pub y_min: &'static str,
    pub y_max: &'static str,
    pub order: IntegrationOrder,
}

impl Preset {
    pub fn to_request(&self) -> IntegrationRequest {
        IntegrationRequest::new(self.integrand)
            .x(self.x_min, self.x_max)
            .y(self.y_min, self.y_max)
            .order(self.order)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PresetCategory {
    pub label: &'static str,
    pub presets: &'static [Preset],
}

const fn preset(
    name: &'static str,
    integrand: &'static str,
    x: (&'static str, &'static str),
    y: (&'static str, &'static str),
    order: IntegrationOrder,
) -> Preset {
    Preset { name, integrand, x_min: x.0, x_max: x.1, y_min: y.0, y_max: y.1, order }
}

pub static PRESETS: [PresetCategory; 5] = [
    PresetCategory {
        label: "Basic Iterated",
        presets: &[
            preset("Ex 1: 2xy over [0,2]×[0,1]", "2*x*y", ("0", "2"), ("0", "1"), DyDx),
            preset("Ex 2: x-y over [0,1]×[-1,0]", "x-y", ("0", "1"), ("-1", "0"), DyDx),
            preset("Ex 5: 4-y² over [0,2]×[0,3]", "4-y^2", ("0", "2"), ("0", "3"), DyDx),
            preset("Ex 9: exp(x+y) with ln bounds", "exp(x+y)", ("0", "ln(2)"), ("0", "ln(5)"), DyDx),
        ],
    },
    PresetCategory {
        label: "Variable Bounds",
        presets: &[
            preset("Triangular: x+y, y∈[0,1-x]", "x+y", ("0", "1"), ("0", "1-x"), DyDx),
            preset("Circular: 1, x²+y²≤1", "1", ("-1", "1"), ("-sqrt(1-x^2)", "sqrt(1-x^2)"), DyDx),
            preset("Parabolic: x², x∈[0,√y]", "x^2", ("0", "sqrt(y)"), ("0", "4"), DxDy),
        ],
    },
    PresetCategory {
        label: "Special Functions",
        presets: &[
            preset("Bessel J₀(x²+y²)", "besselj0(x^2+y^2)", ("0", "3"), ("0", "3"), DyDx),
            preset("Error function erf(x+y)", "erf(x+y)", ("0", "2"), ("0", "2"), DyDx),
            preset("Gamma Γ(x+y)", "gamma(x+y)", ("0.1", "1"), ("0.1", "1"), DyDx),
            preset("Heaviside H(x-y)", "heaviside(x-y)", ("0", "2"), ("0", "2"), DyDx),
        ],
    },
    PresetCategory {
        label: "Infinite/Improper",
        presets: &[
            preset("Gaussian over ℝ²", "exp(-x^2-y^2)", ("-inf", "inf"), ("-inf", "inf"), DyDx),
            preset("Exponential decay", "exp(-abs(x)-abs(y))", ("-inf", "inf"), ("-inf", "inf"), DyDx),
            preset("Semi-infinite: e^(-xy)", "exp(-x*y)", ("0", "inf"), ("1", "2"), DyDx),
            preset("Bivariate normal", "exp(-(x^2+y^2)/2)/(2*pi)", ("-inf", "inf"), ("-inf", "inf"), DyDx),
        ],
    },
    PresetCategory {
        label: "Oscillatory",
        presets: &[
            preset("Rapid oscillation: sin(100x)cos(100y)", "sin(100*x)*cos(100*y)", ("0", "2*pi"), ("0", "2*pi"), DyDx),
            preset("Fresnel: sin(x²)cos(y²)", "sin(x^2)*cos(y^2)", ("0", "3"), ("0", "3"), DyDx),
            preset("Sinc: sin(x²+y²)/(x²+y²)", "sinc(x^2+y^2)", ("0", "5"), ("0", "5"), DyDx),
        ],
    },
];

/// all presets in catalogue order
pub fn all_presets() -> impl Iterator<Item = &'static Preset> {
    PRESETS.iter().flat_map(|category| category.presets.iter())
}

pub fn find_preset(name: &str) -> Option<&'static Preset> {
    all_presets().find(|preset| preset.name == name)
}
