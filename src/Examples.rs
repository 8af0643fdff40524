//! examples of usage of RustedDoubleQuad
/// preset catalogue of double integrals
pub mod presets;
/// double integral examples printed as tables
pub mod double_integral_examples;
