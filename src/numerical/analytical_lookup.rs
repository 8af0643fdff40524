//! Table of textbook double integrals with known closed forms.
//! A hit is reported next to the numeric value, it never replaces it.
//! Bounds are compared as text, so `"2"` and `"2.0"` are different regions.
use regex::Regex;
use std::sync::OnceLock;

/// trimmed bound texts of a request, case preserved
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundTexts<'a> {
    pub x_min: &'a str,
    pub x_max: &'a str,
    pub y_min: &'a str,
    pub y_max: &'a str,
}

impl<'a> BoundTexts<'a> {
    fn is_rect(&self, x_min: &str, x_max: &str, y_min: &str, y_max: &str) -> bool {
        self.x_min == x_min && self.x_max == x_max && self.y_min == y_min && self.y_max == y_max
    }
}

struct KnownIntegral {
    pattern: Regex,
    closed_form: &'static str,
    region: fn(&BoundTexts) -> bool,
}

fn known_integrals() -> &'static [KnownIntegral] {
    static TABLE: OnceLock<Vec<KnownIntegral>> = OnceLock::new();
    TABLE.get_or_init(|| {
        let entries: [(&str, &'static str, fn(&BoundTexts) -> bool); 9] = [
            (r"^2\*x\*y$", "2", |b| b.is_rect("0", "2", "0", "1")),
            (r"^x-y$", "1", |b| b.is_rect("0", "1", "-1", "0")),
            (r"^x\+y\+1$", "2", |b| b.is_rect("0", "1", "-1", "1")),
            (r"^4-y\^2$", "6", |b| b.is_rect("0", "2", "0", "3")),
            (r"^6\*y\^2-2\*x$", "14", |b| b.is_rect("0", "1", "0", "2")),
            (r"^7-x-y$", "6", |b| b.is_rect("0", "1", "0", "1")),
            (r"^x\^2\+y\^2$", "8/3", |b| b.is_rect("-1", "1", "-1", "1")),
            (r"^x\*y$", "9", |b| b.is_rect("0", "2", "0", "3")),
            // triangle under y = 1-x; the lower y limit is not checked
            (r"^x\+y$", "1/3", |b| b.x_min == "0" && b.x_max == "1" && b.y_max == "1-x"),
        ];
        entries
            .into_iter()
            .filter_map(|(pattern, closed_form, region)| {
                Regex::new(pattern)
                    .ok()
                    .map(|pattern| KnownIntegral { pattern, closed_form, region })
            })
            .collect()
    })
}

/// whitespace stripped, lowercased
pub fn normalize_integrand(integrand: &str) -> String {
    integrand
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_lowercase()
}

/// closed form of the integral over the given region, if it is in the table
pub fn lookup_analytical(integrand: &str, bounds: &BoundTexts) -> Option<&'static str> {
    let normalized = normalize_integrand(integrand);
    known_integrals()
        .iter()
        .find(|known| known.pattern.is_match(&normalized) && (known.region)(bounds))
        .map(|known| known.closed_form)
}
