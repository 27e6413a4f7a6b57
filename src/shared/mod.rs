pub mod geo;
pub mod locale;

pub use geo::{Coordinate, Distance};
pub use locale::*;

use rayon::prelude::*;

pub trait Identifiable {
    fn id(&self) -> &str;
    fn name(&self, locale: Locale) -> &str;
    /// Lower-cased name used for substring comparisons.
    fn normalized_name(&self, locale: Locale) -> &str;
}

/// Case-insensitive substring search over the localized names.
/// Results keep the order of the haystack.
pub fn search<'a, T>(needle: &str, haystack: &'a [T], locale: Locale) -> Vec<&'a T>
where
    T: Send + Sync + Identifiable,
{
    let normalized_needle = needle.trim().to_lowercase();
    if normalized_needle.is_empty() {
        return Vec::new();
    }
    haystack
        .par_iter()
        .filter(|hay| hay.normalized_name(locale).contains(&normalized_needle))
        .collect()
}

/// Rounds to `decimals` places, half away from zero.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

#[test]
fn round_half_away_from_zero() {
    assert_eq!(round_to(2.345, 1), 2.3);
    assert_eq!(round_to(0.125, 2), 0.13);
    assert_eq!(round_to(-0.125, 2), -0.13);
    assert_eq!(round_to(42.0, 2), 42.0);
}
