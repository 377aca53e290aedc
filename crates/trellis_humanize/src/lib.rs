//! Human-readable magnitude formatting for integers.
//!
//! This crate renders an `i64` with a decimal (`k`, `M`, `G`, ...) or binary (`Ki`, `Mi`, `Gi`, ...)
//! magnitude suffix and exactly three fractional digits.
//!
//! ## Notes
//!
//! - Pure formatting: **no IO**, no global state, no dependencies.
//! - The prefix is the largest one whose factor fits into the value under integer division. Negative
//!   values never select a prefix and are printed against a factor of 1.
//! - Rounding to three digits uses ties-to-even.
//!
//! ## Examples
//!
//! ```rust
//! use trellis_humanize::{humanize, Multiple};
//!
//! assert_eq!(humanize(1024, Multiple::Decimal), "1.024k");
//! assert_eq!(humanize(1024, Multiple::Binary), "1.000Ki");
//! assert_eq!(humanize(1000, Multiple::Binary), "1000.000");
//! ```

use std::fmt;

/// Select the family of magnitude prefixes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Multiple {
    /// SI prefixes, powers of 1000.
    Decimal,
    /// IEC prefixes, powers of 1024.
    #[default]
    Binary,
}

impl Multiple {
    /// Return the prefix table for this family, largest factor first.
    pub fn prefixes(self) -> &'static [BinaryPrefix] {
        match self {
            Multiple::Decimal => DECIMAL,
            Multiple::Binary => BINARY,
        }
    }
}

/// One magnitude prefix (see <https://en.wikipedia.org/wiki/Binary_prefix>).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BinaryPrefix {
    /// Spelled-out prefix name, e.g. `"kibi"`.
    pub name: &'static str,
    /// Suffix appended to formatted values, e.g. `"Ki"`.
    pub symbol: &'static str,
    /// Factor the prefix stands for.
    pub integer: i64,
}

const fn prefix(name: &'static str, symbol: &'static str, integer: i64) -> BinaryPrefix {
    BinaryPrefix { name, symbol, integer }
}

/// SI prefixes from exa down to kilo.
pub const DECIMAL: &[BinaryPrefix] = &[
    prefix("exa", "E", 1_000_000_000_000_000_000),
    prefix("peta", "P", 1_000_000_000_000_000),
    prefix("tera", "T", 1_000_000_000_000),
    prefix("giga", "G", 1_000_000_000),
    prefix("mega", "M", 1_000_000),
    prefix("kilo", "k", 1_000),
];

/// IEC prefixes from exbi down to kibi.
pub const BINARY: &[BinaryPrefix] = &[
    prefix("exbi", "Ei", 1 << 60),
    prefix("pebi", "Pi", 1 << 50),
    prefix("tebi", "Ti", 1 << 40),
    prefix("gibi", "Gi", 1 << 30),
    prefix("mebi", "Mi", 1 << 20),
    prefix("kibi", "Ki", 1 << 10),
];

/// The empty prefix (factor 1, no symbol).
pub const NONE: BinaryPrefix = prefix("", "", 1);

/// Find the prefix used to render `value`.
///
/// ## Returns
/// - The first entry of `multiple.prefixes()` with `value / integer > 0`, or [`NONE`].
pub fn prefix_for(value: i64, multiple: Multiple) -> &'static BinaryPrefix {
    multiple
        .prefixes()
        .iter()
        .find(|p| value / p.integer > 0)
        .unwrap_or(&NONE)
}

/// Format `value` with a magnitude suffix from `multiple`.
///
/// ## Parameters
/// - `value`: the integer to render.
/// - `multiple`: decimal or binary prefix family.
///
/// ## Returns
/// - (`String`): three fractional digits followed by the prefix symbol, e.g. `"1.500Mi"`.
pub fn humanize(value: i64, multiple: Multiple) -> String {
    Humanized::new(value, multiple).to_string()
}

/// `Display` adapter that humanizes on formatting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Humanized {
    pub value: i64,
    pub multiple: Multiple,
}

impl Humanized {
    pub fn new(value: i64, multiple: Multiple) -> Self {
        Self { value, multiple }
    }
}

impl fmt::Display for Humanized {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = prefix_for(self.value, self.multiple);
        let scaled = self.value as f64 / prefix.integer as f64;
        let rounded = (scaled * 1000.0).round_ties_even() / 1000.0;
        write!(f, "{:.3}{}", rounded, prefix.symbol)
    }
}

/// Extension methods for humanizing integers in place.
pub trait HumanizeExt {
    /// Render `self` with a magnitude suffix, see [`humanize`].
    fn humanize(self, multiple: Multiple) -> String;
}

impl HumanizeExt for i64 {
    fn humanize(self, multiple: Multiple) -> String {
        humanize(self, multiple)
    }
}

/// Format-specifier driven humanizer.
///
/// Accepts `"D"` for decimal prefixes and `"B"` (or no specifier) for binary prefixes. Other
/// specifiers are not handled and yield `None`, leaving the caller to apply its default formatting.
#[derive(Debug, Clone, Copy, Default)]
pub struct HumanizeNumberFormatter;

impl HumanizeNumberFormatter {
    pub fn new() -> Self {
        Self
    }

    /// Format `value` according to `spec`.
    ///
    /// ## Examples
    /// ```rust
    /// use trellis_humanize::HumanizeNumberFormatter;
    ///
    /// let formatter = HumanizeNumberFormatter::new();
    /// assert_eq!(formatter.format(Some("D"), 1000).as_deref(), Some("1.000k"));
    /// assert_eq!(formatter.format(None, 1024).as_deref(), Some("1.000Ki"));
    /// assert_eq!(formatter.format(Some("N"), 1024), None);
    /// ```
    pub fn format(&self, spec: Option<&str>, value: i64) -> Option<String> {
        Self::multiple_for(spec).map(|multiple| humanize(value, multiple))
    }

    /// Resolve a format specifier to a prefix family.
    pub fn multiple_for(spec: Option<&str>) -> Option<Multiple> {
        match spec.unwrap_or("B") {
            "D" => Some(Multiple::Decimal),
            "B" => Some(Multiple::Binary),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Case {
        integer: i64,
        decimal: &'static str,
        binary: &'static str,
    }

    const CASES: &[Case] = &[
        Case {
            integer: 1000,
            decimal: "1.000k",
            binary: "1000.000",
        },
        Case {
            integer: 1024,
            decimal: "1.024k",
            binary: "1.000Ki",
        },
    ];

    #[test]
    fn test_to_string() {
        for case in CASES {
            assert_eq!(case.integer.humanize(Multiple::Decimal), case.decimal);
            assert_eq!(case.integer.humanize(Multiple::Binary), case.binary);
        }
    }

    #[test]
    fn test_formatter_specifiers() {
        let formatter = HumanizeNumberFormatter::new();
        for case in CASES {
            assert_eq!(formatter.format(Some("D"), case.integer).as_deref(), Some(case.decimal));
            assert_eq!(formatter.format(Some("B"), case.integer).as_deref(), Some(case.binary));
            // No specifier falls back to binary.
            assert_eq!(formatter.format(None, case.integer).as_deref(), Some(case.binary));
        }
    }

    #[test]
    fn test_small_and_negative_values_have_no_prefix() {
        assert_eq!(humanize(0, Multiple::Decimal), "0.000");
        assert_eq!(humanize(999, Multiple::Decimal), "999.000");
        assert_eq!(humanize(-2048, Multiple::Binary), "-2048.000");
    }

    #[test]
    fn test_largest_prefixes() {
        assert_eq!(humanize(1 << 60, Multiple::Binary), "1.000Ei");
        assert_eq!(humanize(3 * (1 << 20), Multiple::Binary), "3.000Mi");
        assert_eq!(humanize(2_500_000_000, Multiple::Decimal), "2.500G");
    }

    #[test]
    fn test_prefix_tables_are_descending() {
        for multiple in [Multiple::Decimal, Multiple::Binary] {
            let table = multiple.prefixes();
            assert!(table.windows(2).all(|w| w[0].integer > w[1].integer));
        }
        assert_eq!(prefix_for(1536, Multiple::Binary).name, "kibi");
    }
}
