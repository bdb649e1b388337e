use ledgerlens_core::Money;
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

static DR_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)([\d,.-]+)\s*\(\s*dr\s*\)").expect("valid Dr regex"));
static CR_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)([\d,.-]+)\s*\(\s*cr\s*\)").expect("valid Cr regex"));
static LEADING_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?(?:\d+(?:\.\d*)?|\.\d+)").expect("valid number regex"));

/// Debit/credit marker, either embedded in a cell (`"10.00 (Dr)"`) or held
/// in a separate Dr/Cr column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DrCr {
    Dr,
    Cr,
}

impl fmt::Display for DrCr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DrCr::Dr => write!(f, "Dr"),
            DrCr::Cr => write!(f, "Cr"),
        }
    }
}

impl DrCr {
    /// Reads a bare marker cell such as `"DR"` or `" cr "`.
    pub fn from_marker(cell: &str) -> Option<Self> {
        let cell = cell.trim();
        if cell.eq_ignore_ascii_case("dr") {
            Some(DrCr::Dr)
        } else if cell.eq_ignore_ascii_case("cr") {
            Some(DrCr::Cr)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaggedAmount {
    pub amount: Money,
    pub tag: Option<DrCr>,
}

/// Parses a numeric cell the forgiving way: every character outside
/// `[0-9.-]` is dropped, then the leading number is read. Anything
/// unreadable is zero.
pub fn parse_amount(cell: &str) -> Money {
    let cleaned: String = cell
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    leading_number(&cleaned).unwrap_or_default()
}

/// The number at the start of `s`; whatever follows it is ignored, so
/// `"12.5-3"` reads as `12.5`. `None` when `s` does not start with one or
/// it is too large for a `Decimal`.
fn leading_number(s: &str) -> Option<Money> {
    let matched = LEADING_NUMBER.find(s)?.as_str().trim_end_matches('.');
    let (sign, digits) = match matched.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", matched),
    };
    let zero = if digits.starts_with('.') { "0" } else { "" };
    Decimal::from_str(&format!("{sign}{zero}{digits}"))
        .ok()
        .map(Money::from_decimal)
}

/// Parses an amount that may carry an embedded `(Dr)` / `(Cr)` tag.
/// Untagged cells fall back to [`parse_amount`].
pub fn parse_tagged_amount(cell: &str) -> TaggedAmount {
    let cell = cell.trim();
    for (re, tag) in [(&*DR_TAG, DrCr::Dr), (&*CR_TAG, DrCr::Cr)] {
        if let Some(caps) = re.captures(cell) {
            let digits = caps[1].replace(',', "");
            return TaggedAmount {
                amount: leading_number(&digits).unwrap_or_default(),
                tag: Some(tag),
            };
        }
    }
    TaggedAmount {
        amount: parse_amount(cell),
        tag: None,
    }
}

/// A running-balance cell. The tag, if any, is ignored: only the magnitude
/// feeds balance arithmetic.
pub fn parse_balance(cell: &str) -> Money {
    let tagged = parse_tagged_amount(cell);
    if tagged.amount.is_zero() {
        parse_amount(cell)
    } else {
        tagged.amount
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn money(s: &str) -> Money {
        Money::from_decimal(Decimal::from_str(s).unwrap())
    }

    // ── leading number ────────────────────────────────────────────────────────

    #[test]
    fn leading_number_plain() {
        assert_eq!(leading_number("1234.50"), Some(money("1234.50")));
        assert_eq!(leading_number("-20"), Some(money("-20")));
    }

    #[test]
    fn leading_number_ignores_trailing_garbage() {
        assert_eq!(leading_number("12.5-3"), Some(money("12.5")));
        assert_eq!(leading_number("1.2.3"), Some(money("1.2")));
        assert_eq!(leading_number("7."), Some(money("7")));
    }

    #[test]
    fn leading_number_bare_fraction() {
        assert_eq!(leading_number(".5"), Some(money("0.5")));
        assert_eq!(leading_number("-.25"), Some(money("-0.25")));
    }

    #[test]
    fn leading_number_rejects_non_numbers() {
        assert_eq!(leading_number(""), None);
        assert_eq!(leading_number("-"), None);
        assert_eq!(leading_number("."), None);
        assert_eq!(leading_number("--5"), None);
    }

    // ── parse_amount ──────────────────────────────────────────────────────────

    #[test]
    fn parse_amount_plain() {
        assert_eq!(parse_amount("123.45"), money("123.45"));
    }

    #[test]
    fn parse_amount_with_commas_and_currency() {
        assert_eq!(parse_amount("1,234.56"), money("1234.56"));
        assert_eq!(parse_amount("INR 99.99"), money("99.99"));
    }

    #[test]
    fn parse_amount_negative() {
        assert_eq!(parse_amount("-50.00"), money("-50.00"));
    }

    #[test]
    fn parse_amount_malformed_is_zero() {
        assert_eq!(parse_amount(""), Money::zero());
        assert_eq!(parse_amount("-"), Money::zero());
        assert_eq!(parse_amount("n/a"), Money::zero());
    }

    // ── tagged amounts ────────────────────────────────────────────────────────

    #[test]
    fn tagged_dr() {
        let t = parse_tagged_amount("1,234.50 (Dr)");
        assert_eq!(t.amount, money("1234.50"));
        assert_eq!(t.tag, Some(DrCr::Dr));
    }

    #[test]
    fn tagged_cr_case_and_spacing() {
        let t = parse_tagged_amount("10.00( CR )");
        assert_eq!(t.amount, money("10.00"));
        assert_eq!(t.tag, Some(DrCr::Cr));
    }

    #[test]
    fn untagged_falls_back() {
        let t = parse_tagged_amount("Rs 500");
        assert_eq!(t.amount, money("500"));
        assert_eq!(t.tag, None);
    }

    #[test]
    fn balance_ignores_tag() {
        assert_eq!(parse_balance("2,000.00 (Cr)"), money("2000.00"));
        assert_eq!(parse_balance("0.00 (Dr)"), Money::zero());
        assert_eq!(parse_balance("750"), money("750"));
    }

    #[test]
    fn marker_cells() {
        assert_eq!(DrCr::from_marker(" DR "), Some(DrCr::Dr));
        assert_eq!(DrCr::from_marker("cr"), Some(DrCr::Cr));
        assert_eq!(DrCr::from_marker("debit"), None);
    }
}
